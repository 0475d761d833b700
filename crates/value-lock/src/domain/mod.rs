//! # Domain Module
//!
//! Core domain types for the value lock: the deposit record, its lifecycle
//! states, the rules every record must satisfy, and the error taxonomy.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
