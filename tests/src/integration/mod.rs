//! End-to-end flows through the public engine API.

pub mod flows;
pub mod races;
