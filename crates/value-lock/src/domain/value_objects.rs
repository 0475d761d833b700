//! # Domain Value Objects
//!
//! Identifiers, quantities and the lifecycle state machine of a deposit.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// 20-byte account address.
pub type Address = [u8; 20];

/// Milliseconds since the Unix epoch, as read from the clock source.
pub type Timestamp = u64;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = 60_000;

/// Longest allowed lock: 365 days.
pub const MAX_DURATION_MINUTES: u64 = 525_600;

/// [`MAX_DURATION_MINUTES`] in milliseconds.
pub const MAX_DURATION_MS: u64 = MAX_DURATION_MINUTES * MS_PER_MINUTE;

/// Convert minutes to milliseconds, `None` on overflow.
pub fn minutes_to_ms(minutes: u64) -> Option<u64> {
    minutes.checked_mul(MS_PER_MINUTE)
}

/// Render an address as `0x`-prefixed hex for logs.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Unique deposit identifier.
///
/// Derived as `sha256(depositor || recipient || start_time || sequence)`.
/// The sequence comes from a per-engine counter, so two deposits created by
/// the same parties in the same millisecond still get distinct ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepositId(pub [u8; 32]);

impl DepositId {
    /// Derive the id for a new deposit.
    pub fn derive(
        depositor: &Address,
        recipient: &Address,
        start_time: Timestamp,
        sequence: u64,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(depositor);
        hasher.update(recipient);
        hasher.update(start_time.to_be_bytes());
        hasher.update(sequence.to_be_bytes());
        Self(hasher.finalize().into())
    }

    /// Raw id bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x")).ok()?;
        let array: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(array))
    }
}

impl fmt::Display for DepositId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for DepositId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DepositId({})", &self.to_hex()[..16])
    }
}

impl Serialize for DepositId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DepositId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid deposit id: {s}")))
    }
}

/// Identifier of a fungible asset type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Create an asset identifier.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Asset symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A quantity of one asset type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value {
    /// Asset type.
    pub asset: AssetId,
    /// Quantity in the asset's smallest unit.
    pub amount: u128,
}

impl Value {
    /// Create a value.
    pub fn new(asset: AssetId, amount: u128) -> Self {
        Self { asset, amount }
    }

    /// True when the quantity is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

/// Opaque handle naming value held in custody by the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustodyHandle(pub u64);

/// Deposit lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Value in custody, awaiting withdrawal.
    #[default]
    Active,
    /// Depositor reclaimed the value.
    WithdrawnByDepositor,
    /// Recipient claimed the value after unlock.
    WithdrawnByRecipient,
}

impl LockState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: LockState) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::WithdrawnByDepositor) | (Self::Active, Self::WithdrawnByRecipient)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// The party that performed a withdrawal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawnBy {
    /// Depositor reclaim, allowed at any time.
    Depositor,
    /// Recipient claim, allowed once unlocked.
    Recipient,
}

impl WithdrawnBy {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Depositor => "depositor",
            Self::Recipient => "recipient",
        }
    }

    /// Lifecycle state reached by this withdrawal.
    pub fn terminal_state(&self) -> LockState {
        match self {
            Self::Depositor => LockState::WithdrawnByDepositor,
            Self::Recipient => LockState::WithdrawnByRecipient,
        }
    }
}
