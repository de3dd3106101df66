use crate::error::SettlementError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type AccountId = i64;

/// A client account holding a balance in minor currency units.
///
/// `phone` and `balance_number` are secondary unique identifiers; either one
/// resolves to the same row as the primary id. The balance is unsigned, so a
/// committed negative balance is unrepresentable by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub phone: i64,
    pub balance_number: u64,
    pub balance: u64,
}

/// Payload for opening a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub phone: i64,
    pub balance_number: u64,
    #[serde(default)]
    pub balance: u64,
}

/// One of the three identifier schemes an account can be addressed by.
///
/// Resolved exactly once per operation (see `application::registry`), so the
/// mutation paths are written once against the primary id instead of being
/// duplicated per key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKey {
    ById(AccountId),
    ByPhone(i64),
    ByBalanceNumber(u64),
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "id:{id}"),
            Self::ByPhone(phone) => write!(f, "phone:{phone}"),
            Self::ByBalanceNumber(number) => write!(f, "number:{number}"),
        }
    }
}

impl FromStr for AccountKey {
    type Err = SettlementError;

    /// Parses the textual form used by the CSV driver: `id:<n>`, `phone:<n>`
    /// or `number:<n>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            SettlementError::InvalidInput(format!(
                "account key {s:?} must look like id:<n>, phone:<n> or number:<n>"
            ))
        };
        let (kind, value) = s.split_once(':').ok_or_else(invalid)?;
        match kind {
            "id" => value.parse().map(Self::ById).map_err(|_| invalid()),
            "phone" => value.parse().map(Self::ByPhone).map_err(|_| invalid()),
            "number" => value
                .parse()
                .map(Self::ByBalanceNumber)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// A positive amount of minor currency units.
///
/// Construction is the single place zero and negative amounts are rejected,
/// so every mutation downstream can assume a valid amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: i64) -> Result<Self, SettlementError> {
        if value > 0 {
            Ok(Self(value as u64))
        } else {
            Err(SettlementError::InvalidAmount(value))
        }
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = SettlementError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
