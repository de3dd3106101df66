use crate::domain::account::AccountKey;
use crate::domain::ports::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SettlementError>;

/// Everything a settlement operation can fail with.
///
/// Business rejections (`NotFound`, `InvalidAmount`, `InsufficientFunds`,
/// `InsufficientStock`, `InvalidOperation`) are expected outcomes the caller
/// maps to user-visible responses. `Store` and `RollbackFailed` mean the
/// backing store misbehaved; the transaction in flight is always rolled back.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("account {0} not found")]
    AccountNotFound(AccountKey),
    #[error("product {0} not found")]
    ProductNotFound(i64),
    #[error("service {0} not found")]
    ServiceNotFound(i64),
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),
    #[error("insufficient funds on account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: i64,
        balance: u64,
        requested: u64,
    },
    #[error("insufficient stock for product {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: i64,
        available: u32,
        requested: u32,
    },
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Rollback itself failed. Carries the error that triggered the rollback
    /// so neither cause is lost.
    #[error("rollback failed after `{cause}`: {rollback}")]
    RollbackFailed {
        cause: Box<SettlementError>,
        rollback: StoreError,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SettlementError {
    /// True for expected business rejections, false for store/interface
    /// failures. Callers use this to pick between "insufficient balance"
    /// style responses and "service unavailable".
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_)
                | Self::ProductNotFound(_)
                | Self::ServiceNotFound(_)
                | Self::InvalidAmount(_)
                | Self::InsufficientFunds { .. }
                | Self::InsufficientStock { .. }
                | Self::InvalidOperation(_)
        )
    }
}
