//! Read adapter resolving identifiers to rows inside the caller's
//! transaction.

use crate::domain::account::{Account, AccountKey};
use crate::domain::catalog::{Product, Service};
use crate::domain::ports::LedgerTx;
use crate::error::{Result, SettlementError};

/// Resolves any of the three key schemes to the account row, with exactly one
/// read. Zero rows is a `NotFound` business outcome, not a store failure.
pub async fn resolve_account(tx: &mut dyn LedgerTx, key: AccountKey) -> Result<Account> {
    let found = match key {
        AccountKey::ById(id) => tx.account_by_id(id).await?,
        AccountKey::ByPhone(phone) => tx.account_by_phone(phone).await?,
        AccountKey::ByBalanceNumber(number) => tx.account_by_balance_number(number).await?,
    };
    found.ok_or(SettlementError::AccountNotFound(key))
}

pub async fn require_product(tx: &mut dyn LedgerTx, id: i64) -> Result<Product> {
    tx.product_by_id(id)
        .await?
        .ok_or(SettlementError::ProductNotFound(id))
}

pub async fn require_service(tx: &mut dyn LedgerTx, id: i64) -> Result<Service> {
    tx.service_by_id(id)
        .await?
        .ok_or(SettlementError::ServiceNotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::NewAccount;
    use crate::domain::ports::LedgerStore;
    use crate::infrastructure::in_memory::InMemoryLedger;

    #[tokio::test]
    async fn test_all_key_schemes_resolve_to_the_same_account() {
        let store = InMemoryLedger::new();
        let mut tx = store.begin().await.unwrap();
        let account = tx
            .insert_account(NewAccount {
                phone: 79_990_001_122,
                balance_number: 40_817_001,
                balance: 500,
            })
            .await
            .unwrap();

        let by_id = resolve_account(tx.as_mut(), AccountKey::ById(account.id))
            .await
            .unwrap();
        let by_phone = resolve_account(tx.as_mut(), AccountKey::ByPhone(79_990_001_122))
            .await
            .unwrap();
        let by_number = resolve_account(tx.as_mut(), AccountKey::ByBalanceNumber(40_817_001))
            .await
            .unwrap();

        assert_eq!(by_id.id, account.id);
        assert_eq!(by_phone.id, account.id);
        assert_eq!(by_number.id, account.id);
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let store = InMemoryLedger::new();
        let mut tx = store.begin().await.unwrap();

        assert!(matches!(
            resolve_account(tx.as_mut(), AccountKey::ByPhone(1)).await,
            Err(SettlementError::AccountNotFound(AccountKey::ByPhone(1)))
        ));
        assert!(matches!(
            require_product(tx.as_mut(), 9).await,
            Err(SettlementError::ProductNotFound(9))
        ));
        assert!(matches!(
            require_service(tx.as_mut(), 9).await,
            Err(SettlementError::ServiceNotFound(9))
        ));
    }
}
