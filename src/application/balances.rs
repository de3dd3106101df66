//! Balance mutations, all single statements inside the caller's transaction.

use crate::application::registry;
use crate::domain::account::{Account, AccountKey, Amount};
use crate::domain::ports::LedgerTx;
use crate::error::{Result, SettlementError};

/// `balance += amount`. Returns the account as it stands after the write,
/// read back inside the same transaction.
pub async fn credit(tx: &mut dyn LedgerTx, key: AccountKey, amount: Amount) -> Result<Account> {
    let account = registry::resolve_account(tx, key).await?;
    tx.credit_account(account.id, amount.get()).await?;
    reread(tx, account.id).await
}

/// `balance -= amount`, only where the pre-mutation balance covers it.
///
/// The check and the write are one conditional statement in the store, so two
/// concurrent debits against the same row can never both succeed and drive
/// the balance negative.
pub async fn debit(tx: &mut dyn LedgerTx, key: AccountKey, amount: Amount) -> Result<Account> {
    let account = registry::resolve_account(tx, key).await?;
    debit_resolved(tx, &account, amount).await?;
    reread(tx, account.id).await
}

/// Debit source, credit destination, inside the caller's transaction.
///
/// Rows are touched in ascending account-id order so two transfers moving
/// funds in opposite directions between the same pair cannot deadlock on row
/// locks. When the destination id is the lower one the credit is written
/// first; a failing debit then aborts the whole transaction, so the credit
/// never survives without it.
pub async fn transfer(
    tx: &mut dyn LedgerTx,
    source_key: AccountKey,
    dest_key: AccountKey,
    amount: Amount,
) -> Result<()> {
    let source = registry::resolve_account(tx, source_key).await?;
    let dest = registry::resolve_account(tx, dest_key).await?;

    // The two keys may alias one row through different schemes.
    if source.id == dest.id {
        return Err(SettlementError::InvalidOperation(format!(
            "transfer from account {} to itself",
            source.id
        )));
    }

    if source.id < dest.id {
        debit_resolved(tx, &source, amount).await?;
        tx.credit_account(dest.id, amount.get()).await?;
    } else {
        tx.credit_account(dest.id, amount.get()).await?;
        debit_resolved(tx, &source, amount).await?;
    }
    Ok(())
}

async fn debit_resolved(tx: &mut dyn LedgerTx, account: &Account, amount: Amount) -> Result<()> {
    if tx.debit_account(account.id, amount.get()).await? {
        Ok(())
    } else {
        Err(SettlementError::InsufficientFunds {
            account: account.id,
            balance: account.balance,
            requested: amount.get(),
        })
    }
}

async fn reread(tx: &mut dyn LedgerTx, id: i64) -> Result<Account> {
    registry::resolve_account(tx, AccountKey::ById(id)).await
}
