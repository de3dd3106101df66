use crate::application::{balances, inventory, registry};
use crate::domain::account::{Account, AccountKey, Amount, NewAccount};
use crate::domain::catalog::{
    Atm, Card, NewAtm, NewCard, NewProduct, NewService, Product, SaleRecord, Service,
};
use crate::domain::ports::{LedgerStoreBox, LedgerTx};
use crate::error::{Result, SettlementError};
use tracing::{info, warn};

/// The public operation surface over the ledger store.
///
/// Every call opens exactly one transaction, applies its mutations through
/// the balance and inventory units, and commits on full success or rolls
/// back on any failure. The engine keeps no state of its own, so one
/// instance can be shared freely between concurrent request handlers.
pub struct SettlementEngine {
    store: LedgerStoreBox,
}

impl SettlementEngine {
    pub fn new(store: LedgerStoreBox) -> Self {
        Self { store }
    }

    /// Credits an account. Returns the updated row.
    pub async fn top_up(&self, key: AccountKey, amount: i64) -> Result<Account> {
        let amount = Amount::new(amount)?;
        let mut tx = self.store.begin().await?;
        let outcome = balances::credit(tx.as_mut(), key, amount).await;
        let result = Self::settle(tx, outcome).await;
        Self::log("top-up", &key, Some(amount), &result);
        result
    }

    /// Debits an account if the balance covers the amount. Returns the
    /// updated row.
    pub async fn withdraw(&self, key: AccountKey, amount: i64) -> Result<Account> {
        let amount = Amount::new(amount)?;
        let mut tx = self.store.begin().await?;
        let outcome = balances::debit(tx.as_mut(), key, amount).await;
        let result = Self::settle(tx, outcome).await;
        Self::log("withdrawal", &key, Some(amount), &result);
        result
    }

    /// Moves funds between two accounts in one transaction. A failed debit
    /// leaves the destination untouched.
    pub async fn transfer(&self, source: AccountKey, dest: AccountKey, amount: i64) -> Result<()> {
        let amount = Amount::new(amount)?;
        let mut tx = self.store.begin().await?;
        let outcome = balances::transfer(tx.as_mut(), source, dest, amount).await;
        let result = Self::settle(tx, outcome).await;
        Self::log("transfer", &source, Some(amount), &result);
        result
    }

    /// Debits the paying account and accrues the amount on the service's
    /// revenue counter. The service's catalog price is never touched.
    pub async fn pay_for_service(
        &self,
        service_id: i64,
        key: AccountKey,
        amount: i64,
    ) -> Result<()> {
        let amount = Amount::new(amount)?;
        let mut tx = self.store.begin().await?;
        let outcome = async {
            let service = registry::require_service(tx.as_mut(), service_id).await?;
            balances::debit(tx.as_mut(), key, amount).await?;
            tx.add_service_revenue(service.id, amount.get()).await?;
            Ok(())
        }
        .await;
        let result = Self::settle(tx, outcome).await;
        Self::log("service payment", &key, Some(amount), &result);
        result
    }

    /// Sells a quantity of a product: stock decrement plus an immutable
    /// ledger append, both or neither.
    pub async fn sale(&self, product_id: i64, qty: u32, manager_id: i64) -> Result<SaleRecord> {
        let mut tx = self.store.begin().await?;
        let outcome = inventory::sell(tx.as_mut(), product_id, qty, manager_id).await;
        let result = Self::settle(tx, outcome).await;
        match &result {
            Ok(record) => info!(
                product = record.product_id,
                qty = record.qty,
                price = record.price,
                manager = record.manager_id,
                "sale applied"
            ),
            Err(e) if e.is_business() => info!(product = product_id, reason = %e, "sale rejected"),
            Err(e) => warn!(product = product_id, reason = %e, "sale failed"),
        }
        result
    }

    /// Read-only resolve of any account key.
    pub async fn balance(&self, key: AccountKey) -> Result<Account> {
        let mut tx = self.store.begin().await?;
        let outcome = registry::resolve_account(tx.as_mut(), key).await;
        Self::settle(tx, outcome).await
    }

    /// Revenue accrued on a service through `pay_for_service`.
    pub async fn service_revenue(&self, service_id: i64) -> Result<u64> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            registry::require_service(tx.as_mut(), service_id).await?;
            Ok(tx.service_revenue(service_id).await?)
        }
        .await;
        Self::settle(tx, outcome).await
    }

    /// Commits on success, rolls back on failure. A rollback failure is
    /// reported together with the error that triggered it.
    async fn settle<T>(tx: Box<dyn LedgerTx>, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(cause) => match tx.rollback().await {
                Ok(()) => Err(cause),
                Err(rollback) => Err(SettlementError::RollbackFailed {
                    cause: Box::new(cause),
                    rollback,
                }),
            },
        }
    }

    fn log<T>(op: &str, key: &AccountKey, amount: Option<Amount>, result: &Result<T>) {
        let amount = amount.map(Amount::get);
        match result {
            Ok(_) => info!(account = %key, amount, "{op} applied"),
            Err(e) if e.is_business() => info!(account = %key, amount, reason = %e, "{op} rejected"),
            Err(e) => warn!(account = %key, amount, reason = %e, "{op} failed"),
        }
    }
}

/// Administrative operations: row creation and listing. These stay outside
/// the settlement core but share its transaction discipline.
impl SettlementEngine {
    pub async fn open_account(&self, account: NewAccount) -> Result<Account> {
        let mut tx = self.store.begin().await?;
        let outcome = tx.insert_account(account).await.map_err(Into::into);
        Self::settle(tx, outcome).await
    }

    pub async fn add_product(&self, product: NewProduct) -> Result<Product> {
        let mut tx = self.store.begin().await?;
        let outcome = tx.insert_product(product).await.map_err(Into::into);
        Self::settle(tx, outcome).await
    }

    pub async fn add_service(&self, service: NewService) -> Result<Service> {
        let mut tx = self.store.begin().await?;
        let outcome = tx.insert_service(service).await.map_err(Into::into);
        Self::settle(tx, outcome).await
    }

    /// Creates a card. The referenced account must exist.
    pub async fn add_card(&self, card: NewCard) -> Result<Card> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            registry::resolve_account(tx.as_mut(), AccountKey::ById(card.account_id)).await?;
            Ok(tx.insert_card(card).await?)
        }
        .await;
        Self::settle(tx, outcome).await
    }

    pub async fn add_atm(&self, atm: NewAtm) -> Result<Atm> {
        let mut tx = self.store.begin().await?;
        let outcome = tx.insert_atm(atm).await.map_err(Into::into);
        Self::settle(tx, outcome).await
    }

    pub async fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self.store.list_accounts().await?)
    }

    pub async fn products(&self) -> Result<Vec<Product>> {
        Ok(self.store.list_products().await?)
    }

    pub async fn services(&self) -> Result<Vec<Service>> {
        Ok(self.store.list_services().await?)
    }

    pub async fn sales(&self) -> Result<Vec<SaleRecord>> {
        Ok(self.store.list_sales().await?)
    }

    pub async fn cards(&self) -> Result<Vec<Card>> {
        Ok(self.store.list_cards().await?)
    }

    pub async fn atms(&self) -> Result<Vec<Atm>> {
        Ok(self.store.list_atms().await?)
    }
}
