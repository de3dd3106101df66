//! Failure-injection doubles for the ledger port, proving that store
//! failures are surfaced as `Store` errors and that a failing rollback never
//! swallows the error that triggered it.

use async_trait::async_trait;
use teller::application::SettlementEngine;
use teller::domain::account::{Account, AccountKey, NewAccount};
use teller::domain::catalog::{
    Atm, Card, NewAtm, NewCard, NewProduct, NewService, Product, SaleRecord, Service,
};
use teller::domain::ports::{LedgerStore, LedgerTx, StoreError};
use teller::error::SettlementError;
use teller::infrastructure::in_memory::InMemoryLedger;

#[derive(Clone, Copy, Default)]
struct Sabotage {
    fail_begin: bool,
    fail_commit: bool,
    fail_rollback: bool,
}

/// Delegates to an in-memory ledger but fails at configured points.
struct SabotagedLedger {
    inner: InMemoryLedger,
    sabotage: Sabotage,
}

#[async_trait]
impl LedgerStore for SabotagedLedger {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError> {
        if self.sabotage.fail_begin {
            return Err(StoreError::Backend("connection refused".to_string()));
        }
        let inner = self.inner.begin().await?;
        Ok(Box::new(SabotagedTx {
            inner,
            sabotage: self.sabotage,
        }))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        self.inner.list_accounts().await
    }
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.inner.list_products().await
    }
    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        self.inner.list_services().await
    }
    async fn list_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
        self.inner.list_sales().await
    }
    async fn list_cards(&self) -> Result<Vec<Card>, StoreError> {
        self.inner.list_cards().await
    }
    async fn list_atms(&self) -> Result<Vec<Atm>, StoreError> {
        self.inner.list_atms().await
    }
}

struct SabotagedTx {
    inner: Box<dyn LedgerTx>,
    sabotage: Sabotage,
}

#[async_trait]
impl LedgerTx for SabotagedTx {
    async fn account_by_id(&mut self, id: i64) -> Result<Option<Account>, StoreError> {
        self.inner.account_by_id(id).await
    }
    async fn account_by_phone(&mut self, phone: i64) -> Result<Option<Account>, StoreError> {
        self.inner.account_by_phone(phone).await
    }
    async fn account_by_balance_number(
        &mut self,
        number: u64,
    ) -> Result<Option<Account>, StoreError> {
        self.inner.account_by_balance_number(number).await
    }
    async fn credit_account(&mut self, id: i64, amount: u64) -> Result<(), StoreError> {
        self.inner.credit_account(id, amount).await
    }
    async fn debit_account(&mut self, id: i64, amount: u64) -> Result<bool, StoreError> {
        self.inner.debit_account(id, amount).await
    }
    async fn product_by_id(&mut self, id: i64) -> Result<Option<Product>, StoreError> {
        self.inner.product_by_id(id).await
    }
    async fn take_stock(&mut self, id: i64, qty: u32) -> Result<bool, StoreError> {
        self.inner.take_stock(id, qty).await
    }
    async fn insert_sale(
        &mut self,
        manager_id: i64,
        product_id: i64,
        price: u64,
        qty: u32,
    ) -> Result<SaleRecord, StoreError> {
        self.inner.insert_sale(manager_id, product_id, price, qty).await
    }
    async fn service_by_id(&mut self, id: i64) -> Result<Option<Service>, StoreError> {
        self.inner.service_by_id(id).await
    }
    async fn service_revenue(&mut self, id: i64) -> Result<u64, StoreError> {
        self.inner.service_revenue(id).await
    }
    async fn add_service_revenue(&mut self, id: i64, amount: u64) -> Result<(), StoreError> {
        self.inner.add_service_revenue(id, amount).await
    }
    async fn insert_account(&mut self, account: NewAccount) -> Result<Account, StoreError> {
        self.inner.insert_account(account).await
    }
    async fn insert_product(&mut self, product: NewProduct) -> Result<Product, StoreError> {
        self.inner.insert_product(product).await
    }
    async fn insert_service(&mut self, service: NewService) -> Result<Service, StoreError> {
        self.inner.insert_service(service).await
    }
    async fn insert_card(&mut self, card: NewCard) -> Result<Card, StoreError> {
        self.inner.insert_card(card).await
    }
    async fn insert_atm(&mut self, atm: NewAtm) -> Result<Atm, StoreError> {
        self.inner.insert_atm(atm).await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        if this.sabotage.fail_commit {
            return Err(StoreError::Backend("commit lost".to_string()));
        }
        this.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        if this.sabotage.fail_rollback {
            return Err(StoreError::Backend("rollback lost".to_string()));
        }
        this.inner.rollback().await
    }
}

fn sabotaged(inner: InMemoryLedger, sabotage: Sabotage) -> SettlementEngine {
    SettlementEngine::new(Box::new(SabotagedLedger { inner, sabotage }))
}

#[tokio::test]
async fn test_begin_failure_surfaces_as_store_error() {
    let engine = sabotaged(
        InMemoryLedger::new(),
        Sabotage {
            fail_begin: true,
            ..Default::default()
        },
    );
    let err = engine.top_up(AccountKey::ById(1), 100).await.unwrap_err();
    assert!(matches!(err, SettlementError::Store(StoreError::Backend(_))));
    assert!(!err.is_business());
}

#[tokio::test]
async fn test_commit_failure_publishes_nothing() {
    // Seed through a plain engine sharing the same in-memory state.
    let ledger = InMemoryLedger::new();
    let plain = SettlementEngine::new(Box::new(ledger.clone()));
    let account = plain
        .open_account(NewAccount {
            phone: 1,
            balance_number: 10,
            balance: 100,
        })
        .await
        .unwrap();

    let engine = sabotaged(
        ledger,
        Sabotage {
            fail_commit: true,
            ..Default::default()
        },
    );
    let err = engine
        .top_up(AccountKey::ById(account.id), 50)
        .await
        .unwrap_err();
    assert!(matches!(err, SettlementError::Store(StoreError::Backend(_))));

    assert_eq!(
        plain.balance(AccountKey::ById(account.id)).await.unwrap().balance,
        100
    );
}

#[tokio::test]
async fn test_failed_rollback_reports_both_errors() {
    let engine = sabotaged(
        InMemoryLedger::new(),
        Sabotage {
            fail_rollback: true,
            ..Default::default()
        },
    );

    // Unknown account forces the rollback path.
    let err = engine.withdraw(AccountKey::ById(1), 100).await.unwrap_err();
    match err {
        SettlementError::RollbackFailed { cause, rollback } => {
            assert!(matches!(
                *cause,
                SettlementError::AccountNotFound(AccountKey::ById(1))
            ));
            assert!(matches!(rollback, StoreError::Backend(_)));
        }
        other => panic!("expected RollbackFailed, got {other}"),
    }
}
