//! Port to the transactional ledger store.
//!
//! The engine issues single parameterized statements through these traits and
//! never owns the schema; the store collaborator owns connection pooling,
//! locking and durability.

use crate::domain::account::{Account, NewAccount};
use crate::domain::catalog::{
    Atm, Card, NewAtm, NewCard, NewProduct, NewService, Product, SaleRecord, Service,
};
use async_trait::async_trait;
use thiserror::Error;

/// Failure inside the backing store. Fatal for the transaction in flight.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
    /// A UNIQUE or CHECK constraint rejected the write.
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("store operation timed out")]
    Timeout,
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Opens a transaction. Statements inside it observe their own
    /// uncommitted writes and never another transaction's.
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn list_services(&self) -> Result<Vec<Service>, StoreError>;
    async fn list_sales(&self) -> Result<Vec<SaleRecord>, StoreError>;
    async fn list_cards(&self) -> Result<Vec<Card>, StoreError>;
    async fn list_atms(&self) -> Result<Vec<Atm>, StoreError>;
}

/// One open transaction. Dropping the handle without committing must leave
/// no trace in the shared state.
#[async_trait]
pub trait LedgerTx: Send {
    async fn account_by_id(&mut self, id: i64) -> Result<Option<Account>, StoreError>;
    async fn account_by_phone(&mut self, phone: i64) -> Result<Option<Account>, StoreError>;
    async fn account_by_balance_number(
        &mut self,
        number: u64,
    ) -> Result<Option<Account>, StoreError>;

    /// `balance += amount`, one statement.
    async fn credit_account(&mut self, id: i64, amount: u64) -> Result<(), StoreError>;

    /// Conditional decrement: `balance -= amount` only where
    /// `balance >= amount`. Returns false, writing nothing, when the guard
    /// fails — the mechanism that keeps two concurrent debits from both
    /// succeeding.
    async fn debit_account(&mut self, id: i64, amount: u64) -> Result<bool, StoreError>;

    async fn product_by_id(&mut self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Conditional stock decrement, same shape as `debit_account`.
    async fn take_stock(&mut self, id: i64, qty: u32) -> Result<bool, StoreError>;

    async fn insert_sale(
        &mut self,
        manager_id: i64,
        product_id: i64,
        price: u64,
        qty: u32,
    ) -> Result<SaleRecord, StoreError>;

    async fn service_by_id(&mut self, id: i64) -> Result<Option<Service>, StoreError>;
    async fn service_revenue(&mut self, id: i64) -> Result<u64, StoreError>;
    /// Adds to the accrued-revenue counter kept next to the service row.
    async fn add_service_revenue(&mut self, id: i64, amount: u64) -> Result<(), StoreError>;

    async fn insert_account(&mut self, account: NewAccount) -> Result<Account, StoreError>;
    async fn insert_product(&mut self, product: NewProduct) -> Result<Product, StoreError>;
    async fn insert_service(&mut self, service: NewService) -> Result<Service, StoreError>;
    async fn insert_card(&mut self, card: NewCard) -> Result<Card, StoreError>;
    async fn insert_atm(&mut self, atm: NewAtm) -> Result<Atm, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
