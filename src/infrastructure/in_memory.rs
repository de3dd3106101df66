//! In-memory ledger store with real transaction semantics.
//!
//! Transactions are serialized: `begin` takes an owned lock on the whole
//! ledger and holds it until commit or rollback, which matches the
//! serializable end of what the production relational store provides. Writes
//! go to a working copy; commit swaps it into the shared state, so a dropped
//! or rolled-back transaction leaves nothing behind.

use crate::domain::account::{Account, NewAccount};
use crate::domain::catalog::{
    Atm, Card, NewAtm, NewCard, NewProduct, NewService, Product, SaleRecord, Service,
};
use crate::domain::ports::{LedgerStore, LedgerTx, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
struct LedgerState {
    accounts: HashMap<i64, Account>,
    products: HashMap<i64, Product>,
    services: HashMap<i64, Service>,
    revenue: HashMap<i64, u64>,
    cards: HashMap<i64, Card>,
    atms: HashMap<i64, Atm>,
    sales: Vec<SaleRecord>,
    sequences: Sequences,
}

#[derive(Debug, Clone, Default)]
struct Sequences {
    account: i64,
    product: i64,
    service: i64,
    card: i64,
    atm: i64,
    sale: i64,
}

impl Sequences {
    fn next(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

impl LedgerState {
    fn sorted_by_id<T: Clone>(map: &HashMap<i64, T>, id: impl Fn(&T) -> i64) -> Vec<T> {
        let mut rows: Vec<T> = map.values().cloned().collect();
        rows.sort_by_key(id);
        rows
    }
}

#[derive(Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(InMemoryTx { guard, work }))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let state = self.state.lock().await;
        Ok(LedgerState::sorted_by_id(&state.accounts, |a| a.id))
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let state = self.state.lock().await;
        Ok(LedgerState::sorted_by_id(&state.products, |p| p.id))
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        let state = self.state.lock().await;
        Ok(LedgerState::sorted_by_id(&state.services, |s| s.id))
    }

    async fn list_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.sales.clone())
    }

    async fn list_cards(&self) -> Result<Vec<Card>, StoreError> {
        let state = self.state.lock().await;
        Ok(LedgerState::sorted_by_id(&state.cards, |c| c.id))
    }

    async fn list_atms(&self) -> Result<Vec<Atm>, StoreError> {
        let state = self.state.lock().await;
        Ok(LedgerState::sorted_by_id(&state.atms, |a| a.id))
    }
}

pub struct InMemoryTx {
    guard: OwnedMutexGuard<LedgerState>,
    work: LedgerState,
}

#[async_trait]
impl LedgerTx for InMemoryTx {
    async fn account_by_id(&mut self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.work.accounts.get(&id).cloned())
    }

    async fn account_by_phone(&mut self, phone: i64) -> Result<Option<Account>, StoreError> {
        Ok(self
            .work
            .accounts
            .values()
            .find(|a| a.phone == phone)
            .cloned())
    }

    async fn account_by_balance_number(
        &mut self,
        number: u64,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .work
            .accounts
            .values()
            .find(|a| a.balance_number == number)
            .cloned())
    }

    async fn credit_account(&mut self, id: i64, amount: u64) -> Result<(), StoreError> {
        // Missing row means zero rows matched the UPDATE, not a failure.
        if let Some(account) = self.work.accounts.get_mut(&id) {
            account.balance = account
                .balance
                .checked_add(amount)
                .ok_or_else(|| StoreError::Constraint(format!("balance overflow on account {id}")))?;
        }
        Ok(())
    }

    async fn debit_account(&mut self, id: i64, amount: u64) -> Result<bool, StoreError> {
        match self.work.accounts.get_mut(&id) {
            Some(account) if account.balance >= amount => {
                account.balance -= amount;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn product_by_id(&mut self, id: i64) -> Result<Option<Product>, StoreError> {
        Ok(self.work.products.get(&id).cloned())
    }

    async fn take_stock(&mut self, id: i64, qty: u32) -> Result<bool, StoreError> {
        match self.work.products.get_mut(&id) {
            Some(product) if product.qty >= qty => {
                product.qty -= qty;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_sale(
        &mut self,
        manager_id: i64,
        product_id: i64,
        price: u64,
        qty: u32,
    ) -> Result<SaleRecord, StoreError> {
        if price == 0 || qty == 0 {
            return Err(StoreError::Constraint(
                "sale price and qty must be positive".to_string(),
            ));
        }
        let record = SaleRecord {
            id: Sequences::next(&mut self.work.sequences.sale),
            manager_id,
            product_id,
            price,
            qty,
        };
        self.work.sales.push(record.clone());
        Ok(record)
    }

    async fn service_by_id(&mut self, id: i64) -> Result<Option<Service>, StoreError> {
        Ok(self.work.services.get(&id).cloned())
    }

    async fn service_revenue(&mut self, id: i64) -> Result<u64, StoreError> {
        Ok(self.work.revenue.get(&id).copied().unwrap_or(0))
    }

    async fn add_service_revenue(&mut self, id: i64, amount: u64) -> Result<(), StoreError> {
        let counter = self.work.revenue.entry(id).or_insert(0);
        *counter = counter
            .checked_add(amount)
            .ok_or_else(|| StoreError::Constraint(format!("revenue overflow on service {id}")))?;
        Ok(())
    }

    async fn insert_account(&mut self, account: NewAccount) -> Result<Account, StoreError> {
        if self
            .work
            .accounts
            .values()
            .any(|a| a.phone == account.phone)
        {
            return Err(StoreError::Constraint(format!(
                "phone {} already registered",
                account.phone
            )));
        }
        if self
            .work
            .accounts
            .values()
            .any(|a| a.balance_number == account.balance_number)
        {
            return Err(StoreError::Constraint(format!(
                "balance number {} already registered",
                account.balance_number
            )));
        }
        let row = Account {
            id: Sequences::next(&mut self.work.sequences.account),
            phone: account.phone,
            balance_number: account.balance_number,
            balance: account.balance,
        };
        self.work.accounts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn insert_product(&mut self, product: NewProduct) -> Result<Product, StoreError> {
        if product.price == 0 {
            return Err(StoreError::Constraint(
                "product price must be positive".to_string(),
            ));
        }
        if self
            .work
            .products
            .values()
            .any(|p| p.name == product.name)
        {
            return Err(StoreError::Constraint(format!(
                "product name {:?} already registered",
                product.name
            )));
        }
        let row = Product {
            id: Sequences::next(&mut self.work.sequences.product),
            name: product.name,
            price: product.price,
            qty: product.qty,
        };
        self.work.products.insert(row.id, row.clone());
        Ok(row)
    }

    async fn insert_service(&mut self, service: NewService) -> Result<Service, StoreError> {
        let row = Service {
            id: Sequences::next(&mut self.work.sequences.service),
            name: service.name,
            price: service.price,
        };
        self.work.services.insert(row.id, row.clone());
        Ok(row)
    }

    async fn insert_card(&mut self, card: NewCard) -> Result<Card, StoreError> {
        // REFERENCES accounts
        if !self.work.accounts.contains_key(&card.account_id) {
            return Err(StoreError::Constraint(format!(
                "card references unknown account {}",
                card.account_id
            )));
        }
        let row = Card {
            id: Sequences::next(&mut self.work.sequences.card),
            name: card.name,
            balance: card.balance,
            account_id: card.account_id,
        };
        self.work.cards.insert(row.id, row.clone());
        Ok(row)
    }

    async fn insert_atm(&mut self, atm: NewAtm) -> Result<Atm, StoreError> {
        let row = Atm {
            id: Sequences::next(&mut self.work.sequences.atm),
            name: atm.name,
            address: atm.address,
        };
        self.work.atms.insert(row.id, row.clone());
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        let InMemoryTx { mut guard, work } = this;
        *guard = work;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        // Dropping the working copy is the rollback.
        drop(self);
        Ok(())
    }
}
