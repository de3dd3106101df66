use crate::application::SettlementEngine;
use crate::domain::account::{AccountKey, NewAccount};
use crate::domain::catalog::{NewProduct, NewService};
use crate::error::{Result, SettlementError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    /// Open an account (columns: phone, number, optional amount as the
    /// starting balance).
    Open,
    /// Register a product (name, price, qty).
    Product,
    /// Register a service (name, price).
    Service,
    Topup,
    Withdraw,
    Transfer,
    Pay,
    Sale,
}

/// One row of the operations CSV consumed by the demo driver.
///
/// Columns not used by an operation stay empty; account keys use the textual
/// form `id:<n>` / `phone:<n>` / `number:<n>`.
#[derive(Debug, Deserialize, Clone)]
pub struct OpRecord {
    pub op: OpKind,
    pub name: Option<String>,
    pub phone: Option<i64>,
    pub number: Option<u64>,
    pub price: Option<u64>,
    pub account: Option<String>,
    pub dest: Option<String>,
    pub service: Option<i64>,
    pub product: Option<i64>,
    pub qty: Option<u32>,
    pub manager: Option<i64>,
    pub amount: Option<i64>,
}

impl OpRecord {
    /// Applies this record through the settlement façade.
    pub async fn apply(self, engine: &SettlementEngine) -> Result<()> {
        match self.op {
            OpKind::Open => {
                engine
                    .open_account(NewAccount {
                        phone: required(self.phone, "phone")?,
                        balance_number: required(self.number, "number")?,
                        balance: self.amount.unwrap_or(0).max(0) as u64,
                    })
                    .await?;
            }
            OpKind::Product => {
                engine
                    .add_product(NewProduct {
                        name: required(self.name, "name")?,
                        price: required(self.price, "price")?,
                        qty: required(self.qty, "qty")?,
                    })
                    .await?;
            }
            OpKind::Service => {
                engine
                    .add_service(NewService {
                        name: required(self.name, "name")?,
                        price: required(self.price, "price")?,
                    })
                    .await?;
            }
            OpKind::Topup => {
                engine
                    .top_up(key(self.account, "account")?, required(self.amount, "amount")?)
                    .await?;
            }
            OpKind::Withdraw => {
                engine
                    .withdraw(key(self.account, "account")?, required(self.amount, "amount")?)
                    .await?;
            }
            OpKind::Transfer => {
                engine
                    .transfer(
                        key(self.account, "account")?,
                        key(self.dest, "dest")?,
                        required(self.amount, "amount")?,
                    )
                    .await?;
            }
            OpKind::Pay => {
                engine
                    .pay_for_service(
                        required(self.service, "service")?,
                        key(self.account, "account")?,
                        required(self.amount, "amount")?,
                    )
                    .await?;
            }
            OpKind::Sale => {
                engine
                    .sale(
                        required(self.product, "product")?,
                        required(self.qty, "qty")?,
                        required(self.manager, "manager")?,
                    )
                    .await?;
            }
        }
        Ok(())
    }
}

fn required<T>(value: Option<T>, column: &str) -> Result<T> {
    value.ok_or_else(|| SettlementError::InvalidInput(format!("column `{column}` is required")))
}

fn key(value: Option<String>, column: &str) -> Result<AccountKey> {
    required(value, column)?.parse()
}

/// Reads operations from a CSV source.
///
/// Wraps `csv::Reader` into an iterator of `Result<OpRecord>`, trimming
/// whitespace and tolerating short rows.
pub struct OpReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OpReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and deserializes records, so large inputs stream.
    pub fn records(self) -> impl Iterator<Item = Result<OpRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(SettlementError::from))
    }
}
