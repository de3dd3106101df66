//! Rows owned by the product, service, card and ATM registries.

use serde::{Deserialize, Serialize};

/// A sellable product with its catalog price and remaining stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    /// Unique across all products.
    pub name: String,
    /// Catalog price in minor currency units, always positive.
    pub price: u64,
    pub qty: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: u64,
    pub qty: u32,
}

/// Append-only record of one completed sale. Immutable once written.
///
/// `price` is the catalog price snapshot at the moment of sale; later price
/// changes never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: i64,
    pub manager_id: i64,
    pub product_id: i64,
    pub price: u64,
    pub qty: u32,
}

/// A payable service. `price` is catalog data only; revenue accrued through
/// payments is tracked in a separate counter next to the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub price: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub price: u64,
}

/// A secondary balance-bearing card linked to an account by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub balance: u64,
    pub account_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
    pub name: String,
    #[serde(default)]
    pub balance: u64,
    pub account_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atm {
    pub id: i64,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAtm {
    pub name: String,
    pub address: String,
}
