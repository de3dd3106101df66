//! JSON seed data for the demo binary, standing in for the initial rows the
//! production schema ships with.

use crate::application::SettlementEngine;
use crate::domain::account::NewAccount;
use crate::domain::catalog::{NewAtm, NewCard, NewProduct, NewService};
use crate::error::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub accounts: Vec<NewAccount>,
    #[serde(default)]
    pub products: Vec<NewProduct>,
    #[serde(default)]
    pub services: Vec<NewService>,
    #[serde(default)]
    pub atms: Vec<NewAtm>,
    #[serde(default)]
    pub cards: Vec<NewCard>,
}

pub fn read_seed(path: &Path) -> Result<SeedData> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Inserts the seed rows through the administrative surface. Accounts go
/// first so that cards can reference them.
pub async fn apply_seed(engine: &SettlementEngine, seed: SeedData) -> Result<()> {
    for account in seed.accounts {
        engine.open_account(account).await?;
    }
    for product in seed.products {
        engine.add_product(product).await?;
    }
    for service in seed.services {
        engine.add_service(service).await?;
    }
    for atm in seed.atms {
        engine.add_atm(atm).await?;
    }
    for card in seed.cards {
        engine.add_card(card).await?;
    }
    Ok(())
}
