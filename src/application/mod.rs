pub mod balances;
pub mod engine;
pub mod inventory;
pub mod registry;

pub use engine::SettlementEngine;
