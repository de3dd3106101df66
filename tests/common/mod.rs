use teller::application::SettlementEngine;
use teller::domain::account::{Account, NewAccount};
use teller::infrastructure::in_memory::InMemoryLedger;

pub fn engine() -> SettlementEngine {
    SettlementEngine::new(Box::new(InMemoryLedger::new()))
}

pub async fn open_account(
    engine: &SettlementEngine,
    phone: i64,
    number: u64,
    balance: u64,
) -> Account {
    engine
        .open_account(NewAccount {
            phone,
            balance_number: number,
            balance,
        })
        .await
        .unwrap()
}
