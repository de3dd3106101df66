//! Atomic "read price and stock, decrement, append sale" unit.

use crate::application::registry;
use crate::domain::catalog::SaleRecord;
use crate::domain::ports::LedgerTx;
use crate::error::{Result, SettlementError};

/// Sells `qty` units of a product on behalf of `manager_id`, inside the
/// caller's transaction.
///
/// The sale record captures the price as read here, not whatever the catalog
/// says later. Stock can never be oversold: the decrement is a conditional
/// update guarded by the current quantity.
pub async fn sell(
    tx: &mut dyn LedgerTx,
    product_id: i64,
    qty: u32,
    manager_id: i64,
) -> Result<SaleRecord> {
    let product = registry::require_product(tx, product_id).await?;

    if qty == 0 || qty > product.qty {
        return Err(SettlementError::InsufficientStock {
            product: product.id,
            available: product.qty,
            requested: qty,
        });
    }

    // A concurrent sale may still win between the read and the update; the
    // conditional decrement is the authoritative guard.
    if !tx.take_stock(product.id, qty).await? {
        return Err(SettlementError::InsufficientStock {
            product: product.id,
            available: product.qty,
            requested: qty,
        });
    }

    tx.insert_sale(manager_id, product.id, product.price, qty)
        .await
        .map_err(Into::into)
}
