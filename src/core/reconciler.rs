use crate::core::identity::normalize_size;
use crate::core::inventory::{fetch_stock, Stock};
use crate::core::validator::validate;
use crate::domain::model::{CartLine, RejectReason, SyncNotice};
use crate::domain::ports::Catalog;
use crate::utils::error::Result;
use std::collections::HashMap;

/// One entry of a client-proposed cart snapshot (e.g. local storage from an
/// anonymous session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub product_id: String,
    pub size: Option<String>,
    pub requested: i64,
}

#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    pub lines: Vec<CartLine>,
    pub notices: Vec<SyncNotice>,
}

/// Reconcile a client snapshot against live availability. Every entry maps
/// to exactly one outcome, either an included line or a diagnostic-only
/// omission; a rejection for one entry never prevents other entries from
/// being accepted. Only catalog unavailability aborts the run.
///
/// Entries are assumed to carry distinct identities; duplicate merging is
/// the caller's job before reconciliation.
pub async fn reconcile<C: Catalog>(
    catalog: &C,
    snapshot: &[SnapshotEntry],
) -> Result<ReconcileOutcome> {
    let mut outcome = ReconcileOutcome::default();
    // 同一商品只查一次庫存
    let mut stock_cache: HashMap<String, Option<Stock>> = HashMap::new();

    for entry in snapshot {
        let size = normalize_size(entry.size.as_deref());

        if !stock_cache.contains_key(&entry.product_id) {
            let stock = fetch_stock(catalog, &entry.product_id).await?;
            stock_cache.insert(entry.product_id.clone(), stock);
        }
        let stock = stock_cache
            .get(&entry.product_id)
            .and_then(|s| s.as_ref());

        match validate(stock, size.as_deref(), entry.requested) {
            Ok(capped) => {
                if i64::from(capped) < entry.requested {
                    outcome.notices.push(SyncNotice::QuantityAdjusted {
                        product_id: entry.product_id.clone(),
                        size: size.clone(),
                        new_quantity: capped,
                        message: format!(
                            "Only {} of product {} {}available; quantity was adjusted",
                            capped,
                            entry.product_id,
                            size.as_deref()
                                .map(|s| format!("in size {} ", s))
                                .unwrap_or_default(),
                        ),
                    });
                }
                outcome.lines.push(CartLine {
                    product_id: entry.product_id.clone(),
                    size,
                    quantity: capped,
                });
            }
            Err(reason) => outcome.notices.push(notice_for(&entry.product_id, &size, reason)),
        }
    }

    tracing::info!(
        "🔄 Reconciled {} snapshot entries: {} kept, {} notices",
        snapshot.len(),
        outcome.lines.len(),
        outcome.notices.len()
    );
    Ok(outcome)
}

fn notice_for(product_id: &str, size: &Option<String>, reason: RejectReason) -> SyncNotice {
    match reason {
        RejectReason::ProductNotFound => SyncNotice::RemovedNonexistentProduct {
            product_id: product_id.to_string(),
            message: format!(
                "Product {} is no longer available and was removed from your cart",
                product_id
            ),
        },
        RejectReason::OutOfStock | RejectReason::SizeUnavailable => SyncNotice::RemovedOutOfStock {
            product_id: product_id.to_string(),
            size: size.clone(),
            message: match size {
                Some(label) => format!(
                    "Size {} of product {} is sold out and was removed from your cart",
                    label, product_id
                ),
                None => format!(
                    "Product {} is sold out and was removed from your cart",
                    product_id
                ),
            },
        },
        RejectReason::SizeRequired | RejectReason::SizeNotApplicable => {
            SyncNotice::RemovedInvalidSize {
                product_id: product_id.to_string(),
                size: size.clone(),
                message: format!(
                    "The size selection for product {} is not valid anymore; the item was removed",
                    product_id
                ),
            }
        }
        RejectReason::InvalidQuantity => SyncNotice::RemovedInvalidQuantity {
            product_id: product_id.to_string(),
            message: format!(
                "The saved quantity for product {} was not usable; the item was removed",
                product_id
            ),
        },
        // Never produced by the validator; kept exhaustive on purpose.
        RejectReason::NotFoundInCart => SyncNotice::RemovedNonexistentProduct {
            product_id: product_id.to_string(),
            message: format!("Product {} was removed from your cart", product_id),
        },
    }
}
