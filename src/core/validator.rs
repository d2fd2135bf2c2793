use crate::core::inventory::Stock;
use crate::domain::model::RejectReason;

/// Validate one requested line against resolved availability.
///
/// Check order is load-bearing: quantity shape, existence, size shape,
/// size availability, then capping. Reordering produces misleading
/// rejections (e.g. "out of stock" for a product that is simply missing
/// the required size).
///
/// Returns the accepted quantity, capped at availability. The return type
/// does not distinguish "exact" from "capped"; callers compare against the
/// request themselves.
pub fn validate(
    stock: Option<&Stock>,
    size: Option<&str>,
    requested: i64,
) -> Result<u32, RejectReason> {
    if requested < 1 {
        return Err(RejectReason::InvalidQuantity);
    }
    // Positive but absurdly large requests are still well-formed; capping
    // against availability below brings them down.
    let requested = u32::try_from(requested).unwrap_or(u32::MAX);

    let stock = match stock {
        None => return Err(RejectReason::ProductNotFound),
        Some(stock) => stock,
    };

    match stock {
        Stock::Sized(map) => {
            let label = match size {
                None => return Err(RejectReason::SizeRequired),
                Some(label) => label,
            };
            let remaining = match map.get(label) {
                None => return Err(RejectReason::SizeUnavailable),
                Some(remaining) => *remaining,
            };
            if remaining == 0 {
                return Err(RejectReason::OutOfStock);
            }
            Ok(requested.min(remaining))
        }
        Stock::Unsized(total) => {
            if size.is_some() {
                return Err(RejectReason::SizeNotApplicable);
            }
            if *total == 0 {
                return Err(RejectReason::OutOfStock);
            }
            Ok(requested.min(*total))
        }
    }
}
