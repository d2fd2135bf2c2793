use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ProductId = String;

/// Per-size remaining capacity, in the catalog's stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeQuantity {
    pub size: String,
    pub quantity: u32,
}

/// A catalog product as this core consumes it (read-only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(rename = "sizeQuantities", default)]
    pub size_quantities: Vec<SizeQuantity>,
}

/// A persisted cart line: identity + quantity only. Display data is never
/// stored on the line; reads join against the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
    pub quantity: u32,
}

/// The per-user cart document as the store persists it. An empty `items`
/// list is a valid cart; clearing empties it, nothing deletes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartDocument {
    pub user_id: String,
    pub items: Vec<CartLine>,
    pub updated_at: DateTime<Utc>,
}

impl CartDocument {
    pub fn new(user_id: impl Into<String>, items: Vec<CartLine>) -> Self {
        Self {
            user_id: user_id.into(),
            items,
            updated_at: Utc::now(),
        }
    }
}

/// Machine-readable reasons a cart request can be rejected. These are
/// user-correctable outcomes, not system errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    ProductNotFound,
    SizeRequired,
    SizeUnavailable,
    SizeNotApplicable,
    OutOfStock,
    InvalidQuantity,
    NotFoundInCart,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::ProductNotFound => "product-not-found",
            RejectReason::SizeRequired => "size-required",
            RejectReason::SizeUnavailable => "size-unavailable",
            RejectReason::SizeNotApplicable => "size-not-applicable",
            RejectReason::OutOfStock => "out-of-stock",
            RejectReason::InvalidQuantity => "invalid-quantity",
            RejectReason::NotFoundInCart => "not-found-in-cart",
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RejectReason::ProductNotFound => "Remove the product from the request; it is no longer in the catalog",
            RejectReason::SizeRequired => "Pick a size for this product before adding it",
            RejectReason::SizeUnavailable => "Pick one of the sizes the product is offered in",
            RejectReason::SizeNotApplicable => "Omit the size; this product has no size variants",
            RejectReason::OutOfStock => "Try again later or pick another size",
            RejectReason::InvalidQuantity => "Use a whole quantity of 1 or more",
            RejectReason::NotFoundInCart => "Add the item to the cart before updating it",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            RejectReason::ProductNotFound => "product not found in catalog",
            RejectReason::SizeRequired => "a size must be selected for this product",
            RejectReason::SizeUnavailable => "the selected size is not offered for this product",
            RejectReason::SizeNotApplicable => "this product has no size variants",
            RejectReason::OutOfStock => "the item is out of stock",
            RejectReason::InvalidQuantity => "quantity must be a positive whole number",
            RejectReason::NotFoundInCart => "the item is not in the cart",
        };
        f.write_str(text)
    }
}

/// Reconciliation diagnostics returned to the caller for display. Never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum SyncNotice {
    #[serde(rename_all = "camelCase")]
    RemovedNonexistentProduct { product_id: ProductId, message: String },
    #[serde(rename_all = "camelCase")]
    RemovedOutOfStock {
        product_id: ProductId,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<String>,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    RemovedInvalidSize {
        product_id: ProductId,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<String>,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    RemovedInvalidQuantity { product_id: ProductId, message: String },
    #[serde(rename_all = "camelCase")]
    QuantityAdjusted {
        product_id: ProductId,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<String>,
        new_quantity: u32,
        message: String,
    },
}

impl SyncNotice {
    pub fn message(&self) -> &str {
        match self {
            SyncNotice::RemovedNonexistentProduct { message, .. }
            | SyncNotice::RemovedOutOfStock { message, .. }
            | SyncNotice::RemovedInvalidSize { message, .. }
            | SyncNotice::RemovedInvalidQuantity { message, .. }
            | SyncNotice::QuantityAdjusted { message, .. } => message,
        }
    }

    pub fn product_id(&self) -> &str {
        match self {
            SyncNotice::RemovedNonexistentProduct { product_id, .. }
            | SyncNotice::RemovedOutOfStock { product_id, .. }
            | SyncNotice::RemovedInvalidSize { product_id, .. }
            | SyncNotice::RemovedInvalidQuantity { product_id, .. }
            | SyncNotice::QuantityAdjusted { product_id, .. } => product_id,
        }
    }
}

/// Catalog display fields joined onto a line at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDetail {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A hydrated cart line as returned by every read and mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub quantity: u32,
    /// Current remaining stock for this exact identity; 0 when the product
    /// or size no longer resolves.
    pub available: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<LineDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
}
