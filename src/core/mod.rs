pub mod identity;
pub mod inventory;
pub mod reconciler;
pub mod store;
pub mod validator;

pub use crate::domain::model::{CartDocument, CartLine, CartView, Product, RejectReason, SyncNotice};
pub use crate::domain::ports::{Catalog, CartRepository, ConfigProvider};
pub use crate::utils::error::Result;
