pub mod model;
pub mod ports;

pub use model::{CartDocument, CartLine, Product, RejectReason, SyncNotice};
pub use ports::{Catalog, CartRepository, ConfigProvider};
