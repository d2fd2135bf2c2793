use crate::domain::model::{CartDocument, Product};
use crate::utils::error::Result;

/// Read-only catalog boundary. `Ok(None)` means the product does not exist;
/// transport and payload failures are system errors.
pub trait Catalog: Send + Sync {
    fn product(
        &self,
        product_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Product>>> + Send;
}

/// Per-user cart document store. Last write wins; strongly consistent per
/// user.
pub trait CartRepository: Send + Sync {
    fn load(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<CartDocument>>> + Send;
    fn save(
        &self,
        document: &CartDocument,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_endpoint(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
    fn catalog_headers(&self) -> Option<&std::collections::HashMap<String, String>>;
}
