use crate::core::identity::{normalize_size, LineKey};
use crate::core::inventory::{fetch_stock, Stock};
use crate::core::validator::validate;
use crate::domain::model::{
    CartDocument, CartItemView, CartLine, CartView, LineDetail, Product, RejectReason,
};
use crate::domain::ports::{Catalog, CartRepository};
use crate::utils::error::{CartError, Result};
use std::collections::HashMap;

/// Owns the authoritative line collection for each user. Every mutation is
/// one read-validate-mutate-persist cycle; a validation rejection leaves
/// the persisted cart untouched.
pub struct CartStore<C: Catalog, R: CartRepository> {
    catalog: C,
    repo: R,
}

impl<C: Catalog, R: CartRepository> CartStore<C, R> {
    pub fn new(catalog: C, repo: R) -> Self {
        Self { catalog, repo }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    async fn lines(&self, user_id: &str) -> Result<Vec<CartLine>> {
        Ok(self
            .repo
            .load(user_id)
            .await?
            .map(|doc| doc.items)
            .unwrap_or_default())
    }

    async fn persist(&self, user_id: &str, lines: Vec<CartLine>) -> Result<Vec<CartLine>> {
        let doc = CartDocument::new(user_id, lines);
        self.repo.save(&doc).await?;
        Ok(doc.items)
    }

    /// The current cart, hydrated. Reads never mutate state.
    pub async fn current(&self, user_id: &str) -> Result<CartView> {
        let lines = self.lines(user_id).await?;
        self.hydrate(&lines).await
    }

    /// Add a quantity of one identity. Validates the prospective total for
    /// the line, so the resulting quantity never exceeds availability at
    /// call time; a matching identity is increased, never duplicated.
    pub async fn add(
        &self,
        user_id: &str,
        product_id: &str,
        size: Option<&str>,
        quantity: i64,
    ) -> Result<CartView> {
        let size = normalize_size(size);
        let stock = fetch_stock(&self.catalog, product_id).await?;
        validate(stock.as_ref(), size.as_deref(), quantity).map_err(CartError::Rejected)?;

        let remaining = stock
            .as_ref()
            .map(|s| s.remaining(size.as_deref()))
            .unwrap_or(0);
        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);

        let mut lines = self.lines(user_id).await?;
        let key = LineKey::new(product_id, size.as_deref());
        match lines.iter().position(|line| line.key() == key) {
            Some(index) => {
                let line = &mut lines[index];
                line.quantity = line.quantity.saturating_add(requested).min(remaining);
            }
            None => lines.push(CartLine {
                product_id: product_id.to_string(),
                size,
                quantity: requested.min(remaining),
            }),
        }

        tracing::debug!("Cart add for user {}: {} line(s)", user_id, lines.len());
        let lines = self.persist(user_id, lines).await?;
        self.hydrate(&lines).await
    }

    /// Set an existing line to an absolute quantity. Catalog validation
    /// runs first, so a product that vanished from the catalog reports
    /// `product-not-found` rather than `not-found-in-cart`.
    pub async fn update(
        &self,
        user_id: &str,
        product_id: &str,
        size: Option<&str>,
        quantity: i64,
    ) -> Result<CartView> {
        let size = normalize_size(size);
        let stock = fetch_stock(&self.catalog, product_id).await?;
        let capped =
            validate(stock.as_ref(), size.as_deref(), quantity).map_err(CartError::Rejected)?;

        let mut lines = self.lines(user_id).await?;
        let key = LineKey::new(product_id, size.as_deref());
        let line = lines
            .iter_mut()
            .find(|line| line.key() == key)
            .ok_or(CartError::Rejected(RejectReason::NotFoundInCart))?;
        line.quantity = capped;

        let lines = self.persist(user_id, lines).await?;
        self.hydrate(&lines).await
    }

    /// Remove the line with exactly this identity. A sized identity never
    /// removes the unsized line for the same product, and vice versa.
    /// Absent identity is a no-op, not an error.
    pub async fn remove(
        &self,
        user_id: &str,
        product_id: &str,
        size: Option<&str>,
    ) -> Result<CartView> {
        let key = LineKey::new(product_id, normalize_size(size).as_deref());
        let mut lines = self.lines(user_id).await?;
        lines.retain(|line| line.key() != key);
        let lines = self.persist(user_id, lines).await?;
        self.hydrate(&lines).await
    }

    /// Empty the line collection unconditionally. The cart entity remains.
    pub async fn clear(&self, user_id: &str) -> Result<CartView> {
        let lines = self.persist(user_id, Vec::new()).await?;
        self.hydrate(&lines).await
    }

    /// Destructively overwrite the persisted cart with reconciled lines.
    pub async fn replace(&self, user_id: &str, lines: Vec<CartLine>) -> Result<CartView> {
        let lines = self.persist(user_id, lines).await?;
        self.hydrate(&lines).await
    }

    /// Join lines against the live catalog. Display fields are looked up
    /// fresh on every call; a vanished product keeps its line with zero
    /// availability and no detail. One catalog fetch per distinct product
    /// per call.
    pub async fn hydrate(&self, lines: &[CartLine]) -> Result<CartView> {
        let mut cache: HashMap<String, Option<Product>> = HashMap::new();
        let mut items = Vec::with_capacity(lines.len());

        for line in lines {
            if !cache.contains_key(&line.product_id) {
                let product = self.catalog.product(&line.product_id).await?;
                cache.insert(line.product_id.clone(), product);
            }
            let product = cache
                .get(&line.product_id)
                .and_then(|entry| entry.as_ref());

            let (available, detail) = match product {
                Some(product) => (
                    Stock::of(product).remaining(line.size.as_deref()),
                    Some(LineDetail {
                        name: product.name.clone(),
                        price: product.price,
                        image: product.image.clone(),
                    }),
                ),
                None => (0, None),
            };

            items.push(CartItemView {
                product_id: line.product_id.clone(),
                size: line.size.clone(),
                quantity: line.quantity,
                available,
                detail,
            });
        }

        Ok(CartView { items })
    }
}
