use crate::domain::model::Product;
use crate::domain::ports::Catalog;
use crate::utils::error::Result;
use std::collections::HashMap;

/// Availability of one product, in exactly two modes: size-partitioned
/// products are checked size-by-size, everything else in aggregate. Mode
/// follows from whether the catalog lists any sizes; the enum keeps the
/// two paths exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stock {
    Unsized(u32),
    Sized(HashMap<String, u32>),
}

impl Stock {
    pub fn of(product: &Product) -> Self {
        if product.size_quantities.is_empty() {
            Stock::Unsized(product.stock)
        } else {
            Stock::Sized(
                product
                    .size_quantities
                    .iter()
                    .map(|sq| (sq.size.clone(), sq.quantity))
                    .collect(),
            )
        }
    }

    pub fn is_sized(&self) -> bool {
        matches!(self, Stock::Sized(_))
    }

    /// Remaining capacity for an exact identity: the per-size figure for
    /// sized products, the aggregate otherwise. Unknown sizes and
    /// size/mode mismatches count as 0.
    pub fn remaining(&self, size: Option<&str>) -> u32 {
        match (self, size) {
            (Stock::Unsized(total), None) => *total,
            (Stock::Unsized(_), Some(_)) => 0,
            (Stock::Sized(map), Some(label)) => map.get(label).copied().unwrap_or(0),
            (Stock::Sized(_), None) => 0,
        }
    }
}

/// Resolve a product's availability through the catalog port. `Ok(None)`
/// means the product does not exist; system errors propagate unchanged.
pub async fn fetch_stock<C: Catalog>(catalog: &C, product_id: &str) -> Result<Option<Stock>> {
    let product = catalog.product(product_id).await?;
    Ok(product.as_ref().map(Stock::of))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SizeQuantity;

    fn sized_product() -> Product {
        Product {
            id: "p2".to_string(),
            name: "Tee".to_string(),
            price: 19.9,
            image: None,
            stock: 2,
            size_quantities: vec![
                SizeQuantity {
                    size: "M".to_string(),
                    quantity: 2,
                },
                SizeQuantity {
                    size: "L".to_string(),
                    quantity: 0,
                },
            ],
        }
    }

    #[test]
    fn test_empty_size_list_is_unsized() {
        let product = Product {
            id: "p1".to_string(),
            name: "Mug".to_string(),
            price: 9.5,
            image: None,
            stock: 3,
            size_quantities: vec![],
        };
        let stock = Stock::of(&product);
        assert_eq!(stock, Stock::Unsized(3));
        assert_eq!(stock.remaining(None), 3);
        assert_eq!(stock.remaining(Some("M")), 0);
    }

    #[test]
    fn test_non_empty_size_list_is_sized() {
        let stock = Stock::of(&sized_product());
        assert!(stock.is_sized());
        assert_eq!(stock.remaining(Some("M")), 2);
        assert_eq!(stock.remaining(Some("L")), 0);
        assert_eq!(stock.remaining(Some("XL")), 0);
        // 尺寸商品沒有整體數量可用
        assert_eq!(stock.remaining(None), 0);
    }

    #[test]
    fn test_per_size_figures_govern_over_aggregate() {
        // Aggregate says 2 but the per-size map is what reservation checks
        // read; a stale aggregate is ignored.
        let mut product = sized_product();
        product.stock = 99;
        let stock = Stock::of(&product);
        assert_eq!(stock.remaining(Some("M")), 2);
    }
}
