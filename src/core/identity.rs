use crate::domain::model::{CartLine, ProductId};
use serde::{Deserialize, Serialize};

/// Composite identity of a cart line: `(product_id, normalized size)`.
///
/// A sized and an unsized line for the same product are distinct identities
/// and may coexist. Size labels are compared exactly as the catalog stores
/// them, with no trimming and no case folding, because availability lookups
/// use the same un-normalized label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: Option<String>,
}

impl LineKey {
    pub fn new(product_id: impl Into<ProductId>, size: Option<&str>) -> Self {
        Self {
            product_id: product_id.into(),
            size: normalize_size(size),
        }
    }
}

/// Absent, empty and null sizes all collapse to the single "no size"
/// sentinel. Anything else is kept byte-for-byte.
pub fn normalize_size(size: Option<&str>) -> Option<String> {
    match size {
        None => None,
        Some(s) if s.is_empty() => None,
        Some(s) => Some(s.to_string()),
    }
}

impl CartLine {
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.size.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_empty_size_are_the_same_identity() {
        let a = LineKey::new("p1", None);
        let b = LineKey::new("p1", Some(""));
        assert_eq!(a, b);
    }

    #[test]
    fn test_sized_and_unsized_are_distinct_identities() {
        let unsized_key = LineKey::new("p1", None);
        let sized_key = LineKey::new("p1", Some("M"));
        assert_ne!(unsized_key, sized_key);
    }

    #[test]
    fn test_size_labels_are_not_case_folded_or_trimmed() {
        assert_ne!(LineKey::new("p1", Some("M")), LineKey::new("p1", Some("m")));
        assert_ne!(
            LineKey::new("p1", Some("M")),
            LineKey::new("p1", Some(" M"))
        );
    }

    #[test]
    fn test_different_products_never_collide() {
        assert_ne!(LineKey::new("p1", Some("M")), LineKey::new("p2", Some("M")));
    }

    #[test]
    fn test_line_key_uses_normalized_size() {
        let line = CartLine {
            product_id: "p1".to_string(),
            size: Some(String::new()),
            quantity: 2,
        };
        assert_eq!(line.key(), LineKey::new("p1", None));
    }
}
