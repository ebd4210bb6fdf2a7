use crate::models::{GenderLabel, PairingCategory, Product};

/// Check whether a product may take part in a bundle of the given category
///
/// This is Stage 1 of the matching pipeline.
#[inline]
pub fn is_eligible(category: PairingCategory, product: &Product) -> bool {
    match category {
        PairingCategory::Mm => matches!(product.gender_label, GenderLabel::Mens | GenderLabel::Unisex),
        PairingCategory::Ww => matches!(product.gender_label, GenderLabel::Womens | GenderLabel::Unisex),
        PairingCategory::Unisex => product.gender_label == GenderLabel::Unisex,
        PairingCategory::Custom => true,
    }
}

/// Predicate over catalog entries for a pairing category
pub fn pair_filter(category: PairingCategory) -> impl Fn(&Product) -> bool {
    move |product| is_eligible(category, product)
}

/// Check whether the product sizes satisfy a requested size list
///
/// An empty request list is no constraint.
#[inline]
pub fn sizes_available(requested: &[String], offered: &[String]) -> bool {
    requested.is_empty() || requested.iter().any(|size| offered.contains(size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_product(id: &str, gender_label: GenderLabel) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            brand: None,
            price: 10000,
            stock: 3,
            gender_label,
            collection: None,
            tags: vec![],
            sizes: vec!["M".to_string()],
            images: vec![],
            active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_mm_admits_mens_and_unisex() {
        let filter = pair_filter(PairingCategory::Mm);
        assert!(filter(&create_test_product("1", GenderLabel::Mens)));
        assert!(filter(&create_test_product("2", GenderLabel::Unisex)));
        assert!(!filter(&create_test_product("3", GenderLabel::Womens)));
    }

    #[test]
    fn test_ww_admits_womens_and_unisex() {
        let filter = pair_filter(PairingCategory::Ww);
        assert!(filter(&create_test_product("1", GenderLabel::Womens)));
        assert!(filter(&create_test_product("2", GenderLabel::Unisex)));
        assert!(!filter(&create_test_product("3", GenderLabel::Mens)));
    }

    #[test]
    fn test_unisex_only_admits_unisex() {
        let filter = pair_filter(PairingCategory::Unisex);
        assert!(filter(&create_test_product("1", GenderLabel::Unisex)));
        assert!(!filter(&create_test_product("2", GenderLabel::Mens)));
        assert!(!filter(&create_test_product("3", GenderLabel::Womens)));
    }

    #[test]
    fn test_custom_admits_everything() {
        let filter = pair_filter(PairingCategory::Custom);
        for label in [GenderLabel::Mens, GenderLabel::Womens, GenderLabel::Unisex] {
            assert!(filter(&create_test_product("x", label)));
        }
    }

    #[test]
    fn test_sizes_available() {
        let offered = vec!["S".to_string(), "M".to_string()];
        assert!(sizes_available(&[], &offered));
        assert!(sizes_available(&["M".to_string(), "XL".to_string()], &offered));
        assert!(!sizes_available(&["XL".to_string()], &offered));
        assert!(!sizes_available(&["M".to_string()], &[]));
    }
}
