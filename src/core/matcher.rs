use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{BundleCandidate, MatchCriteria, Product, ScoringWeights};
use crate::core::{
    filters::pair_filter,
    scoring::{build_reason, score_pair},
};

/// Upper bound on bundles returned by one run
pub const MAX_BUNDLES: usize = 12;

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub bundles: Vec<BundleCandidate>,
    pub total_candidates: usize,
    pub eligible_candidates: usize,
    pub scored_pairs: usize,
}

/// Main matching orchestrator - implements the pairing pipeline
///
/// # Pipeline Stages
/// 1. Pairing category filter
/// 2. Ordered pair enumeration and scoring
/// 3. Deduplication by unordered pair
/// 4. Ranking and truncation
///
/// Pure: persistence of a run lives in `services::matching`.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank every two-product bundle of the catalog for a request
    ///
    /// Both orientations of a pair are scored because the size lists are bound
    /// to partner A and partner B. Only the best orientation of each unordered
    /// pair survives; on a tie the first one enumerated is kept.
    ///
    /// # Arguments
    /// * `criteria` - The shoppers' joint preferences
    /// * `products` - Catalog snapshot, in catalog order
    ///
    /// # Returns
    /// MatchResult with at most `MAX_BUNDLES` bundles, best first
    pub fn rank_bundles(&self, criteria: &MatchCriteria, products: Vec<Product>) -> MatchResult {
        let total_candidates = products.len();

        // Stage 1: eligibility
        let eligible_filter = pair_filter(criteria.pairing_category);
        let eligible: Vec<Product> = products
            .into_iter()
            .filter(|product| product.active && eligible_filter(product))
            .collect();

        // Stages 2 & 3: score ordered pairs, keep the best orientation
        let mut scored: Vec<(f64, BundleCandidate)> = Vec::new();
        let mut by_pair: HashMap<(&str, &str), usize> = HashMap::new();
        let mut scored_pairs = 0usize;

        for product_a in &eligible {
            for product_b in &eligible {
                if product_a.id == product_b.id {
                    continue;
                }

                let score = score_pair(product_a, product_b, criteria, &self.weights);
                if score.final_score <= 0.0 {
                    continue;
                }
                scored_pairs += 1;

                let key = pair_key(&product_a.id, &product_b.id);
                if let Some(&index) = by_pair.get(&key) {
                    if scored[index].0 >= score.final_score {
                        continue;
                    }
                }

                let total_price = product_a.price + product_b.price;
                let candidate = BundleCandidate {
                    product_a: product_a.clone(),
                    product_b: product_b.clone(),
                    total_price,
                    score: round_score(score.final_score),
                    reason: build_reason(product_a, product_b, total_price, &score, criteria),
                };

                match by_pair.get(&key) {
                    Some(&index) => scored[index] = (score.final_score, candidate),
                    None => {
                        by_pair.insert(key, scored.len());
                        scored.push((score.final_score, candidate));
                    }
                }
            }
        }

        // Stage 4: rank and truncate
        let mut bundles: Vec<BundleCandidate> = scored.into_iter().map(|(_, c)| c).collect();
        bundles.sort_by(compare_bundles);
        bundles.truncate(MAX_BUNDLES);

        tracing::debug!(
            total_candidates,
            eligible = eligible.len(),
            scored_pairs,
            returned = bundles.len(),
            "Ranked bundles"
        );

        MatchResult {
            bundles,
            total_candidates,
            eligible_candidates: eligible.len(),
            scored_pairs,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Identity of an unordered product pair
#[inline]
fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Round a score to 4 decimal places
#[inline]
pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

/// Compare product names case-insensitively, falling back to byte order
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Ranking order: score desc, total price asc, product A name asc
pub fn compare_bundles(a: &BundleCandidate, b: &BundleCandidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.total_price.cmp(&b.total_price))
        .then_with(|| compare_names(&a.product_a.name, &b.product_a.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenderLabel, PairingCategory};
    use std::collections::HashSet;

    fn create_product(id: &str, price: i64, stock: i64, gender: GenderLabel, tags: &[&str]) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Item {}", id),
            brand: None,
            price,
            stock,
            gender_label: gender,
            collection: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            sizes: vec!["M".to_string()],
            images: vec![],
            active: true,
            created_at: None,
        }
    }

    fn create_criteria(category: PairingCategory) -> MatchCriteria {
        MatchCriteria {
            pairing_category: category,
            style_tags: vec!["minimal".to_string()],
            sizes_a: vec![],
            sizes_b: vec![],
            budget_min: 16000,
            budget_max: 28000,
            occasion: None,
            user_id: None,
        }
    }

    #[test]
    fn test_rank_bundles_basic() {
        let matcher = Matcher::with_default_weights();
        let products = vec![
            create_product("1", 10000, 3, GenderLabel::Unisex, &["minimal"]),
            create_product("2", 9000, 3, GenderLabel::Unisex, &["minimal"]),
            create_product("3", 9000, 0, GenderLabel::Unisex, &["minimal"]), // No stock
        ];

        let result = matcher.rank_bundles(&create_criteria(PairingCategory::Custom), products);

        assert_eq!(result.total_candidates, 3);
        assert_eq!(result.bundles.len(), 1);
        assert_eq!(result.bundles[0].total_price, 19000);
        assert_eq!(result.bundles[0].score, 0.85);
    }

    #[test]
    fn test_never_pairs_product_with_itself() {
        let matcher = Matcher::with_default_weights();
        let products = vec![create_product("solo", 10000, 5, GenderLabel::Mens, &["minimal"])];

        let result = matcher.rank_bundles(&create_criteria(PairingCategory::Custom), products);

        assert!(result.bundles.is_empty());
    }

    #[test]
    fn test_unordered_pairs_are_unique() {
        let matcher = Matcher::with_default_weights();
        let products: Vec<Product> = (0..5)
            .map(|i| create_product(&i.to_string(), 8000 + i * 500, 2, GenderLabel::Unisex, &["minimal"]))
            .collect();

        let result = matcher.rank_bundles(&create_criteria(PairingCategory::Custom), products);

        assert_eq!(result.bundles.len(), 10);
        let keys: HashSet<(String, String)> = result
            .bundles
            .iter()
            .map(|b| {
                let (x, y) = pair_key(&b.product_a.id, &b.product_b.id);
                (x.to_string(), y.to_string())
            })
            .collect();
        assert_eq!(keys.len(), result.bundles.len());
    }

    #[test]
    fn test_directional_sizes_keep_matching_orientation() {
        let matcher = Matcher::with_default_weights();
        let mut small = create_product("small", 10000, 2, GenderLabel::Unisex, &["minimal"]);
        small.sizes = vec!["S".to_string()];
        let mut large = create_product("large", 10000, 2, GenderLabel::Unisex, &["minimal"]);
        large.sizes = vec!["L".to_string()];

        let mut criteria = create_criteria(PairingCategory::Custom);
        criteria.sizes_a = vec!["L".to_string()];
        criteria.sizes_b = vec!["S".to_string()];

        let result = matcher.rank_bundles(&criteria, vec![small, large]);

        assert_eq!(result.bundles.len(), 1);
        assert_eq!(result.bundles[0].product_a.id, "large");
        assert_eq!(result.bundles[0].product_b.id, "small");
    }

    #[test]
    fn test_tie_keeps_first_orientation() {
        let matcher = Matcher::with_default_weights();
        let products = vec![
            create_product("b", 10000, 2, GenderLabel::Unisex, &["minimal"]),
            create_product("a", 10000, 2, GenderLabel::Unisex, &["minimal"]),
        ];

        let result = matcher.rank_bundles(&create_criteria(PairingCategory::Custom), products);

        assert_eq!(result.bundles.len(), 1);
        assert_eq!(result.bundles[0].product_a.id, "b");
    }

    #[test]
    fn test_sorted_and_truncated() {
        let matcher = Matcher::with_default_weights();
        let products: Vec<Product> = (0..8)
            .map(|i| {
                let tags: &[&str] = if i % 2 == 0 { &["minimal"] } else { &["street"] };
                create_product(&i.to_string(), 7000 + i * 1000, 1, GenderLabel::Unisex, tags)
            })
            .collect();

        let result = matcher.rank_bundles(&create_criteria(PairingCategory::Custom), products);

        assert_eq!(result.bundles.len(), MAX_BUNDLES);
        for pair in result.bundles.windows(2) {
            assert_ne!(compare_bundles(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn test_unisex_category_excludes_gendered_products() {
        let matcher = Matcher::with_default_weights();
        let products = vec![
            create_product("m", 10000, 5, GenderLabel::Mens, &["minimal"]),
            create_product("w", 10000, 5, GenderLabel::Womens, &["minimal"]),
            create_product("u1", 10000, 5, GenderLabel::Unisex, &["street"]),
            create_product("u2", 10000, 5, GenderLabel::Unisex, &["street"]),
        ];

        let result = matcher.rank_bundles(&create_criteria(PairingCategory::Unisex), products);

        assert_eq!(result.eligible_candidates, 2);
        for bundle in &result.bundles {
            assert_eq!(bundle.product_a.gender_label, GenderLabel::Unisex);
            assert_eq!(bundle.product_b.gender_label, GenderLabel::Unisex);
        }
    }

    #[test]
    fn test_inactive_products_ignored() {
        let matcher = Matcher::with_default_weights();
        let mut retired = create_product("r", 10000, 5, GenderLabel::Unisex, &["minimal"]);
        retired.active = false;
        let products = vec![retired, create_product("x", 10000, 5, GenderLabel::Unisex, &["minimal"])];

        let result = matcher.rank_bundles(&create_criteria(PairingCategory::Custom), products);

        assert!(result.bundles.is_empty());
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.123456), 0.1235);
        assert_eq!(round_score(0.85), 0.85);
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Apple", "apple"), Ordering::Less);
    }
}
