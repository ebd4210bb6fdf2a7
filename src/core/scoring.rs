use crate::core::{
    budget::budget_fit,
    filters::sizes_available,
    similarity::{style_similarity, unique},
};
use crate::models::{MatchCriteria, Product, ScoringWeights};

/// Boost granted when both products come from the same collection
pub const COLLECTION_BOOST: f64 = 0.1;

/// Tags quoted in a rationale
const RATIONALE_TAG_LIMIT: usize = 4;

/// Per-factor breakdown of one scored pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    pub style_score: f64,
    pub collection_boost: f64,
    pub size_availability: f64,
    pub budget_score: f64,
    pub stock_ok: bool,
    pub final_score: f64,
}

/// Score an ordered pair (A, B) against the request
///
/// Scoring formula:
/// score = (
///     style_score * 0.50 +         # cosine similarity of combined tags
///     collection_boost * 0.15 +    # 0.1 when both share a collection
///     size_availability * 0.20 +   # requested sizes offered on both sides
///     budget_score * 0.15          # total price inside the budget range
/// )
///
/// Pairs that are out of stock or miss the requested sizes are forced to 0.
pub fn score_pair(
    product_a: &Product,
    product_b: &Product,
    criteria: &MatchCriteria,
    weights: &ScoringWeights,
) -> PairScore {
    let style_union = unique(
        product_a
            .tags
            .iter()
            .chain(product_b.tags.iter())
            .map(String::as_str),
    );
    let style_score = style_similarity(&style_union, &criteria.style_tags);

    let collection_boost = match (&product_a.collection, &product_b.collection) {
        (Some(a), Some(b)) if !a.is_empty() && a == b => COLLECTION_BOOST,
        _ => 0.0,
    };

    let size_availability = if sizes_available(&criteria.sizes_a, &product_a.sizes)
        && sizes_available(&criteria.sizes_b, &product_b.sizes)
    {
        1.0
    } else {
        0.0
    };

    let total_price = product_a.price + product_b.price;
    let budget_score = budget_fit(total_price, criteria.budget_min, criteria.budget_max);

    let stock_ok = product_a.in_stock() && product_b.in_stock();

    let base_score = style_score * weights.style
        + collection_boost * weights.collection
        + size_availability * weights.size
        + budget_score * weights.budget;

    let final_score = if stock_ok && size_availability > 0.0 {
        base_score.clamp(0.0, 1.0)
    } else {
        0.0
    };

    PairScore {
        style_score,
        collection_boost,
        size_availability,
        budget_score,
        stock_ok,
        final_score,
    }
}

/// Human-readable rationale for a scored pair
///
/// e.g. `same collection, style match (minimal/tech), total ¥23,000, in stock, also great for date`
pub fn build_reason(
    product_a: &Product,
    product_b: &Product,
    total_price: i64,
    score: &PairScore,
    criteria: &MatchCriteria,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(5);

    if score.collection_boost > 0.0 {
        parts.push("same collection".to_string());
    }

    let tags = unique(
        criteria
            .style_tags
            .iter()
            .chain(product_a.tags.iter())
            .chain(product_b.tags.iter())
            .map(String::as_str),
    );
    let tag_list = tags
        .into_iter()
        .take(RATIONALE_TAG_LIMIT)
        .collect::<Vec<_>>()
        .join("/");
    let tag_list = if tag_list.is_empty() { "balanced".to_string() } else { tag_list };
    parts.push(format!("{} ({})", style_label(score.style_score), tag_list));

    parts.push(format!("total {}", format_currency(total_price)));

    parts.push(if score.stock_ok { "in stock" } else { "stock adjusting" }.to_string());

    if let Some(occasion) = criteria.occasion.as_deref().filter(|o| !o.is_empty()) {
        parts.push(format!("also great for {}", occasion_label(occasion)));
    }

    parts.join(", ")
}

fn style_label(style_score: f64) -> &'static str {
    if style_score >= 0.7 {
        "style match"
    } else if style_score >= 0.4 {
        "style approximate"
    } else {
        "style mix"
    }
}

/// Phrase for a requested occasion; unknown occasions pass through verbatim
pub fn occasion_label(occasion: &str) -> &str {
    match occasion {
        "wedding" => "ceremony-appropriate",
        "date" => "date",
        "casual" => "casual outing",
        "business" => "business",
        other => other,
    }
}

/// Format an amount in yen with thousands separators, e.g. `¥12,345`
pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}¥{}", sign, grouped)
}
