/// Canonical style vocabulary every comparison is projected onto
pub const STYLE_VOCABULARY: [&str; 8] = [
    "minimal", "street", "formal", "sporty", "colorful", "monotone", "vintage", "tech",
];

/// Weight kept from the raw similarity when the request names no tags
const OPEN_REQUEST_SCALE: f64 = 0.6;
/// Floor granted when the request names no tags
const OPEN_REQUEST_FLOOR: f64 = 0.4;

/// Distinct values in first-seen order
pub fn unique<'a, I>(items: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

/// Cosine similarity of two equally sized vectors; 0 when either has no magnitude
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

/// Style similarity (0-1) between a set of product tags and the requested tags
///
/// Both sides become binary indicator vectors over the union of the canonical
/// vocabulary and every tag seen on either side. An open request (no tags) is
/// lifted to `0.4 + 0.6 * similarity`.
pub fn style_similarity<P, R>(product_tags: &[P], request_tags: &[R]) -> f64
where
    P: AsRef<str>,
    R: AsRef<str>,
{
    let product: Vec<&str> = product_tags.iter().map(AsRef::as_ref).collect();
    let request: Vec<&str> = request_tags.iter().map(AsRef::as_ref).collect();

    let universe = unique(
        STYLE_VOCABULARY
            .iter()
            .copied()
            .chain(product.iter().copied())
            .chain(request.iter().copied()),
    );

    let indicator = |tags: &[&str]| -> Vec<f64> {
        universe
            .iter()
            .map(|tag| if tags.contains(tag) { 1.0 } else { 0.0 })
            .collect()
    };

    let similarity = cosine_similarity(&indicator(&product), &indicator(&request));

    if request.is_empty() {
        similarity * OPEN_REQUEST_SCALE + OPEN_REQUEST_FLOOR
    } else {
        similarity
    }
}
