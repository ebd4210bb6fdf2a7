use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Audience a product is cut for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderLabel {
    Mens,
    Womens,
    Unisex,
}

impl GenderLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderLabel::Mens => "mens",
            GenderLabel::Womens => "womens",
            GenderLabel::Unisex => "unisex",
        }
    }
}

impl fmt::Display for GenderLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenderLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mens" => Ok(GenderLabel::Mens),
            "womens" => Ok(GenderLabel::Womens),
            "unisex" => Ok(GenderLabel::Unisex),
            other => Err(format!("unknown gender label: {}", other)),
        }
    }
}

/// Eligibility constraint for the two partners of a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairingCategory {
    #[serde(rename = "MM")]
    Mm,
    #[serde(rename = "WW")]
    Ww,
    #[serde(rename = "UNISEX")]
    Unisex,
    #[serde(rename = "CUSTOM")]
    Custom,
}

impl PairingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingCategory::Mm => "MM",
            PairingCategory::Ww => "WW",
            PairingCategory::Unisex => "UNISEX",
            PairingCategory::Custom => "CUSTOM",
        }
    }
}

impl FromStr for PairingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MM" => Ok(PairingCategory::Mm),
            "WW" => Ok(PairingCategory::Ww),
            "UNISEX" => Ok(PairingCategory::Unisex),
            "CUSTOM" => Ok(PairingCategory::Custom),
            other => Err(format!("unknown pairing category: {}", other)),
        }
    }
}

/// Catalog entry as seen by the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub price: i64,
    pub stock: i64,
    pub gender_label: GenderLabel,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

fn default_true() -> bool { true }

/// The preferences a matching run is computed against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCriteria {
    pub pairing_category: PairingCategory,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub sizes_a: Vec<String>,
    #[serde(default)]
    pub sizes_b: Vec<String>,
    pub budget_min: i64,
    pub budget_max: i64,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A persisted matching attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub criteria: MatchCriteria,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Ranked pair produced by the matcher before it is stored
#[derive(Debug, Clone)]
pub struct BundleCandidate {
    pub product_a: Product,
    pub product_b: Product,
    pub total_price: i64,
    /// Rounded to 4 decimals
    pub score: f64,
    pub reason: String,
}

impl BundleCandidate {
    pub fn to_input(&self) -> NewPairBundle {
        NewPairBundle {
            product_a_id: self.product_a.id.clone(),
            product_b_id: self.product_b.id.clone(),
            total_price: self.total_price,
            score: self.score,
            reason: self.reason.clone(),
        }
    }
}

/// Row payload handed to the bundle store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPairBundle {
    pub product_a_id: String,
    pub product_b_id: String,
    pub total_price: i64,
    pub score: f64,
    pub reason: String,
}

/// Stored bundle, expanded with both products
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairBundle {
    pub id: Uuid,
    pub request_id: Uuid,
    pub product_a: Product,
    pub product_b: Product,
    pub total_price: i64,
    pub score: f64,
    pub reason: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A stored request together with its ranked bundles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRun {
    pub request: MatchRequest,
    pub bundles: Vec<PairBundle>,
}

/// Bookmark of a bundle by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBundle {
    pub user_id: String,
    pub bundle: PairBundle,
    pub saved_at: chrono::DateTime<chrono::Utc>,
}

/// Product search parameters
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub query: Option<String>,
    pub gender_label: Option<GenderLabel>,
    pub limit: usize,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub style: f64,
    pub collection: f64,
    pub size: f64,
    pub budget: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            style: 0.5,
            collection: 0.15,
            size: 0.2,
            budget: 0.15,
        }
    }
}
