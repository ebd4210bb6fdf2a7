use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::domain::{GenderLabel, MatchCriteria, PairingCategory};

/// Request to compute bundles for a pair of shoppers
///
/// Category and budgets are read leniently: a missing, mistyped or unknown
/// value becomes `None` and is reported by `check()` against its field.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchBundlesRequest {
    #[validate(required(message = "pairingCategory must be one of MM, WW, UNISEX, CUSTOM"))]
    #[serde(rename = "pairingCategory", alias = "pairType", default, deserialize_with = "lenient")]
    pub pairing_category: Option<PairingCategory>,
    #[validate(length(max = 8, message = "styleTags accepts at most 8 tags"))]
    #[serde(rename = "styleTags", default)]
    pub style_tags: Vec<String>,
    #[validate(length(max = 12, message = "sizesA accepts at most 12 sizes"))]
    #[serde(rename = "sizesA", default)]
    pub sizes_a: Vec<String>,
    #[validate(length(max = 12, message = "sizesB accepts at most 12 sizes"))]
    #[serde(rename = "sizesB", default)]
    pub sizes_b: Vec<String>,
    #[validate(
        required(message = "budgetMin must be an integer"),
        range(min = 0, message = "budgetMin must not be negative")
    )]
    #[serde(rename = "budgetMin", default, deserialize_with = "lenient")]
    pub budget_min: Option<i64>,
    #[validate(
        required(message = "budgetMax must be an integer"),
        range(min = 0, message = "budgetMax must not be negative")
    )]
    #[serde(rename = "budgetMax", default, deserialize_with = "lenient")]
    pub budget_max: Option<i64>,
    #[validate(length(max = 64, message = "occasion must be at most 64 characters"))]
    #[serde(default)]
    pub occasion: Option<String>,
    #[validate(length(min = 1, message = "userId must not be empty"))]
    #[serde(rename = "userId", alias = "user_id", default)]
    pub user_id: Option<String>,
}

/// Accept any JSON value; anything that is not a valid `T` becomes `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl MatchBundlesRequest {
    /// Field validation plus the cross-field budget range check
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let (Some(min), Some(max)) = (self.budget_min, self.budget_max) {
            if max < min {
                let mut error = ValidationError::new("budget_range");
                error.message = Some("budgetMax must be greater than or equal to budgetMin".into());
                errors.add("budget_max", error);
            }
        }

        if errors.field_errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and convert into matcher criteria
    pub fn into_criteria(self) -> Result<MatchCriteria, ValidationErrors> {
        self.check()?;

        let (Some(pairing_category), Some(budget_min), Some(budget_max)) =
            (self.pairing_category, self.budget_min, self.budget_max)
        else {
            return Err(ValidationErrors::new());
        };

        Ok(MatchCriteria {
            pairing_category,
            style_tags: self.style_tags,
            sizes_a: self.sizes_a,
            sizes_b: self.sizes_b,
            budget_min,
            budget_max,
            occasion: self.occasion,
            user_id: self.user_id,
        })
    }
}

/// Query string for product search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductQuery {
    #[validate(length(max = 120, message = "query must be at most 120 characters"))]
    #[serde(default)]
    pub query: Option<String>,
    #[serde(rename = "genderLabel", default)]
    pub gender_label: Option<GenderLabel>,
}

/// Request to bookmark a bundle
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveBundleRequest {
    #[validate(length(min = 1, message = "userId must not be empty"))]
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: String,
    #[serde(rename = "bundleId", alias = "bundle_id")]
    pub bundle_id: Uuid,
}

/// Query string for listing saved bundles
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SavedBundlesQuery {
    #[validate(length(min = 1, message = "userId must not be empty"))]
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: String,
}
