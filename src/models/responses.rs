use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::models::domain::{MatchRun, PairBundle};

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchBundlesResponse {
    #[serde(rename = "requestId")]
    pub request_id: Uuid,
    pub bundles: Vec<PairBundle>,
    pub total_results: usize,
}

impl From<MatchRun> for MatchBundlesResponse {
    fn from(run: MatchRun) -> Self {
        Self {
            request_id: run.request.id,
            total_results: run.bundles.len(),
            bundles: run.bundles,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// One rejected request field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Validation failure with per-field detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub issues: Vec<FieldIssue>,
    pub status_code: u16,
}

/// Request field name as it appears on the wire, e.g. `budget_max` -> `budgetMax`
pub fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            name.extend(ch.to_uppercase());
            upper = false;
        } else {
            name.push(ch);
        }
    }
    name
}

impl From<&ValidationErrors> for ValidationErrorResponse {
    fn from(errors: &ValidationErrors) -> Self {
        let mut issues: Vec<FieldIssue> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldIssue {
                    field: wire_name(field),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        issues.sort_by(|a, b| a.field.cmp(&b.field));

        Self {
            error: "Validation failed".to_string(),
            issues,
            status_code: 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_wire_name() {
        assert_eq!(wire_name("budget_max"), "budgetMax");
        assert_eq!(wire_name("sizes_a"), "sizesA");
        assert_eq!(wire_name("occasion"), "occasion");
    }

    #[test]
    fn test_issues_use_wire_names_and_messages() {
        let mut errors = ValidationErrors::new();
        let mut error = ValidationError::new("length");
        error.message = Some("styleTags accepts at most 8 tags".into());
        errors.add("style_tags", error);
        errors.add("budget_min", ValidationError::new("range"));

        let response = ValidationErrorResponse::from(&errors);

        assert_eq!(
            response.issues,
            vec![
                FieldIssue { field: "budgetMin".to_string(), message: "range".to_string() },
                FieldIssue {
                    field: "styleTags".to_string(),
                    message: "styleTags accepts at most 8 tags".to_string(),
                },
            ]
        );
    }
}
