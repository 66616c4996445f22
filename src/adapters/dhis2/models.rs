//! DHIS2 API response models
//!
//! Only the slice of the import response the submitter needs: the
//! import summary carrying the created entity's reference.

use serde::Deserialize;

/// Top-level import response wrapper
#[derive(Debug, Deserialize)]
pub struct ImportResponse {
    /// Response body; absent on some error shapes
    pub response: Option<ImportResponseBody>,
}

/// Import response body
#[derive(Debug, Deserialize)]
pub struct ImportResponseBody {
    /// Per-object import summaries
    #[serde(rename = "importSummaries", default)]
    pub import_summaries: Vec<ImportSummary>,
}

/// One import summary
#[derive(Debug, Deserialize)]
pub struct ImportSummary {
    /// SUCCESS, WARNING or ERROR
    pub status: Option<String>,

    /// Reference (uid) of the imported object
    pub reference: Option<String>,

    /// Human-readable failure description
    pub description: Option<String>,
}

impl ImportResponse {
    /// Extracts the first import summary, if any
    pub fn first_summary(&self) -> Option<&ImportSummary> {
        self.response
            .as_ref()
            .and_then(|body| body.import_summaries.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_response() {
        let json = r#"{
            "response": {
                "importSummaries": [
                    {"status": "SUCCESS", "reference": "Ab1Cd2Ef3Gh"}
                ]
            }
        }"#;

        let parsed: ImportResponse = serde_json::from_str(json).unwrap();
        let summary = parsed.first_summary().unwrap();
        assert_eq!(summary.status.as_deref(), Some("SUCCESS"));
        assert_eq!(summary.reference.as_deref(), Some("Ab1Cd2Ef3Gh"));
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{
            "response": {
                "importSummaries": [
                    {"status": "ERROR", "description": "Org unit not found"}
                ]
            }
        }"#;

        let parsed: ImportResponse = serde_json::from_str(json).unwrap();
        let summary = parsed.first_summary().unwrap();
        assert_eq!(summary.status.as_deref(), Some("ERROR"));
        assert!(summary.reference.is_none());
    }

    #[test]
    fn test_parse_empty_response() {
        let parsed: ImportResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.first_summary().is_none());
    }
}
