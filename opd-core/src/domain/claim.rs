//! Claim decision records as returned by the adjudication backend.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::lenient;

/// Adjudication outcome. Unrecognized strings are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClaimStatus {
    Approved,
    Rejected,
    Partial,
    ManualReview,
    Other(String),
}

impl ClaimStatus {
    /// The four statuses the backend is known to emit, in display order.
    pub const KNOWN: [ClaimStatus; 4] = [
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
        ClaimStatus::Partial,
        ClaimStatus::ManualReview,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Rejected => "REJECTED",
            ClaimStatus::Partial => "PARTIAL",
            ClaimStatus::ManualReview => "MANUAL_REVIEW",
            ClaimStatus::Other(raw) if raw.is_empty() => "UNKNOWN",
            ClaimStatus::Other(raw) => raw,
        }
    }
}

impl Default for ClaimStatus {
    fn default() -> Self {
        ClaimStatus::Other(String::new())
    }
}

impl From<String> for ClaimStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => ClaimStatus::Approved,
            "REJECTED" => ClaimStatus::Rejected,
            "PARTIAL" => ClaimStatus::Partial,
            "MANUAL_REVIEW" => ClaimStatus::ManualReview,
            _ => ClaimStatus::Other(raw),
        }
    }
}

impl From<ClaimStatus> for String {
    fn from(status: ClaimStatus) -> Self {
        match status {
            ClaimStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI judgment on whether the treatment matches the diagnosis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NecessityCheck {
    Pass,
    Fail,
    #[default]
    NotApplicable,
}

impl NecessityCheck {
    pub fn label(self) -> &'static str {
        match self {
            NecessityCheck::Pass => "PASS",
            NecessityCheck::Fail => "FAIL",
            NecessityCheck::NotApplicable => "N/A",
        }
    }
}

impl From<String> for NecessityCheck {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PASS" => NecessityCheck::Pass,
            "FAIL" => NecessityCheck::Fail,
            _ => NecessityCheck::NotApplicable,
        }
    }
}

impl From<NecessityCheck> for String {
    fn from(check: NecessityCheck) -> Self {
        check.label().to_string()
    }
}

/// One billed charge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub item: String,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub cost: Option<f64>,
}

/// Structured fields the AI service pulled from the uploaded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date_of_service: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub diagnosis: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub doctor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub doctor_reg_no: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub hospital_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub document_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::necessity")]
    pub medical_necessity_check: NecessityCheck,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub medical_necessity_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient::line_items")]
    pub line_items: Vec<LineItem>,
}

/// A single adjudication record.
///
/// Every field tolerates absence: the renderer is responsible for defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(default, deserialize_with = "lenient::string")]
    pub claim_id: String,
    #[serde(default, deserialize_with = "lenient::status")]
    pub status: ClaimStatus,
    #[serde(default, deserialize_with = "lenient::extracted_data")]
    pub extracted_data: Option<ExtractedData>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub approved_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub confidence_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub rejection_reasons: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub file_path: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub diagnosis: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub treatment_date: Option<String>,
}

fn non_empty(s: Option<&String>) -> Option<&str> {
    s.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl Claim {
    /// Patient name from the record, falling back to the extraction.
    pub fn patient(&self) -> Option<&str> {
        non_empty(self.patient_name.as_ref()).or_else(|| {
            self.extracted_data
                .as_ref()
                .and_then(|e| non_empty(e.patient_name.as_ref()))
        })
    }

    /// Diagnosis from the record, falling back to the extraction.
    pub fn diagnosis_text(&self) -> Option<&str> {
        non_empty(self.diagnosis.as_ref()).or_else(|| {
            self.extracted_data
                .as_ref()
                .and_then(|e| non_empty(e.diagnosis.as_ref()))
        })
    }

    /// Treatment date from the record, falling back to the extracted date of service.
    pub fn service_date(&self) -> Option<&str> {
        non_empty(self.treatment_date.as_ref()).or_else(|| {
            self.extracted_data
                .as_ref()
                .and_then(|e| non_empty(e.date_of_service.as_ref()))
        })
    }

    pub fn line_items(&self) -> &[LineItem] {
        self.extracted_data
            .as_ref()
            .map(|e| e.line_items.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_backend_record() {
        let raw = json!({
            "id": 3,
            "claim_id": "CLM-1A2B3C4D",
            "patient_name": "Rajesh Kumar",
            "diagnosis": "Viral fever",
            "treatment_date": "2024-11-02",
            "total_amount": 1500.0,
            "approved_amount": 1350.0,
            "status": "PARTIAL",
            "confidence_score": 0.91,
            "rejection_reasons": ["CO_PAY_DEDUCTION: 10% co-pay applied"],
            "extracted_data": {
                "patient_name": "Rajesh Kumar",
                "doctor_reg_no": "KA/45678/2015",
                "medical_necessity_check": "PASS",
                "line_items": [{"item": "Consultation", "cost": 1000}, {"item": "CBC", "cost": "500"}]
            },
            "file_path": "uploads/abc.png",
            "created_at": "2024-11-03T09:15:00.120000"
        });
        let claim: Claim = serde_json::from_value(raw).unwrap();
        assert_eq!(claim.status, ClaimStatus::Partial);
        assert_eq!(claim.approved_amount, Some(1350.0));
        assert_eq!(claim.line_items().len(), 2);
        assert_eq!(claim.line_items()[1].cost, Some(500.0));
        assert!(claim.created_at.is_some());
        let extracted = claim.extracted_data.unwrap();
        assert_eq!(extracted.medical_necessity_check, NecessityCheck::Pass);
    }

    #[test]
    fn decodes_sparse_and_malformed_record() {
        let raw = json!({
            "claim_id": "CLM-X",
            "status": "ESCALATED",
            "total_amount": null,
            "approved_amount": "n/a",
            "rejection_reasons": null,
            "extracted_data": "garbage",
            "created_at": 12345
        });
        let claim: Claim = serde_json::from_value(raw).unwrap();
        assert_eq!(claim.status, ClaimStatus::Other("ESCALATED".into()));
        assert_eq!(claim.total_amount, None);
        assert_eq!(claim.approved_amount, None);
        assert!(claim.rejection_reasons.is_empty());
        assert!(claim.extracted_data.is_none());
        assert!(claim.created_at.is_none());
        assert!(claim.line_items().is_empty());
    }

    #[test]
    fn non_object_line_items_are_dropped() {
        let raw = json!({
            "line_items": ["loose string", 42, {"item": "X-Ray", "cost": 800}, null]
        });
        let data: ExtractedData = serde_json::from_value(raw).unwrap();
        assert_eq!(data.line_items.len(), 1);
        assert_eq!(data.line_items[0].item, "X-Ray");
        assert_eq!(data.medical_necessity_check, NecessityCheck::NotApplicable);
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(ClaimStatus::from("approved".to_string()), ClaimStatus::Approved);
        assert_eq!(ClaimStatus::from("Manual_Review".to_string()), ClaimStatus::ManualReview);
        assert_eq!(ClaimStatus::default().as_str(), "UNKNOWN");
    }

    #[test]
    fn status_serializes_as_wire_string() {
        let s = serde_json::to_string(&ClaimStatus::ManualReview).unwrap();
        assert_eq!(s, "\"MANUAL_REVIEW\"");
    }

    #[test]
    fn patient_falls_back_to_extraction() {
        let claim = Claim {
            patient_name: Some("  ".into()),
            extracted_data: Some(ExtractedData {
                patient_name: Some("Anita Rao".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(claim.patient(), Some("Anita Rao"));
    }

    #[test]
    fn service_date_prefers_record_over_extraction() {
        let mut claim = Claim {
            extracted_data: Some(ExtractedData {
                date_of_service: Some("2024-11-05".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(claim.service_date(), Some("2024-11-05"));
        claim.treatment_date = Some("2024-11-04".into());
        assert_eq!(claim.service_date(), Some("2024-11-04"));
    }
}
