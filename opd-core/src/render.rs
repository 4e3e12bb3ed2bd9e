//! Result rendering: maps a (possibly sparse) claim into display sections.
//!
//! `render` is pure and total: it never fails and never touches the network.
//! Missing amounts display as zero, missing labels as "N/A", missing lists as
//! empty. Both the submission view and the history overlay draw from the
//! same `DisplaySections`, so the two never disagree about a claim.

use crate::domain::{Claim, ClaimStatus, ExtractedData, LineItem, NecessityCheck};
use crate::format;

/// Placeholder for any absent text field.
pub const NOT_AVAILABLE: &str = "N/A";

const NO_REASONING: &str = "No reasoning provided";

/// Confidence above this is shown as a healthy extraction.
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Semantic color of a status badge or panel. The UI maps tones to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Warning,
    Neutral,
}

impl Tone {
    pub fn for_status(status: &ClaimStatus) -> Tone {
        match status {
            ClaimStatus::Approved => Tone::Positive,
            ClaimStatus::Rejected => Tone::Negative,
            ClaimStatus::Partial => Tone::Warning,
            ClaimStatus::ManualReview | ClaimStatus::Other(_) => Tone::Neutral,
        }
    }
}

/// Where the source document can be seen, if anywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentView {
    /// A file the operator selected locally and still holds in memory.
    Local {
        name: String,
        mime: String,
        size_bytes: usize,
        fingerprint: String,
    },
    /// A document stored by the backend, retrievable at `url`.
    Remote { file_path: String, url: String },
    NotAvailable,
}

impl DocumentView {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            DocumentView::NotAvailable => {
                Some("Document image not available for historical records")
            }
            _ => None,
        }
    }
}

/// Top bar: decision badge and the money.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionHeader {
    pub claim_id: String,
    pub status_label: String,
    pub tone: Tone,
    pub approved: String,
    /// Approved amount is drawn struck through (rejections).
    pub approved_struck: bool,
    /// Claimed total, shown for every non-approved decision.
    pub original: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReasonsPanel<'a> {
    pub title: &'static str,
    pub reasons: &'a [String],
}

#[derive(Debug, Clone, PartialEq)]
pub struct NecessityPanel<'a> {
    pub check: NecessityCheck,
    pub tone: Tone,
    pub reason: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailField<'a> {
    pub label: &'static str,
    pub value: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceGauge {
    /// `round(score * 100, 1)`.
    pub percent: f64,
    pub label: String,
    /// Bar fill in [0, 1].
    pub fill: f64,
    pub high: bool,
}

/// Line item table. Rows are produced lazily and can be walked any number of times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItemTable<'a> {
    items: &'a [LineItem],
}

impl<'a> LineItemTable<'a> {
    pub const HEADERS: [&'static str; 2] = ["Line Item", "Cost"];

    pub fn rows(&self) -> LineItemRows<'a> {
        LineItemRows {
            inner: self.items.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItemRow<'a> {
    pub description: &'a str,
    pub cost: String,
}

#[derive(Debug, Clone)]
pub struct LineItemRows<'a> {
    inner: std::slice::Iter<'a, LineItem>,
}

impl<'a> Iterator for LineItemRows<'a> {
    type Item = LineItemRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|li| LineItemRow {
            description: or_na(Some(&li.item)),
            cost: format::inr(li.cost.unwrap_or(0.0)),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for LineItemRows<'_> {}

/// Everything the UI needs to draw one claim.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySections<'a> {
    pub header: DecisionHeader,
    pub reasons: Option<ReasonsPanel<'a>>,
    pub necessity: Option<NecessityPanel<'a>>,
    pub details: Option<[DetailField<'a>; 7]>,
    pub confidence: ConfidenceGauge,
    pub line_items: LineItemTable<'a>,
    pub document: DocumentView,
}

fn or_na(value: Option<&String>) -> &str {
    value
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

fn header(claim: &Claim) -> DecisionHeader {
    let approved = claim.approved_amount.unwrap_or(0.0);
    DecisionHeader {
        claim_id: or_na(Some(&claim.claim_id)).to_string(),
        status_label: claim.status.as_str().to_string(),
        tone: Tone::for_status(&claim.status),
        approved: format::inr(approved),
        approved_struck: claim.status == ClaimStatus::Rejected,
        original: (claim.status != ClaimStatus::Approved)
            .then(|| format::inr(claim.total_amount.unwrap_or(0.0))),
    }
}

fn necessity(data: &ExtractedData) -> NecessityPanel<'_> {
    let check = data.medical_necessity_check;
    NecessityPanel {
        check,
        tone: if check == NecessityCheck::Pass {
            Tone::Positive
        } else {
            Tone::Warning
        },
        reason: data
            .medical_necessity_reason
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(NO_REASONING),
    }
}

fn details(data: &ExtractedData) -> [DetailField<'_>; 7] {
    [
        DetailField { label: "Patient Name", value: or_na(data.patient_name.as_ref()) },
        DetailField { label: "Date of Service", value: or_na(data.date_of_service.as_ref()) },
        DetailField { label: "Diagnosis", value: or_na(data.diagnosis.as_ref()) },
        DetailField { label: "Doctor", value: or_na(data.doctor_name.as_ref()) },
        DetailField { label: "Doctor Reg No", value: or_na(data.doctor_reg_no.as_ref()) },
        DetailField { label: "Hospital", value: or_na(data.hospital_name.as_ref()) },
        DetailField { label: "Document Type", value: or_na(data.document_type.as_ref()) },
    ]
}

fn confidence(score: Option<f64>) -> ConfidenceGauge {
    let score = score.filter(|s| s.is_finite()).unwrap_or(0.0);
    ConfidenceGauge {
        percent: format::percent_one_decimal(score),
        label: format::percent_label(score),
        fill: score.clamp(0.0, 1.0),
        high: score > HIGH_CONFIDENCE,
    }
}

/// Map a claim to its display sections.
pub fn render(claim: &Claim, document: DocumentView) -> DisplaySections<'_> {
    let extracted = claim.extracted_data.as_ref();
    DisplaySections {
        header: header(claim),
        reasons: (!claim.rejection_reasons.is_empty()).then(|| ReasonsPanel {
            title: "Adjudication Logic Applied",
            reasons: &claim.rejection_reasons,
        }),
        necessity: extracted.map(necessity),
        details: extracted.map(details),
        confidence: confidence(claim.confidence_score),
        line_items: LineItemTable {
            items: claim.line_items(),
        },
        document,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(status: ClaimStatus) -> Claim {
        Claim {
            claim_id: "CLM-TEST".into(),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn status_tones() {
        assert_eq!(Tone::for_status(&ClaimStatus::Approved), Tone::Positive);
        assert_eq!(Tone::for_status(&ClaimStatus::Rejected), Tone::Negative);
        assert_eq!(Tone::for_status(&ClaimStatus::Partial), Tone::Warning);
        assert_eq!(Tone::for_status(&ClaimStatus::ManualReview), Tone::Neutral);
        assert_eq!(Tone::for_status(&ClaimStatus::Other("HOLD".into())), Tone::Neutral);
    }

    #[test]
    fn empty_claim_renders_defaults() {
        let c = Claim::default();
        let s = render(&c, DocumentView::NotAvailable);
        assert_eq!(s.header.claim_id, NOT_AVAILABLE);
        assert_eq!(s.header.status_label, "UNKNOWN");
        assert_eq!(s.header.approved, "₹0");
        assert_eq!(s.header.original.as_deref(), Some("₹0"));
        assert!(s.reasons.is_none());
        assert!(s.necessity.is_none());
        assert!(s.details.is_none());
        assert_eq!(s.confidence.label, "0.0%");
        assert!(s.line_items.is_empty());
        assert_eq!(s.line_items.rows().count(), 0);
    }

    #[test]
    fn rejected_strikes_and_shows_original() {
        let mut c = claim(ClaimStatus::Rejected);
        c.total_amount = Some(5000.0);
        c.approved_amount = Some(0.0);
        let s = render(&c, DocumentView::NotAvailable);
        assert!(s.header.approved_struck);
        assert_eq!(s.header.original.as_deref(), Some("₹5,000"));
    }

    #[test]
    fn partial_shows_original_without_strike() {
        let mut c = claim(ClaimStatus::Partial);
        c.total_amount = Some(3000.0);
        c.approved_amount = Some(2700.0);
        let s = render(&c, DocumentView::NotAvailable);
        assert!(!s.header.approved_struck);
        assert_eq!(s.header.approved, "₹2,700");
        assert_eq!(s.header.original.as_deref(), Some("₹3,000"));
    }

    #[test]
    fn extracted_fields_default_to_na() {
        let mut c = claim(ClaimStatus::Approved);
        c.extracted_data = Some(ExtractedData {
            patient_name: Some("Priya Shah".into()),
            diagnosis: Some(String::new()),
            hospital_name: Some("Apollo Hospitals".into()),
            medical_necessity_check: NecessityCheck::Fail,
            ..Default::default()
        });
        let s = render(&c, DocumentView::NotAvailable);
        let details = s.details.unwrap();
        assert_eq!(details[0].value, "Priya Shah");
        assert_eq!(details[2].value, NOT_AVAILABLE);
        assert_eq!(details[4].label, "Doctor Reg No");
        assert_eq!(details[5].label, "Hospital");
        assert_eq!(details[5].value, "Apollo Hospitals");
        assert_eq!(details[6].label, "Document Type");
        assert_eq!(details[6].value, NOT_AVAILABLE);
        let nec = s.necessity.unwrap();
        assert_eq!(nec.check.label(), "FAIL");
        assert_eq!(nec.tone, Tone::Warning);
        assert_eq!(nec.reason, NO_REASONING);
    }

    #[test]
    fn line_items_are_restartable_and_ordered() {
        let mut c = claim(ClaimStatus::Approved);
        c.extracted_data = Some(ExtractedData {
            line_items: vec![
                LineItem { item: "Consultation".into(), cost: Some(1000.0) },
                LineItem { item: String::new(), cost: None },
                LineItem { item: "MRI".into(), cost: Some(4500.5) },
            ],
            ..Default::default()
        });
        let s = render(&c, DocumentView::NotAvailable);
        let first: Vec<_> = s.line_items.rows().collect();
        let second: Vec<_> = s.line_items.rows().collect();
        assert_eq!(first, second);
        assert_eq!(s.line_items.rows().len(), 3);
        assert_eq!(first[0].description, "Consultation");
        assert_eq!(first[1].description, NOT_AVAILABLE);
        assert_eq!(first[1].cost, "₹0");
        assert_eq!(first[2].cost, "₹4,500.5");
    }

    #[test]
    fn confidence_gauge_thresholds() {
        assert!(confidence(Some(0.81)).high);
        assert!(!confidence(Some(0.8)).high);
        assert_eq!(confidence(Some(1.7)).fill, 1.0);
        assert_eq!(confidence(Some(f64::NAN)).label, "0.0%");
    }

    #[test]
    fn placeholder_only_when_missing() {
        assert!(DocumentView::NotAvailable.placeholder().is_some());
        let remote = DocumentView::Remote {
            file_path: "uploads/a.png".into(),
            url: "https://x/uploads/a.png".into(),
        };
        assert!(remote.placeholder().is_none());
    }
}
