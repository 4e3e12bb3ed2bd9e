//! Claim history: list fetch, client-side search and filter, detail overlay.

use tracing::debug;

use crate::api::ApiError;
use crate::cancel::CancelToken;
use crate::document::{self, DocumentRef};
use crate::domain::{Claim, ClaimStatus};
use crate::format;
use crate::load::{Fetch, LoadState};
use crate::render::{self, DisplaySections, Tone};

pub const COLUMNS: [&str; 5] = ["Claim ID", "Patient", "Date", "Amount", "Status"];

/// Status filter applied to the list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ClaimStatus),
}

impl StatusFilter {
    /// All -> APPROVED -> REJECTED -> PARTIAL -> MANUAL_REVIEW -> All.
    pub fn next(&self) -> StatusFilter {
        let known = &ClaimStatus::KNOWN;
        match self {
            StatusFilter::All => StatusFilter::Only(known[0].clone()),
            StatusFilter::Only(current) => match known.iter().position(|s| s == current) {
                Some(i) if i + 1 < known.len() => StatusFilter::Only(known[i + 1].clone()),
                _ => StatusFilter::All,
            },
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn matches(&self, claim: &Claim) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => &claim.status == status,
        }
    }
}

fn matches_query(claim: &Claim, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        Some(claim.claim_id.as_str()),
        claim.patient(),
        claim.diagnosis_text(),
        claim.service_date(),
    ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// One formatted table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub claim_id: String,
    pub patient: String,
    pub date: String,
    pub amount: String,
    pub status: String,
    pub tone: Tone,
}

impl ListRow {
    pub fn for_claim(claim: &Claim) -> Self {
        Self {
            claim_id: claim.claim_id.clone(),
            patient: claim.patient().unwrap_or("Unknown").to_string(),
            date: claim
                .created_at
                .map(|t| t.date().format("%Y-%m-%d").to_string())
                .or_else(|| claim.service_date().map(str::to_string))
                .unwrap_or_else(|| "-".to_string()),
            amount: format!(
                "{} / {}",
                format::inr(claim.approved_amount.unwrap_or(0.0)),
                format::inr(claim.total_amount.unwrap_or(0.0))
            ),
            status: claim.status.as_str().to_string(),
            tone: Tone::for_status(&claim.status),
        }
    }
}

pub struct HistoryBrowser {
    base_url: String,
    claims: Fetch<Vec<Claim>>,
    query: String,
    filter: StatusFilter,
    /// Indices into the loaded list, in server order.
    visible: Vec<usize>,
    cursor: usize,
    selected: Option<Claim>,
}

impl HistoryBrowser {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            claims: Fetch::new("claims"),
            query: String::new(),
            filter: StatusFilter::All,
            visible: Vec::new(),
            cursor: 0,
            selected: None,
        }
    }

    pub fn state(&self) -> &LoadState<Vec<Claim>> {
        self.claims.state()
    }

    /// Enter the view: closes any overlay and issues one list fetch.
    pub fn activate(&mut self) -> CancelToken {
        self.selected = None;
        self.visible.clear();
        self.cursor = 0;
        self.claims.begin()
    }

    pub fn deactivate(&mut self) {
        self.selected = None;
        self.claims.abandon();
    }

    pub fn on_loaded(&mut self, token: &CancelToken, result: Result<Vec<Claim>, ApiError>) -> bool {
        let applied = self.claims.finish(token, result);
        if applied {
            self.refilter();
        }
        applied
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        let query = query.trim();
        if query != self.query {
            self.query = query.to_string();
            self.refilter();
        }
    }

    pub fn filter(&self) -> &StatusFilter {
        &self.filter
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.refilter();
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.visible = match self.claims.state().loaded() {
            Some(claims) => claims
                .iter()
                .enumerate()
                .filter(|(_, c)| self.filter.matches(c) && matches_query(c, &needle))
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        };
        self.cursor = 0;
        debug!(
            query = %self.query,
            filter = self.filter.label(),
            visible = self.visible.len(),
            "history filtered"
        );
    }

    /// Claims after search and filter.
    pub fn visible(&self) -> impl Iterator<Item = &Claim> + '_ {
        let claims = self.claims.state().loaded().map(Vec::as_slice).unwrap_or(&[]);
        self.visible.iter().filter_map(move |&i| claims.get(i))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn rows(&self) -> Vec<ListRow> {
        self.visible().map(ListRow::for_claim).collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the row cursor, clamping at both ends.
    pub fn move_cursor(&mut self, delta: isize) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn cursor_to_end(&mut self) {
        self.cursor = self.visible.len().saturating_sub(1);
    }

    pub fn cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    /// Open the overlay for a visible row. Returns false for an out-of-range row.
    pub fn select(&mut self, row: usize) -> bool {
        let found = self.visible().nth(row).cloned();
        match found {
            Some(claim) => {
                self.cursor = row;
                self.select_claim(claim);
                true
            }
            None => false,
        }
    }

    pub fn select_cursor(&mut self) -> bool {
        self.select(self.cursor)
    }

    /// Replace the overlay content in one assignment.
    pub fn select_claim(&mut self, claim: Claim) {
        debug!(claim_id = %claim.claim_id, "claim selected");
        self.selected = Some(claim);
    }

    pub fn selected(&self) -> Option<&Claim> {
        self.selected.as_ref()
    }

    /// Close the overlay. Does not re-fetch.
    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn overlay(&self) -> Option<DisplaySections<'_>> {
        self.selected
            .as_ref()
            .map(|claim| render::render(claim, document::view_for_claim(&self.base_url, claim)))
    }

    /// Backend document for the open overlay, if it has one.
    pub fn selected_document(&self) -> Option<DocumentRef> {
        self.selected
            .as_ref()
            .and_then(|claim| DocumentRef::for_claim(&self.base_url, claim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DocumentView;

    fn claim(id: &str, status: ClaimStatus, patient: Option<&str>) -> Claim {
        Claim {
            claim_id: id.into(),
            status,
            patient_name: patient.map(String::from),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Claim> {
        vec![
            claim("CLM-A", ClaimStatus::Approved, Some("Rajesh Kumar")),
            claim("CLM-B", ClaimStatus::Rejected, Some("Priya Shah")),
            claim("CLM-C", ClaimStatus::Approved, None),
            claim("CLM-D", ClaimStatus::ManualReview, Some("Anil Rao")),
        ]
    }

    fn loaded() -> HistoryBrowser {
        let mut h = HistoryBrowser::new("https://api.example.com/");
        let token = h.activate();
        assert!(h.on_loaded(&token, Ok(sample())));
        h
    }

    fn ids(h: &HistoryBrowser) -> Vec<String> {
        h.visible().map(|c| c.claim_id.clone()).collect()
    }

    #[test]
    fn filter_cycle() {
        let mut f = StatusFilter::All;
        let mut labels = Vec::new();
        for _ in 0..5 {
            f = f.next();
            labels.push(f.label().to_string());
        }
        assert_eq!(labels, ["APPROVED", "REJECTED", "PARTIAL", "MANUAL_REVIEW", "All"]);
    }

    #[test]
    fn empty_list_is_loaded_not_failed() {
        let mut h = HistoryBrowser::new("http://h");
        let token = h.activate();
        h.on_loaded(&token, Ok(Vec::new()));
        assert!(matches!(h.state(), LoadState::Loaded(v) if v.is_empty()));
        assert!(h.rows().is_empty());
        assert!(!h.select_cursor());
    }

    #[test]
    fn fetch_failure_moves_to_failed() {
        let mut h = HistoryBrowser::new("http://h");
        let token = h.activate();
        h.on_loaded(&token, Err(ApiError::Timeout("slow".into())));
        assert!(matches!(h.state(), LoadState::Failed(_)));
    }

    #[test]
    fn search_narrows_and_clearing_restores_order() {
        let mut h = loaded();
        h.set_query("shah");
        assert_eq!(ids(&h), ["CLM-B"]);
        h.set_query("clm-");
        assert_eq!(h.visible_len(), 4);
        h.set_query("");
        assert_eq!(ids(&h), ["CLM-A", "CLM-B", "CLM-C", "CLM-D"]);
    }

    #[test]
    fn search_and_filter_combine() {
        let mut h = loaded();
        h.cycle_filter();
        assert_eq!(ids(&h), ["CLM-A", "CLM-C"]);
        h.set_query("rajesh");
        assert_eq!(ids(&h), ["CLM-A"]);
    }

    #[test]
    fn cursor_clamps_and_resets_on_filter() {
        let mut h = loaded();
        h.move_cursor(-3);
        assert_eq!(h.cursor(), 0);
        h.move_cursor(10);
        assert_eq!(h.cursor(), 3);
        h.cycle_filter();
        assert_eq!(h.cursor(), 0);
    }

    #[test]
    fn row_formatting() {
        let mut c = claim("CLM-X", ClaimStatus::Partial, None);
        c.approved_amount = Some(2700.0);
        c.total_amount = Some(3000.0);
        let row = ListRow::for_claim(&c);
        assert_eq!(row.patient, "Unknown");
        assert_eq!(row.date, "-");
        assert_eq!(row.amount, "₹2,700 / ₹3,000");
        assert_eq!(row.tone, Tone::Warning);
    }

    #[test]
    fn date_column_falls_back_to_treatment_date() {
        let mut c = claim("CLM-T", ClaimStatus::Approved, None);
        c.treatment_date = Some("2024-11-02".into());
        assert_eq!(ListRow::for_claim(&c).date, "2024-11-02");

        c.created_at = chrono::NaiveDate::from_ymd_opt(2024, 11, 5)
            .and_then(|d| d.and_hms_opt(9, 30, 0));
        assert_eq!(ListRow::for_claim(&c).date, "2024-11-05");
    }

    #[test]
    fn search_matches_treatment_date() {
        let mut dated = claim("CLM-E", ClaimStatus::Approved, None);
        dated.treatment_date = Some("2024-11-02".into());
        let mut claims = sample();
        claims.push(dated);

        let mut h = HistoryBrowser::new("http://h");
        let token = h.activate();
        h.on_loaded(&token, Ok(claims));
        h.set_query("2024-11");
        assert_eq!(ids(&h), ["CLM-E"]);
    }

    #[test]
    fn select_moves_cursor_to_row() {
        let mut h = loaded();
        assert!(h.select(2));
        assert_eq!(h.cursor(), 2);
        assert_eq!(h.selected().unwrap().claim_id, "CLM-C");
        assert!(!h.select(9));
        assert_eq!(h.cursor(), 2);
        assert_eq!(h.selected().unwrap().claim_id, "CLM-C");
    }

    #[test]
    fn selecting_replaces_overlay() {
        let mut h = loaded();
        assert!(h.select(0));
        assert!(h.select(1));
        assert_eq!(h.selected().unwrap().claim_id, "CLM-B");
        assert_eq!(h.overlay().unwrap().header.claim_id, "CLM-B");
        h.close();
        assert!(h.overlay().is_none());
        assert!(matches!(h.state(), LoadState::Loaded(_)));
    }

    #[test]
    fn overlay_document_reference() {
        let mut h = loaded();
        let mut with_file = claim("CLM-F", ClaimStatus::Approved, None);
        with_file.file_path = Some("uploads/f.png".into());
        h.select_claim(with_file);
        assert_eq!(
            h.overlay().unwrap().document,
            DocumentView::Remote {
                file_path: "uploads/f.png".into(),
                url: "https://api.example.com/uploads/f.png".into(),
            }
        );
        h.select(0);
        assert_eq!(h.overlay().unwrap().document, DocumentView::NotAvailable);
        assert!(h.selected_document().is_none());
    }

    #[test]
    fn reactivation_discards_late_response() {
        let mut h = HistoryBrowser::new("http://h");
        let first = h.activate();
        h.deactivate();
        let second = h.activate();
        assert!(!h.on_loaded(&first, Ok(sample())));
        assert!(h.state().is_loading());
        assert!(h.on_loaded(&second, Ok(Vec::new())));
    }
}
