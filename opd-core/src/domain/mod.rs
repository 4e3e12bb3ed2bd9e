//! Domain types: claims, extracted data, dashboard statistics.

pub mod claim;
pub mod lenient;
pub mod stats;

pub use claim::{Claim, ClaimStatus, ExtractedData, LineItem, NecessityCheck};
pub use stats::DashboardStats;
