//! OPD Console Core: claim domain types, backend client, and view state machines.
//!
//! This crate holds everything the terminal console does that is not drawing:
//! - Lenient decoding of claim and stats records
//! - The `ClaimsApi` client trait with HTTP and in-memory implementations
//! - Upload, history and dashboard state machines with cancellation scopes
//! - The pure claim renderer shared by the submission and history views
//! - Console configuration and the displayed policy terms

pub mod api;
pub mod cancel;
pub mod config;
pub mod dashboard;
pub mod document;
pub mod domain;
pub mod format;
pub mod history;
pub mod load;
pub mod policy;
pub mod render;
pub mod upload;
