//! HTTP client for the geo-reg classification backend.

pub mod http;

pub use http::{ApiClient, ApiError, LawEntry, LawMeta, SearchDoc};
