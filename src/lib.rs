//! # testman
//!
//! An API-driven test-automation harness: reads table-shaped test suite
//! files, issues HTTP requests against a web service under test, decides
//! pass/fail per row with the response-verdict engine, and emits an HTML
//! report plus a console summary.

pub mod config;
pub mod error;
pub mod history;
pub mod http;
pub mod report;
pub mod runner;
pub mod storage;
pub mod suite;
pub mod verdict;

pub use error::HarnessError;
