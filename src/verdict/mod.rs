//! # Response-Verdict Engine
//!
//! Decides whether a test step passed or failed, given the decoded JSON
//! body returned by the service under test and the step's expected
//! status/error codes.
//!
//! Split in two:
//! - [`classifier`] recognizes the response envelope shape and extracts
//!   the fields that matter for the decision.
//! - [`evaluator`] applies the precedence rules over those facts and
//!   produces a [`Verdict`].

mod classifier;
mod evaluator;

pub use classifier::{BATCH_KEYS, BatchRecord, Envelope, ResultShape};
pub use evaluator::{Verdict, evaluate};
