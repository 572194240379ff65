//! AI spending summaries for the expense-tracking API.
//!
//! This module contains the [SummaryGenerator] that talks to the external
//! text-generation service and the endpoint handler that exposes it.

mod endpoint;
mod generator;

pub use endpoint::get_ai_summary_endpoint;
pub use generator::{EMPTY_SUMMARY_MESSAGE, SummaryGenerator};
