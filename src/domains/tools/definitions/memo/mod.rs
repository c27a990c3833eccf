//! Memo tools: write side of the insights memo.

pub mod append_insight;

pub use append_insight::{AppendInsightParams, AppendInsightTool};
