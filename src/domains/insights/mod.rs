//! Insights domain module.
//!
//! Holds the in-process memo of free-text business insights. The memo is
//! created empty at startup, grows through the `append-insight` tool and is
//! read back through the `memo://insights` resource. Nothing is persisted.

mod memo;

pub use memo::{EMPTY_MEMO, INSIGHTS_URI, InsightMemo};
