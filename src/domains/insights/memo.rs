//! Append-only insight memo.

use tokio::sync::RwLock;

/// URI under which the memo is exposed as a resource.
pub const INSIGHTS_URI: &str = "memo://insights";

/// Rendered text of a memo with no entries.
pub const EMPTY_MEMO: &str = "No insights yet.";

/// Ordered list of insights, shared by reference between the tools and
/// resources services for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InsightMemo {
    entries: RwLock<Vec<String>>,
}

impl InsightMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one insight and return the number of entries afterwards.
    pub async fn append(&self, insight: impl Into<String>) -> usize {
        let mut entries = self.entries.write().await;
        entries.push(insight.into());
        entries.len()
    }

    /// `• <insight>` lines in append order, or [`EMPTY_MEMO`].
    pub async fn render(&self) -> String {
        let entries = self.entries.read().await;
        if entries.is_empty() {
            return EMPTY_MEMO.to_string();
        }

        entries
            .iter()
            .map(|entry| format!("• {}", entry))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_empty_memo_renders_sentinel() {
        let memo = InsightMemo::new();
        assert_eq!(memo.render().await, EMPTY_MEMO);
    }

    #[tokio::test]
    async fn test_single_insight() {
        let memo = InsightMemo::new();
        assert_eq!(memo.append("x").await, 1);
        assert_eq!(memo.render().await, "• x");
    }

    #[tokio::test]
    async fn test_append_order_is_kept() {
        let memo = InsightMemo::new();
        memo.append("primeiro").await;
        memo.append("segundo").await;
        assert_eq!(memo.render().await, "• primeiro\n• segundo");
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let memo = Arc::new(InsightMemo::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let memo = memo.clone();
                tokio::spawn(async move { memo.append(format!("insight {i}")).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(memo.append("last").await, 17);
        assert_eq!(memo.render().await.lines().count(), 17);
    }
}
