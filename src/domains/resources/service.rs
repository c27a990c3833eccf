//! Resource service implementation.
//!
//! The ResourceService owns the registered resources and renders their
//! content from live state on every read.

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::error::ResourceError;
use super::registry::get_all_resources;
use crate::domains::insights::InsightMemo;

/// Service for listing and reading resources.
pub struct ResourceService {
    /// Registry of available resources.
    /// Key: resource URI, Value: resource metadata
    resources: HashMap<String, ResourceEntry>,

    /// Backing state of the insights memo resource.
    memo: Arc<InsightMemo>,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// The content provider for this resource.
    pub content: ResourceContent,
}

/// Live state a resource is rendered from on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceContent {
    /// The insights memo.
    Insights,
}

impl ResourceService {
    /// Create a new ResourceService reading the given memo.
    pub fn new(memo: Arc<InsightMemo>) -> Self {
        info!("Initializing ResourceService");

        let mut service = Self {
            resources: HashMap::new(),
            memo,
        };

        for entry in get_all_resources() {
            service.register_resource(entry);
        }

        service
    }

    fn register_resource(&mut self, entry: ResourceEntry) {
        info!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    /// List all available resources, ordered by URI.
    pub async fn list_resources(&self) -> Vec<Resource> {
        let mut resources: Vec<Resource> = self
            .resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect();
        resources.sort_by(|a, b| a.raw.uri.cmp(&b.raw.uri));
        resources
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self
            .resources
            .get(uri)
            .ok_or_else(|| ResourceError::not_found(uri))?;

        let text = match &entry.content {
            ResourceContent::Insights => self.memo.render().await,
        };

        let mut content = ResourceContents::text(text, uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut content {
            *mime_type = entry.resource.raw.mime_type.clone();
        }

        Ok(ReadResourceResult {
            contents: vec![content],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::insights::{EMPTY_MEMO, INSIGHTS_URI};

    fn text_of(result: &ReadResourceResult) -> String {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text.clone(),
            other => panic!("unexpected contents {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resource_service_lists_memo() {
        let service = ResourceService::new(Arc::new(InsightMemo::new()));

        let resources = service.list_resources().await;
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].raw.uri, INSIGHTS_URI);
    }

    #[tokio::test]
    async fn test_read_empty_memo() {
        let service = ResourceService::new(Arc::new(InsightMemo::new()));

        let result = service.read_resource(INSIGHTS_URI).await.unwrap();
        assert_eq!(text_of(&result), EMPTY_MEMO);
    }

    #[tokio::test]
    async fn test_read_reflects_appends() {
        let memo = Arc::new(InsightMemo::new());
        let service = ResourceService::new(memo.clone());

        memo.append("x").await;
        assert_eq!(text_of(&service.read_resource(INSIGHTS_URI).await.unwrap()), "• x");

        memo.append("y").await;
        assert_eq!(
            text_of(&service.read_resource(INSIGHTS_URI).await.unwrap()),
            "• x\n• y"
        );
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let service = ResourceService::new(Arc::new(InsightMemo::new()));

        let result = service.read_resource("memo://nothing").await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }
}
