//! Insights memo resource definition.

use super::ResourceDefinition;
use crate::domains::insights::INSIGHTS_URI;
use crate::domains::resources::service::ResourceContent;

/// The accumulated insights, rendered at read time.
pub struct InsightsMemoResource;

impl ResourceDefinition for InsightsMemoResource {
    const URI: &'static str = INSIGHTS_URI;
    const NAME: &'static str = "Business Insights Memo";
    const DESCRIPTION: &'static str = "Memo contendo insights acumulados";
    const MIME_TYPE: &'static str = "text/plain";

    fn content() -> ResourceContent {
        ResourceContent::Insights
    }
}
