use async_trait::async_trait;
use insightflow_client::{InsightClient, InsightError, InsightParams, InsightResultSet};

/// Seam between the feed and the fetch layer.
///
/// Production code hands the feed an [`InsightClient`]; tests substitute a
/// scripted source to control results and count calls.
#[async_trait]
pub trait InsightSource: Send + Sync + 'static {
    async fn fetch(&self, params: &InsightParams) -> Result<InsightResultSet, InsightError>;
}

#[async_trait]
impl InsightSource for InsightClient {
    async fn fetch(&self, params: &InsightParams) -> Result<InsightResultSet, InsightError> {
        self.run_flow(params).await
    }
}
