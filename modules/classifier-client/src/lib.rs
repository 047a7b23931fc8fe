pub mod error;

pub use error::{ClassifierError, Result};

use std::time::Duration;

use tracing::debug;

use politograph_common::{RelationshipVerdict, RelevanceVerdict};

/// Client for the two title classification stages. Both stages take the
/// normalized title as a `news_title` query parameter and answer JSON.
/// Stateless: network I/O only, no retries; retry policy belongs to the
/// caller.
pub struct ClassifierClient {
    client: reqwest::Client,
    relevancy_url: String,
    relationship_url: String,
}

impl ClassifierClient {
    pub fn new(relevancy_url: &str, relationship_url: &str) -> Self {
        Self::with_timeout(relevancy_url, relationship_url, Duration::from_secs(30))
    }

    /// A call exceeding `timeout` fails as `ServiceUnavailable`, never
    /// hangs the pipeline.
    pub fn with_timeout(relevancy_url: &str, relationship_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            relevancy_url: relevancy_url.trim_end_matches('/').to_string(),
            relationship_url: relationship_url.trim_end_matches('/').to_string(),
        }
    }

    /// Stage 1: is this title a relevant two-entity political interaction?
    pub async fn classify_relevance(&self, title: &str) -> Result<RelevanceVerdict> {
        debug!(title, "relevance request");
        self.get_json(&self.relevancy_url, title).await
    }

    /// Stage 2: which relation holds between the two entities in the title.
    /// Callers only invoke this after a strictly positive relevance verdict.
    pub async fn classify_relationship(&self, title: &str) -> Result<RelationshipVerdict> {
        debug!(title, "relationship request");
        self.get_json(&self.relationship_url, title).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, title: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .query(&[("news_title", title)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ClassifierError::MalformedResponse(format!("{e}: {body}")))
    }
}
