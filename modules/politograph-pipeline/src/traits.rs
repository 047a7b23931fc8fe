// Trait seam for the remote classification stages.
//
// The production implementation is `ClassifierClient`; tests inject a
// scripted classifier with call counters, no network.

use async_trait::async_trait;

use classifier_client::{ClassifierClient, Result};
use politograph_common::{RelationshipVerdict, RelevanceVerdict};

#[async_trait]
pub trait TitleClassifier: Send + Sync {
    /// Stage 1: relevance score pair for a normalized title.
    async fn classify_relevance(&self, title: &str) -> Result<RelevanceVerdict>;

    /// Stage 2: relation between the two entities in the title. Only
    /// called after a strictly positive relevance verdict.
    async fn classify_relationship(&self, title: &str) -> Result<RelationshipVerdict>;
}

#[async_trait]
impl TitleClassifier for ClassifierClient {
    async fn classify_relevance(&self, title: &str) -> Result<RelevanceVerdict> {
        self.classify_relevance(title).await
    }

    async fn classify_relationship(&self, title: &str) -> Result<RelationshipVerdict> {
        self.classify_relationship(title).await
    }
}
