//! Pipeline orchestrator.
//!
//! Drives every raw record through one pass:
//! normalize → short-title gate → dedup gate → relevance classification →
//! (conditionally) relationship classification → ledger append. Each
//! record reaches exactly one terminal state; the ledger append is the
//! only side effect.
//!
//! Classification calls for distinct titles may run concurrently up to a
//! bound; appends stay serialized on this task and happen in completion
//! order. A fingerprint enters `scheduled` before its calls are issued,
//! so two identical titles can never be in flight at once and
//! first-write-wins holds without a second ledger probe.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use classifier_client::{ClassifierClient, ClassifierError};
use politograph_common::{
    fingerprint, Config, ProcessedEntry, RawRecord, RelationshipVerdict, RelevanceVerdict,
};

use crate::ledger::Ledger;
use crate::normalizer;
use crate::source::RecordSource;
use crate::stats::PipelineStats;
use crate::traits::TitleClassifier;

pub struct Pipeline {
    source: RecordSource,
    ledger: Ledger,
    classifier: Box<dyn TitleClassifier>,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(
        source: RecordSource,
        ledger: Ledger,
        classifier: Box<dyn TitleClassifier>,
        concurrency: usize,
    ) -> Self {
        Self {
            source,
            ledger,
            classifier,
            concurrency: concurrency.max(1),
        }
    }

    /// Wire up the production pipeline from explicit configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = RecordSource::open(&config.partitions_dir)?;
        let ledger = Ledger::load(&config.ledger_path)?;
        let client = ClassifierClient::with_timeout(
            &config.relevancy_url,
            &config.relationship_url,
            Duration::from_secs(config.request_timeout_secs),
        );
        Ok(Self::new(source, ledger, Box::new(client), config.concurrency))
    }

    /// Run one full pass over the record source.
    pub async fn run(&mut self) -> Result<PipelineStats> {
        let run_id = Uuid::new_v4();
        let concurrency = self.concurrency;
        info!(
            %run_id,
            partitions = self.source.partition_count(),
            already_processed = self.ledger.len(),
            concurrency,
            "Starting pipeline run"
        );

        let mut stats = PipelineStats::default();
        let classifier = self.classifier.as_ref();
        let ledger = &mut self.ledger;
        let mut records = self.source.records();

        let mut in_flight = FuturesUnordered::new();
        let mut scheduled: HashSet<u64> = HashSet::new();
        let mut exhausted = false;

        loop {
            while !exhausted && in_flight.len() < concurrency {
                let Some(record) = records.next() else {
                    exhausted = true;
                    break;
                };
                stats.records_read += 1;

                let normalized = normalizer::normalize(&record.title);
                if normalizer::token_count(&normalized) <= 2 {
                    stats.skipped_short += 1;
                    continue;
                }

                let fp = fingerprint(&normalized);
                if ledger.contains(fp) || scheduled.contains(&fp) {
                    stats.skipped_duplicate += 1;
                    continue;
                }

                scheduled.insert(fp);
                in_flight.push(classify_one(classifier, record, normalized, fp));
            }

            let Some(outcome) = in_flight.next().await else {
                break;
            };
            scheduled.remove(&outcome.fingerprint);

            match outcome.result {
                Ok((relevance, relationship)) => {
                    if relationship.is_some() {
                        stats.relevant += 1;
                    } else {
                        stats.irrelevant += 1;
                    }

                    let entry = ProcessedEntry {
                        fingerprint: outcome.fingerprint,
                        record: outcome.record,
                        normalized_title: outcome.normalized_title,
                        relevance,
                        relationship,
                        processed_at: Utc::now(),
                    };
                    ledger.append(&entry)?;
                    stats.persisted += 1;
                }
                Err(ClassifierError::MalformedResponse(e)) => {
                    stats.malformed_responses += 1;
                    warn!(
                        title = %outcome.record.title,
                        url = %outcome.record.url,
                        error = %e,
                        "Malformed classification response, record skipped"
                    );
                }
                Err(e) => {
                    stats.service_errors += 1;
                    warn!(
                        title = %outcome.record.title,
                        url = %outcome.record.url,
                        error = %e,
                        "Classification failed, record skipped"
                    );
                }
            }
        }

        info!(%run_id, persisted = stats.persisted, "Pipeline run complete");
        Ok(stats)
    }
}

struct ClassificationOutcome {
    record: RawRecord,
    normalized_title: String,
    fingerprint: u64,
    result: classifier_client::Result<(RelevanceVerdict, Option<RelationshipVerdict>)>,
}

/// Both remote stages for one title. The relationship stage is only
/// reached on a strictly positive relevance verdict; a tie short-circuits.
async fn classify_one(
    classifier: &dyn TitleClassifier,
    record: RawRecord,
    normalized_title: String,
    fingerprint: u64,
) -> ClassificationOutcome {
    let result = async {
        let relevance = classifier.classify_relevance(&normalized_title).await?;
        let relationship = if relevance.is_relevant() {
            Some(classifier.classify_relationship(&normalized_title).await?)
        } else {
            None
        };
        Ok((relevance, relationship))
    }
    .await;

    ClassificationOutcome {
        record,
        normalized_title,
        fingerprint,
        result,
    }
}
