use std::env;
use std::path::PathBuf;

/// Pipeline configuration. Built from environment variables by the binary
/// and handed to the orchestrator at construction; nothing in the pipeline
/// reads process-wide state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Relevance stage endpoint.
    pub relevancy_url: String,

    /// Relationship stage endpoint.
    pub relationship_url: String,

    /// Directory of tab-separated partition files.
    pub partitions_dir: PathBuf,

    /// Append-only ledger of processed titles.
    pub ledger_path: PathBuf,

    /// Max classification calls in flight. 1 = strict single-stream.
    pub concurrency: usize,

    /// Per-request timeout in seconds for both classification stages.
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            relevancy_url: required_env("RELEVANCY_URL"),
            relationship_url: required_env("RELATIONSHIP_URL"),
            partitions_dir: PathBuf::from(required_env("PARTITIONS_DIR")),
            ledger_path: PathBuf::from(
                env::var("LEDGER_PATH").unwrap_or_else(|_| "processed_titles.jsonl".to_string()),
            ),
            concurrency: env::var("PIPELINE_CONCURRENCY")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .expect("PIPELINE_CONCURRENCY must be a number"),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("REQUEST_TIMEOUT_SECS must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
