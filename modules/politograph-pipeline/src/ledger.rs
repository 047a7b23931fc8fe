//! Append-only ledger of processed titles.
//!
//! One JSON entry per line; the fingerprint set loaded from it gates all
//! classification work, so a ledger the process cannot trust is the one
//! fatal condition in the pipeline. A malformed line is tolerated only in
//! final position, where it reads as a write truncated by a crash: the
//! partial record is discarded on load and the title it belonged to is
//! simply reprocessed on this run.
//!
//! Appends persist before the fingerprint becomes visible in memory. A
//! crash between the two leaves the entry durable and the fingerprint
//! unseen for the rest of the run only; the next `load` picks it up.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::{info, warn};

use politograph_common::{PolitographError, ProcessedEntry};

#[derive(Debug)]
pub struct Ledger {
    file: File,
    seen: HashSet<u64>,
}

impl Ledger {
    /// Rebuild the fingerprint set from `path` and open it for appends.
    /// A missing file is an empty ledger, not an error.
    pub fn load(path: &Path) -> Result<Self, PolitographError> {
        let mut seen = HashSet::new();

        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            // A parse failure is only diagnosable once we know whether
            // anything follows it, so it is held until the next line.
            let mut pending: Option<(usize, String)> = None;

            for (idx, line) in reader.lines().enumerate() {
                let line = line?;
                if let Some((bad_idx, err)) = pending.take() {
                    return Err(PolitographError::CorruptLedger(format!(
                        "{}: line {}: {err}",
                        path.display(),
                        bad_idx + 1
                    )));
                }
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<ProcessedEntry>(&line) {
                    Ok(entry) => {
                        seen.insert(entry.fingerprint);
                    }
                    Err(e) => pending = Some((idx, e.to_string())),
                }
            }

            if let Some((bad_idx, err)) = pending {
                warn!(
                    ledger = %path.display(),
                    line = bad_idx + 1,
                    error = %err,
                    "Discarding truncated trailing ledger record"
                );
            }

            info!(ledger = %path.display(), entries = seen.len(), "Loaded processed titles");
        } else {
            info!(ledger = %path.display(), "No ledger yet, starting empty");
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self { file, seen })
    }

    /// O(1) membership check against everything loaded at startup plus
    /// everything appended so far in this run.
    pub fn contains(&self, fingerprint: u64) -> bool {
        self.seen.contains(&fingerprint)
    }

    /// Durably persist one entry, then mark its fingerprint as seen,
    /// in that order.
    pub fn append(&mut self, entry: &ProcessedEntry) -> Result<(), PolitographError> {
        let line = serde_json::to_string(entry)?;
        writeln!(self.file, "{line}")?;
        self.file.flush()?;
        self.seen.insert(entry.fingerprint);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use politograph_common::{fingerprint, RawRecord, RelevanceVerdict};

    fn entry(title: &str) -> ProcessedEntry {
        ProcessedEntry {
            fingerprint: fingerprint(title),
            record: RawRecord {
                date: "2020-01-01".to_string(),
                title: title.to_string(),
                url: "http://x/1".to_string(),
            },
            normalized_title: title.to_string(),
            relevance: RelevanceVerdict {
                relevant: 0.2,
                non_relevant: 0.8,
            },
            relationship: None,
            processed_at: Utc::now(),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::load(&dir.path().join("ledger.jsonl")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn append_then_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");

        let e1 = entry("costa responde a passos");
        let e2 = entry("rio critica o governo");
        {
            let mut ledger = Ledger::load(&path).unwrap();
            ledger.append(&e1).unwrap();
            ledger.append(&e2).unwrap();
            assert!(ledger.contains(e1.fingerprint));
        }

        let reloaded = Ledger::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(e1.fingerprint));
        assert!(reloaded.contains(e2.fingerprint));
    }

    #[test]
    fn truncated_trailing_record_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");

        let e1 = entry("costa responde a passos");
        {
            let mut ledger = Ledger::load(&path).unwrap();
            ledger.append(&e1).unwrap();
        }
        // Simulate a crash mid-append: a partial JSON object with no
        // closing brace and no newline.
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "{{\"fingerprint\": 42, \"record\"").unwrap();

        let reloaded = Ledger::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains(e1.fingerprint));
        assert!(!reloaded.contains(42));
    }

    #[test]
    fn malformed_interior_record_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");

        let e1 = entry("costa responde a passos");
        let e2 = entry("rio critica o governo");
        {
            let mut ledger = Ledger::load(&path).unwrap();
            ledger.append(&e1).unwrap();
        }
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "not json at all").unwrap();
        }
        {
            // A valid record after the garbage makes the corruption
            // interior rather than a truncated tail.
            let line = serde_json::to_string(&e2).unwrap();
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{line}").unwrap();
        }

        let err = Ledger::load(&path).unwrap_err();
        assert!(matches!(err, PolitographError::CorruptLedger(_)));
    }

    #[test]
    fn append_is_visible_within_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let mut ledger = Ledger::load(&path).unwrap();

        let e = entry("costa responde a passos");
        assert!(!ledger.contains(e.fingerprint));
        ledger.append(&e).unwrap();
        assert!(ledger.contains(e.fingerprint));
    }
}
