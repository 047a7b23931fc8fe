//! Partitioned record source.
//!
//! Crawl output arrives as a directory of tab-separated partition files,
//! one `date \t title \t url` row per crawled page. Partitions are visited
//! in lexicographic file-name order and rows in file order, so an
//! unchanged input set replays identically. Dedup is content-keyed; the
//! stable order just keeps test runs deterministic.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use politograph_common::{PolitographError, RawRecord};

pub struct RecordSource {
    partitions: Vec<PathBuf>,
}

impl RecordSource {
    /// Enumerate the partition files under `dir`. Hidden files and
    /// subdirectories are ignored.
    pub fn open(dir: &Path) -> Result<Self, PolitographError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            PolitographError::Source(format!("cannot read partitions dir {}: {e}", dir.display()))
        })?;

        let mut partitions: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                PolitographError::Source(format!("cannot list {}: {e}", dir.display()))
            })?;
            let path = entry.path();
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));
            if path.is_file() && !hidden {
                partitions.push(path);
            }
        }
        partitions.sort();

        info!(dir = %dir.display(), partitions = partitions.len(), "Opened record source");
        Ok(Self { partitions })
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Lazily yield every record across all partitions. An unreadable
    /// partition or a ragged row is logged and skipped, never fatal.
    pub fn records(&self) -> impl Iterator<Item = RawRecord> + '_ {
        self.partitions
            .iter()
            .flat_map(|path| partition_records(path))
    }
}

fn partition_records(path: &Path) -> Box<dyn Iterator<Item = RawRecord>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!(partition = %path.display(), error = %e, "Skipping unreadable partition");
            return Box::new(std::iter::empty());
        }
    };

    let owned = path.to_path_buf();
    let rows = BufReader::new(file)
        .lines()
        .enumerate()
        .filter_map(move |(idx, line)| {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(
                        partition = %owned.display(),
                        row = idx + 1,
                        error = %e,
                        "Skipping unreadable row"
                    );
                    return None;
                }
            };
            if line.is_empty() {
                return None;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 3 {
                warn!(
                    partition = %owned.display(),
                    row = idx + 1,
                    fields = fields.len(),
                    "Skipping ragged row"
                );
                return None;
            }

            Some(RawRecord {
                date: fields[0].to_string(),
                title: fields[1].to_string(),
                url: fields[2].to_string(),
            })
        });

    Box::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_partition(dir: &Path, name: &str, rows: &[&str]) {
        let mut f = File::create(dir.join(name)).unwrap();
        for row in rows {
            writeln!(f, "{row}").unwrap();
        }
    }

    #[test]
    fn visits_partitions_in_lexicographic_order() {
        let dir = tempfile::tempdir().unwrap();
        write_partition(dir.path(), "b.tsv", &["2020-01-02\tsegundo título\thttp://x/2"]);
        write_partition(dir.path(), "a.tsv", &["2020-01-01\tprimeiro título\thttp://x/1"]);

        let source = RecordSource::open(dir.path()).unwrap();
        let titles: Vec<String> = source.records().map(|r| r.title).collect();
        assert_eq!(titles, vec!["primeiro título", "segundo título"]);
    }

    #[test]
    fn skips_ragged_and_empty_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_partition(
            dir.path(),
            "part.tsv",
            &[
                "2020-01-01\tCosta responde a Passos\thttp://x/1",
                "linha sem separadores",
                "",
                "2020-01-02\toutro título válido\thttp://x/2",
            ],
        );

        let source = RecordSource::open(dir.path()).unwrap();
        let records: Vec<RawRecord> = source.records().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "http://x/1");
        assert_eq!(records[1].date, "2020-01-02");
    }

    #[test]
    fn ignores_hidden_files_and_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        write_partition(dir.path(), "part.tsv", &["2020-01-01\tum título qualquer\thttp://x/1"]);
        write_partition(dir.path(), ".hidden", &["2020-01-01\tescondido\thttp://x/9"]);
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let source = RecordSource::open(dir.path()).unwrap();
        assert_eq!(source.partition_count(), 1);
        assert_eq!(source.records().count(), 1);
    }

    #[test]
    fn missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(RecordSource::open(&missing).is_err());
    }
}
