//! Duplicate-detector snapshots, stored as JSON Lines: one bucket per line.
//!
//! ```text
//! {"zobrist":1234,"signatures":[{"zobrist":1234,"weak":56,"plies":80}]}
//! ```

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::duplicates::GameSignature;

/// One bucket of a duplicate detector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub zobrist: u64,
    pub signatures: Vec<GameSignature>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("could not access snapshot {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed snapshot record on line {line}: {source}")]
    Malformed {
        line: usize,
        source: serde_json::Error,
    },
}

/// Reads every record of a snapshot file. A missing file holds no records.
///
/// # Errors
/// Fails if the file cannot be read, or if a non-blank line is not a valid record.
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Vec<SnapshotRecord>, SnapshotError> {
    let path = path.as_ref();
    let io_error = |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            log::info!("No snapshot at {}, starting empty", path.display());
            return Ok(vec![]);
        }
        Err(error) => return Err(io_error(error)),
    };

    let mut records = vec![];
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| SnapshotError::Malformed {
            line: index + 1,
            source,
        })?;
        records.push(record)
    }
    log::info!("Read {} snapshot records from {}", records.len(), path.display());
    Ok(records)
}

/// Writes records to a snapshot file, replacing its content.
///
/// # Errors
/// Fails if the file cannot be created or written.
pub fn write_snapshot<'a>(
    path: impl AsRef<Path>,
    records: impl IntoIterator<Item = &'a SnapshotRecord>,
) -> Result<usize, SnapshotError> {
    let path = path.as_ref();
    let io_error = |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    let mut written = 0;
    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(|error| io_error(error.into()))?;
        writeln!(writer).map_err(io_error)?;
        written += 1
    }
    writer.flush().map_err(io_error)?;
    log::info!("Wrote {written} snapshot records to {}", path.display());
    Ok(written)
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(zobrist: u64, plies: &[u32]) -> SnapshotRecord {
        SnapshotRecord {
            zobrist,
            signatures: plies
                .iter()
                .map(|&plies| GameSignature {
                    zobrist,
                    weak: 7,
                    plies,
                })
                .collect(),
        }
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dups.jsonl");
        let records = vec![record(1, &[10, 12]), record(u64::MAX, &[3])];
        assert_eq!(write_snapshot(&path, &records).unwrap(), 2);
        assert_eq!(read_snapshot(&path).unwrap(), records);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_snapshot(dir.path().join("absent.jsonl")).unwrap(), vec![]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dups.jsonl");
        std::fs::write(
            &path,
            "\n{\"zobrist\":5,\"signatures\":[{\"zobrist\":5,\"weak\":1,\"plies\":2}]}\n\n",
        )
        .unwrap();
        let expected = SnapshotRecord {
            zobrist: 5,
            signatures: vec![GameSignature {
                zobrist: 5,
                weak: 1,
                plies: 2,
            }],
        };
        assert_eq!(read_snapshot(&path).unwrap(), vec![expected]);
    }

    #[test]
    fn corrupt_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dups.jsonl");
        std::fs::write(&path, "{\"zobrist\":5,\"signatures\":[]}\nnot json\n").unwrap();
        match read_snapshot(&path) {
            Err(SnapshotError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected a malformed record error, got {other:?}"),
        }
    }
}
