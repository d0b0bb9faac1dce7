use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use threaddrop_common::{Batch, BatchEntry, CanonicalAddress, ThreadDropError, BATCH_SIZE};

/// Partition `addresses` into consecutive batches of [`BATCH_SIZE`], each entry paired with `amount`.
pub fn plan_batches(addresses: &[CanonicalAddress], amount: u64) -> Vec<Batch> {
    addresses
        .chunks(BATCH_SIZE)
        .enumerate()
        .map(|(index, chunk)| Batch {
            index,
            entries: chunk
                .iter()
                .map(|address| BatchEntry {
                    address: address.clone(),
                    amount,
                })
                .collect(),
        })
        .collect()
}

/// Writes batches as `batch-<n>.txt` files, one `"<address>, <amount>"` line per entry.
///
/// Files are opened in append mode. Running twice against the same directory
/// appends a second copy of every line; clear the directory between runs.
pub struct BatchWriter {
    dir: PathBuf,
}

impl BatchWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if needed and append every batch. Returns the files touched.
    pub fn write(&self, batches: &[Batch]) -> Result<Vec<PathBuf>, ThreadDropError> {
        fs::create_dir_all(&self.dir).map_err(|e| ThreadDropError::filesystem(&self.dir, e))?;

        let mut paths = Vec::with_capacity(batches.len());
        for batch in batches {
            let path = self.dir.join(batch.file_name());
            append_batch(&path, batch).map_err(|e| ThreadDropError::filesystem(&path, e))?;
            tracing::info!(path = %path.display(), entries = batch.len(), "Wrote batch");
            paths.push(path);
        }
        Ok(paths)
    }
}

fn append_batch(path: &Path, batch: &Batch) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);
    for entry in &batch.entries {
        writeln!(out, "{}", entry.to_line())?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_address;
    use threaddrop_common::validate_address;

    fn addresses(n: usize) -> Vec<CanonicalAddress> {
        (0..n)
            .map(|i| validate_address(&fixture_address(i)).into_canonical().unwrap())
            .collect()
    }

    #[test]
    fn partitions_into_hundreds_with_remainder_last() {
        let batches = plan_batches(&addresses(250), 7);

        let sizes: Vec<_> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        let indexes: Vec<_> = batches.iter().map(|b| b.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert!(batches.iter().flat_map(|b| &b.entries).all(|e| e.amount == 7));
    }

    #[test]
    fn batch_count_is_ceiling_of_n_over_hundred() {
        for n in [0usize, 1, 99, 100, 101, 199, 200, 301] {
            let batches = plan_batches(&addresses(n), 1);
            assert_eq!(batches.len(), n.div_ceil(BATCH_SIZE), "n = {n}");
            if let Some((last, full)) = batches.split_last() {
                assert!(full.iter().all(|b| b.len() == BATCH_SIZE));
                let expected_last = if n % BATCH_SIZE == 0 { BATCH_SIZE } else { n % BATCH_SIZE };
                assert_eq!(last.len(), expected_last);
            }
        }
    }

    #[test]
    fn global_position_maps_to_batch_index() {
        let addrs = addresses(230);
        let batches = plan_batches(&addrs, 1);
        for (pos, addr) in addrs.iter().enumerate() {
            let batch = &batches[pos / BATCH_SIZE];
            assert_eq!(&batch.entries[pos % BATCH_SIZE].address, addr);
        }
    }

    #[test]
    fn writes_lines_in_expected_format() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        let writer = BatchWriter::new(&out);

        let paths = writer.write(&plan_batches(&addresses(3), 42)).unwrap();

        assert_eq!(paths, vec![out.join("batch-0.txt")]);
        let content = fs::read_to_string(&paths[0]).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in &lines {
            let (addr, amount) = line.split_once(", ").unwrap();
            assert_eq!(addr.len(), 42);
            assert_eq!(amount, "42");
            assert!(!amount.ends_with(','));
        }
        assert!(content.ends_with("42\n"));
    }

    #[test]
    fn rerun_appends_to_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = BatchWriter::new(dir.path());
        let batches = plan_batches(&addresses(2), 1);

        writer.write(&batches).unwrap();
        writer.write(&batches).unwrap();

        let content = fs::read_to_string(dir.path().join("batch-0.txt")).unwrap();
        assert_eq!(content.lines().count(), 4);
    }

    #[test]
    fn unwritable_directory_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file in the way").unwrap();

        let err = BatchWriter::new(&blocker)
            .write(&plan_batches(&addresses(1), 1))
            .unwrap_err();

        assert!(matches!(err, ThreadDropError::Filesystem { .. }));
    }
}
