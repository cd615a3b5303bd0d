use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec;
use crate::error::{LedgerError, Result};
use crate::record::Ledger;

/// How [`LedgerFile::save_with`] writes the ledger back to disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    /// Truncate the ledger in place and rewrite it. A crash mid-write can
    /// leave a partial file.
    #[default]
    Truncate,
    /// Write a temporary file next to the ledger and rename it over the
    /// original. The result on success is byte-identical to `Truncate`.
    AtomicReplace,
}

/// A ledger file on disk.
///
/// The handle holds only the path; every [`load`](Self::load) reads the file
/// fresh and nothing is cached between calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerFile {
    path: PathBuf,
}

impl LedgerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger, creating an empty file if none exists.
    ///
    /// A malformed line aborts the load with [`LedgerError::Decode`] naming
    /// the line and this file's path.
    pub fn load(&self) -> Result<Ledger> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|source| LedgerError::Open {
                path: self.path.clone(),
                source,
            })?;

        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|source| LedgerError::Read {
                path: self.path.clone(),
                source,
            })?;

        let ledger = codec::decode(&text).map_err(|e| LedgerError::Decode {
            path: self.path.clone(),
            line: e.line,
            kind: e.kind,
        })?;

        for record in &ledger {
            debug!(name = %record.name, build_count = record.build_count, "ledger record");
        }
        debug!(path = %self.path.display(), records = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    /// Save with [`SaveMode::Truncate`].
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        self.save_with(ledger, SaveMode::Truncate)
    }

    /// Rewrite the whole ledger from `ledger`, in record order.
    pub fn save_with(&self, ledger: &Ledger, mode: SaveMode) -> Result<()> {
        let text = codec::encode(ledger);
        match mode {
            SaveMode::Truncate => self.write_truncate(text.as_bytes())?,
            SaveMode::AtomicReplace => self.write_atomic(text.as_bytes())?,
        }
        debug!(path = %self.path.display(), records = ledger.len(), ?mode, "ledger saved");
        Ok(())
    }

    fn write_truncate(&self, bytes: &[u8]) -> Result<()> {
        let write_err = |source| LedgerError::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = File::create(&self.path).map_err(write_err)?;
        file.write_all(bytes).map_err(write_err)?;
        Ok(())
    }

    fn write_atomic(&self, bytes: &[u8]) -> Result<()> {
        let write_err = |source| LedgerError::Write {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        // The temp file is created owner-only; keep the ledger's own mode.
        if let Ok(existing) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(write_err)?;
        }
        tmp.write_all(bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path)
            .map_err(|e| LedgerError::Persist {
                path: self.path.clone(),
                source: e.error,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::codec::DecodeErrorKind;
    use crate::record::LedgerRecord;

    fn sample() -> Ledger {
        vec![LedgerRecord::new("main", 4), LedgerRecord::new("util", 1)].into()
    }

    #[test]
    fn load_missing_file_creates_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".identisaurus.rawr");
        assert!(!path.exists());

        let ledger = LedgerFile::new(&path).load().unwrap();
        assert!(ledger.is_empty());
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn load_reads_records_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.rawr");
        fs::write(&path, "# counts\nzeta, 2\nalpha, 9\n").unwrap();

        let ledger = LedgerFile::new(&path).load().unwrap();
        assert_eq!(
            ledger.records(),
            &[LedgerRecord::new("zeta", 2), LedgerRecord::new("alpha", 9)]
        );
    }

    #[test]
    fn load_reports_path_and_line_on_bad_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.rawr");
        fs::write(&path, "main, 1\n\nname, notanumber\n").unwrap();

        let err = LedgerFile::new(&path).load().unwrap_err();
        match &err {
            LedgerError::Decode { path: p, line, kind } => {
                assert_eq!(p, &path);
                assert_eq!(*line, 3);
                assert_eq!(kind, &DecodeErrorKind::InvalidCount("notanumber".into()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("line 3"));
        assert!(message.contains("bad.rawr"));
    }

    #[test]
    fn load_fails_when_parent_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("counts.rawr");
        let err = LedgerFile::new(&path).load().unwrap_err();
        assert!(matches!(err, LedgerError::Open { .. }));
    }

    #[test]
    fn save_truncates_and_drops_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.rawr");
        fs::write(&path, "# a long comment that should vanish\nmain, 3\nold, 100\n").unwrap();

        let file = LedgerFile::new(&path);
        let mut ledger = file.load().unwrap();
        ledger.records_mut()[0].build_count = 4;
        file.save(&ledger).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "main, 4\nold, 100\n");
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let file = LedgerFile::new(dir.path().join("counts.rawr"));

        file.save(&sample()).unwrap();
        let loaded = file.load().unwrap();
        assert_eq!(loaded, sample());

        file.save(&loaded).unwrap();
        assert_eq!(file.load().unwrap(), sample());
    }

    #[test]
    fn atomic_replace_matches_truncate_output() {
        let dir = tempfile::tempdir().unwrap();
        let truncated = LedgerFile::new(dir.path().join("a.rawr"));
        let replaced = LedgerFile::new(dir.path().join("b.rawr"));
        fs::write(replaced.path(), "# stale\nstale, 1\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(replaced.path(), fs::Permissions::from_mode(0o664)).unwrap();
        }

        truncated.save_with(&sample(), SaveMode::Truncate).unwrap();
        replaced.save_with(&sample(), SaveMode::AtomicReplace).unwrap();

        assert_eq!(
            fs::read(truncated.path()).unwrap(),
            fs::read(replaced.path()).unwrap()
        );
        // Only the two ledgers remain; the temp file was renamed away.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(replaced.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o664);
        }
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = LedgerFile::new(dir.path().join("nope").join("counts.rawr"));
        let err = file.save(&sample()).unwrap_err();
        assert!(matches!(err, LedgerError::Write { .. }));
    }

    #[test]
    fn save_mode_serde_names() {
        assert_eq!(serde_json::to_string(&SaveMode::AtomicReplace).unwrap(), "\"atomic_replace\"");
        assert_eq!(
            serde_json::from_str::<SaveMode>("\"truncate\"").unwrap(),
            SaveMode::Truncate
        );
    }
}
