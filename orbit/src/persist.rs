//! Writing fetched records to the work directory.
//!
//! Every file is written to a temp name in the target directory and renamed
//! into place, so readers never see a partially written record file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::query::{Format, RequestClass};
use crate::record::Row;
use crate::{Error, Result};

/// Prefix shared by every file the persister writes.
pub const FILE_PREFIX: &str = "spacetrack_record_";

/// How a result set is laid out on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistMode {
    /// The whole result set in one file.
    #[default]
    Batch,
    /// One file per record.
    PerRow,
}

/// Temp path next to `final_path`: `{dir}/.tmp.{random}.{filename}`.
fn temp_path(final_path: &Path) -> PathBuf {
    let filename = final_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("record");
    let random: u64 = rand::random();
    final_path.with_file_name(format!(".tmp.{:016x}.{}", random, filename))
}

/// Write `content` to `final_path` via a temp file and rename.
fn write_atomic(final_path: &Path, content: &[u8]) -> io::Result<()> {
    let temp = temp_path(final_path);
    fs::write(&temp, content)?;
    if let Err(e) = fs::rename(&temp, final_path) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Persister {
    dir: PathBuf,
    mode: PersistMode,
    format: Format,
}

impl Persister {
    pub fn new(dir: impl Into<PathBuf>, mode: PersistMode, format: Format) -> Self {
        Self {
            dir: dir.into(),
            mode,
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a batch file, or for the `index`th record in per-row mode.
    pub fn file_name(&self, class: RequestClass, index: Option<usize>) -> String {
        match index {
            Some(i) => format!(
                "{}{}_{:08}.{}",
                FILE_PREFIX,
                class.file_tag(),
                i,
                self.format.extension()
            ),
            None => format!("{}{}.{}", FILE_PREFIX, class.file_tag(), self.format.extension()),
        }
    }

    /// Remove record files left by a previous run. Returns how many were removed.
    pub fn cleanup(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let is_record = name.to_str().is_some_and(|n| n.starts_with(FILE_PREFIX));
            if !is_record || !entry.file_type()?.is_file() {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => warn!("could not remove {}: {}", entry.path().display(), e),
            }
        }

        debug!("removed {} old record files from {}", removed, self.dir.display());
        Ok(removed)
    }

    /// Write `rows` to the work directory, replacing earlier record files.
    pub fn persist(&self, class: RequestClass, rows: &[Row]) -> Result<Vec<PathBuf>> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(Error::InvalidPath(self.dir.clone()));
        }
        fs::create_dir_all(&self.dir)?;
        self.cleanup()?;

        let mut written = Vec::new();
        match self.mode {
            PersistMode::Batch => {
                let path = self.dir.join(self.file_name(class, None));
                write_atomic(&path, &codec::encode(class, rows, self.format)?)?;
                written.push(path);
            }
            PersistMode::PerRow => {
                for (i, row) in rows.iter().enumerate() {
                    let path = self.dir.join(self.file_name(class, Some(i)));
                    let content = codec::encode(class, std::slice::from_ref(row), self.format)?;
                    write_atomic(&path, &content)?;
                    written.push(path);
                }
            }
        }

        info!(
            "persisted {} {} records into {} files under {}",
            rows.len(),
            class,
            written.len(),
            self.dir.display()
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                let value = json!({"NORAD_CAT_ID": (25544 + i).to_string(), "OBJECT_NAME": "SAT"});
                serde_json::from_value(value).unwrap()
            })
            .collect()
    }

    fn record_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_temp_path() {
        let final_path = Path::new("/tmp/records/spacetrack_record_gp.json");
        let temp = temp_path(final_path);
        assert_eq!(temp.parent(), final_path.parent());
        let name = temp.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".tmp."));
        assert!(name.ends_with(".spacetrack_record_gp.json"));
    }

    #[test]
    fn test_write_atomic_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert_eq!(record_files(tmp.path()), vec!["out.json"]);
    }

    #[test]
    fn test_file_names() {
        let persister = Persister::new("/tmp", PersistMode::Batch, Format::Csv);
        assert_eq!(persister.file_name(RequestClass::Gp, None), "spacetrack_record_gp.csv");
        assert_eq!(
            persister.file_name(RequestClass::CdmPublic, Some(7)),
            "spacetrack_record_cdm_00000007.csv"
        );
    }

    #[test]
    fn test_persist_batch() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("records");
        let persister = Persister::new(&dir, PersistMode::Batch, Format::Json);

        let written = persister.persist(RequestClass::Gp, &rows(3)).unwrap();
        assert_eq!(written, vec![dir.join("spacetrack_record_gp.json")]);

        let stored: Vec<Row> = serde_json::from_slice(&fs::read(&written[0]).unwrap()).unwrap();
        assert_eq!(stored.len(), 3);
    }

    #[test]
    fn test_persist_per_row() {
        let tmp = TempDir::new().unwrap();
        let persister = Persister::new(tmp.path(), PersistMode::PerRow, Format::Xml);

        let written = persister.persist(RequestClass::Decay, &rows(3)).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(
            record_files(tmp.path()),
            vec![
                "spacetrack_record_decay_00000000.xml",
                "spacetrack_record_decay_00000001.xml",
                "spacetrack_record_decay_00000002.xml",
            ]
        );
        let second = fs::read_to_string(&written[1]).unwrap();
        assert!(second.contains("<NORAD_CAT_ID>25545</NORAD_CAT_ID>"));
        assert_eq!(second.matches("<item>").count(), 1);
    }

    #[test]
    fn test_persist_replaces_previous_records() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("spacetrack_record_gp_00000009.html"), "old").unwrap();
        fs::write(tmp.path().join("notes.txt"), "keep").unwrap();

        let persister = Persister::new(tmp.path(), PersistMode::Batch, Format::Csv);
        persister.persist(RequestClass::Gp, &rows(1)).unwrap();

        assert_eq!(
            record_files(tmp.path()),
            vec!["notes.txt", "spacetrack_record_gp.csv"]
        );
    }

    #[test]
    fn test_cleanup_counts_and_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let persister = Persister::new(tmp.path().join("absent"), PersistMode::Batch, Format::Json);
        assert_eq!(persister.cleanup().unwrap(), 0);

        fs::write(tmp.path().join("spacetrack_record_a.json"), "").unwrap();
        fs::write(tmp.path().join("spacetrack_record_b.json"), "").unwrap();
        let persister = Persister::new(tmp.path(), PersistMode::Batch, Format::Json);
        assert_eq!(persister.cleanup().unwrap(), 2);
    }

    #[test]
    fn test_persist_into_file_path_fails() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir");
        fs::write(&file, "").unwrap();

        let persister = Persister::new(&file, PersistMode::Batch, Format::Json);
        let result = persister.persist(RequestClass::Gp, &rows(1));
        assert!(matches!(result, Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_persist_mode_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: PersistMode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"per-row\"").unwrap();
        assert_eq!(parsed.mode, PersistMode::PerRow);
    }
}
