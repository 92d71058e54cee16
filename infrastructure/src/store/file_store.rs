//! Directory-backed record store.
//!
//! Documents land at `<root>/<id>.html` or `<root>/<year>/<id>.html`. Every
//! write goes to a hidden temporary file in the target directory, is synced,
//! and is then renamed over the final path, so a reader never observes a
//! partial document.

use harvest_application::{RecordStore, StoreError};
use harvest_domain::{OutputLayout, RecordDocument, RecordId};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const TEMP_PREFIX: &str = ".harvest-";

pub struct FileRecordStore {
    layout: OutputLayout,
}

impl FileRecordStore {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl RecordStore for FileRecordStore {
    fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    fn prepare(&self) -> Result<(), StoreError> {
        let root = &self.layout.root;
        if !root.exists() {
            info!("Creating output directory {}", root.display());
        }
        fs::create_dir_all(root).map_err(Self::io_error(root))
    }

    /// Ids named by any non-hidden file under the root, at any depth
    fn persisted_ids(&self) -> Result<HashSet<RecordId>, StoreError> {
        let root = &self.layout.root;
        if !root.exists() {
            return Ok(HashSet::new());
        }

        let pattern = format!(
            "{}/**/*",
            glob::Pattern::escape(&root.to_string_lossy())
        );
        let entries = glob::glob(&pattern).map_err(|e| StoreError::Scan {
            path: root.clone(),
            reason: e.to_string(),
        })?;

        let mut ids = HashSet::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::Scan {
                path: root.clone(),
                reason: e.to_string(),
            })?;
            if !path.is_file() {
                continue;
            }
            if let Some(id) = OutputLayout::id_from_path(&path) {
                ids.insert(id);
            }
        }
        debug!("Found {} archived record(s) under {}", ids.len(), root.display());
        Ok(ids)
    }

    fn write(&self, document: &RecordDocument) -> Result<PathBuf, StoreError> {
        let path = self.layout.path_for(document)?;
        let dir = path.parent().unwrap_or(&self.layout.root);
        fs::create_dir_all(dir).map_err(Self::io_error(dir))?;

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(dir)
            .map_err(Self::io_error(dir))?;
        temp.write_all(document.to_file_contents().as_bytes())
            .map_err(Self::io_error(temp.path()))?;
        temp.as_file().sync_all().map_err(Self::io_error(&path))?;
        temp.persist(&path).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        debug!("Saved {} atomically", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_domain::record::document::BYTE_ORDER_MARK;
    use harvest_domain::{RecordPatterns, tables::DOT_COM};

    fn document(id: &str, year: Option<&str>) -> RecordDocument {
        RecordDocument {
            id: RecordId::parse(id).unwrap(),
            year: year.map(str::to_string),
            content: format!("<html>{id} Grand Total:</html>"),
        }
    }

    #[test]
    fn test_prepare_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a/b");
        let store = FileRecordStore::new(OutputLayout::new(&root, false));
        store.prepare().unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_write_flat_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(OutputLayout::new(dir.path(), false));

        let path = store.write(&document("111-2", None)).unwrap();

        assert_eq!(path, dir.path().join("111-2.html"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(BYTE_ORDER_MARK));
        assert!(written.ends_with("Grand Total:</html>"));
    }

    #[test]
    fn test_write_per_year_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(OutputLayout::new(dir.path(), true));

        let path = store.write(&document("111-2", Some("2021"))).unwrap();
        assert_eq!(path, dir.path().join("2021").join("111-2.html"));
        assert!(path.is_file());
    }

    #[test]
    fn test_write_leaves_no_temporaries() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(OutputLayout::new(dir.path(), false));
        store.write(&document("111-2", None)).unwrap();
        // Overwriting is allowed and still atomic
        store.write(&document("111-2", None)).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["111-2.html".to_string()]);
    }

    #[test]
    fn test_persisted_ids_scans_all_levels() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("2020")).unwrap();
        fs::write(root.join("111-1.html"), "x").unwrap();
        fs::write(root.join("2020").join("222-2.html"), "x").unwrap();
        fs::write(root.join("333-3.invoice.json"), "x").unwrap();
        fs::write(root.join(".harvest-abc"), "x").unwrap();

        let store = FileRecordStore::new(OutputLayout::new(root, true));
        let ids = store.persisted_ids().unwrap();

        let mut ids: Vec<_> = ids.iter().map(|id| id.as_str().to_string()).collect();
        ids.sort();
        assert_eq!(ids, vec!["111-1", "222-2", "333-3"]);
    }

    #[test]
    fn test_persisted_ids_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(OutputLayout::new(dir.path().join("missing"), false));
        assert!(store.persisted_ids().unwrap().is_empty());
    }

    #[test]
    fn test_written_record_is_seen_next_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRecordStore::new(OutputLayout::new(dir.path(), true));
        let patterns = RecordPatterns::for_profile(&DOT_COM).unwrap();
        let source = "<b>Order Placed:</b> May 1, 2020 111-9 Grand Total:".to_string();
        let doc = RecordDocument::from_page(RecordId::parse("111-9").unwrap(), source, &patterns, true)
            .unwrap();

        store.write(&doc).unwrap();
        assert!(store.persisted_ids().unwrap().contains(&doc.id));
    }
}
