//! Dataset export to a JSON file

use crate::storage::{DatasetSink, StorageResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every dataset record to `path` as a pretty-printed JSON array
///
/// Returns the number of records written.
pub fn export_dataset(sink: &dyn DatasetSink, path: &Path) -> StorageResult<usize> {
    let items = sink.dataset_items()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &items)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, Record};
    use serde_json::{json, Value};

    #[test]
    fn test_export_writes_json_array() {
        let store = MemoryStore::new();
        let mut record = Record::new();
        record.insert("title".to_string(), json!("A video"));
        store.push_data(record).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("dataset.json");
        let written = export_dataset(&store, &path).unwrap();
        assert_eq!(written, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, json!([{ "title": "A video" }]));
    }

    #[test]
    fn test_export_empty_dataset() {
        let store = MemoryStore::new();
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(export_dataset(&store, file.path()).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(file.path()).unwrap().trim(), "[]");
    }
}
