//! Sample records for running the viewer without a records root (MOCK_RECORDS)

use crate::constants::MOCK_RECORDS_DIR_NAME;
use crate::store::{RecordPaths, RecordStore};
use crate::types::ScanRecord;
use std::path::Path;

/// Store seeded with the samples, rooted under the app data dir so clear and
/// reload never reach the real history
pub fn preview_store(data_dir: &Path) -> RecordStore {
    let paths = RecordPaths::new(data_dir.join(MOCK_RECORDS_DIR_NAME));
    RecordStore::with_records(paths, sample_records())
}

pub fn sample_records() -> Vec<ScanRecord> {
    vec![
        ScanRecord {
            id: "20250307104530".to_string(),
            image_path: "Melanoma".to_string(),
            result_count: 1,
            model_version: "1.0".to_string(),
            kind: "Melanoma".to_string(),
            confidence: 0.96,
            timestamp: "2025-03-07  15:32".to_string(),
        },
        ScanRecord {
            id: "20250307104645".to_string(),
            image_path: "Melanoma".to_string(),
            result_count: 0,
            model_version: "1.0".to_string(),
            kind: String::new(),
            confidence: 0.0,
            timestamp: "2025-03-07  10:08".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::ui::records::cards;
    use tempfile::tempdir;

    #[test]
    fn samples_cover_result_and_no_result() {
        let records = sample_records();
        let cards = cards(&records);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].label, "Melanoma");
        assert!(cards[0].badge.is_some());
        assert_eq!(cards[1].label, "No Result");
        assert!(cards[1].badge.is_none());
    }

    #[test]
    fn clearing_preview_leaves_real_history() {
        let dir = tempdir().expect("Failed to create temp dir");
        let data_dir = dir.path().join("data");
        let real_root = dir.path().join("records");

        let real = RecordPaths::new(&real_root);
        std::fs::create_dir_all(real.images_dir()).unwrap();
        std::fs::write(real.records_file(), "ID\n1\n").unwrap();
        std::fs::write(real.image_file("a.jpg"), b"jpeg").unwrap();

        let settings = Settings {
            records_root: Some(real_root.to_string_lossy().into_owned()),
            ..Default::default()
        };
        assert_eq!(settings.records_root_or_default(), real_root);

        let mut store = preview_store(&data_dir);
        assert_eq!(store.records().len(), 2);
        assert!(store.paths().root().starts_with(&data_dir));

        store.clear();
        assert!(store.records().is_empty());
        assert!(real.records_file().exists());
        assert!(real.image_file("a.jpg").exists());
    }
}
