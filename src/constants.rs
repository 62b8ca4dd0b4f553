//! Application constants and configuration

pub const APP_NAME: &str = "DermaScan Records";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Records root directory name under the documents directory
pub const RECORDS_DIR_NAME: &str = "DermaScanRecords";
pub const RECORDS_FILE_NAME: &str = "records.csv";
pub const IMAGES_DIR_NAME: &str = "Images";

// Record file columns
pub const COL_ID: &str = "ID";
pub const COL_IMAGE_PATH: &str = "ImagePath";
pub const COL_RESULT_COUNT: &str = "ResultCount";
pub const COL_MODEL: &str = "Model";
pub const COL_TYPE: &str = "Type";
pub const COL_CONFIDENCE: &str = "Confidence";
pub const COL_TIMESTAMP: &str = "Timestamp";

/// Confidence above this is shown in the "good" tier
pub const CONFIDENCE_GOOD_ABOVE: f64 = 0.85;
/// Confidence above this (and not good) is shown in the "warn" tier
pub const CONFIDENCE_WARN_ABOVE: f64 = 0.7;

pub const LABEL_NO_RESULT: &str = "No Result";
pub const LABEL_EMPTY_HISTORY: &str = "No Result Found";

/// Share of the available height the record list may take before it scrolls
pub const DEFAULT_LIST_MAX_FRACTION: f32 = 0.75;

/// Seed the store with sample records instead of reading from disk
pub const MOCK_RECORDS_ENV: &str = "MOCK_RECORDS";
/// Records root used in preview mode, under the app data dir
pub const MOCK_RECORDS_DIR_NAME: &str = "mock-records";
