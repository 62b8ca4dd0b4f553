//! Common types and data structures

use crate::constants::{CONFIDENCE_GOOD_ABOVE, CONFIDENCE_WARN_ABOVE};

/// A single completed scan, as stored in one row of the record file
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    /// Timestamp-derived identifier; empty marks a placeholder row
    pub id: String,
    /// Thumbnail filename, relative to the images directory
    pub image_path: String,
    pub result_count: u32,
    pub model_version: String,
    /// Diagnosis label (`Type` column)
    pub kind: String,
    pub confidence: f64,
    /// Display-only time string
    pub timestamp: String,
}

impl ScanRecord {
    /// Placeholder rows are kept by the store but never rendered
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }

    pub fn has_result(&self) -> bool {
        self.result_count > 0
    }
}

/// Colour tier of a confidence badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    Good,
    Warn,
    Bad,
}

impl ConfidenceTier {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > CONFIDENCE_GOOD_ABOVE {
            ConfidenceTier::Good
        } else if confidence > CONFIDENCE_WARN_ABOVE {
            ConfidenceTier::Warn
        } else {
            ConfidenceTier::Bad
        }
    }
}

/// Outcome of deleting one on-disk resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStatus {
    Removed,
    Absent,
    Failed(String),
}

impl DeleteStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, DeleteStatus::Failed(_))
    }
}

/// Per-resource result of clearing history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearReport {
    pub records_file: DeleteStatus,
    pub images_dir: DeleteStatus,
}

impl ClearReport {
    /// True when nothing is left behind on disk
    pub fn is_complete(&self) -> bool {
        !self.records_file.is_failed() && !self.images_dir.is_failed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(ConfidenceTier::from_confidence(0.85), ConfidenceTier::Warn);
        assert_eq!(ConfidenceTier::from_confidence(0.86), ConfidenceTier::Good);
        assert_eq!(ConfidenceTier::from_confidence(0.70), ConfidenceTier::Bad);
        assert_eq!(ConfidenceTier::from_confidence(0.71), ConfidenceTier::Warn);
        assert_eq!(ConfidenceTier::from_confidence(0.0), ConfidenceTier::Bad);
        assert_eq!(ConfidenceTier::from_confidence(1.0), ConfidenceTier::Good);
    }

    #[test]
    fn clear_report_completeness() {
        let ok = ClearReport {
            records_file: DeleteStatus::Removed,
            images_dir: DeleteStatus::Absent,
        };
        assert!(ok.is_complete());

        let partial = ClearReport {
            records_file: DeleteStatus::Removed,
            images_dir: DeleteStatus::Failed("permission denied".into()),
        };
        assert!(!partial.is_complete());
    }

    #[test]
    fn placeholder_detection() {
        let record = ScanRecord {
            id: String::new(),
            image_path: String::new(),
            result_count: 0,
            model_version: String::new(),
            kind: String::new(),
            confidence: 0.0,
            timestamp: String::new(),
        };
        assert!(record.is_placeholder());
        assert!(!record.has_result());
    }
}
