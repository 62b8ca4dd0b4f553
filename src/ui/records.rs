//! Record list projection
//!
//! Turns the store's record set into what the list shows: which records are
//! visible, their labels and confidence badges, and the footer text. Kept free
//! of egui so it can be checked without a UI context.

use crate::constants::{LABEL_EMPTY_HISTORY, LABEL_NO_RESULT};
use crate::types::{ConfidenceTier, ScanRecord};

/// Confidence badge shown next to the timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub tier: ConfidenceTier,
}

/// Everything a card needs besides the thumbnail texture
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCard<'a> {
    pub record: &'a ScanRecord,
    pub label: &'a str,
    pub badge: Option<Badge>,
}

/// Records that may be shown, in store order
pub fn visible_records(records: &[ScanRecord]) -> impl Iterator<Item = &ScanRecord> {
    records.iter().filter(|r| !r.is_placeholder())
}

pub fn cards(records: &[ScanRecord]) -> Vec<RecordCard<'_>> {
    visible_records(records)
        .map(|record| RecordCard {
            record,
            label: card_label(record),
            badge: badge(record),
        })
        .collect()
}

pub fn card_label(record: &ScanRecord) -> &str {
    if record.has_result() {
        &record.kind
    } else {
        LABEL_NO_RESULT
    }
}

/// Badge for records with a result; none when nothing was found
pub fn badge(record: &ScanRecord) -> Option<Badge> {
    if !record.has_result() {
        return None;
    }
    Some(Badge {
        text: format!("{}%", percent(record.confidence)),
        tier: ConfidenceTier::from_confidence(record.confidence),
    })
}

pub fn percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

pub fn footer_text(visible: usize) -> String {
    if visible == 0 {
        LABEL_EMPTY_HISTORY.to_string()
    } else {
        format!("{} Scan Results", visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, result_count: u32, kind: &str, confidence: f64) -> ScanRecord {
        ScanRecord {
            id: id.to_string(),
            image_path: format!("{id}.jpg"),
            result_count,
            model_version: "1.0".to_string(),
            kind: kind.to_string(),
            confidence,
            timestamp: "2025-03-07 15:32".to_string(),
        }
    }

    #[test]
    fn melanoma_card() {
        let records = vec![record("20250307104530", 1, "Melanoma", 0.96)];
        let cards = cards(&records);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].label, "Melanoma");
        assert_eq!(
            cards[0].badge,
            Some(Badge {
                text: "96%".to_string(),
                tier: ConfidenceTier::Good
            })
        );
    }

    #[test]
    fn no_result_card_has_no_badge() {
        let r = record("20250307104645", 0, "", 0.0);
        assert_eq!(card_label(&r), "No Result");
        assert_eq!(badge(&r), None);
    }

    #[test]
    fn no_result_ignores_type_and_confidence() {
        let r = record("1", 0, "Melanoma", 0.99);
        assert_eq!(card_label(&r), "No Result");
        assert_eq!(badge(&r), None);
    }

    #[test]
    fn placeholders_never_shown() {
        let records = vec![
            record("", 1, "Melanoma", 0.9),
            record("1", 1, "Nevus", 0.8),
            record("", 0, "", 0.0),
            record("2", 0, "", 0.0),
        ];
        let ids: Vec<_> = cards(&records).iter().map(|c| c.record.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(footer_text(visible_records(&records).count()), "2 Scan Results");

        let only_placeholders = vec![record("", 1, "Melanoma", 0.9)];
        assert!(cards(&only_placeholders).is_empty());
        assert_eq!(footer_text(visible_records(&only_placeholders).count()), "No Result Found");
    }

    #[test]
    fn badge_tiers_at_boundaries() {
        let tier = |c: f64| badge(&record("1", 1, "Nevus", c)).map(|b| b.tier);
        assert_eq!(tier(0.85), Some(ConfidenceTier::Warn));
        assert_eq!(tier(0.86), Some(ConfidenceTier::Good));
        assert_eq!(tier(0.70), Some(ConfidenceTier::Bad));
        assert_eq!(tier(0.71), Some(ConfidenceTier::Warn));
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(percent(0.96), 96);
        assert_eq!(percent(0.996), 100);
        assert_eq!(percent(0.004), 0);
        assert_eq!(percent(1.0), 100);
    }

    #[test]
    fn footer_counts() {
        assert_eq!(footer_text(0), "No Result Found");
        assert_eq!(footer_text(1), "1 Scan Results");
        assert_eq!(footer_text(12), "12 Scan Results");
    }
}
