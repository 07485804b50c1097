//! Wire type for the remote history API.

use serde::{Deserialize, Serialize};

use tally_core::HistoryEntry;

/// A history record as the remote stores it: `{"expression": ..., "result": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryItem {
    pub expression: String,
    pub result: String,
}

impl HistoryItem {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }
}

impl From<&HistoryEntry> for HistoryItem {
    fn from(entry: &HistoryEntry) -> Self {
        Self::new(entry.expression(), entry.result())
    }
}

impl From<HistoryItem> for HistoryEntry {
    fn from(item: HistoryItem) -> Self {
        HistoryEntry::new(item.expression, item.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let item = HistoryItem::new("3 + 4", "7");
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"expression":"3 + 4","result":"7"}"#);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let item: HistoryItem =
            serde_json::from_str(r#"{"id":12,"expression":"1 + 1","result":"2"}"#).unwrap();
        assert_eq!(item, HistoryItem::new("1 + 1", "2"));
    }

    #[test]
    fn test_entry_conversion_keeps_identity() {
        let entry = HistoryEntry::new("5 \u{00f7} 0", "undefined");
        let item = HistoryItem::from(&entry);
        assert_eq!(HistoryEntry::from(item), entry);
    }
}
