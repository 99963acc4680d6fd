use crate::cursor::{Cursor, CursorDistance};
use serde::{Deserialize, Serialize};

/// Retained offset range of one partition of an event type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub partition: String,
    pub oldest_available_offset: String,
    pub newest_available_offset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unconsumed_events: Option<u64>,
}

impl Partition {
    pub fn oldest_cursor(&self) -> Cursor {
        Cursor::new(self.partition.clone(), self.oldest_available_offset.clone())
    }

    /// Cursor pointing at the newest event currently in the partition
    pub fn newest_cursor(&self) -> Cursor {
        Cursor::new(self.partition.clone(), self.newest_available_offset.clone())
    }
}

/// Request item for the server-side shift lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftedCursor {
    pub partition: String,
    pub offset: String,
    pub shift: i64,
}

impl ShiftedCursor {
    pub fn new(cursor: &Cursor, shift: i64) -> Self {
        Self {
            partition: cursor.partition.clone(),
            offset: cursor.offset.clone(),
            shift,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorDistanceQuery {
    pub initial_cursor: Cursor,
    pub final_cursor: Cursor,
}

impl CursorDistanceQuery {
    pub fn new(initial: &Cursor, final_: &Cursor) -> Self {
        Self {
            initial_cursor: initial.to_event_type_cursor(),
            final_cursor: final_.to_event_type_cursor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorDistanceResult {
    pub initial_cursor: Cursor,
    pub final_cursor: Cursor,
    pub distance: CursorDistance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_cursors() {
        let json = r#"{"partition":"2","oldest_available_offset":"001-0001-000000000000000000","newest_available_offset":"001-0001-000000000000000041"}"#;
        let partition: Partition = serde_json::from_str(json).unwrap();

        assert_eq!(partition.newest_cursor().offset, "001-0001-000000000000000041");
        assert_eq!(partition.oldest_cursor().partition, "2");
        assert_eq!(partition.unconsumed_events, None);
    }

    #[test]
    fn test_distance_query_uses_plain_cursors() {
        let a = Cursor::new("0", "1").with_cursor_token("t");
        let b = Cursor::new("0", "2").with_event_type("orders");
        let query = CursorDistanceQuery::new(&a, &b);

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["initial_cursor"], serde_json::json!({"partition":"0","offset":"1"}));
        assert_eq!(json["final_cursor"], serde_json::json!({"partition":"0","offset":"2"}));
    }
}
