use serde::{Deserialize, Serialize};

/// Signed number of events between two cursors of the same partition
pub type CursorDistance = i64;

/// Position within one partition.
///
/// `offset` is an opaque server-defined token. It is never compared or
/// incremented locally; positional questions go through the server.
/// Cursors delivered on a subscription stream also carry the event type and
/// a cursor token, both of which must be passed back verbatim on commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub partition: String,
    pub offset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_token: Option<String>,
}

impl Cursor {
    pub fn new(partition: impl Into<String>, offset: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            offset: offset.into(),
            event_type: None,
            cursor_token: None,
        }
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_cursor_token(mut self, token: impl Into<String>) -> Self {
        self.cursor_token = Some(token.into());
        self
    }

    /// Same partition of the same event type.
    ///
    /// The event type only takes part in the comparison when both cursors
    /// know it.
    pub fn same_partition(&self, other: &Cursor) -> bool {
        if self.partition != other.partition {
            return false;
        }
        match (&self.event_type, &other.event_type) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Partition and offset only, the shape the event-type endpoints expect
    pub fn to_event_type_cursor(&self) -> Cursor {
        Cursor::new(self.partition.clone(), self.offset.clone())
    }
}

/// Anything that can name the cursor it was produced from.
///
/// Outputs of the processing stage implement this so the pipeline knows what
/// to commit.
pub trait HasCursor {
    fn cursor(&self) -> &Cursor;
}

impl HasCursor for Cursor {
    fn cursor(&self) -> &Cursor {
        self
    }
}

impl<C: HasCursor + ?Sized> HasCursor for Box<C> {
    fn cursor(&self) -> &Cursor {
        (**self).cursor()
    }
}
