use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{self, Document};

/// One saved note. `content` holds the serialized document tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
    pub fn new(id: String, title: String, content: String) -> Self {
        Self {
            id,
            title,
            content,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Decode the stored content. Total: malformed content falls back to a
    /// single empty paragraph.
    pub fn document(&self) -> Document {
        document::deserialize(&self.content)
    }
}
