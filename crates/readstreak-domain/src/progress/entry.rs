use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{BookId, ProgressEntryId, SessionId};

/// One recorded reading event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    id: ProgressEntryId,
    book_id: BookId,
    session_id: Option<SessionId>,
    pages_read: u32,
    progress_timestamp: DateTime<Utc>,
}

impl ProgressEntry {
    pub fn new(
        book_id: BookId,
        session_id: Option<SessionId>,
        pages_read: u32,
        progress_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ProgressEntryId::new(),
            book_id,
            session_id,
            pages_read,
            progress_timestamp,
        }
    }

    pub fn restore(
        id: ProgressEntryId,
        book_id: BookId,
        session_id: Option<SessionId>,
        pages_read: u32,
        progress_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            book_id,
            session_id,
            pages_read,
            progress_timestamp,
        }
    }

    pub fn id(&self) -> &ProgressEntryId {
        &self.id
    }

    pub fn book_id(&self) -> &BookId {
        &self.book_id
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn pages_read(&self) -> u32 {
        self.pages_read
    }

    pub fn progress_timestamp(&self) -> DateTime<Utc> {
        self.progress_timestamp
    }
}
