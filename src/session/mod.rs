use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use log::info;

use crate::ledger::EntryKind;
use crate::money::Amount;

pub(crate) type ChatId = i64;

/// Where a guided entry currently stands
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stage {
    AwaitingAmount,
    AwaitingCategory { amount: Amount },
    AwaitingDescription { amount: Amount, category: String },
}

/// An unfinished entry for one conversation
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Session {
    pub(crate) kind: EntryKind,
    pub(crate) stage: Stage,
    last_activity: DateTime<Utc>,
}

/// Open sessions keyed by conversation. A session idle for longer than the timeout is
/// discarded the next time its conversation sends anything.
pub(crate) struct Sessions {
    timeout: Duration,
    sessions: HashMap<ChatId, Session>,
}

impl Sessions {
    pub(crate) fn new(timeout: Duration) -> Sessions {
        Sessions { timeout, sessions: HashMap::new() }
    }

    /// Take the live session of a conversation out of the store
    pub(crate) fn take(&mut self, chat_id: ChatId, now: DateTime<Utc>) -> Option<Session> {
        let session = self.sessions.remove(&chat_id)?;
        if now - session.last_activity > self.timeout {
            info!("Discarding {} entry of chat {} idle since {}", session.kind, chat_id, session.last_activity);
            return None;
        }
        Some(session)
    }

    /// Store a session for its next step, marking it active at `now`
    pub(crate) fn put(&mut self, chat_id: ChatId, kind: EntryKind, stage: Stage, now: DateTime<Utc>) {
        self.sessions.insert(chat_id, Session { kind, stage, last_activity: now });
    }

    pub(crate) fn remove(&mut self, chat_id: ChatId) {
        self.sessions.remove(&chat_id);
    }

    #[cfg(test)]
    pub(crate) fn get(&self, chat_id: ChatId) -> Option<&Session> {
        self.sessions.get(&chat_id)
    }
}
