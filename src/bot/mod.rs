pub(crate) mod menu;
#[cfg(test)]
mod tests;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{error, info};

use crate::bot::menu::{Command, Keyboard};
use crate::chart::{ChartRenderer, Image};
use crate::db::Database;
use crate::ledger::EntryKind;
use crate::report::build_report;
use crate::session::{ChatId, Session, Sessions};
use crate::workflow::{self, Step};

const SORRY: &str = "Something went wrong, please try again.";
const UNKNOWN: &str = "Unknown command. Use the buttons below.";

/// Inbound text message from a conversation
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Message {
    pub(crate) chat_id: ChatId,
    pub(crate) text: String,
}

impl Message {
    pub(crate) fn new(chat_id: ChatId, text: &str) -> Message {
        Message { chat_id, text: text.to_string() }
    }
}

/// Outbound reply for the transport to deliver
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reply {
    Text { chat_id: ChatId, text: String, keyboard: Keyboard },
    /// Images sent together as one group
    Album { chat_id: ChatId, images: Vec<Image> },
}

impl Reply {
    fn text(chat_id: ChatId, text: impl Into<String>, keyboard: Keyboard) -> Reply {
        Reply::Text { chat_id, text: text.into(), keyboard }
    }
}

/// Routes every inbound message either to a menu command or to the entry its conversation
/// is in the middle of. Messages are handled one at a time.
pub(crate) struct Bot {
    db: Database,
    sessions: Sessions,
    renderer: Box<dyn ChartRenderer>,
    greeting: String,
}

impl Bot {
    pub(crate) fn new(db: Database, sessions: Sessions, renderer: Box<dyn ChartRenderer>, greeting: &str) -> Bot {
        Bot { db, sessions, renderer, greeting: greeting.to_string() }
    }

    pub(crate) fn handle(&mut self, message: &Message) -> Vec<Reply> {
        self.handle_at(message, Utc::now())
    }

    /// Handle a message received at `now`. Internal failures are logged and answered with
    /// an apology, the conversation goes back to the main menu.
    pub(crate) fn handle_at(&mut self, message: &Message, now: DateTime<Utc>) -> Vec<Reply> {
        match self.dispatch(message, now) {
            Ok(replies) => replies,
            Err(e) => {
                error!("Failed to handle message from chat {}: {:#}", message.chat_id, e);
                self.sessions.remove(message.chat_id);
                vec![Reply::text(message.chat_id, SORRY, Keyboard::main_menu())]
            }
        }
    }

    fn dispatch(&mut self, message: &Message, now: DateTime<Utc>) -> Result<Vec<Reply>> {
        let chat_id = message.chat_id;
        let text = message.text.trim();
        let command = Command::parse(text);

        match (self.sessions.take(chat_id, now), command) {
            (_, Some(Command::Start)) => Ok(vec![Reply::text(chat_id, self.greeting.clone(), Keyboard::main_menu())]),
            (Some(session), Some(Command::Cancel)) => {
                info!("Chat {} cancelled a {} entry", chat_id, session.kind);
                Ok(vec![Reply::text(chat_id, "Cancelled.", Keyboard::home_of(session.kind))])
            }
            (Some(session), _) => self.continue_entry(chat_id, session, text, now),
            (None, Some(command)) => self.run_command(chat_id, command, now),
            (None, None) => Ok(vec![Reply::text(chat_id, UNKNOWN, Keyboard::main_menu())]),
        }
    }

    fn run_command(&mut self, chat_id: ChatId, command: Command, now: DateTime<Utc>) -> Result<Vec<Reply>> {
        let reply = match command {
            Command::NewEntry(kind) => {
                let step = workflow::start();
                return Ok(vec![self.follow(chat_id, kind, step, now)]);
            }
            Command::Report => return self.report(chat_id),
            Command::Planning => Reply::text(chat_id, "Choose what to plan:", Keyboard::planning_menu()),
            Command::ExitPlanning | Command::Cancel | Command::Start => {
                Reply::text(chat_id, "Choose an action:", Keyboard::main_menu())
            }
        };
        Ok(vec![reply])
    }

    fn continue_entry(&mut self, chat_id: ChatId, session: Session, text: &str, now: DateTime<Utc>) -> Result<Vec<Reply>> {
        let step = workflow::advance(&self.db, session.kind, session.stage, text)?;
        Ok(vec![self.follow(chat_id, session.kind, step, now)])
    }

    /// Keep the session waiting for its next stage, or drop it once the entry is stored
    fn follow(&mut self, chat_id: ChatId, kind: EntryKind, step: Step, now: DateTime<Utc>) -> Reply {
        match step.next {
            Some(stage) => self.sessions.put(chat_id, kind, stage, now),
            None => self.sessions.remove(chat_id),
        }
        Reply::text(chat_id, step.text, step.keyboard)
    }

    fn report(&self, chat_id: ChatId) -> Result<Vec<Reply>> {
        let report = build_report(&self.db)?;
        let text = report.text()?;

        let mut images = vec![];
        if let Some(image) = self.renderer.share_chart(&report.shares())? {
            images.push(image);
        }
        if let Some(image) = self.renderer.comparison_chart(&report.comparison())? {
            images.push(image);
        }

        let mut replies = vec![];
        if !images.is_empty() {
            replies.push(Reply::Album { chat_id, images });
        }
        replies.push(Reply::text(chat_id, text, Keyboard::main_menu()));
        Ok(replies)
    }
}
