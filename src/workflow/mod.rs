use anyhow::Result;
use log::info;

use crate::bot::menu::{self, Keyboard};
use crate::common::InputError;
use crate::db::Database;
use crate::ledger::{EntryKind, NewEntry};
use crate::money::Amount;
use crate::session::Stage;

const AMOUNT_PROMPT: &str = "Enter the amount:";
const DESCRIPTION_PROMPT: &str = "Enter the expense description:";

/// What the conversation should see after one workflow step
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Step {
    pub(crate) text: String,
    pub(crate) keyboard: Keyboard,
    /// Stage to wait in next, `None` once the entry is stored
    pub(crate) next: Option<Stage>,
}

impl Step {
    fn ask(text: impl Into<String>, keyboard: Keyboard, next: Stage) -> Step {
        Step { text: text.into(), keyboard, next: Some(next) }
    }

    /// Report why the input was rejected and ask the same question again
    fn retry(error: InputError, question: Step) -> Step {
        Step { text: format!("{}\n{}", error, question.text), ..question }
    }
}

/// First question of every guided entry
pub(crate) fn start() -> Step {
    Step::ask(AMOUNT_PROMPT, Keyboard::cancel_only(), Stage::AwaitingAmount)
}

/// Feed one message into the entry being collected
pub(crate) fn advance(db: &Database, kind: EntryKind, stage: Stage, input: &str) -> Result<Step> {
    let input = input.trim();
    match stage {
        Stage::AwaitingAmount => match Amount::parse(input) {
            Ok(amount) => ask_category(db, kind, amount),
            Err(e) => Ok(Step::retry(e, start())),
        },
        Stage::AwaitingCategory { amount } => {
            let category = match category_from(input) {
                Ok(category) => category,
                Err(e) => return Ok(Step::retry(e, ask_category(db, kind, amount)?)),
            };

            db.ensure_category(category)?;
            if kind.has_description() {
                ask_description(db, amount, category)
            } else {
                save(db, NewEntry::new(kind, amount, category, ""))
            }
        }
        Stage::AwaitingDescription { amount, category } => {
            let description = if input == menu::SKIP {
                ""
            } else if menu::is_reserved(input) {
                let error = InputError::ReservedLabel(input.to_string());
                return Ok(Step::retry(error, ask_description(db, amount, &category)?));
            } else {
                input
            };
            save(db, NewEntry::new(kind, amount, &category, description))
        }
    }
}

fn category_from(input: &str) -> Result<&str, InputError> {
    if input.is_empty() {
        Err(InputError::EmptyCategory)
    } else if menu::is_reserved(input) {
        Err(InputError::ReservedLabel(input.to_string()))
    } else {
        Ok(input)
    }
}

/// Suggestions always come from the category registry
fn ask_category(db: &Database, kind: EntryKind, amount: Amount) -> Result<Step> {
    let keyboard = Keyboard::choices(db.categories()?, &[menu::CANCEL]);
    Ok(Step::ask(kind.category_prompt(), keyboard, Stage::AwaitingCategory { amount }))
}

fn ask_description(db: &Database, amount: Amount, category: &str) -> Result<Step> {
    let keyboard = Keyboard::choices(db.expense_descriptions(category)?, &[menu::SKIP, menu::CANCEL]);
    let next = Stage::AwaitingDescription { amount, category: category.to_string() };
    Ok(Step::ask(DESCRIPTION_PROMPT, keyboard, next))
}

fn save(db: &Database, entry: NewEntry) -> Result<Step> {
    let id = db.insert_entry(&entry)?;
    info!("Saved {} #{}: {} in '{}'", entry.kind, id, entry.amount, entry.category);

    Ok(Step {
        text: entry.kind.saved_message(entry.amount, &entry.category),
        keyboard: Keyboard::home_of(entry.kind),
        next: None,
    })
}
