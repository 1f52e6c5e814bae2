use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::bot::menu::Keyboard;
use crate::bot::{Bot, Message, Reply};
use crate::chart::SvgChartRenderer;
use crate::db::Database;
use crate::ledger::EntryKind;
use crate::money::Amount;
use crate::session::{Sessions, Stage};

const CHAT: i64 = 42;

fn new_bot() -> Bot {
    Bot::new(
        Database::open_in_memory().unwrap(),
        Sessions::new(Duration::minutes(10)),
        Box::new(SvgChartRenderer::default()),
        "Hi, this is the family budget tracker!",
    )
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Send messages one second apart and return the replies to the last one
fn converse(bot: &mut Bot, messages: &[&str]) -> Vec<Reply> {
    let mut replies = vec![];
    for (i, text) in messages.iter().enumerate() {
        replies = bot.handle_at(&Message::new(CHAT, text), noon() + Duration::seconds(i as i64));
    }
    replies
}

fn last_text(replies: &[Reply]) -> (&str, &Keyboard) {
    match replies.last() {
        Some(Reply::Text { text, keyboard, .. }) => (text.as_str(), keyboard),
        other => panic!("Unexpected reply {:?}", other),
    }
}

#[test]
fn test_start() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["/start"]);
    assert_eq!(last_text(&replies), ("Hi, this is the family budget tracker!", &Keyboard::main_menu()));
}

#[test]
fn test_income_entry() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["New income", "1000", "Salary"]);

    assert_eq!(last_text(&replies), ("Income 1000 in category Salary saved.", &Keyboard::main_menu()));
    let income = bot.db.entries(EntryKind::Income).unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].amount, Amount::from_units(1000));
    assert_eq!(income[0].category, "Salary");
    assert_eq!(bot.db.categories().unwrap(), vec!["Salary"]);
    assert!(bot.sessions.get(CHAT).is_none());

    // the category is now offered, and reusing it does not duplicate it
    let replies = converse(&mut bot, &["New income", "250.5"]);
    let (_, keyboard) = last_text(&replies);
    assert_eq!(keyboard.buttons().collect::<Vec<_>>(), vec!["Salary", "Cancel"]);
    converse(&mut bot, &["Salary"]);
    assert_eq!(bot.db.entries(EntryKind::Income).unwrap().len(), 2);
    assert_eq!(bot.db.categories().unwrap(), vec!["Salary"]);
}

#[test]
fn test_expense_entry_with_description() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["New expense", "200", "Groceries"]);
    assert_eq!(last_text(&replies).0, "Enter the expense description:");

    let replies = converse(&mut bot, &["weekly"]);
    assert_eq!(last_text(&replies), ("Expense 200 in category Groceries added.", &Keyboard::main_menu()));

    let expenses = bot.db.entries(EntryKind::Expense).unwrap();
    assert_eq!(expenses[0].description, Some("weekly".to_string()));

    // previous descriptions of the category are suggested
    let replies = converse(&mut bot, &["New expense", "35", "Groceries"]);
    let (_, keyboard) = last_text(&replies);
    assert_eq!(keyboard.buttons().collect::<Vec<_>>(), vec!["weekly", "Skip", "Cancel"]);
}

#[test]
fn test_non_numeric_amount_reprompts() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["New expense", "twenty"]);

    let (text, keyboard) = last_text(&replies);
    assert!(text.contains("not an amount"));
    assert!(text.ends_with("Enter the amount:"));
    assert_eq!(keyboard, &Keyboard::cancel_only());
    assert!(bot.db.entries(EntryKind::Expense).unwrap().is_empty());
    assert_eq!(bot.sessions.get(CHAT).map(|s| s.stage.clone()), Some(Stage::AwaitingAmount));

    // the entry can still be completed
    converse(&mut bot, &["20", "Fuel", "Skip"]);
    assert_eq!(bot.db.entries(EntryKind::Expense).unwrap().len(), 1);
}

#[test]
fn test_menu_button_during_entry_is_rejected() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["New income", "100", "Report"]);

    let (text, _) = last_text(&replies);
    assert!(text.starts_with("'Report' is a menu button."));
    assert!(bot.db.entries(EntryKind::Income).unwrap().is_empty());
    assert!(bot.db.categories().unwrap().is_empty());
}

#[test]
fn test_cancel() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["Planning", "Plan expenses", "300", "Cancel"]);

    assert_eq!(last_text(&replies), ("Cancelled.", &Keyboard::planning_menu()));
    assert!(bot.db.entries(EntryKind::PlannedExpense).unwrap().is_empty());
    assert!(bot.sessions.get(CHAT).is_none());
}

#[test]
fn test_planned_entry_returns_to_planning_menu() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["Planning", "Plan income", "1200", "Salary"]);
    assert_eq!(last_text(&replies), ("Planned income 1200 in category Salary added!", &Keyboard::planning_menu()));

    let replies = converse(&mut bot, &["Exit planning"]);
    assert_eq!(last_text(&replies), ("Choose an action:", &Keyboard::main_menu()));
}

#[test]
fn test_idle_session_expires() {
    let mut bot = new_bot();
    bot.handle_at(&Message::new(CHAT, "New income"), noon());

    let replies = bot.handle_at(&Message::new(CHAT, "Report"), noon() + Duration::minutes(11));
    let (text, _) = last_text(&replies);
    assert!(text.starts_with("Total income: 0"));
    assert!(bot.db.entries(EntryKind::Income).unwrap().is_empty());
}

#[test]
fn test_sessions_are_per_conversation() {
    let mut bot = new_bot();
    bot.handle_at(&Message::new(1, "New income"), noon());
    bot.handle_at(&Message::new(2, "New expense"), noon());
    bot.handle_at(&Message::new(1, "10"), noon());

    assert_eq!(bot.sessions.get(1).map(|s| s.kind), Some(EntryKind::Income));
    assert_eq!(bot.sessions.get(2).map(|s| s.stage.clone()), Some(Stage::AwaitingAmount));
}

#[test]
fn test_unknown_message() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["hello?"]);
    assert_eq!(last_text(&replies), ("Unknown command. Use the buttons below.", &Keyboard::main_menu()));
}

#[test]
fn test_report() {
    let mut bot = new_bot();
    converse(&mut bot, &[
        "New income", "1000", "Salary",
        "New expense", "200", "Groceries", "weekly",
        "Planning", "Plan expenses", "300", "Groceries",
    ]);

    let replies = converse(&mut bot, &["Statistics"]);
    assert_eq!(replies.len(), 2);
    match &replies[0] {
        Reply::Album { chat_id, images } => {
            assert_eq!(*chat_id, CHAT);
            let names: Vec<&str> = images.iter().map(|i| i.file_name.as_str()).collect();
            assert_eq!(names, vec!["expense-categories.svg", "expenses-by-category.svg"]);
        }
        other => panic!("Unexpected reply {:?}", other),
    }

    let (text, keyboard) = last_text(&replies);
    assert!(text.contains("Total income: 1000"));
    assert!(text.contains("Groceries: 200"));
    assert!(text.ends_with("Remainder: 800"));
    assert_eq!(keyboard, &Keyboard::main_menu());
}

#[test]
fn test_empty_report() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["Report"]);

    assert_eq!(replies.len(), 1);
    let (text, _) = last_text(&replies);
    assert!(text.contains("Total income: 0"));
    assert!(text.contains("Remainder: 0"));
    assert!(text.contains("No data to chart yet."));
}

#[test]
fn test_start_during_entry_resets() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["New expense", "45", "/start"]);

    assert_eq!(last_text(&replies), ("Hi, this is the family budget tracker!", &Keyboard::main_menu()));
    assert!(bot.sessions.get(CHAT).is_none());

    // a later answer is not taken as the category
    let replies = converse(&mut bot, &["Fuel"]);
    assert_eq!(last_text(&replies).0, "Unknown command. Use the buttons below.");
    assert!(bot.db.entries(EntryKind::Expense).unwrap().is_empty());
    assert!(bot.db.categories().unwrap().is_empty());
}

#[test]
fn test_menu_button_as_description_is_rejected() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["New expense", "12", "Coffee", "Planning"]);

    let (text, keyboard) = last_text(&replies);
    assert!(text.starts_with("'Planning' is a menu button."));
    assert!(text.ends_with("Enter the expense description:"));
    assert_eq!(keyboard.buttons().collect::<Vec<_>>(), vec!["Skip", "Cancel"]);
    assert!(bot.db.entries(EntryKind::Expense).unwrap().is_empty());
    assert_eq!(
        bot.sessions.get(CHAT).map(|s| s.stage.clone()),
        Some(Stage::AwaitingDescription { amount: Amount::from_units(12), category: "Coffee".to_string() })
    );

    converse(&mut bot, &["latte"]);
    let expenses = bot.db.entries(EntryKind::Expense).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].description, Some("latte".to_string()));
}

#[test]
fn test_cancel_at_description() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["New expense", "12", "Coffee", "Cancel"]);

    assert_eq!(last_text(&replies), ("Cancelled.", &Keyboard::main_menu()));
    assert!(bot.db.entries(EntryKind::Expense).unwrap().is_empty());
    assert!(bot.sessions.get(CHAT).is_none());
    // the category was registered when it was answered
    assert_eq!(bot.db.categories().unwrap(), vec!["Coffee"]);
}

#[test]
fn test_oversized_amount_is_refused() {
    let mut bot = new_bot();
    let replies = converse(&mut bot, &["New income", "50000000000000000"]);

    let (text, _) = last_text(&replies);
    assert!(text.starts_with("'50000000000000000' is not an amount."));
    assert_eq!(bot.sessions.get(CHAT).map(|s| s.stage.clone()), Some(Stage::AwaitingAmount));

    converse(&mut bot, &["1000000000000", "A", "New income", "1000000000000", "B"]);
    let replies = converse(&mut bot, &["Report"]);
    let (text, _) = last_text(&replies);
    assert!(text.contains("Total income: 2000000000000"));
    assert!(text.ends_with("Remainder: 2000000000000"));
}
