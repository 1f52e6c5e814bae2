use crate::ledger::EntryKind;

pub(crate) const START: &str = "/start";
pub(crate) const NEW_INCOME: &str = "New income";
pub(crate) const NEW_EXPENSE: &str = "New expense";
pub(crate) const REPORT: &str = "Report";
pub(crate) const STATISTICS: &str = "Statistics";
pub(crate) const PLANNING: &str = "Planning";
pub(crate) const PLAN_INCOME: &str = "Plan income";
pub(crate) const PLAN_EXPENSES: &str = "Plan expenses";
pub(crate) const EXIT_PLANNING: &str = "Exit planning";
pub(crate) const CANCEL: &str = "Cancel";
pub(crate) const SKIP: &str = "Skip";

/// Button labels that can never be a category or a description
const RESERVED: [&str; 11] = [
    START, NEW_INCOME, NEW_EXPENSE, REPORT, STATISTICS, PLANNING,
    PLAN_INCOME, PLAN_EXPENSES, EXIT_PLANNING, CANCEL, SKIP,
];

pub(crate) fn is_reserved(text: &str) -> bool {
    RESERVED.contains(&text)
}

/// Commands triggered by an exact button label
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Command {
    Start,
    NewEntry(EntryKind),
    Report,
    Planning,
    ExitPlanning,
    Cancel,
}

impl Command {
    pub(crate) fn parse(text: &str) -> Option<Command> {
        let command = match text {
            START => Command::Start,
            NEW_INCOME => Command::NewEntry(EntryKind::Income),
            NEW_EXPENSE => Command::NewEntry(EntryKind::Expense),
            PLAN_INCOME => Command::NewEntry(EntryKind::PlannedIncome),
            PLAN_EXPENSES => Command::NewEntry(EntryKind::PlannedExpense),
            REPORT | STATISTICS => Command::Report,
            PLANNING => Command::Planning,
            EXIT_PLANNING => Command::ExitPlanning,
            CANCEL => Command::Cancel,
            _ => return None,
        };
        Some(command)
    }
}

/// Quick-reply buttons sent along with a message, one inner vec per row
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Keyboard {
    pub(crate) rows: Vec<Vec<String>>,
}

impl Keyboard {
    fn from_rows(rows: &[&[&str]]) -> Keyboard {
        Keyboard {
            rows: rows.iter().map(|row| row.iter().map(|b| b.to_string()).collect()).collect(),
        }
    }

    /// One option per row, followed by a row of fixed buttons
    pub(crate) fn choices(options: Vec<String>, fixed: &[&str]) -> Keyboard {
        let mut rows: Vec<Vec<String>> = options.into_iter().map(|option| vec![option]).collect();
        rows.push(fixed.iter().map(|b| b.to_string()).collect());
        Keyboard { rows }
    }

    pub(crate) fn buttons(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }

    pub(crate) fn main_menu() -> Keyboard {
        Keyboard::from_rows(&[&[NEW_INCOME, NEW_EXPENSE], &[REPORT, PLANNING]])
    }

    pub(crate) fn planning_menu() -> Keyboard {
        Keyboard::from_rows(&[&[PLAN_INCOME, PLAN_EXPENSES], &[EXIT_PLANNING]])
    }

    pub(crate) fn cancel_only() -> Keyboard {
        Keyboard::from_rows(&[&[CANCEL]])
    }

    /// The menu an entry kind was started from
    pub(crate) fn home_of(kind: EntryKind) -> Keyboard {
        if kind.is_planned() {
            Keyboard::planning_menu()
        } else {
            Keyboard::main_menu()
        }
    }
}
