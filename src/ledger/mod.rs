use std::fmt;

use crate::money::Amount;

/// The four kinds of entries a household records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EntryKind {
    Income,
    Expense,
    PlannedIncome,
    PlannedExpense,
}

impl EntryKind {
    /// Table holding entries of this kind
    pub(crate) fn table(self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expenses",
            EntryKind::PlannedIncome => "planned_income",
            EntryKind::PlannedExpense => "planned_expenses",
        }
    }

    /// Only realized expenses carry a free-text description
    pub(crate) fn has_description(self) -> bool {
        matches!(self, EntryKind::Expense)
    }

    pub(crate) fn is_planned(self) -> bool {
        matches!(self, EntryKind::PlannedIncome | EntryKind::PlannedExpense)
    }

    pub(crate) fn category_prompt(self) -> &'static str {
        match self {
            EntryKind::Income | EntryKind::PlannedIncome => "Enter the income category:",
            EntryKind::Expense | EntryKind::PlannedExpense => "Enter the expense category:",
        }
    }

    /// Confirmation sent once an entry of this kind is stored
    pub(crate) fn saved_message(self, amount: Amount, category: &str) -> String {
        match self {
            EntryKind::Income => format!("Income {amount} in category {category} saved."),
            EntryKind::Expense => format!("Expense {amount} in category {category} added."),
            EntryKind::PlannedIncome => format!("Planned income {amount} in category {category} added!"),
            EntryKind::PlannedExpense => format!("Planned expense {amount} in category {category} added!"),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntryKind::Income => write!(f, "income"),
            EntryKind::Expense => write!(f, "expense"),
            EntryKind::PlannedIncome => write!(f, "planned income"),
            EntryKind::PlannedExpense => write!(f, "planned expense"),
        }
    }
}

/// A completed entry, ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewEntry {
    pub(crate) kind: EntryKind,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    /// Blank is allowed; ignored for kinds without a description
    pub(crate) description: String,
}

impl NewEntry {
    pub(crate) fn new(kind: EntryKind, amount: Amount, category: &str, description: &str) -> NewEntry {
        NewEntry {
            kind,
            amount,
            category: category.to_string(),
            description: description.to_string(),
        }
    }
}
