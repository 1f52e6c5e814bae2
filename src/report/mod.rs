use std::collections::BTreeMap;

use anyhow::{anyhow, Result};

use crate::db::Database;
use crate::ledger::EntryKind;
use crate::money::Amount;

/// Planned and actual expenses aligned over the same categories, for the bar chart
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct ComparisonSeries {
    pub(crate) categories: Vec<String>,
    pub(crate) planned: Vec<Amount>,
    pub(crate) actual: Vec<Amount>,
}

impl ComparisonSeries {
    pub(crate) fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Per-category sums of everything recorded so far
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Report {
    pub(crate) income: BTreeMap<String, Amount>,
    pub(crate) planned_income: BTreeMap<String, Amount>,
    pub(crate) expenses: BTreeMap<String, Amount>,
    pub(crate) planned_expenses: BTreeMap<String, Amount>,
}

pub(crate) fn build_report(db: &Database) -> Result<Report> {
    Ok(Report {
        income: db.sum_by_category(EntryKind::Income)?,
        planned_income: db.sum_by_category(EntryKind::PlannedIncome)?,
        expenses: db.sum_by_category(EntryKind::Expense)?,
        planned_expenses: db.sum_by_category(EntryKind::PlannedExpense)?,
    })
}

/// Give both groupings the union of their categories, missing sums become zero
pub(crate) fn reconcile(left: &mut BTreeMap<String, Amount>, right: &mut BTreeMap<String, Amount>) {
    for category in left.keys() {
        right.entry(category.clone()).or_insert(Amount::ZERO);
    }
    for category in right.keys() {
        left.entry(category.clone()).or_insert(Amount::ZERO);
    }
}

/// Sum of one grouping. Fails instead of wrapping when the total does not fit.
fn total(sums: &BTreeMap<String, Amount>, what: &str) -> Result<Amount> {
    Amount::checked_sum(sums.values()).ok_or_else(|| anyhow!("Total {} is too large", what))
}

fn category_lines(sums: &BTreeMap<String, Amount>) -> String {
    sums.iter()
        .map(|(category, amount)| format!("{}: {}\n", category, amount.rounded_units()))
        .collect()
}

impl Report {
    pub(crate) fn total_income(&self) -> Result<Amount> {
        total(&self.income, "income")
    }

    pub(crate) fn total_expenses(&self) -> Result<Amount> {
        total(&self.expenses, "expenses")
    }

    pub(crate) fn total_planned_income(&self) -> Result<Amount> {
        total(&self.planned_income, "planned income")
    }

    pub(crate) fn total_planned_expenses(&self) -> Result<Amount> {
        total(&self.planned_expenses, "planned expenses")
    }

    pub(crate) fn remainder(&self) -> Result<Amount> {
        self.total_income()?
            .checked_sub(self.total_expenses()?)
            .ok_or_else(|| anyhow!("Remainder is too large"))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.income.is_empty() && self.planned_income.is_empty()
            && self.expenses.is_empty() && self.planned_expenses.is_empty()
    }

    pub(crate) fn comparison(&self) -> ComparisonSeries {
        let mut actual = self.expenses.clone();
        let mut planned = self.planned_expenses.clone();
        reconcile(&mut actual, &mut planned);

        // both maps now share the same sorted keys
        ComparisonSeries {
            categories: actual.keys().cloned().collect(),
            planned: planned.into_values().collect(),
            actual: actual.into_values().collect(),
        }
    }

    /// Actual expenses with a non-zero sum, for the pie chart
    pub(crate) fn shares(&self) -> Vec<(String, Amount)> {
        self.expenses.iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(category, amount)| (category.clone(), *amount))
            .collect()
    }

    /// Message text. Amounts are shown in whole units, rounded.
    pub(crate) fn text(&self) -> Result<String> {
        let mut text = format!("Total income: {}\n", self.total_income()?.rounded_units());

        text.push_str("\nExpenses by category:\n");
        if self.expenses.is_empty() {
            text.push_str("No expenses yet.\n");
        }
        text.push_str(&category_lines(&self.expenses));

        if !self.planned_income.is_empty() {
            text.push_str("\nPlanned income by category:\n");
            text.push_str(&category_lines(&self.planned_income));
            text.push_str(&format!("Planned income total: {}\n", self.total_planned_income()?.rounded_units()));
        }

        if !self.planned_expenses.is_empty() {
            text.push_str(&format!("\nPlanned expenses total: {}\n", self.total_planned_expenses()?.rounded_units()));
        }

        text.push_str(&format!("\nRemainder: {}", self.remainder()?.rounded_units()));
        if self.is_empty() {
            text.push_str("\n\nNo data to chart yet.");
        }
        Ok(text)
    }
}
