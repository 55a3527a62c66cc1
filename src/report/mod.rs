use rust_decimal::Decimal;

use crate::models::{Category, Expense};

/// One ranked row of the category breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryShare {
    pub(crate) category: Category,
    pub(crate) amount: Decimal,
    /// Percentage of the total, 0..=100, carried at full precision.
    /// Rounding to one decimal happens at the rendering boundary.
    pub(crate) share: Decimal,
}

/// Parallel label/value arrays handed to the chart widget.
pub(crate) struct ChartData {
    pub(crate) labels: Vec<&'static str>,
    pub(crate) values: Vec<Decimal>,
    pub(crate) total: Decimal,
}

pub(crate) fn total(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

/// Per-category subtotals in first-encounter order.
pub(crate) fn by_category(expenses: &[Expense]) -> Vec<(Category, Decimal)> {
    let mut subtotals: Vec<(Category, Decimal)> = Vec::new();
    for expense in expenses {
        match subtotals.iter_mut().find(|(c, _)| *c == expense.category) {
            Some((_, amount)) => *amount += expense.amount,
            None => subtotals.push((expense.category, expense.amount)),
        }
    }
    subtotals
}

/// Breakdown ranked by amount descending. Equal amounts keep their
/// first-encounter order (stable sort). A zero total yields the empty vec,
/// so no share is ever computed against zero.
pub(crate) fn breakdown(expenses: &[Expense]) -> Vec<CategoryShare> {
    let sum = total(expenses);
    if sum.is_zero() {
        return Vec::new();
    }

    let mut shares: Vec<CategoryShare> = by_category(expenses)
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            share: amount * Decimal::ONE_HUNDRED / sum,
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
}

pub(crate) fn chart_data(shares: &[CategoryShare]) -> ChartData {
    ChartData {
        labels: shares.iter().map(|s| s.category.as_str()).collect(),
        values: shares.iter().map(|s| s.amount).collect(),
        total: shares.iter().map(|s| s.amount).sum(),
    }
}
