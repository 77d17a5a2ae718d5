use rust_decimal::Decimal;

use super::tree::CategoryTree;
use crate::models::{Category, CategoryKind};

/// Per-month figures derived from the two roots. Never stored in the tree.
///
/// Figures past `Decimal::MAX` are clamped to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    pub(crate) profit_loss: Vec<Decimal>,
    pub(crate) opening_balance: Vec<Decimal>,
    pub(crate) closing_balance: Vec<Decimal>,
}

impl Totals {
    pub(crate) fn compute(tree: &CategoryTree) -> Self {
        let months = tree.months_count();
        let income = root_of(tree, CategoryKind::Income);
        let expense = root_of(tree, CategoryKind::Expense);

        let profit_loss: Vec<Decimal> = (0..months)
            .map(|i| month_subtotal(income, i).saturating_sub(month_subtotal(expense, i)))
            .collect();

        let mut opening_balance = Vec::with_capacity(months);
        let mut closing_balance = Vec::with_capacity(months);
        let mut running = Decimal::ZERO;
        for pl in &profit_loss {
            opening_balance.push(running);
            running = running.saturating_add(*pl);
            closing_balance.push(running);
        }

        Self {
            profit_loss,
            opening_balance,
            closing_balance,
        }
    }

    /// Profit/loss across the whole range.
    pub(crate) fn net(&self) -> Decimal {
        self.profit_loss
            .iter()
            .fold(Decimal::ZERO, |acc, pl| acc.saturating_add(*pl))
    }
}

fn root_of(tree: &CategoryTree, kind: CategoryKind) -> Option<&Category> {
    tree.roots().iter().find(|r| r.kind == kind)
}

fn month_subtotal(root: Option<&Category>, month: usize) -> Decimal {
    root.and_then(|r| r.subtotals.get(month).copied())
        .unwrap_or(Decimal::ZERO)
}
