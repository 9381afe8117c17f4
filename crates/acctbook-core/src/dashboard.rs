//! Dashboard figures
//!
//! The dashboard does not read the store yet; it shows fixed sample
//! figures laid out the way real invoice/expense summaries will be.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Income and expense totals for one month
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTotals {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Amounts grouped by due date
#[derive(Debug, Clone, Serialize)]
pub struct DueBuckets {
    /// Due in 1-30 days
    pub due_30: Decimal,
    /// Due in 31-60 days
    pub due_60: Decimal,
    pub overdue: Decimal,
}

impl DueBuckets {
    pub fn total(&self) -> Decimal {
        self.due_30 + self.due_60 + self.overdue
    }
}

/// One expense category in the top expenses chart
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseSlice {
    pub category: String,
    pub amount: Decimal,
    /// CSS colour used for the slice
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    /// Label of the period the figures cover
    pub period: String,
    pub monthly: Vec<MonthlyTotals>,
    pub money_in: DueBuckets,
    pub money_out: DueBuckets,
    pub top_expenses: Vec<ExpenseSlice>,
}

impl DashboardData {
    /// Fixed sample figures
    pub fn placeholder() -> Self {
        let monthly = [
            ("January", 186, 80),
            ("February", 305, 200),
            ("March", 237, 120),
            ("April", 73, 190),
            ("May", 209, 130),
            ("June", 214, 140),
        ]
        .into_iter()
        .map(|(month, income, expense)| MonthlyTotals {
            month: month.to_string(),
            income: Decimal::from(income),
            expense: Decimal::from(expense),
        })
        .collect();

        let top_expenses = [
            ("Rent", 275, "#2563eb"),
            ("Salaries", 200, "#60a5fa"),
            ("Utilities", 287, "#f59e0b"),
            ("Travel", 173, "#10b981"),
            ("Other", 190, "#a855f7"),
        ]
        .into_iter()
        .map(|(category, amount, color)| ExpenseSlice {
            category: category.to_string(),
            amount: Decimal::from(amount),
            color: color.to_string(),
        })
        .collect();

        Self {
            period: "January - June".to_string(),
            monthly,
            money_in: DueBuckets {
                due_30: Decimal::ZERO,
                due_60: Decimal::ZERO,
                overdue: Decimal::ZERO,
            },
            money_out: DueBuckets {
                due_30: Decimal::new(175049, 2),
                due_60: Decimal::ZERO,
                overdue: Decimal::ZERO,
            },
            top_expenses,
        }
    }

    /// Largest single income or expense figure, for scaling bars
    pub fn monthly_peak(&self) -> Decimal {
        self.monthly
            .iter()
            .flat_map(|m| [m.income, m.expense])
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn top_expenses_total(&self) -> Decimal {
        self.top_expenses.iter().map(|s| s.amount).sum()
    }

    /// Share of `amount` in the top expenses total, in whole percent
    pub fn expense_share(&self, amount: Decimal) -> u32 {
        let total = self.top_expenses_total();
        if total.is_zero() {
            return 0;
        }
        (amount * Decimal::from(100) / total)
            .round()
            .to_u32()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_figures() {
        let data = DashboardData::placeholder();
        assert_eq!(data.monthly.len(), 6);
        assert_eq!(data.monthly_peak(), Decimal::from(305));
        assert_eq!(data.top_expenses_total(), Decimal::from(1125));
        assert_eq!(data.money_in.total(), Decimal::ZERO);
        assert_eq!(data.money_out.total().to_string(), "1750.49");
    }

    #[test]
    fn test_expense_share() {
        let data = DashboardData::placeholder();
        let shares: u32 = data
            .top_expenses
            .iter()
            .map(|s| data.expense_share(s.amount))
            .sum();
        assert!((99..=101).contains(&shares));
        assert_eq!(data.expense_share(Decimal::from(225)), 20);
    }
}
