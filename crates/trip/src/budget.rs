//! Budget status: ledger totals set against the fixed trip budget.

use serde::Serialize;

use tripledger_ledger::{ExpenseCategory, LedgerQueries};

use crate::reference::TripBudget;

/// Spending in one category, in USD.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: ExpenseCategory,
    pub label: &'static str,
    pub total_usd: f64,
    pub count: usize,
    pub budget: Option<f64>,
}

impl CategorySummary {
    pub fn over_budget(&self) -> bool {
        self.budget.is_some_and(|b| self.total_usd > b)
    }

    /// Budget left (negative when exceeded); `None` for uncapped categories.
    pub fn budget_delta(&self) -> Option<f64> {
        self.budget.map(|b| b - self.total_usd)
    }
}

/// Snapshot of where the trip stands financially.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub spent_usd: f64,
    pub available_for_purchases: f64,
    pub purchases_remaining: f64,
    pub percent_used: f64,
    pub trip_cost: f64,
    pub total_budget: f64,
    pub total_remaining: f64,
    pub average_rate: f64,
    pub exchanged_usd: f64,
    pub exchanged_clp: f64,
    pub clp_remaining: f64,
    pub expense_count: usize,
    pub average_expense_usd: f64,
    pub categories: Vec<CategorySummary>,
}

/// Clothing costs roughly twice as much back home.
const HOME_PRICE_FACTOR: f64 = 2.0;

impl BudgetStatus {
    pub fn compute(ledger: &impl LedgerQueries, budget: &TripBudget) -> Self {
        let spent_usd = ledger.total_spent_in_usd();
        let available = budget.available_for_purchases;
        let percent_used = if available > 0.0 {
            spent_usd / available * 100.0
        } else {
            0.0
        };
        let trip_cost = budget.fixed_costs + spent_usd;

        let categories = ExpenseCategory::ALL
            .iter()
            .map(|&category| CategorySummary {
                category,
                label: category.label(),
                total_usd: ledger.category_total_usd(category),
                count: ledger.expenses_by_type(category).len(),
                budget: budget.category_budget(category),
            })
            .collect();

        Self {
            spent_usd,
            available_for_purchases: available,
            purchases_remaining: available - spent_usd,
            percent_used,
            trip_cost,
            total_budget: budget.total,
            total_remaining: budget.total - trip_cost,
            average_rate: ledger.average_rate(),
            exchanged_usd: ledger.total_exchanged_usd(),
            exchanged_clp: ledger.total_exchanged_clp(),
            clp_remaining: ledger.clp_remaining(),
            expense_count: ledger.expenses().len(),
            average_expense_usd: ledger.average_expense_usd(),
            categories,
        }
    }

    pub fn within_budget(&self) -> bool {
        self.total_remaining >= 0.0
    }

    /// Progress-bar fill, capped at 100.
    pub fn progress(&self) -> f64 {
        self.percent_used.min(100.0)
    }

    /// What the same purchases would have cost at home.
    pub fn home_equivalent(&self) -> f64 {
        self.spent_usd * HOME_PRICE_FACTOR
    }

    pub fn estimated_savings(&self) -> f64 {
        self.home_equivalent() - self.spent_usd
    }

    pub fn category(&self, category: ExpenseCategory) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == category)
    }
}
