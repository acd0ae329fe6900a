//! In-memory transaction and goal store
//!
//! Backs the dashboard: balance summary, spending by category and savings
//! goals. Nothing is persisted.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    BalanceSummary, CategorySpending, Goal, NewTransaction, Transaction, TransactionKind,
};

/// Category whose expenses count toward savings goals
pub const SAVINGS_CATEGORY: &str = "Savings";

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// Newest first
    transactions: Vec<Transaction>,
    goals: Vec<Goal>,
    next_transaction_id: i64,
    next_goal_id: i64,
}

impl Ledger {
    /// Empty ledger
    pub fn new() -> Self {
        Self {
            next_transaction_id: 1,
            next_goal_id: 1,
            ..Default::default()
        }
    }

    /// Ledger seeded with one month of example activity
    pub fn with_sample_data() -> Self {
        let tx = |id, kind, amount, category: &str, description: &str, day| Transaction {
            id,
            kind,
            amount,
            category: category.to_string(),
            description: description.to_string(),
            date: july_2024(day),
        };

        use TransactionKind::{Expense, Income};
        let transactions = vec![
            tx(1, Income, 4500.0, "Salary", "Monthly Salary", 1),
            tx(2, Expense, 1200.0, "Rent", "Apartment Rent", 1),
            tx(3, Expense, 75.5, "Groceries", "Weekly grocery shopping", 3),
            tx(4, Expense, 45.2, "Dining Out", "Dinner with friends", 5),
            tx(5, Expense, 250.0, "Shopping", "New clothes", 6),
            tx(6, Expense, 120.0, "Utilities", "Electricity Bill", 10),
            tx(7, Expense, 50.0, "Transportation", "Gas for car", 12),
            tx(8, Expense, 500.0, "Savings", "Contribution to savings", 15),
        ];

        let goals = vec![
            Goal {
                id: 1,
                name: "Vacation to Italy".into(),
                target_amount: 4000.0,
                current_amount: 1500.0,
            },
            Goal {
                id: 2,
                name: "New Laptop".into(),
                target_amount: 1800.0,
                current_amount: 400.0,
            },
        ];

        Self {
            next_transaction_id: transactions.len() as i64 + 1,
            next_goal_id: goals.len() as i64 + 1,
            transactions,
            goals,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Record a transaction; it becomes the first entry
    pub fn add_transaction(&mut self, new: NewTransaction) -> Result<&Transaction> {
        let description = new.description.trim();
        let category = new.category.trim();
        if description.is_empty() {
            return Err(Error::InvalidData("Description is required".into()));
        }
        if category.is_empty() {
            return Err(Error::InvalidData("Category is required".into()));
        }
        if !new.amount.is_finite() || new.amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Amount must be a positive number, got {}",
                new.amount
            )));
        }

        let transaction = Transaction {
            id: self.next_transaction_id,
            kind: new.kind,
            amount: new.amount,
            category: category.to_string(),
            description: description.to_string(),
            date: new.date,
        };
        self.next_transaction_id += 1;
        debug!(id = transaction.id, category = %transaction.category, "Added transaction");

        self.transactions.insert(0, transaction);
        Ok(&self.transactions[0])
    }

    pub fn delete_transaction(&mut self, id: i64) -> Result<()> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))?;
        self.transactions.remove(index);
        Ok(())
    }

    /// Create a goal with nothing saved toward it yet
    pub fn add_goal(&mut self, name: &str, target_amount: f64) -> Result<&Goal> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Goal name is required".into()));
        }
        if !target_amount.is_finite() || target_amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Target amount must be a positive number, got {}",
                target_amount
            )));
        }

        self.goals.push(Goal {
            id: self.next_goal_id,
            name: name.to_string(),
            target_amount,
            current_amount: 0.0,
        });
        self.next_goal_id += 1;

        let index = self.goals.len() - 1;
        Ok(&self.goals[index])
    }

    pub fn delete_goal(&mut self, id: i64) -> Result<()> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))?;
        self.goals.remove(index);
        Ok(())
    }

    pub fn summary(&self) -> BalanceSummary {
        let (total_income, total_expenses) =
            self.transactions
                .iter()
                .fold((0.0, 0.0), |(income, expenses), t| match t.kind {
                    TransactionKind::Income => (income + t.amount, expenses),
                    TransactionKind::Expense => (income, expenses + t.amount),
                });

        BalanceSummary {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        }
    }

    /// Expense totals per category, in order of first appearance
    pub fn spending_by_category(&self) -> Vec<CategorySpending> {
        let mut spending: Vec<CategorySpending> = Vec::new();
        for t in self
            .transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
        {
            match spending.iter_mut().find(|s| s.category == t.category) {
                Some(entry) => entry.amount += t.amount,
                None => spending.push(CategorySpending {
                    category: t.category.clone(),
                    amount: t.amount,
                }),
            }
        }
        spending
    }

    /// Sum of expenses filed under [`SAVINGS_CATEGORY`]
    pub fn total_savings(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense && t.category == SAVINGS_CATEGORY)
            .map(|t| t.amount)
            .sum()
    }
}

fn july_2024(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, day).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn expense(amount: f64, category: &str, description: &str) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Expense,
            amount,
            category: category.into(),
            description: description.into(),
            date: NaiveDate::from_ymd_opt(2024, 7, 20).unwrap(),
        }
    }

    #[test]
    fn test_sample_summary() {
        let ledger = Ledger::with_sample_data();
        let summary = ledger.summary();
        assert!(approx(summary.total_income, 4500.0));
        assert!(approx(summary.total_expenses, 2240.7));
        assert!(approx(summary.balance, 2259.3));
        assert!(approx(ledger.total_savings(), 500.0));
        assert_eq!(ledger.transactions().len(), 8);
        assert_eq!(ledger.goals().len(), 2);
    }

    #[test]
    fn test_spending_by_category_order() {
        let ledger = Ledger::with_sample_data();
        let spending = ledger.spending_by_category();
        let names: Vec<&str> = spending.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Rent",
                "Groceries",
                "Dining Out",
                "Shopping",
                "Utilities",
                "Transportation",
                "Savings"
            ]
        );
    }

    #[test]
    fn test_spending_accumulates() {
        let mut ledger = Ledger::new();
        ledger.add_transaction(expense(10.0, "Groceries", "Milk")).unwrap();
        ledger.add_transaction(expense(5.5, "Groceries", "Bread")).unwrap();
        let spending = ledger.spending_by_category();
        assert_eq!(spending.len(), 1);
        assert!(approx(spending[0].amount, 15.5));
    }

    #[test]
    fn test_add_transaction_prepends_with_next_id() {
        let mut ledger = Ledger::with_sample_data();
        let added = ledger
            .add_transaction(expense(12.0, "Dining Out", "  Coffee with a friend "))
            .unwrap();
        assert_eq!(added.id, 9);
        assert_eq!(added.description, "Coffee with a friend");
        assert_eq!(ledger.transactions()[0].id, 9);
    }

    #[test]
    fn test_add_transaction_validation() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.add_transaction(expense(10.0, "Groceries", "  ")),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            ledger.add_transaction(expense(10.0, "", "Milk")),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            ledger.add_transaction(expense(0.0, "Groceries", "Milk")),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            ledger.add_transaction(expense(f64::NAN, "Groceries", "Milk")),
            Err(Error::InvalidData(_))
        ));
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_delete_transaction() {
        let mut ledger = Ledger::with_sample_data();
        ledger.delete_transaction(8).unwrap();
        assert!(approx(ledger.total_savings(), 0.0));
        assert!(matches!(ledger.delete_transaction(8), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_goals() {
        let mut ledger = Ledger::with_sample_data();
        let goal = ledger.add_goal("Emergency Fund", 1000.0).unwrap();
        assert_eq!(goal.id, 3);
        assert_eq!(goal.current_amount, 0.0);

        assert!(ledger.add_goal(" ", 100.0).is_err());
        assert!(ledger.add_goal("Car", -5.0).is_err());

        ledger.delete_goal(1).unwrap();
        assert_eq!(ledger.goals().len(), 2);
        assert!(matches!(ledger.delete_goal(1), Err(Error::NotFound(_))));
    }
}
