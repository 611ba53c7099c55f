//! Defines the report store trait and the row types the reports return.

use time::Date;

use crate::{Error, auth::Session, models::DatabaseId};

/// A row of the top-expenses report.
#[derive(Debug, Clone, PartialEq)]
pub struct TopExpenseRow {
    /// The ID of the expense.
    pub id: DatabaseId,
    /// How much was spent.
    pub amount: f64,
    /// The name of the expense's category.
    pub category: String,
    /// The name of the expense's payment method.
    pub payment_method: String,
    /// The calendar date the expense occurred on.
    pub date: Date,
    /// The expense's description, if any.
    pub description: Option<String>,
}

/// A row of the above-category-average report.
#[derive(Debug, Clone, PartialEq)]
pub struct AboveAverageRow {
    /// The ID of the expense.
    pub id: DatabaseId,
    /// How much was spent.
    pub amount: f64,
    /// The name of the expense's category.
    pub category: String,
    /// The calendar date the expense occurred on.
    pub date: Date,
    /// The expense's description, if any.
    pub description: Option<String>,
}

/// A row of the monthly category spending report.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyCategoryRow {
    /// The month, formatted `YYYY-MM`.
    pub month: String,
    /// The category name.
    pub category: String,
    /// The total spent in the category during the month.
    pub total: f64,
}

/// A row of the highest-spender-per-month report.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySpenderRow {
    /// The month, formatted `YYYY-MM`.
    pub month: String,
    /// The username of a top spender for the month.
    pub username: String,
    /// The month's maximum per-user total.
    pub total: f64,
}

/// A row of the most-frequent-category report.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFrequencyRow {
    /// The category name.
    pub category: String,
    /// How many expenses the category has.
    pub count: i64,
}

/// A row of the payment method usage report.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodUsageRow {
    /// The payment method name.
    pub payment_method: String,
    /// How many expenses used the payment method.
    pub count: i64,
    /// The total spent with the payment method.
    pub total: f64,
}

/// A row of the expenses-by-tag report.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSummaryRow {
    /// The tag.
    pub tag: String,
    /// How many expenses carry the tag.
    pub count: i64,
    /// The total spent under the tag.
    pub total: f64,
}

/// The fixed set of aggregate views over the ledger.
///
/// Every report is a pure read scoped by the same admin/non-admin ownership
/// rule as [ExpenseStore::list](crate::stores::ExpenseStore::list), except
/// [ReportStore::highest_spender_per_month] which is admin-only.
pub trait ReportStore {
    /// The N largest expenses, optionally bounded to an inclusive date
    /// range (start only, end only, or both), largest first.
    fn top_expenses(
        &self,
        actor: &Session,
        limit: u32,
        start: Option<Date>,
        end: Option<Date>,
    ) -> Result<Vec<TopExpenseRow>, Error>;

    /// The total spent in the category with the exact name `category`.
    /// Returns 0.0 when there are no matching expenses.
    fn category_spending(&self, actor: &Session, category: &str) -> Result<f64, Error>;

    /// Expenses whose amount exceeds their category's mean amount, largest
    /// first.
    fn above_category_average(&self, actor: &Session) -> Result<Vec<AboveAverageRow>, Error>;

    /// Total spend per (month, category), ordered by month then descending
    /// spend.
    fn monthly_category_spending(&self, actor: &Session)
    -> Result<Vec<MonthlyCategoryRow>, Error>;

    /// For each month, every user tied for the highest total spend.
    ///
    /// # Errors
    /// Returns [Error::PermissionDenied] for non-admin actors.
    fn highest_spender_per_month(&self, actor: &Session)
    -> Result<Vec<MonthlySpenderRow>, Error>;

    /// The single category with the most expenses, or `None` when the
    /// ledger is empty. Ties resolve to one storage-order-dependent row.
    fn most_frequent_category(
        &self,
        actor: &Session,
    ) -> Result<Option<CategoryFrequencyRow>, Error>;

    /// Expense count and total per payment method, largest total first.
    fn payment_method_usage(&self, actor: &Session) -> Result<Vec<MethodUsageRow>, Error>;

    /// Expense count and total per tag, excluding untagged expenses, most
    /// frequent tag first.
    fn expenses_by_tag(&self, actor: &Session) -> Result<Vec<TagSummaryRow>, Error>;
}
