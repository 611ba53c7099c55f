//! This file defines expense records and the closed field sets used for
//! updates, filtering, and export sorting.

use std::{fmt::Display, str::FromStr};

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    models::{DatabaseId, UserId},
};

/// The format for calendar dates everywhere in the application: `2024-03-01`.
const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parse an ISO calendar date.
///
/// # Errors
/// Returns an [Error::InvalidValue] for anything that is not a valid
/// calendar date, e.g. `2024-13-01`.
pub fn parse_date(input: &str) -> Result<Date, Error> {
    Date::parse(input.trim(), DATE_FORMAT).map_err(|error| {
        Error::InvalidValue(format!("\"{input}\" is not a valid date (YYYY-MM-DD): {error}"))
    })
}

/// Parse a monetary amount.
///
/// Positivity is checked by the ledger, not here, so that the ledger's
/// [Error::InvalidAmount] carries the offending value.
///
/// # Errors
/// Returns an [Error::InvalidValue] if `input` is not a finite number.
pub fn parse_amount(input: &str) -> Result<f64, Error> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidValue(format!("\"{input}\" is not a number")))?;

    if !amount.is_finite() {
        return Err(Error::InvalidValue(format!("\"{input}\" is not a number")));
    }

    Ok(amount)
}

/// An expense as stored in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense.
    pub id: DatabaseId,
    /// The user that owns the expense.
    pub user_id: UserId,
    /// The category the expense belongs to.
    pub category_id: DatabaseId,
    /// The payment method the expense was paid with.
    pub method_id: DatabaseId,
    /// How much was spent. Always greater than zero.
    pub amount: f64,
    /// The calendar date the expense occurred on.
    pub date: Date,
    /// An optional free-text description.
    pub description: Option<String>,
    /// An optional free-text tag for ad-hoc grouping.
    pub tag: Option<String>,
}

/// The data needed to create an expense. The ID is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The user that will own the expense.
    pub user_id: UserId,
    /// The category the expense belongs to.
    pub category_id: DatabaseId,
    /// The payment method the expense was paid with.
    pub method_id: DatabaseId,
    /// How much was spent. Must be greater than zero.
    pub amount: f64,
    /// The calendar date the expense occurred on.
    pub date: Date,
    /// An optional free-text description.
    pub description: Option<String>,
    /// An optional free-text tag.
    pub tag: Option<String>,
}

/// A ledger row joined with its category and payment method names.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    /// The ID of the expense.
    pub id: DatabaseId,
    /// The user that owns the expense.
    pub user_id: UserId,
    /// How much was spent.
    pub amount: f64,
    /// The name of the expense's category.
    pub category: String,
    /// The name of the expense's payment method.
    pub payment_method: String,
    /// The calendar date the expense occurred on.
    pub date: Date,
    /// An optional free-text description.
    pub description: Option<String>,
    /// An optional free-text tag.
    pub tag: Option<String>,
}

/// The closed set of expense fields that can be updated.
///
/// Each variant maps to its own fixed UPDATE statement, so no caller-chosen
/// string ever reaches the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    /// The expense amount.
    Amount,
    /// The category the expense belongs to.
    CategoryId,
    /// The payment method the expense was paid with.
    MethodId,
    /// The calendar date of the expense.
    Date,
    /// The free-text description.
    Description,
    /// The free-text tag.
    Tag,
}

impl ExpenseField {
    /// The field name as presented at the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseField::Amount => "amount",
            ExpenseField::CategoryId => "category_id",
            ExpenseField::MethodId => "method_id",
            ExpenseField::Date => "date",
            ExpenseField::Description => "description",
            ExpenseField::Tag => "tag",
        }
    }
}

impl Display for ExpenseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseField {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim() {
            "amount" => Ok(ExpenseField::Amount),
            "category_id" => Ok(ExpenseField::CategoryId),
            "method_id" => Ok(ExpenseField::MethodId),
            "date" => Ok(ExpenseField::Date),
            "description" => Ok(ExpenseField::Description),
            "tag" => Ok(ExpenseField::Tag),
            other => Err(Error::InvalidField(other.to_owned())),
        }
    }
}

/// The closed set of columns the CSV export can be sorted by.
///
/// Each variant maps to a fixed ORDER BY clause; anything outside the set is
/// rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// The expense's own ID.
    ExpenseId,
    /// The owning user's ID.
    UserId,
    /// The expense amount.
    Amount,
    /// The category name.
    Category,
    /// The payment method name.
    PaymentMethod,
    /// The calendar date.
    Date,
    /// The free-text description.
    Description,
    /// The free-text tag.
    Tag,
}

impl SortField {
    /// The fixed ORDER BY column for the field.
    pub(crate) fn order_by_column(&self) -> &'static str {
        match self {
            SortField::ExpenseId => "e.expense_id",
            SortField::UserId => "e.user_id",
            SortField::Amount => "e.amount",
            SortField::Category => "c.name",
            SortField::PaymentMethod => "p.name",
            SortField::Date => "e.date",
            SortField::Description => "e.description",
            SortField::Tag => "e.tag",
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim() {
            "expense_id" => Ok(SortField::ExpenseId),
            "user_id" => Ok(SortField::UserId),
            "amount" => Ok(SortField::Amount),
            "category" => Ok(SortField::Category),
            "payment_method" => Ok(SortField::PaymentMethod),
            "date" => Ok(SortField::Date),
            "description" => Ok(SortField::Description),
            "tag" => Ok(SortField::Tag),
            other => Err(Error::InvalidField(other.to_owned())),
        }
    }
}

/// Optional predicates for listing expenses. All present predicates are
/// combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Only expenses in the category with this exact name.
    pub category: Option<String>,
    /// Only expenses on this exact date.
    pub date: Option<Date>,
    /// Only expenses with an amount at least this (inclusive).
    pub amount_min: Option<f64>,
    /// Only expenses with an amount at most this (inclusive).
    pub amount_max: Option<f64>,
    /// Only expenses paid with the payment method with this exact name.
    pub payment_method: Option<String>,
}
