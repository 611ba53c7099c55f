//! Defines the expense ledger store trait.

use crate::{
    Error,
    auth::Session,
    models::{DatabaseId, Expense, ExpenseField, ExpenseFilter, ExpenseRow, NewExpense, SortField},
};

/// Handles the creation, mutation, and retrieval of ledger rows, enforcing
/// the ownership rule: non-admin actors only touch their own expenses.
pub trait ExpenseStore {
    /// Add an expense for `actor` (or, for admins, any user).
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the amount is not greater than
    /// zero, [Error::ReferentialIntegrity] if the category or payment method
    /// does not exist, and [Error::PermissionDenied] if a non-admin actor
    /// tries to create an expense owned by someone else.
    fn add(&self, actor: &Session, new_expense: NewExpense) -> Result<Expense, Error>;

    /// Insert an expense without an acting session.
    ///
    /// This is the bulk import path; callers are responsible for gating
    /// access. Amount and referential integrity checks still apply.
    fn insert(&self, new_expense: NewExpense) -> Result<Expense, Error>;

    /// Update a single field of an expense, coercing `new_value` to the
    /// field's type.
    ///
    /// Non-admin actors must own the row: a non-owner (or a row that does
    /// not exist) fails with [Error::PermissionDenied], while an admin
    /// updating a missing row fails with [Error::NotFound].
    fn update(
        &self,
        actor: &Session,
        expense_id: DatabaseId,
        field: ExpenseField,
        new_value: &str,
    ) -> Result<(), Error>;

    /// Delete an expense. Gated like [ExpenseStore::update].
    fn delete(&self, actor: &Session, expense_id: DatabaseId) -> Result<(), Error>;

    /// Retrieve an expense by its ID, without an ownership gate.
    fn get(&self, expense_id: DatabaseId) -> Result<Expense, Error>;

    /// List expenses matching `filter`, joined with category and payment
    /// method names. Non-admin actors only see their own rows.
    fn list(&self, actor: &Session, filter: &ExpenseFilter) -> Result<Vec<ExpenseRow>, Error>;

    /// Dump the full joined ledger across all users, optionally sorted.
    ///
    /// There is no ownership scope here; the caller gates access (the CLI
    /// only offers the export to admins).
    fn dump(&self, sort: Option<SortField>) -> Result<Vec<ExpenseRow>, Error>;
}
