//! Defines the domain models: users, categories, payment methods, and
//! expenses, along with their validated field types.

mod category;
mod expense;
mod password;
mod payment_method;
mod user;

pub use category::{Category, CategoryName};
pub use expense::{
    Expense, ExpenseField, ExpenseFilter, ExpenseRow, NewExpense, SortField, parse_amount,
    parse_date,
};
pub use password::PasswordHash;
pub use payment_method::{MethodName, PaymentMethod};
pub use user::{Role, User, UserId};

/// An alias for the integer type used for database row identifiers.
pub type DatabaseId = i64;
