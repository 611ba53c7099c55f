//! Implements the fixed set of aggregate reports over the SQLite ledger.
//!
//! Each report is one prepared statement. Ownership scoping appends a bound
//! `e.user_id` predicate for non-admin actors; no caller-chosen string ever
//! reaches the statement text.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, params_from_iter, types::Value};
use time::Date;

use crate::{
    Error,
    auth::Session,
    stores::{
        AboveAverageRow, CategoryFrequencyRow, MethodUsageRow, MonthlyCategoryRow,
        MonthlySpenderRow, ReportStore, TagSummaryRow, TopExpenseRow,
    },
};

/// Runs aggregate reports against a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteReportStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteReportStore {
    /// Create a new report store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl ReportStore for SqliteReportStore {
    fn top_expenses(
        &self,
        actor: &Session,
        limit: u32,
        start: Option<Date>,
        end: Option<Date>,
    ) -> Result<Vec<TopExpenseRow>, Error> {
        let mut query = String::from(
            "SELECT e.expense_id, e.amount, c.name, p.name, e.date, e.description
             FROM expenses e
             JOIN categories c ON e.category_id = c.category_id
             JOIN payment_methods p ON e.method_id = p.method_id",
        );
        let mut where_clauses = Vec::new();
        let mut query_parameters: Vec<Value> = Vec::new();

        if !actor.is_admin() {
            where_clauses.push(format!("e.user_id = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Integer(actor.user_id().as_i64()));
        }

        match (start, end) {
            (Some(start), Some(end)) => {
                where_clauses.push(format!(
                    "e.date BETWEEN ?{} AND ?{}",
                    query_parameters.len() + 1,
                    query_parameters.len() + 2,
                ));
                query_parameters.push(Value::Text(start.to_string()));
                query_parameters.push(Value::Text(end.to_string()));
            }
            (Some(start), None) => {
                where_clauses.push(format!("e.date >= ?{}", query_parameters.len() + 1));
                query_parameters.push(Value::Text(start.to_string()));
            }
            (None, Some(end)) => {
                where_clauses.push(format!("e.date <= ?{}", query_parameters.len() + 1));
                query_parameters.push(Value::Text(end.to_string()));
            }
            (None, None) => {}
        }

        if !where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&where_clauses.join(" AND "));
        }

        query.push_str(&format!(
            " ORDER BY e.amount DESC LIMIT ?{}",
            query_parameters.len() + 1
        ));
        query_parameters.push(Value::Integer(i64::from(limit)));

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                Ok(TopExpenseRow {
                    id: row.get(0)?,
                    amount: row.get(1)?,
                    category: row.get(2)?,
                    payment_method: row.get(3)?,
                    date: row.get(4)?,
                    description: row.get(5)?,
                })
            })?
            .map(|maybe_row| maybe_row.map_err(Error::SqlError))
            .collect()
    }

    fn category_spending(&self, actor: &Session, category: &str) -> Result<f64, Error> {
        let mut query = String::from(
            "SELECT SUM(e.amount)
             FROM expenses e
             JOIN categories c ON e.category_id = c.category_id
             WHERE c.name = ?1",
        );
        let mut query_parameters = vec![Value::Text(category.to_owned())];

        if !actor.is_admin() {
            query.push_str(" AND e.user_id = ?2");
            query_parameters.push(Value::Integer(actor.user_id().as_i64()));
        }

        let total: Option<f64> = self
            .connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_row(params_from_iter(query_parameters.iter()), |row| row.get(0))?;

        Ok(total.unwrap_or(0.0))
    }

    fn above_category_average(&self, actor: &Session) -> Result<Vec<AboveAverageRow>, Error> {
        // The per-category mean is computed over the whole ledger; the
        // ownership scope only restricts which rows come back.
        let mut query = String::from(
            "SELECT e.expense_id, e.amount, c.name, e.date, e.description
             FROM expenses e
             JOIN categories c ON e.category_id = c.category_id
             JOIN (
                 SELECT category_id, AVG(amount) AS avg_amount
                 FROM expenses
                 GROUP BY category_id
             ) avgs ON e.category_id = avgs.category_id
             WHERE e.amount > avgs.avg_amount",
        );
        let mut query_parameters: Vec<Value> = Vec::new();

        if !actor.is_admin() {
            query.push_str(" AND e.user_id = ?1");
            query_parameters.push(Value::Integer(actor.user_id().as_i64()));
        }

        query.push_str(" ORDER BY e.amount DESC");

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                Ok(AboveAverageRow {
                    id: row.get(0)?,
                    amount: row.get(1)?,
                    category: row.get(2)?,
                    date: row.get(3)?,
                    description: row.get(4)?,
                })
            })?
            .map(|maybe_row| maybe_row.map_err(Error::SqlError))
            .collect()
    }

    fn monthly_category_spending(
        &self,
        actor: &Session,
    ) -> Result<Vec<MonthlyCategoryRow>, Error> {
        let mut query = String::from(
            "SELECT strftime('%Y-%m', e.date) AS month, c.name, SUM(e.amount)
             FROM expenses e
             JOIN categories c ON e.category_id = c.category_id",
        );
        let mut query_parameters: Vec<Value> = Vec::new();

        if !actor.is_admin() {
            query.push_str(" WHERE e.user_id = ?1");
            query_parameters.push(Value::Integer(actor.user_id().as_i64()));
        }

        query.push_str(
            " GROUP BY month, c.name
             ORDER BY month ASC, SUM(e.amount) DESC",
        );

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                Ok(MonthlyCategoryRow {
                    month: row.get(0)?,
                    category: row.get(1)?,
                    total: row.get(2)?,
                })
            })?
            .map(|maybe_row| maybe_row.map_err(Error::SqlError))
            .collect()
    }

    fn highest_spender_per_month(
        &self,
        actor: &Session,
    ) -> Result<Vec<MonthlySpenderRow>, Error> {
        actor.require_admin()?;

        // The window maximum is evaluated per month; keeping every row that
        // equals it returns all users tied for the top spot.
        let query = "SELECT month, username, max_spending FROM (
                 SELECT strftime('%Y-%m', e.date) AS month,
                        u.username AS username,
                        SUM(e.amount) AS total_spending,
                        MAX(SUM(e.amount)) OVER (PARTITION BY strftime('%Y-%m', e.date)) AS max_spending
                 FROM expenses e
                 JOIN users u ON e.user_id = u.user_id
                 GROUP BY month, u.user_id
             )
             WHERE total_spending = max_spending
             ORDER BY month ASC, username ASC";

        self.connection
            .lock()
            .unwrap()
            .prepare(query)?
            .query_map([], |row| {
                Ok(MonthlySpenderRow {
                    month: row.get(0)?,
                    username: row.get(1)?,
                    total: row.get(2)?,
                })
            })?
            .map(|maybe_row| maybe_row.map_err(Error::SqlError))
            .collect()
    }

    fn most_frequent_category(
        &self,
        actor: &Session,
    ) -> Result<Option<CategoryFrequencyRow>, Error> {
        let mut query = String::from(
            "SELECT c.name, COUNT(*)
             FROM expenses e
             JOIN categories c ON e.category_id = c.category_id",
        );
        let mut query_parameters: Vec<Value> = Vec::new();

        if !actor.is_admin() {
            query.push_str(" WHERE e.user_id = ?1");
            query_parameters.push(Value::Integer(actor.user_id().as_i64()));
        }

        query.push_str(" GROUP BY c.name ORDER BY COUNT(*) DESC LIMIT 1");

        let row = self
            .connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_row(params_from_iter(query_parameters.iter()), |row| {
                Ok(CategoryFrequencyRow {
                    category: row.get(0)?,
                    count: row.get(1)?,
                })
            });

        match row {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn payment_method_usage(&self, actor: &Session) -> Result<Vec<MethodUsageRow>, Error> {
        let mut query = String::from(
            "SELECT p.name, COUNT(*), SUM(e.amount)
             FROM expenses e
             JOIN payment_methods p ON e.method_id = p.method_id",
        );
        let mut query_parameters: Vec<Value> = Vec::new();

        if !actor.is_admin() {
            query.push_str(" WHERE e.user_id = ?1");
            query_parameters.push(Value::Integer(actor.user_id().as_i64()));
        }

        query.push_str(" GROUP BY p.name ORDER BY SUM(e.amount) DESC");

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                Ok(MethodUsageRow {
                    payment_method: row.get(0)?,
                    count: row.get(1)?,
                    total: row.get(2)?,
                })
            })?
            .map(|maybe_row| maybe_row.map_err(Error::SqlError))
            .collect()
    }

    fn expenses_by_tag(&self, actor: &Session) -> Result<Vec<TagSummaryRow>, Error> {
        let mut query = String::from(
            "SELECT e.tag, COUNT(*), SUM(e.amount)
             FROM expenses e
             WHERE e.tag IS NOT NULL",
        );
        let mut query_parameters: Vec<Value> = Vec::new();

        if !actor.is_admin() {
            query.push_str(" AND e.user_id = ?1");
            query_parameters.push(Value::Integer(actor.user_id().as_i64()));
        }

        query.push_str(" GROUP BY e.tag ORDER BY COUNT(*) DESC");

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                Ok(TagSummaryRow {
                    tag: row.get(0)?,
                    count: row.get(1)?,
                    total: row.get(2)?,
                })
            })?
            .map(|maybe_row| maybe_row.map_err(Error::SqlError))
            .collect()
    }
}
