//! CSV export and import of the expense ledger.
//!
//! The interchange format has the columns `expense_id, user_id, amount,
//! category, payment_method, date, description, tag`. Category and payment
//! method are carried by name; the importer resolves them back to IDs and
//! lets the store assign fresh expense IDs.

use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{NewExpense, SortField, UserId, parse_date},
    stores::{CategoryStore, ExpenseStore, PaymentMethodStore},
};

/// One row of the CSV interchange format.
#[derive(Debug, Serialize, Deserialize)]
struct ExpenseRecord {
    /// Present in exports, ignored on import: the store assigns identifiers.
    #[serde(default)]
    expense_id: Option<i64>,
    user_id: i64,
    amount: f64,
    category: String,
    payment_method: String,
    date: String,
    description: Option<String>,
    tag: Option<String>,
}

/// Export the full joined ledger (all users) to a CSV file at `path`.
///
/// Returns the number of rows written.
///
/// # Errors
/// Returns [Error::Io] if the file cannot be written. An invalid sort field
/// never reaches this function: [SortField] only parses allow-listed names.
pub fn export_expenses(
    store: &impl ExpenseStore,
    path: &Path,
    sort: Option<SortField>,
) -> Result<usize, Error> {
    let rows = store.dump(sort)?;
    let count = rows.len();

    let mut writer =
        csv::Writer::from_path(path).map_err(|error| Error::Io(error.to_string()))?;

    for row in rows {
        writer
            .serialize(ExpenseRecord {
                expense_id: Some(row.id),
                user_id: row.user_id.as_i64(),
                amount: row.amount,
                category: row.category,
                payment_method: row.payment_method,
                date: row.date.to_string(),
                description: row.description,
                tag: row.tag,
            })
            .map_err(|error| Error::Io(error.to_string()))?;
    }

    writer
        .flush()
        .map_err(|error| Error::Io(error.to_string()))?;

    tracing::info!("exported {count} expenses to {}", path.display());

    Ok(count)
}

/// Import expenses from the CSV file at `path`, appending them to the
/// ledger.
///
/// Import is best-effort: rows insert one at a time with no surrounding
/// transaction, so the first failing row aborts the remainder while rows
/// already inserted stay committed. Returns the number of imported rows.
///
/// # Errors
/// Returns [Error::FileNotFound] if `path` does not exist,
/// [Error::InvalidCsv] for malformed rows, [Error::ReferentialIntegrity]
/// for a row naming an unknown category, payment method, or user, and the
/// usual amount/date validation errors.
pub fn import_expenses(
    expenses: &impl ExpenseStore,
    categories: &impl CategoryStore,
    methods: &impl PaymentMethodStore,
    path: &Path,
) -> Result<usize, Error> {
    let mut reader = csv::Reader::from_path(path).map_err(|error| match error.kind() {
        csv::ErrorKind::Io(io_error) if io_error.kind() == io::ErrorKind::NotFound => {
            Error::FileNotFound(path.display().to_string())
        }
        _ => Error::InvalidCsv(error.to_string()),
    })?;

    let mut imported = 0;

    for (index, result) in reader.deserialize::<ExpenseRecord>().enumerate() {
        // The header occupies line 1.
        let line = index + 2;

        let import_row = || -> Result<(), Error> {
            let record = result.map_err(|error| Error::InvalidCsv(error.to_string()))?;

            let category = categories
                .get_by_name(&record.category)
                .map_err(not_found_to_referential)?;
            let method = methods
                .get_by_name(&record.payment_method)
                .map_err(not_found_to_referential)?;
            let date = parse_date(&record.date)?;

            expenses.insert(NewExpense {
                user_id: UserId::new(record.user_id),
                category_id: category.id,
                method_id: method.id,
                amount: record.amount,
                date,
                description: record.description,
                tag: record.tag,
            })?;

            Ok(())
        };

        if let Err(error) = import_row() {
            tracing::error!(
                "import from {} aborted at line {line}: {error}; {imported} row(s) already imported",
                path.display()
            );
            return Err(error);
        }

        imported += 1;
    }

    tracing::info!("imported {imported} expenses from {}", path.display());

    Ok(imported)
}

/// An unknown name on import means a row references reference data that
/// does not exist.
fn not_found_to_referential(error: Error) -> Error {
    match error {
        Error::NotFound => Error::ReferentialIntegrity,
        error => error,
    }
}
