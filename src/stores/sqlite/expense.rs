//! Implements the SQLite backed expense ledger.
//!
//! All access control lives here: every mutating operation takes the acting
//! [Session] and applies the ownership rule before touching a row.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    auth::Session,
    db::{CreateTable, MapRow},
    models::{
        DatabaseId, Expense, ExpenseField, ExpenseFilter, ExpenseRow, NewExpense, SortField,
        UserId, parse_date,
    },
    stores::ExpenseStore,
};

/// The columns of the joined ledger view, in the order the CSV export
/// writes them.
const JOINED_COLUMNS: &str = "e.expense_id, e.user_id, e.amount, c.name, p.name, e.date, \
     e.description, e.tag";

/// Stores expenses in a SQLite database.
///
/// Note that because an expense references a [User](crate::models::User),
/// [Category](crate::models::Category), and
/// [PaymentMethod](crate::models::PaymentMethod), those tables must be set
/// up in the database.
#[derive(Debug, Clone)]
pub struct SqliteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn map_joined_row(row: &Row) -> Result<ExpenseRow, rusqlite::Error> {
        Ok(ExpenseRow {
            id: row.get(0)?,
            user_id: UserId::new(row.get(1)?),
            amount: row.get(2)?,
            category: row.get(3)?,
            payment_method: row.get(4)?,
            date: row.get(5)?,
            description: row.get(6)?,
            tag: row.get(7)?,
        })
    }

    /// Check that `actor` may mutate the expense `expense_id`.
    ///
    /// Mirrors the listing scope: a non-admin probing a row they do not own
    /// gets [Error::PermissionDenied] whether or not the row exists, so a
    /// non-owner cannot learn which IDs are in use.
    fn check_ownership(
        connection: &Connection,
        actor: &Session,
        expense_id: DatabaseId,
    ) -> Result<(), Error> {
        if actor.is_admin() {
            return Ok(());
        }

        let probe = connection
            .prepare("SELECT expense_id FROM expenses WHERE expense_id = ?1 AND user_id = ?2")?
            .query_row((expense_id, actor.user_id().as_i64()), |row| {
                row.get::<_, i64>(0)
            });

        match probe {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::PermissionDenied),
            Err(error) => Err(error.into()),
        }
    }
}

impl ExpenseStore for SqliteExpenseStore {
    fn add(&self, actor: &Session, new_expense: NewExpense) -> Result<Expense, Error> {
        if !actor.is_admin() && new_expense.user_id != actor.user_id() {
            return Err(Error::PermissionDenied);
        }

        self.insert(new_expense)
    }

    /// Insert a new expense into the database.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the amount is not greater than
    /// zero, [Error::ReferentialIntegrity] if the user, category, or payment
    /// method does not exist, or [Error::SqlError] for other SQL errors.
    fn insert(&self, new_expense: NewExpense) -> Result<Expense, Error> {
        if new_expense.amount <= 0.0 {
            return Err(Error::InvalidAmount(new_expense.amount));
        }

        let connection = self.connection.lock().unwrap();

        let expense = connection
            .prepare(
                "INSERT INTO expenses (user_id, category_id, method_id, amount, date, description, tag)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING expense_id, user_id, category_id, method_id, amount, date, description, tag",
            )?
            .query_row(
                (
                    new_expense.user_id.as_i64(),
                    new_expense.category_id,
                    new_expense.method_id,
                    new_expense.amount,
                    new_expense.date,
                    &new_expense.description,
                    &new_expense.tag,
                ),
                Self::map_row,
            )
            .map_err(|error| match error {
                // Code 787 occurs when a FOREIGN KEY constraint failed.
                rusqlite::Error::SqliteFailure(sql_error, Some(_))
                    if sql_error.extended_code == 787 =>
                {
                    Error::ReferentialIntegrity
                }
                error => error.into(),
            })?;

        Ok(expense)
    }

    /// Update a single field of an expense.
    ///
    /// The ownership probe and the UPDATE run in one transaction; any early
    /// error return rolls the transaction back.
    ///
    /// # Errors
    /// - [Error::PermissionDenied] for a non-admin actor that does not own
    ///   the row (or when the row does not exist),
    /// - [Error::NotFound] for an admin updating a missing row,
    /// - [Error::InvalidValue] if `new_value` cannot be coerced to the
    ///   field's type,
    /// - [Error::InvalidAmount] if the amount field is set to a value not
    ///   greater than zero,
    /// - [Error::ReferentialIntegrity] if a category/method ID update does
    ///   not refer to an existing row.
    fn update(
        &self,
        actor: &Session,
        expense_id: DatabaseId,
        field: ExpenseField,
        new_value: &str,
    ) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        Self::check_ownership(&transaction, actor, expense_id)?;

        // One fixed statement per field keeps caller input out of the
        // statement text entirely.
        let rows_affected = match field {
            ExpenseField::Amount => {
                let amount: f64 = new_value.trim().parse().map_err(|_| {
                    Error::InvalidValue(format!("\"{new_value}\" is not a number"))
                })?;

                if !amount.is_finite() || amount <= 0.0 {
                    return Err(Error::InvalidAmount(amount));
                }

                transaction.execute(
                    "UPDATE expenses SET amount = ?1 WHERE expense_id = ?2",
                    (amount, expense_id),
                )?
            }
            ExpenseField::CategoryId => {
                let category_id: DatabaseId = new_value.trim().parse().map_err(|_| {
                    Error::InvalidValue(format!("\"{new_value}\" is not a category ID"))
                })?;

                transaction.execute(
                    "UPDATE expenses SET category_id = ?1 WHERE expense_id = ?2",
                    (category_id, expense_id),
                )?
            }
            ExpenseField::MethodId => {
                let method_id: DatabaseId = new_value.trim().parse().map_err(|_| {
                    Error::InvalidValue(format!("\"{new_value}\" is not a payment method ID"))
                })?;

                transaction.execute(
                    "UPDATE expenses SET method_id = ?1 WHERE expense_id = ?2",
                    (method_id, expense_id),
                )?
            }
            ExpenseField::Date => {
                let date = parse_date(new_value)?;

                transaction.execute(
                    "UPDATE expenses SET date = ?1 WHERE expense_id = ?2",
                    (date, expense_id),
                )?
            }
            ExpenseField::Description => transaction.execute(
                "UPDATE expenses SET description = ?1 WHERE expense_id = ?2",
                (new_value, expense_id),
            )?,
            ExpenseField::Tag => transaction.execute(
                "UPDATE expenses SET tag = ?1 WHERE expense_id = ?2",
                (new_value, expense_id),
            )?,
        };

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        transaction.commit()?;

        Ok(())
    }

    /// Delete an expense.
    ///
    /// Gated and transacted like [SqliteExpenseStore::update].
    fn delete(&self, actor: &Session, expense_id: DatabaseId) -> Result<(), Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        Self::check_ownership(&transaction, actor, expense_id)?;

        let rows_affected = transaction.execute(
            "DELETE FROM expenses WHERE expense_id = ?1",
            (expense_id,),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        transaction.commit()?;

        Ok(())
    }

    /// Retrieve an expense by its `expense_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such expense.
    fn get(&self, expense_id: DatabaseId) -> Result<Expense, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT expense_id, user_id, category_id, method_id, amount, date, description, tag
                 FROM expenses WHERE expense_id = :id",
            )?
            .query_row(&[(":id", &expense_id)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// List expenses matching `filter`.
    ///
    /// Non-admin actors are implicitly scoped to their own rows. Every
    /// predicate value is bound as a parameter.
    fn list(&self, actor: &Session, filter: &ExpenseFilter) -> Result<Vec<ExpenseRow>, Error> {
        let mut query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM expenses e
             JOIN categories c ON e.category_id = c.category_id
             JOIN payment_methods p ON e.method_id = p.method_id"
        );
        let mut where_clauses = Vec::new();
        let mut query_parameters: Vec<Value> = Vec::new();

        if !actor.is_admin() {
            where_clauses.push(format!("e.user_id = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Integer(actor.user_id().as_i64()));
        }

        if let Some(category) = &filter.category {
            where_clauses.push(format!("c.name = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(category.clone()));
        }

        if let Some(date) = filter.date {
            where_clauses.push(format!("e.date = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(date.to_string()));
        }

        if let Some(amount_min) = filter.amount_min {
            where_clauses.push(format!("e.amount >= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Real(amount_min));
        }

        if let Some(amount_max) = filter.amount_max {
            where_clauses.push(format!("e.amount <= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Real(amount_max));
        }

        if let Some(payment_method) = &filter.payment_method {
            where_clauses.push(format!("p.name = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(payment_method.clone()));
        }

        if !where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&where_clauses.join(" AND "));
        }

        query.push_str(" ORDER BY e.expense_id ASC");

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                Self::map_joined_row(row)
            })?
            .map(|maybe_row| maybe_row.map_err(Error::SqlError))
            .collect()
    }

    /// Dump the full joined ledger across all users.
    ///
    /// With `sort` unset, rows come back in storage order, matching the
    /// unsorted export.
    fn dump(&self, sort: Option<SortField>) -> Result<Vec<ExpenseRow>, Error> {
        let mut query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM expenses e
             JOIN categories c ON e.category_id = c.category_id
             JOIN payment_methods p ON e.method_id = p.method_id"
        );

        if let Some(sort) = sort {
            query.push_str(" ORDER BY ");
            query.push_str(sort.order_by_column());
        }

        self.connection
            .lock()
            .unwrap()
            .prepare(&query)?
            .query_map([], |row| Self::map_joined_row(row))?
            .map(|maybe_row| maybe_row.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for SqliteExpenseStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expenses (
                    expense_id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    category_id INTEGER NOT NULL,
                    method_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    description TEXT,
                    tag TEXT,
                    FOREIGN KEY(user_id) REFERENCES users(user_id),
                    FOREIGN KEY(category_id) REFERENCES categories(category_id),
                    FOREIGN KEY(method_id) REFERENCES payment_methods(method_id)
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteExpenseStore {
    type ReturnType = Expense;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Expense {
            id: row.get(offset)?,
            user_id: UserId::new(row.get(offset + 1)?),
            category_id: row.get(offset + 2)?,
            method_id: row.get(offset + 3)?,
            amount: row.get(offset + 4)?,
            date: row.get(offset + 5)?,
            description: row.get(offset + 6)?,
            tag: row.get(offset + 7)?,
        })
    }
}

#[cfg(test)]
mod expense_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::Session,
        db::initialize,
        models::{
            CategoryName, DatabaseId, ExpenseField, ExpenseFilter, MethodName, NewExpense, Role,
        },
        stores::{
            CategoryStore, ExpenseStore, PaymentMethodStore, UserStore,
            sqlite::{SqliteCategoryStore, SqlitePaymentMethodStore, SqliteUserStore},
        },
    };

    use super::SqliteExpenseStore;

    struct Fixture {
        store: SqliteExpenseStore,
        admin: Session,
        alice: Session,
        bob: Session,
        category_id: DatabaseId,
        method_id: DatabaseId,
    }

    fn get_fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let users = SqliteUserStore::with_cost(connection.clone(), 4);
        let admin_user = users.create_initial_admin("root", "hunter2").unwrap();
        let admin = Session::new(admin_user.id(), admin_user.role());

        let alice_user = users.create(&admin, "alice", "hunter2", Role::User).unwrap();
        let alice = Session::new(alice_user.id(), alice_user.role());

        let bob_user = users.create(&admin, "bob", "hunter2", Role::User).unwrap();
        let bob = Session::new(bob_user.id(), bob_user.role());

        let category_id = SqliteCategoryStore::new(connection.clone())
            .create(&admin, CategoryName::new_unchecked("Food"))
            .unwrap()
            .id;
        let method_id = SqlitePaymentMethodStore::new(connection.clone())
            .create(&admin, MethodName::new_unchecked("Card"))
            .unwrap()
            .id;

        Fixture {
            store: SqliteExpenseStore::new(connection),
            admin,
            alice,
            bob,
            category_id,
            method_id,
        }
    }

    fn new_expense(fixture: &Fixture, owner: &Session, amount: f64) -> NewExpense {
        NewExpense {
            user_id: owner.user_id(),
            category_id: fixture.category_id,
            method_id: fixture.method_id,
            amount,
            date: date!(2024 - 03 - 01),
            description: Some("lunch".to_owned()),
            tag: None,
        }
    }

    #[test]
    fn add_expense_succeeds() {
        let fixture = get_fixture();

        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        assert!(expense.id > 0);
        assert_eq!(expense.user_id, fixture.alice.user_id());
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.date, date!(2024 - 03 - 01));
        assert_eq!(expense.description.as_deref(), Some("lunch"));
        assert_eq!(expense.tag, None);
    }

    #[test]
    fn add_expense_fails_on_zero_amount() {
        let fixture = get_fixture();

        let result = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 0.0));

        assert_eq!(result, Err(Error::InvalidAmount(0.0)));
        assert_eq!(
            fixture
                .store
                .list(&fixture.admin, &ExpenseFilter::default())
                .unwrap(),
            [],
            "no row should be persisted"
        );
    }

    #[test]
    fn add_expense_fails_on_negative_amount() {
        let fixture = get_fixture();

        let result = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, -5.0));

        assert_eq!(result, Err(Error::InvalidAmount(-5.0)));
    }

    #[test]
    fn add_expense_fails_on_unknown_category() {
        let fixture = get_fixture();

        let mut expense = new_expense(&fixture, &fixture.alice, 12.5);
        expense.category_id += 123;

        let result = fixture.store.add(&fixture.alice, expense);

        assert_eq!(result, Err(Error::ReferentialIntegrity));
    }

    #[test]
    fn add_expense_fails_on_unknown_payment_method() {
        let fixture = get_fixture();

        let mut expense = new_expense(&fixture, &fixture.alice, 12.5);
        expense.method_id += 123;

        let result = fixture.store.add(&fixture.alice, expense);

        assert_eq!(result, Err(Error::ReferentialIntegrity));
    }

    #[test]
    fn add_expense_for_someone_else_fails_for_non_admin() {
        let fixture = get_fixture();

        let result = fixture
            .store
            .add(&fixture.bob, new_expense(&fixture, &fixture.alice, 12.5));

        assert_eq!(result, Err(Error::PermissionDenied));
    }

    #[test]
    fn update_expense_succeeds_for_owner() {
        let fixture = get_fixture();
        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        fixture
            .store
            .update(&fixture.alice, expense.id, ExpenseField::Amount, "99.99")
            .unwrap();

        assert_eq!(fixture.store.get(expense.id).unwrap().amount, 99.99);
    }

    #[test]
    fn update_expense_succeeds_for_admin() {
        let fixture = get_fixture();
        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        fixture
            .store
            .update(&fixture.admin, expense.id, ExpenseField::Tag, "work")
            .unwrap();

        assert_eq!(
            fixture.store.get(expense.id).unwrap().tag.as_deref(),
            Some("work")
        );
    }

    #[test]
    fn update_expense_fails_for_non_owner() {
        let fixture = get_fixture();
        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        let result = fixture
            .store
            .update(&fixture.bob, expense.id, ExpenseField::Amount, "1.0");

        assert_eq!(result, Err(Error::PermissionDenied));
        assert_eq!(fixture.store.get(expense.id).unwrap().amount, 12.5);
    }

    #[test]
    fn update_missing_expense_fails_with_not_found_for_admin() {
        let fixture = get_fixture();

        let result = fixture
            .store
            .update(&fixture.admin, 1337, ExpenseField::Amount, "1.0");

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_missing_expense_fails_with_permission_denied_for_non_admin() {
        // A non-owner cannot tell a missing row from someone else's row.
        let fixture = get_fixture();

        let result = fixture
            .store
            .update(&fixture.alice, 1337, ExpenseField::Amount, "1.0");

        assert_eq!(result, Err(Error::PermissionDenied));
    }

    #[test]
    fn update_expense_date_rejects_invalid_calendar_date() {
        let fixture = get_fixture();
        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        let result =
            fixture
                .store
                .update(&fixture.alice, expense.id, ExpenseField::Date, "2024-13-01");

        assert!(matches!(result, Err(Error::InvalidValue(_))));
        assert_eq!(
            fixture.store.get(expense.id).unwrap().date,
            date!(2024 - 03 - 01),
            "the row should be unchanged"
        );
    }

    #[test]
    fn update_expense_amount_rejects_non_positive_value() {
        let fixture = get_fixture();
        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        let result = fixture
            .store
            .update(&fixture.alice, expense.id, ExpenseField::Amount, "-3");

        assert_eq!(result, Err(Error::InvalidAmount(-3.0)));
        assert_eq!(fixture.store.get(expense.id).unwrap().amount, 12.5);
    }

    #[test]
    fn update_expense_amount_rejects_text() {
        let fixture = get_fixture();
        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        let result = fixture
            .store
            .update(&fixture.alice, expense.id, ExpenseField::Amount, "a lot");

        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }

    #[test]
    fn update_expense_category_rejects_unknown_id() {
        let fixture = get_fixture();
        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        let result = fixture.store.update(
            &fixture.alice,
            expense.id,
            ExpenseField::CategoryId,
            "999",
        );

        assert_eq!(result, Err(Error::ReferentialIntegrity));
        assert_eq!(
            fixture.store.get(expense.id).unwrap().category_id,
            fixture.category_id
        );
    }

    #[test]
    fn delete_expense_succeeds_for_owner() {
        let fixture = get_fixture();
        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        fixture.store.delete(&fixture.alice, expense.id).unwrap();

        assert_eq!(fixture.store.get(expense.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_expense_fails_for_non_owner() {
        let fixture = get_fixture();
        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        let result = fixture.store.delete(&fixture.bob, expense.id);

        assert_eq!(result, Err(Error::PermissionDenied));
        assert!(fixture.store.get(expense.id).is_ok());
    }

    #[test]
    fn delete_expense_succeeds_for_admin() {
        let fixture = get_fixture();
        let expense = fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 12.5))
            .unwrap();

        fixture.store.delete(&fixture.admin, expense.id).unwrap();

        assert_eq!(fixture.store.get(expense.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_expense_fails_with_not_found_for_admin() {
        let fixture = get_fixture();

        let result = fixture.store.delete(&fixture.admin, 1337);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn list_scopes_non_admin_to_own_rows() {
        let fixture = get_fixture();
        fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 10.0))
            .unwrap();
        fixture
            .store
            .add(&fixture.bob, new_expense(&fixture, &fixture.bob, 20.0))
            .unwrap();

        let alice_rows = fixture
            .store
            .list(&fixture.alice, &ExpenseFilter::default())
            .unwrap();

        assert_eq!(alice_rows.len(), 1, "want 1 row, got {}", alice_rows.len());
        assert_eq!(alice_rows[0].user_id, fixture.alice.user_id());
    }

    #[test]
    fn list_returns_all_rows_for_admin() {
        let fixture = get_fixture();
        fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 10.0))
            .unwrap();
        fixture
            .store
            .add(&fixture.bob, new_expense(&fixture, &fixture.bob, 20.0))
            .unwrap();

        let rows = fixture
            .store
            .list(&fixture.admin, &ExpenseFilter::default())
            .unwrap();

        assert_eq!(rows.len(), 2, "want 2 rows, got {}", rows.len());
    }

    #[test]
    fn list_combines_filters_with_and() {
        let fixture = get_fixture();
        fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 10.0))
            .unwrap();
        fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 50.0))
            .unwrap();
        fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 90.0))
            .unwrap();

        let filter = ExpenseFilter {
            category: Some("Food".to_owned()),
            amount_min: Some(20.0),
            amount_max: Some(60.0),
            ..ExpenseFilter::default()
        };

        let rows = fixture.store.list(&fixture.alice, &filter).unwrap();

        assert_eq!(rows.len(), 1, "want 1 row, got {}", rows.len());
        assert_eq!(rows[0].amount, 50.0);
    }

    #[test]
    fn list_filter_on_unknown_category_matches_nothing() {
        let fixture = get_fixture();
        fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 10.0))
            .unwrap();

        let filter = ExpenseFilter {
            category: Some("Rocketry".to_owned()),
            ..ExpenseFilter::default()
        };

        assert_eq!(fixture.store.list(&fixture.alice, &filter).unwrap(), []);
    }

    #[test]
    fn dump_includes_all_users_rows() {
        let fixture = get_fixture();
        fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 10.0))
            .unwrap();
        fixture
            .store
            .add(&fixture.bob, new_expense(&fixture, &fixture.bob, 20.0))
            .unwrap();

        let rows = fixture.store.dump(None).unwrap();

        assert_eq!(rows.len(), 2, "want 2 rows, got {}", rows.len());
    }

    #[test]
    fn dump_sorts_by_the_requested_field() {
        let fixture = get_fixture();
        fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 90.0))
            .unwrap();
        fixture
            .store
            .add(&fixture.alice, new_expense(&fixture, &fixture.alice, 10.0))
            .unwrap();

        let rows = fixture
            .store
            .dump(Some(crate::models::SortField::Amount))
            .unwrap();

        assert_eq!(rows[0].amount, 10.0);
        assert_eq!(rows[1].amount, 90.0);
    }
}
