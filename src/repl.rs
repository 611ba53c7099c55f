//! The numbered-menu REPL that drives the application.
//!
//! Commands are the integers 1-23 (15 exits) plus `help`. Every error is
//! recovered here: the loop prints a message and keeps going.

use std::{
    io::{self, Write},
    path::Path,
    str::FromStr,
};

use tabled::{builder::Builder, settings::Style};

use crate::{
    Error,
    auth::{Session, authenticate},
    models::{
        CategoryName, DatabaseId, ExpenseField, ExpenseFilter, ExpenseRow, MethodName, Role,
        NewExpense, SortField, parse_amount, parse_date,
    },
    stores::{CategoryStore, ExpenseStore, PaymentMethodStore, ReportStore, UserStore},
    transfer,
};

const HELP: &str = "
Enter the NUMBER to select an option:

1.  Create user (Admin only)
2.  Log in
3.  Log out
4.  List users (Admin only)
5.  Add category (Admin only)
6.  List categories
7.  Add payment method (Admin only)
8.  List payment methods
9.  Add expense
10. Update expense
11. Delete expense
12. List expenses (with optional filters)
13. Export to CSV (Admin only)
14. Import from CSV
15. Exit

REPORTS:
16. Top N expenses in date range
17. Category spending summary
18. Expenses above category average
19. Monthly spending by category
20. Highest spender per month (Admin only)
21. Most frequent category
22. Payment method usage
23. Expenses by tag
";

/// The interactive menu loop.
///
/// Holds the stores plus the only piece of cross-command state: the current
/// [Session], created at login and cleared on logout or exit.
pub struct Repl<U, C, M, E, R> {
    users: U,
    categories: C,
    methods: M,
    expenses: E,
    reports: R,
    session: Option<Session>,
}

impl<U, C, M, E, R> Repl<U, C, M, E, R>
where
    U: UserStore,
    C: CategoryStore,
    M: PaymentMethodStore,
    E: ExpenseStore,
    R: ReportStore,
{
    /// Create a REPL over the given stores with no one logged in.
    pub fn new(users: U, categories: C, methods: M, expenses: E, reports: R) -> Self {
        Self {
            users,
            categories,
            methods,
            expenses,
            reports,
            session: None,
        }
    }

    /// Run the menu loop until the user exits or stdin closes.
    ///
    /// # Errors
    /// Returns an error only for I/O failures on the terminal itself;
    /// application errors are printed and the loop continues.
    pub fn run(&mut self) -> io::Result<()> {
        self.bootstrap_if_empty()?;

        println!("Type 'help' to see available options\n");

        let mut input = String::new();

        loop {
            print!("> ");
            io::stdout().flush()?;

            input.clear();
            if io::stdin().read_line(&mut input)? == 0 {
                break;
            }

            let command = input.trim().to_lowercase();

            if command == "help" {
                println!("{HELP}");
                continue;
            }

            match command.parse::<u32>() {
                Ok(15) => break,
                Ok(option) => self.dispatch(option)?,
                Err(_) => {
                    println!("Please enter a number (1-23) or 'help'.");
                }
            }
        }

        self.session = None;

        Ok(())
    }

    /// Offer to create the initial admin account when the database is empty.
    ///
    /// Without this there would be no admin to create the first user.
    fn bootstrap_if_empty(&self) -> io::Result<()> {
        match self.users.count() {
            Ok(0) => {
                println!("No users exist yet. Create the initial Admin account.");

                let username = prompt("Username: ")?;
                let password = rpassword::prompt_password("Password: ")?;

                match self.users.create_initial_admin(&username, &password) {
                    Ok(user) => println!("Admin '{}' created. Log in with option 2.", user.username()),
                    Err(error) => print_error(&error),
                }
            }
            Ok(_) => {}
            Err(error) => print_error(&error),
        }

        Ok(())
    }

    fn dispatch(&mut self, option: u32) -> io::Result<()> {
        match option {
            1 => self.create_user()?,
            2 => self.log_in()?,
            3 => self.log_out(),
            4 => self.list_users(),
            5 => self.add_category()?,
            6 => self.list_categories(),
            7 => self.add_payment_method()?,
            8 => self.list_payment_methods(),
            9 => self.add_expense()?,
            10 => self.update_expense()?,
            11 => self.delete_expense()?,
            12 => self.list_expenses()?,
            13 => self.export_csv()?,
            14 => self.import_csv()?,
            16 => self.report_top_expenses()?,
            17 => self.report_category_spending()?,
            18 => self.report_above_average(),
            19 => self.report_monthly_category(),
            20 => self.report_highest_spender(),
            21 => self.report_frequent_category(),
            22 => self.report_method_usage(),
            23 => self.report_tag_expenses(),
            _ => println!("Invalid option number. Type 'help' to see available options."),
        }

        Ok(())
    }

    /// The current session, or a hint to log in first.
    fn current_session(&self) -> Option<Session> {
        if self.session.is_none() {
            println!("You must log in first.");
        }

        self.session
    }

    /// The current session if it belongs to an admin, or an access-denied
    /// message. The stores check the role again; this only saves the user
    /// from answering prompts for an operation that must fail.
    fn admin_session(&self) -> Option<Session> {
        match self.session {
            Some(session) if session.is_admin() => Some(session),
            _ => {
                println!("Access denied. Admin only.");
                None
            }
        }
    }

    fn create_user(&self) -> io::Result<()> {
        let Some(session) = self.admin_session() else {
            return Ok(());
        };

        let username = prompt("Username: ")?;
        let password = rpassword::prompt_password("Password: ")?;
        let role = match prompt_optional("Role (Admin/User, default User): ")? {
            Some(raw_role) => match Role::from_str(&raw_role) {
                Ok(role) => role,
                Err(error) => {
                    print_error(&error);
                    return Ok(());
                }
            },
            None => Role::User,
        };

        match self.users.create(&session, &username, &password, role) {
            Ok(user) => println!("User '{}' created with role '{}'.", user.username(), user.role()),
            Err(error) => print_error(&error),
        }

        Ok(())
    }

    fn log_in(&mut self) -> io::Result<()> {
        let username = prompt("Username: ")?;
        let password = rpassword::prompt_password("Password: ")?;

        match authenticate(&self.users, &username, &password) {
            Ok(session) => {
                tracing::info!("user {} logged in as {}", session.user_id(), session.role());
                println!("Login successful. Welcome, {username} ({}).", session.role());
                self.session = Some(session);
            }
            Err(error) => print_error(&error),
        }

        Ok(())
    }

    fn log_out(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!("user {} logged out", session.user_id());
        }

        println!("Logged out.");
    }

    fn list_users(&self) {
        let Some(session) = self.current_session() else {
            return;
        };

        match self.users.list(&session) {
            Ok(users) => {
                let rows = users
                    .iter()
                    .map(|user| {
                        vec![
                            user.id().to_string(),
                            user.username().to_owned(),
                            user.role().to_string(),
                        ]
                    })
                    .collect();
                println!("{}", render_table(&["ID", "Username", "Role"], rows));
            }
            Err(error) => print_error(&error),
        }
    }

    fn add_category(&self) -> io::Result<()> {
        let Some(session) = self.admin_session() else {
            return Ok(());
        };

        let name = prompt("Category name: ")?;

        let result = CategoryName::new(&name)
            .and_then(|name| self.categories.create(&session, name));

        match result {
            Ok(category) => println!("Category '{}' created.", category.name),
            Err(error) => print_error(&error),
        }

        Ok(())
    }

    fn list_categories(&self) {
        match self.categories.get_all() {
            Ok(categories) => {
                let rows = categories
                    .iter()
                    .map(|category| vec![category.id.to_string(), category.name.to_string()])
                    .collect();
                println!("{}", render_table(&["ID", "Name"], rows));
            }
            Err(error) => print_error(&error),
        }
    }

    fn add_payment_method(&self) -> io::Result<()> {
        let Some(session) = self.admin_session() else {
            return Ok(());
        };

        let name = prompt("Payment method name: ")?;

        let result = MethodName::new(&name)
            .and_then(|name| self.methods.create(&session, name));

        match result {
            Ok(method) => println!("Payment method '{}' created.", method.name),
            Err(error) => print_error(&error),
        }

        Ok(())
    }

    fn list_payment_methods(&self) {
        match self.methods.get_all() {
            Ok(methods) => {
                let rows = methods
                    .iter()
                    .map(|method| vec![method.id.to_string(), method.name.to_string()])
                    .collect();
                println!("{}", render_table(&["ID", "Name"], rows));
            }
            Err(error) => print_error(&error),
        }
    }

    fn add_expense(&self) -> io::Result<()> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };

        let result = (|| -> Result<(), Error> {
            let amount = parse_amount(&prompt("Amount: ")?)?;
            let category_id = parse_id(&prompt("Category ID: ")?)?;
            let method_id = parse_id(&prompt("Payment method ID: ")?)?;
            let date = parse_date(&prompt("Date (YYYY-MM-DD): ")?)?;
            let description = prompt_optional("Description (optional): ")?;
            let tag = prompt_optional("Tag (optional): ")?;

            let expense = self.expenses.add(
                &session,
                NewExpense {
                    user_id: session.user_id(),
                    category_id,
                    method_id,
                    amount,
                    date,
                    description,
                    tag,
                },
            )?;

            println!("Expense {} added.", expense.id);

            Ok(())
        })();

        if let Err(error) = result {
            print_error(&error);
        }

        Ok(())
    }

    fn update_expense(&self) -> io::Result<()> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };

        let result = (|| -> Result<(), Error> {
            let expense_id = parse_id(&prompt("Expense ID to update: ")?)?;
            let field = ExpenseField::from_str(&prompt(
                "Field to update (amount/category_id/method_id/date/description/tag): ",
            )?)?;
            let new_value = prompt(&format!("New value for {field}: "))?;

            self.expenses.update(&session, expense_id, field, &new_value)?;

            println!("Expense {expense_id} updated.");

            Ok(())
        })();

        if let Err(error) = result {
            print_error(&error);
        }

        Ok(())
    }

    fn delete_expense(&self) -> io::Result<()> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };

        let result = (|| -> Result<(), Error> {
            let expense_id = parse_id(&prompt("Expense ID to delete: ")?)?;

            self.expenses.delete(&session, expense_id)?;

            println!("Expense {expense_id} deleted.");

            Ok(())
        })();

        if let Err(error) = result {
            print_error(&error);
        }

        Ok(())
    }

    fn list_expenses(&self) -> io::Result<()> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };

        println!("Filters (press enter to skip):");
        let category = prompt_optional("Category name: ")?;
        let date = prompt_optional("Date (YYYY-MM-DD): ")?;
        let amount_min = prompt_optional("Minimum amount: ")?;
        let amount_max = prompt_optional("Maximum amount: ")?;
        let payment_method = prompt_optional("Payment method: ")?;

        let result = build_filter(category, date, amount_min, amount_max, payment_method)
            .and_then(|filter| self.expenses.list(&session, &filter));

        match result {
            Ok(rows) if rows.is_empty() => println!("No expenses found."),
            Ok(rows) => println!("{}", render_expense_table(&rows)),
            Err(error) => print_error(&error),
        }

        Ok(())
    }

    fn export_csv(&self) -> io::Result<()> {
        if self.admin_session().is_none() {
            return Ok(());
        }

        let result = (|| -> Result<usize, Error> {
            let filename = prompt("Export to file (e.g. expenses.csv): ")?;
            let sort = prompt_optional("Sort by field (optional): ")?
                .as_deref()
                .map(SortField::from_str)
                .transpose()?;

            transfer::export_expenses(&self.expenses, Path::new(&filename), sort)
        })();

        match result {
            Ok(count) => println!("Exported {count} expense(s)."),
            Err(error) => print_error(&error),
        }

        Ok(())
    }

    fn import_csv(&self) -> io::Result<()> {
        let filename = prompt("Import from file: ")?;

        let result = transfer::import_expenses(
            &self.expenses,
            &self.categories,
            &self.methods,
            Path::new(&filename),
        );

        match result {
            Ok(count) => println!("Imported {count} expense(s)."),
            Err(error) => {
                print_error(&error);
                println!("Rows imported before the failure were kept.");
            }
        }

        Ok(())
    }

    fn report_top_expenses(&self) -> io::Result<()> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };

        let result = (|| -> Result<(), Error> {
            let limit: u32 = prompt("Number of expenses to show: ")?
                .trim()
                .parse()
                .map_err(|_| Error::InvalidValue("expected a positive count".to_owned()))?;
            let start = prompt_optional("Start date (YYYY-MM-DD, optional): ")?
                .as_deref()
                .map(parse_date)
                .transpose()?;
            let end = prompt_optional("End date (YYYY-MM-DD, optional): ")?
                .as_deref()
                .map(parse_date)
                .transpose()?;

            let rows = self.reports.top_expenses(&session, limit, start, end)?;

            if rows.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }

            let table_rows = rows
                .iter()
                .map(|row| {
                    vec![
                        row.id.to_string(),
                        fmt_amount(row.amount),
                        row.category.clone(),
                        row.payment_method.clone(),
                        row.date.to_string(),
                        fmt_optional(&row.description),
                    ]
                })
                .collect();
            println!(
                "{}",
                render_table(
                    &["ID", "Amount", "Category", "Payment method", "Date", "Description"],
                    table_rows
                )
            );

            Ok(())
        })();

        if let Err(error) = result {
            print_error(&error);
        }

        Ok(())
    }

    fn report_category_spending(&self) -> io::Result<()> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };

        let category = prompt("Category name: ")?;

        match self.reports.category_spending(&session, &category) {
            Ok(total) => println!("Total spending on '{category}': {}", fmt_amount(total)),
            Err(error) => print_error(&error),
        }

        Ok(())
    }

    fn report_above_average(&self) {
        let Some(session) = self.current_session() else {
            return;
        };

        match self.reports.above_category_average(&session) {
            Ok(rows) if rows.is_empty() => println!("No expenses found."),
            Ok(rows) => {
                let table_rows = rows
                    .iter()
                    .map(|row| {
                        vec![
                            row.id.to_string(),
                            fmt_amount(row.amount),
                            row.category.clone(),
                            row.date.to_string(),
                            fmt_optional(&row.description),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    render_table(&["ID", "Amount", "Category", "Date", "Description"], table_rows)
                );
            }
            Err(error) => print_error(&error),
        }
    }

    fn report_monthly_category(&self) {
        let Some(session) = self.current_session() else {
            return;
        };

        match self.reports.monthly_category_spending(&session) {
            Ok(rows) if rows.is_empty() => println!("No expenses found."),
            Ok(rows) => {
                let table_rows = rows
                    .iter()
                    .map(|row| {
                        vec![row.month.clone(), row.category.clone(), fmt_amount(row.total)]
                    })
                    .collect();
                println!("{}", render_table(&["Month", "Category", "Total"], table_rows));
            }
            Err(error) => print_error(&error),
        }
    }

    fn report_highest_spender(&self) {
        let Some(session) = self.current_session() else {
            return;
        };

        match self.reports.highest_spender_per_month(&session) {
            Ok(rows) if rows.is_empty() => println!("No expenses found."),
            Ok(rows) => {
                let table_rows = rows
                    .iter()
                    .map(|row| {
                        vec![row.month.clone(), row.username.clone(), fmt_amount(row.total)]
                    })
                    .collect();
                println!("{}", render_table(&["Month", "Username", "Total"], table_rows));
            }
            Err(error) => print_error(&error),
        }
    }

    fn report_frequent_category(&self) {
        let Some(session) = self.current_session() else {
            return;
        };

        match self.reports.most_frequent_category(&session) {
            Ok(Some(row)) => {
                println!("Most frequent category: {} ({} expense(s))", row.category, row.count);
            }
            Ok(None) => println!("No expenses found."),
            Err(error) => print_error(&error),
        }
    }

    fn report_method_usage(&self) {
        let Some(session) = self.current_session() else {
            return;
        };

        match self.reports.payment_method_usage(&session) {
            Ok(rows) if rows.is_empty() => println!("No expenses found."),
            Ok(rows) => {
                let table_rows = rows
                    .iter()
                    .map(|row| {
                        vec![
                            row.payment_method.clone(),
                            row.count.to_string(),
                            fmt_amount(row.total),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    render_table(&["Payment method", "Count", "Total"], table_rows)
                );
            }
            Err(error) => print_error(&error),
        }
    }

    fn report_tag_expenses(&self) {
        let Some(session) = self.current_session() else {
            return;
        };

        match self.reports.expenses_by_tag(&session) {
            Ok(rows) if rows.is_empty() => println!("No tagged expenses found."),
            Ok(rows) => {
                let table_rows = rows
                    .iter()
                    .map(|row| {
                        vec![row.tag.clone(), row.count.to_string(), fmt_amount(row.total)]
                    })
                    .collect();
                println!("{}", render_table(&["Tag", "Count", "Total"], table_rows));
            }
            Err(error) => print_error(&error),
        }
    }
}

/// Assemble an [ExpenseFilter] from raw prompt answers, parsing dates and
/// amounts.
fn build_filter(
    category: Option<String>,
    date: Option<String>,
    amount_min: Option<String>,
    amount_max: Option<String>,
    payment_method: Option<String>,
) -> Result<ExpenseFilter, Error> {
    Ok(ExpenseFilter {
        category,
        date: date.as_deref().map(parse_date).transpose()?,
        amount_min: amount_min.as_deref().map(parse_amount).transpose()?,
        amount_max: amount_max.as_deref().map(parse_amount).transpose()?,
        payment_method,
    })
}

fn parse_id(input: &str) -> Result<DatabaseId, Error> {
    input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidValue(format!("\"{input}\" is not an ID")))
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    Ok(line.trim().to_owned())
}

fn prompt_optional(label: &str) -> io::Result<Option<String>> {
    let answer = prompt(label)?;

    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(answer))
    }
}

fn render_table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().copied());

    for row in rows {
        builder.push_record(row);
    }

    builder.build().with(Style::psql()).to_string()
}

fn render_expense_table(rows: &[ExpenseRow]) -> String {
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                row.id.to_string(),
                fmt_amount(row.amount),
                row.category.clone(),
                row.payment_method.clone(),
                row.date.to_string(),
                fmt_optional(&row.description),
                fmt_optional(&row.tag),
            ]
        })
        .collect();

    render_table(
        &["ID", "Amount", "Category", "Payment method", "Date", "Description", "Tag"],
        table_rows,
    )
}

fn fmt_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

fn fmt_optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn print_error(error: &Error) {
    eprintln!("\x1b[31;1mError: {error}\x1b[0m");
}
