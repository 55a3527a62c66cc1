use anyhow::Result;
use chrono::Local;
use rust_decimal::Decimal;

use crate::db::Database;
use crate::models::{Category, Expense, ExpenseForm, MonthKey, ValidationError};
use crate::report::{self, CategoryShare};
use crate::ui::util::format_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Expenses,
    Report,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Expenses, Self::Report]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expenses => write!(f, "Expenses"),
            Self::Report => write!(f, "Report"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Form => write!(f, "FORM"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, description: String },
}

/// The add-expense entry form. Field indexes: 0 date, 1 amount,
/// 2 description, 3 category.
#[derive(Debug, Clone)]
pub(crate) struct AddForm {
    pub(crate) date: String,
    pub(crate) amount: String,
    pub(crate) description: String,
    pub(crate) category_index: usize,
    pub(crate) focus: usize,
}

impl AddForm {
    pub(crate) const FIELDS: usize = 4;

    pub(crate) fn new() -> Self {
        Self {
            date: Local::now().format("%Y-%m-%d").to_string(),
            amount: String::new(),
            description: String::new(),
            category_index: 0,
            focus: 0,
        }
    }

    pub(crate) fn category(&self) -> Category {
        Category::all()[self.category_index]
    }

    pub(crate) fn cycle_category(&mut self, delta: i32) {
        let len = Category::all().len();
        self.category_index = if delta > 0 {
            (self.category_index + 1) % len
        } else if self.category_index == 0 {
            len - 1
        } else {
            self.category_index - 1
        };
    }

    /// The raw text payload handed to the store, exactly as typed.
    pub(crate) fn as_input(&self) -> ExpenseForm {
        ExpenseForm {
            amount: self.amount.clone(),
            description: self.description.clone(),
            category: self.category().as_str().to_string(),
            date: self.date.clone(),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    /// The month the user is looking at. Owned here, passed explicitly
    /// into every store query.
    pub(crate) month: MonthKey,

    // Expenses
    pub(crate) expenses: Vec<Expense>,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,
    pub(crate) expense_count: i64,
    pub(crate) month_total: Decimal,

    // Report
    pub(crate) breakdown: Vec<CategoryShare>,

    // Add form
    pub(crate) form: AddForm,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Expenses,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            month: MonthKey::from_date(Local::now().date_naive()),

            expenses: Vec::new(),
            expense_index: 0,
            expense_scroll: 0,
            expense_count: 0,
            month_total: Decimal::ZERO,

            breakdown: Vec::new(),

            form: AddForm::new(),

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh_expenses(&mut self, db: &Database) -> Result<()> {
        self.expenses = db.expenses_for_month(self.month)?;
        self.month_total = report::total(&self.expenses);
        self.expense_count = db.expense_count()?;
        if self.expense_index >= self.expenses.len() && !self.expenses.is_empty() {
            self.expense_index = self.expenses.len() - 1;
        }
        Ok(())
    }

    pub(crate) fn refresh_report(&mut self, db: &Database) -> Result<()> {
        let expenses = db.expenses_for_month(self.month)?;
        self.breakdown = report::breakdown(&expenses);
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_expenses(db)?;
        self.refresh_report(db)?;
        Ok(())
    }

    pub(crate) fn set_month(&mut self, month: MonthKey, db: &Database) -> Result<()> {
        self.month = month;
        self.expense_index = 0;
        self.expense_scroll = 0;
        self.refresh_all(db)?;
        self.set_status(format!("Month: {}", self.month.label()));
        Ok(())
    }

    pub(crate) fn open_form(&mut self) {
        self.form = AddForm::new();
        self.input_mode = InputMode::Form;
    }

    /// Submits the add form. A validation failure keeps the form open and
    /// shows the reason; any other store error propagates.
    pub(crate) fn submit_form(&mut self, db: &Database) -> Result<()> {
        match db.add_expense(&self.form.as_input()) {
            Ok(expense) => {
                self.input_mode = InputMode::Normal;
                self.set_status(format!(
                    "Added: {} {}",
                    expense.description,
                    format_amount(expense.amount)
                ));
                // The list only changes when the record lands in the
                // month on screen, but the count always does.
                if expense.month_key == self.month {
                    self.refresh_all(db)?;
                } else {
                    self.expense_count = db.expense_count()?;
                }
            }
            Err(e) => {
                if e.downcast_ref::<ValidationError>().is_some() {
                    self.set_status(format!("{e}"));
                } else {
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
