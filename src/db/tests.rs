#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn add(db: &Database, amount: &str, description: &str, category: &str, date: &str) -> Expense {
    db.add_expense(&ExpenseForm {
        amount: amount.into(),
        description: description.into(),
        category: category.into(),
        date: date.into(),
    })
    .unwrap()
}

fn setup_test_data(db: &Database) {
    add(db, "50", "Groceries run", "Food", "2024-01-05");
    add(db, "30", "Bus pass", "Transport", "2024-01-15");
    add(db, "12.99", "Movie night", "Entertainment", "2024-02-03");
}

// ── Add ───────────────────────────────────────────────────────

#[test]
fn test_add_assigns_store_fields() {
    let db = Database::open_in_memory().unwrap();
    let expense = add(&db, "12.50", "Lunch", "Food", "2024-01-05");

    assert!(expense.id.unwrap() > 0);
    assert_eq!(expense.month_key, MonthKey::new(2024, 0));
    assert!(!expense.created_at.is_empty());
    assert_eq!(expense.amount, dec!(12.50));
    assert_eq!(expense.description, "Lunch");
    assert_eq!(expense.category, Category::Food);
}

#[test]
fn test_add_then_query_returns_identical_fields() {
    let db = Database::open_in_memory().unwrap();
    let added = add(&db, "12.50", "Lunch", "Food", "2024-01-05");

    let fetched = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, added.id);
    assert_eq!(fetched[0].amount, added.amount);
    assert_eq!(fetched[0].description, added.description);
    assert_eq!(fetched[0].category, added.category);
    assert_eq!(fetched[0].date, added.date);
    assert_eq!(fetched[0].month_key, added.month_key);
    assert_eq!(fetched[0].created_at, added.created_at);
}

#[test]
fn test_ids_increase() {
    let db = Database::open_in_memory().unwrap();
    let a = add(&db, "1", "First", "Food", "2024-01-01");
    let b = add(&db, "2", "Second", "Food", "2024-01-01");
    assert!(b.id.unwrap() > a.id.unwrap());
}

#[test]
fn test_ids_not_reused_after_delete() {
    let db = Database::open_in_memory().unwrap();
    let a = add(&db, "1", "First", "Food", "2024-01-01");
    let a_id = a.id.unwrap();
    assert!(db.delete_expense(a_id).unwrap());

    let b = add(&db, "2", "Second", "Food", "2024-01-01");
    assert!(b.id.unwrap() > a_id);
}

// ── Validation failures ───────────────────────────────────────

#[test]
fn test_add_rejects_invalid_amount() {
    let db = Database::open_in_memory().unwrap();
    for bad in ["0", "-5", "abc", ""] {
        let err = db
            .add_expense(&ExpenseForm {
                amount: bad.into(),
                description: "Lunch".into(),
                category: "Food".into(),
                date: "2024-01-05".into(),
            })
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some(), "for {bad:?}");
    }
    assert_eq!(db.expense_count().unwrap(), 0);
}

#[test]
fn test_failed_add_leaves_store_unchanged() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);
    let before = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();

    let result = db.add_expense(&ExpenseForm {
        amount: "9.99".into(),
        description: "".into(),
        category: "Food".into(),
        date: "2024-01-20".into(),
    });
    assert!(result.is_err());

    let after = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();
    assert_eq!(before.len(), after.len());
    assert_eq!(db.expense_count().unwrap(), 3);
}

// ── Month queries ─────────────────────────────────────────────

#[test]
fn test_month_query_filters_by_key() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);

    let jan = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();
    assert_eq!(jan.len(), 2);

    let feb = db.expenses_for_month(MonthKey::new(2024, 1)).unwrap();
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].description, "Movie night");
}

#[test]
fn test_adjacent_month_is_empty() {
    let db = Database::open_in_memory().unwrap();
    add(&db, "50", "Groceries run", "Food", "2024-01-05");

    let next = db.expenses_for_month(MonthKey::new(2024, 0).next()).unwrap();
    assert!(next.is_empty());
}

#[test]
fn test_empty_month_returns_empty_vec() {
    let db = Database::open_in_memory().unwrap();
    let result = db.expenses_for_month(MonthKey::new(2099, 5)).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_december_and_january_do_not_collide() {
    let db = Database::open_in_memory().unwrap();
    add(&db, "10", "Holiday gift", "Shopping", "2023-12-28");
    add(&db, "20", "Groceries run", "Food", "2024-01-02");

    let dec = db.expenses_for_month(MonthKey::new(2023, 11)).unwrap();
    assert_eq!(dec.len(), 1);
    assert_eq!(dec[0].description, "Holiday gift");

    let jan = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();
    assert_eq!(jan.len(), 1);
}

#[test]
fn test_month_query_ordering() {
    let db = Database::open_in_memory().unwrap();
    add(&db, "1", "Early", "Food", "2024-01-05");
    add(&db, "2", "Late", "Food", "2024-01-20");
    add(&db, "3", "Same day first", "Food", "2024-01-10");
    add(&db, "4", "Same day second", "Food", "2024-01-10");

    let jan = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();
    // Date descending, same-day ties in insertion order
    let descriptions: Vec<&str> = jan.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(
        descriptions,
        vec!["Late", "Same day first", "Same day second", "Early"]
    );
}

// ── Category queries ──────────────────────────────────────────

#[test]
fn test_category_query() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);
    add(&db, "8.50", "Sandwich", "Food", "2024-03-01");

    let food = db.expenses_for_category(Category::Food).unwrap();
    assert_eq!(food.len(), 2);
    assert!(food.iter().all(|e| e.category == Category::Food));

    let health = db.expenses_for_category(Category::Healthcare).unwrap();
    assert!(health.is_empty());
}

// ── Delete ────────────────────────────────────────────────────

#[test]
fn test_delete_removes_record() {
    let db = Database::open_in_memory().unwrap();
    let expense = add(&db, "50", "Groceries run", "Food", "2024-01-05");
    let id = expense.id.unwrap();

    assert!(db.delete_expense(id).unwrap());

    let jan = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();
    assert!(!jan.iter().any(|e| e.id == Some(id)));
    let food = db.expenses_for_category(Category::Food).unwrap();
    assert!(!food.iter().any(|e| e.id == Some(id)));
}

#[test]
fn test_delete_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    let expense = add(&db, "50", "Groceries run", "Food", "2024-01-05");
    let id = expense.id.unwrap();

    assert!(db.delete_expense(id).unwrap());
    assert!(!db.delete_expense(id).unwrap());
}

#[test]
fn test_delete_missing_id_returns_false() {
    let db = Database::open_in_memory().unwrap();
    assert!(!db.delete_expense(99999).unwrap());
}

// ── Durability ────────────────────────────────────────────────

#[test]
fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("outlay.db");

    {
        let db = Database::open(&path).unwrap();
        add(&db, "50", "Groceries run", "Food", "2024-01-05");
    }

    let db = Database::open(&path).unwrap();
    let jan = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();
    assert_eq!(jan.len(), 1);
    assert_eq!(jan[0].amount, dec!(50));
}

#[test]
fn test_delete_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("outlay.db");

    let id = {
        let db = Database::open(&path).unwrap();
        let expense = add(&db, "50", "Groceries run", "Food", "2024-01-05");
        let id = expense.id.unwrap();
        assert!(db.delete_expense(id).unwrap());
        id
    };

    let db = Database::open(&path).unwrap();
    assert!(db.expenses_for_month(MonthKey::new(2024, 0)).unwrap().is_empty());
    assert!(!db.delete_expense(id).unwrap());
}

// ── Month report scenario ─────────────────────────────────────

#[test]
fn test_month_report_scenario() {
    let db = Database::open_in_memory().unwrap();
    add(&db, "50", "Groceries run", "Food", "2024-01-05");
    add(&db, "30", "Bus pass", "Transport", "2024-01-15");

    let jan = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();
    assert_eq!(jan.len(), 2);
    assert_eq!(crate::report::total(&jan), dec!(80));

    let shares = crate::report::breakdown(&jan);
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].category, Category::Food);
    assert_eq!(shares[0].amount, dec!(50));
    assert_eq!(shares[0].share, dec!(62.5));
    assert_eq!(shares[1].category, Category::Transport);
    assert_eq!(shares[1].amount, dec!(30));
    assert_eq!(shares[1].share, dec!(37.5));
}

// ── Decimal precision ─────────────────────────────────────────

#[test]
fn test_decimal_precision_preserved() {
    let db = Database::open_in_memory().unwrap();
    add(&db, "1234.5678", "Precise", "Other", "2024-01-15");

    let jan = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();
    assert_eq!(jan[0].amount, dec!(1234.5678));
}

#[test]
fn test_large_amounts() {
    let db = Database::open_in_memory().unwrap();
    add(&db, "350000.00", "House deposit", "Other", "2024-01-15");

    let jan = db.expenses_for_month(MonthKey::new(2024, 0)).unwrap();
    assert_eq!(jan[0].amount, dec!(350000.00));
}

// ── Count ─────────────────────────────────────────────────────

#[test]
fn test_expense_count() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.expense_count().unwrap(), 0);

    setup_test_data(&db);
    assert_eq!(db.expense_count().unwrap(), 3);
}

// ── Schema migration ──────────────────────────────────────────

#[test]
fn test_schema_version_set() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_double_migrate_idempotent() {
    let mut db = Database::open_in_memory().unwrap();
    // Running migrate again should not fail
    db.migrate().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}
