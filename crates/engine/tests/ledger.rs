use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    Engine, EngineError, ExpenseDraft, ExpenseFilter, IncomeDraft, IncomeFilter, ViolationKind,
};

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    Engine::builder().database(db).build()
}

fn expense_draft(amount: &str, category: &str) -> ExpenseDraft {
    ExpenseDraft {
        amount: Some(amount.to_string()),
        currency: Some("EUR".to_string()),
        category: Some(category.to_string()),
        payment_method: Some("cash".to_string()),
        incurred_at: Some(Utc::now() - Duration::hours(1)),
        ..Default::default()
    }
}

fn income_draft(amount: &str, source: &str) -> IncomeDraft {
    IncomeDraft {
        amount: Some(amount.to_string()),
        currency: Some("EUR".to_string()),
        source: Some(source.to_string()),
        received_method: Some("salary".to_string()),
        received_at: Some(Utc::now() - Duration::hours(1)),
        ..Default::default()
    }
}

#[tokio::test]
async fn category_names_are_unique_case_insensitively() {
    let engine = engine_with_db().await;

    engine.create_category("Groceries").await.unwrap();
    let err = engine.create_category("  groceries ").await.unwrap_err();
    assert!(matches!(err, EngineError::DuplicateCategory(_)));

    let listed = engine.list_categories().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Groceries");
}

#[tokio::test]
async fn categories_list_sorted_by_case_insensitive_name() {
    let engine = engine_with_db().await;

    engine.create_category("utilities").await.unwrap();
    engine.create_category("Groceries").await.unwrap();
    engine.create_category("Rent").await.unwrap();

    let names: Vec<String> = engine
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Groceries", "Rent", "utilities"]);
}

#[tokio::test]
async fn rename_category_does_not_rewrite_existing_records() {
    let engine = engine_with_db().await;

    let category = engine.create_category("Food").await.unwrap();
    let expense = engine
        .create_expense(&expense_draft("12.00", "Food"))
        .await
        .unwrap();

    engine.rename_category(category.id, "Dining").await.unwrap();

    let refetched = engine.get_expense(expense.id).await.unwrap();
    assert_eq!(refetched.category, "Food");

    // New records must use the current registry name.
    let err = engine
        .create_expense(&expense_draft("5.00", "Food"))
        .await
        .unwrap_err();
    let EngineError::Validation(report) = err else {
        panic!("expected validation error");
    };
    assert!(report.has(ViolationKind::UnknownCategory));
}

#[tokio::test]
async fn delete_category_leaves_records_with_stale_names() {
    let engine = engine_with_db().await;

    let category = engine.create_category("Travel").await.unwrap();
    let expense = engine
        .create_expense(&expense_draft("99.99", "Travel"))
        .await
        .unwrap();

    engine.delete_category(category.id).await.unwrap();

    let refetched = engine.get_expense(expense.id).await.unwrap();
    assert_eq!(refetched.category, "Travel");

    let err = engine.delete_category(category.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn create_rejects_unknown_category_with_full_report() {
    let engine = engine_with_db().await;

    let mut draft = expense_draft("abc", "Nowhere");
    draft.incurred_at = Some(Utc::now() + Duration::days(1));

    let err = engine.create_expense(&draft).await.unwrap_err();
    let EngineError::Validation(report) = err else {
        panic!("expected validation error");
    };
    assert!(report.has(ViolationKind::InvalidAmount));
    assert!(report.has(ViolationKind::UnknownCategory));
    assert!(report.has(ViolationKind::FutureDate));
    assert_eq!(report.violations().len(), 3);
}

#[tokio::test]
async fn listings_keep_insertion_order() {
    let engine = engine_with_db().await;
    engine.create_category("Misc").await.unwrap();

    let first = engine
        .create_expense(&expense_draft("1.00", "Misc"))
        .await
        .unwrap();
    let second = engine
        .create_expense(&expense_draft("2.00", "Misc"))
        .await
        .unwrap();
    let third = engine
        .create_expense(&expense_draft("3.00", "Misc"))
        .await
        .unwrap();

    let listed = engine
        .list_expenses(&ExpenseFilter::default())
        .await
        .unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);

    // Updates must not move a record.
    let patch = ExpenseDraft {
        description: Some(Some("updated".to_string())),
        ..Default::default()
    };
    engine.update_expense(second.id, &patch).await.unwrap();

    let listed = engine
        .list_expenses(&ExpenseFilter::default())
        .await
        .unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);
}

#[tokio::test]
async fn totals_are_exact_in_cents() {
    let engine = engine_with_db().await;
    engine.create_category("Misc").await.unwrap();

    // 0.10 + 0.20 must be exactly 0.30, not 0.30000000000000004.
    engine
        .create_expense(&expense_draft("0.10", "Misc"))
        .await
        .unwrap();
    engine
        .create_expense(&expense_draft("0.20", "Misc"))
        .await
        .unwrap();

    let total = engine
        .expense_total(&ExpenseFilter::default())
        .await
        .unwrap();
    assert_eq!(total.cents(), 30);
    assert_eq!(total.to_string(), "0.30");
}

#[tokio::test]
async fn balance_is_income_minus_expenses() {
    let engine = engine_with_db().await;
    engine.create_category("Misc").await.unwrap();

    let all_expenses = ExpenseFilter::default();
    let all_incomes = IncomeFilter::default();
    assert_eq!(
        engine
            .balance(&all_expenses, &all_incomes)
            .await
            .unwrap()
            .cents(),
        0
    );

    engine
        .create_income(&income_draft("100.00", "Acme"))
        .await
        .unwrap();
    engine
        .create_expense(&expense_draft("105.25", "Misc"))
        .await
        .unwrap();

    let balance = engine.balance(&all_expenses, &all_incomes).await.unwrap();
    assert_eq!(balance.to_string(), "-5.25");
}

#[tokio::test]
async fn balance_narrows_by_filter() {
    let engine = engine_with_db().await;
    engine.create_category("Food").await.unwrap();
    engine.create_category("Rent").await.unwrap();

    engine
        .create_expense(&expense_draft("20.00", "Food"))
        .await
        .unwrap();
    engine
        .create_expense(&expense_draft("800.00", "Rent"))
        .await
        .unwrap();
    engine
        .create_income(&income_draft("100.00", "Acme"))
        .await
        .unwrap();

    let expenses = ExpenseFilter {
        category: Some("food".to_string()),
        ..Default::default()
    };
    let balance = engine
        .balance(&expenses, &IncomeFilter::default())
        .await
        .unwrap();
    assert_eq!(balance.to_string(), "80.00");
}

#[tokio::test]
async fn total_reflects_deletions() {
    let engine = engine_with_db().await;
    engine.create_category("Misc").await.unwrap();

    let first = engine
        .create_expense(&expense_draft("10.50", "Misc"))
        .await
        .unwrap();
    engine
        .create_expense(&expense_draft("5.25", "Misc"))
        .await
        .unwrap();

    let total = engine
        .expense_total(&ExpenseFilter::default())
        .await
        .unwrap();
    assert_eq!(total.to_string(), "15.75");

    engine.delete_expense(first.id).await.unwrap();

    let total = engine
        .expense_total(&ExpenseFilter::default())
        .await
        .unwrap();
    assert_eq!(total.to_string(), "5.25");
}

#[tokio::test]
async fn zero_amount_is_rejected() {
    let engine = engine_with_db().await;
    engine.create_category("Misc").await.unwrap();

    let err = engine
        .create_expense(&expense_draft("0", "Misc"))
        .await
        .unwrap_err();
    let EngineError::Validation(report) = err else {
        panic!("expected validation error");
    };
    assert!(report.has(ViolationKind::InvalidAmount));
}

#[tokio::test]
async fn deleting_twice_reports_not_found() {
    let engine = engine_with_db().await;
    engine.create_category("Misc").await.unwrap();

    let expense = engine
        .create_expense(&expense_draft("10.00", "Misc"))
        .await
        .unwrap();
    engine.delete_expense(expense.id).await.unwrap();
    let err = engine.delete_expense(expense.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let income = engine
        .create_income(&income_draft("10.00", "Acme"))
        .await
        .unwrap();
    engine.delete_income(income.id).await.unwrap();
    let err = engine.delete_income(income.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn blank_filter_values_match_everything() {
    let engine = engine_with_db().await;
    engine.create_category("Food").await.unwrap();
    engine.create_category("Rent").await.unwrap();

    engine
        .create_expense(&expense_draft("20.00", "Food"))
        .await
        .unwrap();
    engine
        .create_expense(&expense_draft("800.00", "Rent"))
        .await
        .unwrap();

    // Empty form fields arrive as empty strings, not as absent keys.
    let filter = ExpenseFilter {
        category: Some(String::new()),
        merchant: Some("  ".to_string()),
        ..Default::default()
    };
    assert!(filter.is_empty());
    assert_eq!(engine.list_expenses(&filter).await.unwrap().len(), 2);
    assert_eq!(engine.expense_total(&filter).await.unwrap().cents(), 82_000);
}

#[tokio::test]
async fn amount_truncates_past_two_decimals() {
    let engine = engine_with_db().await;
    engine.create_category("Misc").await.unwrap();

    let expense = engine
        .create_expense(&expense_draft("10.999", "Misc"))
        .await
        .unwrap();
    assert_eq!(expense.amount.cents(), 1099);

    let refetched = engine.get_expense(expense.id).await.unwrap();
    assert_eq!(refetched.amount.to_string(), "10.99");
}

#[tokio::test]
async fn partial_update_is_validated_as_a_whole() {
    let engine = engine_with_db().await;
    engine.create_category("Misc").await.unwrap();

    let expense = engine
        .create_expense(&expense_draft("10.00", "Misc"))
        .await
        .unwrap();

    let patch = ExpenseDraft {
        amount: Some("-3.00".to_string()),
        ..Default::default()
    };
    let err = engine.update_expense(expense.id, &patch).await.unwrap_err();
    let EngineError::Validation(report) = err else {
        panic!("expected validation error");
    };
    assert!(report.has(ViolationKind::InvalidAmount));

    // The rejected update must leave the stored record untouched.
    let refetched = engine.get_expense(expense.id).await.unwrap();
    assert_eq!(refetched.amount.to_string(), "10.00");
}

#[tokio::test]
async fn server_assigned_fields_are_immutable() {
    let engine = engine_with_db().await;
    engine.create_category("Misc").await.unwrap();

    let expense = engine
        .create_expense(&expense_draft("10.00", "Misc"))
        .await
        .unwrap();

    let patch = ExpenseDraft {
        id: Some(Uuid::new_v4()),
        recorded_at: Some(Utc::now() + Duration::hours(1)),
        ..Default::default()
    };
    let err = engine.update_expense(expense.id, &patch).await.unwrap_err();
    let EngineError::Validation(report) = err else {
        panic!("expected validation error");
    };
    assert!(report.has(ViolationKind::Immutable));
    assert_eq!(report.violations().len(), 2);
}

#[tokio::test]
async fn mutations_are_visible_to_immediate_refetch() {
    let engine = engine_with_db().await;
    engine.create_category("Misc").await.unwrap();

    let expense = engine
        .create_expense(&expense_draft("42.00", "Misc"))
        .await
        .unwrap();
    assert_eq!(
        engine.get_expense(expense.id).await.unwrap().amount,
        expense.amount
    );

    let patch = ExpenseDraft {
        merchant: Some(Some("Corner Shop".to_string())),
        ..Default::default()
    };
    engine.update_expense(expense.id, &patch).await.unwrap();
    assert_eq!(
        engine
            .get_expense(expense.id)
            .await
            .unwrap()
            .merchant
            .as_deref(),
        Some("Corner Shop")
    );

    engine.delete_expense(expense.id).await.unwrap();
    let err = engine.get_expense(expense.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn expense_filters_narrow_listings_and_totals() {
    let engine = engine_with_db().await;
    engine.create_category("Food").await.unwrap();
    engine.create_category("Rent").await.unwrap();

    let mut tagged = expense_draft("20.00", "Food");
    tagged.tags = Some(vec!["weekly".to_string()]);
    engine.create_expense(&tagged).await.unwrap();
    engine
        .create_expense(&expense_draft("800.00", "Rent"))
        .await
        .unwrap();

    let filter = ExpenseFilter {
        category: Some("food".to_string()),
        ..Default::default()
    };
    let listed = engine.list_expenses(&filter).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].category, "Food");
    assert_eq!(engine.expense_total(&filter).await.unwrap().cents(), 2000);

    let filter = ExpenseFilter {
        tag: Some("weekly".to_string()),
        ..Default::default()
    };
    assert_eq!(engine.list_expenses(&filter).await.unwrap().len(), 1);

    let filter = ExpenseFilter {
        tag: Some("WEEKLY".to_string()),
        ..Default::default()
    };
    assert!(engine.list_expenses(&filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn income_records_round_trip_with_filters() {
    let engine = engine_with_db().await;

    let mut draft = income_draft("1500.00", "Acme Corp");
    draft.attachment_path = Some(Some("attachments/income_docs/payslip.pdf".to_string()));
    let income = engine.create_income(&draft).await.unwrap();

    engine
        .create_income(&income_draft("25.50", "Side Gig"))
        .await
        .unwrap();

    let filter = IncomeFilter {
        source: Some("acme corp".to_string()),
        ..Default::default()
    };
    let listed = engine.list_incomes(&filter).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, income.id);
    assert_eq!(
        listed[0].attachment_path.as_deref(),
        Some("attachments/income_docs/payslip.pdf")
    );

    let total = engine.income_total(&IncomeFilter::default()).await.unwrap();
    assert_eq!(total.to_string(), "1525.50");
}
