//! Engine operations, grouped per resource.

use sea_orm::{ConnectionTrait, DbErr, Statement};

mod categories;
mod expenses;
mod incomes;
mod summary;

/// Next value of a table's monotonic insertion counter.
///
/// Runs inside the caller's insert transaction so two concurrent inserts
/// cannot observe the same maximum. `table` is always a compile-time
/// constant, never client input.
async fn next_seq<C: ConnectionTrait>(conn: &C, table: &str) -> Result<i64, DbErr> {
    let stmt = Statement::from_string(
        conn.get_database_backend(),
        format!("SELECT COALESCE(MAX(seq), 0) + 1 AS next FROM {table}"),
    );
    let row = conn.query_one(stmt).await?;
    Ok(row.and_then(|r| r.try_get("", "next").ok()).unwrap_or(1))
}

/// Exact sum of `amount_minor` over a whole table, in integer cents.
async fn table_total<C: ConnectionTrait>(conn: &C, table: &str) -> Result<i64, DbErr> {
    let stmt = Statement::from_string(
        conn.get_database_backend(),
        format!("SELECT COALESCE(SUM(amount_minor), 0) AS sum FROM {table}"),
    );
    let row = conn.query_one(stmt).await?;
    Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
}
