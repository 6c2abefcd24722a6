//! Employee Repository
//!
//! The password hash never leaves this module except through
//! `EmployeeRecord`, which the login flow consumes and drops.

use super::RepoResult;
use shared::models::{Employee, StoreRole};
use sqlx::SqliteConnection;

/// Employee row including the credential hash, for authentication only
#[derive(Debug, sqlx::FromRow)]
pub struct EmployeeRecord {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<EmployeeRecord> for Employee {
    fn from(rec: EmployeeRecord) -> Self {
        Employee {
            id: rec.id,
            username: rec.username,
            display_name: rec.display_name,
            is_active: rec.is_active,
            created_at: rec.created_at,
        }
    }
}

pub async fn insert(
    conn: &mut SqliteConnection,
    employee: &Employee,
    password_hash: &str,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO employees (id, username, display_name, password_hash, is_active, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&employee.id)
    .bind(&employee.username)
    .bind(&employee.display_name)
    .bind(password_hash)
    .bind(employee.is_active)
    .bind(&employee.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> RepoResult<Option<EmployeeRecord>> {
    let rec = sqlx::query_as::<_, EmployeeRecord>("SELECT * FROM employees WHERE username = ?")
        .bind(username)
        .fetch_optional(conn)
        .await?;
    Ok(rec)
}

pub async fn associate_store(
    conn: &mut SqliteConnection,
    employee_id: &str,
    store_role: &StoreRole,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO employee_stores (employee_id, store_id, role) VALUES (?, ?, ?)")
        .bind(employee_id)
        .bind(&store_role.store_id)
        .bind(&store_role.role)
        .execute(conn)
        .await?;
    Ok(())
}

/// Store associations in insertion order (rowid)
pub async fn find_store_roles(
    conn: &mut SqliteConnection,
    employee_id: &str,
) -> RepoResult<Vec<StoreRole>> {
    let roles = sqlx::query_as::<_, StoreRole>(
        "SELECT store_id, role FROM employee_stores WHERE employee_id = ? ORDER BY rowid",
    )
    .bind(employee_id)
    .fetch_all(conn)
    .await?;
    Ok(roles)
}
