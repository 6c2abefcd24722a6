use store_server::db::repository::employee as employee_repo;
use store_server::{Config, DbService, ServerState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    store_server::init_logger();

    tracing::info!("Store server starting...");

    let config = Config::from_env();
    let jwt = store_server::JwtService::with_config(config.jwt_config()?);
    let db = DbService::new(&config.database_path).await?;

    bootstrap_admin(&db).await?;

    let state = ServerState::new(config.clone(), db, jwt);
    let app = store_server::app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the initial staff account from ADMIN_USERNAME / ADMIN_PASSWORD
/// when the employees table is empty. Registration requires a token, so
/// a fresh database needs one seeded account to get started.
async fn bootstrap_admin(db: &DbService) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = db.pool.acquire().await?;
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
        .fetch_one(&mut *conn)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        tracing::warn!("No staff accounts and no ADMIN_USERNAME/ADMIN_PASSWORD set");
        return Ok(());
    };

    let hash = store_server::auth::hash_password(&password)?;
    let employee = shared::models::Employee {
        id: shared::id::new_id_string(),
        username: username.clone(),
        display_name: username.clone(),
        is_active: true,
        created_at: store_server::utils::now_rfc3339(),
    };
    employee_repo::insert(&mut conn, &employee, &hash).await?;
    tracing::info!(username = %username, "Bootstrap admin account created");

    Ok(())
}
