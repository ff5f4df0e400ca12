use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Create counters table (one row per document/screen type)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS counters (
            screen_id TEXT PRIMARY KEY,
            description TEXT,
            prefix TEXT NOT NULL,
            separator TEXT NOT NULL DEFAULT '-',
            date_format TEXT,
            digit_width INTEGER NOT NULL DEFAULT 4,
            max_length INTEGER NOT NULL DEFAULT 20,
            format_style TEXT NOT NULL DEFAULT 'transactional',
            sequence_value INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create audit_trails table (append-only, one row per mutation)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS audit_trails (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            actor_id TEXT NOT NULL,
            module TEXT NOT NULL,
            old_data TEXT,
            new_data TEXT NOT NULL,
            execution_type TEXT NOT NULL, -- 'INSERT', 'UPDATE', 'DELETE'
            executed_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_audit_trails_module ON audit_trails(module)".to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_audit_trails_actor_id ON audit_trails(actor_id)"
            .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_audit_trails_executed_at ON audit_trails(executed_at)"
            .to_owned(),
    ))
    .await?;

    // Create vendors table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS vendors (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            address TEXT,
            city TEXT,
            country TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_vendors_name ON vendors(name)".to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_vendors_is_active ON vendors(is_active)".to_owned(),
    ))
    .await?;

    // Create budgets table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS budgets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            budget_code TEXT NOT NULL UNIQUE,
            company_code TEXT NOT NULL,
            fiscal_year TEXT NOT NULL,
            description TEXT,
            amount REAL NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_budgets_company_year ON budgets(company_code, fiscal_year)"
            .to_owned(),
    ))
    .await?;

    // Create category_budgets table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS category_budgets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_budget_code TEXT NOT NULL UNIQUE,
            company_code TEXT NOT NULL,
            department_code TEXT NOT NULL,
            fiscal_year TEXT NOT NULL,
            description TEXT,
            amount REAL NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_category_budgets_scope ON category_budgets(company_code, department_code, fiscal_year)"
            .to_owned(),
    ))
    .await?;

    // Migration 002: Add description to counters
    // SQLite doesn't support IF NOT EXISTS in ALTER TABLE, so we ignore errors
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE counters ADD COLUMN description TEXT".to_owned(),
        ))
        .await;

    // Migration 003: Add city/country to vendors
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE vendors ADD COLUMN city TEXT".to_owned(),
        ))
        .await;
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE vendors ADD COLUMN country TEXT".to_owned(),
        ))
        .await;

    // Insert standard counter definitions if not present
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        INSERT OR IGNORE INTO counters (screen_id, description, prefix, separator, date_format, digit_width, max_length, format_style, sequence_value, created_at, updated_at)
        VALUES ('VDR', 'Vendor master', 'MS', '-', NULL, 4, 20, 'master_data', 0, datetime('now'), datetime('now'))
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        INSERT OR IGNORE INTO counters (screen_id, description, prefix, separator, date_format, digit_width, max_length, format_style, sequence_value, created_at, updated_at)
        VALUES ('INV', 'Invoice', 'INV', '-', 'YYMMDD', 4, 20, 'transactional', 0, datetime('now'), datetime('now'))
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        INSERT OR IGNORE INTO counters (screen_id, description, prefix, separator, date_format, digit_width, max_length, format_style, sequence_value, created_at, updated_at)
        VALUES ('PO', 'Purchase order', 'PO', '-', 'YYMMDD', 4, 20, 'transactional', 0, datetime('now'), datetime('now'))
        "#
        .to_owned(),
    ))
    .await?;

    Ok(())
}
