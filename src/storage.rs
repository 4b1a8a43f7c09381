use crate::config::SeedUser;
use crate::models::{Contact, ContactInput};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL DEFAULT ''
);
"#;

/// Handle to the contact database. Every operation checks a connection out
/// of the pool for a single statement and returns it when done.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let stmt = stmt.trim();
            if stmt.is_empty() {
                continue;
            }
            let mut conn = self.pool.acquire().await?;
            sqlx::query(stmt).execute(&mut *conn).await?;
        }
        Ok(())
    }

    pub async fn seed_users(&self, users: &[SeedUser]) -> Result<(), sqlx::Error> {
        for user in users {
            let mut conn = self.pool.acquire().await?;
            sqlx::query(
                r#"INSERT INTO users (username, password) VALUES (?, ?)
                   ON CONFLICT(username) DO UPDATE SET password = excluded.password"#,
            )
            .bind(&user.username)
            .bind(&user.password)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Plain equality match on both columns; passwords are stored as given.
    pub async fn credentials_match(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM users WHERE username = ? AND password = ?")
                .bind(username)
                .bind(password)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(row.is_some())
    }

    /// Lists contacts in insertion order. A non-blank `search` keeps only the
    /// names containing it verbatim, ignoring ASCII case.
    pub async fn list_contacts(&self, search: &str) -> Result<Vec<Contact>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        if search.trim().is_empty() {
            return sqlx::query_as("SELECT id, name, phone, email FROM contacts ORDER BY id")
                .fetch_all(&mut *conn)
                .await;
        }

        sqlx::query_as(
            r#"SELECT id, name, phone, email FROM contacts
               WHERE name LIKE '%' || ? || '%' ESCAPE '\'
               ORDER BY id"#,
        )
        .bind(escape_like(search))
        .fetch_all(&mut *conn)
        .await
    }

    pub async fn get_contact(&self, id: i64) -> Result<Option<Contact>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query_as("SELECT id, name, phone, email FROM contacts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Inserts the row as given; callers validate the name first.
    pub async fn insert_contact(&self, input: &ContactInput) -> Result<Contact, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query_as(
            r#"INSERT INTO contacts (name, phone, email) VALUES (?, ?, ?)
               RETURNING id, name, phone, email"#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(&mut *conn)
        .await
    }

    /// Returns `None` when no row has this id.
    pub async fn update_contact(
        &self,
        id: i64,
        input: &ContactInput,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query_as(
            r#"UPDATE contacts SET name = ?, phone = ?, email = ?
               WHERE id = ?
               RETURNING id, name, phone, email"#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Returns whether a row was removed.
    pub async fn delete_contact(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
