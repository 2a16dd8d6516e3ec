//! PostgreSQL user store.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;

use super::{StoreError, UserStore};
use crate::models::{EMAIL_COLUMN, NewUser, is_identifier};

/// [`UserStore`] backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn bulk_insert(&self, table: &str, rows: &[NewUser]) -> Result<u64, StoreError> {
        let Some(sql) = insert_statement(table, rows)? else {
            return Ok(0);
        };
        debug!(table, rows = rows.len(), "bulk insert");

        let result = sqlx::query(&sql)
            .bind(Json(rows))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn destroy_by_email(&self, table: &str, emails: &[String]) -> Result<u64, StoreError> {
        let sql = delete_statement(table)?;
        debug!(table, emails = emails.len(), "destroy by email");

        let result = sqlx::query(&sql)
            .bind(emails)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Builds the single-statement bulk insert, or `None` when there is nothing
/// to insert. Names are checked here, before the database is touched.
fn insert_statement(table: &str, rows: &[NewUser]) -> Result<Option<String>, StoreError> {
    let Some(first) = rows.first() else {
        return Ok(None);
    };

    let table = quote_table(table)?;
    let columns: Vec<&str> = first.columns().collect();
    if rows.iter().any(|row| !row.columns().eq(columns.iter().copied())) {
        return Err(StoreError::InconsistentColumns);
    }
    let column_list = columns
        .iter()
        .map(|c| quote_column(c))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");

    // The rows travel as one JSON array; jsonb_populate_recordset casts
    // each text value to the declared type of its column.
    Ok(Some(format!(
        r#"
        INSERT INTO {table} ({column_list})
        SELECT {column_list}
        FROM jsonb_populate_recordset(NULL::{table}, $1)
        "#
    )))
}

fn delete_statement(table: &str) -> Result<String, StoreError> {
    let table = quote_table(table)?;
    let email = quote_column(EMAIL_COLUMN)?;

    Ok(format!("DELETE FROM {table} WHERE {email} = ANY($1)"))
}

fn quote_table(name: &str) -> Result<String, StoreError> {
    if is_identifier(name) {
        Ok(format!("\"{name}\""))
    } else {
        Err(StoreError::InvalidTable(name.to_string()))
    }
}

fn quote_column(name: &str) -> Result<String, StoreError> {
    if is_identifier(name) {
        Ok(format!("\"{name}\""))
    } else {
        Err(StoreError::InvalidColumn(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{SeedError, Seeder};
    use sqlx::postgres::PgPoolOptions;

    fn user(email: &str, attributes: &[(&str, &str)]) -> NewUser {
        NewUser {
            email: email.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// A store whose pool never connects; only usable for calls that fail
    /// before reaching the database.
    fn unconnected_store() -> PgUserStore {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        PgUserStore::new(pool)
    }

    #[test]
    fn test_insert_statement() {
        let rows = [
            user("a@x.com", &[("firstName", "Ada")]),
            user("b@x.com", &[("firstName", "Bob")]),
        ];
        let sql = insert_statement("Users", &rows).unwrap().unwrap();

        assert!(sql.contains(r#"INSERT INTO "Users" ("email", "firstName")"#));
        assert!(sql.contains(r#"jsonb_populate_recordset(NULL::"Users", $1)"#));
        assert!(insert_statement("Users", &[]).unwrap().is_none());
    }

    #[test]
    fn test_insert_statement_rejects_mixed_columns() {
        let rows = [
            user("a@x.com", &[("firstName", "Ada")]),
            user("b@x.com", &[("lastName", "Bob")]),
        ];

        assert!(matches!(
            insert_statement("Users", &rows),
            Err(StoreError::InconsistentColumns)
        ));
    }

    #[test]
    fn test_delete_statement() {
        assert_eq!(
            delete_statement("Users").unwrap(),
            r#"DELETE FROM "Users" WHERE "email" = ANY($1)"#
        );
        assert!(matches!(
            delete_statement("Users; x"),
            Err(StoreError::InvalidTable(_))
        ));
    }

    #[tokio::test]
    async fn test_bulk_insert_rejects_mixed_columns() {
        let store = unconnected_store();
        let rows = [
            user("a@x.com", &[]),
            user("b@x.com", &[("firstName", "Bob")]),
        ];

        let err = store.bulk_insert("Users", &rows).await.unwrap_err();
        assert!(matches!(err, StoreError::InconsistentColumns));
    }

    #[tokio::test]
    async fn test_seeder_rejects_invalid_table() {
        let mut csv = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut csv, b"id,email\n1,a@x.com\n").unwrap();
        let seeder = Seeder::new(unconnected_store(), csv.path()).with_table("Users; x");

        assert!(matches!(
            seeder.apply().await,
            Err(SeedError::Store(StoreError::InvalidTable(name))) if name == "Users; x"
        ));
        assert!(matches!(
            seeder.revert().await,
            Err(SeedError::Store(StoreError::InvalidTable(name))) if name == "Users; x"
        ));
    }

    #[test]
    fn test_quote_table() {
        assert_eq!(quote_table("Users").unwrap(), "\"Users\"");
        assert!(matches!(
            quote_table("Users; DROP TABLE x"),
            Err(StoreError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_quote_column() {
        assert_eq!(quote_column("firstName").unwrap(), "\"firstName\"");
        assert!(matches!(
            quote_column("first\"Name"),
            Err(StoreError::InvalidColumn(_))
        ));
    }
}
