use sqlx::{postgres::PgPoolOptions, PgPool};
use std::str::FromStr;
use tracing::{info, warn};

use crate::shared::AppError;

/// Opens the connection pool and brings the schema up to date
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    Ok(pool)
}

/// Maps a driver error to the API error space. Constraint violations become
/// conflicts so that a racing duplicate insert reads the same as the
/// service-level check would have.
pub fn db_error(operation: &str, error: sqlx::Error) -> AppError {
    if let Some(db_err) = error.as_database_error() {
        match db_err.code().as_deref() {
            Some("23505") => {
                warn!(operation, error = %db_err, "Unique constraint violated");
                return AppError::Conflict(db_err.message().to_string());
            }
            Some("23503") => {
                warn!(operation, error = %db_err, "Foreign key constraint violated");
                return AppError::Conflict(db_err.message().to_string());
            }
            _ => {}
        }
    }

    warn!(operation, error = %error, "Database operation failed");
    AppError::DatabaseError(error.to_string())
}

/// Parses a text column holding a snake_case enum value
pub fn parse_column<T: FromStr>(column: &str, value: &str) -> Result<T, AppError> {
    T::from_str(value).map_err(|_| {
        AppError::DatabaseError(format!("unexpected value '{value}' in column {column}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::models::LeagueStatus;

    #[test]
    fn parses_known_enum_values() {
        let status: LeagueStatus = parse_column("status", "active").unwrap();
        assert_eq!(status, LeagueStatus::Active);
    }

    #[test]
    fn unknown_enum_value_is_a_database_error() {
        let result: Result<LeagueStatus, _> = parse_column("status", "archived");
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[test]
    fn non_database_errors_map_to_database_error() {
        let err = db_error("test", sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
