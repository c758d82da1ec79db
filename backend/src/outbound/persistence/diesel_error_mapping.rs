//! Shared Diesel error mapping for repositories whose ports expose
//! connection and query failures.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool error with the port's connection constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map a Diesel error with the port's query and connection constructors.
///
/// Closed connections become connection errors; everything else is a query
/// error with a generic message. The detailed cause is logged at debug
/// level only.
pub(crate) fn map_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    operation: &'static str,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, operation, message = info.message(), "diesel operation failed");
        }
        other => debug!(operation, error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection(format!("{operation}: database connection error"))
        }
        DieselError::NotFound => query(format!("{operation}: record not found")),
        DieselError::QueryBuilderError(_) => query(format!("{operation}: database query error")),
        _ => query(format!("{operation}: database error")),
    }
}
