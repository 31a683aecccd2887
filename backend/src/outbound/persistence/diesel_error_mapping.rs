//! Shared Diesel error mapping for the repository adapters.
//!
//! Every persistence port error carries the same three variants, so the
//! mapping is written once against [`RepositoryError`] and each adapter picks
//! its concrete error type by inference.

use std::fmt::Display;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::IdValidationError;
use crate::domain::ports::{
    CataloguePersistenceError, MatchPersistenceError, RefreshTokenPersistenceError,
    ReviewPersistenceError, UserPersistenceError,
};

use super::pool::PoolError;

/// Constructors shared by all persistence port errors.
pub(crate) trait RepositoryError: Sized {
    fn connection_failed(message: String) -> Self;
    fn query_failed(message: String) -> Self;
    fn unique_violation(message: String) -> Self;

    /// Wrap a stored key that fails domain validation.
    fn decode_id<T>(column: &str, raw: i64) -> Result<T, Self>
    where
        T: TryFrom<i64, Error = IdValidationError>,
    {
        T::try_from(raw).map_err(|err| Self::query_failed(format!("invalid {column} {raw}: {err}")))
    }

    /// Wrap a stored text column that no longer parses.
    fn invalid_column(column: &str, err: impl Display) -> Self {
        Self::query_failed(format!("invalid {column}: {err}"))
    }
}

macro_rules! repository_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl RepositoryError for $ty {
                fn connection_failed(message: String) -> Self {
                    Self::connection(message)
                }

                fn query_failed(message: String) -> Self {
                    Self::query(message)
                }

                fn unique_violation(message: String) -> Self {
                    Self::conflict(message)
                }
            }
        )+
    };
}

repository_error!(
    CataloguePersistenceError,
    MatchPersistenceError,
    RefreshTokenPersistenceError,
    ReviewPersistenceError,
    UserPersistenceError,
);

/// Pool failures always mean the database is unreachable.
pub(crate) fn map_pool_error<E: RepositoryError>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection_failed(message)
}

/// Map a Diesel error onto the port error.
///
/// Unique violations become conflicts named after the violated constraint so
/// callers can tell which invariant was hit.
pub(crate) fn map_diesel_error<E: RepositoryError>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            E::unique_violation(info.constraint_name().unwrap_or("unique constraint").to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection_failed("database connection error".to_owned())
        }
        DieselError::NotFound => E::query_failed("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query_failed("database query error".to_owned()),
        _ => E::query_failed("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    use crate::domain::MatchId;

    struct Info(Option<&'static str>);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(constraint)))
    }

    #[rstest]
    #[case(
        Some("match_participants_match_user_key"),
        MatchPersistenceError::conflict("match_participants_match_user_key")
    )]
    #[case(None, MatchPersistenceError::conflict("unique constraint"))]
    fn unique_violation_names_the_constraint(
        #[case] constraint: Option<&'static str>,
        #[case] expected: MatchPersistenceError,
    ) {
        let mapped: MatchPersistenceError =
            map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation, constraint));
        assert_eq!(mapped, expected);
    }

    #[test]
    fn closed_connection_is_a_connection_error() {
        let mapped: ReviewPersistenceError =
            map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert!(matches!(mapped, ReviewPersistenceError::Connection { .. }));
    }

    #[test]
    fn missing_rows_are_query_errors() {
        let mapped: UserPersistenceError = map_diesel_error(DieselError::NotFound);
        assert_eq!(mapped, UserPersistenceError::query("record not found"));
    }

    #[test]
    fn pool_checkout_failures_are_connection_errors() {
        let mapped: CataloguePersistenceError = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, CataloguePersistenceError::connection("timed out"));
    }

    #[test]
    fn non_positive_keys_are_rejected() {
        let decoded: Result<MatchId, _> = RefreshTokenPersistenceError::decode_id("match id", 0);
        assert!(matches!(
            decoded,
            Err(RefreshTokenPersistenceError::Query { message }) if message.contains("match id 0")
        ));
    }
}
