//! Persistence gateway error types.

/// Persistence error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// Connection failed
    #[display("Database connection error: {}", _0)]
    Connection(String),
    /// Query execution failed
    #[display("Database query error: {}", _0)]
    Query(String),
    /// Migration error
    #[display("Migration error: {}", _0)]
    Migration(String),
    /// Record not found
    #[display("{} {} not found", entity, id)]
    NotFound {
        /// Entity name ("character", "series", ...)
        entity: &'static str,
        /// Identifier that was looked up
        id: i32,
    },
    /// A referenced record does not exist
    #[display("Foreign key violation: {}", _0)]
    ForeignKey(String),
}

/// Database error with source location tracking.
///
/// # Examples
///
/// ```
/// use everglen_error::{DatabaseError, DatabaseErrorKind};
///
/// let err = DatabaseError::new(DatabaseErrorKind::NotFound { entity: "series", id: 7 });
/// assert!(format!("{}", err).contains("series 7 not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// The kind of error that occurred
    pub kind: DatabaseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DatabaseError {
    /// Create a new DatabaseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a missing record.
    #[track_caller]
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::new(DatabaseErrorKind::NotFound { entity, id })
    }

    /// Whether the error is a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, DatabaseErrorKind::NotFound { .. })
    }
}

// Diesel error conversions (only available with database feature)
#[cfg(feature = "database")]
impl From<diesel::result::Error> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind as DieselKind, Error};
        match err {
            Error::DatabaseError(DieselKind::ForeignKeyViolation, info) => {
                DatabaseError::new(DatabaseErrorKind::ForeignKey(info.message().to_string()))
            }
            _ => DatabaseError::new(DatabaseErrorKind::Query(err.to_string())),
        }
    }
}

#[cfg(feature = "database")]
impl From<diesel::ConnectionError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Connection(err.to_string()))
    }
}
