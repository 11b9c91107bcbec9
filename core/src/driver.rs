// Recall
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Generic business logic for any service.
//!
//! Every service should implement its own `Driver` type holding the shared resources it needs,
//! such as the database and the clock:
//!
//! ```rust
//! use recall_core::clocks::Clock;
//! use recall_core::db::Db;
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! pub(crate) struct Driver {
//!     /// The database that the driver uses for persistence.
//!     db: Arc<dyn Db + Send + Sync>,
//!
//!     /// The clock that the driver uses to timestamp new entities.
//!     clock: Arc<dyn Clock + Send + Sync>,
//! }
//! ```
//!
//! Every operation implemented in the `Driver` should consume `self` because this is the layer
//! that coordinates multiple operations against the database inside a single transaction.
//! Consuming `self` prevents the caller from easily issuing multiple operations against the driver,
//! as this would require a clone and highlight an undesirable pattern.

use crate::db::DbError;
use std::fmt;

/// A problem with a single field of an input entity.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    /// Name of the field as it appears in the external representation of the entity.
    pub field: String,

    /// Description of the problem, suitable to show to the user.
    pub message: String,
}

impl FieldError {
    /// Creates a new error for `field` described by `message`.
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Formats a collection of field errors as a single line.
fn join_field_errors(errors: &[FieldError]) -> String {
    errors.iter().map(FieldError::to_string).collect::<Vec<String>>().join("; ")
}

/// Business logic errors.  These errors encompass backend and logical errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// Catch-all error type for unexpected database errors.
    #[error("{0}")]
    BackendError(String),

    /// Indicates an error in the input data.
    #[error("{0}")]
    InvalidInput(String),

    /// Indicates that a requested entry does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that one or more fields of an input entity did not pass validation.
    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),
}

impl From<DbError> for DriverError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::BackendError(_) => DriverError::BackendError(e.to_string()),
            DbError::DataIntegrityError(_) => DriverError::BackendError(e.to_string()),
            DbError::NotFound => DriverError::NotFound(e.to_string()),
            DbError::Unavailable => DriverError::BackendError(e.to_string()),
        }
    }
}

/// Result type for this module.
pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let e = FieldError::new("name", "Name is required");
        assert_eq!("name: Name is required", e.to_string());
    }

    #[test]
    fn test_validation_display_joins_fields() {
        let e = DriverError::Validation(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("email", "Email is required"),
        ]);
        assert_eq!(
            "Validation failed: name: Name is required; email: Email is required",
            e.to_string()
        );
    }

    #[test]
    fn test_from_db_error() {
        assert_eq!(
            DriverError::NotFound("Entity not found".to_owned()),
            DriverError::from(DbError::NotFound)
        );
        assert_eq!(
            DriverError::BackendError("Unavailable".to_owned()),
            DriverError::from(DbError::Unavailable)
        );
        assert_eq!(
            DriverError::BackendError("Database error: foo".to_owned()),
            DriverError::from(DbError::BackendError("foo".to_owned()))
        );
    }
}
