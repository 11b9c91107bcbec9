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

//! Validation of customers before they are written to the database.

use crate::db;
use crate::driver::unexpected;
use crate::model::{CustomerDraft, CustomerId, CustomerName, EmailAddress};
use log::info;
use recall_core::db::{DbResult, Executor};
use recall_core::driver::{DriverError, DriverResult, FieldError};

/// Checks whether `email` is already held by a customer other than `self_id`.
///
/// A missing `email` is never a duplicate.  A missing `self_id` means that the customer does not
/// exist yet, so any customer holding `email` is a conflict.
pub(super) async fn is_duplicate(
    ex: &mut Executor,
    email: Option<&str>,
    self_id: Option<CustomerId>,
) -> DbResult<bool> {
    match (email, self_id) {
        (None, _) => Ok(false),
        (Some(email), None) => db::exists_by_email(ex, email).await,
        (Some(email), Some(id)) => db::exists_by_email_excluding_id(ex, email, id).await,
    }
}

/// Validates all fields of `draft` and returns the typed values to store.
///
/// All problems are collected and returned together, in field order, with the duplicate email
/// check last.
pub(super) async fn validate(
    ex: &mut Executor,
    draft: &CustomerDraft,
) -> DriverResult<(CustomerName, EmailAddress)> {
    let mut errors = vec![];

    let name = match draft.name.as_deref() {
        Some(name) => match CustomerName::new(name) {
            Ok(name) => Some(name),
            Err(e) => {
                errors.push(FieldError::new("name", e.0));
                None
            }
        },
        None => {
            errors.push(FieldError::new("name", "Name is required"));
            None
        }
    };

    let email = match draft.email.as_deref() {
        Some(email) => match EmailAddress::new(email) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.push(FieldError::new("email", e.0));
                None
            }
        },
        None => {
            errors.push(FieldError::new("email", "Email is required"));
            None
        }
    };

    if let Some(raw_email) = draft.email.as_deref() {
        if is_duplicate(ex, Some(raw_email), draft.id).await.map_err(unexpected)? {
            errors.push(FieldError::new("email", format!("Email {} already exists!", raw_email)));
        }
    }

    match (name, email) {
        (Some(name), Some(email)) if errors.is_empty() => Ok((name, email)),
        _ => {
            info!("Rejecting customer with {} invalid fields", errors.len());
            Err(DriverError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;

    #[tokio::test]
    async fn test_is_duplicate_missing_email() {
        let context = TestContext::setup().await;
        context.create_customer("A", "a@example.com").await;

        assert!(!is_duplicate(&mut context.ex().await, None, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_duplicate_without_self_id() {
        let context = TestContext::setup().await;
        context.create_customer("A", "a@example.com").await;

        let mut ex = context.ex().await;
        assert!(is_duplicate(&mut ex, Some("a@example.com"), None).await.unwrap());
        assert!(!is_duplicate(&mut ex, Some("b@example.com"), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_duplicate_with_self_id() {
        let context = TestContext::setup().await;
        let a = context.create_customer("A", "a@example.com").await;
        let b = context.create_customer("B", "b@example.com").await;

        let mut ex = context.ex().await;
        assert!(!is_duplicate(&mut ex, Some("a@example.com"), Some(*a.id())).await.unwrap());
        assert!(is_duplicate(&mut ex, Some("a@example.com"), Some(*b.id())).await.unwrap());
        assert!(!is_duplicate(&mut ex, Some("c@example.com"), Some(*b.id())).await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_ok() {
        let context = TestContext::setup().await;

        let draft = CustomerDraft {
            id: None,
            name: Some("Jane".to_owned()),
            email: Some("jane@example.com".to_owned()),
        };
        let (name, email) = validate(&mut context.ex().await, &draft).await.unwrap();
        assert_eq!("Jane", name.as_str());
        assert_eq!("jane@example.com", email.as_str());
    }

    #[tokio::test]
    async fn test_validate_missing_fields() {
        let context = TestContext::setup().await;

        let draft = CustomerDraft::default();
        assert_eq!(
            DriverError::Validation(vec![
                FieldError::new("name", "Name is required"),
                FieldError::new("email", "Email is required"),
            ]),
            validate(&mut context.ex().await, &draft).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_validate_blank_and_malformed() {
        let context = TestContext::setup().await;

        let draft = CustomerDraft {
            id: None,
            name: Some("   ".to_owned()),
            email: Some("not-an-email".to_owned()),
        };
        assert_eq!(
            DriverError::Validation(vec![
                FieldError::new("name", "Name is required"),
                FieldError::new("email", "Enter a valid email"),
            ]),
            validate(&mut context.ex().await, &draft).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_validate_duplicate_reported_last() {
        let context = TestContext::setup().await;
        context.create_customer("A", "a@example.com").await;

        let draft =
            CustomerDraft { id: None, name: None, email: Some("a@example.com".to_owned()) };
        assert_eq!(
            DriverError::Validation(vec![
                FieldError::new("name", "Name is required"),
                FieldError::new("email", "Email a@example.com already exists!"),
            ]),
            validate(&mut context.ex().await, &draft).await.unwrap_err()
        );
    }
}
