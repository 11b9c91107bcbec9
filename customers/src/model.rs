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

//! High-level data types.

use derive_getters::Getters;
use derive_more::{Constructor, Display};
use recall_core::model::{ModelError, ModelResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use time::OffsetDateTime;

/// Maximum length of customer names per the schema.
pub(crate) const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of email addresses per the schema.
pub(crate) const MAX_EMAIL_LENGTH: usize = 255;

/// Default number of entries returned in a page when the caller does not ask for a size.
pub(crate) const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum number of entries that a single page can hold.
pub(crate) const MAX_PAGE_SIZE: u32 = 2000;

/// Syntax of valid email addresses: a local part made of RFC 5322 `atext` characters and dots,
/// and a domain made of dot-separated alphanumeric labels that may contain inner hyphens.
static EMAIL_RE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    let label = "[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?";
    Regex::new(&format!(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{{|}}~-]+@{label}(?:\.{label})*$"))
});

/// Identifier of a customer, as assigned by the database.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct CustomerId(i64);

impl CustomerId {
    /// Creates a new identifier from an untrusted `id`, making sure it is positive.
    pub fn new(id: i64) -> ModelResult<Self> {
        if id <= 0 {
            return Err(ModelError(format!("Customer id must be positive but got {}", id)));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a raw integer for storage.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for CustomerId {
    type Error = ModelError;

    fn try_from(id: i64) -> ModelResult<Self> {
        CustomerId::new(id)
    }
}

impl From<CustomerId> for i64 {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

/// Name of a customer.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct CustomerName(String);

impl CustomerName {
    /// Creates a new name from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.trim().is_empty() {
            return Err(ModelError("Name is required".to_owned()));
        }
        if s.chars().count() > MAX_NAME_LENGTH {
            return Err(ModelError("Name is too long".to_owned()));
        }

        Ok(Self(s))
    }

    /// Returns a string view of the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Represents a correctly-formatted email address.
///
/// Addresses are compared byte by byte, so two addresses that only differ in case are different.
/// This matches the equality predicate used by the database when looking for duplicates.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a new email address from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.trim().is_empty() {
            return Err(ModelError("Email is required".to_owned()));
        }
        if s.chars().count() > MAX_EMAIL_LENGTH {
            return Err(ModelError("Enter a valid email".to_owned()));
        }

        let re = EMAIL_RE
            .as_ref()
            .map_err(|e| ModelError(format!("Invalid email pattern: {}", e)))?;
        if !re.is_match(&s) {
            return Err(ModelError("Enter a valid email".to_owned()));
        }

        Ok(Self(s))
    }

    /// Returns a string view of the email address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored customer.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub struct Customer {
    /// Identifier assigned by the database at creation time.
    id: CustomerId,

    /// Name of the customer.
    name: CustomerName,

    /// Contact email of the customer, unique across all customers.
    email: EmailAddress,

    /// Time at which the customer was created.  Never changes afterwards.
    created_at: OffsetDateTime,
}

impl Customer {
    /// Replaces the mutable fields of the customer with `name` and `email`.
    pub(crate) fn with_contact(self, name: CustomerName, email: EmailAddress) -> Self {
        Self { name, email, ..self }
    }
}

/// External representation of a customer as exchanged with clients.
///
/// All fields are optional because the same shape carries full records in responses, creation
/// requests without an id and partial updates.  `created_at` is ignored on input.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    /// Identifier of the customer, if known.
    #[serde(default)]
    pub id: Option<CustomerId>,

    /// Name of the customer.
    #[serde(default)]
    pub name: Option<String>,

    /// Contact email of the customer.
    #[serde(default)]
    pub email: Option<String>,

    /// Creation time of the customer.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A customer built from untrusted input that has not been validated yet.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct CustomerDraft {
    /// Identifier of the customer being modified, if any.
    pub(crate) id: Option<CustomerId>,

    /// Candidate name.
    pub(crate) name: Option<String>,

    /// Candidate email.
    pub(crate) email: Option<String>,
}

/// Position and size of a page to fetch from a listing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageRequest {
    /// Zero-based index of the page.
    number: u32,

    /// Maximum number of entries in the page.
    size: u32,
}

impl PageRequest {
    /// Creates a page request from untrusted parameters, applying defaults and limits.
    ///
    /// A missing `number` means the first page.  A missing or zero `size` means the default size,
    /// and sizes above the maximum are clamped to it.
    pub fn new(number: Option<u32>, size: Option<u32>) -> Self {
        let size = match size {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(size) => size.min(MAX_PAGE_SIZE),
        };
        Self { number: number.unwrap_or(0), size }
    }

    /// Returns the zero-based index of the page.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns the maximum number of entries in the page.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the number of entries to skip to reach this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// A slice of a listing along with the details to fetch the rest of it.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Entries in this page.
    pub content: Vec<T>,

    /// Total number of entries across all pages.
    pub total_elements: u64,

    /// Total number of pages given the page size.
    pub total_pages: u64,

    /// Maximum number of entries per page.
    pub size: u32,

    /// Zero-based index of this page.
    pub number: u32,
}

impl<T> Page<T> {
    /// Creates a new page with `content` fetched for `request` out of `total_elements` entries.
    pub fn new(content: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        let size = u64::from(request.size());
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(size),
            size: request.size(),
            number: request.number(),
        }
    }

    /// Converts the entries of the page with `f`, keeping the paging details.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_id_ok() {
        assert_eq!(1, CustomerId::new(1).unwrap().as_i64());
        assert_eq!(i64::MAX, CustomerId::new(i64::MAX).unwrap().as_i64());
    }

    #[test]
    fn test_customer_id_error() {
        assert!(CustomerId::new(0).is_err());
        assert!(CustomerId::new(-5).is_err());
    }

    #[test]
    fn test_customer_id_de_error() {
        let err = serde_json::from_str::<CustomerId>("-3").unwrap_err();
        assert!(err.to_string().contains("must be positive"), "{}", err);
    }

    #[test]
    fn test_customer_name_ok() {
        assert_eq!("Jane Doe", CustomerName::new("Jane Doe").unwrap().as_str());
        assert!(CustomerName::new("x".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_customer_name_error() {
        assert_eq!(ModelError("Name is required".to_owned()), CustomerName::new("").unwrap_err());
        assert_eq!(
            ModelError("Name is required".to_owned()),
            CustomerName::new(" \t ").unwrap_err()
        );
        assert_eq!(
            ModelError("Name is too long".to_owned()),
            CustomerName::new("x".repeat(MAX_NAME_LENGTH + 1)).unwrap_err()
        );
    }

    #[test]
    fn test_email_address_ok() {
        assert_eq!("simple@example.com", EmailAddress::new("simple@example.com").unwrap().as_str());
        assert!(EmailAddress::new("a.b+tag@sub.example-host.org").is_ok());
        assert!(EmailAddress::new("a!b@c").is_ok());
    }

    #[test]
    fn test_email_address_required() {
        assert_eq!(ModelError("Email is required".to_owned()), EmailAddress::new("").unwrap_err());
        assert_eq!(
            ModelError("Email is required".to_owned()),
            EmailAddress::new("  ").unwrap_err()
        );
    }

    #[test]
    fn test_email_address_invalid() {
        for raw in ["foo", "foo@", "@example.com", "a b@example.com", "a@-example.com", "a@b..c"] {
            assert_eq!(
                ModelError("Enter a valid email".to_owned()),
                EmailAddress::new(raw).unwrap_err(),
                "{} should have been rejected",
                raw
            );
        }
    }

    #[test]
    fn test_email_address_too_long() {
        let mut long = format!("a@{}", "b".repeat(61));
        while long.len() <= MAX_EMAIL_LENGTH {
            long.push_str(".ccc");
        }
        assert_eq!(
            ModelError("Enter a valid email".to_owned()),
            EmailAddress::new(long).unwrap_err()
        );
    }

    #[test]
    fn test_email_address_case_sensitive() {
        assert_ne!(
            EmailAddress::new("foo@example.com").unwrap(),
            EmailAddress::new("Foo@example.com").unwrap()
        );
    }

    #[test]
    fn test_customer_dto_wire_format() {
        let dto = CustomerDto {
            id: Some(CustomerId::new(7).unwrap()),
            name: Some("Jane".to_owned()),
            email: Some("jane@example.com".to_owned()),
            created_at: Some(time::macros::datetime!(2023-05-01 10:20:30 UTC)),
        };
        assert_eq!(
            serde_json::json!({
                "id": 7,
                "name": "Jane",
                "email": "jane@example.com",
                "createdAt": "2023-05-01T10:20:30Z",
            }),
            serde_json::to_value(&dto).unwrap()
        );
    }

    #[test]
    fn test_customer_dto_missing_fields() {
        let dto: CustomerDto = serde_json::from_str(r#"{"name": "Jane"}"#).unwrap();
        assert_eq!(CustomerDto { name: Some("Jane".to_owned()), ..Default::default() }, dto);
    }

    #[test]
    fn test_page_request_defaults() {
        assert_eq!(
            PageRequest { number: 0, size: DEFAULT_PAGE_SIZE },
            PageRequest::new(None, None)
        );
        assert_eq!(
            PageRequest { number: 3, size: DEFAULT_PAGE_SIZE },
            PageRequest::new(Some(3), Some(0))
        );
    }

    #[test]
    fn test_page_request_clamps_size() {
        assert_eq!(MAX_PAGE_SIZE, PageRequest::new(None, Some(MAX_PAGE_SIZE + 1)).size());
        assert_eq!(10, PageRequest::new(None, Some(10)).size());
    }

    #[test]
    fn test_page_request_offset() {
        assert_eq!(0, PageRequest::new(Some(0), Some(10)).offset());
        assert_eq!(30, PageRequest::new(Some(3), Some(10)).offset());
    }

    #[test]
    fn test_page_total_pages() {
        let request = PageRequest::new(Some(0), Some(10));
        assert_eq!(0, Page::<u8>::new(vec![], 0, &request).total_pages);
        assert_eq!(1, Page::new(vec![1, 2], 2, &request).total_pages);
        assert_eq!(1, Page::new(vec![1; 10], 10, &request).total_pages);
        assert_eq!(2, Page::new(vec![1; 10], 11, &request).total_pages);
    }

    #[test]
    fn test_page_map_keeps_envelope() {
        let request = PageRequest::new(Some(1), Some(2));
        let page = Page::new(vec![1, 2], 5, &request).map(|i| i * 10);
        assert_eq!(
            Page { content: vec![10, 20], total_elements: 5, total_pages: 3, size: 2, number: 1 },
            page
        );
    }
}
