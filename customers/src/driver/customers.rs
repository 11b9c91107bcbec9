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

//! Operations on the collection of customers.

use crate::db;
use crate::driver::validation::validate;
use crate::driver::{unexpected, Driver};
use crate::mapper::{to_entity, to_wire};
use crate::model::{CustomerDto, Page, PageRequest};
use log::info;
use recall_core::driver::DriverResult;

impl Driver {
    /// Gets the page of customers described by `request`, ordered by identifier.
    pub(crate) async fn list_customers(
        self,
        request: PageRequest,
    ) -> DriverResult<Page<CustomerDto>> {
        let mut tx = self.db.begin().await.map_err(unexpected)?;
        let total = db::count_customers(tx.ex()).await.map_err(unexpected)?;
        let customers = db::get_customers(tx.ex(), &request).await.map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        Ok(Page::new(customers, total, &request).map(|customer| to_wire(&customer)))
    }

    /// Creates a new customer from `dto`.
    ///
    /// Any identifier or creation time in `dto` is ignored: the database assigns the former and
    /// the driver's clock provides the latter.
    pub(crate) async fn create_customer(self, dto: CustomerDto) -> DriverResult<CustomerDto> {
        let mut draft = to_entity(dto);
        draft.id = None;

        let mut tx = self.db.begin().await.map_err(unexpected)?;
        let (name, email) = validate(tx.ex(), &draft).await?;
        let customer = db::create_customer(tx.ex(), name, email, self.clock.now_utc())
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        info!("Created customer {}", customer.id());
        Ok(to_wire(&customer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use crate::model::CustomerId;
    use recall_core::driver::{DriverError, FieldError};
    use std::time::Duration;

    #[tokio::test]
    async fn test_list_customers_empty() {
        let context = TestContext::setup().await;

        let page = context.driver().list_customers(PageRequest::default()).await.unwrap();
        assert_eq!(
            Page { content: vec![], total_elements: 0, total_pages: 0, size: 20, number: 0 },
            page
        );
    }

    #[tokio::test]
    async fn test_list_customers_one_page() {
        let context = TestContext::setup().await;
        let a = context.create_customer("A", "a@fake.com").await;
        let b = context.create_customer("B", "b@fake.com").await;

        let page = context
            .driver()
            .list_customers(PageRequest::new(Some(0), Some(10)))
            .await
            .unwrap();
        assert_eq!(
            Page {
                content: vec![to_wire(&a), to_wire(&b)],
                total_elements: 2,
                total_pages: 1,
                size: 10,
                number: 0,
            },
            page
        );
    }

    #[tokio::test]
    async fn test_list_customers_last_page() {
        let context = TestContext::setup().await;
        let mut all = vec![];
        for i in 0..5 {
            all.push(context.create_customer("X", &format!("x{}@fake.com", i)).await);
        }

        let page =
            context.driver().list_customers(PageRequest::new(Some(1), Some(3))).await.unwrap();
        assert_eq!(
            Page {
                content: vec![to_wire(&all[3]), to_wire(&all[4])],
                total_elements: 5,
                total_pages: 2,
                size: 3,
                number: 1,
            },
            page
        );
    }

    #[tokio::test]
    async fn test_create_customer_ok() {
        let context = TestContext::setup().await;
        context.clock().advance(Duration::from_secs(1));

        let dto = CustomerDto {
            name: Some("Jane".to_owned()),
            email: Some("jane@fake.com".to_owned()),
            ..Default::default()
        };
        let created = context.driver().create_customer(dto).await.unwrap();

        assert!(created.id.is_some());
        assert_eq!(Some("Jane"), created.name.as_deref());
        assert_eq!(Some("jane@fake.com"), created.email.as_deref());
        assert_eq!(Some(INITIAL_TIME + Duration::from_secs(1)), created.created_at);

        let id = created.id.unwrap();
        let stored = db::get_customer(&mut context.ex().await, id).await.unwrap();
        assert_eq!(created, to_wire(&stored));
    }

    #[tokio::test]
    async fn test_create_customer_ignores_id_and_created_at() {
        let context = TestContext::setup().await;
        let existing = context.create_customer("A", "a@fake.com").await;

        let dto = CustomerDto {
            id: Some(*existing.id()),
            name: Some("B".to_owned()),
            email: Some("b@fake.com".to_owned()),
            created_at: Some(INITIAL_TIME - Duration::from_secs(3600)),
        };
        let created = context.driver().create_customer(dto).await.unwrap();

        assert_ne!(Some(*existing.id()), created.id);
        assert_eq!(Some(INITIAL_TIME), created.created_at);
        assert_eq!(
            existing,
            db::get_customer(&mut context.ex().await, *existing.id()).await.unwrap()
        );
        assert_eq!(2, context.count_customers().await);
    }

    #[tokio::test]
    async fn test_create_customer_validation_errors() {
        let context = TestContext::setup().await;

        let dto = CustomerDto { email: Some("bad email".to_owned()), ..Default::default() };
        assert_eq!(
            DriverError::Validation(vec![
                FieldError::new("name", "Name is required"),
                FieldError::new("email", "Enter a valid email"),
            ]),
            context.driver().create_customer(dto).await.unwrap_err()
        );
        assert_eq!(0, context.count_customers().await);
    }

    #[tokio::test]
    async fn test_create_customer_duplicate_email() {
        let context = TestContext::setup().await;
        context.create_customer("A", "a@fake.com").await;

        let dto = CustomerDto {
            name: Some("Other".to_owned()),
            email: Some("a@fake.com".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            DriverError::Validation(vec![FieldError::new(
                "email",
                "Email a@fake.com already exists!"
            )]),
            context.driver().create_customer(dto).await.unwrap_err()
        );
        assert_eq!(1, context.count_customers().await);
    }

    #[tokio::test]
    async fn test_create_customer_assigns_increasing_ids() {
        let context = TestContext::setup().await;

        let mut ids: Vec<CustomerId> = vec![];
        for email in ["a@fake.com", "b@fake.com"] {
            let dto = CustomerDto {
                name: Some("N".to_owned()),
                email: Some(email.to_owned()),
                ..Default::default()
            };
            ids.push(context.driver().create_customer(dto).await.unwrap().id.unwrap());
        }
        assert!(ids[0] < ids[1]);
    }
}
