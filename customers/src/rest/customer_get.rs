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

//! API to get one customer.

use crate::driver::Driver;
use crate::model::CustomerId;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use recall_core::rest::{EmptyBody, PathParams, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(id): PathParams<CustomerId>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    match driver.get_customer(id).await? {
        Some(customer) => Ok(Json(customer)),
        None => Err(RestError::NotFound(format!("Customer with id {} not found", id))),
    }
}

#[cfg(test)]
mod tests {
    use crate::mapper::to_wire;
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use recall_core::rest::testutils::*;

    fn route(id: i64) -> (http::Method, String) {
        (http::Method::GET, format!("/api/v1/customers/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        context.create_customer("Jane", "jane@example.com").await;
        let customer = context.create_customer("John", "john@example.com").await;

        let response = OneShotBuilder::new(context.app(), route(customer.id().as_i64()))
            .send_empty()
            .await
            .expect_json::<CustomerDto>()
            .await;
        assert_eq!(to_wire(&customer), response);
    }

    #[tokio::test]
    async fn test_wire_format() {
        let context = TestContext::setup().await;

        let customer = context.create_customer("Jane", "jane@example.com").await;

        let response = OneShotBuilder::new(context.app(), route(customer.id().as_i64()))
            .send_empty()
            .await
            .expect_json::<serde_json::Value>()
            .await;
        assert_eq!(
            serde_json::json!({
                "id": customer.id().as_i64(),
                "name": "Jane",
                "email": "jane@example.com",
                "createdAt": "2023-12-01T05:50:20.29Z",
            }),
            response
        );
    }

    #[tokio::test]
    async fn test_missing() {
        let context = TestContext::setup().await;

        context.create_customer("Jane", "jane@example.com").await;

        OneShotBuilder::new(context.into_app(), route(1000))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Customer with id 1000 not found")
            .await;
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route(0))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("must be positive")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route(1));
}
