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

//! API to update one customer identified by its path.

use crate::driver::Driver;
use crate::model::{CustomerDto, CustomerId};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use recall_core::rest::{JsonBody, PathParams, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(id): PathParams<CustomerId>,
    JsonBody(patch): JsonBody<CustomerDto>,
) -> Result<impl IntoResponse, RestError> {
    let customer = driver.update_customer(Some(id), patch).await?;
    Ok(Json(customer))
}
