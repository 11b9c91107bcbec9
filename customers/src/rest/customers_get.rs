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

//! API to list customers one page at a time.

use crate::driver::Driver;
use crate::model::PageRequest;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use recall_core::rest::{EmptyBody, QueryParams, RestError};
use serde::{Deserialize, Serialize};

/// Query parameters for this API.
#[derive(Deserialize, Serialize)]
pub(crate) struct ListQuery {
    /// Zero-based index of the page to fetch.
    page: Option<u32>,

    /// Maximum number of customers to return.
    size: Option<u32>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    QueryParams(query): QueryParams<ListQuery>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let page = driver.list_customers(PageRequest::new(query.page, query.size)).await?;
    Ok(Json(page))
}
