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

//! Operations on one customer.

use crate::db;
use crate::driver::validation::validate;
use crate::driver::{unexpected, Driver};
use crate::mapper::{merge_into, to_wire};
use crate::model::{Customer, CustomerDto, CustomerId};
use log::{info, warn};
use recall_core::db::{DbError, Executor};
use recall_core::driver::{DriverError, DriverResult};

/// Fetches the customer identified by `id`, turning a missing customer into an error.
async fn get_existing(ex: &mut Executor, id: CustomerId) -> DriverResult<Customer> {
    match db::get_customer(ex, id).await {
        Ok(customer) => Ok(customer),
        Err(DbError::NotFound) => {
            warn!("Customer {} does not exist", id);
            Err(DriverError::NotFound(format!("Customer with id {} not found", id)))
        }
        Err(e) => Err(unexpected(e)),
    }
}

/// Determines the customer to update given the `path_id` of the request and the `body_id` in its
/// payload.
fn resolve_id(
    path_id: Option<CustomerId>,
    body_id: Option<CustomerId>,
) -> DriverResult<CustomerId> {
    match (path_id, body_id) {
        (Some(path_id), Some(body_id)) if path_id != body_id => Err(DriverError::InvalidInput(
            format!("Customer id {} in body does not match id {} in path", body_id, path_id),
        )),
        (Some(id), _) | (None, Some(id)) => Ok(id),
        (None, None) => Err(DriverError::InvalidInput("Customer id is required".to_owned())),
    }
}

impl Driver {
    /// Gets the customer identified by `id`, if it exists.
    pub(crate) async fn get_customer(self, id: CustomerId) -> DriverResult<Option<CustomerDto>> {
        let mut ex = self.db.ex().await.map_err(unexpected)?;
        match db::get_customer(&mut ex, id).await {
            Ok(customer) => Ok(Some(to_wire(&customer))),
            Err(DbError::NotFound) => Ok(None),
            Err(e) => Err(unexpected(e)),
        }
    }

    /// Applies the fields present in `patch` to an existing customer.
    ///
    /// The customer is identified by `path_id` if given, or else by the identifier in `patch`.
    /// When both are present they must match.
    pub(crate) async fn update_customer(
        self,
        path_id: Option<CustomerId>,
        patch: CustomerDto,
    ) -> DriverResult<CustomerDto> {
        let id = resolve_id(path_id, patch.id)?;

        let mut tx = self.db.begin().await.map_err(unexpected)?;
        let existing = get_existing(tx.ex(), id).await?;
        let draft = merge_into(&existing, patch);
        let (name, email) = validate(tx.ex(), &draft).await?;
        let updated = existing.with_contact(name, email);
        db::update_customer(tx.ex(), &updated).await.map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        info!("Updated customer {}", id);
        Ok(to_wire(&updated))
    }

    /// Deletes the customer identified by `id`.
    pub(crate) async fn delete_customer(self, id: CustomerId) -> DriverResult<()> {
        let mut tx = self.db.begin().await.map_err(unexpected)?;
        get_existing(tx.ex(), id).await?;
        db::delete_customer(tx.ex(), id).await.map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        info!("Deleted customer {}", id);
        Ok(())
    }
}
