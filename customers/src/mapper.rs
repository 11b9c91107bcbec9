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

//! Conversions between the external and the stored representations of a customer.

use crate::model::{Customer, CustomerDraft, CustomerDto};

/// Converts a stored `customer` into its external representation.
pub(crate) fn to_wire(customer: &Customer) -> CustomerDto {
    CustomerDto {
        id: Some(*customer.id()),
        name: Some(customer.name().as_str().to_owned()),
        email: Some(customer.email().as_str().to_owned()),
        created_at: Some(*customer.created_at()),
    }
}

/// Converts an external representation of a customer into a draft pending validation.
///
/// The creation time is not copied because it is always assigned by the service.
pub(crate) fn to_entity(dto: CustomerDto) -> CustomerDraft {
    CustomerDraft { id: dto.id, name: dto.name, email: dto.email }
}

/// Applies the fields present in `patch` on top of `existing`.
///
/// Fields missing from `patch` keep the value they have in `existing`.  The identifier always
/// comes from `existing` because it cannot change.
pub(crate) fn merge_into(existing: &Customer, patch: CustomerDto) -> CustomerDraft {
    CustomerDraft {
        id: Some(*existing.id()),
        name: Some(patch.name.unwrap_or_else(|| existing.name().as_str().to_owned())),
        email: Some(patch.email.unwrap_or_else(|| existing.email().as_str().to_owned())),
    }
}
