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

//! Generic support for the domain model of a service.
//!
//! Services define their own types in a `model` module and use `ModelError` to report values
//! that do not pass validation.  Prefer the newtype pattern with a fallible `new` constructor
//! so that invalid values cannot be represented.

/// Error caused by a value that does not satisfy the constraints of its type.
///
/// The message is meant to be shown to the user as is, so it should describe the problem in terms
/// of the input rather than in terms of the code.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ModelError(pub String);

/// Result type for this module.
pub type ModelResult<T> = Result<T, ModelError>;
