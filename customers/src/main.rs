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

//! Entry point to the customers service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use recall_core::db::postgres::{PostgresDb, PostgresOptions};
use recall_core::db::Db;
use recall_core::env::get_optional_var;
use recall_customers::db::init_schema;
use recall_customers::serve;
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

/// Default port to listen on when `PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let port = get_optional_var::<u16>("", "PORT")?.unwrap_or(DEFAULT_PORT);
    let ip = get_optional_var::<IpAddr>("", "BIND_ADDRESS")?
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    let db_opts = PostgresOptions::from_env("PGSQL_PROD")?;
    let db = Arc::from(PostgresDb::connect(db_opts)?);
    init_schema(&mut db.ex().await?).await?;

    serve((ip, port), db).await
}
