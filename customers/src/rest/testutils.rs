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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use recall_core::clocks::testutils::SettableClock;
use recall_core::clocks::Clock;
use recall_core::db::{Db, DbError};
use std::sync::Arc;
use time::macros::datetime;

pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<SettableClock>,
    app: Router,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(recall_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(datetime!(2023-12-01 05:50:20.290 UTC)));
        let driver = Driver::new(db.clone(), clock.clone());
        let app = app(driver);
        Self { db, clock, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    pub(crate) async fn create_customer(&self, name: &str, email: &str) -> Customer {
        db::create_customer(
            &mut self.db.ex().await.unwrap(),
            CustomerName::new(name).unwrap(),
            EmailAddress::new(email).unwrap(),
            self.clock.now_utc(),
        )
        .await
        .unwrap()
    }

    pub(crate) async fn get_customer(&self, id: CustomerId) -> Option<Customer> {
        match db::get_customer(&mut self.db.ex().await.unwrap(), id).await {
            Ok(customer) => Some(customer),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    pub(crate) async fn count_customers(&self) -> u64 {
        db::count_customers(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}
