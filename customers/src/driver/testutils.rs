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

//! Test utilities for the business layer.

use crate::db;
use crate::driver::Driver;
use crate::model::{Customer, CustomerName, EmailAddress};
use recall_core::clocks::testutils::SettableClock;
use recall_core::clocks::Clock;
use recall_core::db::{Db, Executor};
use std::sync::Arc;
use time::macros::datetime;
use time::OffsetDateTime;

/// Initial time of the clock used in tests.
pub(crate) const INITIAL_TIME: OffsetDateTime = datetime!(2023-12-01 05:50:20.290 UTC);

pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<SettableClock>,
    driver: Driver,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(recall_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(INITIAL_TIME));
        let driver = Driver::new(db.clone(), clock.clone());
        Self { db, clock, driver }
    }

    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Inserts a customer directly into the database, bypassing validation.
    pub(crate) async fn create_customer(&self, name: &str, email: &str) -> Customer {
        db::create_customer(
            &mut self.ex().await,
            CustomerName::new(name).unwrap(),
            EmailAddress::new(email).unwrap(),
            self.clock.now_utc(),
        )
        .await
        .unwrap()
    }

    pub(crate) async fn count_customers(&self) -> u64 {
        db::count_customers(&mut self.ex().await).await.unwrap()
    }
}
