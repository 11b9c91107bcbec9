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

//! Database abstraction to manipulate customers.

use crate::model::{Customer, CustomerId, CustomerName, EmailAddress, PageRequest};
#[cfg(feature = "postgres")]
use recall_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use recall_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use recall_core::db::{DbError, DbResult, Executor};
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use time::OffsetDateTime;


/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Customer {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;

        Ok(Customer::new(
            CustomerId::new(id)?,
            CustomerName::new(name)?,
            EmailAddress::new(email)?,
            created_at,
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Customer {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let created_at_secs: i64 = row.try_get("created_at_secs").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsecs: i64 =
            row.try_get("created_at_nsecs").map_err(sqlite::map_sqlx_error)?;

        Ok(Customer::new(
            CustomerId::new(id)?,
            CustomerName::new(name)?,
            EmailAddress::new(email)?,
            build_timestamp(created_at_secs, created_at_nsecs)?,
        ))
    }
}

/// Converts a row count as returned by the database into an unsigned number.
fn count_as_u64(count: i64) -> DbResult<u64> {
    u64::try_from(count)
        .map_err(|e| DbError::DataIntegrityError(format!("Invalid row count {}: {}", count, e)))
}

/// Creates a new customer with the given `name` and `email`, stamped with `created_at`.
///
/// The identifier is assigned by the database and returned as part of the new customer.
pub(crate) async fn create_customer(
    ex: &mut Executor,
    name: CustomerName,
    email: EmailAddress,
    created_at: OffsetDateTime,
) -> DbResult<Customer> {
    let id: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO customers (name, email, created_at)
                VALUES ($1, $2, $3)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(name.as_str())
                .bind(email.as_str())
                .bind(created_at)
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (created_at_secs, created_at_nsecs) = unpack_timestamp(created_at)?;

            let query_str = "
                INSERT INTO customers (name, email, created_at_secs, created_at_nsecs)
                VALUES (?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(name.as_str())
                .bind(email.as_str())
                .bind(created_at_secs)
                .bind(created_at_nsecs)
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.last_insert_rowid()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let id = CustomerId::new(id)?;
    Ok(Customer::new(id, name, email, created_at))
}

/// Gets the customer identified by `id`.
pub(crate) async fn get_customer(ex: &mut Executor, id: CustomerId) -> DbResult<Customer> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM customers WHERE id = $1";
            let raw = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            match raw {
                Some(raw) => Customer::try_from(raw),
                None => Err(DbError::NotFound),
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM customers WHERE id = ?";
            let raw = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match raw {
                Some(raw) => Customer::try_from(raw),
                None => Err(DbError::NotFound),
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the customers that fall in the page described by `request`, ordered by identifier.
pub(crate) async fn get_customers(
    ex: &mut Executor,
    request: &PageRequest,
) -> DbResult<Vec<Customer>> {
    let limit = i64::from(request.size());
    let offset = i64::try_from(request.offset())
        .map_err(|e| DbError::BackendError(format!("Page offset out of range: {}", e)))?;

    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM customers ORDER BY id LIMIT $1 OFFSET $2";
            let rows = sqlx::query(query_str)
                .bind(limit)
                .bind(offset)
                .fetch_all(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Customer::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM customers ORDER BY id LIMIT ? OFFSET ?";
            let rows = sqlx::query(query_str)
                .bind(limit)
                .bind(offset)
                .fetch_all(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Customer::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Counts all stored customers.
pub(crate) async fn count_customers(ex: &mut Executor) -> DbResult<u64> {
    let query_str = "SELECT COUNT(*) AS total FROM customers";
    let total: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let row = sqlx::query(query_str)
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("total").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let row =
                sqlx::query(query_str).fetch_one(&mut **ex).await.map_err(sqlite::map_sqlx_error)?;
            row.try_get("total").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    count_as_u64(total)
}

/// Overwrites the name and email of an existing `customer`.  The creation time is never updated.
pub(crate) async fn update_customer(ex: &mut Executor, customer: &Customer) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE customers SET name = $1, email = $2 WHERE id = $3";
            let done = sqlx::query(query_str)
                .bind(customer.name().as_str())
                .bind(customer.email().as_str())
                .bind(customer.id().as_i64())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE customers SET name = ?, email = ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(customer.name().as_str())
                .bind(customer.email().as_str())
                .bind(customer.id().as_i64())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Deletes the customer identified by `id`.
pub(crate) async fn delete_customer(ex: &mut Executor, id: CustomerId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM customers WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id.as_i64())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM customers WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.as_i64())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Delete affected more than one row".to_owned())),
    }
}

/// Checks if any customer has exactly the given `email`.
pub(crate) async fn exists_by_email(ex: &mut Executor, email: &str) -> DbResult<bool> {
    let total: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS total FROM customers WHERE email = $1";
            let row = sqlx::query(query_str)
                .bind(email)
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("total").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS total FROM customers WHERE email = ?";
            let row = sqlx::query(query_str)
                .bind(email)
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("total").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(count_as_u64(total)? > 0)
}

/// Checks if any customer other than the one identified by `id` has exactly the given `email`.
pub(crate) async fn exists_by_email_excluding_id(
    ex: &mut Executor,
    email: &str,
    id: CustomerId,
) -> DbResult<bool> {
    let total: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS total FROM customers WHERE email = $1 AND id <> $2";
            let row = sqlx::query(query_str)
                .bind(email)
                .bind(id.as_i64())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("total").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS total FROM customers WHERE email = ? AND id <> ?";
            let row = sqlx::query(query_str)
                .bind(email)
                .bind(id.as_i64())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("total").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(count_as_u64(total)? > 0)
}
