// Rust-ocilib - Rust driver for Oracle database on top of OCI
//
// URL: https://github.com/kubo/rust-ocilib
//
//-----------------------------------------------------------------------------
// Copyright (c) 2017-2023 Kubo Takehiro <kubo@jiubao.org>. All rights reserved.
// This program is free software: you can modify it and/or redistribute it
// under the terms of:
//
// (i)  the Universal Permissive License v 1.0 or at your option, any
//      later version (http://oss.oracle.com/licenses/upl); and/or
//
// (ii) the Apache License v 2.0. (http://www.apache.org/licenses/LICENSE-2.0)
//-----------------------------------------------------------------------------

//! Oracle database driver speaking the Oracle Call Interface directly.
//!
//! The Oracle client shared library is located and loaded at runtime by
//! default; its version decides which features are available. Build with the
//! `static-link` feature to resolve OCI at link time instead.
//!
//! ## Connect and query
//!
//! ```no_run
//! # use ocilib::*;
//! let conn = Connection::connect("scott", "tiger", "//localhost/XEPDB1")?;
//! let mut stmt = conn.statement("select empno, ename from emp").build()?;
//! let mut rows = stmt.query(&[])?;
//! while rows.next()? {
//!     let empno: i32 = rows.get(0)?;
//!     let ename: String = rows.get("ENAME")?;
//!     println!("{} {}", empno, ename);
//! }
//! # Ok::<(), Error>(())
//! ```
//!
//! ## Bind and execute
//!
//! ```no_run
//! # use ocilib::*;
//! # let conn = Connection::connect("scott", "tiger", "")?;
//! let mut stmt = conn
//!     .statement("insert into emp (empno, ename) values (:empno, :ename)")
//!     .build()?;
//! stmt.execute_named(&[("empno", &7900), ("ename", &"JONES")])?;
//! conn.commit()?;
//! # Ok::<(), Error>(())
//! ```

mod batch;
mod binding;
mod connection;
mod context;
mod dirpath;
mod error;
mod handle;
mod pool;
mod resultset;
mod sql_value;
mod statement;
mod subscr;
mod transaction;
mod type_info;
mod util;
mod version;

pub mod aq;
pub mod sql_type;

#[doc(hidden)]
pub mod test_util;

pub use crate::connection::Connection;
pub use crate::connection::Connector;
pub use crate::connection::FailoverEvent;
pub use crate::connection::FailoverResult;
pub use crate::connection::FailoverType;
pub use crate::connection::Privilege;
pub use crate::context::client_version;
pub use crate::context::cleanup;
pub use crate::context::format;
pub use crate::context::last_warning;
pub use crate::context::set_format;
pub use crate::context::set_ha_handler;
pub use crate::context::FormatType;
pub use crate::context::HaEventSource;
pub use crate::context::HaEventStatus;
pub use crate::context::InitParams;
pub use crate::batch::Batch;
pub use crate::batch::BatchBuilder;
pub use crate::dirpath::DirPath;
pub use crate::dirpath::DirPathResult;
pub use crate::error::DbError;
pub use crate::error::Error;
pub use crate::error::ErrorKind;
pub use crate::error::ParseOracleTypeError;
pub use crate::error::Result;
pub use crate::pool::GetMode;
pub use crate::pool::Pool;
pub use crate::pool::PoolBuilder;
pub use crate::pool::PooledConnection;
pub use crate::resultset::ColumnIndex;
pub use crate::resultset::FetchPosition;
pub use crate::resultset::ResultSet;
pub use crate::sql_value::SqlValue;
pub use crate::statement::BindIndex;
pub use crate::statement::LongMode;
pub use crate::statement::Statement;
pub use crate::statement::StatementBuilder;
pub use crate::statement::StatementType;
pub use crate::subscr::Event;
pub use crate::subscr::EventType;
pub use crate::subscr::Operations;
pub use crate::subscr::Subscription;
pub use crate::subscr::SubscriptionBuilder;
pub use crate::transaction::Transaction;
pub use crate::transaction::TransactionCoupling;
pub use crate::transaction::TransactionIsolation;
pub use crate::transaction::Xid;
pub use crate::type_info::CollectionKind;
pub use crate::type_info::ColumnInfo;
pub use crate::type_info::TypeInfo;
pub use crate::type_info::TypeInfoKind;
pub use crate::version::Version;
