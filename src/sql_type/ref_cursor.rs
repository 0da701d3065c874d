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

use std::fmt;
use std::sync::Arc;

use crate::binding::OCIStmt;
use crate::connection::ConnInner;
use crate::resultset::ResultSet;
use crate::sql_type::FromSql;
use crate::sql_value::SqlValue;
use crate::statement::LongMode;
use crate::Result;

/// Cursor fetched from a nested-cursor column or a PL/SQL REF CURSOR out
/// bind.
///
/// The cursor shares the statement handle of the resultset it was fetched
/// from; read it before advancing that resultset.
pub struct RefCursor {
    conn: Arc<ConnInner>,
    handle: *mut OCIStmt,
    fetch_array_size: u32,
}

impl RefCursor {
    /// Describes the cursor's select list and returns its resultset.
    pub fn resultset(&mut self) -> Result<ResultSet<'_>> {
        ResultSet::from_stmt_handle(
            self.conn.clone(),
            self.handle,
            self.fetch_array_size,
            false,
            LongMode::Explicit,
            65536,
        )
    }
}

impl FromSql for RefCursor {
    fn from_sql(val: &SqlValue) -> Result<RefCursor> {
        Ok(RefCursor {
            conn: val.conn().clone(),
            handle: val.cursor_handle()?,
            fetch_array_size: 100,
        })
    }
}

impl fmt::Debug for RefCursor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RefCursor {{ .. }}")
    }
}
