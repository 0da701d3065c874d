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

//! Array DML execution.

use std::ptr;

use crate::binding::*;
use crate::error::chkerr;
use crate::sql_type::ToSql;
use crate::sql_value::SqlValue;
use crate::statement::Statement;
use crate::{Connection, Error, Result};

/// Builder of [`Batch`]
pub struct BatchBuilder<'conn> {
    conn: &'conn Connection,
    sql: String,
    batch_size: u32,
}

impl<'conn> BatchBuilder<'conn> {
    pub(crate) fn new(conn: &'conn Connection, sql: &str, batch_size: u32) -> BatchBuilder<'conn> {
        BatchBuilder {
            conn,
            sql: sql.into(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn build(&self) -> Result<Batch<'conn>> {
        let stmt = self.conn.statement(&self.sql).build()?;
        if stmt.is_query() {
            return Err(Error::invalid_state("a query cannot run as a batch"));
        }
        Ok(Batch {
            stmt,
            batch_size: self.batch_size,
            binds: Vec::new(),
            row: 0,
            affected_rows: 0,
        })
    }
}

struct BatchBind {
    value: SqlValue,
}

/// A DML statement executed over arrays of bind values
///
/// Rows appended through [`Batch::append_row`] accumulate in array binds;
/// one server round-trip per [`Batch::execute`] (or automatically when the
/// arrays run full) drives the whole array as DML iterations.
///
/// # Examples
///
/// ```no_run
/// # use ocilib::*;
/// # let conn = Connection::connect("scott", "tiger", "")?;
/// let mut batch = conn.batch("insert into t (id) values (:id)", 100).build()?;
/// for id in [10, 20, 30] {
///     batch.append_row(&[&id])?;
/// }
/// batch.execute()?;
/// assert_eq!(batch.affected_rows(), 3);
/// # Ok::<(), Error>(())
/// ```
pub struct Batch<'conn> {
    stmt: Statement<'conn>,
    batch_size: u32,
    binds: Vec<BatchBind>,
    row: u32,
    affected_rows: u64,
}

impl Batch<'_> {
    /// Appends one row of bind values. When the arrays reach the batch size
    /// the accumulated rows execute automatically.
    pub fn append_row(&mut self, params: &[&dyn ToSql]) -> Result<()> {
        if self.row >= self.batch_size {
            self.execute()?;
        }
        if !self.binds.is_empty() && params.len() != self.binds.len() {
            return Err(Error::new(
                crate::ErrorKind::BindArraySize,
                format!(
                    "row width {} does not match the first row's width {}",
                    params.len(),
                    self.binds.len()
                ),
            ));
        }
        for (i, param) in params.iter().enumerate() {
            if self.binds.len() <= i {
                self.create_bind(i, *param)?;
            }
            let value = &mut self.binds[i].value;
            value.set_buffer_row(self.row as usize);
            param.to_sql(value)?;
        }
        self.row += 1;
        Ok(())
    }

    fn create_bind(&mut self, index: usize, param: &dyn ToSql) -> Result<()> {
        let oratype = param.oratype()?;
        let conn = self.stmt.conn_inner().clone();
        let ctxt = conn.ctxt();
        let errhp = conn.errhp();
        let mut value = SqlValue::new(conn, &oratype, self.batch_size as usize)?;
        let sqlt = value.sqlt();
        let elem_size = value.elem_size();
        let buf_ptr = value.buf_ptr();
        let ind_ptr = value.ind_ptr();
        let len_ptr = value.len_ptr();
        let mut bindp: *mut OCIBind = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIBindByPos(
                self.stmt.stmt_handle(),
                &mut bindp,
                errhp,
                (index + 1) as ub4,
                buf_ptr,
                elem_size,
                sqlt,
                ind_ptr,
                len_ptr,
                ptr::null_mut(),
                0,
                ptr::null_mut(),
                OCI_DEFAULT
            )
        );
        value.bind_object(bindp)?;
        self.binds.push(BatchBind { value });
        Ok(())
    }

    /// Executes the accumulated rows; a no-op when nothing is pending.
    pub fn execute(&mut self) -> Result<()> {
        if self.row == 0 {
            return Ok(());
        }
        let iters = self.row;
        self.row = 0;
        self.stmt.execute_internal(iters)?;
        self.affected_rows += self.stmt.row_count()?;
        Ok(())
    }

    /// Total rows affected by every execution of this batch so far.
    pub fn affected_rows(&self) -> u64 {
        self.affected_rows
    }
}

impl Connection {
    /// Creates a batch builder for array DML.
    pub fn batch<'conn>(&'conn self, sql: &str, batch_size: u32) -> BatchBuilder<'conn> {
        BatchBuilder::new(self, sql, batch_size)
    }
}
