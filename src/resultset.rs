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

//! Query resultsets and output column buffers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::error::{chkerr, oci_call};
use crate::sql_type::oracle_type::map_oracle_type;
use crate::sql_type::{FromSql, NativeType};
use crate::sql_value::SqlValue;
use crate::statement::LongMode;
use crate::type_info::{read_param_desc, ColumnInfo};
use crate::{Error, Result};

/// Non-forward fetch directions of a scrollable resultset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPosition {
    First,
    Last,
    Prior,
    Next,
    /// One-based absolute row position
    Absolute(u32),
    /// Offset relative to the current row
    Relative(i32),
}

enum RsKind {
    Query,
    Returning,
}

struct PendingPiece {
    col: usize,
    row: usize,
    offset: usize,
    alen: Box<ub4>,
}

/// Resultset of a query, of a REF CURSOR or of a RETURNING-INTO clause
pub struct ResultSet<'a> {
    conn: Arc<ConnInner>,
    stmt_handle: *mut OCIStmt,
    columns: Vec<ColumnInfo>,
    values: Vec<SqlValue>,
    defines: Vec<*mut OCIDefine>,
    name_map: RefCell<Option<HashMap<String, usize>>>,
    fetch_array_size: u32,
    scrollable: bool,
    long_size: u32,
    kind: RsKind,
    // fetch window state
    batch_rows: u32,
    batch_pos: u32,
    row_count: u64,
    row_abs: u64,
    total_returning_rows: u32,
    eof: bool,
    pending: Option<PendingPiece>,
    _phantom: PhantomData<&'a ()>,
}

impl<'a> ResultSet<'a> {
    /// Describes the select list of an executed statement handle and defines
    /// one output buffer per column.
    pub(crate) fn from_stmt_handle(
        conn: Arc<ConnInner>,
        stmt_handle: *mut OCIStmt,
        fetch_array_size: u32,
        scrollable: bool,
        long_mode: LongMode,
        long_size: u32,
    ) -> Result<ResultSet<'a>> {
        let ctxt = conn.ctxt();
        let errhp = conn.errhp();
        let num_cols = ctxt.attr_get_ub4(
            stmt_handle as *const c_void,
            OCI_HTYPE_STMT,
            OCI_ATTR_PARAM_COUNT,
            errhp,
        )?;
        let mut rs = ResultSet {
            conn: conn.clone(),
            stmt_handle,
            columns: Vec::with_capacity(num_cols as usize),
            values: Vec::with_capacity(num_cols as usize),
            defines: Vec::with_capacity(num_cols as usize),
            name_map: RefCell::new(None),
            fetch_array_size,
            scrollable,
            long_size,
            kind: RsKind::Query,
            batch_rows: 0,
            batch_pos: 0,
            row_count: 0,
            row_abs: 0,
            total_returning_rows: 0,
            eof: false,
            pending: None,
            _phantom: PhantomData,
        };
        for i in 1..=num_cols {
            let mut parm: *mut c_void = ptr::null_mut();
            chkerr!(
                ctxt,
                errhp,
                OCIParamGet(
                    stmt_handle as *const c_void,
                    OCI_HTYPE_STMT,
                    errhp,
                    &mut parm,
                    i
                )
            );
            let (desc, name) = read_param_desc(&conn, parm, true)?;
            let nullable =
                ctxt.attr_get_ub1(parm, OCI_DTYPE_PARAM, OCI_ATTR_IS_NULL, errhp)? != 0;
            let oratype = map_oracle_type(
                &desc,
                long_mode == LongMode::Implicit,
                long_size,
                false,
            )?;
            rs.columns.push(ColumnInfo {
                name,
                oracle_type: oratype.clone(),
                nullable,
            });
            let mut value = SqlValue::new(conn.clone(), &oratype, fetch_array_size as usize)?;
            let dynamic = matches!(value.native(), NativeType::Long | NativeType::LongRaw);
            let mode = if dynamic { OCI_DYNAMIC_FETCH } else { OCI_DEFAULT };
            let mut defnp: *mut OCIDefine = ptr::null_mut();
            let sqlt = value.sqlt();
            let elem_size = value.elem_size();
            let buf_ptr = value.buf_ptr();
            let ind_ptr = value.ind_ptr();
            let len_ptr = value.len_ptr();
            chkerr!(
                ctxt,
                errhp,
                OCIDefineByPos(
                    stmt_handle,
                    &mut defnp,
                    errhp,
                    i,
                    buf_ptr,
                    elem_size,
                    sqlt,
                    ind_ptr,
                    if dynamic { ptr::null_mut() } else { len_ptr },
                    ptr::null_mut(),
                    mode
                )
            );
            value.define_object(defnp)?;
            rs.values.push(value);
            rs.defines.push(defnp);
        }
        Ok(rs)
    }

    /// Builds a pre-populated resultset from RETURNING-INTO buffers; no
    /// further server round-trip happens while walking it.
    pub(crate) fn from_returning(
        conn: Arc<ConnInner>,
        names: Vec<String>,
        values: Vec<SqlValue>,
        nrows: u32,
    ) -> Result<ResultSet<'a>> {
        let columns = names
            .into_iter()
            .zip(values.iter())
            .map(|(name, value)| ColumnInfo {
                name,
                oracle_type: value.oracle_type().clone(),
                nullable: true,
            })
            .collect();
        Ok(ResultSet {
            conn,
            stmt_handle: ptr::null_mut(),
            columns,
            values,
            defines: Vec::new(),
            name_map: RefCell::new(None),
            fetch_array_size: 1,
            scrollable: false,
            long_size: 0,
            kind: RsKind::Returning,
            batch_rows: 0,
            batch_pos: 0,
            row_count: 0,
            row_abs: 0,
            total_returning_rows: nrows,
            eof: false,
            pending: None,
            _phantom: PhantomData,
        })
    }

    /// Column metadata of the select list.
    pub fn column_info(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Advances to the next row. Returns `false` at the end of data; further
    /// calls keep returning `false` without moving the position.
    pub fn next(&mut self) -> Result<bool> {
        match self.kind {
            RsKind::Returning => {
                if self.row_abs >= self.total_returning_rows as u64 {
                    self.eof = true;
                    return Ok(false);
                }
                self.row_abs += 1;
                self.row_count = self.row_count.max(self.row_abs);
                let row = (self.row_abs - 1) as usize;
                for value in &self.values {
                    value.set_buffer_row(row);
                }
                Ok(true)
            }
            RsKind::Query => {
                if self.batch_pos < self.batch_rows {
                    self.serve_row();
                    return Ok(true);
                }
                if self.eof {
                    return Ok(false);
                }
                self.fetch_window(OCI_FETCH_NEXT, 0, self.fetch_array_size)?;
                if self.batch_rows == 0 {
                    self.eof = true;
                    return Ok(false);
                }
                self.serve_row();
                Ok(true)
            }
        }
    }

    fn serve_row(&mut self) {
        let row = self.batch_pos as usize;
        for value in &self.values {
            value.set_buffer_row(row);
        }
        self.batch_pos += 1;
        self.row_abs += 1;
        self.row_count = self.row_count.max(self.row_abs);
    }

    /// Moves a scrollable resultset. Returns `false` when the target position
    /// is outside the result, leaving the current row unchanged.
    pub fn seek(&mut self, pos: FetchPosition) -> Result<bool> {
        if matches!(self.kind, RsKind::Returning) || !self.scrollable {
            return Err(Error::new(
                crate::ErrorKind::NotScrollable,
                "the resultset was not created in scrollable mode",
            ));
        }
        let (orientation, offset) = match pos {
            FetchPosition::First => (OCI_FETCH_FIRST, 0),
            FetchPosition::Last => (OCI_FETCH_LAST, 0),
            FetchPosition::Prior => (OCI_FETCH_PRIOR, 0),
            FetchPosition::Next => (OCI_FETCH_NEXT, 0),
            FetchPosition::Absolute(n) => (OCI_FETCH_ABSOLUTE, n as sb4),
            FetchPosition::Relative(n) => (OCI_FETCH_RELATIVE, n),
        };
        let saved_abs = self.row_abs;
        self.fetch_window(orientation, offset, 1)?;
        if self.batch_rows == 0 {
            self.row_abs = saved_abs;
            if matches!(pos, FetchPosition::Next) {
                self.eof = true;
            }
            return Ok(false);
        }
        self.eof = false;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let current = ctxt.attr_get_ub4(
            self.stmt_handle as *const c_void,
            OCI_HTYPE_STMT,
            OCI_ATTR_CURRENT_POSITION,
            errhp,
        )?;
        self.row_abs = current as u64;
        self.row_count = self.row_count.max(self.row_abs);
        for value in &self.values {
            value.set_buffer_row(0);
        }
        self.batch_pos = 1;
        Ok(true)
    }

    fn fetch_window(&mut self, orientation: ub2, offset: sb4, nrows: u32) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        for value in &mut self.values {
            if let Some(lb) = value.long_buffer_mut() {
                lb.reset();
            }
        }
        self.pending = None;
        let mut hit_eof = false;
        loop {
            let status = oci_call!(
                ctxt,
                OCIStmtFetch2(self.stmt_handle, errhp, nrows, orientation, offset, OCI_DEFAULT)
            );
            match status {
                OCI_NEED_DATA => self.provide_piece()?,
                OCI_NO_DATA => {
                    hit_eof = true;
                    break;
                }
                _ => {
                    ctxt.check(errhp, status, "OCIStmtFetch2")?;
                    break;
                }
            }
        }
        self.complete_pending();
        self.batch_rows = ctxt.attr_get_ub4(
            self.stmt_handle as *const c_void,
            OCI_HTYPE_STMT,
            OCI_ATTR_ROWS_FETCHED,
            errhp,
        )?;
        self.batch_pos = 0;
        if hit_eof {
            self.eof = true;
        }
        Ok(())
    }

    /// Answers one `OCI_NEED_DATA` turn of the piecewise fetch protocol by
    /// growing the target LONG buffer one chunk.
    fn provide_piece(&mut self) -> Result<()> {
        self.complete_pending();
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut hndl: *mut c_void = ptr::null_mut();
        let mut htype: ub4 = 0;
        let mut in_out: ub1 = 0;
        let mut iter: ub4 = 0;
        let mut idx: ub4 = 0;
        let mut piece: ub1 = 0;
        chkerr!(
            ctxt,
            errhp,
            OCIStmtGetPieceInfo(
                self.stmt_handle,
                errhp,
                &mut hndl,
                &mut htype,
                &mut in_out,
                &mut iter,
                &mut idx,
                &mut piece
            )
        );
        let col = self
            .defines
            .iter()
            .position(|&d| d as *mut c_void == hndl)
            .ok_or_else(|| Error::internal("piece info for an unknown define handle"))?;
        let row = iter as usize;
        let chunk = self.long_size as usize;
        let value = &mut self.values[col];
        let lb = value
            .long_buffer_mut()
            .ok_or_else(|| Error::internal("piece info for a non-LONG column"))?;
        let offset = lb.sizes[row];
        lb.rows[row].resize(offset + chunk, 0);
        let mut alen = Box::new(chunk as ub4);
        let chunk_ptr = unsafe { lb.rows[row].as_mut_ptr().add(offset) };
        chkerr!(
            ctxt,
            errhp,
            OCIStmtSetPieceInfo(
                hndl,
                htype,
                errhp,
                chunk_ptr as *const c_void,
                alen.as_mut(),
                piece,
                ptr::null(),
                ptr::null_mut()
            )
        );
        self.pending = Some(PendingPiece {
            col,
            row,
            offset,
            alen,
        });
        Ok(())
    }

    /// Account the bytes the client wrote for the piece set up last turn.
    fn complete_pending(&mut self) {
        if let Some(p) = self.pending.take() {
            if let Some(lb) = self.values[p.col].long_buffer_mut() {
                let written = *p.alen as usize;
                lb.sizes[p.row] = p.offset + written;
                lb.rows[p.row].truncate(p.offset + written);
            }
        }
    }

    /// Gets a column value by zero-based index or by name.
    ///
    /// A NULL value surfaces as [`crate::ErrorKind::NullValue`] unless `T` is
    /// an `Option`.
    pub fn get<I, T>(&self, colidx: I) -> Result<T>
    where
        I: ColumnIndex,
        T: FromSql,
    {
        let idx = colidx.idx(self)?;
        T::from_sql(&self.values[idx])
    }

    /// True when the column value of the current row is NULL.
    pub fn is_null<I>(&self, colidx: I) -> Result<bool>
    where
        I: ColumnIndex,
    {
        let idx = colidx.idx(self)?;
        self.values[idx].is_null()
    }

    /// Number of rows fetched so far; monotonically non-decreasing within a
    /// forward fetch.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// One-based absolute position of the current row; zero before the first
    /// fetch.
    pub fn current_row(&self) -> u64 {
        self.row_abs
    }

    pub fn eof(&self) -> bool {
        self.eof
    }

    fn resolve_name(&self, name: &str) -> Result<usize> {
        let mut map = self.name_map.borrow_mut();
        let map = map.get_or_insert_with(|| {
            self.columns
                .iter()
                .enumerate()
                .map(|(i, c)| (c.name().to_uppercase(), i))
                .collect()
        });
        map.get(&name.to_uppercase())
            .copied()
            .ok_or_else(|| Error::invalid_column_name(name))
    }
}

impl fmt::Debug for ResultSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ResultSet {{ columns: {:?}, row: {} }}",
            self.columns.iter().map(|c| c.name()).collect::<Vec<_>>(),
            self.row_abs
        )
    }
}

/// A value usable to locate a column: a zero-based index or a
/// case-insensitive column name.
pub trait ColumnIndex {
    fn idx(&self, rs: &ResultSet) -> Result<usize>;
}

impl ColumnIndex for usize {
    fn idx(&self, rs: &ResultSet) -> Result<usize> {
        if *self < rs.columns.len() {
            Ok(*self)
        } else {
            Err(Error::invalid_column_index(*self))
        }
    }
}

impl ColumnIndex for &str {
    fn idx(&self, rs: &ResultSet) -> Result<usize> {
        rs.resolve_name(self)
    }
}
