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

//! Direct-path bulk loading.
//!
//! A streaming state machine: rows entered into a column array convert into
//! a stream which loads into the table, bypassing SQL. The stream may fill
//! up before every entered row converts; loading then draining the remainder
//! through another convert round completes the batch.

use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::error::{chkerr, oci_call};
use crate::handle::Handle;
use crate::{Connection, Error, Result};

/// Outcome of a convert or load round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirPathResult {
    /// All pending data was processed
    Complete,
    /// A row failed; see [`DirPath::error_column`] and
    /// [`DirPath::processed_rows`]
    Error,
    /// The stream filled before all rows converted; load, then convert the
    /// remainder
    Full,
    /// More data is needed to complete a partial column entry
    Partial,
    /// The stream held no data to load
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirPathState {
    Allocated,
    Prepared,
    Converted,
    Finished,
}

/// One column description of the load target.
#[derive(Debug, Clone)]
struct ColumnDef {
    name: String,
    max_size: u32,
    format: Option<String>,
    precision: i16,
    scale: i8,
    binary: bool,
}

/// Direct-path loader over one table
///
/// # Examples
///
/// ```no_run
/// # use ocilib::*;
/// # let conn = Connection::connect("scott", "tiger", "")?;
/// let mut dp = DirPath::new(&conn, "T", 1, 4)?;
/// dp.describe_column(0, "VAL", 10, None, 0, 0, false)?;
/// dp.prepare()?;
/// for (row, value) in ["a", "b", "c"].iter().enumerate() {
///     dp.set_entry(row as u32, 0, Some(value.as_bytes()), true)?;
/// }
/// loop {
///     match dp.convert()? {
///         DirPathResult::Full => {
///             dp.load()?;
///         }
///         _ => break,
///     }
/// }
/// dp.load()?;
/// dp.finish()?;
/// assert_eq!(dp.loaded_rows(), 3);
/// # Ok::<(), Error>(())
/// ```
pub struct DirPath<'conn> {
    conn: Arc<ConnInner>,
    ctx: Handle<OCIDirPathCtx>,
    col_array: Option<Handle<OCIDirPathColArray>>,
    stream: Option<Handle<OCIDirPathStream>>,
    state: DirPathState,
    columns: Vec<ColumnDef>,
    nb_cols: u16,
    nb_rows_requested: u32,
    nb_rows: u32,
    nb_entries: u32,
    conv_offset: u32,
    nb_processed: u32,
    nb_loaded: u64,
    err_col: u16,
    // entry buffers must outlive the convert that consumes them
    arena: Vec<Box<[u8]>>,
    _phantom: PhantomData<&'conn Connection>,
}

impl<'conn> DirPath<'conn> {
    /// Creates a loader for `table` with `nb_cols` columns and a column
    /// array of `nb_rows` rows. The server may grant a different array size,
    /// visible through [`DirPath::row_count`] after prepare.
    pub fn new(
        conn: &'conn Connection,
        table: &str,
        nb_cols: u16,
        nb_rows: u32,
    ) -> Result<DirPath<'conn>> {
        if nb_cols == 0 || nb_rows == 0 {
            return Err(Error::invalid_argument(
                "the loader needs at least one column and one row",
            ));
        }
        let inner = conn.conn().clone();
        let ctxt = inner.ctxt();
        ctxt.require(ctxt.features().direct_path, "direct-path loading")?;
        inner.check_logged()?;
        let ctx = Handle::<OCIDirPathCtx>::new(ctxt)?;
        let errhp = inner.errhp();
        ctxt.attr_set_text(
            ctx.raw() as *mut c_void,
            OCI_HTYPE_DIRPATH_CTX,
            OCI_ATTR_NAME,
            table,
            errhp,
        )?;
        ctxt.attr_set_ub4(
            ctx.raw() as *mut c_void,
            OCI_HTYPE_DIRPATH_CTX,
            OCI_ATTR_NUM_COLS,
            nb_cols as ub4,
            errhp,
        )?;
        ctxt.attr_set_ub4(
            ctx.raw() as *mut c_void,
            OCI_HTYPE_DIRPATH_CTX,
            OCI_ATTR_NUM_ROWS,
            nb_rows,
            errhp,
        )?;
        Ok(DirPath {
            conn: inner,
            ctx,
            col_array: None,
            stream: None,
            state: DirPathState::Allocated,
            columns: vec![
                ColumnDef {
                    name: String::new(),
                    max_size: 0,
                    format: None,
                    precision: 0,
                    scale: 0,
                    binary: false,
                };
                nb_cols as usize
            ],
            nb_cols,
            nb_rows_requested: nb_rows,
            nb_rows: nb_rows,
            nb_entries: 0,
            conv_offset: 0,
            nb_processed: 0,
            nb_loaded: 0,
            err_col: 0,
            arena: Vec::new(),
            _phantom: PhantomData,
        })
    }

    fn check_state(&self, expected: DirPathState, op: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::dirpath_state(format!(
                "{} requires the {:?} state but the loader is {:?}",
                op, expected, self.state
            )))
        }
    }

    /// Schema owning the table; defaults to the connected user.
    pub fn set_schema(&mut self, schema: &str) -> Result<()> {
        self.check_state(DirPathState::Allocated, "set_schema")?;
        self.conn.ctxt().attr_set_text(
            self.ctx.raw() as *mut c_void,
            OCI_HTYPE_DIRPATH_CTX,
            OCI_ATTR_SCHEMA_NAME,
            schema,
            self.conn.errhp(),
        )
    }

    /// Loads into one partition instead of the whole table.
    pub fn set_partition(&mut self, partition: &str) -> Result<()> {
        self.check_state(DirPathState::Allocated, "set_partition")?;
        self.conn.ctxt().attr_set_text(
            self.ctx.raw() as *mut c_void,
            OCI_HTYPE_DIRPATH_CTX,
            OCI_ATTR_SUB_NAME,
            partition,
            self.conn.errhp(),
        )
    }

    fn set_ub1_attr(&self, attr: ub4, value: ub1) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut value = value;
        chkerr!(
            ctxt,
            errhp,
            OCIAttrSet(
                self.ctx.raw() as *mut c_void,
                OCI_HTYPE_DIRPATH_CTX,
                &mut value as *mut ub1 as *mut c_void,
                0,
                attr,
                errhp
            )
        );
        Ok(())
    }

    /// Requests a parallel load.
    pub fn set_parallel(&mut self, flag: bool) -> Result<()> {
        self.check_state(DirPathState::Allocated, "set_parallel")?;
        self.set_ub1_attr(OCI_ATTR_DIRPATH_PARALLEL, flag as ub1)
    }

    /// Skips redo generation during the load.
    pub fn set_no_log(&mut self, flag: bool) -> Result<()> {
        self.check_state(DirPathState::Allocated, "set_no_log")?;
        self.set_ub1_attr(OCI_ATTR_DIRPATH_NOLOG, flag as ub1)
    }

    /// Server-side stream buffer size in bytes.
    pub fn set_buffer_size(&mut self, size: u32) -> Result<()> {
        self.check_state(DirPathState::Allocated, "set_buffer_size")?;
        self.conn.ctxt().attr_set_ub4(
            self.ctx.raw() as *mut c_void,
            OCI_HTYPE_DIRPATH_CTX,
            OCI_ATTR_BUF_SIZE,
            size,
            self.conn.errhp(),
        )
    }

    /// Size of the server date cache; zero disables it.
    pub fn set_date_cache_size(&mut self, size: u32) -> Result<()> {
        self.check_state(DirPathState::Allocated, "set_date_cache_size")?;
        if size == 0 {
            self.set_ub1_attr(OCI_ATTR_DIRPATH_DCACHE_DISABLE, 1)
        } else {
            self.conn.ctxt().attr_set_ub4(
                self.ctx.raw() as *mut c_void,
                OCI_HTYPE_DIRPATH_CTX,
                OCI_ATTR_DIRPATH_DCACHE_SIZE,
                size,
                self.conn.errhp(),
            )
        }
    }

    /// Describes one target column before prepare.
    ///
    /// Character data loads through a text representation; `format` supplies
    /// the conversion mask for dates and numbers. `binary` marks RAW
    /// columns whose entries are not character data.
    pub fn describe_column(
        &mut self,
        index: u16,
        name: &str,
        max_size: u32,
        format: Option<&str>,
        precision: i16,
        scale: i8,
        binary: bool,
    ) -> Result<()> {
        self.check_state(DirPathState::Allocated, "describe_column")?;
        if index >= self.nb_cols {
            return Err(Error::out_of_range(format!(
                "column index {} out of the declared {} columns",
                index, self.nb_cols
            )));
        }
        self.columns[index as usize] = ColumnDef {
            name: name.to_string(),
            max_size,
            format: format.map(|f| f.to_string()),
            precision,
            scale,
            binary,
        };
        Ok(())
    }

    fn apply_columns(&self) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let list = ctxt.attr_get_ptr(
            self.ctx.raw() as *const c_void,
            OCI_HTYPE_DIRPATH_CTX,
            OCI_ATTR_LIST_COLUMNS,
            errhp,
        )?;
        for (i, col) in self.columns.iter().enumerate() {
            if col.name.is_empty() {
                return Err(Error::invalid_argument(format!(
                    "column {} was not described",
                    i
                )));
            }
            let mut parm: *mut c_void = ptr::null_mut();
            chkerr!(
                ctxt,
                errhp,
                OCIParamGet(
                    list as *const c_void,
                    OCI_DTYPE_PARAM,
                    errhp,
                    &mut parm,
                    (i + 1) as ub4
                )
            );
            ctxt.attr_set_text(parm, OCI_DTYPE_PARAM, OCI_ATTR_NAME, &col.name, errhp)?;
            let sqlt: ub2 = if col.binary { SQLT_BIN } else { SQLT_CHR };
            let mut dty = sqlt;
            chkerr!(
                ctxt,
                errhp,
                OCIAttrSet(
                    parm,
                    OCI_DTYPE_PARAM,
                    &mut dty as *mut ub2 as *mut c_void,
                    0,
                    OCI_ATTR_DATA_TYPE,
                    errhp
                )
            );
            ctxt.attr_set_ub4(parm, OCI_DTYPE_PARAM, OCI_ATTR_DATA_SIZE, col.max_size, errhp)?;
            if let Some(fmt) = &col.format {
                ctxt.attr_set_text(parm, OCI_DTYPE_PARAM, OCI_ATTR_DATEFORMAT, fmt, errhp)?;
            }
            if col.precision != 0 {
                let mut prec = col.precision as ub2;
                chkerr!(
                    ctxt,
                    errhp,
                    OCIAttrSet(
                        parm,
                        OCI_DTYPE_PARAM,
                        &mut prec as *mut ub2 as *mut c_void,
                        0,
                        OCI_ATTR_PRECISION,
                        errhp
                    )
                );
            }
            if col.scale != 0 {
                let mut scale = col.scale as sb1;
                chkerr!(
                    ctxt,
                    errhp,
                    OCIAttrSet(
                        parm,
                        OCI_DTYPE_PARAM,
                        &mut scale as *mut sb1 as *mut c_void,
                        0,
                        OCI_ATTR_SCALE,
                        errhp
                    )
                );
            }
        }
        Ok(())
    }

    /// Finishes the setup: sends the table and column description to the
    /// server and allocates the column array and the stream. The server may
    /// grant a smaller column array than requested.
    pub fn prepare(&mut self) -> Result<()> {
        self.check_state(DirPathState::Allocated, "prepare")?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        self.apply_columns()?;
        chkerr!(
            ctxt,
            errhp,
            OCIDirPathPrepare(self.ctx.raw(), self.conn.svchp(), errhp)
        );
        let col_array = Handle::<OCIDirPathColArray>::with_parent(
            ctxt,
            self.ctx.raw() as *const c_void,
        )?;
        let stream =
            Handle::<OCIDirPathStream>::with_parent(ctxt, self.ctx.raw() as *const c_void)?;
        // the array the server actually allocated
        self.nb_rows = ctxt.attr_get_ub4(
            col_array.raw() as *const c_void,
            OCI_HTYPE_DIRPATH_COLUMN_ARRAY,
            OCI_ATTR_NUM_ROWS,
            errhp,
        )?;
        self.col_array = Some(col_array);
        self.stream = Some(stream);
        self.state = DirPathState::Prepared;
        log::debug!(
            "direct path prepared: {} columns, {} rows granted of {} requested",
            self.nb_cols,
            self.nb_rows,
            self.nb_rows_requested
        );
        Ok(())
    }

    /// Sets one cell of the column array.
    ///
    /// `None` or empty data marks the cell NULL. `complete = false` feeds
    /// one piece of a larger value; the final piece passes `true`.
    pub fn set_entry(
        &mut self,
        row: u32,
        column: u16,
        value: Option<&[u8]>,
        complete: bool,
    ) -> Result<()> {
        self.check_state(DirPathState::Prepared, "set_entry")?;
        if row >= self.nb_rows {
            return Err(Error::out_of_range(format!(
                "row {} outside the column array of {} rows",
                row, self.nb_rows
            )));
        }
        if column >= self.nb_cols {
            return Err(Error::out_of_range(format!(
                "column index {} out of the declared {} columns",
                column, self.nb_cols
            )));
        }
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let (ptr_, size, flag) = match value {
            None => (ptr::null_mut(), 0, OCI_DIRPATH_COL_NULL),
            Some(data) if data.is_empty() => (ptr::null_mut(), 0, OCI_DIRPATH_COL_NULL),
            Some(data) => {
                let boxed: Box<[u8]> = data.into();
                let ptr_ = boxed.as_ptr() as *mut ub1;
                self.arena.push(boxed);
                let flag = if complete {
                    OCI_DIRPATH_COL_COMPLETE
                } else {
                    OCI_DIRPATH_COL_PARTIAL
                };
                (ptr_, data.len() as ub4, flag)
            }
        };
        let col_array = self.col_array.as_ref().expect("prepared state");
        chkerr!(
            ctxt,
            errhp,
            OCIDirPathColArrayEntrySet(col_array.raw(), errhp, row, column, ptr_, size, flag)
        );
        if complete || flag == OCI_DIRPATH_COL_NULL {
            self.nb_entries = self.nb_entries.max(row + 1);
        }
        Ok(())
    }

    /// Sets every cell of one row.
    pub fn set_row(&mut self, row: u32, values: &[Option<&[u8]>]) -> Result<()> {
        if values.len() != self.nb_cols as usize {
            return Err(Error::invalid_argument(format!(
                "{} values for {} columns",
                values.len(),
                self.nb_cols
            )));
        }
        for (col, value) in values.iter().enumerate() {
            self.set_entry(row, col as u16, *value, true)?;
        }
        Ok(())
    }

    /// Converts entered rows to stream format.
    pub fn convert(&mut self) -> Result<DirPathResult> {
        self.check_state(DirPathState::Prepared, "convert")?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let col_array = self.col_array.as_ref().expect("prepared state");
        let stream = self.stream.as_ref().expect("prepared state");
        let rows_pending = self.nb_entries - self.conv_offset;
        let status = oci_call!(
            ctxt,
            OCIDirPathColArrayToStream(
                col_array.raw(),
                self.ctx.raw(),
                stream.raw(),
                errhp,
                self.nb_entries,
                self.conv_offset
            )
        );
        match status {
            OCI_SUCCESS => {
                self.nb_processed = rows_pending;
                self.conv_offset = 0;
                self.nb_entries = 0;
                self.state = DirPathState::Converted;
                Ok(DirPathResult::Complete)
            }
            OCI_CONTINUE => {
                // stream full; account how far the conversion got
                self.nb_processed = ctxt.attr_get_ub4(
                    col_array.raw() as *const c_void,
                    OCI_HTYPE_DIRPATH_COLUMN_ARRAY,
                    OCI_ATTR_ROW_COUNT,
                    errhp,
                )?;
                self.conv_offset += self.nb_processed;
                self.state = DirPathState::Converted;
                Ok(DirPathResult::Full)
            }
            OCI_NEED_DATA => Ok(DirPathResult::Partial),
            _ => {
                self.nb_processed = ctxt.attr_get_ub4(
                    col_array.raw() as *const c_void,
                    OCI_HTYPE_DIRPATH_COLUMN_ARRAY,
                    OCI_ATTR_ROW_COUNT,
                    errhp,
                )?;
                self.err_col = ctxt.attr_get_ub2(
                    col_array.raw() as *const c_void,
                    OCI_HTYPE_DIRPATH_COLUMN_ARRAY,
                    OCI_ATTR_COL_COUNT,
                    errhp,
                )?;
                Ok(DirPathResult::Error)
            }
        }
    }

    /// Loads the converted stream into the table.
    pub fn load(&mut self) -> Result<DirPathResult> {
        self.check_state(DirPathState::Converted, "load")?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let stream = self.stream.as_ref().expect("converted state");
        let status = oci_call!(
            ctxt,
            OCIDirPathLoadStream(self.ctx.raw(), stream.raw(), errhp)
        );
        let result = match status {
            OCI_SUCCESS => {
                let rows = ctxt.attr_get_ub4(
                    stream.raw() as *const c_void,
                    OCI_HTYPE_DIRPATH_STREAM,
                    OCI_ATTR_ROW_COUNT,
                    errhp,
                )?;
                self.nb_loaded += rows as u64;
                DirPathResult::Complete
            }
            OCI_NO_DATA => DirPathResult::Empty,
            OCI_NEED_DATA => DirPathResult::Partial,
            _ => DirPathResult::Error,
        };
        chkerr!(ctxt, errhp, OCIDirPathStreamReset(stream.raw(), errhp));
        if self.conv_offset == 0 {
            // whole batch consumed; the entry buffers can go
            let col_array = self.col_array.as_ref().expect("converted state");
            chkerr!(ctxt, errhp, OCIDirPathColArrayReset(col_array.raw(), errhp));
            self.arena.clear();
        }
        self.state = DirPathState::Prepared;
        Ok(result)
    }

    /// Commits the rows loaded so far without ending the load.
    pub fn save(&mut self) -> Result<()> {
        self.check_state(DirPathState::Prepared, "save")?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCIDirPathDataSave(self.ctx.raw(), errhp, OCI_DIRPATH_DATASAVE_SAVEONLY)
        );
        Ok(())
    }

    /// Ends the load, committing it. The loader is unusable afterwards.
    pub fn finish(&mut self) -> Result<()> {
        self.check_state(DirPathState::Prepared, "finish")?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(ctxt, errhp, OCIDirPathFinish(self.ctx.raw(), errhp));
        self.state = DirPathState::Finished;
        Ok(())
    }

    /// Rolls the load back and returns to the unprepared state.
    pub fn abort(&mut self) -> Result<()> {
        self.check_state(DirPathState::Prepared, "abort")?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(ctxt, errhp, OCIDirPathAbort(self.ctx.raw(), errhp));
        self.col_array = None;
        self.stream = None;
        self.arena.clear();
        self.nb_entries = 0;
        self.conv_offset = 0;
        self.state = DirPathState::Allocated;
        Ok(())
    }

    /// Rows of the column array granted by the server.
    pub fn row_count(&self) -> u32 {
        self.nb_rows
    }

    /// Cumulative rows loaded by every completed load round.
    pub fn loaded_rows(&self) -> u64 {
        self.nb_loaded
    }

    /// Rows processed by the last convert round.
    pub fn processed_rows(&self) -> u32 {
        self.nb_processed
    }

    /// Zero-based column of the last conversion error.
    pub fn error_column(&self) -> u16 {
        self.err_col
    }
}

impl fmt::Debug for DirPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DirPath {{ state: {:?}, cols: {}, rows: {}, loaded: {} }}",
            self.state, self.nb_cols, self.nb_rows, self.nb_loaded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_are_distinct() {
        assert_ne!(DirPathResult::Complete, DirPathResult::Full);
        assert_ne!(DirPathResult::Partial, DirPathResult::Empty);
    }
}
