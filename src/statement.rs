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
use std::marker::PhantomData;
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::error::chkerr;
use crate::handle::Handle;
use crate::resultset::ResultSet;
use crate::sql_type::{FromSql, NativeType, OracleType, ToSql};
use crate::sql_value::{date_from_wire, SqlValue};
use crate::util::OciString;
use crate::{Connection, Error, Result};

/// Statement type returned by the server after prepare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatementType {
    Select,
    Update,
    Delete,
    Insert,
    Create,
    Drop,
    Alter,
    Begin,
    Declare,
    Call,
    Merge,
    Unknown,
}

impl StatementType {
    pub(crate) fn from_code(code: ub2) -> StatementType {
        match code {
            OCI_STMT_SELECT => StatementType::Select,
            OCI_STMT_UPDATE => StatementType::Update,
            OCI_STMT_DELETE => StatementType::Delete,
            OCI_STMT_INSERT => StatementType::Insert,
            OCI_STMT_CREATE => StatementType::Create,
            OCI_STMT_DROP => StatementType::Drop,
            OCI_STMT_ALTER => StatementType::Alter,
            OCI_STMT_BEGIN => StatementType::Begin,
            OCI_STMT_DECLARE => StatementType::Declare,
            OCI_STMT_CALL => StatementType::Call,
            OCI_STMT_MERGE => StatementType::Merge,
            _ => StatementType::Unknown,
        }
    }

    pub fn is_query(&self) -> bool {
        *self == StatementType::Select
    }

    /// True for `BEGIN`, `DECLARE` and `CALL` statements.
    pub fn is_plsql(&self) -> bool {
        matches!(
            self,
            StatementType::Begin | StatementType::Declare | StatementType::Call
        )
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            StatementType::Select => "select",
            StatementType::Update => "update",
            StatementType::Delete => "delete",
            StatementType::Insert => "insert",
            StatementType::Create => "create",
            StatementType::Drop => "drop",
            StatementType::Alter => "alter",
            StatementType::Begin => "PL/SQL(begin)",
            StatementType::Declare => "PL/SQL(declare)",
            StatementType::Call => "PL/SQL(call)",
            StatementType::Merge => "merge",
            StatementType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// How LONG and LONG RAW columns are fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongMode {
    /// Columns are buffered piecewise into [`crate::sql_type::Long`] /
    /// [`crate::sql_type::LongRaw`] values.
    Explicit,
    /// Columns describe as bounded `VARCHAR2(long_size)` / `RAW(long_size)`.
    Implicit,
}

const DEFAULT_FETCH_ARRAY_SIZE: u32 = 100;
const DEFAULT_LONG_SIZE: u32 = 65536;

/// Builder of [`Statement`]
pub struct StatementBuilder<'conn> {
    conn: &'conn Connection,
    sql: String,
    fetch_array_size: u32,
    prefetch_rows: Option<u32>,
    scrollable: bool,
    exclude_from_cache: bool,
    long_mode: LongMode,
    long_size: u32,
}

impl<'conn> StatementBuilder<'conn> {
    pub(crate) fn new(conn: &'conn Connection, sql: &str) -> StatementBuilder<'conn> {
        StatementBuilder {
            conn,
            sql: sql.into(),
            fetch_array_size: DEFAULT_FETCH_ARRAY_SIZE,
            prefetch_rows: None,
            scrollable: false,
            exclude_from_cache: false,
            long_mode: LongMode::Explicit,
            long_size: DEFAULT_LONG_SIZE,
        }
    }

    /// Number of rows fetched in one server round-trip.
    pub fn fetch_array_size(&mut self, size: u32) -> &mut StatementBuilder<'conn> {
        self.fetch_array_size = size.max(1);
        self
    }

    /// Number of rows the server prefetches beyond the requested window.
    pub fn prefetch_rows(&mut self, rows: u32) -> &mut StatementBuilder<'conn> {
        self.prefetch_rows = Some(rows);
        self
    }

    /// Prepares the query for non-forward fetch directions. Requires an
    /// Oracle 9.0 client and a query without RETURNING binds.
    pub fn scrollable(&mut self) -> &mut StatementBuilder<'conn> {
        self.scrollable = true;
        self
    }

    /// Keeps this statement out of the OCI statement cache.
    pub fn exclude_from_cache(&mut self) -> &mut StatementBuilder<'conn> {
        self.exclude_from_cache = true;
        self
    }

    /// Selects the LONG column fetch strategy.
    pub fn long_mode(&mut self, mode: LongMode) -> &mut StatementBuilder<'conn> {
        self.long_mode = mode;
        self
    }

    /// Chunk size of the piecewise LONG fetch loop and bound of demoted LONG
    /// columns.
    pub fn long_size(&mut self, size: u32) -> &mut StatementBuilder<'conn> {
        self.long_size = size.max(1);
        self
    }

    pub fn build(&self) -> Result<Statement<'conn>> {
        let conn = self.conn.conn().clone();
        conn.check_logged()?;
        let ctxt = conn.ctxt();
        let errhp = conn.errhp();
        if self.scrollable {
            ctxt.require(ctxt.features().scrollable_cursors, "scrollable cursors")?;
        }
        let sql_text = OciString::new(&self.sql, ctxt.charset());
        let stmt = if ctxt.features().statement_caching && !self.exclude_from_cache {
            let mut stmtp: *mut OCIStmt = ptr::null_mut();
            chkerr!(
                ctxt,
                errhp,
                OCIStmtPrepare2(
                    conn.svchp(),
                    &mut stmtp,
                    errhp,
                    sql_text.ptr(),
                    sql_text.len(),
                    ptr::null(),
                    0,
                    OCI_NTV_SYNTAX,
                    OCI_DEFAULT
                )
            );
            RawStmt::Cached(stmtp)
        } else {
            let handle = Handle::<OCIStmt>::new(ctxt)?;
            chkerr!(
                ctxt,
                errhp,
                OCIStmtPrepare(
                    handle.raw(),
                    errhp,
                    sql_text.ptr(),
                    sql_text.len(),
                    OCI_NTV_SYNTAX,
                    OCI_DEFAULT
                )
            );
            RawStmt::Owned(handle)
        };
        let code = ctxt.attr_get_ub2(
            stmt.raw() as *const c_void,
            OCI_HTYPE_STMT,
            OCI_ATTR_STMT_TYPE,
            errhp,
        )?;
        if let Some(rows) = self.prefetch_rows {
            ctxt.attr_set_ub4(
                stmt.raw() as *mut c_void,
                OCI_HTYPE_STMT,
                OCI_ATTR_PREFETCH_ROWS,
                rows,
                errhp,
            )?;
        }
        Ok(Statement {
            conn,
            stmt,
            stmt_type: StatementType::from_code(code),
            scrollable: self.scrollable,
            fetch_array_size: self.fetch_array_size,
            long_mode: self.long_mode,
            long_size: self.long_size,
            binds: Vec::new(),
            returning: Vec::new(),
            ret_ctl: Box::new(RetCtl { next_pos: 0 }),
            executed: false,
            _phantom: PhantomData,
        })
    }
}

enum RawStmt {
    Cached(*mut OCIStmt),
    Owned(Handle<OCIStmt>),
}

impl RawStmt {
    fn raw(&self) -> *mut OCIStmt {
        match self {
            RawStmt::Cached(p) => *p,
            RawStmt::Owned(h) => h.raw(),
        }
    }
}

struct Bind {
    name: String,
    value: SqlValue,
    bindp: *mut OCIBind,
}

struct RetCtl {
    next_pos: u32,
}

struct RetIter {
    buf: Vec<u8>,
    inds: Vec<sb2>,
    lens: Vec<ub4>,
    rcodes: Vec<ub2>,
    nrows: u32,
}

/// One RETURNING-INTO placeholder registered through dynamic binding.
///
/// The struct is boxed so the pointers handed to the OCI callbacks stay put.
struct ReturningBind {
    name: String,
    oratype: OracleType,
    elem_size: usize,
    iters: Vec<RetIter>,
    dyn_pos: u32,
    in_ind: sb2,
    ctxt: &'static crate::context::Context,
    errhp: *mut OCIError,
    ctl: *mut RetCtl,
}

/// Statement
pub struct Statement<'conn> {
    conn: Arc<ConnInner>,
    stmt: RawStmt,
    stmt_type: StatementType,
    scrollable: bool,
    fetch_array_size: u32,
    long_mode: LongMode,
    long_size: u32,
    binds: Vec<Bind>,
    returning: Vec<Box<ReturningBind>>,
    ret_ctl: Box<RetCtl>,
    executed: bool,
    _phantom: PhantomData<&'conn Connection>,
}

impl<'conn> Statement<'conn> {
    pub(crate) fn stmt_handle(&self) -> *mut OCIStmt {
        self.stmt.raw()
    }

    pub(crate) fn conn_inner(&self) -> &Arc<ConnInner> {
        &self.conn
    }

    /// Type of this statement as reported by the server at prepare time.
    pub fn statement_type(&self) -> StatementType {
        self.stmt_type
    }

    pub fn is_query(&self) -> bool {
        self.stmt_type.is_query()
    }

    /// Binds a value to a placeholder, by one-based position or by name.
    ///
    /// Rebinding the same placeholder with a value of an incompatible
    /// datatype fails with [`crate::ErrorKind::RebindMismatch`].
    pub fn bind<I>(&mut self, bindidx: I, value: &dyn ToSql) -> Result<()>
    where
        I: BindIndex,
    {
        let oratype = value.oratype()?;
        let pos = match bindidx.find(self)? {
            Some(pos) => {
                let bind = &mut self.binds[pos];
                if bind.value.native() != &oratype.native_type() {
                    return Err(Error::new(
                        crate::ErrorKind::RebindMismatch,
                        format!(
                            "placeholder {} rebound as {} but was {}",
                            bind.name,
                            oratype,
                            bind.value.oracle_type()
                        ),
                    ));
                }
                if bind.value.oracle_type() != &oratype {
                    // same representation, bigger buffer; rebuild and rebind
                    bind.value = SqlValue::new(self.conn.clone(), &oratype, 1)?;
                    self.register_bind(pos)?;
                }
                pos
            }
            None => {
                let value = SqlValue::new(self.conn.clone(), &oratype, 1)?;
                let pos = bindidx.next_position(self)?;
                self.binds.insert(
                    pos,
                    Bind {
                        name: bindidx.name(),
                        value,
                        bindp: ptr::null_mut(),
                    },
                );
                self.register_bind(pos)?;
                pos
            }
        };
        self.binds[pos].value.set_buffer_row(0);
        value.to_sql(&mut self.binds[pos].value)
    }

    fn register_bind(&mut self, pos: usize) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let stmtp = self.stmt.raw();
        let bind = &mut self.binds[pos];
        let sqlt = bind.value.sqlt();
        let elem_size = bind.value.elem_size();
        let buf_ptr = bind.value.buf_ptr();
        let ind_ptr = bind.value.ind_ptr();
        let len_ptr = bind.value.len_ptr();
        let mut bindp: *mut OCIBind = ptr::null_mut();
        if bind.name.is_empty() {
            chkerr!(
                ctxt,
                errhp,
                OCIBindByPos(
                    stmtp,
                    &mut bindp,
                    errhp,
                    (pos + 1) as ub4,
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
        } else {
            let name = OciString::new(&format!(":{}", bind.name), ctxt.charset());
            chkerr!(
                ctxt,
                errhp,
                OCIBindByName(
                    stmtp,
                    &mut bindp,
                    errhp,
                    name.ptr(),
                    name.len() as sb4,
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
        }
        bind.bindp = bindp;
        bind.value.bind_object(bindp)?;
        Ok(())
    }

    /// Registers a RETURNING-INTO output placeholder.
    ///
    /// Supported types are character, RAW, integer, floating-point, NUMBER
    /// and DATE; values are read back with [`Statement::returning_resultset`]
    /// after execute.
    pub fn register_returning(&mut self, name: &str, oratype: &OracleType) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let bare = name.trim_start_matches(':').to_uppercase();
        if self.returning.iter().any(|r| r.name == bare) {
            return Err(Error::new(
                crate::ErrorKind::BindAlreadyUsed,
                format!("placeholder {} is already registered", bare),
            ));
        }
        let (sqlt, elem_size) = returning_repr(oratype, ctxt.charset())?;
        let mut ret = Box::new(ReturningBind {
            name: bare,
            oratype: oratype.clone(),
            elem_size,
            iters: Vec::new(),
            dyn_pos: 0,
            in_ind: OCI_IND_NULL,
            ctxt,
            errhp,
            ctl: self.ret_ctl.as_mut() as *mut RetCtl,
        });
        let mut bindp: *mut OCIBind = ptr::null_mut();
        let text = OciString::new(&format!(":{}", ret.name), ctxt.charset());
        chkerr!(
            ctxt,
            errhp,
            OCIBindByName(
                self.stmt.raw(),
                &mut bindp,
                errhp,
                text.ptr(),
                text.len() as sb4,
                ptr::null_mut(),
                elem_size as sb4,
                sqlt,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                0,
                ptr::null_mut(),
                OCI_DATA_AT_EXEC
            )
        );
        let ctx_ptr = ret.as_mut() as *mut ReturningBind as *mut c_void;
        chkerr!(
            ctxt,
            errhp,
            OCIBindDynamic(
                bindp,
                errhp,
                ctx_ptr,
                Some(returning_in_callback),
                ctx_ptr,
                Some(returning_out_callback)
            )
        );
        self.returning.push(ret);
        Ok(())
    }

    /// Executes the statement with positional parameters.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use ocilib::*;
    /// # let conn = Connection::connect("scott", "tiger", "")?;
    /// let mut stmt = conn.statement("insert into t values (:1, :2)").build()?;
    /// stmt.execute(&[&42, &"hello"])?;
    /// # Ok::<(), Error>(())
    /// ```
    pub fn execute(&mut self, params: &[&dyn ToSql]) -> Result<()> {
        for (i, param) in params.iter().enumerate() {
            self.bind(i + 1, *param)?;
        }
        self.execute_internal(1)
    }

    /// Executes the statement with named parameters.
    pub fn execute_named(&mut self, params: &[(&str, &dyn ToSql)]) -> Result<()> {
        for (name, param) in params {
            self.bind(*name, *param)?;
        }
        self.execute_internal(1)
    }

    pub(crate) fn execute_internal(&mut self, iters: u32) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let iters = if self.is_query() { 0 } else { iters.max(1) };
        for ret in &mut self.returning {
            ret.iters.clear();
            ret.dyn_pos = 0;
        }
        self.ret_ctl.next_pos = 0;
        let mut mode = OCI_DEFAULT;
        if self.conn.autocommit() && !self.is_query() {
            mode |= OCI_COMMIT_ON_SUCCESS;
        }
        if self.scrollable && self.is_query() {
            if !self.returning.is_empty() {
                return Err(Error::new(
                    crate::ErrorKind::NotScrollable,
                    "a statement with RETURNING binds cannot be scrollable",
                ));
            }
            mode |= OCI_STMT_SCROLLABLE_READONLY;
        }
        chkerr!(
            ctxt,
            errhp,
            OCIStmtExecute(
                self.conn.svchp(),
                self.stmt.raw(),
                errhp,
                iters,
                0,
                ptr::null(),
                ptr::null_mut(),
                mode
            )
        );
        self.executed = true;
        Ok(())
    }

    /// Executes the query and returns the resultset.
    pub fn query(&mut self, params: &[&dyn ToSql]) -> Result<ResultSet<'_>> {
        if !self.is_query() {
            return Err(Error::invalid_state(format!(
                "{} statements return no rows",
                self.stmt_type
            )));
        }
        for (i, param) in params.iter().enumerate() {
            self.bind(i + 1, *param)?;
        }
        self.execute_internal(0)?;
        ResultSet::from_stmt_handle(
            self.conn.clone(),
            self.stmt.raw(),
            self.fetch_array_size,
            self.scrollable,
            self.long_mode,
            self.long_size,
        )
    }

    /// Executes the query with named parameters and returns the resultset.
    pub fn query_named(&mut self, params: &[(&str, &dyn ToSql)]) -> Result<ResultSet<'_>> {
        if !self.is_query() {
            return Err(Error::invalid_state(format!(
                "{} statements return no rows",
                self.stmt_type
            )));
        }
        for (name, param) in params {
            self.bind(*name, *param)?;
        }
        self.execute_internal(0)?;
        ResultSet::from_stmt_handle(
            self.conn.clone(),
            self.stmt.raw(),
            self.fetch_array_size,
            self.scrollable,
            self.long_mode,
            self.long_size,
        )
    }

    /// Reads an OUT bind value after execute.
    pub fn bind_value<I, T>(&self, bindidx: I) -> Result<T>
    where
        I: BindIndex,
        T: FromSql,
    {
        if !self.executed {
            return Err(Error::invalid_state("the statement is not executed"));
        }
        let pos = bindidx
            .find(self)?
            .ok_or_else(|| bindidx.not_found_error())?;
        self.binds[pos].value.set_buffer_row(0);
        T::from_sql(&self.binds[pos].value)
    }

    /// Number of rows affected by the last execution.
    pub fn row_count(&self) -> Result<u64> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        if ctxt.client_version() >= crate::Version::tier(12, 1) {
            if let Ok(n) = ctxt.attr_get_ub8(
                self.stmt.raw() as *const c_void,
                OCI_HTYPE_STMT,
                OCI_ATTR_UB8_ROW_COUNT,
                errhp,
            ) {
                return Ok(n);
            }
        }
        Ok(ctxt.attr_get_ub4(
            self.stmt.raw() as *const c_void,
            OCI_HTYPE_STMT,
            OCI_ATTR_ROW_COUNT,
            errhp,
        )? as u64)
    }

    /// Builds the resultset of one RETURNING-INTO execution iteration.
    ///
    /// The column order follows the execution order of the placeholders as
    /// the server reported it, independent of registration order.
    pub fn returning_resultset(&self, iter: usize) -> Result<ResultSet<'_>> {
        if !self.executed {
            return Err(Error::invalid_state("the statement is not executed"));
        }
        if self.returning.is_empty() {
            return Err(Error::invalid_state("no RETURNING placeholder registered"));
        }
        let mut order: Vec<usize> = (0..self.returning.len()).collect();
        order.sort_by_key(|&i| self.returning[i].dyn_pos);
        let mut names = Vec::new();
        let mut values = Vec::new();
        let mut nrows = 0;
        for &i in &order {
            let ret = &self.returning[i];
            nrows = nrows.max(ret.iters.get(iter).map(|d| d.nrows).unwrap_or(0));
            names.push(ret.name.clone());
            values.push(ret.to_sql_value(&self.conn, iter)?);
        }
        ResultSet::from_returning(self.conn.clone(), names, values, nrows)
    }

    /// Walks to the next implicit resultset produced by a PL/SQL block.
    /// Requires an Oracle 12.1 client.
    pub fn next_result(&mut self) -> Result<Option<ResultSet<'_>>> {
        let ctxt = self.conn.ctxt();
        ctxt.require(ctxt.features().implicit_results, "implicit resultsets")?;
        let errhp = self.conn.errhp();
        let mut result: *mut c_void = ptr::null_mut();
        let mut rtype: ub4 = 0;
        let status = crate::error::oci_call!(
            ctxt,
            OCIStmtGetNextResult(self.stmt.raw(), errhp, &mut result, &mut rtype, OCI_DEFAULT)
        );
        if status == OCI_NO_DATA {
            return Ok(None);
        }
        ctxt.check(errhp, status, "OCIStmtGetNextResult")?;
        Ok(Some(ResultSet::from_stmt_handle(
            self.conn.clone(),
            result as *mut OCIStmt,
            self.fetch_array_size,
            false,
            self.long_mode,
            self.long_size,
        )?))
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        if let RawStmt::Cached(stmtp) = &self.stmt {
            let stmtp = *stmtp;
            let ctxt = self.conn.ctxt();
            if let Some(f) = ctxt.fns().OCIStmtRelease {
                unsafe { f(stmtp, self.conn.errhp(), ptr::null(), 0, OCI_DEFAULT) };
            }
        }
    }
}

impl fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Statement {{ type: {}, binds: {}, returning: {} }}",
            self.stmt_type,
            self.binds.len(),
            self.returning.len()
        )
    }
}

impl ReturningBind {
    /// Copies one iteration of callback-collected data into a typed buffer
    /// readable through the common accessors.
    fn to_sql_value(&self, conn: &Arc<ConnInner>, iter: usize) -> Result<SqlValue> {
        let data = match self.iters.get(iter) {
            Some(data) => data,
            // the DML matched no row in this iteration
            None => return SqlValue::new(conn.clone(), &self.oratype, 1),
        };
        let nrows = data.nrows as usize;
        let mut value = SqlValue::new(conn.clone(), &self.oratype, nrows.max(1))?;
        for row in 0..nrows {
            value.set_buffer_row(row);
            if data.inds[row] == OCI_IND_NULL {
                value.set_null()?;
                continue;
            }
            let start = row * self.elem_size;
            let len = (data.lens[row] as usize).min(self.elem_size);
            let bytes = &data.buf[start..start + len];
            match self.oratype.native_type() {
                NativeType::Int64 => {
                    let mut raw = [0u8; 8];
                    raw.copy_from_slice(&data.buf[start..start + 8]);
                    value.set_i64(i64::from_ne_bytes(raw))?;
                }
                NativeType::UInt64 => {
                    let mut raw = [0u8; 8];
                    raw.copy_from_slice(&data.buf[start..start + 8]);
                    value.set_u64(u64::from_ne_bytes(raw))?;
                }
                NativeType::Float => {
                    let mut raw = [0u8; 4];
                    raw.copy_from_slice(&data.buf[start..start + 4]);
                    value.set_f64(f32::from_ne_bytes(raw) as f64)?;
                }
                NativeType::Double => {
                    let mut raw = [0u8; 8];
                    raw.copy_from_slice(&data.buf[start..start + 8]);
                    value.set_f64(f64::from_ne_bytes(raw))?;
                }
                NativeType::Number => {
                    let mut raw = [0u8; 22];
                    raw[..bytes.len().min(22)].copy_from_slice(&bytes[..bytes.len().min(22)]);
                    value.set_number_raw(raw)?;
                }
                NativeType::Date => {
                    let date = date_from_wire(bytes).ok_or_else(|| {
                        Error::internal("short DATE buffer in RETURNING data")
                    })?;
                    value.set_oci_date(date)?;
                }
                NativeType::Raw => value.set_bytes(bytes)?,
                NativeType::Char => {
                    let s = self.ctxt.charset().text_to_string(bytes);
                    value.set_string(&s)?;
                }
                _ => {
                    return Err(Error::unsupported_type(format!(
                        "{} cannot be read back from a RETURNING clause",
                        self.oratype
                    )))
                }
            }
        }
        value.set_buffer_row(0);
        Ok(value)
    }
}

/// Wire representation of a RETURNING placeholder.
fn returning_repr(oratype: &OracleType, charset: crate::util::Charset) -> Result<(ub2, usize)> {
    let repr = match oratype.native_type() {
        NativeType::Char => (SQLT_CHR, oratype.buffer_size(charset).max(1)),
        NativeType::Raw => (SQLT_BIN, oratype.buffer_size(charset).max(1)),
        NativeType::Int64 => (SQLT_INT, 8),
        NativeType::UInt64 => (SQLT_UIN, 8),
        NativeType::Float => (SQLT_BFLOAT, 4),
        NativeType::Double => (SQLT_BDOUBLE, 8),
        NativeType::Number => (SQLT_VNU, 22),
        // the packed wire form, not the OCIDate struct
        NativeType::Date => (SQLT_DAT, 7),
        _ => {
            return Err(Error::unsupported_type(format!(
                "{} is not supported in a RETURNING clause",
                oratype
            )))
        }
    };
    Ok(repr)
}

unsafe extern "C" fn returning_in_callback(
    ictxp: *mut c_void,
    _bindp: *mut OCIBind,
    iter: ub4,
    _index: ub4,
    bufpp: *mut *mut c_void,
    alenp: *mut ub4,
    piecep: *mut ub1,
    indpp: *mut *mut c_void,
) -> sb4 {
    let ret = &mut *(ictxp as *mut ReturningBind);
    // the server must see NULL input data for every iteration
    ret.in_ind = OCI_IND_NULL;
    if iter == 0 && ret.dyn_pos == 0 {
        let ctl = &mut *ret.ctl;
        ctl.next_pos += 1;
        ret.dyn_pos = ctl.next_pos;
    }
    *bufpp = ptr::null_mut();
    *alenp = 0;
    *piecep = OCI_ONE_PIECE;
    *indpp = &mut ret.in_ind as *mut sb2 as *mut c_void;
    OCI_CONTINUE
}

unsafe extern "C" fn returning_out_callback(
    octxp: *mut c_void,
    bindp: *mut OCIBind,
    iter: ub4,
    index: ub4,
    bufpp: *mut *mut c_void,
    alenpp: *mut *mut ub4,
    piecep: *mut ub1,
    indpp: *mut *mut c_void,
    rcodepp: *mut *mut ub2,
) -> sb4 {
    let ret = &mut *(octxp as *mut ReturningBind);
    let iter = iter as usize;
    while ret.iters.len() <= iter {
        ret.iters.push(RetIter {
            buf: Vec::new(),
            inds: Vec::new(),
            lens: Vec::new(),
            rcodes: Vec::new(),
            nrows: 0,
        });
    }
    if index == 0 {
        // first piece of this iteration: size the buffers from the row count
        let mut nrows: ub4 = 0;
        let attr_get = match ret.ctxt.fns().OCIAttrGet {
            Some(f) => f,
            None => return OCI_ERROR,
        };
        let status = attr_get(
            bindp as *const c_void,
            OCI_HTYPE_BIND,
            &mut nrows as *mut ub4 as *mut c_void,
            ptr::null_mut(),
            OCI_ATTR_ROWS_RETURNED,
            ret.errhp,
        );
        if status != OCI_SUCCESS {
            return OCI_ERROR;
        }
        let n = nrows as usize;
        let data = &mut ret.iters[iter];
        data.nrows = nrows;
        data.buf = vec![0; n * ret.elem_size];
        data.inds = vec![OCI_IND_NULL; n];
        data.lens = vec![ret.elem_size as ub4; n];
        data.rcodes = vec![0; n];
    }
    let data = &mut ret.iters[iter];
    let row = index as usize;
    if row >= data.nrows as usize {
        return OCI_ERROR;
    }
    *bufpp = data.buf.as_mut_ptr().add(row * ret.elem_size) as *mut c_void;
    *alenpp = &mut data.lens[row];
    *indpp = &mut data.inds[row] as *mut sb2 as *mut c_void;
    *rcodepp = &mut data.rcodes[row];
    *piecep = OCI_ONE_PIECE;
    OCI_CONTINUE
}

/// A value that locates a bind placeholder: a one-based position or a name.
pub trait BindIndex {
    /// Index into the statement's bind list, when the placeholder is bound.
    fn find(&self, stmt: &Statement) -> Result<Option<usize>>;
    /// Index a new bind is inserted at.
    fn next_position(&self, stmt: &Statement) -> Result<usize>;
    fn name(&self) -> String;
    fn not_found_error(&self) -> Error;
}

impl BindIndex for usize {
    fn find(&self, stmt: &Statement) -> Result<Option<usize>> {
        if *self == 0 {
            return Err(Error::invalid_bind_index(*self));
        }
        if *self <= stmt.binds.len() {
            Ok(Some(*self - 1))
        } else {
            Ok(None)
        }
    }

    fn next_position(&self, stmt: &Statement) -> Result<usize> {
        if *self != stmt.binds.len() + 1 {
            return Err(Error::invalid_bind_index(*self));
        }
        Ok(stmt.binds.len())
    }

    fn name(&self) -> String {
        String::new()
    }

    fn not_found_error(&self) -> Error {
        Error::invalid_bind_index(*self)
    }
}

impl BindIndex for &str {
    fn find(&self, stmt: &Statement) -> Result<Option<usize>> {
        let bare = self.trim_start_matches(':');
        Ok(stmt
            .binds
            .iter()
            .position(|b| b.name.eq_ignore_ascii_case(bare)))
    }

    fn next_position(&self, stmt: &Statement) -> Result<usize> {
        Ok(stmt.binds.len())
    }

    fn name(&self) -> String {
        self.trim_start_matches(':').to_uppercase()
    }

    fn not_found_error(&self) -> Error {
        Error::invalid_bind_name(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_type_mapping() {
        assert_eq!(StatementType::from_code(OCI_STMT_SELECT), StatementType::Select);
        assert_eq!(StatementType::from_code(OCI_STMT_BEGIN), StatementType::Begin);
        assert_eq!(StatementType::from_code(OCI_STMT_MERGE), StatementType::Merge);
        assert_eq!(StatementType::from_code(999), StatementType::Unknown);
        assert!(StatementType::Select.is_query());
        assert!(StatementType::Call.is_plsql());
        assert!(!StatementType::Insert.is_plsql());
    }

    #[test]
    fn returning_repr_sizes() {
        use crate::util::Charset;
        let (sqlt, size) = returning_repr(&OracleType::Int64, Charset::Narrow).unwrap();
        assert_eq!((sqlt, size), (SQLT_INT, 8));
        let (sqlt, size) = returning_repr(&OracleType::Date, Charset::Narrow).unwrap();
        assert_eq!((sqlt, size), (SQLT_DAT, 7));
        let (sqlt, size) = returning_repr(&OracleType::Number(0, 0), Charset::Narrow).unwrap();
        assert_eq!((sqlt, size), (SQLT_VNU, 22));
        assert!(returning_repr(&OracleType::BLOB, Charset::Narrow).is_err());
    }
}
