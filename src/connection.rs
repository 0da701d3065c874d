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

//! Type definitions for connections

use std::fmt;
use std::os::raw::c_void;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::binding::*;
use crate::context::{Context, FormatDefaults, FormatType};
use crate::error::chkerr;
use crate::handle::Handle;
use crate::statement::StatementBuilder;
use crate::type_info::{describe_cached, TypeInfo, TypeInfoKind};
use crate::sql_type::ToSql;
use crate::util::OciString;
use crate::{DbError, Error, Result, Statement, Version};

/// Administrative privilege to log on with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Privilege {
    Sysdba,
    Sysoper,
    Sysasm,
    /// Preliminary authentication, usable before the database is started
    Prelim,
}

impl Privilege {
    fn to_mode(self) -> ub4 {
        match self {
            Privilege::Sysdba => OCI_SYSDBA,
            Privilege::Sysoper => OCI_SYSOPER,
            Privilege::Sysasm => OCI_SYSASM,
            Privilege::Prelim => OCI_PRELIM_AUTH,
        }
    }
}

/// What the server is failing over when a TAF callback fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailoverType {
    None,
    Session,
    Select,
    Transactional,
}

impl FailoverType {
    fn from_oci(value: ub4) -> FailoverType {
        match value {
            OCI_FO_SESSION => FailoverType::Session,
            OCI_FO_SELECT => FailoverType::Select,
            OCI_FO_TXNAL => FailoverType::Transactional,
            _ => FailoverType::None,
        }
    }
}

/// Progress of a transparent application failover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailoverEvent {
    Begin,
    End,
    Abort,
    Reauth,
    Error,
}

impl FailoverEvent {
    fn from_oci(value: ub4) -> FailoverEvent {
        match value {
            OCI_FO_BEGIN => FailoverEvent::Begin,
            OCI_FO_ABORT => FailoverEvent::Abort,
            OCI_FO_REAUTH => FailoverEvent::Reauth,
            OCI_FO_ERROR => FailoverEvent::Error,
            _ => FailoverEvent::End,
        }
    }
}

/// Return value of a TAF handler; `Retry` asks the server to attempt the
/// failover again after a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailoverResult {
    Ok,
    Retry,
}

type TafHandler = Box<dyn FnMut(FailoverType, FailoverEvent) -> FailoverResult + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnStatus {
    Attached,
    Logged,
    Closed,
}

/// Builder data structure to connect to the database
///
/// # Examples
///
/// ```no_run
/// # use ocilib::*;
/// let conn = Connector::new("scott", "tiger", "//localhost/XEPDB1")
///     .privilege(Privilege::Sysdba)
///     .connect()?;
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Connector {
    username: String,
    password: String,
    connect_string: String,
    privilege: Option<Privilege>,
    external_auth: bool,
    stmt_cache_size: u32,
}

impl Connector {
    pub fn new<U, P, C>(username: U, password: P, connect_string: C) -> Connector
    where
        U: Into<String>,
        P: Into<String>,
        C: Into<String>,
    {
        Connector {
            username: username.into(),
            password: password.into(),
            connect_string: connect_string.into(),
            privilege: None,
            external_auth: false,
            stmt_cache_size: 20,
        }
    }

    pub fn privilege(&mut self, privilege: Privilege) -> &mut Connector {
        self.privilege = Some(privilege);
        self
    }

    /// Uses external authentication such as OS authentication or wallets
    /// instead of the username and password.
    pub fn external_auth(&mut self, flag: bool) -> &mut Connector {
        self.external_auth = flag;
        self
    }

    /// Number of statements cached by the OCI statement cache. Zero disables
    /// statement caching.
    pub fn stmt_cache_size(&mut self, size: u32) -> &mut Connector {
        self.stmt_cache_size = size;
        self
    }

    pub fn connect(&self) -> Result<Connection> {
        let ctxt = Context::get()?;
        let inner = ConnInner::connect(ctxt, self)?;
        let inner = Arc::new(inner);
        ctxt.conn_registry()
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::downgrade(&inner));
        Ok(Connection { inner })
    }
}

pub(crate) struct ConnInner {
    ctxt: &'static Context,
    server: Handle<OCIServer>,
    svchp: Handle<OCISvcCtx>,
    session: Handle<OCISession>,
    errhp: Handle<OCIError>,
    status: Mutex<ConnStatus>,
    autocommit: AtomicBool,
    formats: Mutex<Option<FormatDefaults>>,
    type_cache: Mutex<Vec<Arc<TypeInfo>>>,
    taf_handler: Mutex<Option<TafHandler>>,
}

impl ConnInner {
    fn connect(ctxt: &'static Context, params: &Connector) -> Result<ConnInner> {
        let server = Handle::<OCIServer>::new(ctxt)?;
        let errhp = Handle::<OCIError>::new(ctxt)?;
        let svchp = Handle::<OCISvcCtx>::new(ctxt)?;
        let session = Handle::<OCISession>::new(ctxt)?;

        let dsn = OciString::new(&params.connect_string, ctxt.charset());
        chkerr!(
            ctxt,
            errhp.raw(),
            OCIServerAttach(
                server.raw(),
                errhp.raw(),
                dsn.ptr(),
                dsn.len() as sb4,
                OCI_DEFAULT
            )
        );

        let inner = ConnInner {
            ctxt,
            server,
            svchp,
            session,
            errhp,
            status: Mutex::new(ConnStatus::Attached),
            autocommit: AtomicBool::new(false),
            formats: Mutex::new(None),
            type_cache: Mutex::new(Vec::new()),
            taf_handler: Mutex::new(None),
        };
        match inner.logon(params) {
            Ok(()) => Ok(inner),
            Err(err) => {
                // release the partially constructed server attachment; the
                // handles are freed by drop
                inner.detach();
                Err(err)
            }
        }
    }

    fn logon(&self, params: &Connector) -> Result<()> {
        let ctxt = self.ctxt;
        let errhp = self.errhp.raw();
        ctxt.attr_set_ptr(
            self.svchp.raw() as *mut c_void,
            OCI_HTYPE_SVCCTX,
            OCI_ATTR_SERVER,
            self.server.raw() as *mut c_void,
            errhp,
        )?;
        let cred = if params.external_auth {
            OCI_CRED_EXT
        } else {
            ctxt.attr_set_text(
                self.session.raw() as *mut c_void,
                OCI_HTYPE_SESSION,
                OCI_ATTR_USERNAME,
                &params.username,
                errhp,
            )?;
            ctxt.attr_set_text(
                self.session.raw() as *mut c_void,
                OCI_HTYPE_SESSION,
                OCI_ATTR_PASSWORD,
                &params.password,
                errhp,
            )?;
            OCI_CRED_RDBMS
        };
        let mode = params.privilege.map(|p| p.to_mode()).unwrap_or(OCI_DEFAULT);
        chkerr!(
            ctxt,
            errhp,
            OCISessionBegin(self.svchp.raw(), errhp, self.session.raw(), cred, mode)
        );
        ctxt.attr_set_ptr(
            self.svchp.raw() as *mut c_void,
            OCI_HTYPE_SVCCTX,
            OCI_ATTR_SESSION,
            self.session.raw() as *mut c_void,
            errhp,
        )?;
        if ctxt.features().statement_caching && params.stmt_cache_size > 0 {
            ctxt.attr_set_ub4(
                self.svchp.raw() as *mut c_void,
                OCI_HTYPE_SVCCTX,
                OCI_ATTR_STMTCACHESIZE,
                params.stmt_cache_size,
                errhp,
            )?;
        }
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = ConnStatus::Logged;
        Ok(())
    }

    fn detach(&self) {
        if let Some(f) = self.ctxt.fns().OCIServerDetach {
            unsafe { f(self.server.raw(), self.errhp.raw(), OCI_DEFAULT) };
        }
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = ConnStatus::Closed;
    }

    pub(crate) fn ctxt(&self) -> &'static Context {
        self.ctxt
    }

    pub(crate) fn errhp(&self) -> *mut OCIError {
        self.errhp.raw()
    }

    pub(crate) fn svchp(&self) -> *mut OCISvcCtx {
        self.svchp.raw()
    }

    pub(crate) fn server_handle(&self) -> *mut OCIServer {
        self.server.raw()
    }

    pub(crate) fn autocommit(&self) -> bool {
        self.autocommit.load(Ordering::Relaxed)
    }

    pub(crate) fn check_logged(&self) -> Result<()> {
        match *self.status.lock().unwrap_or_else(|e| e.into_inner()) {
            ConnStatus::Logged => Ok(()),
            _ => Err(Error::invalid_state("the connection is not logged on")),
        }
    }

    /// Effective conversion formats: connection overrides, process defaults
    /// otherwise.
    pub(crate) fn formats(&self) -> FormatDefaults {
        match &*self.formats.lock().unwrap_or_else(|e| e.into_inner()) {
            Some(f) => f.clone(),
            None => self.ctxt.formats(),
        }
    }

    pub(crate) fn set_format(&self, kind: FormatType, fmt: &str) {
        let mut guard = self.formats.lock().unwrap_or_else(|e| e.into_inner());
        let defaults = guard.get_or_insert_with(|| self.ctxt.formats());
        defaults.set(kind, fmt);
    }

    pub(crate) fn find_cached_type_info(
        &self,
        schema: &str,
        name: &str,
        kind: TypeInfoKind,
    ) -> Option<Arc<TypeInfo>> {
        self.type_cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|ti| ti.matches(schema, name, kind))
            .cloned()
    }

    pub(crate) fn cache_type_info(&self, ti: Arc<TypeInfo>) {
        self.type_cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ti);
    }

    fn close_internal(&self) -> Result<()> {
        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        match *status {
            ConnStatus::Closed => return Ok(()),
            ConnStatus::Logged => {
                let errhp = self.errhp.raw();
                chkerr!(
                    self.ctxt,
                    errhp,
                    OCISessionEnd(self.svchp.raw(), errhp, self.session.raw(), OCI_DEFAULT)
                );
                chkerr!(
                    self.ctxt,
                    errhp,
                    OCIServerDetach(self.server.raw(), errhp, OCI_DEFAULT)
                );
            }
            ConnStatus::Attached => {
                let errhp = self.errhp.raw();
                chkerr!(
                    self.ctxt,
                    errhp,
                    OCIServerDetach(self.server.raw(), errhp, OCI_DEFAULT)
                );
            }
        }
        *status = ConnStatus::Closed;
        Ok(())
    }
}

impl Drop for ConnInner {
    fn drop(&mut self) {
        let status = *self.status.lock().unwrap_or_else(|e| e.into_inner());
        let fns = self.ctxt.fns();
        if status == ConnStatus::Logged {
            if let Some(f) = fns.OCISessionEnd {
                unsafe { f(self.svchp.raw(), self.errhp.raw(), self.session.raw(), OCI_DEFAULT) };
            }
        }
        if status != ConnStatus::Closed {
            if let Some(f) = fns.OCIServerDetach {
                unsafe { f(self.server.raw(), self.errhp.raw(), OCI_DEFAULT) };
            }
        }
    }
}

/// Connection to an Oracle database
pub struct Connection {
    pub(crate) inner: Arc<ConnInner>,
}

impl Connection {
    /// Connects to an Oracle server using username, password and connect
    /// string.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use ocilib::*;
    /// let conn = Connection::connect("scott", "tiger", "//localhost/XEPDB1")?;
    /// # Ok::<(), Error>(())
    /// ```
    pub fn connect<U, P, C>(username: U, password: P, connect_string: C) -> Result<Connection>
    where
        U: Into<String>,
        P: Into<String>,
        C: Into<String>,
    {
        Connector::new(username, password, connect_string).connect()
    }

    pub(crate) fn from_inner(inner: Arc<ConnInner>) -> Connection {
        Connection { inner }
    }

    /// Creates a statement builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use ocilib::*;
    /// # let conn = Connection::connect("scott", "tiger", "")?;
    /// let mut stmt = conn.statement("insert into t values (:1)").build()?;
    /// stmt.execute(&[&42])?;
    /// # Ok::<(), Error>(())
    /// ```
    pub fn statement<'conn>(&'conn self, sql: &str) -> StatementBuilder<'conn> {
        StatementBuilder::new(self, sql)
    }

    /// Prepares a statement, executes it and returns it.
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Statement> {
        let mut stmt = self.statement(sql).build()?;
        stmt.execute(params)?;
        Ok(stmt)
    }

    /// Commits the current transaction.
    pub fn commit(&self) -> Result<()> {
        self.inner.check_logged()?;
        let ctxt = self.inner.ctxt();
        let errhp = self.inner.errhp();
        chkerr!(ctxt, errhp, OCITransCommit(self.inner.svchp(), errhp, OCI_DEFAULT));
        Ok(())
    }

    /// Rolls back the current transaction.
    pub fn rollback(&self) -> Result<()> {
        self.inner.check_logged()?;
        let ctxt = self.inner.ctxt();
        let errhp = self.inner.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCITransRollback(self.inner.svchp(), errhp, OCI_DEFAULT)
        );
        Ok(())
    }

    /// Enables or disables automatic commit after each statement execution.
    pub fn set_autocommit(&self, autocommit: bool) {
        self.inner.autocommit.store(autocommit, Ordering::Relaxed);
    }

    pub fn autocommit(&self) -> bool {
        self.inner.autocommit()
    }

    /// Cancels the OCI call currently running on this connection, typically
    /// from another thread.
    pub fn break_execution(&self) -> Result<()> {
        self.inner.check_logged()?;
        let ctxt = self.inner.ctxt();
        let errhp = self.inner.errhp();
        chkerr!(ctxt, errhp, OCIBreak(self.inner.svchp() as *mut c_void, errhp));
        chkerr!(ctxt, errhp, OCIReset(self.inner.svchp() as *mut c_void, errhp));
        Ok(())
    }

    /// Verifies that the connection and the server are active. Requires an
    /// Oracle 10.2 client.
    pub fn ping(&self) -> Result<()> {
        self.inner.check_logged()?;
        let ctxt = self.inner.ctxt();
        let errhp = self.inner.errhp();
        chkerr!(ctxt, errhp, OCIPing(self.inner.svchp(), errhp, OCI_DEFAULT));
        Ok(())
    }

    /// Returns the Oracle server version and the version banner.
    pub fn server_version(&self) -> Result<(Version, String)> {
        self.inner.check_logged()?;
        let ctxt = self.inner.ctxt();
        let errhp = self.inner.errhp();
        let mut buf = vec![0u8; 1024];
        chkerr!(
            ctxt,
            errhp,
            OCIServerVersion(
                self.inner.svchp() as *mut c_void,
                errhp,
                buf.as_mut_ptr(),
                buf.len() as ub4,
                OCI_HTYPE_SVCCTX as ub1
            )
        );
        let banner = ctxt.charset().text_to_string_nt(&buf);
        Ok((version_from_banner(&banner).unwrap_or_default(), banner))
    }

    /// Returns the cached description of a table, view or named type.
    pub fn type_info(&self, name: &str, kind: TypeInfoKind) -> Result<Arc<TypeInfo>> {
        self.inner.check_logged()?;
        describe_cached(&self.inner, name, kind)
    }

    /// Returns the cached description of a named object or collection type.
    pub fn object_type(&self, name: &str) -> Result<Arc<TypeInfo>> {
        self.type_info(name, TypeInfoKind::Type)
    }

    /// Overrides one conversion format for this connection only.
    pub fn set_format(&self, kind: FormatType, fmt: &str) {
        self.inner.set_format(kind, fmt);
    }

    /// The warning recorded by the most recent call completed with
    /// `OCI_SUCCESS_WITH_INFO`.
    pub fn last_warning(&self) -> Option<DbError> {
        self.inner.ctxt().last_warning()
    }

    /// Installs a transparent-application-failover handler.
    ///
    /// The handler runs on the thread performing the failed-over call; its
    /// return value is forwarded to the server verbatim.
    pub fn set_taf_handler<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(FailoverType, FailoverEvent) -> FailoverResult + Send + 'static,
    {
        self.inner.check_logged()?;
        let ctxt = self.inner.ctxt();
        let errhp = self.inner.errhp();
        *self
            .inner
            .taf_handler
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(Box::new(handler));
        let mut focbk = OCIFocbkStruct {
            callback_function: Some(taf_trampoline),
            fo_ctx: Arc::as_ptr(&self.inner) as *mut c_void,
        };
        ctxt.attr_set_ptr(
            self.inner.server_handle() as *mut c_void,
            OCI_HTYPE_SERVER,
            OCI_ATTR_FOCBK,
            &mut focbk as *mut OCIFocbkStruct as *mut c_void,
            errhp,
        )?;
        Ok(())
    }

    /// Closes the connection, ending the session and detaching from the
    /// server.
    pub fn close(&self) -> Result<()> {
        self.inner.close_internal()
    }

    pub(crate) fn conn(&self) -> &Arc<ConnInner> {
        &self.inner
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Connection {{ .. }}")
    }
}

unsafe extern "C" fn taf_trampoline(
    _svchp: *mut c_void,
    _envhp: *mut c_void,
    fo_ctx: *mut c_void,
    fo_type: ub4,
    fo_event: ub4,
) -> sb4 {
    let inner = &*(fo_ctx as *const ConnInner);
    let mut guard = inner.taf_handler.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(handler) = guard.as_mut() {
        match handler(
            FailoverType::from_oci(fo_type),
            FailoverEvent::from_oci(fo_event),
        ) {
            FailoverResult::Retry => OCI_FO_RETRY,
            FailoverResult::Ok => 0,
        }
    } else {
        0
    }
}

/// Extracts the five-part version from a server banner such as
/// `Oracle Database 19c ... Release 19.0.0.0.0 - Production Version 19.3.0.0.0`.
pub(crate) fn version_from_banner(banner: &str) -> Option<Version> {
    for marker in ["Version ", "Release "] {
        if let Some(pos) = banner.find(marker) {
            let rest = &banner[pos + marker.len()..];
            let digits: String = rest
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            let mut parts = [0i32; 5];
            let mut count = 0;
            for (i, part) in digits.split('.').enumerate() {
                if i >= 5 {
                    break;
                }
                parts[i] = part.parse().ok()?;
                count += 1;
            }
            if count >= 2 {
                return Some(Version::new(
                    parts[0], parts[1], parts[2], parts[3], parts[4],
                ));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parsed_from_banner() {
        let banner = "Oracle Database 19c Enterprise Edition Release 19.0.0.0.0 - Production\nVersion 19.3.0.0.0";
        assert_eq!(
            version_from_banner(banner),
            Some(Version::new(19, 3, 0, 0, 0))
        );
        let banner = "Oracle Database 11g Release 11.2.0.4.0 - 64bit Production";
        assert_eq!(
            version_from_banner(banner),
            Some(Version::new(11, 2, 0, 4, 0))
        );
        assert_eq!(version_from_banner("no version here"), None);
    }
}
