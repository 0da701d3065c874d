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

//! Process-wide driver environment.
//!
//! The environment is created exactly once per process, either explicitly
//! through [`InitParams::init`] or implicitly by the first call that needs it.

use std::env;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Weak};

use once_cell::sync::OnceCell;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::error::fetch_dberr;
use crate::handle::HandleCounters;
use crate::sql_type::Timestamp;
use crate::util::{attr_text_to_string, nls_lang_is_utf8, Charset, OciString};
use crate::version::{version_from_symbols, Features};
use crate::{Connection, DbError, Error, Result, Version};

static CONTEXT: OnceCell<Context> = OnceCell::new();

/// High-availability event source read from an `OCI_ATTR_HA_SOURCE` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HaEventSource {
    Instance,
    Database,
    Node,
    Service,
    ServiceMember,
    AsmInstance,
}

/// Whether the HA event reports the source going down or coming back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaEventStatus {
    Down,
    Up,
}

pub(crate) type HaHandler =
    Box<dyn Fn(&Connection, HaEventSource, HaEventStatus, Option<Timestamp>) + Send + Sync>;

/// The six process-wide conversion format defaults, overridable per
/// connection.
#[derive(Debug, Clone)]
pub(crate) struct FormatDefaults {
    pub date: String,
    pub timestamp: String,
    pub timestamp_tz: String,
    pub number: String,
    pub binary_double: String,
    pub binary_float: String,
}

impl Default for FormatDefaults {
    fn default() -> FormatDefaults {
        FormatDefaults {
            date: "YYYY-MM-DD HH24:MI:SS".into(),
            timestamp: "YYYY-MM-DD HH24:MI:SS.FF".into(),
            timestamp_tz: "YYYY-MM-DD HH24:MI:SS.FF TZR".into(),
            number: "FM99999999999999999999999999999999999990.999999999999999999999999".into(),
            binary_double: "%lf".into(),
            binary_float: "%f".into(),
        }
    }
}

/// Kind selector for [`set_format`] / [`format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    Date,
    Timestamp,
    TimestampTz,
    Number,
    BinaryDouble,
    BinaryFloat,
}

impl FormatDefaults {
    pub(crate) fn get(&self, kind: FormatType) -> &str {
        match kind {
            FormatType::Date => &self.date,
            FormatType::Timestamp => &self.timestamp,
            FormatType::TimestampTz => &self.timestamp_tz,
            FormatType::Number => &self.number,
            FormatType::BinaryDouble => &self.binary_double,
            FormatType::BinaryFloat => &self.binary_float,
        }
    }

    pub(crate) fn set(&mut self, kind: FormatType, fmt: &str) {
        let slot = match kind {
            FormatType::Date => &mut self.date,
            FormatType::Timestamp => &mut self.timestamp,
            FormatType::TimestampTz => &mut self.timestamp_tz,
            FormatType::Number => &mut self.number,
            FormatType::BinaryDouble => &mut self.binary_double,
            FormatType::BinaryFloat => &mut self.binary_float,
        };
        *slot = fmt.into();
    }
}

/// Parameters for explicit environment initialization
///
/// # Examples
///
/// ```no_run
/// # use ocilib::*;
/// InitParams::new().threaded(true).events(true).init()?;
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct InitParams {
    threaded: bool,
    events: bool,
    utf16: bool,
    lib_path: Option<String>,
}

impl InitParams {
    /// Creates a new initialization parameter set
    pub fn new() -> InitParams {
        Default::default()
    }

    /// Acquires the OCI thread subsystem so that handles may be shared
    /// between threads
    pub fn threaded(&mut self, flag: bool) -> &mut InitParams {
        self.threaded = flag;
        self
    }

    /// Enables subscription, HA and AQ notification callbacks. Requires an
    /// Oracle 10.2 client or newer
    pub fn events(&mut self, flag: bool) -> &mut InitParams {
        self.events = flag;
        self
    }

    /// Creates the environment in UTF-16 mode. Requires an Oracle 9.0 client
    /// or newer
    pub fn utf16(&mut self, flag: bool) -> &mut InitParams {
        self.utf16 = flag;
        self
    }

    /// Explicit path of the Oracle client shared library. When unset, the
    /// platform-specific names are probed on the default search path
    pub fn oracle_client_lib_path<P>(&mut self, path: P) -> &mut InitParams
    where
        P: Into<String>,
    {
        self.lib_path = Some(path.into());
        self
    }

    /// Initializes the process-wide environment.
    ///
    /// Fails with [`crate::ErrorKind::AlreadyInitialized`] when the
    /// environment exists, whether it was set up explicitly or by lazy
    /// default initialization.
    pub fn init(&self) -> Result<()> {
        let mut created = false;
        CONTEXT.get_or_try_init(|| {
            created = true;
            Context::create(self)
        })?;
        if created {
            Ok(())
        } else {
            Err(Error::new(
                crate::ErrorKind::AlreadyInitialized,
                "the driver environment is already initialized",
            ))
        }
    }
}

pub(crate) struct Context {
    #[cfg(not(feature = "static-link"))]
    #[allow(dead_code)] // owns the mapping backing every resolved symbol
    lib: libloading::Library,
    fns: EntryPoints,
    envhp: *mut OCIEnv,
    errhp: *mut OCIError,
    charset: Charset,
    nls_utf8: bool,
    threaded: bool,
    events: bool,
    client_version: Version,
    features: Features,
    counters: HandleCounters,
    formats: Mutex<FormatDefaults>,
    last_warning: Mutex<Option<DbError>>,
    conn_registry: Mutex<Vec<Weak<ConnInner>>>,
    ha_handler: Mutex<Option<HaHandler>>,
    utf16_column_name_workaround: bool,
    closed: AtomicBool,
}

// The raw env pointer is immutable after creation; concurrent OCI calls on it
// are legal once OCI_THREADED is set. In non-threaded mode the application
// contract is single-threaded use.
unsafe impl Send for Context {}
unsafe impl Sync for Context {}

impl Context {
    /// Returns the environment, default-initializing it on first use.
    pub(crate) fn get() -> Result<&'static Context> {
        let ctxt = CONTEXT.get_or_try_init(|| Context::create(&InitParams::new()))?;
        if ctxt.closed.load(Ordering::Acquire) {
            return Err(Error::not_initialized());
        }
        Ok(ctxt)
    }

    #[cfg(not(feature = "static-link"))]
    fn open_library(params: &InitParams) -> Result<libloading::Library> {
        let mut last_err = None;
        if let Some(ref path) = params.lib_path {
            match unsafe { libloading::Library::new(path) } {
                Ok(lib) => return Ok(lib),
                Err(err) => last_err = Some((path.clone(), err)),
            }
        } else {
            for name in candidate_lib_names() {
                match unsafe { libloading::Library::new(name) } {
                    Ok(lib) => {
                        log::debug!("loaded Oracle client library {}", name);
                        return Ok(lib);
                    }
                    Err(err) => last_err = Some((name.to_string(), err)),
                }
            }
        }
        let (name, err) = last_err.expect("at least one candidate name");
        Err(Error::new(
            crate::ErrorKind::LibraryLoad,
            format!("cannot load the Oracle client library {}", name),
        )
        .add_source(err))
    }

    fn create(params: &InitParams) -> Result<Context> {
        #[cfg(not(feature = "static-link"))]
        let lib = Self::open_library(params)?;
        #[cfg(not(feature = "static-link"))]
        let fns = EntryPoints::load(&lib);
        #[cfg(not(feature = "static-link"))]
        let probe = |name: &str| has_symbol(&lib, name);

        #[cfg(feature = "static-link")]
        let fns = EntryPoints::load();
        #[cfg(feature = "static-link")]
        let probe = |_: &str| true;

        let mut client_version = version_from_symbols(&probe).ok_or_else(|| {
            Error::new(
                crate::ErrorKind::SymbolLoad,
                "the loaded library does not export the OCI entry points",
            )
        })?;
        if let Some(f) = fns.OCIClientVersion {
            let (mut major, mut minor, mut update, mut patch, mut port) = (0, 0, 0, 0, 0);
            unsafe { f(&mut major, &mut minor, &mut update, &mut patch, &mut port) };
            client_version = Version::new(major, minor, update, patch, port);
        }
        let features = Features::derive(client_version, &probe);
        log::debug!(
            "Oracle client version {}, features {:?}",
            client_version,
            features
        );

        if params.utf16 && client_version < Version::tier(9, 0) {
            return Err(Error::not_available("UTF-16 environment"));
        }
        if params.events && !features.ha_events {
            return Err(Error::not_available("events mode"));
        }

        let mut mode = OCI_OBJECT;
        if params.threaded {
            mode |= OCI_THREADED;
        }
        if params.events {
            mode |= OCI_EVENTS;
        }
        let charset = if params.utf16 {
            Charset::Utf16
        } else {
            Charset::Narrow
        };
        let charset_id = if params.utf16 { OCI_UTF16ID } else { 0 };

        let mut envhp: *mut OCIEnv = ptr::null_mut();
        let env_create = fns
            .OCIEnvNlsCreate
            .ok_or_else(|| Error::not_available("OCIEnvNlsCreate"))?;
        let status = unsafe {
            env_create(
                &mut envhp,
                mode,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                0,
                ptr::null_mut(),
                charset_id,
                charset_id,
            )
        };
        if status != OCI_SUCCESS || envhp.is_null() {
            return Err(Error::new(
                crate::ErrorKind::OciError,
                format!("OCIEnvNlsCreate failed with status {}", status),
            ));
        }

        // env-scope error handle; allocated directly because the handle
        // counters only track application-visible allocations
        let mut errhp: *mut OCIError = ptr::null_mut();
        let alloc = fns
            .OCIHandleAlloc
            .ok_or_else(|| Error::not_available("OCIHandleAlloc"))?;
        let status = unsafe {
            alloc(
                envhp as *const _,
                &mut errhp as *mut *mut OCIError as *mut *mut _,
                OCI_HTYPE_ERROR,
                0,
                ptr::null_mut(),
            )
        };
        if status != OCI_SUCCESS {
            return Err(Error::out_of_memory("OCIError"));
        }

        let nls_utf8 = !params.utf16
            && env::var("NLS_LANG")
                .map(|v| nls_lang_is_utf8(&v))
                .unwrap_or(false);
        let utf16_column_name_workaround = env::var("OCILIB_WORKAROUND_UTF16_COLUMN_NAME")
            .map(|v| v == "TRUE" || v == "1")
            .unwrap_or(false);

        Ok(Context {
            #[cfg(not(feature = "static-link"))]
            lib,
            fns,
            envhp,
            errhp,
            charset,
            nls_utf8,
            threaded: params.threaded,
            events: params.events,
            client_version,
            features,
            counters: Default::default(),
            formats: Mutex::new(Default::default()),
            last_warning: Mutex::new(None),
            conn_registry: Mutex::new(Vec::new()),
            ha_handler: Mutex::new(None),
            utf16_column_name_workaround,
            closed: AtomicBool::new(false),
        })
    }

    pub(crate) fn fns(&self) -> &EntryPoints {
        &self.fns
    }

    pub(crate) fn env_handle(&self) -> *mut OCIEnv {
        self.envhp
    }

    pub(crate) fn error_handle(&self) -> *mut OCIError {
        self.errhp
    }

    pub(crate) fn charset(&self) -> Charset {
        self.charset
    }

    pub(crate) fn nls_utf8(&self) -> bool {
        self.nls_utf8
    }

    pub(crate) fn threaded(&self) -> bool {
        self.threaded
    }

    pub(crate) fn events(&self) -> bool {
        self.events
    }

    pub(crate) fn client_version(&self) -> Version {
        self.client_version
    }

    pub(crate) fn features(&self) -> &Features {
        &self.features
    }

    pub(crate) fn counters(&self) -> &HandleCounters {
        &self.counters
    }

    pub(crate) fn formats(&self) -> FormatDefaults {
        self.formats.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub(crate) fn set_format(&self, kind: FormatType, fmt: &str) {
        self.formats
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .set(kind, fmt);
    }

    pub(crate) fn conn_registry(&self) -> &Mutex<Vec<Weak<ConnInner>>> {
        &self.conn_registry
    }

    pub(crate) fn ha_handler(&self) -> &Mutex<Option<HaHandler>> {
        &self.ha_handler
    }

    pub(crate) fn require(&self, available: bool, feature: &str) -> Result<()> {
        if available {
            Ok(())
        } else {
            Err(Error::not_available(feature))
        }
    }

    /// Common status check used by `chkerr!`. Warnings are recorded and do
    /// not fail the call.
    pub(crate) fn check(
        &self,
        errhp: *mut OCIError,
        status: sword,
        fn_name: &'static str,
    ) -> Result<()> {
        match status {
            OCI_SUCCESS => Ok(()),
            OCI_SUCCESS_WITH_INFO => {
                let warning = fetch_dberr(&self.fns, errhp, self.charset, fn_name);
                log::warn!("{}: {}", fn_name, warning.message());
                *self.last_warning.lock().unwrap_or_else(|e| e.into_inner()) = Some(warning);
                Ok(())
            }
            OCI_INVALID_HANDLE => Err(Error::internal(format!(
                "{} reported an invalid handle",
                fn_name
            ))),
            _ => Err(Error::oci(fetch_dberr(&self.fns, errhp, self.charset, fn_name))),
        }
    }

    pub(crate) fn last_warning(&self) -> Option<DbError> {
        self.last_warning
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    //
    // attribute helpers
    //

    pub(crate) fn attr_get_ub4(
        &self,
        hndl: *const std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        errhp: *mut OCIError,
    ) -> Result<ub4> {
        let mut value: ub4 = 0;
        crate::error::chkerr!(
            self,
            errhp,
            OCIAttrGet(
                hndl,
                htype,
                &mut value as *mut ub4 as *mut _,
                ptr::null_mut(),
                attr,
                errhp
            )
        );
        Ok(value)
    }

    pub(crate) fn attr_get_ub2(
        &self,
        hndl: *const std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        errhp: *mut OCIError,
    ) -> Result<ub2> {
        let mut value: ub2 = 0;
        crate::error::chkerr!(
            self,
            errhp,
            OCIAttrGet(
                hndl,
                htype,
                &mut value as *mut ub2 as *mut _,
                ptr::null_mut(),
                attr,
                errhp
            )
        );
        Ok(value)
    }

    pub(crate) fn attr_get_ub1(
        &self,
        hndl: *const std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        errhp: *mut OCIError,
    ) -> Result<ub1> {
        let mut value: ub1 = 0;
        crate::error::chkerr!(
            self,
            errhp,
            OCIAttrGet(
                hndl,
                htype,
                &mut value as *mut ub1 as *mut _,
                ptr::null_mut(),
                attr,
                errhp
            )
        );
        Ok(value)
    }

    pub(crate) fn attr_get_sb2(
        &self,
        hndl: *const std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        errhp: *mut OCIError,
    ) -> Result<sb2> {
        let mut value: sb2 = 0;
        crate::error::chkerr!(
            self,
            errhp,
            OCIAttrGet(
                hndl,
                htype,
                &mut value as *mut sb2 as *mut _,
                ptr::null_mut(),
                attr,
                errhp
            )
        );
        Ok(value)
    }

    pub(crate) fn attr_get_ub8(
        &self,
        hndl: *const std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        errhp: *mut OCIError,
    ) -> Result<ub8> {
        let mut value: ub8 = 0;
        crate::error::chkerr!(
            self,
            errhp,
            OCIAttrGet(
                hndl,
                htype,
                &mut value as *mut ub8 as *mut _,
                ptr::null_mut(),
                attr,
                errhp
            )
        );
        Ok(value)
    }

    pub(crate) fn attr_get_ptr(
        &self,
        hndl: *const std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        errhp: *mut OCIError,
    ) -> Result<*mut std::os::raw::c_void> {
        let mut value: *mut std::os::raw::c_void = ptr::null_mut();
        crate::error::chkerr!(
            self,
            errhp,
            OCIAttrGet(
                hndl,
                htype,
                &mut value as *mut *mut _ as *mut _,
                ptr::null_mut(),
                attr,
                errhp
            )
        );
        Ok(value)
    }

    /// Reads a string attribute. OCI hands back a pointer into handle-owned
    /// memory plus a byte length.
    ///
    /// In UTF-16 mode some client versions return narrow buffers for string
    /// attributes; the demotion heuristic papers over that. Column names
    /// only get it when `OCILIB_WORKAROUND_UTF16_COLUMN_NAME` asks for it,
    /// since well-behaved clients return them wide.
    pub(crate) fn attr_get_text(
        &self,
        hndl: *const std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        errhp: *mut OCIError,
    ) -> Result<String> {
        let mut value: *mut OraText = ptr::null_mut();
        let mut len: ub4 = 0;
        crate::error::chkerr!(
            self,
            errhp,
            OCIAttrGet(
                hndl,
                htype,
                &mut value as *mut *mut OraText as *mut _,
                &mut len,
                attr,
                errhp
            )
        );
        if value.is_null() || len == 0 {
            return Ok(String::new());
        }
        let bytes = unsafe { std::slice::from_raw_parts(value, len as usize) };
        let demote = attr != OCI_ATTR_NAME || self.utf16_column_name_workaround;
        if demote {
            Ok(attr_text_to_string(self.charset, bytes))
        } else {
            Ok(self.charset.text_to_string(bytes))
        }
    }

    pub(crate) fn attr_set_ub4(
        &self,
        hndl: *mut std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        value: ub4,
        errhp: *mut OCIError,
    ) -> Result<()> {
        let mut value = value;
        crate::error::chkerr!(
            self,
            errhp,
            OCIAttrSet(
                hndl,
                htype,
                &mut value as *mut ub4 as *mut _,
                0,
                attr,
                errhp
            )
        );
        Ok(())
    }

    pub(crate) fn attr_set_sb4(
        &self,
        hndl: *mut std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        value: sb4,
        errhp: *mut OCIError,
    ) -> Result<()> {
        let mut value = value;
        crate::error::chkerr!(
            self,
            errhp,
            OCIAttrSet(
                hndl,
                htype,
                &mut value as *mut sb4 as *mut _,
                0,
                attr,
                errhp
            )
        );
        Ok(())
    }

    pub(crate) fn attr_set_ptr(
        &self,
        hndl: *mut std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        value: *mut std::os::raw::c_void,
        errhp: *mut OCIError,
    ) -> Result<()> {
        crate::error::chkerr!(self, errhp, OCIAttrSet(hndl, htype, value, 0, attr, errhp));
        Ok(())
    }

    pub(crate) fn attr_set_text(
        &self,
        hndl: *mut std::os::raw::c_void,
        htype: ub4,
        attr: ub4,
        value: &str,
        errhp: *mut OCIError,
    ) -> Result<()> {
        let mut text = OciString::new(value, self.charset);
        crate::error::chkerr!(
            self,
            errhp,
            OCIAttrSet(
                hndl,
                htype,
                text.as_mut_ptr() as *mut _,
                text.len(),
                attr,
                errhp
            )
        );
        Ok(())
    }

    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(Error::new(
                crate::ErrorKind::AlreadyInitialized,
                "the driver environment is already cleaned up",
            ));
        }
        log::debug!(
            "closing the driver environment (threaded={}, events={})",
            self.threaded(),
            self.events()
        );
        let (handles, descriptors, objects) = self.counters.snapshot();
        if let Some(f) = self.fns.OCIHandleFree {
            unsafe { f(self.errhp as *mut _, OCI_HTYPE_ERROR) };
            unsafe { f(self.envhp as *mut _, OCI_HTYPE_ENV) };
        }
        if let Some(f) = self.fns.OCITerminate {
            unsafe { f(OCI_DEFAULT) };
        }
        if handles + descriptors + objects != 0 {
            log::warn!(
                "cleanup with live allocations: {} handles, {} descriptors, {} objects",
                handles,
                descriptors,
                objects
            );
            return Err(Error::new(
                crate::ErrorKind::UnfreedData,
                format!(
                    "cleanup with live allocations: {} handles, {} descriptors, {} objects",
                    handles, descriptors, objects
                ),
            ));
        }
        Ok(())
    }
}

/// Returns the version of the loaded Oracle client.
///
/// # Examples
///
/// ```no_run
/// let client_ver = ocilib::client_version()?;
/// println!("Oracle Client Version: {}", client_ver);
/// # Ok::<(), ocilib::Error>(())
/// ```
pub fn client_version() -> Result<Version> {
    Ok(Context::get()?.client_version())
}

/// Returns the warning recorded by the most recent call that completed with
/// `OCI_SUCCESS_WITH_INFO`.
pub fn last_warning() -> Option<DbError> {
    match Context::get() {
        Ok(ctxt) => ctxt.last_warning(),
        Err(_) => None,
    }
}

/// Sets one of the process-wide conversion formats.
pub fn set_format(kind: FormatType, fmt: &str) -> Result<()> {
    Context::get()?.set_format(kind, fmt);
    Ok(())
}

/// Reads one of the process-wide conversion formats.
pub fn format(kind: FormatType) -> Result<String> {
    Ok(Context::get()?.formats().get(kind).to_string())
}

/// Tears the environment down.
///
/// Every handle still allocated is reported through
/// [`crate::ErrorKind::UnfreedData`]; teardown completes either way. The
/// environment cannot be re-initialized afterwards.
pub fn cleanup() -> Result<()> {
    let ctxt = CONTEXT.get().ok_or_else(Error::not_initialized)?;
    ctxt.close()
}

/// Installs the process-wide high-availability event handler.
///
/// Requires an environment initialized with [`InitParams::events`]. The
/// handler runs on the client library's notification thread, once per
/// registered connection whose server matches the event.
pub fn set_ha_handler<F>(handler: F) -> Result<()>
where
    F: Fn(&Connection, HaEventSource, HaEventStatus, Option<Timestamp>) + Send + Sync + 'static,
{
    let ctxt = Context::get()?;
    ctxt.require(ctxt.events(), "HA events")?;
    crate::subscr::install_ha_callback(ctxt)?;
    *ctxt.ha_handler().lock().unwrap_or_else(|e| e.into_inner()) = Some(Box::new(handler));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_match_documented_values() {
        let fmts = FormatDefaults::default();
        assert_eq!(fmts.get(FormatType::Date), "YYYY-MM-DD HH24:MI:SS");
        assert_eq!(fmts.get(FormatType::Timestamp), "YYYY-MM-DD HH24:MI:SS.FF");
        assert_eq!(
            fmts.get(FormatType::TimestampTz),
            "YYYY-MM-DD HH24:MI:SS.FF TZR"
        );
        assert!(fmts.get(FormatType::Number).starts_with("FM9"));
        assert_eq!(fmts.get(FormatType::BinaryDouble), "%lf");
        assert_eq!(fmts.get(FormatType::BinaryFloat), "%f");
    }

    #[test]
    fn format_override() {
        let mut fmts = FormatDefaults::default();
        fmts.set(FormatType::Date, "DD/MM/YYYY");
        assert_eq!(fmts.get(FormatType::Date), "DD/MM/YYYY");
        assert_eq!(fmts.get(FormatType::Timestamp), "YYYY-MM-DD HH24:MI:SS.FF");
    }
}
