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

use std::error;
use std::fmt;
use std::ptr;

use crate::binding::*;
use crate::util::Charset;

/// Enum listing error categories raised by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Error reported by the Oracle server or client library
    OciError,
    /// An API was used before the environment was initialized
    NotInitialized,
    /// The environment was initialized twice
    AlreadyInitialized,
    /// The Oracle client shared library could not be opened
    LibraryLoad,
    /// The Oracle client library misses baseline entry points
    SymbolLoad,
    /// NULL value fetched into a non-optional rust type
    NullValue,
    /// An argument failed validation
    InvalidArgument,
    /// An index or size is outside its valid range
    OutOfRange,
    /// An OCI handle or descriptor could not be allocated
    OutOfMemory,
    /// The feature requires a newer Oracle client
    NotAvailable,
    /// The column or attribute datatype has no driver mapping
    UnsupportedType,
    /// Conversion between two types is not allowed
    InvalidTypeConversion,
    /// A placeholder was re-bound with an incompatible datatype
    RebindMismatch,
    /// An object attribute name was not found
    AttrNotFound,
    /// A column index is out of range (zero based)
    InvalidColumnIndex,
    /// A column name is not in the select list
    InvalidColumnName,
    /// A bind index is out of range (one based)
    InvalidBindIndex,
    /// A bind placeholder name is not in the SQL text
    InvalidBindName,
    /// A named item (queue, table, type) was not found
    ItemNotFound,
    /// Iteration or indexed access found no data
    NoDataFound,
    /// The statement is not in the state required by the call
    InvalidStatementState,
    /// The statement was not prepared in scrollable mode
    NotScrollable,
    /// The bind placeholder is already in use
    BindAlreadyUsed,
    /// The bind array is smaller than the requested iteration count
    BindArraySize,
    /// The direct-path handle is not in the state required by the call
    InvalidDirPathState,
    /// A distributed transaction id is malformed
    InvalidXid,
    /// Handles or descriptors were still allocated at teardown
    UnfreedData,
    /// A wait bounded by a timeout expired
    Timeout,
    /// Internal error. Please report it with a reproducer.
    Internal,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::OciError => "OCI error",
            ErrorKind::NotInitialized => "not initialized",
            ErrorKind::AlreadyInitialized => "already initialized",
            ErrorKind::LibraryLoad => "error loading the Oracle client library",
            ErrorKind::SymbolLoad => "error resolving Oracle client symbols",
            ErrorKind::NullValue => "NULL value found",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::OutOfRange => "out of range",
            ErrorKind::OutOfMemory => "out of memory",
            ErrorKind::NotAvailable => "feature not available",
            ErrorKind::UnsupportedType => "unsupported datatype",
            ErrorKind::InvalidTypeConversion => "invalid type conversion",
            ErrorKind::RebindMismatch => "rebind with incompatible datatype",
            ErrorKind::AttrNotFound => "attribute not found",
            ErrorKind::InvalidColumnIndex => "invalid column index",
            ErrorKind::InvalidColumnName => "invalid column name",
            ErrorKind::InvalidBindIndex => "invalid bind index",
            ErrorKind::InvalidBindName => "invalid bind name",
            ErrorKind::ItemNotFound => "item not found",
            ErrorKind::NoDataFound => "no data found",
            ErrorKind::InvalidStatementState => "invalid statement state",
            ErrorKind::NotScrollable => "statement is not scrollable",
            ErrorKind::BindAlreadyUsed => "bind already used",
            ErrorKind::BindArraySize => "bind array too small",
            ErrorKind::InvalidDirPathState => "invalid direct-path state",
            ErrorKind::InvalidXid => "invalid transaction id",
            ErrorKind::UnfreedData => "unfreed handles at cleanup",
            ErrorKind::Timeout => "timed out",
            ErrorKind::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error when parsing a string into an Oracle type fails.
#[derive(Eq, PartialEq, Clone)]
pub struct ParseOracleTypeError {
    typename: &'static str,
}

impl ParseOracleTypeError {
    pub fn new(typename: &'static str) -> ParseOracleTypeError {
        ParseOracleTypeError { typename }
    }
}

impl fmt::Display for ParseOracleTypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} parse error", self.typename)
    }
}

impl fmt::Debug for ParseOracleTypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ParseOracleTypeError({})", self.typename)
    }
}

impl error::Error for ParseOracleTypeError {}

impl From<ParseOracleTypeError> for Error {
    fn from(err: ParseOracleTypeError) -> Self {
        Error::new(ErrorKind::InvalidTypeConversion, err.to_string()).add_source(err)
    }
}

/// Oracle database error fetched through `OCIErrorGet`
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct DbError {
    code: i32,
    offset: u32,
    message: String,
    fn_name: &'static str,
}

impl DbError {
    pub(crate) fn new(code: i32, offset: u32, message: String, fn_name: &'static str) -> DbError {
        DbError {
            code,
            offset,
            message,
            fn_name,
        }
    }

    /// Oracle error code such as `942` for ORA-00942
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Parse error offset
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// OCI function name which failed
    pub fn fn_name(&self) -> &str {
        self.fn_name
    }
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Error type of this crate
pub struct Error {
    kind: ErrorKind,
    message: String,
    dberr: Option<DbError>,
    source: Option<Box<dyn error::Error + Send + Sync>>,
}

/// A specialized result type whose error type is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn new<M>(kind: ErrorKind, message: M) -> Error
    where
        M: Into<String>,
    {
        Error {
            kind,
            message: message.into(),
            dberr: None,
            source: None,
        }
    }

    pub(crate) fn with_dberr(mut self, dberr: DbError) -> Error {
        self.dberr = Some(dberr);
        self
    }

    pub(crate) fn add_source<E>(mut self, source: E) -> Error
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        self.source = Some(source.into());
        self
    }

    pub(crate) fn oci(dberr: DbError) -> Error {
        Error::new(ErrorKind::OciError, dberr.message().to_string()).with_dberr(dberr)
    }

    pub(crate) fn not_initialized() -> Error {
        Error::new(
            ErrorKind::NotInitialized,
            "the driver environment is not initialized",
        )
    }

    pub(crate) fn not_available(feature: &str) -> Error {
        Error::new(
            ErrorKind::NotAvailable,
            format!(
                "{} requires a newer Oracle client than the loaded one",
                feature
            ),
        )
    }

    pub(crate) fn null_value() -> Error {
        Error::new(ErrorKind::NullValue, "NULL value found")
    }

    pub(crate) fn invalid_argument<M>(message: M) -> Error
    where
        M: Into<String>,
    {
        Error::new(ErrorKind::InvalidArgument, message)
    }

    pub(crate) fn out_of_range<M>(message: M) -> Error
    where
        M: Into<String>,
    {
        Error::new(ErrorKind::OutOfRange, message)
    }

    pub(crate) fn out_of_memory(what: &str) -> Error {
        Error::new(ErrorKind::OutOfMemory, format!("failed to allocate {}", what))
    }

    pub(crate) fn unsupported_type<M>(message: M) -> Error
    where
        M: Into<String>,
    {
        Error::new(ErrorKind::UnsupportedType, message)
    }

    pub(crate) fn invalid_type_conversion(from: &str, to: &str) -> Error {
        Error::new(
            ErrorKind::InvalidTypeConversion,
            format!("invalid conversion from {} to {}", from, to),
        )
    }

    pub(crate) fn invalid_bind_index(index: usize) -> Error {
        Error::new(
            ErrorKind::InvalidBindIndex,
            format!("invalid bind index (one-based): {}", index),
        )
    }

    pub(crate) fn invalid_bind_name(name: &str) -> Error {
        Error::new(
            ErrorKind::InvalidBindName,
            format!("invalid bind name: {}", name),
        )
    }

    pub(crate) fn invalid_column_index(index: usize) -> Error {
        Error::new(
            ErrorKind::InvalidColumnIndex,
            format!("invalid column index (zero-based): {}", index),
        )
    }

    pub(crate) fn invalid_column_name(name: &str) -> Error {
        Error::new(
            ErrorKind::InvalidColumnName,
            format!("invalid column name: {}", name),
        )
    }

    pub(crate) fn attr_not_found(name: &str) -> Error {
        Error::new(
            ErrorKind::AttrNotFound,
            format!("attribute not found: {}", name),
        )
    }

    pub(crate) fn no_data_found() -> Error {
        Error::new(ErrorKind::NoDataFound, "no data found")
    }

    pub(crate) fn invalid_state<M>(message: M) -> Error
    where
        M: Into<String>,
    {
        Error::new(ErrorKind::InvalidStatementState, message)
    }

    pub(crate) fn dirpath_state<M>(message: M) -> Error
    where
        M: Into<String>,
    {
        Error::new(ErrorKind::InvalidDirPathState, message)
    }

    pub(crate) fn internal<M>(message: M) -> Error
    where
        M: Into<String>,
    {
        Error::new(ErrorKind::Internal, message)
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Underlying database error, when the error came from Oracle
    pub fn db_error(&self) -> Option<&DbError> {
        self.dberr.as_ref()
    }

    /// Oracle error code; zero when the error was raised by the driver itself
    pub fn oci_code(&self) -> i32 {
        self.dberr.as_ref().map(|e| e.code()).unwrap_or(0)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ErrorKind::OciError => write!(f, "OCI Error: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error {{ kind: {:?}, message: {:?}", self.kind, self.message)?;
        if let Some(ref dberr) = self.dberr {
            write!(
                f,
                ", code: {}, offset: {}, fn_name: {}",
                dberr.code, dberr.offset, dberr.fn_name
            )?;
        }
        if let Some(ref source) = self.source {
            write!(f, ", source: {:?}", source)?;
        }
        write!(f, " }}")
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn error::Error + 'static))
    }
}

// Oracle recommends a 3072 byte buffer for OCIErrorGet.
const ERROR_BUF_LEN: usize = 3072;

/// Reads the first diagnostic record attached to `errhp`.
///
/// The message arrives in the environment charset, so the conversion must
/// honor the UTF-16 flag chosen at init.
pub(crate) fn fetch_dberr(
    fns: &EntryPoints,
    errhp: *mut OCIError,
    charset: Charset,
    fn_name: &'static str,
) -> DbError {
    let mut code: sb4 = 0;
    let mut buf = [0u8; ERROR_BUF_LEN];
    let message = match fns.OCIErrorGet {
        Some(f) => {
            unsafe {
                f(
                    errhp as *mut _,
                    1,
                    ptr::null_mut(),
                    &mut code,
                    buf.as_mut_ptr(),
                    buf.len() as ub4,
                    OCI_HTYPE_ERROR,
                )
            };
            charset.text_to_string_nt(&buf)
        }
        None => String::from("unknown error (OCIErrorGet unresolved)"),
    };
    DbError::new(code, 0, message, fn_name)
}

// Calls an OCI entry point, turning an unresolved symbol into NotAvailable.
// Returns the raw OCI status; use `chkerr!` when the status only needs the
// common success check.
macro_rules! oci_call {
    ($ctxt:expr, $name:ident($($arg:expr),* $(,)?)) => {
        match $ctxt.fns().$name {
            Some(f) => unsafe { f($($arg),*) },
            None => return Err($crate::Error::not_available(stringify!($name))),
        }
    };
}

macro_rules! chkerr {
    ($ctxt:expr, $errhp:expr, $name:ident($($arg:expr),* $(,)?)) => {{
        let status = match $ctxt.fns().$name {
            Some(f) => unsafe { f($($arg),*) },
            None => return Err($crate::Error::not_available(stringify!($name))),
        };
        $ctxt.check($errhp, status, stringify!($name))?;
    }};
}

pub(crate) use chkerr;
pub(crate) use oci_call;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_of_driver_errors() {
        let err = Error::invalid_bind_index(4);
        assert_eq!(err.to_string(), "invalid bind index (one-based): 4");
        assert_eq!(err.kind(), ErrorKind::InvalidBindIndex);
        assert_eq!(err.oci_code(), 0);
    }

    #[test]
    fn display_of_oci_errors() {
        let err = Error::oci(DbError::new(
            942,
            0,
            "ORA-00942: table or view does not exist".into(),
            "OCIStmtExecute",
        ));
        assert_eq!(
            err.to_string(),
            "OCI Error: ORA-00942: table or view does not exist"
        );
        assert_eq!(err.kind(), ErrorKind::OciError);
        assert_eq!(err.oci_code(), 942);
        assert_eq!(err.db_error().unwrap().fn_name(), "OCIStmtExecute");
    }

    #[test]
    fn source_chain() {
        let parse_err = "x".parse::<i32>().unwrap_err();
        let err = Error::invalid_type_conversion("VARCHAR2", "i32").add_source(parse_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
