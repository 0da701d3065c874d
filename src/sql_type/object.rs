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

//! Named-type values and references.

use std::fmt;
use std::os::raw::c_void;
use std::ptr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::context::Context;
use crate::error::chkerr;
use crate::sql_type::{FromSql, NativeType, OracleType, ToSql};
use crate::sql_value::{read_timestamp_descriptor, SqlValue};
use crate::type_info::TypeInfo;
use crate::{Error, Result};

/// Where the wrapped backend value came from; determines whether drop
/// releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueSource {
    /// Created by this driver; freed on drop
    Owned,
    /// Materialized out of a fetch buffer or a parent container; the owner
    /// frees it
    Fetched,
}

/// Value of a named Oracle object type
///
/// # Examples
///
/// ```no_run
/// # use ocilib::*;
/// # use ocilib::sql_type::Object;
/// # let conn = Connection::connect("scott", "tiger", "")?;
/// let objtype = conn.object_type("UDT_BOOK")?;
/// let mut obj = Object::new(&conn, &objtype)?;
/// obj.set("TITLE", &"Pebble in the Sky")?;
/// obj.set("PRICE", &17.0)?;
/// assert_eq!(obj.get::<String>("TITLE")?, "Pebble in the Sky");
/// # Ok::<(), Error>(())
/// ```
pub struct Object {
    conn: Arc<ConnInner>,
    type_info: Arc<TypeInfo>,
    instance: *mut c_void,
    null_struct: *mut c_void,
    source: ValueSource,
}

impl Object {
    /// Creates a new value instance of `type_info`.
    pub fn new(conn: &crate::Connection, type_info: &Arc<TypeInfo>) -> Result<Object> {
        let conn = conn.conn().clone();
        let ctxt = conn.ctxt();
        let errhp = conn.errhp();
        let mut instance: *mut c_void = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIObjectNew(
                ctxt.env_handle(),
                errhp,
                conn.svchp(),
                OCI_TYPECODE_OBJECT,
                type_info.tdo(),
                ptr::null_mut(),
                OCI_DURATION_SESSION,
                TRUE,
                &mut instance
            )
        );
        let mut null_struct: *mut c_void = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIObjectGetInd(ctxt.env_handle(), errhp, instance, &mut null_struct)
        );
        ctxt.counters().objects.fetch_add(1, Ordering::Relaxed);
        Ok(Object {
            conn,
            type_info: type_info.clone(),
            instance,
            null_struct,
            source: ValueSource::Owned,
        })
    }

    pub(crate) fn from_instance(
        conn: Arc<ConnInner>,
        type_info: Arc<TypeInfo>,
        instance: *mut c_void,
        null_struct: *mut c_void,
        source: ValueSource,
    ) -> Object {
        Object {
            conn,
            type_info,
            instance,
            null_struct,
            source,
        }
    }

    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.type_info
    }

    pub(crate) fn instance(&self) -> *mut c_void {
        self.instance
    }

    pub(crate) fn null_struct(&self) -> *mut c_void {
        self.null_struct
    }

    fn attr_type(&self, name: &str) -> Result<OracleType> {
        let idx = self.type_info.column_index(name)?;
        Ok(self.type_info.columns()[idx].oracle_type().clone())
    }

    /// Reads one attribute, converting it to a rust type.
    pub fn get<T>(&self, name: &str) -> Result<T>
    where
        T: FromSql,
    {
        let oratype = self.attr_type(name)?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let attr_text = ctxt.charset().string_to_text(&name.to_uppercase());
        let names = [attr_text.as_ptr()];
        let lengths = [attr_text.len() as ub4];
        let mut attr_null: OCIInd = OCI_IND_NOTNULL;
        let mut attr_null_struct: *mut c_void = ptr::null_mut();
        let mut attr_value: *mut c_void = ptr::null_mut();
        let mut attr_tdo: *mut OCIType = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIObjectGetAttr(
                ctxt.env_handle(),
                errhp,
                self.instance,
                self.null_struct,
                self.type_info.tdo(),
                names.as_ptr(),
                lengths.as_ptr(),
                1,
                ptr::null(),
                0,
                &mut attr_null,
                &mut attr_null_struct,
                &mut attr_value,
                &mut attr_tdo
            )
        );
        let value = element_to_sql_value(
            &self.conn,
            &oratype,
            attr_value,
            attr_null_struct,
            attr_null,
        )?;
        T::from_sql(&value)
    }

    /// Writes one attribute.
    pub fn set(&mut self, name: &str, value: &dyn ToSql) -> Result<()> {
        let oratype = self.attr_type(name)?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut tmp = SqlValue::new(self.conn.clone(), &oratype, 1)?;
        value.to_sql(&mut tmp)?;
        let repr = ElementRepr::from_sql_value(tmp)?;
        let attr_text = ctxt.charset().string_to_text(&name.to_uppercase());
        let names = [attr_text.as_ptr()];
        let lengths = [attr_text.len() as ub4];
        chkerr!(
            ctxt,
            errhp,
            OCIObjectSetAttr(
                ctxt.env_handle(),
                errhp,
                self.instance,
                self.null_struct,
                self.type_info.tdo(),
                names.as_ptr(),
                lengths.as_ptr(),
                1,
                ptr::null(),
                0,
                repr.indicator(),
                repr.null_struct(),
                repr.value_ptr()
            )
        );
        Ok(())
    }

    /// Copies `src` into this object by value and drops any cached child
    /// state.
    pub fn assign(&mut self, src: &Object) -> Result<()> {
        if self.type_info.as_ref() != src.type_info.as_ref() {
            return Err(Error::invalid_type_conversion(
                src.type_info.name(),
                self.type_info.name(),
            ));
        }
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCIObjectCopy(
                ctxt.env_handle(),
                errhp,
                self.conn.svchp(),
                src.instance,
                src.null_struct,
                self.instance,
                self.null_struct,
                self.type_info.tdo(),
                OCI_DURATION_SESSION,
                OCI_OBJECTCOPY_NONE
            )
        );
        Ok(())
    }

    /// Deep copy into a fresh owned instance.
    pub(crate) fn duplicate(&self) -> Result<Object> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut instance: *mut c_void = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIObjectNew(
                ctxt.env_handle(),
                errhp,
                self.conn.svchp(),
                OCI_TYPECODE_OBJECT,
                self.type_info.tdo(),
                ptr::null_mut(),
                OCI_DURATION_SESSION,
                TRUE,
                &mut instance
            )
        );
        let mut null_struct: *mut c_void = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIObjectGetInd(ctxt.env_handle(), errhp, instance, &mut null_struct)
        );
        ctxt.counters().objects.fetch_add(1, Ordering::Relaxed);
        let mut copy = Object::from_instance(
            self.conn.clone(),
            self.type_info.clone(),
            instance,
            null_struct,
            ValueSource::Owned,
        );
        copy.assign(self)?;
        Ok(copy)
    }

    /// Materializes a REF pointing at this object.
    pub fn self_ref(&self) -> Result<Ref> {
        let mut r = Ref::new(&self.conn, &self.type_info)?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCIObjectGetObjectRef(ctxt.env_handle(), errhp, self.instance, r.raw())
        );
        Ok(r)
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        if self.source == ValueSource::Owned {
            let ctxt = self.conn.ctxt();
            if let Some(f) = ctxt.fns().OCIObjectFree {
                unsafe {
                    f(
                        ctxt.env_handle(),
                        self.conn.errhp(),
                        self.instance,
                        OCI_OBJECTFREE_FORCE,
                    )
                };
            }
            ctxt.counters().objects.fetch_sub(1, Ordering::Relaxed);
        }
    }
}

impl FromSql for Object {
    fn from_sql(val: &SqlValue) -> Result<Object> {
        let type_info = match val.native() {
            NativeType::Object(ti) => ti.clone(),
            _ => {
                return Err(Error::invalid_type_conversion(
                    &val.oracle_type().to_string(),
                    "Object",
                ))
            }
        };
        let (instance, ind) = val.object_instance()?;
        Ok(Object::from_instance(
            val.conn().clone(),
            type_info,
            instance,
            ind,
            ValueSource::Fetched,
        ))
    }
}

impl ToSql for Object {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::Object(self.type_info.clone()))
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_object_instance(self.instance, self.null_struct)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Object({})", self.type_info.name())
    }
}

/// Database reference to an object instance
///
/// Two states: unpinned (carries the REF only) and pinned (additionally
/// holds a usable [`Object`], materialized lazily by [`Ref::object`]).
pub struct Ref {
    conn: Arc<ConnInner>,
    type_info: Arc<TypeInfo>,
    ref_: *mut OCIRef,
    pinned: Option<*mut c_void>,
    source: ValueSource,
}

impl Ref {
    pub(crate) fn new(conn: &Arc<ConnInner>, type_info: &Arc<TypeInfo>) -> Result<Ref> {
        let ctxt = conn.ctxt();
        let errhp = conn.errhp();
        let mut instance: *mut c_void = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIObjectNew(
                ctxt.env_handle(),
                errhp,
                conn.svchp(),
                OCI_TYPECODE_REF,
                ptr::null_mut(),
                ptr::null_mut(),
                OCI_DURATION_SESSION,
                TRUE,
                &mut instance
            )
        );
        ctxt.counters().objects.fetch_add(1, Ordering::Relaxed);
        Ok(Ref {
            conn: conn.clone(),
            type_info: type_info.clone(),
            ref_: instance as *mut OCIRef,
            pinned: None,
            source: ValueSource::Owned,
        })
    }

    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.type_info
    }

    pub(crate) fn raw(&self) -> *mut OCIRef {
        self.ref_
    }

    pub fn is_null(&self) -> Result<bool> {
        let ctxt = self.conn.ctxt();
        let is_null = crate::error::oci_call!(ctxt, OCIRefIsNull(ctxt.env_handle(), self.ref_));
        Ok(is_null != 0)
    }

    /// Pins the referenced object, lazily on first access.
    pub fn object(&mut self) -> Result<Object> {
        if self.is_null()? {
            return Err(Error::null_value());
        }
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let instance = match self.pinned {
            Some(p) => p,
            None => {
                let mut instance: *mut c_void = ptr::null_mut();
                chkerr!(
                    ctxt,
                    errhp,
                    OCIObjectPin(
                        ctxt.env_handle(),
                        errhp,
                        self.ref_,
                        ptr::null_mut(),
                        OCI_PIN_ANY,
                        OCI_DURATION_SESSION,
                        OCI_LOCK_NONE,
                        &mut instance
                    )
                );
                self.pinned = Some(instance);
                instance
            }
        };
        let mut null_struct: *mut c_void = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIObjectGetInd(ctxt.env_handle(), errhp, instance, &mut null_struct)
        );
        Ok(Object::from_instance(
            self.conn.clone(),
            self.type_info.clone(),
            instance,
            null_struct,
            ValueSource::Fetched,
        ))
    }

    fn unpin(&mut self) {
        if let Some(instance) = self.pinned.take() {
            let ctxt = self.conn.ctxt();
            if let Some(f) = ctxt.fns().OCIObjectUnpin {
                unsafe { f(ctxt.env_handle(), self.conn.errhp(), instance) };
            }
        }
    }

    /// Unpins and clears the REF.
    pub fn set_null(&mut self) -> Result<()> {
        self.unpin();
        let ctxt = self.conn.ctxt();
        chkerr!(
            ctxt,
            self.conn.errhp(),
            OCIRefClear(ctxt.env_handle(), self.ref_)
        );
        Ok(())
    }

    /// Copies the REF of `src`, invalidating the pinned object if any.
    pub fn assign(&mut self, src: &Ref) -> Result<()> {
        self.unpin();
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCIRefAssign(ctxt.env_handle(), errhp, src.ref_, &mut self.ref_)
        );
        Ok(())
    }

    /// Hexadecimal representation of the REF.
    pub fn hex(&self) -> Result<String> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut buf = vec![0u8; 512];
        let mut len = buf.len() as ub4;
        chkerr!(
            ctxt,
            errhp,
            OCIRefToHex(ctxt.env_handle(), errhp, self.ref_, buf.as_mut_ptr(), &mut len)
        );
        Ok(String::from_utf8_lossy(&buf[..len as usize]).into_owned())
    }
}

impl Drop for Ref {
    fn drop(&mut self) {
        self.unpin();
        if self.source == ValueSource::Owned {
            let ctxt = self.conn.ctxt();
            if let Some(f) = ctxt.fns().OCIObjectFree {
                unsafe {
                    f(
                        ctxt.env_handle(),
                        self.conn.errhp(),
                        self.ref_ as *mut c_void,
                        OCI_OBJECTFREE_FORCE,
                    )
                };
            }
            ctxt.counters().objects.fetch_sub(1, Ordering::Relaxed);
        }
    }
}

impl FromSql for Ref {
    fn from_sql(val: &SqlValue) -> Result<Ref> {
        let type_info = match val.native() {
            NativeType::Ref(ti) => ti.clone(),
            _ => {
                return Err(Error::invalid_type_conversion(
                    &val.oracle_type().to_string(),
                    "Ref",
                ))
            }
        };
        // take a private copy so the wrapper survives the next fetch
        let src = val.ref_instance()?;
        let mut r = Ref::new(val.conn(), &type_info)?;
        let ctxt = r.conn.ctxt();
        let errhp = r.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCIRefAssign(ctxt.env_handle(), errhp, src, &mut r.ref_)
        );
        Ok(r)
    }
}

impl ToSql for Ref {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::Ref(self.type_info.clone()))
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_ref_instance(self.ref_)
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Ref({}, {})",
            self.type_info.name(),
            if self.pinned.is_some() {
                "pinned"
            } else {
                "unpinned"
            }
        )
    }
}

/// Converts an attribute or collection-element slot into a one-row
/// [`SqlValue`] readable through the common accessors.
///
/// `value_ptr` follows the OCI object layout: inline structs for NUMBER and
/// DATE, pointers to `OCIString`/`OCIRaw`/descriptors for the rest.
pub(crate) fn element_to_sql_value(
    conn: &Arc<ConnInner>,
    oratype: &OracleType,
    value_ptr: *mut c_void,
    null_struct: *mut c_void,
    indicator: OCIInd,
) -> Result<SqlValue> {
    let ctxt = conn.ctxt();
    let mut out = SqlValue::new(conn.clone(), oratype, 1)?;
    if indicator == OCI_IND_NULL || value_ptr.is_null() {
        out.set_null()?;
        return Ok(out);
    }
    match oratype.native_type() {
        NativeType::Number => {
            let num = unsafe { *(value_ptr as *const OCINumber) };
            out.set_number_raw(num.bytes)?;
        }
        NativeType::Char => {
            let vs = unsafe { *(value_ptr as *mut *mut OCIString) };
            out.set_string(&oci_string_to_rust(ctxt, vs)?)?;
        }
        NativeType::Raw => {
            let raw = unsafe { *(value_ptr as *mut *mut OCIRaw) };
            let bytes = oci_raw_to_bytes(ctxt, raw)?;
            out.set_bytes(&bytes)?;
        }
        NativeType::Date => {
            let date = unsafe { *(value_ptr as *const OCIDate) };
            out.set_oci_date(date)?;
        }
        NativeType::Timestamp(dtype) => {
            let dt = unsafe { *(value_ptr as *mut *mut OCIDateTime) };
            let ts = read_timestamp_descriptor(
                ctxt,
                conn.errhp(),
                dt,
                dtype != OCI_DTYPE_TIMESTAMP,
            )?;
            out.set_timestamp(&ts)?;
        }
        NativeType::IntervalDS | NativeType::IntervalYM => {
            let iv = unsafe { *(value_ptr as *mut *mut OCIInterval) };
            read_interval_into(conn, iv, &mut out)?;
        }
        NativeType::Lob(_) => {
            let locator = unsafe { *(value_ptr as *mut *mut OCILobLocator) };
            out.set_lob_locator(locator)?;
        }
        NativeType::Object(_) => {
            out.set_object_instance(value_ptr, null_struct)?;
        }
        NativeType::Ref(_) => {
            let r = unsafe { *(value_ptr as *mut *mut OCIRef) };
            out.set_ref_instance(r)?;
        }
        other => {
            return Err(Error::unsupported_type(format!(
                "attribute representation {:?} is not supported",
                other
            )))
        }
    }
    Ok(out)
}

fn read_interval_into(conn: &Arc<ConnInner>, iv: *mut OCIInterval, out: &mut SqlValue) -> Result<()> {
    let ctxt = conn.ctxt();
    let errhp = conn.errhp();
    let env = ctxt.env_handle() as *mut c_void;
    match out.native() {
        NativeType::IntervalDS => {
            let (mut dy, mut hr, mut mm, mut ss, mut fsec) = (0, 0, 0, 0, 0);
            chkerr!(
                ctxt,
                errhp,
                OCIIntervalGetDaySecond(env, errhp, &mut dy, &mut hr, &mut mm, &mut ss, &mut fsec, iv)
            );
            let value = crate::sql_type::IntervalDS::new(dy, hr, mm, ss, fsec)?;
            out.set_interval_ds(&value)
        }
        _ => {
            let (mut yr, mut mnth) = (0, 0);
            chkerr!(
                ctxt,
                errhp,
                OCIIntervalGetYearMonth(env, errhp, &mut yr, &mut mnth, iv)
            );
            let value = crate::sql_type::IntervalYM::new(yr, mnth)?;
            out.set_interval_ym(&value)
        }
    }
}

pub(crate) fn oci_string_to_rust(ctxt: &'static Context, vs: *mut OCIString) -> Result<String> {
    let ptr_ = crate::error::oci_call!(ctxt, OCIStringPtr(ctxt.env_handle(), vs));
    let size = crate::error::oci_call!(ctxt, OCIStringSize(ctxt.env_handle(), vs));
    if ptr_.is_null() {
        return Ok(String::new());
    }
    let bytes = unsafe { std::slice::from_raw_parts(ptr_, size as usize) };
    Ok(ctxt.charset().text_to_string(bytes))
}

pub(crate) fn oci_raw_to_bytes(ctxt: &'static Context, raw: *mut OCIRaw) -> Result<Vec<u8>> {
    let ptr_ = crate::error::oci_call!(ctxt, OCIRawPtr(ctxt.env_handle(), raw));
    let size = crate::error::oci_call!(ctxt, OCIRawSize(ctxt.env_handle(), raw));
    if ptr_.is_null() {
        return Ok(Vec::new());
    }
    Ok(unsafe { std::slice::from_raw_parts(ptr_, size as usize) }.to_vec())
}

/// Wire representation of one element or attribute handed to
/// `OCICollAssignElem`, `OCICollAppend` or `OCIObjectSetAttr`.
///
/// Owns the source buffer and the temporaries, so every pointer it exposes
/// stays valid for as long as the repr lives.
pub(crate) struct ElementRepr {
    value: ElementValue,
    indicator: OCIInd,
    null_struct: *mut c_void,
    #[allow(dead_code)] // keeps descriptor/locator pointers alive
    source: SqlValue,
}

enum ElementValue {
    Null,
    Number(OCINumber),
    Date(OCIDate),
    OciString(TempOciString),
    OciRaw(TempOciRaw),
    Pointer(*mut c_void),
}

impl ElementRepr {
    pub(crate) fn from_sql_value(val: SqlValue) -> Result<ElementRepr> {
        let ctxt = val.conn().ctxt();
        if val.is_null()? {
            return Ok(ElementRepr {
                value: ElementValue::Null,
                indicator: OCI_IND_NULL,
                null_struct: ptr::null_mut(),
                source: val,
            });
        }
        let (value, null_struct) = match val.native() {
            NativeType::Number => (
                ElementValue::Number(unsafe { *val.number_ptr()? }),
                ptr::null_mut(),
            ),
            NativeType::Date => (
                ElementValue::Date(unsafe { *val.date_ptr()? }),
                ptr::null_mut(),
            ),
            NativeType::Char => {
                let s = val.get_string()?;
                (
                    ElementValue::OciString(TempOciString::new(ctxt, val.conn().errhp(), &s)?),
                    ptr::null_mut(),
                )
            }
            NativeType::Raw => {
                let bytes = val.get_bytes()?;
                (
                    ElementValue::OciRaw(TempOciRaw::new(ctxt, val.conn().errhp(), &bytes)?),
                    ptr::null_mut(),
                )
            }
            NativeType::Timestamp(_) | NativeType::IntervalDS | NativeType::IntervalYM => {
                (ElementValue::Pointer(val.descriptor_ptr()?), ptr::null_mut())
            }
            NativeType::Lob(_) => (
                ElementValue::Pointer(val.lob_locator()? as *mut c_void),
                ptr::null_mut(),
            ),
            NativeType::Object(_) => {
                let (instance, ind) = val.object_instance()?;
                (ElementValue::Pointer(instance), ind)
            }
            NativeType::Ref(_) => (
                ElementValue::Pointer(val.ref_instance()? as *mut c_void),
                ptr::null_mut(),
            ),
            other => {
                return Err(Error::unsupported_type(format!(
                    "attribute representation {:?} is not supported",
                    other
                )))
            }
        };
        Ok(ElementRepr {
            value,
            indicator: OCI_IND_NOTNULL,
            null_struct,
            source: val,
        })
    }

    pub(crate) fn value_ptr(&self) -> *const c_void {
        match &self.value {
            ElementValue::Null => ptr::null(),
            ElementValue::Number(n) => n as *const OCINumber as *const c_void,
            ElementValue::Date(d) => d as *const OCIDate as *const c_void,
            ElementValue::OciString(s) => s.ptr as *const c_void,
            ElementValue::OciRaw(r) => r.ptr as *const c_void,
            ElementValue::Pointer(p) => *p as *const c_void,
        }
    }

    pub(crate) fn indicator(&self) -> OCIInd {
        self.indicator
    }

    pub(crate) fn indicator_ptr(&self) -> *const c_void {
        &self.indicator as *const OCIInd as *const c_void
    }

    pub(crate) fn null_struct(&self) -> *mut c_void {
        self.null_struct
    }
}

struct TempOciString {
    ctxt: &'static Context,
    errhp: *mut OCIError,
    ptr: *mut OCIString,
}

impl TempOciString {
    fn new(ctxt: &'static Context, errhp: *mut OCIError, s: &str) -> Result<TempOciString> {
        let text = ctxt.charset().string_to_text(s);
        let mut ptr_: *mut OCIString = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIStringAssignText(
                ctxt.env_handle(),
                errhp,
                text.as_ptr(),
                text.len() as ub4,
                &mut ptr_
            )
        );
        Ok(TempOciString {
            ctxt,
            errhp,
            ptr: ptr_,
        })
    }
}

impl Drop for TempOciString {
    fn drop(&mut self) {
        if let Some(f) = self.ctxt.fns().OCIStringResize {
            unsafe { f(self.ctxt.env_handle(), self.errhp, 0, &mut self.ptr) };
        }
    }
}

struct TempOciRaw {
    ctxt: &'static Context,
    errhp: *mut OCIError,
    ptr: *mut OCIRaw,
}

impl TempOciRaw {
    fn new(ctxt: &'static Context, errhp: *mut OCIError, bytes: &[u8]) -> Result<TempOciRaw> {
        let mut ptr_: *mut OCIRaw = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIRawAssignBytes(
                ctxt.env_handle(),
                errhp,
                bytes.as_ptr(),
                bytes.len() as ub4,
                &mut ptr_
            )
        );
        Ok(TempOciRaw {
            ctxt,
            errhp,
            ptr: ptr_,
        })
    }
}

impl Drop for TempOciRaw {
    fn drop(&mut self) {
        if let Some(f) = self.ctxt.fns().OCIRawResize {
            unsafe { f(self.ctxt.env_handle(), self.errhp, 0, &mut self.ptr) };
        }
    }
}
