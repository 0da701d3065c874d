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

//! Typed value buffers shared by binds and defines.
//!
//! A [`SqlValue`] owns the OCI-side storage of one column or one placeholder:
//! a packed element buffer (or a descriptor array), the indicator array and
//! the returned-length array, each `array_size` elements long. Accessors
//! convert between the wire representation and rust types, honoring the
//! connection conversion formats.

use std::cell::Cell;
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::context::Context;
use crate::error::{chkerr, oci_call};
use crate::handle::{DescriptorArray, Handle};
use crate::sql_type::{
    format_datetime, IntervalDS, IntervalYM, NativeType, OracleType, Timestamp,
};
use crate::util::Charset;
use crate::{Error, Result};

/// Piecewise-accumulated LONG column storage, one growable buffer per row of
/// the fetch window.
pub(crate) struct LongBuffer {
    pub rows: Vec<Vec<u8>>,
    pub sizes: Vec<usize>,
}

impl LongBuffer {
    fn new(array_size: usize) -> LongBuffer {
        LongBuffer {
            rows: vec![Vec::new(); array_size],
            sizes: vec![0; array_size],
        }
    }

    pub(crate) fn reset(&mut self) {
        for row in &mut self.rows {
            row.clear();
        }
        for size in &mut self.sizes {
            *size = 0;
        }
    }
}

pub(crate) enum Buffer {
    Bytes { data: Vec<u8>, elem_size: usize },
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Number(Vec<OCINumber>),
    Date(Vec<OCIDate>),
    Timestamp(DescriptorArray<OCIDateTime>),
    Interval(DescriptorArray<OCIInterval>),
    Lob(DescriptorArray<OCILobLocator>),
    Rowid(DescriptorArray<OCIRowid>),
    Stmt {
        handles: Vec<Handle<OCIStmt>>,
        ptrs: Vec<*mut OCIStmt>,
    },
    Long(LongBuffer),
    Boolean(Vec<i32>),
    Object {
        instances: Vec<*mut c_void>,
        inds: Vec<*mut c_void>,
    },
    Ref(Vec<*mut OCIRef>),
}

pub struct SqlValue {
    conn: Arc<ConnInner>,
    oratype: OracleType,
    native: NativeType,
    pub(crate) buffer: Buffer,
    ind: Vec<sb2>,
    lens: Vec<ub2>,
    array_size: usize,
    buffer_row: Cell<usize>,
}

impl SqlValue {
    pub(crate) fn new(
        conn: Arc<ConnInner>,
        oratype: &OracleType,
        array_size: usize,
    ) -> Result<SqlValue> {
        let ctxt = conn.ctxt();
        let native = oratype.native_type();
        let buffer = match native {
            NativeType::Int64 => Buffer::Int64(vec![0; array_size]),
            NativeType::UInt64 => Buffer::UInt64(vec![0; array_size]),
            NativeType::Float => Buffer::Float(vec![0.0; array_size]),
            NativeType::Double => Buffer::Double(vec![0.0; array_size]),
            NativeType::Number => Buffer::Number(vec![Default::default(); array_size]),
            NativeType::Date => Buffer::Date(vec![Default::default(); array_size]),
            NativeType::Char | NativeType::Raw => {
                let elem_size = oratype.buffer_size(ctxt.charset()).max(1);
                Buffer::Bytes {
                    data: vec![0; elem_size * array_size],
                    elem_size,
                }
            }
            NativeType::Timestamp(dtype) => {
                Buffer::Timestamp(DescriptorArray::new(ctxt, dtype, array_size)?)
            }
            NativeType::IntervalDS => {
                Buffer::Interval(DescriptorArray::new(ctxt, OCI_DTYPE_INTERVAL_DS, array_size)?)
            }
            NativeType::IntervalYM => {
                Buffer::Interval(DescriptorArray::new(ctxt, OCI_DTYPE_INTERVAL_YM, array_size)?)
            }
            NativeType::Lob(dtype) => Buffer::Lob(DescriptorArray::new(ctxt, dtype, array_size)?),
            NativeType::Rowid => {
                Buffer::Rowid(DescriptorArray::new(ctxt, OCI_DTYPE_ROWID, array_size)?)
            }
            NativeType::Stmt => {
                let mut handles = Vec::with_capacity(array_size);
                for _ in 0..array_size {
                    handles.push(Handle::<OCIStmt>::new(ctxt)?);
                }
                let ptrs = handles.iter().map(|h| h.raw()).collect();
                Buffer::Stmt { handles, ptrs }
            }
            NativeType::Long | NativeType::LongRaw => Buffer::Long(LongBuffer::new(array_size)),
            NativeType::Boolean => Buffer::Boolean(vec![0; array_size]),
            NativeType::Object(_) => Buffer::Object {
                instances: vec![ptr::null_mut(); array_size],
                inds: vec![ptr::null_mut(); array_size],
            },
            NativeType::Ref(_) => Buffer::Ref(vec![ptr::null_mut(); array_size]),
        };
        Ok(SqlValue {
            conn,
            oratype: oratype.clone(),
            native,
            buffer,
            ind: vec![OCI_IND_NULL; array_size],
            lens: vec![0; array_size],
            array_size,
            buffer_row: Cell::new(0),
        })
    }

    pub(crate) fn conn(&self) -> &Arc<ConnInner> {
        &self.conn
    }

    fn ctxt(&self) -> &'static Context {
        self.conn.ctxt()
    }

    fn errhp(&self) -> *mut OCIError {
        self.conn.errhp()
    }

    fn charset(&self) -> Charset {
        self.ctxt().charset()
    }

    /// The driver type this buffer was created for.
    pub fn oracle_type(&self) -> &OracleType {
        &self.oratype
    }

    pub(crate) fn native(&self) -> &NativeType {
        &self.native
    }

    pub(crate) fn array_size(&self) -> usize {
        self.array_size
    }

    pub(crate) fn set_buffer_row(&self, row: usize) {
        self.buffer_row.set(row);
    }

    pub(crate) fn buffer_row(&self) -> usize {
        self.buffer_row.get()
    }

    //
    // registration info for OCIBindByPos/OCIBindByName/OCIDefineByPos
    //

    pub(crate) fn sqlt(&self) -> ub2 {
        self.native.to_sqlt()
    }

    pub(crate) fn elem_size(&self) -> sb4 {
        match &self.buffer {
            Buffer::Bytes { elem_size, .. } => *elem_size as sb4,
            Buffer::Int64(_) => std::mem::size_of::<i64>() as sb4,
            Buffer::UInt64(_) => std::mem::size_of::<u64>() as sb4,
            Buffer::Float(_) => std::mem::size_of::<f32>() as sb4,
            Buffer::Double(_) => std::mem::size_of::<f64>() as sb4,
            Buffer::Number(_) => std::mem::size_of::<OCINumber>() as sb4,
            Buffer::Date(_) => std::mem::size_of::<OCIDate>() as sb4,
            Buffer::Timestamp(_)
            | Buffer::Interval(_)
            | Buffer::Lob(_)
            | Buffer::Rowid(_) => std::mem::size_of::<*mut c_void>() as sb4,
            Buffer::Stmt { .. } => std::mem::size_of::<*mut c_void>() as sb4,
            // the piecewise protocol supplies data chunk by chunk
            Buffer::Long(_) => sb4::MAX,
            Buffer::Boolean(_) => std::mem::size_of::<i32>() as sb4,
            Buffer::Object { .. } | Buffer::Ref(_) => 0,
        }
    }

    pub(crate) fn buf_ptr(&mut self) -> *mut c_void {
        match &mut self.buffer {
            Buffer::Bytes { data, .. } => data.as_mut_ptr() as *mut c_void,
            Buffer::Int64(v) => v.as_mut_ptr() as *mut c_void,
            Buffer::UInt64(v) => v.as_mut_ptr() as *mut c_void,
            Buffer::Float(v) => v.as_mut_ptr() as *mut c_void,
            Buffer::Double(v) => v.as_mut_ptr() as *mut c_void,
            Buffer::Number(v) => v.as_mut_ptr() as *mut c_void,
            Buffer::Date(v) => v.as_mut_ptr() as *mut c_void,
            Buffer::Timestamp(arr) => arr.as_ptr() as *mut c_void,
            Buffer::Interval(arr) => arr.as_ptr() as *mut c_void,
            Buffer::Lob(arr) => arr.as_ptr() as *mut c_void,
            Buffer::Rowid(arr) => arr.as_ptr() as *mut c_void,
            Buffer::Stmt { ptrs, .. } => ptrs.as_mut_ptr() as *mut c_void,
            Buffer::Long(_) => ptr::null_mut(),
            Buffer::Boolean(v) => v.as_mut_ptr() as *mut c_void,
            Buffer::Object { .. } | Buffer::Ref(_) => ptr::null_mut(),
        }
    }

    pub(crate) fn ind_ptr(&mut self) -> *mut c_void {
        match self.native {
            // object indicators travel through OCIDefineObject/OCIBindObject
            NativeType::Object(_) => ptr::null_mut(),
            _ => self.ind.as_mut_ptr() as *mut c_void,
        }
    }

    pub(crate) fn len_ptr(&mut self) -> *mut ub2 {
        match &self.buffer {
            Buffer::Bytes { .. } | Buffer::Long(_) => self.lens.as_mut_ptr(),
            _ => ptr::null_mut(),
        }
    }

    /// Statement handle backing a REF CURSOR slot at the current row.
    pub(crate) fn cursor_handle(&self) -> Result<*mut OCIStmt> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Stmt { ptrs, .. } => Ok(ptrs[row]),
            _ => Err(self.conv_err("REF CURSOR")),
        }
    }

    pub(crate) fn long_buffer_mut(&mut self) -> Option<&mut LongBuffer> {
        match &mut self.buffer {
            Buffer::Long(buf) => Some(buf),
            _ => None,
        }
    }

    /// Completes a define for object- and REF-typed columns; OCI materializes
    /// the instances while fetching.
    pub(crate) fn define_object(&mut self, defnp: *mut OCIDefine) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        match (&self.native, &mut self.buffer) {
            (NativeType::Object(ti), Buffer::Object { instances, inds }) => {
                let tdo = ti.tdo();
                chkerr!(
                    ctxt,
                    errhp,
                    OCIDefineObject(
                        defnp,
                        errhp,
                        tdo,
                        instances.as_mut_ptr(),
                        ptr::null_mut(),
                        inds.as_mut_ptr(),
                        ptr::null_mut()
                    )
                );
            }
            (NativeType::Ref(ti), Buffer::Ref(refs)) => {
                let tdo = ti.tdo();
                chkerr!(
                    ctxt,
                    errhp,
                    OCIDefineObject(
                        defnp,
                        errhp,
                        tdo,
                        refs.as_mut_ptr() as *mut *mut c_void,
                        ptr::null_mut(),
                        ptr::null_mut(),
                        ptr::null_mut()
                    )
                );
            }
            _ => (),
        }
        Ok(())
    }

    pub(crate) fn bind_object(&mut self, bindp: *mut OCIBind) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        match (&self.native, &mut self.buffer) {
            (NativeType::Object(ti), Buffer::Object { instances, inds }) => {
                let tdo = ti.tdo();
                chkerr!(
                    ctxt,
                    errhp,
                    OCIBindObject(
                        bindp,
                        errhp,
                        tdo,
                        instances.as_mut_ptr(),
                        ptr::null_mut(),
                        inds.as_mut_ptr(),
                        ptr::null_mut()
                    )
                );
            }
            (NativeType::Ref(ti), Buffer::Ref(refs)) => {
                let tdo = ti.tdo();
                chkerr!(
                    ctxt,
                    errhp,
                    OCIBindObject(
                        bindp,
                        errhp,
                        tdo,
                        refs.as_mut_ptr() as *mut *mut c_void,
                        ptr::null_mut(),
                        ptr::null_mut(),
                        ptr::null_mut()
                    )
                );
            }
            _ => (),
        }
        Ok(())
    }

    //
    // null handling
    //

    pub fn is_null(&self) -> Result<bool> {
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Object { inds, .. } => {
                let ind = inds[row];
                if ind.is_null() {
                    return Ok(true);
                }
                Ok(unsafe { *(ind as *const OCIInd) } == OCI_IND_NULL)
            }
            _ => Ok(self.ind[row] == OCI_IND_NULL),
        }
    }

    pub fn set_null(&mut self) -> Result<()> {
        self.ind[self.buffer_row.get()] = OCI_IND_NULL;
        Ok(())
    }

    fn set_not_null(&mut self) {
        self.ind[self.buffer_row.get()] = OCI_IND_NOTNULL;
    }

    fn check_not_null(&self) -> Result<()> {
        if self.is_null()? {
            Err(Error::null_value())
        } else {
            Ok(())
        }
    }

    //
    // getters
    //

    fn bytes_at(&self, row: usize) -> &[u8] {
        match &self.buffer {
            Buffer::Bytes { data, elem_size } => {
                let start = row * elem_size;
                let len = self.lens[row] as usize;
                &data[start..start + len.min(*elem_size)]
            }
            Buffer::Long(buf) => &buf.rows[row][..buf.sizes[row]],
            _ => &[],
        }
    }

    fn conv_err(&self, to: &str) -> Error {
        Error::invalid_type_conversion(&self.oratype.to_string(), to)
    }

    pub(crate) fn get_i64(&self) -> Result<i64> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Int64(v) => Ok(v[row]),
            Buffer::UInt64(v) => i64::try_from(v[row])
                .map_err(|e| self.conv_err("i64").add_source(e)),
            Buffer::Float(v) => Ok(v[row] as i64),
            Buffer::Double(v) => Ok(v[row] as i64),
            Buffer::Number(v) => self.number_to_i64(&v[row]),
            Buffer::Bytes { .. } | Buffer::Long(_) => {
                let s = self.get_string()?;
                s.trim()
                    .parse()
                    .map_err(|e| self.conv_err("i64").add_source(e))
            }
            Buffer::Boolean(v) => Ok(v[row] as i64),
            _ => Err(self.conv_err("i64")),
        }
    }

    pub(crate) fn get_u64(&self) -> Result<u64> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        if let Buffer::UInt64(v) = &self.buffer {
            return Ok(v[row]);
        }
        let v = self.get_i64()?;
        u64::try_from(v).map_err(|e| self.conv_err("u64").add_source(e))
    }

    pub(crate) fn get_f64(&self) -> Result<f64> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Int64(v) => Ok(v[row] as f64),
            Buffer::UInt64(v) => Ok(v[row] as f64),
            Buffer::Float(v) => Ok(v[row] as f64),
            Buffer::Double(v) => Ok(v[row]),
            Buffer::Number(v) => self.number_to_f64(&v[row]),
            Buffer::Bytes { .. } | Buffer::Long(_) => {
                let s = self.get_string()?;
                s.trim()
                    .parse()
                    .map_err(|e| self.conv_err("f64").add_source(e))
            }
            _ => Err(self.conv_err("f64")),
        }
    }

    pub(crate) fn get_f32(&self) -> Result<f32> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Float(v) => Ok(v[row]),
            _ => Ok(self.get_f64()? as f32),
        }
    }

    pub(crate) fn get_bool(&self) -> Result<bool> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Boolean(v) => Ok(v[row] != 0),
            _ => Err(self.conv_err("bool")),
        }
    }

    pub(crate) fn get_bytes(&self) -> Result<Vec<u8>> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Bytes { .. } | Buffer::Long(_) => Ok(self.bytes_at(row).to_vec()),
            _ => Err(self.conv_err("bytes")),
        }
    }

    /// Converts any column to text, formatting non-string values with the
    /// connection conversion formats.
    pub(crate) fn get_string(&self) -> Result<String> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        let formats = self.conn.formats();
        match &self.buffer {
            Buffer::Bytes { .. } => match self.native {
                NativeType::Raw => Ok(to_hex(self.bytes_at(row))),
                _ => Ok(self.charset().text_to_string(self.bytes_at(row))),
            },
            Buffer::Long(_) => match self.native {
                NativeType::LongRaw => Ok(to_hex(self.bytes_at(row))),
                _ => Ok(self.charset().text_to_string(self.bytes_at(row))),
            },
            Buffer::Int64(v) => Ok(v[row].to_string()),
            Buffer::UInt64(v) => Ok(v[row].to_string()),
            Buffer::Float(v) => Ok(format_binary_float(
                v[row] as f64,
                &formats.binary_float,
            )),
            Buffer::Double(v) => Ok(format_binary_float(v[row], &formats.binary_double)),
            Buffer::Number(v) => self.number_to_string(&v[row], &formats.number),
            Buffer::Date(v) => Ok(format_datetime(&date_to_timestamp(&v[row]), &formats.date)),
            Buffer::Timestamp(_) => {
                let ts = self.get_timestamp()?;
                let fmt = if ts.with_tz() {
                    &formats.timestamp_tz
                } else {
                    &formats.timestamp
                };
                Ok(format_datetime(&ts, fmt))
            }
            Buffer::Interval(_) => match self.native {
                NativeType::IntervalYM => Ok(self.get_interval_ym()?.to_string()),
                _ => Ok(self.get_interval_ds()?.to_string()),
            },
            Buffer::Rowid(arr) => self.rowid_to_string(arr.get(row)),
            Buffer::Boolean(v) => Ok(if v[row] != 0 { "TRUE" } else { "FALSE" }.into()),
            _ => Err(self.conv_err("String")),
        }
    }

    pub(crate) fn get_timestamp(&self) -> Result<Timestamp> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Date(v) => Ok(date_to_timestamp(&v[row])),
            Buffer::Timestamp(arr) => {
                self.timestamp_from_descriptor(arr.get(row))
            }
            Buffer::Bytes { .. } => {
                let s = self.get_string()?;
                s.parse().map_err(|e: crate::ParseOracleTypeError| {
                    self.conv_err("Timestamp").add_source(e)
                })
            }
            _ => Err(self.conv_err("Timestamp")),
        }
    }

    pub(crate) fn get_interval_ds(&self) -> Result<IntervalDS> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Interval(arr) if self.native == NativeType::IntervalDS => {
                let ctxt = self.ctxt();
                let errhp = self.errhp();
                let (mut dy, mut hr, mut mm, mut ss, mut fsec) = (0, 0, 0, 0, 0);
                chkerr!(
                    ctxt,
                    errhp,
                    OCIIntervalGetDaySecond(
                        ctxt.env_handle() as *mut c_void,
                        errhp,
                        &mut dy,
                        &mut hr,
                        &mut mm,
                        &mut ss,
                        &mut fsec,
                        arr.get(row)
                    )
                );
                IntervalDS::new(dy, hr, mm, ss, fsec)
            }
            _ => Err(self.conv_err("IntervalDS")),
        }
    }

    pub(crate) fn get_interval_ym(&self) -> Result<IntervalYM> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Interval(arr) if self.native == NativeType::IntervalYM => {
                let ctxt = self.ctxt();
                let errhp = self.errhp();
                let (mut yr, mut mnth) = (0, 0);
                chkerr!(
                    ctxt,
                    errhp,
                    OCIIntervalGetYearMonth(
                        ctxt.env_handle() as *mut c_void,
                        errhp,
                        &mut yr,
                        &mut mnth,
                        arr.get(row)
                    )
                );
                IntervalYM::new(yr, mnth)
            }
            _ => Err(self.conv_err("IntervalYM")),
        }
    }

    /// Locator backing a LOB column at the current row.
    pub(crate) fn lob_locator(&self) -> Result<*mut OCILobLocator> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Lob(arr) => Ok(arr.get(row)),
            _ => Err(self.conv_err("LOB")),
        }
    }

    pub(crate) fn object_instance(&self) -> Result<(*mut c_void, *mut c_void)> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Object { instances, inds } => Ok((instances[row], inds[row])),
            _ => Err(self.conv_err("Object")),
        }
    }

    pub(crate) fn ref_instance(&self) -> Result<*mut OCIRef> {
        self.check_not_null()?;
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Ref(refs) => Ok(refs[row]),
            _ => Err(self.conv_err("REF")),
        }
    }

    //
    // setters
    //

    fn too_long(typename: &str, len: usize, cap: usize) -> Error {
        Error::out_of_range(format!(
            "value length {} exceeds the buffer size {} of {}",
            len, cap, typename
        ))
    }

    pub(crate) fn set_i64(&mut self, value: i64) -> Result<()> {
        let row = self.buffer_row.get();
        let typename = self.oratype.to_string();
        if matches!(self.buffer, Buffer::Number(_)) {
            let num = self.i64_to_number(value)?;
            if let Buffer::Number(v) = &mut self.buffer {
                v[row] = num;
            }
        } else {
            match &mut self.buffer {
                Buffer::Int64(v) => v[row] = value,
                Buffer::UInt64(v) => {
                    v[row] = u64::try_from(value).map_err(|e| {
                        Error::invalid_type_conversion(&typename, "UINT64").add_source(e)
                    })?
                }
                Buffer::Float(v) => v[row] = value as f32,
                Buffer::Double(v) => v[row] = value as f64,
                _ => return Err(Error::invalid_type_conversion(&typename, "i64")),
            }
        }
        self.set_not_null();
        Ok(())
    }

    pub(crate) fn set_u64(&mut self, value: u64) -> Result<()> {
        let row = self.buffer_row.get();
        if let Buffer::UInt64(v) = &mut self.buffer {
            v[row] = value;
            self.set_not_null();
            return Ok(());
        }
        let v = i64::try_from(value)
            .map_err(|e| Error::invalid_type_conversion("u64", "i64").add_source(e))?;
        self.set_i64(v)
    }

    pub(crate) fn set_f64(&mut self, value: f64) -> Result<()> {
        let row = self.buffer_row.get();
        let typename = self.oratype.to_string();
        if matches!(self.buffer, Buffer::Number(_)) {
            let num = self.f64_to_number(value)?;
            if let Buffer::Number(v) = &mut self.buffer {
                v[row] = num;
            }
        } else {
            match &mut self.buffer {
                Buffer::Float(v) => v[row] = value as f32,
                Buffer::Double(v) => v[row] = value,
                Buffer::Int64(v) => v[row] = value as i64,
                _ => return Err(Error::invalid_type_conversion(&typename, "f64")),
            }
        }
        self.set_not_null();
        Ok(())
    }

    pub(crate) fn set_string(&mut self, value: &str) -> Result<()> {
        let charset = self.charset();
        let row = self.buffer_row.get();
        let typename = self.oratype.to_string();
        match &self.buffer {
            Buffer::Bytes { .. } => {
                let text = charset.string_to_text(value);
                if let Buffer::Bytes { data, elem_size } = &mut self.buffer {
                    if text.len() > *elem_size {
                        return Err(Self::too_long(&typename, text.len(), *elem_size));
                    }
                    let start = row * *elem_size;
                    data[start..start + text.len()].copy_from_slice(&text);
                    self.lens[row] = text.len() as ub2;
                }
            }
            Buffer::Number(_) => {
                let num = self.string_to_number(value)?;
                if let Buffer::Number(v) = &mut self.buffer {
                    v[row] = num;
                }
            }
            Buffer::Date(_) | Buffer::Timestamp(_) => {
                let ts: Timestamp = value.parse().map_err(|e: crate::ParseOracleTypeError| {
                    Error::invalid_type_conversion("&str", &typename).add_source(e)
                })?;
                return self.set_timestamp(&ts);
            }
            _ => return Err(Error::invalid_type_conversion("&str", &typename)),
        }
        self.set_not_null();
        Ok(())
    }

    pub(crate) fn set_bytes(&mut self, value: &[u8]) -> Result<()> {
        let row = self.buffer_row.get();
        let typename = self.oratype.to_string();
        if let Buffer::Bytes { data, elem_size } = &mut self.buffer {
            if value.len() > *elem_size {
                return Err(Self::too_long(&typename, value.len(), *elem_size));
            }
            let start = row * *elem_size;
            data[start..start + value.len()].copy_from_slice(value);
            self.lens[row] = value.len() as ub2;
            self.set_not_null();
            Ok(())
        } else {
            Err(Error::invalid_type_conversion("&[u8]", &typename))
        }
    }

    pub(crate) fn set_bool(&mut self, value: bool) -> Result<()> {
        let row = self.buffer_row.get();
        let typename = self.oratype.to_string();
        if let Buffer::Boolean(v) = &mut self.buffer {
            v[row] = value as i32;
            self.set_not_null();
            Ok(())
        } else {
            Err(Error::invalid_type_conversion("bool", &typename))
        }
    }

    pub(crate) fn set_timestamp(&mut self, value: &Timestamp) -> Result<()> {
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Date(_) => {
                let date = timestamp_to_date(value);
                if let Buffer::Date(v) = &mut self.buffer {
                    v[row] = date;
                }
            }
            Buffer::Timestamp(arr) => {
                let ctxt = self.ctxt();
                let errhp = self.errhp();
                let tz = if value.with_tz() {
                    format!(
                        "{}{:02}:{:02}",
                        if value.tz_offset() < 0 { '-' } else { '+' },
                        value.tz_hour_offset().abs(),
                        value.tz_minute_offset().abs()
                    )
                } else {
                    String::new()
                };
                let tz_text = ctxt.charset().string_to_text(&tz);
                chkerr!(
                    ctxt,
                    errhp,
                    OCIDateTimeConstruct(
                        ctxt.env_handle() as *mut c_void,
                        errhp,
                        arr.get(row),
                        value.year() as sb2,
                        value.month() as ub1,
                        value.day() as ub1,
                        value.hour() as ub1,
                        value.minute() as ub1,
                        value.second() as ub1,
                        value.nanosecond(),
                        if tz.is_empty() {
                            ptr::null()
                        } else {
                            tz_text.as_ptr()
                        },
                        tz_text.len()
                    )
                );
            }
            _ => return Err(self.conv_err("Timestamp")),
        }
        self.set_not_null();
        Ok(())
    }

    pub(crate) fn set_interval_ds(&mut self, value: &IntervalDS) -> Result<()> {
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Interval(arr) if self.native == NativeType::IntervalDS => {
                let ctxt = self.ctxt();
                let errhp = self.errhp();
                chkerr!(
                    ctxt,
                    errhp,
                    OCIIntervalSetDaySecond(
                        ctxt.env_handle() as *mut c_void,
                        errhp,
                        value.days(),
                        value.hours(),
                        value.minutes(),
                        value.seconds(),
                        value.nanoseconds(),
                        arr.get(row)
                    )
                );
                self.set_not_null();
                Ok(())
            }
            _ => Err(self.conv_err("IntervalDS")),
        }
    }

    pub(crate) fn set_interval_ym(&mut self, value: &IntervalYM) -> Result<()> {
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Interval(arr) if self.native == NativeType::IntervalYM => {
                let ctxt = self.ctxt();
                let errhp = self.errhp();
                chkerr!(
                    ctxt,
                    errhp,
                    OCIIntervalSetYearMonth(
                        ctxt.env_handle() as *mut c_void,
                        errhp,
                        value.years(),
                        value.months(),
                        arr.get(row)
                    )
                );
                self.set_not_null();
                Ok(())
            }
            _ => Err(self.conv_err("IntervalYM")),
        }
    }

    /// Stores an Oracle NUMBER in its 22-byte wire form.
    pub(crate) fn set_number_raw(&mut self, bytes: [u8; 22]) -> Result<()> {
        let row = self.buffer_row.get();
        let typename = self.oratype.to_string();
        if let Buffer::Number(v) = &mut self.buffer {
            v[row] = OCINumber { bytes };
            self.set_not_null();
            Ok(())
        } else {
            Err(Error::invalid_type_conversion("NUMBER", &typename))
        }
    }

    pub(crate) fn set_oci_date(&mut self, date: OCIDate) -> Result<()> {
        let row = self.buffer_row.get();
        let typename = self.oratype.to_string();
        if let Buffer::Date(v) = &mut self.buffer {
            v[row] = date;
            self.set_not_null();
            Ok(())
        } else {
            Err(Error::invalid_type_conversion("DATE", &typename))
        }
    }

    pub(crate) fn set_lob_locator(&mut self, locator: *mut OCILobLocator) -> Result<()> {
        let row = self.buffer_row.get();
        match &mut self.buffer {
            Buffer::Lob(arr) => {
                let ctxt = self.conn.ctxt();
                let errhp = self.conn.errhp();
                let mut dst = arr.get(row);
                chkerr!(
                    ctxt,
                    errhp,
                    OCILobLocatorAssign(self.conn.svchp(), errhp, locator, &mut dst)
                );
                self.set_not_null();
                Ok(())
            }
            _ => Err(self.conv_err("LOB")),
        }
    }

    pub(crate) fn set_object_instance(
        &mut self,
        instance: *mut c_void,
        ind: *mut c_void,
    ) -> Result<()> {
        let row = self.buffer_row.get();
        match &mut self.buffer {
            Buffer::Object { instances, inds } => {
                instances[row] = instance;
                inds[row] = ind;
                self.ind[row] = OCI_IND_NOTNULL;
                Ok(())
            }
            _ => Err(self.conv_err("Object")),
        }
    }

    pub(crate) fn set_ref_instance(&mut self, ref_: *mut OCIRef) -> Result<()> {
        let row = self.buffer_row.get();
        match &mut self.buffer {
            Buffer::Ref(refs) => {
                refs[row] = ref_;
                self.ind[row] = OCI_IND_NOTNULL;
                Ok(())
            }
            _ => Err(self.conv_err("REF")),
        }
    }

    //
    // OCINumber conversions
    //

    fn number_to_i64(&self, num: &OCINumber) -> Result<i64> {
        let ctxt = self.ctxt();
        let errhp = self.errhp();
        let mut out: i64 = 0;
        chkerr!(
            ctxt,
            errhp,
            OCINumberToInt(
                errhp,
                num,
                std::mem::size_of::<i64>() as uword,
                2, // signed
                &mut out as *mut i64 as *mut c_void
            )
        );
        Ok(out)
    }

    fn i64_to_number(&self, value: i64) -> Result<OCINumber> {
        let ctxt = self.ctxt();
        let errhp = self.errhp();
        let mut num: OCINumber = Default::default();
        chkerr!(
            ctxt,
            errhp,
            OCINumberFromInt(
                errhp,
                &value as *const i64 as *const c_void,
                std::mem::size_of::<i64>() as uword,
                2,
                &mut num
            )
        );
        Ok(num)
    }

    fn number_to_f64(&self, num: &OCINumber) -> Result<f64> {
        let ctxt = self.ctxt();
        let errhp = self.errhp();
        let mut out: f64 = 0.0;
        chkerr!(
            ctxt,
            errhp,
            OCINumberToReal(
                errhp,
                num,
                std::mem::size_of::<f64>() as uword,
                &mut out as *mut f64 as *mut c_void
            )
        );
        Ok(out)
    }

    fn f64_to_number(&self, value: f64) -> Result<OCINumber> {
        let ctxt = self.ctxt();
        let errhp = self.errhp();
        let mut num: OCINumber = Default::default();
        chkerr!(
            ctxt,
            errhp,
            OCINumberFromReal(
                errhp,
                &value as *const f64 as *const c_void,
                std::mem::size_of::<f64>() as uword,
                &mut num
            )
        );
        Ok(num)
    }

    fn number_to_string(&self, num: &OCINumber, fmt: &str) -> Result<String> {
        let ctxt = self.ctxt();
        let errhp = self.errhp();
        let fmt_text = ctxt.charset().string_to_text(fmt);
        let mut buf = [0u8; 256];
        let mut buf_size = buf.len() as ub4;
        chkerr!(
            ctxt,
            errhp,
            OCINumberToText(
                errhp,
                num,
                fmt_text.as_ptr(),
                fmt_text.len() as ub4,
                ptr::null(),
                0,
                &mut buf_size,
                buf.as_mut_ptr()
            )
        );
        Ok(ctxt
            .charset()
            .text_to_string(&buf[..buf_size as usize])
            .trim()
            .to_string())
    }

    fn string_to_number(&self, s: &str) -> Result<OCINumber> {
        let ctxt = self.ctxt();
        let errhp = self.errhp();
        let formats = self.conn.formats();
        let text = ctxt.charset().string_to_text(s.trim());
        let fmt_text = ctxt.charset().string_to_text(&formats.number);
        let mut num: OCINumber = Default::default();
        chkerr!(
            ctxt,
            errhp,
            OCINumberFromText(
                errhp,
                text.as_ptr(),
                text.len() as ub4,
                fmt_text.as_ptr(),
                fmt_text.len() as ub4,
                ptr::null(),
                0,
                &mut num
            )
        );
        Ok(num)
    }

    fn timestamp_from_descriptor(&self, dt: *mut OCIDateTime) -> Result<Timestamp> {
        let with_tz = !matches!(self.native, NativeType::Timestamp(OCI_DTYPE_TIMESTAMP));
        read_timestamp_descriptor(self.conn.ctxt(), self.errhp(), dt, with_tz)
    }

    /// Pointer to the NUMBER wire value at the current row.
    pub(crate) fn number_ptr(&self) -> Result<*const OCINumber> {
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Number(v) => Ok(&v[row] as *const OCINumber),
            _ => Err(self.conv_err("NUMBER")),
        }
    }

    /// Pointer to the OCIDate struct at the current row.
    pub(crate) fn date_ptr(&self) -> Result<*const OCIDate> {
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Date(v) => Ok(&v[row] as *const OCIDate),
            _ => Err(self.conv_err("DATE")),
        }
    }

    /// Descriptor pointer (datetime or interval) at the current row.
    pub(crate) fn descriptor_ptr(&self) -> Result<*mut c_void> {
        let row = self.buffer_row.get();
        match &self.buffer {
            Buffer::Timestamp(arr) => Ok(arr.get(row) as *mut c_void),
            Buffer::Interval(arr) => Ok(arr.get(row) as *mut c_void),
            _ => Err(self.conv_err("descriptor")),
        }
    }

    fn rowid_to_string(&self, rowid: *mut OCIRowid) -> Result<String> {
        let ctxt = self.ctxt();
        let errhp = self.errhp();
        let mut buf = [0u8; 128];
        let mut len = buf.len() as ub2;
        chkerr!(
            ctxt,
            errhp,
            OCIRowidToChar(rowid, buf.as_mut_ptr(), &mut len, errhp)
        );
        // OCIRowidToChar always writes narrow text
        Ok(Charset::Narrow.text_to_string(&buf[..len as usize]))
    }
}

impl Drop for SqlValue {
    fn drop(&mut self) {
        // object instances materialized by fetch belong to this buffer
        if let Buffer::Object { instances, .. } = &self.buffer {
            let ctxt = self.conn.ctxt();
            if let Some(f) = ctxt.fns().OCIObjectFree {
                for instance in instances {
                    if !instance.is_null() {
                        unsafe {
                            f(
                                ctxt.env_handle(),
                                self.conn.errhp(),
                                *instance,
                                OCI_OBJECTFREE_FORCE,
                            )
                        };
                    }
                }
            }
        }
    }
}

/// Reads an `OCIDateTime` descriptor into a [`Timestamp`].
pub(crate) fn read_timestamp_descriptor(
    ctxt: &'static Context,
    errhp: *mut OCIError,
    dt: *mut OCIDateTime,
    with_tz: bool,
) -> Result<Timestamp> {
    let env = ctxt.env_handle() as *mut c_void;
    let (mut yr, mut mnth, mut dy) = (0i16, 0u8, 0u8);
    chkerr!(
        ctxt,
        errhp,
        OCIDateTimeGetDate(env, errhp, dt, &mut yr, &mut mnth, &mut dy)
    );
    let (mut hr, mut mm, mut ss, mut fsec) = (0u8, 0u8, 0u8, 0u32);
    chkerr!(
        ctxt,
        errhp,
        OCIDateTimeGetTime(env, errhp, dt, &mut hr, &mut mm, &mut ss, &mut fsec)
    );
    let mut ts = Timestamp::new(
        yr as i32, mnth as u32, dy as u32, hr as u32, mm as u32, ss as u32, fsec,
    )?;
    if with_tz {
        let (mut tzh, mut tzm) = (0i8, 0i8);
        let status = oci_call!(
            ctxt,
            OCIDateTimeGetTimeZoneOffset(env, errhp, dt, &mut tzh, &mut tzm)
        );
        if status == OCI_SUCCESS {
            ts = ts.and_tz_hm_offset(tzh as i32, tzm as i32)?;
        }
    }
    Ok(ts)
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02X}", b));
    }
    s
}

/// Renders a binary float with a printf-style format; `%f` and `%lf` print
/// six decimals, anything unknown falls back to the shortest representation.
pub(crate) fn format_binary_float(value: f64, fmt: &str) -> String {
    match fmt {
        "%f" | "%lf" => format!("{:.6}", value),
        _ => format!("{}", value),
    }
}

pub(crate) fn date_to_timestamp(date: &OCIDate) -> Timestamp {
    Timestamp {
        year: date.yyyy as i32,
        month: date.mm as u32,
        day: date.dd as u32,
        hour: date.time.hh as u32,
        minute: date.time.mi as u32,
        second: date.time.ss as u32,
        nanosecond: 0,
        tz_hour_offset: 0,
        tz_minute_offset: 0,
        precision: 0,
        with_tz: false,
    }
}

pub(crate) fn timestamp_to_date(ts: &Timestamp) -> OCIDate {
    OCIDate {
        yyyy: ts.year() as sb2,
        mm: ts.month() as ub1,
        dd: ts.day() as ub1,
        time: OCITime {
            hh: ts.hour() as ub1,
            mi: ts.minute() as ub1,
            ss: ts.second() as ub1,
        },
    }
}

/// Decodes the packed 7-byte DATE wire form used by RETURNING placeholders.
pub(crate) fn date_from_wire(bytes: &[u8]) -> Option<OCIDate> {
    if bytes.len() < 7 {
        return None;
    }
    let century = bytes[0] as i16 - 100;
    let year = bytes[1] as i16 - 100;
    Some(OCIDate {
        yyyy: century * 100 + year,
        mm: bytes[2],
        dd: bytes[3],
        time: OCITime {
            hh: bytes[4].wrapping_sub(1),
            mi: bytes[5].wrapping_sub(1),
            ss: bytes[6].wrapping_sub(1),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_encoding() {
        assert_eq!(to_hex(&[0x01, 0xab, 0xff]), "01ABFF");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn binary_float_formats() {
        assert_eq!(format_binary_float(1.5, "%f"), "1.500000");
        assert_eq!(format_binary_float(1.5, "%lf"), "1.500000");
        assert_eq!(format_binary_float(1.5, "other"), "1.5");
    }

    #[test]
    fn date_struct_round_trip() {
        let ts = Timestamp::new(2023, 7, 14, 10, 30, 45, 0).unwrap();
        let date = timestamp_to_date(&ts);
        assert_eq!(date.yyyy, 2023);
        assert_eq!(date.mm, 7);
        let back = date_to_timestamp(&date);
        assert_eq!(back, ts.and_prec(0).unwrap());
    }

    #[test]
    fn packed_date_wire_form() {
        // 2023-07-14 10:30:45 in the RETURNING wire encoding
        let wire = [120, 123, 7, 14, 11, 31, 46];
        let date = date_from_wire(&wire).unwrap();
        assert_eq!(date.yyyy, 2023);
        assert_eq!(date.mm, 7);
        assert_eq!(date.dd, 14);
        assert_eq!(date.time.hh, 10);
        assert_eq!(date.time.mi, 30);
        assert_eq!(date.time.ss, 45);
        assert!(date_from_wire(&[1, 2, 3]).is_none());
    }
}
