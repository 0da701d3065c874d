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

//! Cached descriptions of tables, views and user-defined types.

use std::fmt;
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::error::chkerr;
use crate::handle::Handle;
use crate::sql_type::oracle_type::{map_oracle_type, RawColumnDesc};
use crate::sql_type::OracleType;
use crate::util::{server_case_identifier, OciString};
use crate::{Error, Result};

/// What a [`TypeInfo`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeInfoKind {
    Table,
    View,
    Type,
}

/// Collection flavor of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Varray,
    NestedTable,
}

/// Description of one column of a table, view or resultset, or one attribute
/// of an object type.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub(crate) name: String,
    pub(crate) oracle_type: OracleType,
    pub(crate) nullable: bool,
}

impl ColumnInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn oracle_type(&self) -> &OracleType {
        &self.oracle_type
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }
}

impl fmt::Display for ColumnInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.nullable {
            write!(f, "{} {}", self.name, self.oracle_type)
        } else {
            write!(f, "{} {} NOT NULL", self.name, self.oracle_type)
        }
    }
}

/// Cached description of a table, view or user-defined type.
///
/// Obtained through [`crate::Connection::type_info`] (or
/// [`crate::Connection::object_type`] for named types) and shared per
/// connection.
pub struct TypeInfo {
    schema: String,
    name: String,
    kind: TypeInfoKind,
    collection: Option<CollectionKind>,
    element_type: Option<OracleType>,
    columns: Vec<ColumnInfo>,
    tdo: *mut OCIType,
}

unsafe impl Send for TypeInfo {}
unsafe impl Sync for TypeInfo {}

impl TypeInfo {
    /// Schema owning the described item.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Name without the schema qualifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeInfoKind {
        self.kind
    }

    /// `Some` when the described type is a VARRAY or nested table.
    pub fn collection_kind(&self) -> Option<CollectionKind> {
        self.collection
    }

    /// Element type of a collection type.
    pub fn element_type(&self) -> Option<&OracleType> {
        self.element_type.as_ref()
    }

    /// Columns of a table or view, or attributes of an object type.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Case-insensitive attribute lookup.
    pub(crate) fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::attr_not_found(name))
    }

    pub(crate) fn tdo(&self) -> *mut OCIType {
        self.tdo
    }

    pub(crate) fn matches(&self, schema: &str, name: &str, kind: TypeInfoKind) -> bool {
        self.kind == kind && self.schema == schema && self.name == name
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.name == other.name && self.kind == other.kind
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "TypeInfo {{ schema: {:?}, name: {:?}, kind: {:?}, columns: {} }}",
            self.schema,
            self.name,
            self.kind,
            self.columns.len()
        )
    }
}

/// Splits `[schema.]name`, uppercasing unquoted parts the way the server
/// stores identifiers.
pub(crate) fn split_qualified_name(name: &str) -> (String, String) {
    let cased = server_case_identifier(name);
    match cased.split_once('.') {
        Some((schema, rest)) => (
            schema.trim_matches('"').to_string(),
            rest.trim_matches('"').to_string(),
        ),
        None => (String::new(), cased.trim_matches('"').to_string()),
    }
}

/// Reads the facts of one parameter descriptor into a [`RawColumnDesc`],
/// resolving referenced named types through the connection cache.
pub(crate) fn read_param_desc(
    conn: &Arc<ConnInner>,
    parm: *mut c_void,
    read_name: bool,
) -> Result<(RawColumnDesc, String)> {
    let ctxt = conn.ctxt();
    let errhp = conn.errhp();
    let htype = OCI_DTYPE_PARAM;
    let sqlt = ctxt.attr_get_ub2(parm, htype, OCI_ATTR_DATA_TYPE, errhp)?;
    let mut desc = RawColumnDesc {
        sqlt,
        byte_size: ctxt.attr_get_ub2(parm, htype, OCI_ATTR_DATA_SIZE, errhp)? as u32,
        ..Default::default()
    };
    match sqlt {
        SQLT_NUM | SQLT_VNU | SQLT_FLT => {
            desc.precision = ctxt.attr_get_sb2(parm, htype, OCI_ATTR_PRECISION, errhp)?;
            desc.scale = ctxt.attr_get_ub1(parm, htype, OCI_ATTR_SCALE, errhp)? as i8;
        }
        SQLT_TIMESTAMP | SQLT_TIMESTAMP_TZ | SQLT_TIMESTAMP_LTZ => {
            desc.fs_precision = ctxt.attr_get_ub1(parm, htype, OCI_ATTR_FSPRECISION, errhp)?;
        }
        SQLT_INTERVAL_DS | SQLT_INTERVAL_YM => {
            desc.fs_precision = ctxt.attr_get_ub1(parm, htype, OCI_ATTR_FSPRECISION, errhp)?;
            desc.leading_precision =
                ctxt.attr_get_ub1(parm, htype, OCI_ATTR_LFPRECISION, errhp)?;
        }
        SQLT_CHR | SQLT_VCS | SQLT_AFC | SQLT_AVC | SQLT_CLOB => {
            desc.charset_form = ctxt.attr_get_ub1(parm, htype, OCI_ATTR_CHARSET_FORM, errhp)?;
            if sqlt != SQLT_CLOB {
                desc.char_used = ctxt.attr_get_ub1(parm, htype, OCI_ATTR_CHAR_USED, errhp)? != 0;
                desc.char_size = ctxt.attr_get_ub2(parm, htype, OCI_ATTR_CHAR_SIZE, errhp)? as u32;
            }
        }
        SQLT_NTY | SQLT_REF | SQLT_NCO => {
            let type_name = ctxt.attr_get_text(parm, htype, OCI_ATTR_TYPE_NAME, errhp)?;
            let schema_name = ctxt.attr_get_text(parm, htype, OCI_ATTR_SCHEMA_NAME, errhp)?;
            let qualified = if schema_name.is_empty() {
                type_name
            } else {
                format!("{}.{}", schema_name, type_name)
            };
            desc.type_info = Some(describe_cached(conn, &qualified, TypeInfoKind::Type)?);
        }
        _ => (),
    }
    let name = if read_name {
        ctxt.attr_get_text(parm, htype, OCI_ATTR_NAME, errhp)?
    } else {
        String::new()
    };
    Ok((desc, name))
}

fn read_column_info(
    conn: &Arc<ConnInner>,
    parm: *mut c_void,
    with_nullable: bool,
) -> Result<ColumnInfo> {
    let ctxt = conn.ctxt();
    let errhp = conn.errhp();
    let (desc, name) = read_param_desc(conn, parm, true)?;
    let nullable = if with_nullable {
        ctxt.attr_get_ub1(parm, OCI_DTYPE_PARAM, OCI_ATTR_IS_NULL, errhp)? != 0
    } else {
        true
    };
    Ok(ColumnInfo {
        name,
        oracle_type: map_oracle_type(&desc, false, 0, false)?,
        nullable,
    })
}

/// Returns the cached description, describing through the server on a miss.
pub(crate) fn describe_cached(
    conn: &Arc<ConnInner>,
    name: &str,
    kind: TypeInfoKind,
) -> Result<Arc<TypeInfo>> {
    let (schema, bare) = split_qualified_name(name);
    if let Some(ti) = conn.find_cached_type_info(&schema, &bare, kind) {
        return Ok(ti);
    }
    let ti = Arc::new(describe(conn, &schema, &bare, kind)?);
    conn.cache_type_info(ti.clone());
    Ok(ti)
}

fn describe(
    conn: &Arc<ConnInner>,
    schema: &str,
    name: &str,
    kind: TypeInfoKind,
) -> Result<TypeInfo> {
    let ctxt = conn.ctxt();
    let errhp = conn.errhp();
    let dschp = Handle::<OCIDescribe>::new(ctxt)?;
    let qualified = if schema.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", schema, name)
    };
    let text = OciString::new(&qualified, ctxt.charset());
    let ptype = match kind {
        TypeInfoKind::Table => OCI_PTYPE_TABLE,
        TypeInfoKind::View => OCI_PTYPE_VIEW,
        TypeInfoKind::Type => OCI_PTYPE_TYP,
    };
    chkerr!(
        ctxt,
        errhp,
        OCIDescribeAny(
            conn.svchp(),
            errhp,
            text.ptr() as *mut c_void,
            text.len(),
            OCI_OTYPE_NAME,
            0,
            ptype,
            dschp.raw()
        )
    );
    let parm = ctxt.attr_get_ptr(
        dschp.raw() as *const c_void,
        OCI_HTYPE_DESCRIBE,
        OCI_ATTR_PARAM,
        errhp,
    )?;

    let mut info = TypeInfo {
        schema: schema.to_string(),
        name: name.to_string(),
        kind,
        collection: None,
        element_type: None,
        columns: Vec::new(),
        tdo: ptr::null_mut(),
    };

    match kind {
        TypeInfoKind::Table | TypeInfoKind::View => {
            let num_cols =
                ctxt.attr_get_ub2(parm as *const c_void, OCI_DTYPE_PARAM, OCI_ATTR_NUM_COLS, errhp)?;
            let list = ctxt.attr_get_ptr(
                parm as *const c_void,
                OCI_DTYPE_PARAM,
                OCI_ATTR_LIST_COLUMNS,
                errhp,
            )?;
            for i in 1..=num_cols {
                let mut col_parm: *mut c_void = ptr::null_mut();
                chkerr!(
                    ctxt,
                    errhp,
                    OCIParamGet(
                        list as *const c_void,
                        OCI_DTYPE_PARAM,
                        errhp,
                        &mut col_parm,
                        i as ub4
                    )
                );
                info.columns.push(read_column_info(conn, col_parm, true)?);
            }
        }
        TypeInfoKind::Type => {
            let type_code =
                ctxt.attr_get_ub2(parm as *const c_void, OCI_DTYPE_PARAM, OCI_ATTR_TYPECODE, errhp)?;
            if type_code == OCI_TYPECODE_NAMEDCOLLECTION {
                let coll_code = ctxt.attr_get_ub2(
                    parm as *const c_void,
                    OCI_DTYPE_PARAM,
                    OCI_ATTR_COLLECTION_TYPECODE,
                    errhp,
                )?;
                info.collection = Some(if coll_code == OCI_TYPECODE_VARRAY {
                    CollectionKind::Varray
                } else {
                    CollectionKind::NestedTable
                });
                let elem_parm = ctxt.attr_get_ptr(
                    parm as *const c_void,
                    OCI_DTYPE_PARAM,
                    OCI_ATTR_COLLECTION_ELEMENT,
                    errhp,
                )?;
                let (elem_desc, _) = read_param_desc(conn, elem_parm, false)?;
                info.element_type = Some(map_oracle_type(&elem_desc, false, 0, false)?);
            } else {
                let num_attrs = ctxt.attr_get_ub2(
                    parm as *const c_void,
                    OCI_DTYPE_PARAM,
                    OCI_ATTR_NUM_TYPE_ATTRS,
                    errhp,
                )?;
                let list = ctxt.attr_get_ptr(
                    parm as *const c_void,
                    OCI_DTYPE_PARAM,
                    OCI_ATTR_LIST_TYPE_ATTRS,
                    errhp,
                )?;
                for i in 1..=num_attrs {
                    let mut attr_parm: *mut c_void = ptr::null_mut();
                    chkerr!(
                        ctxt,
                        errhp,
                        OCIParamGet(
                            list as *const c_void,
                            OCI_DTYPE_PARAM,
                            errhp,
                            &mut attr_parm,
                            i as ub4
                        )
                    );
                    info.columns.push(read_column_info(conn, attr_parm, false)?);
                }
            }
            // the type descriptor object used for binds, defines and object
            // creation
            let schema_text = OciString::new(schema, ctxt.charset());
            let name_text = OciString::new(name, ctxt.charset());
            let mut tdo: *mut OCIType = ptr::null_mut();
            chkerr!(
                ctxt,
                errhp,
                OCITypeByName(
                    ctxt.env_handle(),
                    errhp,
                    conn.svchp(),
                    if schema.is_empty() {
                        ptr::null()
                    } else {
                        schema_text.ptr()
                    },
                    schema_text.len(),
                    name_text.ptr(),
                    name_text.len(),
                    ptr::null(),
                    0,
                    OCI_DURATION_SESSION,
                    OCI_TYPEGET_ALL,
                    &mut tdo
                )
            );
            info.tdo = tdo;
        }
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_split() {
        assert_eq!(
            split_qualified_name("hr.employees"),
            ("HR".to_string(), "EMPLOYEES".to_string())
        );
        assert_eq!(
            split_qualified_name("employees"),
            (String::new(), "EMPLOYEES".to_string())
        );
        assert_eq!(
            split_qualified_name("hr.\"myType\""),
            ("HR".to_string(), "myType".to_string())
        );
    }
}
