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
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::error::chkerr;
use crate::sql_type::object::{element_to_sql_value, ElementRepr, ValueSource};
use crate::sql_type::{FromSql, NativeType, OracleType, ToSql};
use crate::sql_value::SqlValue;
use crate::type_info::{CollectionKind, TypeInfo};
use crate::{Error, Result};

/// Value of a VARRAY or nested-table type
///
/// # Examples
///
/// ```no_run
/// # use ocilib::*;
/// # use ocilib::sql_type::Collection;
/// # let conn = Connection::connect("scott", "tiger", "")?;
/// let coll_type = conn.object_type("UDT_STRING_LIST")?;
/// let mut coll = Collection::new(&conn, &coll_type)?;
/// coll.push(&"first")?;
/// coll.push(&"second")?;
/// assert_eq!(coll.size()?, 2);
/// assert_eq!(coll.get::<String>(1)?, "second");
/// # Ok::<(), Error>(())
/// ```
pub struct Collection {
    conn: Arc<ConnInner>,
    type_info: Arc<TypeInfo>,
    coll: *mut OCIColl,
    source: ValueSource,
}

impl Collection {
    /// Creates an empty collection value of `type_info`.
    pub fn new(conn: &crate::Connection, type_info: &Arc<TypeInfo>) -> Result<Collection> {
        let kind = type_info.collection_kind().ok_or_else(|| {
            Error::invalid_argument(format!("{} is not a collection type", type_info.name()))
        })?;
        let conn = conn.conn().clone();
        let ctxt = conn.ctxt();
        let errhp = conn.errhp();
        let typecode = match kind {
            CollectionKind::Varray => OCI_TYPECODE_VARRAY,
            CollectionKind::NestedTable => OCI_TYPECODE_TABLE,
        };
        let mut instance: *mut c_void = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIObjectNew(
                ctxt.env_handle(),
                errhp,
                conn.svchp(),
                typecode,
                type_info.tdo(),
                ptr::null_mut(),
                OCI_DURATION_SESSION,
                TRUE,
                &mut instance
            )
        );
        ctxt.counters().objects.fetch_add(1, Ordering::Relaxed);
        Ok(Collection {
            conn,
            type_info: type_info.clone(),
            coll: instance as *mut OCIColl,
            source: ValueSource::Owned,
        })
    }

    pub(crate) fn from_instance(
        conn: Arc<ConnInner>,
        type_info: Arc<TypeInfo>,
        coll: *mut OCIColl,
        source: ValueSource,
    ) -> Collection {
        Collection {
            conn,
            type_info,
            coll,
            source,
        }
    }

    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.type_info
    }

    fn element_type(&self) -> Result<&OracleType> {
        self.type_info.element_type().ok_or_else(|| {
            Error::internal(format!("{} has no element type", self.type_info.name()))
        })
    }

    /// Current number of elements.
    pub fn size(&self) -> Result<i32> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut size: sb4 = 0;
        chkerr!(
            ctxt,
            errhp,
            OCICollSize(ctxt.env_handle(), errhp, self.coll, &mut size)
        );
        Ok(size)
    }

    /// Upper bound of a VARRAY; zero for a nested table.
    pub fn max_size(&self) -> Result<i32> {
        let ctxt = self.conn.ctxt();
        let max = crate::error::oci_call!(ctxt, OCICollMax(ctxt.env_handle(), self.coll));
        Ok(max)
    }

    /// Reads the element at `index` (zero-based).
    pub fn get<T>(&self, index: i32) -> Result<T>
    where
        T: FromSql,
    {
        let value = self.element_value(index)?;
        T::from_sql(&value)
    }

    fn element_value(&self, index: i32) -> Result<SqlValue> {
        let oratype = self.element_type()?.clone();
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut exists: boolean = 0;
        let mut elem: *mut c_void = ptr::null_mut();
        let mut elemind: *mut c_void = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCICollGetElem(
                ctxt.env_handle(),
                errhp,
                self.coll,
                index,
                &mut exists,
                &mut elem,
                &mut elemind
            )
        );
        if exists == 0 {
            return Err(Error::no_data_found());
        }
        let indicator = if elemind.is_null() {
            OCI_IND_NOTNULL
        } else {
            unsafe { *(elemind as *const OCIInd) }
        };
        element_to_sql_value(&self.conn, &oratype, elem, elemind, indicator)
    }

    /// Replaces the element at `index` (zero-based).
    pub fn set(&mut self, index: i32, value: &dyn ToSql) -> Result<()> {
        let oratype = self.element_type()?.clone();
        let repr = self.element_repr(&oratype, value)?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCICollAssignElem(
                ctxt.env_handle(),
                errhp,
                index,
                repr.value_ptr(),
                repr.indicator_ptr(),
                self.coll
            )
        );
        Ok(())
    }

    /// Appends an element, growing the collection by one.
    pub fn push(&mut self, value: &dyn ToSql) -> Result<()> {
        let oratype = self.element_type()?.clone();
        let repr = self.element_repr(&oratype, value)?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCICollAppend(
                ctxt.env_handle(),
                errhp,
                repr.value_ptr(),
                repr.indicator_ptr(),
                self.coll
            )
        );
        Ok(())
    }

    fn element_repr(&self, oratype: &OracleType, value: &dyn ToSql) -> Result<ElementRepr> {
        let mut tmp = SqlValue::new(self.conn.clone(), oratype, 1)?;
        value.to_sql(&mut tmp)?;
        ElementRepr::from_sql_value(tmp)
    }

    /// Removes `count` elements from the end.
    pub fn trim(&mut self, count: i32) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCICollTrim(ctxt.env_handle(), errhp, count, self.coll)
        );
        Ok(())
    }

    /// True when an element exists at `index`. Nested tables may have holes
    /// after deletions.
    pub fn exists(&self, index: i32) -> Result<bool> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut exists: boolean = 0;
        let mut elem: *mut c_void = ptr::null_mut();
        let mut elemind: *mut c_void = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCICollGetElem(
                ctxt.env_handle(),
                errhp,
                self.coll,
                index,
                &mut exists,
                &mut elem,
                &mut elemind
            )
        );
        Ok(exists != 0)
    }

    /// Returns a restartable iterator over the elements.
    pub fn iter<T>(&self) -> Result<CollectionIter<'_, T>>
    where
        T: FromSql,
    {
        CollectionIter::new(self)
    }

    pub(crate) fn raw(&self) -> *mut OCIColl {
        self.coll
    }
}

impl Drop for Collection {
    fn drop(&mut self) {
        if self.source == ValueSource::Owned {
            let ctxt = self.conn.ctxt();
            if let Some(f) = ctxt.fns().OCIObjectFree {
                unsafe {
                    f(
                        ctxt.env_handle(),
                        self.conn.errhp(),
                        self.coll as *mut c_void,
                        OCI_OBJECTFREE_FORCE,
                    )
                };
            }
            ctxt.counters().objects.fetch_sub(1, Ordering::Relaxed);
        }
    }
}

impl FromSql for Collection {
    fn from_sql(val: &SqlValue) -> Result<Collection> {
        let type_info = match val.native() {
            NativeType::Object(ti) if ti.collection_kind().is_some() => ti.clone(),
            _ => {
                return Err(Error::invalid_type_conversion(
                    &val.oracle_type().to_string(),
                    "Collection",
                ))
            }
        };
        let (instance, _) = val.object_instance()?;
        Ok(Collection::from_instance(
            val.conn().clone(),
            type_info,
            instance as *mut OCIColl,
            ValueSource::Fetched,
        ))
    }
}

impl ToSql for Collection {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::Object(self.type_info.clone()))
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_object_instance(self.coll as *mut c_void, ptr::null_mut())
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Collection({})", self.type_info.name())
    }
}

/// Restartable cursor over the elements of a [`Collection`]
///
/// Forward traversal through [`Iterator::next`]; [`CollectionIter::prev`]
/// walks backward and [`CollectionIter::reset`] rewinds to the beginning.
pub struct CollectionIter<'coll, T: FromSql> {
    coll: &'coll Collection,
    iter: *mut OCIIter,
    phantom: PhantomData<T>,
}

impl<'coll, T: FromSql> CollectionIter<'coll, T> {
    fn new(coll: &'coll Collection) -> Result<CollectionIter<'coll, T>> {
        let ctxt = coll.conn.ctxt();
        let errhp = coll.conn.errhp();
        let mut iter: *mut OCIIter = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIIterCreate(ctxt.env_handle(), errhp, coll.coll, &mut iter)
        );
        Ok(CollectionIter {
            coll,
            iter,
            phantom: PhantomData,
        })
    }

    fn read(&self, elem: *mut c_void, elemind: *mut c_void) -> Result<T> {
        let oratype = self.coll.element_type()?.clone();
        let indicator = if elemind.is_null() {
            OCI_IND_NOTNULL
        } else {
            unsafe { *(elemind as *const OCIInd) }
        };
        let value = element_to_sql_value(&self.coll.conn, &oratype, elem, elemind, indicator)?;
        T::from_sql(&value)
    }

    fn try_next(&mut self) -> Result<Option<T>> {
        let ctxt = self.coll.conn.ctxt();
        let errhp = self.coll.conn.errhp();
        let mut elem: *mut c_void = ptr::null_mut();
        let mut elemind: *mut c_void = ptr::null_mut();
        let mut eoc: boolean = 0;
        chkerr!(
            ctxt,
            errhp,
            OCIIterNext(ctxt.env_handle(), errhp, self.iter, &mut elem, &mut elemind, &mut eoc)
        );
        if eoc != 0 {
            return Ok(None);
        }
        Ok(Some(self.read(elem, elemind)?))
    }

    /// Steps backward. Returns `None` at the beginning of the collection.
    pub fn prev(&mut self) -> Option<Result<T>> {
        let ctxt = self.coll.conn.ctxt();
        let errhp = self.coll.conn.errhp();
        let mut elem: *mut c_void = ptr::null_mut();
        let mut elemind: *mut c_void = ptr::null_mut();
        let mut boc: boolean = 0;
        let mut inner = || -> Result<Option<T>> {
            chkerr!(
                ctxt,
                errhp,
                OCIIterPrev(ctxt.env_handle(), errhp, self.iter, &mut elem, &mut elemind, &mut boc)
            );
            if boc != 0 {
                return Ok(None);
            }
            Ok(Some(self.read(elem, elemind)?))
        };
        inner().transpose()
    }

    /// Rewinds the cursor before the first element.
    pub fn reset(&mut self) -> Result<()> {
        let ctxt = self.coll.conn.ctxt();
        let errhp = self.coll.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCIIterInit(ctxt.env_handle(), errhp, self.coll.coll, self.iter)
        );
        Ok(())
    }
}

impl<T: FromSql> Iterator for CollectionIter<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        self.try_next().transpose()
    }
}

impl<T: FromSql> Drop for CollectionIter<'_, T> {
    fn drop(&mut self) {
        let ctxt = self.coll.conn.ctxt();
        if let Some(f) = ctxt.fns().OCIIterDelete {
            unsafe { f(ctxt.env_handle(), self.coll.conn.errhp(), &mut self.iter) };
        }
    }
}
