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

//! RAII wrappers over OCI handle and descriptor allocation.
//!
//! Every allocation bumps a process-wide counter and every free undoes it, so
//! that [`crate::cleanup`] can report what the application leaked.

use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::binding::*;
use crate::context::Context;
use crate::{Error, Result};

/// Live allocation counters reported at teardown.
#[derive(Default, Debug)]
pub(crate) struct HandleCounters {
    pub handles: AtomicUsize,
    pub descriptors: AtomicUsize,
    pub objects: AtomicUsize,
}

impl HandleCounters {
    pub(crate) fn snapshot(&self) -> (usize, usize, usize) {
        (
            self.handles.load(Ordering::Relaxed),
            self.descriptors.load(Ordering::Relaxed),
            self.objects.load(Ordering::Relaxed),
        )
    }
}

/// Marker trait tying an opaque OCI handle struct to its handle-type code.
pub(crate) trait HandleType {
    const TYPE: ub4;
    const NAME: &'static str;
}

macro_rules! impl_handle_type {
    ($($ty:ty => $code:expr,)*) => {
        $(impl HandleType for $ty {
            const TYPE: ub4 = $code;
            const NAME: &'static str = stringify!($ty);
        })*
    };
}

impl_handle_type! {
    OCIError => OCI_HTYPE_ERROR,
    OCISvcCtx => OCI_HTYPE_SVCCTX,
    OCIStmt => OCI_HTYPE_STMT,
    OCIServer => OCI_HTYPE_SERVER,
    OCISession => OCI_HTYPE_SESSION,
    OCITrans => OCI_HTYPE_TRANS,
    OCIDescribe => OCI_HTYPE_DESCRIBE,
    OCISubscription => OCI_HTYPE_SUBSCRIPTION,
    OCIDirPathCtx => OCI_HTYPE_DIRPATH_CTX,
    OCIDirPathColArray => OCI_HTYPE_DIRPATH_COLUMN_ARRAY,
    OCIDirPathStream => OCI_HTYPE_DIRPATH_STREAM,
}

/// An OCI handle owned by the driver and freed on drop.
pub(crate) struct Handle<T: HandleType> {
    ctxt: &'static Context,
    raw: *mut T,
}

impl<T: HandleType> Handle<T> {
    pub(crate) fn new(ctxt: &'static Context) -> Result<Handle<T>> {
        Handle::with_parent(ctxt, ctxt.env_handle() as *const _)
    }

    /// Allocates with an explicit parent handle; direct-path column arrays
    /// and streams hang off their context instead of the environment.
    pub(crate) fn with_parent(
        ctxt: &'static Context,
        parent: *const std::os::raw::c_void,
    ) -> Result<Handle<T>> {
        let mut raw = ptr::null_mut();
        let status = match ctxt.fns().OCIHandleAlloc {
            Some(f) => unsafe { f(parent, &mut raw, T::TYPE, 0, ptr::null_mut()) },
            None => return Err(Error::not_available("OCIHandleAlloc")),
        };
        if status != OCI_SUCCESS {
            return Err(Error::out_of_memory(T::NAME));
        }
        ctxt.counters().handles.fetch_add(1, Ordering::Relaxed);
        Ok(Handle {
            ctxt,
            raw: raw as *mut T,
        })
    }

    pub(crate) fn raw(&self) -> *mut T {
        self.raw
    }
}

impl<T: HandleType> Drop for Handle<T> {
    fn drop(&mut self) {
        if let Some(f) = self.ctxt.fns().OCIHandleFree {
            unsafe { f(self.raw as *mut _, T::TYPE) };
        }
        self.ctxt.counters().handles.fetch_sub(1, Ordering::Relaxed);
    }
}

unsafe impl<T: HandleType> Send for Handle<T> {}
unsafe impl<T: HandleType> Sync for Handle<T> {}

/// An OCI descriptor owned by the driver and freed on drop.
///
/// The descriptor type code is carried at runtime because one opaque type can
/// back several codes (`OCILobLocator` serves both LOB and BFILE locators).
pub(crate) struct Descriptor<T> {
    ctxt: &'static Context,
    raw: *mut T,
    dtype: ub4,
}

impl<T> Descriptor<T> {
    pub(crate) fn new(ctxt: &'static Context, dtype: ub4) -> Result<Descriptor<T>> {
        let mut raw = ptr::null_mut();
        let status = match ctxt.fns().OCIDescriptorAlloc {
            Some(f) => unsafe {
                f(
                    ctxt.env_handle() as *const _,
                    &mut raw,
                    dtype,
                    0,
                    ptr::null_mut(),
                )
            },
            None => return Err(Error::not_available("OCIDescriptorAlloc")),
        };
        if status != OCI_SUCCESS {
            return Err(Error::out_of_memory("descriptor"));
        }
        ctxt.counters().descriptors.fetch_add(1, Ordering::Relaxed);
        Ok(Descriptor {
            ctxt,
            raw: raw as *mut T,
            dtype,
        })
    }

    pub(crate) fn raw(&self) -> *mut T {
        self.raw
    }
}

impl<T> Drop for Descriptor<T> {
    fn drop(&mut self) {
        if let Some(f) = self.ctxt.fns().OCIDescriptorFree {
            unsafe { f(self.raw as *mut _, self.dtype) };
        }
        self.ctxt
            .counters()
            .descriptors
            .fetch_sub(1, Ordering::Relaxed);
    }
}

unsafe impl<T> Send for Descriptor<T> {}
unsafe impl<T> Sync for Descriptor<T> {}

/// A batch of descriptors backing one bind or define array.
///
/// Allocated through `OCIArrayDescriptorAlloc` on 11.1+ clients and by a loop
/// of single allocations otherwise. Elements are never freed one by one; the
/// whole batch goes at once on drop.
pub(crate) struct DescriptorArray<T> {
    ctxt: &'static Context,
    raws: Vec<*mut T>,
    dtype: ub4,
    batch: bool,
    _marker: PhantomData<T>,
}

impl<T> DescriptorArray<T> {
    pub(crate) fn new(ctxt: &'static Context, dtype: ub4, count: usize) -> Result<DescriptorArray<T>> {
        let mut raws: Vec<*mut T> = vec![ptr::null_mut(); count];
        let batch = ctxt.features().array_descriptor_alloc;
        if batch {
            let status = match ctxt.fns().OCIArrayDescriptorAlloc {
                Some(f) => unsafe {
                    f(
                        ctxt.env_handle() as *const _,
                        raws.as_mut_ptr() as *mut *mut _,
                        dtype,
                        count as ub4,
                        0,
                        ptr::null_mut(),
                    )
                },
                None => return Err(Error::not_available("OCIArrayDescriptorAlloc")),
            };
            if status != OCI_SUCCESS {
                return Err(Error::out_of_memory("descriptor array"));
            }
        } else {
            let alloc = ctxt
                .fns()
                .OCIDescriptorAlloc
                .ok_or_else(|| Error::not_available("OCIDescriptorAlloc"))?;
            for (i, slot) in raws.iter_mut().enumerate() {
                let mut raw = ptr::null_mut();
                let status = unsafe {
                    alloc(
                        ctxt.env_handle() as *const _,
                        &mut raw,
                        dtype,
                        0,
                        ptr::null_mut(),
                    )
                };
                if status != OCI_SUCCESS {
                    // free what was allocated so far before bailing out
                    if let Some(free) = ctxt.fns().OCIDescriptorFree {
                        for slot in &raws[..i] {
                            unsafe { free(*slot as *mut _, dtype) };
                        }
                    }
                    return Err(Error::out_of_memory("descriptor array"));
                }
                *slot = raw as *mut T;
            }
        }
        ctxt.counters()
            .descriptors
            .fetch_add(count, Ordering::Relaxed);
        Ok(DescriptorArray {
            ctxt,
            raws,
            dtype,
            batch,
            _marker: PhantomData,
        })
    }

    pub(crate) fn get(&self, index: usize) -> *mut T {
        self.raws[index]
    }

    /// Pointer to the descriptor-pointer array, laid out the way OCI expects
    /// a descriptor-typed bind or define buffer.
    pub(crate) fn as_ptr(&self) -> *const *mut T {
        self.raws.as_ptr()
    }
}

impl<T> Drop for DescriptorArray<T> {
    fn drop(&mut self) {
        if self.raws.is_empty() {
            return;
        }
        if self.batch {
            if let Some(f) = self.ctxt.fns().OCIArrayDescriptorFree {
                unsafe { f(self.raws.as_mut_ptr() as *mut *mut _, self.dtype) };
            }
        } else if let Some(f) = self.ctxt.fns().OCIDescriptorFree {
            for raw in &self.raws {
                unsafe { f(*raw as *mut _, self.dtype) };
            }
        }
        self.ctxt
            .counters()
            .descriptors
            .fetch_sub(self.raws.len(), Ordering::Relaxed);
    }
}

unsafe impl<T> Send for DescriptorArray<T> {}
unsafe impl<T> Sync for DescriptorArray<T> {}
