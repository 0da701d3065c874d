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

//! Global (XA-style) transactions with explicit branches.
//!
//! Local transactions need no object here: they start implicitly on the
//! first DML and end through [`crate::Connection::commit`] /
//! [`crate::Connection::rollback`].

use std::marker::PhantomData;
use std::mem;
use std::os::raw::c_void;
use std::sync::Arc;
use std::time::Duration;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::error::chkerr;
use crate::handle::Handle;
use crate::{Connection, Error, Result};

/// X/Open transaction branch identifier
///
/// `gtrid` and `bqual` are limited to 64 bytes each, sharing the 128-byte
/// data area of the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xid {
    format_id: i32,
    gtrid: Vec<u8>,
    bqual: Vec<u8>,
}

impl Xid {
    pub fn new(format_id: i32, gtrid: &[u8], bqual: &[u8]) -> Result<Xid> {
        if gtrid.len() > 64 {
            return Err(Error::new(
                crate::ErrorKind::InvalidXid,
                format!("global transaction id too long: {} bytes", gtrid.len()),
            ));
        }
        if bqual.len() > 64 {
            return Err(Error::new(
                crate::ErrorKind::InvalidXid,
                format!("branch qualifier too long: {} bytes", bqual.len()),
            ));
        }
        Ok(Xid {
            format_id,
            gtrid: gtrid.to_vec(),
            bqual: bqual.to_vec(),
        })
    }

    fn to_oci(&self) -> XID {
        let mut xid = XID {
            format_id: self.format_id as _,
            gtrid_length: self.gtrid.len() as _,
            bqual_length: self.bqual.len() as _,
            data: [0; XID_DATA_SIZE],
        };
        xid.data[..self.gtrid.len()].copy_from_slice(&self.gtrid);
        xid.data[self.gtrid.len()..self.gtrid.len() + self.bqual.len()]
            .copy_from_slice(&self.bqual);
        xid
    }
}

/// Isolation of a global transaction branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionIsolation {
    ReadOnly,
    ReadWrite,
    Serializable,
}

impl TransactionIsolation {
    fn to_flag(self) -> ub4 {
        match self {
            TransactionIsolation::ReadOnly => OCI_TRANS_READONLY,
            TransactionIsolation::ReadWrite => OCI_TRANS_READWRITE,
            TransactionIsolation::Serializable => OCI_TRANS_SERIALIZABLE,
        }
    }
}

/// Branch coupling of a global transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionCoupling {
    Loose,
    Tight,
}

impl TransactionCoupling {
    fn to_flag(self) -> ub4 {
        match self {
            TransactionCoupling::Loose => OCI_TRANS_LOOSE,
            TransactionCoupling::Tight => OCI_TRANS_TIGHT,
        }
    }
}

/// A global transaction branch attached to one connection
///
/// # Examples
///
/// ```no_run
/// # use ocilib::*;
/// # use std::time::Duration;
/// # let conn = Connection::connect("scott", "tiger", "")?;
/// let xid = Xid::new(1000, b"gtrid-1", b"branch-1")?;
/// let mut txn = Transaction::new(&conn, xid, Duration::from_secs(60))?;
/// txn.start()?;
/// conn.execute("insert into t values (1)", &[])?;
/// txn.prepare()?;
/// txn.commit()?;
/// # Ok::<(), Error>(())
/// ```
pub struct Transaction<'conn> {
    conn: Arc<ConnInner>,
    txnhp: Handle<OCITrans>,
    xid: Xid,
    timeout: Duration,
    isolation: TransactionIsolation,
    coupling: TransactionCoupling,
    started: bool,
    prepared: bool,
    _phantom: PhantomData<&'conn Connection>,
}

impl<'conn> Transaction<'conn> {
    /// Creates a transaction branch and attaches it to the connection's
    /// service context. The branch is inert until [`Transaction::start`].
    pub fn new(conn: &'conn Connection, xid: Xid, timeout: Duration) -> Result<Transaction<'conn>> {
        let inner = conn.conn().clone();
        let ctxt = inner.ctxt();
        ctxt.require(ctxt.features().xa, "global transactions")?;
        let errhp = inner.errhp();
        let txnhp = Handle::<OCITrans>::new(ctxt)?;
        let mut oci_xid = xid.to_oci();
        chkerr!(
            ctxt,
            errhp,
            OCIAttrSet(
                txnhp.raw() as *mut c_void,
                OCI_HTYPE_TRANS,
                &mut oci_xid as *mut XID as *mut c_void,
                mem::size_of::<XID>() as ub4,
                OCI_ATTR_XID,
                errhp
            )
        );
        ctxt.attr_set_ptr(
            inner.svchp() as *mut c_void,
            OCI_HTYPE_SVCCTX,
            OCI_ATTR_TRANS,
            txnhp.raw() as *mut c_void,
            errhp,
        )?;
        Ok(Transaction {
            conn: inner,
            txnhp,
            xid,
            timeout,
            isolation: TransactionIsolation::ReadWrite,
            coupling: TransactionCoupling::Tight,
            started: false,
            prepared: false,
            _phantom: PhantomData,
        })
    }

    pub fn isolation(&mut self, isolation: TransactionIsolation) -> &mut Transaction<'conn> {
        self.isolation = isolation;
        self
    }

    pub fn coupling(&mut self, coupling: TransactionCoupling) -> &mut Transaction<'conn> {
        self.coupling = coupling;
        self
    }

    pub fn xid(&self) -> &Xid {
        &self.xid
    }

    fn trans_start(&mut self, flags: ub4) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCITransStart(
                self.conn.svchp(),
                errhp,
                self.timeout.as_secs() as uword,
                flags
            )
        );
        self.started = true;
        Ok(())
    }

    /// Starts a new branch.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(Error::invalid_state("the transaction is already started"));
        }
        self.trans_start(OCI_TRANS_NEW | self.isolation.to_flag() | self.coupling.to_flag())
    }

    /// Resumes a branch previously detached with [`Transaction::stop`].
    pub fn resume(&mut self) -> Result<()> {
        self.trans_start(OCI_TRANS_RESUME)
    }

    /// Detaches the branch from this connection; it can be resumed later,
    /// also from another connection bearing the same XID.
    pub fn stop(&mut self) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCITransDetach(self.conn.svchp(), errhp, OCI_DEFAULT)
        );
        self.started = false;
        Ok(())
    }

    /// First phase of two-phase commit.
    pub fn prepare(&mut self) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCITransPrepare(self.conn.svchp(), errhp, OCI_DEFAULT)
        );
        self.prepared = true;
        Ok(())
    }

    /// Commits the branch; two-phase when [`Transaction::prepare`] ran.
    pub fn commit(&mut self) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let flags = if self.prepared {
            OCI_TRANS_TWOPHASE
        } else {
            OCI_DEFAULT
        };
        chkerr!(ctxt, errhp, OCITransCommit(self.conn.svchp(), errhp, flags));
        self.started = false;
        self.prepared = false;
        Ok(())
    }

    pub fn rollback(&mut self) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCITransRollback(self.conn.svchp(), errhp, OCI_DEFAULT)
        );
        self.started = false;
        self.prepared = false;
        Ok(())
    }

    /// Tells the server to forget a heuristically completed branch.
    pub fn forget(&mut self) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCITransForget(self.conn.svchp(), errhp, OCI_DEFAULT)
        );
        self.started = false;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        // detach the service context from the branch; the local implicit
        // transaction state of the connection is valid again afterwards
        let ctxt = self.conn.ctxt();
        let _ = ctxt.attr_set_ptr(
            self.conn.svchp() as *mut c_void,
            OCI_HTYPE_SVCCTX,
            OCI_ATTR_TRANS,
            std::ptr::null_mut(),
            self.conn.errhp(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xid_layout() {
        let xid = Xid::new(1000, b"gtrid", b"bqual").unwrap();
        let oci = xid.to_oci();
        assert_eq!(oci.format_id, 1000);
        assert_eq!(oci.gtrid_length, 5);
        assert_eq!(oci.bqual_length, 5);
        assert_eq!(&oci.data[..5], b"gtrid");
        assert_eq!(&oci.data[5..10], b"bqual");
    }

    #[test]
    fn oversized_xid_parts_rejected() {
        assert!(Xid::new(1, &[0u8; 65], b"").is_err());
        assert!(Xid::new(1, b"", &[0u8; 65]).is_err());
        assert!(Xid::new(1, &[0u8; 64], &[0u8; 64]).is_ok());
    }
}
