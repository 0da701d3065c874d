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

//! Database change notification subscriptions and high-availability event
//! delivery.
//!
//! Callbacks arrive on the client library's notification thread. The
//! trampolines only read the event descriptor, build owned values and run
//! the user handler; no driver lock is held while they do.

use std::fmt;
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::context::{Context, HaEventSource, HaEventStatus};
use crate::error::chkerr;
use crate::sql_value::read_timestamp_descriptor;
use crate::util::OciString;
use crate::{Connection, Error, Result};

/// Kind of change reported by a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EventType {
    None,
    Startup,
    Shutdown,
    ShutdownAny,
    Deregister,
    ObjectChange,
    QueryChange,
}

impl EventType {
    fn from_oci(value: ub4) -> EventType {
        match value {
            OCI_EVENT_STARTUP => EventType::Startup,
            OCI_EVENT_SHUTDOWN => EventType::Shutdown,
            OCI_EVENT_SHUTDOWN_ANY => EventType::ShutdownAny,
            OCI_EVENT_DEREG => EventType::Deregister,
            OCI_EVENT_OBJCHANGE => EventType::ObjectChange,
            OCI_EVENT_QUERYCHANGE => EventType::QueryChange,
            _ => EventType::None,
        }
    }
}

/// Operations of interest for a change subscription, and the operation
/// reported with each row or table change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operations(pub(crate) ub4);

impl Operations {
    pub const ALL: Operations = Operations(OCI_OPCODE_ALLOPS);
    pub const INSERT: Operations = Operations(OCI_OPCODE_INSERT);
    pub const UPDATE: Operations = Operations(OCI_OPCODE_UPDATE);
    pub const DELETE: Operations = Operations(OCI_OPCODE_DELETE);
    pub const ALTER: Operations = Operations(OCI_OPCODE_ALTER);
    pub const DROP: Operations = Operations(OCI_OPCODE_DROP);

    pub fn union(self, other: Operations) -> Operations {
        Operations(self.0 | other.0)
    }

    pub fn contains(self, other: Operations) -> bool {
        self.0 & other.0 == other.0
    }
}

/// One delivered notification
///
/// Object-change events are expanded one event per row change when row-level
/// interest was registered, one per table otherwise.
#[derive(Debug, Clone)]
pub struct Event {
    event_type: EventType,
    database: String,
    object: String,
    rowid: String,
    operations: Operations,
}

impl Event {
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// `schema.table` of an object-change event; empty otherwise.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Rowid of a row-level change; empty for table-level events.
    pub fn rowid(&self) -> &str {
        &self.rowid
    }

    pub fn operations(&self) -> Operations {
        self.operations
    }
}

/// Builder of [`Subscription`]
pub struct SubscriptionBuilder {
    name: String,
    namespace: ub4,
    port: Option<u32>,
    timeout: u32,
    rowids: bool,
    operations: Operations,
}

impl SubscriptionBuilder {
    /// Starts building a change-notification subscription named `name`.
    pub fn new<N>(name: N) -> SubscriptionBuilder
    where
        N: Into<String>,
    {
        SubscriptionBuilder {
            name: name.into(),
            namespace: OCI_SUBSCR_NAMESPACE_DBCHANGE,
            port: None,
            timeout: 0,
            rowids: false,
            operations: Operations::ALL,
        }
    }

    pub(crate) fn aq(mut self) -> SubscriptionBuilder {
        self.namespace = OCI_SUBSCR_NAMESPACE_AQ;
        self
    }

    /// TCP port the client listens on for notifications.
    pub fn port(mut self, port: u32) -> SubscriptionBuilder {
        self.port = Some(port);
        self
    }

    /// Registration timeout in seconds; zero keeps it until unregistered.
    pub fn timeout(mut self, timeout: u32) -> SubscriptionBuilder {
        self.timeout = timeout;
        self
    }

    /// Requests row-level granularity; events then carry rowids.
    pub fn rowids(mut self, flag: bool) -> SubscriptionBuilder {
        self.rowids = flag;
        self
    }

    /// Restricts the operations generating notifications.
    pub fn operations(mut self, operations: Operations) -> SubscriptionBuilder {
        self.operations = operations;
        self
    }

    /// Registers the subscription on `conn` and installs the callback.
    pub fn register<F>(self, conn: &Connection, callback: F) -> Result<Subscription>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let inner = conn.conn().clone();
        let ctxt = inner.ctxt();
        ctxt.require(ctxt.features().subscriptions, "subscriptions")?;
        ctxt.require(ctxt.events(), "subscriptions (events mode)")?;
        let errhp = inner.errhp();

        let mut subscr = Box::new(SubscrInner {
            conn: inner,
            handle: ptr::null_mut(),
            callback: Box::new(callback),
            rowids: self.rowids,
            registered: false,
        });

        let mut handle: *mut c_void = ptr::null_mut();
        let alloc = ctxt
            .fns()
            .OCIHandleAlloc
            .ok_or_else(|| Error::not_available("OCIHandleAlloc"))?;
        let status = unsafe {
            alloc(
                ctxt.env_handle() as *const c_void,
                &mut handle,
                OCI_HTYPE_SUBSCRIPTION,
                0,
                ptr::null_mut(),
            )
        };
        if status != OCI_SUCCESS {
            return Err(Error::out_of_memory("OCISubscription"));
        }
        let subscrhp = handle as *mut OCISubscription;
        subscr.handle = subscrhp;

        let hndl = subscrhp as *mut c_void;
        ctxt.attr_set_ub4(
            hndl,
            OCI_HTYPE_SUBSCRIPTION,
            OCI_ATTR_SUBSCR_NAMESPACE,
            self.namespace,
            errhp,
        )?;
        if !self.name.is_empty() {
            let mut name = OciString::new(&self.name, ctxt.charset());
            chkerr!(
                ctxt,
                errhp,
                OCIAttrSet(
                    hndl,
                    OCI_HTYPE_SUBSCRIPTION,
                    name.as_mut_ptr() as *mut c_void,
                    name.len(),
                    OCI_ATTR_SUBSCR_NAME,
                    errhp
                )
            );
        }
        let notify_cb: unsafe extern "C" fn(
            *mut c_void,
            *mut OCISubscription,
            *mut c_void,
            *mut ub4,
            *mut c_void,
            ub4,
        ) -> ub4 = notify_trampoline;
        ctxt.attr_set_ptr(
            hndl,
            OCI_HTYPE_SUBSCRIPTION,
            OCI_ATTR_SUBSCR_CALLBACK,
            notify_cb as *mut c_void,
            errhp,
        )?;
        ctxt.attr_set_ptr(
            hndl,
            OCI_HTYPE_SUBSCRIPTION,
            OCI_ATTR_SUBSCR_CTX,
            subscr.as_mut() as *mut SubscrInner as *mut c_void,
            errhp,
        )?;
        if let Some(port) = self.port {
            // the port is environment-scoped in OCI
            ctxt.attr_set_ub4(
                ctxt.env_handle() as *mut c_void,
                OCI_HTYPE_ENV,
                OCI_ATTR_SUBSCR_PORTNO,
                port,
                errhp,
            )?;
        }
        if self.timeout != 0 {
            ctxt.attr_set_ub4(
                hndl,
                OCI_HTYPE_SUBSCRIPTION,
                OCI_ATTR_SUBSCR_TIMEOUT,
                self.timeout,
                errhp,
            )?;
        }
        if self.namespace == OCI_SUBSCR_NAMESPACE_DBCHANGE {
            ctxt.attr_set_ub4(
                hndl,
                OCI_HTYPE_SUBSCRIPTION,
                OCI_ATTR_CHNF_ROWIDS,
                self.rowids as ub4,
                errhp,
            )?;
            if self.operations != Operations::ALL {
                ctxt.attr_set_ub4(
                    hndl,
                    OCI_HTYPE_SUBSCRIPTION,
                    OCI_ATTR_CHNF_OPERATIONS,
                    self.operations.0,
                    errhp,
                )?;
            }
        } else {
            ctxt.attr_set_ub4(
                hndl,
                OCI_HTYPE_SUBSCRIPTION,
                OCI_ATTR_SUBSCR_RECPTPROTO,
                OCI_SUBSCR_PROTO_OCI,
                errhp,
            )?;
            ctxt.attr_set_ub4(
                hndl,
                OCI_HTYPE_SUBSCRIPTION,
                OCI_ATTR_SUBSCR_RECPTPRES,
                OCI_SUBSCR_PRES_DEFAULT,
                errhp,
            )?;
        }

        let mut subscrhp_reg = subscrhp;
        chkerr!(
            ctxt,
            errhp,
            OCISubscriptionRegister(subscr.conn.svchp(), &mut subscrhp_reg, 1, errhp, OCI_DEFAULT)
        );
        subscr.registered = true;
        Ok(Subscription { inner: subscr })
    }
}

struct SubscrInner {
    conn: Arc<ConnInner>,
    handle: *mut OCISubscription,
    callback: Box<dyn Fn(&Event) + Send + Sync>,
    rowids: bool,
    registered: bool,
}

/// A registered notification subscription
///
/// Dropping the value unregisters it.
pub struct Subscription {
    inner: Box<SubscrInner>,
}

impl Subscription {
    /// Unregisters the subscription; no callback fires afterwards.
    pub fn unregister(mut self) -> Result<()> {
        self.unregister_internal()
    }

    fn unregister_internal(&mut self) -> Result<()> {
        if !self.inner.registered {
            return Ok(());
        }
        self.inner.registered = false;
        let ctxt = self.inner.conn.ctxt();
        let errhp = self.inner.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCISubscriptionUnRegister(self.inner.conn.svchp(), self.inner.handle, errhp, OCI_DEFAULT)
        );
        Ok(())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.unregister_internal();
        let ctxt = self.inner.conn.ctxt();
        if let Some(f) = ctxt.fns().OCIHandleFree {
            unsafe { f(self.inner.handle as *mut c_void, OCI_HTYPE_SUBSCRIPTION) };
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Subscription {{ registered: {} }}", self.inner.registered)
    }
}

/// Walks one change descriptor into owned events.
fn events_from_descriptor(
    ctxt: &'static Context,
    conn: &Arc<ConnInner>,
    descriptor: *mut c_void,
    rowids: bool,
) -> Result<Vec<Event>> {
    let errhp = conn.errhp();
    let nfy_type = ctxt.attr_get_ub4(descriptor, OCI_DTYPE_CHDES, OCI_ATTR_CHDES_NFYTYPE, errhp)?;
    let event_type = EventType::from_oci(nfy_type);
    let database = ctxt.attr_get_text(descriptor, OCI_DTYPE_CHDES, OCI_ATTR_CHDES_DBNAME, errhp)?;
    let base = Event {
        event_type,
        database,
        object: String::new(),
        rowid: String::new(),
        operations: Operations::ALL,
    };
    let mut events = Vec::new();
    match event_type {
        EventType::Startup | EventType::Shutdown | EventType::ShutdownAny
        | EventType::Deregister => {
            events.push(base);
        }
        EventType::ObjectChange | EventType::QueryChange => {
            let changes = ctxt.attr_get_ptr(
                descriptor,
                OCI_DTYPE_CHDES,
                OCI_ATTR_CHDES_TABLE_CHANGES,
                errhp,
            )? as *mut OCIColl;
            if changes.is_null() {
                events.push(base);
                return Ok(events);
            }
            let mut size: sb4 = 0;
            chkerr!(
                ctxt,
                errhp,
                OCICollSize(ctxt.env_handle(), errhp, changes, &mut size)
            );
            for i in 0..size {
                let mut exists: boolean = 0;
                let mut elem: *mut c_void = ptr::null_mut();
                let mut elemind: *mut c_void = ptr::null_mut();
                chkerr!(
                    ctxt,
                    errhp,
                    OCICollGetElem(
                        ctxt.env_handle(),
                        errhp,
                        changes,
                        i,
                        &mut exists,
                        &mut elem,
                        &mut elemind
                    )
                );
                if exists == 0 {
                    continue;
                }
                let table_desc = unsafe { *(elem as *mut *mut c_void) };
                let table = ctxt.attr_get_text(
                    table_desc,
                    OCI_DTYPE_TABLE_CHDES,
                    OCI_ATTR_CHDES_TABLE_NAME,
                    errhp,
                )?;
                let table_ops = ctxt.attr_get_ub4(
                    table_desc,
                    OCI_DTYPE_TABLE_CHDES,
                    OCI_ATTR_CHDES_TABLE_OPFLAGS,
                    errhp,
                )?;
                let row_changes = if rowids && (table_ops & OCI_OPCODE_ALLROWS) == 0 {
                    ctxt.attr_get_ptr(
                        table_desc,
                        OCI_DTYPE_TABLE_CHDES,
                        OCI_ATTR_CHDES_TABLE_ROW_CHANGES,
                        errhp,
                    )? as *mut OCIColl
                } else {
                    ptr::null_mut()
                };
                if row_changes.is_null() {
                    events.push(Event {
                        object: table,
                        operations: Operations(table_ops),
                        ..base.clone()
                    });
                    continue;
                }
                let mut row_count: sb4 = 0;
                chkerr!(
                    ctxt,
                    errhp,
                    OCICollSize(ctxt.env_handle(), errhp, row_changes, &mut row_count)
                );
                for j in 0..row_count {
                    let mut exists: boolean = 0;
                    let mut elem: *mut c_void = ptr::null_mut();
                    let mut elemind: *mut c_void = ptr::null_mut();
                    chkerr!(
                        ctxt,
                        errhp,
                        OCICollGetElem(
                            ctxt.env_handle(),
                            errhp,
                            row_changes,
                            j,
                            &mut exists,
                            &mut elem,
                            &mut elemind
                        )
                    );
                    if exists == 0 {
                        continue;
                    }
                    let row_desc = unsafe { *(elem as *mut *mut c_void) };
                    let rowid = ctxt.attr_get_text(
                        row_desc,
                        OCI_DTYPE_ROW_CHDES,
                        OCI_ATTR_CHDES_ROW_ROWID,
                        errhp,
                    )?;
                    let row_ops = ctxt.attr_get_ub4(
                        row_desc,
                        OCI_DTYPE_ROW_CHDES,
                        OCI_ATTR_CHDES_ROW_OPFLAGS,
                        errhp,
                    )?;
                    events.push(Event {
                        object: table.clone(),
                        rowid,
                        operations: Operations(row_ops),
                        ..base.clone()
                    });
                }
            }
        }
        // not one of the registered interests
        EventType::None => (),
    }
    Ok(events)
}

unsafe extern "C" fn notify_trampoline(
    ctx: *mut c_void,
    _subscrhp: *mut OCISubscription,
    _payload: *mut c_void,
    _payl: *mut ub4,
    descriptor: *mut c_void,
    _mode: ub4,
) -> ub4 {
    let inner = &*(ctx as *const SubscrInner);
    let ctxt = inner.conn.ctxt();
    if descriptor.is_null() {
        // AQ notifications deliver no change descriptor; surface one empty
        // event so the consumer can dequeue
        let event = Event {
            event_type: EventType::None,
            database: String::new(),
            object: String::new(),
            rowid: String::new(),
            operations: Operations::ALL,
        };
        (inner.callback)(&event);
        return OCI_SUCCESS as ub4;
    }
    match events_from_descriptor(ctxt, &inner.conn, descriptor, inner.rowids) {
        Ok(events) => {
            for event in &events {
                (inner.callback)(event);
            }
        }
        Err(err) => log::warn!("dropping change notification: {}", err),
    }
    OCI_SUCCESS as ub4
}

//
// high-availability event delivery
//

pub(crate) fn install_ha_callback(ctxt: &'static Context) -> Result<()> {
    let errhp = ctxt.error_handle();
    let ha_cb: unsafe extern "C" fn(*mut c_void, *mut OCIEvent) = ha_trampoline;
    ctxt.attr_set_ptr(
        ctxt.env_handle() as *mut c_void,
        OCI_HTYPE_ENV,
        OCI_ATTR_EVTCBK,
        ha_cb as *mut c_void,
        errhp,
    )?;
    ctxt.attr_set_ptr(
        ctxt.env_handle() as *mut c_void,
        OCI_HTYPE_ENV,
        OCI_ATTR_EVTCTX,
        ctxt as *const Context as *mut c_void,
        errhp,
    )?;
    Ok(())
}

fn ha_source_from_oci(value: ub4) -> HaEventSource {
    match value {
        OCI_HA_SOURCE_DATABASE => HaEventSource::Database,
        OCI_HA_SOURCE_NODE => HaEventSource::Node,
        OCI_HA_SOURCE_SERVICE => HaEventSource::Service,
        OCI_HA_SOURCE_SERVICE_MEMBER => HaEventSource::ServiceMember,
        OCI_HA_SOURCE_ASM_INSTANCE => HaEventSource::AsmInstance,
        _ => HaEventSource::Instance,
    }
}

unsafe extern "C" fn ha_trampoline(evtctx: *mut c_void, eventhp: *mut OCIEvent) {
    let ctxt = &*(evtctx as *const Context);
    let errhp = ctxt.error_handle();
    let hndl = eventhp as *const c_void;
    let source = ctxt
        .attr_get_ub4(hndl, OCI_HTYPE_EVENT, OCI_ATTR_HA_SOURCE, errhp)
        .map(ha_source_from_oci)
        .unwrap_or(HaEventSource::Instance);
    let status = match ctxt.attr_get_ub4(hndl, OCI_HTYPE_EVENT, OCI_ATTR_HA_STATUS, errhp) {
        Ok(OCI_HA_STATUS_UP) => HaEventStatus::Up,
        _ => HaEventStatus::Down,
    };
    let timestamp = ctxt
        .attr_get_ptr(hndl, OCI_HTYPE_EVENT, OCI_ATTR_HA_TIMESTAMP, errhp)
        .ok()
        .filter(|p| !p.is_null())
        .and_then(|p| {
            read_timestamp_descriptor(ctxt, errhp, p as *mut OCIDateTime, false).ok()
        });

    // walk the affected servers and fan out once per registered connection
    let mut srvhp = match ctxt.attr_get_ptr(hndl, OCI_HTYPE_EVENT, OCI_ATTR_HA_SRVFIRST, errhp) {
        Ok(p) => p,
        Err(_) => return,
    };
    let handler_guard = ctxt.ha_handler().lock().unwrap_or_else(|e| e.into_inner());
    let Some(handler) = handler_guard.as_ref() else {
        return;
    };
    while !srvhp.is_null() {
        let connections: Vec<Arc<ConnInner>> = {
            let registry = ctxt.conn_registry().lock().unwrap_or_else(|e| e.into_inner());
            registry
                .iter()
                .filter_map(|weak| weak.upgrade())
                .filter(|conn| conn.server_handle() as *mut c_void == srvhp)
                .collect()
        };
        for inner in connections {
            let conn = Connection::from_inner(inner);
            handler(&conn, source, status, timestamp);
        }
        srvhp = match ctxt.attr_get_ptr(hndl, OCI_HTYPE_EVENT, OCI_ATTR_HA_SRVNEXT, errhp) {
            Ok(p) => p,
            Err(_) => break,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_mapping() {
        assert_eq!(EventType::from_oci(OCI_EVENT_OBJCHANGE), EventType::ObjectChange);
        assert_eq!(EventType::from_oci(OCI_EVENT_DEREG), EventType::Deregister);
        assert_eq!(EventType::from_oci(12345), EventType::None);
    }

    #[test]
    fn operations_set_logic() {
        let ops = Operations::INSERT.union(Operations::DELETE);
        assert!(ops.contains(Operations::INSERT));
        assert!(ops.contains(Operations::DELETE));
        assert!(!ops.contains(Operations::UPDATE));
    }
}
