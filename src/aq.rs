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

//! Oracle Advanced Queuing
//!
//! # Examples
//!
//! ```no_run
//! # use ocilib::Error;
//! # use ocilib::aq;
//! # use ocilib::Connection;
//! # let conn = Connection::connect("scott", "tiger", "")?;
//! // Create a queue of RAW messages
//! let mut queue = aq::Queue::<[u8]>::new(&conn, "RAW_QUEUE", &())?;
//!
//! // Enqueue a message
//! let mut msg = aq::MsgProps::<[u8]>::new(&conn)?;
//! msg.set_payload(&[0x01, 0x02, 0x03])?;
//! msg.set_priority(5)?;
//! queue.enqueue(&msg)?;
//!
//! // Dequeue it back
//! queue.deq_options_mut().set_wait(Some(std::time::Duration::from_secs(1)))?;
//! if let Some(received) = queue.dequeue()? {
//!     assert_eq!(received.payload()?, vec![0x01, 0x02, 0x03]);
//! }
//! # Ok::<(), Error>(())
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;
use std::time::Duration;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::error::{chkerr, fetch_dberr};
use crate::handle::Descriptor;
use crate::sql_type::Object;
use crate::sql_value::date_to_timestamp;
use crate::sql_type::Timestamp;
use crate::subscr::{Subscription, SubscriptionBuilder};
use crate::type_info::{TypeInfo, TypeInfoKind};
use crate::util::{Charset, OciString};
use crate::{Connection, Error, Result};

mod private {
    pub trait Sealed {}
    impl Sealed for [u8] {}
    impl Sealed for crate::sql_type::Object {}
}

/// Queue payload kind: `[u8]` for RAW queues, [`Object`] for typed queues.
pub trait Payload: private::Sealed {
    /// Third argument of [`Queue::new`]: `&()` for RAW queues, the payload
    /// type description for object queues.
    type TypeConfig: ?Sized;

    #[doc(hidden)]
    fn payload_type_info(
        conn: &Connection,
        config: &Self::TypeConfig,
    ) -> Result<Arc<TypeInfo>>;
}

impl Payload for [u8] {
    type TypeConfig = ();

    fn payload_type_info(conn: &Connection, _config: &()) -> Result<Arc<TypeInfo>> {
        // RAW queues transport SYS.RAW values
        conn.type_info("SYS.RAW", TypeInfoKind::Type)
    }
}

impl Payload for Object {
    type TypeConfig = Arc<TypeInfo>;

    fn payload_type_info(_conn: &Connection, config: &Arc<TypeInfo>) -> Result<Arc<TypeInfo>> {
        Ok(config.clone())
    }
}

/// When an enqueued message or a dequeue result becomes visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Part of the current transaction
    OnCommit,
    /// Its own transaction
    Immediate,
}

impl Visibility {
    fn to_oci(self) -> ub4 {
        match self {
            Visibility::OnCommit => OCI_ENQ_ON_COMMIT,
            Visibility::Immediate => OCI_ENQ_IMMEDIATE,
        }
    }
}

/// Placement of an enqueued message relative to others
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceDeviation {
    /// Before the message identified by the relative message id
    Before,
    /// Ahead of every other message
    Top,
}

impl SequenceDeviation {
    fn to_oci(self) -> ub4 {
        match self {
            SequenceDeviation::Before => OCI_ENQ_BEFORE,
            SequenceDeviation::Top => OCI_ENQ_TOP,
        }
    }
}

/// Dequeue locking behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeqMode {
    /// Read without locking or removing
    Browse,
    /// Read and lock, remove happens on commit
    Locked,
    /// Read and remove
    Remove,
    /// Remove without returning payload data
    RemoveNoData,
}

impl DeqMode {
    fn to_oci(self) -> ub4 {
        match self {
            DeqMode::Browse => OCI_DEQ_BROWSE,
            DeqMode::Locked => OCI_DEQ_LOCKED,
            DeqMode::Remove => OCI_DEQ_REMOVE,
            DeqMode::RemoveNoData => OCI_DEQ_REMOVE_NODATA,
        }
    }
}

/// Which message a dequeue positions on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeqNavigation {
    FirstMessage,
    NextMessage,
    NextTransaction,
}

impl DeqNavigation {
    fn to_oci(self) -> ub4 {
        match self {
            DeqNavigation::FirstMessage => OCI_DEQ_FIRST_MSG,
            DeqNavigation::NextMessage => OCI_DEQ_NEXT_MSG,
            DeqNavigation::NextTransaction => OCI_DEQ_NEXT_TRANSACTION,
        }
    }
}

/// Delivery state of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageState {
    Ready,
    Waiting,
    Processed,
    Expired,
}

impl MessageState {
    fn from_oci(value: ub4) -> MessageState {
        match value {
            OCI_MSG_WAITING => MessageState::Waiting,
            OCI_MSG_PROCESSED => MessageState::Processed,
            OCI_MSG_EXPIRED => MessageState::Expired,
            _ => MessageState::Ready,
        }
    }
}

/// An AQ agent identified by name and optional address
pub struct Agent {
    conn: Arc<ConnInner>,
    handle: Descriptor<OCIAQAgent>,
}

impl Agent {
    pub fn new(conn: &Connection, name: &str, address: &str) -> Result<Agent> {
        let conn = conn.conn().clone();
        let ctxt = conn.ctxt();
        let errhp = conn.errhp();
        let handle = Descriptor::new(ctxt, OCI_DTYPE_AQAGENT)?;
        let agent = Agent { conn, handle };
        if !name.is_empty() {
            ctxt.attr_set_text(
                agent.handle.raw() as *mut c_void,
                OCI_DTYPE_AQAGENT,
                OCI_ATTR_AGENT_NAME,
                name,
                errhp,
            )?;
        }
        if !address.is_empty() {
            ctxt.attr_set_text(
                agent.handle.raw() as *mut c_void,
                OCI_DTYPE_AQAGENT,
                OCI_ATTR_AGENT_ADDRESS,
                address,
                errhp,
            )?;
        }
        Ok(agent)
    }

    pub fn name(&self) -> Result<String> {
        let ctxt = self.conn.ctxt();
        ctxt.attr_get_text(
            self.handle.raw() as *const c_void,
            OCI_DTYPE_AQAGENT,
            OCI_ATTR_AGENT_NAME,
            self.conn.errhp(),
        )
    }

    pub fn address(&self) -> Result<String> {
        let ctxt = self.conn.ctxt();
        ctxt.attr_get_text(
            self.handle.raw() as *const c_void,
            OCI_DTYPE_AQAGENT,
            OCI_ATTR_AGENT_ADDRESS,
            self.conn.errhp(),
        )
    }

    fn raw(&self) -> *mut OCIAQAgent {
        self.handle.raw()
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Agent({})", self.name().unwrap_or_default())
    }
}

/// Enqueue options
pub struct EnqOptions {
    conn: Arc<ConnInner>,
    handle: Descriptor<OCIAQEnqOptions>,
}

impl EnqOptions {
    fn new(conn: Arc<ConnInner>) -> Result<EnqOptions> {
        let handle = Descriptor::new(conn.ctxt(), OCI_DTYPE_AQENQ_OPTIONS)?;
        Ok(EnqOptions { conn, handle })
    }

    pub fn set_visibility(&mut self, visibility: Visibility) -> Result<()> {
        let ctxt = self.conn.ctxt();
        ctxt.attr_set_ub4(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQENQ_OPTIONS,
            OCI_ATTR_VISIBILITY,
            visibility.to_oci(),
            self.conn.errhp(),
        )
    }

    /// Places the message relative to others; `Before` needs a relative
    /// message id.
    pub fn set_sequence_deviation(
        &mut self,
        deviation: SequenceDeviation,
        relative_msgid: Option<&[u8]>,
    ) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        ctxt.attr_set_ub4(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQENQ_OPTIONS,
            OCI_ATTR_SEQUENCE_DEVIATION,
            deviation.to_oci(),
            errhp,
        )?;
        if let Some(msgid) = relative_msgid {
            set_raw_attr(
                &self.conn,
                self.handle.raw() as *mut c_void,
                OCI_DTYPE_AQENQ_OPTIONS,
                OCI_ATTR_RELATIVE_MSGID,
                msgid,
            )?;
        }
        Ok(())
    }

    fn raw(&self) -> *mut OCIAQEnqOptions {
        self.handle.raw()
    }
}

/// Dequeue options
pub struct DeqOptions {
    conn: Arc<ConnInner>,
    handle: Descriptor<OCIAQDeqOptions>,
    consumer: Option<String>,
}

impl DeqOptions {
    fn new(conn: Arc<ConnInner>) -> Result<DeqOptions> {
        let handle = Descriptor::new(conn.ctxt(), OCI_DTYPE_AQDEQ_OPTIONS)?;
        Ok(DeqOptions {
            conn,
            handle,
            consumer: None,
        })
    }

    /// Consumer name for multi-consumer queues.
    pub fn set_consumer(&mut self, name: &str) -> Result<()> {
        let ctxt = self.conn.ctxt();
        ctxt.attr_set_text(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQDEQ_OPTIONS,
            OCI_ATTR_CONSUMER_NAME,
            name,
            self.conn.errhp(),
        )?;
        self.consumer = Some(name.to_string());
        Ok(())
    }

    /// Pattern matched against message correlation identifiers.
    pub fn set_correlation(&mut self, pattern: &str) -> Result<()> {
        let ctxt = self.conn.ctxt();
        ctxt.attr_set_text(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQDEQ_OPTIONS,
            OCI_ATTR_CORRELATION,
            pattern,
            self.conn.errhp(),
        )
    }

    /// Dequeues the message with this exact id.
    pub fn set_relative_msgid(&mut self, msgid: &[u8]) -> Result<()> {
        set_raw_attr(
            &self.conn,
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQDEQ_OPTIONS,
            OCI_ATTR_DEQ_MSGID,
            msgid,
        )
    }

    pub fn set_mode(&mut self, mode: DeqMode) -> Result<()> {
        let ctxt = self.conn.ctxt();
        ctxt.attr_set_ub4(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQDEQ_OPTIONS,
            OCI_ATTR_DEQ_MODE,
            mode.to_oci(),
            self.conn.errhp(),
        )
    }

    pub fn set_navigation(&mut self, navigation: DeqNavigation) -> Result<()> {
        let ctxt = self.conn.ctxt();
        ctxt.attr_set_ub4(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQDEQ_OPTIONS,
            OCI_ATTR_NAVIGATION,
            navigation.to_oci(),
            self.conn.errhp(),
        )
    }

    pub fn set_visibility(&mut self, visibility: Visibility) -> Result<()> {
        let ctxt = self.conn.ctxt();
        ctxt.attr_set_ub4(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQDEQ_OPTIONS,
            OCI_ATTR_VISIBILITY,
            visibility.to_oci(),
            self.conn.errhp(),
        )
    }

    /// How long a dequeue blocks when no message is available: `None` waits
    /// forever, a zero duration returns immediately.
    pub fn set_wait(&mut self, wait: Option<Duration>) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let value = match wait {
            None => OCI_DEQ_WAIT_FOREVER,
            Some(d) if d.is_zero() => OCI_DEQ_NO_WAIT,
            Some(d) => d.as_secs().min(sb4::MAX as u64) as sb4,
        };
        ctxt.attr_set_sb4(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQDEQ_OPTIONS,
            OCI_ATTR_WAIT,
            value,
            self.conn.errhp(),
        )
    }

    fn raw(&self) -> *mut OCIAQDeqOptions {
        self.handle.raw()
    }
}

/// Message properties plus payload
pub struct MsgProps<T: Payload + ?Sized> {
    conn: Arc<ConnInner>,
    handle: Descriptor<OCIAQMsgProperties>,
    payload: PayloadData,
    msgid: Vec<u8>,
    phantom: PhantomData<T>,
}

enum PayloadData {
    None,
    Raw(Vec<u8>),
    Obj(Object),
}

impl<T: Payload + ?Sized> MsgProps<T> {
    /// Creates empty message properties.
    pub fn new(conn: &Connection) -> Result<MsgProps<T>> {
        let conn = conn.conn().clone();
        let handle = Descriptor::new(conn.ctxt(), OCI_DTYPE_AQMSG_PROPERTIES)?;
        Ok(MsgProps {
            conn,
            handle,
            payload: PayloadData::None,
            msgid: Vec::new(),
            phantom: PhantomData,
        })
    }

    fn attr_sb4(&self, attr: ub4) -> Result<i32> {
        let mut value: sb4 = 0;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCIAttrGet(
                self.handle.raw() as *const c_void,
                OCI_DTYPE_AQMSG_PROPERTIES,
                &mut value as *mut sb4 as *mut c_void,
                ptr::null_mut(),
                attr,
                errhp
            )
        );
        Ok(value)
    }

    fn set_attr_sb4(&mut self, attr: ub4, value: i32) -> Result<()> {
        self.conn.ctxt().attr_set_sb4(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQMSG_PROPERTIES,
            attr,
            value,
            self.conn.errhp(),
        )
    }

    /// Number of delivery attempts so far; maintained by the server.
    pub fn attempts(&self) -> Result<i32> {
        self.attr_sb4(OCI_ATTR_ATTEMPTS)
    }

    /// Seconds the message stays invisible after enqueue.
    pub fn delay(&self) -> Result<i32> {
        self.attr_sb4(OCI_ATTR_DELAY)
    }

    pub fn set_delay(&mut self, seconds: i32) -> Result<()> {
        self.set_attr_sb4(OCI_ATTR_DELAY, seconds)
    }

    /// Seconds until the message expires once it is ready; `-1` never.
    pub fn expiration(&self) -> Result<i32> {
        self.attr_sb4(OCI_ATTR_EXPIRATION)
    }

    pub fn set_expiration(&mut self, seconds: i32) -> Result<()> {
        self.set_attr_sb4(OCI_ATTR_EXPIRATION, seconds)
    }

    pub fn state(&self) -> Result<MessageState> {
        let ctxt = self.conn.ctxt();
        let value = ctxt.attr_get_ub4(
            self.handle.raw() as *const c_void,
            OCI_DTYPE_AQMSG_PROPERTIES,
            OCI_ATTR_MSG_STATE,
            self.conn.errhp(),
        )?;
        Ok(MessageState::from_oci(value))
    }

    pub fn priority(&self) -> Result<i32> {
        self.attr_sb4(OCI_ATTR_PRIORITY)
    }

    /// Smaller values dequeue first on priority-ordered queues.
    pub fn set_priority(&mut self, priority: i32) -> Result<()> {
        self.set_attr_sb4(OCI_ATTR_PRIORITY, priority)
    }

    pub fn correlation(&self) -> Result<String> {
        self.conn.ctxt().attr_get_text(
            self.handle.raw() as *const c_void,
            OCI_DTYPE_AQMSG_PROPERTIES,
            OCI_ATTR_CORRELATION,
            self.conn.errhp(),
        )
    }

    pub fn set_correlation(&mut self, correlation: &str) -> Result<()> {
        self.conn.ctxt().attr_set_text(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQMSG_PROPERTIES,
            OCI_ATTR_CORRELATION,
            correlation,
            self.conn.errhp(),
        )
    }

    /// Queue receiving the message after too many failed delivery attempts.
    pub fn exception_queue(&self) -> Result<String> {
        self.conn.ctxt().attr_get_text(
            self.handle.raw() as *const c_void,
            OCI_DTYPE_AQMSG_PROPERTIES,
            OCI_ATTR_EXCEPTION_QUEUE,
            self.conn.errhp(),
        )
    }

    pub fn set_exception_queue(&mut self, queue: &str) -> Result<()> {
        self.conn.ctxt().attr_set_text(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQMSG_PROPERTIES,
            OCI_ATTR_EXCEPTION_QUEUE,
            queue,
            self.conn.errhp(),
        )
    }

    /// Identifier assigned by the server at enqueue; empty before that.
    pub fn msgid(&self) -> &[u8] {
        &self.msgid
    }

    /// Message id of the original message for propagated messages.
    pub fn original_msgid(&self) -> Result<Vec<u8>> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut raw: *mut OCIRaw = ptr::null_mut();
        chkerr!(
            ctxt,
            errhp,
            OCIAttrGet(
                self.handle.raw() as *const c_void,
                OCI_DTYPE_AQMSG_PROPERTIES,
                &mut raw as *mut *mut OCIRaw as *mut c_void,
                ptr::null_mut(),
                OCI_ATTR_ORIGINAL_MSGID,
                errhp
            )
        );
        if raw.is_null() {
            return Ok(Vec::new());
        }
        crate::sql_type::object::oci_raw_to_bytes(ctxt, raw)
    }

    pub fn set_original_msgid(&mut self, msgid: &[u8]) -> Result<()> {
        set_raw_attr(
            &self.conn,
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQMSG_PROPERTIES,
            OCI_ATTR_ORIGINAL_MSGID,
            msgid,
        )
    }

    /// Time of enqueue reported by the server.
    pub fn enqueue_time(&self) -> Result<Timestamp> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut date: OCIDate = Default::default();
        chkerr!(
            ctxt,
            errhp,
            OCIAttrGet(
                self.handle.raw() as *const c_void,
                OCI_DTYPE_AQMSG_PROPERTIES,
                &mut date as *mut OCIDate as *mut c_void,
                ptr::null_mut(),
                OCI_ATTR_ENQ_TIME,
                errhp
            )
        );
        Ok(date_to_timestamp(&date))
    }

    /// Agent the message was sent by.
    pub fn set_sender(&mut self, agent: &Agent) -> Result<()> {
        self.conn.ctxt().attr_set_ptr(
            self.handle.raw() as *mut c_void,
            OCI_DTYPE_AQMSG_PROPERTIES,
            OCI_ATTR_SENDER_ID,
            agent.raw() as *mut c_void,
            self.conn.errhp(),
        )
    }

    /// Restricts delivery to the listed consumers.
    pub fn set_recipients(&mut self, agents: &[Agent]) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut handles: Vec<*mut OCIAQAgent> = agents.iter().map(|a| a.raw()).collect();
        chkerr!(
            ctxt,
            errhp,
            OCIAttrSet(
                self.handle.raw() as *mut c_void,
                OCI_DTYPE_AQMSG_PROPERTIES,
                handles.as_mut_ptr() as *mut c_void,
                handles.len() as ub4,
                OCI_ATTR_RECIPIENT_LIST,
                errhp
            )
        );
        Ok(())
    }

    fn raw(&self) -> *mut OCIAQMsgProperties {
        self.handle.raw()
    }
}

impl MsgProps<[u8]> {
    /// Sets a RAW payload.
    pub fn set_payload(&mut self, data: &[u8]) -> Result<()> {
        self.payload = PayloadData::Raw(data.to_vec());
        Ok(())
    }

    /// Payload of a dequeued or locally created message.
    pub fn payload(&self) -> Result<Vec<u8>> {
        match &self.payload {
            PayloadData::Raw(data) => Ok(data.clone()),
            PayloadData::None => Err(Error::null_value()),
            PayloadData::Obj(_) => Err(Error::invalid_type_conversion("Object", "RAW")),
        }
    }
}

impl MsgProps<Object> {
    /// Sets an object payload by value.
    pub fn set_payload(&mut self, payload: &Object) -> Result<()> {
        self.payload = PayloadData::Obj(payload.duplicate()?);
        Ok(())
    }

    /// Payload of a dequeued or locally created message.
    pub fn payload(&self) -> Result<&Object> {
        match &self.payload {
            PayloadData::Obj(obj) => Ok(obj),
            PayloadData::None => Err(Error::null_value()),
            PayloadData::Raw(_) => Err(Error::invalid_type_conversion("RAW", "Object")),
        }
    }
}

impl<T: Payload + ?Sized> fmt::Debug for MsgProps<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MsgProps {{ msgid: {} bytes }}", self.msgid.len())
    }
}

/// A message queue typed by its payload
pub struct Queue<T: Payload + ?Sized> {
    conn: Arc<ConnInner>,
    name: String,
    payload_type: Arc<TypeInfo>,
    enq_options: EnqOptions,
    deq_options: DeqOptions,
    phantom: PhantomData<T>,
}

impl<T: Payload + ?Sized> Queue<T> {
    /// Opens the queue named `name`.
    pub fn new(
        conn: &Connection,
        name: &str,
        payload_config: &T::TypeConfig,
    ) -> Result<Queue<T>> {
        let payload_type = T::payload_type_info(conn, payload_config)?;
        let inner = conn.conn().clone();
        Ok(Queue {
            conn: inner.clone(),
            name: name.to_string(),
            payload_type,
            enq_options: EnqOptions::new(inner.clone())?,
            deq_options: DeqOptions::new(inner)?,
            phantom: PhantomData,
        })
    }

    pub fn enq_options_mut(&mut self) -> &mut EnqOptions {
        &mut self.enq_options
    }

    pub fn deq_options_mut(&mut self) -> &mut DeqOptions {
        &mut self.deq_options
    }

    /// Payload instance and indicator-struct pointers; the indicator is null
    /// for RAW payloads, which travel with a scalar indicator instead.
    fn payload_parts(&self, props: &MsgProps<T>) -> Result<(*mut c_void, *mut c_void)> {
        match &props.payload {
            PayloadData::Raw(_) | PayloadData::None
                if self.payload_type.name() != "RAW" =>
            {
                Err(Error::invalid_type_conversion(
                    "RAW",
                    self.payload_type.name(),
                ))
            }
            PayloadData::Obj(obj) if obj.type_info().as_ref() != self.payload_type.as_ref() => {
                Err(Error::invalid_type_conversion(
                    obj.type_info().name(),
                    self.payload_type.name(),
                ))
            }
            PayloadData::Obj(obj) => Ok((obj.instance(), obj.null_struct())),
            PayloadData::Raw(_) | PayloadData::None => Ok((ptr::null_mut(), ptr::null_mut())),
        }
    }

    /// Enqueues one message, returning the message id the server assigned.
    pub fn enqueue(&mut self, props: &MsgProps<T>) -> Result<Vec<u8>> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let (mut payload, obj_ind) = self.payload_parts(props)?;
        // RAW payloads travel as OCIRaw values
        let mut _tmp_raw: *mut OCIRaw = ptr::null_mut();
        if let PayloadData::Raw(data) = &props.payload {
            chkerr!(
                ctxt,
                errhp,
                OCIRawAssignBytes(
                    ctxt.env_handle(),
                    errhp,
                    data.as_ptr(),
                    data.len() as ub4,
                    &mut _tmp_raw
                )
            );
            payload = _tmp_raw as *mut c_void;
        }
        let mut scalar_ind: OCIInd = OCI_IND_NOTNULL;
        let mut ind_ptr = if obj_ind.is_null() {
            &mut scalar_ind as *mut OCIInd as *mut c_void
        } else {
            obj_ind
        };
        let mut msgid: *mut OCIRaw = ptr::null_mut();
        let enq = ctxt
            .fns()
            .OCIAQEnq
            .ok_or_else(|| Error::not_available("OCIAQEnq"))?;
        let mut run = |queue_name: &OciString| unsafe {
            enq(
                self.conn.svchp(),
                errhp,
                queue_name.ptr(),
                self.enq_options.raw(),
                props.raw(),
                self.payload_type.tdo(),
                &mut payload,
                &mut ind_ptr,
                &mut msgid,
                OCI_DEFAULT,
            )
        };
        let queue_name = OciString::new(&self.name, ctxt.charset());
        let mut status = run(&queue_name);
        if status == OCI_ERROR && ctxt.charset() == Charset::Utf16 {
            // some servers only accept narrow queue names even in a wide
            // environment; retry once with a narrow copy
            let err = fetch_dberr(ctxt.fns(), errhp, ctxt.charset(), "OCIAQEnq");
            if err.code() == ERR_AQ_QUEUE_NAME_INVALID || err.code() == ERR_AQ_QUEUE_NOT_EXIST {
                let narrow = OciString::new(&self.name, Charset::Narrow);
                status = run(&narrow);
            }
        }
        ctxt.check(errhp, status, "OCIAQEnq")?;
        if !msgid.is_null() {
            return crate::sql_type::object::oci_raw_to_bytes(ctxt, msgid);
        }
        Ok(Vec::new())
    }

    /// Dequeues one message.
    ///
    /// Returns `Ok(None)` when the configured wait time expires without a
    /// message; no error is raised for the timeout.
    pub fn dequeue(&mut self) -> Result<Option<MsgProps<T>>> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let props = MsgProps::<T>::new(&Connection::from_inner(self.conn.clone()))?;
        let mut payload: *mut c_void = ptr::null_mut();
        let mut ind_value: OCIInd = OCI_IND_NULL;
        let mut ind_ptr = &mut ind_value as *mut OCIInd as *mut c_void;
        let mut msgid: *mut OCIRaw = ptr::null_mut();
        let deq = ctxt
            .fns()
            .OCIAQDeq
            .ok_or_else(|| Error::not_available("OCIAQDeq"))?;
        let queue_name = OciString::new(&self.name, ctxt.charset());
        let status = unsafe {
            deq(
                self.conn.svchp(),
                errhp,
                queue_name.ptr(),
                self.deq_options.raw(),
                props.raw(),
                self.payload_type.tdo(),
                &mut payload,
                &mut ind_ptr,
                &mut msgid,
                OCI_DEFAULT,
            )
        };
        if status == OCI_ERROR {
            let err = fetch_dberr(ctxt.fns(), errhp, ctxt.charset(), "OCIAQDeq");
            if err.code() == ERR_AQ_DEQUEUE_TIMEOUT {
                return Ok(None);
            }
            return Err(Error::oci(err));
        }
        ctxt.check(errhp, status, "OCIAQDeq")?;
        let mut props = props;
        if !msgid.is_null() {
            props.msgid = crate::sql_type::object::oci_raw_to_bytes(ctxt, msgid)?;
        }
        let is_null = unsafe { !ind_ptr.is_null() && *(ind_ptr as *const OCIInd) == OCI_IND_NULL };
        if !payload.is_null() && !is_null {
            props.payload = self.payload_from_oci(payload, ind_ptr)?;
        }
        Ok(Some(props))
    }

    fn payload_from_oci(&self, payload: *mut c_void, ind: *mut c_void) -> Result<PayloadData> {
        let ctxt = self.conn.ctxt();
        if self.payload_type.name() == "RAW" {
            let bytes =
                crate::sql_type::object::oci_raw_to_bytes(ctxt, payload as *mut OCIRaw)?;
            Ok(PayloadData::Raw(bytes))
        } else {
            Ok(PayloadData::Obj(Object::from_instance(
                self.conn.clone(),
                self.payload_type.clone(),
                payload,
                ind,
                crate::sql_type::object::ValueSource::Fetched,
            )))
        }
    }

    /// Waits for a message for any of `agents` on their queues.
    ///
    /// Returns the ready agent, or `Ok(None)` when `timeout` elapses.
    pub fn listen(&self, agents: &[Agent], timeout: Option<Duration>) -> Result<Option<String>> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut handles: Vec<*mut OCIAQAgent> = agents.iter().map(|a| a.raw()).collect();
        let mut ready: *mut OCIAQAgent = ptr::null_mut();
        let wait = match timeout {
            None => OCI_DEQ_WAIT_FOREVER,
            Some(d) => d.as_secs().min(sb4::MAX as u64) as sb4,
        };
        let listen = ctxt
            .fns()
            .OCIAQListen
            .ok_or_else(|| Error::not_available("OCIAQListen"))?;
        let status = unsafe {
            listen(
                self.conn.svchp(),
                errhp,
                handles.as_mut_ptr(),
                handles.len() as ub4,
                wait,
                &mut ready,
                OCI_DEFAULT,
            )
        };
        if status == OCI_ERROR {
            let err = fetch_dberr(ctxt.fns(), errhp, ctxt.charset(), "OCIAQListen");
            if err.code() == ERR_AQ_LISTEN_TIMEOUT {
                return Ok(None);
            }
            return Err(Error::oci(err));
        }
        ctxt.check(errhp, status, "OCIAQListen")?;
        if ready.is_null() {
            return Ok(None);
        }
        let name = ctxt.attr_get_text(
            ready as *const c_void,
            OCI_DTYPE_AQAGENT,
            OCI_ATTR_AGENT_NAME,
            errhp,
        )?;
        Ok(Some(name))
    }

    /// Registers for notifications on this queue.
    ///
    /// The notification name is `queue` or `queue:consumer` when the dequeue
    /// options carry a consumer.
    pub fn subscribe<F>(&self, port: u32, timeout: u32, callback: F) -> Result<Subscription>
    where
        F: Fn(&crate::Event) + Send + Sync + 'static,
    {
        let name = match &self.deq_options.consumer {
            Some(consumer) => format!("{}:{}", self.name, consumer),
            None => self.name.clone(),
        };
        SubscriptionBuilder::new(name)
            .aq()
            .port(port)
            .timeout(timeout)
            .register(&Connection::from_inner(self.conn.clone()), callback)
    }
}

impl<T: Payload + ?Sized> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Queue({})", self.name)
    }
}

fn set_raw_attr(
    conn: &Arc<ConnInner>,
    hndl: *mut c_void,
    htype: ub4,
    attr: ub4,
    bytes: &[u8],
) -> Result<()> {
    let ctxt = conn.ctxt();
    let errhp = conn.errhp();
    let mut raw: *mut OCIRaw = ptr::null_mut();
    chkerr!(
        ctxt,
        errhp,
        OCIRawAssignBytes(
            ctxt.env_handle(),
            errhp,
            bytes.as_ptr(),
            bytes.len() as ub4,
            &mut raw
        )
    );
    chkerr!(
        ctxt,
        errhp,
        OCIAttrSet(hndl, htype, raw as *mut c_void, 0, attr, errhp)
    );
    if let Some(f) = ctxt.fns().OCIRawResize {
        unsafe { f(ctxt.env_handle(), errhp, 0, &mut raw) };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_codes() {
        assert_eq!(Visibility::Immediate.to_oci(), OCI_ENQ_IMMEDIATE);
        assert_eq!(Visibility::OnCommit.to_oci(), OCI_ENQ_ON_COMMIT);
        assert_eq!(DeqMode::Remove.to_oci(), OCI_DEQ_REMOVE);
        assert_eq!(DeqNavigation::NextMessage.to_oci(), OCI_DEQ_NEXT_MSG);
        assert_eq!(MessageState::from_oci(OCI_MSG_PROCESSED), MessageState::Processed);
        assert_eq!(MessageState::from_oci(OCI_MSG_READY), MessageState::Ready);
    }
}
