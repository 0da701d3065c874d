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

mod common;

use ocilib::aq;
use std::time::{Duration, Instant};

// the RAW_QUEUE used here is created by the test setup scripts:
//   dbms_aqadm.create_queue_table('RAW_QT', 'RAW');
//   dbms_aqadm.create_queue('RAW_QUEUE', 'RAW_QT');
//   dbms_aqadm.start_queue('RAW_QUEUE');

#[test]
#[ignore = "requires a running Oracle database with RAW_QUEUE"]
fn raw_round_trip() {
    let conn = common::connect();
    let mut queue = aq::Queue::<[u8]>::new(&conn, "RAW_QUEUE", &()).unwrap();

    let mut msg = aq::MsgProps::<[u8]>::new(&conn).unwrap();
    msg.set_payload(&[0x01, 0x02, 0x03]).unwrap();
    msg.set_priority(5).unwrap();
    let msgid = queue.enqueue(&msg).unwrap();
    assert!(!msgid.is_empty());
    conn.commit().unwrap();

    queue
        .deq_options_mut()
        .set_wait(Some(Duration::from_secs(1)))
        .unwrap();
    queue.deq_options_mut().set_mode(aq::DeqMode::Remove).unwrap();
    let received = queue.dequeue().unwrap().expect("one pending message");
    assert_eq!(received.payload().unwrap(), vec![0x01, 0x02, 0x03]);
    assert_eq!(received.priority().unwrap(), 5);
    assert_eq!(received.attempts().unwrap(), 0);
    conn.commit().unwrap();
}

#[test]
#[ignore = "requires a running Oracle database with RAW_QUEUE"]
fn dequeue_timeout_returns_none() {
    let conn = common::connect();
    let mut queue = aq::Queue::<[u8]>::new(&conn, "RAW_QUEUE", &()).unwrap();
    queue
        .deq_options_mut()
        .set_wait(Some(Duration::from_secs(1)))
        .unwrap();

    let started = Instant::now();
    let result = queue.dequeue().unwrap();
    assert!(result.is_none());
    // the timeout comes back as an empty result, not an error, and without
    // overshooting the wait by much
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[test]
#[ignore = "requires a running Oracle database with RAW_QUEUE"]
fn message_properties() {
    let conn = common::connect();
    let mut msg = aq::MsgProps::<[u8]>::new(&conn).unwrap();
    msg.set_correlation("order-42").unwrap();
    msg.set_delay(0).unwrap();
    msg.set_expiration(-1).unwrap();
    assert_eq!(msg.correlation().unwrap(), "order-42");

    let agent = aq::Agent::new(&conn, "subscriber_a", "").unwrap();
    assert_eq!(agent.name().unwrap(), "subscriber_a");
    msg.set_sender(&agent).unwrap();
}
