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

use ocilib::sql_type::{Clob, Long};
use ocilib::LongMode;

#[test]
#[ignore = "requires a running Oracle database"]
fn temporary_clob_round_trip() {
    let conn = common::connect();
    let mut clob = Clob::temporary(&conn).unwrap();
    clob.write_string("hello clob").unwrap();
    assert_eq!(clob.size().unwrap(), 10);
    clob.seek(std::io::SeekFrom::Start(0)).unwrap();
    assert_eq!(clob.read_string(10).unwrap(), "hello clob");
    clob.trim(5).unwrap();
    assert_eq!(clob.size().unwrap(), 5);
}

#[test]
#[ignore = "requires a running Oracle database"]
fn piecewise_long_fetch() {
    let conn = common::connect();
    common::drop_table_if_exists(&conn, "TEST_LONG");
    conn.execute("create table TEST_LONG (id number(10), data long)", &[])
        .unwrap();

    let payload = "x".repeat(200_000);
    let mut stmt = conn
        .statement("insert into TEST_LONG values (1, :data)")
        .build()
        .unwrap();
    stmt.bind("data", &payload.as_str()).unwrap();
    stmt.execute(&[]).unwrap();

    // fetch in explicit mode with 64K pieces
    let mut stmt = conn
        .statement("select data from TEST_LONG where id = 1")
        .long_mode(LongMode::Explicit)
        .long_size(65536)
        .build()
        .unwrap();
    let mut rows = stmt.query(&[]).unwrap();
    assert!(rows.next().unwrap());
    let value: Long = rows.get(0).unwrap();
    assert_eq!(value.size(), 200_000);
    assert!(value.as_str().bytes().all(|b| b == b'x'));
    conn.rollback().unwrap();
}

#[test]
#[ignore = "requires a running Oracle database"]
fn implicit_long_mode_demotes_to_string() {
    let conn = common::connect();
    common::drop_table_if_exists(&conn, "TEST_LONG2");
    conn.execute("create table TEST_LONG2 (data long)", &[])
        .unwrap();
    conn.execute("insert into TEST_LONG2 values ('short value')", &[])
        .unwrap();

    let mut stmt = conn
        .statement("select data from TEST_LONG2")
        .long_mode(LongMode::Implicit)
        .long_size(4000)
        .build()
        .unwrap();
    let mut rows = stmt.query(&[]).unwrap();
    assert!(rows.next().unwrap());
    let value: String = rows.get(0).unwrap();
    assert_eq!(value, "short value");
    conn.rollback().unwrap();
}
