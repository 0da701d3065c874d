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

use ocilib::{DirPath, DirPathResult, ErrorKind};

#[test]
#[ignore = "requires a running Oracle database"]
fn two_stream_load() {
    let conn = common::connect();
    common::drop_table_if_exists(&conn, "TEST_DIRPATH");
    conn.execute("create table TEST_DIRPATH (val varchar2(10))", &[])
        .unwrap();
    conn.commit().unwrap();

    let mut dp = DirPath::new(&conn, "TEST_DIRPATH", 1, 4).unwrap();
    dp.describe_column(0, "VAL", 10, None, 0, 0, false).unwrap();
    dp.prepare().unwrap();
    let array_size = dp.row_count();

    // enter as many rows as fit plus two more, forcing a second stream
    let total = array_size + 2;
    let mut entered = 0;
    let mut loaded_all = false;
    while !loaded_all {
        let fill = (total - entered).min(array_size);
        for row in 0..fill {
            let value = format!("v{}", entered + row);
            dp.set_entry(row, 0, Some(value.as_bytes()), true).unwrap();
        }
        loop {
            match dp.convert().unwrap() {
                DirPathResult::Complete => {
                    assert_eq!(dp.load().unwrap(), DirPathResult::Complete);
                    break;
                }
                DirPathResult::Full => {
                    assert_eq!(dp.load().unwrap(), DirPathResult::Complete);
                }
                other => panic!("unexpected convert result {:?}", other),
            }
        }
        entered += fill;
        loaded_all = entered == total;
    }
    dp.finish().unwrap();
    assert_eq!(dp.loaded_rows(), total as u64);

    let mut stmt = conn
        .statement("select count(*) from TEST_DIRPATH")
        .build()
        .unwrap();
    let mut rows = stmt.query(&[]).unwrap();
    assert!(rows.next().unwrap());
    assert_eq!(rows.get::<usize, u64>(0).unwrap(), total as u64);
}

#[test]
#[ignore = "requires a running Oracle database"]
fn state_protocol_is_enforced() {
    let conn = common::connect();
    common::drop_table_if_exists(&conn, "TEST_DIRPATH2");
    conn.execute("create table TEST_DIRPATH2 (val varchar2(10))", &[])
        .unwrap();
    conn.commit().unwrap();

    let mut dp = DirPath::new(&conn, "TEST_DIRPATH2", 1, 4).unwrap();
    dp.describe_column(0, "VAL", 10, None, 0, 0, false).unwrap();

    // entering data before prepare is a protocol violation
    let err = dp.set_entry(0, 0, Some(b"x"), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDirPathState);
    // so is loading before convert
    dp.prepare().unwrap();
    let err = dp.load().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDirPathState);

    dp.abort().unwrap();
}
