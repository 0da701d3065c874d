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

use ocilib::{GetMode, PoolBuilder};
use std::time::Duration;

#[test]
#[ignore = "requires a running Oracle database"]
fn connect_and_ping() {
    let conn = common::connect();
    conn.ping().unwrap();
    let (version, banner) = conn.server_version().unwrap();
    assert!(version.major() >= 10);
    assert!(banner.contains("Oracle"));
    conn.close().unwrap();
}

#[test]
#[ignore = "requires a running Oracle database"]
fn client_version_is_detected() {
    let _conn = common::connect();
    let version = ocilib::client_version().unwrap();
    assert!(version.major() >= 8);
}

#[test]
#[ignore = "requires a running Oracle database"]
fn bad_credentials_fail() {
    let err = ocilib::Connection::connect(
        "no_such_user",
        "wrong_password",
        ocilib::test_util::connect_string(),
    )
    .unwrap_err();
    // ORA-01017: invalid username/password
    assert_eq!(err.oci_code(), 1017);
}

#[test]
#[ignore = "requires a running Oracle database"]
fn pool_bounds() {
    let pool = PoolBuilder::new(
        ocilib::test_util::main_user(),
        ocilib::test_util::main_password(),
        ocilib::test_util::connect_string(),
    )
    .min_connections(1)
    .max_connections(2)
    .get_mode(GetMode::TimedWait(Duration::from_millis(100)))
    .build()
    .unwrap();

    let c1 = pool.get().unwrap();
    let c2 = pool.get().unwrap();
    assert_eq!(pool.open_count(), 2);
    assert_eq!(pool.busy_count(), 2);

    // the pool never exceeds its maximum
    assert!(pool.try_get().unwrap().is_none());
    assert!(pool.get().is_err());

    drop(c2);
    let c3 = pool.try_get().unwrap();
    assert!(c3.is_some());
    assert_eq!(pool.open_count(), 2);

    c1.ping().unwrap();
    drop(c1);
    drop(c3);
    pool.close().unwrap();
}
