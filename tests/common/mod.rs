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

use ocilib::Connection;

pub fn connect() -> Connection {
    ocilib::test_util::connect().expect("set ODPIC_TEST_* environment variables to a test database")
}

#[allow(dead_code)]
pub fn drop_table_if_exists(conn: &Connection, name: &str) {
    let sql = format!(
        "begin execute immediate 'drop table {}'; exception when others then null; end;",
        name
    );
    conn.execute(&sql, &[]).expect("drop table block");
}
