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

use ocilib::sql_type::OracleType;
use ocilib::{ErrorKind, FetchPosition, StatementType};

#[test]
#[ignore = "requires a running Oracle database"]
fn simple_select() {
    let conn = common::connect();
    let mut stmt = conn
        .statement("select 1 as n, 'hello' as s from dual")
        .build()
        .unwrap();
    assert_eq!(stmt.statement_type(), StatementType::Select);
    let mut rows = stmt.query(&[]).unwrap();
    assert!(rows.next().unwrap());
    let n: i64 = rows.get(0).unwrap();
    let s: String = rows.get(1).unwrap();
    assert_eq!(n, 1);
    assert_eq!(s, "hello");
    assert!(!rows.is_null(0).unwrap());
    assert!(!rows.is_null("S").unwrap());
    assert_eq!(rows.row_count(), 1);
    // fetching past the end is idempotent
    assert!(!rows.next().unwrap());
    assert!(rows.eof());
    let row_before = rows.current_row();
    assert!(!rows.next().unwrap());
    assert_eq!(rows.current_row(), row_before);
}

#[test]
#[ignore = "requires a running Oracle database"]
fn column_access_errors() {
    let conn = common::connect();
    let mut stmt = conn.statement("select 1 from dual").build().unwrap();
    let mut rows = stmt.query(&[]).unwrap();
    assert!(rows.next().unwrap());
    let err = rows.get::<usize, i64>(7).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidColumnIndex);
    let err = rows.get::<&str, i64>("NO_SUCH_COLUMN").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidColumnName);
}

#[test]
#[ignore = "requires a running Oracle database"]
fn returning_into() {
    let conn = common::connect();
    common::drop_table_if_exists(&conn, "TEST_RETURNING");
    conn.execute(
        "create table TEST_RETURNING (id number(10), name varchar2(16))",
        &[],
    )
    .unwrap();

    let mut stmt = conn
        .statement(
            "insert into TEST_RETURNING (id, name) values (:id, :nm) \
             returning id, name into :o_id, :o_nm",
        )
        .build()
        .unwrap();
    stmt.register_returning("o_id", &OracleType::Int64).unwrap();
    stmt.register_returning("o_nm", &OracleType::Varchar2(16))
        .unwrap();
    stmt.bind("id", &7).unwrap();
    stmt.bind("nm", &"abc").unwrap();
    stmt.execute(&[]).unwrap();

    let mut rs = stmt.returning_resultset(0).unwrap();
    assert!(rs.next().unwrap());
    let id: i64 = rs.get("O_ID").unwrap();
    let name: String = rs.get("O_NM").unwrap();
    assert_eq!(id, 7);
    assert_eq!(name, "abc");
    assert!(!rs.next().unwrap());
    conn.rollback().unwrap();
}

#[test]
#[ignore = "requires a running Oracle database"]
fn array_dml() {
    let conn = common::connect();
    common::drop_table_if_exists(&conn, "TEST_ARRAY_DML");
    conn.execute("create table TEST_ARRAY_DML (id number(10))", &[])
        .unwrap();

    let mut batch = conn
        .batch("insert into TEST_ARRAY_DML (id) values (:id)", 10)
        .build()
        .unwrap();
    for id in [10, 20, 30] {
        batch.append_row(&[&id]).unwrap();
    }
    batch.execute().unwrap();
    assert_eq!(batch.affected_rows(), 3);

    let mut stmt = conn
        .statement("select count(*) from TEST_ARRAY_DML where id in (10, 20, 30)")
        .build()
        .unwrap();
    let mut rows = stmt.query(&[]).unwrap();
    assert!(rows.next().unwrap());
    assert_eq!(rows.get::<usize, i64>(0).unwrap(), 3);
    conn.rollback().unwrap();
}

#[test]
#[ignore = "requires a running Oracle database"]
fn repeated_execute_same_affected_rows() {
    let conn = common::connect();
    common::drop_table_if_exists(&conn, "TEST_REEXEC");
    conn.execute("create table TEST_REEXEC (id number(10))", &[])
        .unwrap();
    conn.execute("insert into TEST_REEXEC values (1)", &[])
        .unwrap();

    let mut stmt = conn
        .statement("update TEST_REEXEC set id = id + 1")
        .build()
        .unwrap();
    for _ in 0..3 {
        stmt.execute(&[]).unwrap();
        assert_eq!(stmt.row_count().unwrap(), 1);
    }
    conn.rollback().unwrap();
}

#[test]
#[ignore = "requires a running Oracle database"]
fn scrollable_fetch() {
    let conn = common::connect();
    let mut stmt = conn
        .statement("select level from dual connect by level <= 10")
        .scrollable()
        .build()
        .unwrap();
    let mut rows = stmt.query(&[]).unwrap();
    assert!(rows.seek(FetchPosition::Last).unwrap());
    assert_eq!(rows.get::<usize, i64>(0).unwrap(), 10);
    assert!(rows.seek(FetchPosition::First).unwrap());
    assert_eq!(rows.get::<usize, i64>(0).unwrap(), 1);
    assert!(rows.seek(FetchPosition::Absolute(5)).unwrap());
    assert_eq!(rows.get::<usize, i64>(0).unwrap(), 5);
    assert!(rows.seek(FetchPosition::Relative(2)).unwrap());
    assert_eq!(rows.get::<usize, i64>(0).unwrap(), 7);
    assert!(rows.seek(FetchPosition::Prior).unwrap());
    assert_eq!(rows.get::<usize, i64>(0).unwrap(), 6);
}

#[test]
#[ignore = "requires a running Oracle database"]
fn plsql_out_bind() {
    let conn = common::connect();
    let mut stmt = conn
        .statement("begin :outval := :a + :b; end;")
        .build()
        .unwrap();
    stmt.bind("outval", &OracleType::Int64).unwrap();
    stmt.bind("a", &20).unwrap();
    stmt.bind("b", &22).unwrap();
    stmt.execute(&[]).unwrap();
    let out: i64 = stmt.bind_value("outval").unwrap();
    assert_eq!(out, 42);
}
