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

//! OCI scalar types, opaque handle types and constants.
//!
//! Only the subset of `oci.h` actually exercised by the crate is declared.

#![allow(dead_code)]
#![allow(non_camel_case_types)]

use std::os::raw::{c_long, c_void};

// OCI scalar typedefs
pub(crate) type ub1 = u8;
pub(crate) type sb1 = i8;
pub(crate) type ub2 = u16;
pub(crate) type sb2 = i16;
pub(crate) type ub4 = u32;
pub(crate) type sb4 = i32;
pub(crate) type ub8 = u64;
pub(crate) type sb8 = i64;
pub(crate) type sword = i32;
pub(crate) type uword = u32;
pub(crate) type boolean = i32;
pub(crate) type OraText = u8;
pub(crate) type OCIInd = sb2;
pub(crate) type OCIDuration = ub2;
pub(crate) type OCITypeCode = ub2;

pub(crate) const TRUE: boolean = 1;
pub(crate) const FALSE: boolean = 0;

// Return codes
pub(crate) const OCI_SUCCESS: sword = 0;
pub(crate) const OCI_SUCCESS_WITH_INFO: sword = 1;
pub(crate) const OCI_NEED_DATA: sword = 99;
pub(crate) const OCI_NO_DATA: sword = 100;
pub(crate) const OCI_ERROR: sword = -1;
pub(crate) const OCI_INVALID_HANDLE: sword = -2;
pub(crate) const OCI_STILL_EXECUTING: sword = -3123;
pub(crate) const OCI_CONTINUE: sword = -24200;

// Environment creation modes
pub(crate) const OCI_DEFAULT: ub4 = 0;
pub(crate) const OCI_THREADED: ub4 = 0x01;
pub(crate) const OCI_OBJECT: ub4 = 0x02;
pub(crate) const OCI_EVENTS: ub4 = 0x04;

// UTF-16 pseudo charset id accepted by OCIEnvNlsCreate
pub(crate) const OCI_UTF16ID: ub2 = 1000;

// Credential and session modes
pub(crate) const OCI_CRED_RDBMS: ub4 = 1;
pub(crate) const OCI_CRED_EXT: ub4 = 2;
pub(crate) const OCI_MIGRATE: ub4 = 0x0001;
pub(crate) const OCI_SYSDBA: ub4 = 0x0002;
pub(crate) const OCI_SYSOPER: ub4 = 0x0004;
pub(crate) const OCI_PRELIM_AUTH: ub4 = 0x0008;
pub(crate) const OCI_SYSASM: ub4 = 0x8000;

// Handle types
pub(crate) const OCI_HTYPE_ENV: ub4 = 1;
pub(crate) const OCI_HTYPE_ERROR: ub4 = 2;
pub(crate) const OCI_HTYPE_SVCCTX: ub4 = 3;
pub(crate) const OCI_HTYPE_STMT: ub4 = 4;
pub(crate) const OCI_HTYPE_BIND: ub4 = 5;
pub(crate) const OCI_HTYPE_DEFINE: ub4 = 6;
pub(crate) const OCI_HTYPE_DESCRIBE: ub4 = 7;
pub(crate) const OCI_HTYPE_SERVER: ub4 = 8;
pub(crate) const OCI_HTYPE_SESSION: ub4 = 9;
pub(crate) const OCI_HTYPE_TRANS: ub4 = 10;
pub(crate) const OCI_HTYPE_SUBSCRIPTION: ub4 = 13;
pub(crate) const OCI_HTYPE_DIRPATH_CTX: ub4 = 14;
pub(crate) const OCI_HTYPE_DIRPATH_COLUMN_ARRAY: ub4 = 15;
pub(crate) const OCI_HTYPE_DIRPATH_STREAM: ub4 = 16;
pub(crate) const OCI_HTYPE_EVENT: ub4 = 29;

// Descriptor types
pub(crate) const OCI_DTYPE_LOB: ub4 = 50;
pub(crate) const OCI_DTYPE_RSET: ub4 = 52;
pub(crate) const OCI_DTYPE_PARAM: ub4 = 53;
pub(crate) const OCI_DTYPE_ROWID: ub4 = 54;
pub(crate) const OCI_DTYPE_FILE: ub4 = 56;
pub(crate) const OCI_DTYPE_AQENQ_OPTIONS: ub4 = 57;
pub(crate) const OCI_DTYPE_AQDEQ_OPTIONS: ub4 = 58;
pub(crate) const OCI_DTYPE_AQMSG_PROPERTIES: ub4 = 59;
pub(crate) const OCI_DTYPE_AQAGENT: ub4 = 60;
pub(crate) const OCI_DTYPE_INTERVAL_YM: ub4 = 62;
pub(crate) const OCI_DTYPE_INTERVAL_DS: ub4 = 63;
pub(crate) const OCI_DTYPE_AQNFY_DESCRIPTOR: ub4 = 64;
pub(crate) const OCI_DTYPE_DATE: ub4 = 65;
pub(crate) const OCI_DTYPE_TIMESTAMP: ub4 = 68;
pub(crate) const OCI_DTYPE_TIMESTAMP_TZ: ub4 = 69;
pub(crate) const OCI_DTYPE_TIMESTAMP_LTZ: ub4 = 70;
pub(crate) const OCI_DTYPE_CHDES: ub4 = 77;
pub(crate) const OCI_DTYPE_TABLE_CHDES: ub4 = 78;
pub(crate) const OCI_DTYPE_ROW_CHDES: ub4 = 79;

// Generic handle/descriptor attributes
pub(crate) const OCI_ATTR_DATA_SIZE: ub4 = 1;
pub(crate) const OCI_ATTR_DATA_TYPE: ub4 = 2;
pub(crate) const OCI_ATTR_NAME: ub4 = 4;
pub(crate) const OCI_ATTR_PRECISION: ub4 = 5;
pub(crate) const OCI_ATTR_SCALE: ub4 = 6;
pub(crate) const OCI_ATTR_SERVER: ub4 = 6;
pub(crate) const OCI_ATTR_IS_NULL: ub4 = 7;
pub(crate) const OCI_ATTR_SESSION: ub4 = 7;
pub(crate) const OCI_ATTR_TYPE_NAME: ub4 = 8;
pub(crate) const OCI_ATTR_TRANS: ub4 = 8;
pub(crate) const OCI_ATTR_SCHEMA_NAME: ub4 = 9;
pub(crate) const OCI_ATTR_ROW_COUNT: ub4 = 9;
pub(crate) const OCI_ATTR_SUB_NAME: ub4 = 10;
pub(crate) const OCI_ATTR_PREFETCH_ROWS: ub4 = 11;
pub(crate) const OCI_ATTR_PDSCL: ub4 = 16;
pub(crate) const OCI_ATTR_FSPRECISION: ub4 = OCI_ATTR_PDSCL;
pub(crate) const OCI_ATTR_PDPRC: ub4 = 17;
pub(crate) const OCI_ATTR_LFPRECISION: ub4 = OCI_ATTR_PDPRC;
pub(crate) const OCI_ATTR_PARAM_COUNT: ub4 = 18;
pub(crate) const OCI_ATTR_USERNAME: ub4 = 22;
pub(crate) const OCI_ATTR_PASSWORD: ub4 = 23;
pub(crate) const OCI_ATTR_STMT_TYPE: ub4 = 24;
pub(crate) const OCI_ATTR_XID: ub4 = 27;
pub(crate) const OCI_ATTR_TRANS_NAME: ub4 = 29;
pub(crate) const OCI_ATTR_CHARSET_ID: ub4 = 31;
pub(crate) const OCI_ATTR_CHARSET_FORM: ub4 = 32;
pub(crate) const OCI_ATTR_ROWS_RETURNED: ub4 = 42;
pub(crate) const OCI_ATTR_FOCBK: ub4 = 43;
pub(crate) const OCI_ATTR_LOBEMPTY: ub4 = 45;

// AQ attributes
pub(crate) const OCI_ATTR_VISIBILITY: ub4 = 47;
pub(crate) const OCI_ATTR_RELATIVE_MSGID: ub4 = 48;
pub(crate) const OCI_ATTR_SEQUENCE_DEVIATION: ub4 = 49;
pub(crate) const OCI_ATTR_CONSUMER_NAME: ub4 = 50;
pub(crate) const OCI_ATTR_DEQ_MODE: ub4 = 51;
pub(crate) const OCI_ATTR_NAVIGATION: ub4 = 52;
pub(crate) const OCI_ATTR_WAIT: ub4 = 53;
pub(crate) const OCI_ATTR_DEQ_MSGID: ub4 = 54;
pub(crate) const OCI_ATTR_PRIORITY: ub4 = 55;
pub(crate) const OCI_ATTR_DELAY: ub4 = 56;
pub(crate) const OCI_ATTR_EXPIRATION: ub4 = 57;
pub(crate) const OCI_ATTR_CORRELATION: ub4 = 58;
pub(crate) const OCI_ATTR_ATTEMPTS: ub4 = 59;
pub(crate) const OCI_ATTR_RECIPIENT_LIST: ub4 = 60;
pub(crate) const OCI_ATTR_EXCEPTION_QUEUE: ub4 = 61;
pub(crate) const OCI_ATTR_ENQ_TIME: ub4 = 62;
pub(crate) const OCI_ATTR_MSG_STATE: ub4 = 63;
pub(crate) const OCI_ATTR_AGENT_NAME: ub4 = 64;
pub(crate) const OCI_ATTR_AGENT_ADDRESS: ub4 = 65;
pub(crate) const OCI_ATTR_SENDER_ID: ub4 = 68;
pub(crate) const OCI_ATTR_ORIGINAL_MSGID: ub4 = 69;
pub(crate) const OCI_ATTR_QUEUE_NAME: ub4 = 70;

// Subscription attributes
pub(crate) const OCI_ATTR_SUBSCR_NAME: ub4 = 94;
pub(crate) const OCI_ATTR_SUBSCR_CALLBACK: ub4 = 95;
pub(crate) const OCI_ATTR_SUBSCR_CTX: ub4 = 96;
pub(crate) const OCI_ATTR_SUBSCR_PAYLOAD: ub4 = 97;
pub(crate) const OCI_ATTR_SUBSCR_NAMESPACE: ub4 = 98;
pub(crate) const OCI_ATTR_SUBSCR_RECPTPROTO: ub4 = 149;
pub(crate) const OCI_ATTR_SUBSCR_PORTNO: ub4 = 390;
pub(crate) const OCI_ATTR_SUBSCR_TIMEOUT: ub4 = 392;
pub(crate) const OCI_ATTR_SUBSCR_RECPTPRES: ub4 = 195;
pub(crate) const OCI_ATTR_CHNF_ROWIDS: ub4 = 402;
pub(crate) const OCI_ATTR_CHNF_OPERATIONS: ub4 = 403;

// Change notification descriptor attributes
pub(crate) const OCI_ATTR_CHDES_DBNAME: ub4 = 405;
pub(crate) const OCI_ATTR_CHDES_NFYTYPE: ub4 = 406;
pub(crate) const OCI_ATTR_CHDES_TABLE_CHANGES: ub4 = 408;
pub(crate) const OCI_ATTR_CHDES_TABLE_NAME: ub4 = 409;
pub(crate) const OCI_ATTR_CHDES_TABLE_OPFLAGS: ub4 = 410;
pub(crate) const OCI_ATTR_CHDES_TABLE_ROW_CHANGES: ub4 = 411;
pub(crate) const OCI_ATTR_CHDES_ROW_ROWID: ub4 = 412;
pub(crate) const OCI_ATTR_CHDES_ROW_OPFLAGS: ub4 = 413;

// Describe attributes
pub(crate) const OCI_ATTR_NUM_COLS: ub4 = 102;
pub(crate) const OCI_ATTR_LIST_COLUMNS: ub4 = 103;
pub(crate) const OCI_ATTR_REF_TDO: ub4 = 110;
pub(crate) const OCI_ATTR_NUM_TYPE_ATTRS: ub4 = 120;
pub(crate) const OCI_ATTR_LIST_TYPE_ATTRS: ub4 = 121;
pub(crate) const OCI_ATTR_PARAM: ub4 = 124;
pub(crate) const OCI_ATTR_SERVER_STATUS: ub4 = 143;
pub(crate) const OCI_ATTR_CURRENT_POSITION: ub4 = 164;
pub(crate) const OCI_ATTR_STMTCACHESIZE: ub4 = 176;
pub(crate) const OCI_ATTR_BIND_COUNT: ub4 = 190;
pub(crate) const OCI_ATTR_ROWS_FETCHED: ub4 = 197;
pub(crate) const OCI_ATTR_TYPECODE: ub4 = 216;
pub(crate) const OCI_ATTR_COLLECTION_TYPECODE: ub4 = 217;
pub(crate) const OCI_ATTR_STMT_IS_RETURNING: ub4 = 218;
pub(crate) const OCI_ATTR_COLLECTION_ELEMENT: ub4 = 227;
pub(crate) const OCI_ATTR_CHAR_USED: ub4 = 285;
pub(crate) const OCI_ATTR_CHAR_SIZE: ub4 = 286;
pub(crate) const OCI_ATTR_UB8_ROW_COUNT: ub4 = 457;

// HA event attributes
pub(crate) const OCI_ATTR_EVTCBK: ub4 = 304;
pub(crate) const OCI_ATTR_EVTCTX: ub4 = 305;
pub(crate) const OCI_ATTR_HA_SOURCE: ub4 = 390;
pub(crate) const OCI_ATTR_HA_STATUS: ub4 = 391;
pub(crate) const OCI_ATTR_HA_SRVFIRST: ub4 = 392;
pub(crate) const OCI_ATTR_HA_SRVNEXT: ub4 = 393;
pub(crate) const OCI_ATTR_HA_TIMESTAMP: ub4 = 395;

// Direct path attributes
pub(crate) const OCI_ATTR_NUM_ROWS: ub4 = 81;
pub(crate) const OCI_ATTR_COL_COUNT: ub4 = 82;
pub(crate) const OCI_ATTR_ROW_COUNT_DP: ub4 = OCI_ATTR_ROW_COUNT;
pub(crate) const OCI_ATTR_DIRPATH_MODE: ub4 = 78;
pub(crate) const OCI_ATTR_DIRPATH_NOLOG: ub4 = 79;
pub(crate) const OCI_ATTR_DIRPATH_PARALLEL: ub4 = 80;
pub(crate) const OCI_ATTR_BUF_SIZE: ub4 = 280;
pub(crate) const OCI_ATTR_DATEFORMAT: ub4 = 75;
pub(crate) const OCI_ATTR_DIRPATH_DCACHE_SIZE: ub4 = 303;
pub(crate) const OCI_ATTR_DIRPATH_DCACHE_DISABLE: ub4 = 299;

// Statement types
pub(crate) const OCI_STMT_UNKNOWN: ub2 = 0;
pub(crate) const OCI_STMT_SELECT: ub2 = 1;
pub(crate) const OCI_STMT_UPDATE: ub2 = 2;
pub(crate) const OCI_STMT_DELETE: ub2 = 3;
pub(crate) const OCI_STMT_INSERT: ub2 = 4;
pub(crate) const OCI_STMT_CREATE: ub2 = 5;
pub(crate) const OCI_STMT_DROP: ub2 = 6;
pub(crate) const OCI_STMT_ALTER: ub2 = 7;
pub(crate) const OCI_STMT_BEGIN: ub2 = 8;
pub(crate) const OCI_STMT_DECLARE: ub2 = 9;
pub(crate) const OCI_STMT_CALL: ub2 = 10;
pub(crate) const OCI_STMT_MERGE: ub2 = 16;

// Statement language and prepare/execute modes
pub(crate) const OCI_NTV_SYNTAX: ub4 = 1;
pub(crate) const OCI_STMT_SCROLLABLE_READONLY: ub4 = 0x08;
pub(crate) const OCI_DESCRIBE_ONLY: ub4 = 0x10;
pub(crate) const OCI_COMMIT_ON_SUCCESS: ub4 = 0x20;
pub(crate) const OCI_PREP2_CACHE_SEARCHONLY: ub4 = 0x10;
pub(crate) const OCI_STRLS_CACHE_DELETE: ub4 = 0x10;

// Fetch orientation
pub(crate) const OCI_FETCH_CURRENT: ub2 = 0x01;
pub(crate) const OCI_FETCH_NEXT: ub2 = 0x02;
pub(crate) const OCI_FETCH_FIRST: ub2 = 0x04;
pub(crate) const OCI_FETCH_LAST: ub2 = 0x08;
pub(crate) const OCI_FETCH_PRIOR: ub2 = 0x10;
pub(crate) const OCI_FETCH_ABSOLUTE: ub2 = 0x20;
pub(crate) const OCI_FETCH_RELATIVE: ub2 = 0x40;

// Bind/define modes
pub(crate) const OCI_DATA_AT_EXEC: ub4 = 0x02;
pub(crate) const OCI_DYNAMIC_FETCH: ub4 = 0x02;

// Piece codes
pub(crate) const OCI_ONE_PIECE: ub1 = 0;
pub(crate) const OCI_FIRST_PIECE: ub1 = 1;
pub(crate) const OCI_NEXT_PIECE: ub1 = 2;
pub(crate) const OCI_LAST_PIECE: ub1 = 3;

// Charset forms
pub(crate) const SQLCS_IMPLICIT: ub1 = 1;
pub(crate) const SQLCS_NCHAR: ub1 = 2;

// Transaction flags
pub(crate) const OCI_TRANS_NEW: ub4 = 0x0001;
pub(crate) const OCI_TRANS_JOIN: ub4 = 0x0002;
pub(crate) const OCI_TRANS_RESUME: ub4 = 0x0004;
pub(crate) const OCI_TRANS_READONLY: ub4 = 0x0100;
pub(crate) const OCI_TRANS_READWRITE: ub4 = 0x0200;
pub(crate) const OCI_TRANS_SERIALIZABLE: ub4 = 0x0400;
pub(crate) const OCI_TRANS_LOOSE: ub4 = 0x10000;
pub(crate) const OCI_TRANS_TIGHT: ub4 = 0x20000;
pub(crate) const OCI_TRANS_TWOPHASE: ub4 = 0x0100_0000;

// LOB
pub(crate) const OCI_TEMP_BLOB: ub1 = 1;
pub(crate) const OCI_TEMP_CLOB: ub1 = 2;
pub(crate) const OCI_LOB_READONLY: ub1 = 1;
pub(crate) const OCI_LOB_READWRITE: ub1 = 2;
pub(crate) const OCI_FILE_READONLY: ub1 = 1;

// Object durations, pin and lock options
pub(crate) const OCI_DURATION_SESSION: OCIDuration = 10;
pub(crate) const OCI_DURATION_TRANS: OCIDuration = 11;
pub(crate) const OCI_PIN_DEFAULT: ub4 = 1;
pub(crate) const OCI_PIN_ANY: ub4 = 3;
pub(crate) const OCI_LOCK_NONE: ub4 = 1;
pub(crate) const OCI_OBJECTFREE_FORCE: ub2 = 1;
pub(crate) const OCI_OBJECTCOPY_NONE: ub1 = 0;
pub(crate) const OCI_TYPEGET_ALL: ub4 = 1;
pub(crate) const OCI_IND_NOTNULL: OCIInd = 0;
pub(crate) const OCI_IND_NULL: OCIInd = -1;

// Type codes (subset)
pub(crate) const OCI_TYPECODE_REF: OCITypeCode = 110;
pub(crate) const OCI_TYPECODE_OBJECT: OCITypeCode = 108;
pub(crate) const OCI_TYPECODE_NAMEDCOLLECTION: OCITypeCode = 122;
pub(crate) const OCI_TYPECODE_VARRAY: OCITypeCode = 247;
pub(crate) const OCI_TYPECODE_TABLE: OCITypeCode = 248;

// Describe object kinds
pub(crate) const OCI_OTYPE_NAME: ub1 = 1;
pub(crate) const OCI_PTYPE_TYP: ub1 = 1;
pub(crate) const OCI_PTYPE_TABLE: ub1 = 2;
pub(crate) const OCI_PTYPE_VIEW: ub1 = 3;
pub(crate) const OCI_PTYPE_UNK: ub1 = 0;

// AQ options
pub(crate) const OCI_ENQ_IMMEDIATE: ub4 = 1;
pub(crate) const OCI_ENQ_ON_COMMIT: ub4 = 2;
pub(crate) const OCI_ENQ_BEFORE: ub4 = 2;
pub(crate) const OCI_ENQ_TOP: ub4 = 3;
pub(crate) const OCI_DEQ_IMMEDIATE: ub4 = 1;
pub(crate) const OCI_DEQ_ON_COMMIT: ub4 = 2;
pub(crate) const OCI_DEQ_BROWSE: ub4 = 1;
pub(crate) const OCI_DEQ_LOCKED: ub4 = 2;
pub(crate) const OCI_DEQ_REMOVE: ub4 = 3;
pub(crate) const OCI_DEQ_REMOVE_NODATA: ub4 = 4;
pub(crate) const OCI_DEQ_FIRST_MSG: ub4 = 1;
pub(crate) const OCI_DEQ_NEXT_TRANSACTION: ub4 = 2;
pub(crate) const OCI_DEQ_NEXT_MSG: ub4 = 3;
pub(crate) const OCI_DEQ_NO_WAIT: sb4 = 0;
pub(crate) const OCI_DEQ_WAIT_FOREVER: sb4 = -1;
pub(crate) const OCI_MSG_READY: ub4 = 0;
pub(crate) const OCI_MSG_WAITING: ub4 = 1;
pub(crate) const OCI_MSG_PROCESSED: ub4 = 2;
pub(crate) const OCI_MSG_EXPIRED: ub4 = 3;
pub(crate) const OCI_MSG_NO_DELAY: sb4 = 0;
pub(crate) const OCI_MSG_NO_EXPIRATION: sb4 = -1;

// AQ related server error codes intercepted by the driver
pub(crate) const ERR_AQ_LISTEN_TIMEOUT: sb4 = 25254;
pub(crate) const ERR_AQ_DEQUEUE_TIMEOUT: sb4 = 25228;
pub(crate) const ERR_AQ_QUEUE_NAME_INVALID: sb4 = 25200;
pub(crate) const ERR_AQ_QUEUE_NOT_EXIST: sb4 = 24010;

// Subscription namespaces, protocols and event codes
pub(crate) const OCI_SUBSCR_NAMESPACE_AQ: ub4 = 1;
pub(crate) const OCI_SUBSCR_NAMESPACE_DBCHANGE: ub4 = 2;
pub(crate) const OCI_SUBSCR_PROTO_OCI: ub4 = 0;
pub(crate) const OCI_SUBSCR_PRES_DEFAULT: ub4 = 0;
pub(crate) const OCI_EVENT_NONE: ub4 = 0;
pub(crate) const OCI_EVENT_STARTUP: ub4 = 1;
pub(crate) const OCI_EVENT_SHUTDOWN: ub4 = 2;
pub(crate) const OCI_EVENT_SHUTDOWN_ANY: ub4 = 3;
pub(crate) const OCI_EVENT_DEREG: ub4 = 5;
pub(crate) const OCI_EVENT_OBJCHANGE: ub4 = 6;
pub(crate) const OCI_EVENT_QUERYCHANGE: ub4 = 7;
pub(crate) const OCI_OPCODE_ALLOPS: ub4 = 0;
pub(crate) const OCI_OPCODE_ALLROWS: ub4 = 0x01;
pub(crate) const OCI_OPCODE_INSERT: ub4 = 0x02;
pub(crate) const OCI_OPCODE_UPDATE: ub4 = 0x04;
pub(crate) const OCI_OPCODE_DELETE: ub4 = 0x08;
pub(crate) const OCI_OPCODE_ALTER: ub4 = 0x10;
pub(crate) const OCI_OPCODE_DROP: ub4 = 0x20;

// TAF failover
pub(crate) const OCI_FO_END: ub4 = 0x00000001;
pub(crate) const OCI_FO_ABORT: ub4 = 0x00000002;
pub(crate) const OCI_FO_REAUTH: ub4 = 0x00000004;
pub(crate) const OCI_FO_BEGIN: ub4 = 0x00000008;
pub(crate) const OCI_FO_ERROR: ub4 = 0x00000010;
pub(crate) const OCI_FO_NONE: ub4 = 0x00000001;
pub(crate) const OCI_FO_SESSION: ub4 = 0x00000002;
pub(crate) const OCI_FO_SELECT: ub4 = 0x00000004;
pub(crate) const OCI_FO_TXNAL: ub4 = 0x00000008;
pub(crate) const OCI_FO_RETRY: sb4 = 25410;

// HA event source/status codes
pub(crate) const OCI_HA_SOURCE_INSTANCE: ub4 = 0;
pub(crate) const OCI_HA_SOURCE_DATABASE: ub4 = 1;
pub(crate) const OCI_HA_SOURCE_NODE: ub4 = 2;
pub(crate) const OCI_HA_SOURCE_SERVICE: ub4 = 3;
pub(crate) const OCI_HA_SOURCE_SERVICE_MEMBER: ub4 = 4;
pub(crate) const OCI_HA_SOURCE_ASM_INSTANCE: ub4 = 5;
pub(crate) const OCI_HA_STATUS_DOWN: ub4 = 0;
pub(crate) const OCI_HA_STATUS_UP: ub4 = 1;

// Direct path
pub(crate) const OCI_DIRPATH_COL_COMPLETE: ub1 = 0;
pub(crate) const OCI_DIRPATH_COL_NULL: ub1 = 1;
pub(crate) const OCI_DIRPATH_COL_PARTIAL: ub1 = 2;
pub(crate) const OCI_DIRPATH_DATASAVE_SAVEONLY: ub4 = 0;

// SQLT codes
pub(crate) const SQLT_CHR: ub2 = 1;
pub(crate) const SQLT_NUM: ub2 = 2;
pub(crate) const SQLT_INT: ub2 = 3;
pub(crate) const SQLT_FLT: ub2 = 4;
pub(crate) const SQLT_STR: ub2 = 5;
pub(crate) const SQLT_VNU: ub2 = 6;
pub(crate) const SQLT_LNG: ub2 = 8;
pub(crate) const SQLT_VCS: ub2 = 9;
pub(crate) const SQLT_RID: ub2 = 11;
pub(crate) const SQLT_DAT: ub2 = 12;
pub(crate) const SQLT_VBI: ub2 = 15;
pub(crate) const SQLT_BFLOAT: ub2 = 21;
pub(crate) const SQLT_BDOUBLE: ub2 = 22;
pub(crate) const SQLT_BIN: ub2 = 23;
pub(crate) const SQLT_LBI: ub2 = 24;
pub(crate) const SQLT_UIN: ub2 = 68;
pub(crate) const SQLT_LVC: ub2 = 94;
pub(crate) const SQLT_LVB: ub2 = 95;
pub(crate) const SQLT_AFC: ub2 = 96;
pub(crate) const SQLT_AVC: ub2 = 97;
pub(crate) const SQLT_IBFLOAT: ub2 = 100;
pub(crate) const SQLT_IBDOUBLE: ub2 = 101;
pub(crate) const SQLT_CUR: ub2 = 102;
pub(crate) const SQLT_RDD: ub2 = 104;
pub(crate) const SQLT_NTY: ub2 = 108;
pub(crate) const SQLT_REF: ub2 = 110;
pub(crate) const SQLT_CLOB: ub2 = 112;
pub(crate) const SQLT_BLOB: ub2 = 113;
pub(crate) const SQLT_BFILE: ub2 = 114;
pub(crate) const SQLT_CFILE: ub2 = 115;
pub(crate) const SQLT_RSET: ub2 = 116;
pub(crate) const SQLT_NCO: ub2 = 122;
pub(crate) const SQLT_VST: ub2 = 155;
pub(crate) const SQLT_ODT: ub2 = 156;
pub(crate) const SQLT_DATE: ub2 = 184;
pub(crate) const SQLT_TIMESTAMP: ub2 = 187;
pub(crate) const SQLT_TIMESTAMP_TZ: ub2 = 188;
pub(crate) const SQLT_INTERVAL_YM: ub2 = 189;
pub(crate) const SQLT_INTERVAL_DS: ub2 = 190;
pub(crate) const SQLT_TIMESTAMP_LTZ: ub2 = 232;
pub(crate) const SQLT_BOL: ub2 = 252;

// Opaque handle definitions
#[repr(C)]
pub struct OCIEnv {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIError {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCISvcCtx {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIStmt {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIBind {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIDefine {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIDescribe {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIServer {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCISession {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCITrans {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCISubscription {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIDirPathCtx {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIDirPathColArray {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIDirPathStream {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIEvent {
    _private: [u8; 0],
}

// Opaque descriptor definitions
#[repr(C)]
pub struct OCIParam {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCILobLocator {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIRowid {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIDateTime {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIInterval {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIString {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIRaw {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIType {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIColl {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIIter {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIRef {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIAQEnqOptions {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIAQDeqOptions {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIAQMsgProperties {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIAQAgent {
    _private: [u8; 0],
}
#[repr(C)]
pub struct OCIComplexObject {
    _private: [u8; 0],
}

// Plain C value structs

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct OCITime {
    pub hh: ub1,
    pub mi: ub1,
    pub ss: ub1,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct OCIDate {
    pub yyyy: sb2,
    pub mm: ub1,
    pub dd: ub1,
    pub time: OCITime,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct OCINumber {
    pub bytes: [ub1; 22],
}

impl Default for OCINumber {
    fn default() -> OCINumber {
        // Oracle representation of zero: a single exponent byte
        let mut bytes = [0u8; 22];
        bytes[0] = 1;
        bytes[1] = 0x80;
        OCINumber { bytes }
    }
}

pub(crate) const XID_DATA_SIZE: usize = 128;

/// X/Open distributed transaction identifier as laid out by `xa.h`.
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct XID {
    pub format_id: c_long,
    pub gtrid_length: c_long,
    pub bqual_length: c_long,
    pub data: [u8; XID_DATA_SIZE],
}

impl Default for XID {
    fn default() -> XID {
        XID {
            format_id: -1,
            gtrid_length: 0,
            bqual_length: 0,
            data: [0; XID_DATA_SIZE],
        }
    }
}

/// TAF callback registration block (`OCIFocbkStruct`).
#[repr(C)]
pub(crate) struct OCIFocbkStruct {
    pub callback_function: OCICallbackFailover,
    pub fo_ctx: *mut c_void,
}

pub(crate) type OCICallbackFailover = Option<
    unsafe extern "C" fn(
        svcctx: *mut c_void,
        envctx: *mut c_void,
        fo_ctx: *mut c_void,
        fo_type: ub4,
        fo_event: ub4,
    ) -> sb4,
>;

pub(crate) type OCICallbackInBind = Option<
    unsafe extern "C" fn(
        ictxp: *mut c_void,
        bindp: *mut OCIBind,
        iter: ub4,
        index: ub4,
        bufpp: *mut *mut c_void,
        alenp: *mut ub4,
        piecep: *mut ub1,
        indpp: *mut *mut c_void,
    ) -> sb4,
>;

pub(crate) type OCICallbackOutBind = Option<
    unsafe extern "C" fn(
        octxp: *mut c_void,
        bindp: *mut OCIBind,
        iter: ub4,
        index: ub4,
        bufpp: *mut *mut c_void,
        alenpp: *mut *mut ub4,
        piecep: *mut ub1,
        indpp: *mut *mut c_void,
        rcodepp: *mut *mut ub2,
    ) -> sb4,
>;

pub(crate) type OCISubscriptionNotify = Option<
    unsafe extern "C" fn(
        ctx: *mut c_void,
        subscrhp: *mut OCISubscription,
        payload: *mut c_void,
        payl: *mut ub4,
        descriptor: *mut c_void,
        mode: ub4,
    ) -> ub4,
>;

pub(crate) type OCIEventCallback =
    Option<unsafe extern "C" fn(evtctx: *mut c_void, eventhp: *mut OCIEvent)>;
