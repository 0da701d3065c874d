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

//! OCI entry points.
//!
//! Every entry point is declared once in [`oci_entry_points!`] and surfaces as
//! an `Option` of a function pointer. In the default build the table is filled
//! by resolving each symbol from the client shared library; with the
//! `static-link` feature the whole table points at link-time symbols. A `None`
//! slot means the loaded client predates the entry point; call sites reach the
//! slots through the `oci_call!`/`chkerr!` macros which turn a missing slot
//! into `ErrorKind::NotAvailable`.

#![allow(non_snake_case)]

use super::defs::*;
use std::os::raw::c_void;

macro_rules! oci_entry_points {
    ($(fn $name:ident($($arg:ident: $ty:ty),* $(,)?) -> $ret:ty;)*) => {
        // slots resolved for version probing may have no direct caller
        #[allow(dead_code)]
        pub(crate) struct EntryPoints {
            $(pub(crate) $name: Option<unsafe extern "C" fn($($ty),*) -> $ret>,)*
        }

        #[cfg(not(feature = "static-link"))]
        impl EntryPoints {
            pub(crate) fn load(lib: &libloading::Library) -> EntryPoints {
                unsafe {
                    EntryPoints {
                        $($name: lib
                            .get::<unsafe extern "C" fn($($ty),*) -> $ret>(
                                concat!(stringify!($name), "\0").as_bytes(),
                            )
                            .map(|sym| *sym)
                            .ok(),)*
                    }
                }
            }
        }

        #[cfg(feature = "static-link")]
        impl EntryPoints {
            pub(crate) fn load() -> EntryPoints {
                EntryPoints {
                    $($name: Some(linked::$name),)*
                }
            }
        }

        #[cfg(feature = "static-link")]
        mod linked {
            use super::*;
            extern "C" {
                $(pub(crate) fn $name($($arg: $ty),*) -> $ret;)*
            }
        }
    };
}

oci_entry_points! {
    // environment, handles, attributes
    fn OCIEnvNlsCreate(envhpp: *mut *mut OCIEnv, mode: ub4, ctxp: *mut c_void,
        malocfp: *mut c_void, ralocfp: *mut c_void, mfreefp: *mut c_void,
        xtramemsz: usize, usrmempp: *mut *mut c_void, charset: ub2, ncharset: ub2) -> sword;
    fn OCITerminate(mode: ub4) -> sword;
    fn OCIHandleAlloc(parenth: *const c_void, hndlpp: *mut *mut c_void, htype: ub4,
        xtramem_sz: usize, usrmempp: *mut *mut c_void) -> sword;
    fn OCIHandleFree(hndlp: *mut c_void, htype: ub4) -> sword;
    fn OCIDescriptorAlloc(parenth: *const c_void, descpp: *mut *mut c_void, dtype: ub4,
        xtramem_sz: usize, usrmempp: *mut *mut c_void) -> sword;
    fn OCIDescriptorFree(descp: *mut c_void, dtype: ub4) -> sword;
    fn OCIArrayDescriptorAlloc(parenth: *const c_void, descpp: *mut *mut c_void, dtype: ub4,
        array_size: ub4, xtramem_sz: usize, usrmempp: *mut *mut c_void) -> sword;
    fn OCIArrayDescriptorFree(descp: *mut *mut c_void, dtype: ub4) -> sword;
    fn OCIAttrGet(trgthndlp: *const c_void, trghndltyp: ub4, attributep: *mut c_void,
        sizep: *mut ub4, attrtype: ub4, errhp: *mut OCIError) -> sword;
    fn OCIAttrSet(trgthndlp: *mut c_void, trghndltyp: ub4, attributep: *mut c_void,
        size: ub4, attrtype: ub4, errhp: *mut OCIError) -> sword;
    fn OCIParamGet(hndlp: *const c_void, htype: ub4, errhp: *mut OCIError,
        parmdpp: *mut *mut c_void, pos: ub4) -> sword;
    fn OCIErrorGet(hndlp: *mut c_void, recordno: ub4, sqlstate: *mut OraText,
        errcodep: *mut sb4, bufp: *mut OraText, bufsiz: ub4, htype: ub4) -> sword;
    fn OCIClientVersion(major: *mut sword, minor: *mut sword, update: *mut sword,
        patch: *mut sword, port_update: *mut sword) -> ();

    // server, session, connection control
    fn OCIServerAttach(srvhp: *mut OCIServer, errhp: *mut OCIError, dblink: *const OraText,
        dblink_len: sb4, mode: ub4) -> sword;
    fn OCIServerDetach(srvhp: *mut OCIServer, errhp: *mut OCIError, mode: ub4) -> sword;
    fn OCISessionBegin(svchp: *mut OCISvcCtx, errhp: *mut OCIError, usrhp: *mut OCISession,
        credt: ub4, mode: ub4) -> sword;
    fn OCISessionEnd(svchp: *mut OCISvcCtx, errhp: *mut OCIError, usrhp: *mut OCISession,
        mode: ub4) -> sword;
    fn OCIServerVersion(hndlp: *mut c_void, errhp: *mut OCIError, bufp: *mut OraText,
        bufsz: ub4, hndltype: ub1) -> sword;
    fn OCIBreak(hndlp: *mut c_void, errhp: *mut OCIError) -> sword;
    fn OCIReset(hndlp: *mut c_void, errhp: *mut OCIError) -> sword;
    fn OCIPing(svchp: *mut OCISvcCtx, errhp: *mut OCIError, mode: ub4) -> sword;

    // transactions
    fn OCITransStart(svchp: *mut OCISvcCtx, errhp: *mut OCIError, timeout: uword,
        flags: ub4) -> sword;
    fn OCITransDetach(svchp: *mut OCISvcCtx, errhp: *mut OCIError, flags: ub4) -> sword;
    fn OCITransCommit(svchp: *mut OCISvcCtx, errhp: *mut OCIError, flags: ub4) -> sword;
    fn OCITransRollback(svchp: *mut OCISvcCtx, errhp: *mut OCIError, flags: ub4) -> sword;
    fn OCITransPrepare(svchp: *mut OCISvcCtx, errhp: *mut OCIError, flags: ub4) -> sword;
    fn OCITransForget(svchp: *mut OCISvcCtx, errhp: *mut OCIError, flags: ub4) -> sword;

    // statements
    fn OCIStmtPrepare2(svchp: *mut OCISvcCtx, stmtpp: *mut *mut OCIStmt, errhp: *mut OCIError,
        stmttext: *const OraText, stmt_len: ub4, key: *const OraText, keylen: ub4,
        language: ub4, mode: ub4) -> sword;
    fn OCIStmtRelease(stmtp: *mut OCIStmt, errhp: *mut OCIError, key: *const OraText,
        keylen: ub4, mode: ub4) -> sword;
    fn OCIStmtPrepare(stmtp: *mut OCIStmt, errhp: *mut OCIError, stmttext: *const OraText,
        stmt_len: ub4, language: ub4, mode: ub4) -> sword;
    fn OCIStmtExecute(svchp: *mut OCISvcCtx, stmtp: *mut OCIStmt, errhp: *mut OCIError,
        iters: ub4, rowoff: ub4, snap_in: *const c_void, snap_out: *mut c_void,
        mode: ub4) -> sword;
    fn OCIStmtFetch2(stmtp: *mut OCIStmt, errhp: *mut OCIError, nrows: ub4,
        orientation: ub2, scroll_offset: sb4, mode: ub4) -> sword;
    fn OCIStmtGetPieceInfo(stmtp: *mut OCIStmt, errhp: *mut OCIError,
        hndlpp: *mut *mut c_void, typep: *mut ub4, in_outp: *mut ub1, iterp: *mut ub4,
        idxp: *mut ub4, piecep: *mut ub1) -> sword;
    fn OCIStmtSetPieceInfo(hndlp: *mut c_void, htype: ub4, errhp: *mut OCIError,
        bufp: *const c_void, alenp: *mut ub4, piece: ub1, indp: *const c_void,
        rcodep: *mut ub2) -> sword;
    fn OCIStmtGetNextResult(stmtp: *mut OCIStmt, errhp: *mut OCIError,
        result: *mut *mut c_void, rtype: *mut ub4, mode: ub4) -> sword;
    fn OCIBindByPos(stmtp: *mut OCIStmt, bindpp: *mut *mut OCIBind, errhp: *mut OCIError,
        position: ub4, valuep: *mut c_void, value_sz: sb4, dty: ub2, indp: *mut c_void,
        alenp: *mut ub2, rcodep: *mut ub2, maxarr_len: ub4, curelep: *mut ub4,
        mode: ub4) -> sword;
    fn OCIBindByName(stmtp: *mut OCIStmt, bindpp: *mut *mut OCIBind, errhp: *mut OCIError,
        placeholder: *const OraText, placeh_len: sb4, valuep: *mut c_void, value_sz: sb4,
        dty: ub2, indp: *mut c_void, alenp: *mut ub2, rcodep: *mut ub2, maxarr_len: ub4,
        curelep: *mut ub4, mode: ub4) -> sword;
    fn OCIBindDynamic(bindp: *mut OCIBind, errhp: *mut OCIError, ictxp: *mut c_void,
        icbfp: OCICallbackInBind, octxp: *mut c_void, ocbfp: OCICallbackOutBind) -> sword;
    fn OCIBindObject(bindp: *mut OCIBind, errhp: *mut OCIError, tdo: *const OCIType,
        pgvpp: *mut *mut c_void, pvszsp: *mut ub4, indpp: *mut *mut c_void,
        indszp: *mut ub4) -> sword;
    fn OCIDefineByPos(stmtp: *mut OCIStmt, defnpp: *mut *mut OCIDefine, errhp: *mut OCIError,
        position: ub4, valuep: *mut c_void, value_sz: sb4, dty: ub2, indp: *mut c_void,
        rlenp: *mut ub2, rcodep: *mut ub2, mode: ub4) -> sword;
    fn OCIDefineObject(defnp: *mut OCIDefine, errhp: *mut OCIError, tdo: *const OCIType,
        pgvpp: *mut *mut c_void, pvszsp: *mut ub4, indpp: *mut *mut c_void,
        indszp: *mut ub4) -> sword;
    fn OCIDescribeAny(svchp: *mut OCISvcCtx, errhp: *mut OCIError, objptr: *mut c_void,
        objptr_len: ub4, objptr_typ: ub1, info_level: ub1, objtyp: ub1,
        dschp: *mut OCIDescribe) -> sword;

    // LOB, 32-bit lengths
    fn OCILobRead(svchp: *mut OCISvcCtx, errhp: *mut OCIError, locp: *mut OCILobLocator,
        amtp: *mut ub4, offset: ub4, bufp: *mut c_void, buflen: ub4, ctxp: *mut c_void,
        cbfp: *mut c_void, csid: ub2, csfrm: ub1) -> sword;
    fn OCILobWrite(svchp: *mut OCISvcCtx, errhp: *mut OCIError, locp: *mut OCILobLocator,
        amtp: *mut ub4, offset: ub4, bufp: *mut c_void, buflen: ub4, piece: ub1,
        ctxp: *mut c_void, cbfp: *mut c_void, csid: ub2, csfrm: ub1) -> sword;
    fn OCILobWriteAppend(svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        locp: *mut OCILobLocator, amtp: *mut ub4, bufp: *mut c_void, buflen: ub4,
        piece: ub1, ctxp: *mut c_void, cbfp: *mut c_void, csid: ub2, csfrm: ub1) -> sword;
    fn OCILobCopy(svchp: *mut OCISvcCtx, errhp: *mut OCIError, dst: *mut OCILobLocator,
        src: *mut OCILobLocator, amount: ub4, dst_offset: ub4, src_offset: ub4) -> sword;
    fn OCILobErase(svchp: *mut OCISvcCtx, errhp: *mut OCIError, locp: *mut OCILobLocator,
        amount: *mut ub4, offset: ub4) -> sword;
    fn OCILobTrim(svchp: *mut OCISvcCtx, errhp: *mut OCIError, locp: *mut OCILobLocator,
        newlen: ub4) -> sword;
    fn OCILobGetLength(svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        locp: *mut OCILobLocator, lenp: *mut ub4) -> sword;

    // LOB, 64-bit lengths (10.1+)
    fn OCILobRead2(svchp: *mut OCISvcCtx, errhp: *mut OCIError, locp: *mut OCILobLocator,
        byte_amtp: *mut ub8, char_amtp: *mut ub8, offset: ub8, bufp: *mut c_void,
        buflen: ub8, piece: ub1, ctxp: *mut c_void, cbfp: *mut c_void, csid: ub2,
        csfrm: ub1) -> sword;
    fn OCILobWrite2(svchp: *mut OCISvcCtx, errhp: *mut OCIError, locp: *mut OCILobLocator,
        byte_amtp: *mut ub8, char_amtp: *mut ub8, offset: ub8, bufp: *mut c_void,
        buflen: ub8, piece: ub1, ctxp: *mut c_void, cbfp: *mut c_void, csid: ub2,
        csfrm: ub1) -> sword;
    fn OCILobWriteAppend2(svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        locp: *mut OCILobLocator, byte_amtp: *mut ub8, char_amtp: *mut ub8,
        bufp: *mut c_void, buflen: ub8, piece: ub1, ctxp: *mut c_void, cbfp: *mut c_void,
        csid: ub2, csfrm: ub1) -> sword;
    fn OCILobCopy2(svchp: *mut OCISvcCtx, errhp: *mut OCIError, dst: *mut OCILobLocator,
        src: *mut OCILobLocator, amount: ub8, dst_offset: ub8, src_offset: ub8) -> sword;
    fn OCILobErase2(svchp: *mut OCISvcCtx, errhp: *mut OCIError, locp: *mut OCILobLocator,
        amount: *mut ub8, offset: ub8) -> sword;
    fn OCILobTrim2(svchp: *mut OCISvcCtx, errhp: *mut OCIError, locp: *mut OCILobLocator,
        newlen: ub8) -> sword;
    fn OCILobGetLength2(svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        locp: *mut OCILobLocator, lenp: *mut ub8) -> sword;
    fn OCILobGetContentType(envhp: *mut OCIEnv, svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        locp: *mut OCILobLocator, contenttypep: *mut OraText, contenttypelenp: *mut ub4,
        mode: ub4) -> sword;

    // LOB, length independent
    fn OCILobAppend(svchp: *mut OCISvcCtx, errhp: *mut OCIError, dst: *mut OCILobLocator,
        src: *mut OCILobLocator) -> sword;
    fn OCILobOpen(svchp: *mut OCISvcCtx, errhp: *mut OCIError, locp: *mut OCILobLocator,
        mode: ub1) -> sword;
    fn OCILobClose(svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        locp: *mut OCILobLocator) -> sword;
    fn OCILobIsOpen(svchp: *mut OCISvcCtx, errhp: *mut OCIError, locp: *mut OCILobLocator,
        flag: *mut boolean) -> sword;
    fn OCILobIsEqual(envhp: *mut OCIEnv, x: *const OCILobLocator, y: *const OCILobLocator,
        is_equal: *mut boolean) -> sword;
    fn OCILobLocatorAssign(svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        src: *const OCILobLocator, dstpp: *mut *mut OCILobLocator) -> sword;
    fn OCILobCreateTemporary(svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        locp: *mut OCILobLocator, csid: ub2, csfrm: ub1, lobtype: ub1, cache: boolean,
        duration: OCIDuration) -> sword;
    fn OCILobFreeTemporary(svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        locp: *mut OCILobLocator) -> sword;
    fn OCILobIsTemporary(envhp: *mut OCIEnv, errhp: *mut OCIError, locp: *mut OCILobLocator,
        is_temporary: *mut boolean) -> sword;
    fn OCILobFileSetName(envhp: *mut OCIEnv, errhp: *mut OCIError,
        filepp: *mut *mut OCILobLocator, dir_alias: *const OraText, d_length: ub2,
        filename: *const OraText, f_length: ub2) -> sword;
    fn OCILobFileGetName(envhp: *mut OCIEnv, errhp: *mut OCIError,
        filep: *const OCILobLocator, dir_alias: *mut OraText, d_length: *mut ub2,
        filename: *mut OraText, f_length: *mut ub2) -> sword;
    fn OCILobFileExists(svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        filep: *mut OCILobLocator, flag: *mut boolean) -> sword;

    // number and text conversion
    fn OCINumberToInt(errhp: *mut OCIError, number: *const OCINumber, rsl_length: uword,
        rsl_flag: uword, rsl: *mut c_void) -> sword;
    fn OCINumberFromInt(errhp: *mut OCIError, inum: *const c_void, inum_length: uword,
        inum_s_flag: uword, number: *mut OCINumber) -> sword;
    fn OCINumberToReal(errhp: *mut OCIError, number: *const OCINumber, rsl_length: uword,
        rsl: *mut c_void) -> sword;
    fn OCINumberFromReal(errhp: *mut OCIError, rnum: *const c_void, rnum_length: uword,
        number: *mut OCINumber) -> sword;
    fn OCINumberToText(errhp: *mut OCIError, number: *const OCINumber, fmt: *const OraText,
        fmt_length: ub4, nls_params: *const OraText, nls_p_length: ub4, buf_size: *mut ub4,
        buf: *mut OraText) -> sword;
    fn OCINumberFromText(errhp: *mut OCIError, str_: *const OraText, str_length: ub4,
        fmt: *const OraText, fmt_length: ub4, nls_params: *const OraText, nls_p_length: ub4,
        number: *mut OCINumber) -> sword;
    fn OCIStringPtr(envhp: *mut OCIEnv, vs: *const OCIString) -> *mut OraText;
    fn OCIStringSize(envhp: *mut OCIEnv, vs: *const OCIString) -> ub4;
    fn OCIStringAssignText(envhp: *mut OCIEnv, errhp: *mut OCIError, rhs: *const OraText,
        rhs_len: ub4, lhs: *mut *mut OCIString) -> sword;
    fn OCIStringResize(envhp: *mut OCIEnv, errhp: *mut OCIError, new_size: ub4,
        str_: *mut *mut OCIString) -> sword;
    fn OCIRawResize(envhp: *mut OCIEnv, errhp: *mut OCIError, new_size: ub4,
        raw: *mut *mut OCIRaw) -> sword;
    fn OCIRawPtr(envhp: *mut OCIEnv, raw: *const OCIRaw) -> *mut ub1;
    fn OCIRawSize(envhp: *mut OCIEnv, raw: *const OCIRaw) -> ub4;
    fn OCIRawAssignBytes(envhp: *mut OCIEnv, errhp: *mut OCIError, rhs: *const ub1,
        rhs_len: ub4, lhs: *mut *mut OCIRaw) -> sword;
    fn OCIRowidToChar(rowidp: *mut OCIRowid, out_bfp: *mut OraText, out_bflp: *mut ub2,
        errhp: *mut OCIError) -> sword;

    // datetime and interval descriptors
    fn OCIDateTimeConstruct(hndl: *mut c_void, errhp: *mut OCIError,
        datetime: *mut OCIDateTime, yr: sb2, mnth: ub1, dy: ub1, hr: ub1, mm: ub1, ss: ub1,
        fsec: ub4, timezone: *const OraText, timezone_length: usize) -> sword;
    fn OCIDateTimeGetDate(hndl: *mut c_void, errhp: *mut OCIError,
        datetime: *const OCIDateTime, yr: *mut sb2, mnth: *mut ub1, dy: *mut ub1) -> sword;
    fn OCIDateTimeGetTime(hndl: *mut c_void, errhp: *mut OCIError,
        datetime: *const OCIDateTime, hr: *mut ub1, mm: *mut ub1, ss: *mut ub1,
        fsec: *mut ub4) -> sword;
    fn OCIDateTimeGetTimeZoneOffset(hndl: *mut c_void, errhp: *mut OCIError,
        datetime: *const OCIDateTime, hr: *mut sb1, mm: *mut sb1) -> sword;
    fn OCIDateTimeSysTimeStamp(hndl: *mut c_void, errhp: *mut OCIError,
        sys_date: *mut OCIDateTime) -> sword;
    fn OCIIntervalSetDaySecond(hndl: *mut c_void, errhp: *mut OCIError, dy: sb4, hr: sb4,
        mm: sb4, ss: sb4, fsec: sb4, result: *mut OCIInterval) -> sword;
    fn OCIIntervalGetDaySecond(hndl: *mut c_void, errhp: *mut OCIError, dy: *mut sb4,
        hr: *mut sb4, mm: *mut sb4, ss: *mut sb4, fsec: *mut sb4,
        interval: *const OCIInterval) -> sword;
    fn OCIIntervalSetYearMonth(hndl: *mut c_void, errhp: *mut OCIError, yr: sb4, mnth: sb4,
        result: *mut OCIInterval) -> sword;
    fn OCIIntervalGetYearMonth(hndl: *mut c_void, errhp: *mut OCIError, yr: *mut sb4,
        mnth: *mut sb4, interval: *const OCIInterval) -> sword;

    // objects, types, references
    fn OCITypeByName(envhp: *mut OCIEnv, errhp: *mut OCIError, svchp: *const OCISvcCtx,
        schema_name: *const OraText, s_length: ub4, type_name: *const OraText,
        t_length: ub4, version_name: *const OraText, v_length: ub4,
        pin_duration: OCIDuration, get_option: ub4, tdo: *mut *mut OCIType) -> sword;
    fn OCIObjectNew(envhp: *mut OCIEnv, errhp: *mut OCIError, svchp: *const OCISvcCtx,
        typecode: OCITypeCode, tdo: *mut OCIType, table: *mut c_void,
        duration: OCIDuration, value: boolean, instancepp: *mut *mut c_void) -> sword;
    fn OCIObjectFree(envhp: *mut OCIEnv, errhp: *mut OCIError, instance: *mut c_void,
        flags: ub2) -> sword;
    fn OCIObjectCopy(envhp: *mut OCIEnv, errhp: *mut OCIError, svchp: *const OCISvcCtx,
        source: *mut c_void, src_null: *mut c_void, target: *mut c_void,
        tgt_null: *mut c_void, tdo: *mut OCIType, duration: OCIDuration,
        option: ub1) -> sword;
    fn OCIObjectGetAttr(envhp: *mut OCIEnv, errhp: *mut OCIError, instance: *mut c_void,
        null_struct: *mut c_void, tdo: *mut OCIType, names: *const *const OraText,
        lengths: *const ub4, name_count: ub4, indexes: *const ub4, index_count: ub4,
        attr_null_status: *mut OCIInd, attr_null_struct: *mut *mut c_void,
        attr_value: *mut *mut c_void, attr_tdo: *mut *mut OCIType) -> sword;
    fn OCIObjectSetAttr(envhp: *mut OCIEnv, errhp: *mut OCIError, instance: *mut c_void,
        null_struct: *mut c_void, tdo: *mut OCIType, names: *const *const OraText,
        lengths: *const ub4, name_count: ub4, indexes: *const ub4, index_count: ub4,
        null_status: OCIInd, attr_null_struct: *mut c_void, value: *const c_void) -> sword;
    fn OCIObjectPin(envhp: *mut OCIEnv, errhp: *mut OCIError, object_ref: *mut OCIRef,
        corhdl: *mut OCIComplexObject, pin_option: ub4, pin_duration: OCIDuration,
        lock_option: ub4, objectpp: *mut *mut c_void) -> sword;
    fn OCIObjectUnpin(envhp: *mut OCIEnv, errhp: *mut OCIError,
        object: *mut c_void) -> sword;
    fn OCIObjectGetObjectRef(envhp: *mut OCIEnv, errhp: *mut OCIError, object: *mut c_void,
        object_ref: *mut OCIRef) -> sword;
    fn OCIObjectGetInd(envhp: *mut OCIEnv, errhp: *mut OCIError, object: *mut c_void,
        null_structpp: *mut *mut c_void) -> sword;
    fn OCIRefAssign(envhp: *mut OCIEnv, errhp: *mut OCIError, source: *const OCIRef,
        target: *mut *mut OCIRef) -> sword;
    fn OCIRefIsNull(envhp: *mut OCIEnv, ref_: *const OCIRef) -> boolean;
    fn OCIRefClear(envhp: *mut OCIEnv, ref_: *mut OCIRef) -> sword;
    fn OCIRefToHex(envhp: *mut OCIEnv, errhp: *mut OCIError, ref_: *const OCIRef,
        hex: *mut OraText, hex_len: *mut ub4) -> sword;

    // collections
    fn OCICollSize(envhp: *mut OCIEnv, errhp: *mut OCIError, coll: *const OCIColl,
        size: *mut sb4) -> sword;
    fn OCICollMax(envhp: *mut OCIEnv, coll: *const OCIColl) -> sb4;
    fn OCICollGetElem(envhp: *mut OCIEnv, errhp: *mut OCIError, coll: *const OCIColl,
        index: sb4, exists: *mut boolean, elem: *mut *mut c_void,
        elemind: *mut *mut c_void) -> sword;
    fn OCICollAssignElem(envhp: *mut OCIEnv, errhp: *mut OCIError, index: sb4,
        elem: *const c_void, elemind: *const c_void, coll: *mut OCIColl) -> sword;
    fn OCICollAppend(envhp: *mut OCIEnv, errhp: *mut OCIError, elem: *const c_void,
        elemind: *const c_void, coll: *mut OCIColl) -> sword;
    fn OCICollTrim(envhp: *mut OCIEnv, errhp: *mut OCIError, trim_num: sb4,
        coll: *mut OCIColl) -> sword;
    fn OCIIterCreate(envhp: *mut OCIEnv, errhp: *mut OCIError, coll: *const OCIColl,
        itr: *mut *mut OCIIter) -> sword;
    fn OCIIterDelete(envhp: *mut OCIEnv, errhp: *mut OCIError,
        itr: *mut *mut OCIIter) -> sword;
    fn OCIIterInit(envhp: *mut OCIEnv, errhp: *mut OCIError, coll: *const OCIColl,
        itr: *mut OCIIter) -> sword;
    fn OCIIterNext(envhp: *mut OCIEnv, errhp: *mut OCIError, itr: *mut OCIIter,
        elem: *mut *mut c_void, elemind: *mut *mut c_void, eoc: *mut boolean) -> sword;
    fn OCIIterPrev(envhp: *mut OCIEnv, errhp: *mut OCIError, itr: *mut OCIIter,
        elem: *mut *mut c_void, elemind: *mut *mut c_void, boc: *mut boolean) -> sword;

    // advanced queuing
    fn OCIAQEnq(svchp: *mut OCISvcCtx, errhp: *mut OCIError, queue_name: *const OraText,
        enqopt: *mut OCIAQEnqOptions, msgprop: *mut OCIAQMsgProperties,
        payload_tdo: *mut OCIType, payload: *mut *mut c_void,
        payload_ind: *mut *mut c_void, msgid: *mut *mut OCIRaw, flags: ub4) -> sword;
    fn OCIAQDeq(svchp: *mut OCISvcCtx, errhp: *mut OCIError, queue_name: *const OraText,
        deqopt: *mut OCIAQDeqOptions, msgprop: *mut OCIAQMsgProperties,
        payload_tdo: *mut OCIType, payload: *mut *mut c_void,
        payload_ind: *mut *mut c_void, msgid: *mut *mut OCIRaw, flags: ub4) -> sword;
    fn OCIAQListen(svchp: *mut OCISvcCtx, errhp: *mut OCIError,
        agent_list: *mut *mut OCIAQAgent, num_agents: ub4, wait: sb4,
        agent: *mut *mut OCIAQAgent, flags: ub4) -> sword;

    // subscriptions
    fn OCISubscriptionRegister(svchp: *mut OCISvcCtx, subscrhpp: *mut *mut OCISubscription,
        count: ub2, errhp: *mut OCIError, mode: ub4) -> sword;
    fn OCISubscriptionUnRegister(svchp: *mut OCISvcCtx, subscrhp: *mut OCISubscription,
        errhp: *mut OCIError, mode: ub4) -> sword;

    // direct path loading
    fn OCIDirPathPrepare(dpctx: *mut OCIDirPathCtx, svchp: *mut OCISvcCtx,
        errhp: *mut OCIError) -> sword;
    fn OCIDirPathColArrayEntrySet(dpca: *mut OCIDirPathColArray, errhp: *mut OCIError,
        rownum: ub4, colidx: ub2, cvalp: *mut ub1, size: ub4, cflg: ub1) -> sword;
    fn OCIDirPathColArrayToStream(dpca: *mut OCIDirPathColArray, dpctx: *mut OCIDirPathCtx,
        dpstr: *mut OCIDirPathStream, errhp: *mut OCIError, rowcnt: ub4,
        rowoff: ub4) -> sword;
    fn OCIDirPathColArrayReset(dpca: *mut OCIDirPathColArray,
        errhp: *mut OCIError) -> sword;
    fn OCIDirPathStreamReset(dpstr: *mut OCIDirPathStream, errhp: *mut OCIError) -> sword;
    fn OCIDirPathLoadStream(dpctx: *mut OCIDirPathCtx, dpstr: *mut OCIDirPathStream,
        errhp: *mut OCIError) -> sword;
    fn OCIDirPathDataSave(dpctx: *mut OCIDirPathCtx, errhp: *mut OCIError,
        action: ub4) -> sword;
    fn OCIDirPathFinish(dpctx: *mut OCIDirPathCtx, errhp: *mut OCIError) -> sword;
    fn OCIDirPathAbort(dpctx: *mut OCIDirPathCtx, errhp: *mut OCIError) -> sword;
}

/// Shared-object names probed in order when no explicit path is configured.
#[cfg(not(feature = "static-link"))]
pub(crate) fn candidate_lib_names() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &["oci.dll"]
    } else if cfg!(target_os = "macos") {
        &["libclntsh.dylib", "libclntsh.dylib.19.1", "libclntsh.dylib.12.1"]
    } else {
        &[
            "libclntsh.so",
            "libclntsh.so.23.1",
            "libclntsh.so.21.1",
            "libclntsh.so.19.1",
            "libclntsh.so.18.1",
            "libclntsh.so.12.1",
            "libclntsh.so.11.1",
            "libclntsh.so.10.1",
        ]
    }
}

/// Tests whether `name` resolves in the loaded client library.
#[cfg(not(feature = "static-link"))]
pub(crate) fn has_symbol(lib: &libloading::Library, name: &str) -> bool {
    let mut bytes = Vec::with_capacity(name.len() + 1);
    bytes.extend_from_slice(name.as_bytes());
    bytes.push(0);
    unsafe { lib.get::<unsafe extern "C" fn()>(&bytes).is_ok() }
}
