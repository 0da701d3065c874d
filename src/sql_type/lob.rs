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

//! LOB and BFILE locators.
//!
//! Character LOBs count in characters on this API and convert at the OCI
//! boundary; binary LOBs count in bytes throughout. The 64-bit OCI entry
//! points are used transparently when the loaded client provides them.

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::raw::c_void;
use std::ptr;
use std::sync::Arc;

use crate::binding::*;
use crate::connection::ConnInner;
use crate::context::Context;
use crate::error::chkerr;
use crate::handle::Descriptor;
use crate::sql_type::{FromSql, OracleType, ToSql, ToSqlNull};
use crate::sql_value::SqlValue;
use crate::util::{utf8_char_count, Charset};
use crate::{Connection, Error, Result};

/// Characters carried by an encoded buffer, the way the server counts them:
/// code units in UTF-16 mode, UTF-8 code points when `NLS_LANG` selects a
/// UTF-8 session charset, bytes otherwise.
fn text_char_count(ctxt: &'static Context, data: &[u8]) -> u64 {
    match ctxt.charset() {
        Charset::Utf16 => (data.len() / 2) as u64,
        Charset::Narrow => {
            if ctxt.nls_utf8() {
                utf8_char_count(data) as u64
            } else {
                data.len() as u64
            }
        }
    }
}

/// Open mode of a LOB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobOpenMode {
    ReadOnly,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LobKind {
    Clob,
    Nclob,
    Blob,
    Bfile,
}

impl LobKind {
    fn charset_form(self) -> ub1 {
        match self {
            LobKind::Nclob => SQLCS_NCHAR,
            _ => SQLCS_IMPLICIT,
        }
    }

    fn is_character(self) -> bool {
        matches!(self, LobKind::Clob | LobKind::Nclob)
    }

    fn dtype(self) -> ub4 {
        match self {
            LobKind::Bfile => OCI_DTYPE_FILE,
            _ => OCI_DTYPE_LOB,
        }
    }
}

struct LobLocator {
    conn: Arc<ConnInner>,
    locator: Descriptor<OCILobLocator>,
    kind: LobKind,
    /// 1-based position of the next read or write, in characters for
    /// character LOBs and bytes otherwise.
    pos: u64,
    read_only: bool,
}

impl LobLocator {
    fn new(conn: Arc<ConnInner>, kind: LobKind) -> Result<LobLocator> {
        let locator = Descriptor::new(conn.ctxt(), kind.dtype())?;
        Ok(LobLocator {
            conn,
            locator,
            kind,
            pos: 1,
            read_only: kind == LobKind::Bfile,
        })
    }

    /// Copy of a locator fetched into a define buffer; the copy is owned by
    /// this wrapper.
    fn from_raw(conn: Arc<ConnInner>, src: *mut OCILobLocator, kind: LobKind) -> Result<LobLocator> {
        let lob = LobLocator::new(conn, kind)?;
        let ctxt = lob.conn.ctxt();
        let errhp = lob.conn.errhp();
        let mut dst = lob.locator.raw();
        chkerr!(
            ctxt,
            errhp,
            OCILobLocatorAssign(lob.conn.svchp(), errhp, src, &mut dst)
        );
        Ok(lob)
    }

    fn use_ub8(&self) -> bool {
        self.conn.ctxt().features().lob_ub8
    }

    fn length(&self) -> Result<u64> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        if self.use_ub8() {
            let mut len: ub8 = 0;
            chkerr!(
                ctxt,
                errhp,
                OCILobGetLength2(self.conn.svchp(), errhp, self.locator.raw(), &mut len)
            );
            Ok(len)
        } else {
            let mut len: ub4 = 0;
            chkerr!(
                ctxt,
                errhp,
                OCILobGetLength(self.conn.svchp(), errhp, self.locator.raw(), &mut len)
            );
            Ok(len as u64)
        }
    }

    /// Reads up to `amount` units at `offset` (1-based). Returns raw bytes in
    /// the environment charset.
    fn read_at(&self, offset: u64, amount: u64, buf: &mut Vec<u8>) -> Result<u64> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let byte_cap = if self.kind.is_character() {
            amount as usize * 4 * ctxt.charset().width()
        } else {
            amount as usize
        };
        buf.resize(byte_cap.max(1), 0);
        let csfrm = self.kind.charset_form();
        if self.use_ub8() {
            let mut byte_amt: ub8 = 0;
            let mut char_amt: ub8 = if self.kind.is_character() { amount } else { 0 };
            let status = crate::error::oci_call!(
                ctxt,
                OCILobRead2(
                    self.conn.svchp(),
                    errhp,
                    self.locator.raw(),
                    &mut byte_amt,
                    &mut char_amt,
                    offset,
                    buf.as_mut_ptr() as *mut c_void,
                    buf.len() as ub8,
                    OCI_ONE_PIECE,
                    ptr::null_mut(),
                    ptr::null_mut(),
                    0,
                    csfrm
                )
            );
            if status != OCI_NO_DATA {
                ctxt.check(errhp, status, "OCILobRead2")?;
            }
            buf.truncate(byte_amt as usize);
            Ok(if self.kind.is_character() {
                char_amt
            } else {
                byte_amt
            })
        } else {
            let mut amt: ub4 = amount as ub4;
            let status = crate::error::oci_call!(
                ctxt,
                OCILobRead(
                    self.conn.svchp(),
                    errhp,
                    self.locator.raw(),
                    &mut amt,
                    offset as ub4,
                    buf.as_mut_ptr() as *mut c_void,
                    buf.len() as ub4,
                    ptr::null_mut(),
                    ptr::null_mut(),
                    0,
                    csfrm
                )
            );
            if status != OCI_NO_DATA {
                ctxt.check(errhp, status, "OCILobRead")?;
            }
            if self.kind.is_character() {
                // amt counts characters; the byte count is bounded by the
                // buffer we supplied
                Ok(amt as u64)
            } else {
                buf.truncate(amt as usize);
                Ok(amt as u64)
            }
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::invalid_argument("the LOB is read-only"))
        } else {
            Ok(())
        }
    }

    /// Writes `data` at `offset` (1-based), returning written units.
    fn write_at(&self, offset: u64, data: &[u8], chars: u64) -> Result<u64> {
        self.check_writable()?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let csfrm = self.kind.charset_form();
        if self.use_ub8() {
            let mut byte_amt: ub8 = data.len() as ub8;
            let mut char_amt: ub8 = chars;
            chkerr!(
                ctxt,
                errhp,
                OCILobWrite2(
                    self.conn.svchp(),
                    errhp,
                    self.locator.raw(),
                    &mut byte_amt,
                    &mut char_amt,
                    offset,
                    data.as_ptr() as *mut c_void,
                    data.len() as ub8,
                    OCI_ONE_PIECE,
                    ptr::null_mut(),
                    ptr::null_mut(),
                    0,
                    csfrm
                )
            );
            Ok(if self.kind.is_character() {
                char_amt
            } else {
                byte_amt
            })
        } else {
            let mut amt: ub4 = if self.kind.is_character() {
                chars as ub4
            } else {
                data.len() as ub4
            };
            chkerr!(
                ctxt,
                errhp,
                OCILobWrite(
                    self.conn.svchp(),
                    errhp,
                    self.locator.raw(),
                    &mut amt,
                    offset as ub4,
                    data.as_ptr() as *mut c_void,
                    data.len() as ub4,
                    OCI_ONE_PIECE,
                    ptr::null_mut(),
                    ptr::null_mut(),
                    0,
                    csfrm
                )
            );
            Ok(amt as u64)
        }
    }

    fn append_bytes(&self, data: &[u8], chars: u64) -> Result<u64> {
        self.check_writable()?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let csfrm = self.kind.charset_form();
        if self.use_ub8() {
            let mut byte_amt: ub8 = data.len() as ub8;
            let mut char_amt: ub8 = chars;
            chkerr!(
                ctxt,
                errhp,
                OCILobWriteAppend2(
                    self.conn.svchp(),
                    errhp,
                    self.locator.raw(),
                    &mut byte_amt,
                    &mut char_amt,
                    data.as_ptr() as *mut c_void,
                    data.len() as ub8,
                    OCI_ONE_PIECE,
                    ptr::null_mut(),
                    ptr::null_mut(),
                    0,
                    csfrm
                )
            );
            Ok(if self.kind.is_character() {
                char_amt
            } else {
                byte_amt
            })
        } else {
            let mut amt: ub4 = if self.kind.is_character() {
                chars as ub4
            } else {
                data.len() as ub4
            };
            chkerr!(
                ctxt,
                errhp,
                OCILobWriteAppend(
                    self.conn.svchp(),
                    errhp,
                    self.locator.raw(),
                    &mut amt,
                    data.as_ptr() as *mut c_void,
                    data.len() as ub4,
                    OCI_ONE_PIECE,
                    ptr::null_mut(),
                    ptr::null_mut(),
                    0,
                    csfrm
                )
            );
            Ok(amt as u64)
        }
    }

    fn append_lob(&self, src: &LobLocator) -> Result<()> {
        self.check_writable()?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCILobAppend(self.conn.svchp(), errhp, self.locator.raw(), src.locator.raw())
        );
        Ok(())
    }

    fn copy_from(&self, src: &LobLocator, amount: u64, dst_offset: u64, src_offset: u64) -> Result<()> {
        self.check_writable()?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        if self.use_ub8() {
            chkerr!(
                ctxt,
                errhp,
                OCILobCopy2(
                    self.conn.svchp(),
                    errhp,
                    self.locator.raw(),
                    src.locator.raw(),
                    amount,
                    dst_offset,
                    src_offset
                )
            );
        } else {
            chkerr!(
                ctxt,
                errhp,
                OCILobCopy(
                    self.conn.svchp(),
                    errhp,
                    self.locator.raw(),
                    src.locator.raw(),
                    amount as ub4,
                    dst_offset as ub4,
                    src_offset as ub4
                )
            );
        }
        Ok(())
    }

    fn erase(&self, offset: u64, amount: u64) -> Result<u64> {
        self.check_writable()?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        if self.use_ub8() {
            let mut amt: ub8 = amount;
            chkerr!(
                ctxt,
                errhp,
                OCILobErase2(self.conn.svchp(), errhp, self.locator.raw(), &mut amt, offset)
            );
            Ok(amt)
        } else {
            let mut amt: ub4 = amount as ub4;
            chkerr!(
                ctxt,
                errhp,
                OCILobErase(self.conn.svchp(), errhp, self.locator.raw(), &mut amt, offset as ub4)
            );
            Ok(amt as u64)
        }
    }

    fn trim(&self, new_len: u64) -> Result<()> {
        self.check_writable()?;
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        if self.use_ub8() {
            chkerr!(
                ctxt,
                errhp,
                OCILobTrim2(self.conn.svchp(), errhp, self.locator.raw(), new_len)
            );
        } else {
            chkerr!(
                ctxt,
                errhp,
                OCILobTrim(self.conn.svchp(), errhp, self.locator.raw(), new_len as ub4)
            );
        }
        Ok(())
    }

    fn open(&mut self, mode: LobOpenMode) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let oci_mode = match mode {
            LobOpenMode::ReadOnly => OCI_LOB_READONLY,
            LobOpenMode::ReadWrite => {
                if self.kind == LobKind::Bfile {
                    return Err(Error::invalid_argument("a BFILE is read-only"));
                }
                OCI_LOB_READWRITE
            }
        };
        chkerr!(
            ctxt,
            errhp,
            OCILobOpen(self.conn.svchp(), errhp, self.locator.raw(), oci_mode)
        );
        if self.kind != LobKind::Bfile {
            self.read_only = mode == LobOpenMode::ReadOnly;
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCILobClose(self.conn.svchp(), errhp, self.locator.raw())
        );
        Ok(())
    }

    fn is_open(&self) -> Result<bool> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut flag: boolean = 0;
        chkerr!(
            ctxt,
            errhp,
            OCILobIsOpen(self.conn.svchp(), errhp, self.locator.raw(), &mut flag)
        );
        Ok(flag != 0)
    }

    fn is_equal(&self, other: &LobLocator) -> Result<bool> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        let mut flag: boolean = 0;
        chkerr!(
            ctxt,
            errhp,
            OCILobIsEqual(
                ctxt.env_handle(),
                self.locator.raw(),
                other.locator.raw(),
                &mut flag
            )
        );
        Ok(flag != 0)
    }

    fn create_temporary(&self, lobtype: ub1) -> Result<()> {
        let ctxt = self.conn.ctxt();
        let errhp = self.conn.errhp();
        chkerr!(
            ctxt,
            errhp,
            OCILobCreateTemporary(
                self.conn.svchp(),
                errhp,
                self.locator.raw(),
                0,
                self.kind.charset_form(),
                lobtype,
                FALSE,
                OCI_DURATION_SESSION
            )
        );
        Ok(())
    }

    fn seek_impl(&mut self, pos: SeekFrom) -> Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(n) => n.checked_add(1),
            SeekFrom::Current(n) => add_offset(self.pos, n),
            SeekFrom::End(n) => add_offset(self.length()? + 1, n),
        };
        match new_pos {
            Some(p) if p >= 1 => {
                self.pos = p;
                Ok(self.pos - 1)
            }
            _ => Err(Error::out_of_range("seek before the start of the LOB")),
        }
    }
}

fn add_offset(base: u64, offset: i64) -> Option<u64> {
    if offset >= 0 {
        base.checked_add(offset as u64)
    } else {
        base.checked_sub(offset.unsigned_abs())
    }
}

impl fmt::Debug for LobLocator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} {{ pos: {} }}", self.kind, self.pos)
    }
}

macro_rules! define_char_lob {
    ($name:ident, $kind:expr, $oratype:expr, $doc:expr) => {
        #[doc = $doc]
        pub struct $name {
            lob: LobLocator,
        }

        impl $name {
            /// Creates a session-duration temporary LOB.
            pub fn temporary(conn: &Connection) -> Result<$name> {
                let lob = LobLocator::new(conn.conn().clone(), $kind)?;
                lob.create_temporary(OCI_TEMP_CLOB)?;
                Ok($name { lob })
            }

            /// Length in characters.
            pub fn size(&self) -> Result<u64> {
                self.lob.length()
            }

            /// Reads up to `nchars` characters at the current position.
            pub fn read_string(&mut self, nchars: u64) -> Result<String> {
                let mut buf = Vec::new();
                let read = self.lob.read_at(self.lob.pos, nchars, &mut buf)?;
                self.lob.pos += read;
                Ok(self.lob.conn.ctxt().charset().text_to_string(&buf))
            }

            /// Writes a string at the current position, overwriting existing
            /// data.
            pub fn write_string(&mut self, s: &str) -> Result<u64> {
                let ctxt = self.lob.conn.ctxt();
                let data = ctxt.charset().string_to_text(s);
                let chars = text_char_count(ctxt, &data);
                let written = self.lob.write_at(self.lob.pos, &data, chars)?;
                self.lob.pos += written;
                Ok(written)
            }

            /// Appends a string at the end.
            pub fn append_string(&mut self, s: &str) -> Result<u64> {
                let ctxt = self.lob.conn.ctxt();
                let data = ctxt.charset().string_to_text(s);
                let chars = text_char_count(ctxt, &data);
                self.lob.append_bytes(&data, chars)
            }

            /// Appends the content of another LOB of the same kind.
            pub fn append(&mut self, src: &$name) -> Result<()> {
                self.lob.append_lob(&src.lob)
            }

            /// Copies `amount` characters from `src`.
            pub fn copy_from(
                &mut self,
                src: &$name,
                amount: u64,
                dst_offset: u64,
                src_offset: u64,
            ) -> Result<()> {
                self.lob.copy_from(&src.lob, amount, dst_offset + 1, src_offset + 1)
            }

            /// Replaces `amount` characters at `offset` with spaces,
            /// returning the erased count.
            pub fn erase(&mut self, offset: u64, amount: u64) -> Result<u64> {
                self.lob.erase(offset + 1, amount)
            }

            /// Truncates to `new_len` characters.
            pub fn trim(&mut self, new_len: u64) -> Result<()> {
                self.lob.trim(new_len)
            }

            pub fn open(&mut self, mode: LobOpenMode) -> Result<()> {
                self.lob.open(mode)
            }

            pub fn close(&mut self) -> Result<()> {
                self.lob.close()
            }

            pub fn is_open(&self) -> Result<bool> {
                self.lob.is_open()
            }

            pub fn is_equal(&self, other: &$name) -> Result<bool> {
                self.lob.is_equal(&other.lob)
            }

            /// Moves the read/write position; measured in characters.
            pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
                self.lob.seek_impl(pos)
            }

            pub(crate) fn locator(&self) -> *mut OCILobLocator {
                self.lob.locator.raw()
            }
        }

        impl FromSql for $name {
            fn from_sql(val: &SqlValue) -> Result<$name> {
                let src = val.lob_locator()?;
                Ok($name {
                    lob: LobLocator::from_raw(val.conn().clone(), src, $kind)?,
                })
            }
        }

        impl ToSql for $name {
            fn oratype(&self) -> Result<OracleType> {
                Ok($oratype)
            }
            fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
                val.set_lob_locator(self.locator())
            }
        }

        impl ToSqlNull for $name {
            fn oratype_for_null() -> Result<OracleType> {
                Ok($oratype)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:?})"), self.lob)
            }
        }
    };
}

define_char_lob!(Clob, LobKind::Clob, OracleType::CLOB, "CLOB locator");
define_char_lob!(
    Nclob,
    LobKind::Nclob,
    OracleType::NCLOB,
    "NCLOB locator, accounting in national-charset characters"
);

/// BLOB locator
pub struct Blob {
    lob: LobLocator,
}

impl Blob {
    /// Creates a session-duration temporary BLOB.
    pub fn temporary(conn: &Connection) -> Result<Blob> {
        let lob = LobLocator::new(conn.conn().clone(), LobKind::Blob)?;
        lob.create_temporary(OCI_TEMP_BLOB)?;
        Ok(Blob { lob })
    }

    /// Length in bytes.
    pub fn size(&self) -> Result<u64> {
        self.lob.length()
    }

    pub fn append(&mut self, src: &Blob) -> Result<()> {
        self.lob.append_lob(&src.lob)
    }

    pub fn copy_from(&mut self, src: &Blob, amount: u64, dst_offset: u64, src_offset: u64) -> Result<()> {
        self.lob.copy_from(&src.lob, amount, dst_offset + 1, src_offset + 1)
    }

    /// Replaces `amount` bytes at `offset` with zero bytes.
    pub fn erase(&mut self, offset: u64, amount: u64) -> Result<u64> {
        self.lob.erase(offset + 1, amount)
    }

    pub fn trim(&mut self, new_len: u64) -> Result<()> {
        self.lob.trim(new_len)
    }

    pub fn open(&mut self, mode: LobOpenMode) -> Result<()> {
        self.lob.open(mode)
    }

    pub fn close(&mut self) -> Result<()> {
        self.lob.close()
    }

    pub fn is_open(&self) -> Result<bool> {
        self.lob.is_open()
    }

    pub fn is_equal(&self, other: &Blob) -> Result<bool> {
        self.lob.is_equal(&other.lob)
    }

    pub(crate) fn locator(&self) -> *mut OCILobLocator {
        self.lob.locator.raw()
    }
}

impl Read for Blob {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut data = Vec::new();
        let read = self
            .lob
            .read_at(self.lob.pos, buf.len() as u64, &mut data)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let n = (read as usize).min(buf.len()).min(data.len());
        buf[..n].copy_from_slice(&data[..n]);
        self.lob.pos += n as u64;
        Ok(n)
    }
}

impl Write for Blob {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self
            .lob
            .write_at(self.lob.pos, buf, 0)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        self.lob.pos += written;
        Ok(written as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for Blob {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.lob
            .seek_impl(pos)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }
}

impl FromSql for Blob {
    fn from_sql(val: &SqlValue) -> Result<Blob> {
        let src = val.lob_locator()?;
        Ok(Blob {
            lob: LobLocator::from_raw(val.conn().clone(), src, LobKind::Blob)?,
        })
    }
}

impl ToSql for Blob {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::BLOB)
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_lob_locator(self.locator())
    }
}

impl ToSqlNull for Blob {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::BLOB)
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Blob({:?})", self.lob)
    }
}

/// BFILE locator; read-only, backed by a file in a server directory
pub struct Bfile {
    lob: LobLocator,
}

impl Bfile {
    /// Creates a locator referring to `filename` in the server directory
    /// alias `directory`.
    pub fn new(conn: &Connection, directory: &str, filename: &str) -> Result<Bfile> {
        let lob = LobLocator::new(conn.conn().clone(), LobKind::Bfile)?;
        let mut file = Bfile { lob };
        file.set_name(directory, filename)?;
        Ok(file)
    }

    pub fn set_name(&mut self, directory: &str, filename: &str) -> Result<()> {
        let ctxt = self.lob.conn.ctxt();
        let errhp = self.lob.conn.errhp();
        let dir = crate::util::OciString::new(directory, ctxt.charset());
        let name = crate::util::OciString::new(filename, ctxt.charset());
        let mut locp = self.lob.locator.raw();
        chkerr!(
            ctxt,
            errhp,
            OCILobFileSetName(
                ctxt.env_handle(),
                errhp,
                &mut locp,
                dir.ptr(),
                dir.len_ub2(),
                name.ptr(),
                name.len_ub2()
            )
        );
        Ok(())
    }

    /// Directory alias and filename this locator points at.
    pub fn name(&self) -> Result<(String, String)> {
        let ctxt = self.lob.conn.ctxt();
        let errhp = self.lob.conn.errhp();
        let mut dir = vec![0u8; 64 * ctxt.charset().width()];
        let mut name = vec![0u8; 512 * ctxt.charset().width()];
        let mut dir_len = dir.len() as ub2;
        let mut name_len = name.len() as ub2;
        chkerr!(
            ctxt,
            errhp,
            OCILobFileGetName(
                ctxt.env_handle(),
                errhp,
                self.lob.locator.raw(),
                dir.as_mut_ptr(),
                &mut dir_len,
                name.as_mut_ptr(),
                &mut name_len
            )
        );
        Ok((
            ctxt.charset().text_to_string(&dir[..dir_len as usize]),
            ctxt.charset().text_to_string(&name[..name_len as usize]),
        ))
    }

    /// True when the referenced file exists on the server.
    pub fn file_exists(&self) -> Result<bool> {
        let ctxt = self.lob.conn.ctxt();
        let errhp = self.lob.conn.errhp();
        let mut flag: boolean = 0;
        chkerr!(
            ctxt,
            errhp,
            OCILobFileExists(self.lob.conn.svchp(), errhp, self.lob.locator.raw(), &mut flag)
        );
        Ok(flag != 0)
    }

    /// Length in bytes.
    pub fn size(&self) -> Result<u64> {
        self.lob.length()
    }

    pub fn open(&mut self) -> Result<()> {
        self.lob.open(LobOpenMode::ReadOnly)
    }

    pub fn close(&mut self) -> Result<()> {
        self.lob.close()
    }

    pub fn is_open(&self) -> Result<bool> {
        self.lob.is_open()
    }

    pub(crate) fn locator(&self) -> *mut OCILobLocator {
        self.lob.locator.raw()
    }
}

impl Read for Bfile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut data = Vec::new();
        let read = self
            .lob
            .read_at(self.lob.pos, buf.len() as u64, &mut data)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let n = (read as usize).min(buf.len()).min(data.len());
        buf[..n].copy_from_slice(&data[..n]);
        self.lob.pos += n as u64;
        Ok(n)
    }
}

impl Seek for Bfile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.lob
            .seek_impl(pos)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }
}

impl FromSql for Bfile {
    fn from_sql(val: &SqlValue) -> Result<Bfile> {
        let src = val.lob_locator()?;
        Ok(Bfile {
            lob: LobLocator::from_raw(val.conn().clone(), src, LobKind::Bfile)?,
        })
    }
}

impl ToSql for Bfile {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::BFILE)
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_lob_locator(self.locator())
    }
}

impl ToSqlNull for Bfile {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::BFILE)
    }
}

impl fmt::Debug for Bfile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Bfile({:?})", self.lob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_offset_arithmetic() {
        assert_eq!(add_offset(1, 5), Some(6));
        assert_eq!(add_offset(10, -3), Some(7));
        assert_eq!(add_offset(2, -5), None);
    }
}
