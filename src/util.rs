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

//! Text bridge between rust strings and the environment charset, plus small
//! parsing helpers shared by the temporal types.

use std::str;

use crate::binding::{ub2, ub4, OraText};

/// Charset the OCI environment was created with.
///
/// Host text is always UTF-8 on the rust side; the bridge converts at the OCI
/// boundary. No transcoding happens in narrow mode: bytes pass through and the
/// session charset configured via `NLS_LANG` is expected to be UTF-8
/// compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// Byte-wide ORA text
    Narrow,
    /// 2-byte ORA text (`OCI_UTF16ID` environment)
    Utf16,
}

impl Charset {
    /// Bytes per code unit.
    pub(crate) fn width(self) -> usize {
        match self {
            Charset::Narrow => 1,
            Charset::Utf16 => 2,
        }
    }

    /// Encodes a rust string into backend text.
    pub(crate) fn string_to_text(self, s: &str) -> Vec<u8> {
        match self {
            Charset::Narrow => s.as_bytes().to_vec(),
            Charset::Utf16 => {
                let mut buf = Vec::with_capacity(s.len() * 2);
                for unit in s.encode_utf16() {
                    buf.extend_from_slice(&unit.to_ne_bytes());
                }
                buf
            }
        }
    }

    /// Decodes backend text of `buf.len()` bytes into a rust string.
    pub(crate) fn text_to_string(self, buf: &[u8]) -> String {
        match self {
            Charset::Narrow => String::from_utf8_lossy(buf).into_owned(),
            Charset::Utf16 => {
                let units: Vec<u16> = buf
                    .chunks_exact(2)
                    .map(|c| u16::from_ne_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
        }
    }

    /// Decodes null-terminated backend text.
    pub(crate) fn text_to_string_nt(self, buf: &[u8]) -> String {
        let len = match self {
            Charset::Narrow => buf.iter().position(|&b| b == 0).unwrap_or(buf.len()),
            Charset::Utf16 => {
                let mut len = buf.len() & !1;
                for (i, c) in buf.chunks_exact(2).enumerate() {
                    if c[0] == 0 && c[1] == 0 {
                        len = i * 2;
                        break;
                    }
                }
                len
            }
        };
        self.text_to_string(&buf[..len])
    }
}

/// A rust string encoded for the OCI boundary.
pub(crate) struct OciString {
    bytes: Vec<u8>,
}

impl OciString {
    pub(crate) fn new(s: &str, charset: Charset) -> OciString {
        OciString {
            bytes: charset.string_to_text(s),
        }
    }

    pub(crate) fn ptr(&self) -> *const OraText {
        self.bytes.as_ptr()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut OraText {
        self.bytes.as_mut_ptr()
    }

    /// Length in bytes, the unit OCI expects for text arguments.
    pub(crate) fn len(&self) -> ub4 {
        self.bytes.len() as ub4
    }

    pub(crate) fn len_ub2(&self) -> ub2 {
        self.bytes.len() as ub2
    }
}

/// Converts a string attribute buffer, working around a client defect: some
/// versions return narrow text for string attributes even in a UTF-16
/// environment. ASCII text in UTF-16 has a zero high byte, so a non-zero
/// second byte identifies a narrow buffer.
pub(crate) fn attr_text_to_string(charset: Charset, buf: &[u8]) -> String {
    if charset == Charset::Utf16 && buf.len() >= 2 && buf[1] != 0 {
        Charset::Narrow.text_to_string(buf)
    } else {
        charset.text_to_string(buf)
    }
}

/// Counts UTF-8 code points by skipping continuation bytes.
pub(crate) fn utf8_char_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b & 0xc0 != 0x80).count()
}

/// True when the `NLS_LANG` value selects a UTF-8 session charset.
pub(crate) fn nls_lang_is_utf8(nls_lang: &str) -> bool {
    nls_lang.to_uppercase().contains("UTF8")
}

/// Uppercases an identifier the way the server does, leaving quoted sections
/// untouched.
pub(crate) fn server_case_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut quoted = false;
    for c in name.chars() {
        if c == '"' {
            quoted = !quoted;
            out.push(c);
        } else if quoted {
            out.push(c);
        } else {
            out.extend(c.to_uppercase());
        }
    }
    out
}

pub struct Scanner<'a> {
    chars: str::Chars<'a>,
    char: Option<char>,
    ndigits: u32,
}

impl<'a> Scanner<'a> {
    pub fn new(s: &'a str) -> Scanner<'a> {
        let mut chars = s.chars();
        let char = chars.next();
        Scanner {
            chars,
            char,
            ndigits: 0,
        }
    }

    pub fn next(&mut self) -> Option<char> {
        self.char = self.chars.next();
        self.char
    }

    pub fn char(&self) -> Option<char> {
        self.char
    }

    pub fn read_digits(&mut self) -> Option<u64> {
        let mut num = 0;
        self.ndigits = 0;
        loop {
            num = num * 10
                + match self.char {
                    Some(c @ '0'..='9') => c as u64 - '0' as u64,
                    _ => {
                        if self.ndigits > 0 {
                            return Some(num);
                        } else {
                            return None;
                        }
                    }
                };
            self.char = self.chars.next();
            self.ndigits += 1;
        }
    }

    pub fn ndigits(&self) -> u32 {
        self.ndigits
    }
}

pub fn check_number_format(s: &str) -> bool {
    let mut s = Scanner::new(s);

    // optional negative sign
    if let Some('-') = s.char() {
        s.next();
    }

    // decimal part
    if s.read_digits().is_none() {
        return false;
    }
    // optional fractional part
    if let Some('.') = s.char() {
        s.next();
        if s.read_digits().is_none() {
            return false;
        }
    }
    // optional exponent
    if let Some('e') | Some('E') = s.char() {
        s.next();
        if let Some('+') | Some('-') = s.char() {
            s.next();
        }
        if s.read_digits().is_none() {
            return false;
        }
    }
    s.char().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_round_trip() {
        let cs = Charset::Narrow;
        let text = cs.string_to_text("hello");
        assert_eq!(text, b"hello");
        assert_eq!(cs.text_to_string(&text), "hello");
    }

    #[test]
    fn utf16_round_trip() {
        let cs = Charset::Utf16;
        let text = cs.string_to_text("héllo");
        assert_eq!(text.len(), 10);
        assert_eq!(cs.text_to_string(&text), "héllo");
    }

    #[test]
    fn utf16_null_terminated() {
        let cs = Charset::Utf16;
        let mut text = cs.string_to_text("ab");
        text.extend_from_slice(&[0, 0, b'x', 0]);
        assert_eq!(cs.text_to_string_nt(&text), "ab");
    }

    #[test]
    fn narrow_attr_buffer_in_wide_mode_is_demoted() {
        // "AB" as returned narrow by the defective client path
        assert_eq!(attr_text_to_string(Charset::Utf16, b"AB"), "AB");
        // "AB" as proper UTF-16
        let wide = Charset::Utf16.string_to_text("AB");
        assert_eq!(attr_text_to_string(Charset::Utf16, &wide), "AB");
    }

    #[test]
    fn utf8_length_counts_code_points() {
        assert_eq!(utf8_char_count("héllo".as_bytes()), 5);
        assert_eq!(utf8_char_count("日本語".as_bytes()), 3);
        assert_eq!(utf8_char_count(b"plain"), 5);
    }

    #[test]
    fn nls_lang_utf8_detection() {
        assert!(nls_lang_is_utf8("AMERICAN_AMERICA.UTF8"));
        assert!(nls_lang_is_utf8("american_america.al32utf8"));
        assert!(!nls_lang_is_utf8("AMERICAN_AMERICA.WE8ISO8859P1"));
    }

    #[test]
    fn identifier_casing_preserves_quotes() {
        assert_eq!(server_case_identifier("emp"), "EMP");
        assert_eq!(server_case_identifier("\"MyType\""), "\"MyType\"");
        assert_eq!(server_case_identifier("hr.\"myTab\""), "HR.\"myTab\"");
    }

    #[test]
    fn test_scanner() {
        let mut s = Scanner::new("123.4567890");
        assert_eq!(s.read_digits(), Some(123));
        assert_eq!(s.read_digits(), None);
        assert_eq!(s.char(), Some('.'));
        s.next();
        assert_eq!(s.read_digits(), Some(4567890));
        assert_eq!(s.char(), None);
    }

    #[test]
    fn test_check_number_format() {
        assert_eq!(check_number_format("123"), true);
        assert_eq!(check_number_format("-123"), true);
        assert_eq!(check_number_format("-123."), false);
        assert_eq!(check_number_format("-123.5"), true);
        assert_eq!(check_number_format("-123e"), false);
        assert_eq!(check_number_format("-123e1"), true);
        assert_eq!(check_number_format("-123e+1"), true);
        assert_eq!(check_number_format("-123e-1"), true);
        assert_eq!(check_number_format("-123e-10"), true);
    }
}
