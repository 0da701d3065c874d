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

use std::fmt;

use crate::sql_type::FromSql;
use crate::sql_value::SqlValue;
use crate::Result;

/// Value of a LONG column accumulated by the piecewise fetch loop.
///
/// The value only exists in rows fetched with
/// [`crate::LongMode::Explicit`]; its length is the concatenation of every
/// piece the server sent for the row.
#[derive(Clone, PartialEq, Eq)]
pub struct Long {
    text: String,
}

impl Long {
    /// Logical length in bytes of the fetched value.
    pub fn size(&self) -> usize {
        self.text.len()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl FromSql for Long {
    fn from_sql(val: &SqlValue) -> Result<Long> {
        Ok(Long {
            text: val.get_string()?,
        })
    }
}

impl fmt::Display for Long {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Long {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Long({} bytes)", self.text.len())
    }
}

/// Value of a LONG RAW column accumulated by the piecewise fetch loop.
#[derive(Clone, PartialEq, Eq)]
pub struct LongRaw {
    data: Vec<u8>,
}

impl LongRaw {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl FromSql for LongRaw {
    fn from_sql(val: &SqlValue) -> Result<LongRaw> {
        Ok(LongRaw {
            data: val.get_bytes()?,
        })
    }
}

impl fmt::Debug for LongRaw {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LongRaw({} bytes)", self.data.len())
    }
}
