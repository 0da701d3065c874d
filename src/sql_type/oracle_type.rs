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
use std::sync::Arc;

use crate::binding::*;
use crate::type_info::TypeInfo;
use crate::util::Charset;
use crate::{Error, Result};

// NativeType selects the OCI buffer representation of a column or bind.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NativeType {
    Int64,
    UInt64,
    Float,
    Double,
    Char,
    Number,
    Raw,
    Date,
    Timestamp(ub4),  // descriptor type code
    IntervalDS,
    IntervalYM,
    Lob(ub4),        // locator descriptor type code
    Rowid,
    Stmt,
    Long,
    LongRaw,
    Boolean,
    Object(Arc<TypeInfo>),
    Ref(Arc<TypeInfo>),
}

impl NativeType {
    /// External datatype code passed to bind and define calls.
    pub(crate) fn to_sqlt(&self) -> ub2 {
        match self {
            NativeType::Int64 => SQLT_INT,
            NativeType::UInt64 => SQLT_UIN,
            NativeType::Float => SQLT_BFLOAT,
            NativeType::Double => SQLT_BDOUBLE,
            NativeType::Char => SQLT_CHR,
            NativeType::Number => SQLT_VNU,
            NativeType::Raw => SQLT_BIN,
            NativeType::Date => SQLT_ODT,
            NativeType::Timestamp(OCI_DTYPE_TIMESTAMP_TZ) => SQLT_TIMESTAMP_TZ,
            NativeType::Timestamp(OCI_DTYPE_TIMESTAMP_LTZ) => SQLT_TIMESTAMP_LTZ,
            NativeType::Timestamp(_) => SQLT_TIMESTAMP,
            NativeType::IntervalDS => SQLT_INTERVAL_DS,
            NativeType::IntervalYM => SQLT_INTERVAL_YM,
            NativeType::Lob(OCI_DTYPE_FILE) => SQLT_BFILE,
            NativeType::Lob(_) => SQLT_CLOB,
            NativeType::Rowid => SQLT_RDD,
            NativeType::Stmt => SQLT_RSET,
            NativeType::Long => SQLT_LNG,
            NativeType::LongRaw => SQLT_LBI,
            NativeType::Boolean => SQLT_BOL,
            NativeType::Object(_) => SQLT_NTY,
            NativeType::Ref(_) => SQLT_REF,
        }
    }
}

/// Oracle data type
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum OracleType {
    /// VARCHAR2(size)
    Varchar2(u32),

    /// NVARCHAR2(size)
    NVarchar2(u32),

    /// CHAR(size)
    Char(u32),

    /// NCHAR(size)
    NChar(u32),

    /// ROWID
    Rowid,

    /// RAW(size)
    Raw(u32),

    /// BINARY_FLOAT
    ///
    /// IEEE 754 single-precision (32-bit) floating-point number
    BinaryFloat,

    /// BINARY_DOUBLE
    ///
    /// IEEE 754 double-precision (64-bit) floating-point number
    BinaryDouble,

    /// NUMBER(precision, scale)
    ///
    /// `precision` is between 0 and 38. When it is 0, its actual precision is
    /// 38 and `(precision, scale)` is omitted in text represention.
    Number(u8, i8),

    /// FLOAT(precision)
    ///
    /// A NUMBER subtype with binary precision
    Float(u8),

    /// DATE
    Date,

    /// TIMESTAMP(fsprec)
    Timestamp(u8),

    /// TIMESTAMP(fsprec) WITH TIME ZONE
    TimestampTZ(u8),

    /// TIMESTAMP(fsprec) WITH LOCAL TIME ZONE
    TimestampLTZ(u8),

    /// INTERVAL DAY(lfprec) TO SECOND(fsprec)
    IntervalDS(u8, u8),

    /// INTERVAL YEAR(lfprec) TO MONTH
    IntervalYM(u8),

    /// CLOB
    CLOB,

    /// NCLOB
    NCLOB,

    /// BLOB
    BLOB,

    /// BFILE
    BFILE,

    /// REF CURSOR (cursor returned from PL/SQL or a nested cursor column)
    RefCursor,

    /// BOOLEAN (PL/SQL only)
    Boolean,

    /// Named object type or named collection
    Object(Arc<TypeInfo>),

    /// REF to a named object type
    Ref(Arc<TypeInfo>),

    /// LONG, buffered piecewise while fetching
    Long,

    /// LONG RAW, buffered piecewise while fetching
    LongRaw,

    /// Integer bound with the native 64-bit representation
    Int64,

    /// Unsigned integer bound with the native 64-bit representation
    UInt64,
}

impl OracleType {
    pub(crate) fn native_type(&self) -> NativeType {
        match self {
            OracleType::Varchar2(_)
            | OracleType::NVarchar2(_)
            | OracleType::Char(_)
            | OracleType::NChar(_) => NativeType::Char,
            OracleType::Rowid => NativeType::Rowid,
            OracleType::Raw(_) => NativeType::Raw,
            OracleType::BinaryFloat => NativeType::Float,
            OracleType::BinaryDouble => NativeType::Double,
            OracleType::Number(_, _) | OracleType::Float(_) => NativeType::Number,
            OracleType::Date => NativeType::Date,
            OracleType::Timestamp(_) => NativeType::Timestamp(OCI_DTYPE_TIMESTAMP),
            OracleType::TimestampTZ(_) => NativeType::Timestamp(OCI_DTYPE_TIMESTAMP_TZ),
            OracleType::TimestampLTZ(_) => NativeType::Timestamp(OCI_DTYPE_TIMESTAMP_LTZ),
            OracleType::IntervalDS(_, _) => NativeType::IntervalDS,
            OracleType::IntervalYM(_) => NativeType::IntervalYM,
            OracleType::CLOB | OracleType::NCLOB | OracleType::BLOB => {
                NativeType::Lob(OCI_DTYPE_LOB)
            }
            OracleType::BFILE => NativeType::Lob(OCI_DTYPE_FILE),
            OracleType::RefCursor => NativeType::Stmt,
            OracleType::Boolean => NativeType::Boolean,
            OracleType::Object(ti) => NativeType::Object(ti.clone()),
            OracleType::Ref(ti) => NativeType::Ref(ti.clone()),
            OracleType::Long => NativeType::Long,
            OracleType::LongRaw => NativeType::LongRaw,
            OracleType::Int64 => NativeType::Int64,
            OracleType::UInt64 => NativeType::UInt64,
        }
    }

    /// Per-element buffer size in bytes for byte-backed native types.
    ///
    /// Character columns reserve one terminator unit; in a UTF-16 environment
    /// the server transports one code unit per character, in narrow mode a
    /// UTF-8 character can take up to four bytes.
    pub(crate) fn buffer_size(&self, charset: Charset) -> usize {
        match *self {
            OracleType::Varchar2(size)
            | OracleType::NVarchar2(size)
            | OracleType::Char(size)
            | OracleType::NChar(size) => {
                let units = match charset {
                    Charset::Narrow => size as usize * 4,
                    Charset::Utf16 => size as usize,
                };
                (units + 1) * charset.width()
            }
            OracleType::Raw(size) => size as usize,
            // maximum hex expansion of a universal rowid
            OracleType::Rowid => 4000,
            _ => 0,
        }
    }
}

impl fmt::Display for OracleType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            OracleType::Varchar2(size) => write!(f, "VARCHAR2({})", size),
            OracleType::NVarchar2(size) => write!(f, "NVARCHAR2({})", size),
            OracleType::Char(size) => write!(f, "CHAR({})", size),
            OracleType::NChar(size) => write!(f, "NCHAR({})", size),
            OracleType::Rowid => write!(f, "ROWID"),
            OracleType::Raw(size) => write!(f, "RAW({})", size),
            OracleType::BinaryFloat => write!(f, "BINARY_FLOAT"),
            OracleType::BinaryDouble => write!(f, "BINARY_DOUBLE"),
            OracleType::Number(prec, scale) => {
                if prec == 0 {
                    write!(f, "NUMBER")
                } else if scale == 0 {
                    write!(f, "NUMBER({})", prec)
                } else {
                    write!(f, "NUMBER({},{})", prec, scale)
                }
            }
            OracleType::Float(prec) => {
                if prec == 126 {
                    write!(f, "FLOAT")
                } else {
                    write!(f, "FLOAT({})", prec)
                }
            }
            OracleType::Date => write!(f, "DATE"),
            OracleType::Timestamp(fsprec) => {
                if fsprec == 6 {
                    write!(f, "TIMESTAMP")
                } else {
                    write!(f, "TIMESTAMP({})", fsprec)
                }
            }
            OracleType::TimestampTZ(fsprec) => {
                if fsprec == 6 {
                    write!(f, "TIMESTAMP WITH TIME ZONE")
                } else {
                    write!(f, "TIMESTAMP({}) WITH TIME ZONE", fsprec)
                }
            }
            OracleType::TimestampLTZ(fsprec) => {
                if fsprec == 6 {
                    write!(f, "TIMESTAMP WITH LOCAL TIME ZONE")
                } else {
                    write!(f, "TIMESTAMP({}) WITH LOCAL TIME ZONE", fsprec)
                }
            }
            OracleType::IntervalDS(lfprec, fsprec) => {
                if lfprec == 2 && fsprec == 6 {
                    write!(f, "INTERVAL DAY TO SECOND")
                } else {
                    write!(f, "INTERVAL DAY({}) TO SECOND({})", lfprec, fsprec)
                }
            }
            OracleType::IntervalYM(lfprec) => {
                if lfprec == 2 {
                    write!(f, "INTERVAL YEAR TO MONTH")
                } else {
                    write!(f, "INTERVAL YEAR({}) TO MONTH", lfprec)
                }
            }
            OracleType::CLOB => write!(f, "CLOB"),
            OracleType::NCLOB => write!(f, "NCLOB"),
            OracleType::BLOB => write!(f, "BLOB"),
            OracleType::BFILE => write!(f, "BFILE"),
            OracleType::RefCursor => write!(f, "REF CURSOR"),
            OracleType::Boolean => write!(f, "BOOLEAN"),
            OracleType::Object(ref ti) => write!(f, "{}", ti.name()),
            OracleType::Ref(ref ti) => write!(f, "REF {}", ti.name()),
            OracleType::Long => write!(f, "LONG"),
            OracleType::LongRaw => write!(f, "LONG RAW"),
            OracleType::Int64 => write!(f, "INT64"),
            OracleType::UInt64 => write!(f, "UINT64"),
        }
    }
}

/// Raw column facts read from a parameter descriptor, before mapping.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawColumnDesc {
    pub sqlt: ub2,
    pub byte_size: u32,
    pub char_size: u32,
    pub char_used: bool,
    pub precision: i16,
    pub scale: i8,
    pub fs_precision: u8,
    pub leading_precision: u8,
    pub charset_form: ub1,
    pub type_info: Option<Arc<TypeInfo>>,
}

// Maximum hex expansion of a physical rowid; a bigger reported size implies a
// universal rowid.
const ROWID_HEX_SIZE: u32 = 23;

/// Maps one internal datatype code to the driver type.
///
/// The mapping is deterministic. `implicit_long` selects the describe-time
/// demotion of LONG columns into bounded buffers of `long_size`; `returning`
/// marks a RETURNING-INTO placeholder, which changes the DATE and integer
/// representations to the packed wire forms the dynamic-bind callbacks can
/// carry.
pub(crate) fn map_oracle_type(
    desc: &RawColumnDesc,
    implicit_long: bool,
    long_size: u32,
    returning: bool,
) -> Result<OracleType> {
    let char_len = |desc: &RawColumnDesc| {
        if desc.char_used && desc.char_size > 0 {
            desc.char_size
        } else {
            desc.byte_size
        }
    };
    match desc.sqlt {
        SQLT_CHR | SQLT_VCS | SQLT_STR | SQLT_AVC | SQLT_VST => {
            if desc.charset_form == SQLCS_NCHAR {
                Ok(OracleType::NVarchar2(char_len(desc)))
            } else {
                Ok(OracleType::Varchar2(char_len(desc)))
            }
        }
        SQLT_AFC => {
            if desc.charset_form == SQLCS_NCHAR {
                Ok(OracleType::NChar(char_len(desc)))
            } else {
                Ok(OracleType::Char(char_len(desc)))
            }
        }
        // all numeric codes normalise to the Oracle NUMBER representation
        SQLT_NUM | SQLT_VNU | SQLT_FLT => {
            if desc.scale == -127 {
                if desc.precision == 0 {
                    Ok(OracleType::Float(126))
                } else {
                    Ok(OracleType::Float(desc.precision as u8))
                }
            } else {
                Ok(OracleType::Number(desc.precision as u8, desc.scale))
            }
        }
        SQLT_INT => Ok(OracleType::Int64),
        SQLT_UIN => Ok(OracleType::UInt64),
        SQLT_BFLOAT | SQLT_IBFLOAT => Ok(OracleType::BinaryFloat),
        SQLT_BDOUBLE | SQLT_IBDOUBLE => Ok(OracleType::BinaryDouble),
        SQLT_DAT | SQLT_ODT | SQLT_DATE => {
            // a RETURNING placeholder keeps the packed 7-byte wire form,
            // handled by the native-type selection
            let _ = returning;
            Ok(OracleType::Date)
        }
        SQLT_TIMESTAMP => Ok(OracleType::Timestamp(desc.fs_precision)),
        SQLT_TIMESTAMP_TZ => Ok(OracleType::TimestampTZ(desc.fs_precision)),
        SQLT_TIMESTAMP_LTZ => Ok(OracleType::TimestampLTZ(desc.fs_precision)),
        SQLT_INTERVAL_DS => Ok(OracleType::IntervalDS(
            desc.leading_precision,
            desc.fs_precision,
        )),
        SQLT_INTERVAL_YM => Ok(OracleType::IntervalYM(desc.leading_precision)),
        SQLT_RID | SQLT_RDD => {
            // sizes beyond the physical-rowid hex expansion imply UROWID;
            // both read through a rowid descriptor
            let _ = ROWID_HEX_SIZE;
            Ok(OracleType::Rowid)
        }
        SQLT_BIN => Ok(OracleType::Raw(desc.byte_size)),
        SQLT_LNG | SQLT_LVC => {
            if implicit_long {
                Ok(OracleType::Varchar2(long_size))
            } else {
                Ok(OracleType::Long)
            }
        }
        SQLT_LBI | SQLT_LVB => {
            if implicit_long {
                Ok(OracleType::Raw(long_size))
            } else {
                Ok(OracleType::LongRaw)
            }
        }
        SQLT_CLOB => {
            // NCLOB is CLOB with the national charset form
            if desc.charset_form == SQLCS_NCHAR {
                Ok(OracleType::NCLOB)
            } else {
                Ok(OracleType::CLOB)
            }
        }
        SQLT_BLOB => Ok(OracleType::BLOB),
        SQLT_BFILE | SQLT_CFILE => Ok(OracleType::BFILE),
        SQLT_CUR | SQLT_RSET => Ok(OracleType::RefCursor),
        SQLT_BOL => Ok(OracleType::Boolean),
        SQLT_NTY | SQLT_NCO => match desc.type_info {
            Some(ref ti) => Ok(OracleType::Object(ti.clone())),
            None => Err(Error::unsupported_type(
                "named type column without type information",
            )),
        },
        SQLT_REF => match desc.type_info {
            Some(ref ti) => Ok(OracleType::Ref(ti.clone())),
            None => Err(Error::unsupported_type(
                "REF column without type information",
            )),
        },
        other => Err(Error::unsupported_type(format!(
            "unsupported Oracle internal datatype code {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(sqlt: ub2) -> RawColumnDesc {
        RawColumnDesc {
            sqlt,
            ..Default::default()
        }
    }

    #[test]
    fn varchar2_uses_char_length_when_char_semantics() {
        let mut d = desc(SQLT_CHR);
        d.byte_size = 120;
        d.char_size = 30;
        d.char_used = true;
        assert_eq!(
            map_oracle_type(&d, false, 0, false).unwrap(),
            OracleType::Varchar2(30)
        );
        d.char_used = false;
        assert_eq!(
            map_oracle_type(&d, false, 0, false).unwrap(),
            OracleType::Varchar2(120)
        );
    }

    #[test]
    fn nchar_from_charset_form() {
        let mut d = desc(SQLT_AFC);
        d.byte_size = 10;
        d.charset_form = SQLCS_NCHAR;
        assert_eq!(
            map_oracle_type(&d, false, 0, false).unwrap(),
            OracleType::NChar(10)
        );
    }

    #[test]
    fn number_normalisation() {
        let mut d = desc(SQLT_NUM);
        d.precision = 10;
        d.scale = 2;
        assert_eq!(
            map_oracle_type(&d, false, 0, false).unwrap(),
            OracleType::Number(10, 2)
        );
        d.scale = -127;
        assert_eq!(
            map_oracle_type(&d, false, 0, false).unwrap(),
            OracleType::Float(10)
        );
    }

    #[test]
    fn long_demotion_in_implicit_mode() {
        assert_eq!(
            map_oracle_type(&desc(SQLT_LNG), false, 0, false).unwrap(),
            OracleType::Long
        );
        assert_eq!(
            map_oracle_type(&desc(SQLT_LNG), true, 32768, false).unwrap(),
            OracleType::Varchar2(32768)
        );
        assert_eq!(
            map_oracle_type(&desc(SQLT_LBI), true, 32768, false).unwrap(),
            OracleType::Raw(32768)
        );
    }

    #[test]
    fn nclob_by_charset_form() {
        let mut d = desc(SQLT_CLOB);
        assert_eq!(
            map_oracle_type(&d, false, 0, false).unwrap(),
            OracleType::CLOB
        );
        d.charset_form = SQLCS_NCHAR;
        assert_eq!(
            map_oracle_type(&d, false, 0, false).unwrap(),
            OracleType::NCLOB
        );
    }

    #[test]
    fn unsupported_code_is_rejected() {
        let err = map_oracle_type(&desc(9999), false, 0, false).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::UnsupportedType);
    }

    #[test]
    fn display_forms() {
        assert_eq!(OracleType::Number(0, 0).to_string(), "NUMBER");
        assert_eq!(OracleType::Number(10, 0).to_string(), "NUMBER(10)");
        assert_eq!(OracleType::Number(10, 2).to_string(), "NUMBER(10,2)");
        assert_eq!(OracleType::Timestamp(6).to_string(), "TIMESTAMP");
        assert_eq!(OracleType::Timestamp(3).to_string(), "TIMESTAMP(3)");
        assert_eq!(OracleType::Varchar2(20).to_string(), "VARCHAR2(20)");
    }
}
