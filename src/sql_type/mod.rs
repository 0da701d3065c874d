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

//! SQL data types

use crate::sql_value::SqlValue;
use crate::{Error, Result};

#[cfg(feature = "chrono")]
mod chrono;
mod collection;
mod interval_ds;
mod interval_ym;
pub(crate) mod lob;
mod long;
pub(crate) mod object;
pub(crate) mod oracle_type;
mod ref_cursor;
mod timestamp;

pub use self::collection::Collection;
pub use self::collection::CollectionIter;
pub use self::interval_ds::IntervalDS;
pub use self::interval_ym::IntervalYM;
pub use self::lob::Bfile;
pub use self::lob::Blob;
pub use self::lob::Clob;
pub use self::lob::Nclob;
pub use self::long::Long;
pub use self::long::LongRaw;
pub use self::object::Object;
pub use self::object::Ref;
pub(crate) use self::oracle_type::NativeType;
pub use self::oracle_type::OracleType;
pub use self::ref_cursor::RefCursor;
pub use self::timestamp::Timestamp;

/// Conversion from Oracle values to rust values.
///
/// | Oracle type | Rust type |
/// | --- | --- |
/// | character types | `String`, or any numeric type via parsing |
/// | numeric types | `i8`-`i64`, `u8`-`u64`, `f32`, `f64`, `String` via the number format |
/// | `DATE`, `TIMESTAMP` variants | [`Timestamp`], `String` via the datetime formats |
/// | `INTERVAL DAY TO SECOND` | [`IntervalDS`] |
/// | `INTERVAL YEAR TO MONTH` | [`IntervalYM`] |
/// | `RAW`, `LONG RAW` | `Vec<u8>` |
/// | `CLOB`, `NCLOB`, `BLOB`, `BFILE` | [`Clob`], [`Nclob`], [`Blob`], [`Bfile`] |
/// | `REF CURSOR` | [`RefCursor`] |
/// | object types | [`Object`], [`Collection`], [`Ref`] |
pub trait FromSql: Sized {
    fn from_sql(val: &SqlValue) -> Result<Self>;
}

/// Conversion from rust values to Oracle values used when binding.
pub trait ToSql {
    /// The Oracle type the value binds as.
    fn oratype(&self) -> Result<OracleType>;
    fn to_sql(&self, val: &mut SqlValue) -> Result<()>;
}

/// The Oracle type a `None` of this rust type binds as.
pub trait ToSqlNull {
    fn oratype_for_null() -> Result<OracleType>;
}

macro_rules! impl_signed_int {
    ($($t:ty),*) => {
        $(
            impl FromSql for $t {
                fn from_sql(val: &SqlValue) -> Result<$t> {
                    let n = val.get_i64()?;
                    <$t>::try_from(n).map_err(|e| {
                        Error::invalid_type_conversion(
                            &val.oracle_type().to_string(),
                            stringify!($t),
                        )
                        .add_source(e)
                    })
                }
            }
            impl ToSql for $t {
                fn oratype(&self) -> Result<OracleType> {
                    Ok(OracleType::Int64)
                }
                fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
                    val.set_i64(*self as i64)
                }
            }
            impl ToSqlNull for $t {
                fn oratype_for_null() -> Result<OracleType> {
                    Ok(OracleType::Int64)
                }
            }
        )*
    };
}

macro_rules! impl_unsigned_int {
    ($($t:ty),*) => {
        $(
            impl FromSql for $t {
                fn from_sql(val: &SqlValue) -> Result<$t> {
                    let n = val.get_u64()?;
                    <$t>::try_from(n).map_err(|e| {
                        Error::invalid_type_conversion(
                            &val.oracle_type().to_string(),
                            stringify!($t),
                        )
                        .add_source(e)
                    })
                }
            }
            impl ToSql for $t {
                fn oratype(&self) -> Result<OracleType> {
                    Ok(OracleType::UInt64)
                }
                fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
                    val.set_u64(*self as u64)
                }
            }
            impl ToSqlNull for $t {
                fn oratype_for_null() -> Result<OracleType> {
                    Ok(OracleType::UInt64)
                }
            }
        )*
    };
}

impl_signed_int!(i8, i16, i32, i64, isize);
impl_unsigned_int!(u8, u16, u32, u64, usize);

impl FromSql for f64 {
    fn from_sql(val: &SqlValue) -> Result<f64> {
        val.get_f64()
    }
}

impl ToSql for f64 {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::BinaryDouble)
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_f64(*self)
    }
}

impl ToSqlNull for f64 {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::BinaryDouble)
    }
}

impl FromSql for f32 {
    fn from_sql(val: &SqlValue) -> Result<f32> {
        val.get_f32()
    }
}

impl ToSql for f32 {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::BinaryFloat)
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_f64(*self as f64)
    }
}

impl ToSqlNull for f32 {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::BinaryFloat)
    }
}

impl FromSql for bool {
    fn from_sql(val: &SqlValue) -> Result<bool> {
        val.get_bool()
    }
}

impl ToSql for bool {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::Boolean)
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_bool(*self)
    }
}

impl FromSql for String {
    fn from_sql(val: &SqlValue) -> Result<String> {
        val.get_string()
    }
}

impl ToSql for String {
    fn oratype(&self) -> Result<OracleType> {
        <&str>::oratype(&self.as_str())
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_string(self)
    }
}

impl ToSqlNull for String {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::Varchar2(1))
    }
}

impl ToSql for &str {
    fn oratype(&self) -> Result<OracleType> {
        // bytes is an upper bound of the character count
        Ok(OracleType::Varchar2(self.len().max(1) as u32))
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_string(self)
    }
}

impl ToSqlNull for &str {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::Varchar2(1))
    }
}

impl FromSql for Vec<u8> {
    fn from_sql(val: &SqlValue) -> Result<Vec<u8>> {
        val.get_bytes()
    }
}

impl ToSql for Vec<u8> {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::Raw(self.len().max(1) as u32))
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_bytes(self)
    }
}

impl ToSqlNull for Vec<u8> {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::Raw(1))
    }
}

impl ToSql for &[u8] {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::Raw(self.len().max(1) as u32))
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_bytes(self)
    }
}

impl FromSql for Timestamp {
    fn from_sql(val: &SqlValue) -> Result<Timestamp> {
        val.get_timestamp()
    }
}

impl ToSql for Timestamp {
    fn oratype(&self) -> Result<OracleType> {
        if self.with_tz() {
            Ok(OracleType::TimestampTZ(self.precision()))
        } else {
            Ok(OracleType::Timestamp(self.precision()))
        }
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_timestamp(self)
    }
}

impl ToSqlNull for Timestamp {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::Timestamp(9))
    }
}

impl FromSql for IntervalDS {
    fn from_sql(val: &SqlValue) -> Result<IntervalDS> {
        val.get_interval_ds()
    }
}

impl ToSql for IntervalDS {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::IntervalDS(self.lfprec(), self.fsprec()))
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_interval_ds(self)
    }
}

impl ToSqlNull for IntervalDS {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::IntervalDS(9, 9))
    }
}

impl FromSql for IntervalYM {
    fn from_sql(val: &SqlValue) -> Result<IntervalYM> {
        val.get_interval_ym()
    }
}

impl ToSql for IntervalYM {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::IntervalYM(self.lfprec()))
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_interval_ym(self)
    }
}

impl ToSqlNull for IntervalYM {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::IntervalYM(9))
    }
}

impl<T: FromSql> FromSql for Option<T> {
    fn from_sql(val: &SqlValue) -> Result<Option<T>> {
        if val.is_null()? {
            Ok(None)
        } else {
            Ok(Some(T::from_sql(val)?))
        }
    }
}

impl<T: ToSql + ToSqlNull> ToSql for Option<T> {
    fn oratype(&self) -> Result<OracleType> {
        match self {
            Some(v) => v.oratype(),
            None => T::oratype_for_null(),
        }
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        match self {
            Some(v) => v.to_sql(val),
            None => val.set_null(),
        }
    }
}

/// Binding an `OracleType` itself declares a NULL placeholder of that type,
/// typically an OUT bind read back with `bind_value` after execute.
impl ToSql for OracleType {
    fn oratype(&self) -> Result<OracleType> {
        Ok(self.clone())
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_null()
    }
}

/// Renders a datetime with an Oracle format model.
///
/// The supported tokens are the ones appearing in the driver defaults
/// (`YYYY`, `MM`, `DD`, `HH24`, `MI`, `SS`, `FF`, `FF1`..`FF9`, `TZH`,
/// `TZM`, `TZR`); everything else is copied verbatim.
pub(crate) fn format_datetime(ts: &Timestamp, fmt: &str) -> String {
    let mut out = String::with_capacity(fmt.len() + 8);
    let bytes = fmt.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let rest = &fmt[i..];
        if rest.starts_with("YYYY") {
            out.push_str(&format!("{:04}", ts.year()));
            i += 4;
        } else if rest.starts_with("HH24") {
            out.push_str(&format!("{:02}", ts.hour()));
            i += 4;
        } else if rest.starts_with("MM") {
            out.push_str(&format!("{:02}", ts.month()));
            i += 2;
        } else if rest.starts_with("DD") {
            out.push_str(&format!("{:02}", ts.day()));
            i += 2;
        } else if rest.starts_with("MI") {
            out.push_str(&format!("{:02}", ts.minute()));
            i += 2;
        } else if rest.starts_with("SS") {
            out.push_str(&format!("{:02}", ts.second()));
            i += 2;
        } else if rest.starts_with("FF") {
            let (prec, used) = match rest.as_bytes().get(2) {
                Some(d @ b'1'..=b'9') => ((d - b'0') as u32, 3),
                _ => (6, 2),
            };
            let mut frac = ts.nanosecond();
            for _ in prec..9 {
                frac /= 10;
            }
            out.push_str(&format!("{:0width$}", frac, width = prec as usize));
            i += used;
        } else if rest.starts_with("TZR") {
            let sign = if ts.tz_offset() < 0 { '-' } else { '+' };
            out.push_str(&format!(
                "{}{:02}:{:02}",
                sign,
                ts.tz_hour_offset().abs(),
                ts.tz_minute_offset().abs()
            ));
            i += 3;
        } else if rest.starts_with("TZH") {
            let sign = if ts.tz_offset() < 0 { '-' } else { '+' };
            out.push_str(&format!("{}{:02}", sign, ts.tz_hour_offset().abs()));
            i += 3;
        } else if rest.starts_with("TZM") {
            out.push_str(&format!("{:02}", ts.tz_minute_offset().abs()));
            i += 3;
        } else {
            let c = rest.chars().next().unwrap();
            out.push(c);
            i += c.len_utf8();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_default_format() {
        let ts = Timestamp::new(2023, 7, 14, 9, 5, 30, 123_456_789).unwrap();
        assert_eq!(
            format_datetime(&ts, "YYYY-MM-DD HH24:MI:SS"),
            "2023-07-14 09:05:30"
        );
        assert_eq!(
            format_datetime(&ts, "YYYY-MM-DD HH24:MI:SS.FF"),
            "2023-07-14 09:05:30.123456"
        );
        assert_eq!(
            format_datetime(&ts, "YYYY-MM-DD HH24:MI:SS.FF3"),
            "2023-07-14 09:05:30.123"
        );
    }

    #[test]
    fn datetime_tz_format() {
        let ts = Timestamp::new(2023, 7, 14, 9, 5, 30, 0)
            .unwrap()
            .and_tz_hm_offset(-8, 0)
            .unwrap();
        assert_eq!(
            format_datetime(&ts, "YYYY-MM-DD HH24:MI:SS.FF TZR"),
            "2023-07-14 09:05:30.000000 -08:00"
        );
        assert_eq!(format_datetime(&ts, "TZH:TZM"), "-08:00");
    }

    #[test]
    fn custom_separators_pass_through() {
        let ts = Timestamp::new(2023, 1, 2, 3, 4, 5, 0).unwrap();
        assert_eq!(format_datetime(&ts, "DD/MM/YYYY"), "02/01/2023");
    }
}
