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

//! Conversions between Oracle temporal types and `chrono` types, available
//! when the `chrono` feature is enabled.

use chrono::offset::{FixedOffset, Utc};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike};

use crate::sql_type::{FromSql, OracleType, Timestamp, ToSql, ToSqlNull};
use crate::sql_value::SqlValue;
use crate::{Error, Result};

fn timestamp_to_fixed_offset(ts: &Timestamp) -> Result<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(ts.tz_offset())
        .ok_or_else(|| Error::out_of_range("time zone offset out of range"))?;
    offset
        .with_ymd_and_hms(
            ts.year(),
            ts.month(),
            ts.day(),
            ts.hour(),
            ts.minute(),
            ts.second(),
        )
        .single()
        .and_then(|dt| dt.with_nanosecond(ts.nanosecond()))
        .ok_or_else(|| Error::out_of_range("timestamp out of the chrono range"))
}

impl FromSql for DateTime<FixedOffset> {
    fn from_sql(val: &SqlValue) -> Result<DateTime<FixedOffset>> {
        let ts = val.get_timestamp()?;
        timestamp_to_fixed_offset(&ts)
    }
}

impl FromSql for DateTime<Utc> {
    fn from_sql(val: &SqlValue) -> Result<DateTime<Utc>> {
        Ok(DateTime::<FixedOffset>::from_sql(val)?.with_timezone(&Utc))
    }
}

impl FromSql for NaiveDateTime {
    fn from_sql(val: &SqlValue) -> Result<NaiveDateTime> {
        let ts = val.get_timestamp()?;
        NaiveDate::from_ymd_opt(ts.year(), ts.month(), ts.day())
            .and_then(|d| d.and_hms_nano_opt(ts.hour(), ts.minute(), ts.second(), ts.nanosecond()))
            .ok_or_else(|| Error::out_of_range("timestamp out of the chrono range"))
    }
}

impl FromSql for NaiveDate {
    fn from_sql(val: &SqlValue) -> Result<NaiveDate> {
        let ts = val.get_timestamp()?;
        NaiveDate::from_ymd_opt(ts.year(), ts.month(), ts.day())
            .ok_or_else(|| Error::out_of_range("date out of the chrono range"))
    }
}

fn datetime_to_timestamp<Tz: TimeZone>(dt: &DateTime<Tz>) -> Result<Timestamp> {
    let ts = Timestamp::new(
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.nanosecond(),
    )?;
    ts.and_tz_offset(dt.offset().fix().local_minus_utc())
}

impl<Tz: TimeZone> ToSql for DateTime<Tz> {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::TimestampTZ(9))
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        val.set_timestamp(&datetime_to_timestamp(self)?)
    }
}

impl<Tz: TimeZone> ToSqlNull for DateTime<Tz> {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::TimestampTZ(9))
    }
}

impl ToSql for NaiveDateTime {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::Timestamp(9))
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        let ts = Timestamp::new(
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second(),
            self.nanosecond(),
        )?;
        val.set_timestamp(&ts)
    }
}

impl ToSqlNull for NaiveDateTime {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::Timestamp(9))
    }
}

impl ToSql for NaiveDate {
    fn oratype(&self) -> Result<OracleType> {
        Ok(OracleType::Date)
    }
    fn to_sql(&self, val: &mut SqlValue) -> Result<()> {
        let ts = Timestamp::new(self.year(), self.month(), self.day(), 0, 0, 0, 0)?;
        val.set_timestamp(&ts)
    }
}

impl ToSqlNull for NaiveDate {
    fn oratype_for_null() -> Result<OracleType> {
        Ok(OracleType::Date)
    }
}
