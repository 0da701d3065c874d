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

use std::cmp::Ordering;
use std::fmt;
use std::result;
use std::str::FromStr;

use crate::util::Scanner;
use crate::ParseOracleTypeError;

/// Oracle-specific datetime data type
///
/// This struct doesn't have arithmetic methods. If you need to add an
/// interval to a timestamp, enable the `chrono` feature and convert.
///
/// # Examples
///
/// ```
/// # use ocilib::Error;
/// # use ocilib::sql_type::Timestamp;
/// let ts1 = Timestamp::new(2017, 8, 9, 11, 22, 33, 500_000_000)?;
/// assert_eq!(ts1.to_string(), "2017-08-09 11:22:33.500000000");
///
/// let ts2 = ts1.and_tz_hm_offset(-8, 0)?;
/// assert_eq!(ts2.to_string(), "2017-08-09 11:22:33.500000000 -08:00");
///
/// let ts3 = ts1.and_prec(3)?;
/// assert_eq!(ts3.to_string(), "2017-08-09 11:22:33.500");
///
/// // The precision is determined by the number of decimal digits when
/// // parsing from a string.
/// let ts4: Timestamp = "2017-08-09 11:22:33.500 -08:00".parse()?;
/// assert_eq!(ts4.precision(), 3);
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) day: u32,
    pub(crate) hour: u32,
    pub(crate) minute: u32,
    pub(crate) second: u32,
    pub(crate) nanosecond: u32,
    pub(crate) tz_hour_offset: i32,
    pub(crate) tz_minute_offset: i32,
    pub(crate) precision: u8,
    pub(crate) with_tz: bool,
}

impl Timestamp {
    pub(crate) fn check_ymd_hms_ns(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        nanosecond: u32,
    ) -> crate::Result<()> {
        if !(-4713..=9999).contains(&year) {
            return Err(crate::Error::out_of_range(format!("year out of range: {}", year)));
        }
        if !(1..=12).contains(&month) {
            return Err(crate::Error::out_of_range(format!(
                "month out of range: {}",
                month
            )));
        }
        if !(1..=31).contains(&day) {
            return Err(crate::Error::out_of_range(format!("day out of range: {}", day)));
        }
        if hour > 23 {
            return Err(crate::Error::out_of_range(format!("hour out of range: {}", hour)));
        }
        if minute > 59 {
            return Err(crate::Error::out_of_range(format!(
                "minute out of range: {}",
                minute
            )));
        }
        if second > 59 {
            return Err(crate::Error::out_of_range(format!(
                "second out of range: {}",
                second
            )));
        }
        if nanosecond > 999_999_999 {
            return Err(crate::Error::out_of_range(format!(
                "nanosecond out of range: {}",
                nanosecond
            )));
        }
        Ok(())
    }

    /// Creates a timestamp without time zone.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        nanosecond: u32,
    ) -> crate::Result<Timestamp> {
        Timestamp::check_ymd_hms_ns(year, month, day, hour, minute, second, nanosecond)?;
        Ok(Timestamp {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond,
            tz_hour_offset: 0,
            tz_minute_offset: 0,
            precision: 9,
            with_tz: false,
        })
    }

    /// Returns a timestamp with the time zone set as an offset in hours and
    /// minutes.
    pub fn and_tz_hm_offset(&self, hour_offset: i32, minute_offset: i32) -> crate::Result<Timestamp> {
        if !(-59..=59).contains(&minute_offset) {
            return Err(crate::Error::out_of_range(format!(
                "minute offset out of range: {}",
                minute_offset
            )));
        }
        if !(-15..=15).contains(&hour_offset) {
            return Err(crate::Error::out_of_range(format!(
                "hour offset out of range: {}",
                hour_offset
            )));
        }
        Ok(Timestamp {
            tz_hour_offset: hour_offset,
            tz_minute_offset: minute_offset,
            with_tz: true,
            ..*self
        })
    }

    /// Returns a timestamp with the time zone set as an offset in seconds.
    pub fn and_tz_offset(&self, offset: i32) -> crate::Result<Timestamp> {
        self.and_tz_hm_offset(offset / 3600, offset % 3600 / 60)
    }

    /// Returns a timestamp with the given fractional-second precision.
    pub fn and_prec(&self, precision: u8) -> crate::Result<Timestamp> {
        if precision > 9 {
            return Err(crate::Error::out_of_range(format!(
                "precision out of range: {}",
                precision
            )));
        }
        Ok(Timestamp {
            precision,
            ..*self
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    pub fn nanosecond(&self) -> u32 {
        self.nanosecond
    }

    pub fn tz_hour_offset(&self) -> i32 {
        self.tz_hour_offset
    }

    pub fn tz_minute_offset(&self) -> i32 {
        self.tz_minute_offset
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn with_tz(&self) -> bool {
        self.with_tz
    }

    /// Time zone offset in seconds
    pub fn tz_offset(&self) -> i32 {
        self.tz_hour_offset * 3600 + self.tz_minute_offset * 60
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        // precision is a display property and does not take part in equality
        self.year == other.year
            && self.month == other.month
            && self.day == other.day
            && self.hour == other.hour
            && self.minute == other.minute
            && self.second == other.second
            && self.nanosecond == other.nanosecond
            && self.tz_hour_offset == other.tz_hour_offset
            && self.tz_minute_offset == other.tz_minute_offset
            && self.with_tz == other.with_tz
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.with_tz != other.with_tz {
            return None;
        }
        let lhs = (
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.nanosecond,
        );
        let rhs = (
            other.year,
            other.month,
            other.day,
            other.hour,
            other.minute,
            other.second,
            other.nanosecond,
        );
        Some(lhs.cmp(&rhs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        match self.precision {
            1..=9 => {
                let mut frac = self.nanosecond;
                for _ in self.precision..9 {
                    frac /= 10;
                }
                write!(f, ".{:0width$}", frac, width = self.precision as usize)?;
            }
            _ => (),
        }
        if self.with_tz {
            let sign = if self.tz_hour_offset < 0 || self.tz_minute_offset < 0 {
                '-'
            } else {
                '+'
            };
            write!(
                f,
                " {}{:02}:{:02}",
                sign,
                self.tz_hour_offset.abs(),
                self.tz_minute_offset.abs()
            )?;
        }
        Ok(())
    }
}

impl FromStr for Timestamp {
    type Err = ParseOracleTypeError;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        let err = || ParseOracleTypeError::new("Timestamp");
        let mut s = Scanner::new(s);
        let minus = if let Some('-') = s.char() {
            s.next();
            true
        } else {
            false
        };
        let mut year = s.read_digits().ok_or_else(err)?;
        let mut month = 1;
        let mut day = 1;
        match s.char() {
            Some('T') | Some(' ') | None => {
                if year > 10000 {
                    day = year % 100;
                    month = (year / 100) % 100;
                    year /= 10000;
                }
            }
            Some('-') => {
                s.next();
                month = s.read_digits().ok_or_else(err)?;
                match s.char() {
                    Some('-') => {
                        s.next();
                        day = s.read_digits().ok_or_else(err)?
                    }
                    _ => return Err(err()),
                }
            }
            _ => return Err(err()),
        }
        let mut hour = 0;
        let mut min = 0;
        let mut sec = 0;
        let mut nsec = 0;
        let mut tz_hour: i32 = 0;
        let mut tz_min: i32 = 0;
        let mut with_tz = false;
        let mut precision = 0;
        if let Some(c) = s.char() {
            match c {
                'T' | ' ' => {
                    s.next();
                    hour = s.read_digits().ok_or_else(err)?;
                    if let Some(':') = s.char() {
                        s.next();
                        min = s.read_digits().ok_or_else(err)?;
                        if let Some(':') = s.char() {
                            s.next();
                            sec = s.read_digits().ok_or_else(err)?;
                        }
                    } else if s.ndigits() == 6 {
                        // 123456 -> 12:34:56
                        sec = hour % 100;
                        min = (hour / 100) % 100;
                        hour /= 10000;
                    } else {
                        return Err(err());
                    }
                }
                _ => return Err(err()),
            }
            if let Some('.') = s.char() {
                s.next();
                nsec = s.read_digits().ok_or_else(err)?;
                let ndigit = s.ndigits();
                precision = ndigit;
                if ndigit < 9 {
                    nsec *= 10u64.pow(9 - ndigit);
                } else if ndigit > 9 {
                    nsec /= 10u64.pow(ndigit - 9);
                    precision = 9;
                }
            }
            if let Some(' ') = s.char() {
                s.next();
            }
            match s.char() {
                Some('+') => {
                    s.next();
                    tz_hour = s.read_digits().ok_or_else(err)? as i32;
                    if let Some(':') = s.char() {
                        s.next();
                        tz_min = s.read_digits().ok_or_else(err)? as i32;
                    } else {
                        tz_min = tz_hour % 100;
                        tz_hour /= 100;
                    }
                    with_tz = true;
                }
                Some('-') => {
                    s.next();
                    tz_hour = s.read_digits().ok_or_else(err)? as i32;
                    if let Some(':') = s.char() {
                        s.next();
                        tz_min = s.read_digits().ok_or_else(err)? as i32;
                    } else {
                        tz_min = tz_hour % 100;
                        tz_hour /= 100;
                    }
                    tz_hour = -tz_hour;
                    tz_min = -tz_min;
                    with_tz = true;
                }
                Some('Z') => {
                    s.next();
                    with_tz = true;
                }
                _ => (),
            }
            if s.char().is_some() {
                return Err(err());
            }
        }
        let mut ts = Timestamp::new(
            if minus { -(year as i32) } else { year as i32 },
            month as u32,
            day as u32,
            hour as u32,
            min as u32,
            sec as u32,
            nsec as u32,
        )
        .map_err(|_| err())?;
        ts.precision = precision as u8;
        if with_tz {
            ts = ts.and_tz_hm_offset(tz_hour, tz_min).map_err(|_| err())?;
        }
        Ok(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_string() {
        let mut ts = Timestamp::new(2012, 3, 4, 5, 6, 7, 890123456).unwrap();
        ts = ts.and_tz_hm_offset(8, 45).unwrap();
        assert_eq!(ts.to_string(), "2012-03-04 05:06:07.890123456 +08:45");
        ts = ts.and_prec(3).unwrap();
        assert_eq!(ts.to_string(), "2012-03-04 05:06:07.890 +08:45");
        ts = ts.and_prec(0).unwrap();
        assert_eq!(ts.to_string(), "2012-03-04 05:06:07 +08:45");
        ts = ts.and_tz_hm_offset(-8, -45).unwrap();
        assert_eq!(ts.to_string(), "2012-03-04 05:06:07 -08:45");
    }

    #[test]
    fn from_str_variants() {
        let ts: Timestamp = "2012-03-04 05:06:07.890123456 +08:45".parse().unwrap();
        assert_eq!(ts, Timestamp::new(2012, 3, 4, 5, 6, 7, 890123456)
            .unwrap()
            .and_tz_hm_offset(8, 45)
            .unwrap());
        assert_eq!(ts.precision(), 9);

        let ts: Timestamp = "2012-03-04 05:06:07".parse().unwrap();
        assert_eq!(ts, Timestamp::new(2012, 3, 4, 5, 6, 7, 0).unwrap());
        assert!(!ts.with_tz());

        let ts: Timestamp = "20120304".parse().unwrap();
        assert_eq!(ts, Timestamp::new(2012, 3, 4, 0, 0, 0, 0).unwrap());

        let ts: Timestamp = "2012-03-04 05:06:07.5 -08:00".parse().unwrap();
        assert_eq!(ts.nanosecond(), 500_000_000);
        assert_eq!(ts.precision(), 1);
        assert_eq!(ts.tz_hour_offset(), -8);
    }

    #[test]
    fn format_parse_round_trip() {
        for s in [
            "2017-08-09 11:22:33.500",
            "2017-08-09 11:22:33.500000000 -08:00",
            "0001-01-01 00:00:00",
        ] {
            let ts: Timestamp = s.parse().unwrap();
            assert_eq!(ts.to_string(), s);
        }
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(Timestamp::new(2012, 13, 4, 0, 0, 0, 0).is_err());
        assert!(Timestamp::new(2012, 0, 4, 0, 0, 0, 0).is_err());
        assert!(Timestamp::new(2012, 1, 1, 24, 0, 0, 0).is_err());
        assert!("not a timestamp".parse::<Timestamp>().is_err());
    }
}
