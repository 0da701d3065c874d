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

/// Oracle-specific INTERVAL DAY TO SECOND data type
///
/// # Examples
///
/// ```
/// # use ocilib::Error;
/// # use ocilib::sql_type::IntervalDS;
/// let iv = IntervalDS::new(1, 2, 3, 4, 500_000_000)?;
/// assert_eq!(iv.to_string(), "+000000001 02:03:04.500000000");
///
/// let iv: IntervalDS = "+1 02:03:04.5".parse()?;
/// assert_eq!(iv.days(), 1);
/// assert_eq!(iv.nanoseconds(), 500_000_000);
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IntervalDS {
    pub(crate) days: i32,
    pub(crate) hours: i32,
    pub(crate) minutes: i32,
    pub(crate) seconds: i32,
    pub(crate) nanoseconds: i32,
    pub(crate) lfprec: u8,
    pub(crate) fsprec: u8,
}

impl IntervalDS {
    fn check(days: i32, hours: i32, minutes: i32, seconds: i32, nanoseconds: i32) -> crate::Result<()> {
        if days.abs() > 999_999_999 {
            return Err(crate::Error::out_of_range(format!("days out of range: {}", days)));
        }
        if hours.abs() > 23 {
            return Err(crate::Error::out_of_range(format!("hours out of range: {}", hours)));
        }
        if minutes.abs() > 59 {
            return Err(crate::Error::out_of_range(format!(
                "minutes out of range: {}",
                minutes
            )));
        }
        if seconds.abs() > 59 {
            return Err(crate::Error::out_of_range(format!(
                "seconds out of range: {}",
                seconds
            )));
        }
        if nanoseconds.abs() > 999_999_999 {
            return Err(crate::Error::out_of_range(format!(
                "nanoseconds out of range: {}",
                nanoseconds
            )));
        }
        // all components must share one sign
        let signs = [days, hours, minutes, seconds, nanoseconds];
        let has_pos = signs.iter().any(|&v| v > 0);
        let has_neg = signs.iter().any(|&v| v < 0);
        if has_pos && has_neg {
            return Err(crate::Error::out_of_range("mixed interval component signs"));
        }
        Ok(())
    }

    /// Creates a new interval with a nine-digit day precision and nine-digit
    /// fractional-second precision.
    pub fn new(days: i32, hours: i32, minutes: i32, seconds: i32, nanoseconds: i32) -> crate::Result<IntervalDS> {
        IntervalDS::check(days, hours, minutes, seconds, nanoseconds)?;
        Ok(IntervalDS {
            days,
            hours,
            minutes,
            seconds,
            nanoseconds,
            lfprec: 9,
            fsprec: 9,
        })
    }

    /// Returns an interval with the given leading-field precision.
    pub fn and_lfprec(&self, lfprec: u8) -> crate::Result<IntervalDS> {
        if lfprec > 9 {
            return Err(crate::Error::out_of_range(format!(
                "leading precision out of range: {}",
                lfprec
            )));
        }
        Ok(IntervalDS { lfprec, ..*self })
    }

    /// Returns an interval with the given fractional-second precision.
    pub fn and_fsprec(&self, fsprec: u8) -> crate::Result<IntervalDS> {
        if fsprec > 9 {
            return Err(crate::Error::out_of_range(format!(
                "fractional precision out of range: {}",
                fsprec
            )));
        }
        Ok(IntervalDS { fsprec, ..*self })
    }

    pub fn days(&self) -> i32 {
        self.days
    }

    pub fn hours(&self) -> i32 {
        self.hours
    }

    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    pub fn seconds(&self) -> i32 {
        self.seconds
    }

    pub fn nanoseconds(&self) -> i32 {
        self.nanoseconds
    }

    pub fn lfprec(&self) -> u8 {
        self.lfprec
    }

    pub fn fsprec(&self) -> u8 {
        self.fsprec
    }
}

impl PartialEq for IntervalDS {
    fn eq(&self, other: &Self) -> bool {
        self.days == other.days
            && self.hours == other.hours
            && self.minutes == other.minutes
            && self.seconds == other.seconds
            && self.nanoseconds == other.nanoseconds
    }
}

impl PartialOrd for IntervalDS {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let lhs = (
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
            self.nanoseconds,
        );
        let rhs = (
            other.days,
            other.hours,
            other.minutes,
            other.seconds,
            other.nanoseconds,
        );
        Some(lhs.cmp(&rhs))
    }
}

impl fmt::Display for IntervalDS {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let negative = self.days < 0
            || self.hours < 0
            || self.minutes < 0
            || self.seconds < 0
            || self.nanoseconds < 0;
        let sign = if negative { '-' } else { '+' };
        write!(
            f,
            "{}{:0width$} {:02}:{:02}:{:02}",
            sign,
            self.days.abs(),
            self.hours.abs(),
            self.minutes.abs(),
            self.seconds.abs(),
            width = self.lfprec as usize
        )?;
        if self.fsprec > 0 {
            let mut frac = self.nanoseconds.abs();
            for _ in self.fsprec..9 {
                frac /= 10;
            }
            write!(f, ".{:0width$}", frac, width = self.fsprec as usize)?;
        }
        Ok(())
    }
}

impl FromStr for IntervalDS {
    type Err = ParseOracleTypeError;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        let err = || ParseOracleTypeError::new("IntervalDS");
        let mut s = Scanner::new(s);
        let negative = match s.char() {
            Some('-') => {
                s.next();
                true
            }
            Some('+') => {
                s.next();
                false
            }
            _ => false,
        };
        let days = s.read_digits().ok_or_else(err)? as i32;
        let lfprec = s.ndigits() as u8;
        if s.char() != Some(' ') {
            return Err(err());
        }
        s.next();
        let hours = s.read_digits().ok_or_else(err)? as i32;
        if s.char() != Some(':') {
            return Err(err());
        }
        s.next();
        let minutes = s.read_digits().ok_or_else(err)? as i32;
        if s.char() != Some(':') {
            return Err(err());
        }
        s.next();
        let seconds = s.read_digits().ok_or_else(err)? as i32;
        let mut nanos: i64 = 0;
        let mut fsprec = 0;
        if let Some('.') = s.char() {
            s.next();
            nanos = s.read_digits().ok_or_else(err)? as i64;
            let ndigit = s.ndigits();
            fsprec = ndigit.min(9) as u8;
            if ndigit < 9 {
                nanos *= 10i64.pow(9 - ndigit);
            } else if ndigit > 9 {
                nanos /= 10i64.pow(ndigit - 9);
            }
        }
        if s.char().is_some() {
            return Err(err());
        }
        let sign = if negative { -1 } else { 1 };
        let mut iv = IntervalDS::new(
            sign * days,
            sign * hours,
            sign * minutes,
            sign * seconds,
            sign * nanos as i32,
        )
        .map_err(|_| err())?;
        iv.lfprec = lfprec;
        iv.fsprec = fsprec;
        Ok(iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_string() {
        let iv = IntervalDS::new(1, 2, 3, 4, 123_000_000).unwrap();
        assert_eq!(iv.to_string(), "+000000001 02:03:04.123000000");
        let iv = iv.and_lfprec(2).unwrap().and_fsprec(3).unwrap();
        assert_eq!(iv.to_string(), "+01 02:03:04.123");
        let iv = IntervalDS::new(-1, -2, -3, -4, 0).unwrap().and_lfprec(1).unwrap().and_fsprec(0).unwrap();
        assert_eq!(iv.to_string(), "-1 02:03:04");
    }

    #[test]
    fn parse_round_trip() {
        let iv: IntervalDS = "+01 02:03:04.123".parse().unwrap();
        assert_eq!(iv.to_string(), "+01 02:03:04.123");
        let iv: IntervalDS = "-1 02:03:04".parse().unwrap();
        assert_eq!(iv.days(), -1);
        assert_eq!(iv.hours(), -2);
    }

    #[test]
    fn mixed_signs_rejected() {
        assert!(IntervalDS::new(1, -2, 0, 0, 0).is_err());
    }
}
