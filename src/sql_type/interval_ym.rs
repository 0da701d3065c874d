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

/// Oracle-specific INTERVAL YEAR TO MONTH data type
///
/// # Examples
///
/// ```
/// # use ocilib::Error;
/// # use ocilib::sql_type::IntervalYM;
/// let iv = IntervalYM::new(2, 3)?;
/// assert_eq!(iv.to_string(), "+000000002-03");
///
/// let iv: IntervalYM = "-02-03".parse()?;
/// assert_eq!(iv.years(), -2);
/// assert_eq!(iv.months(), -3);
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IntervalYM {
    pub(crate) years: i32,
    pub(crate) months: i32,
    pub(crate) lfprec: u8,
}

impl IntervalYM {
    /// Creates a new interval with a nine-digit year precision.
    pub fn new(years: i32, months: i32) -> crate::Result<IntervalYM> {
        if years.abs() > 999_999_999 {
            return Err(crate::Error::out_of_range(format!(
                "years out of range: {}",
                years
            )));
        }
        if months.abs() > 11 {
            return Err(crate::Error::out_of_range(format!(
                "months out of range: {}",
                months
            )));
        }
        if (years > 0 && months < 0) || (years < 0 && months > 0) {
            return Err(crate::Error::out_of_range("mixed interval component signs"));
        }
        Ok(IntervalYM {
            years,
            months,
            lfprec: 9,
        })
    }

    /// Returns an interval with the given leading-field precision.
    pub fn and_lfprec(&self, lfprec: u8) -> crate::Result<IntervalYM> {
        if lfprec > 9 {
            return Err(crate::Error::out_of_range(format!(
                "leading precision out of range: {}",
                lfprec
            )));
        }
        Ok(IntervalYM { lfprec, ..*self })
    }

    pub fn years(&self) -> i32 {
        self.years
    }

    pub fn months(&self) -> i32 {
        self.months
    }

    pub fn lfprec(&self) -> u8 {
        self.lfprec
    }
}

impl PartialEq for IntervalYM {
    fn eq(&self, other: &Self) -> bool {
        self.years == other.years && self.months == other.months
    }
}

impl PartialOrd for IntervalYM {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some((self.years, self.months).cmp(&(other.years, other.months)))
    }
}

impl fmt::Display for IntervalYM {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.years < 0 || self.months < 0 {
            '-'
        } else {
            '+'
        };
        write!(
            f,
            "{}{:0width$}-{:02}",
            sign,
            self.years.abs(),
            self.months.abs(),
            width = self.lfprec as usize
        )
    }
}

impl FromStr for IntervalYM {
    type Err = ParseOracleTypeError;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        let err = || ParseOracleTypeError::new("IntervalYM");
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
        let years = s.read_digits().ok_or_else(err)? as i32;
        let lfprec = s.ndigits() as u8;
        if s.char() != Some('-') {
            return Err(err());
        }
        s.next();
        let months = s.read_digits().ok_or_else(err)? as i32;
        if s.char().is_some() {
            return Err(err());
        }
        let sign = if negative { -1 } else { 1 };
        let mut iv = IntervalYM::new(sign * years, sign * months).map_err(|_| err())?;
        iv.lfprec = lfprec;
        Ok(iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_string() {
        let iv = IntervalYM::new(2, 3).unwrap();
        assert_eq!(iv.to_string(), "+000000002-03");
        let iv = iv.and_lfprec(2).unwrap();
        assert_eq!(iv.to_string(), "+02-03");
    }

    #[test]
    fn parse_round_trip() {
        let iv: IntervalYM = "+02-03".parse().unwrap();
        assert_eq!(iv.to_string(), "+02-03");
        let iv: IntervalYM = "-02-03".parse().unwrap();
        assert_eq!((iv.years(), iv.months()), (-2, -3));
    }

    #[test]
    fn mixed_signs_rejected() {
        assert!(IntervalYM::new(1, -1).is_err());
    }
}
