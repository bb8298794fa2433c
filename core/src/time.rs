// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use crate::{Error, Result};
use chrono::NaiveDateTime;
use chrono::Utc;
use std::fmt::Debug;

/// DateTime in UTC, the only time representation used by signers.
pub type DateTime = chrono::DateTime<Utc>;

/// Date format: "20220313"
const DATE: &str = "%Y%m%d";
/// Compact ISO 8601: "20220313T072004Z"
const ISO8601: &str = "%Y%m%dT%H%M%SZ";
/// RFC 1123 as used by HTTP `Date`: "Sun, 13 Mar 2022 07:20:04 GMT"
const RFC1123: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC1123_WITHOUT_WEEKDAY: &str = "%d %b %Y %H:%M:%S GMT";

/// Create a new DateTime from the current wall-clock time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into date: `20220313`
pub fn format_date(t: DateTime) -> String {
    t.format(DATE).to_string()
}

/// Format time into compact ISO 8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format(ISO8601).to_string()
}

/// Format time into RFC 1123 / HTTP date: `Sun, 13 Mar 2022 07:20:04 GMT`
pub fn format_rfc1123(t: DateTime) -> String {
    t.format(RFC1123).to_string()
}

/// Parse compact ISO 8601 (`20220313T072004Z`) into a DateTime.
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    NaiveDateTime::parse_from_str(s, ISO8601)
        .map(|t| t.and_utc())
        .map_err(|e| {
            Error::malformed_request(format!("invalid ISO 8601 timestamp: {s}")).with_source(e)
        })
}

/// Parse an RFC 1123 / HTTP date (`Fri, 09 Sep 2011 23:36:00 GMT`) into a DateTime.
///
/// The leading weekday is optional and not checked against the date: the
/// date fields alone decide the instant.
pub fn parse_rfc1123(s: &str) -> Result<DateTime> {
    let trimmed = s.trim();
    let without_weekday = match trimmed.split_once(", ") {
        Some((weekday, rest)) if weekday.bytes().all(|b| b.is_ascii_alphabetic()) => rest,
        _ => trimmed,
    };

    NaiveDateTime::parse_from_str(without_weekday, RFC1123_WITHOUT_WEEKDAY)
        .map(|t| t.and_utc())
        .map_err(|e| {
            Error::malformed_request(format!("invalid RFC 1123 date: {s}")).with_source(e)
        })
}

/// Clock is the source of the signing time.
///
/// Signers read the clock at most once per signing call. Production code
/// uses [`SystemClock`]; tests pin the time with [`FixedClock`].
pub trait Clock: Debug + Send + Sync + 'static {
    /// Return the current time.
    fn now(&self) -> Result<DateTime>;
}

/// Clock backed by the system wall-clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime> {
        Ok(now())
    }
}

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime);

impl FixedClock {
    /// Create a clock pinned at `time`.
    pub fn new(time: DateTime) -> Self {
        Self(time)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Result<DateTime> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_time() -> DateTime {
        Utc.with_ymd_and_hms(2011, 9, 9, 23, 36, 0).unwrap()
    }

    #[test]
    fn test_format() {
        let t = test_time();
        assert_eq!(format_date(t), "20110909");
        assert_eq!(format_iso8601(t), "20110909T233600Z");
        assert_eq!(format_rfc1123(t), "Fri, 09 Sep 2011 23:36:00 GMT");
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_iso8601("20110909T233600Z").unwrap(), test_time());
        assert_eq!(
            parse_iso8601(&format_iso8601(test_time())).unwrap(),
            test_time()
        );
    }

    #[test]
    fn test_parse_rfc1123() {
        assert_eq!(
            parse_rfc1123("Fri, 09 Sep 2011 23:36:00 GMT").unwrap(),
            test_time()
        );
        assert_eq!(parse_rfc1123(&format_rfc1123(test_time())).unwrap(), test_time());
        // Weekday is not cross-checked.
        assert_eq!(
            parse_rfc1123("Mon, 09 Sep 2011 23:36:00 GMT").unwrap(),
            test_time()
        );
        assert_eq!(parse_rfc1123(" 09 Sep 2011 23:36:00 GMT ").unwrap(), test_time());

        for input in ["20110909T233600Z", "Fri, 09 Sep 2011", "Fri, 32 Sep 2011 23:36:00 GMT"] {
            let err = parse_rfc1123(input).unwrap_err();
            assert_eq!(
                err.kind(),
                crate::ErrorKind::MalformedRequest,
                "Failed on input: {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse_iso8601("2011-09-09").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MalformedRequest);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(test_time());
        assert_eq!(clock.now().unwrap(), test_time());
        assert_eq!(clock.now().unwrap(), test_time());
    }
}
