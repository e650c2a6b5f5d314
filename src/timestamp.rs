use core::fmt::Display;
use core::num::ParseIntError;
use core::ops::Add;
use core::str::FromStr;
use core::time::Duration;

use chrono::{offset::Utc, DateTime, LocalResult, TimeZone};
use flex_error::{define_error, TraceError};
use serde_derive::{Deserialize, Serialize};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// A packet timeout timestamp or a block time, in Unix nanoseconds on the wire.
///
/// The wire value 0 means "no timestamp" and maps to `time: None`.
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Default, Deserialize, Serialize, Hash,
)]
pub struct Timestamp {
    time: Option<DateTime<Utc>>,
}

/// Outcome of comparing a chain timestamp with a packet deadline.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Deserialize, Serialize, Hash)]
pub enum Expiry {
    /// The chain time is at or past the deadline.
    Expired,
    NotExpired,
    /// One of the two sides is unset.
    InvalidTimestamp,
}

impl Timestamp {
    pub fn from_nanoseconds(nanoseconds: u64) -> Result<Timestamp, ParseTimestampError> {
        if nanoseconds == 0 {
            return Ok(Timestamp::none());
        }

        // u64::MAX / NANOS_PER_SEC always fits in i64.
        let secs = i64::try_from(nanoseconds / NANOS_PER_SEC).unwrap_or(i64::MAX);
        let nanos = (nanoseconds % NANOS_PER_SEC) as u32;

        match Utc.timestamp_opt(secs, nanos) {
            LocalResult::Single(time) => Ok(Timestamp { time: Some(time) }),
            LocalResult::None | LocalResult::Ambiguous(..) => Err(
                ParseTimestampError::invalid_timestamp_conversion(secs, nanos),
            ),
        }
    }

    pub fn none() -> Self {
        Timestamp { time: None }
    }

    pub fn is_set(&self) -> bool {
        self.time.is_some()
    }

    /// Unix nanoseconds, 0 when unset.
    /// ```
    /// use ibc_channel::timestamp::Timestamp;
    /// let ts = Timestamp::from_nanoseconds(u64::MAX).unwrap();
    /// assert_eq!(ts.nanoseconds(), u64::MAX);
    /// assert_eq!(Timestamp::none().nanoseconds(), 0);
    /// ```
    pub fn nanoseconds(&self) -> u64 {
        self.time.map_or(0, |time| {
            u64::try_from(time.timestamp())
                .unwrap_or_default()
                .saturating_mul(NANOS_PER_SEC)
                .saturating_add(u64::from(time.timestamp_subsec_nanos()))
        })
    }

    /// Whether this chain time has reached `deadline`.
    pub fn check_expiry(&self, deadline: &Timestamp) -> Expiry {
        match (self.time, deadline.time) {
            (Some(now), Some(deadline)) if now >= deadline => Expiry::Expired,
            (Some(_), Some(_)) => Expiry::NotExpired,
            _ => Expiry::InvalidTimestamp,
        }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.time {
            Some(time) => write!(f, "Timestamp({})", time.to_rfc3339()),
            None => write!(f, "Timestamp(NoTimestamp)"),
        }
    }
}

define_error! {
    TimestampOverflowError {
        TimestampOverflow
            |_| { "Timestamp overflow when modifying with duration" }
    }
}

impl Add<Duration> for Timestamp {
    type Output = Result<Timestamp, TimestampOverflowError>;

    /// An unset timestamp stays unset.
    fn add(self, duration: Duration) -> Self::Output {
        let time = match self.time {
            Some(time) => time,
            None => return Ok(self),
        };
        let duration = chrono::Duration::from_std(duration)
            .map_err(|_| TimestampOverflowError::timestamp_overflow())?;
        time.checked_add_signed(duration)
            .map(|time| Timestamp { time: Some(time) })
            .ok_or_else(TimestampOverflowError::timestamp_overflow)
    }
}

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    ParseTimestampError {
        ParseInt
            [ TraceError<ParseIntError> ]
            | _ | { "error parsing u64 integer from string"},

        InvalidTimestampConversion
            {
                secs: i64,
                nanos: u32,
            }
            | e | {
                format_args!("no UTC instant at {}s + {}ns", e.secs, e.nanos)
            },
    }
}

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let nanoseconds = u64::from_str(s).map_err(ParseTimestampError::parse_int)?;
        Timestamp::from_nanoseconds(nanoseconds)
    }
}
