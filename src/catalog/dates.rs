//! `modified` date parsing as an ordered chain of stages.
//!
//! Each stage either yields a calendar date or declines; the chain stops at the
//! first stage that matches. New formats are added by appending to [`DATE_CHAIN`].

use chrono::{NaiveDate, NaiveTime};
use tracing::trace;

pub type DateParser = fn(&str) -> Option<NaiveDate>;

/// Parser stages in the order they are attempted.
pub const DATE_CHAIN: &[(&str, DateParser)] = &[
    ("iso8601", parse_iso8601),
    ("plain_date", parse_plain_date),
];

/// Run the chain against a raw `modified` value.
pub fn parse_modified(raw: &str) -> Option<NaiveDate> {
    DATE_CHAIN.iter().find_map(|(stage, parse)| {
        let parsed = parse(raw);
        trace!(stage = *stage, raw, matched = parsed.is_some(), "modified date attempt");
        parsed
    })
}

/// ISO-8601 calendar date in extended (`YYYY-MM-DD`) or basic (`YYYYMMDD`)
/// form, optionally followed by a `T`- or space-separated time of day and a
/// `Z` or `±HH[[:]MM[[:]SS]]` offset.
///
/// Date-times with an offset resolve to the calendar date as written, not the
/// date after conversion to UTC.
pub fn parse_iso8601(raw: &str) -> Option<NaiveDate> {
    let (date, rest) = split_iso_date(raw)?;
    if rest.is_empty() {
        return Some(date);
    }
    let time = rest.strip_prefix(|c: char| c == 'T' || c == ' ')?;
    is_valid_time(time).then_some(date)
}

/// `%Y-%m-%d` as `strptime` reads it: a four-digit year, then month and day
/// that may be unpadded. Signs and whitespace are rejected.
pub fn parse_plain_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() >= 8
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes.iter().all(|b| b.is_ascii_digit() || *b == b'-');
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn split_iso_date(raw: &str) -> Option<(NaiveDate, &str)> {
    let bytes = raw.as_bytes();
    let extended = bytes.len() >= 10 && bytes[4] == b'-' && bytes[7] == b'-';
    let (year, month, day, width) = if extended {
        (&bytes[0..4], &bytes[5..7], &bytes[8..10], 10)
    } else if bytes.len() >= 8 {
        (&bytes[0..4], &bytes[4..6], &bytes[6..8], 8)
    } else {
        return None;
    };

    let date = NaiveDate::from_ymd_opt(
        i32::try_from(digits(year)?).ok()?,
        digits(month)?,
        digits(day)?,
    )?;
    Some((date, raw.get(width..)?))
}

fn is_valid_time(time: &str) -> bool {
    if let Some(clock) = time.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        return is_valid_clock(clock);
    }
    match time.find(|c: char| c == '+' || c == '-') {
        Some(idx) => {
            is_valid_clock(&time[..idx])
                && two_digit_groups(&time[idx + 1..]).is_some_and(|groups| is_valid_hms(&groups))
        }
        None => is_valid_clock(time),
    }
}

/// `HH`, `HH:MM`, `HH:MM:SS[.f]` or the basic `HHMM`, `HHMMSS[.f]`.
fn is_valid_clock(clock: &str) -> bool {
    let (whole, fraction) = match clock.find(|c: char| c == '.' || c == ',') {
        Some(idx) => (&clock[..idx], Some(&clock[idx + 1..])),
        None => (clock, None),
    };
    let Some(groups) = two_digit_groups(whole) else {
        return false;
    };
    if let Some(fraction) = fraction {
        if groups.len() != 3 || fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return false;
        }
    }
    is_valid_hms(&groups)
}

/// One to three two-digit groups, either all colon-separated or all packed.
fn two_digit_groups(text: &str) -> Option<Vec<u32>> {
    let groups: Vec<&[u8]> = if text.contains(':') {
        text.split(':').map(str::as_bytes).collect()
    } else {
        if text.len() % 2 != 0 {
            return None;
        }
        text.as_bytes().chunks(2).collect()
    };
    if groups.is_empty() || groups.len() > 3 {
        return None;
    }
    groups
        .into_iter()
        .map(|group| if group.len() == 2 { digits(group) } else { None })
        .collect()
}

fn is_valid_hms(groups: &[u32]) -> bool {
    let part = |idx: usize| groups.get(idx).copied().unwrap_or(0);
    NaiveTime::from_hms_opt(part(0), part(1), part(2)).is_some()
}

fn digits(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    bytes
        .iter()
        .try_fold(0u32, |acc, b| acc.checked_mul(10)?.checked_add(u32::from(b - b'0')))
}
