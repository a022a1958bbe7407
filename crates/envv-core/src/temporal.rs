//! # Temporal Recognition — ISO-8601 Dates in Env Values
//!
//! Decides whether a raw env value is an ISO-8601 date or date-time that
//! names a real calendar instant. Shape alone is not enough: `2025-02-30`
//! has the right shape and is rejected, because chrono refuses to build
//! the date.
//!
//! The grammar matches what JavaScript's `parseISO` accepts, so a schema
//! that passed under a Node toolchain keeps passing here.
//!
//! ## Accepted Shapes
//!
//! Year (required): four digits, a sign and six digits (`+002025`), or a
//! bare century (`20`, `+0020`) meaning the first year of that century.
//!
//! Date part, after the year and an optional `-`:
//!
//! | Form | Example |
//! |------|---------|
//! | nothing | `2025`, `2025-` |
//! | month | `2025-07`, `202507` |
//! | calendar date | `2025-07-14`, `20250714`, `2025-0714` |
//! | ordinal date | `2025-195`, `2025195` |
//! | week date | `2025-W29`, `2025-W29-1`, `2025W291` |
//!
//! Week 53 is accepted for every year and rolls into the next year when
//! the year has only 52 weeks.
//!
//! Time part (optional, after `T` or a single space): one to three
//! two-digit units (`HH`, `HH:MM`, `HH:MM:SS`, colons optional). Any unit
//! may carry a `.`/`,` fraction. `24:00` and fractional hours past 24
//! roll the date forward. An empty time part is ignored.
//!
//! Zone (optional): `Z`, `±HH`, `±HHMM`, `±HH:MM`. Offset minutes must be
//! below 60; offset hours are not range-checked. Zone text that fits none
//! of these forms reads as UTC. A `Z` directly after the date
//! (`2025-01-01Z`) starts the zone.
//!
//! Years outside chrono's `NaiveDate` range are rejected.

use chrono::{Datelike, Days, NaiveDate, NaiveTime};

const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_DAY: u64 = 86_400 * NANOS_PER_SEC;

/// Components of a recognized ISO-8601 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoDateTime {
    /// Calendar date, rolled forward when the time ran past midnight.
    pub date: NaiveDate,
    /// Wall-clock time, when the value had a time part.
    pub time: Option<NaiveTime>,
    /// UTC offset in seconds east, when the value had a zone designator.
    pub offset_secs: Option<i32>,
}

/// Returns true if `input` is a valid ISO-8601 date or date-time.
pub fn is_iso8601(input: &str) -> bool {
    parse_iso8601(input).is_some()
}

/// Parse an ISO-8601 date or date-time.
///
/// Returns `None` for anything that is malformed or does not name a real
/// calendar date and time of day.
pub fn parse_iso8601(input: &str) -> Option<IsoDateTime> {
    let mut parts = input.split(|c: char| c == 'T' || c == ' ');
    let head = parts.next()?;
    let tail = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return None;
    }
    // A clock in the first part means there is no date.
    if head.contains(':') {
        return None;
    }

    let (date_str, rest) = match head.find(|c: char| c == 'Z' || c == 'z') {
        Some(pos) => (&input[..pos], &input[pos..]),
        None => (head, tail),
    };

    let (year, date_rest) = split_year(date_str)?;
    let mut date = parse_date(date_rest, year)?;

    let (clock, zone) = split_zone(rest);

    let time = if clock.is_empty() {
        None
    } else {
        let nanos = parse_time(clock)?;
        date = date.checked_add_days(Days::new(nanos / NANOS_PER_DAY))?;
        let in_day = nanos % NANOS_PER_DAY;
        Some(NaiveTime::from_num_seconds_from_midnight_opt(
            (in_day / NANOS_PER_SEC) as u32,
            (in_day % NANOS_PER_SEC) as u32,
        )?)
    };

    let offset_secs = match zone {
        Some(z) => Some(parse_offset(z)?),
        None => None,
    };

    Some(IsoDateTime {
        date,
        time,
        offset_secs,
    })
}

/// Split off the year: four digits or a sign and six digits as a prefix,
/// or the whole string as a two-digit (or signed four-digit) century.
fn split_year(s: &str) -> Option<(i32, &str)> {
    if let Some(year) = s.get(..4).and_then(digits) {
        return Some((year as i32, &s[4..]));
    }

    let sign = match *s.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ if s.len() == 2 => return Some((digits(s)? as i32 * 100, "")),
        _ => return None,
    };
    if let Some(year) = s.get(1..7).and_then(digits) {
        return Some((sign * year as i32, &s[7..]));
    }
    if s.len() == 5 {
        return Some((sign * digits(&s[1..])? as i32 * 100, ""));
    }
    None
}

/// Parse what follows the year: nothing, a month, a month and day, an
/// ordinal day, or a week designator, after an optional `-`.
fn parse_date(rest: &str, year: i32) -> Option<NaiveDate> {
    let rest = rest.strip_prefix('-').unwrap_or(rest);

    if rest.is_empty() {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    if let Some(week) = rest.strip_prefix('W') {
        let ww = digits(week.get(..2)?)?;
        let weekday = match week.get(2..)? {
            "" => 0,
            tail => {
                let d = tail.strip_prefix('-').unwrap_or(tail);
                if d.len() != 1 {
                    return None;
                }
                digits(d)?.checked_sub(1)?
            }
        };
        if !(1..=53).contains(&ww) || weekday > 6 {
            return None;
        }
        let offset = u64::from((ww - 1) * 7 + weekday);
        return iso_week_start(year)?.checked_add_days(Days::new(offset));
    }

    match rest.len() {
        // DDD
        3 => NaiveDate::from_yo_opt(year, digits(rest)?),
        // MM
        2 => NaiveDate::from_ymd_opt(year, digits(rest)?, 1),
        // MMDD
        4 => NaiveDate::from_ymd_opt(year, digits(rest.get(..2)?)?, digits(rest.get(2..)?)?),
        // MM-DD
        5 if rest.as_bytes()[2] == b'-' => {
            NaiveDate::from_ymd_opt(year, digits(rest.get(..2)?)?, digits(rest.get(3..)?)?)
        }
        _ => None,
    }
}

/// Monday of ISO week 1, the week holding January 4th.
fn iso_week_start(year: i32) -> Option<NaiveDate> {
    let jan4 = NaiveDate::from_ymd_opt(year, 1, 4)?;
    jan4.checked_sub_days(Days::new(u64::from(jan4.weekday().num_days_from_monday())))
}

/// Split at the first zone designator character.
fn split_zone(t: &str) -> (&str, Option<&str>) {
    match t.find(|c: char| c == 'Z' || c == '+' || c == '-') {
        Some(pos) => (&t[..pos], Some(&t[pos..])),
        None => (t, None),
    }
}

/// Offset in seconds east. `None` only when the minutes reach 60.
fn parse_offset(zone: &str) -> Option<i32> {
    if zone == "Z" {
        return Some(0);
    }
    let sign: i32 = match zone.as_bytes().first() {
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => return Some(0),
    };
    let body = &zone[1..];
    let (hh, mm) = match body.len() {
        2 => (digits(body), Some(0)),
        4 => (body.get(..2).and_then(digits), body.get(2..).and_then(digits)),
        5 if body.as_bytes()[2] == b':' => {
            (body.get(..2).and_then(digits), body.get(3..).and_then(digits))
        }
        _ => (None, None),
    };
    let (Some(hh), Some(mm)) = (hh, mm) else {
        return Some(0);
    };
    if mm > 59 {
        return None;
    }
    Some(sign * (hh * 3600 + mm * 60) as i32)
}

/// Parse the clock part into nanoseconds since midnight. The result may
/// exceed one day (`24:00`, `24.5`).
fn parse_time(clock: &str) -> Option<u64> {
    let units = match_units(clock, 0)?;
    let unit = |i: usize| units.get(i).copied().unwrap_or((0, 0));
    let (hh, hh_frac) = unit(0);
    let (mm, mm_frac) = unit(1);
    let (ss, ss_frac) = unit(2);

    if hh == 24 && hh_frac == 0 {
        if mm != 0 || mm_frac != 0 || ss != 0 || ss_frac != 0 {
            return None;
        }
    } else if hh > 24 || mm > 59 || ss > 59 {
        return None;
    }

    let total: u64 = [(hh, hh_frac, 3600), (mm, mm_frac, 60), (ss, ss_frac, 1)]
        .iter()
        .map(|&(whole, frac, secs)| u64::from(whole) * secs * NANOS_PER_SEC + frac * secs)
        .sum();
    Some(total)
}

/// Match up to three `NN[.fraction]` units, each after an optional `:`.
/// Each unit is `(whole, fraction in nanoseconds of one unit)`.
///
/// Fraction digits are taken greedily and given back when the rest of
/// the clock would not otherwise match, so `10.12.5` reads as `10.` then
/// `12.5`.
fn match_units(rest: &str, depth: usize) -> Option<Vec<(u32, u64)>> {
    if depth > 0 && rest.is_empty() {
        return Some(Vec::new());
    }
    if depth == 3 {
        return None;
    }
    let rest = if depth > 0 {
        rest.strip_prefix(':').unwrap_or(rest)
    } else {
        rest
    };
    let whole = digits(rest.get(..2)?)?;
    let rest = &rest[2..];

    let Some(after) = rest.strip_prefix(|c: char| c == '.' || c == ',') else {
        let mut units = match_units(rest, depth + 1)?;
        units.insert(0, (whole, 0));
        return Some(units);
    };
    let run = after.bytes().take_while(u8::is_ascii_digit).count();
    (0..=run).rev().find_map(|len| {
        let mut units = match_units(&after[len..], depth + 1)?;
        units.insert(0, (whole, fraction_nanos(&after[..len])));
        Some(units)
    })
}

/// Fraction digits as nanoseconds of one unit. Digits past the ninth are
/// dropped.
fn fraction_nanos(f: &str) -> u64 {
    f.bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
}

/// Parse a non-empty run of ASCII digits.
fn digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
