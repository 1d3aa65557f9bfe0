//! HTML fragments for each page region.
//!
//! Every function returns a fragment meant to replace a region's content
//! wholesale. Fragments come from embedded tera templates with autoescape
//! on; numbers go through [`fmt`].

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Serialize;
use std::fmt::Display;
use tera::Context;

use crate::{
    api::{record_page_path, search_page_path},
    model::{CurrentConditions, DailySeries, EntryId, RecordDetail, RecordEntry, SearchEntry},
};

mod templates;

pub use templates::TemplateError;

/// Forecast cards shown after a search.
pub const FORECAST_DAYS: usize = 5;

/// Anything that can be shown as a fixed-point number.
///
/// Strings convert the way a browser's `Number()` does: surrounding
/// whitespace is ignored and an empty string is zero.
pub trait ToNumber {
    fn to_number(&self) -> Option<f64>;
}

macro_rules! impl_to_number {
    ($($t:ty),*) => {
        $(impl ToNumber for $t {
            fn to_number(&self) -> Option<f64> {
                Some(*self as f64)
            }
        })*
    };
}

impl_to_number!(f64, f32, i32, i64, u8, u16, u32, u64);

impl ToNumber for str {
    fn to_number(&self) -> Option<f64> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return Some(0.0);
        }
        // Rust also accepts "inf"/"nan" spellings; those are not numbers here.
        if !trimmed.bytes().all(|b| b.is_ascii_digit() || b"+-.eE".contains(&b)) {
            return None;
        }
        trimmed.parse().ok()
    }
}

impl ToNumber for String {
    fn to_number(&self) -> Option<f64> {
        self.as_str().to_number()
    }
}

impl ToNumber for bool {
    fn to_number(&self) -> Option<f64> {
        Some(if *self { 1.0 } else { 0.0 })
    }
}

impl<T: ToNumber> ToNumber for Option<T> {
    fn to_number(&self) -> Option<f64> {
        self.as_ref().and_then(ToNumber::to_number)
    }
}

impl ToNumber for serde_json::Value {
    fn to_number(&self) -> Option<f64> {
        match self {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.to_number(),
            serde_json::Value::Bool(b) => b.to_number(),
            _ => None,
        }
    }
}

impl<T: ToNumber + ?Sized> ToNumber for &T {
    fn to_number(&self) -> Option<f64> {
        (**self).to_number()
    }
}

/// One decimal place; empty for anything that is not a finite number.
pub fn fmt<N: ToNumber>(value: N) -> String {
    fmt_with(value, 1)
}

/// Fixed-point rendering with ties rounded away from zero, like
/// `Number.prototype.toFixed`.
pub fn fmt_with<N: ToNumber>(value: N, digits: usize) -> String {
    match value.to_number() {
        Some(n) if n.is_finite() => to_fixed(n, digits.min(100)),
        _ => String::new(),
    }
}

/// Longest fractional expansion an `f64` can have.
const EXACT_DIGITS: usize = 1074;

fn to_fixed(n: f64, digits: usize) -> String {
    let exact = format!("{:.*}", EXACT_DIGITS, n.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part.bytes().chain(frac_part.bytes().take(digits)).collect();
    if frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        increment(&mut kept);
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if n < 0.0 {
        out.push('-');
    }
    out.extend(kept[..split].iter().map(|&b| char::from(b)));
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|&b| char::from(b)));
    }
    out
}

/// Add one to the last place of an ASCII digit string.
fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// `HH:MM` out of an ISO-8601 timestamp (characters 11..16).
pub fn clock(iso: &str) -> String {
    iso.chars().skip(11).take(5).collect()
}

/// Local 24-hour rendering of a server timestamp; unparseable input is
/// returned as is.
pub fn human_time(iso: &str) -> String {
    human_time_in(iso, &Local)
}

pub fn human_time_in<Tz>(iso: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return dt.with_timezone(tz).format(FORMAT).to_string();
    }
    // Naive timestamps are already wall-clock time.
    match NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => naive.format(FORMAT).to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Render a whole page document; `view` fields are spliced in by name.
pub(crate) fn page<V: Serialize>(view: &V) -> Result<String, TemplateError> {
    templates::render(templates::PAGE, &Context::from_serialize(view)?)
}

fn render_list<T: Serialize>(
    template: &str,
    key: &str,
    items: &[T],
) -> Result<String, TemplateError> {
    let mut context = Context::new();
    context.insert(key, items);
    templates::render(template, &context)
}

pub fn no_data() -> Result<String, TemplateError> {
    templates::render(templates::NO_DATA, &Context::new())
}

#[derive(Serialize)]
struct Stat {
    label: &'static str,
    value: String,
    large: bool,
}

pub fn current(c: &CurrentConditions) -> Result<String, TemplateError> {
    let humidity = c.humidity.map_or_else(|| "-".to_string(), |h| h.to_string());
    let time = c.time.as_deref().map(clock).unwrap_or_default();

    let stats = [
        Stat { label: "Temp", value: format!("{}°C", fmt(c.temperature)), large: true },
        Stat { label: "Wind", value: format!("{} km/h", fmt(c.windspeed)), large: false },
        Stat { label: "Humidity", value: format!("{humidity}%"), large: false },
        Stat { label: "Time", value: time, large: false },
    ];
    render_list(templates::CURRENT, "stats", &stats)
}

#[derive(Serialize)]
struct DayCard {
    label: String,
    max: String,
    min: String,
    wind: String,
}

/// Up to [`FORECAST_DAYS`] cards, dated without the year. Empty when the
/// response carries no daily series.
pub fn forecast(daily: Option<&DailySeries>) -> Result<String, TemplateError> {
    let Some(daily) = daily else {
        return Ok(String::new());
    };

    let days: Vec<DayCard> = daily
        .rows()
        .take(FORECAST_DAYS)
        .map(|row| DayCard {
            label: row.date.chars().skip(5).collect(),
            max: fmt(row.max_temperature),
            min: fmt(row.min_temperature),
            wind: fmt(row.max_windspeed),
        })
        .collect();
    render_list(templates::DAY_CARDS, "days", &days)
}

pub fn search_error(message: &str) -> Result<String, TemplateError> {
    let mut context = Context::new();
    context.insert("message", if message.is_empty() { "error" } else { message });
    templates::render(templates::SEARCH_ERROR, &context)
}

#[derive(Serialize)]
struct SearchRow<'a> {
    id: EntryId,
    href: String,
    query: &'a str,
    when: String,
}

pub fn searches(list: &[SearchEntry]) -> Result<String, TemplateError> {
    let rows: Vec<SearchRow<'_>> = list
        .iter()
        .map(|s| SearchRow {
            id: s.id,
            href: search_page_path(s.id),
            query: &s.query,
            when: human_time(&s.searched_at),
        })
        .collect();
    render_list(templates::SEARCHES, "searches", &rows)
}

#[derive(Serialize)]
struct RecordRow<'a> {
    id: EntryId,
    href: String,
    name: &'a str,
    start: &'a str,
    end: &'a str,
}

pub fn records(list: &[RecordEntry]) -> Result<String, TemplateError> {
    let rows: Vec<RecordRow<'_>> = list
        .iter()
        .map(|r| RecordRow {
            id: r.id,
            href: record_page_path(r.id),
            name: r.display_name(),
            start: &r.start_date,
            end: &r.end_date,
        })
        .collect();
    render_list(templates::RECORDS, "records", &rows)
}

pub fn record_range(detail: &RecordDetail) -> Result<String, TemplateError> {
    let mut context = Context::new();
    context.insert("start", &detail.start_date);
    context.insert("end", &detail.end_date);
    templates::render(templates::RECORD_RANGE, &context)
}

/// Every stored day, full date, missing numbers shown as zero.
pub fn record_days(daily: Option<&DailySeries>) -> Result<String, TemplateError> {
    let Some(daily) = daily else {
        return Ok(String::new());
    };

    let zero = |v: Option<f64>| fmt(v.unwrap_or(0.0));
    let days: Vec<DayCard> = daily
        .rows()
        .map(|row| DayCard {
            label: row.date.to_string(),
            max: zero(row.max_temperature),
            min: zero(row.min_temperature),
            wind: zero(row.max_windspeed),
        })
        .collect();
    render_list(templates::DAY_CARDS, "days", &days)
}
