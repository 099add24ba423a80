//! NDBC realtime feed parsing.
//!
//! `realtime2/{ID}.txt` is whitespace-columnar text, newest row first:
//!
//! ```text
//! #YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
//! 2024 06 15 12 00  70  7.0  9.0   1.5     9   6.4 270 1016.2  25.6  26.1    MM   MM   MM    MM
//! ```
//!
//! Columns are looked up by header name, so reordered or missing columns
//! are tolerated. `MM` marks a missing value. The data row is always the
//! line right after the header: a `#yr mo dy` units line in that position
//! is read as data and yields no values.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Serialize, Serializer};

/// Prefix of the column header line.
const HEADER_MARKER: &str = "#YY";

/// Token NDBC uses for a missing value.
const MISSING: &str = "MM";

/// The latest wave observation from a realtime feed.
///
/// Every field is independently optional; a feed with no usable data
/// parses to the default (all `None`) value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Observation {
    /// Significant wave height in metres (`WVHT`)
    #[serde(rename = "Hs")]
    pub wave_height: Option<f64>,

    /// Dominant wave period in whole seconds (`DPD`)
    #[serde(rename = "Tp")]
    pub dominant_period: Option<i64>,

    /// Mean wave direction in whole degrees (`MWD`)
    #[serde(rename = "Dir")]
    pub mean_direction: Option<i64>,

    /// Observation time (`YY MM DD hh mm`, UTC)
    #[serde(rename = "time", serialize_with = "serialize_iso8601")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl Observation {
    /// Whether no field could be extracted.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The observation time as an ISO-8601 string with a `+00:00` offset.
    pub fn time_iso8601(&self) -> Option<String> {
        self.observed_at.map(format_iso8601)
    }
}

fn format_iso8601(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn serialize_iso8601<S: Serializer>(t: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
    match t {
        Some(t) => s.serialize_str(&format_iso8601(*t)),
        None => s.serialize_none(),
    }
}

/// The header and the data row of a feed, joined by column name.
struct Row<'a> {
    columns: HashMap<&'a str, usize>,
    values: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn new(header: &'a str, data: &'a str) -> Self {
        let columns = header
            .trim_start_matches('#')
            .split_whitespace()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();

        Self {
            columns,
            values: data.split_whitespace().collect(),
        }
    }

    /// Value of a column, or `None` if the column is absent, the row is
    /// too short, or the value is the missing-value marker.
    fn get(&self, column: &str) -> Option<&'a str> {
        let &i = self.columns.get(column)?;
        let value = *self.values.get(i)?;
        (value != MISSING).then_some(value)
    }

    fn float(&self, column: &str) -> Option<f64> {
        self.get(column)?
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Parsed as a float and truncated toward zero, so `9.0` and `9.8`
    /// are both 9. Values outside the `i64` range are `None`.
    fn whole(&self, column: &str) -> Option<i64> {
        let v = self.float(column)?.trunc();
        (i64::MIN as f64..i64::MAX as f64)
            .contains(&v)
            .then_some(v as i64)
    }

    fn observed_at(&self) -> Option<DateTime<Utc>> {
        let year: i32 = self.get("YY")?.parse().ok()?;
        let month: u32 = self.get("MM")?.parse().ok()?;
        let day: u32 = self.get("DD")?.parse().ok()?;
        let hour: u32 = self.get("hh")?.parse().ok()?;
        let minute: u32 = self.get("mm")?.parse().ok()?;

        let year = if year < 100 { year + 2000 } else { year };

        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
    }
}

/// Parse a realtime feed into its latest observation.
///
/// Blank lines are dropped. The header is the first line starting with
/// `#YY` and the data row is the line immediately after it.
/// Never fails: anything unusable comes back as `None`.
pub fn parse(text: &str) -> Observation {
    let mut lines = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim_start().is_empty());

    let Some(header) = lines.by_ref().find(|line| line.starts_with(HEADER_MARKER)) else {
        return Observation::default();
    };
    let Some(data) = lines.next() else {
        return Observation::default();
    };

    let row = Row::new(header, data);

    Observation {
        wave_height: row.float("WVHT"),
        dominant_period: row.whole("DPD"),
        mean_direction: row.whole("MWD"),
        observed_at: row.observed_at(),
    }
}
