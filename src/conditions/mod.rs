// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! NOAA surf conditions: buoy wave summaries and tide predictions.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub mod fetch;

pub use fetch::{ConditionsFetcher, ConditionsUpdate};

/// NDBC buoy whose detailed wave summary (`.spec`) feed we read.
pub const WAVE_STATION_ID: &str = "46274";
/// CO-OPS tide station whose daily predictions we read.
pub const TIDE_STATION_ID: &str = "9410170";

/// A distilled view of the NOAA detailed wave summary (`.spec`) feed.
///
/// Numeric fields are averaged over the most recent observations; directions
/// and steepness come from the newest row. Heights are meters, periods are
/// seconds (see https://www.ndbc.noaa.gov/faq/measdes.shtml).
///
/// Serialized into journal entries as a snapshot; the field names below are
/// the on-disk contract and must stay stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveSummary {
    #[serde(default)]
    pub station_id: String,
    #[serde(default = "epoch")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub significant_height_m: f64,
    #[serde(default)]
    pub swell_height_m: f64,
    #[serde(default)]
    pub swell_period_s: f64,
    #[serde(default)]
    pub wind_wave_height_m: f64,
    #[serde(default)]
    pub wind_wave_period_s: f64,
    #[serde(default)]
    pub swell_direction: String,
    #[serde(default)]
    pub wind_wave_direction: String,
    #[serde(default)]
    pub steepness: String,
    #[serde(default)]
    pub average_period_s: f64,
    #[serde(default)]
    pub mean_wave_direction_deg: f64,
    /// Human-readable convenience string, regenerated on fetch.
    #[serde(default)]
    pub summary: String,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl fmt::Display for WaveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}m sig (swell {:.1}m @ {:.0}s {} / wind {:.1}m @ {:.0}s {}) | avg {:.1}s | mean {:.0}°",
            self.significant_height_m,
            self.swell_height_m,
            self.swell_period_s,
            self.swell_direction,
            self.wind_wave_height_m,
            self.wind_wave_period_s,
            self.wind_wave_direction,
            self.average_period_s,
            self.mean_wave_direction_deg,
        )
    }
}

/// Today's tide predictions for one station, times as reported by the API
/// (GMT), heights in feet above MLLW.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TideData {
    pub station_id: String,
    pub points: Vec<TidePoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TidePoint {
    pub time: String,
    pub height_ft: f64,
}

impl TideData {
    pub fn low(&self) -> Option<&TidePoint> {
        self.points
            .iter()
            .min_by(|a, b| a.height_ft.total_cmp(&b.height_ft))
    }

    pub fn high(&self) -> Option<&TidePoint> {
        self.points
            .iter()
            .max_by(|a, b| a.height_ft.total_cmp(&b.height_ft))
    }
}

#[derive(Debug)]
pub enum FetchError {
    Http { url: String, source: reqwest::Error },
    UnexpectedStatus { url: String, status: u16 },
    Json { url: String, source: serde_json::Error },
    Malformed { reason: &'static str },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { url, source } => write!(f, "request to {url} failed: {source}"),
            Self::UnexpectedStatus { url, status } => {
                write!(f, "unexpected status {status} from {url}")
            }
            Self::Json { url, source } => write!(f, "bad json from {url}: {source}"),
            Self::Malformed { reason } => write!(f, "malformed feed: {reason}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::UnexpectedStatus { .. } | Self::Malformed { .. } => None,
        }
    }
}

/// Parses an NDBC `.spec` file body into a [`WaveSummary`].
///
/// The file lists observations newest-first with `#` comment lines up top.
/// We take up to the 5 newest rows, require at least 15 whitespace-separated
/// fields per row, skip rows whose numeric fields fail to parse, and average
/// the numeric fields so a single noisy observation does not dominate.
pub fn parse_wave_spec(body: &str, station_id: &str) -> Result<WaveSummary, FetchError> {
    struct Row {
        ts: DateTime<Utc>,
        wvht: f64,
        swell_h: f64,
        swell_p: f64,
        wind_h: f64,
        wind_p: f64,
        swell_dir: String,
        wind_dir: String,
        steep: String,
        apd: f64,
        mwd: f64,
    }

    let data_lines = body
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .take(5);

    let mut rows = Vec::new();
    for line in data_lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 15 {
            continue;
        }

        let Some(ts) = parse_spec_timestamp(&fields[..5]) else {
            continue;
        };

        let numeric = [fields[5], fields[6], fields[7], fields[8], fields[9], fields[13]]
            .map(|field| field.parse::<f64>());
        if numeric.iter().any(|value| value.is_err()) {
            // A failed numeric field would bias the averages; drop the row.
            continue;
        }
        let [wvht, swell_h, swell_p, wind_h, wind_p, apd] =
            numeric.map(|value| value.unwrap_or_default());

        rows.push(Row {
            ts,
            wvht,
            swell_h,
            swell_p,
            wind_h,
            wind_p,
            swell_dir: fields[10].to_owned(),
            wind_dir: fields[11].to_owned(),
            steep: fields[12].to_owned(),
            apd,
            mwd: fields[14].parse().unwrap_or(0.0),
        });
    }

    if rows.is_empty() {
        return Err(FetchError::Malformed {
            reason: "no parsable data rows in spec file",
        });
    }

    let n = rows.len() as f64;
    let avg = |pick: fn(&Row) -> f64| rows.iter().map(pick).sum::<f64>() / n;
    let newest = &rows[0];

    let mut summary = WaveSummary {
        station_id: station_id.to_owned(),
        time: newest.ts,
        significant_height_m: avg(|r| r.wvht),
        swell_height_m: avg(|r| r.swell_h),
        swell_period_s: avg(|r| r.swell_p),
        wind_wave_height_m: avg(|r| r.wind_h),
        wind_wave_period_s: avg(|r| r.wind_p),
        swell_direction: newest.swell_dir.clone(),
        wind_wave_direction: newest.wind_dir.clone(),
        steepness: newest.steep.clone(),
        average_period_s: avg(|r| r.apd),
        mean_wave_direction_deg: avg(|r| r.mwd).round(),
        summary: String::new(),
    };
    summary.summary = summary.to_string();
    Ok(summary)
}

fn parse_spec_timestamp(fields: &[&str]) -> Option<DateTime<Utc>> {
    let year: i32 = fields[0].parse().ok()?;
    let month: u32 = fields[1].parse().ok()?;
    let day: u32 = fields[2].parse().ok()?;
    let hour: u32 = fields[3].parse().ok()?;
    let minute: u32 = fields[4].parse().ok()?;
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).single()
}

/// Parses a CO-OPS predictions JSON body into [`TideData`].
pub fn parse_tide_json(body: &str, station_id: &str, url: &str) -> Result<TideData, FetchError> {
    #[derive(Deserialize)]
    struct PredictionsJson {
        #[serde(default)]
        predictions: Vec<PredictionJson>,
    }

    #[derive(Deserialize)]
    struct PredictionJson {
        #[serde(default)]
        t: String,
        #[serde(default)]
        v: String,
    }

    let parsed: PredictionsJson = serde_json::from_str(body).map_err(|source| FetchError::Json {
        url: url.to_owned(),
        source,
    })?;

    let mut points = Vec::with_capacity(parsed.predictions.len());
    for prediction in parsed.predictions {
        let height_ft = prediction.v.trim().parse::<f64>().map_err(|_| {
            FetchError::Malformed {
                reason: "tide prediction height is not a number",
            }
        })?;
        points.push(TidePoint {
            time: prediction.t,
            height_ft,
        });
    }

    Ok(TideData {
        station_id: station_id.to_owned(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{parse_tide_json, parse_wave_spec, FetchError, WaveSummary};

    const SPEC_BODY: &str = "\
#YY  MM DD hh mm WVHT  SwH  SwP  WWH  WWP SwD WWD  STEEPNESS  APD MWD
#yr  mo dy hr mn    m    m  sec    m  sec   -   -          -  sec degT
2026 08 30 17 40  1.5  1.2 14.3  0.4  4.5 WNW   W      SWELL  8.8 285
2026 08 30 17 10  1.3  1.0 14.3  0.4  4.3 WNW   W      SWELL  8.4 287
2026 08 30 16 40  1.4  1.1 15.4  0.5  4.1  NW   W      SWELL  8.6 289
";

    #[test]
    fn wave_spec_averages_numeric_fields_over_rows() {
        let summary = parse_wave_spec(SPEC_BODY, "46274").unwrap();

        assert_eq!(summary.station_id, "46274");
        assert!((summary.significant_height_m - 1.4).abs() < 1e-9);
        assert!((summary.swell_height_m - 1.1).abs() < 1e-9);
        assert!((summary.wind_wave_period_s - 4.3).abs() < 1e-9);
        assert_eq!(summary.mean_wave_direction_deg, 287.0);
    }

    #[test]
    fn wave_spec_takes_directions_from_the_newest_row() {
        let summary = parse_wave_spec(SPEC_BODY, "46274").unwrap();

        assert_eq!(summary.swell_direction, "WNW");
        assert_eq!(summary.wind_wave_direction, "W");
        assert_eq!(summary.steepness, "SWELL");
        assert_eq!(summary.time, Utc.with_ymd_and_hms(2026, 8, 30, 17, 40, 0).unwrap());
    }

    #[test]
    fn wave_spec_skips_short_and_unparsable_rows() {
        let body = "\
#header
2026 08 30 17 40  1.5  1.2
2026 08 30 17 10  MM  1.0 14.3  0.4  4.3 WNW   W      SWELL  8.4 287
2026 08 30 16 40  2.0  1.0 10.0  0.5  5.0  NW   W      SWELL  8.0 280
";
        let summary = parse_wave_spec(body, "46274").unwrap();
        // Only the last row survives, so no averaging happened.
        assert!((summary.significant_height_m - 2.0).abs() < 1e-9);
        assert_eq!(summary.swell_direction, "NW");
    }

    #[test]
    fn wave_spec_with_no_usable_rows_is_an_error() {
        let err = parse_wave_spec("#only comments\n#here\n", "46274").unwrap_err();
        match err {
            FetchError::Malformed { .. } => {}
            other => panic!("expected Malformed, got: {other:?}"),
        }
    }

    #[test]
    fn tide_json_parses_predictions() {
        let body = r#"{
  "predictions": [
    {"t": "2026-08-30 00:00", "v": "1.933"},
    {"t": "2026-08-30 00:06", "v": "1.901"},
    {"t": "2026-08-30 12:00", "v": "5.221"}
  ]
}"#;
        let tide = parse_tide_json(body, "9410170", "http://test").unwrap();
        assert_eq!(tide.points.len(), 3);
        assert_eq!(tide.low().unwrap().time, "2026-08-30 00:06");
        assert!((tide.high().unwrap().height_ft - 5.221).abs() < 1e-9);
    }

    #[test]
    fn tide_json_rejects_non_numeric_heights() {
        let body = r#"{"predictions": [{"t": "2026-08-30 00:00", "v": "n/a"}]}"#;
        let err = parse_tide_json(body, "9410170", "http://test").unwrap_err();
        match err {
            FetchError::Malformed { .. } => {}
            other => panic!("expected Malformed, got: {other:?}"),
        }
    }

    #[test]
    fn wave_summary_round_trips_through_json() {
        let summary = parse_wave_spec(SPEC_BODY, "46274").unwrap();
        let raw = serde_json::to_string(&summary).unwrap();
        let back: WaveSummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, summary);
    }
}
