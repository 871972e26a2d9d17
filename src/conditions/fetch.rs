// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::mpsc;
use std::time::Duration;

use super::{
    parse_tide_json, parse_wave_spec, FetchError, TideData, WaveSummary, TIDE_STATION_ID,
    WAVE_STATION_ID,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// One result delivered from the fetch worker to the event loop.
#[derive(Debug)]
pub enum ConditionsUpdate {
    Tide(Result<TideData, FetchError>),
    Waves(Result<WaveSummary, FetchError>),
}

/// Receiving end of the background conditions fetch.
///
/// The worker thread does all blocking HTTP; the event loop drains
/// [`ConditionsFetcher::try_recv`] once per tick and never blocks on the
/// network. The thread ends after delivering both results (or failing to),
/// and a dropped receiver just makes its sends fail silently.
#[derive(Debug)]
pub struct ConditionsFetcher {
    rx: mpsc::Receiver<ConditionsUpdate>,
}

impl ConditionsFetcher {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::Builder::new()
            .name("surflog-conditions".to_owned())
            .spawn(move || {
                let _ = tx.send(ConditionsUpdate::Tide(fetch_tide()));
                let _ = tx.send(ConditionsUpdate::Waves(fetch_waves()));
            })
            .expect("spawn conditions fetch worker thread");

        Self { rx }
    }

    /// A fetcher that will never deliver anything (offline mode).
    pub fn idle() -> Self {
        let (_tx, rx) = mpsc::channel();
        Self { rx }
    }

    pub fn try_recv(&self) -> Option<ConditionsUpdate> {
        self.rx.try_recv().ok()
    }
}

fn wave_spec_url() -> String {
    format!("https://www.ndbc.noaa.gov/data/realtime2/{WAVE_STATION_ID}.spec")
}

fn tide_url() -> String {
    format!(
        "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter?date=today&station={TIDE_STATION_ID}&product=predictions&datum=MLLW&time_zone=gmt&units=english&format=json"
    )
}

fn fetch_text(url: &str) -> Result<String, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|source| FetchError::Http {
            url: url.to_owned(),
            source,
        })?;

    let response = client.get(url).send().map_err(|source| FetchError::Http {
        url: url.to_owned(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::UnexpectedStatus {
            url: url.to_owned(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(|source| FetchError::Http {
        url: url.to_owned(),
        source,
    })
}

fn fetch_waves() -> Result<WaveSummary, FetchError> {
    let url = wave_spec_url();
    let body = fetch_text(&url)?;
    parse_wave_spec(&body, WAVE_STATION_ID)
}

fn fetch_tide() -> Result<TideData, FetchError> {
    let url = tide_url();
    let body = fetch_text(&url)?;
    parse_tide_json(&body, TIDE_STATION_ID, &url)
}
