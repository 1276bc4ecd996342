use std::time::Duration;

use anyhow::{bail, Context};
use athletic_scraping_utils::polling::poll_until;
use log::{debug, error, info, warn};
use scraper::Html;
use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use typed_builder::TypedBuilder;

use super::{
    event::{Event, Location, ScheduleResult, SeasonSchedule, SportSchedule},
    parser::{self, EntrySummary, Expansion},
    selectors::{Pattern, ENTRY_SELECTORS},
    session::{CalendarSession, EntryRef, SessionLauncher},
};
use crate::{
    database::Connector,
    team::{Season, SeasonMatrix, Sport, TeamPage},
};

/// Bounds of every readiness poll performed against the page.
#[serde_as]
#[derive(Clone, Copy, Debug, TypedBuilder, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// How long the calendar may take to render its entries.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "render_timeout_secs")]
    #[builder(default = Duration::from_secs(20))]
    pub render_timeout: Duration,
    /// Per-interaction limit: clickability, expansion, collapse.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "step_timeout_secs")]
    #[builder(default = Duration::from_secs(5))]
    pub step_timeout: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "interval_millis")]
    #[builder(default = Duration::from_millis(250))]
    pub interval: Duration,
}
impl Default for PollingConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Scrapes every entry of an already opened calendar page.
///
/// Returns `None` if no entry selector matched before the render timeout.
/// The returned events always line up one-to-one with the matched entries.
pub fn scrape_calendar<S: CalendarSession>(
    session: &mut S,
    polling: &PollingConfig,
) -> Option<Vec<Event>> {
    info!("Waiting for events to load...");
    let matched = poll_until(polling.render_timeout, polling.interval, || {
        Ok(ENTRY_SELECTORS.first_counted(|css| session.count(css)))
    });
    let pattern = match matched {
        Ok(Some((pattern, count))) => {
            info!("Found {count} clickable event(s) with selector: {}", pattern.css);
            pattern
        }
        Ok(None) => {
            warn!("No clickable events found with any selector");
            return None;
        }
        Err(e) => {
            error!("Failed while waiting for events: {e:#}");
            return None;
        }
    };

    let summaries = match session.content() {
        Ok(content) => parser::parse_entries(&Html::parse_document(&content), pattern),
        Err(e) => {
            error!("Could not read the rendered calendar: {e:#}");
            return None;
        }
    };

    let events = summaries
        .into_iter()
        .enumerate()
        .map(|(index, EntrySummary { title, date })| {
            debug!("Attempting to click event {} ({title:?})", index + 1);
            let location = match reveal_location(session, pattern, index, polling) {
                Ok(location) => location,
                Err(e) => {
                    warn!("Error clicking event {}: {e:#}", index + 1);
                    Location::Error
                }
            };
            match &location {
                Location::Found(venue) => debug!("Found location: {venue}"),
                Location::NotFound => info!("No location found for event {}", index + 1),
                Location::Error => {}
            }
            collapse(session, polling);
            Event {
                title,
                date,
                location,
            }
        })
        .collect();
    Some(events)
}

fn reveal_location<S: CalendarSession>(
    session: &mut S,
    pattern: &Pattern,
    index: usize,
    polling: &PollingConfig,
) -> anyhow::Result<Location> {
    let entry = EntryRef {
        selector: pattern.css,
        index,
    };
    session.scroll_into_view(entry)?;
    let clickable = poll_until(polling.step_timeout, polling.interval, || {
        Ok(session.is_clickable(entry)?.then_some(()))
    })?;
    if clickable.is_none() {
        bail!("Event did not become clickable within {:?}", polling.step_timeout);
    }
    if let Err(e) = session.click(entry) {
        warn!("Regular click failed, trying script click: {e:#}");
        session
            .force_click(entry)
            .context("Script click failed as well")?;
    }
    // The venue link is filled in asynchronously, so keep reading until it has text.
    let mut last = Expansion::Collapsed;
    let venue = poll_until(polling.step_timeout, polling.interval, || {
        let html = Html::parse_document(&session.content()?);
        Ok(match parser::parse_expansion(&html, pattern, index)? {
            Expansion::Venue(venue) => Some(venue),
            other => {
                last = other;
                None
            }
        })
    })?;
    Ok(match venue {
        Some(venue) => Location::Found(venue),
        None => {
            debug!("Event {} settled as {last:?}", index + 1);
            last.into_location()
        }
    })
}

/// Best effort: venue lookups are scoped to the clicked entry, so a stuck
/// expansion is only logged.
fn collapse<S: CalendarSession>(session: &mut S, polling: &PollingConfig) {
    if let Err(e) = session.dismiss() {
        debug!("Dismissing the expanded event failed: {e:#}");
        return;
    }
    let collapsed = poll_until(polling.step_timeout, polling.interval, || {
        Ok((!parser::has_open_event(&Html::parse_document(&session.content()?))).then_some(()))
    });
    if !matches!(collapsed, Ok(Some(()))) {
        debug!("An event still looks expanded after dismissing");
    }
}

/// Drives one browser session per sport/season and collects the results.
#[derive(TypedBuilder)]
pub struct ScheduleUpdater<'a, L, C> {
    launcher: L,
    connector: &'a C,
    #[builder(default)]
    team: TeamPage,
    #[builder(default)]
    matrix: SeasonMatrix,
    #[builder(default)]
    polling: PollingConfig,
}
impl<L: SessionLauncher, C: Connector> ScheduleUpdater<'_, L, C> {
    pub fn run(mut self) -> ScheduleResult {
        let SeasonMatrix { sports: sport_list, seasons } = self.matrix.clone();
        let mut sports = vec![];
        for sport in sport_list {
            let mut schedule = SportSchedule::new(sport);
            for &season in &seasons {
                info!("Updating {sport} {season}");
                match self.scrape_season(sport, season) {
                    Some(events) => {
                        info!("Scraped {} event(s) for {sport} {season}", events.len());
                        schedule.seasons.push(SeasonSchedule { season, events });
                    }
                    None => info!("Skipping {sport} {season}"),
                }
            }
            sports.push(schedule);
        }
        ScheduleResult::new(sports)
    }

    /// The browser side is blocking, so each attempt gets its own small runtime.
    fn connect(&self) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Could not start a runtime for the database connection")?;
        Ok(runtime.block_on(self.connector.connect())?)
    }

    /// Opens a session, scrapes it and closes it again on every path past a successful launch.
    fn scrape_season(&mut self, sport: Sport, season: Season) -> Option<Vec<Event>> {
        if let Err(e) = self.connect() {
            error!("Error connecting to the database: {e:#}");
        }
        let url = self
            .team
            .calendar_url(sport, season)
            .map_err(|e| error!("{e:#}"))
            .ok()?;
        let mut session = match self.launcher.launch(&url) {
            Ok(session) => session,
            Err(e) => {
                error!("Could not open {url}: {e:#}");
                return None;
            }
        };
        let events = scrape_calendar(&mut session, &self.polling);
        if let Err(e) = session.close() {
            warn!("Failed to close the browser session for {url}: {e:#}");
        }
        events
    }
}
