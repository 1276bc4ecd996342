use std::{convert::Infallible, fmt::Display, str::FromStr};

use itertools::Itertools;
use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::team::{Season, Sport};

pub const LOCATION_NOT_FOUND: &str = "Location not found";
pub const LOCATION_ERROR: &str = "Error retrieving location";

pub const TIME_OF_DAY: &str = "All Day";
pub const GENDER: &str = "Co-ed";
pub const LEVEL: &str = "varsity";
pub const VENUE: &str = "Multiple Schools";

/// Venue of a meet, or the reason it could not be scraped.
#[derive(Clone, PartialEq, Eq, Debug, SerializeDisplay, DeserializeFromStr)]
pub enum Location {
    Found(String),
    /// The entry never expanded, or expanded without a venue link.
    NotFound,
    /// Interacting with the entry failed.
    Error,
}
impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Found(venue) => f.pad(venue),
            Location::NotFound => f.pad(LOCATION_NOT_FOUND),
            Location::Error => f.pad(LOCATION_ERROR),
        }
    }
}
impl FromStr for Location {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            LOCATION_NOT_FOUND => Location::NotFound,
            LOCATION_ERROR => Location::Error,
            _ => Location::Found(s.to_owned()),
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Event {
    pub title: String,
    /// Verbatim from the calendar, e.g. `"Sat, Sep 5 - 9:00 AM"`.
    pub date: String,
    pub location: Location,
}

#[derive(Clone, Debug, Serialize)]
pub struct SeasonSchedule {
    pub season: Season,
    pub events: Vec<Event>,
}
impl SeasonSchedule {
    pub fn names(&self) -> Vec<String> {
        self.events.iter().map(|e| e.title.clone()).collect()
    }
    pub fn dates(&self) -> Vec<String> {
        self.events.iter().map(|e| e.date.clone()).collect()
    }
    pub fn locations(&self) -> Vec<String> {
        self.events.iter().map(|e| e.location.to_string()).collect()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SportSchedule {
    pub sport: Sport,
    pub label: &'static str,
    /// Seasons whose calendar could not be read are absent.
    pub seasons: Vec<SeasonSchedule>,
}
impl SportSchedule {
    pub fn new(sport: Sport) -> Self {
        Self {
            sport,
            label: sport.label(),
            seasons: vec![],
        }
    }
}

/// Everything handed over to the persistence layer after one run.
#[derive(Clone, Debug, Serialize)]
pub struct ScheduleResult {
    pub sports: Vec<SportSchedule>,
    pub time_of_day: &'static str,
    pub gender: &'static str,
    pub categories: Vec<&'static str>,
    pub level: &'static str,
    pub venue: &'static str,
    pub home: bool,
}
impl ScheduleResult {
    pub fn new(sports: Vec<SportSchedule>) -> Self {
        let categories = sports.iter().map(|s| s.label).collect();
        Self {
            sports,
            time_of_day: TIME_OF_DAY,
            gender: GENDER,
            categories,
            level: LEVEL,
            venue: VENUE,
            home: false,
        }
    }

    fn columns(&self, f: impl Fn(&SeasonSchedule) -> Vec<String>) -> Vec<Vec<Vec<String>>> {
        self.sports
            .iter()
            .map(|sport| sport.seasons.iter().map(&f).collect_vec())
            .collect()
    }

    /// Titles indexed by sport, then season, then event.
    pub fn names(&self) -> Vec<Vec<Vec<String>>> {
        self.columns(SeasonSchedule::names)
    }
    pub fn dates(&self) -> Vec<Vec<Vec<String>>> {
        self.columns(SeasonSchedule::dates)
    }
    pub fn locations(&self) -> Vec<Vec<Vec<String>>> {
        self.columns(SeasonSchedule::locations)
    }

    pub fn event_count(&self) -> usize {
        self.sports
            .iter()
            .flat_map(|s| &s.seasons)
            .map(|s| s.events.len())
            .sum()
    }
}
