use anyhow::Context;
use derive_more::{Display, From, FromStr, Into};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.athletic.net/";
pub const DEFAULT_TEAM_ID: TeamId = TeamId(19718);

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    EnumIter,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Sport {
    CrossCountry,
    TrackAndFieldOutdoor,
    TrackAndFieldIndoor,
}
impl Sport {
    /// Path segment used by the calendar pages.
    pub fn slug(self) -> String {
        self.to_string()
    }

    /// Human readable category stored alongside the schedule.
    pub fn label(self) -> &'static str {
        match self {
            Sport::CrossCountry => "Cross Country",
            Sport::TrackAndFieldOutdoor => "Outdoor Track and Field",
            Sport::TrackAndFieldIndoor => "Indoor Track and Field",
        }
    }
}

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Display,
    From,
    FromStr,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Season(u16);

pub fn default_seasons() -> Vec<Season> {
    vec![Season(2025), Season(2026)]
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, From, FromStr, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(u32);

/// The team whose calendar pages are scraped.
#[derive(Clone, Debug)]
pub struct TeamPage {
    base_url: Url,
    team_id: TeamId,
}
impl TeamPage {
    pub fn new(base_url: Url, team_id: TeamId) -> Self {
        Self { base_url, team_id }
    }

    pub fn calendar_url(&self, sport: Sport, season: Season) -> anyhow::Result<Url> {
        self.base_url
            .join(&format!("team/{}/{}/{season}", self.team_id, sport.slug()))
            .with_context(|| format!("Invalid calendar url for {sport} {season}"))
    }
}
impl Default for TeamPage {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("constant url is valid"),
            team_id: DEFAULT_TEAM_ID,
        }
    }
}

/// Sport-major iteration over every sport/season combination.
#[derive(Clone, Debug)]
pub struct SeasonMatrix {
    pub sports: Vec<Sport>,
    pub seasons: Vec<Season>,
}
impl SeasonMatrix {
    pub fn new(sports: Vec<Sport>, seasons: Vec<Season>) -> Self {
        Self { sports, seasons }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sport, Season)> + '_ {
        self.sports
            .iter()
            .copied()
            .cartesian_product(self.seasons.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.sports.len() * self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl Default for SeasonMatrix {
    fn default() -> Self {
        Self::new(Sport::iter().collect(), default_seasons())
    }
}
impl std::fmt::Display for SeasonMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] x [{}]",
            self.sports.iter().join(", "),
            self.seasons.iter().join(", ")
        )
    }
}
