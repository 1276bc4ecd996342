use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use url::Url;

use crate::{
    database::{EnvConnector, DEFAULT_DATABASE_ENV_VAR},
    schedule::PollingConfig,
    team::{
        default_seasons, Season, SeasonMatrix, Sport, TeamId, TeamPage, DEFAULT_BASE_URL,
        DEFAULT_TEAM_ID,
    },
};

/// Settings shared by both updaters.  Every field may be omitted.
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_url: Url,
    pub team_id: TeamId,
    pub sports: Vec<Sport>,
    pub seasons: Vec<Season>,
    pub database_env_var: String,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "database_timeout_secs")]
    pub database_timeout: Duration,
    pub output_path: PathBuf,
    pub remote_debugging_port: Option<u16>,
    pub polling: PollingConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("constant url is valid"),
            team_id: DEFAULT_TEAM_ID,
            sports: SeasonMatrix::default().sports,
            seasons: default_seasons(),
            database_env_var: DEFAULT_DATABASE_ENV_VAR.to_owned(),
            database_timeout: Duration::from_secs(5),
            output_path: "schedule.json".into(),
            remote_debugging_port: None,
            polling: PollingConfig::default(),
        }
    }
}
impl Config {
    pub fn team(&self) -> TeamPage {
        TeamPage::new(self.base_url.clone(), self.team_id)
    }

    pub fn matrix(&self) -> SeasonMatrix {
        SeasonMatrix::new(self.sports.clone(), self.seasons.clone())
    }

    pub fn connector(&self) -> EnvConnector {
        EnvConnector::new(&self.database_env_var, self.database_timeout)
    }
}
