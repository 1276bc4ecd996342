use std::path::PathBuf;

use athletic_scraping_utils::fs_json_util::write_json_pretty;
use log::info;

use super::event::ScheduleResult;

/// Receives the scraped schedule for storage.
pub trait ScheduleStore {
    fn store(&mut self, result: &ScheduleResult) -> anyhow::Result<()>;
}

/// Writes the schedule as pretty-printed JSON, replacing the previous file.
pub struct JsonFileStore {
    path: PathBuf,
}
impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
impl ScheduleStore for JsonFileStore {
    fn store(&mut self, result: &ScheduleResult) -> anyhow::Result<()> {
        write_json_pretty(&self.path, result)?;
        info!(
            "Saved {} event(s) to {:?}",
            result.event_count(),
            self.path
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::{JsonFileStore, ScheduleStore};
    use crate::{
        schedule::event::{Event, Location, ScheduleResult, SeasonSchedule, SportSchedule},
        team::{Season, Sport},
    };

    #[test]
    fn writes_nested_schedule() {
        let path = std::env::temp_dir()
            .join(format!("athletic-scraping-store-{}", std::process::id()))
            .join("schedule.json");
        let mut xc = SportSchedule::new(Sport::CrossCountry);
        xc.seasons.push(SeasonSchedule {
            season: Season::from(2025),
            events: vec![Event {
                title: "Meet A".into(),
                date: "9/5 - 9:00 AM".into(),
                location: Location::Error,
            }],
        });
        JsonFileStore::new(&path)
            .store(&ScheduleResult::new(vec![xc]))
            .unwrap();

        let value: Value = serde_json::from_str(&fs_err::read_to_string(&path).unwrap()).unwrap();
        let season = &value["sports"][0]["seasons"][0];
        assert_eq!(value["sports"][0]["sport"], "cross-country");
        assert_eq!(value["sports"][0]["label"], "Cross Country");
        assert_eq!(season["season"], 2025);
        assert_eq!(season["events"][0]["title"], "Meet A");
        assert_eq!(season["events"][0]["location"], "Error retrieving location");
    }
}
