//! Calendar scraping through a rendered page.
//!
//! Calendar entries only reveal their venue after being clicked, so the
//! page has to be driven by a browser; see [`session::CalendarSession`].

pub mod calendar;
pub mod event;
pub mod parser;
pub mod selectors;
pub mod session;
pub mod store;

pub use calendar::{scrape_calendar, PollingConfig, ScheduleUpdater};
pub use event::{Event, Location, ScheduleResult};
