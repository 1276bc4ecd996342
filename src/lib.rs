pub mod config;
pub mod database;
pub mod roster;
pub mod schedule;
pub mod team;
