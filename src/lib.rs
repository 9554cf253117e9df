pub mod assets;
pub mod calendar;
pub mod config;
pub mod loader;
pub mod model;
pub mod schedule;
pub mod search;
pub mod server;
pub mod timefmt;
pub mod util;
pub mod views;
