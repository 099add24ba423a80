//! Buoy observation proxy.
//!
//! Fetches NOAA NDBC realtime buoy feeds, extracts the latest wave
//! observation (height, period, direction), attaches station metadata and
//! serves the result as compact JSON.

pub mod config;
pub mod ndbc;
pub mod readings;
pub mod realtime;
pub mod stations;
pub mod web;
