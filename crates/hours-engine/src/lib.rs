//! # hours-engine
//!
//! Deterministic opening-hours computation.
//!
//! Turns loosely formatted weekly hours text ("Mon-Fri 6am - 10pm",
//! "Daily 24 hours") and structured page data into canonical per-day
//! intervals, then answers whether a facility, or one of its services, is
//! open, closing soon, opening soon, or closed at a given instant.
//!
//! ## Modules
//!
//! - [`zone`] — Wall-clock decomposition, zone label normalization, query-instant resolution
//! - [`model`] — Canonical `ClockTime` / `Interval` / `IntervalSet` / `HoursBundle`
//! - [`clock`] — Loose time tokens → canonical `HH:MM`
//! - [`days`] — Weekday phrases → day indices
//! - [`lines`] — Free-text lines → intervals, with overnight splitting
//! - [`structured`] — Structured `{days, hours}` / `{startTime, endTime}` input → intervals
//! - [`status`] — Open/closing-soon/opening-soon/closed state machine
//! - [`facility`] — Facility records and status queries with fallbacks
//! - [`error`] — Error types

pub mod clock;
pub mod days;
pub mod error;
pub mod facility;
pub mod lines;
pub mod model;
pub mod status;
pub mod structured;
pub mod zone;

pub use clock::parse_clock_time;
pub use days::parse_day_spec;
pub use error::HoursError;
pub use facility::{filter_by_state, Facility, FacilityStatus, StatusQuery};
pub use lines::{parse_line, parse_lines, split_overnight};
pub use model::{service_key, ClockTime, DayIndex, HoursBundle, Interval, IntervalSet};
pub use status::{
    compute_status, compute_status_at_parts, format_countdown, StatusResult, StatusThresholds,
};
pub use structured::{DayHoursEntry, StructuredHours, TimeRange};
pub use zone::{normalize_time_zone, resolve_instant, resolve_time_zone, zoned_parts, ZonedParts};
