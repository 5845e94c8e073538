//! Facility-level status queries.
//!
//! This is the contract the query layer uses: a [`Facility`] record holds
//! the raw zone label and the [`HoursBundle`]; a [`StatusQuery`] carries the
//! caller's optional instant, service label and threshold overrides. Every
//! query parameter degrades to a default instead of failing.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::HoursBundle;
use crate::status::{compute_status, StatusResult, StatusThresholds};
use crate::zone::{normalize_time_zone, resolve_instant, resolve_time_zone, DEFAULT_TIME_ZONE};

/// A facility as stored after ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    /// Raw zone label from page data; may be empty or an alias.
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub hours: HoursBundle,
}

/// Query parameters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusQuery {
    /// RFC 3339 instant; absent or unparseable means now.
    #[serde(default)]
    pub at: Option<String>,
    /// Service or amenity label; unknown labels fall back to the primary hours.
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub closing_soon_minutes: Option<u32>,
    #[serde(default)]
    pub opening_soon_minutes: Option<u32>,
}

impl StatusQuery {
    /// Apply this query's threshold overrides on top of `base`.
    pub fn thresholds(&self, base: &StatusThresholds) -> StatusThresholds {
        StatusThresholds {
            closing_soon_minutes: self
                .closing_soon_minutes
                .unwrap_or(base.closing_soon_minutes),
            opening_soon_minutes: self
                .opening_soon_minutes
                .unwrap_or(base.opening_soon_minutes),
        }
    }
}

/// A facility's status for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacilityStatus {
    pub name: String,
    /// Service key whose hours were used, or `None` for the primary hours.
    pub service: Option<String>,
    /// The instant evaluated (RFC 3339, UTC).
    pub at: String,
    /// The IANA zone the instant was read in.
    pub time_zone: String,
    pub status: StatusResult,
    /// Human-readable form of `status`.
    pub summary: String,
}

impl Facility {
    pub fn new(name: impl Into<String>, time_zone: impl Into<String>, hours: HoursBundle) -> Self {
        Facility {
            name: name.into(),
            time_zone: time_zone.into(),
            hours,
        }
    }

    /// The facility's zone. Labels that do not resolve fall back to
    /// `America/New_York`.
    pub fn zone(&self) -> Tz {
        resolve_time_zone(Some(&self.time_zone)).unwrap_or_else(|err| {
            tracing::warn!(
                facility = %self.name,
                label = %normalize_time_zone(Some(&self.time_zone)),
                %err,
                "unresolvable time zone, using {DEFAULT_TIME_ZONE}"
            );
            chrono_tz::America::New_York
        })
    }

    /// Evaluate `query` against this facility.
    ///
    /// `now` is used when the query names no instant or an unparseable one.
    pub fn status(
        &self,
        query: &StatusQuery,
        base: &StatusThresholds,
        now: DateTime<Utc>,
    ) -> FacilityStatus {
        let instant = resolve_instant(query.at.as_deref(), now);
        let tz = self.zone();
        let selected = self.hours.select(query.service.as_deref());
        let status = compute_status(selected.intervals, instant, &tz, &query.thresholds(base));

        tracing::debug!(
            facility = %self.name,
            service = ?selected.service,
            state = status.label(),
            "computed status"
        );

        FacilityStatus {
            name: self.name.clone(),
            service: selected.service.map(str::to_string),
            at: instant.to_rfc3339(),
            time_zone: tz.name().to_string(),
            summary: status.summary(),
            status,
        }
    }
}

/// Keep the facilities whose status at `now` has the given state label
/// (`open`, `closing_soon`, `opening_soon`, `closed`).
pub fn filter_by_state<'a>(
    facilities: &'a [Facility],
    state: &str,
    query: &StatusQuery,
    base: &StatusThresholds,
    now: DateTime<Utc>,
) -> Vec<&'a Facility> {
    facilities
        .iter()
        .filter(|f| f.status(query, base, now).status.label() == state)
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IntervalSet;
    use chrono::TimeZone;

    fn station() -> Facility {
        let primary =
            IntervalSet::from_lines(["Mon-Fri 6:00am - 10:00pm", "Sat-Sun 8:00am - 8:00pm"]);
        let wash = IntervalSet::from_lines(["Daily 8am - 6pm"]);
        let bundle = HoursBundle::new(primary).with_service("Car Wash", wash);
        Facility::new("Route 9 Station", "Eastern Standard Time", bundle)
    }

    fn now() -> DateTime<Utc> {
        // Wednesday Feb 18 2026, 14:30 UTC (09:30 EST).
        Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_status_uses_now_when_no_instant() {
        let result = station().status(&StatusQuery::default(), &StatusThresholds::default(), now());
        assert_eq!(result.time_zone, "America/New_York");
        assert_eq!(result.at, now().to_rfc3339());
        assert_eq!(
            result.status,
            StatusResult::Open {
                minutes_until_close: Some(12 * 60 + 30)
            }
        );
        assert_eq!(result.service, None);
    }

    #[test]
    fn test_status_with_explicit_instant() {
        let query = StatusQuery {
            at: Some("2026-02-18T21:45:00-05:00".into()),
            ..Default::default()
        };
        let result = station().status(&query, &StatusThresholds::default(), now());
        assert_eq!(
            result.status,
            StatusResult::ClosingSoon {
                minutes_until_close: 15
            }
        );
        assert_eq!(result.summary, "Closing soon · closes in 15 min");
    }

    #[test]
    fn test_status_bad_instant_falls_back_to_now() {
        let query = StatusQuery {
            at: Some("not a time".into()),
            ..Default::default()
        };
        let result = station().status(&query, &StatusThresholds::default(), now());
        assert_eq!(result.at, now().to_rfc3339());
    }

    #[test]
    fn test_status_selects_service() {
        let query = StatusQuery {
            service: Some("car-wash".into()),
            ..Default::default()
        };
        let result = station().status(&query, &StatusThresholds::default(), now());
        assert_eq!(result.service.as_deref(), Some("car_wash"));
        // 09:30 local, wash closes at 18:00.
        assert_eq!(
            result.status,
            StatusResult::Open {
                minutes_until_close: Some(8 * 60 + 30)
            }
        );
    }

    #[test]
    fn test_status_unknown_service_uses_primary() {
        let query = StatusQuery {
            service: Some("Propane".into()),
            ..Default::default()
        };
        let result = station().status(&query, &StatusThresholds::default(), now());
        assert_eq!(result.service, None);
    }

    #[test]
    fn test_threshold_overrides() {
        let query = StatusQuery {
            closing_soon_minutes: Some(10),
            ..Default::default()
        };
        let thresholds = query.thresholds(&StatusThresholds::default());
        assert_eq!(thresholds.closing_soon_minutes, 10);
        assert_eq!(thresholds.opening_soon_minutes, 60);

        let query = StatusQuery {
            at: Some("2026-02-18T21:45:00-05:00".into()),
            closing_soon_minutes: Some(10),
            ..Default::default()
        };
        let result = station().status(&query, &StatusThresholds::default(), now());
        assert_eq!(
            result.status,
            StatusResult::Open {
                minutes_until_close: Some(15)
            }
        );
    }

    #[test]
    fn test_unresolvable_zone_falls_back() {
        let facility = Facility::new("Somewhere", "Mars/Olympus", HoursBundle::default());
        assert_eq!(facility.zone(), chrono_tz::America::New_York);
        let result = facility.status(&StatusQuery::default(), &StatusThresholds::default(), now());
        assert_eq!(
            result.status,
            StatusResult::Closed {
                minutes_until_open: None
            }
        );
    }

    #[test]
    fn test_facility_json_round_trip() {
        let facility = station();
        let json = serde_json::to_string(&facility).unwrap();
        let back: Facility = serde_json::from_str(&json).unwrap();
        assert_eq!(back, facility);
    }

    #[test]
    fn test_filter_by_state() {
        let closed = Facility::new("Dark Store", "", HoursBundle::default());
        let facilities = vec![station(), closed];
        let open = filter_by_state(
            &facilities,
            "open",
            &StatusQuery::default(),
            &StatusThresholds::default(),
            now(),
        );
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].name, "Route 9 Station");
    }
}
