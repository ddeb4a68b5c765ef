// Event domain types
//
// These types represent the Event entity, its lifecycle status and the
// date/time primitives the conflict detector works with.
// Used by both the core workflows and the control-plane storage.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::conflict::ScheduleCandidate;
use crate::error::{Result, SchedulingError};

/// Event lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Approved,
    Declined,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Declined => "declined",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventStatus {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(EventStatus::Pending),
            "approved" => Ok(EventStatus::Approved),
            "declined" => Ok(EventStatus::Declined),
            other => Err(SchedulingError::validation(format!(
                "unknown event status '{other}'"
            ))),
        }
    }
}

// ============================================================================
// Time-of-day helpers
// ============================================================================

/// Parse a wall-clock time given as `HH:MM` or `HH:MM:SS`
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| SchedulingError::validation(format!("invalid time '{raw}', expected HH:MM")))
}

/// Minutes since midnight; seconds are ignored
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Render a time as `HH:MM`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter for `HH:MM` times
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(de::Error::custom)
    }

    /// Optional variant; blank strings read as `None`
    pub mod option {
        use chrono::NaiveTime;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.serialize_str(&super::super::format_time(*time)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(value) => super::super::parse_time(value)
                    .map(Some)
                    .map_err(de::Error::custom),
            }
        }
    }
}

// ============================================================================
// DateRange / TimeWindow
// ============================================================================

/// Inclusive calendar date range; a single-day event has `start == end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range where a missing end date means a single day
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            start,
            end: end.unwrap_or(start),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Ranges overlap when either start falls inside the other range
    pub fn overlaps(&self, other: &DateRange) -> bool {
        other.contains(self.start) || self.contains(other.start)
    }
}

/// Half-open time-of-day window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Window from optional bounds; `None` unless both are present
    pub fn from_bounds(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Option<Self> {
        Some(Self {
            start: start?,
            end: end?,
        })
    }

    /// Windows that only touch at a boundary do not overlap
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        minutes_since_midnight(self.start) < minutes_since_midnight(other.end)
            && minutes_since_midnight(self.end) > minutes_since_midnight(other.start)
    }
}

// ============================================================================
// Event
// ============================================================================

/// A scheduled occurrence requesting one or more venues, subject to approval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub venue_ids: Vec<Uuid>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "08:00"))]
    pub setup_start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "09:00"))]
    pub setup_end_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "09:00"))]
    pub event_start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "12:00"))]
    pub event_end_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "12:00"))]
    pub cleanup_start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "13:00"))]
    pub cleanup_end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behalf_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nature_of_event: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Materialise a new pending event from submitted details
    pub fn pending(id: Uuid, input: NewEvent, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            venue_ids: input.venue_ids,
            setup_start_time: input.setup_start_time,
            setup_end_time: input.setup_end_time,
            event_start_time: input.event_start_time,
            event_end_time: input.event_end_time,
            cleanup_start_time: input.cleanup_start_time,
            cleanup_end_time: input.cleanup_end_time,
            behalf_of: input.behalf_of,
            contact_info: input.contact_info,
            nature_of_event: input.nature_of_event,
            status: EventStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the descriptive fields, keeping id, status and creation time
    pub fn apply(&mut self, input: NewEvent, now: DateTime<Utc>) {
        let status = self.status;
        let created_at = self.created_at;
        *self = Self::pending(self.id, input, now);
        self.status = status;
        self.created_at = created_at;
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// The window used for overlap; setup and cleanup are display-only
    pub fn event_window(&self) -> Option<TimeWindow> {
        TimeWindow::from_bounds(self.event_start_time, self.event_end_time)
    }

    /// The slice of this event the conflict detector looks at
    pub fn schedule(&self) -> ScheduleCandidate {
        ScheduleCandidate {
            start_date: self.start_date,
            end_date: self.end_date,
            venue_ids: self.venue_ids.clone(),
            event_start_time: self.event_start_time,
            event_end_time: self.event_end_time,
        }
    }
}

/// Event details supplied on create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NewEvent {
    #[cfg_attr(feature = "openapi", schema(example = "Science Fair"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub venue_ids: Vec<Uuid>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "08:00"))]
    pub setup_start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "09:00"))]
    pub setup_end_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "09:00"))]
    pub event_start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "12:00"))]
    pub event_end_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "12:00"))]
    pub cleanup_start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "13:00"))]
    pub cleanup_end_time: Option<NaiveTime>,
    #[serde(default)]
    pub behalf_of: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub nature_of_event: Option<String>,
}

impl NewEvent {
    /// Minimal event with just a name and a start date
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            description: None,
            start_date,
            end_date: None,
            venue_ids: Vec::new(),
            setup_start_time: None,
            setup_end_time: None,
            event_start_time: None,
            event_end_time: None,
            cleanup_start_time: None,
            cleanup_end_time: None,
            behalf_of: None,
            contact_info: None,
            nature_of_event: None,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_venues(mut self, venue_ids: Vec<Uuid>) -> Self {
        self.venue_ids = venue_ids;
        self
    }

    pub fn with_event_time(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.event_start_time = Some(start);
        self.event_end_time = Some(end);
        self
    }

    pub fn schedule(&self) -> ScheduleCandidate {
        ScheduleCandidate {
            start_date: self.start_date,
            end_date: self.end_date,
            venue_ids: self.venue_ids.clone(),
            event_start_time: self.event_start_time,
            event_end_time: self.event_end_time,
        }
    }

    /// Reject malformed submissions before any detection runs
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SchedulingError::validation(
                "Event name and start date are required",
            ));
        }
        self.schedule().validate()?;
        for (label, start, end) in [
            ("setup", self.setup_start_time, self.setup_end_time),
            ("cleanup", self.cleanup_start_time, self.cleanup_end_time),
        ] {
            if let (Some(start), Some(end)) = (start, end) {
                if end < start {
                    return Err(SchedulingError::validation(format!(
                        "{label} end time must not be before its start time"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        parse_time(s).unwrap()
    }

    #[test]
    fn test_parse_time_accepts_seconds() {
        assert_eq!(time("09:30"), time("09:30:00"));
        assert_eq!(minutes_since_midnight(time("09:30:45")), 570);
        assert!(parse_time("9h30").is_err());
    }

    #[test]
    fn test_date_range_overlap_is_inclusive() {
        let multi_day = DateRange::new(date("2024-01-10"), Some(date("2024-01-12")));

        assert!(multi_day.overlaps(&DateRange::new(date("2024-01-12"), None)));
        assert!(DateRange::new(date("2024-01-10"), None).overlaps(&multi_day));
        assert!(!multi_day.overlaps(&DateRange::new(date("2024-01-13"), None)));
        assert!(!DateRange::new(date("2024-01-09"), None).overlaps(&multi_day));
    }

    #[test]
    fn test_time_window_touching_is_not_overlap() {
        let morning = TimeWindow {
            start: time("10:00"),
            end: time("11:00"),
        };
        let late_morning = TimeWindow {
            start: time("11:00"),
            end: time("12:00"),
        };
        let straddling = TimeWindow {
            start: time("10:30"),
            end: time("11:30"),
        };

        assert!(!morning.overlaps(&late_morning));
        assert!(!late_morning.overlaps(&morning));
        assert!(morning.overlaps(&straddling));
        assert!(straddling.overlaps(&late_morning));
    }

    #[test]
    fn test_event_status_round_trip() {
        for status in [
            EventStatus::Pending,
            EventStatus::Approved,
            EventStatus::Declined,
        ] {
            assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), status);
        }
        assert!("archived".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_new_event_deserializes_hhmm_and_blank_times() {
        let json = r#"{
            "name": "Orientation",
            "start_date": "2024-01-10",
            "venue_ids": [],
            "event_start_time": "09:00",
            "event_end_time": "10:30:00",
            "setup_start_time": ""
        }"#;
        let input: NewEvent = serde_json::from_str(json).unwrap();

        assert_eq!(input.event_start_time, Some(time("09:00")));
        assert_eq!(input.event_end_time, Some(time("10:30")));
        assert_eq!(input.setup_start_time, None);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let input = NewEvent::new("   ", date("2024-01-10"));
        assert!(matches!(
            input.validate(),
            Err(SchedulingError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_ranges() {
        let backwards_dates =
            NewEvent::new("Fair", date("2024-01-10")).with_end_date(date("2024-01-09"));
        assert!(backwards_dates.validate().is_err());

        let backwards_times =
            NewEvent::new("Fair", date("2024-01-10")).with_event_time(time("12:00"), time("11:00"));
        assert!(backwards_times.validate().is_err());

        let mut half_window = NewEvent::new("Fair", date("2024-01-10"));
        half_window.event_start_time = Some(time("09:00"));
        assert!(half_window.validate().is_err());
    }

    #[test]
    fn test_apply_keeps_identity_and_status() {
        let created = Utc::now();
        let mut event = Event::pending(
            Uuid::now_v7(),
            NewEvent::new("Fair", date("2024-01-10")),
            created,
        );
        event.status = EventStatus::Approved;
        let id = event.id;

        event.apply(
            NewEvent::new("Science Fair", date("2024-01-11")),
            Utc::now(),
        );

        assert_eq!(event.id, id);
        assert_eq!(event.status, EventStatus::Approved);
        assert_eq!(event.created_at, created);
        assert_eq!(event.name, "Science Fair");
        assert_eq!(event.start_date, date("2024-01-11"));
    }
}
