// Conflict detection
//
// One detector serves every call site: the advisory check, the submission
// gate, approval and the approval fanout. Two events conflict when their
// date ranges overlap, they share a venue and their event windows overlap.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::{Result, SchedulingError};
use crate::event::{format_time, hhmm, DateRange, Event, EventStatus, TimeWindow};
use crate::traits::{EventStore, VenueRegistry};
use crate::venue::VenueRef;

/// The scheduling-relevant part of an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ScheduleCandidate {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub venue_ids: Vec<Uuid>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "10:00"))]
    pub event_start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "11:00"))]
    pub event_end_time: Option<NaiveTime>,
}

impl ScheduleCandidate {
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn window(&self) -> Option<TimeWindow> {
        TimeWindow::from_bounds(self.event_start_time, self.event_end_time)
    }

    /// Whether the detector has enough information to find anything
    pub fn is_checkable(&self) -> bool {
        !self.venue_ids.is_empty() && self.window().is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                return Err(SchedulingError::validation(
                    "End date must not be before start date",
                ));
            }
        }
        match (self.event_start_time, self.event_end_time) {
            (Some(start), Some(end)) if end <= start => Err(SchedulingError::validation(
                "Event end time must be after event start time",
            )),
            (Some(_), None) | (None, Some(_)) => Err(SchedulingError::validation(
                "Event start and end times must be provided together",
            )),
            _ => Ok(()),
        }
    }
}

/// An approved (or pending, during fanout) event that collides with a candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Conflict {
    pub event_id: Uuid,
    pub event_name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "11:00"))]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "12:00"))]
    pub end_time: NaiveTime,
    pub venues: Vec<VenueRef>,
    pub message: String,
}

impl Conflict {
    pub fn new(existing: &Event, window: TimeWindow, venues: Vec<VenueRef>) -> Self {
        let message = format!(
            "This event conflicts with \"{}\" on {} from {} to {} at {}",
            existing.name,
            existing.start_date,
            format_time(window.start),
            format_time(window.end),
            join_venue_names(&venues),
        );
        Self {
            event_id: existing.id,
            event_name: existing.name.clone(),
            date: existing.start_date,
            start_time: window.start,
            end_time: window.end,
            venues,
            message,
        }
    }

    pub fn venue_names(&self) -> String {
        join_venue_names(&self.venues)
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

fn join_venue_names(venues: &[VenueRef]) -> String {
    venues
        .iter()
        .map(|venue| venue.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Venues shared by two colliding schedules; empty when they do not collide
///
/// Both sides need a complete event window. Order follows the candidate's
/// venue list with duplicates removed.
pub fn conflicting_venues(candidate: &ScheduleCandidate, existing: &Event) -> Vec<Uuid> {
    let (Some(window), Some(existing_window)) = (candidate.window(), existing.event_window())
    else {
        return Vec::new();
    };
    if !candidate.date_range().overlaps(&existing.date_range())
        || !window.overlaps(&existing_window)
    {
        return Vec::new();
    }

    let mut shared = Vec::new();
    for venue_id in &candidate.venue_ids {
        if existing.venue_ids.contains(venue_id) && !shared.contains(venue_id) {
            shared.push(*venue_id);
        }
    }
    shared
}

// ============================================================================
// ConflictDetector
// ============================================================================

/// Store-backed conflict detector
#[derive(Clone)]
pub struct ConflictDetector {
    events: Arc<dyn EventStore>,
    venues: Arc<dyn VenueRegistry>,
}

impl ConflictDetector {
    pub fn new(events: Arc<dyn EventStore>, venues: Arc<dyn VenueRegistry>) -> Self {
        Self { events, venues }
    }

    /// Conflicts with approved events
    pub async fn find_conflicts(
        &self,
        candidate: &ScheduleCandidate,
        exclude_event_id: Option<Uuid>,
    ) -> Result<Vec<Conflict>> {
        self.find_conflicts_in(EventStatus::Approved, candidate, exclude_event_id)
            .await
    }

    /// Conflicts with events in the given status
    ///
    /// Results are ordered by start date, then event id.
    pub async fn find_conflicts_in(
        &self,
        scope: EventStatus,
        candidate: &ScheduleCandidate,
        exclude_event_id: Option<Uuid>,
    ) -> Result<Vec<Conflict>> {
        if !candidate.is_checkable() {
            return Ok(Vec::new());
        }

        let range = candidate.date_range();
        let mut existing = match scope {
            EventStatus::Approved => {
                self.events
                    .approved_events_overlapping(range, exclude_event_id)
                    .await?
            }
            EventStatus::Pending => {
                self.events
                    .pending_events_overlapping(range, exclude_event_id)
                    .await?
            }
            EventStatus::Declined => {
                self.events
                    .events_overlapping(scope, range, exclude_event_id)
                    .await?
            }
        };
        existing.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));

        let mut conflicts = Vec::new();
        for event in existing
            .iter()
            .filter(|event| Some(event.id) != exclude_event_id)
        {
            let shared = conflicting_venues(candidate, event);
            let Some(window) = event.event_window() else {
                continue;
            };
            if shared.is_empty() {
                continue;
            }

            let names = self.venues.venue_names(&shared).await?;
            let venues = shared
                .iter()
                .map(|id| VenueRef {
                    id: *id,
                    name: names.get(id).cloned().unwrap_or_else(|| id.to_string()),
                })
                .collect();
            conflicts.push(Conflict::new(event, window, venues));
        }

        if !conflicts.is_empty() {
            tracing::info!(
                scope = %scope,
                count = conflicts.len(),
                "Schedule conflicts detected"
            );
        }
        Ok(conflicts)
    }

    /// First conflict with an approved event, if any
    pub async fn first_conflict(
        &self,
        candidate: &ScheduleCandidate,
        exclude_event_id: Option<Uuid>,
    ) -> Result<Option<Conflict>> {
        Ok(self
            .find_conflicts(candidate, exclude_event_id)
            .await?
            .into_iter()
            .next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{parse_time, NewEvent};
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        parse_time(s).unwrap()
    }

    fn approved(input: NewEvent) -> Event {
        let mut event = Event::pending(Uuid::now_v7(), input, Utc::now());
        event.status = EventStatus::Approved;
        event
    }

    #[test]
    fn test_disjoint_venues_never_conflict() {
        let hall = Uuid::now_v7();
        let gym = Uuid::now_v7();
        let existing = approved(
            NewEvent::new("Assembly", date("2024-01-10"))
                .with_venues(vec![hall])
                .with_event_time(time("10:00"), time("12:00")),
        );
        let candidate = NewEvent::new("Practice", date("2024-01-10"))
            .with_venues(vec![gym])
            .with_event_time(time("10:00"), time("12:00"))
            .schedule();

        assert!(conflicting_venues(&candidate, &existing).is_empty());
    }

    #[test]
    fn test_shared_venues_keep_candidate_order_without_duplicates() {
        let hall = Uuid::now_v7();
        let gym = Uuid::now_v7();
        let lab = Uuid::now_v7();
        let existing = approved(
            NewEvent::new("Expo", date("2024-01-10"))
                .with_venues(vec![hall, gym])
                .with_event_time(time("10:00"), time("12:00")),
        );
        let candidate = NewEvent::new("Fair", date("2024-01-10"))
            .with_venues(vec![gym, lab, gym, hall])
            .with_event_time(time("11:00"), time("13:00"))
            .schedule();

        assert_eq!(conflicting_venues(&candidate, &existing), vec![gym, hall]);
    }

    #[test]
    fn test_missing_times_never_conflict() {
        let hall = Uuid::now_v7();
        let untimed = approved(NewEvent::new("Open House", date("2024-01-10")).with_venues(vec![hall]));
        let candidate = NewEvent::new("Fair", date("2024-01-10"))
            .with_venues(vec![hall])
            .with_event_time(time("09:00"), time("17:00"))
            .schedule();

        assert!(conflicting_venues(&candidate, &untimed).is_empty());
    }

    #[test]
    fn test_conflict_message() {
        let hall = Uuid::now_v7();
        let existing = approved(
            NewEvent::new("Assembly", date("2024-01-10"))
                .with_venues(vec![hall])
                .with_event_time(time("11:00"), time("12:00")),
        );
        let conflict = Conflict::new(
            &existing,
            existing.event_window().unwrap(),
            vec![VenueRef {
                id: hall,
                name: "Main Hall".to_string(),
            }],
        );

        assert_eq!(
            conflict.to_string(),
            "This event conflicts with \"Assembly\" on 2024-01-10 from 11:00 to 12:00 at Main Hall"
        );
        let json = serde_json::to_value(&conflict).unwrap();
        assert_eq!(json["start_time"], "11:00");
        assert_eq!(json["venues"][0]["name"], "Main Hall");
    }

    #[test]
    fn test_candidate_validation() {
        let ok = ScheduleCandidate {
            start_date: date("2024-01-10"),
            end_date: Some(date("2024-01-10")),
            venue_ids: vec![],
            event_start_time: None,
            event_end_time: None,
        };
        assert!(ok.validate().is_ok());
        assert!(!ok.is_checkable());

        let zero_length = ScheduleCandidate {
            event_start_time: Some(time("10:00")),
            event_end_time: Some(time("10:00")),
            ..ok
        };
        assert!(zero_length.validate().is_err());
    }
}
