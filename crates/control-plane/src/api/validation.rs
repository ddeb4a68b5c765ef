// Input size limits for event submissions
//
// Hard limits applied before a submission reaches the scheduling core.
// They are not configurable.

use schedulink_core::{NewEvent, ScheduleCandidate};

use super::error::ApiError;

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum size for the event name.
pub const MAX_EVENT_NAME_BYTES: usize = 2 * 1024; // 2 KB

/// Maximum size for the event description.
pub const MAX_EVENT_DESCRIPTION_BYTES: usize = 10 * 1024; // 10 KB

/// Maximum size for short free-text fields (behalf_of, contact_info, nature_of_event).
pub const MAX_EVENT_TEXT_FIELD_BYTES: usize = 2 * 1024; // 2 KB

/// Maximum number of venues one event may request.
pub const MAX_EVENT_VENUES: usize = 100;

/// Generic validation error message returned to clients.
/// Intentionally vague to avoid leaking which field exceeded limits.
pub const VALIDATION_ERROR_MESSAGE: &str = "Input exceeds allowed limits";

// =============================================================================
// Validation Functions
// =============================================================================

/// Validation error - returns generic message to avoid leaking details
#[derive(Debug)]
pub struct ValidationError;

impl From<ValidationError> for ApiError {
    fn from(_: ValidationError) -> Self {
        ApiError::bad_request(VALIDATION_ERROR_MESSAGE)
    }
}

fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if value.len() > max {
            tracing::warn!(
                "Event {} exceeds limit: {} bytes (max: {})",
                field,
                value.len(),
                max
            );
            return Err(ValidationError);
        }
    }
    Ok(())
}

/// Validate venue count
pub fn validate_venue_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_EVENT_VENUES {
        tracing::warn!(
            "Event venue count exceeds limit: {} (max: {})",
            count,
            MAX_EVENT_VENUES
        );
        return Err(ValidationError);
    }
    Ok(())
}

/// Validate all fields of an event submission
pub fn validate_event_input(input: &NewEvent) -> Result<(), ValidationError> {
    check_len("name", Some(&input.name), MAX_EVENT_NAME_BYTES)?;
    check_len(
        "description",
        input.description.as_deref(),
        MAX_EVENT_DESCRIPTION_BYTES,
    )?;
    for (field, value) in [
        ("behalf_of", &input.behalf_of),
        ("contact_info", &input.contact_info),
        ("nature_of_event", &input.nature_of_event),
    ] {
        check_len(field, value.as_deref(), MAX_EVENT_TEXT_FIELD_BYTES)?;
    }
    validate_venue_count(input.venue_ids.len())
}

/// Validate an advisory conflict check
pub fn validate_candidate_input(candidate: &ScheduleCandidate) -> Result<(), ValidationError> {
    validate_venue_count(candidate.venue_ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn input(name: &str) -> NewEvent {
        NewEvent::new(name, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
    }

    #[test]
    fn test_valid_event_name() {
        assert!(validate_event_input(&input("Science Fair")).is_ok());
        assert!(validate_event_input(&input(&"x".repeat(MAX_EVENT_NAME_BYTES))).is_ok());
    }

    #[test]
    fn test_invalid_event_name() {
        assert!(validate_event_input(&input(&"x".repeat(MAX_EVENT_NAME_BYTES + 1))).is_err());
    }

    #[test]
    fn test_invalid_description() {
        let mut event = input("Fair");
        event.description = Some("x".repeat(MAX_EVENT_DESCRIPTION_BYTES + 1));
        assert!(validate_event_input(&event).is_err());
    }

    #[test]
    fn test_invalid_contact_info() {
        let mut event = input("Fair");
        event.contact_info = Some("x".repeat(MAX_EVENT_TEXT_FIELD_BYTES + 1));
        assert!(validate_event_input(&event).is_err());
    }

    #[test]
    fn test_venue_count_limit() {
        assert!(validate_venue_count(MAX_EVENT_VENUES).is_ok());
        assert!(validate_venue_count(MAX_EVENT_VENUES + 1).is_err());

        let event = input("Fair").with_venues((0..=MAX_EVENT_VENUES).map(|_| Uuid::now_v7()).collect());
        assert!(validate_event_input(&event).is_err());
    }
}
