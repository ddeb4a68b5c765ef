// Scheduling core
//
// This crate holds the DB-agnostic scheduling engine: domain types, the
// conflict detector and the workflows that submit, approve and decline events.
//
// Key design decisions:
// - Storage and broadcast sit behind traits (EventStore, VenueRegistry, ...)
// - One ConflictDetector serves the advisory check, submission and approval
// - Approve and update run under a process-wide ScheduleLock
// - Fanout after an approval is best-effort and never rolls back the commit

// Domain entity types
pub mod event;
pub mod notification;
pub mod venue;

pub mod approval;
pub mod booking;
pub mod broadcast;
pub mod conflict;
pub mod error;
pub mod lock;
pub mod submission;
pub mod traits;

// In-memory implementations for dev mode and testing
pub mod memory;

// Re-exports for convenience
pub use approval::{ApprovalOutcome, ApprovalWorkflow, DeclineOutcome, EVENT_APPROVED_MESSAGE};
pub use booking::ResourceBooking;
pub use broadcast::{BroadcastHub, BroadcastKind, BroadcastMessage, Broadcaster};
pub use conflict::{conflicting_venues, Conflict, ConflictDetector, ScheduleCandidate};
pub use error::{Result, SchedulingError};
pub use event::{DateRange, Event, EventStatus, NewEvent, TimeWindow};
pub use lock::ScheduleLock;
pub use notification::{NewNotification, Notification, NotificationStatus, NotificationType};
pub use submission::EventSubmission;
pub use traits::{EventStore, NotificationStore, ResourceStore, ScheduleStores, VenueRegistry};
pub use venue::{Resource, Venue, VenueRef};
