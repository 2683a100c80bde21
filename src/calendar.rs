use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, Event, EventLike, Property};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::CalendarEvent;

/// iCalendar METHOD for a generated document.
///
/// A single document cannot both ask attendees to respond and tell the
/// organizer's client the event is already theirs, so one document is built
/// per audience (RFC 2446 §3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishingMode {
    /// Attendee copy: carries RSVP semantics.
    Request,
    /// Organizer copy: published notice, no confirmation re-requested.
    Publish,
}

impl PublishingMode {
    fn method(self) -> &'static str {
        match self {
            PublishingMode::Request => "REQUEST",
            PublishingMode::Publish => "PUBLISH",
        }
    }
}

/// Build the serialized iCalendar text for one event and attendee set.
///
/// `start_at`/`end_at` are parsed as RFC 3339 here; a bad value is fatal for
/// the whole request. `now` is injected so the caller controls DTSTAMP and
/// CREATED; each call still gets a fresh UID. No file I/O happens here.
pub fn build_ics(
    event: &CalendarEvent,
    attendees: &BTreeMap<String, String>,
    mode: PublishingMode,
    now: DateTime<Utc>,
) -> Result<String> {
    let start_at = parse_rfc3339("start_at", &event.start_at)?;
    let end_at = parse_rfc3339("end_at", &event.end_at)?;

    let uid = format!("{}{}", Uuid::new_v4(), event.organizer_email);

    let mut component = Event::new();
    component
        .uid(&uid)
        .timestamp(now)
        .starts(start_at)
        .ends(end_at)
        .summary(&event.summary)
        .description(&event.description)
        .location(&event.location)
        .add_property("TRANSP", "OPAQUE")
        .add_property("CREATED", &now.format("%Y%m%dT%H%M%SZ").to_string())
        .append_property(
            Property::new("ORGANIZER", &format!("mailto:{}", event.organizer_email))
                .add_parameter("CN", &event.organizer_full_name)
                .done(),
        );

    // Both modes embed the attendee list; in PUBLISH it is informational only.
    for (email, full_name) in attendees {
        component.append_multi_property(
            Property::new("ATTENDEE", &format!("mailto:{}", email))
                .add_parameter("CN", full_name)
                .add_parameter("CUTYPE", "INDIVIDUAL")
                .add_parameter("PARTSTAT", "NEEDS-ACTION")
                .add_parameter("ROLE", "REQ-PARTICIPANT")
                .add_parameter("RSVP", "TRUE")
                .done(),
        );
    }

    let mut calendar = Calendar::new();
    calendar.append_property(Property::new("METHOD", mode.method()));
    calendar.push(component.done());

    Ok(calendar.to_string())
}

fn parse_rfc3339(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::CalendarBuild(format!("cannot parse {} value: {}", field, value)))
}
