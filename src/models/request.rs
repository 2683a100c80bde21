use serde::Deserialize;

/// Inbound body for `POST /invite/`.
///
/// Every field deserializes with a default so that missing keys reach the
/// validator (which reports them as structured field errors) instead of
/// failing JSON decoding.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct InvitePayload {
    #[serde(default)]
    pub users: Vec<InviteUser>,
    #[serde(default)]
    pub invitation: Option<CalendarEvent>,
    #[serde(default)]
    pub email_subject: String,
    #[serde(default)]
    pub email_body: String,
    #[serde(default)]
    pub email_is_html: bool,
}

/// One invite recipient
#[derive(Debug, Clone, Deserialize, Default)]
pub struct InviteUser {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
}

/// Event details used to build the iCalendar attachments.
///
/// `start_at`/`end_at` stay as strings on the wire; the calendar builder
/// parses them as RFC 3339 and treats a bad value as a fatal request error.
/// `start_at <= end_at` is intentionally left to the caller.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CalendarEvent {
    #[serde(default)]
    pub start_at: String,
    #[serde(default)]
    pub end_at: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub organizer_full_name: String,
    #[serde(default)]
    pub organizer_email: String,
}
