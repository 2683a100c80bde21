use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::calendar::{build_ics, PublishingMode};
use crate::error::{AppError, Result};
use crate::mail::{EmailTransport, OutgoingEmail};
use crate::models::{ApiResponse, InvitePayload};
use crate::validate::validate_payload;

/// The invitation pipeline: validate, build the two calendar documents,
/// send to the recipients, then send the organizer their own copy.
pub struct InviteService {
    transport: Arc<dyn EmailTransport>,
}

impl InviteService {
    pub fn new(transport: Arc<dyn EmailTransport>) -> Self {
        Self { transport }
    }

    /// Handle one invite request end to end.
    ///
    /// Steps run strictly in order and never retry; the first failure aborts
    /// the rest. The temp files backing the calendar attachments live on the
    /// stack of this call, so they are removed on every exit path.
    pub async fn handle(&self, payload: &InvitePayload) -> Result<ApiResponse> {
        let violations = validate_payload(payload);
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        let recipients: Vec<String> = payload.users.iter().map(|u| u.email.clone()).collect();

        let mut attendee_doc: Option<NamedTempFile> = None;
        let mut organizer_doc: Option<NamedTempFile> = None;

        if let Some(event) = &payload.invitation {
            let attendees: BTreeMap<String, String> = payload
                .users
                .iter()
                .map(|u| (u.email.clone(), u.full_name.clone()))
                .collect();

            // Two documents from the same event data: REQUEST for attendees,
            // PUBLISH so the organizer's client files the event without
            // asking them to respond to their own invitation.
            let now = Utc::now();
            let attendee_ics = build_ics(event, &attendees, PublishingMode::Request, now)?;
            let organizer_ics = build_ics(event, &attendees, PublishingMode::Publish, now)?;

            attendee_doc = Some(write_ics_file(&attendee_ics)?);
            organizer_doc = Some(write_ics_file(&organizer_ics)?);
        }

        let message_id = self
            .transport
            .send(&OutgoingEmail {
                subject: &payload.email_subject,
                body: &payload.email_body,
                is_html: payload.email_is_html,
                recipients: &recipients,
                attachment: attendee_doc.as_ref().map(|file| file.path()),
            })
            .await?;
        tracing::info!(
            recipients = recipients.len(),
            message_id = %message_id,
            "invite emails sent"
        );

        if let (Some(event), Some(doc)) = (&payload.invitation, &organizer_doc) {
            let organizer = vec![event.organizer_email.clone()];
            let message_id = self
                .transport
                .send(&OutgoingEmail {
                    subject: &payload.email_subject,
                    body: &payload.email_body,
                    is_html: payload.email_is_html,
                    recipients: &organizer,
                    attachment: Some(doc.path()),
                })
                .await?;
            tracing::info!(
                organizer = %event.organizer_email,
                message_id = %message_id,
                "organizer copy sent"
            );
        }

        for doc in [attendee_doc, organizer_doc].into_iter().flatten() {
            if let Err(err) = doc.close() {
                tracing::warn!(error = %err, "could not remove calendar temp file");
            }
        }

        Ok(ApiResponse::sent_ok())
    }
}

/// Persist serialized calendar text to an ephemeral `.ics` file. The file
/// disappears when the returned handle is closed or dropped.
fn write_ics_file(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".ics").tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}
