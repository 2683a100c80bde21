use email_address::EmailAddress;

use crate::models::{CalendarEvent, ErrorField, InvitePayload};

/// One declarative rule: wire field name, error code, predicate.
struct Rule<T> {
    field: &'static str,
    code: &'static str,
    check: fn(&T) -> bool,
}

const PAYLOAD_RULES: &[Rule<InvitePayload>] = &[
    Rule {
        field: "users",
        code: "required",
        check: |p| !p.users.is_empty(),
    },
    Rule {
        field: "email_subject",
        code: "required",
        check: |p| !p.email_subject.is_empty(),
    },
    Rule {
        field: "email_body",
        code: "required",
        check: |p| !p.email_body.is_empty(),
    },
];

const EVENT_RULES: &[Rule<CalendarEvent>] = &[
    Rule {
        field: "start_at",
        code: "required",
        check: |e| !e.start_at.is_empty(),
    },
    Rule {
        field: "end_at",
        code: "required",
        check: |e| !e.end_at.is_empty(),
    },
    Rule {
        field: "organizer_full_name",
        code: "required",
        check: |e| !e.organizer_full_name.is_empty(),
    },
];

/// Validate an invite payload against the schema.
///
/// Pure function, no side effects. Returns every violation (field names use
/// the wire naming); an empty vec means the payload is acceptable.
pub fn validate_payload(payload: &InvitePayload) -> Vec<ErrorField> {
    let mut errors = Vec::new();

    for rule in PAYLOAD_RULES {
        if !(rule.check)(payload) {
            errors.push(ErrorField::new(rule.field, rule.code));
        }
    }

    for user in &payload.users {
        check_email(&mut errors, "email", &user.email);
    }

    if let Some(event) = &payload.invitation {
        for rule in EVENT_RULES {
            if !(rule.check)(event) {
                errors.push(ErrorField::new(rule.field, rule.code));
            }
        }
        check_email(&mut errors, "organizer_email", &event.organizer_email);
    }

    errors
}

/// Required + syntactically valid email address.
fn check_email(errors: &mut Vec<ErrorField>, field: &'static str, value: &str) {
    if value.is_empty() {
        errors.push(ErrorField::new(field, "required"));
    } else if !EmailAddress::is_valid(value) {
        errors.push(ErrorField::new(field, "email"));
    }
}
