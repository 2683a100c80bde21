pub mod request;
pub mod response;

pub use request::{CalendarEvent, InvitePayload, InviteUser};
pub use response::{ApiResponse, ErrorField};
