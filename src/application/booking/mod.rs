mod availability;
mod booking_service;
mod eligibility;
mod errors;

pub use availability::{ItemBookingSummary, item_booking_summary, list_bookings, nearest_booking};
pub use booking_service::{ServiceDependencies, decide_booking, get_booking, request_booking};
pub use eligibility::{authorize_comment, has_completed_booking};
pub use errors::{BookingApplicationError, ErrorKind, Result};
