//! Metrics collection.
//!
//! # Metrics
//! - `twentysix_messages_submitted_total` (counter): submissions by type, status
//! - `twentysix_search_pages_total` (counter): pages fetched by paginated search
//! - `twentysix_confirmation_polls_total` (counter): fetches made while waiting
//! - `twentysix_requests_failed_total` (counter): transport failures by endpoint

use metrics::counter;

use crate::message::MessageType;

pub fn record_submission(message_type: MessageType, status: &str) {
    counter!(
        "twentysix_messages_submitted_total",
        "type" => message_type.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_search_page() {
    counter!("twentysix_search_pages_total").increment(1);
}

pub fn record_confirmation_poll() {
    counter!("twentysix_confirmation_polls_total").increment(1);
}

pub fn record_request_failure(endpoint: &'static str) {
    counter!("twentysix_requests_failed_total", "endpoint" => endpoint).increment(1);
}
