use surrealdb::Response;

const NOT_EXECUTED_MARKER: &str = "not executed due to a failed transaction";
const RETRYABLE_MARKER: &str = "can be retried";
const RECORD_EXISTS_MARKER: &str = "already exists";
const UNIQUE_INDEX_MARKER: &str = "already contains";

/// Drains statement errors in statement order.
/// Follow-up "not executed" errors of a failed transaction are dropped when the cause is present.
pub fn take_error_messages(response: &mut Response) -> Vec<String> {
    let mut errors: Vec<(usize, surrealdb::Error)> = response.take_errors().into_iter().collect();
    errors.sort_by_key(|(index, _)| *index);
    let messages: Vec<String> = errors.into_iter().map(|(_, err)| err.to_string()).collect();
    let causes: Vec<String> = messages
        .iter()
        .filter(|msg| !msg.contains(NOT_EXECUTED_MARKER))
        .cloned()
        .collect();
    if causes.is_empty() {
        messages
    } else {
        causes
    }
}

pub fn is_retryable_conflict(message: &str) -> bool {
    message.contains(RETRYABLE_MARKER)
}

pub fn is_record_exists(message: &str) -> bool {
    message.contains(RECORD_EXISTS_MARKER)
}

pub fn is_unique_violation(message: &str) -> bool {
    message.contains(UNIQUE_INDEX_MARKER)
}
