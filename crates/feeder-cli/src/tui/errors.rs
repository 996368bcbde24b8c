//! User-friendly error message formatting.
//!
//! Turns the error text of a notice into a short headline plus an
//! actionable suggestion for the error popup.

/// Convert an error message to a short message with guidance.
///
/// Takes the raw error string and returns a tuple of (short_message, suggestion).
pub fn format_error_with_guidance(error: &str) -> (String, Option<String>) {
    let error_lower = error.to_lowercase();

    // Check the validation wording before anything mentioning "time"
    if error_lower.contains("feed time is required") {
        return (
            "Feed time missing".to_string(),
            Some("Enter a time such as 7:30 or 18:00.".to_string()),
        );
    }

    if error_lower.contains("invalid time") {
        return (
            "Invalid feed time".to_string(),
            Some("Use 24-hour time: H:MM or HH:MM, from 0:00 to 23:59.".to_string()),
        );
    }

    if error_lower.contains("invalid feed size") || error_lower.contains("invalid feed type") {
        return (
            "Invalid schedule entry".to_string(),
            Some("Pick a feed type and a size from 1 to 5.".to_string()),
        );
    }

    if error_lower.contains("not reachable") {
        if error_lower.contains("timed out") || error_lower.contains("timeout") {
            return (
                "Feeder timed out".to_string(),
                Some("The feeder may be busy dispensing. Wait a moment and retry.".to_string()),
            );
        }
        return (
            "Feeder unreachable".to_string(),
            Some(
                "Check that the feeder is powered on and that the URL in your config is correct."
                    .to_string(),
            ),
        );
    }

    if error_lower.contains("motor") {
        return (
            "Motor problem".to_string(),
            Some("The feeder reported a motor fault. Check the hopper for jams.".to_string()),
        );
    }

    if error_lower.contains("sensor unavailable") {
        return (
            "Food sensor unavailable".to_string(),
            Some("The food level cannot be measured. Feeding still works.".to_string()),
        );
    }

    if error_lower.contains("server error 404") {
        return (
            "Feature not supported".to_string(),
            Some("The feeder firmware does not provide this endpoint.".to_string()),
        );
    }

    if error_lower.contains("server error") {
        return ("Feeder rejected the request".to_string(), None);
    }

    if error_lower.contains("malformed response") {
        return (
            "Unexpected reply from feeder".to_string(),
            Some("The feeder firmware may be a different version.".to_string()),
        );
    }

    (error.to_string(), None)
}
