use reqwest::StatusCode;
use thiserror::Error;

/// Resolving a city name to a location identifier failed.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("City name must not be empty")]
    EmptyCity,

    #[error("No location found for '{0}'")]
    NotFound(String),

    #[error("Geocoding request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Geocoding request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse geocoding response: {0}")]
    Parse(String),
}

/// Fetching current conditions for a location identifier failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Weather request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Weather request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse weather response: {0}")]
    Parse(String),

    #[error("Weather response is missing '{0}'")]
    MissingField(&'static str),
}

/// Either stage of the resolve → fetch chain failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Shortens a response body so it can be quoted in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_is_kept() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn long_body_is_cut_on_char_boundary() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.len(), 200 + 3);
    }

    #[test]
    fn pipeline_error_keeps_stage_message() {
        let err: PipelineError = LookupError::NotFound("Zzzzz".into()).into();
        assert_eq!(err.to_string(), "No location found for 'Zzzzz'");
        assert!(matches!(err, PipelineError::Lookup(_)));
    }
}
