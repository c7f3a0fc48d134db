use crate::error::ValidationError;

/// Maximum chirp length, in characters, measured before redaction.
pub const MAX_CHIRP_LENGTH: usize = 140;
/// Replacement for a redacted word.
pub const REDACTION: &str = "****";
/// Words redacted from chirp bodies, lowercase.
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Admits a chirp body: rejects it when too long, otherwise redacts it.
///
/// # Arguments
///
/// * `body` - The raw chirp body.
///
/// # Returns
///
/// The cleaned body, or `ValidationError::TooLong`.
pub fn filter_chirp(body: &str) -> Result<String, ValidationError> {
    let length = body.chars().count();
    if length > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong {
            length,
            max: MAX_CHIRP_LENGTH,
        });
    }

    Ok(redact_profanity(body))
}

/// Replaces every whole word that matches the denylist with `****`.
///
/// Words are separated by single spaces only, so runs of spaces survive the
/// round trip and punctuation stays attached to its word.
pub fn redact_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| if is_profane(word) { REDACTION } else { word })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_profane(word: &str) -> bool {
    let lowered = word.to_lowercase();
    PROFANE_WORDS.iter().any(|p| *p == lowered)
}
