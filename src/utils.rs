use rand::{Rng, distr::Alphanumeric};

use crate::types::{ArtistRef, Image};

pub const SESSION_ID_LEN: usize = 32;

/// Formats a millisecond duration as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours, so an hour is `60:00`.
pub fn format_duration(duration_ms: u64) -> String {
    let minutes = duration_ms / 60_000;
    let seconds = (duration_ms % 60_000) / 1000;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Joins artist names into one display string using `separator`.
///
/// Artists without a name are shown as `Unknown Artist`.
pub fn join_artists(artists: &[ArtistRef], separator: &str) -> String {
    artists
        .iter()
        .map(|a| a.name.as_deref().unwrap_or("Unknown Artist"))
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn first_image(images: &[Image]) -> Option<String> {
    images.first().map(|i| i.url.clone())
}

pub fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}

pub fn is_valid_session_id(id: &str) -> bool {
    id.len() == SESSION_ID_LEN && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Escapes text for safe inclusion in HTML element content and attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
