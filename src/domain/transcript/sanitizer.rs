//! Response sanitization.
//!
//! Models are told to answer with bare JSON but regularly wrap it in code
//! fences or prefix markdown headings. The sanitizer strips exactly those
//! artifacts and then parses strictly: if what is left is not one JSON value,
//! the whole response is rejected.

use serde_json::Value;

use super::errors::SanitizeError;

const FENCE: &str = "```";
const FENCE_LANGUAGE: &str = "json";

/// Strips formatting artifacts from raw model output and parses it as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSanitizer;

impl ResponseSanitizer {
    /// Creates a new sanitizer.
    pub fn new() -> Self {
        Self
    }

    /// Sanitizes and parses a raw model response.
    ///
    /// # Steps
    /// 1. Remove every code fence marker, with or without a `json` tag
    /// 2. Remove leading `#` runs at the start of each line
    /// 3. Trim surrounding whitespace
    /// 4. Parse the remainder as JSON
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError::InvalidJson`] carrying the untouched input when
    /// the cleaned text does not parse.
    pub fn sanitize(&self, raw: &str) -> Result<Value, SanitizeError> {
        let cleaned = self.strip_artifacts(raw);

        serde_json::from_str(&cleaned).map_err(|e| SanitizeError::InvalidJson {
            reason: e.to_string(),
            raw: raw.to_string(),
        })
    }

    /// Returns the text that would be handed to the JSON parser.
    pub fn strip_artifacts(&self, raw: &str) -> String {
        let unfenced = self.remove_fences(raw);
        self.remove_heading_markers(&unfenced).trim().to_string()
    }

    fn remove_fences(&self, s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut rest = s;

        while let Some(idx) = rest.find(FENCE) {
            result.push_str(&rest[..idx]);
            rest = &rest[idx + FENCE.len()..];

            // Language tag directly after the fence, matched case-insensitively
            let tagged = rest
                .get(..FENCE_LANGUAGE.len())
                .is_some_and(|tag| tag.eq_ignore_ascii_case(FENCE_LANGUAGE));
            if tagged {
                rest = &rest[FENCE_LANGUAGE.len()..];
            }
        }

        result.push_str(rest);
        result
    }

    fn remove_heading_markers(&self, s: &str) -> String {
        s.split_inclusive('\n')
            .map(|line| line.trim_start_matches('#'))
            .collect()
    }
}
