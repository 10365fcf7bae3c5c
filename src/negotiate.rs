//! Content negotiation: one preferred content type per response channel.

use crate::types::{ContentDescription, ContentKind, ResponseChoice};

/// Format assumed when an action declares nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultFormat {
    #[default]
    Json,
    Xml,
}

impl DefaultFormat {
    pub fn kind(self) -> ContentKind {
        match self {
            DefaultFormat::Json => ContentKind::Json,
            DefaultFormat::Xml => ContentKind::Xml,
        }
    }
}

/// Pick the first JSON candidate, or else the first candidate.
///
/// Returns `None` only for an empty candidate list.
pub fn choose_type(candidates: &[ContentDescription]) -> Option<&ContentDescription> {
    candidates
        .iter()
        .find(|c| c.kind == ContentKind::Json)
        .or_else(|| candidates.first())
}

/// Reconcile declared outputs and errors into one choice per channel.
///
/// When both channels share content kinds, each channel is restricted to the
/// shared kinds and picks JSON over XML over anything else, keeping
/// declaration order among equals. Otherwise each channel is chosen on its
/// own with [`choose_type`].
pub fn choose_response_type(
    outputs: &[ContentDescription],
    errors: &[ContentDescription],
) -> ResponseChoice {
    if outputs.is_empty() || errors.is_empty() {
        return ResponseChoice {
            error_choice: choose_type(errors).cloned(),
            output_choice: choose_type(outputs).cloned(),
        };
    }

    let shared: Vec<&ContentKind> = outputs
        .iter()
        .map(|o| &o.kind)
        .filter(|kind| errors.iter().any(|e| &e.kind == *kind))
        .collect();

    if shared.is_empty() {
        return ResponseChoice {
            error_choice: choose_type(errors).cloned(),
            output_choice: choose_type(outputs).cloned(),
        };
    }

    ResponseChoice {
        error_choice: preferred_shared(errors, &shared, "error"),
        output_choice: preferred_shared(outputs, &shared, "output"),
    }
}

fn preferred_shared(
    candidates: &[ContentDescription],
    shared: &[&ContentKind],
    channel: &str,
) -> Option<ContentDescription> {
    let choice = candidates
        .iter()
        .filter(|c| shared.contains(&&c.kind))
        .min_by_key(|c| priority(&c.kind))
        .cloned();
    if choice.is_none() {
        tracing::warn!(channel, "no candidate survives the shared content kinds");
    }
    choice
}

fn priority(kind: &ContentKind) -> u8 {
    match kind {
        ContentKind::Json => 0,
        ContentKind::Xml => 1,
        _ => 2,
    }
}

/// Media-type tokens for an accept header.
///
/// Declared kinds come first, in order. The default format's token is
/// appended unless the default kind is itself declared.
///
/// Declaring the other structured kind does not suppress the default: with
/// an XML default, `[Json]` gives `["text/json", "text/xml"]`.
pub fn accept_header_tokens(
    default: DefaultFormat,
    declared: &[ContentKind],
) -> Vec<&'static str> {
    let default_kind = default.kind();
    let mut tokens: Vec<&'static str> = declared.iter().map(ContentKind::media_type).collect();
    if !declared.contains(&default_kind) {
        tokens.push(default_kind.media_type());
    }
    tokens
}
