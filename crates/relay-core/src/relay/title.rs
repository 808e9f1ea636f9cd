//! Conversation title generation.
//!
//! The conversation is folded into a plain-text transcript (one
//! `User:`/`Assistant:` line per turn, each turn cut to
//! [`MAX_TURN_CHARS`] characters) and embedded in a fixed instruction
//! asking for a 3-6 word title. The model's answer is stripped of all
//! quote characters and surrounding whitespace.

use relay_types::chat::Turn;
use relay_types::llm::{CompletionRequest, Message};

/// System instruction for the title generation call.
pub const TITLE_SYSTEM_PROMPT: &str = "You are a helpful assistant that generates concise, \
descriptive titles for conversations. Return only the title, nothing else.";

/// Title returned when the model produces no usable text.
pub const FALLBACK_TITLE: &str = "New Chat";

/// Maximum number of characters kept from each turn.
pub const MAX_TURN_CHARS: usize = 200;

/// Output cap for the title call.
pub const TITLE_MAX_TOKENS: u32 = 20;

/// Sampling temperature for the title call.
pub const TITLE_TEMPERATURE: f32 = 0.7;

/// First `MAX_TURN_CHARS` characters of a turn's content.
pub fn truncate_content(content: &str) -> &str {
    match content.char_indices().nth(MAX_TURN_CHARS) {
        Some((byte_index, _)) => &content[..byte_index],
        None => content,
    }
}

/// Render the conversation as `User: ...` / `Assistant: ...` lines.
pub fn build_transcript(conversation: &[Turn]) -> String {
    let mut transcript = String::new();
    for turn in conversation {
        let speaker = if turn.is_user() { "User" } else { "Assistant" };
        transcript.push_str(speaker);
        transcript.push_str(": ");
        transcript.push_str(truncate_content(&turn.content));
        transcript.push('\n');
    }
    transcript
}

/// Embed a transcript in the title instruction.
pub fn build_title_prompt(transcript: &str) -> String {
    format!(
        "Based on this conversation, generate a concise, descriptive title (3-6 words) \
that captures the main topic or theme. The title should be professional and clear.

Conversation:
{transcript}

Title:"
    )
}

/// Build the completion request for titling `conversation` with `model`.
pub fn build_title_request(model: &str, conversation: &[Turn]) -> CompletionRequest {
    let prompt = build_title_prompt(&build_transcript(conversation));

    CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::system(TITLE_SYSTEM_PROMPT), Message::user(prompt)],
        max_tokens: Some(TITLE_MAX_TOKENS),
        temperature: Some(TITLE_TEMPERATURE),
    }
}

/// Strip every quote character (`"` and `'`) from the model's answer and
/// trim the surrounding whitespace.
///
/// Falls back to [`FALLBACK_TITLE`] when the answer is absent or nothing
/// is left after cleaning.
pub fn clean_title(raw: Option<&str>) -> String {
    let unquoted: String = raw
        .unwrap_or_default()
        .chars()
        .filter(|c| !matches!(c, '"' | '\''))
        .collect();
    let cleaned = unquoted.trim();

    if cleaned.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        cleaned.to_string()
    }
}
