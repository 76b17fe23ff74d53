use crate::application::ports::CompletionRequest;
use crate::domain::EnhancementKind;

pub const SUMMARY_WORD_BUDGET: usize = 150;

/// Output up to this multiple of the budget is accepted untouched.
const WORD_BUDGET_TOLERANCE: f64 = 1.2;

const CLEANUP_SYSTEM_PROMPT: &str = "You clean up raw speech-to-text transcripts.
Rules:
- Correct only clear transcription mistakes (misheard words, broken words).
- Fix punctuation and capitalization.
- Remove filler words such as \"um\", \"uh\", \"like\" and \"you know\" when they carry no meaning.
- Add paragraph breaks where the speaker changes topic.
- Never paraphrase, summarize, reorder or add content. Keep the speaker's wording.
- The result must be verifiable against the source word by word.
Return only the cleaned transcript, with no preamble or commentary.";

const SUMMARY_SYSTEM_PROMPT: &str = "You summarize voice note transcripts.
Write Markdown using these sections:
## Main Topic
One or two sentences. Always present.
## Key Points
Bullets. Only if the transcript contains distinct points.
## Action Items
Bullets. Only if the speaker mentions tasks, commitments or deadlines.
## Important Details
Bullets. Only for names, dates, numbers or places that matter.
Omit any section that would be empty. Do not invent facts that are not in the transcript.
Keep the whole summary under 150 words.";

/// Per-kind generation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhancementProfile {
    pub kind: EnhancementKind,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: &'static str,
    pub word_budget: Option<usize>,
}

impl EnhancementProfile {
    pub fn for_kind(kind: EnhancementKind) -> Self {
        match kind {
            EnhancementKind::Cleanup => Self {
                kind,
                temperature: 0.15,
                max_tokens: 8000,
                system_prompt: CLEANUP_SYSTEM_PROMPT,
                word_budget: None,
            },
            EnhancementKind::Summary => Self {
                kind,
                temperature: 0.3,
                max_tokens: 512,
                system_prompt: SUMMARY_SYSTEM_PROMPT,
                word_budget: Some(SUMMARY_WORD_BUDGET),
            },
        }
    }

    pub fn request(&self, transcript: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt: self.system_prompt.to_string(),
            user_prompt: format!("Transcript:\n\n{}", transcript),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Trims the model output and enforces the word budget, if any.
    pub fn post_process(&self, output: &str) -> String {
        let trimmed = output.trim();
        match self.word_budget {
            Some(budget) => enforce_word_budget(trimmed, budget),
            None => trimmed.to_string(),
        }
    }
}

/// Leaves text within tolerance alone; otherwise cuts it to `budget` words
/// and appends an ellipsis.
pub fn enforce_word_budget(text: &str, budget: usize) -> String {
    let words = text.split_whitespace().count();
    let ceiling = (budget as f64 * WORD_BUDGET_TOLERANCE).floor() as usize;
    if words <= ceiling {
        return text.to_string();
    }
    truncate_words(text, budget)
}

/// Keeps the first `limit` words, preserving the original whitespace between them.
pub fn truncate_words(text: &str, limit: usize) -> String {
    let mut words = 0;
    let mut in_word = false;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_word = false;
        } else if !in_word {
            in_word = true;
            words += 1;
            if words > limit {
                return format!("{}...", text[..idx].trim_end());
            }
        }
    }

    text.to_string()
}
