//! Answer validation: cheap text heuristics first, then an optional semantic
//! check by the language model.
//!
//! The heuristics look only at ASCII letters. Replies written in a non-Latin
//! script have fewer than four such letters and are never flagged as
//! gibberish; they are left to the semantic check.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use super::catalog::{PreliminaryStep, Question};
use super::prompts::validation_prompt;
use super::sequencer;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider, complete_with_timeout};

const VALIDATION_TEMPERATURE: f32 = 0.3;
const VALIDATION_MAX_TOKENS: u32 = 10;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

const COMMON_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go", "me", "when", "make",
    "can", "like", "time", "no", "just", "him", "know", "take", "people", "into", "year",
    "your", "good", "some", "could", "them", "see", "other", "than", "then", "now", "look",
    "only", "come", "its", "over", "think", "also", "back", "after", "use", "two", "how", "our",
    "work", "first", "well", "way", "even", "new", "want", "because", "any", "these", "give",
    "day", "most", "us", "is", "are", "was", "were", "has", "had", "been", "being", "does",
    "did", "should", "may", "might", "must", "cannot", "shall", "ought",
];

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]+\b").expect("word pattern is valid"));

/// Why a reply was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    TooShort,
    Numeric,
    Repetitive,
    Gibberish,
    BelowMinimum,
    OffTopic,
}

/// Outcome of validating one reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
    /// The semantic check could not run; `fallback_accepted` tells whether
    /// the reply was let through anyway.
    CollaboratorUnavailable { fallback_accepted: bool },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        match self {
            Self::Accepted => true,
            Self::Rejected(_) => false,
            Self::CollaboratorUnavailable { fallback_accepted } => *fallback_accepted,
        }
    }

    /// Short label used in turn responses and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected(_) => "rejected",
            Self::CollaboratorUnavailable { .. } => "degraded",
        }
    }
}

/// Generic rejection rules, applied in order. The first match wins.
pub fn check_heuristics(text: &str) -> Result<(), RejectReason> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();

    if len < 2 {
        return Err(RejectReason::TooShort);
    }

    let compact: String = trimmed.chars().filter(|c| *c != ' ').collect();
    if compact.chars().count() > 3 && compact.chars().all(|c| c.is_ascii_digit()) {
        return Err(RejectReason::Numeric);
    }

    let mut distinct: Vec<char> = compact.chars().collect();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() < 3 && len > 5 {
        return Err(RejectReason::Repetitive);
    }

    if is_gibberish(trimmed) {
        return Err(RejectReason::Gibberish);
    }

    Ok(())
}

/// Heuristic gibberish detector over the lowercase ASCII-letter projection.
pub fn is_gibberish(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    if lower.chars().count() < 4 {
        return false;
    }

    let alpha: Vec<char> = lower.chars().filter(|c| c.is_ascii_lowercase()).collect();
    let alpha_len = alpha.len();
    if alpha_len < 4 {
        return false;
    }

    let vowel_count = alpha.iter().filter(|c| VOWELS.contains(c)).count();
    let consonant_count = alpha_len - vowel_count;
    if consonant_count > 0 {
        let vowel_ratio = vowel_count as f64 / alpha_len as f64;
        if vowel_ratio < 0.15 && alpha_len > 5 {
            return true;
        }
    }

    let words: Vec<&str> = WORD_RE.find_iter(&lower).map(|m| m.as_str()).collect();
    let common = words.iter().filter(|w| COMMON_WORDS.contains(w)).count();
    if words.len() > 2 && common == 0 && alpha_len > 8 {
        return true;
    }

    let mut run = 0usize;
    let mut longest_run = 0usize;
    for c in &alpha {
        if VOWELS.contains(c) {
            run = 0;
        } else {
            run += 1;
            longest_run = longest_run.max(run);
        }
    }
    longest_run >= 5 && alpha_len > 5
}

/// Judges whether a reply answers the question being asked.
pub struct AnswerValidator {
    llm: Option<Arc<dyn LlmProvider>>,
    timeout: Duration,
}

impl AnswerValidator {
    /// A validator that also asks `llm` for a semantic YES/NO verdict.
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            llm: Some(llm),
            timeout,
        }
    }

    /// Heuristics only.
    pub fn heuristic_only() -> Self {
        Self {
            llm: None,
            timeout: Duration::ZERO,
        }
    }

    /// Minimum-content policy for a preliminary step. The generic rules do
    /// not apply here, so a single-digit number of years is accepted.
    pub fn validate_step(&self, step: &PreliminaryStep, text: &str) -> Verdict {
        if sequencer::meets_minimum(step, text) {
            Verdict::Accepted
        } else {
            Verdict::Rejected(RejectReason::BelowMinimum)
        }
    }

    /// Validate a questionnaire answer.
    pub async fn validate(&self, text: &str, question: &Question) -> Verdict {
        if let Err(reason) = check_heuristics(text) {
            debug!(field = %question.key, ?reason, "Answer rejected by heuristics");
            return Verdict::Rejected(reason);
        }

        let Some(llm) = &self.llm else {
            return Verdict::Accepted;
        };

        let request = CompletionRequest::new(vec![
            ChatMessage::system(validation_prompt(question, text)),
            ChatMessage::user("Validate this answer."),
        ])
        .with_temperature(VALIDATION_TEMPERATURE)
        .with_max_tokens(VALIDATION_MAX_TOKENS);

        match complete_with_timeout(llm.as_ref(), request, self.timeout).await {
            Ok(response) => {
                let reply = response.content.trim().to_uppercase();
                if reply.starts_with("YES") {
                    Verdict::Accepted
                } else if reply.starts_with("NO") {
                    debug!(field = %question.key, "Answer rejected by semantic check");
                    Verdict::Rejected(RejectReason::OffTopic)
                } else {
                    warn!(
                        field = %question.key,
                        reply = %response.content,
                        "Unexpected validation reply, accepting answer"
                    );
                    Verdict::CollaboratorUnavailable {
                        fallback_accepted: true,
                    }
                }
            }
            Err(e) => {
                warn!(
                    field = %question.key,
                    error = %e,
                    "Semantic validation failed, accepting answer"
                );
                Verdict::CollaboratorUnavailable {
                    fallback_accepted: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::LlmError;
    use crate::intake::catalog::{FieldKey, PRELIMINARY_STEPS, SECTIONS};
    use crate::llm::CompletionResponse;

    struct ScriptedLlm {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmProvider for ScriptedLlm {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            if let Some(prompt) = request.system_prompt() {
                self.prompts.lock().unwrap().push(prompt.to_string());
            }
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    content: text.clone(),
                    input_tokens: 0,
                    output_tokens: 0,
                }),
                Err(()) => Err(LlmError::RequestFailed {
                    provider: "scripted".to_string(),
                    reason: "quota exceeded".to_string(),
                }),
            }
        }
    }

    fn question() -> &'static Question {
        &SECTIONS[0].core_questions[0]
    }

    #[test]
    fn rejects_short_messages() {
        assert_eq!(check_heuristics(""), Err(RejectReason::TooShort));
        assert_eq!(check_heuristics(" a "), Err(RejectReason::TooShort));
    }

    #[test]
    fn rejects_long_numbers() {
        assert_eq!(check_heuristics("123456"), Err(RejectReason::Numeric));
        assert_eq!(check_heuristics("12 34"), Err(RejectReason::Numeric));
        assert_eq!(check_heuristics("5645646"), Err(RejectReason::Numeric));
        assert!(check_heuristics("123").is_ok());
    }

    #[test]
    fn rejects_repetitive_noise() {
        assert_eq!(check_heuristics("aaaaaa"), Err(RejectReason::Repetitive));
        assert_eq!(check_heuristics("ab ab ab"), Err(RejectReason::Repetitive));
    }

    #[test]
    fn gibberish_examples() {
        assert!(is_gibberish("asdfgh"));
        assert!(is_gibberish("qwrtypsdfg"));
        assert!(is_gibberish("blorp fnord quazzle"));
        assert!(!is_gibberish("hello there friend"));
        assert!(!is_gibberish("bakery"));
        assert!(!is_gibberish("abc"));
    }

    #[test]
    fn non_latin_text_is_not_gibberish() {
        assert!(!is_gibberish("Продаю домашний хлеб"));
        assert!(!is_gibberish("パン屋を開きたい"));
    }

    #[test]
    fn consonant_run_spans_word_boundaries() {
        // "supply contract" projects to "...pplyc..." once spaces are dropped.
        assert_eq!(
            check_heuristics("A two year supply contract with the local mill"),
            Err(RejectReason::Gibberish)
        );
        assert!(check_heuristics("Supplier agreement with the local mill for our flour").is_ok());
    }

    #[tokio::test]
    async fn accented_and_non_latin_answers_pass_heuristics() {
        // Accented letters drop out of the projection: "Café à Paris" is seen as "cafparis".
        let validator = AnswerValidator::heuristic_only();
        for answer in ["Café à Paris", "Продаю домашний хлеб в Москве"] {
            assert_eq!(
                validator.validate(answer, question()).await,
                Verdict::Accepted,
                "{answer}"
            );
        }
    }

    #[test]
    fn accepts_reasonable_answer() {
        assert!(check_heuristics("I will sell bread to the people of my town").is_ok());
    }

    #[test]
    fn step_policy_overrides_generic_rules() {
        let validator = AnswerValidator::heuristic_only();
        let experience = PRELIMINARY_STEPS
            .iter()
            .find(|s| s.key == FieldKey::Experience)
            .unwrap();
        assert_eq!(validator.validate_step(experience, "5"), Verdict::Accepted);
        assert_eq!(
            validator.validate_step(&PRELIMINARY_STEPS[0], "A"),
            Verdict::Rejected(RejectReason::BelowMinimum)
        );
    }

    #[tokio::test]
    async fn heuristic_only_accepts_without_llm() {
        let validator = AnswerValidator::heuristic_only();
        let verdict = validator
            .validate("Handmade bread for local cafes", question())
            .await;
        assert_eq!(verdict, Verdict::Accepted);
    }

    #[tokio::test]
    async fn semantic_yes_accepts() {
        let llm = ScriptedLlm::replying("YES");
        let validator = AnswerValidator::new(llm.clone(), Duration::from_secs(1));
        let verdict = validator
            .validate("Handmade bread for local cafes", question())
            .await;
        assert_eq!(verdict, Verdict::Accepted);

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Your Business Idea"));
        assert!(prompts[0].contains("Handmade bread for local cafes"));
    }

    #[tokio::test]
    async fn semantic_no_rejects() {
        let validator = AnswerValidator::new(ScriptedLlm::replying("no."), Duration::from_secs(1));
        let verdict = validator.validate("What time is it there?", question()).await;
        assert_eq!(verdict, Verdict::Rejected(RejectReason::OffTopic));
        assert!(!verdict.is_accepted());
    }

    #[tokio::test]
    async fn collaborator_failure_fails_open() {
        let validator = AnswerValidator::new(ScriptedLlm::failing(), Duration::from_secs(1));
        let verdict = validator
            .validate("Handmade bread for local cafes", question())
            .await;
        assert_eq!(
            verdict,
            Verdict::CollaboratorUnavailable {
                fallback_accepted: true
            }
        );
        assert!(verdict.is_accepted());
        assert_eq!(verdict.label(), "degraded");
    }

    #[tokio::test]
    async fn heuristics_run_before_llm() {
        let llm = ScriptedLlm::replying("YES");
        let validator = AnswerValidator::new(llm.clone(), Duration::from_secs(1));
        let verdict = validator.validate("123456", question()).await;
        assert_eq!(verdict, Verdict::Rejected(RejectReason::Numeric));
        assert!(llm.prompts.lock().unwrap().is_empty());
    }
}
