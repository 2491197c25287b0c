//! System prompts for the intake conversation and the answer-validation call.

use super::catalog::{FieldKey, PRELIMINARY_STEPS, Question, QuestionKind};
use super::orchestrator::Stage;
use super::profile::Profile;
use super::sequencer;

const KEEP_SHORT: &str = "Keep responses concise (1-2 sentences) and conversational.";

/// What happened to the user's reply this turn, as far as the prompt cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The reply was stored under this field.
    Stored(FieldKey),
    /// The reply did not answer the question and nothing was stored.
    Rejected,
    /// There was no open question to answer.
    Unanswerable,
}

/// Build the system prompt for the next assistant message.
///
/// `stage` is the stage *after* this turn's answer was applied, so the model
/// acknowledges the reply and moves on to whatever is now pending.
pub fn system_prompt(stage: &Stage, profile: &Profile, outcome: ReplyOutcome) -> String {
    let mut prompt = match stage {
        Stage::Preliminary(step) => preliminary_prompt(step.key, profile),
        Stage::Questionnaire(active) => questionnaire_prompt(
            active.question,
            active.kind,
            active.section.title,
            active.section.description,
            profile,
        ),
        Stage::Complete => completion_prompt(profile),
    };

    match outcome {
        ReplyOutcome::Rejected => prompt.push_str(
            "\nThe user's last reply did not answer the current question. \
             Briefly and kindly explain what kind of answer you need, then ask the question again.",
        ),
        ReplyOutcome::Stored(FieldKey::Location) => prompt.push_str(
            "\nThe user just completed the initial form. Congratulate them and introduce the \
             business plan checklist: you will now work through a comprehensive business plan \
             with 4 sections covering vision, market, operations, and finances.",
        ),
        ReplyOutcome::Stored(_) | ReplyOutcome::Unanswerable => {}
    }

    prompt
}

fn collected_info(profile: &Profile) -> Vec<String> {
    PRELIMINARY_STEPS
        .iter()
        .filter_map(|s| profile.get(s.key).map(|v| format!("{}: {}", s.label, v)))
        .collect()
}

fn preliminary_prompt(key: FieldKey, profile: &Profile) -> String {
    let Some(step) = PRELIMINARY_STEPS.iter().find(|s| s.key == key) else {
        return completion_prompt(profile);
    };

    let collected = collected_info(profile);
    let context = if collected.is_empty() {
        String::new()
    } else {
        format!("Information collected so far: {}. ", collected.join(", "))
    };

    let next_hint = match sequencer::step_after(key) {
        Some(next) => format!(
            " After collecting this information, you'll ask about: {}",
            next.instruction
        ),
        None => " After collecting this information, the initial form is complete.".to_string(),
    };

    format!(
        "You are a friendly business form assistant helping to collect information. {context}\n\
         Current task: {}{next_hint}\n\
         {KEEP_SHORT}\n\
         Acknowledge their input and naturally move to the next question.",
        step.instruction
    )
}

fn questionnaire_prompt(
    question: &Question,
    kind: QuestionKind,
    section_title: &str,
    section_description: &str,
    profile: &Profile,
) -> String {
    let mut context_parts = Vec::new();
    if let Some(company) = profile.get(FieldKey::CompanyName) {
        context_parts.push(format!("Company: {company}"));
    }
    if let Some(sphere) = profile.get(FieldKey::Sphere) {
        context_parts.push(format!("Business Sphere: {sphere}"));
    }
    let context = if context_parts.is_empty() {
        String::new()
    } else {
        format!("Context: {}. ", context_parts.join(", "))
    };

    let mut instruction = format!("Ask about: {}. {}", question.label, question.guidance);
    if kind == QuestionKind::Optional {
        instruction.push_str(
            " (This is an optional deeper dive question - they can skip if they prefer.)",
        );
    }

    format!(
        "You are a friendly business advisor assistant helping create a comprehensive business plan. {context}\n\
         We're working on {section_title} - {section_description}.\n\
         Current question: {instruction}\n\
         {KEEP_SHORT} Be encouraging and supportive."
    )
}

fn completion_prompt(profile: &Profile) -> String {
    if profile.email().is_none() {
        format!(
            "You are a friendly business advisor assistant. All business plan questions have been completed:\n\
             {}\n\
             Now, please ask for their email address so we can send them a summary report of the information they provided.\n\
             Keep responses concise and conversational.",
            collected_info(profile).join(", ")
        )
    } else {
        "You are a friendly business advisor assistant. All information including email has been collected.\n\
         Thank them for their thorough responses and let them know that a report will be sent to their email address shortly.\n\
         Keep responses concise and conversational."
            .to_string()
    }
}

/// Prompt asking the model for a strict YES/NO verdict on an answer.
pub fn validation_prompt(question: &Question, answer: &str) -> String {
    format!(
        r#"You are validating if a user's answer appropriately addresses a business plan question.

Question: "{label}"
Question context: {guidance}

User's answer: "{answer}"

Determine if the user's answer:
1. Actually addresses the question being asked
2. Provides meaningful information relevant to the question
3. Is not just random numbers, gibberish, or meaningless text
4. Is not just a generic response, question, or unrelated comment
5. Contains actual words or meaningful content (not just digits or symbols)

Examples of INVALID answers:
- Random numbers like "5645646" or "123456"
- Gibberish like "asdfgh" or "qwerty"
- Single words that don't answer the question
- Unrelated comments or questions

Respond with ONLY "YES" if the answer is appropriate and addresses the question, or "NO" if it does not address the question properly or is nonsensical."#,
        label = question.label,
        guidance = question.guidance,
    )
}
