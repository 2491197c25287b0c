//! Questionnaire phase: four sections, core questions before optional ones.

use serde::Serialize;

use super::catalog::{FieldKey, PRELIMINARY_STEPS, Question, QuestionKind, SECTIONS, Section};
use super::profile::Profile;

/// The question currently being asked.
#[derive(Debug, Clone, Copy)]
pub struct ActiveQuestion {
    pub section: &'static Section,
    pub question: &'static Question,
    pub kind: QuestionKind,
}

/// Completion counts for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionProgress {
    pub section_id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub core_completed: Vec<FieldKey>,
    pub core_total: usize,
    pub optional_completed: Vec<FieldKey>,
    pub optional_total: usize,
}

impl SectionProgress {
    pub fn is_complete(&self) -> bool {
        self.core_completed.len() == self.core_total
            && self.optional_completed.len() == self.optional_total
    }
}

/// The first unanswered question, scanning sections in order and core
/// before optional within each section. `None` once everything is answered.
pub fn current_question(profile: &Profile) -> Option<ActiveQuestion> {
    SECTIONS.iter().find_map(|section| {
        let pending = |questions: &'static [Question], kind| {
            questions
                .iter()
                .find(|q| !profile.has(q.key))
                .map(|question| ActiveQuestion {
                    section,
                    question,
                    kind,
                })
        };
        pending(section.core_questions, QuestionKind::Core)
            .or_else(|| pending(section.optional_questions, QuestionKind::Optional))
    })
}

pub fn is_complete(profile: &Profile) -> bool {
    current_question(profile).is_none()
}

/// Progress for the synthetic preliminary section 0 followed by the four
/// questionnaire sections.
pub fn progress(profile: &Profile) -> Vec<SectionProgress> {
    let answered = |questions: &[Question]| -> Vec<FieldKey> {
        questions
            .iter()
            .filter(|q| profile.has(q.key))
            .map(|q| q.key)
            .collect()
    };

    let mut report = Vec::with_capacity(SECTIONS.len() + 1);
    report.push(SectionProgress {
        section_id: "section_0",
        title: "Section 0: Basic Information",
        description: "Your company and background details",
        core_completed: PRELIMINARY_STEPS
            .iter()
            .filter(|s| profile.has(s.key))
            .map(|s| s.key)
            .collect(),
        core_total: PRELIMINARY_STEPS.len(),
        optional_completed: Vec::new(),
        optional_total: 0,
    });

    report.extend(SECTIONS.iter().map(|section| SectionProgress {
        section_id: section.id,
        title: section.title,
        description: section.description,
        core_completed: answered(section.core_questions),
        core_total: section.core_questions.len(),
        optional_completed: answered(section.optional_questions),
        optional_total: section.optional_questions.len(),
    }));

    report
}
