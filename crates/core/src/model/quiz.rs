use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::{NewQuestion, Question, QuestionDraft, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    MissingTitle,

    #[error("question {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

impl QuizError {
    /// The offending question error, if any.
    #[must_use]
    pub fn question_error(&self) -> Option<&QuestionError> {
        match self {
            QuizError::Question { source, .. } => Some(source),
            QuizError::MissingTitle => None,
        }
    }

    #[must_use]
    pub fn is_invalid_question_type(&self) -> bool {
        matches!(self.question_error(), Some(QuestionError::InvalidType(_)))
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated quiz input: a title and the questions in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct QuizDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

impl QuizDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, questions: Vec<QuestionDraft>) -> Self {
        Self {
            title: title.into(),
            questions,
        }
    }

    /// Validate the title and every question. All-or-nothing: the first
    /// failing question fails the whole quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::MissingTitle` for an empty or whitespace-only
    /// title, or `QuizError::Question` carrying the index and cause of the
    /// first invalid question.
    pub fn validate(self) -> Result<NewQuiz, QuizError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(QuizError::MissingTitle);
        }

        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate()
                    .map_err(|source| QuizError::Question { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewQuiz {
            title: title.to_owned(),
            questions,
        })
    }
}

/// A validated quiz that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuiz {
    pub title: String,
    pub questions: Vec<NewQuestion>,
}

impl NewQuiz {
    /// Zero-based positions of questions whose prompt is blank.
    #[must_use]
    pub fn blank_prompt_positions(&self) -> Vec<usize> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, q)| q.has_blank_content())
            .map(|(i, _)| i)
            .collect()
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A stored quiz with its questions in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    questions: Vec<Question>,
    created_at: DateTime<Utc>,
}

impl Quiz {
    /// Rehydrate a quiz from storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::MissingTitle` if the stored title is blank.
    pub fn from_persisted(
        id: QuizId,
        title: impl Into<String>,
        questions: Vec<Question>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::MissingTitle);
        }
        Ok(Self {
            id,
            title,
            questions,
            created_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionType;
    use crate::time::fixed_now;

    #[test]
    fn validate_rejects_blank_title() {
        let err = QuizDraft::new("   ", Vec::new()).validate().unwrap_err();
        assert_eq!(err, QuizError::MissingTitle);
    }

    #[test]
    fn validate_trims_title_and_allows_no_questions() {
        let quiz = QuizDraft::new("  Geography ", Vec::new()).validate().unwrap();
        assert_eq!(quiz.title, "Geography");
        assert!(quiz.questions.is_empty());
    }

    #[test]
    fn one_bad_question_fails_the_whole_quiz() {
        let draft = QuizDraft::new(
            "Mixed",
            vec![
                QuestionDraft::new("boolean", "Is Earth round?"),
                QuestionDraft::new("essay", "Discuss."),
            ],
        );
        let err = draft.validate().unwrap_err();
        assert_eq!(
            err,
            QuizError::Question {
                index: 1,
                source: QuestionError::InvalidType("essay".into()),
            }
        );
        assert!(err.is_invalid_question_type());
    }

    #[test]
    fn question_order_is_preserved() {
        let quiz = QuizDraft::new(
            "Ordered",
            vec![
                QuestionDraft::new("input", "first"),
                QuestionDraft::new("boolean", "second"),
                QuestionDraft::new("checkbox", "third").with_options(["a"]),
            ],
        )
        .validate()
        .unwrap();

        let kinds: Vec<_> = quiz.questions.iter().map(|q| q.kind).collect();
        assert_eq!(
            kinds,
            vec![
                QuestionType::Input,
                QuestionType::Boolean,
                QuestionType::Checkbox
            ]
        );
        assert_eq!(quiz.questions[0].content, "first");
    }

    #[test]
    fn blank_prompts_are_reported() {
        let quiz = QuizDraft::new(
            "Blanks",
            vec![
                QuestionDraft::new("input", "ok"),
                QuestionDraft::new("input", "  "),
            ],
        )
        .validate()
        .unwrap();
        assert_eq!(quiz.blank_prompt_positions(), vec![1]);
    }

    #[test]
    fn from_persisted_rejects_blank_title() {
        let err = Quiz::from_persisted(QuizId::new(1), "", Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, QuizError::MissingTitle);
    }

    #[test]
    fn draft_title_defaults_when_missing() {
        let draft: QuizDraft = serde_json::from_str(r#"{"questions":[]}"#).unwrap();
        assert_eq!(draft.validate().unwrap_err(), QuizError::MissingTitle);

        let bare: QuizDraft = serde_json::from_str(r#"{"title":"Bare"}"#).unwrap();
        assert!(bare.validate().unwrap().questions.is_empty());
    }
}
