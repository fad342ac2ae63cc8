use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Label accepted as the "true" answer of a boolean question.
pub const TRUE_LABEL: &str = "True";
/// Label accepted as the "false" answer of a boolean question.
pub const FALSE_LABEL: &str = "False";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("unrecognized question type: {0:?}")]
    InvalidType(String),

    #[error("{kind} questions require at least one option")]
    MissingOptions { kind: QuestionType },

    #[error("input questions do not take options")]
    UnexpectedOptions,

    #[error("option {index} is blank")]
    BlankOption { index: usize },

    #[error("duplicate option: {0:?}")]
    DuplicateOption(String),

    #[error("correct answer {0:?} is not one of the options")]
    AnswerNotInOptions(String),

    #[error("boolean answer must be {TRUE_LABEL} or {FALSE_LABEL}, got {0:?}")]
    InvalidBooleanAnswer(String),

    #[error("boolean questions take a single correct answer")]
    TooManyBooleanAnswers,
}

//
// ─── QUESTION TYPE ─────────────────────────────────────────────────────────────
//

/// Closed set of question kinds; governs which fields are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    /// True/false with a single labelled answer.
    Boolean,
    /// Free-text answer.
    Input,
    /// Multi-select over a list of options.
    Checkbox,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] = [Self::Boolean, Self::Input, Self::Checkbox];

    /// Wire representation (lowercase).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Input => "input",
            Self::Checkbox => "checkbox",
        }
    }

    /// Persisted representation (uppercase).
    #[must_use]
    pub fn as_storage_str(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Input => "INPUT",
            Self::Checkbox => "CHECKBOX",
        }
    }

    /// Strict inverse of [`QuestionType::as_storage_str`].
    #[must_use]
    pub fn from_storage_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_storage_str() == s)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| QuestionError::InvalidType(s.to_owned()))
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question input as it arrives from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_answers: Option<Vec<String>>,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            content: Some(content.into()),
            options: None,
            correct_answers: None,
        }
    }

    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_correct_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.correct_answers = Some(answers.into_iter().map(Into::into).collect());
        self
    }

    /// Validate the draft against the rules of its question type.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidType` if the type is not recognized, or
    /// another `QuestionError` when options or correct answers break the
    /// rules of that type.
    pub fn validate(self) -> Result<NewQuestion, QuestionError> {
        let kind: QuestionType = self.kind.parse()?;
        let content = self.content.unwrap_or_default();
        let options = self.options.unwrap_or_default();
        let mut correct_answers = dedup_answers(self.correct_answers.unwrap_or_default());

        match kind {
            QuestionType::Input if !options.is_empty() => {
                return Err(QuestionError::UnexpectedOptions);
            }
            QuestionType::Checkbox if options.is_empty() => {
                return Err(QuestionError::MissingOptions { kind });
            }
            _ => {}
        }

        check_options(&options)?;

        if kind == QuestionType::Boolean {
            correct_answers = normalize_boolean_answers(correct_answers)?;
        }

        if !options.is_empty() {
            // Boolean answers were canonicalized above, so match them loosely.
            let listed = |answer: &String| {
                options.iter().any(|option| match kind {
                    QuestionType::Boolean => option.trim().eq_ignore_ascii_case(answer),
                    _ => option == answer,
                })
            };
            if let Some(stray) = correct_answers.iter().find(|a| !listed(a)) {
                return Err(QuestionError::AnswerNotInOptions(stray.clone()));
            }
        }

        Ok(NewQuestion {
            kind,
            content,
            options,
            correct_answers,
        })
    }
}

fn dedup_answers(answers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    answers
        .into_iter()
        .filter(|answer| seen.insert(answer.clone()))
        .collect()
}

fn check_options(options: &[String]) -> Result<(), QuestionError> {
    let mut seen = HashSet::with_capacity(options.len());
    for (index, option) in options.iter().enumerate() {
        if option.trim().is_empty() {
            return Err(QuestionError::BlankOption { index });
        }
        if !seen.insert(option.as_str()) {
            return Err(QuestionError::DuplicateOption(option.clone()));
        }
    }
    Ok(())
}

fn normalize_boolean_answers(answers: Vec<String>) -> Result<Vec<String>, QuestionError> {
    if answers.len() > 1 {
        return Err(QuestionError::TooManyBooleanAnswers);
    }
    answers
        .into_iter()
        .map(|answer| {
            let trimmed = answer.trim();
            if trimmed.eq_ignore_ascii_case(TRUE_LABEL) {
                Ok(TRUE_LABEL.to_owned())
            } else if trimmed.eq_ignore_ascii_case(FALSE_LABEL) {
                Ok(FALSE_LABEL.to_owned())
            } else {
                Err(QuestionError::InvalidBooleanAnswer(answer))
            }
        })
        .collect()
}

//
// ─── VALIDATED / PERSISTED ─────────────────────────────────────────────────────
//

/// A question that passed validation but has no identity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub kind: QuestionType,
    pub content: String,
    pub options: Vec<String>,
    pub correct_answers: Vec<String>,
}

impl NewQuestion {
    /// Blank prompts are accepted but worth flagging.
    #[must_use]
    pub fn has_blank_content(&self) -> bool {
        self.content.trim().is_empty()
    }

    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            kind: self.kind,
            content: self.content,
            options: self.options,
            correct_answers: self.correct_answers,
        }
    }
}

/// A stored question. Only exists as a member of a `Quiz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    kind: QuestionType,
    content: String,
    options: Vec<String>,
    correct_answers: Vec<String>,
}

impl Question {
    /// Rehydrate a question from storage.
    #[must_use]
    pub fn from_persisted(
        id: QuestionId,
        kind: QuestionType,
        content: String,
        options: Vec<String>,
        correct_answers: Vec<String>,
    ) -> Self {
        Self {
            id,
            kind,
            content,
            options,
            correct_answers,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answers(&self) -> &[String] {
        &self.correct_answers
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
