mod ids;
mod question;
mod quiz;

pub use ids::{ParseIdError, QuestionId, QuizId};

pub use question::{
    FALSE_LABEL, NewQuestion, Question, QuestionDraft, QuestionError, QuestionType, TRUE_LABEL,
};
pub use quiz::{NewQuiz, Quiz, QuizDraft, QuizError};
