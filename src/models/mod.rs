pub mod answer;
pub mod exam;
pub mod loaders;
pub mod violation;

pub use answer::{AnswerSheet, SubmissionReceipt};
pub use exam::{Choice, ExamDefinition, ExamSettings, Question, QuestionType};
pub use loaders::load_exam_from_toml;
pub use violation::{ParseViolationKindError, ViolationKind};
