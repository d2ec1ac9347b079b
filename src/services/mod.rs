pub mod answer_sync;
pub mod exam_loader;

pub use answer_sync::AnswerSync;
pub use exam_loader::ExamLoader;
