pub mod answer_sheet;
pub mod form;
pub mod loaders;
pub mod response;

pub use answer_sheet::{AnswerSheet, SheetAnswer};
pub use form::{Question, QuestionType, Section};
pub use loaders::{load_all_answer_sheets, load_answer_sheet};
pub use response::{Answer, AnswerUpsert, CreateResponse, FormResponse, ResponseStatus};
