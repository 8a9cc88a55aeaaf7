//! 草稿存储层
//!
//! - `AnswerDraftStore` - 一次填写会话的纯内存状态
//! - `SessionHandle` - 可克隆的共享句柄，协调器、流程和调用方都通过它访问同一会话

pub mod answer_draft;
pub mod draft_store;
pub mod session;

pub use answer_draft::AnswerDraft;
pub use draft_store::AnswerDraftStore;
pub use session::{DirtySnapshot, SessionHandle};
