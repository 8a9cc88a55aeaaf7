use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::error::SessionError;
use crate::models::{Answer, Section};
use crate::store::answer_draft::AnswerDraft;
use crate::store::draft_store::AnswerDraftStore;

/// 某一时刻的脏草稿快照，附带会话代数
#[derive(Debug, Clone)]
pub struct DirtySnapshot {
    pub generation: u64,
    pub response_id: Option<String>,
    pub drafts: Vec<AnswerDraft>,
}

impl DirtySnapshot {
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn question_ids(&self) -> Vec<String> {
        self.drafts.iter().map(|d| d.question_id.clone()).collect()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    store: AnswerDraftStore,
    /// initialize / reset 时递增
    generation: u64,
}

/// 会话句柄
///
/// 内部是 `Arc<Mutex<..>>`，克隆后指向同一个会话。锁只在同步操作内部持有，
/// 从不跨越 `.await`。
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn initialize(
        &self,
        response_id: impl Into<String>,
        form_id: impl Into<String>,
        sections: Vec<Section>,
        existing_answers: &[Answer],
    ) -> Result<(), SessionError> {
        let mut state = self.lock();
        state
            .store
            .initialize(response_id, form_id, sections, existing_answers)?;
        state.generation += 1;
        Ok(())
    }

    pub fn set_answer(&self, question_id: &str, value: Option<Value>) {
        self.lock().store.set_answer(question_id, value);
    }

    pub fn set_comment(&self, question_id: &str, comment: impl Into<String>) {
        self.lock().store.set_comment(question_id, comment);
    }

    pub fn go_to_section(&self, index: usize) {
        self.lock().store.go_to_section(index);
    }

    pub fn next_section(&self) {
        self.lock().store.next_section();
    }

    pub fn prev_section(&self) {
        self.lock().store.prev_section();
    }

    pub fn mark_synced<I, S>(&self, question_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lock().store.mark_synced(question_ids);
    }

    /// 只有会话代数未变时才清除脏标记，返回是否执行
    ///
    /// 请求在途期间会话被 reset 或重新初始化时，确认结果不能落到新会话上。
    pub fn mark_synced_if_current<I, S>(&self, generation: u64, question_ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.lock();
        if state.generation != generation {
            return false;
        }
        state.store.mark_synced(question_ids);
        true
    }

    pub fn dirty_answers(&self) -> Vec<AnswerDraft> {
        self.lock().store.dirty_answers()
    }

    /// 在同一把锁内取脏草稿、会话代数和答卷 id
    pub fn dirty_snapshot(&self) -> DirtySnapshot {
        let state = self.lock();
        DirtySnapshot {
            generation: state.generation,
            response_id: state.store.response_id().map(str::to_string),
            drafts: state.store.dirty_answers(),
        }
    }

    pub fn reset(&self) {
        let mut state = self.lock();
        state.store.reset();
        state.generation += 1;
    }

    /// 会话代数，initialize / reset 各加一
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn response_id(&self) -> Option<String> {
        self.lock().store.response_id().map(str::to_string)
    }

    pub fn current_section_index(&self) -> usize {
        self.lock().store.current_section_index()
    }

    pub fn current_section(&self) -> Option<Section> {
        self.lock().store.current_section().cloned()
    }

    pub fn answer(&self, question_id: &str) -> Option<AnswerDraft> {
        self.lock().store.answer(question_id).cloned()
    }

    /// 在锁内只读访问整个存储
    pub fn read<R>(&self, f: impl FnOnce(&AnswerDraftStore) -> R) -> R {
        f(&self.lock().store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuestionType};
    use serde_json::json;

    fn handle() -> SessionHandle {
        let handle = SessionHandle::new();
        handle
            .initialize(
                "r1",
                "f1",
                vec![Section::new("s1", "Only", vec![Question::new("q1", QuestionType::Text)])],
                &[],
            )
            .unwrap();
        handle
    }

    #[test]
    fn test_clones_share_state() {
        let a = handle();
        let b = a.clone();
        a.set_answer("q1", Some(json!({"text": "x"})));
        assert_eq!(b.dirty_answers().len(), 1);
    }

    #[test]
    fn test_stale_generation_does_not_mark_synced() {
        let session = handle();
        session.set_answer("q1", Some(json!({"text": "x"})));
        let snapshot = session.dirty_snapshot();

        session.reset();
        session
            .initialize("r2", "f1", Vec::new(), &[])
            .unwrap();
        session.set_answer("q1", Some(json!({"text": "new session"})));

        assert!(!session.mark_synced_if_current(snapshot.generation, snapshot.question_ids()));
        assert!(session.answer("q1").unwrap().dirty);
    }

    #[test]
    fn test_current_generation_marks_synced() {
        let session = handle();
        session.set_answer("q1", Some(json!({"text": "x"})));
        let snapshot = session.dirty_snapshot();
        assert_eq!(snapshot.response_id.as_deref(), Some("r1"));

        assert!(session.mark_synced_if_current(snapshot.generation, snapshot.question_ids()));
        assert!(session.dirty_answers().is_empty());
    }

    #[test]
    fn test_generation_advances_on_initialize_and_reset() {
        let session = SessionHandle::new();
        assert_eq!(session.generation(), 0);

        session.initialize("r1", "f1", Vec::new(), &[]).unwrap();
        assert_eq!(session.generation(), 1);

        session.set_answer("q1", Some(json!({"text": "x"})));
        assert_eq!(session.generation(), 1);

        session.reset();
        assert_eq!(session.generation(), 2);
        assert_eq!(session.dirty_snapshot().generation, 2);
    }
}
