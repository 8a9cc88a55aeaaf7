//! 答案草稿存储
//!
//! 持有一次填写会话的全部本地状态：分组列表、当前分组、每题草稿与脏标记。
//! 所有操作都是同步的内存修改，不做任何业务校验（必填等由服务端负责）。

use std::collections::HashMap;

use serde_json::Value;

use crate::error::SessionError;
use crate::models::{Answer, Section};
use crate::store::answer_draft::AnswerDraft;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerDraftStore {
    response_id: Option<String>,
    form_id: Option<String>,
    sections: Vec<Section>,
    current_section_index: usize,
    answers: HashMap<String, AnswerDraft>,
}

impl AnswerDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用服务端数据填充会话
    ///
    /// 已初始化且存在未同步草稿时拒绝，避免丢失本地改动；
    /// 没有脏草稿时视为刷新，相同输入得到相同状态。
    pub fn initialize(
        &mut self,
        response_id: impl Into<String>,
        form_id: impl Into<String>,
        sections: Vec<Section>,
        existing_answers: &[Answer],
    ) -> Result<(), SessionError> {
        let response_id = response_id.into();
        if self.is_initialized() {
            let dirty = self.dirty_count();
            if dirty > 0 {
                return Err(SessionError::UnsyncedDrafts {
                    response_id: self.response_id.clone().unwrap_or(response_id),
                    dirty,
                });
            }
        }

        let answers = existing_answers
            .iter()
            .map(|a| (a.question_id.clone(), AnswerDraft::from_persisted(a)))
            .collect();

        *self = Self {
            response_id: Some(response_id),
            form_id: Some(form_id.into()),
            sections,
            current_section_index: 0,
            answers,
        };
        Ok(())
    }

    /// 设置答案值，保留已有备注
    pub fn set_answer(&mut self, question_id: &str, value: Option<Value>) {
        let draft = self.entry(question_id);
        draft.value = value;
        draft.dirty = true;
    }

    /// 设置备注，保留已有答案值
    pub fn set_comment(&mut self, question_id: &str, comment: impl Into<String>) {
        let draft = self.entry(question_id);
        draft.comment = Some(comment.into());
        draft.dirty = true;
    }

    fn entry(&mut self, question_id: &str) -> &mut AnswerDraft {
        self.answers
            .entry(question_id.to_string())
            .or_insert_with(|| AnswerDraft {
                question_id: question_id.to_string(),
                value: None,
                comment: None,
                dirty: false,
            })
    }

    /// 跳到指定分组，不做越界检查
    pub fn go_to_section(&mut self, index: usize) {
        self.current_section_index = index;
    }

    /// 下一分组，到末尾时不动
    pub fn next_section(&mut self) {
        if let Some(last) = self.sections.len().checked_sub(1) {
            self.current_section_index = (self.current_section_index + 1).min(last);
        }
    }

    /// 上一分组，到开头时不动
    pub fn prev_section(&mut self) {
        self.current_section_index = self.current_section_index.saturating_sub(1);
    }

    /// 清除脏标记；不存在的 id 直接忽略，值和备注保持不变
    pub fn mark_synced<I, S>(&mut self, question_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in question_ids {
            if let Some(draft) = self.answers.get_mut(id.as_ref()) {
                draft.dirty = false;
            }
        }
    }

    /// 所有脏草稿的快照，顺序不保证
    pub fn dirty_answers(&self) -> Vec<AnswerDraft> {
        self.answers.values().filter(|a| a.dirty).cloned().collect()
    }

    pub fn dirty_count(&self) -> usize {
        self.answers.values().filter(|a| a.dirty).count()
    }

    /// 回到未初始化状态
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_initialized(&self) -> bool {
        self.response_id.is_some()
    }

    pub fn response_id(&self) -> Option<&str> {
        self.response_id.as_deref()
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form_id.as_deref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn current_section_index(&self) -> usize {
        self.current_section_index
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.sections.get(self.current_section_index)
    }

    pub fn is_first_section(&self) -> bool {
        self.current_section_index == 0
    }

    pub fn is_last_section(&self) -> bool {
        self.current_section_index + 1 >= self.sections.len()
    }

    pub fn answer(&self, question_id: &str) -> Option<&AnswerDraft> {
        self.answers.get(question_id)
    }

    pub fn answers(&self) -> &HashMap<String, AnswerDraft> {
        &self.answers
    }
}
