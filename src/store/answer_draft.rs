use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Answer;

/// 单题的本地草稿
///
/// `dirty` 为真表示本地改动还没有被服务端确认保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerDraft {
    pub question_id: String,
    pub value: Option<Value>,
    pub comment: Option<String>,
    pub dirty: bool,
}

impl AnswerDraft {
    /// 从服务端已保存的答案构造，初始为非脏
    pub fn from_persisted(answer: &Answer) -> Self {
        Self {
            question_id: answer.question_id.clone(),
            value: answer.value.clone().filter(|v| !v.is_null()),
            comment: answer.comment.clone(),
            dirty: false,
        }
    }

    /// 是否已作答（值非空）
    pub fn is_answered(&self) -> bool {
        self.value.is_some()
    }
}
