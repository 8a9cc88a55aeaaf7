use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 答卷状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Draft,
    InProgress,
    Submitted,
    Approved,
    Rejected,
}

/// 服务端已保存的答案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub response_id: Option<String>,
    pub question_id: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub answered_at: Option<String>,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: Option<Value>, comment: Option<String>) -> Self {
        Self {
            id: None,
            response_id: None,
            question_id: question_id.into(),
            value,
            comment,
            answered_at: None,
        }
    }
}

/// 一份答卷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormResponse {
    pub id: String,
    pub form_id: String,
    #[serde(default)]
    pub node_id: Option<String>,
    pub status: ResponseStatus,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// 批量保存接口的单条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerUpsert {
    pub question_id: String,
    pub value: Option<Value>,
    pub comment: Option<String>,
    /// 客户端在 flush 时打的时间戳（RFC 3339）
    pub client_created_at: String,
}

/// 新建答卷的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub node_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    pub client_created_at: String,
}
