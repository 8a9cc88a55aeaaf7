use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 一条预填答案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetAnswer {
    pub question_id: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// 答卷文件：描述要填写哪份表单以及每题的答案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSheet {
    pub form_id: String,
    /// 为空时需要 node_id，由程序新建答卷
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    /// 覆盖配置里的 auto_submit
    #[serde(default)]
    pub submit: Option<bool>,
    #[serde(default)]
    pub answers: Vec<SheetAnswer>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl AnswerSheet {
    /// 用于日志显示的名称
    pub fn display_name(&self) -> String {
        self.file_path
            .clone()
            .unwrap_or_else(|| format!("form {}", self.form_id))
    }

    pub fn should_submit(&self, auto_submit: bool) -> bool {
        self.submit.unwrap_or(auto_submit)
    }
}
