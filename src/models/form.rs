use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Numeric,
    Text,
    Date,
    Boolean,
    SingleChoice,
    MultiChoice,
    Photo,
    Barcode,
    QrCode,
    Nfc,
    Signature,
    FileAttachment,
}

impl QuestionType {
    /// 展示用名称
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Numeric => "Numeric",
            QuestionType::Text => "Text",
            QuestionType::Date => "Date",
            QuestionType::Boolean => "Yes / No",
            QuestionType::SingleChoice => "Single Choice",
            QuestionType::MultiChoice => "Multiple Choice",
            QuestionType::Photo => "Photo",
            QuestionType::Barcode => "Barcode",
            QuestionType::QrCode => "QR Code",
            QuestionType::Nfc => "NFC",
            QuestionType::Signature => "Signature",
            QuestionType::FileAttachment => "File Attachment",
        }
    }
}

/// 题目定义，会话内不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    pub question_type: QuestionType,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub requires_photo: bool,
    #[serde(default)]
    pub requires_comment: bool,
    #[serde(default)]
    pub sort_order: i32,
    /// 类型相关的配置，草稿层不解析
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl Question {
    /// 构造一个只有 id 和类型的题目，其余字段取默认值
    pub fn new(id: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            id: id.into(),
            section_id: None,
            question_type,
            text: String::new(),
            description: None,
            is_required: false,
            requires_photo: false,
            requires_comment: false,
            sort_order: 0,
            config: Map::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }
}

/// 分组，会话开始时从服务端加载一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            form_id: None,
            title: title.into(),
            description: None,
            sort_order: 0,
            questions,
        }
    }

    /// 本分组是否包含该题目
    pub fn contains(&self, question_id: &str) -> bool {
        self.questions.iter().any(|q| q.id == question_id)
    }
}
