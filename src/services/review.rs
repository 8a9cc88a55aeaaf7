//! 答卷复核 - 业务能力层
//!
//! 提交前的汇总：必填完成度、各分组进度、每题答案的一行摘要。
//! 只读，不修改草稿。

use std::collections::HashMap;

use serde_json::Value;

use crate::models::{Question, QuestionType, Section};
use crate::store::AnswerDraft;

const EMPTY: &str = "—";

/// 必填题完成度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredProgress {
    pub answered: usize,
    pub total: usize,
}

impl RequiredProgress {
    pub fn all_answered(&self) -> bool {
        self.answered == self.total
    }
}

/// 单个分组的进度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProgress {
    pub section_id: String,
    pub title: String,
    pub answered: usize,
    pub total: usize,
    /// 分组非空且全部作答
    pub complete: bool,
    pub is_current: bool,
}

/// 复核页的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLine {
    pub question_id: String,
    pub text: String,
    pub answer: String,
    pub comment: Option<String>,
    /// 必填且未作答
    pub missing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSection {
    pub title: String,
    pub lines: Vec<ReviewLine>,
}

fn is_answered(answers: &HashMap<String, AnswerDraft>, question_id: &str) -> bool {
    answers
        .get(question_id)
        .map(AnswerDraft::is_answered)
        .unwrap_or(false)
}

pub fn required_progress(
    sections: &[Section],
    answers: &HashMap<String, AnswerDraft>,
) -> RequiredProgress {
    let mut progress = RequiredProgress {
        answered: 0,
        total: 0,
    };
    for question in sections.iter().flat_map(|s| &s.questions) {
        if question.is_required {
            progress.total += 1;
            if is_answered(answers, &question.id) {
                progress.answered += 1;
            }
        }
    }
    progress
}

/// 仍未作答的必填题 id，按表单顺序
pub fn unanswered_required(
    sections: &[Section],
    answers: &HashMap<String, AnswerDraft>,
) -> Vec<String> {
    sections
        .iter()
        .flat_map(|s| &s.questions)
        .filter(|q| q.is_required && !is_answered(answers, &q.id))
        .map(|q| q.id.clone())
        .collect()
}

pub fn section_progress(
    sections: &[Section],
    answers: &HashMap<String, AnswerDraft>,
    current_index: usize,
) -> Vec<SectionProgress> {
    sections
        .iter()
        .enumerate()
        .map(|(idx, section)| {
            let total = section.questions.len();
            let answered = section
                .questions
                .iter()
                .filter(|q| is_answered(answers, &q.id))
                .count();
            SectionProgress {
                section_id: section.id.clone(),
                title: section.title.clone(),
                answered,
                total,
                complete: total > 0 && answered == total,
                is_current: idx == current_index,
            }
        })
        .collect()
}

pub fn review_sections(
    sections: &[Section],
    answers: &HashMap<String, AnswerDraft>,
) -> Vec<ReviewSection> {
    sections
        .iter()
        .map(|section| ReviewSection {
            title: section.title.clone(),
            lines: section
                .questions
                .iter()
                .map(|q| {
                    let draft = answers.get(&q.id);
                    let value = draft.and_then(|d| d.value.as_ref());
                    ReviewLine {
                        question_id: q.id.clone(),
                        text: if q.text.is_empty() {
                            "Untitled".to_string()
                        } else {
                            q.text.clone()
                        },
                        answer: format_answer(q, value),
                        comment: draft.and_then(|d| d.comment.clone()).filter(|c| !c.is_empty()),
                        missing: q.is_required && value.is_none(),
                    }
                })
                .collect(),
        })
        .collect()
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn count_field(value: &Value, key: &str) -> usize {
    value.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

/// 选项 id 对应的显示名，找不到时返回 id 本身
fn option_label(question: &Question, id: &str) -> String {
    question
        .config
        .get("options")
        .and_then(Value::as_array)
        .and_then(|options| {
            options
                .iter()
                .find(|o| o.get("id").and_then(Value::as_str) == Some(id))
        })
        .and_then(|o| o.get("label").and_then(Value::as_str))
        .unwrap_or(id)
        .to_string()
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(_) => true,
    }
}

/// 一行答案摘要
pub fn format_answer(question: &Question, value: Option<&Value>) -> String {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return EMPTY.to_string();
    };

    let formatted = match question.question_type {
        QuestionType::Text => str_field(value, "text").map(str::to_string),
        QuestionType::Date => str_field(value, "date").map(str::to_string),
        QuestionType::Numeric => value.get("number").and_then(|n| n.as_f64().map(|_| n)).map(|n| {
            match question.config.get("unit").and_then(Value::as_str) {
                Some(unit) if !unit.is_empty() => format!("{} {}", n, unit),
                _ => n.to_string(),
            }
        }),
        QuestionType::Boolean => match value.get("boolean") {
            Some(Value::Bool(true)) => Some("Yes".to_string()),
            Some(Value::Bool(false)) => Some("No".to_string()),
            _ => None,
        },
        QuestionType::SingleChoice => {
            str_field(value, "selected").map(|id| option_label(question, id))
        }
        QuestionType::MultiChoice => {
            let labels: Vec<String> = value
                .get("selected")
                .and_then(Value::as_array)
                .map(|ids| {
                    ids.iter()
                        .filter_map(Value::as_str)
                        .map(|id| option_label(question, id))
                        .collect()
                })
                .unwrap_or_default();
            (!labels.is_empty()).then(|| labels.join(", "))
        }
        QuestionType::Photo => {
            let n = count_field(value, "photos");
            (n > 0).then(|| format!("{} photo(s)", n))
        }
        QuestionType::FileAttachment => {
            let n = count_field(value, "files");
            (n > 0).then(|| format!("{} file(s)", n))
        }
        QuestionType::Signature => {
            truthy(value.get("signature_data")).then(|| "Signed".to_string())
        }
        QuestionType::Barcode | QuestionType::QrCode => str_field(value, "code").map(str::to_string),
        QuestionType::Nfc => str_field(value, "tag_id").map(str::to_string),
    };

    formatted.unwrap_or_else(|| EMPTY.to_string())
}
