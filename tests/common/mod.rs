#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use meka_fill::error::{AppError, AppResult};
use meka_fill::models::{
    Answer, AnswerUpsert, CreateResponse, FormResponse, Question, QuestionType, ResponseStatus,
    Section,
};
use meka_fill::services::{Notice, NoticeLevel, Notifier};
use meka_fill::FillApi;
use tokio::sync::{Notify, Semaphore};

/// 内存版远端接口
pub struct MockApi {
    sections: Vec<Section>,
    existing: Vec<Answer>,
    pub upserts: Mutex<Vec<(String, Vec<AnswerUpsert>)>>,
    pub submits: Mutex<Vec<String>>,
    pub created: Mutex<Vec<CreateResponse>>,
    fail_upsert: AtomicBool,
    fail_submit: AtomicBool,
    gated: bool,
    gate: Semaphore,
    /// upsert 请求进入时通知
    pub entered: Notify,
}

impl MockApi {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            existing: Vec::new(),
            upserts: Mutex::new(Vec::new()),
            submits: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            fail_upsert: AtomicBool::new(false),
            fail_submit: AtomicBool::new(false),
            gated: false,
            gate: Semaphore::new(0),
            entered: Notify::new(),
        }
    }

    pub fn with_existing(mut self, answers: Vec<Answer>) -> Self {
        self.existing = answers;
        self
    }

    /// upsert 会挂起，直到 `release()`
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn set_fail_upsert(&self, fail: bool) {
        self.fail_upsert.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_submit(&self, fail: bool) {
        self.fail_submit.store(fail, Ordering::SeqCst);
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.lock().unwrap().len()
    }

    pub fn upsert(&self, index: usize) -> Vec<AnswerUpsert> {
        self.upserts.lock().unwrap()[index].1.clone()
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submits.lock().unwrap().clone()
    }

    fn response(&self, id: &str, status: ResponseStatus) -> FormResponse {
        FormResponse {
            id: id.to_string(),
            form_id: "f1".to_string(),
            node_id: None,
            status,
            submitted_at: None,
            answers: self.existing.clone(),
        }
    }
}

#[async_trait]
impl FillApi for MockApi {
    async fn fetch_response_detail(&self, response_id: &str) -> AppResult<FormResponse> {
        Ok(self.response(response_id, ResponseStatus::InProgress))
    }

    async fn fetch_form_sections(&self, _form_id: &str) -> AppResult<Vec<Section>> {
        Ok(self.sections.clone())
    }

    async fn upsert_answers(
        &self,
        response_id: &str,
        answers: &[AnswerUpsert],
    ) -> AppResult<Vec<Answer>> {
        self.upserts
            .lock()
            .unwrap()
            .push((response_id.to_string(), answers.to_vec()));
        self.entered.notify_one();

        if self.gated {
            self.gate.acquire().await.unwrap().forget();
        }

        if self.fail_upsert.load(Ordering::SeqCst) {
            return Err(AppError::bad_response(
                format!("/responses/{}/answers", response_id),
                503,
                "Service Unavailable",
            ));
        }

        Ok(answers
            .iter()
            .map(|a| Answer::new(a.question_id.clone(), a.value.clone(), a.comment.clone()))
            .collect())
    }

    async fn submit_response(&self, response_id: &str) -> AppResult<FormResponse> {
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(AppError::bad_response(
                format!("/responses/{}/submit", response_id),
                422,
                "Required questions missing",
            ));
        }
        self.submits.lock().unwrap().push(response_id.to_string());
        Ok(self.response(response_id, ResponseStatus::Submitted))
    }

    async fn create_response(
        &self,
        _form_id: &str,
        request: &CreateResponse,
    ) -> AppResult<FormResponse> {
        self.created.lock().unwrap().push(request.clone());
        Ok(self.response("r-new", ResponseStatus::Draft))
    }
}

/// 记录所有提示
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// 一个分组两道题
pub fn single_section() -> Vec<Section> {
    vec![Section::new(
        "s1",
        "General",
        vec![
            Question::new("q1", QuestionType::Text),
            Question::new("q2", QuestionType::Numeric),
        ],
    )]
}

/// 三个分组
pub fn three_sections() -> Vec<Section> {
    vec![
        Section::new(
            "s1",
            "General",
            vec![
                Question::new("q1", QuestionType::Text).required(),
                Question::new("q2", QuestionType::Numeric),
            ],
        ),
        Section::new("s2", "Safety", vec![Question::new("q3", QuestionType::Boolean).required()]),
        Section::new("s3", "Sign-off", vec![Question::new("q4", QuestionType::Signature)]),
    ]
}
