use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Answer, AnswerUpsert, CreateResponse, FormResponse, Section};

/// 填写流程依赖的远端接口
#[async_trait]
pub trait FillApi: Send + Sync {
    /// 答卷详情（包含已保存的答案）
    async fn fetch_response_detail(&self, response_id: &str) -> AppResult<FormResponse>;

    /// 表单的分组与题目，按顺序返回
    async fn fetch_form_sections(&self, form_id: &str) -> AppResult<Vec<Section>>;

    /// 批量保存答案，整体成功或整体失败
    async fn upsert_answers(
        &self,
        response_id: &str,
        answers: &[AnswerUpsert],
    ) -> AppResult<Vec<Answer>>;

    /// 提交答卷
    async fn submit_response(&self, response_id: &str) -> AppResult<FormResponse>;

    /// 在某个节点上新建答卷
    async fn create_response(
        &self,
        form_id: &str,
        request: &CreateResponse,
    ) -> AppResult<FormResponse>;
}
