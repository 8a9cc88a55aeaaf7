/// Meka API 客户端
///
/// 封装所有与表单服务 API 相关的调用逻辑
use crate::api::FillApi;
use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError};
use crate::models::{Answer, AnswerUpsert, CreateResponse, FormResponse, Section};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// 表单服务客户端
pub struct MekaClient {
    base_url: String,
    http: Client,
}

impl MekaClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        if !config.access_token.is_empty() {
            let value = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
                .map_err(|_| ConfigError::InvalidAccessToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::api_request_failed("client builder", e))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;
        Self::decode(path, response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<T> {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;
        Self::decode(path, response).await
    }

    /// 非 2xx 时取响应体里的 `detail`，否则用状态码原因
    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("request failed").to_string();
            let body: Option<Value> = response.json().await.ok();
            let detail = Self::extract_detail(body.as_ref()).unwrap_or(reason);
            return Err(AppError::bad_response(path, status.as_u16(), detail));
        }

        let bytes = response.bytes().await?;
        debug!("{} 返回 {} 字节", path, bytes.len());
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// 提取错误详情
    fn extract_detail(body: Option<&Value>) -> Option<String> {
        let detail = body?.get("detail")?;
        match detail {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[async_trait]
impl FillApi for MekaClient {
    async fn fetch_response_detail(&self, response_id: &str) -> AppResult<FormResponse> {
        self.get(&format!("/responses/{}", response_id)).await
    }

    async fn fetch_form_sections(&self, form_id: &str) -> AppResult<Vec<Section>> {
        self.get(&format!("/forms/{}/sections", form_id)).await
    }

    async fn upsert_answers(
        &self,
        response_id: &str,
        answers: &[AnswerUpsert],
    ) -> AppResult<Vec<Answer>> {
        debug!("保存 {} 条答案到答卷 {}", answers.len(), response_id);
        self.send_json(
            Method::PUT,
            &format!("/responses/{}/answers", response_id),
            Some(answers),
        )
        .await
    }

    async fn submit_response(&self, response_id: &str) -> AppResult<FormResponse> {
        self.send_json::<(), _>(
            Method::POST,
            &format!("/responses/{}/submit", response_id),
            None,
        )
        .await
    }

    async fn create_response(
        &self,
        form_id: &str,
        request: &CreateResponse,
    ) -> AppResult<FormResponse> {
        self.send_json(
            Method::POST,
            &format!("/forms/{}/responses", form_id),
            Some(request),
        )
        .await
    }
}
