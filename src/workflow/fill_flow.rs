//! 填写流程 - 流程层
//!
//! 把会话、自动保存协调器和远端接口串起来：
//! - 打开答卷：拉分组和已保存答案，初始化会话
//! - 切换分组：先 flush 再移动
//! - 提交：先保存剩余草稿，再提交，成功后清空会话

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::FillApi;
use crate::error::{AppResult, SessionError};
use crate::models::FormResponse;
use crate::services::{Notice, Notifier};
use crate::store::SessionHandle;
use crate::workflow::autosave::{AutosaveCoordinator, FlushOutcome, FlushTrigger};
use crate::workflow::autosave_task::AutosaveTask;

/// 切换分组的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// 移动到了该分组
    Moved(usize),
    /// 已在边界，位置不变
    Unchanged(usize),
    /// 已在最后一个分组，下一步是复核
    ReachedReview,
}

pub struct FillFlow {
    session: SessionHandle,
    api: Arc<dyn FillApi>,
    notifier: Arc<dyn Notifier>,
    coordinator: Arc<AutosaveCoordinator>,
}

impl FillFlow {
    pub fn new(session: SessionHandle, api: Arc<dyn FillApi>, notifier: Arc<dyn Notifier>) -> Self {
        let coordinator = Arc::new(AutosaveCoordinator::new(
            session.clone(),
            api.clone(),
            notifier.clone(),
        ));
        Self {
            session,
            api,
            notifier,
            coordinator,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn coordinator(&self) -> Arc<AutosaveCoordinator> {
        self.coordinator.clone()
    }

    /// 拉取分组和已保存答案并初始化会话
    pub async fn open(&self, response_id: &str, form_id: &str) -> AppResult<()> {
        let sections = self.api.fetch_form_sections(form_id).await?;
        let detail = self.api.fetch_response_detail(response_id).await?;

        info!(
            "📋 打开答卷 {}: {} 个分组, {} 条已保存答案",
            response_id,
            sections.len(),
            detail.answers.len()
        );

        self.session
            .initialize(response_id, form_id, sections, &detail.answers)?;
        Ok(())
    }

    pub fn start_autosave(&self, period: Duration) -> AutosaveTask {
        AutosaveTask::spawn(self.coordinator.clone(), period)
    }

    pub async fn next_section(&self) -> NavOutcome {
        self.coordinator.flush(FlushTrigger::Navigation).await;
        let at_last = self.session.read(|s| s.is_last_section());
        if at_last {
            return NavOutcome::ReachedReview;
        }
        self.session.next_section();
        NavOutcome::Moved(self.session.current_section_index())
    }

    pub async fn prev_section(&self) -> NavOutcome {
        self.coordinator.flush(FlushTrigger::Navigation).await;
        if self.session.read(|s| s.is_first_section()) {
            return NavOutcome::Unchanged(self.session.current_section_index());
        }
        self.session.prev_section();
        NavOutcome::Moved(self.session.current_section_index())
    }

    pub async fn go_to_section(&self, index: usize) -> NavOutcome {
        self.coordinator.flush(FlushTrigger::Navigation).await;
        self.session.go_to_section(index);
        NavOutcome::Moved(index)
    }

    /// 主动保存，等待在途请求结束
    pub async fn save(&self) -> FlushOutcome {
        self.coordinator.flush_waiting(FlushTrigger::Manual).await
    }

    /// 保存剩余草稿后提交
    ///
    /// 任一步失败都保留会话，调用方可以重试。
    pub async fn submit(&self) -> AppResult<FormResponse> {
        let response_id = self
            .session
            .response_id()
            .ok_or(SessionError::NotInitialized)?;

        if let FlushOutcome::Failed(e) = self.coordinator.flush_waiting(FlushTrigger::Submit).await {
            return Err(e);
        }

        match self.api.submit_response(&response_id).await {
            Ok(response) => {
                self.notifier.notify(Notice::success("Response submitted!"));
                self.session.reset();
                Ok(response)
            }
            Err(e) => {
                warn!("答卷 {} 提交失败: {}", response_id, e);
                self.notifier.notify(Notice::error(e.to_string()));
                Err(e)
            }
        }
    }
}
