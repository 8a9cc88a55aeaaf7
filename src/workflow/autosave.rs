//! 自动保存协调器 - 流程层
//!
//! 把会话里的脏草稿批量发给服务端，并把结果回写到会话：
//! 1. 取脏草稿快照（为空则不发请求）
//! 2. 按快照构造请求体，时间戳取 flush 时刻
//! 3. 整批发送；成功则对快照内所有 id 清脏，失败则全部保持脏并发出提示
//!
//! 同一时刻只允许一个 flush 在途。

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::FillApi;
use crate::error::AppError;
use crate::models::AnswerUpsert;
use crate::services::{Notice, Notifier};
use crate::store::{AnswerDraft, DirtySnapshot, SessionHandle};

/// 触发来源，决定失败提示的措辞
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// 定时器
    Timer,
    /// 切换分组前
    Navigation,
    /// 调用方主动保存
    Manual,
    /// 提交前
    Submit,
}

impl FlushTrigger {
    fn failure_notice(&self, err: &AppError) -> Notice {
        match self {
            FlushTrigger::Timer | FlushTrigger::Navigation => {
                Notice::error(format!("Auto-save failed: {}", err))
            }
            FlushTrigger::Manual | FlushTrigger::Submit => {
                Notice::error(format!("Failed to save answers: {}", err))
            }
        }
    }
}

/// 一次 flush 的结果
#[derive(Debug)]
pub enum FlushOutcome {
    /// 没有脏草稿，未发请求
    Idle,
    /// 已有 flush 在途，本次跳过
    Busy,
    /// 已同步的条数
    Synced(usize),
    /// 请求失败，草稿保持脏
    Failed(AppError),
}

impl FlushOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FlushOutcome::Failed(_))
    }
}

/// 自动保存协调器
pub struct AutosaveCoordinator {
    session: SessionHandle,
    api: Arc<dyn FillApi>,
    notifier: Arc<dyn Notifier>,
    in_flight: Mutex<()>,
}

impl AutosaveCoordinator {
    pub fn new(session: SessionHandle, api: Arc<dyn FillApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            session,
            api,
            notifier,
            in_flight: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// 立即 flush；已有 flush 在途时返回 `Busy`
    pub async fn flush(&self, trigger: FlushTrigger) -> FlushOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("已有保存请求在途，跳过本次 ({:?})", trigger);
            return FlushOutcome::Busy;
        };
        self.flush_locked(trigger).await
    }

    /// 等在途的 flush 结束后再 flush，保证本次调用之前的改动都被发送过
    pub async fn flush_waiting(&self, trigger: FlushTrigger) -> FlushOutcome {
        let _guard = self.in_flight.lock().await;
        self.flush_locked(trigger).await
    }

    async fn flush_locked(&self, trigger: FlushTrigger) -> FlushOutcome {
        let snapshot = self.session.dirty_snapshot();
        if snapshot.is_empty() {
            return FlushOutcome::Idle;
        }
        let Some(response_id) = snapshot.response_id.clone() else {
            warn!("会话未初始化，{} 条草稿无法保存", snapshot.drafts.len());
            return FlushOutcome::Idle;
        };

        let payload = build_payload(&snapshot.drafts, Utc::now());
        debug!(
            "答卷 {} 保存 {} 条答案 ({:?})",
            response_id,
            payload.len(),
            trigger
        );

        match self.api.upsert_answers(&response_id, &payload).await {
            Ok(_) => {
                self.acknowledge(&snapshot);
                info!("💾 答卷 {} 已保存 {} 条答案", response_id, payload.len());
                FlushOutcome::Synced(payload.len())
            }
            Err(e) => {
                warn!("答卷 {} 保存失败: {}", response_id, e);
                self.notifier.notify(trigger.failure_notice(&e));
                FlushOutcome::Failed(e)
            }
        }
    }

    fn acknowledge(&self, snapshot: &DirtySnapshot) {
        if !self
            .session
            .mark_synced_if_current(snapshot.generation, snapshot.question_ids())
        {
            debug!("会话在请求期间已重置，忽略本次确认");
        }
    }
}

/// 构造批量保存请求体，所有条目共用同一个时间戳
pub fn build_payload(drafts: &[AnswerDraft], at: DateTime<Utc>) -> Vec<AnswerUpsert> {
    let client_created_at = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    drafts
        .iter()
        .map(|d| AnswerUpsert {
            question_id: d.question_id.clone(),
            value: d.value.clone(),
            comment: d.comment.clone(),
            client_created_at: client_created_at.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_build_payload_stamps_flush_time() {
        let drafts = vec![
            AnswerDraft {
                question_id: "q1".to_string(),
                value: Some(json!({"text": "ok"})),
                comment: None,
                dirty: true,
            },
            AnswerDraft {
                question_id: "q2".to_string(),
                value: None,
                comment: Some("n/a".to_string()),
                dirty: true,
            },
        ];
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();

        let payload = build_payload(&drafts, at);
        assert_eq!(payload.len(), 2);
        assert!(payload
            .iter()
            .all(|p| p.client_created_at == "2026-03-01T08:30:00.000Z"));
        assert_eq!(payload[0].value, Some(json!({"text": "ok"})));
        assert_eq!(payload[1].comment.as_deref(), Some("n/a"));
    }

    #[test]
    fn test_failure_notice_wording() {
        let err = AppError::bad_response("/responses/r1/answers", 503, "Service Unavailable");
        assert!(FlushTrigger::Timer
            .failure_notice(&err)
            .message
            .starts_with("Auto-save failed: "));
        assert!(FlushTrigger::Submit
            .failure_notice(&err)
            .message
            .starts_with("Failed to save answers: "));
    }
}
