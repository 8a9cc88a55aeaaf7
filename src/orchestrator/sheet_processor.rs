//! 单份答卷处理器 - 编排层
//!
//! ## 职责
//!
//! 1. 确定答卷ID（没有就在节点上新建）
//! 2. 打开会话并启动定时自动保存
//! 3. 按分组顺序填入答案，每次翻页前 flush
//! 4. 输出复核摘要，按配置提交或只保存
//! 5. 停止自动保存任务

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use tracing::{error, info, warn};

use crate::api::FillApi;
use crate::config::Config;
use crate::error::SessionError;
use crate::models::{AnswerSheet, CreateResponse, SheetAnswer};
use crate::services::{review, Notifier};
use crate::store::SessionHandle;
use crate::utils::logging::{log_review, truncate_text};
use crate::workflow::{FillFlow, FlushOutcome, NavOutcome, SheetCtx};

/// 处理一份答卷，返回是否成功
pub async fn process_sheet(
    api: Arc<dyn FillApi>,
    notifier: Arc<dyn Notifier>,
    sheet: AnswerSheet,
    sheet_index: usize,
    config: &Config,
) -> Result<bool> {
    let ctx = SheetCtx::new(sheet_index, sheet.form_id.clone(), sheet.response_id.clone());
    info!("{} 📄 开始处理 {}", ctx, sheet.display_name());

    let response_id = resolve_response_id(api.as_ref(), &sheet).await?;
    let ctx = ctx.with_response(response_id.clone());

    let session = SessionHandle::new();
    let flow = FillFlow::new(session.clone(), api, notifier);
    flow.open(&response_id, &sheet.form_id)
        .await
        .with_context(|| format!("{} 打开答卷失败", ctx))?;

    let task = flow.start_autosave(config.autosave_interval());
    let result = fill_and_finish(&flow, &sheet, &ctx, config).await;
    task.stop().await;

    match &result {
        Ok(true) => info!("{} ✅ 处理完成", ctx),
        Ok(false) => warn!("{} ⚠️ 处理未完成", ctx),
        Err(e) => error!("{} ❌ 处理出错: {:#}", ctx, e),
    }
    result
}

async fn resolve_response_id(api: &dyn FillApi, sheet: &AnswerSheet) -> Result<String> {
    if let Some(id) = &sheet.response_id {
        return Ok(id.clone());
    }

    let node_id = sheet.node_id.clone().ok_or_else(|| SessionError::MissingField {
        field: "node_id".to_string(),
    })?;
    let request = CreateResponse {
        node_id,
        device_id: sheet.device_id.clone(),
        client_created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    let created = api
        .create_response(&sheet.form_id, &request)
        .await
        .context("新建答卷失败")?;
    info!("🆕 已新建答卷 {}", created.id);
    Ok(created.id)
}

async fn fill_and_finish(
    flow: &FillFlow,
    sheet: &AnswerSheet,
    ctx: &SheetCtx,
    config: &Config,
) -> Result<bool> {
    let mut pending = group_by_section(flow.session(), &sheet.answers);

    loop {
        let index = flow.session().current_section_index();
        let is_last = flow.session().read(|s| s.is_last_section());
        let mut batch = pending.remove(&Some(index)).unwrap_or_default();
        if is_last {
            // 不属于任何分组的答案放到最后一组一起填
            let orphans = pending.remove(&None).unwrap_or_default();
            if !orphans.is_empty() {
                warn!("{} {} 条答案找不到对应题目，仍然提交", ctx, orphans.len());
            }
            batch.extend(orphans);
        }

        for answer in &batch {
            apply_answer(flow.session(), answer);
        }
        if !batch.is_empty() {
            info!("{} ✏️ 分组 {} 填入 {} 条答案", ctx, index + 1, batch.len());
        }

        match flow.next_section().await {
            NavOutcome::ReachedReview => break,
            NavOutcome::Moved(_) | NavOutcome::Unchanged(_) => {}
        }
    }

    let review = flow
        .session()
        .read(|s| review::review_sections(s.sections(), s.answers()));
    let progress = flow
        .session()
        .read(|s| review::required_progress(s.sections(), s.answers()));
    log_review(ctx, &review, &progress);

    if sheet.should_submit(config.auto_submit) {
        match flow.submit().await {
            Ok(response) => {
                info!("{} 📨 已提交，状态 {:?}", ctx, response.status);
                Ok(true)
            }
            Err(e) => {
                warn!("{} 提交失败: {}", ctx, truncate_text(&e.to_string(), 200));
                Ok(false)
            }
        }
    } else {
        Ok(!matches!(flow.save().await, FlushOutcome::Failed(_)))
    }
}

/// 按题目所在分组归类；key 为 None 表示找不到题目
fn group_by_section(
    session: &SessionHandle,
    answers: &[SheetAnswer],
) -> HashMap<Option<usize>, Vec<SheetAnswer>> {
    session.read(|store| {
        let mut grouped: HashMap<Option<usize>, Vec<SheetAnswer>> = HashMap::new();
        for answer in answers {
            let section = store
                .sections()
                .iter()
                .position(|s| s.contains(&answer.question_id));
            grouped.entry(section).or_default().push(answer.clone());
        }
        grouped
    })
}

fn apply_answer(session: &SessionHandle, answer: &SheetAnswer) {
    if answer.value.is_some() || answer.comment.is_none() {
        session.set_answer(&answer.question_id, answer.value.clone());
    }
    if let Some(comment) = &answer.comment {
        session.set_comment(&answer.question_id, comment.clone());
    }
}
