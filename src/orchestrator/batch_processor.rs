//! 批量答卷处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量答卷的处理和资源管理。
//!
//! 1. **应用初始化**：写日志头、创建 API 客户端和提示出口
//! 2. **批量加载**：扫描并加载所有答卷文件（`Vec<AnswerSheet>`）
//! 3. **并发控制**：使用 Semaphore 限制同时填写的答卷数
//! 4. **全局统计**：汇总所有答卷的处理结果

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::api::FillApi;
use crate::clients::MekaClient;
use crate::config::Config;
use crate::models::{load_all_answer_sheets, AnswerSheet};
use crate::orchestrator::sheet_processor;
use crate::services::{NoticeWriter, Notifier};
use crate::utils::logging::{init_log_file, log_sheets_loaded, log_startup, print_final_stats};

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    api: Arc<dyn FillApi>,
    notifier: Arc<dyn Notifier>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config);

        let api: Arc<dyn FillApi> = Arc::new(MekaClient::new(&config)?);
        let notifier: Arc<dyn Notifier> = Arc::new(NoticeWriter::with_path(&config.notice_file));

        Ok(Self::with_parts(config, api, notifier))
    }

    /// 用现成的接口和提示出口组装
    pub fn with_parts(config: Config, api: Arc<dyn FillApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            api,
            notifier,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("\n📁 正在扫描答卷文件...");
        let sheets = load_all_answer_sheets(&self.config.answers_folder)
            .await
            .context("扫描答卷文件夹失败")?;

        if sheets.is_empty() {
            warn!("⚠️ 没有找到待处理的答卷文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_sheets_loaded(sheets.len(), self.config.max_concurrent_sessions);

        let stats = self.process_all(sheets).await?;
        print_final_stats(&stats, &self.config.output_log_file);

        Ok(stats)
    }

    async fn process_all(&self, sheets: Vec<AnswerSheet>) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_sessions.max(1)));
        let mut handles = Vec::with_capacity(sheets.len());

        for (idx, sheet) in sheets.into_iter().enumerate() {
            let sheet_index = idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let api = self.api.clone();
            let notifier = self.notifier.clone();
            let config = self.config.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                sheet_processor::process_sheet(api, notifier, sheet, sheet_index, &config).await
            });
            handles.push(handle);
        }

        let mut stats = ProcessingStats {
            total: handles.len(),
            ..Default::default()
        };

        for (idx, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(Ok(true)) => stats.success += 1,
                Ok(Ok(false)) | Ok(Err(_)) => stats.failed += 1,
                Err(e) => {
                    error!("[答卷 #{}] 任务执行失败: {}", idx + 1, e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}
