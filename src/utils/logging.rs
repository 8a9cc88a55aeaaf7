/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::orchestrator::ProcessingStats;
use crate::services::{RequiredProgress, ReviewSection};
use crate::workflow::SheetCtx;

/// 初始化日志文件
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n答卷填写日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量答卷填写模式");
    info!("🌐 API 地址: {}", config.api_base_url);
    info!("📊 最大并发数: {}", config.max_concurrent_sessions);
    info!("💾 自动保存间隔: {:?}", config.autosave_interval());
    info!("{}", "=".repeat(60));
}

/// 记录答卷加载信息
pub fn log_sheets_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 份待处理的答卷", total);
    info!("📋 最多同时填写 {} 份\n", max_concurrent);
}

/// 输出复核摘要
pub fn log_review(ctx: &SheetCtx, sections: &[ReviewSection], progress: &RequiredProgress) {
    info!("{} 🔎 复核: 必填 {}/{}", ctx, progress.answered, progress.total);
    for section in sections {
        info!("{}   ## {}", ctx, section.title);
        for (idx, line) in section.lines.iter().enumerate() {
            let marker = if line.missing { " *" } else { "" };
            info!(
                "{}   {}. {}{} → {}",
                ctx,
                idx + 1,
                truncate_text(&line.text, 40),
                marker,
                truncate_text(&line.answer, 60)
            );
            if let Some(comment) = &line.comment {
                info!("{}      \"{}\"", ctx, truncate_text(comment, 60));
            }
        }
    }
    if !progress.all_answered() {
        warn!("{} ⚠️ 还有必填题未作答", ctx);
    }
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &ProcessingStats, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
