//! 提示写入服务 - 业务能力层
//!
//! 只负责把提示追加到文件，同时写一份日志

use std::fs::OpenOptions;
use std::io::Write;

use tracing::{debug, warn};

use crate::services::notifier::{Notice, Notifier, TracingNotifier};

/// 提示写入服务
///
/// 职责：
/// - 每条提示追加一行（带本地时间）
/// - 写文件失败只记警告，不影响填写流程
pub struct NoticeWriter {
    notice_file_path: String,
}

impl NoticeWriter {
    pub fn new() -> Self {
        Self {
            notice_file_path: "notices.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            notice_file_path: path.into(),
        }
    }

    fn append(&self, notice: &Notice) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.notice_file_path)?;

        let line = format!(
            "{} {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            notice
        );
        file.write_all(line.as_bytes())
    }
}

impl Default for NoticeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NoticeWriter {
    fn notify(&self, notice: Notice) {
        debug!("写入提示: {}", notice);
        if let Err(e) = self.append(&notice) {
            warn!("写入提示文件 {} 失败: {}", self.notice_file_path, e);
        }
        TracingNotifier.notify(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_are_appended() {
        let path = std::env::temp_dir().join(format!("meka_fill_notices_{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let writer = NoticeWriter::with_path(path.to_string_lossy().to_string());
        writer.notify(Notice::error("Auto-save failed: timeout"));
        writer.notify(Notice::success("Response submitted!"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[失败] Auto-save failed: timeout"));
        assert!(lines[1].ends_with("[成功] Response submitted!"));
    }
}
