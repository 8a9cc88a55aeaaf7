//! 提示消息 - 业务能力层
//!
//! 自动保存、提交失败时给用户的非阻塞提示

use std::fmt;

use tracing::{error, info};

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// 一条提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "成功",
            NoticeLevel::Error => "失败",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

/// 提示出口，调用方不关心提示最终显示在哪里
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// 直接写进日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!("✅ {}", notice.message),
            NoticeLevel::Error => error!("❌ {}", notice.message),
        }
    }
}
