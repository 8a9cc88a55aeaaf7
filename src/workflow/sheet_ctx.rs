//! 答卷处理上下文
//!
//! 封装"我正在处理第几份答卷、对应哪个表单"这一信息

use std::fmt::Display;

/// 答卷处理上下文
#[derive(Debug, Clone)]
pub struct SheetCtx {
    /// 答卷索引（仅用于日志显示，从1开始）
    pub sheet_index: usize,

    /// 表单ID
    pub form_id: String,

    /// 答卷ID，新建答卷前为空
    pub response_id: Option<String>,
}

impl SheetCtx {
    pub fn new(sheet_index: usize, form_id: String, response_id: Option<String>) -> Self {
        Self {
            sheet_index,
            form_id,
            response_id,
        }
    }

    pub fn with_response(mut self, response_id: impl Into<String>) -> Self {
        self.response_id = Some(response_id.into());
        self
    }
}

impl Display for SheetCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[答卷 #{} 表单#{} 答卷ID#{}]",
            self.sheet_index,
            self.form_id,
            self.response_id.as_deref().unwrap_or("-")
        )
    }
}
