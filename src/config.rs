use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 远端 API 根地址
    pub api_base_url: String,
    /// 访问令牌（为空时不发送 Authorization 头）
    pub access_token: String,
    /// 自动保存间隔（秒）
    pub autosave_interval_secs: u64,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 同时填写的答卷数量
    pub max_concurrent_sessions: usize,
    /// 答卷 TOML 文件存放目录
    pub answers_folder: String,
    /// 填写完成后是否自动提交
    pub auto_submit: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 提示消息文件
    pub notice_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8001/api/v1".to_string(),
            access_token: String::new(),
            autosave_interval_secs: 30,
            request_timeout_secs: 15,
            max_concurrent_sessions: 4,
            answers_folder: "answer_sheets".to_string(),
            auto_submit: true,
            verbose_logging: false,
            output_log_file: "fill_log.txt".to_string(),
            notice_file: "notices.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("MEKA_API_URL").unwrap_or(default.api_base_url),
            access_token: std::env::var("MEKA_ACCESS_TOKEN").unwrap_or(default.access_token),
            autosave_interval_secs: std::env::var("AUTOSAVE_INTERVAL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.autosave_interval_secs),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            max_concurrent_sessions: std::env::var("MAX_CONCURRENT_SESSIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_sessions),
            answers_folder: std::env::var("ANSWERS_FOLDER").unwrap_or(default.answers_folder),
            auto_submit: std::env::var("AUTO_SUBMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.auto_submit),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            notice_file: std::env::var("NOTICE_FILE").unwrap_or(default.notice_file),
        }
    }

    /// 自动保存间隔，最少 1 秒
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
