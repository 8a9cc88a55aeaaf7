//! # Meka Fill
//!
//! 现场填写表单的客户端核心：本地答案草稿、脏标记、定时自动保存与提交
//!
//! ## 架构设计
//!
//! ### ① 存储层（Store）
//! - `store/` - 一次填写会话的全部本地状态，只做同步的内存修改
//! - `AnswerDraftStore` - 草稿、脏标记、分组导航
//! - `SessionHandle` - 共享句柄，显式传给需要它的组件
//!
//! ### ② 接口层（Api / Clients）
//! - `api::FillApi` - 远端接口抽象，唯一的 I/O 边界
//! - `clients::MekaClient` - 基于 reqwest 的实现
//!
//! ### ③ 业务能力层（Services）
//! - `Notifier` / `NoticeWriter` - 非阻塞提示
//! - `review` - 必填完成度、分组进度、答案摘要
//!
//! ### ④ 流程层（Workflow）
//! - `AutosaveCoordinator` - 脏草稿批量保存与回写
//! - `AutosaveTask` - 定时触发，随会话停止
//! - `FillFlow` - 打开、翻页、提交
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/` - 从 TOML 答卷文件批量填写

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use api::FillApi;
pub use clients::MekaClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use orchestrator::{App, ProcessingStats};
pub use store::{AnswerDraft, AnswerDraftStore, SessionHandle};
pub use workflow::{AutosaveCoordinator, AutosaveTask, FillFlow, FlushOutcome, FlushTrigger, NavOutcome};
