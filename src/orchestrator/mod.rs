//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量答卷处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载答卷文件（Vec<AnswerSheet>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `sheet_processor` - 单份答卷处理器
//! - 打开会话、启动/停止自动保存
//! - 按分组填入答案并翻页
//! - 复核与提交
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<AnswerSheet>)
//!     ↓
//! sheet_processor (处理单份答卷)
//!     ↓
//! workflow::FillFlow / AutosaveCoordinator
//!     ↓
//! store (会话状态) + api (远端接口)
//! ```

pub mod batch_processor;
pub mod sheet_processor;

pub use batch_processor::{App, ProcessingStats};
pub use sheet_processor::process_sheet;
