//! API 模块
//!
//! 远端服务的请求/响应接口，是填写流程唯一的 I/O 边界

pub mod fill_api;

pub use fill_api::FillApi;
