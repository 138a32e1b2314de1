//! 点击分析模块
//!
//! 重定向成功后生成 `ClickEvent`，经有界队列异步写入存储。

pub mod event;
pub mod pipeline;
pub mod sink;

pub use event::{CaptureLimits, ClickEvent, ClientInfo, hash_client, truncate};
pub use pipeline::{ClickPipeline, ClickRecorder, DrainReport, PipelineStats};
pub use sink::ClickSink;
