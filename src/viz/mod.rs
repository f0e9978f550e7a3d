//! 结构化事件记录（用于离线回放/排查）
//!
//! 设计目标：
//! - **结构化**：用 JSON 事件而不是解析文本日志
//! - **轻量**：全部存内存，仿真结束一次性写文件

mod types;

pub use types::{CorruptField, VizEvent, VizEventKind, VizLogger};
