//! 可靠传输协议核心（滑动窗口 ARQ）
//!
//! 单向传输：A 端为发送方，B 端为接收方。
//! - 发送方：窗口内编号、缓存未确认分组、单一重传定时器、超时批量重传
//! - 接收方：按序交付、乱序缓存、逐包确认（非累计 ACK）
//!
//! 核心只通过 [`NetApi`] 与外部（信道、定时器、应用层、计数器）交互。

mod api;
mod checksum;
mod config;
mod entity;
mod error;
mod packet;
mod receiver;
mod sender;
mod stats;

pub use api::{Counter, NetApi, Side};
pub use checksum::{compute_checksum, is_corrupted};
pub use config::{ArqConfig, NOTINUSE, RTT, SEQSPACE, WINDOWSIZE};
pub use entity::ArqEntity;
pub use error::{ArqError, ConfigError};
pub use packet::{Message, Packet, Payload, PAYLOAD_LEN};
pub use receiver::{Receiver, RecvOutcome};
pub use sender::{AckOutcome, Sender};
pub use stats::Stats;
