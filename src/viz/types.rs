use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arq::{ArqConfig, Counter, Side};

/// 信道把分组的哪个字段改坏了
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptField {
    Payload,
    Seqnum,
    Acknum,
}

/// 可视化事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VizEventKind {
    /// 运行参数（t=0 的第一条事件）
    Meta {
        arq: ArqConfig,
        msgs: u64,
        loss_prob: f64,
        corrupt_prob: f64,
        lambda: f64,
        seed: u64,
    },
    /// 应用层产生第 `n` 条消息；`accepted=false` 表示被窗口拒绝
    AppMessage { n: u64, accepted: bool },
    /// 实体把分组交给网络层
    Send {
        side: Side,
        seqnum: i32,
        acknum: i32,
    },
    /// 信道丢包
    Lost { from: Side, seqnum: i32, acknum: i32 },
    /// 信道改坏分组（校验和不变）
    Corrupt { from: Side, field: CorruptField },
    /// 分组到达对端
    Arrive {
        to: Side,
        seqnum: i32,
        acknum: i32,
    },
    /// 载荷交付给应用层
    Deliver { side: Side, data: String },
    TimerStart { side: Side, deadline: f64 },
    /// 定时器到期并交给实体处理
    Timeout { side: Side },
    Counter { counter: Counter },
}

/// 一个可回放的事件（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizEvent {
    /// 仿真时间（时间单位）
    pub t: f64,
    #[serde(flatten)]
    pub kind: VizEventKind,
}

/// 事件收集器
#[derive(Debug, Default)]
pub struct VizLogger {
    pub events: Vec<VizEvent>,
}

impl VizLogger {
    pub fn push(&mut self, t: f64, kind: VizEventKind) {
        self.events.push(VizEvent { t, kind });
    }

    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let raw = serde_json::to_string_pretty(&self.events).map_err(io::Error::other)?;
        fs::write(path, raw)
    }
}
