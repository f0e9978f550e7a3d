//! 发送方（A 端）状态机
//!
//! - 窗口占用 = `(next_seq - base) mod seq_space`，永远不超过 `window_size`
//! - 每个 ACK 只确认它自己的序号（选择确认），窗口按序滑动
//! - 只有一个逻辑定时器：每次发送、每次超时都重新启动；
//!   超时时重传窗口内所有未确认分组（Go-Back-N 式批量重传）
//!
//! 状态“空闲/窗口满”不单独保存，每次操作都由 `base`/`next_seq` 重新推出。

use tracing::{debug, info, trace, warn};

use super::api::{Counter, NetApi, Side};
use super::config::ArqConfig;
use super::entity::ArqEntity;
use super::error::ArqError;
use super::packet::{Message, Packet};

/// 处理一个 ACK 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// 校验和不符，忽略
    Corrupted,
    /// 校验和正确但 `acknum` 不在序号空间内
    Malformed,
    /// 不属于当前未确认窗口（迟到的重复 ACK）
    Stale,
    /// 该序号此前已被确认
    Duplicate,
    /// 首次确认；`slid` 为窗口因此前移的格数
    New { acknum: usize, slid: usize },
}

#[derive(Debug, Clone)]
pub struct Sender {
    cfg: ArqConfig,
    /// 最早的未确认序号
    base: usize,
    /// 下一个待分配序号
    next_seq: usize,
    /// 序号 -> 最近一次发出的分组（只对窗口内的序号有意义）
    buffer: Vec<Option<Packet>>,
    acked: Vec<bool>,
}

impl Sender {
    /// `cfg` 须已通过 [`ArqConfig::validate`]。
    pub fn new(cfg: ArqConfig) -> Self {
        Self {
            cfg,
            base: 0,
            next_seq: 0,
            buffer: vec![None; cfg.seq_space],
            acked: vec![false; cfg.seq_space],
        }
    }

    pub fn config(&self) -> &ArqConfig {
        &self.cfg
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn next_seq(&self) -> usize {
        self.next_seq
    }

    /// 已发送、未确认的分组数
    pub fn outstanding(&self) -> usize {
        (self.next_seq + self.cfg.seq_space - self.base) % self.cfg.seq_space
    }

    pub fn is_window_full(&self) -> bool {
        self.outstanding() >= self.cfg.window_size
    }

    pub fn is_acked(&self, seq: usize) -> bool {
        self.acked.get(seq).copied().unwrap_or(false)
    }

    /// 窗口内某序号缓存的分组
    pub fn buffered(&self, seq: usize) -> Option<&Packet> {
        if self.in_window(seq) {
            self.buffer[seq].as_ref()
        } else {
            None
        }
    }

    /// `seq` 是否处于 `[base, next_seq)`（取模意义下）
    fn in_window(&self, seq: usize) -> bool {
        seq < self.cfg.seq_space
            && (seq + self.cfg.seq_space - self.base) % self.cfg.seq_space < self.outstanding()
    }

    /// 接受一条消息并发出；返回分配的序号。
    ///
    /// 窗口满时不改变任何状态，计数 `WindowFull` 并返回错误，重试由调用方负责。
    pub fn send(&mut self, msg: Message, net: &mut dyn NetApi) -> Result<usize, ArqError> {
        if self.is_window_full() {
            info!(base = self.base, next_seq = self.next_seq, "----A: 窗口已满，无法发送");
            net.record(Counter::WindowFull);
            return Err(ArqError::WindowFull {
                base: self.base,
                next_seq: self.next_seq,
            });
        }

        let seq = self.next_seq;
        // validate() 保证 seq_space 能放进 i32
        let pkt = Packet::data(seq as i32, msg.data);
        self.buffer[seq] = Some(pkt);
        self.acked[seq] = false;

        net.to_layer3(Side::A, pkt);
        net.start_timer(Side::A, self.cfg.rtt);
        info!(seq, "----A: 发送分组");

        self.next_seq = (seq + 1) % self.cfg.seq_space;
        debug!(base = self.base, next_seq = self.next_seq, outstanding = self.outstanding(), "窗口状态");
        Ok(seq)
    }

    /// 处理一个从 B 端返回的 ACK。
    pub fn on_ack(&mut self, pkt: Packet, net: &mut dyn NetApi) -> AckOutcome {
        if pkt.is_corrupted() {
            info!("----A: 收到损坏的 ACK，忽略");
            return AckOutcome::Corrupted;
        }

        let Some(acknum) = usize::try_from(pkt.acknum)
            .ok()
            .filter(|&n| n < self.cfg.seq_space)
        else {
            warn!(acknum = pkt.acknum, "----A: ACK 序号越界，忽略");
            return AckOutcome::Malformed;
        };

        // 窗口外的 ACK 若被记下，会让 base 越过 next_seq
        if !self.in_window(acknum) {
            debug!(acknum, base = self.base, next_seq = self.next_seq, "----A: 窗口外的 ACK，忽略");
            return AckOutcome::Stale;
        }
        if self.acked[acknum] {
            debug!(acknum, "----A: 重复 ACK");
            return AckOutcome::Duplicate;
        }

        self.acked[acknum] = true;
        info!(acknum, "----A: 收到 ACK");
        net.record(Counter::TotalAcksReceived);
        net.record(Counter::NewAcks);

        let slid = self.slide();
        AckOutcome::New { acknum, slid }
    }

    /// 从 `base` 开始，把连续已确认的格子移出窗口。
    fn slide(&mut self) -> usize {
        let mut slid = 0;
        while self.outstanding() > 0 && self.acked[self.base] {
            self.acked[self.base] = false;
            self.buffer[self.base] = None;
            self.base = (self.base + 1) % self.cfg.seq_space;
            slid += 1;
        }
        if slid > 0 {
            trace!(slid, base = self.base, next_seq = self.next_seq, "窗口前移");
        }
        slid
    }

    /// 定时器到期：按 `base` 起的升序重传所有未确认分组，然后只重启一次定时器。
    /// 返回重传的分组数。
    pub fn on_timeout(&mut self, net: &mut dyn NetApi) -> usize {
        info!(base = self.base, outstanding = self.outstanding(), "----A: 定时器中断，检查未确认分组");

        let mut resent = 0;
        for i in 0..self.outstanding() {
            let seq = (self.base + i) % self.cfg.seq_space;
            if self.acked[seq] {
                continue;
            }
            let Some(pkt) = self.buffer[seq] else {
                continue;
            };
            net.to_layer3(Side::A, pkt);
            net.record(Counter::PacketsResent);
            info!(seq, "----A: 重传分组");
            resent += 1;
        }

        net.start_timer(Side::A, self.cfg.rtt);
        resent
    }
}

impl ArqEntity for Sender {
    fn side(&self) -> Side {
        Side::A
    }

    fn init(&mut self) {
        *self = Sender::new(self.cfg);
    }

    fn output(&mut self, msg: Message, net: &mut dyn NetApi) -> Result<(), ArqError> {
        self.send(msg, net).map(|_| ())
    }

    fn input(&mut self, pkt: Packet, net: &mut dyn NetApi) {
        let _ = self.on_ack(pkt, net);
    }

    fn timer_interrupt(&mut self, net: &mut dyn NetApi) {
        let _ = self.on_timeout(net);
    }
}
