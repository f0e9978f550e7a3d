//! 接收方（B 端）状态机
//!
//! `expected` 加上每个序号格的“已收到”标志就是全部状态。
//! 标志只在分组到达到被交付之间为真，交付后立即清除，序号回绕后可复用。

use tracing::{debug, info, trace, warn};

use super::api::{Counter, NetApi, Side};
use super::config::ArqConfig;
use super::entity::ArqEntity;
use super::error::ArqError;
use super::packet::{Message, Packet};

/// 处理一个数据分组的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvOutcome {
    /// 校验和不符，丢弃且不回 ACK
    Corrupted,
    /// 校验和正确但 `seqnum` 不在序号空间内，丢弃且不回 ACK
    Malformed,
    /// 已回 ACK。`buffered` 表示本次是否新缓存；`delivered` 为本次交付给应用层的条数
    Acked {
        seqnum: usize,
        buffered: bool,
        delivered: usize,
    },
}

#[derive(Debug, Clone)]
pub struct Receiver {
    cfg: ArqConfig,
    expected: usize,
    buffer: Vec<Option<Packet>>,
    received: Vec<bool>,
}

impl Receiver {
    /// `cfg` 须已通过 [`ArqConfig::validate`]。
    pub fn new(cfg: ArqConfig) -> Self {
        Self {
            cfg,
            expected: 0,
            buffer: vec![None; cfg.seq_space],
            received: vec![false; cfg.seq_space],
        }
    }

    /// 下一个应按序交付的序号
    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn is_buffered(&self, seq: usize) -> bool {
        self.received.get(seq).copied().unwrap_or(false)
    }

    /// 接收窗口 `[expected, expected + window_size)`。
    /// 窗口外的序号只可能是已交付数据的重传。
    fn in_window(&self, seq: usize) -> bool {
        (seq + self.cfg.seq_space - self.expected) % self.cfg.seq_space < self.cfg.window_size
    }

    pub fn on_packet(&mut self, pkt: Packet, net: &mut dyn NetApi) -> RecvOutcome {
        if pkt.is_corrupted() {
            info!("----B: 收到损坏的分组，忽略");
            return RecvOutcome::Corrupted;
        }

        let Some(seqnum) = usize::try_from(pkt.seqnum)
            .ok()
            .filter(|&n| n < self.cfg.seq_space)
        else {
            warn!(seqnum = pkt.seqnum, "----B: 分组序号越界，丢弃");
            return RecvOutcome::Malformed;
        };

        info!(seqnum, "----B: 正确收到分组");
        net.record(Counter::PacketsReceived);

        let buffered = !self.received[seqnum] && self.in_window(seqnum);
        if buffered {
            self.buffer[seqnum] = Some(pkt);
            self.received[seqnum] = true;
        } else {
            debug!(seqnum, expected = self.expected, "----B: 重复分组，只回 ACK");
        }

        let delivered = self.deliver_in_order(net);

        // 每个正确到达的分组各回一个 ACK，不做累计合并
        net.to_layer3(Side::B, Packet::ack(pkt.seqnum));
        trace!(acknum = seqnum, "----B: 发送 ACK");

        RecvOutcome::Acked {
            seqnum,
            buffered,
            delivered,
        }
    }

    fn deliver_in_order(&mut self, net: &mut dyn NetApi) -> usize {
        let mut delivered = 0;
        while self.received[self.expected] {
            self.received[self.expected] = false;
            if let Some(pkt) = self.buffer[self.expected].take() {
                net.to_layer5(Side::B, pkt.payload);
                delivered += 1;
            }
            self.expected = (self.expected + 1) % self.cfg.seq_space;
        }
        if delivered > 0 {
            debug!(delivered, expected = self.expected, "----B: 按序交付");
        }
        delivered
    }
}

impl ArqEntity for Receiver {
    fn side(&self) -> Side {
        Side::B
    }

    fn init(&mut self) {
        *self = Receiver::new(self.cfg);
    }

    /// 单向部署：B 端不发送数据，调用不产生任何动作。
    fn output(&mut self, _msg: Message, _net: &mut dyn NetApi) -> Result<(), ArqError> {
        trace!("----B: 不支持反向发送，忽略");
        Ok(())
    }

    fn input(&mut self, pkt: Packet, net: &mut dyn NetApi) {
        let _ = self.on_packet(pkt, net);
    }

    /// B 端从不启动定时器。
    fn timer_interrupt(&mut self, _net: &mut dyn NetApi) {
        trace!("----B: 定时器中断（无动作）");
    }
}
