//! 不可靠但保序的单向信道
//!
//! 每个分组先按 `loss_prob` 决定是否丢弃；存活的分组到达时间为
//! `max(now, 该方向上一个分组的到达时间) + 1 + 9*U(0,1)`，所以不会乱序；
//! 再按 `corrupt_prob` 改坏一个字段（校验和保持原值）。

use rand::Rng;

use crate::arq::{Packet, Side};
use crate::sim::SimTime;
use crate::viz::CorruptField;

/// 损坏时写入序号/确认号的值
const GARBAGE: i32 = 999_999;

/// 一次提交的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transit {
    Lost,
    Arrives {
        at: SimTime,
        pkt: Packet,
        corrupted: Option<CorruptField>,
    },
}

#[derive(Debug, Clone)]
pub struct Channel {
    loss_prob: f64,
    corrupt_prob: f64,
    /// 每个方向上最后一个分组的到达时间
    last_arrival: [SimTime; 2],
    pub lost: u64,
    pub corrupted: u64,
}

impl Channel {
    pub fn new(loss_prob: f64, corrupt_prob: f64) -> Self {
        Self {
            loss_prob,
            corrupt_prob,
            last_arrival: [SimTime::ZERO; 2],
            lost: 0,
            corrupted: 0,
        }
    }

    pub fn submit<R: Rng>(
        &mut self,
        from: Side,
        mut pkt: Packet,
        now: SimTime,
        rng: &mut R,
    ) -> Transit {
        if rng.gen_range(0.0..1.0) < self.loss_prob {
            self.lost += 1;
            return Transit::Lost;
        }

        let delay = SimTime::from_units(1.0 + 9.0 * rng.gen_range(0.0..1.0));
        let at = now.max(self.last_arrival[from.index()]).saturating_add(delay);
        self.last_arrival[from.index()] = at;

        let corrupted = if rng.gen_range(0.0..1.0) < self.corrupt_prob {
            self.corrupted += 1;
            let x = rng.gen_range(0.0..1.0);
            let field = if x < 0.75 {
                pkt.payload[0] = b'Z';
                CorruptField::Payload
            } else if x < 0.875 {
                pkt.seqnum = GARBAGE;
                CorruptField::Seqnum
            } else {
                pkt.acknum = GARBAGE;
                CorruptField::Acknum
            };
            Some(field)
        } else {
            None
        };

        Transit::Arrives { at, pkt, corrupted }
    }
}
