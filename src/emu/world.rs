//! 仿真世界：两端实体 + 外部环境
//!
//! 实体与环境分成两个字段，事件处理时可以同时可变借用二者。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::any::Any;
use tracing::{debug, info, warn};

use super::channel::{Channel, Transit};
use super::config::EmuConfig;
use super::events::{PacketArrival, TimerInterrupt};
use super::timer::LogicalTimer;
use crate::arq::{ArqEntity, ConfigError, Counter, NetApi, Packet, Payload, Receiver, Sender, Side, Stats};
use crate::sim::{SimTime, Simulator, World};
use crate::viz::{VizEventKind, VizLogger};

/// 实体以外的一切：信道、定时器、应用层收发记录、计数器。
#[derive(Debug)]
pub struct EmuNet {
    pub cfg: EmuConfig,
    rng: StdRng,
    pub channel: Channel,
    timers: [LogicalTimer; 2],
    pub stats: Stats,
    /// 应用层已产生的消息数
    pub generated: u64,
    /// 自上一个新 ACK 以来 A 端连续超时的次数（窗口为空且还有消息要来时不计）
    pub idle_timeouts: u32,
    /// 被 A 端接受的消息载荷（按接受顺序）
    pub accepted: Vec<Payload>,
    /// B 端交付给应用层的载荷（按交付顺序）
    pub delivered: Vec<Payload>,
    pub viz: Option<VizLogger>,
}

impl EmuNet {
    pub fn new(cfg: EmuConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(cfg.seed),
            channel: Channel::new(cfg.loss_prob, cfg.corrupt_prob),
            timers: [LogicalTimer::default(), LogicalTimer::default()],
            stats: Stats::default(),
            generated: 0,
            idle_timeouts: 0,
            accepted: Vec::new(),
            delivered: Vec::new(),
            viz: None,
            cfg,
        }
    }

    pub fn timer(&self, side: Side) -> &LogicalTimer {
        &self.timers[side.index()]
    }

    pub(crate) fn timer_mut(&mut self, side: Side) -> &mut LogicalTimer {
        &mut self.timers[side.index()]
    }

    /// 下一条消息的间隔：`U(0, 2*lambda)`，均值为 `lambda`
    pub fn next_interarrival(&mut self) -> SimTime {
        SimTime::from_units(2.0 * self.cfg.lambda * self.rng.gen_range(0.0..1.0))
    }

    /// 应用层消息已全部产生，且每条被接受的消息都已交付
    pub fn is_complete(&self) -> bool {
        self.generated >= self.cfg.msgs && self.delivered.len() >= self.accepted.len()
    }

    /// 消息已全部产生，但连续 `max_idle_timeouts` 次超时都没有任何新 ACK：
    /// 信道全丢/全坏时重传永远不会成功，只能在这里收场。
    pub fn is_stalled(&self) -> bool {
        self.generated >= self.cfg.msgs && self.idle_timeouts >= self.cfg.max_idle_timeouts
    }

    pub fn viz(&mut self, now: SimTime, kind: VizEventKind) {
        if let Some(v) = self.viz.as_mut() {
            v.push(now.as_units(), kind);
        }
    }

    /// 绑定仿真器，得到实体可调用的 [`NetApi`]
    pub fn bind<'a>(&'a mut self, sim: &'a mut Simulator) -> Bound<'a> {
        Bound { net: self, sim }
    }
}

/// 事件处理期间的 `NetApi` 实现：环境 + 当前仿真器。
pub struct Bound<'a> {
    net: &'a mut EmuNet,
    sim: &'a mut Simulator,
}

impl NetApi for Bound<'_> {
    fn to_layer3(&mut self, side: Side, pkt: Packet) {
        let now = self.sim.now();
        self.net.viz(
            now,
            VizEventKind::Send {
                side,
                seqnum: pkt.seqnum,
                acknum: pkt.acknum,
            },
        );

        let net = &mut *self.net;
        match net.channel.submit(side, pkt, now, &mut net.rng) {
            Transit::Lost => {
                debug!(from = ?side, seqnum = pkt.seqnum, acknum = pkt.acknum, "信道丢包");
                net.viz(
                    now,
                    VizEventKind::Lost {
                        from: side,
                        seqnum: pkt.seqnum,
                        acknum: pkt.acknum,
                    },
                );
            }
            Transit::Arrives { at, pkt, corrupted } => {
                if let Some(field) = corrupted {
                    debug!(from = ?side, ?field, "信道损坏分组");
                    net.viz(now, VizEventKind::Corrupt { from: side, field });
                }
                self.sim.schedule(at, PacketArrival { to: side.peer(), pkt });
            }
        }
    }

    fn start_timer(&mut self, side: Side, increment: f64) {
        let deadline = self.sim.now().saturating_add(SimTime::from_units(increment));
        let generation = self.net.timer_mut(side).start(deadline);
        self.sim.schedule(deadline, TimerInterrupt { side, generation });
        self.net.viz(
            self.sim.now(),
            VizEventKind::TimerStart {
                side,
                deadline: deadline.as_units(),
            },
        );
    }

    fn to_layer5(&mut self, side: Side, payload: Payload) {
        self.net.delivered.push(payload);
        let data = String::from_utf8_lossy(&payload).into_owned();
        self.net.viz(self.sim.now(), VizEventKind::Deliver { side, data });
    }

    fn record(&mut self, counter: Counter) {
        if counter == Counter::NewAcks {
            self.net.idle_timeouts = 0;
        }
        self.net.stats.record(counter);
        self.net.viz(self.sim.now(), VizEventKind::Counter { counter });
    }
}

/// 一条单向连接的完整仿真世界
#[derive(Debug)]
pub struct EmuWorld {
    pub sender: Sender,
    pub receiver: Receiver,
    pub net: EmuNet,
}

impl EmuWorld {
    pub fn new(cfg: EmuConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut sender = Sender::new(cfg.arq);
        let mut receiver = Receiver::new(cfg.arq);
        sender.init();
        receiver.init();
        Ok(Self {
            sender,
            receiver,
            net: EmuNet::new(cfg),
        })
    }

    /// 取出某一端的实体，同时借出环境
    pub fn split(&mut self, side: Side) -> (&mut dyn ArqEntity, &mut EmuNet) {
        let entity: &mut dyn ArqEntity = match side {
            Side::A => &mut self.sender,
            Side::B => &mut self.receiver,
        };
        (entity, &mut self.net)
    }
}

impl World for EmuWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, sim: &mut Simulator) {
        if sim.is_halted() {
            return;
        }
        if self.net.is_complete() {
            info!(
                now = sim.now().as_units(),
                delivered = self.net.delivered.len(),
                "全部消息已交付，停止仿真"
            );
            sim.halt();
        } else if self.net.is_stalled() {
            warn!(
                now = sim.now().as_units(),
                idle_timeouts = self.net.idle_timeouts,
                delivered = self.net.delivered.len(),
                accepted = self.net.accepted.len(),
                "连续超时无进展，停止仿真"
            );
            sim.halt();
        }
    }
}
