//! 仿真器
//!
//! 事件驱动仿真器：维护当前时间与事件队列，一次只执行一个事件，
//! 执行完毕后才取下一个。

use super::event::{Event, ScheduledEvent, World};
use super::time::SimTime;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 事件驱动仿真器。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent>,
    halted: bool,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 队列中尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 请求停止：当前事件执行完后 `run`/`run_until` 返回，剩余事件保留在队列中。
    ///
    /// 重传定时器每次超时都会重新启动，队列永远不会自然变空，
    /// 因此由上层在“所有消息已交付”时显式停机。
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// 在 `now + delay` 调度事件
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, ev: E) {
        let at = self.now.saturating_add(delay);
        self.schedule(at, ev);
    }

    /// 调度事件在指定时间执行（早于当前时间的按当前时间处理）
    #[tracing::instrument(level = "trace", skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        let at = at.max(self.now);
        trace!(now = ?self.now, seq, "调度事件");
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });
    }

    /// 运行直到事件队列为空、被 `halt`，或下一个事件晚于 `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        while !self.halted {
            let Some(top) = self.q.peek() else {
                break;
            };
            if top.at > until {
                break;
            }
            let Some(item) = self.q.pop() else {
                break;
            };
            self.step(item, world);
        }
        if !self.halted {
            self.now = self.now.max(until);
        }
    }

    /// 运行直到事件队列为空或被 `halt`。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!("▶️  开始运行仿真");
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");

        let mut event_count: u64 = 0;
        while !self.halted {
            let Some(item) = self.q.pop() else {
                break;
            };
            event_count += 1;
            self.step(item, world);
        }

        info!(
            total_events = event_count,
            final_time = ?self.now,
            halted = self.halted,
            "✅ 仿真结束"
        );
    }

    fn step(&mut self, item: ScheduledEvent, world: &mut dyn World) {
        self.now = item.at;
        debug!(
            now = ?self.now,
            seq = item.seq,
            remaining_queue = self.q.len(),
            "执行事件"
        );
        item.ev.execute(self, world);
        world.on_tick(self);
    }
}
