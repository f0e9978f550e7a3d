//! 事件、调度项与世界
//!
//! `Event` 是可被调度执行的动作；`ScheduledEvent` 是放进优先队列里的条目；
//! `World` 是事件作用的业务状态。

use super::simulator::Simulator;
use super::time::SimTime;
use std::any::Any;
use std::cmp::Ordering;

/// 业务层状态（收发实体、信道、统计等）。事件通过 `as_any_mut` 向下转型取得具体类型。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每个事件执行完后回调一次，可在这里决定是否停机。
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}

/// 事件：执行时消费自身（`self: Box<Self>`），可以把所有权转移给后续事件。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}

/// 队列条目：同一时刻的事件按调度先后（`seq`）执行。
pub struct ScheduledEvent {
    pub(crate) at: SimTime,
    pub(crate) seq: u64,
    pub(crate) ev: Box<dyn Event>,
}

impl ScheduledEvent {
    fn key(&self) -> (SimTime, u64) {
        (self.at, self.seq)
    }
}

// BinaryHeap 是 max-heap，这里反向比较得到“最早优先”。
impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ScheduledEvent {}
