//! 单个逻辑定时器
//!
//! 没有取消操作：只能等它到期或重新启动。仿真器里已调度的超时事件无法撤回，
//! 所以每次启动都换一个代号，到期事件带着启动时的代号回来，对不上就说明已被替换。

use crate::sim::SimTime;

#[derive(Debug, Default, Clone)]
pub struct LogicalTimer {
    generation: u64,
    deadline: Option<SimTime>,
}

impl LogicalTimer {
    /// 启动（或重新启动）并返回本次的代号
    pub fn start(&mut self, deadline: SimTime) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.deadline = Some(deadline);
        self.generation
    }

    /// 到期事件回调：代号匹配且仍在运行时返回 true，并进入停止状态。
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.deadline.is_some() && generation == self.generation {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<SimTime> {
        self.deadline
    }
}
