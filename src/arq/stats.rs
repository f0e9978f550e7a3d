//! 计数器
//!
//! 只做观测，不影响协议行为。

use serde::Serialize;

use super::api::Counter;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub window_full: u64,
    pub packets_resent: u64,
    pub total_acks_received: u64,
    pub new_acks: u64,
    pub packets_received: u64,
}

impl Stats {
    pub fn record(&mut self, counter: Counter) {
        let slot = match counter {
            Counter::WindowFull => &mut self.window_full,
            Counter::PacketsResent => &mut self.packets_resent,
            Counter::TotalAcksReceived => &mut self.total_acks_received,
            Counter::NewAcks => &mut self.new_acks,
            Counter::PacketsReceived => &mut self.packets_received,
        };
        *slot = slot.saturating_add(1);
    }
}
