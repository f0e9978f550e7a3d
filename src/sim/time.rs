//! 仿真时间类型
//!
//! 仿真器内部用整数 tick 计时；协议层沿用“时间单位”（浮点）的口径，
//! 例如 RTT = 16.0 个时间单位。1 个时间单位 = 1000 tick。

/// 每个时间单位包含的 tick 数
pub const TICKS_PER_UNIT: u64 = 1_000;

/// 仿真时间（tick）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// 从时间单位（浮点）换算；负数与 NaN 视为 0，溢出饱和。
    pub fn from_units(units: f64) -> SimTime {
        if !(units > 0.0) {
            return SimTime::ZERO;
        }
        let ticks = (units * TICKS_PER_UNIT as f64).round();
        if ticks >= u64::MAX as f64 {
            SimTime(u64::MAX)
        } else {
            SimTime(ticks as u64)
        }
    }

    pub fn as_units(self) -> f64 {
        self.0 as f64 / TICKS_PER_UNIT as f64
    }

    pub fn saturating_add(self, d: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(d.0))
    }
}
