//! 网络/应用层仿真环境
//!
//! 把协议两端放进事件驱动仿真器里运行：
//! - 应用层按平均间隔 `lambda` 产生消息交给 A 端
//! - A→B、B→A 两条信道各自按概率丢包/损坏，但保持发送顺序
//! - 每端一个逻辑定时器，重复启动即替换截止时间
//!
//! 结构参照经典的 ABP/GBN 教学仿真器。

mod channel;
mod config;
mod events;
mod run;
mod timer;
mod world;

pub use channel::{Channel, Transit};
pub use config::EmuConfig;
pub use events::{AppArrival, PacketArrival, TimerInterrupt};
pub use run::{run, RunReport};
pub use timer::LogicalTimer;
pub use world::{Bound, EmuNet, EmuWorld};
