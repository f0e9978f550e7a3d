//! 协议实体的统一能力集
//!
//! 外部仿真器按“应用层下发 / 网络层到达 / 定时器超时”三类事件驱动两端。
//! 单向部署下接收方不产生数据，也不使用定时器：它的 `output` 与
//! `timer_interrupt` 是显式的空操作（仿真器仍可能调用它们）。

use super::api::{NetApi, Side};
use super::error::ArqError;
use super::packet::{Message, Packet};

pub trait ArqEntity {
    /// 实体所在的一端
    fn side(&self) -> Side;

    /// 恢复初始状态（A_init / B_init）
    fn init(&mut self);

    /// 应用层下发一条消息
    fn output(&mut self, msg: Message, net: &mut dyn NetApi) -> Result<(), ArqError>;

    /// 网络层交上来一个分组
    fn input(&mut self, pkt: Packet, net: &mut dyn NetApi);

    /// 本端定时器到期
    fn timer_interrupt(&mut self, net: &mut dyn NetApi);
}
