//! 分组与应用层消息
//!
//! 两者都是 C 布局（`#[repr(C)]`），与外部仿真器按字段逐一对应：
//! `seqnum/acknum/checksum` 为 `i32`，载荷固定 20 字节。

use serde::{Deserialize, Serialize};

use super::checksum::compute_checksum;
use super::config::NOTINUSE;

/// 载荷长度（协议常量，不可按消息配置）
pub const PAYLOAD_LEN: usize = 20;

/// 固定长度载荷
pub type Payload = [u8; PAYLOAD_LEN];

/// 应用层消息：与分组载荷一一对应。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub data: Payload,
}

impl Message {
    pub fn new(data: Payload) -> Self {
        Self { data }
    }

    /// 用同一个字节填满整条消息
    pub fn filled(byte: u8) -> Self {
        Self {
            data: [byte; PAYLOAD_LEN],
        }
    }
}

/// 网络分组。构造并发出后不再修改（重传发送的是缓存里的同一份拷贝）。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub seqnum: i32,
    pub acknum: i32,
    pub checksum: i32,
    pub payload: Payload,
}

impl Packet {
    /// 数据分组：`acknum` 不使用，校验和已填好。
    pub fn data(seqnum: i32, payload: Payload) -> Self {
        Self::sealed(seqnum, NOTINUSE, payload)
    }

    /// 确认分组：`seqnum` 为 0，载荷填 `'0'`。
    pub fn ack(acknum: i32) -> Self {
        Self::sealed(0, acknum, [b'0'; PAYLOAD_LEN])
    }

    fn sealed(seqnum: i32, acknum: i32, payload: Payload) -> Self {
        let mut pkt = Self {
            seqnum,
            acknum,
            checksum: 0,
            payload,
        };
        pkt.checksum = compute_checksum(&pkt);
        pkt
    }

    pub fn is_corrupted(&self) -> bool {
        super::checksum::is_corrupted(self)
    }
}
