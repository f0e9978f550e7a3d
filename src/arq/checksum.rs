//! 加性校验和
//!
//! `seqnum + acknum + Σ payload[i]`（`checksum` 字段本身不参与）。
//! 载荷字节按有符号 `char` 取值：`0x80..=0xFF` 计为 `-128..=-1`，
//! 与对端 C 实现算出的和一致。
//! 只能发现部分损坏：字节交换或相互抵消的改动得到相同的和。

use super::packet::Packet;

pub fn compute_checksum(pkt: &Packet) -> i32 {
    pkt.payload
        .iter()
        .fold(pkt.seqnum.wrapping_add(pkt.acknum), |sum, &b| {
            sum.wrapping_add(i32::from(b as i8))
        })
}

pub fn is_corrupted(pkt: &Packet) -> bool {
    pkt.checksum != compute_checksum(pkt)
}
