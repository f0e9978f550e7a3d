//! Environment-facing API used by the protocol entities.

use serde::{Deserialize, Serialize};

use super::packet::{Packet, Payload};

/// Which end of the simplex connection an entity lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Sending end.
    A,
    /// Receiving end.
    B,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn peer(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Observability counters bumped by the entities.
///
/// Purely observational: nothing in the protocol reads them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    /// A send request was rejected because the window was full.
    WindowFull,
    /// A buffered packet was retransmitted on timeout.
    PacketsResent,
    /// An acknowledgment was accepted by the sender.
    TotalAcksReceived,
    /// An acknowledgment marked a slot for the first time.
    NewAcks,
    /// A data packet passed the receiver's checksum.
    PacketsReceived,
}

/// Minimal environment API for protocol entities.
///
/// The implementor owns the channel, the per-side timer, the application
/// sink and the counters; the entities only call into it.
pub trait NetApi {
    /// Hand a packet to the network on behalf of `side`.
    fn to_layer3(&mut self, side: Side, pkt: Packet);
    /// Arm `side`'s single retransmission timer `increment` time units from now.
    /// Arming a running timer replaces its deadline.
    fn start_timer(&mut self, side: Side, increment: f64);
    /// Deliver an in-order payload to the application above `side`.
    fn to_layer5(&mut self, side: Side, payload: Payload);
    /// Bump an observability counter.
    fn record(&mut self, counter: Counter);
}
