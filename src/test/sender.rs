use super::recorder::RecordingNet;
use crate::arq::{AckOutcome, ArqConfig, ArqEntity, ArqError, Message, Packet, Sender, Side, RTT};

fn msg(n: u8) -> Message {
    Message::filled(b'a' + n)
}

#[test]
fn six_sends_fill_window_and_seventh_is_rejected() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());

    for i in 0..6 {
        assert_eq!(a.send(msg(i as u8), &mut net), Ok(i));
    }
    assert_eq!((a.base(), a.next_seq()), (0, 6));
    assert!(a.is_window_full());
    assert_eq!(net.sent_seqnums(), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(net.timer_starts.len(), 6);
    assert!(net.timer_starts.iter().all(|&(side, t)| side == Side::A && t == RTT));

    let before = a.clone();
    let err = a.send(msg(6), &mut net);
    assert_eq!(err, Err(ArqError::WindowFull { base: 0, next_seq: 6 }));
    assert_eq!(net.stats.window_full, 1);
    assert_eq!((a.base(), a.next_seq()), (0, 6));
    assert_eq!(net.sent.len(), 6, "rejected send must not transmit");
    assert_eq!(net.timer_starts.len(), 6, "rejected send must not touch the timer");
    for seq in 0..7 {
        assert_eq!(a.buffered(seq), before.buffered(seq));
        assert_eq!(a.is_acked(seq), before.is_acked(seq));
    }
}

#[test]
fn data_packet_fields() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());
    a.send(msg(2), &mut net).expect("window open");

    let (side, pkt) = net.sent[0];
    assert_eq!(side, Side::A);
    assert_eq!(pkt, Packet::data(0, [b'c'; 20]));
    assert_eq!(pkt.acknum, -1);
    assert!(!pkt.is_corrupted());
    assert_eq!(a.buffered(0), Some(&pkt));
}

#[test]
fn seven_send_ack_rounds_wrap_back_to_start() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());

    for round in 0..2 {
        for i in 0..7 {
            let seq = a.send(msg(i), &mut net).expect("window open");
            assert_eq!(seq, i as usize);
            let out = a.on_ack(Packet::ack(seq as i32), &mut net);
            assert_eq!(out, AckOutcome::New { acknum: seq, slid: 1 });
        }
        assert_eq!((a.base(), a.next_seq()), (0, 0), "round {round}");
        assert_eq!(a.outstanding(), 0);
    }
    assert_eq!(net.stats.new_acks, 14);
    assert_eq!(net.stats.total_acks_received, 14);
}

#[test]
fn out_of_order_ack_is_held_until_base_is_acked() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());
    for i in 0..3 {
        a.send(msg(i), &mut net).expect("window open");
    }

    assert_eq!(a.on_ack(Packet::ack(1), &mut net), AckOutcome::New { acknum: 1, slid: 0 });
    assert_eq!(a.base(), 0);
    assert!(a.is_acked(1));

    assert_eq!(a.on_ack(Packet::ack(0), &mut net), AckOutcome::New { acknum: 0, slid: 2 });
    assert_eq!((a.base(), a.next_seq()), (2, 3));
    assert!(!a.is_acked(0));
    assert!(!a.is_acked(1));
    assert_eq!(a.outstanding(), 1);
}

#[test]
fn corrupted_ack_leaves_state_untouched() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());
    a.send(msg(0), &mut net).expect("window open");

    let mut ack = Packet::ack(0);
    ack.payload[0] = b'Z';
    assert_eq!(a.on_ack(ack, &mut net), AckOutcome::Corrupted);
    assert_eq!((a.base(), a.next_seq()), (0, 1));
    assert!(!a.is_acked(0));
    assert_eq!(net.stats.total_acks_received, 0);
    assert_eq!(net.stats.new_acks, 0);
}

#[test]
fn duplicate_and_stale_acks_are_not_counted() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());
    for i in 0..2 {
        a.send(msg(i), &mut net).expect("window open");
    }

    assert!(matches!(a.on_ack(Packet::ack(1), &mut net), AckOutcome::New { .. }));
    assert_eq!(a.on_ack(Packet::ack(1), &mut net), AckOutcome::Duplicate);

    assert!(matches!(a.on_ack(Packet::ack(0), &mut net), AckOutcome::New { slid: 2, .. }));
    assert_eq!((a.base(), a.next_seq()), (2, 2));

    // 已滑出窗口的序号：再确认一次不能让 base 越过 next_seq
    assert_eq!(a.on_ack(Packet::ack(0), &mut net), AckOutcome::Stale);
    // 尚未发送的序号
    assert_eq!(a.on_ack(Packet::ack(2), &mut net), AckOutcome::Stale);
    assert_eq!((a.base(), a.next_seq()), (2, 2));
    assert_eq!(a.outstanding(), 0);
    assert_eq!(net.stats.new_acks, 2);
}

#[test]
fn ack_outside_sequence_space_is_malformed() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());
    a.send(msg(0), &mut net).expect("window open");

    assert_eq!(a.on_ack(Packet::ack(7), &mut net), AckOutcome::Malformed);
    assert_eq!(a.on_ack(Packet::ack(-1), &mut net), AckOutcome::Malformed);
    assert_eq!(a.outstanding(), 1);
}

#[test]
fn timeout_resends_every_unacked_packet_once_and_rearms_timer_once() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());
    for i in 0..3 {
        a.send(msg(i), &mut net).expect("window open");
    }
    let originals: Vec<Packet> = net.sent.iter().map(|&(_, p)| p).collect();
    net.clear();

    assert_eq!(a.on_timeout(&mut net), 3);
    assert_eq!(net.sent_seqnums(), vec![0, 1, 2]);
    let resent: Vec<Packet> = net.sent.iter().map(|&(_, p)| p).collect();
    assert_eq!(resent, originals, "retransmissions reuse the buffered packets");
    assert_eq!(net.timer_starts, vec![(Side::A, RTT)]);
    assert_eq!(net.stats.packets_resent, 3);
}

#[test]
fn timeout_skips_selectively_acked_slots_and_starts_at_base() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());
    // 先推进到 base=5，让窗口跨过回绕点
    for i in 0..5 {
        a.send(msg(i), &mut net).expect("window open");
        a.on_ack(Packet::ack(i as i32), &mut net);
    }
    for i in 0..4 {
        a.send(msg(i), &mut net).expect("window open");
    }
    assert_eq!((a.base(), a.next_seq()), (5, 2));
    a.on_ack(Packet::ack(6), &mut net);
    net.clear();

    assert_eq!(a.on_timeout(&mut net), 3);
    assert_eq!(net.sent_seqnums(), vec![5, 0, 1]);
    assert_eq!(net.timer_starts.len(), 1);
}

#[test]
fn timeout_with_empty_window_only_rearms() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());
    assert_eq!(a.on_timeout(&mut net), 0);
    assert!(net.sent.is_empty());
    assert_eq!(net.timer_starts.len(), 1);
}

#[test]
fn occupancy_never_exceeds_window() {
    let mut net = RecordingNet::default();
    let cfg = ArqConfig::default();
    let mut a = Sender::new(cfg);

    for step in 0..200u32 {
        let _ = a.send(msg((step % 26) as u8), &mut net);
        assert!(a.outstanding() <= cfg.window_size);
        if step % 3 == 0 {
            // 确认窗口里的第二个（若有），制造选择确认
            let seq = (a.base() + 1) % cfg.seq_space;
            a.on_ack(Packet::ack(seq as i32), &mut net);
        }
        if step % 4 == 0 {
            let base = a.base();
            a.on_ack(Packet::ack(base as i32), &mut net);
        }
        assert!(a.outstanding() <= cfg.window_size);
    }
    assert!(net.stats.window_full > 0);
}

#[test]
fn init_resets_window() {
    let mut net = RecordingNet::default();
    let mut a = Sender::new(ArqConfig::default());
    for i in 0..3 {
        a.output(msg(i), &mut net).expect("window open");
    }
    a.input(Packet::ack(1), &mut net);
    a.init();
    assert_eq!((a.base(), a.next_seq()), (0, 0));
    assert!(!a.is_acked(1));
    assert_eq!(a.side(), Side::A);
}
