use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::arq::{Message, Packet, Side};
use crate::emu::{Channel, Transit};
use crate::sim::SimTime;

fn pkt(seq: i32) -> Packet {
    Packet::data(seq, Message::filled(b'a').data)
}

#[test]
fn clean_channel_preserves_order_and_bounds_delay() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut ch = Channel::new(0.0, 0.0);

    let now = SimTime::from_units(100.0);
    let mut last = now;
    for seq in 0..50 {
        match ch.submit(Side::A, pkt(seq % 7), now, &mut rng) {
            Transit::Arrives { at, pkt, corrupted } => {
                assert!(at > last, "arrivals must keep send order");
                assert!(at.0 - last.0 >= SimTime::from_units(1.0).0);
                assert!(at.0 - last.0 <= SimTime::from_units(10.0).0);
                assert_eq!(corrupted, None);
                assert!(!pkt.is_corrupted());
                last = at;
            }
            Transit::Lost => panic!("lossless channel dropped a packet"),
        }
    }
    assert_eq!((ch.lost, ch.corrupted), (0, 0));
}

#[test]
fn directions_are_scheduled_independently() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut ch = Channel::new(0.0, 0.0);
    let now = SimTime::ZERO;

    for seq in 0..10 {
        ch.submit(Side::A, pkt(seq), now, &mut rng);
    }
    match ch.submit(Side::B, Packet::ack(0), now, &mut rng) {
        Transit::Arrives { at, .. } => assert!(at <= SimTime::from_units(10.0)),
        Transit::Lost => panic!("lossless channel dropped a packet"),
    }
}

#[test]
fn lossy_channel_drops_everything() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut ch = Channel::new(1.0, 0.0);
    for seq in 0..20 {
        assert_eq!(ch.submit(Side::A, pkt(seq), SimTime::ZERO, &mut rng), Transit::Lost);
    }
    assert_eq!(ch.lost, 20);
}

#[test]
fn every_corruption_is_caught_by_checksum() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut ch = Channel::new(0.0, 1.0);
    for seq in 0..200 {
        let original = if seq % 2 == 0 { pkt(seq % 7) } else { Packet::ack(seq % 7) };
        match ch.submit(Side::A, original, SimTime::ZERO, &mut rng) {
            Transit::Arrives { pkt, corrupted, .. } => {
                assert!(corrupted.is_some());
                assert!(pkt.is_corrupted());
            }
            Transit::Lost => panic!("lossless channel dropped a packet"),
        }
    }
    assert_eq!(ch.corrupted, 200);
}
