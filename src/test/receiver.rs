use super::support::{RecordingEnv, cfg, msg};
use crate::arq::{ACK_FILLER, EndpointId, PAYLOAD_LEN, Packet, Receiver, RecvOutcome};

fn receiver() -> Receiver {
    Receiver::new(EndpointId::B, cfg())
}

fn data(seq: u32) -> Packet {
    Packet::data(seq, msg(b'a' + seq as u8))
}

#[test]
fn in_order_packet_is_delivered_and_acked() {
    let mut env = RecordingEnv::default();
    let mut r = receiver();

    assert_eq!(
        r.on_packet(&data(0), &mut env),
        RecvOutcome::Accepted {
            delivered: 1,
            duplicate: false
        }
    );
    assert_eq!(env.delivered, vec![msg(b'a')]);
    assert_eq!(r.base(), 1);

    assert_eq!(env.wire.len(), 1);
    let (from, ack) = &env.wire[0];
    assert_eq!(*from, EndpointId::B);
    assert_eq!(ack.acknum, Some(0));
    assert_eq!(ack.payload, [ACK_FILLER; PAYLOAD_LEN]);
    assert!(!ack.is_corrupted());
}

#[test]
fn out_of_order_packets_are_buffered_until_gap_fills() {
    let mut env = RecordingEnv::default();
    let mut r = receiver();

    // 0 丢失，1 和 2 先到
    for seq in [1, 2] {
        assert_eq!(
            r.on_packet(&data(seq), &mut env),
            RecvOutcome::Accepted {
                delivered: 0,
                duplicate: false
            }
        );
    }
    assert!(env.delivered.is_empty());
    assert_eq!(r.base(), 0);
    assert_eq!(r.buffered(), vec![1, 2]);

    assert_eq!(
        r.on_packet(&data(0), &mut env),
        RecvOutcome::Accepted {
            delivered: 3,
            duplicate: false
        }
    );
    assert_eq!(env.delivered, vec![msg(b'a'), msg(b'b'), msg(b'c')]);
    assert_eq!(r.base(), 3);
    assert!(r.buffered().is_empty());
    // 每个包一个 ACK，acknum 就是包的序号
    assert_eq!(env.acknums(), vec![Some(1), Some(2), Some(0)]);
}

#[test]
fn redelivered_packet_is_acked_but_not_delivered_twice() {
    let mut env = RecordingEnv::default();
    let mut r = receiver();
    let _ = r.on_packet(&data(0), &mut env);
    let _ = r.on_packet(&data(1), &mut env);

    assert_eq!(r.on_packet(&data(0), &mut env), RecvOutcome::OutOfWindow);
    assert_eq!(r.on_packet(&data(1), &mut env), RecvOutcome::OutOfWindow);

    assert_eq!(env.delivered.len(), 2);
    assert_eq!(env.acknums(), vec![Some(0), Some(1), Some(0), Some(1)]);
    assert_eq!(r.stats().out_of_window, 2);
}

#[test]
fn duplicate_inside_window_overwrites_harmlessly() {
    let mut env = RecordingEnv::default();
    let mut r = receiver();
    let _ = r.on_packet(&data(3), &mut env);

    assert_eq!(
        r.on_packet(&data(3), &mut env),
        RecvOutcome::Accepted {
            delivered: 0,
            duplicate: true
        }
    );
    assert_eq!(r.buffered(), vec![3]);
    assert_eq!(r.stats().duplicates, 1);
    assert_eq!(env.wire.len(), 2);
}

#[test]
fn packet_beyond_window_is_never_buffered() {
    let mut env = RecordingEnv::default();
    let mut r = receiver();

    for seq in 6..12 {
        assert_eq!(r.on_packet(&data(seq), &mut env), RecvOutcome::OutOfWindow);
    }
    assert!(r.buffered().is_empty());
    assert!(env.delivered.is_empty());
    assert_eq!(env.wire.len(), 6);
}

#[test]
fn corrupted_packet_is_dropped_without_ack() {
    let mut env = RecordingEnv::default();
    let mut r = receiver();

    let mut pkt = data(0);
    pkt.payload[0] = b'z';
    assert_eq!(r.on_packet(&pkt, &mut env), RecvOutcome::Corrupted);

    assert!(env.wire.is_empty());
    assert!(env.delivered.is_empty());
    assert_eq!(r.base(), 0);
    assert_eq!(r.stats().corrupted, 1);
}

#[test]
fn ack_sequence_numbers_alternate_starting_at_one() {
    let mut env = RecordingEnv::default();
    let mut r = receiver();
    for seq in 0..4 {
        let _ = r.on_packet(&data(seq), &mut env);
    }
    assert_eq!(env.wire_seqs(), vec![1, 0, 1, 0]);
}

#[test]
fn window_slides_across_sequence_wrap() {
    let mut env = RecordingEnv::default();
    let mut r = receiver();
    for seq in 0..10 {
        let _ = r.on_packet(&data(seq), &mut env);
    }
    assert_eq!(r.base(), 10);

    // 11, 0, 1 先到，10 最后到
    for seq in [11, 0, 1] {
        let _ = r.on_packet(&data(seq), &mut env);
    }
    assert_eq!(r.buffered(), vec![11, 0, 1]);
    assert_eq!(
        r.on_packet(&data(10), &mut env),
        RecvOutcome::Accepted {
            delivered: 4,
            duplicate: false
        }
    );
    assert_eq!(r.base(), 2);
    assert_eq!(env.delivered.len(), 14);
}

#[test]
fn init_clears_buffer_and_base() {
    let mut env = RecordingEnv::default();
    let mut r = receiver();
    let _ = r.on_packet(&data(0), &mut env);
    let _ = r.on_packet(&data(2), &mut env);

    r.init();
    assert_eq!(r.base(), 0);
    assert!(r.buffered().is_empty());
    env.wire.clear();
    let _ = r.on_packet(&data(0), &mut env);
    assert_eq!(env.wire_seqs(), vec![1]);
}
