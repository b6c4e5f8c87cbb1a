use crate::arq::{ArqConfig, ConfigError, EndpointId};
use crate::chan::ChannelConfig;
use crate::emu::{EmuConfig, SrWorld, message_for, run, run_traced};
use crate::sim::{SimTime, Simulator};
use crate::trace::TraceEventKind;

fn expected(n: u64) -> Vec<[u8; 20]> {
    (0..n).map(message_for).collect()
}

fn lossy(seed: u64, messages: u64) -> EmuConfig {
    EmuConfig {
        channel: ChannelConfig {
            loss_prob: 0.2,
            corrupt_prob: 0.2,
            ..ChannelConfig::default()
        },
        messages,
        seed,
        ..EmuConfig::default()
    }
}

#[test]
fn perfect_channel_delivers_every_message_once_in_order() {
    let report = run(&EmuConfig::default()).expect("valid config");

    assert!(report.stats.complete);
    assert_eq!(report.delivered, expected(20));
    assert_eq!(report.stats.app.mismatched, 0);
    assert_eq!(report.stats.sender.sent, 20);
    assert_eq!(report.stats.receiver.corrupted, 0);
    assert_eq!(report.stats.channel.a_to_b.lost, 0);
    assert_eq!(report.stats.timers.misuse, 0);
    assert!(report.finished_at > SimTime::ZERO);
}

#[test]
fn lossy_corrupting_channel_still_delivers_everything_in_order() {
    for seed in [1, 2, 3, 99] {
        let report = run(&lossy(seed, 200)).expect("valid config");
        let s = &report.stats;

        assert!(s.complete, "seed {seed} did not finish");
        assert_eq!(report.delivered, expected(200), "seed {seed}");
        assert_eq!(s.app.mismatched, 0);
        assert_eq!(s.receiver.delivered, 200);
        assert_eq!(s.sender.sent, 200);
        assert!(s.sender.retransmitted > 0);
        assert!(s.channel.a_to_b.lost > 0);
        assert!(s.channel.b_to_a.corrupted > 0);
        assert_eq!(s.timers.misuse, 0);
    }
}

#[test]
fn fast_application_hits_window_full_and_retries_in_order() {
    let cfg = EmuConfig {
        mean_gap: SimTime::from_units(1),
        messages: 100,
        ..lossy(5, 100)
    };
    let report = run(&cfg).expect("valid config");

    assert!(report.stats.complete);
    assert!(report.stats.sender.window_full > 0);
    assert_eq!(report.stats.app.retries, report.stats.sender.window_full);
    assert_eq!(report.delivered, expected(100));
}

#[test]
fn trace_matches_counters() {
    let report = run_traced(&lossy(11, 80)).expect("valid config");
    let s = &report.stats;
    let trace = report.trace.as_ref().expect("trace enabled");

    let count = |pred: fn(&TraceEventKind) -> bool| trace.count(pred) as u64;
    assert_eq!(
        count(|k| matches!(k, TraceEventKind::SendData { .. })),
        s.sender.sent
    );
    assert_eq!(
        count(|k| matches!(k, TraceEventKind::Retransmit { .. })),
        s.sender.retransmitted
    );
    assert_eq!(
        count(|k| matches!(k, TraceEventKind::Deliver { .. })),
        s.receiver.delivered
    );
    assert_eq!(
        count(|k| matches!(k, TraceEventKind::SendAck { .. })),
        s.receiver.acks_sent
    );
    assert_eq!(
        count(|k| matches!(k, TraceEventKind::Lost { .. })),
        s.channel.a_to_b.lost + s.channel.b_to_a.lost
    );

    // 时间单调不减
    assert!(trace.events.windows(2).all(|w| w[0].t <= w[1].t));
    // 交付只发生在 B
    assert!(trace
        .events
        .iter()
        .filter(|e| matches!(e.kind, TraceEventKind::Deliver { .. }))
        .all(|e| e.endpoint == EndpointId::B));
}

#[test]
fn same_seed_reproduces_the_run() {
    let a = run(&lossy(21, 60)).expect("valid config");
    let b = run(&lossy(21, 60)).expect("valid config");
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.finished_at, b.finished_at);
}

#[test]
fn world_ends_idle_after_completion() {
    let cfg = lossy(4, 50);
    let mut sim = Simulator::default();
    let mut world = SrWorld::new(&cfg).expect("valid config");
    world.kick_off(&mut sim);
    sim.run(&mut world);

    assert!(world.is_complete());
    assert_eq!(world.sender().count(), 0);
    assert!(!world.sender().timer_running());
    assert!(!world.timers().is_running(EndpointId::A));
    assert_eq!(world.receiver().base(), world.sender().base());
    assert_eq!(world.sink().delivered().len(), 50);
}

#[test]
fn zero_messages_runs_no_events() {
    let cfg = EmuConfig {
        messages: 0,
        ..EmuConfig::default()
    };
    let report = run(&cfg).expect("valid config");
    assert!(report.stats.complete);
    assert_eq!(report.stats.events, 0);
    assert!(report.delivered.is_empty());
}

#[test]
fn undersized_sequence_space_is_rejected() {
    let cfg = EmuConfig {
        arq: ArqConfig {
            window: 8,
            seq_space: 12,
            ..ArqConfig::default()
        },
        ..EmuConfig::default()
    };
    assert_eq!(
        run(&cfg).err(),
        Some(ConfigError::SeqSpaceTooSmall {
            window: 8,
            seq_space: 12
        })
    );
}
