use crate::arq::EndpointId;
use crate::emu::Timers;

#[test]
fn fire_with_current_generation_is_valid_once() {
    let mut t = Timers::default();
    let generation = t.start(EndpointId::A);
    assert!(t.is_running(EndpointId::A));

    assert!(t.fire(EndpointId::A, generation));
    assert!(!t.is_running(EndpointId::A));
    assert!(!t.fire(EndpointId::A, generation));
    assert_eq!(t.stats().fired, 1);
    assert_eq!(t.stats().stale, 1);
}

#[test]
fn stopped_timer_fire_is_stale() {
    let mut t = Timers::default();
    let first = t.start(EndpointId::A);
    t.stop(EndpointId::A);
    let second = t.start(EndpointId::A);

    assert!(!t.fire(EndpointId::A, first));
    assert!(t.is_running(EndpointId::A));
    assert!(t.fire(EndpointId::A, second));
    assert_eq!(t.stats().misuse, 0);
}

#[test]
fn misuse_is_counted() {
    let mut t = Timers::default();
    t.stop(EndpointId::B);
    let _ = t.start(EndpointId::B);
    let _ = t.start(EndpointId::B);
    assert_eq!(t.stats().misuse, 2);
    // A 与 B 相互独立
    assert!(!t.is_running(EndpointId::A));
}
