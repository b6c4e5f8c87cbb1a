use crate::sim::{SimTime, TICKS_PER_UNIT};

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_units(1), SimTime(TICKS_PER_UNIT));
    assert_eq!(SimTime::from_units(16), SimTime(16_000));
    assert_eq!(SimTime::from_units_f64(16.0), SimTime::from_units(16));
    assert_eq!(SimTime::from_units_f64(0.0024), SimTime(2));
    assert_eq!(SimTime(2_500).as_units_f64(), 2.5);
}

#[test]
fn sim_time_conversions_saturate_and_clamp() {
    assert_eq!(SimTime::from_units(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_units_f64(f64::INFINITY), SimTime(u64::MAX));
    assert_eq!(SimTime::from_units_f64(-3.0), SimTime::ZERO);
    assert_eq!(SimTime::from_units_f64(f64::NAN), SimTime::ZERO);
    assert_eq!(SimTime(u64::MAX).after(SimTime(1)), SimTime(u64::MAX));
}
