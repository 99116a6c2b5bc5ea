// End-to-end scenarios driven through the public API on the simulated board.

use pressmat_trigger::boards::Board;
use pressmat_trigger::events::CalibrationStatus;
use pressmat_trigger::sim::SimPlatform;
use pressmat_trigger::{
    AnalogSource, Level, SettleOutcome, SettleReason, SignalOutcome, TriggerConfig, TriggerDevice,
};

/// ATtiny85 profile: one sensor on A1, LED on pin 1.
const FSR: AnalogSource = AnalogSource(1);
const LED: i32 = 1;

fn single_sensor_config(normally_closed: bool) -> TriggerConfig {
    let mut config = TriggerConfig::for_board(Board::Attiny85);
    config.normally_closed = normally_closed;
    config.threshold = 50;
    config.noise_ceiling = 2;
    config.signal_timeout_ms = 3_000;
    config.settle_timeout_ms = 120_000;
    config
}

fn settled_device(config: TriggerConfig) -> TriggerDevice<SimPlatform> {
    let mut sim = SimPlatform::new();
    sim.cycle(FSR, &[511, 512, 513, 512]);
    let mut device = TriggerDevice::new(config, sim).expect("valid config");
    let report = device.setup().expect("startup settle");
    assert!(report.all_settled());

    let channel = &device.channels()[0];
    assert!((channel.baseline() - 512).abs() <= 1);
    assert!(channel.noise_floor() <= 2);

    let sim = device.platform_mut();
    sim.set_steady(FSR, 512);
    sim.clear_logs();
    device
}

fn output_levels(device: &TriggerDevice<SimPlatform>) -> Vec<Level> {
    device.platform().output_log().iter().map(|&(_, level)| level).collect()
}

#[test]
fn press_and_release_returns_to_baseline() {
    let mut device = settled_device(single_sensor_config(false));

    device.platform_mut().script(FSR, &[600, 600, 600]);
    device.platform_mut().set_steady(FSR, 520);
    let cycle = device.poll();

    assert_eq!(cycle.events.len(), 1);
    let event = cycle.events[0];
    assert_eq!(event.sensor, 0);
    assert_eq!(event.outcome, SignalOutcome::ReturnedToBaseline);
    assert_eq!(output_levels(&device), vec![Level::High, Level::Low]);
    assert_eq!(device.platform().indicator(LED), Some(Level::Low));

    // Back to idle: further quiet polls make no transitions.
    device.platform_mut().clear_logs();
    for _ in 0..5 {
        assert!(device.poll().events.is_empty());
    }
    assert!(device.platform().output_log().is_empty());
}

#[test]
fn sustained_press_times_out() {
    let config = single_sensor_config(false);
    let timeout = config.signal_timeout_ms;
    let mut device = settled_device(config);

    device.platform_mut().set_steady(FSR, 563);
    let cycle = device.poll();

    let event = cycle.events[0];
    assert_eq!(event.outcome, SignalOutcome::TimedOut);
    assert!(event.duration_ms() > timeout);
    assert!(event.duration_ms() <= timeout + 3);
    assert_eq!(output_levels(&device), vec![Level::High, Level::Low]);
}

#[test]
fn normally_closed_inverts_levels_before_and_during_signal() {
    let mut sim = SimPlatform::new();
    sim.set_steady(FSR, 512);
    let mut device =
        TriggerDevice::new(single_sensor_config(true), sim).expect("valid config");
    device.setup();
    assert_eq!(device.platform().output(), Some(Level::High));

    device.platform_mut().clear_logs();
    device.platform_mut().script(FSR, &[700, 700, 700, 700, 700, 700]);
    device.poll();

    assert_eq!(output_levels(&device), vec![Level::Low, Level::High]);
}

#[test]
fn normally_open_idles_low() {
    let mut sim = SimPlatform::new();
    sim.set_steady(FSR, 512);
    let mut device =
        TriggerDevice::new(single_sensor_config(false), sim).expect("valid config");
    device.setup();
    assert_eq!(device.platform().output(), Some(Level::Low));
}

#[test]
fn one_shot_ignores_drift_and_age() {
    let mut config = single_sensor_config(false);
    config.one_shot_settle = true;
    let mut device = settled_device(config);
    let baseline = device.channels()[0].baseline();

    device.platform_mut().set_steady(FSR, 100);
    for _ in 0..10 {
        device.platform_mut().advance(60_000);
        assert!(device.poll().settle.is_none());
    }

    assert_eq!(device.channels()[0].baseline(), baseline);
    assert_eq!(device.calibration().settle_count, 1);
}

#[test]
fn periodic_mode_resettles_on_drift() {
    let mut device = settled_device(single_sensor_config(false));

    device.platform_mut().set_steady(FSR, 400);
    let cycle = device.poll();

    let report = cycle.settle.expect("drift settle");
    assert_eq!(report.reason, SettleReason::Drift);
    assert_eq!(report.outcomes, vec![SettleOutcome::Settled { baseline: 400, noise_floor: 0 }]);
    assert_eq!(device.calibration().settle_count, 2);
}

#[test]
fn non_converging_sensor_stays_disarmed() {
    let mut config = single_sensor_config(false);
    config.max_settle_samples = 200;
    let mut sim = SimPlatform::new();
    sim.cycle(FSR, &[100, 900]);
    let mut device = TriggerDevice::new(config, sim).expect("valid config");

    let report = device.setup().expect("startup report");
    assert!(!report.all_settled());
    assert!(device.calibration().startup_complete);
    assert_eq!(device.channels()[0].status(), CalibrationStatus::Uncalibrated);

    // Still noisy: every poll retries the settle, never signals.
    device.platform_mut().clear_logs();
    let cycle = device.poll();
    assert!(cycle.events.is_empty());
    assert_eq!(cycle.settle.map(|r| r.reason), Some(SettleReason::Retry));
    assert!(device.platform().output_log().is_empty());

    // Once the sensor quiets down the retry arms it.
    device.platform_mut().set_steady(FSR, 512);
    let cycle = device.poll();
    assert!(cycle.settle.expect("retry").all_settled());
    assert!(device.channels()[0].is_calibrated());
}

#[test]
fn broken_sensor_does_not_resettle_healthy_ones_in_one_shot() {
    const FSR0: AnalogSource = AnalogSource(0);
    const FSR1: AnalogSource = AnalogSource(1);
    const FSR2: AnalogSource = AnalogSource(2);

    let mut config = TriggerConfig::for_board(Board::ArduinoUno);
    config.one_shot_settle = true;
    config.threshold = 50;
    config.noise_ceiling = 2;
    config.signal_timeout_ms = 500;
    config.max_settle_samples = 100;

    let mut sim = SimPlatform::new();
    sim.set_steady(FSR0, 512);
    sim.cycle(FSR1, &[0, 1000]);
    sim.set_steady(FSR2, 512);
    let mut device = TriggerDevice::new(config, sim).expect("valid config");
    let report = device.setup().expect("startup report");
    assert_eq!(report.sensors, vec![0, 1, 2]);
    assert!(!report.all_settled());
    let settled_at = device.calibration().last_settle_ms;

    // Someone stands on FSR0 while FSR1 keeps failing.
    device.platform_mut().set_steady(FSR0, 900);
    let cycle = device.poll();
    assert_eq!(cycle.events.len(), 1);
    assert_eq!(cycle.events[0].sensor, 0);
    assert_eq!(cycle.events[0].outcome, SignalOutcome::TimedOut);
    let retry = cycle.settle.expect("retry of the broken sensor");
    assert_eq!(retry.reason, SettleReason::Retry);
    assert_eq!(retry.sensors, vec![1]);

    assert_eq!(device.channels()[0].baseline(), 512);
    assert_eq!(device.channels()[2].baseline(), 512);
    assert_eq!(device.calibration().last_settle_ms, settled_at);

    // A heavier press is still detected against the startup baseline.
    device.platform_mut().set_steady(FSR0, 950);
    let cycle = device.poll();
    assert_eq!(cycle.events.len(), 1);
    assert_eq!(cycle.events[0].sensor, 0);
    assert_eq!(device.channels()[0].baseline(), 512);
}
