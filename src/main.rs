// PressMat Trigger — Firmware Entry Point
//
// ESP-IDF boot sequence:
//   1. Initialise logging and take peripherals.
//   2. Hand the output, indicator and calibrate pins to the trigger task.
//   3. The trigger task parks the output, settles every sensor and polls
//      forever.
//
// Host builds run the same engine against a scripted simulated board and
// log what it does.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{InputPin, OutputPin};
    use esp_idf_hal::prelude::*;

    use pressmat_trigger::boards::Board;
    use pressmat_trigger::config::*;
    use pressmat_trigger::drivers::esp::TriggerPins;
    use pressmat_trigger::tasks;

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("PressMat trigger firmware starting…");

    let config = TriggerConfig::for_board(Board::XiaoEsp32c3);
    config.validate()?;

    // ---- Peripherals ------------------------------------------------------
    // FSR inputs (GPIO2-4) are read through the raw ADC driver and need no
    // PinDriver.  GPIO9 (trigger role) is left unconfigured.
    let peripherals = Peripherals::take()?;
    let pins = TriggerPins {
        output: peripherals.pins.gpio10.downgrade_output(),
        leds: vec![
            (PIN_LED_0, peripherals.pins.gpio5.downgrade_output()),
            (PIN_LED_1, peripherals.pins.gpio6.downgrade_output()),
            (PIN_LED_2, peripherals.pins.gpio7.downgrade_output()),
        ],
        calibrate: peripherals.pins.gpio8.downgrade_input(),
    };

    // ---- Spawn trigger task (FreeRTOS task via std::thread) ----------------
    thread::Builder::new()
        .name("trigger".into())
        .stack_size(STACK_TRIGGER)
        .spawn(move || {
            tasks::trigger::trigger_task(pins, config);
        })?;

    // Main thread has nothing left to do — park it forever.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use pressmat_trigger::boards::Board;
    use pressmat_trigger::sim::SimPlatform;
    use pressmat_trigger::{AnalogSource, Platform, TriggerConfig, TriggerDevice};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("PressMat trigger host simulation starting…");

    let mut config = TriggerConfig::for_board(Board::ArduinoUno);
    config.signal_timeout_ms = 2_000;
    config.settle_timeout_ms = 30_000;

    let mut sim = SimPlatform::new();
    let fsr = [AnalogSource(0), AnalogSource(1), AnalogSource(2)];
    sim.cycle(fsr[0], &[511, 513, 512, 512]);
    sim.cycle(fsr[1], &[498, 500, 502, 500]);
    sim.set_steady(fsr[2], 520);

    let mut device = TriggerDevice::new(config, sim)?;
    device.setup();

    // Short step on FSR0, someone standing on FSR2, then FSR1 relaxing.
    device.platform_mut().script(fsr[0], &[640, 650, 655, 630, 620]);
    device.platform_mut().script(fsr[2], &[900; 3000]);

    for _ in 0..20 {
        let cycle = device.poll();
        for event in &cycle.events {
            log::info!(
                "event: FSR{} {} ({} ms, peak {})",
                event.sensor,
                event.outcome.display_name(),
                event.duration_ms(),
                event.peak
            );
        }
        if let Some(report) = &cycle.settle {
            log::info!("settle: {} → {:?}", report.reason.display_name(), report.outcomes);
        }
        device.platform_mut().advance(1_000);
        if device.platform().now_ms() > 20_000 {
            device.platform_mut().set_steady(fsr[1], 470);
        }
    }

    log::info!(
        "simulation finished: {} event(s), {} settle(s)",
        device.event_count(),
        device.calibration().settle_count
    );
    Ok(())
}
