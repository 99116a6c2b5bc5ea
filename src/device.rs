// PressMat Trigger — Device Control Loop
//
// Owns the configuration, sensor channels, calibrator, detector and the
// platform.  `setup` is called once; `poll` is the body of the idle loop.
//
// Per poll:
//   1. Calibrate button → full settle.
//   2. Each calibrated channel → detect, signal if hit (blocking).
//   3. Staleness / drift check → full settle if warranted.

use crate::calibrator::{CalibrationState, Calibrator, SensorChannel};
use crate::config::*;
use crate::detector::{Detector, Polarity};
use crate::events::{SettleReason, SettleReport, TriggerEvent};
use crate::input::CalibrateInput;
use crate::platform::{Level, Platform};

/// What happened during one poll.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub events: Vec<TriggerEvent>,
    pub settle: Option<SettleReport>,
}

impl CycleReport {
    pub fn is_quiet(&self) -> bool {
        self.events.is_empty() && self.settle.is_none()
    }
}

pub struct TriggerDevice<P: Platform> {
    config: TriggerConfig,
    platform: P,
    channels: Vec<SensorChannel>,
    calibrator: Calibrator,
    detector: Detector,
    calibrate_input: CalibrateInput,
    event_count: u32,
}

impl<P: Platform> TriggerDevice<P> {
    pub fn new(config: TriggerConfig, platform: P) -> Result<Self, ConfigError> {
        config.validate()?;

        let pins = &config.pins;
        let channels = (0..pins.sensors)
            .filter_map(|i| {
                pins.analog[i].map(|source| SensorChannel::new(i, source, pins.leds[i]))
            })
            .collect();

        let calibrate_input = CalibrateInput::new(platform.now_ms());
        Ok(Self {
            calibrator: Calibrator::new(&config),
            detector: Detector::new(&config),
            config,
            platform,
            channels,
            calibrate_input,
            event_count: 0,
        })
    }

    /// Park the output in its idle state and run the startup settle.
    pub fn setup(&mut self) -> Option<SettleReport> {
        let off = self.polarity().off;
        self.platform.set_output(off);
        for led in self.channels.iter().filter_map(|c| c.indicator) {
            self.platform.set_indicator(led, Level::Low);
        }

        if self.config.debug {
            for _ in 0..3 {
                self.blink();
            }
            self.platform.set_output(off);
        }

        log::info!(
            "Trigger setup: {} sensor(s), threshold={}, noise ceiling={}, {}",
            self.channels.len(),
            self.config.threshold,
            self.config.noise_ceiling,
            if self.config.normally_closed { "normally closed" } else { "normally open" }
        );

        let report = self
            .calibrator
            .settle_all(&mut self.platform, &mut self.channels, SettleReason::Startup);
        if let Some(report) = &report {
            if !report.all_settled() {
                log::warn!("Startup settle incomplete — unsettled sensors stay disarmed");
            }
        }
        report
    }

    /// One pass of the control loop.
    pub fn poll(&mut self) -> CycleReport {
        let mut cycle = CycleReport::default();
        if !self.calibrator.state().startup_complete {
            log::warn!("poll() before setup() — ignoring");
            return cycle;
        }

        if self.calibrate_input.update(&mut self.platform) {
            cycle.settle = self.calibrator.settle_all(
                &mut self.platform,
                &mut self.channels,
                SettleReason::Requested,
            );
        }

        for channel in &self.channels {
            if let Some(event) = self.detector.process_input(&mut self.platform, channel) {
                self.event_count = self.event_count.wrapping_add(1);
                cycle.events.push(event);
            }
        }

        if cycle.settle.is_none() {
            cycle.settle = self
                .calibrator
                .process_settle(&mut self.platform, &mut self.channels);
        }
        cycle
    }

    /// Force a full settle (same as pressing the calibrate button).
    pub fn request_settle(&mut self) -> Option<SettleReport> {
        self.calibrator
            .settle_all(&mut self.platform, &mut self.channels, SettleReason::Requested)
    }

    // -----------------------------------------------------------------------
    // Debug helpers
    // -----------------------------------------------------------------------

    /// Pulse the output once (raw HIGH then LOW).
    pub fn blink(&mut self) {
        self.platform.set_output(Level::High);
        self.platform.delay_ms(BLINK_MS);
        self.platform.set_output(Level::Low);
        self.platform.delay_ms(BLINK_MS);
    }

    pub fn light_on(&mut self) {
        self.platform.set_output(Level::High);
    }

    pub fn light_off(&mut self) {
        self.platform.set_output(Level::Low);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    pub fn channels(&self) -> &[SensorChannel] {
        &self.channels
    }

    pub fn calibration(&self) -> &CalibrationState {
        self.calibrator.state()
    }

    pub fn polarity(&self) -> Polarity {
        self.detector.polarity()
    }

    pub fn event_count(&self) -> u32 {
        self.event_count
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}
