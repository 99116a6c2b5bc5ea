// PressMat Trigger — Ambient Calibrator
//
// Learns, per sensor, the resting reading (ambient baseline) and the typical
// sample-to-sample fluctuation (noise floor), and decides when those
// estimates have gone stale.
//
// Settle procedure:
//   1. Prime: fold PRIME_SAMPLES raw samples into the baseline.
//   2. Characterise noise: keep folding samples, smoothing the absolute
//      baseline movement into the noise floor, until the noise floor is at
//      or below the configured ceiling (bounded by `max_settle_samples`).

use crate::config::*;
use crate::events::{CalibrationStatus, SettleOutcome, SettleReason, SettleReport};
use crate::platform::{elapsed_ms, AnalogSource, Platform};
use crate::sampling::{averaged_reading, smooth};

/// One physical force sensor under management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorChannel {
    pub index: usize,
    pub analog_source: AnalogSource,
    pub indicator: Option<i32>,
    ambient_baseline: i32,
    noise_floor: i32,
    status: CalibrationStatus,
}

impl SensorChannel {
    pub fn new(index: usize, analog_source: AnalogSource, indicator: Option<i32>) -> Self {
        Self {
            index,
            analog_source,
            indicator,
            ambient_baseline: 0,
            noise_floor: 0,
            status: CalibrationStatus::Uncalibrated,
        }
    }

    pub fn baseline(&self) -> i32 {
        self.ambient_baseline
    }

    pub fn noise_floor(&self) -> i32 {
        self.noise_floor
    }

    pub fn status(&self) -> CalibrationStatus {
        self.status
    }

    pub fn is_calibrated(&self) -> bool {
        self.status.is_usable()
    }
}

/// Process-wide calibration bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalibrationState {
    pub last_settle_ms: u32,
    pub settle_in_progress: bool,
    pub settle_count: u32,
    /// Set once the startup settle has run; detection is gated on it.
    pub startup_complete: bool,
}

pub struct Calibrator {
    noise_ceiling: i32,
    max_settle_samples: u32,
    settle_timeout_ms: u32,
    poll_interval_ms: u32,
    one_shot: bool,
    state: CalibrationState,
}

impl Calibrator {
    pub fn new(config: &TriggerConfig) -> Self {
        Self {
            noise_ceiling: config.noise_ceiling,
            max_settle_samples: config.max_settle_samples,
            settle_timeout_ms: config.settle_timeout_ms,
            poll_interval_ms: config.poll_interval_ms,
            one_shot: config.one_shot_settle,
            state: CalibrationState::default(),
        }
    }

    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    /// Settle a single channel.  Estimates are committed only on success.
    pub fn settle_channel<P: Platform>(
        &self,
        platform: &mut P,
        channel: &mut SensorChannel,
    ) -> SettleOutcome {
        let source = channel.analog_source;
        let mut baseline = channel.ambient_baseline;

        for _ in 0..PRIME_SAMPLES {
            baseline = smooth(baseline, platform.sample_analog(source));
        }

        // Noise estimate restarts from zero on every settle.
        let mut noise = 0;
        for _ in 0..self.max_settle_samples {
            let next = smooth(baseline, platform.sample_analog(source));
            noise = smooth(noise, (next - baseline).abs());
            baseline = next;

            if noise <= self.noise_ceiling {
                channel.ambient_baseline = baseline;
                channel.noise_floor = noise;
                channel.status = CalibrationStatus::Calibrated;
                log::info!(
                    "FSR{} settled: baseline={} noise={}",
                    channel.index,
                    baseline,
                    noise
                );
                return SettleOutcome::Settled {
                    baseline,
                    noise_floor: noise,
                };
            }

            if self.poll_interval_ms > 0 {
                platform.delay_ms(self.poll_interval_ms);
            }
        }

        if channel.status == CalibrationStatus::Calibrated {
            channel.status = CalibrationStatus::Degraded;
        }
        log::warn!(
            "FSR{} failed to settle after {} samples (noise {} > ceiling {}) — {:?}",
            channel.index,
            self.max_settle_samples,
            noise,
            self.noise_ceiling,
            channel.status
        );
        SettleOutcome::Failed { noise_floor: noise }
    }

    /// Settle every channel in turn.  A `Retry` only touches channels that
    /// have never settled and leaves `last_settle_ms` alone.  Returns `None`
    /// if a settle is already running.
    pub fn settle_all<P: Platform>(
        &mut self,
        platform: &mut P,
        channels: &mut [SensorChannel],
        reason: SettleReason,
    ) -> Option<SettleReport> {
        if self.state.settle_in_progress {
            log::warn!("Settle ({}) ignored — already settling", reason.display_name());
            return None;
        }
        self.state.settle_in_progress = true;

        let retry_only = reason == SettleReason::Retry;
        let mut sensors = Vec::new();
        let mut outcomes = Vec::new();
        for channel in channels
            .iter_mut()
            .filter(|c| !retry_only || !c.is_calibrated())
        {
            sensors.push(channel.index);
            outcomes.push(self.settle_channel(platform, channel));
        }
        log::info!("Settled {} sensor(s) ({})", sensors.len(), reason.display_name());

        // Recorded even when a channel failed: never-settled channels retry
        // on their own, degraded ones wait for the next timeout.
        let finished_ms = platform.now_ms();
        if !retry_only {
            self.state.last_settle_ms = finished_ms;
        }
        self.state.settle_count += 1;
        self.state.settle_in_progress = false;
        if reason == SettleReason::Startup {
            self.state.startup_complete = true;
        }

        Some(SettleReport {
            reason,
            sensors,
            outcomes,
            finished_ms,
        })
    }

    /// Decide whether the current estimates warrant a re-settle.
    ///
    /// Drift and age are only judged on calibrated channels and only outside
    /// one-shot mode.  Channels that never settled are retried on their own.
    pub fn check<P: Platform>(
        &self,
        platform: &mut P,
        channels: &[SensorChannel],
    ) -> Option<SettleReason> {
        if !self.one_shot {
            for channel in channels.iter().filter(|c| c.is_calibrated()) {
                let reading = averaged_reading(platform, channel.analog_source);
                if reading + channel.noise_floor < channel.ambient_baseline {
                    log::debug!(
                        "FSR{} drifted: reading={} baseline={} noise={}",
                        channel.index,
                        reading,
                        channel.ambient_baseline,
                        channel.noise_floor
                    );
                    return Some(SettleReason::Drift);
                }
            }

            let any_calibrated = channels.iter().any(|c| c.is_calibrated());
            if any_calibrated
                && elapsed_ms(platform.now_ms(), self.state.last_settle_ms) > self.settle_timeout_ms
            {
                return Some(SettleReason::Stale);
            }
        }

        if channels.iter().any(|c| !c.is_calibrated()) {
            return Some(SettleReason::Retry);
        }
        None
    }

    /// Staleness/drift check followed by a settle when one is warranted.
    pub fn process_settle<P: Platform>(
        &mut self,
        platform: &mut P,
        channels: &mut [SensorChannel],
    ) -> Option<SettleReport> {
        let reason = self.check(platform, channels)?;
        self.settle_all(platform, channels, reason)
    }
}
