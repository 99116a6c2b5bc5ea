// PressMat Trigger — Event Detector & Signaler
//
// Each poll takes an averaged reading per sensor.  A reading above
// baseline + threshold asserts the shared output and holds it, polling the
// same sensor, until the reading drops back or the signal timeout elapses.
// The output is always released before returning.

use crate::calibrator::SensorChannel;
use crate::config::TriggerConfig;
use crate::events::{SignalOutcome, TriggerEvent};
use crate::platform::{elapsed_ms, Level, Platform};
use crate::sampling::averaged_reading;

/// Output levels for the active and idle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polarity {
    pub on: Level,
    pub off: Level,
}

impl Polarity {
    /// Normally-closed wiring idles HIGH and pulls LOW to signal.
    pub fn from_normally_closed(normally_closed: bool) -> Self {
        if normally_closed {
            Self { on: Level::Low, off: Level::High }
        } else {
            Self { on: Level::High, off: Level::Low }
        }
    }
}

pub struct Detector {
    threshold: i32,
    signal_timeout_ms: u32,
    poll_interval_ms: u32,
    polarity: Polarity,
}

impl Detector {
    pub fn new(config: &TriggerConfig) -> Self {
        Self {
            threshold: config.threshold,
            signal_timeout_ms: config.signal_timeout_ms,
            poll_interval_ms: config.poll_interval_ms,
            polarity: Polarity::from_normally_closed(config.normally_closed),
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Highest reading still treated as ambient for this channel.
    pub fn limit(&self, channel: &SensorChannel) -> i32 {
        channel.baseline() + self.threshold
    }

    /// Sample one channel and signal if the reading counts as a hit.
    /// Channels without a completed settle are never evaluated.
    pub fn process_input<P: Platform>(
        &self,
        platform: &mut P,
        channel: &SensorChannel,
    ) -> Option<TriggerEvent> {
        if !channel.is_calibrated() {
            return None;
        }

        let reading = averaged_reading(platform, channel.analog_source);
        if reading > self.limit(channel) {
            log::debug!(
                "FSR{} hit: reading={} limit={}",
                channel.index,
                reading,
                self.limit(channel)
            );
            Some(self.perform_signal(platform, channel, reading))
        } else {
            None
        }
    }

    /// Hold the output active until the channel returns to ambient or the
    /// signal timeout elapses.  Blocks the caller for the whole episode.
    pub fn perform_signal<P: Platform>(
        &self,
        platform: &mut P,
        channel: &SensorChannel,
        first_reading: i32,
    ) -> TriggerEvent {
        let start_ms = platform.now_ms();
        let limit = self.limit(channel);

        platform.set_output(self.polarity.on);
        if let Some(led) = channel.indicator {
            platform.set_indicator(led, Level::High);
        }

        let mut peak = first_reading;
        let outcome = loop {
            let reading = averaged_reading(platform, channel.analog_source);
            peak = peak.max(reading);

            if reading <= limit {
                break SignalOutcome::ReturnedToBaseline;
            }
            if elapsed_ms(platform.now_ms(), start_ms) > self.signal_timeout_ms {
                break SignalOutcome::TimedOut;
            }

            if self.poll_interval_ms > 0 {
                platform.delay_ms(self.poll_interval_ms);
            }
        };

        platform.set_output(self.polarity.off);
        if let Some(led) = channel.indicator {
            platform.set_indicator(led, Level::Low);
        }

        let event = TriggerEvent {
            sensor: channel.index,
            start_ms,
            end_ms: platform.now_ms(),
            peak,
            outcome,
        };
        log::info!(
            "FSR{} event {} after {} ms (peak {}, limit {})",
            event.sensor,
            outcome.display_name(),
            event.duration_ms(),
            peak,
            limit
        );
        event
    }
}
