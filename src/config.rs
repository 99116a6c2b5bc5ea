// PressMat Trigger — Hardware & System Configuration
// Shipped target: Seeed Studio Xiao ESP32-C3 (RISC-V)

use thiserror::Error;

use crate::boards::{Board, PinMap};

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_OUTPUT: i32 = 10;    // D10   — Relay / buzzer drive
pub const PIN_TRIGGER: i32 = 9;    // D9    — Reserved trigger input
pub const PIN_CALIBRATE: i32 = 8;  // D8    — Calibrate button (INPUT_PULLUP, active LOW)
pub const PIN_FSR_0: i32 = 2;      // D0/A0 — FSR 0 (ADC1 channel 2)
pub const PIN_FSR_1: i32 = 3;      // D1/A1 — FSR 1 (ADC1 channel 3)
pub const PIN_FSR_2: i32 = 4;      // D2/A2 — FSR 2 (ADC1 channel 4)
pub const PIN_LED_0: i32 = 5;      // D3    — FSR 0 indicator
pub const PIN_LED_1: i32 = 6;      // D4    — FSR 1 indicator
pub const PIN_LED_2: i32 = 7;      // D5    — FSR 2 indicator

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------
pub const MAX_SENSORS: usize = 3;
pub const READINGS_PER_AVERAGE: i32 = 3;      // raw samples per averaged reading
pub const PRIME_SAMPLES: usize = 11;          // baseline priming pass

// ---------------------------------------------------------------------------
// Detection & Calibration (raw ADC counts)
// ---------------------------------------------------------------------------
pub const DEFAULT_THRESHOLD: i32 = 50;
pub const DEFAULT_NOISE_CEILING: i32 = 2;
pub const DEFAULT_MAX_SETTLE_SAMPLES: u32 = 2000;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SIGNAL_TIMEOUT_MS: u32 = 5_000;        // longest output pulse
pub const SETTLE_TIMEOUT_MS: u32 = 600_000;      // 10 minutes → periodic re-settle
pub const POLL_INTERVAL_MS: u32 = 0;             // tight loop on dedicated hardware
pub const DEBOUNCE_MS: u32 = 50;                 // calibrate button
pub const BLINK_MS: u32 = 50;                    // debug blink half-period
pub const IDLE_YIELD_MS: u64 = 10;               // firmware task sleep between polls

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_TRIGGER: usize = 4096;

/// Runtime configuration handed to the trigger engine.
///
/// Built once before the engine starts; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerConfig {
    pub pins: PinMap,
    /// Output wiring: `true` means idle HIGH, active LOW.
    pub normally_closed: bool,
    /// Margin above the ambient baseline that counts as an event.
    pub threshold: i32,
    /// Settle finishes once the smoothed noise is at or below this.
    pub noise_ceiling: i32,
    pub signal_timeout_ms: u32,
    pub settle_timeout_ms: u32,
    /// Settle once at startup and never re-settle on drift or age.
    pub one_shot_settle: bool,
    /// Noise-phase sample budget before a settle is declared failed.
    pub max_settle_samples: u32,
    /// Delay between samples inside the blocking loops (0 = tight loop).
    pub poll_interval_ms: u32,
    pub debug: bool,
}

impl TriggerConfig {
    pub fn for_board(board: Board) -> Self {
        Self {
            pins: board.pin_map(),
            ..Self::default()
        }
    }

    pub fn sensor_count(&self) -> usize {
        self.pins.sensors
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.pins.sensors;
        if count == 0 || count > MAX_SENSORS {
            return Err(ConfigError::SensorCount(count));
        }
        if let Some(index) = (0..count).find(|&i| self.pins.analog[i].is_none()) {
            return Err(ConfigError::MissingAnalogPin(index));
        }
        if self.threshold < 0 {
            return Err(ConfigError::NegativeThreshold(self.threshold));
        }
        if self.noise_ceiling < 0 {
            return Err(ConfigError::NegativeNoiseCeiling(self.noise_ceiling));
        }
        if self.max_settle_samples == 0 {
            return Err(ConfigError::ZeroSettleBudget);
        }
        Ok(())
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            pins: Board::XiaoEsp32c3.pin_map(),
            normally_closed: false,
            threshold: DEFAULT_THRESHOLD,
            noise_ceiling: DEFAULT_NOISE_CEILING,
            signal_timeout_ms: SIGNAL_TIMEOUT_MS,
            settle_timeout_ms: SETTLE_TIMEOUT_MS,
            one_shot_settle: false,
            max_settle_samples: DEFAULT_MAX_SETTLE_SAMPLES,
            poll_interval_ms: POLL_INTERVAL_MS,
            debug: false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sensor count {0} outside 1..={max}", max = MAX_SENSORS)]
    SensorCount(usize),
    #[error("sensor {0} has no analog pin")]
    MissingAnalogPin(usize),
    #[error("threshold must not be negative (got {0})")]
    NegativeThreshold(i32),
    #[error("noise ceiling must not be negative (got {0})")]
    NegativeNoiseCeiling(i32),
    #[error("settle sample budget must be at least 1")]
    ZeroSettleBudget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TriggerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sensor_count(), 3);
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn rejects_sensor_count_out_of_range() {
        let mut config = TriggerConfig::default();
        config.pins.sensors = 0;
        assert_eq!(config.validate(), Err(ConfigError::SensorCount(0)));

        config.pins.sensors = MAX_SENSORS + 1;
        assert_eq!(config.validate(), Err(ConfigError::SensorCount(4)));
    }

    #[test]
    fn rejects_missing_analog_pin() {
        let mut config = TriggerConfig::for_board(Board::Attiny85);
        config.pins.sensors = 2;
        assert_eq!(config.validate(), Err(ConfigError::MissingAnalogPin(1)));
    }

    #[test]
    fn rejects_negative_margins_and_empty_budget() {
        let mut config = TriggerConfig {
            threshold: -1,
            ..TriggerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NegativeThreshold(-1)));

        config.threshold = 10;
        config.noise_ceiling = -3;
        assert_eq!(config.validate(), Err(ConfigError::NegativeNoiseCeiling(-3)));

        config.noise_ceiling = 0;
        config.max_settle_samples = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroSettleBudget));
    }
}
