// PressMat Trigger — self-calibrating force-sensor trigger
//
// The engine (calibration, detection, signalling) is hardware-agnostic and
// talks to the board through `platform::Platform`.  The ESP-IDF driver and
// firmware task are only built for the `espidf` target.

pub mod boards;
pub mod calibrator;
pub mod config;
pub mod detector;
pub mod device;
pub mod events;
pub mod input;
pub mod platform;
pub mod sampling;
pub mod sim;

#[cfg(target_os = "espidf")]
pub mod drivers;
#[cfg(target_os = "espidf")]
pub mod tasks;

pub use calibrator::{CalibrationState, Calibrator, SensorChannel};
pub use config::{ConfigError, TriggerConfig};
pub use detector::{Detector, Polarity};
pub use device::{CycleReport, TriggerDevice};
pub use events::{SettleOutcome, SettleReason, SettleReport, SignalOutcome, TriggerEvent};
pub use platform::{AnalogSource, Level, Platform};
