// PressMat Trigger — Platform Primitives
//
// The engine only talks to hardware through this trait.  The ESP-IDF build
// implements it over ADC + GPIO drivers; tests and the host build use the
// scripted `sim::SimPlatform`.

/// Opaque analog input handle (ADC channel number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnalogSource(pub u8);

/// Digital signal level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

pub trait Platform {
    /// One raw analog conversion.
    fn sample_analog(&mut self, source: AnalogSource) -> i32;

    /// Drive the shared trigger output.
    fn set_output(&mut self, level: Level);

    /// Drive a per-sensor indicator LED.
    fn set_indicator(&mut self, pin: i32, level: Level);

    /// Raw state of the calibrate button (`true` = pressed).
    fn calibrate_pressed(&mut self) -> bool;

    /// Milliseconds since boot; wraps at ~49 days.
    fn now_ms(&self) -> u32;

    /// Block the calling thread.
    fn delay_ms(&mut self, ms: u32);
}

/// Milliseconds elapsed since `start`, tolerant of clock wrap.
pub fn elapsed_ms(now: u32, start: u32) -> u32 {
    now.wrapping_sub(start)
}
