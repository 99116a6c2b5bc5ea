// PressMat Trigger — Simulated Platform
//
// Scripted stand-in for the board.  Each analog source replays queued
// samples first, then a repeating pattern (if any), then a steady value.
// The virtual clock advances a fixed tick per analog conversion and by the
// requested amount on `delay_ms`, so timeouts are deterministic.

use std::collections::{HashMap, VecDeque};

use crate::platform::{AnalogSource, Level, Platform};

#[derive(Debug, Default)]
struct SimSource {
    queued: VecDeque<i32>,
    pattern: Vec<i32>,
    pattern_pos: usize,
    steady: i32,
    taken: usize,
}

impl SimSource {
    fn next(&mut self) -> i32 {
        self.taken += 1;
        if let Some(sample) = self.queued.pop_front() {
            return sample;
        }
        if !self.pattern.is_empty() {
            let sample = self.pattern[self.pattern_pos % self.pattern.len()];
            self.pattern_pos += 1;
            return sample;
        }
        self.steady
    }
}

#[derive(Debug)]
pub struct SimPlatform {
    sources: HashMap<AnalogSource, SimSource>,
    now_ms: u32,
    tick_ms: u32,
    output: Option<Level>,
    output_log: Vec<(u32, Level)>,
    indicators: HashMap<i32, Level>,
    indicator_log: Vec<(u32, i32, Level)>,
    calibrate_presses: VecDeque<bool>,
}

impl SimPlatform {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
            now_ms: 0,
            tick_ms: 1,
            output: None,
            output_log: Vec::new(),
            indicators: HashMap::new(),
            indicator_log: Vec::new(),
            calibrate_presses: VecDeque::new(),
        }
    }

    /// Milliseconds the clock advances per analog conversion.
    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    /// Start the clock somewhere other than zero (e.g. just before a wrap).
    pub fn with_start_ms(mut self, now_ms: u32) -> Self {
        self.now_ms = now_ms;
        self
    }

    /// Queue samples to be returned before the pattern / steady value.
    pub fn script(&mut self, source: AnalogSource, samples: &[i32]) {
        self.source_mut(source).queued.extend(samples.iter().copied());
    }

    /// Repeat `pattern` forever once the queue is drained.
    pub fn cycle(&mut self, source: AnalogSource, pattern: &[i32]) {
        let src = self.source_mut(source);
        src.pattern = pattern.to_vec();
        src.pattern_pos = 0;
    }

    /// Value returned once queue and pattern are exhausted.  Clears any pattern.
    pub fn set_steady(&mut self, source: AnalogSource, value: i32) {
        let src = self.source_mut(source);
        src.pattern.clear();
        src.steady = value;
    }

    /// Queue calibrate-button states, one per poll.
    pub fn script_calibrate(&mut self, presses: &[bool]) {
        self.calibrate_presses.extend(presses.iter().copied());
    }

    pub fn advance(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }

    pub fn output(&self) -> Option<Level> {
        self.output
    }

    pub fn output_log(&self) -> &[(u32, Level)] {
        &self.output_log
    }

    pub fn indicator(&self, pin: i32) -> Option<Level> {
        self.indicators.get(&pin).copied()
    }

    pub fn indicator_log(&self) -> &[(u32, i32, Level)] {
        &self.indicator_log
    }

    pub fn samples_taken(&self, source: AnalogSource) -> usize {
        self.sources.get(&source).map_or(0, |s| s.taken)
    }

    pub fn clear_logs(&mut self) {
        self.output_log.clear();
        self.indicator_log.clear();
    }

    fn source_mut(&mut self, source: AnalogSource) -> &mut SimSource {
        self.sources.entry(source).or_default()
    }
}

impl Default for SimPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for SimPlatform {
    fn sample_analog(&mut self, source: AnalogSource) -> i32 {
        self.now_ms = self.now_ms.wrapping_add(self.tick_ms);
        self.source_mut(source).next()
    }

    fn set_output(&mut self, level: Level) {
        self.output = Some(level);
        self.output_log.push((self.now_ms, level));
    }

    fn set_indicator(&mut self, pin: i32, level: Level) {
        self.indicators.insert(pin, level);
        self.indicator_log.push((self.now_ms, pin, level));
    }

    fn calibrate_pressed(&mut self) -> bool {
        self.calibrate_presses.pop_front().unwrap_or(false)
    }

    fn now_ms(&self) -> u32 {
        self.now_ms
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
    }
}
