// PressMat Trigger — Calibrate Button Input
//
// Debounced press detection for the calibrate pin.  Polled once per engine
// cycle; reports a single request per press.

use crate::config::DEBOUNCE_MS;
use crate::platform::{elapsed_ms, Platform};

pub struct CalibrateInput {
    debounce_ms: u32,

    // Debounce state
    last_raw: bool,
    last_change_ms: u32,

    button_down: bool,
}

impl CalibrateInput {
    pub fn new(now_ms: u32) -> Self {
        Self::with_debounce(now_ms, DEBOUNCE_MS)
    }

    pub fn with_debounce(now_ms: u32, debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            last_raw: false,
            last_change_ms: now_ms,
            button_down: false,
        }
    }

    /// Returns `true` on the poll where a press becomes stable.
    pub fn update<P: Platform>(&mut self, platform: &mut P) -> bool {
        let raw = platform.calibrate_pressed();
        let now = platform.now_ms();

        // ---- debounce filter ----
        if raw != self.last_raw {
            self.last_change_ms = now;
        }
        self.last_raw = raw;

        if elapsed_ms(now, self.last_change_ms) < self.debounce_ms {
            return false;
        }

        // ---- pressed edge ----
        if raw && !self.button_down {
            self.button_down = true;
            log::info!("Calibrate button pressed");
            return true;
        }

        // ---- released edge ----
        if !raw && self.button_down {
            self.button_down = false;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPlatform;

    fn poll(input: &mut CalibrateInput, sim: &mut SimPlatform, step_ms: u32) -> bool {
        let fired = input.update(sim);
        sim.advance(step_ms);
        fired
    }

    #[test]
    fn held_press_fires_once_after_debounce() {
        let mut sim = SimPlatform::new();
        let mut input = CalibrateInput::with_debounce(0, 50);
        sim.script_calibrate(&[true; 10]);

        let fired: Vec<bool> = (0..10).map(|_| poll(&mut input, &mut sim, 10)).collect();

        // Press seen at t=0, stable from t=50.
        assert_eq!(fired.iter().filter(|&&f| f).count(), 1);
        assert!(fired[5]);
    }

    #[test]
    fn bounce_shorter_than_debounce_is_ignored() {
        let mut sim = SimPlatform::new();
        let mut input = CalibrateInput::with_debounce(0, 50);
        sim.script_calibrate(&[true, false, true, false, false, false, false, false]);

        let fired = (0..8).any(|_| poll(&mut input, &mut sim, 10));
        assert!(!fired);
    }

    #[test]
    fn second_press_after_release_fires_again() {
        let mut sim = SimPlatform::new();
        let mut input = CalibrateInput::with_debounce(0, 20);
        let mut presses = vec![true; 5];
        presses.extend([false; 5]);
        presses.extend([true; 5]);
        sim.script_calibrate(&presses);

        let count = (0..15).filter(|_| poll(&mut input, &mut sim, 10)).count();
        assert_eq!(count, 2);
    }
}
