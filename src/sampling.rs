// PressMat Trigger — Sampling helpers shared by calibration and detection

use crate::config::READINGS_PER_AVERAGE;
use crate::platform::{AnalogSource, Platform};

/// Move halfway from `prev` toward `sample`.
///
/// The half step is rounded toward `sample`, so a constant input is reached
/// exactly instead of stalling one count short.  The flip side: ±1 jitter
/// always moves the value by 1, so its noise floor settles at 1 or more
/// where a plain truncating `(prev + sample) / 2` would report 0.
pub fn smooth(prev: i32, sample: i32) -> i32 {
    let diff = sample - prev;
    prev + (diff + diff.signum()) / 2
}

/// Mean of [`READINGS_PER_AVERAGE`] consecutive raw samples, truncated.
pub fn averaged_reading<P: Platform>(platform: &mut P, source: AnalogSource) -> i32 {
    let sum: i32 = (0..READINGS_PER_AVERAGE)
        .map(|_| platform.sample_analog(source))
        .sum();
    sum / READINGS_PER_AVERAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPlatform;

    #[test]
    fn smooth_halves_the_gap() {
        assert_eq!(smooth(0, 512), 256);
        assert_eq!(smooth(512, 0), 256);
        assert_eq!(smooth(100, 103), 102);
        assert_eq!(smooth(100, 97), 98);
        assert_eq!(smooth(7, 7), 7);
    }

    #[test]
    fn smooth_reaches_constant_input() {
        let mut value = 0;
        for _ in 0..11 {
            value = smooth(value, 512);
        }
        assert_eq!(value, 512);

        let mut value = 1023;
        for _ in 0..11 {
            value = smooth(value, 512);
        }
        assert_eq!(value, 512);
    }

    #[test]
    fn unit_jitter_keeps_a_nonzero_noise_floor() {
        let mut baseline = 512;
        let mut noise = 0;
        for sample in [513, 511].iter().cycle().take(20) {
            let next = smooth(baseline, *sample);
            noise = smooth(noise, (next - baseline).abs());
            baseline = next;
        }
        assert!(noise >= 1);
        // Truncating average of the same stream stalls at zero delta.
        assert_eq!((512 + 513) / 2 - 512, 0);
    }

    #[test]
    fn averaged_reading_truncates() {
        let source = AnalogSource(0);
        let mut sim = SimPlatform::new();
        sim.script(source, &[10, 10, 11]);
        assert_eq!(averaged_reading(&mut sim, source), 10);
        assert_eq!(sim.samples_taken(source), 3);
    }
}
