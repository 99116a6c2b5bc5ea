// PressMat Trigger — Board Pin Profiles
//
// Resolves a supported board to its pin roles.  Analog inputs are ADC channel
// numbers (A0 = 0, A1 = 1, …); every other role is a digital pin number.

use crate::config::*;
use crate::platform::AnalogSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    /// Arduino Uno / bare ATmega328P.
    ArduinoUno,
    ArduinoMega,
    /// Bare ATtiny85 / Adafruit Trinket.
    Attiny85,
    Attiny84,
    /// Seeed Studio Xiao ESP32-C3 (shipped firmware target).
    XiaoEsp32c3,
}

/// Resolved pin roles for one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pub output: i32,
    /// Carried for wiring completeness; no behaviour is attached to it.
    pub trigger: i32,
    pub calibrate: i32,
    pub sensors: usize,
    pub analog: [Option<AnalogSource>; MAX_SENSORS],
    pub leds: [Option<i32>; MAX_SENSORS],
}

impl Board {
    /// Map a numeric board id to a profile.  Unknown ids use the Uno table.
    pub fn from_id(id: u8) -> Self {
        match id {
            0 => Self::ArduinoUno,
            1 => Self::ArduinoMega,
            2 => Self::Attiny85,
            3 => Self::Attiny84,
            4 => Self::XiaoEsp32c3,
            _ => Self::ArduinoUno,
        }
    }

    pub fn pin_map(&self) -> PinMap {
        match self {
            // Uno and Mega share the same header layout for these roles.
            Self::ArduinoUno | Self::ArduinoMega => PinMap {
                output: 13,
                trigger: 8,
                calibrate: 9,
                sensors: 3,
                analog: [
                    Some(AnalogSource(0)),
                    Some(AnalogSource(1)),
                    Some(AnalogSource(2)),
                ],
                leds: [Some(12), Some(11), Some(10)],
            },
            Self::Attiny85 => PinMap {
                output: 0,    // PB0
                trigger: 4,   // PB4
                calibrate: 3, // PB3
                sensors: 1,
                analog: [Some(AnalogSource(1)), None, None], // PB2 / A1
                leds: [Some(1), None, None], // PB1, Trinket onboard LED
            },
            Self::Attiny84 => PinMap {
                output: 0,
                trigger: 5,
                calibrate: 4,
                sensors: 3,
                analog: [
                    Some(AnalogSource(1)),
                    Some(AnalogSource(2)),
                    Some(AnalogSource(3)),
                ],
                leds: [Some(1), Some(2), Some(3)],
            },
            Self::XiaoEsp32c3 => PinMap {
                output: PIN_OUTPUT,
                trigger: PIN_TRIGGER,
                calibrate: PIN_CALIBRATE,
                sensors: 3,
                analog: [
                    Some(AnalogSource(PIN_FSR_0 as u8)),
                    Some(AnalogSource(PIN_FSR_1 as u8)),
                    Some(AnalogSource(PIN_FSR_2 as u8)),
                ],
                leds: [Some(PIN_LED_0), Some(PIN_LED_1), Some(PIN_LED_2)],
            },
        }
    }
}
