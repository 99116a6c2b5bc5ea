// PressMat Trigger — ESP-IDF Platform Driver
//
// ADC1 oneshot conversions for the FSR inputs (raw ESP-IDF calls), GPIO
// outputs for the trigger line and indicator LEDs, and the calibrate button.

use std::thread;
use std::time::Duration;

use anyhow::Context;
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Input, Output, PinDriver};

use crate::config::*;
use crate::platform::{AnalogSource, Level, Platform};

/// ADC1 channel count on the ESP32-C3.
const ADC_CHANNELS: usize = 5;

pub struct EspPlatform<'d> {
    adc: esp_idf_sys::adc_oneshot_unit_handle_t,
    last_raw: [i32; ADC_CHANNELS],
    output: PinDriver<'d, AnyOutputPin, Output>,
    leds: Vec<(i32, PinDriver<'d, AnyOutputPin, Output>)>,
    calibrate: PinDriver<'d, AnyInputPin, Input>,
}

impl<'d> EspPlatform<'d> {
    pub fn new(
        output: AnyOutputPin,
        leds: Vec<(i32, AnyOutputPin)>,
        calibrate: AnyInputPin,
        calibrate_gpio: i32,
        sources: &[AnalogSource],
    ) -> anyhow::Result<Self> {
        let adc = init_adc(sources)?;

        let output = PinDriver::output(output).context("trigger output pin")?;
        let leds = leds
            .into_iter()
            .map(|(gpio, pin)| {
                PinDriver::output(pin)
                    .map(|driver| (gpio, driver))
                    .with_context(|| format!("indicator LED GPIO{}", gpio))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let calibrate = PinDriver::input(calibrate).context("calibrate pin")?;
        // Button pulls the line LOW; enable the internal pull-up.
        unsafe {
            esp_idf_sys::esp!(esp_idf_sys::gpio_set_pull_mode(
                calibrate_gpio,
                esp_idf_sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY,
            ))
            .context("calibrate pull-up")?;
        }

        Ok(Self {
            adc,
            last_raw: [0; ADC_CHANNELS],
            output,
            leds,
            calibrate,
        })
    }
}

/// One-time ADC1 setup: 12-bit, 11 dB attenuation (0–3.3 V) on each source.
fn init_adc(sources: &[AnalogSource]) -> anyhow::Result<esp_idf_sys::adc_oneshot_unit_handle_t> {
    unsafe {
        let mut handle: esp_idf_sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();
        let unit_cfg = esp_idf_sys::adc_oneshot_unit_init_cfg_t {
            unit_id: esp_idf_sys::adc_unit_t_ADC_UNIT_1,
            ulp_mode: esp_idf_sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..core::mem::zeroed()
        };
        esp_idf_sys::esp!(esp_idf_sys::adc_oneshot_new_unit(&unit_cfg, &mut handle))
            .context("ADC unit init")?;

        let chan_cfg = esp_idf_sys::adc_oneshot_chan_cfg_t {
            atten: esp_idf_sys::adc_atten_t_ADC_ATTEN_DB_11,
            bitwidth: esp_idf_sys::adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        for source in sources {
            esp_idf_sys::esp!(esp_idf_sys::adc_oneshot_config_channel(
                handle,
                source.0 as esp_idf_sys::adc_channel_t,
                &chan_cfg,
            ))
            .with_context(|| format!("ADC channel {} config", source.0))?;
        }
        Ok(handle)
    }
}

fn hal_level(level: Level) -> esp_idf_hal::gpio::Level {
    match level {
        Level::Low => esp_idf_hal::gpio::Level::Low,
        Level::High => esp_idf_hal::gpio::Level::High,
    }
}

impl Platform for EspPlatform<'_> {
    fn sample_analog(&mut self, source: AnalogSource) -> i32 {
        let slot = source.0 as usize % ADC_CHANNELS;
        let mut raw: i32 = 0;
        let ret = unsafe {
            esp_idf_sys::adc_oneshot_read(
                self.adc,
                source.0 as esp_idf_sys::adc_channel_t,
                &mut raw,
            )
        };
        if ret == esp_idf_sys::ESP_OK {
            self.last_raw[slot] = raw;
        } else {
            // Repeat the previous conversion rather than report a false drop.
            log::warn!("ADC read on channel {} failed ({})", source.0, ret);
        }
        self.last_raw[slot]
    }

    fn set_output(&mut self, level: Level) {
        if let Err(e) = self.output.set_level(hal_level(level)) {
            log::warn!("Trigger output write failed: {}", e);
        }
    }

    fn set_indicator(&mut self, pin: i32, level: Level) {
        if let Some((_, driver)) = self.leds.iter_mut().find(|(gpio, _)| *gpio == pin) {
            if let Err(e) = driver.set_level(hal_level(level)) {
                log::warn!("Indicator GPIO{} write failed: {}", pin, e);
            }
        }
    }

    fn calibrate_pressed(&mut self) -> bool {
        self.calibrate.is_low() // active LOW
    }

    fn now_ms(&self) -> u32 {
        now_ms()
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}

impl Drop for EspPlatform<'_> {
    fn drop(&mut self) {
        unsafe {
            esp_idf_sys::adc_oneshot_del_unit(self.adc);
        }
    }
}

/// Milliseconds since boot (wraps at ~49 days — fine for timeouts).
pub fn now_ms() -> u32 {
    unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u32 }
}

/// Pin roles for the shipped board, moved into the trigger task.
pub struct TriggerPins {
    pub output: AnyOutputPin,
    pub leds: Vec<(i32, AnyOutputPin)>,
    pub calibrate: AnyInputPin,
}

impl TriggerPins {
    pub fn into_platform(self, config: &TriggerConfig) -> anyhow::Result<EspPlatform<'static>> {
        let sources: Vec<AnalogSource> = config.pins.analog[..config.sensor_count()]
            .iter()
            .flatten()
            .copied()
            .collect();
        EspPlatform::new(
            self.output,
            self.leds,
            self.calibrate,
            config.pins.calibrate,
            &sources,
        )
    }
}
