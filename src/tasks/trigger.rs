// PressMat Trigger — Trigger Task
//
// Builds the ESP-IDF platform, runs the startup settle, then polls the
// engine forever.  A short sleep between polls lets the FreeRTOS idle task
// feed the task watchdog.

use std::thread;
use std::time::Duration;

use crate::config::*;
use crate::device::TriggerDevice;
use crate::drivers::esp::TriggerPins;

pub fn trigger_task(pins: TriggerPins, config: TriggerConfig) {
    log::info!("Trigger task started");

    let platform = match pins.into_platform(&config) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Platform init failed in trigger task: {:#}", e);
            return;
        }
    };

    let mut device = match TriggerDevice::new(config, platform) {
        Ok(d) => d,
        Err(e) => {
            log::error!("Invalid trigger configuration: {}", e);
            return;
        }
    };

    device.setup();

    let idle = Duration::from_millis(IDLE_YIELD_MS);
    loop {
        let cycle = device.poll();
        if let Some(report) = &cycle.settle {
            log::info!(
                "Settle ({}) finished, all sensors settled: {}",
                report.reason.display_name(),
                report.all_settled()
            );
        }
        thread::sleep(idle);
    }
}
