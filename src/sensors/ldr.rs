//! LDR light sensor on a 12-bit ADC channel.
//!
//! The divider is wired so the reading rises as the box gets darker;
//! normalisation (and the inversion) happens in the shade controller.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: ADC1 oneshot unit, 12 dB attenuation, 12-bit width.
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::{AtomicU16, Ordering};

use crate::control::actuator::LIGHT_RAW_MAX;

static SIM_LDR_RAW: AtomicU16 = AtomicU16::new(2048);

/// Inject the next raw reading (host simulation).  Clamped to 12 bits.
pub fn sim_set_ldr_raw(raw: u16) {
    SIM_LDR_RAW.store(raw.min(LIGHT_RAW_MAX), Ordering::Relaxed);
}

pub struct LdrSensor {
    #[cfg(target_os = "espidf")]
    unit: esp_idf_svc::sys::adc_oneshot_unit_handle_t,
    channel: u32,
}

impl LdrSensor {
    #[cfg(not(target_os = "espidf"))]
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    /// Bring up ADC1 and configure the channel.  Returns the ESP-IDF error
    /// code on failure.
    #[cfg(target_os = "espidf")]
    pub fn new(channel: u32) -> Result<Self, i32> {
        use esp_idf_svc::sys::*;

        let mut unit: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        let init_cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        // SAFETY: called once from main() before the loop; the handle is
        // owned by this struct afterwards.
        let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut unit) };
        if ret != ESP_OK {
            return Err(ret);
        }
        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        let ret = unsafe { adc_oneshot_config_channel(unit, channel, &chan_cfg) };
        if ret != ESP_OK {
            return Err(ret);
        }
        log::info!("ldr: ADC1 channel {channel} configured");
        Ok(Self { unit, channel })
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }

    /// Raw reading, 0..=4095.  A failed conversion reads as 0.
    #[cfg(target_os = "espidf")]
    pub fn read_raw(&mut self) -> u16 {
        let mut raw: i32 = 0;
        // SAFETY: unit was created in new(); main-loop access only.
        let ret = unsafe { esp_idf_svc::sys::adc_oneshot_read(self.unit, self.channel, &mut raw) };
        if ret != esp_idf_svc::sys::ESP_OK {
            log::warn!("ldr: ADC read failed (rc={ret})");
            return 0;
        }
        (raw.max(0) as u16).min(LIGHT_RAW_MAX)
    }

    /// Raw reading, 0..=4095.
    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&mut self) -> u16 {
        SIM_LDR_RAW.load(Ordering::Relaxed)
    }
}
