//! Button edge glue between the GPIO interrupt and the [`InputLatch`].
//!
//! ## Hardware
//!
//! Four active-low momentary switches with external pull-ups.  Each GPIO
//! fires on the falling edge; the ISR maps the pin to a [`Button`] and
//! hands the edge to the latch, which applies the shared debounce window.
//! Nothing else runs in interrupt context.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`init_button_isrs`] installs one handler per pin.
//! On host: the simulation thread calls [`button_isr_handler`] directly.

use crate::input::{Button, DEFAULT_DEBOUNCE_MS, InputLatch};
use crate::pins;

/// The single latch shared by the button ISRs and the control loop.  Its
/// window is replaced by `SystemConfig::debounce_window_ms` when the
/// application service is built.
pub static BUTTONS: InputLatch = InputLatch::new(DEFAULT_DEBOUNCE_MS);

/// Pin → button.  `None` for any pin that is not a button.
pub fn button_for_gpio(gpio: i32) -> Option<Button> {
    match gpio {
        pins::BUTTON_UP_GPIO => Some(Button::Up),
        pins::BUTTON_LEFT_GPIO => Some(Button::Left),
        pins::BUTTON_DOWN_GPIO => Some(Button::Down),
        pins::BUTTON_RIGHT_GPIO => Some(Button::Right),
        _ => None,
    }
}

/// ISR handler: register this on every button falling edge.
/// Lock-free; returns `true` if the edge was accepted.
pub fn button_isr_handler(gpio: i32, now_ms: u32) -> bool {
    match button_for_gpio(gpio) {
        Some(button) => BUTTONS.on_edge(button, now_ms),
        None => false,
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: esp_timer_get_time is an RTC counter read; safe in ISR context.
    let now_ms = (unsafe { esp_idf_svc::sys::esp_timer_get_time() } / 1_000) as u32;
    // The pin number travels in the user argument.
    button_isr_handler(arg as i32, now_ms);
}

/// Configure the four button pins and register their edge handlers.
/// Call once from `main()` before the loop starts.
#[cfg(target_os = "espidf")]
pub fn init_button_isrs() -> Result<(), i32> {
    use esp_idf_svc::sys::*;

    let mask = pins::BUTTON_GPIOS
        .iter()
        .fold(0u64, |m, &pin| m | (1u64 << pin));
    let cfg = gpio_config_t {
        pin_bit_mask: mask,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    // SAFETY: one-shot configuration from the main task before the loop;
    // the registered handler only touches the lock-free latch.
    unsafe {
        let ret = gpio_config(&cfg);
        if ret != ESP_OK {
            return Err(ret);
        }
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(ret);
        }
        for &pin in &pins::BUTTON_GPIOS {
            let ret = gpio_isr_handler_add(pin, Some(button_gpio_isr), pin as *mut core::ffi::c_void);
            if ret != ESP_OK {
                return Err(ret);
            }
            gpio_intr_enable(pin);
        }
    }
    log::info!("buttons: ISRs installed on {:?}", pins::BUTTON_GPIOS);
    Ok(())
}
