#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
use panic_halt as _;

#[cfg(target_os = "none")]
#[cortex_m_rt::entry]
fn main() -> ! {
    use cortex_m::interrupt;
    use stm32f411_bootloader::boot_log;
    use stm32f411_bootloader::bootloader::{launch, Updater};
    use stm32f411_bootloader::config::{self, STM32F411_LAYOUT};
    use stm32f411_bootloader::hal::{key, systick, uart, FlashNvm, SysTickDelay, Uart};
    use stm32f411_bootloader::logger::SerialLog;

    // Claim the peripheral singleton once; the drivers work through the
    // raw register pointers from here on.
    let dp = stm32f4::stm32f411::Peripherals::take().unwrap();
    let layout = &STM32F411_LAYOUT;
    let mut nvm = FlashNvm::new(dp.FLASH);

    systick::init();
    key::init();
    systick::delay_ms(config::KEY_DEBOUNCE_MS);

    // Startup gate: without the key held, hand over to the application
    // immediately and skip the protocol entirely.
    if !key::is_pressed() {
        if let Ok(vector) = launch::validate(layout, &nvm) {
            unsafe { launch::jump(layout, vector) }
        }
        // No plausible image; fall through into update mode.
    }

    let mut log = SerialLog::new(Uart::new());
    systick::delay_ms(config::UART_SETTLE_MS);
    boot_log!(log, "update mode, cursor at {}", layout.app_base);
    let mut uart = log.release();

    let mut delay = SysTickDelay;
    let mut updater = Updater::new(layout);

    loop {
        // The RX interrupt owns the buffer between polls; one pass of the
        // engine runs with it masked. A validated FINISH never comes back.
        let pending = interrupt::free(|cs| {
            uart::with_rx_buffer(cs, |rx| updater.poll(rx, &mut nvm, &mut uart, &mut delay))
        });

        if let Some(vector) = pending {
            unsafe { launch::jump(layout, vector) }
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
