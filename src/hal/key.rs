//! Boot key on PC13: held low at reset forces update mode

use stm32f4::stm32f411::{GPIOC, RCC};

const RCC_GPIOCEN: u32 = 1 << 2;
const KEY_PIN: u32 = 13;

/// Configure PC13 as input with pull-up (idle high, pressed low).
pub fn init() {
    unsafe {
        let rcc = &*RCC::ptr();
        rcc.ahb1enr.modify(|r, w| w.bits(r.bits() | RCC_GPIOCEN));

        let gpioc = &*GPIOC::ptr();
        gpioc
            .moder
            .modify(|r, w| w.bits(r.bits() & !(0b11 << (KEY_PIN * 2))));
        gpioc.pupdr.modify(|r, w| {
            w.bits((r.bits() & !(0b11 << (KEY_PIN * 2))) | (0b01 << (KEY_PIN * 2)))
        });
    }
}

pub fn is_pressed() -> bool {
    let gpioc = unsafe { &*GPIOC::ptr() };
    gpioc.idr.read().bits() & (1 << KEY_PIN) == 0
}
