//! Millisecond timing off the SysTick counter
//!
//! The delay polls COUNTFLAG instead of counting tick interrupts, so it
//! keeps working while interrupts are masked (the FINISH settle delay
//! runs inside a critical section).

use cortex_m::peripheral::SYST;
use embedded_hal::blocking::delay::DelayMs;

use crate::config::CPU_FREQ_HZ;

const CSR_ENABLE: u32 = 1 << 0;
const CSR_CLKSOURCE: u32 = 1 << 2;
const CSR_COUNTFLAG: u32 = 1 << 16;

/// Start SysTick free-running with a 1 ms period, no interrupt.
pub fn init() {
    unsafe {
        let syst = &*SYST::PTR;
        syst.rvr.write(CPU_FREQ_HZ / 1000 - 1);
        syst.cvr.write(0);
        syst.csr.write(CSR_CLKSOURCE | CSR_ENABLE);
    }
}

/// Busy-wait for `ms` milliseconds.
pub fn delay_ms(ms: u32) {
    let syst = unsafe { &*SYST::PTR };
    // Reading CSR clears a stale COUNTFLAG before counting starts.
    syst.csr.read();
    for _ in 0..ms {
        while syst.csr.read() & CSR_COUNTFLAG == 0 {}
    }
}

pub struct SysTickDelay;

impl DelayMs<u32> for SysTickDelay {
    fn delay_ms(&mut self, ms: u32) {
        delay_ms(ms);
    }
}
