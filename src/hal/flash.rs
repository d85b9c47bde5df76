//! On-chip flash interface driver (STM32F411)

use stm32f4::stm32f411::FLASH;

use super::{NvmController, NvmError};

const KEY1: u32 = 0x4567_0123;
const KEY2: u32 = 0xCDEF_89AB;

const CR_PG: u32 = 1 << 0;
const CR_SER: u32 = 1 << 1;
const CR_SNB_SHIFT: u32 = 3;
const CR_SNB_MASK: u32 = 0xF << CR_SNB_SHIFT;
// x32 parallelism, valid for a 2.7-3.6V supply
const CR_PSIZE_X32: u32 = 0b10 << 8;
const CR_PSIZE_MASK: u32 = 0b11 << 8;
const CR_STRT: u32 = 1 << 16;
const CR_LOCK: u32 = 1 << 31;

const SR_EOP: u32 = 1 << 0;
const SR_OPERR: u32 = 1 << 1;
const SR_WRPERR: u32 = 1 << 4;
const SR_PGAERR: u32 = 1 << 5;
const SR_PGPERR: u32 = 1 << 6;
const SR_PGSERR: u32 = 1 << 7;
const SR_BSY: u32 = 1 << 16;

const SR_ALL_FLAGS: u32 = SR_EOP | SR_OPERR | SR_WRPERR | SR_PGAERR | SR_PGPERR | SR_PGSERR;

/// Flash controller frontend owning the FLASH peripheral.
pub struct FlashNvm {
    flash: FLASH,
}

impl FlashNvm {
    pub fn new(flash: FLASH) -> Self {
        Self { flash }
    }

    fn wait_busy(&self) {
        while self.flash.sr.read().bits() & SR_BSY != 0 {}
    }

    fn check_status(&mut self) -> Result<(), NvmError> {
        let sr = self.flash.sr.read().bits();
        if sr & SR_ALL_FLAGS == 0 || sr & SR_ALL_FLAGS == SR_EOP {
            return Ok(());
        }

        let error = if sr & SR_WRPERR != 0 {
            NvmError::WriteProtected
        } else if sr & SR_PGAERR != 0 {
            NvmError::Alignment
        } else {
            NvmError::Operation
        };
        self.clear_status_flags();
        Err(error)
    }
}

impl NvmController for FlashNvm {
    fn unlock(&mut self) {
        if self.flash.cr.read().bits() & CR_LOCK != 0 {
            self.flash.keyr.write(|w| unsafe { w.bits(KEY1) });
            self.flash.keyr.write(|w| unsafe { w.bits(KEY2) });
        }
    }

    fn lock(&mut self) {
        self.flash
            .cr
            .modify(|r, w| unsafe { w.bits(r.bits() | CR_LOCK) });
    }

    fn clear_status_flags(&mut self) {
        // Flags are write-one-to-clear.
        self.flash.sr.write(|w| unsafe { w.bits(SR_ALL_FLAGS) });
    }

    fn erase_sector(&mut self, sector: u8) -> Result<(), NvmError> {
        self.wait_busy();
        self.flash.cr.modify(|r, w| unsafe {
            w.bits(
                (r.bits() & !(CR_SNB_MASK | CR_PSIZE_MASK))
                    | CR_SER
                    | ((sector as u32) << CR_SNB_SHIFT)
                    | CR_PSIZE_X32,
            )
        });
        self.flash
            .cr
            .modify(|r, w| unsafe { w.bits(r.bits() | CR_STRT) });

        self.wait_busy();
        self.flash
            .cr
            .modify(|r, w| unsafe { w.bits(r.bits() & !(CR_SER | CR_SNB_MASK)) });
        self.check_status()
    }

    fn program_word(&mut self, addr: u32, word: u32) -> Result<(), NvmError> {
        if addr % 4 != 0 {
            return Err(NvmError::Alignment);
        }

        self.wait_busy();
        self.flash.cr.modify(|r, w| unsafe {
            w.bits((r.bits() & !CR_PSIZE_MASK) | CR_PG | CR_PSIZE_X32)
        });

        unsafe { core::ptr::write_volatile(addr as *mut u32, word) };

        self.wait_busy();
        self.flash
            .cr
            .modify(|r, w| unsafe { w.bits(r.bits() & !CR_PG) });
        self.check_status()
    }

    fn read_word(&self, addr: u32) -> u32 {
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }
}
