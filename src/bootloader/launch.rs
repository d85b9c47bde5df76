//! Validated hand-off to the programmed application image

use crate::config::MemoryLayout;
use crate::hal::NvmController;

/// The two words a Cortex-M image starts with: initial stack pointer and
/// reset handler address.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchVector {
    pub initial_sp: u32,
    pub entry: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LaunchError {
    /// The candidate initial stack pointer does not point into SRAM;
    /// erased flash reads as 0xFFFFFFFF and fails this check.
    StackOutOfRange,
}

/// Check the image for plausibility without any side effects.
///
/// The stack pointer range check is the only gate before the irreversible
/// transfer: a value that lies in SRAM but is nonetheless garbage will
/// still be accepted and can crash the system with no way back.
pub fn validate<N: NvmController>(
    layout: &MemoryLayout,
    nvm: &N,
) -> Result<LaunchVector, LaunchError> {
    let initial_sp = nvm.read_word(layout.app_base);
    if initial_sp < layout.ram_start || initial_sp > layout.ram_end {
        return Err(LaunchError::StackOutOfRange);
    }

    Ok(LaunchVector {
        initial_sp,
        entry: nvm.read_word(layout.app_base + 4),
    })
}

/// Transfer execution to the application. Never returns.
///
/// # Safety
///
/// `vector` must come from [`validate`] against the image at
/// `layout.app_base`. After the stack pointer is switched the bootloader's
/// own stack is gone; nothing may run after the entry call.
#[cfg(target_os = "none")]
pub unsafe fn jump(layout: &MemoryLayout, vector: LaunchVector) -> ! {
    use cortex_m::peripheral::{SCB, SYST};

    cortex_m::interrupt::disable();

    // Kill SysTick, the bootloader's main interrupt source.
    let syst = &*SYST::PTR;
    syst.csr.write(0);
    syst.rvr.write(0);
    syst.cvr.write(0);

    // The application's vector table becomes authoritative.
    let scb = &*SCB::PTR;
    scb.vtor.write(layout.app_base);
    cortex_m::asm::dsb();
    cortex_m::asm::isb();

    cortex_m::register::msp::write(vector.initial_sp);

    let entry: extern "C" fn() -> ! = core::mem::transmute(vector.entry);
    entry()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STM32F411_LAYOUT;
    use crate::testing::SimNvm;

    const BASE: u32 = STM32F411_LAYOUT.app_base;

    #[test]
    fn erased_region_is_rejected() {
        let nvm = SimNvm::new();
        assert_eq!(
            validate(&STM32F411_LAYOUT, &nvm),
            Err(LaunchError::StackOutOfRange)
        );
    }

    #[test]
    fn stack_pointer_below_ram_is_rejected() {
        let mut nvm = SimNvm::new();
        nvm.preload(BASE, &0x1FFF_FFFCu32.to_le_bytes());
        assert_eq!(
            validate(&STM32F411_LAYOUT, &nvm),
            Err(LaunchError::StackOutOfRange)
        );
    }

    #[test]
    fn stack_pointer_above_ram_is_rejected() {
        let mut nvm = SimNvm::new();
        nvm.preload(BASE, &0x2002_0004u32.to_le_bytes());
        assert_eq!(
            validate(&STM32F411_LAYOUT, &nvm),
            Err(LaunchError::StackOutOfRange)
        );
    }

    #[test]
    fn ram_bounds_are_inclusive() {
        let mut nvm = SimNvm::new();
        nvm.preload(BASE, &0x2000_0000u32.to_le_bytes());
        assert!(validate(&STM32F411_LAYOUT, &nvm).is_ok());

        let mut nvm = SimNvm::new();
        nvm.preload(BASE, &0x2002_0000u32.to_le_bytes());
        assert!(validate(&STM32F411_LAYOUT, &nvm).is_ok());
    }

    #[test]
    fn valid_image_yields_sp_and_entry() {
        let mut nvm = SimNvm::new();
        nvm.preload(BASE, &0x2001_8000u32.to_le_bytes());
        nvm.preload(BASE + 4, &0x0800_40C1u32.to_le_bytes());

        assert_eq!(
            validate(&STM32F411_LAYOUT, &nvm),
            Ok(LaunchVector {
                initial_sp: 0x2001_8000,
                entry: 0x0800_40C1,
            })
        );
    }
}
