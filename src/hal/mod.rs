//! Hardware abstraction layer
//!
//! The portable part of the crate talks to hardware through the traits in
//! this module; the register-level implementations below are only compiled
//! for the target so the update engine can be tested on the host against
//! simulated peripherals.

#[cfg(target_os = "none")]
pub mod flash;
#[cfg(target_os = "none")]
pub mod key;
#[cfg(target_os = "none")]
pub mod systick;
#[cfg(target_os = "none")]
pub mod uart;

#[cfg(target_os = "none")]
pub use flash::FlashNvm;
#[cfg(target_os = "none")]
pub use systick::SysTickDelay;
#[cfg(target_os = "none")]
pub use uart::Uart;

/// Programming-layer failures surfaced to the dispatcher.
///
/// The flash controller reports these through its status register; the
/// engine answers NACK so the host sees the failed block instead of a
/// silently absorbed error.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum NvmError {
    /// Target sector is write protected
    WriteProtected,
    /// Programming address or access width violated controller rules
    Alignment,
    /// Sequence or other operation error flagged by the controller
    Operation,
}

/// Non-volatile memory controller, the seam between the update engine and
/// the flash interface peripheral.
///
/// `erase_sector` and `program_word` require a prior `unlock`; callers are
/// expected to relock when a multi-word operation completes.
pub trait NvmController {
    fn unlock(&mut self);
    fn lock(&mut self);
    /// Clear pending error/status flags left by earlier operations.
    fn clear_status_flags(&mut self);
    fn erase_sector(&mut self, sector: u8) -> Result<(), NvmError>;
    /// Program one 4-byte-aligned word. `addr` must be word aligned.
    fn program_word(&mut self, addr: u32, word: u32) -> Result<(), NvmError>;
    fn read_word(&self, addr: u32) -> u32;
}
