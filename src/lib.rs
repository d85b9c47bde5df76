//! UART bootloader for the STM32F411.
//!
//! The updater receives an application image over USART1 as checksummed
//! frames, programs it into on-chip flash starting at the application
//! region base, and hands execution over to it. Hardware access goes
//! through narrow seams (`hal::NvmController`, `embedded_hal` serial and
//! delay traits) so the whole update engine runs against simulated
//! hardware on the host.
#![cfg_attr(not(test), no_std)]

pub mod bootloader;
pub mod config;
pub mod drivers;
pub mod hal;
pub mod logger;
pub mod protocol;
pub mod transport;

#[cfg(test)]
mod testing;

pub use bootloader::Updater;
pub use transport::RxBuffer;
