//! Configuration constants for the STM32F411 bootloader

/// CPU frequency in Hz (HSI, no PLL setup in the bootloader)
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 115_200;

/// Receive buffer capacity in bytes
pub const RX_BUF_SIZE: usize = 2048;

/// Delay between the FINISH acknowledge and the launch attempt
pub const SETTLE_DELAY_MS: u32 = 100;

/// Boot key debounce delay after power-up
pub const KEY_DEBOUNCE_MS: u32 = 20;

/// Line settle delay before entering the update loop
pub const UART_SETTLE_MS: u32 = 300;

/// Flash and RAM address plan.
///
/// The bootloader occupies sector 0; the application image starts at the
/// first byte of sector 1. The erase list covers the application region
/// plus headroom sectors so a larger image fits without a layout change;
/// the remaining sectors stay untouched for future configuration storage.
/// Passed by reference into the storage writer and the launch validator so
/// both can run against simulated memory.
pub struct MemoryLayout {
    /// First address of the application image
    pub app_base: u32,
    /// Flash sector numbers erased on CONNECT
    pub app_sectors: &'static [u8],
    /// Lowest valid initial stack pointer value
    pub ram_start: u32,
    /// Highest valid initial stack pointer value (inclusive)
    pub ram_end: u32,
}

/// Layout for the STM32F411 (512K flash, 128K SRAM)
pub const STM32F411_LAYOUT: MemoryLayout = MemoryLayout {
    app_base: 0x0800_4000,
    app_sectors: &[1, 2, 3, 4, 5],
    ram_start: 0x2000_0000,
    ram_end: 0x2002_0000,
};
