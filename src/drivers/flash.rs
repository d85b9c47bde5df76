//! Storage writer: erases the application region and programs it in
//! 4-byte cells from an arbitrary-length byte stream.

use crate::config::MemoryLayout;
use crate::hal::{NvmController, NvmError};

/// Erase every sector of the application region.
///
/// Erasing an already-erased sector is a no-op apart from timing, so a
/// repeated CONNECT is harmless. The controller is relocked even when a
/// sector fails to erase.
pub fn erase_application<N: NvmController>(
    nvm: &mut N,
    layout: &MemoryLayout,
) -> Result<(), NvmError> {
    nvm.unlock();
    nvm.clear_status_flags();

    for &sector in layout.app_sectors {
        if let Err(e) = nvm.erase_sector(sector) {
            nvm.lock();
            return Err(e);
        }
    }

    nvm.lock();
    Ok(())
}

/// Program `bytes` at `addr`, which may be unaligned, packing
/// little-endian 32-bit words.
///
/// Walks every 4-byte-aligned cell overlapping `[addr, addr + len)`. The
/// head lanes of the first cell and the tail lanes of the last are padded
/// with 0xFF, the erased flash value, so programming them is a no-op and
/// nothing outside the requested range is ever modified. A write cursor
/// left unaligned by a previous payload therefore continues contiguously.
pub fn write_data<N: NvmController>(
    nvm: &mut N,
    addr: u32,
    bytes: &[u8],
) -> Result<(), NvmError> {
    nvm.unlock();

    let end = addr + bytes.len() as u32;
    let mut cell = addr & !3;
    while cell < end {
        let mut word = [0xFF; 4];
        for lane in 0..4u32 {
            let byte_addr = cell + lane;
            if byte_addr >= addr && byte_addr < end {
                word[lane as usize] = bytes[(byte_addr - addr) as usize];
            }
        }

        if let Err(e) = nvm.program_word(cell, u32::from_le_bytes(word)) {
            nvm.lock();
            return Err(e);
        }
        cell += 4;
    }

    nvm.lock();
    Ok(())
}
