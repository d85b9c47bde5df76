//! Host-side test support: simulated flash and frame building

use embedded_hal_mock::serial::Transaction;

use crate::hal::{NvmController, NvmError};
use crate::protocol::{checksum, ACK, FRAME_SYNC_A, FRAME_SYNC_B, NACK};

/// Flash address range the simulator backs (sectors 0-5 of the F411).
const SIM_BASE: u32 = 0x0800_0000;
const SIM_SIZE: usize = 0x0008_0000;

/// STM32F411 sector map: (first address, size).
const SECTOR_MAP: [(u32, usize); 6] = [
    (0x0800_0000, 0x4000),
    (0x0800_4000, 0x4000),
    (0x0800_8000, 0x4000),
    (0x0800_C000, 0x4000),
    (0x0801_0000, 0x1_0000),
    (0x0802_0000, 0x2_0000),
];

/// In-memory stand-in for the flash interface peripheral.
///
/// Models NOR flash faithfully enough for the storage writer's contract:
/// erase sets a sector to 0xFF and programming can only clear bits, so a
/// padded 0xFF lane really is a no-op. Tracks the lock state and erased
/// sectors, and can inject one failure for error-path tests.
pub struct SimNvm {
    mem: Vec<u8>,
    locked: bool,
    erased: Vec<u8>,
    pending_error: Option<NvmError>,
}

impl SimNvm {
    pub fn new() -> Self {
        Self {
            mem: vec![0xFF; SIM_SIZE],
            locked: true,
            erased: Vec::new(),
            pending_error: None,
        }
    }

    /// Place bytes directly into simulated flash, bypassing the controller.
    pub fn preload(&mut self, addr: u32, bytes: &[u8]) {
        let offset = (addr - SIM_BASE) as usize;
        self.mem[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn bytes_at(&self, addr: u32, len: usize) -> Vec<u8> {
        let offset = (addr - SIM_BASE) as usize;
        self.mem[offset..offset + len].to_vec()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Sectors erased since construction, in erase order.
    pub fn erased_sectors(&self) -> &[u8] {
        &self.erased
    }

    /// Make the next erase or program operation fail with `error`.
    pub fn fail_next(&mut self, error: NvmError) {
        self.pending_error = Some(error);
    }

    fn take_pending_error(&mut self) -> Result<(), NvmError> {
        match self.pending_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl NvmController for SimNvm {
    fn unlock(&mut self) {
        self.locked = false;
    }

    fn lock(&mut self) {
        self.locked = true;
    }

    fn clear_status_flags(&mut self) {}

    fn erase_sector(&mut self, sector: u8) -> Result<(), NvmError> {
        assert!(!self.locked, "erase while controller is locked");
        self.take_pending_error()?;

        let (base, size) = SECTOR_MAP[sector as usize];
        let offset = (base - SIM_BASE) as usize;
        self.mem[offset..offset + size].fill(0xFF);
        self.erased.push(sector);
        Ok(())
    }

    fn program_word(&mut self, addr: u32, word: u32) -> Result<(), NvmError> {
        assert!(!self.locked, "program while controller is locked");
        if addr % 4 != 0 {
            return Err(NvmError::Alignment);
        }
        self.take_pending_error()?;

        let offset = (addr - SIM_BASE) as usize;
        for (i, byte) in word.to_le_bytes().iter().enumerate() {
            // Programming can only clear bits.
            self.mem[offset + i] &= byte;
        }
        Ok(())
    }

    fn read_word(&self, addr: u32) -> u32 {
        let offset = (addr - SIM_BASE) as usize;
        u32::from_le_bytes(self.mem[offset..offset + 4].try_into().unwrap())
    }
}

/// Assemble a wire frame with the correct trailing checksum.
pub fn build_frame(command: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![FRAME_SYNC_A, FRAME_SYNC_B, command];
    frame.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    frame.extend_from_slice(payload);
    frame.push(checksum(&frame[2..]));
    frame
}

/// Serial expectations for a single ACK reply.
pub fn ack_reply() -> Vec<Transaction<u8>> {
    vec![Transaction::write(ACK), Transaction::flush()]
}

/// Serial expectations for a single NACK reply.
pub fn nack_reply() -> Vec<Transaction<u8>> {
    vec![Transaction::write(NACK), Transaction::flush()]
}
