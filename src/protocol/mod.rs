//! Update protocol definitions and reply primitives
//!
//! Wire format (all multi-byte fields little-endian):
//!
//! ```text
//! offset  size  field
//! 0       1     sync byte A (0x5A)
//! 1       1     sync byte B (0xA5)
//! 2       1     command code
//! 3-4     2     payload length N
//! 5..     N     payload
//! 5+N     1     checksum over bytes [2 .. 5+N)
//! ```
//!
//! Replies are a single byte, ACK or NACK. There is no other diagnostic
//! channel; the host infers failures from missing acknowledges.

pub mod frame;

use embedded_hal::serial::Write;

pub const FRAME_SYNC_A: u8 = 0x5A;
pub const FRAME_SYNC_B: u8 = 0xA5;

pub const ACK: u8 = 0x06;
pub const NACK: u8 = 0x15;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Command {
    Connect = 0x01,
    Data = 0x02,
    Finish = 0x03,
}

impl Command {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Command::Connect),
            0x02 => Some(Command::Data),
            0x03 => Some(Command::Finish),
            _ => None,
        }
    }
}

/// 8-bit wrapping sum, the frame integrity check.
pub fn checksum(data: &[u8]) -> u8 {
    let mut sum: u8 = 0;
    for &byte in data {
        sum = sum.wrapping_add(byte);
    }
    sum
}

/// Send a single reply byte, blocking until the transmitter takes it.
/// Transmit errors have nowhere to go and are dropped.
pub fn send_reply<TX: Write<u8>>(tx: &mut TX, code: u8) {
    nb::block!(tx.write(code)).ok();
    nb::block!(tx.flush()).ok();
}
