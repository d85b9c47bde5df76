//! Frame recognition over the raw receive buffer

use super::{checksum, FRAME_SYNC_A, FRAME_SYNC_B};

/// Minimum frame size: sync(2) + command(1) + length(2) + checksum(1)
pub const MIN_FRAME_LEN: usize = 6;

/// Outcome of one decode pass over the buffered bytes.
///
/// A frame is never copied out: `Complete` borrows the payload straight
/// from the receive buffer and is only valid until the buffer is cleared.
#[derive(Debug, PartialEq)]
pub enum FrameStatus<'a> {
    /// Not enough bytes buffered yet; keep waiting.
    Incomplete,
    /// Byte 0/1 are not the sync pair. Leading garbage poisons the whole
    /// buffer; there is no shift-and-retry resynchronization.
    BadSync,
    /// Structurally complete but the trailing checksum does not match.
    BadChecksum,
    Complete { command: u8, payload: &'a [u8] },
}

/// Inspect the buffered prefix for one complete frame.
///
/// Only the first frame in the buffer is ever considered; anything after
/// it is discarded by the caller together with the frame.
pub fn decode(buf: &[u8]) -> FrameStatus<'_> {
    if buf.len() < MIN_FRAME_LEN {
        return FrameStatus::Incomplete;
    }

    if buf[0] != FRAME_SYNC_A || buf[1] != FRAME_SYNC_B {
        return FrameStatus::BadSync;
    }

    let payload_len = u16::from_le_bytes([buf[3], buf[4]]) as usize;
    let total_len = MIN_FRAME_LEN + payload_len;
    if buf.len() < total_len {
        return FrameStatus::Incomplete;
    }

    // Checksum covers command + length field + payload.
    let expected = checksum(&buf[2..total_len - 1]);
    if expected != buf[total_len - 1] {
        return FrameStatus::BadChecksum;
    }

    FrameStatus::Complete {
        command: buf[2],
        payload: &buf[5..5 + payload_len],
    }
}
