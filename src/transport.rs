//! Receive-side byte sink shared with the USART interrupt

use crate::config::RX_BUF_SIZE;

/// Append-only receive buffer with a saturating length counter.
///
/// The USART1 RX interrupt is the only producer and the main loop the only
/// consumer; both sides access the buffer through a critical section (see
/// `hal::uart`), never through bare statics. A full buffer silently drops
/// incoming bytes, it never wraps and never overwrites buffered data.
pub struct RxBuffer {
    data: [u8; RX_BUF_SIZE],
    len: usize,
}

impl RxBuffer {
    pub const fn new() -> Self {
        Self {
            data: [0; RX_BUF_SIZE],
            len: 0,
        }
    }

    /// Append one byte. Returns false when the buffer is full and the byte
    /// was dropped.
    pub fn try_push(&mut self, byte: u8) -> bool {
        if self.len < RX_BUF_SIZE {
            self.data[self.len] = byte;
            self.len += 1;
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The valid prefix. Bytes past `len()` are stale and never exposed.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Logical reset; the underlying storage is not erased.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for RxBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut buf = RxBuffer::new();
        assert!(buf.is_empty());

        assert!(buf.try_push(0x5A));
        assert!(buf.try_push(0xA5));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.as_slice(), &[0x5A, 0xA5]);

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.as_slice(), &[]);
    }

    #[test]
    fn overflow_drops_excess_without_corruption() {
        let mut buf = RxBuffer::new();
        for i in 0..RX_BUF_SIZE {
            assert!(buf.try_push(i as u8));
        }

        // Saturated: further pushes are refused, nothing wraps around.
        assert!(!buf.try_push(0xEE));
        assert!(!buf.try_push(0xFF));
        assert_eq!(buf.len(), RX_BUF_SIZE);
        assert_eq!(buf.as_slice()[0], 0);
        assert_eq!(buf.as_slice()[RX_BUF_SIZE - 1], (RX_BUF_SIZE - 1) as u8);
    }

    #[test]
    fn clear_makes_room_again() {
        let mut buf = RxBuffer::new();
        for _ in 0..RX_BUF_SIZE {
            buf.try_push(0xAA);
        }
        buf.clear();
        assert!(buf.try_push(0x01));
        assert_eq!(buf.as_slice(), &[0x01]);
    }
}
