//! Update engine: frame-driven command dispatch

pub mod launch;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial::Write;

use crate::config::{MemoryLayout, SETTLE_DELAY_MS};
use crate::drivers::flash;
use crate::hal::NvmController;
use crate::protocol::frame::{self, FrameStatus};
use crate::protocol::{send_reply, Command, ACK, NACK};
use crate::transport::RxBuffer;

pub use launch::{LaunchError, LaunchVector};

/// One update session: the write cursor plus the memory plan it walks.
///
/// The dispatcher is deliberately permissive: DATA does not require a
/// prior CONNECT and FINISH does not require any DATA. The cursor starts
/// at the application base, advances with every accepted DATA payload and
/// is reset only by CONNECT. Ordering is the operator's responsibility.
pub struct Updater<'a> {
    layout: &'a MemoryLayout,
    write_addr: u32,
}

impl<'a> Updater<'a> {
    pub fn new(layout: &'a MemoryLayout) -> Self {
        Self {
            layout,
            write_addr: layout.app_base,
        }
    }

    /// Next flash address a DATA payload would program.
    pub fn write_addr(&self) -> u32 {
        self.write_addr
    }

    /// Run one decode/dispatch pass over whatever is buffered.
    ///
    /// Returns a launch vector when a FINISH frame passed validation; the
    /// caller must treat the subsequent jump as diverging. In every other
    /// case the engine recovers and keeps processing frames:
    /// bad sync discards the buffer silently, a checksum mismatch or an
    /// unknown command answers NACK, and a consumed frame always clears
    /// the buffer so one fill yields at most one processed frame.
    pub fn poll<N, TX, D>(
        &mut self,
        rx: &mut RxBuffer,
        nvm: &mut N,
        tx: &mut TX,
        delay: &mut D,
    ) -> Option<LaunchVector>
    where
        N: NvmController,
        TX: Write<u8>,
        D: DelayMs<u32>,
    {
        match frame::decode(rx.as_slice()) {
            FrameStatus::Incomplete => None,
            FrameStatus::BadSync => {
                rx.clear();
                None
            }
            FrameStatus::BadChecksum => {
                send_reply(tx, NACK);
                rx.clear();
                None
            }
            FrameStatus::Complete { command, payload } => {
                let launch = self.dispatch(command, payload, nvm, tx, delay);
                rx.clear();
                launch
            }
        }
    }

    fn dispatch<N, TX, D>(
        &mut self,
        command: u8,
        payload: &[u8],
        nvm: &mut N,
        tx: &mut TX,
        delay: &mut D,
    ) -> Option<LaunchVector>
    where
        N: NvmController,
        TX: Write<u8>,
        D: DelayMs<u32>,
    {
        match Command::from_code(command) {
            Some(Command::Connect) => {
                match flash::erase_application(nvm, self.layout) {
                    Ok(()) => {
                        self.write_addr = self.layout.app_base;
                        send_reply(tx, ACK);
                    }
                    Err(_) => send_reply(tx, NACK),
                }
                None
            }
            Some(Command::Data) => {
                match flash::write_data(nvm, self.write_addr, payload) {
                    Ok(()) => {
                        self.write_addr += payload.len() as u32;
                        send_reply(tx, ACK);
                    }
                    Err(_) => send_reply(tx, NACK),
                }
                None
            }
            Some(Command::Finish) => {
                // ACK first so the host sees the session close, then give
                // the line time to drain before the hand-off attempt.
                send_reply(tx, ACK);
                delay.delay_ms(SETTLE_DELAY_MS);
                launch::validate(self.layout, nvm).ok()
            }
            None => {
                send_reply(tx, NACK);
                None
            }
        }
    }
}
