//! Debug logging over the serial line
//!
//! The wire protocol's only sanctioned replies are ACK and NACK, so log
//! output shares the UART with the protocol and is compiled out unless the
//! `debug` cargo feature is enabled. With the feature off, `boot_log!`
//! costs nothing on the wire and almost nothing in flash.

use embedded_hal::serial::Write;
use ufmt::uWrite;

/// Adapts a blocking serial transmitter to `ufmt` formatted output.
pub struct SerialLog<TX> {
    tx: TX,
}

impl<TX> SerialLog<TX> {
    pub fn new(tx: TX) -> Self {
        Self { tx }
    }

    /// Hand the transmitter back, for the protocol loop to use.
    pub fn release(self) -> TX {
        self.tx
    }
}

impl<TX: Write<u8>> uWrite for SerialLog<TX> {
    type Error = TX::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            nb::block!(self.tx.write(byte))?;
        }
        Ok(())
    }
}

#[cfg(feature = "debug")]
#[macro_export]
macro_rules! boot_log {
    ($dst:expr, $($arg:tt)*) => {
        let _ = ufmt::uwriteln!($dst, $($arg)*);
    };
}

#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! boot_log {
    ($dst:expr, $($arg:tt)*) => {
        let _ = &$dst;
    };
}
