//! USART1 driver: interrupt-fed receive into the shared byte sink,
//! blocking single-byte transmit for replies

use core::cell::RefCell;
use core::convert::Infallible;
use core::marker::PhantomData;

use cortex_m::interrupt::{CriticalSection, Mutex};
use cortex_m::peripheral::NVIC;
use embedded_hal::serial;
use stm32f4::stm32f411::{interrupt, Interrupt, GPIOA, RCC, USART1};

use crate::config::{CPU_FREQ_HZ, UART_BAUD};
use crate::transport::RxBuffer;

const RCC_GPIOAEN: u32 = 1 << 0;
const RCC_USART1EN: u32 = 1 << 4;

const SR_RXNE: u32 = 1 << 5;
const SR_TC: u32 = 1 << 6;
const SR_TXE: u32 = 1 << 7;

const CR1_RE: u32 = 1 << 2;
const CR1_TE: u32 = 1 << 3;
const CR1_RXNEIE: u32 = 1 << 5;
const CR1_UE: u32 = 1 << 13;

// 16x oversampling: BRR is fclk/baud in 12.4 fixed point
const BRR_VAL: u32 = (CPU_FREQ_HZ + UART_BAUD / 2) / UART_BAUD;

// Single producer (RX interrupt), single consumer (main loop); every
// access goes through a critical section.
static RX_BUFFER: Mutex<RefCell<RxBuffer>> = Mutex::new(RefCell::new(RxBuffer::new()));

/// Run `f` with exclusive access to the receive buffer.
pub fn with_rx_buffer<R>(cs: &CriticalSection, f: impl FnOnce(&mut RxBuffer) -> R) -> R {
    f(&mut RX_BUFFER.borrow(cs).borrow_mut())
}

pub struct Uart {
    _marker: PhantomData<()>,
}

impl Uart {
    /// Bring up USART1 on PA9 (TX) / PA10 (RX), 115200-8-N-1, receive
    /// interrupt enabled.
    pub fn new() -> Self {
        unsafe {
            let rcc = &*RCC::ptr();
            rcc.ahb1enr.modify(|r, w| w.bits(r.bits() | RCC_GPIOAEN));
            rcc.apb2enr.modify(|r, w| w.bits(r.bits() | RCC_USART1EN));

            // PA9/PA10 to AF7, pulled up so the idle line reads high.
            let gpioa = &*GPIOA::ptr();
            gpioa
                .moder
                .modify(|r, w| w.bits((r.bits() & !(0b1111 << 18)) | (0b1010 << 18)));
            gpioa
                .pupdr
                .modify(|r, w| w.bits((r.bits() & !(0b1111 << 18)) | (0b0101 << 18)));
            gpioa
                .afrh
                .modify(|r, w| w.bits((r.bits() & !(0xFF << 4)) | (0x77 << 4)));

            let usart = &*USART1::ptr();
            usart.brr.write(|w| w.bits(BRR_VAL));
            usart
                .cr1
                .write(|w| w.bits(CR1_UE | CR1_TE | CR1_RE | CR1_RXNEIE));

            NVIC::unmask(Interrupt::USART1);
        }

        Self {
            _marker: PhantomData,
        }
    }

}

impl serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        let usart = unsafe { &*USART1::ptr() };
        if usart.sr.read().bits() & SR_TXE == 0 {
            return Err(nb::Error::WouldBlock);
        }
        usart.dr.write(|w| unsafe { w.bits(byte as u32) });
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        let usart = unsafe { &*USART1::ptr() };
        if usart.sr.read().bits() & SR_TC == 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(())
    }
}

#[interrupt]
fn USART1() {
    let usart = unsafe { &*USART1::ptr() };
    if usart.sr.read().bits() & SR_RXNE != 0 {
        // Reading DR clears RXNE. A full buffer drops the byte; the
        // ACK-gated host protocol never outruns the engine by a frame.
        let byte = usart.dr.read().bits() as u8;
        cortex_m::interrupt::free(|cs| {
            RX_BUFFER.borrow(cs).borrow_mut().try_push(byte);
        });
    }
}
