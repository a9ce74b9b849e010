//! uDMA interrupt sources, and the handlers registered for them.
//!
//! Channels assigned to a peripheral signal completion through that
//! peripheral's interrupt. Software channels, and bus errors, have their own
//! NVIC lines. Register a [`Handler`] for those lines with
//! [`Udma::register_handler`](crate::Udma::register_handler), then call
//! [`Udma::on_interrupt`](crate::Udma::on_interrupt) from the vector.
//! [`Interrupt`] implements `InterruptNumber`, so you can unmask the line
//! with `cortex_m::peripheral::NVIC`.

use core::cell::Cell;

use critical_section::Mutex;

/// A uDMA interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Interrupt {
    /// A software channel completed. Vector 62.
    Software = 46,
    /// The controller saw a bus error. Vector 63.
    Error = 47,
}

impl Interrupt {
    /// The exception number, which is the index in the vector table.
    pub const fn vector(self) -> u16 {
        self as u16 + 16
    }

    const fn slot(self) -> usize {
        match self {
            Interrupt::Software => 0,
            Interrupt::Error => 1,
        }
    }
}

// Safety: these are the uDMA IRQ numbers of the F28M35x M3 NVIC.
unsafe impl cortex_m::interrupt::InterruptNumber for Interrupt {
    fn number(self) -> u16 {
        self as u16
    }
}

/// Runs when a uDMA interrupt fires.
///
/// Any `Fn() + Sync` is a handler, including plain functions.
pub trait Handler: Sync {
    /// Called from [`Udma::on_interrupt`](crate::Udma::on_interrupt).
    fn on_interrupt(&self);
}

impl<F: Fn() + Sync> Handler for F {
    fn on_interrupt(&self) {
        self()
    }
}

type Slot = Mutex<Cell<Option<&'static dyn Handler>>>;
const NO_HANDLER: Slot = Mutex::new(Cell::new(None));

/// One handler slot per interrupt line.
pub(crate) struct Handlers([Slot; 2]);

impl Handlers {
    pub(crate) const fn new() -> Self {
        Handlers([NO_HANDLER; 2])
    }

    /// Associate `handler` with `interrupt`, returning the previous handler.
    pub(crate) fn register(
        &self,
        interrupt: Interrupt,
        handler: &'static dyn Handler,
    ) -> Option<&'static dyn Handler> {
        critical_section::with(|cs| self.0[interrupt.slot()].borrow(cs).replace(Some(handler)))
    }

    pub(crate) fn unregister(&self, interrupt: Interrupt) -> Option<&'static dyn Handler> {
        critical_section::with(|cs| self.0[interrupt.slot()].borrow(cs).take())
    }

    pub(crate) fn get(&self, interrupt: Interrupt) -> Option<&'static dyn Handler> {
        critical_section::with(|cs| self.0[interrupt.slot()].borrow(cs).get())
    }
}
