//! Micro Direct Memory Access (uDMA) driver for TI F28M35x processors.
//!
//! `f28m35x-udma` drives the uDMA controller of the F28M35x's Cortex-M3
//! subsystem. It provides
//!
//! - [`ControlTableEntry`] descriptors, and a `const` encoder,
//!   [`build_task_entry`], for scatter-gather task lists.
//! - the [`ControlTable`] shared with the controller, with helpers to
//!   program transfers into a channel's primary and alternate structures.
//! - an unsafe API for enabling, configuring and requesting transfers on
//!   [`Channel`](crate::channel::Channel)s.
//! - interrupt [handler](crate::interrupt::Handler) registration for the
//!   software and error interrupts.
//!
//! This driver may be re-exported from a hardware abstraction layer (HAL).
//! If it is, you should use the safer APIs provided by your HAL.
//!
//! # Getting started
//!
//! To allocate a [`Udma`] driver, you'll need to know
//!
//! 1. the location of the uDMA controller registers. That's `0x400F_F000`
//!    on the F28M35x.
//! 2. the number of uDMA channels supported by your chip. That's 32.
//!
//! Assign a `Udma` to a static. Then, allocate a [`ControlTable`] in a
//! static, hand it to the controller, and use the `Udma` to create
//! [`Channel`](crate::channel::Channel)s.
//!
//! ```
//! use f28m35x_udma::{ControlTable, Udma};
//! # const UDMA_PTR: *const () = core::ptr::null() as _;
//!
//! // Safety: address and channel count are valid for this target.
//! static UDMA: Udma<32> = unsafe { Udma::new(UDMA_PTR) };
//! static TABLE: ControlTable = ControlTable::new();
//!
//! // Safety: we only allocate one uDMA channel 12 object.
//! let channel = unsafe { UDMA.channel(12) };
//! ```
//!
//! Once you have a channel, describe a transfer in its control structures,
//! then enable the channel. See the [`channel`] module for an example.
//!
//! # Features
//!
//! - `defmt`: derive `defmt::Format` for public types, and trace controller
//!   events.
//!
//! ### License
//!
//! Licensed under either of
//!
//! - [Apache License, Version 2.0](http://www.apache.org/licenses/LICENSE-2.0) ([LICENSE-APACHE](./LICENSE-APACHE))
//! - [MIT License](http://opensource.org/licenses/MIT) ([LICENSE-MIT](./LICENSE-MIT))
//!
//! at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.

#![no_std]

pub mod assignment;
pub mod channel;
mod descriptor;
mod element;
mod error;
pub mod interrupt;
mod ral;
pub mod table;

#[cfg(test)]
mod test_utils;

pub use descriptor::{
    build_task_entry, ArbitrationSize, ControlTableEntry, ControlWord, Increment, ItemSize, Mode,
    ALT_SELECT, MAX_TRANSFER,
};
pub use element::Element;
pub use error::Error;
pub use interrupt::{Handler, Interrupt};
pub use table::{Control, ControlTable, ScatterGather, Structure};

/// A uDMA result
pub type Result<T> = core::result::Result<T, Error>;

/// A uDMA driver.
///
/// This driver manages the uDMA controller. It's configured with a pointer
/// to the controller's registers.
///
/// `Udma` allocates [`Channel`](channel::Channel)s. It also holds the
/// handlers for the uDMA [interrupts](Interrupt).
pub struct Udma<const CHANNELS: usize> {
    registers: ral::Static<ral::udma::RegisterBlock>,
    handlers: interrupt::Handlers,
}

// Safety: OK to allocate a uDMA driver in a static context.
unsafe impl<const CHANNELS: usize> Sync for Udma<CHANNELS> {}

impl<const CHANNELS: usize> Udma<CHANNELS> {
    /// Create the uDMA driver.
    ///
    /// Note that this can evaluate at compile time. Consider using this to
    /// expose a `Udma` through your higher-level API that you can use to
    /// allocate uDMA channels.
    ///
    /// `CHANNELS` specifies the total number of channels supported by the
    /// controller. It's referenced when allocating channels.
    ///
    /// # Safety
    ///
    /// Caller must make sure that `registers` is a pointer to the start of the
    /// uDMA register block, valid for your MCU.
    ///
    /// An incorrect `CHANNELS` value prevents proper bounds checking when
    /// allocating channels. This may result in channels that point to
    /// invalid registers.
    pub const unsafe fn new(registers: *const ()) -> Self {
        Self {
            registers: ral::Static(registers.cast()),
            handlers: interrupt::Handlers::new(),
        }
    }

    /// Enable the controller.
    pub fn enable(&self) {
        ral::write_reg!(crate::ral::udma, self.registers, CFG, MASTEN: 1);
        #[cfg(feature = "defmt")]
        defmt::debug!("uDMA controller enabled");
    }

    /// Disable the controller.
    pub fn disable(&self) {
        ral::write_reg!(crate::ral::udma, self.registers, CFG, MASTEN: 0);
        #[cfg(feature = "defmt")]
        defmt::debug!("uDMA controller disabled");
    }

    /// Returns `true` if the controller is enabled.
    pub fn is_enabled(&self) -> bool {
        ral::read_reg!(crate::ral::udma, self.registers, STAT, MASTEN == 1)
    }

    /// Tell the controller where to find the channel control table.
    ///
    /// Set the base before enabling any channel.
    pub fn set_control_table_base(&self, table: &'static ControlTable) {
        let base = ral::address(table as *const ControlTable);
        ral::write_reg!(crate::ral::udma, self.registers, CTLBASE, base);
        #[cfg(feature = "defmt")]
        defmt::debug!("uDMA control table at {=u32:#010x}", base);
    }

    /// Returns the address of the channel control table.
    pub fn control_table_base(&self) -> u32 {
        ral::read_reg!(crate::ral::udma, self.registers, CTLBASE)
    }

    /// Returns the address of the alternate control structures.
    ///
    /// This is the control table base, offset by
    /// [`ALTERNATE_OFFSET`](table::ALTERNATE_OFFSET).
    pub fn alternate_table_base(&self) -> u32 {
        ral::read_reg!(crate::ral::udma, self.registers, ALTBASE)
    }

    /// Returns `true` if the controller reported a bus error.
    pub fn is_error(&self) -> bool {
        ral::read_reg!(crate::ral::udma, self.registers, ERRCLR, ERRCLR == 1)
    }

    /// Clear a latched bus error.
    pub fn clear_error(&self) {
        ral::write_reg!(crate::ral::udma, self.registers, ERRCLR, ERRCLR: 1);
    }

    /// Check the controller's error status.
    ///
    /// Returns [`Error::Bus`] while a bus error is latched. This doesn't
    /// clear the error.
    pub fn error_status(&self) -> Result<()> {
        if self.is_error() {
            Err(Error::Bus)
        } else {
            Ok(())
        }
    }

    /// Register a handler for `interrupt`.
    ///
    /// Returns the handler that was previously registered, if any. This
    /// doesn't unmask the interrupt in the NVIC.
    pub fn register_handler(
        &self,
        interrupt: Interrupt,
        handler: &'static dyn Handler,
    ) -> Option<&'static dyn Handler> {
        #[cfg(feature = "defmt")]
        defmt::debug!("uDMA handler registered for {}", interrupt);
        self.handlers.register(interrupt, handler)
    }

    /// Remove the handler for `interrupt`, returning it.
    pub fn unregister_handler(&self, interrupt: Interrupt) -> Option<&'static dyn Handler> {
        self.handlers.unregister(interrupt)
    }

    /// Dispatch `interrupt` to its handler.
    ///
    /// Call this from the interrupt vector. The handler runs outside of a
    /// critical section. Returns `false` if no handler is registered.
    pub fn on_interrupt(&self, interrupt: Interrupt) -> bool {
        match self.handlers.get(interrupt) {
            Some(handler) => {
                handler.on_interrupt();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use crate::test_utils::Hardware;
    use crate::{ControlTable, Error, Interrupt};

    #[test]
    fn controller_enable() {
        let mut hw = Hardware::new();
        assert!(!hw.udma().is_enabled());
        hw.udma().enable();
        hw.settle();
        assert!(hw.udma().is_enabled());
        hw.udma().disable();
        hw.settle();
        assert!(!hw.udma().is_enabled());
    }

    #[test]
    fn control_table_base() {
        static TABLE: ControlTable = ControlTable::new();

        let mut hw = Hardware::new();
        hw.udma().set_control_table_base(&TABLE);
        hw.settle();

        let base = crate::ral::address(&TABLE as *const ControlTable);
        assert_eq!(hw.udma().control_table_base(), base);
        assert_eq!(hw.udma().alternate_table_base(), base.wrapping_add(0x200));
    }

    #[test]
    fn bus_error_status() {
        let mut hw = Hardware::new();
        assert_eq!(hw.udma().error_status(), Ok(()));

        hw.raise_bus_error();
        assert!(hw.udma().is_error());
        assert_eq!(hw.udma().error_status(), Err(Error::Bus));

        // Reading doesn't clear
        assert_eq!(hw.udma().error_status(), Err(Error::Bus));

        hw.udma().clear_error();
        hw.settle();
        assert!(!hw.udma().is_error());
        assert_eq!(hw.udma().error_status(), Ok(()));
    }

    static SOFTWARE: AtomicUsize = AtomicUsize::new(0);
    static ERRORS: AtomicUsize = AtomicUsize::new(0);

    fn on_software() {
        SOFTWARE.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error() {
        ERRORS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn interrupt_dispatch() {
        let hw = Hardware::new();
        let udma = hw.udma();
        assert!(!udma.on_interrupt(Interrupt::Software));

        assert!(udma.register_handler(Interrupt::Software, &on_software).is_none());
        assert!(udma.register_handler(Interrupt::Error, &on_error).is_none());

        assert!(udma.on_interrupt(Interrupt::Software));
        assert!(udma.on_interrupt(Interrupt::Software));
        assert!(udma.on_interrupt(Interrupt::Error));
        assert_eq!(SOFTWARE.load(Ordering::SeqCst), 2);
        assert_eq!(ERRORS.load(Ordering::SeqCst), 1);

        assert!(udma.unregister_handler(Interrupt::Error).is_some());
        assert!(!udma.on_interrupt(Interrupt::Error));
        assert_eq!(ERRORS.load(Ordering::SeqCst), 1);
    }
}
