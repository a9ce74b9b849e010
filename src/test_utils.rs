//! Testing utilities
//!
//! A simulated uDMA controller for host tests. The driver writes into a
//! heap-allocated register block, then the test calls
//! [`Hardware::settle`] to let the "hardware" react: set and clear
//! registers fold into the channel state, software requests are accepted,
//! and read-only status is refreshed.
//!
//! Only available when running `cargo test`.

#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use std::boxed::Box;

use crate::ral::udma::RegisterBlock;
use crate::table::{ALTERNATE_OFFSET, CHANNELS};
use crate::Udma;

/// Fills write-only registers between settles, so we can see driver writes.
const UNTOUCHED: u32 = 0xA5A5_A5A5;
/// Upper bits of `ERRCLR` while the driver hasn't written it.
const ERR_TAG: u32 = 0xA5A5_A5A4;

const USE_BURST: usize = 0;
const REQUEST_MASK: usize = 1;
const ENABLE: usize = 2;
const ALTERNATE: usize = 3;
const PRIORITY: usize = 4;

fn peek<R>(register: *mut R) -> u32 {
    // Safety: every register type is a transparent u32 cell in the live block.
    unsafe { core::ptr::read_volatile(register.cast::<u32>()) }
}

fn poke<R>(register: *mut R, value: u32) {
    // Safety: every register type is a transparent u32 cell in the live block.
    unsafe { core::ptr::write_volatile(register.cast::<u32>(), value) }
}

/// Address of one register in the simulated block.
macro_rules! reg {
    ($block:expr, $reg:ident) => {
        // Safety: the block stays allocated until the hardware drops.
        unsafe { core::ptr::addr_of_mut!((*$block).$reg) }
    };
}

/// A simulated uDMA controller.
pub struct Hardware {
    /// Owned, from `Box::into_raw`.
    block: *mut RegisterBlock,
    udma: Udma<CHANNELS>,
    /// Per-channel bits behind each set / clear register pair.
    channels: [u32; 5],
    master: bool,
    bus_error: bool,
    accepted: u32,
}

impl Hardware {
    /// Create a controller in its reset state.
    pub fn new() -> Self {
        // Safety: all-zero is the reset value of every register.
        let block: *mut RegisterBlock = Box::into_raw(Box::new(unsafe { core::mem::zeroed() }));
        let mut hw = Hardware {
            // Safety: the block outlives the driver, and never moves.
            udma: unsafe { Udma::new(block.cast_const().cast()) },
            block,
            channels: [0; 5],
            master: false,
            bus_error: false,
            accepted: 0,
        };
        hw.settle();
        hw
    }

    /// The driver under test.
    pub fn udma(&self) -> &Udma<CHANNELS> {
        &self.udma
    }

    /// Direct access to the register block.
    pub fn registers(&self) -> &RegisterBlock {
        // Safety: the block stays allocated until the hardware drops.
        unsafe { &*self.block }
    }

    /// React to everything the driver wrote since the last settle.
    pub fn settle(&mut self) {
        let block = self.block;
        // Safety: the block stays allocated until the hardware drops.
        let registers: &RegisterBlock = unsafe { &*block };

        let cfg = peek(reg!(block, CFG));
        if cfg != UNTOUCHED {
            self.master = cfg & 1 != 0;
        }
        poke(reg!(block, CFG), UNTOUCHED);
        poke(
            reg!(block, STAT),
            u32::from(self.master) | ((CHANNELS as u32 - 1) << 16),
        );

        poke(
            reg!(block, ALTBASE),
            registers.CTLBASE.read().wrapping_add(ALTERNATE_OFFSET as u32),
        );

        let pairs = [
            (USE_BURST, &registers.USEBURSTSET, reg!(block, USEBURSTCLR)),
            (REQUEST_MASK, &registers.REQMASKSET, reg!(block, REQMASKCLR)),
            (ENABLE, &registers.ENASET, reg!(block, ENACLR)),
            (ALTERNATE, &registers.ALTSET, reg!(block, ALTCLR)),
            (PRIORITY, &registers.PRIOSET, reg!(block, PRIOCLR)),
        ];
        for (state, set, clear) in pairs {
            let mut bits = self.channels[state] | set.read();
            let cleared = peek(clear);
            if cleared != UNTOUCHED {
                bits &= !cleared;
            }
            self.channels[state] = bits;
            set.write(bits);
            poke(clear, UNTOUCHED);
        }

        let requests = peek(reg!(block, SWREQ));
        if requests != UNTOUCHED {
            self.accepted |= requests & self.channels[ENABLE];
        }
        poke(reg!(block, SWREQ), UNTOUCHED);

        let errclr = registers.ERRCLR.read();
        if errclr & !1 != ERR_TAG && errclr & 1 != 0 {
            self.bus_error = false;
        }
        registers.ERRCLR.write(ERR_TAG | u32::from(self.bus_error));
    }

    /// Every channel that accepted a software request.
    pub fn accepted_requests(&self) -> u32 {
        self.accepted
    }

    /// Finish the transfer on `channel`, disabling it.
    pub fn complete(&mut self, channel: usize) {
        self.channels[ENABLE] &= !(1 << channel);
        self.registers().ENASET.write(self.channels[ENABLE]);
        self.settle();
    }

    /// Mark the channels in `mask` as waiting on a request.
    pub fn set_waiting(&mut self, mask: u32) {
        poke(reg!(self.block, WAITSTAT), mask);
    }

    /// Latch a bus error.
    pub fn raise_bus_error(&mut self) {
        self.bus_error = true;
        self.registers().ERRCLR.write(ERR_TAG | 1);
    }
}

impl Drop for Hardware {
    fn drop(&mut self) {
        // Safety: allocated by Box::into_raw in new, and freed only here.
        drop(unsafe { Box::from_raw(self.block) });
    }
}
