//! Channel control table entries, and the encoding of their control words.
//!
//! A [`ControlTableEntry`] is the 16-byte descriptor the uDMA reads to run
//! one transfer task. Build entries with [`build_task_entry`], or with the
//! typed helpers on `ControlTableEntry`. Since `build_task_entry` is a
//! `const fn`, scatter-gather task lists can live in a `static`:
//!
//! ```
//! use f28m35x_udma::{build_task_entry, ArbitrationSize, ControlTableEntry, Increment, ItemSize, Mode};
//!
//! # const SOURCE: u32 = 0x2000_0000;
//! # const DESTINATION: u32 = 0x2000_1000;
//! static TASKS: [ControlTableEntry; 2] = [
//!     build_task_entry(
//!         64, ItemSize::Bits32,
//!         Increment::Bits32, SOURCE,
//!         Increment::Bits32, DESTINATION,
//!         ArbitrationSize::Items8, Mode::MemoryScatterGather,
//!     ),
//!     build_task_entry(
//!         16, ItemSize::Bits8,
//!         Increment::Bits8, SOURCE + 256,
//!         Increment::Bits8, DESTINATION + 256,
//!         ArbitrationSize::Items4, Mode::Auto,
//!     ),
//! ];
//! assert!(TASKS[0].control().is_alternate_select());
//! assert!(!TASKS[1].control().is_alternate_select());
//! ```
//!
//! Nothing here validates its inputs. The hardware doesn't either. A count
//! outside of 1..=1024, or an increment smaller than the item size, yields
//! a descriptor that encodes fine but transfers garbage.

use crate::element::Element;
use crate::ral::{self, control::CHCTL};
use crate::{Error, Result};

/// The most items a single control structure moves.
pub const MAX_TRANSFER: usize = 1024;

/// Checks a buffer length against the XFERSIZE field.
fn transfer_count(len: usize) -> Result<u32> {
    if (1..=MAX_TRANSFER).contains(&len) {
        Ok(len as u32)
    } else {
        Err(Error::TransferLength(len))
    }
}

/// The size of a single item moved by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum ItemSize {
    /// 8-bit items
    Bits8 = 0,
    /// 16-bit items
    Bits16 = 1,
    /// 32-bit items
    Bits32 = 2,
}

impl ItemSize {
    /// The size's bits in a control word.
    ///
    /// The same size is used for both the source and destination.
    pub const fn bits(self) -> u32 {
        let raw = self as u32;
        (raw << CHCTL::DSTSIZE::offset) | (raw << CHCTL::SRCSIZE::offset)
    }

    const fn from_raw(raw: u32) -> Self {
        match raw & 0b11 {
            0 => ItemSize::Bits8,
            1 => ItemSize::Bits16,
            _ => ItemSize::Bits32,
        }
    }
}

/// How far an address advances after each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Increment {
    /// Advance by one byte
    Bits8 = 0,
    /// Advance by two bytes
    Bits16 = 1,
    /// Advance by four bytes
    Bits32 = 2,
    /// Don't advance. Use this for peripheral data registers.
    None = 3,
}

impl Increment {
    /// The increment's bits in the source field of a control word.
    pub const fn source_bits(self) -> u32 {
        (self as u32) << CHCTL::SRCINC::offset
    }

    /// The increment's bits in the destination field of a control word.
    pub const fn destination_bits(self) -> u32 {
        (self as u32) << CHCTL::DSTINC::offset
    }

    const fn from_raw(raw: u32) -> Self {
        match raw & 0b11 {
            0 => Increment::Bits8,
            1 => Increment::Bits16,
            2 => Increment::Bits32,
            _ => Increment::None,
        }
    }

    /// Compute the address of the last byte touched by `count` items
    /// starting at `start`.
    ///
    /// The controller wants end pointers, not start pointers. A fixed
    /// address is its own end.
    pub const fn end_address(self, start: u32, count: u32) -> u32 {
        match self {
            Increment::None => start,
            _ => start.wrapping_add((count << self as u32).wrapping_sub(1)),
        }
    }
}

/// The number of items moved before the controller re-arbitrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum ArbitrationSize {
    /// Re-arbitrate after 1 item
    Items1 = 0,
    /// Re-arbitrate after 2 items
    Items2 = 1,
    /// Re-arbitrate after 4 items
    Items4 = 2,
    /// Re-arbitrate after 8 items
    Items8 = 3,
    /// Re-arbitrate after 16 items
    Items16 = 4,
    /// Re-arbitrate after 32 items
    Items32 = 5,
    /// Re-arbitrate after 64 items
    Items64 = 6,
    /// Re-arbitrate after 128 items
    Items128 = 7,
    /// Re-arbitrate after 256 items
    Items256 = 8,
    /// Re-arbitrate after 512 items
    Items512 = 9,
    /// Re-arbitrate after 1024 items
    Items1024 = 10,
}

impl ArbitrationSize {
    const ALL: [ArbitrationSize; 11] = [
        ArbitrationSize::Items1,
        ArbitrationSize::Items2,
        ArbitrationSize::Items4,
        ArbitrationSize::Items8,
        ArbitrationSize::Items16,
        ArbitrationSize::Items32,
        ArbitrationSize::Items64,
        ArbitrationSize::Items128,
        ArbitrationSize::Items256,
        ArbitrationSize::Items512,
        ArbitrationSize::Items1024,
    ];

    /// Select the arbitration size for a burst of `items`.
    ///
    /// Returns `None` if `items` isn't a power of two between 1 and 1024.
    pub const fn from_items(items: u32) -> Option<Self> {
        if items.is_power_of_two() && items <= 1024 {
            Some(Self::ALL[items.trailing_zeros() as usize])
        } else {
            None
        }
    }

    /// The number of items in a burst.
    pub const fn items(self) -> u32 {
        1 << self as u32
    }

    /// The arbitration size's bits in a control word.
    pub const fn bits(self) -> u32 {
        (self as u32) << CHCTL::ARBSIZE::offset
    }

    const fn from_raw(raw: u32) -> Self {
        if raw < Self::ALL.len() as u32 {
            Self::ALL[raw as usize]
        } else {
            ArbitrationSize::Items1024
        }
    }
}

/// A transfer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Mode {
    /// The structure is idle. The controller writes this once a transfer
    /// completes.
    Stop = 0,
    /// Transfer on request, stopping if the request goes away.
    Basic = 1,
    /// A single request runs the transfer to completion.
    Auto = 2,
    /// Alternate between the primary and alternate structures.
    PingPong = 3,
    /// Memory scatter-gather: the primary structure loads tasks into the
    /// alternate structure.
    MemoryScatterGather = 4,
    /// Peripheral scatter-gather.
    PeripheralScatterGather = 6,
}

/// Set in the mode field of a scatter-gather task, so that the controller
/// runs the task from the alternate structure.
pub const ALT_SELECT: u32 = 1;

impl Mode {
    /// Returns `true` for the two scatter-gather modes.
    pub const fn is_scatter_gather(self) -> bool {
        matches!(self, Mode::MemoryScatterGather | Mode::PeripheralScatterGather)
    }

    /// Decode a raw mode field.
    ///
    /// The alternate-select bit of the scatter-gather modes is ignored.
    pub const fn from_bits(raw: u32) -> Self {
        match raw & CHCTL::XFERMODE::mask {
            0 => Mode::Stop,
            1 => Mode::Basic,
            2 => Mode::Auto,
            3 => Mode::PingPong,
            4 | 5 => Mode::MemoryScatterGather,
            _ => Mode::PeripheralScatterGather,
        }
    }
}

/// A packed control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct ControlWord(pub u32);

impl ControlWord {
    /// The raw word.
    pub const fn raw(self) -> u32 {
        self.0
    }

    const fn field(self, offset: u32, mask: u32) -> u32 {
        (self.0 & mask) >> offset
    }

    /// The number of items to transfer.
    ///
    /// The word stores one less than this value.
    pub const fn transfer_count(self) -> u32 {
        self.field(CHCTL::XFERSIZE::offset, CHCTL::XFERSIZE::mask) + 1
    }

    /// The transfer mode, without the alternate-select bit.
    pub const fn mode(self) -> Mode {
        Mode::from_bits(self.0)
    }

    /// Returns `true` if this is a scatter-gather task with the
    /// alternate-select bit set.
    ///
    /// The bit shares its position with the low bit of the basic and
    /// ping-pong modes, so it's only reported for scatter-gather modes.
    pub const fn is_alternate_select(self) -> bool {
        let mode = self.0 & CHCTL::XFERMODE::mask;
        mode & ALT_SELECT != 0 && Mode::from_bits(mode).is_scatter_gather()
    }

    /// Returns `true` if the next-use-burst bit is set.
    pub const fn is_next_use_burst(self) -> bool {
        self.field(CHCTL::NXTUSEBURST::offset, CHCTL::NXTUSEBURST::mask) != 0
    }

    /// The source item size. The destination size is expected to match.
    pub const fn item_size(self) -> ItemSize {
        ItemSize::from_raw(self.field(CHCTL::SRCSIZE::offset, CHCTL::SRCSIZE::mask))
    }

    /// How the source address advances.
    pub const fn source_increment(self) -> Increment {
        Increment::from_raw(self.field(CHCTL::SRCINC::offset, CHCTL::SRCINC::mask))
    }

    /// How the destination address advances.
    pub const fn destination_increment(self) -> Increment {
        Increment::from_raw(self.field(CHCTL::DSTINC::offset, CHCTL::DSTINC::mask))
    }

    /// Items moved before the controller re-arbitrates.
    pub const fn arbitration_size(self) -> ArbitrationSize {
        ArbitrationSize::from_raw(self.field(CHCTL::ARBSIZE::offset, CHCTL::ARBSIZE::mask))
    }
}

/// An entry in the channel control table.
///
/// The layout matches what the controller expects in memory. Addresses are
/// plain bus addresses; the controller owns what they point at while a
/// transfer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct ControlTableEntry {
    /// Address of the last source byte.
    pub source_end_address: u32,
    /// Address of the last destination byte.
    pub destination_end_address: u32,
    /// The packed control word.
    pub control_word: u32,
    /// Unused. Always zero.
    pub reserved: u32,
}

const _: () = assert!(core::mem::size_of::<ControlTableEntry>() == 16);
const _: () = assert!(core::mem::offset_of!(ControlTableEntry, source_end_address) == 0x0);
const _: () = assert!(core::mem::offset_of!(ControlTableEntry, destination_end_address) == 0x4);
const _: () = assert!(core::mem::offset_of!(ControlTableEntry, control_word) == 0x8);
const _: () = assert!(core::mem::offset_of!(ControlTableEntry, reserved) == 0xC);

impl ControlTableEntry {
    /// An idle entry.
    pub const STOPPED: Self = ControlTableEntry {
        source_end_address: 0,
        destination_end_address: 0,
        control_word: 0,
        reserved: 0,
    };

    /// The entry's control word.
    pub const fn control(&self) -> ControlWord {
        ControlWord(self.control_word)
    }

    /// Describe a memory-to-memory copy of `E` elements.
    ///
    /// Transfers as many elements as fit in the shorter buffer. Returns
    /// [`Error::TransferLength`] unless that's between 1 and
    /// [`MAX_TRANSFER`] elements.
    pub fn copy<E: Element>(
        source: &[E],
        destination: &mut [E],
        arbitration_size: ArbitrationSize,
        mode: Mode,
    ) -> Result<Self> {
        let count = transfer_count(source.len().min(destination.len()))?;
        Ok(build_task_entry(
            count,
            E::ITEM_SIZE,
            E::INCREMENT,
            ral::address(source.as_ptr()),
            E::INCREMENT,
            ral::address(destination.as_ptr()),
            arbitration_size,
            mode,
        ))
    }

    /// Describe a transfer from `source` into a peripheral data register.
    ///
    /// Fails like [`copy`](Self::copy) if `source` is empty or too long.
    pub fn write<E: Element>(
        source: &[E],
        register: *const E,
        arbitration_size: ArbitrationSize,
        mode: Mode,
    ) -> Result<Self> {
        Ok(build_task_entry(
            transfer_count(source.len())?,
            E::ITEM_SIZE,
            E::INCREMENT,
            ral::address(source.as_ptr()),
            Increment::None,
            ral::address(register),
            arbitration_size,
            mode,
        ))
    }

    /// Describe a transfer from a peripheral data register into
    /// `destination`.
    pub fn read<E: Element>(
        register: *const E,
        destination: &mut [E],
        arbitration_size: ArbitrationSize,
        mode: Mode,
    ) -> Result<Self> {
        Ok(build_task_entry(
            transfer_count(destination.len())?,
            E::ITEM_SIZE,
            Increment::None,
            ral::address(register),
            E::INCREMENT,
            ral::address(destination.as_ptr()),
            arbitration_size,
            mode,
        ))
    }
}

/// Build one channel control table entry.
///
/// `count` is the number of items, 1 through 1024. `source` and
/// `destination` are start addresses; the entry stores end addresses.
/// Scatter-gather modes get the alternate-select bit, since every task in
/// a list runs from the alternate structure. The last task in a list should
/// use [`Mode::Basic`] or [`Mode::Auto`].
///
/// No inputs are checked.
#[allow(clippy::too_many_arguments)]
pub const fn build_task_entry(
    count: u32,
    item_size: ItemSize,
    source_increment: Increment,
    source: u32,
    destination_increment: Increment,
    destination: u32,
    arbitration_size: ArbitrationSize,
    mode: Mode,
) -> ControlTableEntry {
    let mut mode_field = mode as u32;
    if mode.is_scatter_gather() {
        mode_field |= ALT_SELECT;
    }
    ControlTableEntry {
        source_end_address: source_increment.end_address(source, count),
        destination_end_address: destination_increment.end_address(destination, count),
        control_word: source_increment.source_bits()
            | destination_increment.destination_bits()
            | item_size.bits()
            | arbitration_size.bits()
            | (count.wrapping_sub(1) << CHCTL::XFERSIZE::offset)
            | mode_field,
        reserved: 0,
    }
}
