//! The channel control table.
//!
//! The table is a block of RAM, shared with the uDMA, holding one primary
//! and one alternate [control structure](crate::ControlTableEntry) for every
//! channel. Allocate it in a `static`, then hand it to the controller with
//! [`Udma::set_control_table_base`](crate::Udma::set_control_table_base).
//!
//! While a channel is enabled and transferring, the controller owns that
//! channel's structures. Only change a structure once its channel is
//! disabled, or once the transfer has completed.

use crate::descriptor::{
    ArbitrationSize, ControlTableEntry, ControlWord, Increment, ItemSize, Mode, ALT_SELECT,
    MAX_TRANSFER,
};
use crate::ral::{self, control};
use crate::{Error, Result};

/// Number of channels described by a control table.
pub const CHANNELS: usize = 32;

/// Byte offset of the alternate structures from the start of the table.
pub const ALTERNATE_OFFSET: usize = CHANNELS * core::mem::size_of::<control::RegisterBlock>();

/// The most tasks that one scatter-gather list may hold.
///
/// The primary structure copies four words per task, and a single structure
/// moves at most 1024 items.
pub const MAX_TASKS: usize = MAX_TRANSFER / 4;

/// Selects a channel's primary or alternate control structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Structure {
    /// The structure a channel starts from.
    Primary,
    /// Used by ping-pong and scatter-gather transfers.
    Alternate,
}

impl Structure {
    /// The structure's index in the table, given a channel.
    ///
    /// Matches the vendor convention of OR-ing `0x20` into the channel
    /// number for the alternate structure.
    pub const fn index(self, channel: usize) -> usize {
        match self {
            Structure::Primary => channel,
            Structure::Alternate => channel | CHANNELS,
        }
    }
}

/// The kind of scatter-gather transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScatterGather {
    /// Tasks run back to back, starting from a single request.
    Memory,
    /// Each task waits for a peripheral request.
    Peripheral,
}

impl ScatterGather {
    const fn mode(self) -> Mode {
        match self {
            ScatterGather::Memory => Mode::MemoryScatterGather,
            ScatterGather::Peripheral => Mode::PeripheralScatterGather,
        }
    }
}

/// Item and address settings of a control structure.
///
/// These are the settings that stay put between transfers. Use
/// [`ControlTable::set_control`] to apply them, then
/// [`ControlTable::set_transfer`] to describe each transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Control {
    /// Size of the source and destination items.
    pub item_size: ItemSize,
    pub source_increment: Increment,
    pub destination_increment: Increment,
    /// Items moved between arbitrations.
    pub arbitration_size: ArbitrationSize,
    /// Force bursts for the remainder of a peripheral scatter-gather
    /// transfer once the alternate structure completes.
    pub next_use_burst: bool,
}

/// The channel control table.
///
/// The controller requires the table to be 1024-byte aligned.
#[repr(C, align(1024))]
pub struct ControlTable {
    structures: [control::RegisterBlock; 2 * CHANNELS],
}

const _: () = assert!(core::mem::size_of::<ControlTable>() == 1024);
const _: () = assert!(core::mem::align_of::<ControlTable>() == 1024);
const _: () = assert!(ALTERNATE_OFFSET == 0x200);

// Safety: every access is a volatile load or store of a 32-bit word. The
// table is shared with the controller anyway.
unsafe impl Sync for ControlTable {}

impl Default for ControlTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlTable {
    /// Create a table with every structure stopped.
    pub const fn new() -> Self {
        // Safety: all fields are 32-bit registers. Zero is a stopped entry.
        unsafe { core::mem::zeroed() }
    }

    /// Returns a handle to the control structure of `channel`.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is greater than or equal to [`CHANNELS`].
    pub(crate) fn structure(&self, channel: usize, structure: Structure) -> &control::RegisterBlock {
        assert!(channel < CHANNELS);
        &self.structures[structure.index(channel)]
    }

    /// Write a complete entry.
    ///
    /// The control word is written last.
    pub fn load(&self, channel: usize, structure: Structure, entry: &ControlTableEntry) {
        let regs = self.structure(channel, structure);
        regs.SRCENDP.write(entry.source_end_address);
        regs.DSTENDP.write(entry.destination_end_address);
        regs.RESERVED.write(entry.reserved);
        regs.CHCTL.write(entry.control_word);
    }

    /// Take a snapshot of an entry.
    pub fn entry(&self, channel: usize, structure: Structure) -> ControlTableEntry {
        let regs = self.structure(channel, structure);
        ControlTableEntry {
            source_end_address: regs.SRCENDP.read(),
            destination_end_address: regs.DSTENDP.read(),
            control_word: regs.CHCTL.read(),
            reserved: regs.RESERVED.read(),
        }
    }

    /// Apply item and address settings to a control structure.
    ///
    /// The transfer count and mode are unchanged.
    pub fn set_control(&self, channel: usize, structure: Structure, control: Control) {
        let regs = self.structure(channel, structure);
        ral::modify_reg!(crate::ral::control, regs, CHCTL,
            DSTINC: control.destination_increment as u32,
            DSTSIZE: control.item_size as u32,
            SRCINC: control.source_increment as u32,
            SRCSIZE: control.item_size as u32,
            ARBSIZE: control.arbitration_size as u32,
            NXTUSEBURST: control.next_use_burst as u32
        );
    }

    /// Describe a transfer of `count` items.
    ///
    /// `count` is truncated to the 10-bit transfer size field. Zero items
    /// encodes as 1024.
    ///
    /// `source` and `destination` are start addresses. End addresses are
    /// computed from the increments already in the structure, so call
    /// [`set_control`](Self::set_control) first. The control word is
    /// written last; on an enabled channel, that write may start the
    /// transfer.
    ///
    /// When programming the alternate structure, scatter-gather modes get
    /// the alternate-select bit.
    pub fn set_transfer(
        &self,
        channel: usize,
        structure: Structure,
        mode: Mode,
        source: u32,
        destination: u32,
        count: u32,
    ) {
        let regs = self.structure(channel, structure);

        let mut mode_field = mode as u32;
        if structure == Structure::Alternate && mode.is_scatter_gather() {
            mode_field |= ALT_SELECT;
        }

        let current = ControlWord(regs.CHCTL.read());
        let control = (current.raw()
            & !(control::CHCTL::XFERSIZE::mask | control::CHCTL::XFERMODE::mask))
            | ((count.wrapping_sub(1) << control::CHCTL::XFERSIZE::offset)
                & control::CHCTL::XFERSIZE::mask)
            | mode_field;
        // End pointers follow the count that made it into the word.
        let count = ControlWord(control).transfer_count();

        regs.SRCENDP
            .write(current.source_increment().end_address(source, count));
        regs.DSTENDP
            .write(current.destination_increment().end_address(destination, count));
        regs.CHCTL.write(control);
    }

    /// Program `channel` for a scatter-gather transfer through `tasks`.
    ///
    /// The primary structure is set up to copy each task, in turn, into the
    /// alternate structure, which then runs it. Every task but the last
    /// should use a scatter-gather mode.
    ///
    /// This doesn't touch the channel's attributes. Make sure the channel
    /// starts from the primary structure.
    pub fn set_scatter_gather(
        &self,
        channel: usize,
        tasks: &'static [ControlTableEntry],
        kind: ScatterGather,
    ) -> Result<()> {
        let last = match tasks.last() {
            Some(last) => last,
            None => return Err(Error::EmptyTaskList),
        };
        if tasks.len() > MAX_TASKS {
            return Err(Error::TooManyTasks(tasks.len()));
        }

        let primary = self.structure(channel, Structure::Primary);
        let alternate = self.structure(channel, Structure::Alternate);

        let words = (tasks.len() * 4) as u32;
        primary.SRCENDP.write(ral::address(&last.reserved as *const u32));
        primary.DSTENDP.write(ral::address(&alternate.RESERVED as *const _));
        primary.CHCTL.write(
            Increment::Bits32.destination_bits()
                | Increment::Bits32.source_bits()
                | ItemSize::Bits32.bits()
                | ArbitrationSize::Items4.bits()
                | ((words - 1) << control::CHCTL::XFERSIZE::offset)
                | kind.mode() as u32,
        );
        Ok(())
    }

    /// Returns the number of items remaining in a structure's transfer.
    ///
    /// A stopped structure reports zero.
    pub fn transfer_size(&self, channel: usize, structure: Structure) -> u32 {
        let regs = self.structure(channel, structure);
        let (size, mode) = ral::read_reg!(crate::ral::control, regs, CHCTL, XFERSIZE, XFERMODE);
        if size == 0 && mode == 0 {
            0
        } else {
            size + 1
        }
    }

    /// Returns a structure's transfer mode.
    ///
    /// The hardware sets the mode to [`Mode::Stop`] once a transfer
    /// completes.
    pub fn mode(&self, channel: usize, structure: Structure) -> Mode {
        let regs = self.structure(channel, structure);
        Mode::from_bits(ral::read_reg!(crate::ral::control, regs, CHCTL, XFERMODE))
    }
}
