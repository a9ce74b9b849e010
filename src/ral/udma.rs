//! uDMA controller registers and fields

use super::{RORegister, RWRegister, WORegister};

/// uDMA registers.
///
/// The F28M35x places this block at `0x400F_F000` in the M3 memory map.
#[repr(C)]
pub struct RegisterBlock {
    /// DMA Status
    pub STAT: RORegister<u32>,
    /// DMA Configuration
    pub CFG: WORegister<u32>,
    /// DMA Channel Control Base Pointer
    pub CTLBASE: RWRegister<u32>,
    /// DMA Alternate Channel Control Base Pointer
    pub ALTBASE: RORegister<u32>,
    /// DMA Channel Wait-on-Request Status
    pub WAITSTAT: RORegister<u32>,
    /// DMA Channel Software Request
    pub SWREQ: WORegister<u32>,
    /// DMA Channel Useburst Set
    pub USEBURSTSET: RWRegister<u32>,
    /// DMA Channel Useburst Clear
    pub USEBURSTCLR: WORegister<u32>,
    /// DMA Channel Request Mask Set
    pub REQMASKSET: RWRegister<u32>,
    /// DMA Channel Request Mask Clear
    pub REQMASKCLR: WORegister<u32>,
    /// DMA Channel Enable Set
    pub ENASET: RWRegister<u32>,
    /// DMA Channel Enable Clear
    pub ENACLR: WORegister<u32>,
    /// DMA Channel Primary Alternate Set
    pub ALTSET: RWRegister<u32>,
    /// DMA Channel Primary Alternate Clear
    pub ALTCLR: WORegister<u32>,
    /// DMA Channel Priority Set
    pub PRIOSET: RWRegister<u32>,
    /// DMA Channel Priority Clear
    pub PRIOCLR: WORegister<u32>,
    _reserved0: [u32; 3],
    /// DMA Bus Error Clear
    pub ERRCLR: RWRegister<u32>,
    _reserved1: [u32; 304],
    /// DMA Channel Map Select, eight channels per register
    pub CHMAP: [RWRegister<u32>; 4],
}

const _: () = assert!(core::mem::offset_of!(RegisterBlock, PRIOCLR) == 0x3C);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, ERRCLR) == 0x4C);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, CHMAP) == 0x510);

pub mod STAT {
    fields! {
        MASTEN @ 0 : 1,
        STATE @ 4 : 4,
        DMACHANS @ 16 : 5,
    }
}

pub mod CFG {
    fields! {
        MASTEN @ 0 : 1,
    }
}

pub mod CTLBASE {
    fields! {
        ADDR @ 10 : 22,
    }
}

pub mod ERRCLR {
    fields! {
        ERRCLR @ 0 : 1,
    }
}

/// Width of one channel's selection in a `CHMAP` register.
pub const CHMAP_WIDTH: u32 = 4;
/// Channels described by one `CHMAP` register.
pub const CHMAP_CHANNELS: usize = 8;
