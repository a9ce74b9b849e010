//! Channel control table entry, as the uDMA sees it in memory.
//!
//! Unlike the controller registers, these "registers" live in RAM that
//! we allocate. The controller reads them when a channel is serviced, and
//! writes the control word back as the transfer progresses.

use super::RWRegister;

/// One channel control structure.
#[repr(C)]
pub struct RegisterBlock {
    /// Source end pointer
    pub SRCENDP: RWRegister<u32>,
    /// Destination end pointer
    pub DSTENDP: RWRegister<u32>,
    /// Control word
    pub CHCTL: RWRegister<u32>,
    /// Unused. Scatter-gather transfers copy it, but it's never interpreted.
    pub RESERVED: RWRegister<u32>,
}

const _: () = assert!(core::mem::size_of::<RegisterBlock>() == 16);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, CHCTL) == 0x8);

pub mod CHCTL {
    fields! {
        DSTINC @ 30 : 2,
        DSTSIZE @ 28 : 2,
        SRCINC @ 26 : 2,
        SRCSIZE @ 24 : 2,
        ARBSIZE @ 14 : 4,
        XFERSIZE @ 4 : 10,
        NXTUSEBURST @ 3 : 1,
        XFERMODE @ 0 : 3,
    }
}
