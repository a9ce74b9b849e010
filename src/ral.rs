//! A RAL-like module to support uDMA register access
//!
//! There's no RAL for the F28M35x Cortex-M3 subsystem that we can lean on.
//! This module describes the uDMA controller registers, and the channel
//! control table entries, in the shape the `ral-registers` macros expect:
//! a `#[repr(C)]` register block, plus one module per register holding
//! one module per field.

#![allow(
    non_snake_case, // Compatibility with RAL
    non_upper_case_globals, // Field `offset` and `mask` constants
    dead_code, // Not every field is used
)]

pub use ral_registers::{modify_reg, read_reg, write_reg};
pub(crate) use ral_registers::{RORegister, RWRegister, WORegister};

/// Declares field modules for a 32-bit register.
///
/// Resolves by textual scope, so the register modules are declared below.
///
/// Each field gets the `offset` and `mask` constants, and the empty
/// `R` / `W` / `RW` modules, that the RAL macros import.
macro_rules! fields {
    ($($field:ident @ $offset:literal : $width:literal),+ $(,)?) => {
        $(
            pub mod $field {
                pub const offset: u32 = $offset;
                pub const mask: u32 = (u32::MAX >> (32 - $width)) << offset;
                pub mod R {}
                pub mod W {}
                pub mod RW {}
            }
        )+
    };
}

pub mod control;
pub mod udma;

//
// Helper types for static memory
//
// Similar to the RAL's `Instance` type, but more copy.
//

pub(crate) struct Static<T>(pub(crate) *const T);
impl<T> core::ops::Deref for Static<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        // Safety: pointer points to static memory (peripheral memory)
        unsafe { &*self.0 }
    }
}
impl<T> Clone for Static<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Static<T> {}

/// Convert a pointer into the 32-bit address the controller understands.
///
/// The uDMA lives on a 32-bit bus. Addresses are truncated on wider hosts,
/// which only matters for host-side tests.
#[inline]
pub(crate) fn address<T: ?Sized>(ptr: *const T) -> u32 {
    ptr.cast::<u8>() as usize as u32
}
