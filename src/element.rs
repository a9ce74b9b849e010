//! DMA elements

use crate::descriptor::{Increment, ItemSize};

mod private {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// An ELEMENT that can be moved by the uDMA
///
/// This trait is sealed. The controller supports 8-, 16- and 32-bit items.
pub trait Element: Sized + Copy + private::Sealed {
    /// The item size matching this element.
    const ITEM_SIZE: ItemSize;
    /// The address increment for a buffer of these elements.
    const INCREMENT: Increment;
}

impl Element for u8 {
    const ITEM_SIZE: ItemSize = ItemSize::Bits8;
    const INCREMENT: Increment = Increment::Bits8;
}

impl Element for u16 {
    const ITEM_SIZE: ItemSize = ItemSize::Bits16;
    const INCREMENT: Increment = Increment::Bits16;
}

impl Element for u32 {
    const ITEM_SIZE: ItemSize = ItemSize::Bits32;
    const INCREMENT: Increment = Increment::Bits32;
}
