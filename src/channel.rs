//! uDMA channels
//!
//! A [`Channel`] controls one channel's enable, attributes, software
//! requests and peripheral mapping. The transfer itself lives in the
//! channel's [control table](crate::ControlTable) structures.
//!
//! ```no_run
//! use f28m35x_udma::{
//!     channel::Attributes, ArbitrationSize, ControlTable, ControlTableEntry, Mode, Structure, Udma,
//! };
//!
//! static UDMA: Udma<32> = unsafe { Udma::new(0x400F_F000 as *const ()) };
//! static TABLE: ControlTable = ControlTable::new();
//! static SOURCE: [u32; 64] = [0; 64];
//! static mut DESTINATION: [u32; 64] = [0; 64];
//!
//! UDMA.enable();
//! UDMA.set_control_table_base(&TABLE);
//!
//! // Safety: we only allocate one channel 30 object.
//! let channel = unsafe { UDMA.channel(30) };
//! channel.clear_attributes(Attributes::all());
//!
//! let task = ControlTableEntry::copy(
//!     &SOURCE,
//!     unsafe { &mut *core::ptr::addr_of_mut!(DESTINATION) },
//!     ArbitrationSize::Items8,
//!     Mode::Auto,
//! )
//! .unwrap();
//! TABLE.load(channel.channel(), Structure::Primary, &task);
//!
//! // Safety: the entry describes static buffers.
//! unsafe { channel.enable() };
//! channel.request();
//!
//! while channel.is_enabled() {}
//! ```

use crate::ral::{udma, RWRegister, Static, WORegister};

impl<const CHANNELS: usize> crate::Udma<CHANNELS> {
    /// Creates the DMA channel described by `index`.
    ///
    /// # Safety
    ///
    /// This will create a handle that may alias global, mutable state. You should only create
    /// one channel per index. If there are multiple channels for the same index, you're
    /// responsible for ensuring synchronized access.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than or equal to the maximum number of channels.
    pub unsafe fn channel(&self, index: usize) -> Channel {
        assert!(index < CHANNELS);
        Channel {
            index,
            registers: self.registers,
        }
    }
}

/// A uDMA channel
///
/// You should rely on your HAL to allocate `Channel`s. If your HAL does not allocate channels,
/// or if you're designing the HAL, use [`Udma`](crate::Udma) to create channels.
pub struct Channel {
    /// Our channel number, expected to be between [0, 32)
    index: usize,
    /// Reference to the uDMA registers
    registers: Static<udma::RegisterBlock>,
}

bitflags::bitflags! {
    /// Channel attributes.
    ///
    /// A set of independent per-channel flags. Combine them with `|`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attributes: u32 {
        /// Only respond to burst requests from the peripheral.
        const USE_BURST = 1 << 0;
        /// Run the alternate control structure.
        const ALT_SELECT = 1 << 1;
        /// High priority arbitration.
        const HIGH_PRIORITY = 1 << 2;
        /// Ignore peripheral requests.
        const REQUEST_MASK = 1 << 3;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Attributes {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Attributes({=u32:#x})", self.bits())
    }
}

/// Which peripheral drives a channel's requests.
///
/// Most channels are shared by up to three peripherals. See
/// [`assignment`](crate::assignment) for the peripheral behind each
/// channel and mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Mapping {
    /// The channel's default peripheral.
    Default = 0,
    /// The secondary peripheral.
    Secondary = 1,
    /// The third peripheral.
    Tertiary = 2,
}

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "arm", target_os = "none"))] {
        /// Make descriptor writes visible before the controller can act on them.
        #[inline(always)]
        fn handoff() {
            cortex_m::asm::dmb();
        }
    } else {
        #[inline(always)]
        fn handoff() {
            core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
        }
    }
}

/// The set and clear registers behind each attribute.
fn attribute_registers(
    registers: &udma::RegisterBlock,
) -> [(
    Attributes,
    &RWRegister<u32>,
    &WORegister<u32>,
); 4] {
    [
        (Attributes::USE_BURST, &registers.USEBURSTSET, &registers.USEBURSTCLR),
        (Attributes::ALT_SELECT, &registers.ALTSET, &registers.ALTCLR),
        (Attributes::HIGH_PRIORITY, &registers.PRIOSET, &registers.PRIOCLR),
        (Attributes::REQUEST_MASK, &registers.REQMASKSET, &registers.REQMASKCLR),
    ]
}

impl Channel {
    /// Returns the channel number.
    pub fn channel(&self) -> usize {
        self.index
    }

    fn mask(&self) -> u32 {
        1 << self.index
    }

    /// Enable the channel.
    ///
    /// A peripheral, or [`request`](Self::request), may now start a transfer.
    /// Enabling an enabled channel has no effect.
    ///
    /// # Safety
    ///
    /// The controller will run whatever the channel's control structures
    /// describe. Make sure that the control table base is set, that the
    /// structures are valid, and that the memory they address outlives the
    /// transfer.
    pub unsafe fn enable(&self) {
        handoff();
        // Immutable write OK. No other methods directly modify ENASET.
        self.registers.ENASET.write(self.mask());
        #[cfg(feature = "defmt")]
        defmt::trace!("uDMA channel {=usize} enabled", self.index);
    }

    /// Disable the channel.
    ///
    /// The hardware also disables the channel once its transfer completes.
    /// Disabling a disabled channel has no effect.
    pub fn disable(&self) {
        self.registers.ENACLR.write(self.mask());
    }

    /// Returns `true` if the channel is enabled.
    ///
    /// After a transfer completes, this reads `false`.
    pub fn is_enabled(&self) -> bool {
        self.registers.ENASET.read() & self.mask() != 0
    }

    /// Set the attributes in `attributes`. Others are unchanged.
    pub fn set_attributes(&self, attributes: Attributes) {
        for (attribute, set, _) in attribute_registers(&self.registers) {
            if attributes.contains(attribute) {
                set.write(self.mask());
            }
        }
    }

    /// Clear the attributes in `attributes`. Others are unchanged.
    pub fn clear_attributes(&self, attributes: Attributes) {
        for (attribute, _, clear) in attribute_registers(&self.registers) {
            if attributes.contains(attribute) {
                clear.write(self.mask());
            }
        }
    }

    /// Returns the channel's attributes.
    pub fn attributes(&self) -> Attributes {
        let mut attributes = Attributes::empty();
        for (attribute, set, _) in attribute_registers(&self.registers) {
            if set.read() & self.mask() != 0 {
                attributes |= attribute;
            }
        }
        attributes
    }

    /// Issue a software request.
    ///
    /// For software channels, or memory-to-memory transfers. The hardware
    /// ignores the request if the channel is disabled.
    pub fn request(&self) {
        handoff();
        self.registers.SWREQ.write(self.mask());
    }

    /// Returns `true` if the channel's peripheral supports single
    /// requests, and a request is outstanding.
    pub fn is_waiting_on_request(&self) -> bool {
        self.registers.WAITSTAT.read() & self.mask() != 0
    }

    /// Select the peripheral that drives this channel.
    ///
    /// Only change the mapping while the channel is disabled.
    pub fn set_mapping(&self, mapping: Mapping) {
        let chmap = &self.registers.CHMAP[self.index / udma::CHMAP_CHANNELS];
        let shift = (self.index % udma::CHMAP_CHANNELS) as u32 * udma::CHMAP_WIDTH;
        let mask = ((1 << udma::CHMAP_WIDTH) - 1) << shift;
        // Eight channels share a CHMAP register.
        critical_section::with(|_| {
            chmap.write((chmap.read() & !mask) | ((mapping as u32) << shift));
        });
    }

    /// Returns the peripheral mapping.
    ///
    /// Returns `None` if the register holds a reserved selection.
    pub fn mapping(&self) -> Option<Mapping> {
        let chmap = &self.registers.CHMAP[self.index / udma::CHMAP_CHANNELS];
        let shift = (self.index % udma::CHMAP_CHANNELS) as u32 * udma::CHMAP_WIDTH;
        match (chmap.read() >> shift) & ((1 << udma::CHMAP_WIDTH) - 1) {
            0 => Some(Mapping::Default),
            1 => Some(Mapping::Secondary),
            2 => Some(Mapping::Tertiary),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{Attributes, Mapping};
    use crate::test_utils::Hardware;

    #[test]
    fn enable_disable() {
        let mut hw = Hardware::new();
        let channel = unsafe { hw.udma().channel(12) };
        let neighbour = unsafe { hw.udma().channel(13) };

        assert!(!channel.is_enabled());
        unsafe { channel.enable() };
        hw.settle();
        assert!(channel.is_enabled());
        assert!(!neighbour.is_enabled());

        // Idempotent
        unsafe { channel.enable() };
        hw.settle();
        assert!(channel.is_enabled());

        unsafe { neighbour.enable() };
        hw.settle();
        assert!(channel.is_enabled());
        assert!(neighbour.is_enabled());

        channel.disable();
        hw.settle();
        assert!(!channel.is_enabled());
        assert!(neighbour.is_enabled());

        channel.disable();
        hw.settle();
        assert!(!channel.is_enabled());
    }

    #[test]
    fn attributes_are_independent() {
        let mut hw = Hardware::new();
        let channel = unsafe { hw.udma().channel(5) };
        let other = unsafe { hw.udma().channel(6) };

        channel.set_attributes(Attributes::USE_BURST | Attributes::HIGH_PRIORITY);
        hw.settle();
        assert_eq!(
            channel.attributes(),
            Attributes::USE_BURST | Attributes::HIGH_PRIORITY
        );

        channel.set_attributes(Attributes::REQUEST_MASK);
        hw.settle();
        channel.clear_attributes(Attributes::USE_BURST);
        hw.settle();
        assert_eq!(
            channel.attributes(),
            Attributes::HIGH_PRIORITY | Attributes::REQUEST_MASK
        );
        assert!(other.attributes().is_empty());

        other.set_attributes(Attributes::all());
        hw.settle();
        channel.clear_attributes(Attributes::all());
        hw.settle();
        assert!(channel.attributes().is_empty());
        assert_eq!(other.attributes(), Attributes::all());
    }

    #[test]
    fn attribute_set_operations() {
        let set = Attributes::ALT_SELECT | Attributes::REQUEST_MASK;
        assert!(set.contains(Attributes::ALT_SELECT));
        assert!(!set.contains(Attributes::USE_BURST));
        assert_eq!(!set, Attributes::USE_BURST | Attributes::HIGH_PRIORITY);
        assert_eq!(set & Attributes::REQUEST_MASK, Attributes::REQUEST_MASK);
        assert_eq!(Attributes::from_bits_truncate(0xFF), Attributes::all());
        assert!(Attributes::empty().is_empty());
    }

    #[test]
    fn software_request_needs_enabled_channel() {
        let mut hw = Hardware::new();
        let channel = unsafe { hw.udma().channel(30) };

        channel.request();
        hw.settle();
        assert_eq!(hw.accepted_requests(), 0);

        unsafe { channel.enable() };
        hw.settle();
        channel.request();
        hw.settle();
        assert_eq!(hw.accepted_requests(), 1 << 30);

        hw.complete(30);
        assert!(!channel.is_enabled());
    }

    #[test]
    fn waiting_on_request() {
        let mut hw = Hardware::new();
        let channel = unsafe { hw.udma().channel(8) };
        assert!(!channel.is_waiting_on_request());
        hw.set_waiting(1 << 8);
        assert!(channel.is_waiting_on_request());
    }

    #[test]
    fn mapping() {
        let hw = Hardware::new();
        let twelve = unsafe { hw.udma().channel(12) };
        let thirteen = unsafe { hw.udma().channel(13) };
        let twenty = unsafe { hw.udma().channel(20) };

        assert_eq!(twelve.mapping(), Some(Mapping::Default));
        twelve.set_mapping(Mapping::Tertiary);
        thirteen.set_mapping(Mapping::Secondary);
        twenty.set_mapping(Mapping::Secondary);

        assert_eq!(twelve.mapping(), Some(Mapping::Tertiary));
        assert_eq!(thirteen.mapping(), Some(Mapping::Secondary));
        assert_eq!(twenty.mapping(), Some(Mapping::Secondary));
        // Same bits as the vendor's CHAN12_THRD_SSI2RX | CHAN13_SEC_UART2TX
        assert_eq!(hw.registers().CHMAP[1].read(), 0x0002_0000 | 0x0010_0000);
        assert_eq!(hw.registers().CHMAP[2].read(), 0x0001_0000);

        twelve.set_mapping(Mapping::Default);
        assert_eq!(twelve.mapping(), Some(Mapping::Default));
        assert_eq!(thirteen.mapping(), Some(Mapping::Secondary));
    }

    #[test]
    fn mapping_from_many_contexts() {
        let hw = Hardware::new();
        let udma = hw.udma();

        // Channels 8 through 15 share CHMAP[1].
        std::thread::scope(|scope| {
            for index in 8..16 {
                scope.spawn(move || {
                    let channel = unsafe { udma.channel(index) };
                    for round in 0..1000 {
                        if round % 2 == 0 {
                            channel.set_mapping(Mapping::Tertiary);
                        } else {
                            channel.set_mapping(Mapping::Secondary);
                        }
                    }
                });
            }
        });

        for index in 8..16 {
            let channel = unsafe { udma.channel(index) };
            assert_eq!(channel.mapping(), Some(Mapping::Secondary));
        }
        assert_eq!(hw.registers().CHMAP[1].read(), 0x1111_1111);
    }

    #[test]
    fn reserved_mapping() {
        let hw = Hardware::new();
        hw.registers().CHMAP[0].write(0xF);
        let channel = unsafe { hw.udma().channel(0) };
        assert_eq!(channel.mapping(), None);
    }

    #[test]
    #[should_panic]
    fn channel_out_of_range() {
        let hw = Hardware::new();
        let _ = unsafe { hw.udma().channel(32) };
    }
}
