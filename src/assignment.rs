//! Peripheral channel assignments.
//!
//! Each channel serves up to three peripherals. The module that names a
//! peripheral tells you which [`Mapping`](crate::channel::Mapping) selects
//! it. Channels marked `SW_*` have no peripheral and run on software
//! requests.

/// Channels under [`Mapping::Default`](crate::channel::Mapping::Default).
pub mod default {
    /// USB endpoint 1 receive
    pub const USB_EP1_RX: usize = 0;
    /// USB endpoint 1 transmit
    pub const USB_EP1_TX: usize = 1;
    /// USB endpoint 2 receive
    pub const USB_EP2_RX: usize = 2;
    /// USB endpoint 2 transmit
    pub const USB_EP2_TX: usize = 3;
    /// USB endpoint 3 receive
    pub const USB_EP3_RX: usize = 4;
    /// USB endpoint 3 transmit
    pub const USB_EP3_TX: usize = 5;
    /// Ethernet receive
    pub const ETH0_RX: usize = 6;
    /// Ethernet transmit
    pub const ETH0_TX: usize = 7;
    /// UART0 receive
    pub const UART0_RX: usize = 8;
    /// UART0 transmit
    pub const UART0_TX: usize = 9;
    /// SSI0 receive
    pub const SSI0_RX: usize = 10;
    /// SSI0 transmit
    pub const SSI0_TX: usize = 11;
    /// Software channel
    pub const SW_12: usize = 12;
    /// Software channel
    pub const SW_13: usize = 13;
    /// Timer 0A
    pub const TIMER0_A: usize = 18;
    /// Timer 0B
    pub const TIMER0_B: usize = 19;
    /// Timer 1A
    pub const TIMER1_A: usize = 20;
    /// Timer 1B
    pub const TIMER1_B: usize = 21;
    /// UART1 receive
    pub const UART1_RX: usize = 22;
    /// UART1 transmit
    pub const UART1_TX: usize = 23;
    /// SSI1 receive
    pub const SSI1_RX: usize = 24;
    /// SSI1 transmit
    pub const SSI1_TX: usize = 25;
    /// Software channel
    pub const SW_26: usize = 26;
    /// Software channel
    pub const SW_27: usize = 27;
    /// Software channel
    pub const SW_30: usize = 30;
}

/// Channels under [`Mapping::Secondary`](crate::channel::Mapping::Secondary).
pub mod secondary {
    /// UART2 receive
    pub const UART2_RX_0: usize = 0;
    /// UART2 transmit
    pub const UART2_TX_1: usize = 1;
    /// Timer 3A
    pub const TIMER3_A: usize = 2;
    /// Timer 3B
    pub const TIMER3_B: usize = 3;
    /// Timer 2A
    pub const TIMER2_A_4: usize = 4;
    /// Timer 2B
    pub const TIMER2_B_5: usize = 5;
    /// Timer 2A
    pub const TIMER2_A_6: usize = 6;
    /// Timer 2B
    pub const TIMER2_B_7: usize = 7;
    /// UART1 receive
    pub const UART1_RX: usize = 8;
    /// UART1 transmit
    pub const UART1_TX: usize = 9;
    /// SSI1 receive
    pub const SSI1_RX: usize = 10;
    /// SSI1 transmit
    pub const SSI1_TX: usize = 11;
    /// UART2 receive
    pub const UART2_RX_12: usize = 12;
    /// UART2 transmit
    pub const UART2_TX_13: usize = 13;
    /// Timer 2A
    pub const TIMER2_A_14: usize = 14;
    /// Timer 2B
    pub const TIMER2_B_15: usize = 15;
    /// Timer 1A
    pub const TIMER1_A: usize = 18;
    /// Timer 1B
    pub const TIMER1_B: usize = 19;
    /// EPI receive
    pub const EPI0_RX: usize = 20;
    /// EPI transmit
    pub const EPI0_TX: usize = 21;
    /// Software channel
    pub const SW_22: usize = 22;
    /// Software channel
    pub const SW_23: usize = 23;
    /// Software channel
    pub const SW_28: usize = 28;
    /// Software channel
    pub const SW_29: usize = 29;
    /// Software channel
    pub const SW_30: usize = 30;
}

/// Channels under [`Mapping::Tertiary`](crate::channel::Mapping::Tertiary).
pub mod tertiary {
    /// SSI2 receive
    pub const SSI2_RX: usize = 12;
    /// SSI2 transmit
    pub const SSI2_TX: usize = 13;
    /// SSI3 receive
    pub const SSI3_RX: usize = 14;
    /// SSI3 transmit
    pub const SSI3_TX: usize = 15;
    /// UART3 receive
    pub const UART3_RX: usize = 16;
    /// UART3 transmit
    pub const UART3_TX: usize = 17;
    /// UART4 receive
    pub const UART4_RX: usize = 18;
    /// UART4 transmit
    pub const UART4_TX: usize = 19;
}
