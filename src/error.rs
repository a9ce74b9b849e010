//! uDMA errors

use core::fmt;

/// A uDMA error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The controller reported a bus error.
    ///
    /// The channel that caused the error is disabled by the hardware. The
    /// status stays latched until you [`clear_error`](crate::Udma::clear_error).
    Bus,
    /// A scatter-gather transfer was given no tasks.
    EmptyTaskList,
    /// A scatter-gather list is too long for the primary structure to copy.
    ///
    /// Holds the rejected task count. A list may hold at most
    /// [`MAX_TASKS`](crate::table::MAX_TASKS) tasks.
    TooManyTasks(usize),
    /// A buffer's length doesn't fit in a control word.
    ///
    /// Holds the rejected length. A control structure moves between 1 and
    /// [`MAX_TRANSFER`](crate::MAX_TRANSFER) items.
    TransferLength(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus => f.write_str("uDMA bus error"),
            Error::EmptyTaskList => f.write_str("scatter-gather task list is empty"),
            Error::TooManyTasks(count) => write!(
                f,
                "{count} scatter-gather tasks exceed the limit of {}",
                crate::table::MAX_TASKS
            ),
            Error::TransferLength(len) => write!(
                f,
                "transfer of {len} items is outside 1..={}",
                crate::MAX_TRANSFER
            ),
        }
    }
}
