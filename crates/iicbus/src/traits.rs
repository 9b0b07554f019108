use std::io;

use iicbus_abi::IicMsg;

/// The seam between bus operations and the kernel driver.
///
/// The real backend ([`crate::DevNode`]) issues the control call against
/// an open device descriptor. Tests substitute a recording backend that
/// simulates ACKs without hardware.
pub trait Backend {
    /// Execute an ordered message array as one atomic bus transaction.
    ///
    /// The kernel processes the messages strictly in slice order; a
    /// write-then-read pair relies on that. An `Err` commonly means no
    /// device ACKed at the addressed slave.
    fn rdwr(&mut self, msgs: &mut [IicMsg<'_>]) -> io::Result<()>;

    /// Reset the bus controller.
    fn reset(&mut self) -> io::Result<()>;

    /// Release the underlying descriptor.
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

/// Raw I2C bus master capability.
///
/// Implemented by [`crate::IicBus`] and consumed by device drivers that
/// want to stay generic over how the bus is reached. Every operation is
/// one synchronous kernel round trip; callers needing concurrent access
/// must serialize externally.
///
/// The `strict` flag selects the failure policy: `true` surfaces the
/// underlying OS error, `false` converts a failed transfer into the
/// absence sentinel (`None` / `false`), since "no device at this
/// address" is a routine outcome rather than an exceptional one.
pub trait I2cBus {
    /// Error type for bus operations.
    type Error;

    /// Probe every 7-bit address and return those that responded,
    /// ascending. A non-responding address is never an error.
    fn scan(&mut self) -> Result<Vec<u8>, Self::Error>;

    /// Read `nbytes` from the device at `address`.
    ///
    /// `nbytes == 0` is legal and yields an empty result without
    /// touching the bus.
    fn read(
        &mut self,
        address: u8,
        nbytes: usize,
        strict: bool,
    ) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Write `data` to the device at `address`. Returns whether the
    /// transfer was ACKed.
    fn write(&mut self, address: u8, data: &[u8], strict: bool) -> Result<bool, Self::Error>;

    /// Write `data` then read `nbytes`, as one atomic transaction
    /// (the "write register address, then read value" idiom — two
    /// separate calls would let another bus participant interleave).
    fn write_read(
        &mut self,
        address: u8,
        data: &[u8],
        nbytes: usize,
        strict: bool,
    ) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Reset the bus controller. Returns whether the reset succeeded.
    fn reset(&mut self, strict: bool) -> Result<bool, Self::Error>;
}
