use std::path::Path;

use tracing::{debug, trace};

use iicbus_abi::IicMsg;

use crate::error::{BusError, Result};
use crate::node::DevNode;
use crate::traits::{Backend, I2cBus};

/// Highest valid 7-bit slave address.
const MAX_ADDRESS: u8 = 127;

/// Largest transfer the wire format's 16-bit length field can declare.
const MAX_TRANSFER: usize = u16::MAX as usize;

/// Buffer lengths longer than `MAX_TRANSFER` would truncate the
/// declared length modulo 65536 once cast into the wire struct.
fn check_len(len: usize) -> Result<()> {
    if len > MAX_TRANSFER {
        return Err(BusError::TransferTooLarge {
            len,
            max: MAX_TRANSFER,
        });
    }
    Ok(())
}

/// A handle on one I2C bus.
///
/// Owns at most one live backend (and through it, one device
/// descriptor). Every operation is a single blocking control call; the
/// handle holds no internal locking, so concurrent use from multiple
/// threads must be serialized by the caller.
///
/// `close()` is explicit and reports the OS result. Dropping an open
/// handle closes it best-effort, logging failures.
pub struct IicBus<B: Backend = DevNode> {
    backend: Option<B>,
}

impl IicBus<DevNode> {
    /// Open the bus behind the given device node.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_backend(DevNode::open(path)?))
    }

    /// Open the conventional first controller, `/dev/iic0`.
    pub fn open_default() -> Result<Self> {
        Self::open(DevNode::DEFAULT_PATH)
    }
}

impl<B: Backend> IicBus<B> {
    /// Build a bus handle over an already-constructed backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Whether the handle still owns a live backend.
    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    /// Release the underlying descriptor.
    ///
    /// Idempotent: closing an already-closed handle is a no-op. Data
    /// operations on a closed handle fail with [`BusError::Closed`].
    pub fn close(&mut self) -> Result<()> {
        let Some(backend) = self.backend.take() else {
            return Ok(());
        };
        backend.close().map_err(BusError::Close)?;
        debug!("closed i2c bus handle");
        Ok(())
    }

    fn backend_mut(&mut self) -> Result<&mut B> {
        self.backend.as_mut().ok_or(BusError::Closed)
    }

    /// Probe every 7-bit address in `1..=127` and return those that
    /// responded, ascending.
    ///
    /// Each probe is a 2-byte write followed by a 2-byte read over one
    /// shared buffer, zero-initialized once and reused across the whole
    /// sweep — the common ACK test that is side-effect free on most
    /// devices. A failed probe is the normal "no device present" signal
    /// and is skipped silently.
    pub fn scan(&mut self) -> Result<Vec<u8>> {
        let backend = self.backend_mut()?;

        let mut found = Vec::new();
        let mut probe = [0u8; 2];
        for address in 1..=MAX_ADDRESS {
            let mut msgs = IicMsg::probe_pair(address, &mut probe);
            if backend.rdwr(&mut msgs).is_ok() {
                trace!(address, "device responded to probe");
                found.push(address);
            }
        }

        debug!(count = found.len(), "bus scan complete");
        Ok(found)
    }

    /// Read `nbytes` from the device at `address`.
    ///
    /// Returns `Ok(None)` on a failed transfer unless `strict`, in
    /// which case the OS error surfaces as [`BusError::Transfer`].
    /// `nbytes == 0` yields an empty result without touching the bus;
    /// `nbytes` beyond the wire format's 16-bit length field is
    /// rejected regardless of `strict`.
    pub fn read(&mut self, address: u8, nbytes: usize, strict: bool) -> Result<Option<Vec<u8>>> {
        let backend = self.backend_mut()?;
        check_len(nbytes)?;
        if nbytes == 0 {
            return Ok(Some(Vec::new()));
        }

        let mut data = vec![0u8; nbytes];
        let mut msgs = [IicMsg::read(address, &mut data)];
        match backend.rdwr(&mut msgs) {
            Ok(()) => {
                trace!(address, nbytes, "read complete");
                Ok(Some(data))
            }
            Err(e) if strict => Err(BusError::Transfer(e)),
            Err(e) => {
                trace!(address, error = %e, "read failed");
                Ok(None)
            }
        }
    }

    /// Write `data` to the device at `address`.
    ///
    /// Returns `Ok(false)` on a failed transfer unless `strict`;
    /// oversized `data` is rejected regardless of `strict`. The bytes
    /// are staged in a private copy so the kernel reads from memory
    /// this call exclusively owns.
    pub fn write(&mut self, address: u8, data: &[u8], strict: bool) -> Result<bool> {
        let backend = self.backend_mut()?;
        check_len(data.len())?;

        let mut out = data.to_vec();
        let mut msgs = [IicMsg::write(address, &mut out)];
        match backend.rdwr(&mut msgs) {
            Ok(()) => {
                trace!(address, nbytes = data.len(), "write complete");
                Ok(true)
            }
            Err(e) if strict => Err(BusError::Transfer(e)),
            Err(e) => {
                trace!(address, error = %e, "write failed");
                Ok(false)
            }
        }
    }

    /// Write `data` then read `nbytes` from `address` as one atomic
    /// transaction.
    ///
    /// The kernel executes the two messages strictly in order with no
    /// chance for another bus participant to interleave — the standard
    /// "write register address, then read register value" idiom. The
    /// read length is independent of the write length; both are bounded
    /// by the wire format's 16-bit length field.
    pub fn write_read(
        &mut self,
        address: u8,
        data: &[u8],
        nbytes: usize,
        strict: bool,
    ) -> Result<Option<Vec<u8>>> {
        let backend = self.backend_mut()?;
        check_len(data.len())?;
        check_len(nbytes)?;

        let mut out = data.to_vec();
        let mut rd = vec![0u8; nbytes];
        let mut msgs = [
            IicMsg::write(address, &mut out),
            IicMsg::read(address, &mut rd),
        ];
        match backend.rdwr(&mut msgs) {
            Ok(()) => {
                trace!(address, wrote = data.len(), nbytes, "write-read complete");
                Ok(Some(rd))
            }
            Err(e) if strict => Err(BusError::Transfer(e)),
            Err(e) => {
                trace!(address, error = %e, "write-read failed");
                Ok(None)
            }
        }
    }

    /// Reset the bus controller, releasing a wedged bus.
    ///
    /// Returns `Ok(false)` on failure unless `strict`.
    pub fn reset(&mut self, strict: bool) -> Result<bool> {
        let backend = self.backend_mut()?;
        match backend.reset() {
            Ok(()) => {
                debug!("bus controller reset");
                Ok(true)
            }
            Err(e) if strict => Err(BusError::Transfer(e)),
            Err(e) => {
                debug!(error = %e, "bus reset failed");
                Ok(false)
            }
        }
    }
}

impl<B: Backend> I2cBus for IicBus<B> {
    type Error = BusError;

    fn scan(&mut self) -> Result<Vec<u8>> {
        IicBus::scan(self)
    }

    fn read(&mut self, address: u8, nbytes: usize, strict: bool) -> Result<Option<Vec<u8>>> {
        IicBus::read(self, address, nbytes, strict)
    }

    fn write(&mut self, address: u8, data: &[u8], strict: bool) -> Result<bool> {
        IicBus::write(self, address, data, strict)
    }

    fn write_read(
        &mut self,
        address: u8,
        data: &[u8],
        nbytes: usize,
        strict: bool,
    ) -> Result<Option<Vec<u8>>> {
        IicBus::write_read(self, address, data, nbytes, strict)
    }

    fn reset(&mut self, strict: bool) -> Result<bool> {
        IicBus::reset(self, strict)
    }
}

impl<B: Backend> Drop for IicBus<B> {
    fn drop(&mut self) {
        if let Some(backend) = self.backend.take() {
            if let Err(e) = backend.close() {
                debug!(error = %e, "close failed during drop");
            }
        }
    }
}

impl<B: Backend> std::fmt::Debug for IicBus<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IicBus")
            .field("open", &self.backend.is_some())
            .finish()
    }
}
