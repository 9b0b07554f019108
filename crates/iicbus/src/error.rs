use std::path::PathBuf;

/// Errors that can occur on an I2C bus handle.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// Failed to open the device node.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The kernel reported a transfer failure (commonly: no ACK from
    /// the slave, bus error, or invalid argument).
    #[error("i2c transfer failed: {0}")]
    Transfer(std::io::Error),

    /// The requested transfer does not fit the wire format's 16-bit
    /// length field.
    #[error("transfer too large ({len} bytes, max {max})")]
    TransferTooLarge { len: usize, max: usize },

    /// Explicit close of the device node failed.
    #[error("failed to close device node: {0}")]
    Close(std::io::Error),

    /// The handle was used after `close()`.
    #[error("bus handle is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, BusError>;
