use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, IntoRawFd};
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use tracing::debug;

use iicbus_abi::{IicCmd, IicMsg, IicRdwrData, I2CRDWR, I2CRSTCARD};

use crate::error::{BusError, Result};
use crate::traits::Backend;

/// An open `iic(4)` device node.
///
/// Owns exactly one descriptor for its lifetime and issues the driver's
/// control calls against it. This is the only place the kernel ABI is
/// actually crossed.
pub struct DevNode {
    file: File,
    path: PathBuf,
}

impl DevNode {
    /// Conventional first I2C controller on FreeBSD.
    pub const DEFAULT_PATH: &'static str = "/dev/iic0";

    /// Open a device node read/write.
    ///
    /// Fails if the path does not exist, is not a character device, or
    /// permission is denied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| BusError::Open {
                path: path.clone(),
                source: e,
            })?;

        // Never issue iic ioctls against a regular file someone left at
        // the configured path.
        let metadata = file.metadata().map_err(|e| BusError::Open {
            path: path.clone(),
            source: e,
        })?;
        if !metadata.file_type().is_char_device() {
            return Err(BusError::Open {
                path,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "path is not a character device",
                ),
            });
        }

        debug!(?path, "opened i2c device node");
        Ok(Self { file, path })
    }

    /// The path this node was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Backend for DevNode {
    fn rdwr(&mut self, msgs: &mut [IicMsg<'_>]) -> io::Result<()> {
        let mut rdwr = IicRdwrData::new(msgs);
        let arg: *mut IicRdwrData<'_> = &mut rdwr;
        // SAFETY: `arg` points at a live envelope whose message array
        // and buffers stay borrowed for the duration of the call; the
        // descriptor is open and owned by `self.file`.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), I2CRDWR as _, arg) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        let mut cmd = IicCmd::addressed(0);
        let arg: *mut IicCmd = &mut cmd;
        // SAFETY: `arg` points at a live, zero-data command; the
        // descriptor is open and owned by `self.file`.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), I2CRSTCARD as _, arg) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn close(self) -> io::Result<()> {
        let fd = self.file.into_raw_fd();
        // SAFETY: `into_raw_fd` released ownership, so the descriptor is
        // closed exactly once, here.
        let rc = unsafe { libc::close(fd) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl std::fmt::Debug for DevNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevNode").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_path() {
        let result = DevNode::open("/nonexistent/iic99");
        assert!(matches!(result, Err(BusError::Open { .. })));
    }

    #[test]
    fn test_open_rejects_regular_file() {
        let dir = std::env::temp_dir().join(format!("iicbus-node-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("not-a-device");
        std::fs::write(&path, b"regular-file").unwrap();

        let result = DevNode::open(&path);
        assert!(matches!(result, Err(BusError::Open { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_open_char_device() {
        // /dev/null is a character device on every unix; it is not an
        // i2c controller, but open-time validation cannot tell.
        let node = DevNode::open("/dev/null").unwrap();
        assert_eq!(node.path(), Path::new("/dev/null"));
        node.close().unwrap();
    }

    #[test]
    fn test_rdwr_on_wrong_device_reports_os_error() {
        let mut node = DevNode::open("/dev/null").unwrap();
        let mut buf = [0u8; 1];
        let mut msgs = [IicMsg::read(0x50, &mut buf)];
        // /dev/null does not understand iic ioctls.
        assert!(node.rdwr(&mut msgs).is_err());
        node.close().unwrap();
    }
}
