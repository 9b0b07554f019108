use libc::{c_char, c_int};

use crate::msg::encode_slave;

/// Envelope for the single-slave ioctls — mirrors `struct iiccmd`.
///
/// `I2CRDWR` does not use this shape; it exists for the older requests
/// (`I2CRSTCARD` and friends) that predate the message-array interface.
#[repr(C)]
pub struct IicCmd {
    slave: u8,
    count: c_int,
    last: c_int,
    buf: *mut c_char,
}

#[cfg(target_pointer_width = "64")]
const _: () = assert!(std::mem::size_of::<IicCmd>() == 24);
#[cfg(target_pointer_width = "32")]
const _: () = assert!(std::mem::size_of::<IicCmd>() == 16);
const _: () = assert!(std::mem::offset_of!(IicCmd, count) == 4);
const _: () = assert!(std::mem::offset_of!(IicCmd, last) == 8);

impl IicCmd {
    /// A command addressed to one slave, carrying no data. Sufficient
    /// for `I2CRSTCARD`, which only looks at the slave field.
    pub fn addressed(address: u8) -> Self {
        Self {
            slave: encode_slave(address) as u8,
            count: 0,
            last: 0,
            buf: std::ptr::null_mut(),
        }
    }

    /// The encoded slave field.
    pub fn slave(&self) -> u8 {
        self.slave
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addressed_is_empty() {
        let cmd = IicCmd::addressed(0x50);
        assert_eq!(cmd.slave(), 0xA0);
        assert_eq!(cmd.count, 0);
        assert!(cmd.buf.is_null());
    }
}
