//! Request codes for the `iic(4)` ioctl surface.
//!
//! FreeBSD encodes ioctl numbers per `<sys/ioccom.h>`: a direction
//! nibble, the size of the argument struct, a group character, and a
//! command number. The size term makes the codes pointer-width
//! dependent, so they are computed from the struct types rather than
//! written as opaque literals.

use libc::c_ulong;

use crate::cmd::IicCmd;
use crate::rdwr::IicRdwrData;

/// Argument is copied in from userland (`IOC_IN`).
const IOC_IN: c_ulong = 0x8000_0000;
/// Mask applied to the argument size, per `IOCPARM_MASK`.
const IOCPARM_MASK: c_ulong = 0x1fff;

/// `_IOW(group, num, T)`: a write-direction ioctl taking a `T`.
const fn iow<T>(group: u8, num: u8) -> c_ulong {
    IOC_IN
        | ((std::mem::size_of::<T>() as c_ulong & IOCPARM_MASK) << 16)
        | ((group as c_ulong) << 8)
        | num as c_ulong
}

/// Execute an ordered array of messages as one bus transaction.
pub const I2CRDWR: c_ulong = iow::<IicRdwrData<'static>>(b'i', 6);

/// Reset the bus controller, releasing a wedged bus.
pub const I2CRSTCARD: c_ulong = iow::<IicCmd>(b'i', 3);

#[cfg(test)]
mod tests {
    use super::*;

    // Reference values taken from a 64-bit FreeBSD <dev/iicbus/iic.h>.
    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_request_codes_match_platform_headers() {
        assert_eq!(I2CRDWR, 0x8010_6906);
        assert_eq!(I2CRDWR, 2_148_559_110);
        assert_eq!(I2CRSTCARD, 0x8018_6903);
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn test_request_codes_match_platform_headers() {
        assert_eq!(I2CRDWR, 0x8008_6906);
        assert_eq!(I2CRSTCARD, 0x8010_6903);
    }

    #[test]
    fn test_group_and_number_fields() {
        assert_eq!((I2CRDWR >> 8) & 0xff, b'i' as c_ulong);
        assert_eq!(I2CRDWR & 0xff, 6);
        assert_eq!(I2CRSTCARD & 0xff, 3);
    }
}
