use std::marker::PhantomData;

/// Message direction flag: write to the slave.
pub const IIC_M_WR: u16 = 0x0000;
/// Message direction flag: read from the slave.
pub const IIC_M_RD: u16 = 0x0001;

/// Encode a 7-bit slave address into the kernel's wire convention.
///
/// The address occupies the upper bits of the `slave` field; bit 0 is
/// reserved for the read/write bit elsewhere in the driver stack.
pub const fn encode_slave(address: u8) -> u16 {
    (address as u16) << 1
}

/// One leg of an I2C transaction — mirrors `struct iic_msg`.
///
/// Wire layout (64-bit):
/// ```text
/// ┌───────────┬───────────┬───────────┬─────────┬───────────────┐
/// │ slave (2) │ flags (2) │ len (2)   │ pad (2) │ buf (8)       │
/// └───────────┴───────────┴───────────┴─────────┴───────────────┘
/// ```
///
/// The kernel reads or writes the buffer through the embedded pointer,
/// so the buffer must stay valid and unmoved for the full duration of
/// the `ioctl`. The lifetime parameter holds that borrow open: an
/// `IicMsg` cannot outlive the buffer it points into.
#[repr(C)]
pub struct IicMsg<'a> {
    slave: u16,
    flags: u16,
    len: u16,
    buf: *mut u8,
    _borrow: PhantomData<&'a mut [u8]>,
}

// Layout must match <dev/iicbus/iic.h> exactly; a mismatch here silently
// corrupts memory once the kernel follows the buffer pointer.
#[cfg(target_pointer_width = "64")]
const _: () = assert!(std::mem::size_of::<IicMsg<'static>>() == 16);
#[cfg(target_pointer_width = "32")]
const _: () = assert!(std::mem::size_of::<IicMsg<'static>>() == 12);
const _: () = assert!(std::mem::offset_of!(IicMsg<'static>, slave) == 0);
const _: () = assert!(std::mem::offset_of!(IicMsg<'static>, flags) == 2);
const _: () = assert!(std::mem::offset_of!(IicMsg<'static>, len) == 4);
const _: () = assert!(std::mem::offset_of!(IicMsg<'static>, buf) == 8);

impl<'a> IicMsg<'a> {
    fn new(address: u8, flags: u16, buf: &'a mut [u8]) -> Self {
        debug_assert!(buf.len() <= u16::MAX as usize);
        Self {
            slave: encode_slave(address),
            flags,
            len: buf.len() as u16,
            buf: buf.as_mut_ptr(),
            _borrow: PhantomData,
        }
    }

    /// A write message: the kernel sends `buf` to the slave.
    pub fn write(address: u8, buf: &'a mut [u8]) -> Self {
        Self::new(address, IIC_M_WR, buf)
    }

    /// A read message: the kernel overwrites `buf` with data from the slave.
    pub fn read(address: u8, buf: &'a mut [u8]) -> Self {
        Self::new(address, IIC_M_RD, buf)
    }

    /// The scan probe: a 2-byte write leg and a 2-byte read leg sharing
    /// one buffer, in write-then-read order.
    ///
    /// Sharing the buffer means the read leg overwrites whatever the
    /// write leg sent. That is fine for a probe: only the ACK matters.
    pub fn probe_pair(address: u8, buf: &'a mut [u8; 2]) -> [IicMsg<'a>; 2] {
        let ptr = buf.as_mut_ptr();
        let leg = |flags| IicMsg {
            slave: encode_slave(address),
            flags,
            len: 2,
            buf: ptr,
            _borrow: PhantomData,
        };
        [leg(IIC_M_WR), leg(IIC_M_RD)]
    }

    /// The encoded slave field (address pre-shifted left by one).
    pub fn slave(&self) -> u16 {
        self.slave
    }

    /// The direction flags field.
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// The declared transfer length in bytes.
    pub fn len(&self) -> u16 {
        self.len
    }

    /// Whether this message carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this is a read leg.
    pub fn is_read(&self) -> bool {
        self.flags & IIC_M_RD != 0
    }

    /// View the message buffer.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `buf`/`len` came from a live `&'a mut [u8]` and the
        // borrow is still held open by `_borrow`.
        unsafe { std::slice::from_raw_parts(self.buf, self.len as usize) }
    }

    /// View the message buffer mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as `as_slice`, and `&mut self` guarantees exclusive
        // access through this message for the returned lifetime.
        unsafe { std::slice::from_raw_parts_mut(self.buf, self.len as usize) }
    }
}

impl std::fmt::Debug for IicMsg<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IicMsg")
            .field("slave", &self.slave)
            .field("flags", &self.flags)
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_slave_shifts_left() {
        assert_eq!(encode_slave(0x50), 0xA0);
        assert_eq!(encode_slave(0x68), 0xD0);
        assert_eq!(encode_slave(127), 0xFE);
    }

    #[test]
    fn test_write_msg_fields() {
        let mut buf = [0x12u8, 0x34];
        let msg = IicMsg::write(0x50, &mut buf);
        assert_eq!(msg.slave(), 0xA0);
        assert_eq!(msg.flags(), IIC_M_WR);
        assert_eq!(msg.len(), 2);
        assert!(!msg.is_read());
        assert_eq!(msg.as_slice(), &[0x12, 0x34]);
    }

    #[test]
    fn test_read_msg_buffer_is_writable() {
        let mut buf = [0u8; 4];
        let mut msg = IicMsg::read(0x68, &mut buf);
        assert!(msg.is_read());
        msg.as_mut_slice().fill(0xAA);
        assert_eq!(buf, [0xAA; 4]);
    }

    #[test]
    fn test_probe_pair_shares_one_buffer() {
        let mut buf = [0u8; 2];
        let mut pair = IicMsg::probe_pair(0x3C, &mut buf);
        assert_eq!(pair[0].flags(), IIC_M_WR);
        assert_eq!(pair[1].flags(), IIC_M_RD);
        assert_eq!(pair[0].slave(), pair[1].slave());
        assert_eq!(pair[0].len(), 2);
        assert_eq!(pair[1].len(), 2);

        // Both legs alias the same two bytes.
        pair[1].as_mut_slice().copy_from_slice(&[0xBE, 0xEF]);
        assert_eq!(pair[0].as_slice(), &[0xBE, 0xEF]);
    }

    #[test]
    fn test_empty_buffer() {
        let mut buf = [0u8; 0];
        let msg = IicMsg::write(0x10, &mut buf);
        assert!(msg.is_empty());
        assert!(msg.as_slice().is_empty());
    }
}
