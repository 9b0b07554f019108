use crate::msg::IicMsg;

/// The `I2CRDWR` request envelope — mirrors `struct iic_rdwr_data`.
///
/// Points at an ordered array of [`IicMsg`]s that the kernel executes
/// strictly in sequence as one atomic bus transaction. Build it
/// immediately before issuing the `ioctl` and let it die with the call:
/// the embedded pointer is only valid while the message slice it was
/// built from is live.
#[repr(C)]
pub struct IicRdwrData<'m> {
    msgs: *mut IicMsg<'m>,
    nmsgs: u32,
}

#[cfg(target_pointer_width = "64")]
const _: () = assert!(std::mem::size_of::<IicRdwrData<'static>>() == 16);
#[cfg(target_pointer_width = "32")]
const _: () = assert!(std::mem::size_of::<IicRdwrData<'static>>() == 8);
const _: () = assert!(std::mem::offset_of!(IicRdwrData<'static>, msgs) == 0);
const _: () = assert!(
    std::mem::offset_of!(IicRdwrData<'static>, nmsgs) == std::mem::size_of::<usize>()
);

impl<'m> IicRdwrData<'m> {
    /// Wrap a message slice into a request envelope.
    pub fn new(msgs: &mut [IicMsg<'m>]) -> Self {
        debug_assert!(msgs.len() <= u32::MAX as usize);
        Self {
            msgs: msgs.as_mut_ptr(),
            nmsgs: msgs.len() as u32,
        }
    }

    /// Number of messages referenced by the envelope.
    pub fn nmsgs(&self) -> u32 {
        self.nmsgs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_counts_messages() {
        let mut a = [0u8; 1];
        let mut b = [0u8; 1];
        let mut msgs = [IicMsg::write(0x20, &mut a), IicMsg::read(0x20, &mut b)];
        let rdwr = IicRdwrData::new(&mut msgs);
        assert_eq!(rdwr.nmsgs(), 2);
    }
}
