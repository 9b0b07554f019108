//! Binary ABI of the FreeBSD `iic(4)` character-device driver.
//!
//! The kernel accepts I2C transactions through a single multiplexed
//! `ioctl(2)`. The structures it expects are defined in
//! `<dev/iicbus/iic.h>` and must be reproduced here bit for bit:
//! field order, field widths, and the embedded buffer pointers all
//! cross the user/kernel boundary unchanged.
//!
//! This is the lowest layer of iicbus. Everything else builds on top of
//! the [`IicMsg`] and [`IicRdwrData`] types provided here.

pub mod cmd;
pub mod ioctl;
pub mod msg;
pub mod rdwr;

pub use cmd::IicCmd;
pub use ioctl::{I2CRDWR, I2CRSTCARD};
pub use msg::{encode_slave, IicMsg, IIC_M_RD, IIC_M_WR};
pub use rdwr::IicRdwrData;
