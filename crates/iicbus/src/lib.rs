//! Userspace I2C bus client for the FreeBSD `iic(4)` character device.
//!
//! The kernel exposes each I2C controller as a device node (`/dev/iic0`
//! and up) driven through a single multiplexed control call. This crate
//! wraps that surface in a safe handle:
//!
//! - [`IicBus::scan`] discovers which slave addresses respond,
//! - [`IicBus::read`] / [`IicBus::write`] perform raw transfers,
//! - [`IicBus::write_read`] does the atomic write-then-read idiom used
//!   to read device registers.
//!
//! Device drivers built on top should depend on the [`I2cBus`] trait
//! rather than the concrete handle. The wire structures themselves live
//! in the `iicbus-abi` crate.

pub mod bus;
pub mod error;
pub mod node;
pub mod traits;

pub use bus::IicBus;
pub use error::{BusError, Result};
pub use node::DevNode;
pub use traits::{Backend, I2cBus};
