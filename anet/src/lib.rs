#[macro_use]
extern crate log;
#[macro_use]
extern crate num_derive;

pub mod adapter;
mod common;
mod error;
pub mod native;

pub use adapter::{AcceptOptions, Accepted, Adapter, Frame, PeerInfo, Value, Values, OPERATIONS};
pub use common::constants::{self, ErrorCode};
pub use common::interface::SocketPrimitives;
pub use common::util;
pub use error::{ArgumentError, NativeError, NativeResult};
pub use native::Anet;
