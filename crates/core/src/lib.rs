pub mod message;

pub use message::*;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
