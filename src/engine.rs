//! Audio engine: at most one live stream at a time, driven by commands and
//! observed through events tagged with the stream they came from.

mod handle;
mod sink;
mod thread;
mod types;

pub use handle::*;
pub use types::*;
