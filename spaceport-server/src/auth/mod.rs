pub mod cookie;
pub mod gate;
pub mod handlers;

pub use gate::{Caller, OptionalCaller};
