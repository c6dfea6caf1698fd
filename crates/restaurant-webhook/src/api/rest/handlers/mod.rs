//! API request handlers

mod admit;
mod convert;
mod health;
mod validate;

pub use admit::*;
pub use convert::*;
pub use health::*;
pub use validate::*;
