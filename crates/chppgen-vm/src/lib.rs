#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Reference encoder for compiled CHPP generation programs.
//!
//! Executes the size functions, encoders and entry points of a
//! [`Program`](chppgen_ir::Program) against a dynamic [`Value`], producing
//! the bytes the generated C would write.

pub mod encoder;
pub mod error;
pub mod value;


pub use encoder::{Encoder, Limits};
pub use error::{Result, RuntimeError};
pub use value::Value;
