//! Domain Module
//!
//! Node attribute types read by the Windows helper.

pub mod node;

pub use node::*;
