//! Building blocks shared by every `/proc` parser.
//!
//! ```text
//!   file content
//!        │
//!   ┌────▼─────┐   lines, header skip, blank-line blocks, "label: value"
//!   │  split   │
//!   └────┬─────┘
//!        ├──────────────────────┐
//!   ┌────▼───────┐        ┌─────▼─────┐
//!   │ positional │        │  labeled  │   static field tables
//!   └────┬───────┘        └─────┬─────┘
//!        └──────────┬───────────┘
//!             ┌─────▼─────┐
//!             │ primitive │   strict / lenient token decoding
//!             └───────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod labeled;
pub mod positional;
pub mod primitive;
pub mod split;

pub use labeled::{Field, LabelTable, Setter};
pub use positional::{Column, Layout, Slot};

/// What to do when a token is not a valid number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Abort the whole read with a `DecodeError`.
    Fatal,
    /// Store zero and keep going.
    Lenient,
}

/// Encoding of a field value in kernel text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Int,
    Uint,
    HexUint,
    Byte,
    Float,
    HexList,
    IntList,
    Pair,
    Size,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Uint => "uint",
            ValueKind::HexUint => "hex uint",
            ValueKind::Byte => "byte",
            ValueKind::Float => "float",
            ValueKind::HexList => "hex list",
            ValueKind::IntList => "int list",
            ValueKind::Pair => "pair",
            ValueKind::Size => "size",
        };
        f.write_str(name)
    }
}
