//! Fixed-width scalar packing for resource-constrained links.
//!
//! Every value goes on the wire as exactly its width in bytes, least
//! significant byte first, with no tags or padding:
//! - `u8` / `i8` — 1 byte
//! - `u16` / `i16` — 2 bytes
//! - `u32` / `i32` — 4 bytes
//!
//! Field order is a convention between sender and receiver. Cursor positions
//! are returned so successive calls can be chained into one buffer, and every
//! call is bounds-checked against the buffer it is handed.

pub mod cursor;
pub mod error;
pub mod scalar;

pub use cursor::{Packer, Unpacker};
pub use error::{PackError, Result};
pub use scalar::{
    pack, pack_i16, pack_i32, pack_i8, pack_u16, pack_u32, pack_u8, unpack, unpack_i16,
    unpack_i32, unpack_i8, unpack_u16, unpack_u32, unpack_u8, Scalar,
};
