//! Scalar packing and SLIP framing for serial links and raw sockets.
//!
//! The two halves are independent; a sender packs a record then frames it,
//! a receiver deframes then unpacks in the same field order.
//!
//! # Crate Structure
//!
//! - [`pack`] — Fixed-width little-endian packing of 8/16/32-bit integers
//! - [`slip`] — SLIP frame encoding, decoding and stream adapters
//!
//! ```
//! use microdata::pack::{Packer, Unpacker};
//! use microdata::slip::{slip_decode, slip_encode};
//!
//! let mut record = [0u8; 4];
//! Packer::new(&mut record).put(0xC0u8)?.put(-300i16)?.put(0xDBu8)?;
//!
//! let frame = slip_encode(&record);
//! let payload = slip_decode(&frame, record.len())?;
//!
//! let mut fields = Unpacker::new(&payload);
//! assert_eq!(fields.get::<u8>()?, 0xC0);
//! assert_eq!(fields.get::<i16>()?, -300);
//! assert_eq!(fields.get::<u8>()?, 0xDB);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Re-export scalar packing types.
pub mod pack {
    pub use microdata_pack::*;
}

/// Re-export SLIP framing types.
pub mod slip {
    pub use microdata_slip::*;
}
