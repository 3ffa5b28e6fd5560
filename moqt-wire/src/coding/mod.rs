//! Low-level wire primitives: the [Decode] trait, the QUIC varint codec,
//! and the tuple reader shared by the message grammars.

mod decode;
mod tuple;
mod varint;

pub use decode::*;
pub use tuple::*;
pub use varint::*;
