//! Step-at-a-time JSON encoding: the frame-stack state machine, scalar
//! literal encoding, token kinds and the sinks that consume emitted
//! fragments.

pub(crate) mod literal;
pub mod machine;
pub mod sink;
pub mod token;
