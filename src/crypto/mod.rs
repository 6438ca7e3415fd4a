//! Algorithm parameter shapes.
//!
//! Actual cryptographic primitives — signing, hashing, MPI bignum
//! arithmetic, symmetric ciphers — are external collaborators that a
//! caller supplies through its own `KeyPacket`/`SignaturePacket`
//! implementations. This module only publishes the static shape
//! tables those implementations can use to know what to read or
//! write.

pub mod mpis;
