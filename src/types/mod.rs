//! Small, self-contained value types shared across the crate: wire
//! algorithm identifiers, the named-curve registry, key usage flags
//! and feature flags, and normalized timestamps.

mod algorithm;
mod curve;
mod keyflags;
mod timestamp;

pub use algorithm::{
    CompressionAlgorithm, HashAlgorithm, KeyStatus, PublicKeyAlgorithm, SignatureType,
    SymmetricAlgorithm, Tag,
};
pub use curve::{Curve, CurveCategory};
pub use keyflags::{Features, KeyFlags};
pub use timestamp::Timestamp;
