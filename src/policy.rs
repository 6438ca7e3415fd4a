//! A mechanism to specify policy.
//!
//! The core engine in this crate (validation, merging, generation) is
//! policy free: it does not hardcode a preferred hash algorithm, a
//! default symmetric cipher, or whether expired revocations still
//! count. Instead every operation that needs one of those answers
//! takes a `&dyn Policy`. Callers get a ready-made [`StandardPolicy`]
//! with the same defaults the distilled specification's immutable
//! config record describes, or they can implement [`Policy`]
//! themselves to, say, treat all revocations as permanent regardless
//! of expiration.
//!
//! [`Policy`] implementations must be idempotent: calling the same
//! method twice with the same arguments must return the same answer,
//! since signature validity is cached on that assumption (see
//! [`crate::packet::SignaturePacket`]).

use std::fmt;

use crate::types::{HashAlgorithm, SymmetricAlgorithm};

/// A policy for cryptographic and structural decisions the engine
/// cannot make on its own.
///
/// This mirrors the distilled specification's "Config (immutable)"
/// collaborator, but expressed as a trait rather than a flat record so
/// that callers can layer custom behavior (e.g. a deny-list of weak
/// algorithms) on top of [`StandardPolicy`]'s defaults.
pub trait Policy: fmt::Debug {
    /// The hash algorithm to fall back on when no preference can be
    /// negotiated, or when a negotiated algorithm is weaker than this
    /// floor.
    fn prefer_hash_algorithm(&self) -> HashAlgorithm;

    /// The symmetric cipher to fall back on when no key in a
    /// recipient set agrees on anything better.
    fn encryption_cipher(&self) -> SymmetricAlgorithm;

    /// Whether a revocation signature stops counting once its
    /// validity period has elapsed.
    ///
    /// [RFC 4880] says revocations should be permanent; setting this
    /// is how a caller opts into treating an expired revocation
    /// signature as void, which is occasionally useful when
    /// processing old archives.
    ///
    /// [RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.3.14
    fn revocations_expire(&self) -> bool;

    /// Whether newly generated keys should request modification
    /// detection (the `features` subpacket's bit 0).
    fn integrity_protect(&self) -> bool;

    /// Whether key generation should prefer the host's native random
    /// number source over a caller-supplied one.
    ///
    /// This crate does not implement key material generation itself
    /// (see the non-goals), but `use_native` is threaded through to
    /// whatever `KeyPacket` implementation the caller supplies to
    /// [`crate::cert::builder`], matching the "Config" collaborator
    /// the distilled specification names.
    fn use_native(&self) -> bool;
}

/// The default [`Policy`], matching the defaults the distilled
/// specification's config record assumes unless a caller overrides
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardPolicy {
    prefer_hash_algorithm: HashAlgorithm,
    encryption_cipher: SymmetricAlgorithm,
    revocations_expire: bool,
    integrity_protect: bool,
    use_native: bool,
}

impl Default for StandardPolicy {
    fn default() -> Self {
        StandardPolicy {
            prefer_hash_algorithm: HashAlgorithm::SHA256,
            encryption_cipher: SymmetricAlgorithm::AES128,
            revocations_expire: false,
            integrity_protect: true,
            use_native: true,
        }
    }
}

impl StandardPolicy {
    /// Returns a new `StandardPolicy` with the default knobs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `prefer_hash_algorithm` overridden.
    pub fn with_preferred_hash_algorithm(mut self, algo: HashAlgorithm) -> Self {
        self.prefer_hash_algorithm = algo;
        self
    }

    /// Returns a copy with `encryption_cipher` overridden.
    pub fn with_encryption_cipher(mut self, algo: SymmetricAlgorithm) -> Self {
        self.encryption_cipher = algo;
        self
    }

    /// Returns a copy with `revocations_expire` overridden.
    pub fn with_revocations_expire(mut self, v: bool) -> Self {
        self.revocations_expire = v;
        self
    }

    /// Returns a copy with `integrity_protect` overridden.
    pub fn with_integrity_protect(mut self, v: bool) -> Self {
        self.integrity_protect = v;
        self
    }

    /// Returns a copy with `use_native` overridden.
    pub fn with_use_native(mut self, v: bool) -> Self {
        self.use_native = v;
        self
    }
}

impl Policy for StandardPolicy {
    fn prefer_hash_algorithm(&self) -> HashAlgorithm {
        self.prefer_hash_algorithm
    }

    fn encryption_cipher(&self) -> SymmetricAlgorithm {
        self.encryption_cipher
    }

    fn revocations_expire(&self) -> bool {
        self.revocations_expire
    }

    fn integrity_protect(&self) -> bool {
        self.integrity_protect
    }

    fn use_native(&self) -> bool {
        self.use_native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_specification() {
        let p = StandardPolicy::default();
        assert_eq!(p.prefer_hash_algorithm(), HashAlgorithm::SHA256);
        assert_eq!(p.encryption_cipher(), SymmetricAlgorithm::AES128);
        assert!(!p.revocations_expire());
        assert!(p.integrity_protect());
    }

    #[test]
    fn builder_overrides_one_field_at_a_time() {
        let p = StandardPolicy::new().with_revocations_expire(true);
        assert!(p.revocations_expire());
        assert_eq!(p.prefer_hash_algorithm(), HashAlgorithm::SHA256);
    }
}
