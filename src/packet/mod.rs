//! The external packet interfaces.
//!
//! This crate does not parse or serialize OpenPGP packets byte for
//! byte (that's a non-goal, left to a caller's own codec); instead it
//! defines the two traits a caller's packet types must implement —
//! [`KeyPacket`] and [`SignaturePacket`] — so that the validation,
//! merge, and generation engines in [`crate::cert`] can operate over
//! whatever concrete representation the caller brought, the way the
//! distilled specification's §6 "external interfaces" section
//! describes a key packet and a signature packet as collaborators
//! rather than concrete types.

use crate::keyid::KeyID;
use crate::types::{
    Curve, Features, HashAlgorithm, KeyFlags, PublicKeyAlgorithm, SignatureType, Timestamp,
};
use crate::Result;

/// What a signature was computed over.
///
/// Mirrors the "dataToVerify" descriptor of the distilled
/// specification's revocation predicate and verify calls: a
/// signature either certifies a user (a UserID or User Attribute
/// bound to a primary key), binds a subkey to a primary key, or
/// stands alone over the primary key itself (a direct-key or
/// key-revocation signature).
#[derive(Clone, Copy)]
pub enum SignedData<'a, K: KeyPacket> {
    /// A certification or revocation over `(userid, key)`.
    User { key: &'a K, userid: &'a str },
    /// A subkey binding or revocation, or a primary-key binding, over
    /// `(key, bound)`.
    Binding { key: &'a K, bound: &'a K },
    /// A direct-key signature or key-revocation over the primary key
    /// alone.
    DirectKey { key: &'a K },
}

/// The external key-packet interface (§6 "Key packet").
///
/// A `KeyPacket` carries whatever wire fields its algorithm needs; this
/// crate only needs the handful of accessors below to build the
/// structure tree, validate it, and drive the generator.
pub trait KeyPacket: Clone {
    /// The packet's public-key algorithm.
    fn algorithm(&self) -> PublicKeyAlgorithm;

    /// The packet version: 3 or 4.
    fn version(&self) -> u8;

    /// When the key was created.
    fn created(&self) -> Timestamp;

    /// The key's 8-byte Key ID.
    fn key_id(&self) -> KeyID;

    /// The key's fingerprint, as its raw bytes.
    fn fingerprint(&self) -> crate::Fingerprint;

    /// A version-3 key's expiration, in days since creation (`0`
    /// means "never", matching v3's on-wire convention). Version 4
    /// keys return `None`; their expiration instead comes from the
    /// governing signature's `key_expiration_time`.
    fn expiration_time_v3(&self) -> Option<u16>;

    /// Whether this packet carries secret key material.
    fn is_secret(&self) -> bool;

    /// Whether the secret material, if any, is currently decrypted.
    fn is_decrypted(&self) -> bool;

    /// Returns a copy of this packet with any secret material
    /// stripped, for `toPublic()`.
    fn clear_private_params(&self) -> Self;

    /// Generates a fresh key packet of `algorithm`, using `num_bits`
    /// (RSA) or `curve` (ECC) as appropriate, created at `created`.
    ///
    /// The actual key-material generation is the caller's concern
    /// (see the crate's non-goals); this is the factory hook the
    /// generator (§4.9) calls through.
    fn generate(
        algorithm: PublicKeyAlgorithm,
        num_bits: Option<u32>,
        curve: Option<Curve>,
        created: Timestamp,
    ) -> Result<Self>
    where
        Self: Sized;

    /// Returns a copy of this packet with its secret portion
    /// encrypted under `passphrase`. If `lock` is set, the returned
    /// copy's `is_decrypted()` is `false` (the in-memory private
    /// parameters are considered cleared); otherwise the returned
    /// copy remains decrypted for immediate use.
    fn encrypt(&self, passphrase: &[u8], lock: bool) -> Result<Self>
    where
        Self: Sized;

    /// Returns a copy of this packet with its secret portion
    /// decrypted under `passphrase`.
    fn decrypt(&self, passphrase: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

/// The subpacket content a freshly produced signature should assert.
///
/// [`SignaturePacket::sign`] takes this instead of individual
/// parameters so that the generator (§4.9) can describe a
/// self-certification or a subkey binding in one call.
#[derive(Clone, Debug, Default)]
pub struct SignatureParams {
    /// The hash algorithm to sign with.
    pub hash_algorithm: HashAlgorithm,
    /// When the signature is considered made.
    pub created: Timestamp,
    /// The key usage flags to assert, if any.
    pub key_flags: Option<KeyFlags>,
    /// Seconds after the key's creation at which it expires.
    pub key_expiration_time: Option<u64>,
    /// Whether to assert that the key never expires.
    pub key_never_expires: bool,
    /// Whether this is the primary UserID (weight `1`); higher
    /// weights are not produced by the generator, only by hand-built
    /// test fixtures exercising the tie-break rule.
    pub primary_user_id: bool,
    /// Preferred hash algorithms to assert, most preferred first.
    pub preferred_hash_algorithms: Vec<HashAlgorithm>,
    /// Preferred symmetric algorithms to assert, most preferred
    /// first.
    pub preferred_symmetric_algorithms: Vec<crate::types::SymmetricAlgorithm>,
    /// Preferred compression algorithms to assert, most preferred
    /// first.
    pub preferred_compression_algorithms: Vec<crate::types::CompressionAlgorithm>,
    /// The features subpacket to assert, if any.
    pub features: Option<Features>,
}

/// The external signature-packet interface (§6 "Signature packet").
pub trait SignaturePacket: Clone {
    /// The concrete key-packet type this signature is issued by and
    /// verified against.
    type Key: KeyPacket;

    /// The signature's type byte.
    fn signature_type(&self) -> SignatureType;

    /// The Key ID of the issuing key, read off the signature's issuer
    /// subpacket.
    fn issuer_key_id(&self) -> KeyID;

    /// When the signature was created.
    fn created(&self) -> Timestamp;

    /// The key usage flags this signature asserts, if any.
    fn key_flags(&self) -> Option<KeyFlags>;

    /// Seconds after the key's creation at which it expires, per this
    /// signature, unless `key_never_expires` is set.
    fn key_expiration_time(&self) -> Option<u64>;

    /// Whether this signature asserts that its key never expires.
    fn key_never_expires(&self) -> bool;

    /// The numeric weight of an `isPrimaryUserID` assertion, or
    /// `None` if this signature makes no such assertion.
    fn primary_user_id_weight(&self) -> Option<u32>;

    /// The issuer's preferred hash algorithms, most preferred first.
    fn preferred_hash_algorithms(&self) -> &[HashAlgorithm];

    /// The issuer's preferred symmetric algorithms, most preferred
    /// first.
    fn preferred_symmetric_algorithms(&self) -> &[crate::types::SymmetricAlgorithm];

    /// The issuer's preferred compression algorithms, most preferred
    /// first.
    fn preferred_compression_algorithms(&self) -> &[crate::types::CompressionAlgorithm];

    /// Whether the cached verification result is `true`.
    ///
    /// Implementations must cache monotonically: once `verify`
    /// succeeds the cache never reverts to unverified.
    fn verified(&self) -> bool;

    /// Whether this signature has itself been marked revoked by a
    /// surviving revocation over it (rarely used; most callers rely
    /// on the container's revocation collections instead).
    fn revoked(&self) -> bool;

    /// The signature's raw encoded bytes, used by the merge engine to
    /// deduplicate signatures that arrived from two copies of the same
    /// key.
    fn raw_bytes(&self) -> &[u8];

    /// The features subpacket this signature asserts, if any.
    fn features(&self) -> Option<Features>;

    /// Marks this signature revoked.
    fn set_revoked(&mut self, revoked: bool);

    /// Verifies this signature against `verifying_key` and `data`,
    /// populating the `verified` cache on success. Returns `Ok(true)`
    /// if the signature verifies, `Ok(false)` if it was checked and
    /// failed, and `Err` only for a structural problem (e.g. an
    /// algorithm this packet cannot handle).
    fn verify(&mut self, verifying_key: &Self::Key, data: SignedData<'_, Self::Key>) -> Result<bool>;

    /// Produces a new signature of `signature_type` over `data`,
    /// issued by `signing_key`, asserting the subpacket content in
    /// `params`.
    fn sign(
        signing_key: &Self::Key,
        signature_type: SignatureType,
        data: SignedData<'_, Self::Key>,
        params: SignatureParams,
    ) -> Result<Self>
    where
        Self: Sized;

    /// Whether this signature itself has expired as of `now` (as
    /// opposed to whether the *key* it governs has expired).
    fn is_expired(&self, now: Timestamp) -> bool;
}
