//! OpenPGP transferable key object model: structure, validation, merge
//! and generation.
//!
//! This crate builds and inspects the tree shape of an OpenPGP
//! transferable key — primary key, users, subkeys, and the signatures
//! that bind and certify them — without itself parsing or serializing
//! wire-format packets. A caller supplies its own packet codec by
//! implementing [`packet::KeyPacket`] and [`packet::SignaturePacket`];
//! this crate then provides the structure builder ([`cert::Key::build`]),
//! the trust-query engine ([`cert::validate`]), the merge engine
//! ([`cert::merge`]), the operation selector ([`cert::select`]), and a
//! generator ([`cert::builder`]) on top of that interface.
//!
//! Cryptographic primitives — signing, hashing, symmetric encryption,
//! big-integer arithmetic — are left entirely to the caller's
//! `KeyPacket`/`SignaturePacket` implementations. [`crypto::mpis`]
//! only publishes the static parameter-shape tables a codec needs to
//! know how many MPIs or OID/KDF blocks a given algorithm carries.
//!
//! A [`policy::Policy`] threaded through every validation and
//! generation call answers the questions this crate cannot answer on
//! its own: which hash algorithm to prefer, which cipher to fall back
//! on, whether an expired revocation still counts.

#![warn(missing_docs)]

pub mod cert;
pub mod crypto;
mod fingerprint;
mod keyhandle;
mod keyid;
pub mod packet;
pub mod policy;
pub mod types;

pub use cert::Key;
pub use fingerprint::Fingerprint;
pub use keyhandle::KeyHandle;
pub use keyid::KeyID;

#[cfg(test)]
mod tests;

/// Crate result specialization.
pub type Result<T> = ::std::result::Result<T, anyhow::Error>;

/// Errors returned by this crate.
///
/// Note: this enum cannot be exhaustively matched to allow future
/// extensions.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The packet sequence handed to [`cert::Key::build`] yielded no
    /// primary key packet, or no users.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Decoded armor is neither a public nor a private key block.
    ///
    /// This crate does not itself decode ASCII armor (that's a
    /// caller's codec); this variant exists so a caller's armor layer
    /// can report its failure through the same error type.
    #[error("Malformed armor: {0}")]
    MalformedArmor(String),

    /// The generator or a parameter-shape lookup saw an algorithm
    /// identifier it does not recognize.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(u8),

    /// A public-key algorithm has no defined parameter shape (e.g. an
    /// unrecognized or deprecated algorithm).
    #[error("Unsupported public key algorithm: {0}")]
    UnsupportedPublicKeyAlgorithm(types::PublicKeyAlgorithm),

    /// The generator was asked for a primary key type it does not
    /// support (e.g. a deprecated algorithm).
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// The generator was asked for a subkey type it does not support.
    #[error("Unsupported subkey type: {0}")]
    UnsupportedSubkeyType(String),

    /// The requested curve name is not in the curve registry.
    #[error("Unknown curve: {0}")]
    UnknownCurve(String),

    /// A signing path encountered a secret key whose private
    /// parameters are still encrypted.
    #[error("Key is not decrypted")]
    NotDecrypted,

    /// [`cert::merge::update`]'s precondition failed: the two keys'
    /// primary fingerprints don't match.
    #[error("Fingerprint mismatch")]
    FingerprintMismatch,

    /// [`cert::merge::update`]'s precondition failed: a public key's
    /// subkey set does not match a private key's when adopting secret
    /// key material.
    #[error("Subkey set mismatch")]
    SubkeyMismatch,

    /// A passphrase-protection operation was requested on a key that
    /// is already public (nothing to encrypt).
    #[error("Nothing to encrypt: {0}")]
    NothingToEncrypt(String),

    /// A decryption operation was requested on a key that carries no
    /// secret material (nothing to decrypt).
    #[error("Nothing to decrypt: {0}")]
    NothingToDecrypt(String),

    /// [`cert::select::get_signing_key_packet`] (or the encryption
    /// counterpart) found no eligible key packet.
    #[error("No eligible signing key packet found")]
    SigningKeyNotFound,

    /// No primary user could be determined for this key.
    #[error("No primary user found")]
    PrimaryUserNotFound,
}
