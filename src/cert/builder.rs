//! The generator: produces a fresh private [`Key`], or reformats an
//! existing one's user IDs (§4.9).
//!
//! Actual key-material generation, and passphrase-based secret-key
//! encryption, are external collaborators (see the crate's
//! non-goals); this module only resolves algorithm choices, drives
//! the caller's `KeyPacket`/`SignaturePacket` factory methods in the
//! right order, and assembles the result through [`Key::build`].

use crate::cert::{Key, Packet};
use crate::packet::{KeyPacket, SignaturePacket, SignatureParams, SignedData};
use crate::policy::Policy;
use crate::types::{
    CompressionAlgorithm, Curve, Features, HashAlgorithm, KeyFlags, PublicKeyAlgorithm,
    SignatureType, SymmetricAlgorithm, Timestamp,
};
use crate::{Error, Result};

/// The primary key's algorithm choice (§4.9 step 1-2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// RSA (encrypt-or-sign), with the given modulus size in bits.
    Rsa(u32),
    /// ECDSA over the given curve.
    Ecdsa(Curve),
    /// EdDSA, always over Ed25519.
    EdDsa,
}

/// The subkey's algorithm choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubkeyType {
    /// RSA (encrypt-or-sign), with the given modulus size in bits.
    Rsa(u32),
    /// ECDH over the given curve.
    Ecdh(Curve),
}

/// Options for [`generate`] and [`reformat`].
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Explicit primary key type; derived from `curve` when absent.
    pub key_type: Option<KeyType>,
    /// Explicit subkey type; derived from the primary key's choice
    /// when absent.
    pub subkey_type: Option<SubkeyType>,
    /// The curve to use when `key_type`/`subkey_type` don't name one
    /// directly.
    pub curve: Option<Curve>,
    /// The user IDs to certify; the first becomes the primary user
    /// ID. Must be non-empty.
    pub user_ids: Vec<String>,
    /// If set, the secret portions of the generated packets are
    /// encrypted under this passphrase.
    pub passphrase: Option<Vec<u8>>,
    /// Whether the in-memory private parameters stay decrypted after
    /// a passphrase is applied. Implied `true` when no passphrase is
    /// given.
    pub unlocked: bool,
    /// Seconds after creation at which the key expires, or `None` for
    /// no expiration.
    pub key_expiration_time: Option<u64>,
    /// The creation timestamp for the generated packets and
    /// signatures.
    pub created: Timestamp,
}

impl GenerateOptions {
    /// A minimal option set: one user ID, Curve25519/Ed25519, no
    /// passphrase, no expiration.
    pub fn new(user_ids: Vec<String>, created: Timestamp) -> Self {
        GenerateOptions {
            key_type: None,
            subkey_type: None,
            curve: Some(Curve::Ed25519),
            user_ids,
            passphrase: None,
            unlocked: true,
            key_expiration_time: None,
            created,
        }
    }
}

struct ResolvedAlgorithms {
    primary_algo: PublicKeyAlgorithm,
    primary_curve: Option<Curve>,
    primary_bits: Option<u32>,
    subkey_algo: PublicKeyAlgorithm,
    subkey_curve: Option<Curve>,
    subkey_bits: Option<u32>,
}

/// §4.9 steps 1-2: resolve and validate the primary/subkey algorithm
/// choices.
fn resolve_algorithms(opts: &GenerateOptions) -> Result<ResolvedAlgorithms> {
    let (primary_algo, primary_curve, primary_bits) = match opts.key_type {
        Some(KeyType::Rsa(bits)) => (PublicKeyAlgorithm::RSAEncryptSign, None, Some(bits)),
        Some(KeyType::Ecdsa(curve)) => (PublicKeyAlgorithm::ECDSA, Some(curve), None),
        Some(KeyType::EdDsa) => (PublicKeyAlgorithm::EdDSA, Some(Curve::Ed25519), None),
        None => match opts.curve {
            Some(curve) if curve.implies_eddsa_primary() => {
                (PublicKeyAlgorithm::EdDSA, Some(Curve::Ed25519), None)
            }
            Some(curve) => (PublicKeyAlgorithm::ECDSA, Some(curve), None),
            None => {
                return Err(Error::UnsupportedKeyType(
                    "generate requires a key type or a curve".into(),
                )
                .into())
            }
        },
    };

    let (subkey_algo, subkey_curve, subkey_bits) = match opts.subkey_type {
        Some(SubkeyType::Rsa(bits)) => (PublicKeyAlgorithm::RSAEncryptSign, None, Some(bits)),
        Some(SubkeyType::Ecdh(curve)) => (PublicKeyAlgorithm::ECDH, Some(curve), None),
        None => match primary_algo {
            PublicKeyAlgorithm::RSAEncryptSign => {
                (PublicKeyAlgorithm::RSAEncryptSign, None, primary_bits)
            }
            // the primary/subkey curve swap: ed25519 primaries pair
            // with a curve25519 ECDH subkey and vice versa.
            PublicKeyAlgorithm::EdDSA => (PublicKeyAlgorithm::ECDH, Some(Curve::Curve25519), None),
            _ => (PublicKeyAlgorithm::ECDH, primary_curve, None),
        },
    };

    Ok(ResolvedAlgorithms {
        primary_algo,
        primary_curve,
        primary_bits,
        subkey_algo,
        subkey_curve,
        subkey_bits,
    })
}

/// §4.10's curve-floor rule, applied to a bare primary key packet
/// that has no certifications yet (so the "full Key" branch of
/// `getPreferredHashAlgo` never applies during generation).
fn preferred_hash_for_generation(curve: Option<Curve>, policy: &dyn Policy) -> HashAlgorithm {
    let configured = policy.prefer_hash_algorithm();
    match curve.and_then(|c| c.preferred_hash()) {
        Some(preferred)
            if preferred.digest_size().unwrap_or(0) >= configured.digest_size().unwrap_or(0) =>
        {
            preferred
        }
        _ => configured,
    }
}

const PREFERRED_SYMMETRIC: &[SymmetricAlgorithm] = &[
    SymmetricAlgorithm::AES256,
    SymmetricAlgorithm::AES128,
    SymmetricAlgorithm::AES192,
    SymmetricAlgorithm::CAST5,
    SymmetricAlgorithm::TripleDES,
];
const PREFERRED_HASH: &[HashAlgorithm] =
    &[HashAlgorithm::SHA256, HashAlgorithm::SHA512, HashAlgorithm::SHA1];
const PREFERRED_COMPRESSION: &[CompressionAlgorithm] =
    &[CompressionAlgorithm::Zlib, CompressionAlgorithm::Zip];

/// §4.9 steps 4-7: certify `user_ids` over `primary`, bind `subkey` (if
/// any), and assemble the packet sequence into a [`Key`].
fn assemble<K, S>(
    primary: K,
    subkey: Option<K>,
    primary_curve: Option<Curve>,
    opts: &GenerateOptions,
    policy: &dyn Policy,
) -> Result<Key<K, S>>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    if opts.user_ids.is_empty() {
        return Err(Error::InvalidArgument("generate requires at least one user ID".into()).into());
    }

    let hash_algorithm = preferred_hash_for_generation(primary_curve, policy);
    let mut packets = vec![Packet::Key(primary.clone())];

    for (i, userid) in opts.user_ids.iter().enumerate() {
        packets.push(Packet::UserId(userid.clone()));
        let params = SignatureParams {
            hash_algorithm,
            created: opts.created,
            key_flags: Some(KeyFlags::empty().set_certify(true).set_sign(true)),
            key_expiration_time: opts.key_expiration_time,
            key_never_expires: opts.key_expiration_time.is_none(),
            primary_user_id: i == 0,
            preferred_hash_algorithms: PREFERRED_HASH.to_vec(),
            preferred_symmetric_algorithms: PREFERRED_SYMMETRIC.to_vec(),
            preferred_compression_algorithms: PREFERRED_COMPRESSION.to_vec(),
            features: if policy.integrity_protect() {
                Some(Features::empty().set_modification_detection(true))
            } else {
                None
            },
        };
        let cert = S::sign(
            &primary,
            SignatureType::PositiveCertification,
            SignedData::User { key: &primary, userid: userid.as_str() },
            params,
        )?;
        packets.push(Packet::Signature(cert));
    }

    if let Some(subkey) = &subkey {
        let params = SignatureParams {
            hash_algorithm,
            created: opts.created,
            key_flags: Some(
                KeyFlags::empty()
                    .set_encrypt_communication(true)
                    .set_encrypt_storage(true),
            ),
            key_expiration_time: opts.key_expiration_time,
            key_never_expires: opts.key_expiration_time.is_none(),
            primary_user_id: false,
            preferred_hash_algorithms: Vec::new(),
            preferred_symmetric_algorithms: Vec::new(),
            preferred_compression_algorithms: Vec::new(),
            features: None,
        };
        packets.push(Packet::Subkey(subkey.clone()));
        let binding = S::sign(
            &primary,
            SignatureType::SubkeyBinding,
            SignedData::Binding { key: &primary, bound: subkey },
            params,
        )?;
        packets.push(Packet::Signature(binding));
    }

    Key::build(packets)
}

fn lock_secrets<K, S>(key: &mut Key<K, S>, passphrase: &[u8], unlocked: bool) -> Result<()>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    key.primary_key = key.primary_key.encrypt(passphrase, !unlocked)?;
    for sub in &mut key.sub_keys {
        sub.packet = sub.packet.encrypt(passphrase, !unlocked)?;
    }
    Ok(())
}

/// `generate(opts)`: produces a fresh private [`Key`].
pub fn generate<K, S>(opts: &GenerateOptions, policy: &dyn Policy) -> Result<Key<K, S>>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let resolved = resolve_algorithms(opts)?;

    let primary = K::generate(
        resolved.primary_algo,
        resolved.primary_bits,
        resolved.primary_curve,
        opts.created,
    )?;
    let subkey = Some(K::generate(
        resolved.subkey_algo,
        resolved.subkey_bits,
        resolved.subkey_curve,
        opts.created,
    )?);

    let mut key = assemble(primary, subkey, resolved.primary_curve, opts, policy)?;

    if let Some(passphrase) = &opts.passphrase {
        lock_secrets(&mut key, passphrase, opts.unlocked)?;
    }

    Ok(key)
}

/// `reformat(opts)`: reuses an existing decrypted private key's
/// primary and (optional) subkey packets, rerunning steps 4-7 with
/// new user IDs. Only RSA primaries are accepted, matching the source
/// behaviour.
pub fn reformat<K, S>(
    existing: &Key<K, S>,
    opts: &GenerateOptions,
    policy: &dyn Policy,
) -> Result<Key<K, S>>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    if existing.primary_key.algorithm() != PublicKeyAlgorithm::RSAEncryptSign {
        return Err(Error::UnsupportedKeyType(
            "reformat only supports RSA primary keys".into(),
        )
        .into());
    }
    if !existing.primary_key.is_decrypted() {
        return Err(Error::NotDecrypted.into());
    }

    let primary = existing.primary_key.clone();
    let subkey = existing.sub_keys.first().map(|sk| sk.packet.clone());

    let mut key = assemble(primary, subkey, None, opts, policy)?;

    if let Some(passphrase) = &opts.passphrase {
        lock_secrets(&mut key, passphrase, opts.unlocked)?;
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::StandardPolicy;
    use crate::tests::{TestKeyPacket, TestSignaturePacket};

    #[test]
    fn generate_produces_a_valid_signing_and_encryption_capable_key() {
        let opts = GenerateOptions::new(vec!["Alice <a@x>".into()], Timestamp::from(1000));
        let policy = StandardPolicy::new();
        let mut key: Key<TestKeyPacket, TestSignaturePacket> =
            generate(&opts, &policy).expect("generation should succeed");

        assert_eq!(key.primary_key.algorithm(), PublicKeyAlgorithm::EdDSA);
        assert_eq!(key.sub_keys.len(), 1);
        assert_eq!(key.sub_keys[0].packet.algorithm(), PublicKeyAlgorithm::ECDH);
        assert_eq!(key.users.len(), 1);

        let status = crate::cert::validate::verify_primary_key(&mut key, &policy, Timestamp::from(2000));
        assert_eq!(status, crate::types::KeyStatus::Valid);

        let signer = crate::cert::select::get_signing_key_packet(&mut key, None, &policy, Timestamp::from(2000));
        assert!(signer.is_some());
        let encryptor =
            crate::cert::select::get_encryption_key_packet(&mut key, None, &policy, Timestamp::from(2000));
        assert_eq!(encryptor.unwrap().key_id(), key.sub_keys[0].packet.key_id());
    }

    #[test]
    fn generate_honors_explicit_rsa_primary_with_ecdh_subkey() {
        let mut opts = GenerateOptions::new(vec!["Alice <a@x>".into()], Timestamp::from(1000));
        opts.key_type = Some(KeyType::Rsa(2048));
        opts.subkey_type = Some(SubkeyType::Ecdh(Curve::Curve25519));
        let policy = StandardPolicy::new();
        let key: Key<TestKeyPacket, TestSignaturePacket> =
            generate(&opts, &policy).expect("generation should succeed");
        assert_eq!(key.primary_key.algorithm(), PublicKeyAlgorithm::RSAEncryptSign);
        assert_eq!(key.sub_keys[0].packet.algorithm(), PublicKeyAlgorithm::ECDH);
    }

    #[test]
    fn generate_requires_at_least_one_user_id() {
        let opts = GenerateOptions::new(vec![], Timestamp::from(1000));
        let policy = StandardPolicy::new();
        let key: Result<Key<TestKeyPacket, TestSignaturePacket>> = generate(&opts, &policy);
        assert!(key.is_err());
    }

    #[test]
    fn passphrase_without_unlocked_locks_the_secret_material() {
        let mut opts = GenerateOptions::new(vec!["Alice <a@x>".into()], Timestamp::from(1000));
        opts.passphrase = Some(b"hunter2".to_vec());
        opts.unlocked = false;
        let policy = StandardPolicy::new();
        let key: Key<TestKeyPacket, TestSignaturePacket> =
            generate(&opts, &policy).expect("generation should succeed");
        assert!(!key.primary_key.is_decrypted());
        assert!(!key.sub_keys[0].packet.is_decrypted());
    }

    #[test]
    fn generated_key_expires_exactly_at_its_boundary() {
        let mut opts = GenerateOptions::new(vec!["Alice <a@x>".into()], Timestamp::from(1000));
        opts.key_expiration_time = Some(1000);
        let policy = StandardPolicy::new();
        let mut key: Key<TestKeyPacket, TestSignaturePacket> =
            generate(&opts, &policy).expect("generation should succeed");

        let just_before = crate::cert::validate::verify_primary_key(&mut key, &policy, Timestamp::from(1999));
        assert_eq!(just_before, crate::types::KeyStatus::Valid);

        let at_boundary = crate::cert::validate::verify_primary_key(&mut key, &policy, Timestamp::from(2000));
        assert_eq!(at_boundary, crate::types::KeyStatus::Expired);
    }
}
