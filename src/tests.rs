//! Hand-built `KeyPacket`/`SignaturePacket` fixtures used across the
//! crate's unit tests.
//!
//! These stand in for the cryptographic primitives this crate treats
//! as external collaborators: `TestSignaturePacket::verify` simply
//! returns whatever `verified` flag the test set up beforehand, rather
//! than performing any real signature check. This lets the validation,
//! merge, and generation engines be exercised deterministically
//! without linking in an actual OpenPGP codec.

use crate::fingerprint::Fingerprint;
use crate::keyid::KeyID;
use crate::packet::{KeyPacket, SignaturePacket, SignatureParams, SignedData};
use crate::types::{
    CompressionAlgorithm, Curve, Features, HashAlgorithm, KeyFlags, PublicKeyAlgorithm,
    SignatureType, SymmetricAlgorithm, Timestamp,
};
use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct TestKeyPacket {
    algorithm: PublicKeyAlgorithm,
    created: Timestamp,
    id: u64,
    secret: bool,
    decrypted: bool,
    oid: Vec<u8>,
}

impl TestKeyPacket {
    pub fn new(algorithm: PublicKeyAlgorithm, id: u64, secret: bool) -> Self {
        TestKeyPacket {
            algorithm,
            created: Timestamp::from(0),
            id,
            secret,
            decrypted: true,
            oid: Vec::new(),
        }
    }

    pub fn with_created(mut self, t: Timestamp) -> Self {
        self.created = t;
        self
    }

    pub fn with_oid(mut self, oid: Vec<u8>) -> Self {
        self.oid = oid;
        self
    }

    pub fn oid(&self) -> &[u8] {
        &self.oid
    }
}

impl KeyPacket for TestKeyPacket {
    fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    fn version(&self) -> u8 {
        4
    }

    fn created(&self) -> Timestamp {
        self.created
    }

    fn key_id(&self) -> KeyID {
        KeyID::from_bytes(&self.id.to_be_bytes())
    }

    fn fingerprint(&self) -> Fingerprint {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&self.id.to_be_bytes());
        Fingerprint::from_bytes(&bytes)
    }

    fn expiration_time_v3(&self) -> Option<u16> {
        None
    }

    fn is_secret(&self) -> bool {
        self.secret
    }

    fn is_decrypted(&self) -> bool {
        self.decrypted
    }

    fn clear_private_params(&self) -> Self {
        let mut copy = self.clone();
        copy.secret = false;
        copy.decrypted = false;
        copy
    }

    fn generate(
        algorithm: PublicKeyAlgorithm,
        _num_bits: Option<u32>,
        curve: Option<Curve>,
        created: Timestamp,
    ) -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let mut key = TestKeyPacket::new(algorithm, id, true).with_created(created);
        if let Some(curve) = curve {
            key = key.with_oid(curve.oid().to_vec());
        }
        Ok(key)
    }

    fn encrypt(&self, passphrase: &[u8], lock: bool) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(Error::InvalidArgument("passphrase must not be empty".into()).into());
        }
        let mut copy = self.clone();
        copy.decrypted = !lock;
        Ok(copy)
    }

    fn decrypt(&self, passphrase: &[u8]) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(Error::InvalidArgument("passphrase must not be empty".into()).into());
        }
        let mut copy = self.clone();
        copy.decrypted = true;
        Ok(copy)
    }
}

#[derive(Clone, Debug)]
pub struct TestSignaturePacket {
    sig_type: SignatureType,
    issuer: KeyID,
    created: Timestamp,
    verified: bool,
    revoked: bool,
    key_flags: Option<KeyFlags>,
    key_expiration_time: Option<u64>,
    key_never_expires: bool,
    primary_user_id_weight: Option<u32>,
    preferred_hash: Vec<HashAlgorithm>,
    preferred_sym: Vec<SymmetricAlgorithm>,
    preferred_compression: Vec<CompressionAlgorithm>,
    features: Option<Features>,
    expired: bool,
    bytes: Vec<u8>,
}

impl TestSignaturePacket {
    pub fn new(sig_type: SignatureType, issuer: KeyID) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
        TestSignaturePacket {
            sig_type,
            issuer,
            created: Timestamp::from(0),
            verified: false,
            revoked: false,
            key_flags: None,
            key_expiration_time: None,
            key_never_expires: false,
            primary_user_id_weight: None,
            preferred_hash: Vec::new(),
            preferred_sym: Vec::new(),
            preferred_compression: Vec::new(),
            features: None,
            expired: false,
            bytes: unique.to_be_bytes().to_vec(),
        }
    }

    /// Overrides the synthetic raw bytes, letting a test construct two
    /// logically-identical signatures that the merge engine's
    /// raw-byte dedup should collapse into one.
    pub fn set_raw_bytes(&mut self, bytes: Vec<u8>) {
        self.bytes = bytes;
    }

    pub fn set_verified(&mut self, v: bool) {
        self.verified = v;
    }

    pub fn set_created(&mut self, t: Timestamp) {
        self.created = t;
    }

    pub fn set_primary_user_id_weight(&mut self, w: Option<u32>) {
        self.primary_user_id_weight = w;
    }

    pub fn set_expired(&mut self, v: bool) {
        self.expired = v;
    }

    pub fn set_key_flags(&mut self, flags: KeyFlags) {
        self.key_flags = Some(flags);
    }

    pub fn set_key_expiration_time(&mut self, secs: Option<u64>) {
        self.key_expiration_time = secs;
    }

    pub fn set_key_never_expires(&mut self, v: bool) {
        self.key_never_expires = v;
    }

    pub fn set_preferred_hash_algorithms(&mut self, v: Vec<HashAlgorithm>) {
        self.preferred_hash = v;
    }

    pub fn set_preferred_symmetric_algorithms(&mut self, v: Vec<SymmetricAlgorithm>) {
        self.preferred_sym = v;
    }

    pub fn set_preferred_compression_algorithms(&mut self, v: Vec<CompressionAlgorithm>) {
        self.preferred_compression = v;
    }

    pub fn set_features(&mut self, f: Option<Features>) {
        self.features = f;
    }
}

impl SignaturePacket for TestSignaturePacket {
    type Key = TestKeyPacket;

    fn signature_type(&self) -> SignatureType {
        self.sig_type
    }

    fn issuer_key_id(&self) -> KeyID {
        self.issuer.clone()
    }

    fn created(&self) -> Timestamp {
        self.created
    }

    fn key_flags(&self) -> Option<KeyFlags> {
        self.key_flags
    }

    fn key_expiration_time(&self) -> Option<u64> {
        self.key_expiration_time
    }

    fn key_never_expires(&self) -> bool {
        self.key_never_expires
    }

    fn primary_user_id_weight(&self) -> Option<u32> {
        self.primary_user_id_weight
    }

    fn preferred_hash_algorithms(&self) -> &[HashAlgorithm] {
        &self.preferred_hash
    }

    fn preferred_symmetric_algorithms(&self) -> &[SymmetricAlgorithm] {
        &self.preferred_sym
    }

    fn preferred_compression_algorithms(&self) -> &[CompressionAlgorithm] {
        &self.preferred_compression
    }

    fn verified(&self) -> bool {
        self.verified
    }

    fn revoked(&self) -> bool {
        self.revoked
    }

    fn set_revoked(&mut self, revoked: bool) {
        self.revoked = revoked;
    }

    fn raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn features(&self) -> Option<Features> {
        self.features
    }

    fn verify(
        &mut self,
        _verifying_key: &TestKeyPacket,
        _data: SignedData<'_, TestKeyPacket>,
    ) -> Result<bool> {
        Ok(self.verified)
    }

    fn sign(
        signing_key: &TestKeyPacket,
        signature_type: SignatureType,
        _data: SignedData<'_, TestKeyPacket>,
        params: SignatureParams,
    ) -> Result<Self> {
        let mut sig = TestSignaturePacket::new(signature_type, signing_key.key_id());
        sig.verified = true;
        sig.created = params.created;
        sig.key_flags = params.key_flags;
        sig.key_expiration_time = params.key_expiration_time;
        sig.key_never_expires = params.key_never_expires;
        sig.primary_user_id_weight = if params.primary_user_id { Some(1) } else { None };
        sig.preferred_hash = params.preferred_hash_algorithms;
        sig.preferred_sym = params.preferred_symmetric_algorithms;
        sig.preferred_compression = params.preferred_compression_algorithms;
        sig.features = params.features;
        Ok(sig)
    }

    fn is_expired(&self, _now: Timestamp) -> bool {
        self.expired
    }
}
