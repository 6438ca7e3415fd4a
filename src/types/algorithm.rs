//! Stable numeric algorithm and packet identifiers.
//!
//! These mirror the registries of [Section 9 of RFC 4880] and [RFC
//! 6637].  Each enum carries an `Unknown(u8)` catch-all so that a
//! value we don't recognize can still round-trip through the
//! bidirectional `From<u8>`/`Into<u8>` conversion instead of being
//! rejected outright.
//!
//! [Section 9 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-9

use std::fmt;

/// An OpenPGP public key algorithm identifier.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum PublicKeyAlgorithm {
    /// RSA (Encrypt or Sign).
    RSAEncryptSign,
    /// RSA Encrypt-Only.
    RSAEncrypt,
    /// RSA Sign-Only.
    RSASign,
    /// Elgamal (Encrypt-Only).
    ElgamalEncrypt,
    /// DSA (Digital Signature Algorithm).
    DSA,
    /// Elliptic curve DH.
    ECDH,
    /// Elliptic curve DSA.
    ECDSA,
    /// Elgamal (Encrypt or Sign).
    ElgamalEncryptSign,
    /// "Twisted" Edwards curve DSA.
    EdDSA,
    /// Unknown algorithm.
    Unknown(u8),
}

impl fmt::Display for PublicKeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<u8> for PublicKeyAlgorithm {
    fn from(u: u8) -> Self {
        use PublicKeyAlgorithm::*;
        match u {
            1 => RSAEncryptSign,
            2 => RSAEncrypt,
            3 => RSASign,
            16 => ElgamalEncrypt,
            17 => DSA,
            18 => ECDH,
            19 => ECDSA,
            20 => ElgamalEncryptSign,
            22 => EdDSA,
            u => Unknown(u),
        }
    }
}

impl From<PublicKeyAlgorithm> for u8 {
    fn from(a: PublicKeyAlgorithm) -> Self {
        use PublicKeyAlgorithm::*;
        match a {
            RSAEncryptSign => 1,
            RSAEncrypt => 2,
            RSASign => 3,
            ElgamalEncrypt => 16,
            DSA => 17,
            ECDH => 18,
            ECDSA => 19,
            ElgamalEncryptSign => 20,
            EdDSA => 22,
            Unknown(u) => u,
        }
    }
}

impl PublicKeyAlgorithm {
    /// Whether this algorithm can be used to produce signatures.
    ///
    /// Grounds the eligibility filter of the operation selector
    /// (`getSigningKeyPacket` excludes RSA-encrypt-only, Elgamal, and
    /// ECDH; `getEncryptionKeyPacket` excludes DSA, RSA-sign-only,
    /// ECDSA, and EdDSA).
    pub fn is_signing_capable(&self) -> bool {
        use PublicKeyAlgorithm::*;
        !matches!(self, RSAEncrypt | ElgamalEncrypt | ECDH)
    }

    /// Whether this algorithm can be used to encrypt a session key.
    pub fn is_encryption_capable(&self) -> bool {
        use PublicKeyAlgorithm::*;
        !matches!(self, DSA | RSASign | ECDSA | EdDSA)
    }
}

/// An OpenPGP hash algorithm identifier.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum HashAlgorithm {
    MD5,
    SHA1,
    RipeMD,
    SHA256,
    SHA384,
    SHA512,
    SHA224,
    Unknown(u8),
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<u8> for HashAlgorithm {
    fn from(u: u8) -> Self {
        use HashAlgorithm::*;
        match u {
            1 => MD5,
            2 => SHA1,
            3 => RipeMD,
            8 => SHA256,
            9 => SHA384,
            10 => SHA512,
            11 => SHA224,
            u => Unknown(u),
        }
    }
}

impl From<HashAlgorithm> for u8 {
    fn from(a: HashAlgorithm) -> Self {
        use HashAlgorithm::*;
        match a {
            MD5 => 1,
            SHA1 => 2,
            RipeMD => 3,
            SHA256 => 8,
            SHA384 => 9,
            SHA512 => 10,
            SHA224 => 11,
            Unknown(u) => u,
        }
    }
}

impl HashAlgorithm {
    /// Digest length in bytes, used by the "hash-length ≥" preference
    /// negotiation rules of `getPreferredHashAlgo`.
    pub fn digest_size(&self) -> Option<usize> {
        use HashAlgorithm::*;
        match self {
            MD5 => Some(16),
            SHA1 => Some(20),
            RipeMD => Some(20),
            SHA224 => Some(28),
            SHA256 => Some(32),
            SHA384 => Some(48),
            SHA512 => Some(64),
            Unknown(_) => None,
        }
    }
}

/// An OpenPGP symmetric cipher algorithm identifier.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum SymmetricAlgorithm {
    Plaintext,
    IDEA,
    TripleDES,
    CAST5,
    Blowfish,
    AES128,
    AES192,
    AES256,
    Twofish,
    Camellia128,
    Camellia192,
    Camellia256,
    Unknown(u8),
}

impl fmt::Display for SymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<u8> for SymmetricAlgorithm {
    fn from(u: u8) -> Self {
        use SymmetricAlgorithm::*;
        match u {
            0 => Plaintext,
            1 => IDEA,
            2 => TripleDES,
            3 => CAST5,
            4 => Blowfish,
            7 => AES128,
            8 => AES192,
            9 => AES256,
            10 => Twofish,
            11 => Camellia128,
            12 => Camellia192,
            13 => Camellia256,
            u => Unknown(u),
        }
    }
}

impl From<SymmetricAlgorithm> for u8 {
    fn from(a: SymmetricAlgorithm) -> Self {
        use SymmetricAlgorithm::*;
        match a {
            Plaintext => 0,
            IDEA => 1,
            TripleDES => 2,
            CAST5 => 3,
            Blowfish => 4,
            AES128 => 7,
            AES192 => 8,
            AES256 => 9,
            Twofish => 10,
            Camellia128 => 11,
            Camellia192 => 12,
            Camellia256 => 13,
            Unknown(u) => u,
        }
    }
}

/// An OpenPGP compression algorithm identifier.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum CompressionAlgorithm {
    Uncompressed,
    Zip,
    Zlib,
    BZip2,
    Unknown(u8),
}

impl From<u8> for CompressionAlgorithm {
    fn from(u: u8) -> Self {
        use CompressionAlgorithm::*;
        match u {
            0 => Uncompressed,
            1 => Zip,
            2 => Zlib,
            3 => BZip2,
            u => Unknown(u),
        }
    }
}

impl From<CompressionAlgorithm> for u8 {
    fn from(a: CompressionAlgorithm) -> Self {
        use CompressionAlgorithm::*;
        match a {
            Uncompressed => 0,
            Zip => 1,
            Zlib => 2,
            BZip2 => 3,
            Unknown(u) => u,
        }
    }
}

/// The packet tag set this crate's structure builder dispatches on.
///
/// Unlike the full RFC 4880 tag registry, we only name the tags that
/// make up a transferable key; everything else is out of scope (see
/// the non-goals in `SPEC_FULL.md`).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Tag {
    PublicKey,
    SecretKey,
    PublicSubkey,
    SecretSubkey,
    UserID,
    UserAttribute,
    Signature,
}

/// The signature type byte, [Section 5.2.1 of RFC 4880].
///
/// [Section 5.2.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.1
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum SignatureType {
    Binary,
    Text,
    GenericCertification,
    PersonaCertification,
    CasualCertification,
    PositiveCertification,
    SubkeyBinding,
    PrimaryKeyBinding,
    DirectKey,
    KeyRevocation,
    SubkeyRevocation,
    CertificationRevocation,
    Unknown(u8),
}

impl SignatureType {
    /// Whether this type certifies a (key, user) pair — one of the
    /// four `cert_*` types of §4.1's dispatch table.
    pub fn is_certification(&self) -> bool {
        use SignatureType::*;
        matches!(
            self,
            GenericCertification
                | PersonaCertification
                | CasualCertification
                | PositiveCertification
        )
    }
}

impl From<u8> for SignatureType {
    fn from(u: u8) -> Self {
        use SignatureType::*;
        match u {
            0x00 => Binary,
            0x01 => Text,
            0x10 => GenericCertification,
            0x11 => PersonaCertification,
            0x12 => CasualCertification,
            0x13 => PositiveCertification,
            0x18 => SubkeyBinding,
            0x19 => PrimaryKeyBinding,
            0x1f => DirectKey,
            0x20 => KeyRevocation,
            0x28 => SubkeyRevocation,
            0x30 => CertificationRevocation,
            u => Unknown(u),
        }
    }
}

impl From<SignatureType> for u8 {
    fn from(t: SignatureType) -> Self {
        use SignatureType::*;
        match t {
            Binary => 0x00,
            Text => 0x01,
            GenericCertification => 0x10,
            PersonaCertification => 0x11,
            CasualCertification => 0x12,
            PositiveCertification => 0x13,
            SubkeyBinding => 0x18,
            PrimaryKeyBinding => 0x19,
            DirectKey => 0x1f,
            KeyRevocation => 0x20,
            SubkeyRevocation => 0x28,
            CertificationRevocation => 0x30,
            Unknown(u) => u,
        }
    }
}

/// The result of validating a primary key or subkey against its
/// signatures (§4.5, §4.6).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeyStatus {
    Valid,
    Revoked,
    NoSelfCert,
    Invalid,
    Expired,
}
