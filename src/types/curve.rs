//! The named-curve registry.
//!
//! For each curve this crate supports we publish the DER-encoded OID
//! (used both on the wire and as the lookup key in the bidirectional
//! name map), the key category it belongs to, and its preferred hash
//! and symmetric cipher — the parameters §4.10 and the generator
//! (§4.9) need to pick sane defaults without consulting an external
//! table at every call site.

use crate::types::{HashAlgorithm, SymmetricAlgorithm};
use crate::{Error, Result};

/// The category of key material a curve is used with.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CurveCategory {
    /// ECDSA or ECDH (Weierstrass curves).
    Weierstrass,
    /// EdDSA (Ed25519) signing.
    EdDSA,
    /// X25519 Diffie-Hellman (Curve25519, used only for ECDH).
    Montgomery,
}

/// A named elliptic curve.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Curve {
    NistP256,
    NistP384,
    NistP521,
    Secp256k1,
    Ed25519,
    Curve25519,
    BrainpoolP256r1,
    BrainpoolP384r1,
    BrainpoolP512r1,
    /// An OID this registry does not recognize.
    Unknown(&'static [u8]),
}

struct CurveInfo {
    curve: Curve,
    oid: &'static [u8],
    category: CurveCategory,
    preferred_hash: HashAlgorithm,
    preferred_symmetric: SymmetricAlgorithm,
    payload_size: usize,
}

// DER-encoded OIDs, as they appear in the public-key MPI/OID parameter
// shape of §4.10.
const REGISTRY: &[CurveInfo] = &[
    CurveInfo {
        curve: Curve::NistP256,
        oid: &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07],
        category: CurveCategory::Weierstrass,
        preferred_hash: HashAlgorithm::SHA256,
        preferred_symmetric: SymmetricAlgorithm::AES128,
        payload_size: 32,
    },
    CurveInfo {
        curve: Curve::NistP384,
        oid: &[0x2B, 0x81, 0x04, 0x00, 0x22],
        category: CurveCategory::Weierstrass,
        preferred_hash: HashAlgorithm::SHA384,
        preferred_symmetric: SymmetricAlgorithm::AES192,
        payload_size: 48,
    },
    CurveInfo {
        curve: Curve::NistP521,
        oid: &[0x2B, 0x81, 0x04, 0x00, 0x23],
        category: CurveCategory::Weierstrass,
        preferred_hash: HashAlgorithm::SHA512,
        preferred_symmetric: SymmetricAlgorithm::AES256,
        payload_size: 66,
    },
    CurveInfo {
        curve: Curve::Secp256k1,
        oid: &[0x2B, 0x81, 0x04, 0x00, 0x0A],
        category: CurveCategory::Weierstrass,
        preferred_hash: HashAlgorithm::SHA256,
        preferred_symmetric: SymmetricAlgorithm::AES128,
        payload_size: 32,
    },
    CurveInfo {
        curve: Curve::Ed25519,
        oid: &[0x2B, 0x06, 0x01, 0x04, 0x01, 0xDA, 0x47, 0x0F, 0x01],
        category: CurveCategory::EdDSA,
        preferred_hash: HashAlgorithm::SHA512,
        preferred_symmetric: SymmetricAlgorithm::AES256,
        payload_size: 32,
    },
    CurveInfo {
        curve: Curve::Curve25519,
        oid: &[0x2B, 0x06, 0x01, 0x04, 0x01, 0x97, 0x55, 0x01, 0x05, 0x01],
        category: CurveCategory::Montgomery,
        preferred_hash: HashAlgorithm::SHA256,
        preferred_symmetric: SymmetricAlgorithm::AES128,
        payload_size: 32,
    },
    CurveInfo {
        curve: Curve::BrainpoolP256r1,
        oid: &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x07],
        category: CurveCategory::Weierstrass,
        preferred_hash: HashAlgorithm::SHA256,
        preferred_symmetric: SymmetricAlgorithm::AES128,
        payload_size: 32,
    },
    CurveInfo {
        curve: Curve::BrainpoolP384r1,
        oid: &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0B],
        category: CurveCategory::Weierstrass,
        preferred_hash: HashAlgorithm::SHA384,
        preferred_symmetric: SymmetricAlgorithm::AES192,
        payload_size: 48,
    },
    CurveInfo {
        curve: Curve::BrainpoolP512r1,
        oid: &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0D],
        category: CurveCategory::Weierstrass,
        preferred_hash: HashAlgorithm::SHA512,
        preferred_symmetric: SymmetricAlgorithm::AES256,
        payload_size: 64,
    },
];

fn lookup(curve: Curve) -> Option<&'static CurveInfo> {
    REGISTRY.iter().find(|info| info.curve == curve)
}

impl Curve {
    /// Looks up a curve by its user-facing name, as accepted by the
    /// generator's `curve` option (§4.9).
    pub fn by_name(name: &str) -> Result<Curve> {
        let curve = match name {
            "nistp256" | "p256" => Curve::NistP256,
            "nistp384" | "p384" => Curve::NistP384,
            "nistp521" | "p521" => Curve::NistP521,
            "secp256k1" => Curve::Secp256k1,
            "ed25519" => Curve::Ed25519,
            "curve25519" | "cv25519" => Curve::Curve25519,
            "brainpoolP256r1" => Curve::BrainpoolP256r1,
            "brainpoolP384r1" => Curve::BrainpoolP384r1,
            "brainpoolP512r1" => Curve::BrainpoolP512r1,
            _ => return Err(Error::UnknownCurve(name.to_string()).into()),
        };
        Ok(curve)
    }

    /// Looks up a curve by its DER-encoded OID bytes, as they appear
    /// in a parsed public-key parameter vector.
    pub fn by_oid(oid: &[u8]) -> Curve {
        match REGISTRY.iter().find(|info| info.oid == oid) {
            Some(info) => info.curve,
            None => Curve::Unknown(&[]),
        }
    }

    /// The DER-encoded OID, used both for on-wire representation and
    /// as the canonical key in the enum map (§4.10).
    pub fn oid(&self) -> &'static [u8] {
        match self {
            Curve::Unknown(oid) => oid,
            curve => lookup(*curve).map(|i| i.oid).unwrap_or(&[]),
        }
    }

    /// ECDSA/ECDH vs EdDSA vs Montgomery (X25519-only).
    pub fn category(&self) -> Option<CurveCategory> {
        lookup(*self).map(|i| i.category)
    }

    /// The curve's preferred hash algorithm, used as a floor by
    /// `getPreferredHashAlgo` (§4.10).
    pub fn preferred_hash(&self) -> Option<HashAlgorithm> {
        lookup(*self).map(|i| i.preferred_hash)
    }

    /// The curve's preferred symmetric cipher.
    pub fn preferred_symmetric(&self) -> Option<SymmetricAlgorithm> {
        lookup(*self).map(|i| i.preferred_symmetric)
    }

    /// The size, in bytes, of a scalar or point payload on this curve.
    pub fn payload_size(&self) -> Option<usize> {
        lookup(*self).map(|i| i.payload_size)
    }

    /// Whether this curve, when used as a primary-key algorithm
    /// choice in the generator, implies EdDSA (`ed25519`) rather than
    /// ECDSA, and implies `curve25519` for the paired ECDH subkey
    /// (§4.9 step 1 and step 3's primary/subkey curve swap).
    pub fn implies_eddsa_primary(&self) -> bool {
        matches!(self, Curve::Ed25519 | Curve::Curve25519)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ed25519_oid_matches_scenario_s2() {
        assert_eq!(
            Curve::Ed25519.oid(),
            &[0x2B, 0x06, 0x01, 0x04, 0x01, 0xDA, 0x47, 0x0F, 0x01]
        );
        assert_eq!(
            Curve::Curve25519.oid(),
            &[0x2B, 0x06, 0x01, 0x04, 0x01, 0x97, 0x55, 0x01, 0x05, 0x01]
        );
    }

    #[test]
    fn by_oid_round_trips() {
        for info in REGISTRY {
            assert_eq!(Curve::by_oid(info.oid), info.curve);
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(Curve::by_name("not-a-curve").is_err());
    }
}
