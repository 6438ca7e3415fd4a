//! The merge engine: an idempotent, order-independent union of two
//! structurally-equal keys.

use crate::cert::{Key, User};
use crate::packet::{KeyPacket, SignaturePacket, SignedData};
use crate::policy::Policy;
use crate::types::Timestamp;
use crate::{Error, Result};

fn dedup_push<S: SignaturePacket>(dst: &mut Vec<S>, candidate: S) {
    if !dst.iter().any(|s| s.raw_bytes() == candidate.raw_bytes()) {
        dst.push(candidate);
    }
}

/// Merges `src` into `dst`'s binding signatures such that at most one
/// effective binding per issuer Key ID survives: when `src` and an
/// existing binding share an issuer, the later-`created` one wins.
fn merge_bindings<S: SignaturePacket>(dst: &mut Vec<S>, src: Vec<S>) {
    for candidate in src {
        if dst.iter().any(|s| s.raw_bytes() == candidate.raw_bytes()) {
            continue;
        }
        if let Some(pos) = dst
            .iter()
            .position(|s| s.issuer_key_id() == candidate.issuer_key_id())
        {
            if candidate.created() > dst[pos].created() {
                dst[pos] = candidate;
            }
        } else {
            dst.push(candidate);
        }
    }
}

fn merge_user<K, S>(dst: &mut User<K, S>, src: User<K, S>)
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    for cert in src.self_certifications {
        if cert.verified() {
            dedup_push(&mut dst.self_certifications, cert);
        }
    }
    for cert in src.other_certifications {
        dedup_push(&mut dst.other_certifications, cert);
    }
    for rev in src.revocation_signatures {
        if rev.verified() {
            dedup_push(&mut dst.revocation_signatures, rev);
        }
    }
}

fn users_match<K: KeyPacket, S: SignaturePacket<Key = K>>(a: &User<K, S>, b: &User<K, S>) -> bool {
    use crate::cert::UserPacket::*;
    match (&a.packet, &b.packet) {
        (Id(x), Id(y)) => x == y,
        (Attribute(x), Attribute(y)) => x == y,
        _ => false,
    }
}

/// `update`: merges `src` into `self` in place.
///
/// Returns `Ok(())` both when the merge succeeds and when `src` is
/// silently ignored because it fails `verifyPrimaryKey` — only a
/// structural precondition failure (fingerprint mismatch, or a public
/// `self` whose subkey set doesn't match a private `src`'s) raises.
pub fn update<K, S>(
    dst: &mut Key<K, S>,
    mut src: Key<K, S>,
    policy: &dyn Policy,
    at: Timestamp,
) -> Result<()>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    use crate::types::KeyStatus;
    if super::validate::verify_primary_key(&mut src, policy, at) == KeyStatus::Invalid {
        return Ok(());
    }

    if dst.primary_key.fingerprint() != src.primary_key.fingerprint() {
        return Err(Error::FingerprintMismatch.into());
    }

    if dst.is_public() && src.is_private() {
        let mut dst_fprs: Vec<_> = dst.sub_keys.iter().map(|s| s.packet.fingerprint()).collect();
        let mut src_fprs: Vec<_> = src.sub_keys.iter().map(|s| s.packet.fingerprint()).collect();
        dst_fprs.sort_by_key(|f| f.as_slice().to_vec());
        src_fprs.sort_by_key(|f| f.as_slice().to_vec());
        if dst_fprs != src_fprs {
            return Err(Error::SubkeyMismatch.into());
        }
        dst.primary_key = src.primary_key.clone();
    }

    for mut rev in src.revocation_signatures {
        if rev.is_expired(at) {
            continue;
        }
        let verified = rev
            .verify(&dst.primary_key, SignedData::DirectKey { key: &dst.primary_key })
            .unwrap_or(false);
        if !verified {
            continue;
        }
        dedup_push(&mut dst.revocation_signatures, rev);
    }

    for sig in src.direct_signatures {
        dedup_push(&mut dst.direct_signatures, sig);
    }

    for src_user in src.users {
        if let Some(dst_user) = dst.users.iter_mut().find(|u| users_match(u, &src_user)) {
            merge_user(dst_user, src_user);
        } else {
            dst.users.push(src_user);
        }
    }

    for src_sub in src.sub_keys {
        let matching = dst
            .sub_keys
            .iter_mut()
            .find(|sk| sk.packet.fingerprint() == src_sub.packet.fingerprint());
        match matching {
            Some(dst_sub) => {
                merge_bindings(&mut dst_sub.binding_signatures, src_sub.binding_signatures);
                for rev in src_sub.revocation_signatures {
                    dedup_push(&mut dst_sub.revocation_signatures, rev);
                }
            }
            None => dst.sub_keys.push(src_sub),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::UserPacket;
    use crate::keyid::KeyID;
    use crate::policy::StandardPolicy;
    use crate::tests::{TestKeyPacket, TestSignaturePacket};
    use crate::types::{PublicKeyAlgorithm, SignatureType};

    fn signed_key(id: u64) -> Key<TestKeyPacket, TestSignaturePacket> {
        let primary = TestKeyPacket::new(PublicKeyAlgorithm::EdDSA, id, false);
        let mut cert = TestSignaturePacket::new(SignatureType::PositiveCertification, primary.key_id());
        cert.set_verified(true);
        Key {
            primary_key: primary,
            revocation_signatures: vec![],
            direct_signatures: vec![],
            users: vec![User {
                packet: UserPacket::Id("Alice <a@x>".into()),
                self_certifications: vec![cert],
                other_certifications: vec![],
                revocation_signatures: vec![],
            }],
            sub_keys: vec![],
        }
    }

    #[test]
    fn update_with_self_is_idempotent() {
        let mut k = signed_key(1);
        let copy = k.clone();
        let policy = StandardPolicy::new();
        update(&mut k, copy, &policy, Timestamp::from(10)).unwrap();
        assert_eq!(k.users.len(), 1);
        assert_eq!(k.users[0].self_certifications.len(), 1);
    }

    #[test]
    fn update_adds_third_party_certification_without_duplicating() {
        let mut k1 = signed_key(1);
        let mut k2 = k1.clone();
        let mut other_cert = TestSignaturePacket::new(SignatureType::GenericCertification, KeyID::from_bytes(&99u64.to_be_bytes()));
        other_cert.set_verified(true);
        k2.users[0].other_certifications.push(other_cert);

        let policy = StandardPolicy::new();
        update(&mut k1, k2, &policy, Timestamp::from(10)).unwrap();
        assert_eq!(k1.users[0].other_certifications.len(), 1);

        // merging again must not duplicate the certification.
        let mut k3 = signed_key(1);
        k3.users[0].other_certifications = k1.users[0].other_certifications.clone();
        update(&mut k1, k3, &policy, Timestamp::from(10)).unwrap();
        assert_eq!(k1.users[0].other_certifications.len(), 1);
    }

    #[test]
    fn mismatched_fingerprints_are_rejected() {
        let mut k1 = signed_key(1);
        let k2 = signed_key(2);
        let policy = StandardPolicy::new();
        assert!(update(&mut k1, k2, &policy, Timestamp::from(10)).is_err());
    }

    /// Property 3: merging `a` into `b` and `b` into `a` yields the
    /// same signature sets up to order, regardless of which side
    /// started with which third-party certification.
    #[test]
    fn merge_converges_regardless_of_direction() {
        let base = signed_key(1);

        let mut a = base.clone();
        let mut a_only = TestSignaturePacket::new(SignatureType::GenericCertification, KeyID::from_bytes(&10u64.to_be_bytes()));
        a_only.set_verified(true);
        a.users[0].other_certifications.push(a_only);

        let mut b = base.clone();
        let mut b_only = TestSignaturePacket::new(SignatureType::GenericCertification, KeyID::from_bytes(&20u64.to_be_bytes()));
        b_only.set_verified(true);
        b.users[0].other_certifications.push(b_only);

        let policy = StandardPolicy::new();

        let mut a_then_b = a.clone();
        update(&mut a_then_b, b.clone(), &policy, Timestamp::from(10)).unwrap();

        let mut b_then_a = b;
        update(&mut b_then_a, a, &policy, Timestamp::from(10)).unwrap();

        let mut a_issuers: Vec<_> = a_then_b.users[0]
            .other_certifications
            .iter()
            .map(|s| s.issuer_key_id())
            .collect();
        let mut b_issuers: Vec<_> = b_then_a.users[0]
            .other_certifications
            .iter()
            .map(|s| s.issuer_key_id())
            .collect();
        a_issuers.sort_by_key(|id| id.as_slice().to_vec());
        b_issuers.sort_by_key(|id| id.as_slice().to_vec());

        assert_eq!(a_issuers, b_issuers);
        assert_eq!(a_issuers.len(), 2);
    }
}
