//! The operation selector: picking which key packet to use for a
//! signing or encryption operation.

use crate::cert::Key;
use crate::keyid::KeyID;
use crate::packet::{KeyPacket, SignaturePacket, SignedData};
use crate::policy::Policy;
use crate::types::{KeyStatus, Timestamp};

fn eligible_flags<S: SignaturePacket>(binding: &S, require_any: &[fn(&crate::types::KeyFlags) -> bool]) -> bool {
    match binding.key_flags() {
        None => true,
        Some(flags) => {
            if flags.is_empty() {
                true
            } else {
                require_any.iter().any(|f| f(&flags))
            }
        }
    }
}

/// `getSigningKeyPacket`: the primary key if eligible, otherwise the
/// first eligible subkey in declaration order.
pub fn get_signing_key_packet<K, S>(
    key: &mut Key<K, S>,
    key_id_hint: Option<&KeyID>,
    policy: &dyn Policy,
    at: Timestamp,
) -> Option<K>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let primary = key.primary_key.clone();

    let hint_matches = |id: &KeyID| key_id_hint.map(|h| h == id).unwrap_or(true);

    if primary.algorithm().is_signing_capable() && hint_matches(&primary.key_id()) {
        let has_eligible_self_cert = key.users.iter().any(|u| {
            u.self_certifications.iter().any(|sig| {
                eligible_flags(sig, &[|f| f.sign()])
            })
        });
        if has_eligible_self_cert {
            let status = super::validate::verify_primary_key(key, policy, at);
            if status == KeyStatus::Valid {
                let has_primary_user = super::validate::get_primary_user(key, policy, at).is_some();
                if has_primary_user {
                    return Some(primary);
                }
            }
        }
    }

    for idx in 0..key.sub_keys.len() {
        let sub_id = key.sub_keys[idx].packet.key_id();
        if !hint_matches(&sub_id) {
            continue;
        }
        if !key.sub_keys[idx].packet.algorithm().is_signing_capable() {
            continue;
        }
        let has_eligible_binding = key.sub_keys[idx]
            .binding_signatures
            .iter()
            .any(|b| eligible_flags(b, &[|f| f.sign()]));
        if !has_eligible_binding {
            continue;
        }
        let status = super::validate::verify_sub_key(key, idx, policy, at);
        if status == KeyStatus::Valid {
            return Some(key.sub_keys[idx].packet.clone());
        }
    }

    None
}

/// `getEncryptionKeyPacket`: subkeys first (declaration order), then
/// the primary key as a fallback.
pub fn get_encryption_key_packet<K, S>(
    key: &mut Key<K, S>,
    key_id_hint: Option<&KeyID>,
    policy: &dyn Policy,
    at: Timestamp,
) -> Option<K>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let hint_matches = |id: &KeyID| key_id_hint.map(|h| h == id).unwrap_or(true);

    for idx in 0..key.sub_keys.len() {
        let sub_id = key.sub_keys[idx].packet.key_id();
        if !hint_matches(&sub_id) {
            continue;
        }
        if !key.sub_keys[idx].packet.algorithm().is_encryption_capable() {
            continue;
        }
        let has_eligible_binding = key.sub_keys[idx].binding_signatures.iter().any(|b| {
            eligible_flags(b, &[|f| f.encrypt_communication(), |f| f.encrypt_storage()])
        });
        if !has_eligible_binding {
            continue;
        }
        let status = super::validate::verify_sub_key(key, idx, policy, at);
        if status == KeyStatus::Valid {
            return Some(key.sub_keys[idx].packet.clone());
        }
    }

    let primary = key.primary_key.clone();
    if primary.algorithm().is_encryption_capable() && hint_matches(&primary.key_id()) {
        let has_eligible_self_cert = key.users.iter().any(|u| {
            u.self_certifications.iter().any(|sig| {
                eligible_flags(sig, &[|f| f.encrypt_communication(), |f| f.encrypt_storage()])
            })
        });
        if has_eligible_self_cert {
            let status = super::validate::verify_primary_key(key, policy, at);
            if status == KeyStatus::Valid {
                return Some(primary);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::UserPacket;
    use crate::cert::{SubKey, User};
    use crate::policy::StandardPolicy;
    use crate::tests::{TestKeyPacket, TestSignaturePacket};
    use crate::types::{KeyFlags, PublicKeyAlgorithm, SignatureType};

    fn signing_capable_key() -> Key<TestKeyPacket, TestSignaturePacket> {
        let primary = TestKeyPacket::new(PublicKeyAlgorithm::EdDSA, 1, false);
        let mut cert = TestSignaturePacket::new(SignatureType::PositiveCertification, primary.key_id());
        cert.set_verified(true);
        cert.set_key_flags(KeyFlags::empty().set_certify(true).set_sign(true));
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
    fn signing_selector_never_returns_encrypt_only_algorithm() {
        let mut key = signing_capable_key();
        let policy = StandardPolicy::new();
        let picked = get_signing_key_packet(&mut key, None, &policy, Timestamp::from(10));
        let picked = picked.expect("primary key should be eligible");
        assert!(picked.algorithm().is_signing_capable());
    }

    #[test]
    fn encryption_selector_prefers_subkey_over_primary() {
        let mut key = signing_capable_key();
        let sub = TestKeyPacket::new(PublicKeyAlgorithm::ECDH, 2, false);
        let mut binding = TestSignaturePacket::new(SignatureType::SubkeyBinding, key.primary_key.key_id());
        binding.set_verified(true);
        binding.set_key_flags(KeyFlags::empty().set_encrypt_communication(true));
        key.sub_keys.push(SubKey {
            packet: sub.clone(),
            binding_signatures: vec![binding],
            revocation_signatures: vec![],
        });
        let policy = StandardPolicy::new();
        let picked = get_encryption_key_packet(&mut key, None, &policy, Timestamp::from(10)).unwrap();
        assert_eq!(picked.key_id(), sub.key_id());
    }
}
