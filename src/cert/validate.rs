//! The trust-query engine: primary-user selection, revocation and
//! expiration predicates, key/subkey/user/certificate validation, and
//! the preferred-algorithm negotiators.

use crate::cert::{Key, User};
use crate::packet::{KeyPacket, SignaturePacket, SignedData};
use crate::policy::Policy;
use crate::types::{Curve, HashAlgorithm, KeyStatus, SymmetricAlgorithm, Timestamp};

/// The result of [`get_primary_user`]: the winning user, its index in
/// `Key::users`, and the self-certification that won it.
pub struct PrimaryUser<K: KeyPacket, S: SignaturePacket<Key = K>> {
    pub index: usize,
    pub user: User<K, S>,
    pub self_certification: S,
}

fn hash_len_at_least(candidate: HashAlgorithm, floor: HashAlgorithm) -> bool {
    match (candidate.digest_size(), floor.digest_size()) {
        (Some(a), Some(b)) => a >= b,
        _ => false,
    }
}

/// `isDataRevoked`: verifies every candidate revocation in
/// `revocations` against `verifying_key`/`data`, honoring
/// `policy.revocations_expire()`. If `target_issuer` is given, returns
/// whether any surviving revocation's issuer matches it; otherwise
/// returns whether any revocation survived at all.
pub fn is_data_revoked<K, S>(
    verifying_key: &K,
    data: SignedData<'_, K>,
    revocations: &mut [S],
    target_issuer: Option<crate::keyid::KeyID>,
    policy: &dyn Policy,
    at: Timestamp,
) -> bool
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let mut surviving_issuers = Vec::new();
    for rev in revocations.iter_mut() {
        if policy.revocations_expire() && rev.is_expired(at) {
            continue;
        }
        if rev.verify(verifying_key, data).unwrap_or(false) {
            surviving_issuers.push(rev.issuer_key_id());
        }
    }
    match target_issuer {
        Some(issuer) => surviving_issuers.iter().any(|i| *i == issuer),
        None => !surviving_issuers.is_empty(),
    }
}

/// The expiration time implied by a governing signature over `key`,
/// or `None` if the key never expires under that signature.
pub fn key_expiration_time<K, S>(key: &K, governing_sig: &S) -> Option<Timestamp>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    if key.version() == 3 {
        match key.expiration_time_v3() {
            None | Some(0) => None,
            Some(days) => key.created().checked_add_secs(days as u64 * 86400),
        }
    } else if governing_sig.key_never_expires() {
        None
    } else {
        governing_sig
            .key_expiration_time()
            .and_then(|secs| key.created().checked_add_secs(secs))
    }
}

/// `isDataExpired`: a key is expired at `at` if the governing
/// signature itself is expired, or if `at` falls outside
/// `[created, expiration)`.
pub fn is_data_expired<K, S>(key: &K, governing_sig: &S, at: Timestamp) -> bool
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    if governing_sig.is_expired(at) {
        return true;
    }
    match key_expiration_time(key, governing_sig) {
        None => false,
        Some(expiration) => !(key.created() <= at && at < expiration),
    }
}

/// `getPrimaryUser`: the surviving self-certification with the
/// highest `(isPrimaryUserID weight, created)` tuple, verified,
/// unrevoked, and unexpired at `at`.
pub fn get_primary_user<K, S>(
    key: &mut Key<K, S>,
    policy: &dyn Policy,
    at: Timestamp,
) -> Option<PrimaryUser<K, S>>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let primary = key.primary_key.clone();
    let mut best: Option<(usize, S, u32, Timestamp)> = None;

    for idx in 0..key.users.len() {
        let userid = match key.users[idx].packet.as_userid() {
            Some(s) => s.to_string(),
            None => continue,
        };
        let cert_count = key.users[idx].self_certifications.len();
        for ci in 0..cert_count {
            let verified = {
                let user = &mut key.users[idx];
                let sig = &mut user.self_certifications[ci];
                sig.verify(&primary, SignedData::User { key: &primary, userid: &userid })
                    .unwrap_or(false)
            };
            if !verified {
                continue;
            }
            let sig = key.users[idx].self_certifications[ci].clone();
            if sig.is_expired(at) {
                continue;
            }
            let target_issuer = sig.issuer_key_id();
            let revoked = is_data_revoked(
                &primary,
                SignedData::User { key: &primary, userid: &userid },
                &mut key.users[idx].revocation_signatures,
                Some(target_issuer),
                policy,
                at,
            );
            if revoked {
                continue;
            }

            let weight = sig.primary_user_id_weight().unwrap_or(0);
            let created = sig.created();
            let better = match &best {
                None => true,
                Some((_, _, best_weight, best_created)) => {
                    weight > *best_weight || (weight == *best_weight && created > *best_created)
                }
            };
            if better {
                best = Some((idx, sig, weight, created));
            }
        }
    }

    best.map(|(index, self_certification, _, _)| PrimaryUser {
        index,
        user: key.users[index].clone(),
        self_certification,
    })
}

/// `verifyPrimaryKey`.
pub fn verify_primary_key<K, S>(key: &mut Key<K, S>, policy: &dyn Policy, at: Timestamp) -> KeyStatus
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let primary = key.primary_key.clone();
    let revoked = is_data_revoked(
        &primary,
        SignedData::DirectKey { key: &primary },
        &mut key.revocation_signatures,
        None,
        policy,
        at,
    );
    if revoked {
        return KeyStatus::Revoked;
    }
    if !key.users.iter().any(|u| !u.self_certifications.is_empty()) {
        return KeyStatus::NoSelfCert;
    }
    let primary_user = match get_primary_user(key, policy, at) {
        Some(pu) => pu,
        None => return KeyStatus::Invalid,
    };
    if is_data_expired(&primary, &primary_user.self_certification, at) {
        return KeyStatus::Expired;
    }
    KeyStatus::Valid
}

/// `verifySubKey`: iterates binding signatures in order, returning
/// `Valid` on the first binding that verifies, is unrevoked, and
/// unexpired; otherwise the status of the last binding examined, or
/// `Invalid` if there were none.
pub fn verify_sub_key<K, S>(
    key: &mut Key<K, S>,
    sub_key_index: usize,
    policy: &dyn Policy,
    at: Timestamp,
) -> KeyStatus
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let primary = key.primary_key.clone();
    if sub_key_index >= key.sub_keys.len() {
        return KeyStatus::Invalid;
    }
    let subkey = key.sub_keys[sub_key_index].packet.clone();

    if subkey.version() == 3 {
        if let Some(days) = subkey.expiration_time_v3() {
            if days != 0 {
                let expiration = subkey.created().checked_add_secs(days as u64 * 86400);
                if let Some(expiration) = expiration {
                    if !(subkey.created() <= at && at < expiration) {
                        return KeyStatus::Expired;
                    }
                }
            }
        }
    }

    let binding_count = key.sub_keys[sub_key_index].binding_signatures.len();
    let mut last_status = KeyStatus::Invalid;

    for bi in 0..binding_count {
        let verified = {
            let sub = &mut key.sub_keys[sub_key_index];
            let binding = &mut sub.binding_signatures[bi];
            binding
                .verify(&primary, SignedData::Binding { key: &primary, bound: &subkey })
                .unwrap_or(false)
        };
        if !verified {
            last_status = KeyStatus::Invalid;
            continue;
        }
        let binding = key.sub_keys[sub_key_index].binding_signatures[bi].clone();
        let target_issuer = binding.issuer_key_id();
        let revoked = is_data_revoked(
            &primary,
            SignedData::Binding { key: &primary, bound: &subkey },
            &mut key.sub_keys[sub_key_index].revocation_signatures,
            Some(target_issuer),
            policy,
            at,
        );
        if revoked {
            last_status = KeyStatus::Revoked;
            continue;
        }
        if is_data_expired(&subkey, &binding, at) {
            last_status = KeyStatus::Expired;
            continue;
        }
        return KeyStatus::Valid;
    }

    last_status
}

/// The subkey's expiration time: the maximum [`key_expiration_time`]
/// over all binding signatures, or `None` if any binding asserts
/// non-expiry.
pub fn get_subkey_expiration_time<K, S>(key: &Key<K, S>, sub_key_index: usize) -> Option<Timestamp>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let subkey = &key.sub_keys[sub_key_index];
    let mut max_expiration: Option<Timestamp> = None;
    for binding in &subkey.binding_signatures {
        match key_expiration_time(&subkey.packet, binding) {
            None => return None,
            Some(t) => {
                max_expiration = Some(match max_expiration {
                    Some(cur) if cur >= t => cur,
                    _ => t,
                });
            }
        }
    }
    max_expiration
}

/// `verifyUser`: whether the user at `user_index` has at least one
/// verified, unrevoked, unexpired self-certification at `at`.
pub fn verify_user<K, S>(
    key: &mut Key<K, S>,
    user_index: usize,
    policy: &dyn Policy,
    at: Timestamp,
) -> KeyStatus
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    if user_index >= key.users.len() {
        return KeyStatus::Invalid;
    }
    let primary = key.primary_key.clone();
    let userid = match key.users[user_index].packet.as_userid() {
        Some(s) => s.to_string(),
        None => return KeyStatus::Invalid,
    };
    let cert_count = key.users[user_index].self_certifications.len();
    if cert_count == 0 {
        return KeyStatus::NoSelfCert;
    }
    let mut last_status = KeyStatus::Invalid;
    for ci in 0..cert_count {
        let verified = {
            let user = &mut key.users[user_index];
            let sig = &mut user.self_certifications[ci];
            sig.verify(&primary, SignedData::User { key: &primary, userid: &userid })
                .unwrap_or(false)
        };
        if !verified {
            continue;
        }
        let sig = key.users[user_index].self_certifications[ci].clone();
        let target_issuer = sig.issuer_key_id();
        let revoked = is_data_revoked(
            &primary,
            SignedData::User { key: &primary, userid: &userid },
            &mut key.users[user_index].revocation_signatures,
            Some(target_issuer),
            policy,
            at,
        );
        if revoked {
            last_status = KeyStatus::Revoked;
            continue;
        }
        if is_data_expired(&primary, &sig, at) {
            last_status = KeyStatus::Expired;
            continue;
        }
        return KeyStatus::Valid;
    }
    last_status
}

/// `verifyCertificate`: the certificate is only as valid as its
/// primary key; this is the one entry point a caller should use to
/// decide whether to trust the whole tree at all.
pub fn verify_certificate<K, S>(key: &mut Key<K, S>, policy: &dyn Policy, at: Timestamp) -> KeyStatus
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    verify_primary_key(key, policy, at)
}

/// `getPreferredHashAlgo`: negotiates a hash algorithm for operations
/// against `key`, starting from the policy default, raising it to the
/// primary user's first preference when that preference is at least
/// as strong, then raising it again to `curve_of`'s preferred hash
/// when the primary key resolves to a named curve.
pub fn get_preferred_hash_algo<K, S>(
    key: &mut Key<K, S>,
    curve_of: impl Fn(&K) -> Option<Curve>,
    policy: &dyn Policy,
    at: Timestamp,
) -> HashAlgorithm
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let configured = policy.prefer_hash_algorithm();
    let mut answer = configured;

    if let Some(primary_user) = get_primary_user(key, policy, at) {
        if let Some(&preferred) = primary_user.self_certification.preferred_hash_algorithms().first() {
            if hash_len_at_least(preferred, configured) {
                answer = preferred;
            }
        }
    }

    if let Some(curve) = curve_of(&key.primary_key) {
        if let Some(curve_preferred) = curve.preferred_hash() {
            if !hash_len_at_least(answer, curve_preferred) {
                answer = curve_preferred;
            }
        }
    }

    answer
}

/// `getPreferredSymAlgo`: scores every candidate algorithm across all
/// of `keys`' primary users' preferred-symmetric lists (index `i`
/// scores `64 >> i`), keeping only algorithms that are known,
/// non-plaintext, non-IDEA, and present on every key's list. Returns
/// the highest scorer, or the policy default if none qualify.
pub fn get_preferred_sym_algo<K, S>(
    keys: &mut [&mut Key<K, S>],
    policy: &dyn Policy,
    at: Timestamp,
) -> SymmetricAlgorithm
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let per_key_lists: Vec<Vec<SymmetricAlgorithm>> = keys
        .iter_mut()
        .map(|key| {
            get_primary_user(key, policy, at)
                .map(|pu| pu.self_certification.preferred_symmetric_algorithms().to_vec())
                .unwrap_or_default()
        })
        .collect();

    let mut scores: std::collections::HashMap<SymmetricAlgorithm, u32> = std::collections::HashMap::new();
    for list in &per_key_lists {
        for (i, algo) in list.iter().enumerate() {
            let score = 64u32.checked_shr(i as u32).unwrap_or(0);
            *scores.entry(*algo).or_insert(0) += score;
        }
    }

    let disqualified = |algo: &SymmetricAlgorithm| {
        matches!(
            algo,
            SymmetricAlgorithm::Unknown(_) | SymmetricAlgorithm::Plaintext | SymmetricAlgorithm::IDEA
        )
    };

    let mut best: Option<(SymmetricAlgorithm, u32)> = None;
    for (algo, score) in scores {
        if disqualified(&algo) {
            continue;
        }
        if !per_key_lists.iter().all(|list| list.contains(&algo)) {
            continue;
        }
        if best.map(|(_, best_score)| score > best_score).unwrap_or(true) {
            best = Some((algo, score));
        }
    }

    best.map(|(algo, _)| algo).unwrap_or_else(|| policy.encryption_cipher())
}
