//! The key structure tree, its builder, and its inverse.
//!
//! [`Key`] is the canonical parsed shape of a transferable key: one
//! primary key packet, the signatures made directly over it, an
//! ordered sequence of [`User`]s, and an ordered sequence of
//! [`SubKey`]s. [`Key::build`] turns a flat, ordered packet sequence
//! into this tree; [`Key::to_packet_list`] is its inverse and must
//! round-trip a well-formed sequence exactly (property 1 in the test
//! harness).

pub mod builder;
pub mod merge;
pub mod select;
pub mod validate;

use crate::packet::{KeyPacket, SignaturePacket};
use crate::types::{SignatureType, Tag};
use crate::{Error, Result};

/// A flat OpenPGP packet, generic over the caller's key and signature
/// packet types.
///
/// This is the wire-adjacent shape [`Key::build`] consumes and
/// [`Key::to_packet_list`] produces; it does not itself know how to
/// serialize to bytes (that's the caller's `KeyPacket`/`SignaturePacket`
/// codec, a non-goal of this crate).
#[derive(Clone)]
pub enum Packet<K: KeyPacket, S: SignaturePacket<Key = K>> {
    /// A primary key packet, public or secret (`K::is_secret`
    /// distinguishes the two).
    Key(K),
    /// A subkey packet, public or secret.
    Subkey(K),
    /// A UserID packet.
    UserId(String),
    /// A User Attribute packet, carried as its opaque raw bytes.
    UserAttribute(Vec<u8>),
    /// A signature packet.
    Signature(S),
}

impl<K: KeyPacket, S: SignaturePacket<Key = K>> Packet<K, S> {
    /// This packet's tag.
    pub fn tag(&self) -> Tag {
        match self {
            Packet::Key(k) => {
                if k.is_secret() {
                    Tag::SecretKey
                } else {
                    Tag::PublicKey
                }
            }
            Packet::Subkey(k) => {
                if k.is_secret() {
                    Tag::SecretSubkey
                } else {
                    Tag::PublicSubkey
                }
            }
            Packet::UserId(_) => Tag::UserID,
            Packet::UserAttribute(_) => Tag::UserAttribute,
            Packet::Signature(_) => Tag::Signature,
        }
    }
}

/// Either a UserID or a User Attribute — exactly one identifies a
/// [`User`].
#[derive(Clone)]
pub enum UserPacket {
    /// A textual identity, e.g. `"Alice <alice@example.org>"`.
    Id(String),
    /// An opaque attribute subpacket sequence (e.g. a photo ID).
    Attribute(Vec<u8>),
}

impl UserPacket {
    /// Returns the UserID text, if this is a `UserPacket::Id`.
    pub fn as_userid(&self) -> Option<&str> {
        match self {
            UserPacket::Id(s) => Some(s),
            UserPacket::Attribute(_) => None,
        }
    }
}

/// A user bound to a primary key: a UserID or User Attribute plus its
/// certifications and revocations.
#[derive(Clone)]
pub struct User<K: KeyPacket, S: SignaturePacket<Key = K>> {
    pub packet: UserPacket,
    /// Certifications issued by the primary key over this user.
    pub self_certifications: Vec<S>,
    /// Certifications issued by a third-party key over this user.
    pub other_certifications: Vec<S>,
    /// Revocations of certifications on this user.
    pub revocation_signatures: Vec<S>,
}

/// A subkey bound to a primary key: a subkey packet plus its binding
/// and revocation signatures.
///
/// Invariant: every binding signature's issuer is the enclosing
/// [`Key`]'s primary key. [`Key::build`] does not itself verify this —
/// that's [`validate::verify_sub_key`]'s job — it only places
/// signatures by structural position in the packet stream.
#[derive(Clone)]
pub struct SubKey<K: KeyPacket, S: SignaturePacket<Key = K>> {
    pub packet: K,
    pub binding_signatures: Vec<S>,
    pub revocation_signatures: Vec<S>,
}

/// The canonical structure of a transferable OpenPGP key.
#[derive(Clone)]
pub struct Key<K: KeyPacket, S: SignaturePacket<Key = K>> {
    pub primary_key: K,
    /// Key-revocation signatures over the primary key.
    pub revocation_signatures: Vec<S>,
    /// Key signatures over the primary key without a user binding.
    pub direct_signatures: Vec<S>,
    /// Always non-empty: a `Key` without at least one `User` cannot
    /// exist (see `Key::build`).
    pub users: Vec<User<K, S>>,
    pub sub_keys: Vec<SubKey<K, S>>,
}

impl<K: KeyPacket, S: SignaturePacket<Key = K>> Key<K, S> {
    /// Builds the structure tree from a flat, ordered packet
    /// sequence.
    ///
    /// Walks the sequence once, dispatching by tag and signature
    /// type exactly as the distilled specification's structure-builder
    /// table describes: a certification with no open user, or a
    /// binding/revocation with no open subkey, is dropped with a
    /// logged warning rather than rejected outright, since a
    /// truncated or reordered keyring is common in the wild.
    pub fn build(packets: Vec<Packet<K, S>>) -> Result<Self> {
        let mut primary_key: Option<K> = None;
        let mut revocation_signatures = Vec::new();
        let mut direct_signatures = Vec::new();
        let mut users: Vec<User<K, S>> = Vec::new();
        let mut sub_keys: Vec<SubKey<K, S>> = Vec::new();
        let mut current_user: Option<usize> = None;
        let mut current_subkey: Option<usize> = None;

        for packet in packets {
            match packet {
                Packet::Key(k) => {
                    if primary_key.is_some() {
                        return Err(Error::InvalidKey(
                            "packet sequence has more than one primary key packet".into(),
                        )
                        .into());
                    }
                    primary_key = Some(k);
                }
                Packet::UserId(id) => {
                    users.push(User {
                        packet: UserPacket::Id(id),
                        self_certifications: Vec::new(),
                        other_certifications: Vec::new(),
                        revocation_signatures: Vec::new(),
                    });
                    current_user = Some(users.len() - 1);
                    current_subkey = None;
                }
                Packet::UserAttribute(attr) => {
                    users.push(User {
                        packet: UserPacket::Attribute(attr),
                        self_certifications: Vec::new(),
                        other_certifications: Vec::new(),
                        revocation_signatures: Vec::new(),
                    });
                    current_user = Some(users.len() - 1);
                    current_subkey = None;
                }
                Packet::Subkey(k) => {
                    sub_keys.push(SubKey {
                        packet: k,
                        binding_signatures: Vec::new(),
                        revocation_signatures: Vec::new(),
                    });
                    current_subkey = Some(sub_keys.len() - 1);
                    current_user = None;
                }
                Packet::Signature(sig) => {
                    let sig_type = sig.signature_type();
                    if sig_type.is_certification() {
                        match current_user {
                            Some(idx) => {
                                let is_self = primary_key
                                    .as_ref()
                                    .map(|k| k.key_id() == sig.issuer_key_id())
                                    .unwrap_or(false);
                                if is_self {
                                    users[idx].self_certifications.push(sig);
                                } else {
                                    users[idx].other_certifications.push(sig);
                                }
                            }
                            None => log::warn!(
                                "dropping certification signature with no open user"
                            ),
                        }
                        continue;
                    }
                    match sig_type {
                        SignatureType::CertificationRevocation => match current_user {
                            Some(idx) => users[idx].revocation_signatures.push(sig),
                            None => direct_signatures.push(sig),
                        },
                        SignatureType::DirectKey => direct_signatures.push(sig),
                        SignatureType::SubkeyBinding => match current_subkey {
                            Some(idx) => sub_keys[idx].binding_signatures.push(sig),
                            None => {
                                log::warn!("dropping subkey binding with no open subkey")
                            }
                        },
                        SignatureType::KeyRevocation => revocation_signatures.push(sig),
                        SignatureType::SubkeyRevocation => match current_subkey {
                            Some(idx) => sub_keys[idx].revocation_signatures.push(sig),
                            None => {
                                log::warn!("dropping subkey revocation with no open subkey")
                            }
                        },
                        _ => log::warn!(
                            "dropping signature of unhandled type {:?}",
                            sig_type
                        ),
                    }
                }
            }
        }

        let primary_key = primary_key.ok_or_else(|| {
            Error::InvalidKey("packet sequence has no primary key packet".into())
        })?;
        if users.is_empty() {
            return Err(Error::InvalidKey("packet sequence has no user".into()).into());
        }

        Ok(Key {
            primary_key,
            revocation_signatures,
            direct_signatures,
            users,
            sub_keys,
        })
    }

    /// The inverse of [`Key::build`]: primary key, then its
    /// revocations, then its direct signatures, then each user with
    /// its revocations/self-certifications/other-certifications, then
    /// each subkey with its revocations/bindings.
    pub fn to_packet_list(&self) -> Vec<Packet<K, S>> {
        let mut out = Vec::new();
        out.push(Packet::Key(self.primary_key.clone()));
        out.extend(self.revocation_signatures.iter().cloned().map(Packet::Signature));
        out.extend(self.direct_signatures.iter().cloned().map(Packet::Signature));

        for user in &self.users {
            out.push(match &user.packet {
                UserPacket::Id(id) => Packet::UserId(id.clone()),
                UserPacket::Attribute(a) => Packet::UserAttribute(a.clone()),
            });
            out.extend(user.revocation_signatures.iter().cloned().map(Packet::Signature));
            out.extend(user.self_certifications.iter().cloned().map(Packet::Signature));
            out.extend(user.other_certifications.iter().cloned().map(Packet::Signature));
        }

        for sub in &self.sub_keys {
            out.push(Packet::Subkey(sub.packet.clone()));
            out.extend(sub.revocation_signatures.iter().cloned().map(Packet::Signature));
            out.extend(sub.binding_signatures.iter().cloned().map(Packet::Signature));
        }

        out
    }

    /// `isPublic()`: the primary key packet carries no secret
    /// material.
    pub fn is_public(&self) -> bool {
        !self.primary_key.is_secret()
    }

    /// `isPrivate()`: the primary key packet carries secret material.
    pub fn is_private(&self) -> bool {
        self.primary_key.is_secret()
    }

    /// Returns a copy of this key with all secret material stripped
    /// from the primary key and every subkey.
    ///
    /// Idempotent: `to_public` applied twice is the same as applied
    /// once, and the result is always `is_public()` (property 4).
    pub fn to_public(&self) -> Key<K, S> {
        Key {
            primary_key: self.primary_key.clear_private_params(),
            revocation_signatures: self.revocation_signatures.clone(),
            direct_signatures: self.direct_signatures.clone(),
            users: self.users.clone(),
            sub_keys: self
                .sub_keys
                .iter()
                .map(|sk| SubKey {
                    packet: sk.packet.clear_private_params(),
                    binding_signatures: sk.binding_signatures.clone(),
                    revocation_signatures: sk.revocation_signatures.clone(),
                })
                .collect(),
        }
    }
}

/// `read()`: splits a flat packet sequence carrying more than one
/// transferable key (a keyring) on primary-key-packet boundaries and
/// builds each one independently.
///
/// Per §7's propagation policy, a bad key does not abort the whole
/// keyring: its [`Key::build`] error is collected in place rather than
/// raised, so a keyring with one malformed key still yields the rest.
pub fn read<K, S>(packets: Vec<Packet<K, S>>) -> Vec<Result<Key<K, S>>>
where
    K: KeyPacket,
    S: SignaturePacket<Key = K>,
{
    let mut out = Vec::new();
    let mut current: Vec<Packet<K, S>> = Vec::new();

    for packet in packets {
        if matches!(packet, Packet::Key(_)) && !current.is_empty() {
            out.push(Key::build(std::mem::take(&mut current)));
        }
        current.push(packet);
    }
    if !current.is_empty() {
        out.push(Key::build(current));
    }

    out
}

#[cfg(test)]
mod read_tests {
    use super::*;
    use crate::tests::{TestKeyPacket, TestSignaturePacket};
    use crate::types::{PublicKeyAlgorithm, SignatureType};

    fn one_key_packets(id: u64) -> Vec<Packet<TestKeyPacket, TestSignaturePacket>> {
        let primary = TestKeyPacket::new(PublicKeyAlgorithm::EdDSA, id, false);
        let mut cert = TestSignaturePacket::new(SignatureType::PositiveCertification, primary.key_id());
        cert.set_verified(true);
        vec![
            Packet::Key(primary),
            Packet::UserId("Alice <a@x>".into()),
            Packet::Signature(cert),
        ]
    }

    #[test]
    fn read_splits_a_keyring_into_independent_keys() {
        let mut packets = one_key_packets(1);
        packets.extend(one_key_packets(2));
        let results = read(packets);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn read_keeps_the_good_keys_when_one_is_malformed() {
        let mut packets = one_key_packets(1);
        // A key with no UserID packet at all is malformed.
        packets.push(Packet::Key(TestKeyPacket::new(PublicKeyAlgorithm::EdDSA, 2, false)));
        packets.extend(one_key_packets(3));

        let results = read(packets);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}

#[cfg(test)]
mod structure_tests {
    use super::*;
    use crate::tests::{TestKeyPacket, TestSignaturePacket};
    use crate::types::{PublicKeyAlgorithm, SignatureType};

    fn full_packet_sequence() -> Vec<Packet<TestKeyPacket, TestSignaturePacket>> {
        let primary = TestKeyPacket::new(PublicKeyAlgorithm::EdDSA, 1, true);
        let mut revocation = TestSignaturePacket::new(SignatureType::KeyRevocation, primary.key_id());
        revocation.set_verified(true);
        let mut direct = TestSignaturePacket::new(SignatureType::DirectKey, primary.key_id());
        direct.set_verified(true);
        let mut self_cert = TestSignaturePacket::new(SignatureType::PositiveCertification, primary.key_id());
        self_cert.set_verified(true);

        let subkey = TestKeyPacket::new(PublicKeyAlgorithm::ECDH, 2, true);
        let mut binding = TestSignaturePacket::new(SignatureType::SubkeyBinding, primary.key_id());
        binding.set_verified(true);

        vec![
            Packet::Key(primary),
            Packet::Signature(revocation),
            Packet::Signature(direct),
            Packet::UserId("Alice <a@x>".into()),
            Packet::Signature(self_cert),
            Packet::Subkey(subkey),
            Packet::Signature(binding),
        ]
    }

    /// Property 1: `toPacketlist(build(p)) == p` for a well-formed,
    /// canonically ordered packet sequence.
    #[test]
    fn to_packet_list_inverts_build_for_canonical_order() {
        let packets = full_packet_sequence();
        let tags: Vec<_> = packets.iter().map(|p| p.tag()).collect();

        let key = Key::build(packets).unwrap();
        let round_tripped = key.to_packet_list();
        let round_tripped_tags: Vec<_> = round_tripped.iter().map(|p| p.tag()).collect();

        assert_eq!(tags, round_tripped_tags);
    }

    /// Property 4: `to_public` is idempotent and always yields a
    /// public key.
    #[test]
    fn to_public_is_idempotent() {
        let key = Key::build(full_packet_sequence()).unwrap();
        assert!(key.is_private());

        let once = key.to_public();
        let twice = once.to_public();

        assert!(once.is_public());
        assert!(twice.is_public());
        assert_eq!(once.sub_keys.len(), twice.sub_keys.len());
        assert!(twice.sub_keys.iter().all(|sk| !sk.packet.is_secret()));
    }
}
