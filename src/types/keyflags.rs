//! Key usage flags, [Section 5.2.3.21 of RFC 4880].
//!
//! [Section 5.2.3.21 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.3.21

const CERTIFY_KEYS: u8 = 0x01;
const SIGN_DATA: u8 = 0x02;
const ENCRYPT_COMMUNICATION: u8 = 0x04;
const ENCRYPT_STORAGE: u8 = 0x08;
const SPLIT_KEY: u8 = 0x10;
const AUTHENTICATE: u8 = 0x20;
const GROUP_KEY: u8 = 0x80;

/// The one-octet key usage flags subpacket, represented as a typed
/// bitfield rather than a raw byte.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct KeyFlags(u8);

impl KeyFlags {
    /// An empty flag set (no keyFlags subpacket present).
    pub fn empty() -> Self {
        KeyFlags(0)
    }

    /// Constructs a `KeyFlags` from the raw subpacket octet.
    pub fn from_byte(b: u8) -> Self {
        KeyFlags(b)
    }

    /// Returns the raw subpacket octet.
    pub fn as_byte(&self) -> u8 {
        self.0
    }

    fn set(mut self, bit: u8, value: bool) -> Self {
        if value {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
        self
    }

    /// The key may be used to certify other keys.
    pub fn certify(&self) -> bool {
        self.0 & CERTIFY_KEYS != 0
    }

    /// Builder form of [`Self::certify`].
    pub fn set_certify(self, v: bool) -> Self {
        self.set(CERTIFY_KEYS, v)
    }

    /// The key may be used to sign data.
    pub fn sign(&self) -> bool {
        self.0 & SIGN_DATA != 0
    }

    /// Builder form of [`Self::sign`].
    pub fn set_sign(self, v: bool) -> Self {
        self.set(SIGN_DATA, v)
    }

    /// The key may be used to encrypt communications.
    pub fn encrypt_communication(&self) -> bool {
        self.0 & ENCRYPT_COMMUNICATION != 0
    }

    /// Builder form of [`Self::encrypt_communication`].
    pub fn set_encrypt_communication(self, v: bool) -> Self {
        self.set(ENCRYPT_COMMUNICATION, v)
    }

    /// The key may be used to encrypt storage.
    pub fn encrypt_storage(&self) -> bool {
        self.0 & ENCRYPT_STORAGE != 0
    }

    /// Builder form of [`Self::encrypt_storage`].
    pub fn set_encrypt_storage(self, v: bool) -> Self {
        self.set(ENCRYPT_STORAGE, v)
    }

    /// The private component of this key may have been split using
    /// a secret-sharing mechanism.
    pub fn split_key(&self) -> bool {
        self.0 & SPLIT_KEY != 0
    }

    /// The key may be used for authentication.
    pub fn authenticate(&self) -> bool {
        self.0 & AUTHENTICATE != 0
    }

    /// The private component of this key may be in the possession of
    /// more than one person.
    pub fn group_key(&self) -> bool {
        self.0 & GROUP_KEY != 0
    }

    /// Whether this flag set has nothing set, which `getSigningKeyPacket`
    /// and `getEncryptionKeyPacket` treat as "no keyFlags" (i.e. no
    /// restriction, per §4.7).
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for KeyFlags {
    fn from(b: u8) -> Self {
        KeyFlags(b)
    }
}

/// Feature flags, [Section 5.2.3.24 of RFC 4880].
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Features(u8);

const MODIFICATION_DETECTION: u8 = 0x01;

impl Features {
    /// An empty feature set.
    pub fn empty() -> Self {
        Features(0)
    }

    /// Constructs a `Features` from the raw subpacket octet.
    pub fn from_byte(b: u8) -> Self {
        Features(b)
    }

    /// Returns the raw subpacket octet.
    pub fn as_byte(&self) -> u8 {
        self.0
    }

    /// Modification Detection (SEIPD) is supported.
    pub fn modification_detection(&self) -> bool {
        self.0 & MODIFICATION_DETECTION != 0
    }

    /// Builder enabling modification detection.
    pub fn set_modification_detection(mut self, v: bool) -> Self {
        if v {
            self.0 |= MODIFICATION_DETECTION;
        } else {
            self.0 &= !MODIFICATION_DETECTION;
        }
        self
    }
}
