use std::fmt;

use crate::keyid::KeyID;
use crate::{Error, Result};

/// A V4 OpenPGP fingerprint.
///
/// Fingerprints are used to uniquely identify a key.  The last eight
/// octets of a V4 fingerprint happen to be the corresponding `KeyID`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// A 20 byte SHA-1 hash of the key's public key packet, as
    /// defined in Section 12.2 of RFC 4880.
    V4([u8; 20]),
    /// A fingerprint of unknown length or type.
    Invalid(Box<[u8]>),
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Fingerprint").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Fingerprint {
    /// Creates a `Fingerprint` from a byte slice in big endian order.
    pub fn from_bytes(raw: &[u8]) -> Self {
        if raw.len() == 20 {
            let mut buf = [0u8; 20];
            buf.copy_from_slice(raw);
            Fingerprint::V4(buf)
        } else {
            Fingerprint::Invalid(raw.to_vec().into_boxed_slice())
        }
    }

    /// Parses a hexadecimal fingerprint, ignoring whitespace.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() % 2 != 0 {
            return Err(Error::InvalidArgument(
                "fingerprint has an odd number of hex digits".into(),
            )
            .into());
        }
        let mut bytes = Vec::with_capacity(digits.len() / 2);
        let digits = digits.as_bytes();
        for chunk in digits.chunks(2) {
            let s = std::str::from_utf8(chunk).map_err(|_| {
                Error::InvalidArgument("fingerprint is not valid hex".into())
            })?;
            let b = u8::from_str_radix(s, 16)
                .map_err(|_| Error::InvalidArgument("fingerprint is not valid hex".into()))?;
            bytes.push(b);
        }
        Ok(Self::from_bytes(&bytes))
    }

    /// Returns the raw bytes, in big endian order.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Fingerprint::V4(b) => &b[..],
            Fingerprint::Invalid(b) => b,
        }
    }

    /// Converts the fingerprint to a hexadecimal number.
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(self.as_slice().len() * 2);
        for b in self.as_slice() {
            s.push_str(&format!("{:02X}", b));
        }
        s
    }

    /// Returns the `KeyID`, the last eight bytes of a V4 fingerprint.
    pub fn key_id(&self) -> KeyID {
        match self {
            Fingerprint::V4(b) => KeyID::from_bytes(&b[12..]),
            Fingerprint::Invalid(b) => {
                let start = b.len().saturating_sub(8);
                KeyID::from_bytes(&b[start..])
            }
        }
    }
}

impl From<Fingerprint> for KeyID {
    fn from(fpr: Fingerprint) -> Self {
        fpr.key_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "8F17 7771 18A3 3DDA 9BA4  8E62 AACB 3243 6300 52D9";

    #[test]
    fn hex_round_trips() {
        let fpr = Fingerprint::from_hex(HEX).unwrap();
        let expected: String = HEX.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(fpr.to_hex(), expected);
        assert_eq!(fpr.as_slice().len(), 20);
    }

    #[test]
    fn key_id_is_fingerprint_suffix() {
        let fpr = Fingerprint::from_hex(HEX).unwrap();
        let keyid = fpr.key_id();
        assert_eq!(keyid.as_slice(), &fpr.as_slice()[12..]);
    }
}
