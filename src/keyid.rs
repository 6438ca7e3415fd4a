use std::fmt;

use crate::{Error, Result};

/// An OpenPGP Key ID, the last eight octets of a V4 fingerprint.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum KeyID {
    V4([u8; 8]),
    /// A key ID of unknown length.
    Invalid(Box<[u8]>),
}

impl fmt::Debug for KeyID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("KeyID").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for KeyID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl KeyID {
    /// Creates a `KeyID` from a big endian byte slice, using only the
    /// last eight bytes if more are given.
    pub fn from_bytes(raw: &[u8]) -> Self {
        if raw.len() >= 8 {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&raw[raw.len() - 8..]);
            KeyID::V4(buf)
        } else {
            KeyID::Invalid(raw.to_vec().into_boxed_slice())
        }
    }

    /// Parses a hexadecimal Key ID, ignoring whitespace.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() % 2 != 0 {
            return Err(Error::InvalidArgument(
                "key ID has an odd number of hex digits".into(),
            )
            .into());
        }
        let mut bytes = Vec::with_capacity(digits.len() / 2);
        for chunk in digits.as_bytes().chunks(2) {
            let s = std::str::from_utf8(chunk)
                .map_err(|_| Error::InvalidArgument("key ID is not valid hex".into()))?;
            let b = u8::from_str_radix(s, 16)
                .map_err(|_| Error::InvalidArgument("key ID is not valid hex".into()))?;
            bytes.push(b);
        }
        Ok(Self::from_bytes(&bytes))
    }

    /// Returns the raw bytes, in big endian order.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            KeyID::V4(b) => &b[..],
            KeyID::Invalid(b) => b,
        }
    }

    /// Converts the Key ID to a hexadecimal number.
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(self.as_slice().len() * 2);
        for b in self.as_slice() {
            s.push_str(&format!("{:02X}", b));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips() {
        let id = KeyID::from_hex("AACB 3243 6300 52D9").unwrap();
        assert_eq!(id.to_hex(), "AACB3243630052D9");
        assert_eq!(id.as_slice().len(), 8);
    }
}
