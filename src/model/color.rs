//! Color tags used to flag rows.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One of the eight palette entries a product can be painted with.
///
/// Digits `0..=7` map onto the palette in declaration order; `0` clears
/// the tag. On the wire the tag is the Spanish color name, or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorTag {
    #[default]
    None,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Gray,
}

impl ColorTag {
    /// Palette in digit order.
    pub const PALETTE: [Self; 8] = [
        Self::None,
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Purple,
        Self::Gray,
    ];

    /// Palette entry for a digit key, if the digit is in range.
    #[must_use]
    pub fn from_digit(digit: char) -> Option<Self> {
        let idx = digit.to_digit(10)? as usize;
        Self::PALETTE.get(idx).copied()
    }

    /// Digit that selects this entry.
    #[must_use]
    pub fn digit(self) -> char {
        let idx = Self::PALETTE
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default();
        char::from(b'0' + idx as u8)
    }

    /// Name used by the API.
    #[must_use]
    pub const fn wire_name(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Red => Some("rojo"),
            Self::Orange => Some("naranja"),
            Self::Yellow => Some("amarillo"),
            Self::Green => Some("verde"),
            Self::Blue => Some("azul"),
            Self::Purple => Some("violeta"),
            Self::Gray => Some("gris"),
        }
    }

    /// Parse an API color name.
    #[must_use]
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::PALETTE
            .into_iter()
            .find(|c| c.wire_name() == Some(name))
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Red => "Red",
            Self::Orange => "Orange",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Purple => "Purple",
            Self::Gray => "Gray",
        }
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ColorTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.wire_name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ColorTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(Self::None),
            Some(name) => Self::from_wire_name(name).ok_or_else(|| {
                serde::de::Error::custom(format!("unknown color '{name}'"))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_mapping_covers_palette() {
        assert_eq!(ColorTag::from_digit('0'), Some(ColorTag::None));
        assert_eq!(ColorTag::from_digit('1'), Some(ColorTag::Red));
        assert_eq!(ColorTag::from_digit('7'), Some(ColorTag::Gray));
        assert_eq!(ColorTag::from_digit('8'), None);
        assert_eq!(ColorTag::from_digit('x'), None);
        assert_eq!(ColorTag::Blue.digit(), '5');
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(serde_json::to_string(&ColorTag::Red).unwrap(), "\"rojo\"");
        assert_eq!(serde_json::to_string(&ColorTag::None).unwrap(), "null");

        let tag: ColorTag = serde_json::from_str("\"violeta\"").unwrap();
        assert_eq!(tag, ColorTag::Purple);
        let tag: ColorTag = serde_json::from_str("null").unwrap();
        assert_eq!(tag, ColorTag::None);
        assert!(serde_json::from_str::<ColorTag>("\"fucsia\"").is_err());
    }
}
