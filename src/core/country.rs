use super::transaction::TransactionError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Domicile of a security, as an ISO 3166-1 alpha-2 code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode([u8; 2]);

/// How a domicile is treated for the tax on stock exchange transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jurisdiction {
    Belgium,
    /// European Economic Area, Belgium excluded
    Eea,
    Other,
}

/// EU member states, then Iceland, Liechtenstein and Norway
const EEA: [CountryCode; 30] = [
    CountryCode(*b"AT"),
    CountryCode(*b"BE"),
    CountryCode(*b"BG"),
    CountryCode(*b"CY"),
    CountryCode(*b"CZ"),
    CountryCode(*b"DE"),
    CountryCode(*b"DK"),
    CountryCode(*b"EE"),
    CountryCode(*b"ES"),
    CountryCode(*b"FI"),
    CountryCode(*b"FR"),
    CountryCode(*b"GR"),
    CountryCode(*b"HR"),
    CountryCode(*b"HU"),
    CountryCode(*b"IE"),
    CountryCode(*b"IT"),
    CountryCode(*b"LT"),
    CountryCode(*b"LU"),
    CountryCode(*b"LV"),
    CountryCode(*b"MT"),
    CountryCode(*b"NL"),
    CountryCode(*b"PL"),
    CountryCode(*b"PT"),
    CountryCode(*b"RO"),
    CountryCode(*b"SE"),
    CountryCode(*b"SI"),
    CountryCode(*b"SK"),
    CountryCode(*b"IS"),
    CountryCode(*b"LI"),
    CountryCode(*b"NO"),
];

impl CountryCode {
    pub const BE: CountryCode = CountryCode(*b"BE");

    pub fn is_eea(self) -> bool {
        EEA.contains(&self)
    }

    pub fn jurisdiction(self) -> Jurisdiction {
        match self {
            CountryCode::BE => Jurisdiction::Belgium,
            c if c.is_eea() => Jurisdiction::Eea,
            _ => Jurisdiction::Other,
        }
    }
}

#[cfg(test)]
impl CountryCode {
    pub const CH: CountryCode = CountryCode(*b"CH");
    pub const IE: CountryCode = CountryCode(*b"IE");
    pub const US: CountryCode = CountryCode(*b"US");
}

impl FromStr for CountryCode {
    type Err = TransactionError;

    /// Any two-letter code is accepted; only Belgium and the EEA members get special treatment
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_bytes() {
            &[a, b] if a.is_ascii_uppercase() && b.is_ascii_uppercase() => Ok(CountryCode([a, b])),
            _ => Err(TransactionError::InvalidCountry(s.to_string())),
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(self.0[0]), char::from(self.0[1]))
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
