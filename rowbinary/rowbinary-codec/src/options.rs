//! Settings shared by [`ValueDecoder`](crate::ValueDecoder) and
//! [`ValueEncoder`](crate::ValueEncoder).

use rowbinary_core::{Coercion, Tz};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecOptions {
    /// IANA zone for `DateTime` columns declared without one.
    #[serde(deserialize_with = "deserialize_time_zone")]
    pub default_time_zone: Tz,
    /// Treat enum ordinals missing from the enum table as invalid values.
    pub strict_enums: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            default_time_zone: Tz::UTC,
            strict_enums: true,
        }
    }
}

impl CodecOptions {
    pub fn with_time_zone(mut self, tz: Tz) -> Self {
        self.default_time_zone = tz;
        self
    }

    pub fn coercion(&self) -> Coercion {
        Coercion {
            default_time_zone: self.default_time_zone,
            strict_enums: self.strict_enums,
        }
    }
}

fn deserialize_time_zone<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tz, D::Error> {
    let name = String::deserialize(deserializer)?;
    name.parse()
        .map_err(|_| serde::de::Error::custom(format!("unknown time zone '{name}'")))
}
