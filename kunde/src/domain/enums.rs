//! 客户的枚举属性
//!
//! JSON 中以代码表示（例如 `"W"`）。解析时宽松：代码或名称均可，不区分大小写。
//!
use std::fmt;
use std::str::FromStr;

use acme_domain::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! coded_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($code:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.code().eq_ignore_ascii_case(s) || v.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        DomainError::parse(format!("unknown {}: {s:?}", stringify!($name)))
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

coded_enum!(
    Geschlecht {
        Maennlich => ("M", "MAENNLICH"),
        Weiblich => ("W", "WEIBLICH"),
        Divers => ("D", "DIVERS"),
    }
);

coded_enum!(
    Familienstand {
        Ledig => ("L", "LEDIG"),
        Verheiratet => ("VH", "VERHEIRATET"),
        Geschieden => ("G", "GESCHIEDEN"),
        Verwitwet => ("VW", "VERWITWET"),
    }
);

coded_enum!(
    /// 兴趣，客户可有多项
    Interesse {
        Sport => ("S", "SPORT"),
        Lesen => ("L", "LESEN"),
        Reisen => ("R", "REISEN"),
    }
);
