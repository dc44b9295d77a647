use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ValidationError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The wire form (serde) is the `as_str` spelling; parsing ignores ASCII case.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($s) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ValidationError::InvalidEnum {
                    field: stringify!($name).into(),
                    value: s.into(),
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
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

str_enum!(Gender {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

// Variant order is severity order: `Low < Medium < High`.
str_enum!(RiskCategory {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
});

// Variant order is the classifier's output index order.
str_enum!(XrayLabel {
    Normal => "Normal",
    Pneumonia => "Pneumonia",
});

impl Default for Gender {
    fn default() -> Self {
        Self::Other
    }
}

impl XrayLabel {
    /// Labels indexed by network output position.
    pub const CLASSES: [XrayLabel; 2] = [XrayLabel::Normal, XrayLabel::Pneumonia];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn gender_round_trip() {
        for (variant, s) in [
            (Gender::Male, "Male"),
            (Gender::Female, "Female"),
            (Gender::Other, "Other"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Gender::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(Gender::from_str(" female ").unwrap(), Gender::Female);
        assert_eq!(RiskCategory::from_str("medium").unwrap(), RiskCategory::Medium);
        assert_eq!(XrayLabel::from_str("PNEUMONIA").unwrap(), XrayLabel::Pneumonia);
    }

    #[test]
    fn risk_category_orders_by_severity() {
        assert!(RiskCategory::Low < RiskCategory::Medium);
        assert!(RiskCategory::Medium < RiskCategory::High);
    }

    #[test]
    fn classes_follow_output_index_order() {
        assert_eq!(XrayLabel::CLASSES[0], XrayLabel::Normal);
        assert_eq!(XrayLabel::CLASSES[1], XrayLabel::Pneumonia);
    }

    #[test]
    fn serde_uses_display_spelling() {
        let json = serde_json::to_string(&RiskCategory::High).unwrap();
        assert_eq!(json, "\"HIGH\"");
        let back: Gender = serde_json::from_str("\"male\"").unwrap();
        assert_eq!(back, Gender::Male);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Gender::from_str("unknown").is_err());
        assert!(RiskCategory::from_str("").is_err());
        assert!(serde_json::from_str::<XrayLabel>("\"cat\"").is_err());
    }
}
