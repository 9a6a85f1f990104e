//! Phone normalization: raw phone strings to canonical identities.
//!
//! Numbers are parsed under a default region (so national formats such as a
//! Russian trunk `8` prefix resolve), validated against the region metadata,
//! and rendered in international format. Every spelling of the same
//! subscriber therefore lands on one [`Identity`].

use phonenumber::metadata::DATABASE;
use phonenumber::{country, Mode, PhoneNumber};

use crate::error::{CoreError, Result};
use crate::types::Identity;

/// The region assumed when none is configured.
pub const DEFAULT_REGION: &str = "RU";

/// Converts raw phone strings into canonical identities under a fixed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneNormalizer {
    region: country::Id,
}

impl PhoneNormalizer {
    /// Create a normalizer for an ISO 3166-1 alpha-2 region code.
    pub fn new(region: &str) -> Result<Self> {
        let region = region
            .trim()
            .to_ascii_uppercase()
            .parse::<country::Id>()
            .map_err(|_| CoreError::UnknownRegion(region.to_string()))?;
        Ok(Self { region })
    }

    /// The region numbers without a leading `+` are parsed under.
    pub fn region(&self) -> country::Id {
        self.region
    }

    /// Normalize a raw phone string.
    ///
    /// Fails with [`CoreError::InvalidPhone`] when the string cannot be parsed
    /// or does not denote a valid number.
    pub fn normalize(&self, raw: &str) -> Result<Identity> {
        let number = phonenumber::parse(Some(self.region), raw).map_err(|e| {
            CoreError::InvalidPhone {
                raw: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        let number = if phonenumber::is_valid(&number) {
            number
        } else {
            restore_trunk_digit(raw, &number).ok_or_else(|| CoreError::InvalidPhone {
                raw: raw.to_string(),
                reason: "not a valid number for any known numbering plan".to_string(),
            })?
        };

        Ok(Identity::new(
            number.format().mode(Mode::International).to_string(),
        ))
    }
}

/// Recover a national number whose leading digit equals the trunk prefix.
///
/// The parser strips the trunk prefix from the national number even after an
/// explicit country code, so `+7 812 ...` comes back as `12 ...`. When the
/// raw digits still end with the prefix followed by what was parsed, the
/// number is rebuilt with that digit restored and accepted only if the
/// rebuilt number is itself valid.
fn restore_trunk_digit(raw: &str, number: &PhoneNumber) -> Option<PhoneNumber> {
    let code = number.code().value();
    let candidates = DATABASE.by_code(&code)?;
    let meta = candidates
        .iter()
        .find(|m| m.is_main_country_for_code())
        .or_else(|| candidates.first())?;
    let prefix = meta.national_prefix()?;
    let region = meta.id().parse::<country::Id>().ok()?;

    let national = format!("{prefix}{}", number.national());
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if !digits.ends_with(&national) {
        return None;
    }

    // Each prefix copy in front of the national number is consumed by one
    // stripping pass; stop at the padding that leaves it intact.
    (0..=2).find_map(|pad| {
        let padded = format!("+{code}{}{national}", prefix.repeat(pad));
        let reparsed = phonenumber::parse(Some(region), padded).ok()?;
        (reparsed.national().to_string() == national && phonenumber::is_valid(&reparsed))
            .then_some(reparsed)
    })
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self {
            region: country::Id::RU,
        }
    }
}

/// Normalize `raw` under `region` in one call.
pub fn normalize(raw: &str, region: &str) -> Result<Identity> {
    PhoneNormalizer::new(region)?.normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_subscriber_different_formats() {
        let n = PhoneNormalizer::default();
        let canonical = n.normalize("+79854321234").unwrap();

        for raw in [
            "+7 985 432 12 34",
            "8(985)4321234",
            "89854321234",
            "8 985 432-12-34",
            "+7 (985) 432-12-34",
        ] {
            assert_eq!(n.normalize(raw).unwrap(), canonical, "format {raw:?}");
        }
    }

    #[test]
    fn test_country_code_without_plus() {
        let n = PhoneNormalizer::default();
        assert_eq!(
            n.normalize("79162342359").unwrap(),
            n.normalize("+7 916 234 23 59").unwrap()
        );
    }

    #[test]
    fn test_international_format() {
        let id = normalize("8 342 456 23 54", "RU").unwrap();
        assert!(id.as_str().starts_with("+7 "));
        assert!(id.as_str().contains("342"));
    }

    #[test]
    fn test_idempotent() {
        let n = PhoneNormalizer::default();
        let once = n.normalize("8(985)4321234").unwrap();
        let twice = n.normalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        let n = PhoneNormalizer::default();
        for raw in ["", "hello", "123"] {
            assert!(
                matches!(n.normalize(raw), Err(CoreError::InvalidPhone { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_area_codes_starting_with_trunk_digit() {
        let n = PhoneNormalizer::default();
        let canonical = n.normalize("+7 812 314 15 92").unwrap();

        for raw in ["8 812 314 15 92", "+78123141592", "88123141592", "8(812)314-15-92"] {
            assert_eq!(n.normalize(raw).unwrap(), canonical, "format {raw:?}");
        }
        assert!(canonical.as_str().starts_with("+7 812"));
        assert_eq!(n.normalize(canonical.as_str()).unwrap(), canonical);
    }

    #[test]
    fn test_regional_and_toll_free_numbers() {
        let n = PhoneNormalizer::default();
        for raw in ["8 (843) 231-00-00", "+7 861 234 56 78", "8-800-555-35-35", "8 800 100 00 00"] {
            assert!(n.normalize(raw).is_ok(), "{raw:?} should normalize");
        }
        assert_eq!(
            n.normalize("8-800-555-35-35").unwrap(),
            n.normalize("+7 800 555 35 35").unwrap()
        );
    }

    #[test]
    fn test_invalid_number_after_trunk_prefix_still_rejected() {
        let n = PhoneNormalizer::default();
        assert!(matches!(
            n.normalize("8 812 314 15"),
            Err(CoreError::InvalidPhone { .. })
        ));
    }

    #[test]
    fn test_region_code_case_insensitive() {
        let n = PhoneNormalizer::new("ru").unwrap();
        assert_eq!(n, PhoneNormalizer::default());
        assert_eq!(n.region(), country::Id::RU);
    }

    #[test]
    fn test_unknown_region() {
        assert!(matches!(
            PhoneNormalizer::new("ZZZ"),
            Err(CoreError::UnknownRegion(_))
        ));
    }
}
