//! Proptest generators for property-based testing.

use proptest::prelude::*;

use chatroll::{Chat, ChatId, MessengerStore, PhoneNormalizer, StoreConfig, User};

/// Codes valid with any 7-digit subscriber number in the RU numbering plan.
///
/// Mobile (`9xx`), Moscow (`495`), regional area codes that begin with the
/// trunk digit `8`, and toll-free `800`.
const RU_CODES: &[&str] = &[
    "903", "916", "926", "985", "999", "495", "812", "843", "861", "800",
];

/// Ways of writing the same RU number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneFormat {
    /// `+79854321234`
    E164,
    /// `89854321234`
    Trunk,
    /// `79854321234`
    CountryCodeNoPlus,
    /// `9854321234`
    National,
    /// `+7 985 432 12 34`
    Spaced,
    /// `8(985)432-12-34`
    Parenthesized,
}

impl PhoneFormat {
    pub const ALL: [PhoneFormat; 6] = [
        PhoneFormat::E164,
        PhoneFormat::Trunk,
        PhoneFormat::CountryCodeNoPlus,
        PhoneFormat::National,
        PhoneFormat::Spaced,
        PhoneFormat::Parenthesized,
    ];
}

/// Render a 10-digit RU national number in `format`.
pub fn format_phone(national: &str, format: PhoneFormat) -> String {
    let (code, rest) = national.split_at(3);
    let (a, rest) = rest.split_at(3);
    let (b, c) = rest.split_at(2);
    match format {
        PhoneFormat::E164 => format!("+7{national}"),
        PhoneFormat::Trunk => format!("8{national}"),
        PhoneFormat::CountryCodeNoPlus => format!("7{national}"),
        PhoneFormat::National => national.to_string(),
        PhoneFormat::Spaced => format!("+7 {code} {a} {b} {c}"),
        PhoneFormat::Parenthesized => format!("8({code}){a}-{b}-{c}"),
    }
}

/// Generate a valid 10-digit RU national number.
pub fn ru_number() -> impl Strategy<Value = String> {
    (prop::sample::select(RU_CODES), "[0-9]{7}")
        .prop_map(|(code, rest)| format!("{code}{rest}"))
}

/// Generate a phone format.
pub fn phone_format() -> impl Strategy<Value = PhoneFormat> {
    prop::sample::select(PhoneFormat::ALL.to_vec())
}

/// Generate a number together with every spelling of it.
pub fn phone_spellings() -> impl Strategy<Value = (String, Vec<String>)> {
    ru_number().prop_map(|national| {
        let spellings = PhoneFormat::ALL
            .iter()
            .map(|f| format_phone(&national, *f))
            .collect();
        (national, spellings)
    })
}

/// Generate strings that are not phone numbers under any region.
pub fn malformed_phone() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,3}",
        prop::sample::select(vec!["", "hello", "not a phone", "--", "()"]).prop_map(String::from),
    ]
}

/// Parameters for generating a store: chats as lists of phone spellings.
#[derive(Debug, Clone)]
pub struct StoreParams {
    pub chats: Vec<Vec<String>>,
}

impl Arbitrary for StoreParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        // A small pool of numbers keeps overlap between chats likely.
        prop::collection::vec(ru_number(), 1..=6)
            .prop_flat_map(|pool| {
                let member = (prop::sample::select(pool), phone_format())
                    .prop_map(|(national, format)| format_phone(&national, format));
                prop::collection::vec(prop::collection::vec(member, 0..=5), 0..=4)
            })
            .prop_map(|chats| StoreParams { chats })
            .boxed()
    }
}

/// Build a store from parameters. Chat `i` gets id `chat{i}`.
pub fn store_from_params(params: &StoreParams) -> MessengerStore {
    let normalizer = PhoneNormalizer::default();
    let chats = params.chats.iter().enumerate().map(|(i, phones)| {
        let mut chat = Chat::new();
        chat.add_members(phones.iter().enumerate().map(|(j, phone)| {
            User::with_normalizer(format!("user{j}"), phone.as_str(), &normalizer)
                .unwrap_or_else(|e| panic!("generated phone {phone:?} is invalid: {e}"))
        }));
        (ChatId::from(format!("chat{i}")), chat)
    });
    MessengerStore::new(chats, StoreConfig::default()).expect("default config is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatroll::CoreError;
    use std::collections::BTreeSet;

    proptest! {
        #[test]
        fn test_spellings_normalize_identically((national, spellings) in phone_spellings()) {
            let normalizer = PhoneNormalizer::default();
            let canonical = normalizer.normalize(&national).unwrap();

            for spelling in &spellings {
                prop_assert_eq!(&normalizer.normalize(spelling).unwrap(), &canonical);
            }
        }

        #[test]
        fn test_trunk_digit_area_codes_keep_their_code(
            code in prop::sample::select(vec!["812", "843", "861", "800"]),
            rest in "[0-9]{7}",
            format in phone_format(),
        ) {
            let national = format!("{code}{rest}");
            let identity = PhoneNormalizer::default()
                .normalize(&format_phone(&national, format))
                .unwrap();
            let prefix = format!("+7 {code} ");
            prop_assert!(identity.as_str().starts_with(&prefix));
        }

        #[test]
        fn test_normalize_idempotent(national in ru_number(), format in phone_format()) {
            let normalizer = PhoneNormalizer::default();
            let once = normalizer.normalize(&format_phone(&national, format)).unwrap();
            let twice = normalizer.normalize(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_malformed_rejected(raw in malformed_phone()) {
            let result = User::with_normalizer("u", raw.as_str(), &PhoneNormalizer::default());
            let is_invalid_phone = matches!(result, Err(CoreError::InvalidPhone { .. }));
            prop_assert!(is_invalid_phone);
        }

        #[test]
        fn test_union_commutative(a: StoreParams, b: StoreParams) {
            let (a, b) = (store_from_params(&a), store_from_params(&b));
            prop_assert_eq!(a.union(&b), b.union(&a));
        }

        #[test]
        fn test_intersection_commutative(a: StoreParams, b: StoreParams) {
            let (a, b) = (store_from_params(&a), store_from_params(&b));
            prop_assert_eq!(a.intersection(&b), b.intersection(&a));
        }

        #[test]
        fn test_self_laws(params: StoreParams) {
            let a = store_from_params(&params);
            prop_assert!(a.difference(&a).is_empty());
            prop_assert_eq!(&a.intersection(&a), a.unique_identities());
            prop_assert_eq!(&a.union(&a), a.unique_identities());
            prop_assert_eq!(&a, &a);
        }

        #[test]
        fn test_difference_partitions(a: StoreParams, b: StoreParams) {
            let (a, b) = (store_from_params(&a), store_from_params(&b));
            let diff = a.difference(&b);
            let inter = a.intersection(&b);

            prop_assert!(diff.is_disjoint(&inter));
            let rebuilt: BTreeSet<_> = diff.union(&inter).cloned().collect();
            prop_assert_eq!(&rebuilt, a.unique_identities());
        }

        #[test]
        fn test_ordering_follows_cardinality(a: StoreParams, b: StoreParams) {
            let (a, b) = (store_from_params(&a), store_from_params(&b));
            prop_assert_eq!(a.cmp(&b), a.identity_count().cmp(&b.identity_count()));
            prop_assert_eq!(a == b, a.identity_count() == b.identity_count());
        }

        #[test]
        fn test_identities_equal_member_union(params: StoreParams) {
            let store = store_from_params(&params);
            let expected: BTreeSet<_> = store
                .chat_ids()
                .flat_map(|id| store.chat(id).into_iter().flat_map(|c| c.member_identities()))
                .cloned()
                .collect();
            prop_assert_eq!(&expected, store.unique_identities());
        }
    }
}
