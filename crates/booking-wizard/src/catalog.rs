//! Step catalog
//!
//! One language-neutral schema per booking type, combined with a per-locale
//! string table into the ordered step list for `(BookingType, Locale)`.

use std::{collections::HashMap, fmt, str::FromStr};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

pub const CHECK_IN: &str = "checkIn";
pub const CHECK_OUT: &str = "checkOut";

/// The kinds of booking the wizard can collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Hotel,
    Taxi,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Hotel => "hotel",
            BookingType::Taxi => "taxi",
        }
    }

    fn schema(&self) -> &'static [StepSchema] {
        match self {
            BookingType::Hotel => HOTEL_SCHEMA,
            BookingType::Taxi => TAXI_SCHEMA,
        }
    }

    /// Number of steps in this booking flow
    pub fn step_count(&self) -> usize {
        self.schema().len()
    }

    /// Position of the check-out step, for flows that have one
    pub fn checkout_index(&self) -> Option<usize> {
        self.schema().iter().position(|s| s.key == CHECK_OUT)
    }

    /// Whether `key` names one of this flow's steps
    pub fn has_key(&self, key: &str) -> bool {
        self.schema().iter().any(|s| s.key == key)
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hotel" => Ok(BookingType::Hotel),
            "taxi" => Ok(BookingType::Taxi),
            other => Err(format!("Unknown booking type: {}", other)),
        }
    }
}

/// Input kind of a step, which selects its validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Text,
    Date,
    Time,
    Number,
}

/// A single localized question in a booking flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: StepKind,
    pub optional: bool,
    pub min_len: Option<usize>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    /// Number steps that only take whole numbers
    pub whole: bool,
    pub placeholder: Option<&'static str>,
}

impl StepDefinition {
    pub fn is_number(&self) -> bool {
        self.kind == StepKind::Number
    }

    /// Clamp range for stepper and spoken numbers, `[0, 9999]` where unbounded
    pub fn bounds(&self) -> (i64, i64) {
        (self.min.unwrap_or(0), self.max.unwrap_or(9999))
    }
}

/// Language-neutral part of a step
struct StepSchema {
    key: &'static str,
    kind: StepKind,
    optional: bool,
    min_len: Option<usize>,
    min: Option<i64>,
    max: Option<i64>,
    whole: bool,
}

impl StepSchema {
    const fn text(key: &'static str, min_len: Option<usize>, optional: bool) -> Self {
        Self {
            key,
            kind: StepKind::Text,
            optional,
            min_len,
            min: None,
            max: None,
            whole: false,
        }
    }

    const fn picker(key: &'static str, kind: StepKind) -> Self {
        Self {
            key,
            kind,
            optional: false,
            min_len: None,
            min: None,
            max: None,
            whole: false,
        }
    }

    /// A count: whole numbers in `[min, max]`
    const fn number(key: &'static str, min: i64, max: i64) -> Self {
        Self {
            key,
            kind: StepKind::Number,
            optional: false,
            min_len: None,
            min: Some(min),
            max: Some(max),
            whole: true,
        }
    }

    /// An amount: any number in `[min, max]`, decimals included
    const fn amount(key: &'static str, min: i64, max: i64) -> Self {
        Self {
            whole: false,
            ..Self::number(key, min, max)
        }
    }
}

const HOTEL_SCHEMA: &[StepSchema] = &[
    StepSchema::text("hotelNameOrArea", Some(2), false),
    StepSchema::picker(CHECK_IN, StepKind::Date),
    StepSchema::picker(CHECK_OUT, StepKind::Date),
    StepSchema::number("rooms", 1, 20),
    StepSchema::number("adults", 1, 50),
    StepSchema::number("children", 0, 50),
    StepSchema::amount("budgetMUR", 0, 1_000_000),
    StepSchema::text("specialRequests", None, true),
];

const TAXI_SCHEMA: &[StepSchema] = &[
    StepSchema::text("pickupLocation", Some(2), false),
    StepSchema::text("dropoffLocation", Some(2), false),
    StepSchema::picker("pickupDate", StepKind::Date),
    StepSchema::picker("pickupTime", StepKind::Time),
    StepSchema::number("passengers", 1, 50),
    StepSchema::text("luggage", None, true),
    StepSchema::text("notes", None, true),
];

/// Label and placeholder of a step in one locale
fn step_strings(locale: Locale, key: &str) -> (&'static str, Option<&'static str>) {
    match (locale, key) {
        (Locale::En, "hotelNameOrArea") => ("Hotel name or area", Some("e.g., Grand Baie")),
        (Locale::En, "checkIn") => ("Check-in date", None),
        (Locale::En, "checkOut") => ("Check-out date", None),
        (Locale::En, "rooms") => ("Rooms", None),
        (Locale::En, "adults") => ("Adults", None),
        (Locale::En, "children") => ("Children", None),
        (Locale::En, "budgetMUR") => ("Budget (MUR)", None),
        (Locale::En, "specialRequests") => (
            "Special requests (optional)",
            Some("e.g., breakfast included"),
        ),
        (Locale::En, "pickupLocation") => ("Pickup location", Some("e.g., SSR Airport")),
        (Locale::En, "dropoffLocation") => ("Dropoff location", Some("e.g., Port Louis")),
        (Locale::En, "pickupDate") => ("Pickup date", None),
        (Locale::En, "pickupTime") => ("Pickup time", None),
        (Locale::En, "passengers") => ("Number of passengers", None),
        (Locale::En, "luggage") => ("Luggage (optional)", Some("e.g., 2 suitcases")),
        (Locale::En, "notes") => ("Notes (optional)", Some("Any additional info")),

        (Locale::Fr, "hotelNameOrArea") => ("Nom de l’hôtel ou zone", Some("ex. Grand Baie")),
        (Locale::Fr, "checkIn") => ("Date d’arrivée", None),
        (Locale::Fr, "checkOut") => ("Date de départ", None),
        (Locale::Fr, "rooms") => ("Chambres", None),
        (Locale::Fr, "adults") => ("Adultes", None),
        (Locale::Fr, "children") => ("Enfants", None),
        (Locale::Fr, "budgetMUR") => ("Budget (MUR)", None),
        (Locale::Fr, "specialRequests") => (
            "Demandes spéciales (optionnel)",
            Some("ex. petit-déjeuner inclus"),
        ),
        (Locale::Fr, "pickupLocation") => ("Lieu de prise en charge", Some("ex. Aéroport SSR")),
        (Locale::Fr, "dropoffLocation") => ("Destination", Some("ex. Port-Louis")),
        (Locale::Fr, "pickupDate") => ("Date de prise en charge", None),
        (Locale::Fr, "pickupTime") => ("Heure de prise en charge", None),
        (Locale::Fr, "passengers") => ("Nombre de passagers", None),
        (Locale::Fr, "luggage") => ("Bagages (optionnel)", Some("ex. 2 valises")),
        (Locale::Fr, "notes") => ("Remarques (optionnel)", Some("Informations supplémentaires")),

        (_, other) => {
            tracing::warn!("No label for step '{}' in locale {}", other, locale);
            ("", None)
        }
    }
}

static CATALOG: Lazy<HashMap<(BookingType, Locale), Vec<StepDefinition>>> = Lazy::new(|| {
    let mut catalog = HashMap::new();
    for booking_type in [BookingType::Hotel, BookingType::Taxi] {
        for locale in [Locale::En, Locale::Fr] {
            let steps = booking_type
                .schema()
                .iter()
                .map(|schema| {
                    let (label, placeholder) = step_strings(locale, schema.key);
                    StepDefinition {
                        key: schema.key,
                        label,
                        kind: schema.kind,
                        optional: schema.optional,
                        min_len: schema.min_len,
                        min: schema.min,
                        max: schema.max,
                        whole: schema.whole,
                        placeholder,
                    }
                })
                .collect();
            catalog.insert((booking_type, locale), steps);
        }
    }
    catalog
});

/// Ordered steps of a booking flow in the given locale
pub fn steps(booking_type: BookingType, locale: Locale) -> &'static [StepDefinition] {
    CATALOG
        .get(&(booking_type, locale))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotel_step_order() {
        let keys: Vec<_> = steps(BookingType::Hotel, Locale::En)
            .iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                "hotelNameOrArea",
                "checkIn",
                "checkOut",
                "rooms",
                "adults",
                "children",
                "budgetMUR",
                "specialRequests"
            ]
        );
        assert_eq!(BookingType::Hotel.checkout_index(), Some(2));
    }

    #[test]
    fn test_taxi_step_order() {
        let keys: Vec<_> = steps(BookingType::Taxi, Locale::Fr)
            .iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                "pickupLocation",
                "dropoffLocation",
                "pickupDate",
                "pickupTime",
                "passengers",
                "luggage",
                "notes"
            ]
        );
        assert_eq!(BookingType::Taxi.checkout_index(), None);
    }

    #[test]
    fn test_locales_share_schema_and_have_labels() {
        for booking_type in [BookingType::Hotel, BookingType::Taxi] {
            let en = steps(booking_type, Locale::En);
            let fr = steps(booking_type, Locale::Fr);
            assert_eq!(en.len(), fr.len());
            for (a, b) in en.iter().zip(fr) {
                assert_eq!(a.key, b.key);
                assert_eq!(a.kind, b.kind);
                assert_eq!((a.min, a.max, a.min_len), (b.min, b.max, b.min_len));
                assert!(!a.label.is_empty(), "missing English label for {}", a.key);
                assert!(!b.label.is_empty(), "missing French label for {}", b.key);
            }
        }
    }

    #[test]
    fn test_number_bounds() {
        let budget = steps(BookingType::Hotel, Locale::En)
            .iter()
            .find(|s| s.key == "budgetMUR")
            .unwrap();
        assert!(budget.is_number());
        assert!(!budget.whole);
        assert_eq!((budget.min, budget.max), (Some(0), Some(1_000_000)));

        let rooms = steps(BookingType::Hotel, Locale::En)
            .iter()
            .find(|s| s.key == "rooms")
            .unwrap();
        assert!(rooms.whole);
    }
}
