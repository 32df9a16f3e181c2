//! Collected form values and the typed booking payload

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::BookingType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Unknown field '{key}' for {booking_type} booking")]
    UnknownField {
        key: String,
        booking_type: BookingType,
    },
    #[error("Field '{0}' is not a number")]
    NotANumber(String),
}

pub type FormResult<T> = std::result::Result<T, FormError>;

/// A raw answer as entered by the user, typed or spoken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl FieldValue {
    /// Numeric reading of the value; blank or non-integral text has none
    pub fn as_number(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                if let Ok(n) = s.parse::<i64>() {
                    return Some(n);
                }
                match s.parse::<f64>() {
                    Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Some(f as i64)
                    }
                    _ => None,
                }
            }
        }
    }

    /// Numeric reading that also accepts decimals such as `1500.50`
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n as f64),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Number(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

/// Draft answers of one booking flow, keyed by step key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    booking_type: BookingType,
    values: HashMap<String, FieldValue>,
}

impl FormValues {
    /// Default initial values of a booking flow
    pub fn initial(booking_type: BookingType) -> Self {
        let defaults: Vec<(&str, FieldValue)> = match booking_type {
            BookingType::Hotel => vec![
                ("hotelNameOrArea", "".into()),
                ("checkIn", "".into()),
                ("checkOut", "".into()),
                ("rooms", 1.into()),
                ("adults", 2.into()),
                ("children", 0.into()),
                ("budgetMUR", 0.into()),
                ("specialRequests", "".into()),
            ],
            BookingType::Taxi => vec![
                ("pickupLocation", "".into()),
                ("dropoffLocation", "".into()),
                ("pickupDate", "".into()),
                ("pickupTime", "".into()),
                ("passengers", 1.into()),
                ("luggage", "".into()),
                ("notes", "".into()),
            ],
        };

        Self {
            booking_type,
            values: defaults
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn booking_type(&self) -> BookingType {
        self.booking_type
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// Overwrite one answer
    pub fn set(&mut self, key: &str, value: FieldValue) -> FormResult<()> {
        if !self.booking_type.has_key(key) {
            return Err(FormError::UnknownField {
                key: key.to_string(),
                booking_type: self.booking_type,
            });
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn text(&self, key: &str) -> String {
        self.values.get(key).map(FieldValue::as_text).unwrap_or_default()
    }

    fn number(&self, key: &str) -> FormResult<i64> {
        self.values
            .get(key)
            .and_then(FieldValue::as_number)
            .ok_or_else(|| FormError::NotANumber(key.to_string()))
    }

    fn decimal(&self, key: &str) -> FormResult<f64> {
        self.values
            .get(key)
            .and_then(FieldValue::as_decimal)
            .ok_or_else(|| FormError::NotANumber(key.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBooking {
    pub hotel_name_or_area: String,
    pub check_in: String,
    pub check_out: String,
    pub rooms: i64,
    pub adults: i64,
    pub children: i64,
    #[serde(rename = "budgetMUR")]
    pub budget_mur: f64,
    pub special_requests: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxiBooking {
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub passengers: i64,
    pub luggage: String,
    pub notes: String,
}

/// Completed booking handed to the submission collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookingForm {
    Hotel(HotelBooking),
    Taxi(TaxiBooking),
}

impl BookingForm {
    pub fn booking_type(&self) -> BookingType {
        match self {
            BookingForm::Hotel(_) => BookingType::Hotel,
            BookingForm::Taxi(_) => BookingType::Taxi,
        }
    }

    /// Build the typed payload, coercing counts to integers and amounts to decimals
    pub fn from_values(values: &FormValues) -> FormResult<Self> {
        Ok(match values.booking_type() {
            BookingType::Hotel => BookingForm::Hotel(HotelBooking {
                hotel_name_or_area: values.text("hotelNameOrArea"),
                check_in: values.text("checkIn"),
                check_out: values.text("checkOut"),
                rooms: values.number("rooms")?,
                adults: values.number("adults")?,
                children: values.number("children")?,
                budget_mur: values.decimal("budgetMUR")?,
                special_requests: values.text("specialRequests"),
            }),
            BookingType::Taxi => BookingForm::Taxi(TaxiBooking {
                pickup_location: values.text("pickupLocation"),
                dropoff_location: values.text("dropoffLocation"),
                pickup_date: values.text("pickupDate"),
                pickup_time: values.text("pickupTime"),
                passengers: values.number("passengers")?,
                luggage: values.text("luggage"),
                notes: values.text("notes"),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_coercion() {
        assert_eq!(FieldValue::from(" 12 ").as_number(), Some(12));
        assert_eq!(FieldValue::from("3.0").as_number(), Some(3));
        assert_eq!(FieldValue::from("2.5").as_number(), None);
        assert_eq!(FieldValue::from("").as_number(), None);
        assert_eq!(FieldValue::from("abc").as_number(), None);
        assert_eq!(FieldValue::Number(-4).as_number(), Some(-4));
    }

    #[test]
    fn test_decimal_reading() {
        assert_eq!(FieldValue::from(" 1500.50 ").as_decimal(), Some(1500.5));
        assert_eq!(FieldValue::from("2.5").as_decimal(), Some(2.5));
        assert_eq!(FieldValue::Number(7).as_decimal(), Some(7.0));
        assert_eq!(FieldValue::from("").as_decimal(), None);
        assert_eq!(FieldValue::from("inf").as_decimal(), None);
        assert_eq!(FieldValue::from("abc").as_decimal(), None);
    }

    #[test]
    fn test_hotel_payload_keeps_decimal_budget() {
        let mut values = FormValues::initial(BookingType::Hotel);
        values.set("budgetMUR", "1500.50".into()).unwrap();
        values.set("rooms", "2".into()).unwrap();

        let BookingForm::Hotel(hotel) = BookingForm::from_values(&values).unwrap() else {
            panic!("expected a hotel booking");
        };
        assert_eq!(hotel.budget_mur, 1500.5);
        assert_eq!(hotel.rooms, 2);
    }

    #[test]
    fn test_set_rejects_foreign_keys() {
        let mut values = FormValues::initial(BookingType::Taxi);
        assert!(values.set("pickupLocation", "Airport".into()).is_ok());
        let err = values.set("checkIn", "2025-01-01".into()).unwrap_err();
        assert!(matches!(err, FormError::UnknownField { .. }));
    }

    #[test]
    fn test_taxi_payload_shape() {
        let mut values = FormValues::initial(BookingType::Taxi);
        values.set("pickupLocation", "SSR Airport".into()).unwrap();
        values.set("passengers", "3".into()).unwrap();

        let form = BookingForm::from_values(&values).unwrap();
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["type"], "taxi");
        assert_eq!(json["pickupLocation"], "SSR Airport");
        assert_eq!(json["passengers"], 3);
    }

    #[test]
    fn test_payload_rejects_non_numeric_count() {
        let mut values = FormValues::initial(BookingType::Hotel);
        values.set("rooms", "many".into()).unwrap();
        assert_eq!(
            BookingForm::from_values(&values).unwrap_err(),
            FormError::NotANumber("rooms".to_string())
        );
    }
}
