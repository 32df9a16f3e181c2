//! Unit tests for the wizard state machine

#[cfg(test)]
mod tests {
    use crate::{
        catalog::BookingType,
        form::{BookingForm, FieldValue, FormError},
        locale::Locale,
        messages::Message,
        wizard::{BookingWizard, StepOutcome, WizardError, WizardPhase},
    };

    /// Answer the current step and move on
    fn answer(wizard: &mut BookingWizard, value: &str) -> StepOutcome {
        let key = wizard.current_step().key;
        wizard.set_field(key, value).unwrap();
        wizard.advance().unwrap()
    }

    fn hotel_at_checkout(check_in: &str) -> BookingWizard {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        answer(&mut wizard, "Grand Baie");
        answer(&mut wizard, check_in);
        assert_eq!(wizard.current_step().key, "checkOut");
        wizard
    }

    #[test]
    fn test_new_wizard_starts_on_first_step() {
        let wizard = BookingWizard::new(BookingType::Taxi, Locale::Fr);
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.current_step().key, "pickupLocation");
        assert_eq!(wizard.current_step().label, "Lieu de prise en charge");
        assert_eq!(wizard.value("passengers"), Some(&FieldValue::Number(1)));
        assert_eq!(wizard.active_error(), None);
        assert_eq!(wizard.phase(), WizardPhase::Collecting);
    }

    #[test]
    fn test_text_step_requires_value_and_min_length() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);

        assert_eq!(
            wizard.advance().unwrap(),
            StepOutcome::Invalid(Message::EnterValue)
        );
        assert_eq!(answer(&mut wizard, "  G "), StepOutcome::Invalid(Message::MinChars { min: 2 }));
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.active_error(), Some(&Message::MinChars { min: 2 }));

        assert_eq!(answer(&mut wizard, "Grand Baie"), StepOutcome::Moved { index: 1 });
        assert_eq!(wizard.active_error(), None);
    }

    #[test]
    fn test_date_step_requires_selection() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        answer(&mut wizard, "Grand Baie");
        assert_eq!(answer(&mut wizard, "  "), StepOutcome::Invalid(Message::SelectValue));
        assert_eq!(wizard.step_index(), 1);
    }

    #[test]
    fn test_checkout_must_follow_checkin() {
        let mut wizard = hotel_at_checkout("2025-01-10");

        assert_eq!(
            answer(&mut wizard, "2025-01-05"),
            StepOutcome::Invalid(Message::CheckoutAfterCheckin)
        );
        assert_eq!(
            answer(&mut wizard, "2025-01-10"),
            StepOutcome::Invalid(Message::CheckoutAfterCheckin)
        );
        assert_eq!(wizard.step_index(), 2);

        assert_eq!(answer(&mut wizard, "2025-01-12"), StepOutcome::Moved { index: 3 });
    }

    #[test]
    fn test_checkout_rule_skipped_for_unreadable_dates() {
        let mut wizard = hotel_at_checkout("sometime in May");
        assert_eq!(answer(&mut wizard, "2025-01-05"), StepOutcome::Moved { index: 3 });
    }

    #[test]
    fn test_number_step_rules() {
        let mut wizard = hotel_at_checkout("2025-01-10");
        answer(&mut wizard, "2025-01-12");
        assert_eq!(wizard.current_step().key, "rooms");

        assert_eq!(answer(&mut wizard, "abc"), StepOutcome::Invalid(Message::EnterNumber));
        assert_eq!(answer(&mut wizard, ""), StepOutcome::Invalid(Message::EnterNumber));
        assert_eq!(
            answer(&mut wizard, "25"),
            StepOutcome::Invalid(Message::Between { min: 1, max: 20 })
        );
        assert_eq!(
            wizard
                .active_error()
                .map(|m| m.render(Locale::Fr)),
            Some("Veuillez entrer une valeur entre 1 et 20.".to_string())
        );
        assert_eq!(answer(&mut wizard, "20"), StepOutcome::Moved { index: 4 });
    }

    #[test]
    fn test_set_field_clears_error_only_for_current_step() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        wizard.advance().unwrap();
        assert!(wizard.active_error().is_some());

        wizard.set_field("rooms", 3_i64).unwrap();
        assert!(wizard.active_error().is_some());
        assert_eq!(wizard.value("rooms"), Some(&FieldValue::Number(3)));

        wizard.set_field("hotelNameOrArea", "Flic en Flac").unwrap();
        assert!(wizard.active_error().is_none());
    }

    #[test]
    fn test_set_field_rejects_other_flow_keys() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        let err = wizard.set_field("passengers", 2_i64).unwrap_err();
        assert!(matches!(err, WizardError::Form(FormError::UnknownField { .. })));
    }

    #[test]
    fn test_back_moves_without_validation_and_clears_error() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        assert!(!wizard.back().unwrap());

        answer(&mut wizard, "Grand Baie");
        wizard.advance().unwrap();
        assert!(wizard.active_error().is_some());

        assert!(wizard.back().unwrap());
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.active_error(), None);
    }

    #[test]
    fn test_completed_hotel_form_is_typed() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        let answers = [
            "Grand Baie",
            "2025-01-10",
            "2025-01-12",
            "2",
            "3",
            "1",
            "15000",
        ];
        for value in answers {
            assert!(matches!(answer(&mut wizard, value), StepOutcome::Moved { .. }));
        }
        assert!(wizard.is_last_step());

        let StepOutcome::Ready(form) = wizard.advance().unwrap() else {
            panic!("expected a completed form");
        };
        assert_eq!(form.booking_type(), BookingType::Hotel);
        assert!(wizard.is_submitting());

        let json = serde_json::to_value(&form).unwrap();
        let object = json.as_object().unwrap();
        let mut keys: Vec<_> = object
            .keys()
            .filter(|k| k.as_str() != "type")
            .cloned()
            .collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "adults",
                "budgetMUR",
                "checkIn",
                "checkOut",
                "children",
                "hotelNameOrArea",
                "rooms",
                "specialRequests"
            ]
        );
        assert!(object["rooms"].is_i64());
        assert!(object["adults"].is_i64());
        assert!(object["children"].is_i64());
        assert_eq!(object["budgetMUR"], 15000.0);
        assert_eq!(object["specialRequests"], "");
    }

    #[test]
    fn test_confirm_on_first_step_stops_at_missing_answer() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);

        assert_eq!(
            wizard.confirm().unwrap(),
            StepOutcome::Invalid(Message::EnterValue)
        );
        assert_eq!(wizard.step_index(), 0);
        assert!(!wizard.is_submitting());

        wizard.set_field("hotelNameOrArea", "Grand Baie").unwrap();
        assert_eq!(
            wizard.confirm().unwrap(),
            StepOutcome::Invalid(Message::SelectValue)
        );
        assert_eq!(wizard.current_step().key, "checkIn");
    }

    #[test]
    fn test_confirm_jumps_to_checkout_on_bad_order() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        wizard.set_field("hotelNameOrArea", "Grand Baie").unwrap();
        wizard.set_field("checkIn", "2025-03-10").unwrap();
        wizard.set_field("checkOut", "2025-03-01").unwrap();

        assert_eq!(
            wizard.confirm().unwrap(),
            StepOutcome::Invalid(Message::CheckoutAfterCheckin)
        );
        assert_eq!(wizard.step_index(), 2);
        assert_eq!(wizard.active_error(), Some(&Message::CheckoutAfterCheckin));
        assert_eq!(wizard.phase(), WizardPhase::Collecting);
    }

    #[test]
    fn test_confirm_rechecks_number_steps() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        wizard.set_field("hotelNameOrArea", "Grand Baie").unwrap();
        wizard.set_field("checkIn", "2025-03-01").unwrap();
        wizard.set_field("checkOut", "2025-03-04").unwrap();
        wizard.set_field("adults", "lots").unwrap();

        assert_eq!(
            wizard.confirm().unwrap(),
            StepOutcome::Invalid(Message::EnterNumber)
        );
        assert_eq!(wizard.current_step().key, "adults");
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_submitting_phase_rejects_edits() {
        let mut wizard = BookingWizard::new(BookingType::Taxi, Locale::En);
        wizard.set_field("pickupLocation", "SSR Airport").unwrap();
        wizard.set_field("dropoffLocation", "Port Louis").unwrap();
        wizard.set_field("pickupDate", "2025-02-01").unwrap();
        wizard.set_field("pickupTime", "08:15").unwrap();
        assert!(matches!(wizard.confirm().unwrap(), StepOutcome::Ready(BookingForm::Taxi(_))));

        assert_eq!(wizard.set_field("notes", "late").unwrap_err(), WizardError::Busy);
        assert_eq!(wizard.advance().unwrap_err(), WizardError::Busy);
        assert_eq!(wizard.back().unwrap_err(), WizardError::Busy);

        wizard.resume_collecting();
        assert!(wizard.set_field("notes", "late").is_ok());
    }

    #[test]
    fn test_nudge_stays_in_bounds() {
        let mut wizard = BookingWizard::new(BookingType::Taxi, Locale::En);
        assert_eq!(wizard.nudge(1).unwrap(), None);

        for value in ["Airport", "Port Louis", "2025-02-01", "08:15"] {
            answer(&mut wizard, value);
        }
        assert_eq!(wizard.current_step().key, "passengers");

        assert_eq!(wizard.nudge(-1).unwrap(), Some(1));
        assert_eq!(wizard.nudge(1).unwrap(), Some(2));
        wizard.set_field("passengers", 50_i64).unwrap();
        assert_eq!(wizard.nudge(1).unwrap(), Some(50));
        wizard.set_field("passengers", "many").unwrap();
        assert_eq!(wizard.nudge(1).unwrap(), Some(1));
    }

    #[test]
    fn test_switching_flow_keeps_each_form() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        answer(&mut wizard, "Grand Baie");
        wizard.advance().unwrap();
        assert!(wizard.active_error().is_some());

        wizard.switch_booking_type(BookingType::Taxi);
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.active_error(), None);
        assert_eq!(wizard.current_step().key, "pickupLocation");

        wizard.switch_booking_type(BookingType::Hotel);
        assert_eq!(
            wizard.value("hotelNameOrArea"),
            Some(&FieldValue::from("Grand Baie"))
        );
    }

    #[test]
    fn test_locale_change_restarts_steps() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        answer(&mut wizard, "Grand Baie");
        assert_eq!(wizard.step_index(), 1);

        wizard.set_locale(Locale::Fr);
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.current_step().label, "Nom de l’hôtel ou zone");
        assert_eq!(
            wizard.value("hotelNameOrArea"),
            Some(&FieldValue::from("Grand Baie"))
        );
    }

    #[test]
    fn test_optional_steps_accept_blank() {
        let mut wizard = BookingWizard::new(BookingType::Taxi, Locale::En);
        for value in ["Airport", "Port Louis", "2025-02-01", "08:15", "2"] {
            answer(&mut wizard, value);
        }
        assert_eq!(answer(&mut wizard, ""), StepOutcome::Moved { index: 6 });
        assert!(matches!(answer(&mut wizard, ""), StepOutcome::Ready(_)));
    }

    #[test]
    fn test_trusted_answer_survives_confirm_until_rewritten() {
        let mut wizard = BookingWizard::new(BookingType::Hotel, Locale::En);
        wizard.set_field("hotelNameOrArea", "A").unwrap();
        assert_eq!(wizard.advance_trusted().unwrap(), StepOutcome::Moved { index: 1 });
        wizard.set_field("checkIn", "2025-01-10").unwrap();
        wizard.set_field("checkOut", "2025-01-12").unwrap();

        assert!(matches!(wizard.confirm().unwrap(), StepOutcome::Ready(_)));

        wizard.resume_collecting();
        wizard.set_field("hotelNameOrArea", "A").unwrap();
        assert_eq!(
            wizard.confirm().unwrap(),
            StepOutcome::Invalid(Message::MinChars { min: 2 })
        );
        assert_eq!(wizard.step_index(), 0);
    }

    #[test]
    fn test_trusted_dates_still_need_checkout_after_checkin() {
        let mut wizard = hotel_at_checkout("2025-01-10");
        wizard.set_field("checkOut", "2025-01-02").unwrap();
        wizard.advance_trusted().unwrap();

        assert_eq!(
            wizard.confirm().unwrap(),
            StepOutcome::Invalid(Message::CheckoutAfterCheckin)
        );
        assert_eq!(wizard.current_step().key, "checkOut");
    }

    #[test]
    fn test_budget_takes_decimals_and_counts_do_not() {
        let mut wizard = hotel_at_checkout("2025-01-10");
        answer(&mut wizard, "2025-01-12");

        assert_eq!(answer(&mut wizard, "2.5"), StepOutcome::Invalid(Message::WholeNumber));
        assert_eq!(answer(&mut wizard, "2.0"), StepOutcome::Moved { index: 4 });
        answer(&mut wizard, "2");
        answer(&mut wizard, "0");
        assert_eq!(wizard.current_step().key, "budgetMUR");

        assert_eq!(
            answer(&mut wizard, "-0.5"),
            StepOutcome::Invalid(Message::Between { min: 0, max: 1_000_000 })
        );
        assert_eq!(answer(&mut wizard, "1500.50"), StepOutcome::Moved { index: 7 });

        let StepOutcome::Ready(BookingForm::Hotel(hotel)) = wizard.confirm().unwrap() else {
            panic!("expected a hotel booking");
        };
        assert_eq!(hotel.budget_mur, 1500.5);
        assert_eq!(hotel.rooms, 2);
    }
}
