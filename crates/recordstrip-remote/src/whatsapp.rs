//! WhatsApp deep links for charge reminders and welcome messages.
//!
//! Best-effort side channel: the link pre-fills a message in a new chat,
//! there is no delivery confirmation and a missing phone number simply
//! yields no link.

use recordstrip_core::model::Passenger;

/// Keep only the digits of a phone number, as `wa.me` expects.
pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// A `wa.me` link opening a chat with `phone` pre-filled with `message`.
/// `None` when the phone carries no digits at all.
pub fn wa_link(phone: &str, message: &str) -> Option<String> {
    let digits = digits_only(phone);
    if digits.is_empty() {
        return None;
    }
    Some(format!(
        "https://wa.me/{digits}?text={}",
        urlencoding::encode(message)
    ))
}

/// The payment-reminder text, quoting the pending total and the driver's
/// PIX key.
pub fn charge_message(passenger_name: &str, pending: f64, pix_key: Option<&str>) -> String {
    let pix = pix_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or("não cadastrada");
    format!(
        "Olá {passenger_name}, aqui é o seu motorista. Passando para lembrar das nossas \
         viagens que somam R$ {pending:.2}. Segue o PIX para pagamento: {pix}"
    )
}

/// Charge-reminder link for a passenger with a pending balance.
pub fn charge_link(passenger: &Passenger, pending: f64, pix_key: Option<&str>) -> Option<String> {
    wa_link(
        &passenger.phone_number,
        &charge_message(&passenger.full_name, pending, pix_key),
    )
}

/// The welcome text sent right after registering a passenger.
pub fn welcome_message(passenger_name: &str, driver_name: &str) -> String {
    format!(
        "Olá {passenger_name}! Aqui é {driver_name}, seu motorista. Salve este contato \
         para combinar suas próximas viagens."
    )
}

/// Welcome link for a freshly registered passenger.
pub fn welcome_link(passenger: &Passenger, driver_name: &str) -> Option<String> {
    wa_link(
        &passenger.phone_number,
        &welcome_message(&passenger.full_name, driver_name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn passenger(phone: &str) -> Passenger {
        Passenger {
            id: Uuid::new_v4(),
            full_name: "João Silva".into(),
            phone_number: phone.into(),
            is_favorite: false,
            passenger_class: String::new(),
            avatar_url: None,
            driver_id: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn phone_is_reduced_to_digits() {
        assert_eq!(digits_only("+55 (11) 99999-9999"), "5511999999999");
        assert_eq!(digits_only("sem número"), "");
    }

    #[test]
    fn charge_link_embeds_amount_and_pix_key() {
        let link = charge_link(&passenger("+55 (11) 99999-9999"), 80.5, Some("chave-pix"))
            .unwrap();
        assert!(link.starts_with("https://wa.me/5511999999999?text="));
        assert!(link.contains(&*urlencoding::encode("R$ 80.50")));
        assert!(link.contains("chave-pix"));
        assert!(!link.contains(' '), "message must be URL-encoded");
    }

    #[test]
    fn missing_pix_key_falls_back_to_the_placeholder() {
        let message = charge_message("João", 10.0, None);
        assert!(message.ends_with("não cadastrada"));
        let message = charge_message("João", 10.0, Some("  "));
        assert!(message.ends_with("não cadastrada"));
    }

    #[test]
    fn phone_without_digits_yields_no_link() {
        assert_eq!(charge_link(&passenger(""), 10.0, None), None);
        assert!(welcome_link(&passenger("11 98888-7777"), "Carlos").is_some());
    }
}
