//! Form-level operations behind the draw screen: turn raw form input into a
//! request, run it, and render the result or the error text.
use crate::catalog::Catalog;
use crate::draw::{tally, DrawRequest};
use crate::settings::Settings;
use sha2::{Digest, Sha256};

/// Raw values as typed into the draw form.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawForm {
    pub quantity: String,
    pub unique: bool,
    pub tiered: bool,
    pub seed: String,
}

impl DrawForm {
    /// Form with one prize and toggles preset from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            quantity: "1".to_string(),
            unique: settings.unique,
            tiered: settings.tiered,
            seed: String::new(),
        }
    }
}

/// Only a plain run of ASCII digits counts as a seed; anything else,
/// including blanks and signs, means "no seed". Digit runs past `u64::MAX`
/// are folded through SHA-256 so the same text always gives the same seed.
pub fn parse_seed(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match text.parse() {
        Ok(seed) => Some(seed),
        Err(_) => Some(fold_long_seed(text)),
    }
}

fn fold_long_seed(digits: &str) -> u64 {
    let digits = digits.trim_start_matches('0');
    let hash = Sha256::digest(digits.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(head)
}

/// Quantity must be a whole number no larger than the form's maximum.
/// Values below 1 pass through so the draw itself reports them.
pub fn parse_quantity(text: &str, max: i64) -> Result<i64, String> {
    let quantity: i64 = text
        .trim()
        .parse()
        .map_err(|_| format!("quantity must be a whole number, got '{}'", text.trim()))?;
    if quantity > max {
        return Err(format!("quantity must be <= {max}"));
    }
    Ok(quantity)
}

pub fn build_request(form: &DrawForm, settings: &Settings) -> Result<DrawRequest, String> {
    let quantity = parse_quantity(&form.quantity, settings.max_quantity)?;
    Ok(DrawRequest {
        quantity,
        unique: form.unique,
        seed: parse_seed(&form.seed),
        tiered: form.tiered,
        weights: None,
    })
}

pub fn run_draw(
    form: &DrawForm,
    settings: &Settings,
    catalog: &Catalog,
) -> Result<Vec<String>, String> {
    let request = build_request(form, settings)?;
    catalog
        .draw(&request)
        .map_err(|e| e.user_message().to_string())
}

/// Draw and package the outcome for machine consumers.
pub fn draw_json(
    form: &DrawForm,
    settings: &Settings,
    catalog: &Catalog,
) -> Result<serde_json::Value, String> {
    let request = build_request(form, settings)?;
    let prizes = catalog
        .draw(&request)
        .map_err(|e| e.user_message().to_string())?;
    let summary: serde_json::Map<String, serde_json::Value> = tally(&prizes, catalog)
        .into_iter()
        .map(|(name, count)| (name, serde_json::json!(count)))
        .collect();

    Ok(serde_json::json!({
        "prizes": prizes,
        "quantity": request.quantity,
        "unique": request.unique,
        "tiered": request.tiered,
        "seed": request.seed,
        "summary": summary,
        "drawnAt": chrono::Utc::now().to_rfc3339(),
    }))
}

/// One numbered line per prize, in draw order.
pub fn render_prizes(prizes: &[String]) -> String {
    prizes
        .iter()
        .enumerate()
        .map(|(i, prize)| format!("{}. {}", i + 1, prize))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_tally(prizes: &[String], catalog: &Catalog) -> String {
    tally(prizes, catalog)
        .into_iter()
        .map(|(name, count)| format!("{name} x{count}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(quantity: &str, unique: bool, tiered: bool, seed: &str) -> DrawForm {
        DrawForm {
            quantity: quantity.to_string(),
            unique,
            tiered,
            seed: seed.to_string(),
        }
    }

    #[test]
    fn digits_are_a_seed_everything_else_is_not() {
        assert_eq!(parse_seed("42"), Some(42));
        assert_eq!(parse_seed("007"), Some(7));
        assert_eq!(parse_seed(""), None);
        assert_eq!(parse_seed("-5"), None);
        assert_eq!(parse_seed("+5"), None);
        assert_eq!(parse_seed(" 42"), None);
        assert_eq!(parse_seed("4.2"), None);
        assert_eq!(parse_seed("lucky"), None);
    }

    #[test]
    fn oversized_digit_seeds_still_seed_the_draw() {
        let long = parse_seed("99999999999999999999999");
        assert!(long.is_some());
        assert_eq!(long, parse_seed("99999999999999999999999"));
        assert_eq!(
            parse_seed("18446744073709551616"),
            parse_seed("0018446744073709551616")
        );
        assert_ne!(parse_seed("18446744073709551616"), parse_seed("18446744073709551617"));
        assert_eq!(parse_seed("18446744073709551615"), Some(u64::MAX));
    }

    #[test]
    fn oversized_seed_repeats_the_same_draw() {
        let settings = Settings::default();
        let catalog = Catalog::bundled();
        let seeded = form("6", true, true, "18446744073709551616");
        let first = run_draw(&seeded, &settings, catalog).unwrap();
        for _ in 0..5 {
            assert_eq!(run_draw(&seeded, &settings, catalog).unwrap(), first);
        }

        let request = build_request(&seeded, &settings).unwrap();
        assert!(request.seed.is_some());
        let with_replacement = form("10", false, true, "340282366920938463463374607431768211456");
        assert_eq!(
            run_draw(&with_replacement, &settings, catalog).unwrap(),
            run_draw(&with_replacement, &settings, catalog).unwrap()
        );
    }

    #[test]
    fn quantity_text_is_bounded_by_form_max() {
        assert_eq!(parse_quantity("3", 10), Ok(3));
        assert_eq!(parse_quantity(" 10 ", 10), Ok(10));
        assert_eq!(parse_quantity("0", 10), Ok(0));
        assert_eq!(parse_quantity("11", 10), Err("quantity must be <= 10".to_string()));
        assert!(parse_quantity("three", 10).is_err());
    }

    #[test]
    fn build_request_maps_form_fields() {
        let request = build_request(&form("4", true, false, "abc"), &Settings::default()).unwrap();
        assert_eq!(
            request,
            DrawRequest {
                quantity: 4,
                unique: true,
                seed: None,
                tiered: false,
                weights: None,
            }
        );
    }

    #[test]
    fn seeded_form_matches_golden_draw() {
        let prizes = run_draw(
            &form("3", true, true, "42"),
            &Settings::default(),
            Catalog::bundled(),
        )
        .unwrap();
        assert_eq!(prizes, vec!["postcard", "pin button", "sticker set"]);
    }

    #[test]
    fn draw_errors_become_user_messages() {
        let settings = Settings::default();
        let catalog = Catalog::bundled();
        assert_eq!(
            run_draw(&form("7", true, true, ""), &settings, catalog),
            Err("quantity must be <= 6 when drawing unique prizes".to_string())
        );
        assert_eq!(
            run_draw(&form("0", false, true, ""), &settings, catalog),
            Err("quantity must be at least 1".to_string())
        );
    }

    #[test]
    fn json_outcome_carries_request_and_summary() {
        let value = draw_json(
            &form("6", true, true, "42"),
            &Settings::default(),
            Catalog::bundled(),
        )
        .unwrap();
        assert_eq!(value["prizes"][0], "postcard");
        assert_eq!(value["prizes"].as_array().unwrap().len(), 6);
        assert_eq!(value["seed"], 42);
        assert_eq!(value["unique"], true);
        assert_eq!(value["summary"]["slogan"], 1);
        assert!(value["drawnAt"].as_str().unwrap().contains('T'));

        let unseeded = draw_json(
            &form("1", false, true, "x"),
            &Settings::default(),
            Catalog::bundled(),
        )
        .unwrap();
        assert!(unseeded["seed"].is_null());
    }

    #[test]
    fn renders_numbered_lines_and_tally() {
        let prizes: Vec<String> = ["postcard", "notebook", "postcard"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            render_prizes(&prizes),
            "1. postcard\n2. notebook\n3. postcard"
        );
        assert_eq!(
            render_tally(&prizes, Catalog::bundled()),
            "notebook x1\npostcard x2"
        );
    }
}
