//! Realistic field values for synthetic entities
//!
//! Values are drawn from small built-in word lists. They are syntactically
//! valid for their type (emails parse, phone numbers have digits in the
//! right places) but carry no meaning.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const FIRST_NAMES: &[&str] = &[
    "Ava", "Liam", "Noah", "Emma", "Olivia", "Mateo", "Sofia", "Ethan", "Mia", "Lucas",
    "Amara", "Kenji", "Priya", "Jonas", "Zara", "Diego", "Hana", "Omar", "Freya", "Tariq",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Garcia", "Nguyen", "Okafor", "Muller", "Rossi", "Kowalski", "Tanaka", "Silva",
    "Johansson", "Patel", "Cohen", "Dubois", "Novak", "Haddad", "Kim", "Brown", "Lopez",
];

const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Cedar", "Lakeview", "Hillcrest", "Sunset", "River", "Park", "Elm", "Mill",
];

const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Rd", "Blvd", "Ln", "Way", "Ct"];

const CITIES: &[(&str, &str)] = &[
    ("Portland", "OR"),
    ("Austin", "TX"),
    ("Denver", "CO"),
    ("Madison", "WI"),
    ("Raleigh", "NC"),
    ("Tucson", "AZ"),
    ("Albany", "NY"),
    ("Boise", "ID"),
];

const PRODUCT_ADJECTIVES: &[&str] = &[
    "Ergonomic", "Rustic", "Sleek", "Handcrafted", "Refined", "Compact", "Durable", "Smart",
];

const PRODUCT_MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Cotton", "Granite", "Bamboo", "Leather", "Ceramic", "Plastic",
];

const PRODUCT_NOUNS: &[&str] = &[
    "Chair", "Lamp", "Keyboard", "Backpack", "Mug", "Desk", "Headphones", "Notebook", "Bottle",
];

pub const PRODUCT_CATEGORIES: &[&str] = &[
    "Electronics", "Home", "Outdoors", "Books", "Clothing", "Toys", "Garden", "Sports",
];

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

fn pick(list: &[&'static str]) -> &'static str {
    list.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

pub fn first_name() -> String {
    pick(FIRST_NAMES).to_string()
}

pub fn last_name() -> String {
    pick(LAST_NAMES).to_string()
}

/// `first.last.NNN@domain`, lowercased
pub fn email(first: &str, last: &str, domain: &str) -> String {
    let n: u16 = rand::thread_rng().gen_range(1..1000);
    format!("{}.{}.{}@{}", first, last, n, domain).to_lowercase()
}

pub fn username(first: &str, last: &str) -> String {
    let n: u16 = rand::thread_rng().gen_range(10..10000);
    let initial = first.chars().next().unwrap_or('u');
    format!("{}{}{}", initial, last, n).to_lowercase()
}

/// North American style `(NXX) NXX-XXXX`
pub fn phone_number() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "({}) {}-{:04}",
        rng.gen_range(201..990),
        rng.gen_range(200..1000),
        rng.gen_range(0..10000)
    )
}

pub fn address() -> Address {
    let mut rng = rand::thread_rng();
    let (city, state) = CITIES.choose(&mut rng).copied().unwrap_or(("Springfield", "IL"));
    Address {
        street: format!(
            "{} {} {}",
            rng.gen_range(1..9999),
            pick(STREET_NAMES),
            pick(STREET_SUFFIXES)
        ),
        city: city.to_string(),
        state: state.to_string(),
        zip_code: format!("{:05}", rng.gen_range(1000..99999)),
        country: "US".to_string(),
    }
}

pub fn product_name() -> String {
    format!(
        "{} {} {}",
        pick(PRODUCT_ADJECTIVES),
        pick(PRODUCT_MATERIALS),
        pick(PRODUCT_NOUNS)
    )
}

pub fn product_category() -> String {
    pick(PRODUCT_CATEGORIES).to_string()
}

/// Uppercase SKU like `ELE-48213`
pub fn sku(category: &str) -> String {
    let prefix: String = category
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    format!("{}-{:05}", prefix, rand::thread_rng().gen_range(0..100000))
}

/// Sentence of `words` lorem words, capitalized and terminated
pub fn sentence(words: usize) -> String {
    let body: Vec<&str> = (0..words.max(1)).map(|_| pick(LOREM)).collect();
    let mut text = body.join(" ");
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    text.push('.');
    text
}

/// Price in `[min, max]`, rounded to cents
pub fn price(min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let raw = if lo == hi {
        lo
    } else {
        rand::thread_rng().gen_range(lo..=hi)
    };
    round_cents(raw)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        let email = email("Ava", "Smith", "example.test");
        let (local, domain) = email.split_once('@').unwrap();
        assert!(local.starts_with("ava.smith."));
        assert_eq!(domain, "example.test");
    }

    #[test]
    fn test_phone_shape() {
        let phone = phone_number();
        assert_eq!(phone.len(), 14);
        assert_eq!(phone.chars().filter(|c| c.is_ascii_digit()).count(), 10);
    }

    #[test]
    fn test_price_bounds() {
        for _ in 0..100 {
            let p = price(5.0, 10.0);
            assert!((5.0..=10.0).contains(&p));
        }
        assert_eq!(price(3.333, 3.333), 3.33);
        assert!((1.0..=2.0).contains(&price(2.0, 1.0)));
    }

    #[test]
    fn test_sku_and_sentence() {
        assert!(sku("Electronics").starts_with("ELE-"));
        let s = sentence(4);
        assert!(s.ends_with('.'));
        assert!(s.chars().next().unwrap().is_ascii_uppercase());
    }

    #[test]
    fn test_address() {
        let a = address();
        assert_eq!(a.zip_code.len(), 5);
        assert_eq!(a.state.len(), 2);
    }
}
