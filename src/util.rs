use serde::{Deserialize, Deserializer};

/// Accepts a string, a number or null as a `String`. Null becomes empty.
///
/// Servers differ on whether ids are strings or numbers, and figment types
/// environment and YAML values, so a numeric API key arrives as an integer.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Text(text)) => text,
        Some(Lenient::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "string_or_number")]
        value: String,
    }

    fn value(json: &str) -> String {
        serde_json::from_str::<Wrapper>(json).unwrap().value
    }

    #[test]
    fn strings_numbers_and_null() {
        assert_eq!(value(r#"{"value":"abc"}"#), "abc");
        assert_eq!(value(r#"{"value":12345}"#), "12345");
        assert_eq!(value(r#"{"value":-7}"#), "-7");
        assert_eq!(value(r#"{"value":null}"#), "");
    }

    #[test]
    fn other_types_are_rejected() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":true}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":[1]}"#).is_err());
    }
}
