use serde_json::{Map, Value};
use tracing::warn;

/// Decode a place's `address_json` string into flat `address<Key>` fields.
///
/// Address data is best-effort: a missing string, malformed JSON or a JSON
/// value that is not an object all decode to an empty map.
pub fn decode_address(json_address: Option<&str>) -> Map<String, Value> {
    let Some(raw) = json_address.filter(|s| !s.is_empty()) else {
        return Map::new();
    };

    let decoded = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => return Map::new(),
        Err(e) => {
            warn!("Ignoring malformed address JSON: {}", e);
            return Map::new();
        }
    };

    decoded
        .into_iter()
        .map(|(key, value)| (format!("address{}", pascal_case(&key)), value))
        .collect()
}

/// `street_address` -> `StreetAddress`
fn pascal_case(key: &str) -> String {
    key.split('_').map(uppercase_first_letter).collect()
}

fn uppercase_first_letter(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_address() {
        let fields = decode_address(Some(
            r#"{"street_address":"1 Main St","zip_code":"10001"}"#,
        ));
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["addressStreetAddress"], json!("1 Main St"));
        assert_eq!(fields["addressZipCode"], json!("10001"));
    }

    #[test]
    fn test_decode_address_keeps_value_types() {
        let fields = decode_address(Some(r#"{"city_id":123,"region_name":null}"#));
        assert_eq!(fields["addressCityId"], json!(123));
        assert_eq!(fields["addressRegionName"], Value::Null);
    }

    #[test]
    fn test_decode_address_malformed() {
        assert!(decode_address(Some("not json")).is_empty());
        assert!(decode_address(Some("{\"street_address\":")).is_empty());
    }

    #[test]
    fn test_decode_address_missing_or_not_object() {
        assert!(decode_address(None).is_empty());
        assert!(decode_address(Some("")).is_empty());
        assert!(decode_address(Some("null")).is_empty());
        assert!(decode_address(Some("[1,2]")).is_empty());
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("street_address"), "StreetAddress");
        assert_eq!(pascal_case("city"), "City");
        assert_eq!(pascal_case("a__b"), "AB");
    }
}
