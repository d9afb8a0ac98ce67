use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

fn parse_raw<E: de::Error>(raw: RawId) -> Result<Option<i32>, E> {
    let value = match raw {
        RawId::Int(n) => n,
        RawId::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "null" {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map_err(|_| E::custom(format!("invalid id: {}", s)))?
        }
    };
    i32::try_from(value)
        .map(Some)
        .map_err(|_| E::custom(format!("id out of range: {}", value)))
}

pub fn deserialize_id<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawId::deserialize(deserializer)?;
    parse_raw(raw)?.ok_or_else(|| de::Error::custom("id must not be empty"))
}

pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        Some(raw) => parse_raw(raw),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Required {
        #[serde(deserialize_with = "deserialize_id")]
        user_id: i32,
    }

    #[derive(Deserialize)]
    struct Optional {
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        user_id: Option<i32>,
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let a: Required = serde_json::from_value(json!({ "user_id": 7 })).unwrap();
        let b: Required = serde_json::from_value(json!({ "user_id": " 7 " })).unwrap();
        assert_eq!(a.user_id, 7);
        assert_eq!(b.user_id, 7);
    }

    #[test]
    fn rejects_non_numeric_required_ids() {
        assert!(serde_json::from_value::<Required>(json!({ "user_id": "abc" })).is_err());
        assert!(serde_json::from_value::<Required>(json!({ "user_id": "" })).is_err());
        assert!(serde_json::from_value::<Required>(json!({ "user_id": 1u64 << 40 })).is_err());
    }

    #[test]
    fn optional_ids_treat_blank_and_null_as_absent() {
        for body in [json!({}), json!({ "user_id": null }), json!({ "user_id": "null" }), json!({ "user_id": "" })] {
            let parsed: Optional = serde_json::from_value(body).unwrap();
            assert_eq!(parsed.user_id, None);
        }
        let parsed: Optional = serde_json::from_value(json!({ "user_id": "12" })).unwrap();
        assert_eq!(parsed.user_id, Some(12));
    }
}
