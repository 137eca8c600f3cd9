use serde::{Deserialize, Deserializer, de::Error};

/// Rejects missing, empty and whitespace-only strings, trimming what is kept.
pub fn disallow_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(input) = Option::<String>::deserialize(deserializer)? else {
        return Err(Error::custom("field is not a string"));
    };

    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(Error::custom("field is blank"));
    }

    Ok(trimmed.to_string())
}
