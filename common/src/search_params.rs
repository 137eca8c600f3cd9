use crate::deserialize_disallow_empty_string::disallow_empty_string;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;
use serde_with::NoneAsEmptyString;
use serde_with::serde_as;
use strum_macros::{Display, EnumString};
use tracing::debug;

pub const DEFAULT_MOVIES_PER_PAGE: u32 = 20;
pub const MAX_MOVIES_PER_PAGE: u32 = 100;

#[derive(Debug, Default, Deserialize, EnumString, Display, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

/// Which listing a `/movies` request resolves to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MovieFilter {
    #[default]
    None,
    Text(Vec<String>),
    Cast(Vec<String>),
    Genre(Vec<String>),
}

#[serde_as]
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ApiMoviesInput {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page: Option<u32>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub text: Option<String>,
    #[serde(deserialize_with = "string_to_string_array")]
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(deserialize_with = "string_to_string_array")]
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl ApiMoviesInput {
    pub fn filter(&self) -> MovieFilter {
        if let Some(text) = &self.text {
            let keywords = text
                .split_whitespace()
                .map(String::from)
                .collect::<Vec<String>>();

            if !keywords.is_empty() {
                return MovieFilter::Text(keywords);
            }
        }

        if !self.cast.is_empty() {
            return MovieFilter::Cast(self.cast.clone());
        }

        if !self.genre.is_empty() {
            return MovieFilter::Genre(self.genre.clone());
        }

        MovieFilter::None
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
            .unwrap_or(DEFAULT_MOVIES_PER_PAGE)
            .min(MAX_MOVIES_PER_PAGE)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ApiCountriesInput {
    #[serde(deserialize_with = "string_to_non_empty_string_array")]
    pub countries: Vec<String>,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ApiFacetSearchInput {
    #[serde(deserialize_with = "disallow_empty_string")]
    pub cast: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page: Option<u32>,
}

// accepts either a JSON array string `["a","b"]` or a single bare value
fn string_to_string_array<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = String::deserialize(deserializer)?;

    if input.is_empty() {
        return Ok(Vec::new());
    }

    if !input.starts_with('[') {
        return Ok(vec![input]);
    }

    let Ok(input_array) = serde_json::from_str::<Vec<String>>(&input) else {
        debug!("Invalid array: {input:?}");
        return Err(Error::custom("not valid JSON array"));
    };

    Ok(input_array
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect())
}

// country listings are unpaginated, an empty list would return the whole catalog
fn string_to_non_empty_string_array<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = string_to_string_array(deserializer)?;

    if values.is_empty() {
        return Err(Error::custom("expected at least one value"));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movies_input_defaults() {
        let input: ApiMoviesInput = serde_json::from_str("{}").unwrap();

        assert_eq!(input.page(), 0);
        assert_eq!(input.per_page(), DEFAULT_MOVIES_PER_PAGE);
        assert_eq!(input.direction, SortDirection::Desc);
        assert_eq!(input.filter(), MovieFilter::None);
    }

    #[test]
    fn test_text_filter_wins_over_cast() {
        let input: ApiMoviesInput = serde_json::from_str(
            r#"{"text": "space  odyssey", "cast": "[\"Keir Dullea\"]", "page": "2"}"#,
        )
        .unwrap();

        assert_eq!(input.page(), 2);
        assert_eq!(
            input.filter(),
            MovieFilter::Text(vec!["space".to_string(), "odyssey".to_string()])
        );
    }

    #[test]
    fn test_blank_text_falls_through_to_genre() {
        let input: ApiMoviesInput =
            serde_json::from_str(r#"{"text": "   ", "genre": "Drama"}"#).unwrap();

        assert_eq!(input.filter(), MovieFilter::Genre(vec!["Drama".to_string()]));
    }

    #[test]
    fn test_countries_input_parses_array() {
        let input: ApiCountriesInput =
            serde_json::from_str(r#"{"countries": "[\"France\", \"Italy\", \"\"]"}"#).unwrap();

        assert_eq!(input.countries, vec!["France", "Italy"]);
    }

    #[test]
    fn test_countries_input_rejects_empty_list() {
        let blank = serde_json::from_str::<ApiCountriesInput>(r#"{"countries": ""}"#);
        let empty_array = serde_json::from_str::<ApiCountriesInput>(r#"{"countries": "[]"}"#);
        let only_blanks =
            serde_json::from_str::<ApiCountriesInput>(r#"{"countries": "[\"\", \"\"]"}"#);
        let missing = serde_json::from_str::<ApiCountriesInput>("{}");

        assert!(blank.is_err());
        assert!(empty_array.is_err());
        assert!(only_blanks.is_err());
        assert!(missing.is_err());
    }

    #[test]
    fn test_per_page_is_capped() {
        let input: ApiMoviesInput =
            serde_json::from_str(r#"{"page": "4294967295", "per-page": "4294967295"}"#).unwrap();

        assert_eq!(input.per_page(), MAX_MOVIES_PER_PAGE);
        assert_eq!(input.page(), u32::MAX);
    }

    #[test]
    fn test_countries_input_rejects_broken_array() {
        let input = serde_json::from_str::<ApiCountriesInput>(r#"{"countries": "[\"France\""}"#);

        assert!(input.is_err());
    }

    #[test]
    fn test_facet_search_requires_cast() {
        let empty = serde_json::from_str::<ApiFacetSearchInput>(r#"{"cast": ""}"#);
        let unknown =
            serde_json::from_str::<ApiFacetSearchInput>(r#"{"cast": "Tom Hanks", "limit": "5"}"#);
        let valid: ApiFacetSearchInput =
            serde_json::from_str(r#"{"cast": "Tom Hanks", "page": ""}"#).unwrap();

        assert!(empty.is_err());
        assert!(unknown.is_err());
        assert_eq!(valid.cast, "Tom Hanks");
        assert_eq!(valid.page, None);
    }

    #[test]
    fn test_sort_direction_from_str() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::Desc.to_string(), "desc");
        assert_eq!(SortDirection::Desc.as_i32(), -1);
    }
}
