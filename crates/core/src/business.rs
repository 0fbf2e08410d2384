//! Public shapes of business records returned by the gateway
//!
//! The engine owns the full documents; these types are the projections that
//! leave the service. A search hit becomes a [`BusinessDocument`] (never
//! including reviews), and the review lookup returns [`ReviewRecord`]s.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Attributes returned for every search hit, in response order
pub const SEARCH_PROJECTION: [&str; 10] = [
    "business_id",
    "name",
    "address",
    "city",
    "state",
    "latitude",
    "longitude",
    "stars",
    "review_count",
    "categories",
];

/// Attribute holding the embedded reviews of a business
pub const REVIEWS_FIELD: &str = "reviews";

/// A business record as projected for search results
///
/// Serializes to exactly the attributes in [`SEARCH_PROJECTION`]; attributes
/// the engine did not return are emitted as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BusinessDocument {
    pub business_id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub stars: Option<f64>,
    pub review_count: Option<u64>,
    pub categories: Option<Vec<String>>,
}

impl BusinessDocument {
    /// Build a projection from an engine `_source` object
    ///
    /// Attributes outside the projection (notably `reviews`) are dropped.
    /// Values of an unexpected shape are coerced where the meaning is clear
    /// (`"36.1"`, `12.0`) and emitted as `null` otherwise, so one untidy
    /// document never fails a whole search. When the source carries no usable
    /// `business_id`, the engine document id is used.
    pub fn from_source(document_id: &str, mut source: Map<String, Value>) -> Self {
        let mut take = |field: &'static str| Field {
            document_id,
            name: field,
            value: source.remove(field).unwrap_or(Value::Null),
        };

        let business_id = take("business_id")
            .text()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| document_id.to_string());

        BusinessDocument {
            business_id,
            name: take("name").text(),
            address: take("address").text(),
            city: take("city").text(),
            state: take("state").text(),
            latitude: take("latitude").number(),
            longitude: take("longitude").number(),
            stars: take("stars").number(),
            review_count: take("review_count").count(),
            categories: take("categories").categories(),
        }
    }
}

/// One raw attribute of an engine source, coerced leniently
struct Field<'a> {
    document_id: &'a str,
    name: &'static str,
    value: Value,
}

impl Field<'_> {
    fn discard<T>(&self) -> Option<T> {
        tracing::debug!(
            "Ignoring {} of '{}': unexpected value {}",
            self.name,
            self.document_id,
            self.value
        );
        None
    }

    fn text(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => self.discard(),
        }
    }

    fn number(&self) -> Option<f64> {
        match &self.value {
            Value::Null => None,
            Value::Number(n) => n.as_f64(),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Some(n),
                _ => self.discard(),
            },
            _ => self.discard(),
        }
    }

    fn count(&self) -> Option<u64> {
        if let Some(n) = self.value.as_u64() {
            return Some(n);
        }
        match self.number() {
            Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 => Some(n as u64),
            Some(_) => self.discard(),
            None => None,
        }
    }

    /// Categories are stored either as a list or as one comma-separated string
    fn categories(&self) -> Option<Vec<String>> {
        match &self.value {
            Value::Null => None,
            Value::String(joined) => Some(
                joined
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            _ => self.discard(),
        }
    }
}

/// A single review embedded in a business record
///
/// Reviews are passed through exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[cfg_attr(feature = "openapi", schema(value_type = Object))]
#[serde(transparent)]
pub struct ReviewRecord(pub Value);

impl ReviewRecord {
    /// Extract the reviews sequence from a `reviews`-only source object
    ///
    /// A missing or `null` reviews attribute is an empty sequence.
    pub fn list_from_source(document_id: &str, mut source: Map<String, Value>) -> Result<Vec<Self>> {
        match source.remove(REVIEWS_FIELD) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(reviews)) => Ok(reviews.into_iter().map(ReviewRecord).collect()),
            Some(other) => Err(Error::engine(format!(
                "Reviews of '{document_id}' are not a list: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn source(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test source must be an object"),
        }
    }

    #[test]
    fn test_projection_drops_reviews_and_unknown_fields() {
        let doc = BusinessDocument::from_source(
            "b1",
            source(json!({
                "business_id": "b1",
                "name": "Joe's Pizza",
                "city": "New York",
                "stars": 4.5,
                "review_count": 120,
                "reviews": [{"text": "great"}],
                "hours": {"Monday": "9-5"}
            })),
        );

        let serialized = serde_json::to_value(&doc).unwrap();
        let mut actual: Vec<&str> = serialized
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        actual.sort_unstable();
        let mut expected = SEARCH_PROJECTION.to_vec();
        expected.sort_unstable();
        assert_eq!(actual, expected);
        assert_eq!(serialized["address"], Value::Null);
    }

    #[test]
    fn test_business_id_falls_back_to_document_id() {
        let doc = BusinessDocument::from_source("abc", source(json!({"name": "X"})));
        assert_eq!(doc.business_id, "abc");
    }

    #[test]
    fn test_categories_accept_joined_string() {
        let doc = BusinessDocument::from_source(
            "b1",
            source(json!({"categories": "Pizza, Italian,  , Bars"})),
        );
        assert_eq!(
            doc.categories,
            Some(vec![
                "Pizza".to_string(),
                "Italian".to_string(),
                "Bars".to_string()
            ])
        );
    }

    #[test]
    fn test_categories_accept_list_and_null() {
        let listed =
            BusinessDocument::from_source("b1", source(json!({"categories": ["Tacos"]})));
        assert_eq!(listed.categories, Some(vec!["Tacos".to_string()]));

        let null =
            BusinessDocument::from_source("b1", source(json!({"categories": null})));
        assert_eq!(null.categories, None);
    }

    #[test]
    fn test_untidy_values_are_coerced() {
        let doc = BusinessDocument::from_source(
            "es-1",
            source(json!({
                "business_id": null,
                "latitude": "36.1",
                "longitude": -115.2,
                "review_count": 12.0,
                "stars": 4,
                "categories": ["Pizza", null, 3]
            })),
        );

        assert_eq!(doc.business_id, "es-1");
        assert_eq!(doc.latitude, Some(36.1));
        assert_eq!(doc.longitude, Some(-115.2));
        assert_eq!(doc.review_count, Some(12));
        assert_eq!(doc.stars, Some(4.0));
        assert_eq!(doc.categories, Some(vec!["Pizza".to_string()]));
    }

    #[test]
    fn test_unusable_values_become_null() {
        let doc = BusinessDocument::from_source(
            "b1",
            source(json!({
                "business_id": "b1",
                "name": {"first": "Joe"},
                "stars": "lots",
                "review_count": -3,
                "categories": {"main": "Pizza"}
            })),
        );

        assert_eq!(doc.business_id, "b1");
        assert_eq!(doc.name, None);
        assert_eq!(doc.stars, None);
        assert_eq!(doc.review_count, None);
        assert_eq!(doc.categories, None);
    }

    #[test]
    fn test_numeric_business_id_is_kept_as_text() {
        let doc = BusinessDocument::from_source("es-9", source(json!({"business_id": 42})));
        assert_eq!(doc.business_id, "42");
    }

    #[test]
    fn test_reviews_missing_or_null_is_empty() {
        assert!(ReviewRecord::list_from_source("b1", Map::new())
            .unwrap()
            .is_empty());
        assert!(
            ReviewRecord::list_from_source("b1", source(json!({"reviews": null})))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_reviews_pass_through_in_order() {
        let reviews = ReviewRecord::list_from_source(
            "b1",
            source(json!({"reviews": [{"text": "first"}, {"text": "second", "stars": 2}]})),
        )
        .unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].0, json!({"text": "first"}));
        assert_eq!(
            serde_json::to_value(&reviews[1]).unwrap(),
            json!({"text": "second", "stars": 2})
        );
    }

    #[test]
    fn test_reviews_of_wrong_type_are_rejected() {
        let err = ReviewRecord::list_from_source("b1", source(json!({"reviews": "nope"})))
            .unwrap_err();
        assert!(err.is_engine_failure());
    }
}
