//! Compilation of raw user queries into scored retrieval requests
//!
//! The compiler is pure: the same query text and city filter always produce
//! the same [`RetrievalRequest`]. Ranking is a multi-field text match whose
//! score is multiplied by two popularity boosts (rating and review volume).

use crate::business::SEARCH_PROJECTION;

/// Maximum number of hits a search ever returns
pub const RESULT_CAP: usize = 50;

/// Fields searched by the text match, all with equal weight
pub const SEARCH_FIELDS: [&str; 5] = ["name", "city", "state", "categories", "reviews"];

/// Field the city filter is applied to
pub const CITY_FIELD: &str = "city";

/// Transformation applied to a field value before the boost factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoostModifier {
    /// Use the value as-is
    None,
    /// Use the square root of the value
    Sqrt,
}

impl BoostModifier {
    fn apply(self, value: f64) -> f64 {
        match self {
            BoostModifier::None => value,
            BoostModifier::Sqrt => value.sqrt(),
        }
    }

    /// Name used by the engine query language
    pub fn as_str(self) -> &'static str {
        match self {
            BoostModifier::None => "none",
            BoostModifier::Sqrt => "sqrt",
        }
    }
}

/// Multiplies the text score by a factor derived from a numeric field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValueFactor {
    pub field: &'static str,
    pub factor: f64,
    pub modifier: BoostModifier,
    /// Value assumed when a document has no value for `field`
    pub missing: f64,
}

impl FieldValueFactor {
    /// Boost applied for a document whose field holds `value`
    ///
    /// `modifier(value_or_missing) * factor`
    pub fn boost_for(&self, value: Option<f64>) -> f64 {
        self.modifier.apply(value.unwrap_or(self.missing)) * self.factor
    }
}

/// Text match of one query string across several fields
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatch {
    pub query: String,
    pub fields: Vec<&'static str>,
}

/// Exact-term constraint; documents that do not match are excluded
#[derive(Debug, Clone, PartialEq)]
pub struct TermFilter {
    pub field: &'static str,
    pub value: String,
}

/// The query whose relevance score gets boosted
#[derive(Debug, Clone, PartialEq)]
pub enum BaseQuery {
    Match(MultiMatch),
    /// Text match that only considers documents passing the filter
    Filtered { must: MultiMatch, filter: TermFilter },
}

impl BaseQuery {
    pub fn text_match(&self) -> &MultiMatch {
        match self {
            BaseQuery::Match(m) => m,
            BaseQuery::Filtered { must, .. } => must,
        }
    }

    pub fn filter(&self) -> Option<&TermFilter> {
        match self {
            BaseQuery::Match(_) => None,
            BaseQuery::Filtered { filter, .. } => Some(filter),
        }
    }
}

/// Function-score composition: `base_score * product(boosts)`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionScore {
    pub query: BaseQuery,
    pub functions: Vec<FieldValueFactor>,
}

impl FunctionScore {
    /// Combined boost of all functions for one document
    ///
    /// `field_value` resolves a numeric field of the document being scored.
    pub fn combined_boost<F>(&self, field_value: F) -> f64
    where
        F: Fn(&str) -> Option<f64>,
    {
        self.functions
            .iter()
            .map(|f| f.boost_for(field_value(f.field)))
            .product()
    }
}

/// A compiled, immutable retrieval request
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalRequest {
    size: usize,
    scoring: FunctionScore,
    projection: Vec<&'static str>,
}

impl RetrievalRequest {
    /// Maximum number of hits to return
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn scoring(&self) -> &FunctionScore {
        &self.scoring
    }

    /// Attributes each hit is restricted to
    pub fn projection(&self) -> &[&'static str] {
        &self.projection
    }

    pub fn city_filter(&self) -> Option<&TermFilter> {
        self.scoring.query.filter()
    }
}

fn rating_boost() -> FieldValueFactor {
    FieldValueFactor {
        field: "stars",
        factor: 100.0,
        modifier: BoostModifier::None,
        missing: 1.0,
    }
}

fn popularity_boost() -> FieldValueFactor {
    FieldValueFactor {
        field: "review_count",
        factor: 1.2,
        modifier: BoostModifier::Sqrt,
        missing: 1.0,
    }
}

/// Reduce a city filter to the term it is matched with
///
/// Lowercased, then cut at the first whitespace character: "San Francisco"
/// becomes "san". A filter that starts with whitespace reduces to "".
pub fn city_term(city: &str) -> String {
    city.to_lowercase()
        .split(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Compile a user query and optional city filter into a retrieval request
pub fn compile(query_text: &str, city_filter: Option<&str>) -> RetrievalRequest {
    let text_match = MultiMatch {
        query: query_text.to_lowercase(),
        fields: SEARCH_FIELDS.to_vec(),
    };

    let query = match city_filter {
        Some(city) => {
            let term = city_term(city);
            if term.is_empty() {
                tracing::warn!(
                    city = %city,
                    "City filter reduces to an empty term; no business will match"
                );
            }
            BaseQuery::Filtered {
                must: text_match,
                filter: TermFilter {
                    field: CITY_FIELD,
                    value: term,
                },
            }
        }
        None => BaseQuery::Match(text_match),
    };

    RetrievalRequest {
        size: RESULT_CAP,
        scoring: FunctionScore {
            query,
            functions: vec![rating_boost(), popularity_boost()],
        },
        projection: SEARCH_PROJECTION.to_vec(),
    }
}
