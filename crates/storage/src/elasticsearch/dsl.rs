//! Translation of a compiled request into the Elasticsearch query DSL

use bizsearch_core::query_compiler::{BaseQuery, BoostModifier, FieldValueFactor, MultiMatch};
use bizsearch_core::RetrievalRequest;
use serde_json::{json, Map, Value};

fn multi_match(m: &MultiMatch) -> Value {
    json!({
        "multi_match": {
            "query": m.query,
            "fields": m.fields,
        }
    })
}

fn field_value_factor(f: &FieldValueFactor) -> Value {
    let mut factor = Map::new();
    factor.insert("field".to_string(), json!(f.field));
    factor.insert("factor".to_string(), json!(f.factor));
    if f.modifier != BoostModifier::None {
        factor.insert("modifier".to_string(), json!(f.modifier.as_str()));
    }
    factor.insert("missing".to_string(), json!(f.missing));
    json!({ "field_value_factor": factor })
}

fn base_query(query: &BaseQuery) -> Value {
    match query {
        BaseQuery::Match(m) => multi_match(m),
        BaseQuery::Filtered { must, filter } => {
            let mut term = Map::new();
            term.insert(filter.field.to_string(), json!(filter.value));
            json!({
                "bool": {
                    "must": multi_match(must),
                    "filter": { "term": term },
                }
            })
        }
    }
}

/// Request body for `POST /{index}/_search`
pub(super) fn search_body(request: &RetrievalRequest) -> Value {
    let scoring = request.scoring();
    let functions: Vec<Value> = scoring.functions.iter().map(field_value_factor).collect();

    json!({
        "size": request.size(),
        "query": {
            "function_score": {
                "query": base_query(&scoring.query),
                "functions": functions,
            }
        },
        "_source": request.projection(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizsearch_core::compile;
    use pretty_assertions::assert_eq;

    fn expected_functions() -> Value {
        json!([
            { "field_value_factor": { "field": "stars", "factor": 100.0, "missing": 1.0 } },
            { "field_value_factor": {
                "field": "review_count", "factor": 1.2, "modifier": "sqrt", "missing": 1.0
            } }
        ])
    }

    fn expected_source() -> Value {
        json!([
            "business_id", "name", "address", "city", "state",
            "latitude", "longitude", "stars", "review_count", "categories"
        ])
    }

    #[test]
    fn test_search_body_without_city() {
        let body = search_body(&compile("Pizza", None));

        let expected = json!({
            "size": 50,
            "query": {
                "function_score": {
                    "query": {
                        "multi_match": {
                            "query": "pizza",
                            "fields": ["name", "city", "state", "categories", "reviews"]
                        }
                    },
                    "functions": expected_functions()
                }
            },
            "_source": expected_source()
        });
        assert_eq!(body, expected);
    }

    #[test]
    fn test_search_body_with_city_filter() {
        let body = search_body(&compile("Tacos", Some("San Francisco")));

        let expected = json!({
            "size": 50,
            "query": {
                "function_score": {
                    "query": {
                        "bool": {
                            "must": {
                                "multi_match": {
                                    "query": "tacos",
                                    "fields": ["name", "city", "state", "categories", "reviews"]
                                }
                            },
                            "filter": { "term": { "city": "san" } }
                        }
                    },
                    "functions": expected_functions()
                }
            },
            "_source": expected_source()
        });
        assert_eq!(body, expected);
    }
}
