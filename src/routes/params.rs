use serde::Deserialize;
use utoipa::ToSchema;

/// Optional `?search=` filter shared by the customer and product listings.
/// Matching is a case-insensitive substring test on the name.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_param_is_optional() {
        let q: SearchQuery = serde_json::from_str("{}").expect("empty query");
        assert!(q.search.is_none());

        let q: SearchQuery =
            serde_json::from_str(r#"{"search":"yerba"}"#).expect("search query");
        assert_eq!(q.search.as_deref(), Some("yerba"));
    }
}
