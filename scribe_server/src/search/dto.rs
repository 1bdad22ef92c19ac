use scribe_core::archive::dto::SimilarSummary;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const MAX_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub query: String,
    /// Defaults to 5, capped at 50.
    pub limit: Option<usize>,
    pub summary_type: Option<String>,
}

impl SearchQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SimilarSummary>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<usize>) -> SearchQuery {
        SearchQuery {
            query: "budget".to_string(),
            limit,
            summary_type: None,
        }
    }

    #[test]
    fn test_limit_defaults_and_clamps() {
        assert_eq!(query(None).effective_limit(), 5);
        assert_eq!(query(Some(12)).effective_limit(), 12);
        assert_eq!(query(Some(0)).effective_limit(), 1);
        assert_eq!(query(Some(10_000)).effective_limit(), 50);
    }
}
