use crate::engine::{EngineClient, EngineResponse};
use crate::error::{EngineError, SearchError};
use crate::query_parser::{Classification, classify};
use crate::search::{SearchRequest, parse_offset};
use std::time::Instant;
use tracing::{debug, info};

/// What a search call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty query text; the engine was not contacted.
    NoQuery,
    /// The engine's answer, untouched.
    Relayed {
        classification: Classification,
        response: EngineResponse,
    },
}

/// Classifies queries and forwards them to the engine.
///
/// Holds no mutable state, so one instance can be shared across request
/// handlers.
#[derive(Debug, Clone)]
pub struct SearchService {
    engine: EngineClient,
}

impl SearchService {
    pub fn new(engine: EngineClient) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &EngineClient {
        &self.engine
    }

    /// Classify `query` and assemble the engine request for it.
    pub fn prepare(
        query: Option<&str>,
        from: Option<&str>,
    ) -> Result<(Classification, SearchRequest), SearchError> {
        let classification = classify(query.unwrap_or_default());
        let request = SearchRequest::build(&classification, parse_offset(from))?;
        Ok((classification, request))
    }

    /// Execute a search and relay the engine's response.
    pub async fn search(
        &self,
        query: Option<&str>,
        from: Option<&str>,
    ) -> Result<SearchOutcome, SearchError> {
        let search_start = Instant::now();

        let (classification, request) = match Self::prepare(query, from) {
            Ok(prepared) => prepared,
            Err(SearchError::EmptyQuery) => {
                debug!("empty query, skipping engine call");
                return Ok(SearchOutcome::NoQuery);
            }
            Err(e) => return Err(e),
        };
        info!(
            "category={} query={:?} from={}",
            classification.category, classification.residual, request.from
        );

        let response = self.engine.search(&request).await?;
        debug!(
            "search round trip {:.3}ms",
            search_start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(SearchOutcome::Relayed {
            classification,
            response,
        })
    }

    pub async fn document(&self, id: &str) -> Result<EngineResponse, EngineError> {
        self.engine.get_document(id).await
    }
}
