use crate::{
    aggregate::{aggregate, CategoryResult},
    config::SearchConfig,
    index::SearchIndex,
    model::{AutocompleteResponse, Category, FailureReason, SearchResultItem},
    query::Query,
    session::Sessions,
};
use actix_web::{body::BoxBody, http::StatusCode, HttpResponse, ResponseError};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use trustify_common::{
    error::ErrorInformation,
    model::{Paginated, PaginatedResults},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown category: '{0}'")]
    UnknownCategory(String),
    #[error("search index unavailable: {0}")]
    IndexUnavailable(String),
    #[error("search timed out after {0:?}")]
    Timeout(Duration),
    #[error("query superseded by a newer one")]
    Cancelled,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownCategory(_) => StatusCode::BAD_REQUEST,
            Self::IndexUnavailable(_) | Self::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Cancelled => StatusCode::NO_CONTENT,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::UnknownCategory(_) => HttpResponse::BadRequest()
                .json(ErrorInformation::new("UnknownCategory", self)),
            Self::IndexUnavailable(_) => HttpResponse::ServiceUnavailable()
                .json(ErrorInformation::new("IndexUnavailable", self)),
            Self::Timeout(_) => {
                HttpResponse::ServiceUnavailable().json(ErrorInformation::new("Timeout", self))
            }
            Self::Cancelled => HttpResponse::NoContent().finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchService {
    index: Arc<dyn SearchIndex>,
    config: SearchConfig,
    sessions: Sessions,
}

impl SearchService {
    pub fn new(index: Arc<dyn SearchIndex>, config: SearchConfig) -> Self {
        Self {
            index,
            config,
            sessions: Sessions::new(),
        }
    }

    /// Search all categories at once, for showing suggestions while typing.
    ///
    /// When a `session` is provided, starting a query cancels the query of the same session
    /// which might still be running. That one then fails with [`Error::Cancelled`].
    #[instrument(skip(self), err(level = tracing::Level::INFO))]
    pub async fn autocomplete(
        &self,
        text: &str,
        limit: Option<usize>,
        session: Option<&str>,
    ) -> Result<AutocompleteResponse, Error> {
        let ticket = session.map(|session| self.sessions.begin(session));

        let Some(query) = Query::new(text) else {
            return Ok(AutocompleteResponse::default());
        };
        let cap = self.config.cap(limit);

        let results = match &ticket {
            Some(ticket) => tokio::select! {
                _ = ticket.cancelled() => return Err(Error::Cancelled),
                results = self.search_all(&query, cap) => results,
            },
            None => self.search_all(&query, cap).await,
        };

        if ticket.as_ref().is_some_and(|ticket| !ticket.is_current()) {
            return Err(Error::Cancelled);
        }

        if results.iter().all(|(_, result)| result.is_err()) {
            return Err(Error::IndexUnavailable(
                "searching all categories failed".into(),
            ));
        }

        Ok(aggregate(results, &Category::ALL, cap))
    }

    /// Search a single category.
    #[instrument(skip(self), err(level = tracing::Level::INFO))]
    pub async fn search(
        &self,
        category: Category,
        text: &str,
        paginated: Paginated,
    ) -> Result<PaginatedResults<SearchResultItem>, Error> {
        let query = Query::new(text);
        let timeout = *self.config.query_timeout;

        match tokio::time::timeout(
            timeout,
            self.index.search(category, query.as_ref(), paginated),
        )
        .await
        {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(Error::IndexUnavailable(err.to_string())),
            Err(_) => Err(Error::Timeout(timeout)),
        }
    }

    async fn search_all(&self, query: &Query, cap: usize) -> Vec<(Category, CategoryResult)> {
        let timeout = *self.config.query_timeout;

        join_all(Category::ALL.into_iter().map(|category| async move {
            let result = match tokio::time::timeout(
                timeout,
                self.index
                    .search(category, Some(query), Paginated::new(0, cap as u64)),
            )
            .await
            {
                Ok(Ok(result)) => Ok(result.items),
                Ok(Err(err)) => {
                    log::warn!("searching {category} failed: {err}");
                    Err(FailureReason::Unavailable)
                }
                Err(_) => {
                    log::warn!("searching {category} timed out after {timeout:?}");
                    Err(FailureReason::Timeout)
                }
            };
            (category, result)
        }))
        .await
    }
}
