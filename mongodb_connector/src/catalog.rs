//! Public read operations over the movie catalog.
//!
//! Every operation is read-only and takes a cancellation token. Pipelines
//! are built and validated before any store round trip.

use std::future::Future;

use common::{
    catalog::{
        facet::FacetResult,
        movie::{Movie, MoviePage},
    },
    search_params::MovieFilter,
};
use mongodb::bson::{Bson, Document, from_document, oid::ObjectId};
use tokio::{time::Instant, try_join};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    config::FacetConfig,
    constants::{
        COLLECTION_COMMENTS_NAME, COLLECTION_MOVIES_NAME, FIELD_CAST, FIELD_COMMENTS,
        FIELD_COUNTRIES, FIELD_DATE, FIELD_GENRES, FIELD_ID, FIELD_MOVIE_ID, FIELD_TEXT,
        FIELD_TITLE,
    },
    errors::{CatalogError, StoreError},
    pipelines::{
        count_pipeline::{CountPipeline, reconcile},
        facet_pipeline::FacetPipeline,
        query::QueryPredicate,
    },
    stages::{
        builder::{build_lookup, build_match},
        match_stage::Predicate,
        page_stage::PageWindow,
        sort_stage::SortKey,
        traits::Pipeline,
    },
    store::{DocumentStore, FindQuery},
};

/// Races `operation` against `cancel`. A cancelled token wins even if the
/// operation is ready, and the in-flight store call is dropped.
async fn with_cancellation<T, F>(cancel: &CancellationToken, operation: F) -> Result<T, CatalogError>
where
    F: Future<Output = Result<T, CatalogError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Catalog request cancelled");
            Err(CatalogError::Cancelled)
        }
        result = operation => result,
    }
}

fn decode_movies(documents: Vec<Document>) -> Result<Vec<Movie>, StoreError> {
    documents
        .into_iter()
        .map(|document| from_document::<Movie>(document).map_err(StoreError::from))
        .collect()
}

fn parse_movie_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn require_keywords(keywords: &[String]) -> Result<Vec<String>, CatalogError> {
    let keywords = keywords
        .iter()
        .map(|keyword| keyword.trim())
        .filter(|keyword| !keyword.is_empty())
        .map(String::from)
        .collect::<Vec<String>>();

    if keywords.is_empty() {
        return Err(CatalogError::InvalidArguments(
            "text search needs at least one keyword".into(),
        ));
    }

    Ok(keywords)
}

fn text_predicate(keywords: &[String]) -> Result<QueryPredicate, CatalogError> {
    QueryPredicate::new(
        FIELD_TEXT,
        Predicate::Text(require_keywords(keywords)?),
        SortKey::TextScore,
    )
}

pub struct MoviesCatalog<S> {
    store: S,
    facet_config: FacetConfig,
}

impl<S: DocumentStore> MoviesCatalog<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            facet_config: FacetConfig::default(),
        }
    }

    pub fn with_facet_config(store: S, facet_config: FacetConfig) -> Result<Self, CatalogError> {
        facet_config.validate()?;

        Ok(Self {
            store,
            facet_config,
        })
    }

    async fn find_movies(&self, query: &FindQuery) -> Result<Vec<Movie>, CatalogError> {
        let documents = self.store.find(COLLECTION_MOVIES_NAME, query).await?;

        Ok(decode_movies(documents)?)
    }

    async fn count_movies(&self, pipeline: &Pipeline) -> Result<u64, CatalogError> {
        let documents = self.store.aggregate(COLLECTION_MOVIES_NAME, pipeline).await?;

        Ok(CountPipeline::read_count(documents)?)
    }

    /// Page `page` of the whole catalog, most reviewed first unless `sort` says otherwise.
    pub async fn list_movies(
        &self,
        window: PageWindow,
        sort: Option<SortKey>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Movie>, CatalogError> {
        let predicate = QueryPredicate::new(FIELD_ID, Predicate::Any, sort.unwrap_or_default())?;
        let query = FindQuery::from_predicate(&predicate).with_window(&window);

        with_cancellation(cancel, self.find_movies(&query)).await
    }

    /// A single movie with its comments, newest first.
    ///
    /// Ids that do not parse as object ids are treated like unknown ids.
    pub async fn get_movie(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Movie>, CatalogError> {
        let Some(object_id) = parse_movie_id(id) else {
            warn!("Invalid ID, no movie found for {id:?}");
            return Ok(None);
        };

        let pipeline = Pipeline::new()
            .with_stage(build_match(FIELD_ID, Predicate::Equals(Bson::ObjectId(object_id)))?)
            .with_stage(build_lookup(
                COLLECTION_COMMENTS_NAME,
                FIELD_ID,
                FIELD_MOVIE_ID,
                Some(SortKey::descending(FIELD_DATE)),
                FIELD_COMMENTS,
            )?);

        let documents = with_cancellation(cancel, async {
            self.store
                .aggregate(COLLECTION_MOVIES_NAME, &pipeline)
                .await
                .map_err(CatalogError::from)
        })
        .await?;

        let Some(document) = documents.into_iter().next() else {
            debug!("No movie with id {object_id}");
            return Ok(None);
        };

        Ok(Some(from_document::<Movie>(document)?))
    }

    /// Free text search, most relevant first.
    pub async fn search_movies_by_text(
        &self,
        keywords: &[String],
        window: PageWindow,
        cancel: &CancellationToken,
    ) -> Result<Vec<Movie>, CatalogError> {
        let predicate = text_predicate(keywords)?;
        let query = FindQuery::from_predicate(&predicate).with_window(&window);

        with_cancellation(cancel, self.find_movies(&query)).await
    }

    /// Movies where `field` holds any of `values`, sorted descending by `sort_key`.
    pub async fn filter_movies_by_field(
        &self,
        field: &str,
        values: &[String],
        sort_key: &str,
        window: PageWindow,
        cancel: &CancellationToken,
    ) -> Result<Vec<Movie>, CatalogError> {
        let predicate = QueryPredicate::new(
            field,
            Predicate::in_strings(values),
            SortKey::descending(sort_key),
        )?;
        let query = FindQuery::from_predicate(&predicate).with_window(&window);

        with_cancellation(cancel, self.find_movies(&query)).await
    }

    /// Id and title of every movie made in any of `countries`, unpaginated.
    pub async fn list_movies_by_country(
        &self,
        countries: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Movie>, CatalogError> {
        let predicate = QueryPredicate::new(
            FIELD_COUNTRIES,
            Predicate::in_strings(countries),
            SortKey::descending(FIELD_TITLE),
        )?;
        let query = FindQuery::from_predicate(&predicate).with_projection(&[FIELD_TITLE]);

        with_cancellation(cancel, self.find_movies(&query)).await
    }

    /// Runtime and rating histograms of one page of `cast_name`'s movies,
    /// plus the number of their movies in the whole catalog.
    pub async fn faceted_search_by_cast(
        &self,
        cast_name: &str,
        page: u64,
        cancel: &CancellationToken,
    ) -> Result<FacetResult, CatalogError> {
        let cast_name = cast_name.trim();

        if cast_name.is_empty() {
            return Err(CatalogError::InvalidArguments(
                "cast member name is empty".into(),
            ));
        }

        let query = QueryPredicate::new(
            FIELD_CAST,
            Predicate::Equals(Bson::String(cast_name.to_string())),
            SortKey::default(),
        )?;

        let facet_pipeline = FacetPipeline::new(&query, &self.facet_config, page).get_pipeline()?;
        let count_pipeline = CountPipeline::new(&query).get_pipeline()?;

        let start_time = Instant::now();

        // two independent round trips, no shared snapshot between them
        let facets_request = async {
            self.store
                .aggregate(COLLECTION_MOVIES_NAME, &facet_pipeline)
                .await
                .map_err(CatalogError::from)
        };

        let (facet_documents, count) = with_cancellation(cancel, async {
            try_join!(facets_request, self.count_movies(&count_pipeline))
        })
        .await?;

        let facets = reconcile(FacetPipeline::read_facets(facet_documents)?, count);

        debug!(
            "Faceted search for {cast_name:?} page {page}: {} movies of {} in {}ms",
            facets.movies.len(),
            facets.count,
            start_time.elapsed().as_millis()
        );

        Ok(facets)
    }

    /// Listing behind `/movies`: dispatches on the filter and attaches the
    /// size of the whole filtered set. `sort` is ignored for text searches,
    /// which are always ordered by relevance.
    pub async fn get_movies(
        &self,
        filter: &MovieFilter,
        window: PageWindow,
        sort: Option<SortKey>,
        cancel: &CancellationToken,
    ) -> Result<MoviePage, CatalogError> {
        let sort = sort.unwrap_or_default();

        let predicate = match filter {
            MovieFilter::None => QueryPredicate::new(FIELD_ID, Predicate::Any, sort)?,
            MovieFilter::Text(keywords) => text_predicate(keywords)?,
            MovieFilter::Cast(cast) => {
                QueryPredicate::new(FIELD_CAST, Predicate::in_strings(cast), sort)?
            }
            MovieFilter::Genre(genres) => {
                QueryPredicate::new(FIELD_GENRES, Predicate::in_strings(genres), sort)?
            }
        };

        let query = FindQuery::from_predicate(&predicate).with_window(&window);
        let count_pipeline = CountPipeline::new(&predicate).get_pipeline()?;

        let (movies, total_results) = with_cancellation(cancel, async {
            try_join!(self.find_movies(&query), self.count_movies(&count_pipeline))
        })
        .await?;

        Ok(MoviePage {
            movies,
            total_results,
        })
    }
}
