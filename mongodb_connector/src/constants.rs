pub(crate) const DEFAULT_DATABASE_NAME: &str = "sample_mflix";

pub(crate) const COLLECTION_MOVIES_NAME: &str = "movies";
pub(crate) const COLLECTION_MOVIES_SEARCH_INDEX: &str = "movies_text";

pub(crate) const COLLECTION_COMMENTS_NAME: &str = "comments";

pub const RUNTIME_BOUNDARIES: [i64; 5] = [0, 60, 90, 120, 180];
pub const RATING_BOUNDARIES: [i64; 5] = [0, 50, 70, 90, 100];
pub const DEFAULT_BUCKET_KEY: &str = "other";
pub const FACET_MOVIES_PER_PAGE: u64 = 20;

pub(crate) const FACET_RUNTIME: &str = "runtime";
pub(crate) const FACET_RATING: &str = "rating";
pub(crate) const FACET_MOVIES: &str = "movies";

pub(crate) const FIELD_ID: &str = "_id";
// text predicates run against the collection's text index, not a single field
pub(crate) const FIELD_TEXT: &str = "$text";
pub(crate) const FIELD_TITLE: &str = "title";
pub(crate) const FIELD_CAST: &str = "cast";
pub(crate) const FIELD_GENRES: &str = "genres";
pub(crate) const FIELD_COUNTRIES: &str = "countries";
pub(crate) const FIELD_RUNTIME: &str = "runtime";
pub(crate) const FIELD_CRITIC_METER: &str = "tomatoes.critic.meter";
pub(crate) const FIELD_VIEWER_REVIEWS: &str = "tomatoes.viewer.numReviews";
pub(crate) const FIELD_SCORE: &str = "score";
pub(crate) const FIELD_COMMENTS: &str = "comments";
pub(crate) const FIELD_MOVIE_ID: &str = "movie_id";
pub(crate) const FIELD_DATE: &str = "date";
pub(crate) const FIELD_COUNT: &str = "count";
