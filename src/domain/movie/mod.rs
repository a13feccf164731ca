pub mod entity;
pub mod invariants;

pub use entity::{
    CastMember, Credits, CrewMember, Genre, MovieDetails, MovieSummary, ProductionCompany,
    ProductionCountry, SpokenLanguage, TrendingPage, UNKNOWN_DATE,
};
pub use invariants::validate_movie_summary;
