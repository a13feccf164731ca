// src/domain/movie/entity.rs
//
// Movie catalog entities
//
// CRITICAL INVARIANTS:
// - `id` is stable and unique within one remote source
// - `is_favorite` is DERIVED. It is never read from the wire and never
//   persisted with the summary. It is recomputed from the favorite set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder for missing or malformed release dates
pub const UNKNOWN_DATE: &str = "-";

/// A movie as listed by the trending endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// ISO date (`yyyy-MM-dd`)
    #[serde(default)]
    pub release_date: Option<String>,
    /// 0..=10
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub adult: Option<bool>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub video: Option<bool>,

    #[serde(skip)]
    pub is_favorite: bool,
}

impl MovieSummary {
    /// Bare summary with only an id and title
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            original_title: None,
            overview: None,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            vote_average: None,
            vote_count: None,
            popularity: None,
            adult: None,
            genre_ids: Vec::new(),
            original_language: None,
            video: None,
            is_favorite: false,
        }
    }

    /// Copy of this summary with the favorite flag set
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Parsed release date, if present and well-formed
    pub fn release_day(&self) -> Option<NaiveDate> {
        parse_release_date(self.release_date.as_deref())
    }

    /// Release date rendered as `MMM dd, yyyy`, or `-`
    pub fn formatted_release_date(&self) -> String {
        format_release_date(self.release_date.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: i64,
    #[serde(default)]
    pub logo_path: Option<String>,
    pub name: String,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    pub english_name: String,
    pub iso_639_1: String,
    pub name: String,
}

/// Full movie record from the details endpoint
///
/// Not cached: details are always fetched from the remote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub adult: Option<bool>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub video: Option<bool>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub budget: Option<i64>,
    #[serde(default)]
    pub revenue: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,

    /// Attached after a separate credits fetch
    #[serde(default)]
    pub credits: Option<Credits>,
}

impl MovieDetails {
    /// Summary view of these details, used when favoriting from a details screen
    pub fn to_summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            original_title: self.original_title.clone(),
            overview: self.overview.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            adult: self.adult,
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
            original_language: self.original_language.clone(),
            video: self.video,
            is_favorite: false,
        }
    }

    pub fn formatted_release_date(&self) -> String {
        format_release_date(self.release_date.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub gender: Option<i32>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub cast_id: Option<i64>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub credit_id: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: i64,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub gender: Option<i32>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub credit_id: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub id: i64,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Credits {
    pub fn directors(&self) -> Vec<&CrewMember> {
        self.crew
            .iter()
            .filter(|member| {
                member
                    .job
                    .as_deref()
                    .is_some_and(|job| job.eq_ignore_ascii_case("director"))
            })
            .collect()
    }

    /// First `limit` billed cast members, or all of them
    pub fn lead_actors(&self, limit: Option<usize>) -> &[CastMember] {
        match limit {
            Some(limit) => &self.cast[..limit.min(self.cast.len())],
            None => &self.cast,
        }
    }
}

/// One page of the trending listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl TrendingPage {
    /// Single-page result served from the local cache.
    ///
    /// `total_pages` is always 1: no further paging is possible offline.
    pub fn from_cache(results: Vec<MovieSummary>) -> Self {
        let total_results = results.len() as u32;
        Self {
            page: 1,
            results,
            total_pages: 1,
            total_results,
        }
    }
}

fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.filter(|s| !s.trim().is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn format_release_date(raw: Option<&str>) -> String {
    parse_release_date(raw)
        .map(|date| date.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}
