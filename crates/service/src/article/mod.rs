//! Article module: three-layer architecture (domain, repository, service).
//!
//! `ArticleService` owns every rule (trimming, length limits, timestamps); repositories
//! only move rows in and out of storage.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{Article, ArticleId, ArticleInput};
pub use errors::{ArticleError, ValidationError};
pub use repository::ArticleRepository;
pub use service::ArticleService;
