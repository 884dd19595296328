//! Persistence models (SeaORM entities) and database connection helpers.

pub mod errors;
pub mod db;
pub mod article;

#[cfg(test)]
mod tests;
