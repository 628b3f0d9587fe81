// Infrastructure layer module
// SQLite adapters for the domain repositories and on-disk avatar storage

pub mod avatar_store;
pub mod database;
pub mod repositories;
