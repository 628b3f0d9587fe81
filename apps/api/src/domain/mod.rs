// Domain layer module exports
// Users, posts and the repository contracts that persist them

pub mod errors;
pub mod post;
pub mod repositories;
pub mod user;
