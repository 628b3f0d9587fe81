// Repository contracts (ports) for the domain

pub mod post_repository;
pub mod user_repository;

pub use post_repository::{NewPost, Post, PostChanges, PostRepository, PostWithAuthor};
pub use user_repository::{NewUser, User, UserProfile, UserRepository};
