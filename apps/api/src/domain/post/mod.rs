// Post domain module

pub mod value_objects;

pub use value_objects::{PostContent, PostTitle};
