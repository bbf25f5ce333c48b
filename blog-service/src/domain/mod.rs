pub mod models;

pub use models::{Author, Comment, Follow, Group, Identity, Post};
