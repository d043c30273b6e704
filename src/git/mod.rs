mod repo;

pub use repo::{GitCommandError, GitRepo};
