//! Autohunt errors.

use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum AutoHuntError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
