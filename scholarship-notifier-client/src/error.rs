use crate::api;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("api error: {0}")]
    Api(#[from] api::Error),
}
