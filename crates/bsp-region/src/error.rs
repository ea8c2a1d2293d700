use geometry::InvalidGeometry;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error(transparent)]
    InvalidGeometry(#[from] InvalidGeometry),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{len} elements do not fit the u32 element id space")]
    TooManyElements { len: usize },
}
