use std::sync::Arc;

use crate::error::ApiError;

/// Coarse status broadcast to subscribers on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Fetching,
    Success,
    Error,
}

/// What a reader sees for one key.
///
/// `previous` carries the last successful value while a revalidation is in
/// flight or after it failed.
#[derive(Debug)]
pub enum QueryState<T> {
    Idle,
    Fetching { previous: Option<Arc<T>> },
    Success(Arc<T>),
    Error {
        error: ApiError,
        previous: Option<Arc<T>>,
    },
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Fetching { previous } => Self::Fetching {
                previous: previous.clone(),
            },
            Self::Success(data) => Self::Success(Arc::clone(data)),
            Self::Error { error, previous } => Self::Error {
                error: error.clone(),
                previous: previous.clone(),
            },
        }
    }
}

impl<T> QueryState<T> {
    pub fn status(&self) -> QueryStatus {
        match self {
            Self::Idle => QueryStatus::Idle,
            Self::Fetching { .. } => QueryStatus::Fetching,
            Self::Success(_) => QueryStatus::Success,
            Self::Error { .. } => QueryStatus::Error,
        }
    }

    /// The freshest value available, if any.
    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            Self::Idle => None,
            Self::Success(data) => Some(data),
            Self::Fetching { previous } | Self::Error { previous, .. } => previous.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
