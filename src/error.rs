//! Error taxonomy for reads against the content API.
//!
//! Two shapes cross the fetcher boundary: a transport error (the request did
//! not produce a 2xx JSON body) and a response error (a 2xx body that failed
//! validation). Response errors carry their resource domain as a tag so
//! callers branch on `domain`/`name()` instead of on a type hierarchy.

use std::fmt;

use thiserror::Error;

/// The content domain an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceDomain {
    Project,
    Experience,
    Certification,
    Blog,
    Search,
}

impl ResourceDomain {
    /// Tag used by downstream code to branch on the error kind.
    pub fn error_name(&self) -> &'static str {
        match self {
            Self::Project => "ProjectResponseError",
            Self::Experience => "ExperienceResponseError",
            Self::Certification => "CertificationResponseError",
            Self::Blog => "BlogResponseError",
            Self::Search => "SearchResponseError",
        }
    }
}

impl fmt::Display for ResourceDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Project => "project",
            Self::Experience => "experience",
            Self::Certification => "certification",
            Self::Blog => "blog",
            Self::Search => "search",
        };
        f.write_str(name)
    }
}

/// Why a response was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    /// A single record, or an array of full records, failed validation.
    InvalidResponse,
    /// A list envelope failed validation.
    InvalidListResponse,
    /// A brief array or nav envelope failed validation.
    InvalidBriefResponse,
    /// The requested record does not exist.
    NotFound,
}

/// Fixed message for a (domain, reason) pair.
pub fn error_message(domain: ResourceDomain, reason: ErrorReason) -> &'static str {
    use ErrorReason::*;
    use ResourceDomain::*;

    match (domain, reason) {
        (Project, InvalidResponse) => "Invalid project data from server",
        (Project, InvalidListResponse) => "Invalid project list data from server",
        (Project, InvalidBriefResponse) => "Invalid project navigation data from server",
        (Project, NotFound) => "Project not found",

        (Experience, InvalidResponse) => "Invalid experience data from server",
        (Experience, InvalidListResponse) => "Invalid experience list data from server",
        (Experience, InvalidBriefResponse) => "Invalid experience timeline data from server",
        (Experience, NotFound) => "Experience not found",

        (Certification, InvalidResponse) => "Invalid certification data from server",
        (Certification, InvalidListResponse) => "Invalid certification list data from server",
        (Certification, InvalidBriefResponse) => "Invalid certification badges data from server",
        (Certification, NotFound) => "Certification not found",

        (Blog, InvalidResponse) => "Invalid blog data from server",
        (Blog, InvalidListResponse) => "Invalid blog list data from server",
        (Blog, InvalidBriefResponse) => "Invalid blog navigation data from server",
        (Blog, NotFound) => "Blog not found",

        (Search, NotFound) => "No search results found",
        (Search, _) => "Invalid search response from server",
    }
}

/// A 2xx response whose body did not match the expected schema, or a
/// record the caller determined to be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseError {
    pub domain: ResourceDomain,
    pub reason: ErrorReason,
    pub endpoint: Option<String>,
}

impl ResponseError {
    pub fn new(domain: ResourceDomain, reason: ErrorReason, endpoint: impl Into<String>) -> Self {
        Self {
            domain,
            reason,
            endpoint: Some(endpoint.into()),
        }
    }

    pub fn not_found(domain: ResourceDomain, endpoint: Option<String>) -> Self {
        Self {
            domain,
            reason: ErrorReason::NotFound,
            endpoint,
        }
    }

    pub fn name(&self) -> &'static str {
        self.domain.error_name()
    }

    pub fn message(&self) -> &'static str {
        error_message(self.domain, self.reason)
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.message())
    }
}

impl std::error::Error for ResponseError {}

/// The request itself failed; no data is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("HTTP {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("Request to {endpoint} failed: {message}")]
    Network { endpoint: String, message: String },

    /// A cached value was read back as a different type than was stored.
    #[error("Cached value for {key} has an unexpected type")]
    TypeMismatch { key: String },
}

impl TransportError {
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Status { endpoint, .. }
            | Self::Timeout { endpoint }
            | Self::Network { endpoint, .. } => endpoint,
            Self::TypeMismatch { key } => key,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(endpoint: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            Self::Network {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        }
    }
}

/// Every failure a resource read can produce.
///
/// `Clone` so one outcome can be shared by every caller waiting on the same
/// in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl ApiError {
    /// Tag for downstream branching: the domain error name, or
    /// `TransportError`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TransportError",
            Self::Response(e) => e.name(),
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Transport(e) => Some(e.endpoint()),
            Self::Response(e) => e.endpoint(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(404),
            Self::Response(e) => e.reason == ErrorReason::NotFound,
        }
    }

    /// Reinterpret a 404 from a detail endpoint as the domain's not-found
    /// error. Any other error is returned unchanged.
    pub fn into_not_found(self, domain: ResourceDomain) -> ApiError {
        match self {
            Self::Transport(TransportError::Status {
                status: 404,
                endpoint,
            }) => Self::Response(ResponseError::not_found(domain, Some(endpoint))),
            other => other,
        }
    }
}
