//! Repository listing cursor.

/// Boundary of the repository page requested next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// First request: repositories updated after this ISO-8601 timestamp.
    UpdatedAfter(String),

    /// Follow-up request: continuation URL handed back by the API.
    Continue(String),
}
