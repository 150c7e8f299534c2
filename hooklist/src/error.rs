use std::fmt;

/// Precondition violations reported by list operations.
///
/// Every error is raised before the list is touched, so a failed call leaves
/// both the list and the object exactly as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// `front`/`back` on a list with no elements.
    Empty,
    /// The object's link already belongs to a list.
    AlreadyLinked,
    /// A cursor at the end position where an element was required, or a
    /// range bound that does not follow the start of the range.
    InvalidPosition,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::Empty => write!(f, "list is empty"),
            ListError::AlreadyLinked => write!(f, "element is already linked into a list"),
            ListError::InvalidPosition => {
                write!(f, "position is at the end or range bound was not reached")
            }
        }
    }
}

impl std::error::Error for ListError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(ListError::Empty.to_string(), "list is empty");
        assert_eq!(
            ListError::AlreadyLinked.to_string(),
            "element is already linked into a list"
        );
        let msg = ListError::InvalidPosition.to_string();
        assert!(msg.contains("at the end"));
        assert!(msg.contains("range bound"));
    }
}
