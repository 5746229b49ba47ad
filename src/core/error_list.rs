//! Ordered aggregation of several errors into one reportable value

use std::error::Error as StdError;
use std::fmt;

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Separator placed between messages by [`ErrorList::render`].
pub const SEPARATOR: &str = " : ";

/// An append-only list of errors.
///
/// The list is flat: every appended value is stored as one entry, whatever
/// its concrete type. Combining two lists is explicit through
/// [`ErrorList::merge`].
///
/// # Example
///
/// ```
/// use teelog::ErrorList;
///
/// let mut errs = ErrorList::new();
/// assert_eq!(errs.render(), "");
///
/// errs.push("disk full");
/// errs.push(std::io::Error::other("pipe closed"));
/// assert_eq!(errs.count(), 2);
/// assert_eq!(errs.render(), "disk full : pipe closed");
/// ```
#[derive(Default)]
pub struct ErrorList {
    errors: Vec<BoxedError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Append one error.
    pub fn push<E>(&mut self, error: E)
    where
        E: Into<BoxedError>,
    {
        self.errors.push(error.into());
    }

    /// Append every error in order. An empty iterator leaves the list unchanged.
    pub fn append<I, E>(&mut self, errors: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<BoxedError>,
    {
        self.errors.extend(errors.into_iter().map(Into::into));
    }

    /// Move all entries of `other` to the end of this list.
    pub fn merge(&mut self, other: ErrorList) {
        self.errors.extend(other.errors);
    }

    pub fn count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn StdError + Send + Sync + 'static)> {
        self.errors.iter().map(|e| e.as_ref())
    }

    /// All messages joined by `" : "`, or an empty string for an empty list.
    pub fn render(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    /// `Ok(())` when empty, otherwise the list itself as the error.
    pub fn into_result(self) -> Result<(), ErrorList> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.errors.iter().map(|e| e.to_string()))
            .finish()
    }
}

impl StdError for ErrorList {}

impl<E> FromIterator<E> for ErrorList
where
    E: Into<BoxedError>,
{
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut list = ErrorList::new();
        list.append(iter);
        list
    }
}

impl IntoIterator for ErrorList {
    type Item = BoxedError;
    type IntoIter = std::vec::IntoIter<BoxedError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;

    #[test]
    fn test_empty_list_renders_empty() {
        let errs = ErrorList::new();
        assert_eq!(errs.render(), "");
        assert_eq!(errs.to_string(), "");
        assert_eq!(errs.count(), 0);
        assert!(errs.into_result().is_ok());
    }

    #[test]
    fn test_render_preserves_order() {
        let mut errs = ErrorList::new();
        errs.push("first");
        errs.push(LoggerError::other("second"));
        errs.push("third");

        assert_eq!(errs.count(), 3);
        assert_eq!(errs.render(), "first : second : third");
    }

    #[test]
    fn test_append_empty_is_noop() {
        let mut errs = ErrorList::new();
        errs.push("only");
        errs.append(Vec::<LoggerError>::new());
        assert_eq!(errs.count(), 1);
        assert_eq!(errs.render(), "only");
    }

    #[test]
    fn test_nested_list_is_one_entry_unless_merged() {
        let mut inner = ErrorList::new();
        inner.push("a");
        inner.push("b");

        let mut outer = ErrorList::new();
        outer.push(inner);
        assert_eq!(outer.count(), 1);
        assert_eq!(outer.render(), "a : b");

        let mut other = ErrorList::new();
        other.push("c");
        other.push("d");
        outer.merge(other);
        assert_eq!(outer.count(), 3);
        assert_eq!(outer.render(), "a : b : c : d");
    }

    #[test]
    fn test_collect_and_downcast() {
        let errs: ErrorList = vec![LoggerError::other("x"), LoggerError::other("y")]
            .into_iter()
            .collect();
        assert_eq!(errs.count(), 2);
        assert!(errs
            .iter()
            .all(|e| e.downcast_ref::<LoggerError>().is_some()));
    }

    #[test]
    fn test_into_result_returns_list() {
        let mut errs = ErrorList::new();
        errs.push("broken");
        let err = errs.into_result().unwrap_err();
        assert_eq!(err.count(), 1);
        assert_eq!(format!("{:?}", err), r#"["broken"]"#);
    }
}
