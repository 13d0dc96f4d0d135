use indexmap::IndexSet;

use super::{FieldPath, Payload, RedactionError};

/// The read-only field paths of one operation.
///
/// Duplicates are collapsed on insertion; iteration follows declaration order,
/// although redaction results never depend on it.
///
/// # Examples
///
/// ```rust
/// use c8y_core::RuleSet;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rules = RuleSet::parse(["id", "self", "source.name"])?;
/// assert_eq!(rules.len(), 3);
///
/// // Malformed declarations are configuration errors
/// assert!(RuleSet::parse(["id", "source..name"]).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    paths: IndexSet<FieldPath>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses dotted path declarations.
    ///
    /// # Errors
    ///
    /// Fails on the first empty path or empty segment.
    pub fn parse<I, S>(declarations: I) -> Result<Self, RedactionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        declarations
            .into_iter()
            .map(|declaration| FieldPath::parse(declaration.as_ref()))
            .collect()
    }

    /// Adds a path to the set.
    pub fn add(mut self, path: FieldPath) -> Self {
        let _ = self.paths.insert(path);
        self
    }

    /// Parses and adds a dotted path.
    ///
    /// # Errors
    ///
    /// Returns the parsing error of [`FieldPath::parse`].
    pub fn add_path(self, dotted: &str) -> Result<Self, RedactionError> {
        let path = FieldPath::parse(dotted)?;
        Ok(self.add(path))
    }

    /// Returns a set holding the rules of both sets.
    pub fn union(&self, other: &Self) -> Self {
        let paths = self.paths.union(&other.paths).cloned().collect();
        Self { paths }
    }

    /// Returns `true` if the set contains this exact path.
    pub fn contains(&self, path: &FieldPath) -> bool {
        self.paths.contains(path)
    }

    /// Number of distinct rules.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if there is no rule.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterates over the rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldPath> + '_ {
        self.paths.iter()
    }

    /// Lists the rules that do not name an existing field of `payload`.
    ///
    /// Useful in tests to catch typos in read-only declarations against a
    /// representative payload.
    pub fn unresolved<'a>(&'a self, payload: &Payload) -> Vec<&'a FieldPath> {
        self.paths
            .iter()
            .filter(|path| payload.resolve(path).is_none())
            .collect()
    }
}

impl FromIterator<FieldPath> for RuleSet {
    fn from_iter<T: IntoIterator<Item = FieldPath>>(iter: T) -> Self {
        let paths = iter.into_iter().collect();
        Self { paths }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a FieldPath;
    type IntoIter = indexmap::set::Iter<'a, FieldPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
