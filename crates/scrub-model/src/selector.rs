//! Column selection for cleaning rules.
//!
//! A selector is one of three modes (explicit names, a name pattern, or all
//! columns) or unspecified. Holding the mode in an enum means two modes can
//! never be active at once; the document form `{columns, pattern, all}` is
//! checked for exclusivity when it is converted.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// A regular expression matched from the start of a string.
///
/// `col_\d+` matches `col_1` and `col_12x` but not `xcol_1`.
#[derive(Clone)]
pub struct AnchoredPattern {
    source: String,
    regex: Regex,
}

impl AnchoredPattern {
    pub fn new(source: impl Into<String>) -> std::result::Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})"))?;
        Ok(Self { source, regex })
    }

    /// The pattern as written in the configuration.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for AnchoredPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for AnchoredPattern {}

impl fmt::Debug for AnchoredPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnchoredPattern").field(&self.source).finish()
    }
}

/// Which columns a rule targets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SelectorDocument", into = "SelectorDocument")]
pub enum ColumnSelector {
    /// No mode given; resolves like [`ColumnSelector::All`].
    #[default]
    Unspecified,
    /// Every column of the dataset, in dataset order.
    All,
    /// Named columns, in the order given. Names missing from the dataset are
    /// dropped. An empty list resolves like [`ColumnSelector::All`].
    Columns(Vec<String>),
    /// Columns whose name matches the pattern from its first character.
    Pattern(AnchoredPattern),
}

impl ColumnSelector {
    pub fn all() -> Self {
        Self::All
    }

    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Columns(names.into_iter().map(Into::into).collect())
    }

    /// Build a pattern selector, rejecting invalid regular expressions.
    pub fn pattern(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        AnchoredPattern::new(source)
            .map(Self::Pattern)
            .map_err(|e| ConfigError::invalid("pattern", e.to_string()))
    }

    /// Build a selector from the three document fields.
    ///
    /// At most one of `columns`, `pattern` and `all` may be set. An empty
    /// list or empty pattern counts as not set.
    pub fn from_parts(
        columns: Option<Vec<String>>,
        pattern: Option<String>,
        all: bool,
    ) -> Result<Self> {
        let columns = columns.filter(|names| !names.is_empty());
        let pattern = pattern.filter(|source| !source.is_empty());
        match (columns, pattern, all) {
            (Some(_), Some(_), _) => Err(ConfigError::invalid(
                "",
                "cannot specify both 'columns' and 'pattern'",
            )),
            (Some(_), None, true) => Err(ConfigError::invalid(
                "",
                "cannot specify both 'columns' and 'all'",
            )),
            (None, Some(_), true) => Err(ConfigError::invalid(
                "",
                "cannot specify both 'pattern' and 'all'",
            )),
            (Some(names), None, false) => Ok(Self::Columns(names)),
            (None, Some(source), false) => Self::pattern(source),
            (None, None, true) => Ok(Self::All),
            (None, None, false) => Ok(Self::Unspecified),
        }
    }

    /// True when the selector resolves to every column.
    pub fn selects_all(&self) -> bool {
        match self {
            Self::All | Self::Unspecified => true,
            Self::Columns(names) => names.is_empty(),
            Self::Pattern(_) => false,
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified | Self::All => f.write_str("*"),
            Self::Columns(names) if names.is_empty() => f.write_str("*"),
            Self::Columns(names) => f.write_str(&names.join(", ")),
            Self::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

/// Serialized shape of a [`ColumnSelector`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SelectorDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub all: bool,
}

impl TryFrom<SelectorDocument> for ColumnSelector {
    type Error = ConfigError;

    fn try_from(doc: SelectorDocument) -> Result<Self> {
        Self::from_parts(doc.columns, doc.pattern, doc.all)
    }
}

impl From<ColumnSelector> for SelectorDocument {
    fn from(selector: ColumnSelector) -> Self {
        match selector {
            ColumnSelector::Unspecified => Self::default(),
            ColumnSelector::Columns(names) if names.is_empty() => Self::default(),
            ColumnSelector::All => Self {
                all: true,
                ..Self::default()
            },
            ColumnSelector::Columns(names) => Self {
                columns: Some(names),
                ..Self::default()
            },
            ColumnSelector::Pattern(pattern) => Self {
                pattern: Some(pattern.source),
                ..Self::default()
            },
        }
    }
}
