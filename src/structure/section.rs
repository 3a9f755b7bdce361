//! Sections: keyed groups of rows with optional header and footer.

use std::any::Any;
use std::fmt;

use compact_str::{CompactString, ToCompactString};

use super::row::{ContentComparable, ReuseIdentifier, Row};
use crate::surface::Surface;

// =============================================================================
// SectionId
// =============================================================================

/// Stable key of a section.
///
/// Must be unique within one structure. Built from strings or integers:
///
/// ```
/// use structure_kit::SectionId;
///
/// assert_eq!(SectionId::from("countries"), SectionId::from(String::from("countries")));
/// assert_eq!(SectionId::from(7_u32).as_str(), "7");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(CompactString);

impl SectionId {
    /// Create a section identifier.
    pub fn new(key: impl Into<CompactString>) -> Self {
        Self(key.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0.as_str(), f)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(key: &str) -> Self {
        Self(CompactString::from(key))
    }
}

impl From<String> for SectionId {
    fn from(key: String) -> Self {
        Self(CompactString::from(key))
    }
}

impl From<CompactString> for SectionId {
    fn from(key: CompactString) -> Self {
        Self(key)
    }
}

macro_rules! impl_section_id_from_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for SectionId {
                fn from(key: $ty) -> Self {
                    Self(key.to_compact_string())
                }
            }
        )*
    };
}

impl_section_id_from_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

// =============================================================================
// Header / Footer
// =============================================================================

/// A header or footer backed by a reusable view.
pub trait HeaderFooterView: Any {
    /// Reusable view identifier for `surface`.
    fn reuse_identifier(&self, surface: Surface) -> ReuseIdentifier {
        let _ = surface;
        ReuseIdentifier::of::<Self>()
    }

    /// The content capability, if this model supports it.
    ///
    /// Without it the header or footer never reloads.
    fn as_content_comparable(&self) -> Option<&dyn ContentComparable> {
        None
    }
}

impl dyn HeaderFooterView {
    /// Downcast to the concrete model type.
    pub fn downcast_ref<T: HeaderFooterView>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

/// Section header or footer.
pub enum HeaderFooter {
    /// Plain text title
    Text(CompactString),
    /// Custom view model
    View(Box<dyn HeaderFooterView>),
}

impl HeaderFooter {
    /// Text header or footer.
    pub fn text(text: impl Into<CompactString>) -> Self {
        Self::Text(text.into())
    }

    /// View-backed header or footer.
    pub fn view(view: impl HeaderFooterView) -> Self {
        Self::View(Box::new(view))
    }

    /// Text title, if this is a text header or footer.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::View(_) => None,
        }
    }
}

impl fmt::Debug for HeaderFooter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::View(view) => f
                .debug_tuple("View")
                .field(&view.reuse_identifier(Surface::Table))
                .finish(),
        }
    }
}

impl From<&str> for HeaderFooter {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for HeaderFooter {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

// =============================================================================
// Section
// =============================================================================

/// A keyed group of rows.
///
/// ```
/// use structure_kit::{Row, Section};
///
/// struct Spacer;
/// impl Row for Spacer {}
///
/// let section = Section::new("countries")
///     .with_header("Countries")
///     .with_rows([Spacer, Spacer]);
/// assert_eq!(section.len(), 2);
/// assert_eq!(section.header.as_ref().and_then(|h| h.as_text()), Some("Countries"));
/// ```
pub struct Section {
    /// Key, unique within one structure
    pub identifier: SectionId,
    /// Optional header
    pub header: Option<HeaderFooter>,
    /// Ordered rows
    pub rows: Vec<Box<dyn Row>>,
    /// Optional footer
    pub footer: Option<HeaderFooter>,
}

impl Section {
    /// Create an empty section.
    pub fn new(identifier: impl Into<SectionId>) -> Self {
        Self {
            identifier: identifier.into(),
            header: None,
            rows: Vec::new(),
            footer: None,
        }
    }

    /// Set the header.
    pub fn with_header(mut self, header: impl Into<HeaderFooter>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Set the footer.
    pub fn with_footer(mut self, footer: impl Into<HeaderFooter>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Append rows of one model type.
    pub fn with_rows<R: Row>(mut self, rows: impl IntoIterator<Item = R>) -> Self {
        self.extend(rows);
        self
    }

    /// Append a single row.
    pub fn push(&mut self, row: impl Row) {
        self.rows.push(Box::new(row));
    }

    /// Append already boxed rows, possibly of mixed model types.
    pub fn append(&mut self, rows: impl IntoIterator<Item = Box<dyn Row>>) {
        self.rows.extend(rows);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the section has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`.
    pub fn row(&self, index: usize) -> Option<&dyn Row> {
        self.rows.get(index).map(|row| row.as_ref())
    }
}

impl<R: Row> Extend<R> for Section {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        self.rows
            .extend(iter.into_iter().map(|row| Box::new(row) as Box<dyn Row>));
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("identifier", &self.identifier)
            .field("header", &self.header)
            .field("rows", &self.rows.len())
            .field("footer", &self.footer)
            .finish()
    }
}
