//! Font descriptors and their deduplication.

use std::fmt;
use std::ops::BitOr;
use std::sync::{Arc, RwLock};

use inlinable_string::InlinableString;

use crate::errors::*;
use crate::utils::hash::FastHashSet;

/// Style flags of a font.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontStyle(u8);

impl FontStyle {
    pub const NORMAL: FontStyle = FontStyle(0);
    pub const BOLD: FontStyle = FontStyle(1);
    pub const ITALIC: FontStyle = FontStyle(2);

    #[inline]
    pub fn contains(self, other: FontStyle) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for FontStyle {
    type Output = FontStyle;

    fn bitor(self, rhs: FontStyle) -> FontStyle {
        FontStyle(self.0 | rhs.0)
    }
}

/// Describes a font by its family name, height in points and style. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontData {
    name: InlinableString,
    height: u32,
    style: FontStyle,
}

impl FontData {
    pub fn new<T: Into<InlinableString>>(name: T, height: u32, style: FontStyle) -> Self {
        FontData {
            name: name.into(),
            height,
            style,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn set_name<T: Into<InlinableString>>(&mut self, name: T) {
        self.name = name.into();
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    pub fn set_style(&mut self, style: FontStyle) {
        self.style = style;
    }

    /// Checks whether this descriptor could be rendered at all.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidArgument("font name must not be empty".into()));
        }

        Ok(())
    }
}

impl fmt::Display for FontData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}pt", self.name, self.height)?;
        if self.style.contains(FontStyle::BOLD) {
            write!(f, " bold")?;
        }

        if self.style.contains(FontStyle::ITALIC) {
            write!(f, " italic")?;
        }

        Ok(())
    }
}

/// Interns `FontData`s, so all the equal descriptors in use share one instance.
///
/// The canonical instances are immutable behind an `Arc`. Callers that need to modify one
/// clone it out first, which can never affect the canonical or its other holders.
#[derive(Default)]
pub struct FontDataFactory {
    entries: RwLock<FastHashSet<Arc<FontData>>>,
}

impl FontDataFactory {
    pub fn new() -> Self {
        FontDataFactory {
            entries: RwLock::new(FastHashSet::default()),
        }
    }

    /// Returns the canonical instance equal to `data`. The first time a value is seen, a
    /// copy of `data` becomes the canonical, so later changes to `data` do not leak into it.
    ///
    /// Fails with `Error::InvalidArgument` if `data` has no font name.
    pub fn find_font_data(&self, data: &FontData) -> Result<Arc<FontData>> {
        if let Some(v) = recover(self.entries.read()).get(data) {
            return Ok(v.clone());
        }

        data.validate()?;

        let mut entries = recover(self.entries.write());
        if let Some(v) = entries.get(data) {
            return Ok(v.clone());
        }

        let canonical = Arc::new(data.clone());
        entries.insert(canonical.clone());
        Ok(canonical)
    }

    /// Returns the number of distinct descriptors interned so far.
    pub fn len(&self) -> usize {
        recover(self.entries.read()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
