use std::fmt;

// ── ImagePresence ─────────────────────────────────────────────────────────────

/// Whether a page carries at least one embedded image.
///
/// Stored in the `image` column as `"Yes"` / `"No"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImagePresence {
    Yes,
    No,
}

impl ImagePresence {
    /// The column value written for this flag.
    ///
    /// ```
    /// use pdf2table::ImagePresence;
    ///
    /// assert_eq!(ImagePresence::Yes.as_str(), "Yes");
    /// assert_eq!(ImagePresence::from(false).as_str(), "No");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            ImagePresence::Yes => "Yes",
            ImagePresence::No => "No",
        }
    }

    pub fn is_yes(self) -> bool {
        self == ImagePresence::Yes
    }
}

impl From<bool> for ImagePresence {
    fn from(has_images: bool) -> Self {
        if has_images {
            ImagePresence::Yes
        } else {
            ImagePresence::No
        }
    }
}

impl fmt::Display for ImagePresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flag per page, indexed by zero-based page position.
pub type ImagePresenceList = Vec<ImagePresence>;

// ── PageRecord ────────────────────────────────────────────────────────────────

/// The per-page unit of extracted data, persisted as one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    page_number: u32,
    text: String,
    image: ImagePresence,
}

impl PageRecord {
    /// Build a record for the page at zero-based `page_index`.
    pub fn new(page_index: usize, text: String, image: ImagePresence) -> Self {
        Self {
            page_number: page_index as u32 + 1,
            text,
            image,
        }
    }

    /// 1-based page number.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> ImagePresence {
        self.image
    }

    pub fn has_image(&self) -> bool {
        self.image.is_yes()
    }
}
