use crate::pdf_utils::{dict_entry, filter_chain, name_entry};
use crate::{Error, ImagePresence, ImagePresenceList, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How far `/Parent` links are followed when looking for inherited resources.
const MAX_PAGE_TREE_DEPTH: usize = 32;

// ── PageImage ─────────────────────────────────────────────────────────────────

/// An image embedded in a page, carrying its encoded bytes as stored in the
/// PDF.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Zero-based index of the page the image was found on.
    pub page_index: usize,

    /// 1-based position of the image within its page.
    pub ordinal: usize,

    /// The image XObject this was read from.
    pub object_id: ObjectId,

    /// Encoded image bytes. For images without a self-contained codec these
    /// are the decoded samples.
    pub data: Vec<u8>,

    /// File extension matching the image's native encoding.
    pub extension: &'static str,
}

impl PageImage {
    /// Deterministic file name: `image{page}_{ordinal}.{ext}` with a 1-based
    /// page number.
    ///
    /// ```
    /// # use pdf2table::PageImage;
    /// let image = PageImage { page_index: 0, ordinal: 2, object_id: (7, 0), data: vec![], extension: "jpg" };
    /// assert_eq!(image.file_name(), "image1_2.jpg");
    /// ```
    pub fn file_name(&self) -> String {
        format!(
            "image{}_{}.{}",
            self.page_index + 1,
            self.ordinal,
            self.extension
        )
    }

    /// Write the bytes verbatim into `output_dir`, creating the directory if
    /// necessary. Returns the path written.
    pub fn save_to_disk<P: AsRef<Path>>(&self, output_dir: P) -> std::io::Result<PathBuf> {
        let dir = output_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let dest = dir.join(self.file_name());
        std::fs::write(&dest, &self.data)?;
        Ok(dest)
    }
}

/// Map a stream's final filter to the extension of the format it produces.
///
/// Returns `None` for filters that only compress raw samples.
pub(crate) fn native_extension(filter: &[u8]) -> Option<&'static str> {
    match filter {
        b"DCTDecode" | b"DCT" => Some("jpg"),
        b"JPXDecode" => Some("jp2"),
        b"JBIG2Decode" => Some("jb2"),
        b"CCITTFaxDecode" | b"CCF" => Some("ccitt"),
        _ => None,
    }
}

// ── ImageExtractor ────────────────────────────────────────────────────────────

/// Image pass over one parsed PDF.
///
/// ```no_run
/// use pdf2table::ImageExtractor;
///
/// let extractor = ImageExtractor::from_path("report.pdf").unwrap();
/// let flags = extractor.extract_to_folder("extracted_images").unwrap();
/// assert_eq!(flags.len(), extractor.page_count());
/// ```
pub struct ImageExtractor {
    document: Document,
}

impl ImageExtractor {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Load a PDF from the file system.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            document: Document::load(path)?,
        })
    }

    /// Load a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            document: Document::load_mem(data)?,
        })
    }

    // ── Enumeration ───────────────────────────────────────────────────────────

    /// Number of pages in document order.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Image presence flag for every page, without reading any image data.
    pub fn image_presence(&self) -> ImagePresenceList {
        self.page_ids()
            .into_iter()
            .map(|page_id| ImagePresence::from(!self.image_ids(page_id).is_empty()))
            .collect()
    }

    /// Read every image on the page at zero-based `page_index`, in resource
    /// order. Each image object appears once even if referenced repeatedly.
    pub fn page_images(&self, page_index: usize) -> Result<Vec<PageImage>> {
        let page_id = self
            .page_ids()
            .get(page_index)
            .copied()
            .ok_or_else(|| Error::InvalidPdf(format!("no page at index {page_index}")))?;

        self.read_page_images(page_index, page_id)
    }

    // ── Extraction ────────────────────────────────────────────────────────────

    /// Write every embedded image into `output_dir` and return one presence
    /// flag per page, in document order.
    ///
    /// Any image that cannot be read aborts the pass with
    /// [`Error::ImageExtraction`]; files already written stay on disk.
    pub fn extract_to_folder<P: AsRef<Path>>(&self, output_dir: P) -> Result<ImagePresenceList> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let page_ids = self.page_ids();
        let mut flags = ImagePresenceList::with_capacity(page_ids.len());

        for (page_index, page_id) in page_ids.into_iter().enumerate() {
            let images = self.read_page_images(page_index, page_id)?;

            if images.is_empty() {
                info!("No images found on page {}", page_index + 1);
            } else {
                info!(
                    "Found a total of {} images on page {}",
                    images.len(),
                    page_index + 1
                );
            }
            flags.push(ImagePresence::from(!images.is_empty()));

            for image in &images {
                let dest = image.save_to_disk(output_dir)?;
                info!("Image saved as {}", dest.display());
            }
        }

        Ok(flags)
    }

    /// Returns a reference to the underlying [`lopdf::Document`].
    pub fn document(&self) -> &Document {
        &self.document
    }

    // ── Private: resource discovery ──────────────────────────────────────────

    fn page_ids(&self) -> Vec<ObjectId> {
        self.document.get_pages().into_values().collect()
    }

    fn read_page_images(&self, page_index: usize, page_id: ObjectId) -> Result<Vec<PageImage>> {
        self.image_ids(page_id)
            .into_iter()
            .enumerate()
            .map(|(i, image_id)| self.read_image(page_index, i + 1, image_id))
            .collect()
    }

    /// Image XObject ids used by a page, including those nested in Form
    /// XObjects, deduplicated in first-seen order.
    fn image_ids(&self, page_id: ObjectId) -> Vec<ObjectId> {
        let mut images = Vec::new();
        let mut visited = HashSet::new();

        if let Some(resources) = self.page_resources(page_id) {
            self.collect_images(resources, &mut images, &mut visited);
        }

        images
    }

    /// Find the `/Resources` dictionary of a page, walking up the page tree
    /// when the page inherits it.
    fn page_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let mut node = self.document.get_dictionary(page_id).ok()?;

        for _ in 0..MAX_PAGE_TREE_DEPTH {
            if let Some(resources) = dict_entry(&self.document, node, b"Resources") {
                return Some(resources);
            }
            let parent_id = node.get(b"Parent").ok()?.as_reference().ok()?;
            node = self.document.get_dictionary(parent_id).ok()?;
        }

        None
    }

    fn collect_images(
        &self,
        resources: &Dictionary,
        images: &mut Vec<ObjectId>,
        visited: &mut HashSet<ObjectId>,
    ) {
        let Some(xobjects) = dict_entry(&self.document, resources, b"XObject") else {
            return;
        };

        for (name, value) in xobjects.iter() {
            let Ok(id) = value.as_reference() else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }
            let Ok(stream) = self.document.get_object(id).and_then(Object::as_stream) else {
                continue;
            };

            match name_entry(&stream.dict, b"Subtype") {
                Some(b"Image") => images.push(id),
                Some(b"Form") => {
                    debug!(
                        "Descending into form XObject /{}",
                        String::from_utf8_lossy(name)
                    );
                    if let Some(form_resources) =
                        dict_entry(&self.document, &stream.dict, b"Resources")
                    {
                        self.collect_images(form_resources, images, visited);
                    }
                }
                _ => {}
            }
        }
    }

    // ── Private: image stream decoding ───────────────────────────────────────

    /// Fetch an image's bytes and native extension.
    ///
    /// Streams ending in a self-contained codec such as `/DCTDecode` are
    /// returned as that codec's bytes, with any transport filters in front of
    /// it undone. Everything else is fully decoded and tagged `raw`.
    fn read_image(&self, page_index: usize, ordinal: usize, id: ObjectId) -> Result<PageImage> {
        let failure = |reason: String| Error::ImageExtraction {
            page: page_index as u32 + 1,
            ordinal,
            reason,
        };

        let stream = self
            .document
            .get_object(id)
            .and_then(Object::as_stream)
            .map_err(|e| failure(format!("object {} {} is not a stream: {e}", id.0, id.1)))?;

        let filters = filter_chain(&self.document, &stream.dict);

        let (data, extension) = match filters.split_last() {
            None => (stream.content.clone(), "raw"),
            Some((last, transport)) => match native_extension(last) {
                Some(ext) if transport.is_empty() => (stream.content.clone(), ext),
                Some(ext) => {
                    // Undo only the filters in front of the codec.
                    let mut outer = stream.clone();
                    let kept: Vec<Object> = transport
                        .iter()
                        .map(|f| Object::Name(f.to_vec()))
                        .collect();
                    outer.dict.set("Filter", Object::Array(kept));
                    outer.dict.remove(b"DecodeParms");
                    let data = outer
                        .decompressed_content()
                        .map_err(|e| failure(e.to_string()))?;
                    (data, ext)
                }
                None => {
                    let data = stream
                        .decompressed_content()
                        .map_err(|e| failure(e.to_string()))?;
                    (data, "raw")
                }
            },
        };

        Ok(PageImage {
            page_index,
            ordinal,
            object_id: id,
            data,
            extension,
        })
    }
}
