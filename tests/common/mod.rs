#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// A minimal JPEG-looking byte string; only the raw bytes matter here.
pub fn fake_jpeg(seed: u8) -> Vec<u8> {
    vec![
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, seed, 0xFF, 0xD9,
    ]
}

/// Builds small PDFs with text pages and image XObjects.
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    inherited_xobjects: Option<Dictionary>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        Self {
            doc,
            pages_id,
            font_id,
            page_ids: Vec::new(),
            inherited_xobjects: None,
        }
    }

    /// Add a DCT-encoded image XObject holding `bytes` verbatim.
    pub fn jpeg(&mut self, bytes: Vec<u8>) -> ObjectId {
        self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            bytes,
        ))
    }

    /// Add an unfiltered 1x1 RGB image XObject.
    pub fn raw_image(&mut self, samples: Vec<u8>) -> ObjectId {
        self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            samples,
        ))
    }

    /// Add a Form XObject that paints the given XObjects.
    pub fn form(&mut self, xobjects: &[(&str, ObjectId)]) -> ObjectId {
        let content = Content {
            operations: paint_ops(xobjects),
        };
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
                "Resources" => dictionary! {
                    "XObject" => xobject_dict(xobjects),
                },
            },
            content.encode().expect("form content should encode"),
        );
        self.doc.add_object(stream)
    }

    /// Add a page showing `text` and painting `xobjects` from its own
    /// resources.
    pub fn page(&mut self, text: &str, xobjects: &[(&str, ObjectId)]) -> &mut Self {
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => self.font_id },
            "XObject" => xobject_dict(xobjects),
        };
        self.push_page(text, xobjects, Some(resources));
        self
    }

    /// Add a page with no `/Resources`; it inherits from the page tree.
    pub fn inheriting_page(&mut self, text: &str, xobjects: &[(&str, ObjectId)]) -> &mut Self {
        self.push_page(text, xobjects, None);
        self
    }

    /// Resources placed on the `/Pages` node for inheriting pages.
    pub fn inherited_xobjects(&mut self, xobjects: &[(&str, ObjectId)]) -> &mut Self {
        self.inherited_xobjects = Some(xobject_dict(xobjects));
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        let mut inherited = dictionary! {
            "Font" => dictionary! { "F1" => self.font_id },
        };
        if let Some(xobjects) = self.inherited_xobjects.take() {
            inherited.set("XObject", xobjects);
        }

        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.page_ids.iter().map(|id| (*id).into()).collect::<Vec<Object>>(),
                "Count" => self.page_ids.len() as i64,
                "Resources" => inherited,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes).expect("PDF should serialise");
        bytes
    }

    pub fn write_to(self, path: &Path) {
        std::fs::write(path, self.build()).expect("PDF fixture should be written");
    }

    fn push_page(&mut self, text: &str, xobjects: &[(&str, ObjectId)], resources: Option<Dictionary>) {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 780.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ];
        operations.extend(paint_ops(xobjects));

        let content = Content { operations };
        let content_id = self.doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("page content should encode"),
        ));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
        };
        if let Some(resources) = resources {
            page.set("Resources", resources);
        }

        let page_id = self.doc.add_object(page);
        self.page_ids.push(page_id);
    }
}

fn xobject_dict(xobjects: &[(&str, ObjectId)]) -> Dictionary {
    let mut dict = Dictionary::new();
    for (name, id) in xobjects {
        dict.set(*name, *id);
    }
    dict
}

fn paint_ops(xobjects: &[(&str, ObjectId)]) -> Vec<Operation> {
    let mut operations = Vec::new();
    for (name, _) in xobjects {
        operations.push(Operation::new("q", vec![]));
        operations.push(Operation::new(
            "cm",
            vec![50.into(), 0.into(), 0.into(), 50.into(), 50.into(), 600.into()],
        ));
        operations.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
        operations.push(Operation::new("Q", vec![]));
    }
    operations
}

/// Write a PDF with one page per entry; each page shows its text and paints
/// the requested number of distinct JPEG images. Returns every image's bytes
/// keyed by `(page_index, ordinal)`.
pub fn write_pdf(path: &Path, pages: &[(&str, usize)]) -> Vec<((usize, usize), Vec<u8>)> {
    let mut builder = PdfBuilder::new();
    let mut images = Vec::new();

    for (page_index, (text, image_count)) in pages.iter().enumerate() {
        let names: Vec<String> = (1..=*image_count).map(|n| format!("Im{n}")).collect();
        let mut xobjects = Vec::new();
        for (n, name) in names.iter().enumerate() {
            let bytes = fake_jpeg((page_index * 16 + n) as u8);
            let id = builder.jpeg(bytes.clone());
            images.push(((page_index, n + 1), bytes));
            xobjects.push((name.as_str(), id));
        }
        builder.page(text, &xobjects);
    }

    builder.write_to(path);
    images
}
