//! In-memory PDF fixtures for unit tests.

use lopdf::{Document, Object, Stream, dictionary};

/// Build a PDF whose pages are tagged `tag * 100 + page_number`.
///
/// The tag is stored as the page's MediaBox width so page order can be
/// checked after a merge. Resources live on the Pages node and are inherited.
pub(crate) fn build_pdf(tag: u32, pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Font".to_vec()),
        "Subtype" => Object::Name(b"Type1".to_vec()),
        "BaseFont" => Object::Name(b"Helvetica".to_vec()),
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
    });

    let mut kids = Vec::new();
    for page in 1..=pages {
        let label = tag * 100 + page;
        let content = format!("BT /F1 12 Tf 72 720 Td (page {label}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let page_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Page".to_vec()),
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), Object::Integer(label as i64), 842.into()]),
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => Object::Array(kids),
            "Count" => Object::Integer(pages as i64),
            "Resources" => Object::Reference(resources_id),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("fixture serializes");
    buffer
}

/// Page tags of a serialized PDF, in page order.
pub(crate) fn page_tags(bytes: &[u8]) -> Vec<u32> {
    let doc = Document::load_mem(bytes).expect("merged output parses");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("page has a MediaBox");
            match &media_box[2] {
                Object::Integer(width) => *width as u32,
                Object::Real(width) => *width as u32,
                other => panic!("unexpected MediaBox width: {other:?}"),
            }
        })
        .collect()
}
