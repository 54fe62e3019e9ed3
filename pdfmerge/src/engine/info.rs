//! Document Info dictionary.

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, StringFormat};
use std::time::SystemTime;

use crate::config::Metadata;
use crate::error::EngineError;

const PRODUCER: &str = concat!("pdfmerge ", env!("CARGO_PKG_VERSION"));

/// Write `metadata` plus producer and dates into the document's Info dictionary.
pub(crate) fn write_info(
    doc: &mut Document,
    metadata: &Metadata,
    now: SystemTime,
) -> Result<(), EngineError> {
    let info_id = match doc.trailer.get(b"Info").and_then(Object::as_reference) {
        Ok(id) => id,
        Err(_) => {
            let id = doc.add_object(Dictionary::new());
            doc.trailer.set("Info", Object::Reference(id));
            id
        }
    };

    let date = format_pdf_date(now);
    let info = doc.get_dictionary_mut(info_id)?;

    for (key, value) in metadata.entries() {
        info.set(key, literal(value));
    }
    info.set("Producer", literal(PRODUCER));
    info.set("Creator", literal(PRODUCER));
    info.set("CreationDate", literal(&date));
    info.set("ModDate", literal(&date));

    Ok(())
}

fn literal(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}

/// Format a timestamp as a PDF date string in UTC (`D:YYYYMMDDHHmmSSZ`).
pub fn format_pdf_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("D:%Y%m%d%H%M%SZ")
        .to_string()
}
