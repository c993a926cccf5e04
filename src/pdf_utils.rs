//! Shared lopdf navigation helpers used by the image and text passes.

use lopdf::{Dictionary, Document, Object};

/// Resolve an object that may be an inline dictionary or an indirect
/// reference to one.
pub(crate) fn resolve_dict<'a>(document: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => document.get_object(*id).ok()?.as_dict().ok(),
        Object::Stream(stream) => Some(&stream.dict),
        other => other.as_dict().ok(),
    }
}

/// Look up `key` in `dict` and resolve it to a dictionary.
pub(crate) fn dict_entry<'a>(
    document: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    dict.get(key).ok().and_then(|v| resolve_dict(document, v))
}

/// Read a name-valued entry (e.g. `/Subtype /Image`) as raw bytes.
pub(crate) fn name_entry<'a>(dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    dict.get(key).ok().and_then(|v| v.as_name().ok())
}

/// Collect the stream filters in application order.
///
/// `/Filter` is either a single name or an array of names; anything else is
/// treated as "no filter".
pub(crate) fn filter_chain<'a>(document: &'a Document, dict: &'a Dictionary) -> Vec<&'a [u8]> {
    let value = match dict.get(b"Filter") {
        Ok(Object::Reference(id)) => match document.get_object(*id) {
            Ok(v) => v,
            Err(_) => return Vec::new(),
        },
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    match value {
        Object::Name(name) => vec![name.as_slice()],
        Object::Array(items) => items.iter().filter_map(|i| i.as_name().ok()).collect(),
        _ => Vec::new(),
    }
}
