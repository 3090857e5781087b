use tracing::debug;

/// Sniff the image MIME type from magic bytes, keeping `declared` when unknown.
pub fn detect_image_mime(bytes: &[u8], declared: &str) -> String {
    let detected = detect_from_bytes(bytes).unwrap_or(declared);
    if detected != declared {
        debug!(declared = declared, detected = detected, "Overriding image MIME type");
    }
    detected.to_string()
}

/// MIME type declared by a data-URI header (`data:image/jpeg;base64,...`).
pub fn data_uri_mime(data_uri: &str) -> Option<&str> {
    let header = data_uri.strip_prefix("data:")?.split(',').next()?;
    let mime = header.split(';').next()?;
    (!mime.is_empty()).then_some(mime)
}

/// Magic-byte prefixes of the formats the providers accept.
const SIGNATURES: [(&[u8], &str); 3] = [
    (b"\x89PNG", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"GIF8", "image/gif"),
];

fn detect_from_bytes(bytes: &[u8]) -> Option<&'static str> {
    if let Some((_, mime)) = SIGNATURES.iter().find(|(magic, _)| bytes.starts_with(magic)) {
        return Some(*mime);
    }
    let is_webp = bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP";
    is_webp.then_some("image/webp")
}
