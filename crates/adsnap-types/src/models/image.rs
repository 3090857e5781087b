//! Image inputs and their provider-facing forms.

/// Prefix that marks an inline image data-URI.
pub const DATA_IMAGE_PREFIX: &str = "data:image";

/// Any of the forms a client may hand us an image in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    Bytes(Vec<u8>),
    Url(String),
    DataUri(String),
    /// Path relative to the configured asset root
    LocalPath(String),
}

impl ImageReference {
    /// Classify a free-form string reference by its prefix.
    pub fn from_string(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with(DATA_IMAGE_PREFIX) {
            Self::DataUri(value)
        } else if is_http_url(&value) {
            Self::Url(value)
        } else {
            Self::LocalPath(value)
        }
    }

    /// Classify a client-supplied URL field. Only data-URIs and remote URLs
    /// are accepted here; nothing a client sends this way is read from disk.
    pub fn from_remote(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with(DATA_IMAGE_PREFIX) {
            Self::DataUri(value)
        } else {
            Self::Url(value)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Url(_) => "url",
            Self::DataUri(_) => "data_uri",
            Self::LocalPath(_) => "local_path",
        }
    }
}

impl From<Vec<u8>> for ImageReference {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&str> for ImageReference {
    fn from(value: &str) -> Self {
        Self::from_string(value)
    }
}

impl From<String> for ImageReference {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

/// Anything starting with `http` is treated as a URL, scheme separator or not.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http")
}

/// The two canonical forms providers accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    /// Bare base64 payload (no data-URI prefix)
    Inline(String),
    Url(String),
}

impl ResolvedImage {
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Inline(v) | Self::Url(v) => v,
        }
    }

    /// Pick the request field this image belongs in.
    pub fn field<'a>(&self, inline_key: &'a str, url_key: &'a str) -> &'a str {
        if self.is_inline() {
            inline_key
        } else {
            url_key
        }
    }
}
