//! Query parsing and source URL validation for `/stream`
//!
//! A request is only accepted when `url` is an absolute `http` or `https`
//! URL. Everything else is rejected before any process is spawned.

use url::Url;

use super::error::StreamError;

/// A validated streaming request
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    /// Source page or media URL handed to the extraction tool
    pub source_url: Url,
    /// Requested audio format, passed through to the tool unchanged
    pub format: String,
}

impl StreamRequest {
    /// Parse a raw query string (`url=...&format=...`)
    ///
    /// The first occurrence of each key wins. An empty `format` falls back to
    /// `default_format`.
    ///
    /// # Examples
    /// ```
    /// # use wave_radio::proxy::StreamRequest;
    /// let request = StreamRequest::from_query(
    ///     Some("url=https%3A%2F%2Fexample.com%2Fa&format=opus"),
    ///     "mp3",
    /// ).unwrap();
    /// assert_eq!(request.source_url.as_str(), "https://example.com/a");
    /// assert_eq!(request.format, "opus");
    /// ```
    pub fn from_query(query: Option<&str>, default_format: &str) -> Result<Self, StreamError> {
        let mut url = None;
        let mut format = None;

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "url" if url.is_none() => url = Some(value.into_owned()),
                "format" if format.is_none() => format = Some(value.into_owned()),
                _ => {}
            }
        }

        Self::new(url.as_deref(), format.as_deref(), default_format)
    }

    /// Validate already-decoded parameters
    pub fn new(
        url: Option<&str>,
        format: Option<&str>,
        default_format: &str,
    ) -> Result<Self, StreamError> {
        let raw = url.filter(|u| !u.is_empty()).ok_or(StreamError::MissingUrl)?;

        let source_url = Url::parse(raw).map_err(|e| StreamError::InvalidUrl(e.to_string()))?;

        match source_url.scheme() {
            "http" | "https" => {}
            other => return Err(StreamError::InvalidProtocol(other.to_string())),
        }

        let format = format
            .filter(|f| !f.is_empty())
            .unwrap_or(default_format)
            .to_string();

        Ok(Self { source_url, format })
    }
}
