//! Request body adapter.
//!
//! Framework agnostic: anything that exposes the body as a
//! `Stream<Item = Result<Bytes, E>>` (hyper, axum, reqwest, actix payloads)
//! can be fed straight into [`parse_body`]. Parser options come from the
//! query string and the `Content-Type` header via [`HttpOptions`].
//!
//! # Example
//!
//! ```ignore
//! use csvrows::http::{parse_body, status_code, ErrorBody, HttpOptions};
//!
//! async fn handler(query: Option<&str>, content_type: Option<&str>, body: Body) -> Response {
//!     let result = async {
//!         let options = HttpOptions::from_request(query, content_type)?;
//!         parse_body(body.into_data_stream(), options).await
//!     };
//!     match result.await {
//!         Ok(parsed) => json(200, &parsed),
//!         Err(e) => json(status_code(&e), &ErrorBody::from(&e)),
//!     }
//! }
//! ```

use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures_core::Stream;
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::{ParserConfig, single_char};
use crate::error::CsvError;
use crate::parser::{CsvParser, ParseResult};

/// Media type that selects a tab delimiter.
pub const TSV_MEDIA_TYPE: &str = "text/tab-separated-values";

/// Parser options taken from an HTTP request.
///
/// Recognised query parameters:
///
/// | key                         | value                          |
/// |-----------------------------|--------------------------------|
/// | `delimiter`, `sep`          | one character (`%09` for tab)  |
/// | `quote`                     | one character                  |
/// | `parse_numbers`, `classify` | `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off` |
///
/// Unknown keys are ignored. An explicit delimiter wins over the one implied
/// by a `text/tab-separated-values` content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpOptions {
    config: ParserConfig,
}

impl HttpOptions {
    /// Wraps an existing configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Builds options from the raw query string (without the leading `?`)
    /// and the `Content-Type` header value.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidConfig`] for malformed values or an invalid
    /// delimiter/quote combination.
    ///
    /// # Example
    ///
    /// ```
    /// use csvrows::http::HttpOptions;
    ///
    /// let options = HttpOptions::from_request(Some("sep=%3B&parse_numbers=false"), None)?;
    /// assert_eq!(options.config().delimiter(), ';');
    /// assert!(!options.config().classify_numbers());
    ///
    /// let tsv = HttpOptions::from_request(None, Some("text/tab-separated-values; charset=utf-8"))?;
    /// assert_eq!(tsv.config().delimiter(), '\t');
    /// # Ok::<(), csvrows::CsvError>(())
    /// ```
    pub fn from_request(query: Option<&str>, content_type: Option<&str>) -> Result<Self, CsvError> {
        let mut config = ParserConfig::default();

        if content_type.is_some_and(is_tsv) {
            config = config.with_delimiter('\t');
        }

        let pairs = query.map(|q| url::form_urlencoded::parse(q.as_bytes()));
        for (key, value) in pairs.into_iter().flatten() {
            match &*key {
                "delimiter" | "sep" => {
                    let c = single_char(&value).ok_or(CsvError::InvalidConfig {
                        message: "delimiter must be exactly one character",
                    })?;
                    config = config.with_delimiter(c);
                }
                "quote" => {
                    let c = single_char(&value).ok_or(CsvError::InvalidConfig {
                        message: "quote must be exactly one character",
                    })?;
                    config = config.with_quote(c);
                }
                "parse_numbers" | "classify" => {
                    let on = parse_flag(&value).ok_or(CsvError::InvalidConfig {
                        message: "parse_numbers must be a boolean",
                    })?;
                    config = config.with_classify_numbers(on);
                }
                _ => trace!(key = %key, "ignoring query parameter"),
            }
        }

        config.validate()?;
        Ok(Self { config })
    }

    /// The resulting parser configuration.
    pub fn config(&self) -> ParserConfig {
        self.config
    }
}

impl From<ParserConfig> for HttpOptions {
    fn from(config: ParserConfig) -> Self {
        Self::new(config)
    }
}

/// Parses a request body delivered as a stream of byte chunks.
///
/// Chunks are fed to the parser as they arrive; a body error aborts the parse
/// with [`CsvError::Io`].
pub async fn parse_body<S, E>(mut body: S, options: HttpOptions) -> Result<ParseResult, CsvError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut parser = CsvParser::new(options.config)?;

    while let Some(chunk) = std::future::poll_fn(|cx| Pin::new(&mut body).poll_next(cx)).await {
        let chunk = chunk.map_err(io::Error::other)?;
        trace!(bytes = chunk.len(), "body chunk");
        parser.feed_chunk(&chunk)?;
    }

    let result = parser.finalize()?;
    debug!(rows = result.count, "parsed request body");
    Ok(result)
}

/// Maps an error to the HTTP status a handler should answer with.
///
/// Bad options are `400`, input the parser rejects is `422`, and I/O or
/// internal failures are `500`.
pub fn status_code(err: &CsvError) -> u16 {
    match err {
        CsvError::InvalidConfig { .. } => 400,
        CsvError::MalformedRow { .. }
        | CsvError::UnclosedQuote
        | CsvError::EmptyInput
        | CsvError::DuplicateHeader { .. } => 422,
        CsvError::AlreadyFinished | CsvError::Io(_) => 500,
    }
}

/// JSON error payload.
///
/// ```
/// use csvrows::CsvError;
/// use csvrows::http::ErrorBody;
///
/// let body = ErrorBody::from(&CsvError::UnclosedQuote);
/// assert_eq!(body.kind, "unclosed_quote");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Human readable message.
    pub error: String,
    /// Stable machine readable error kind.
    pub kind: &'static str,
}

impl From<&CsvError> for ErrorBody {
    fn from(err: &CsvError) -> Self {
        let kind = match err {
            CsvError::MalformedRow { .. } => "malformed_row",
            CsvError::UnclosedQuote => "unclosed_quote",
            CsvError::EmptyInput => "empty_input",
            CsvError::DuplicateHeader { .. } => "duplicate_header",
            CsvError::InvalidConfig { .. } => "invalid_config",
            CsvError::AlreadyFinished => "internal",
            CsvError::Io(_) => "io",
        };
        Self {
            error: err.to_string(),
            kind,
        }
    }
}

fn is_tsv(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(TSV_MEDIA_TYPE))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use futures_util::stream;

    fn body(chunks: &[&'static str]) -> impl Stream<Item = Result<Bytes, io::Error>> + Unpin {
        stream::iter(
            chunks
                .iter()
                .map(|c| Ok(Bytes::from_static(c.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_options_default() {
        let options = HttpOptions::from_request(None, None).unwrap();
        assert_eq!(options.config(), ParserConfig::default());
    }

    #[test]
    fn test_options_from_query() {
        let options =
            HttpOptions::from_request(Some("delimiter=%7C&quote=%27&classify=no&x=1"), None)
                .unwrap();
        let config = options.config();
        assert_eq!(config.delimiter(), '|');
        assert_eq!(config.quote(), '\'');
        assert!(!config.classify_numbers());
    }

    #[test]
    fn test_query_delimiter_wins_over_content_type() {
        let options =
            HttpOptions::from_request(Some("sep=,"), Some("Text/Tab-Separated-Values")).unwrap();
        assert_eq!(options.config().delimiter(), ',');

        let options = HttpOptions::from_request(None, Some("text/csv")).unwrap();
        assert_eq!(options.config().delimiter(), ',');
    }

    #[test]
    fn test_invalid_options() {
        for query in ["sep=ab", "quote=", "parse_numbers=maybe", "sep=%22"] {
            let err = HttpOptions::from_request(Some(query), None).unwrap_err();
            assert!(matches!(err, CsvError::InvalidConfig { .. }), "{query}");
            assert_eq!(status_code(&err), 400);
        }
    }

    #[tokio::test]
    async fn test_parse_body_split_chunks() {
        let chunks = &["na", "me;ag", "e\n\"Doe;", "John\";3", "0\n"];
        let options = HttpOptions::from_request(Some("sep=;"), None).unwrap();
        let result = parse_body(body(chunks), options).await.unwrap();

        assert_eq!(result.headers, ["name", "age"]);
        assert_eq!(result.rows[0].get("name"), Some(&Value::from("Doe;John")));
        assert_eq!(result.rows[0].get("age"), Some(&Value::Number(30.0)));
    }

    #[test]
    fn test_parse_body_error_status() {
        let result = tokio_test::block_on(parse_body(body(&["a,b\n1\n"]), HttpOptions::default()));
        let err = result.unwrap_err();
        assert_eq!(status_code(&err), 422);
        assert_eq!(ErrorBody::from(&err).kind, "malformed_row");
    }

    #[tokio::test]
    async fn test_parse_body_stream_error() {
        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"a\n1\n")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let err = parse_body(chunks, HttpOptions::default()).await.unwrap_err();
        assert!(matches!(err, CsvError::Io(_)));
        assert_eq!(status_code(&err), 500);
    }

    #[test]
    fn test_error_body_json() {
        let err = CsvError::MalformedRow {
            row: 1,
            expected: 2,
            actual: 1,
        };
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json["kind"], "malformed_row");
        assert_eq!(json["error"], "malformed row 1: expected 2 fields, found 1");
    }
}
