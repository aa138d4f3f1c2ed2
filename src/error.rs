use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The base URL could not be parsed. Nothing was sent.
    Parse(url::ParseError),
    /// The response body was not JSON or did not have the expected shape.
    Decode(serde_json::Error),
    /// Transport failure or non-2xx status, as reported by ureq.
    Http(Box<ureq::Error>),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid base URL: {err}"),
            Self::Decode(err) => write!(f, "unexpected response body: {err}"),
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Io(err) => write!(f, "failed to read response: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Http(err) => Some(err.as_ref()),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err)
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Self::Http(Box::new(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use std::error::Error as _;

    #[test]
    fn parse_errors_keep_their_source() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("invalid base URL"));
    }

    #[test]
    fn decode_errors_mention_the_body() {
        let err: Error = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.to_string().starts_with("unexpected response body"));
    }
}
