//! Images carried as MIME type plus raw bytes, and their data URL form.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// MIME type assumed when a data URL carries none, or one that does not parse.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// An image as a MIME type plus its decoded bytes.
///
/// The wire form is a data URL, `data:<mime>;base64,<payload>`. Decoding and
/// re-encoding preserves both the bytes and the MIME type.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncodedImage {
    mime_type: String,
    data: Bytes,
}

impl EncodedImage {
    /// Creates an image from a MIME type and raw bytes.
    pub fn new(mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let mime_type = mime_type.into();
        let mime_type = if is_valid_mime_type(&mime_type) {
            mime_type
        } else {
            DEFAULT_MIME_TYPE.to_owned()
        };

        Self {
            mime_type,
            data: data.into(),
        }
    }

    /// Creates an image from a MIME type and a bare base64 payload.
    pub fn from_base64(mime_type: impl Into<String>, payload: &str) -> Result<Self> {
        let data = STANDARD.decode(payload.trim()).map_err(|err| {
            Error::invalid_input()
                .with_message("image payload is not valid base64")
                .with_source(err)
        })?;

        if data.is_empty() {
            return Err(Error::invalid_input().with_message("image payload is empty"));
        }

        Ok(Self::new(mime_type, data))
    }

    /// Parses a `data:<mime>;base64,<payload>` string.
    ///
    /// A string without the `data:` scheme is read as a bare base64 payload.
    pub fn from_data_url(input: &str) -> Result<Self> {
        let input = input.trim();

        let Some(rest) = input.strip_prefix(DATA_URL_SCHEME) else {
            return Self::from_base64(DEFAULT_MIME_TYPE, input);
        };

        let Some((header, payload)) = rest.split_once(',') else {
            return Err(Error::invalid_input().with_message("data URL has no payload separator"));
        };

        let mime_type = header
            .strip_suffix(BASE64_MARKER)
            .unwrap_or(header)
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();

        Self::from_base64(mime_type, payload)
    }

    /// Returns the MIME type.
    #[inline]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the decoded bytes.
    #[inline]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Returns the size of the decoded payload in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the payload as bare base64, without the data URL prefix.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Returns the data URL form of this image.
    pub fn to_data_url(&self) -> String {
        format!(
            "{DATA_URL_SCHEME}{}{BASE64_MARKER},{}",
            self.mime_type,
            self.to_base64()
        )
    }
}

fn is_valid_mime_type(mime_type: &str) -> bool {
    let Some((kind, subtype)) = mime_type.split_once('/') else {
        return false;
    };

    let valid_token = |token: &str| {
        !token.is_empty()
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$&^_.+-".contains(c))
    };

    valid_token(kind) && valid_token(subtype)
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl FromStr for EncodedImage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_data_url(s)
    }
}

impl Serialize for EncodedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for EncodedImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_data_url(&value).map_err(serde::de::Error::custom)
    }
}
