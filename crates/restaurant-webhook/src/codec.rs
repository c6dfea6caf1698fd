//! Content negotiation and body (de)serialization
//!
//! The request `Content-Type` picks the decoder and the `Accept` header picks
//! the encoder. Both come from the same small registry so that every
//! registered kind round-trips through the same serde field conventions.

use crate::error::{DecodeError, EncodeError};
use crate::scheme::Scheme;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Wire formats understood by the webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Json,
    Yaml,
}

impl Codec {
    pub fn media_type(self) -> &'static str {
        match self {
            Codec::Json => "application/json",
            Codec::Yaml => "application/yaml",
        }
    }

    pub fn decode(self, body: &[u8]) -> Result<Value, DecodeError> {
        Ok(match self {
            Codec::Json => serde_json::from_slice(body)?,
            Codec::Yaml => serde_yaml::from_slice(body)?,
        })
    }

    pub fn encode<T: Serialize>(self, object: &T) -> Result<Vec<u8>, EncodeError> {
        Ok(match self {
            Codec::Json => serde_json::to_vec(object)?,
            Codec::Yaml => serde_yaml::to_string(object)?.into_bytes(),
        })
    }
}

/// A `type/subtype` pair, lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    pub type_: String,
    pub subtype: String,
}

impl MediaType {
    /// Parse a media type, ignoring parameters after `;`
    pub fn parse(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        let (type_, subtype) = essence.split_once('/')?;
        let (type_, subtype) = (type_.trim(), subtype.trim());
        if type_.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return None;
        }
        Some(Self {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
        })
    }
}

/// One media range of an `Accept` header with its weight
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptClause {
    pub type_: String,
    pub subtype: String,
    pub q: f32,
}

impl AcceptClause {
    fn specificity(&self) -> u8 {
        match (self.type_.as_str(), self.subtype.as_str()) {
            ("*", _) => 0,
            (_, "*") => 1,
            _ => 2,
        }
    }

    fn matches(&self, media_type: &MediaType) -> bool {
        match (self.type_.as_str(), self.subtype.as_str()) {
            ("*", "*") => true,
            (type_, "*") => type_ == media_type.type_,
            (type_, subtype) => type_ == media_type.type_ && subtype == media_type.subtype,
        }
    }
}

/// Parse an `Accept` header into clauses ordered by preference.
///
/// Clauses are ordered by descending `q`, then by specificity; ties keep
/// header order. Clauses with `q=0` or an unparsable media range are dropped.
pub fn parse_accept(accept: &str) -> Vec<AcceptClause> {
    let mut clauses: Vec<AcceptClause> = accept
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let range = pieces.next()?.trim();
            let (type_, subtype) = match range.split_once('/') {
                Some((type_, subtype)) => (type_.trim(), subtype.trim()),
                None if range == "*" => ("*", "*"),
                None => return None,
            };
            if type_.is_empty() || subtype.is_empty() || (type_ == "*" && subtype != "*") {
                return None;
            }

            let mut q = 1.0_f32;
            for param in pieces {
                if let Some((key, value)) = param.split_once('=') {
                    if key.trim().eq_ignore_ascii_case("q") {
                        q = value.trim().parse().unwrap_or(0.0);
                    }
                }
            }
            if q <= 0.0 {
                return None;
            }

            Some(AcceptClause {
                type_: type_.to_ascii_lowercase(),
                subtype: subtype.to_ascii_lowercase(),
                q,
            })
        })
        .collect();

    clauses.sort_by(|a, b| {
        b.q.partial_cmp(&a.q)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.specificity().cmp(&a.specificity()))
    });
    clauses
}

/// Static registry of supported media types
#[derive(Debug, Clone)]
pub struct SerializerRegistry {
    entries: Vec<(MediaType, Codec)>,
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SerializerRegistry {
    /// JSON and YAML, JSON preferred when a wildcard matches both
    pub fn new() -> Self {
        let entries = [Codec::Json, Codec::Yaml]
            .into_iter()
            .filter_map(|codec| MediaType::parse(codec.media_type()).map(|media| (media, codec)))
            .collect();
        Self { entries }
    }

    /// Decoder for a `Content-Type` header value
    pub fn for_content_type(&self, content_type: &str) -> Option<Codec> {
        let media_type = MediaType::parse(content_type)?;
        self.entries
            .iter()
            .find(|(registered, _)| *registered == media_type)
            .map(|(_, codec)| *codec)
    }

    /// Encoder for an `Accept` header value; an empty header means JSON
    pub fn for_accept(&self, accept: &str) -> Option<Codec> {
        if accept.trim().is_empty() {
            return Some(Codec::Json);
        }

        parse_accept(accept).iter().find_map(|clause| {
            self.entries
                .iter()
                .find(|(media_type, _)| clause.matches(media_type))
                .map(|(_, codec)| *codec)
        })
    }
}

/// Type scheme and serializers, built once at startup and shared read-only
#[derive(Debug, Clone, Default)]
pub struct Codecs {
    pub scheme: Scheme,
    pub serializers: SerializerRegistry,
}

impl Codecs {
    pub fn new() -> Self {
        Self {
            scheme: Scheme::new(),
            serializers: SerializerRegistry::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_type_selection() {
        let registry = SerializerRegistry::new();
        assert_eq!(registry.for_content_type("application/json"), Some(Codec::Json));
        assert_eq!(
            registry.for_content_type("application/json; charset=utf-8"),
            Some(Codec::Json)
        );
        assert_eq!(registry.for_content_type("Application/YAML"), Some(Codec::Yaml));
        assert_eq!(registry.for_content_type("application/xml"), None);
        assert_eq!(registry.for_content_type("application"), None);
        assert_eq!(registry.for_content_type(""), None);
        assert_eq!(registry.for_content_type("application/*"), None);
    }

    #[test]
    fn test_accept_empty_defaults_to_json() {
        let registry = SerializerRegistry::new();
        assert_eq!(registry.for_accept(""), Some(Codec::Json));
        assert_eq!(registry.for_accept("   "), Some(Codec::Json));
    }

    #[test]
    fn test_accept_honours_quality() {
        let registry = SerializerRegistry::new();
        assert_eq!(
            registry.for_accept("application/json;q=0.5, application/yaml"),
            Some(Codec::Yaml)
        );
        assert_eq!(
            registry.for_accept("application/yaml;q=0.2, application/json;q=0.9"),
            Some(Codec::Json)
        );
        assert_eq!(
            registry.for_accept("application/yaml;q=0, */*;q=0.1"),
            Some(Codec::Json)
        );
    }

    #[test]
    fn test_accept_wildcards() {
        let registry = SerializerRegistry::new();
        assert_eq!(registry.for_accept("*/*"), Some(Codec::Json));
        assert_eq!(registry.for_accept("*"), Some(Codec::Json));
        assert_eq!(registry.for_accept("application/*"), Some(Codec::Json));
        assert_eq!(registry.for_accept("text/html, application/*;q=0.8"), Some(Codec::Json));
        assert_eq!(registry.for_accept("text/html"), None);
        assert_eq!(registry.for_accept("text/*"), None);
        assert_eq!(registry.for_accept("garbage"), None);
    }

    #[test]
    fn test_parse_accept_orders_by_preference() {
        let clauses = parse_accept("*/*;q=0.8, application/*;q=0.8, application/yaml;q=0.8, text/plain");
        let ranges: Vec<String> = clauses
            .iter()
            .map(|c| format!("{}/{}", c.type_, c.subtype))
            .collect();
        assert_eq!(
            ranges,
            vec!["text/plain", "application/yaml", "application/*", "*/*"]
        );
    }

    #[test]
    fn test_codec_roundtrip() {
        let value = json!({"apiVersion": "v1", "kind": "List", "items": [1, 2]});
        for codec in [Codec::Json, Codec::Yaml] {
            let bytes = codec.encode(&value).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn test_yaml_decoder_reads_json() {
        let value = Codec::Yaml.decode(br#"{"kind": "Pizza"}"#).unwrap();
        assert_eq!(value, json!({"kind": "Pizza"}));
    }
}
