// https://rhymebrain.com/api.html - getRhymes, getWordInfo, getPortmanteaus

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{Portmanteau, ProtocolError, RhymeError, RhymeRecord, WordInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Function {
    GetRhymes,
    GetWordInfo,
    GetPortmanteaus,
}

impl Function {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Function::GetRhymes => "getRhymes",
            Function::GetWordInfo => "getWordInfo",
            Function::GetPortmanteaus => "getPortmanteaus",
        }
    }
}

/// A validated call against the `talk` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiRequest {
    pub(crate) function: Function,
    pub(crate) word: String,
    pub(crate) lang: String,
    pub(crate) max_results: Option<usize>,
}

impl ApiRequest {
    pub(crate) fn new(
        function: Function,
        word: &str,
        lang: &str,
        max_results: Option<usize>,
    ) -> Result<Self, RhymeError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(RhymeError::InvalidArgument("word must not be empty".to_owned()));
        }
        if max_results == Some(0) {
            return Err(RhymeError::InvalidArgument(
                "maxResults must be a positive number".to_owned(),
            ));
        }
        Ok(Self {
            function,
            word: word.to_owned(),
            lang: language_code(lang)?,
            max_results,
        })
    }

    /// Query string pairs; `maxResults` is only sent when the caller capped the results.
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("function", self.function.name().to_owned()),
            ("word", self.word.clone()),
            ("lang", self.lang.clone()),
        ];
        if let Some(max_results) = self.max_results {
            params.push(("maxResults", max_results.to_string()));
        }
        params
    }
}

/// Normalizes an ISO 639-1 code such as `en` or `DE` to lowercase.
///
/// Fails with [`RhymeError::InvalidArgument`] unless the code is two ASCII letters.
pub fn language_code(code: &str) -> Result<String, RhymeError> {
    let code = code.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_lowercase())
    } else {
        Err(RhymeError::InvalidArgument(format!("{code:?} is not an ISO 639-1 language code")))
    }
}

pub(crate) fn parse_rhymes(body: &[u8]) -> Result<Vec<RhymeRecord>, ProtocolError> {
    parse_records(parse_body(body)?, "rhyme object")
}

pub(crate) fn parse_portmanteaus(body: &[u8]) -> Result<Vec<Portmanteau>, ProtocolError> {
    parse_records(parse_body(body)?, "portmanteau object")
}

pub(crate) fn parse_word_info(body: &[u8]) -> Result<WordInfo, ProtocolError> {
    match parse_body(body)? {
        value @ Value::Object(_) => {
            serde_json::from_value(value).map_err(|source| ProtocolError::InvalidRecord {
                index: 0,
                source,
            })
        }
        other => Err(ProtocolError::UnexpectedShape {
            expected: "word info object",
            found: kind(&other),
        }),
    }
}

fn parse_body(body: &[u8]) -> Result<Value, ProtocolError> {
    let value: Value = serde_json::from_slice(body).map_err(ProtocolError::Json)?;
    if let Value::Object(object) = &value {
        check_service_status(object)?;
    }
    Ok(value)
}

/// Every element is converted before anything is handed out, so a bad record
/// fails the whole call instead of truncating the results.
fn parse_records<T: DeserializeOwned>(
    value: Value,
    expected: &'static str,
) -> Result<Vec<T>, ProtocolError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ProtocolError::UnexpectedShape {
                expected: "array",
                found: kind(&other),
            })
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(ProtocolError::UnexpectedShape {
                    expected,
                    found: kind(&item),
                });
            }
            serde_json::from_value(item)
                .map_err(|source| ProtocolError::InvalidRecord { index, source })
        })
        .collect()
}

fn check_service_status(object: &Map<String, Value>) -> Result<(), ProtocolError> {
    let failed_status = object
        .get("status")
        .is_some_and(|status| status_code(status) != Some(200));
    let has_error = object.get("error").is_some_and(|error| match error {
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        _ => false,
    });
    if !failed_status && !has_error {
        return Ok(());
    }
    let message = ["error_message", "error", "message"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| match value {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        });
    Err(ProtocolError::Service { message })
}

fn status_code(status: &Value) -> Option<u64> {
    match status {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_max_results_unless_given() {
        let request = ApiRequest::new(Function::GetRhymes, " cat ", "EN", None).unwrap();
        assert_eq!(
            request.params(),
            vec![
                ("function", "getRhymes".to_owned()),
                ("word", "cat".to_owned()),
                ("lang", "en".to_owned()),
            ]
        );

        let capped = ApiRequest::new(Function::GetPortmanteaus, "cat", "en", Some(3)).unwrap();
        assert_eq!(capped.params().last(), Some(&("maxResults", "3".to_owned())));
        assert_eq!(capped.params()[0].1, "getPortmanteaus");
    }

    #[test]
    fn rejects_bad_arguments() {
        let cases = [
            ("", "en", None),
            ("   ", "en", None),
            ("cat", "eng", None),
            ("cat", "e1", None),
            ("cat", "en", Some(0)),
        ];
        for (word, lang, max) in cases {
            assert!(matches!(
                ApiRequest::new(Function::GetRhymes, word, lang, max),
                Err(RhymeError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn keeps_service_order() {
        let body = concat!(
            r#"[{"word":"hat","score":350,"flags":"b","syllables":1,"freq":20},"#,
            r#"{"word":"bat","score":340,"flags":"bc","syllables":1,"freq":15}]"#,
        )
        .as_bytes();
        let rhymes = parse_rhymes(body).unwrap();
        let words: Vec<_> = rhymes.iter().filter_map(RhymeRecord::word).collect();
        assert_eq!(words, vec!["hat", "bat"]);
        assert_eq!(rhymes[1].score(), Some(340));
        assert_eq!(rhymes[1].flags().unwrap().chars(), &['b', 'c']);
    }

    #[test]
    fn empty_array_is_no_rhymes() {
        assert!(parse_rhymes(b"[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_bodies() {
        assert!(matches!(parse_rhymes(b"<html>"), Err(ProtocolError::Json(_))));
        assert!(matches!(
            parse_rhymes(br#"{"word":"hat"}"#),
            Err(ProtocolError::UnexpectedShape { expected: "array", found: "object" })
        ));
        assert!(matches!(
            parse_rhymes(br#"[{"word":"hat"}, "bat"]"#),
            Err(ProtocolError::UnexpectedShape { found: "string", .. })
        ));
        assert!(matches!(
            parse_rhymes(br#"[{"word":"hat"}, {"word":"bat","score":"high"}]"#),
            Err(ProtocolError::InvalidRecord { index: 1, .. })
        ));
        assert!(matches!(
            parse_word_info(b"[]"),
            Err(ProtocolError::UnexpectedShape { expected: "word info object", found: "array" })
        ));
    }

    #[test]
    fn surfaces_embedded_errors() {
        match parse_rhymes(br#"{"status": 500, "error_message": "dictionary unavailable"}"#) {
            Err(ProtocolError::Service { message }) => {
                assert_eq!(message.as_deref(), Some("dictionary unavailable"))
            }
            other => panic!("unexpected result {other:?}"),
        }
        match parse_word_info(br#"{"error": "Unknown function"}"#) {
            Err(ProtocolError::Service { message }) => {
                assert_eq!(message.as_deref(), Some("Unknown function"))
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(matches!(
            parse_word_info(br#"{"status": "404"}"#),
            Err(ProtocolError::Service { message: None })
        ));
    }

    #[test]
    fn falsy_error_fields_are_not_errors() {
        for body in [
            r#"[{"word":"hat"}]"#,
            r#"{"error": false, "word": "hello"}"#,
            r#"{"error": "", "word": "hello"}"#,
            r#"{"error": null, "word": "hello"}"#,
        ] {
            assert!(parse_body(body.as_bytes()).is_ok(), "{body}");
        }
        assert!(matches!(
            parse_word_info(br#"{"error": true}"#),
            Err(ProtocolError::Service { message: None })
        ));
    }

    #[test]
    fn normalizes_language_codes() {
        assert_eq!(language_code(" FR ").unwrap(), "fr");
        assert!(matches!(language_code("fra"), Err(RhymeError::InvalidArgument(_))));
    }

    #[test]
    fn successful_status_is_not_an_error() {
        let body = br#"{"status": 200, "word": "hello", "pron": "HH AH0 L OW1"}"#;
        let info = parse_word_info(body).unwrap();
        assert_eq!(info.word(), Some("hello"));
    }
}
