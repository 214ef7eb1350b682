use std::fmt;

use serde::{de::Error as _, Deserialize, Deserializer};

/// RhymeRank scores at or above this value are perfect rhymes.
pub const PERFECT_RHYME_SCORE: i64 = 300;

/// Highest value the service currently reports for `freq`.
pub const MAX_FREQUENCY: f64 = 34.0;

/// One rhyme candidate as returned by `getRhymes`.
///
/// Records are only produced by parsing a service response and cannot be
/// changed afterwards. Fields the service left out are `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RhymeRecord {
    #[serde(default)]
    word: Option<String>,
    #[serde(default, deserialize_with = "lenient_integer")]
    score: Option<i64>,
    #[serde(default)]
    flags: Option<Flags>,
    #[serde(default, deserialize_with = "lenient_integer")]
    syllables: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    freq: Option<f64>,
}

impl RhymeRecord {
    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// The RhymeRank score. Words with equal scores are listed with the most
    /// matching sounds first, so re-sorting should be stable.
    pub fn score(&self) -> Option<i64> {
        self.score
    }

    pub fn flags(&self) -> Option<&Flags> {
        self.flags.as_ref()
    }

    pub fn syllables(&self) -> Option<u32> {
        self.syllables
    }

    /// Logarithm of the word's frequency in common texts, at most [`MAX_FREQUENCY`].
    pub fn freq(&self) -> Option<f64> {
        self.freq
    }

    pub fn is_perfect(&self) -> bool {
        self.score.is_some_and(|score| score >= PERFECT_RHYME_SCORE)
    }
}

impl fmt::Display for RhymeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.word().unwrap_or_default())
    }
}

/// The single-letter codes attached to a word, in the order the service sent them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub struct Flags(Vec<char>);

impl Flags {
    pub fn chars(&self) -> &[char] {
        &self.0
    }

    pub fn contains(&self, code: char) -> bool {
        self.0.contains(&code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `a`: the word is offensive.
    pub fn is_offensive(&self) -> bool {
        self.contains('a')
    }

    /// `b`: the word might be found in most dictionaries.
    pub fn in_dictionary(&self) -> bool {
        self.contains('b')
    }

    /// `c`: the pronunciation is known with confidence rather than generated.
    pub fn pronunciation_confident(&self) -> bool {
        self.contains('c')
    }
}

impl From<String> for Flags {
    fn from(codes: String) -> Self {
        Self(codes.chars().collect())
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|code| write!(f, "{code}"))
    }
}

/// Pronunciation and usage details returned by `getWordInfo`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WordInfo {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    pron: Option<String>,
    #[serde(default)]
    ipa: Option<String>,
    #[serde(default)]
    flags: Option<Flags>,
    #[serde(default, deserialize_with = "lenient_integer")]
    syllables: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    freq: Option<f64>,
}

impl WordInfo {
    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// ARPAbet transcription. Check [`Flags::pronunciation_confident`] before
    /// trusting it.
    pub fn pron(&self) -> Option<&str> {
        self.pron.as_deref()
    }

    pub fn ipa(&self) -> Option<&str> {
        self.ipa.as_deref()
    }

    pub fn flags(&self) -> Option<&Flags> {
        self.flags.as_ref()
    }

    pub fn syllables(&self) -> Option<u32> {
        self.syllables
    }

    pub fn freq(&self) -> Option<f64> {
        self.freq
    }
}

/// A blend of two words returned by `getPortmanteaus`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Portmanteau {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    combined: Option<String>,
}

impl Portmanteau {
    /// The two source words, comma separated as sent by the service.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// One or two spellings of the blend, comma separated.
    pub fn combined(&self) -> Option<&str> {
        self.combined.as_deref()
    }

    pub fn source_words(&self) -> Vec<&str> {
        split_list(self.source())
    }

    pub fn spellings(&self) -> Vec<&str> {
        split_list(self.combined())
    }
}

fn split_list(list: Option<&str>) -> Vec<&str> {
    list.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// The service is not consistent about quoting numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn lenient_integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = match Option::<Numeric>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Numeric::Integer(value)) => value,
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        Some(Numeric::Float(value)) if value.is_finite() && value.fract() == 0.0 => {
            if !(i64::MIN as f64..i64::MAX as f64).contains(&value) {
                return Err(D::Error::custom(format!("integer {value} is out of range")));
            }
            value as i64
        }
        Some(Numeric::Float(value)) => {
            return Err(D::Error::custom(format!("expected an integer, found {value}")))
        }
        Some(Numeric::Text(text)) if text.trim().is_empty() => return Ok(None),
        Some(Numeric::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected an integer, found {text:?}")))?,
    };
    T::try_from(value)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("integer {value} is out of range")))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Numeric::Integer(value)) => Ok(Some(value as f64)),
        Some(Numeric::Float(value)) => Ok(Some(value)),
        Some(Numeric::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Numeric::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a number, found {text:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RhymeRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn copies_fields_verbatim() {
        let hat = record(json!({
            "word": "hat", "score": 350, "flags": "b", "syllables": 1, "freq": 20
        }));
        assert_eq!(hat.word(), Some("hat"));
        assert_eq!(hat.score(), Some(350));
        assert_eq!(hat.flags().map(Flags::chars), Some(&['b'][..]));
        assert_eq!(hat.syllables(), Some(1));
        assert_eq!(hat.freq(), Some(20.0));
        assert!(hat.is_perfect());
        assert_eq!(hat.to_string(), "hat");
    }

    #[test]
    fn missing_fields_are_none() {
        let bare = record(json!({"word": "mat"}));
        assert_eq!(bare.score(), None);
        assert_eq!(bare.flags(), None);
        assert_eq!(bare.syllables(), None);
        assert_eq!(bare.freq(), None);
        assert!(!bare.is_perfect());

        let nulls = record(json!({"word": null, "score": null, "freq": null}));
        assert_eq!(nulls.word(), None);
        assert_eq!(nulls.score(), None);
        assert_eq!(nulls.to_string(), "");
    }

    #[test]
    fn accepts_quoted_numbers() {
        let quoted = record(json!({
            "word": "hello", "score": "299", "syllables": "2", "freq": "24"
        }));
        assert_eq!(quoted.score(), Some(299));
        assert_eq!(quoted.syllables(), Some(2));
        assert_eq!(quoted.freq(), Some(24.0));
        assert!(!quoted.is_perfect());
    }

    #[test]
    fn rejects_badly_typed_numbers() {
        assert!(serde_json::from_value::<RhymeRecord>(json!({"score": "lots"})).is_err());
        assert!(serde_json::from_value::<RhymeRecord>(json!({"score": 1.5})).is_err());
        assert!(serde_json::from_value::<RhymeRecord>(json!({"syllables": -1})).is_err());
        assert!(serde_json::from_value::<RhymeRecord>(json!({"freq": [1]})).is_err());
    }

    #[test]
    fn rejects_scores_beyond_i64() {
        for score in [json!(1e30), json!(-1e30), json!(18446744073709551615u64), json!(9.3e18)] {
            let error = serde_json::from_value::<RhymeRecord>(json!({"word": "x", "score": score}))
                .unwrap_err();
            assert!(error.to_string().contains("out of range"), "{error}");
        }
        let big = record(json!({"score": 4e18}));
        assert_eq!(big.score(), Some(4_000_000_000_000_000_000));
    }

    #[test]
    fn flags_keep_order_and_unknown_codes() {
        let flags = Flags::from("cbxa".to_owned());
        assert_eq!(flags.chars(), &['c', 'b', 'x', 'a']);
        assert!(flags.is_offensive());
        assert!(flags.in_dictionary());
        assert!(flags.pronunciation_confident());
        assert_eq!(flags.to_string(), "cbxa");

        let empty = Flags::from(String::new());
        assert!(empty.is_empty());
        assert!(!empty.in_dictionary());
    }

    #[test]
    fn portmanteau_splits_lists() {
        let body = json!({"source": "cat,dog", "combined": "catdog, cadog"});
        let blend: Portmanteau = serde_json::from_value(body).unwrap();
        assert_eq!(blend.source_words(), vec!["cat", "dog"]);
        assert_eq!(blend.spellings(), vec!["catdog", "cadog"]);

        let empty: Portmanteau = serde_json::from_value(json!({})).unwrap();
        assert!(empty.source_words().is_empty());
    }

    #[test]
    fn word_info_reads_pronunciation() {
        let info: WordInfo = serde_json::from_value(json!({
            "word": "hello",
            "pron": "HH AH0 L OW1",
            "ipa": "h\u{259}\u{2c8}lo\u{28a}",
            "freq": 24,
            "flags": "bc",
            "syllables": "2"
        }))
        .unwrap();
        assert_eq!(info.pron(), Some("HH AH0 L OW1"));
        assert_eq!(info.ipa(), Some("hə\u{2c8}loʊ"));
        assert_eq!(info.syllables(), Some(2));
        assert!(info.flags().is_some_and(Flags::pronunciation_confident));
    }
}
