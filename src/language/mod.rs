//! Language profiles.
//!
//! Everything that differs between Chinese and English lives behind
//! [`LanguageProfile`]: the external tagger, keyword splitting, sentence
//! segmentation, tag-class tables and punctuation rules. The statistics and
//! concordance code only ever talks to a `&dyn LanguageProfile`, so supporting
//! another language means writing one more implementation.

mod chinese;
mod english;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lexical::StatsRevision;
use crate::tagging::TaggedDocument;

pub use chinese::{CHINESE_TAGS, ChineseProfile};
pub use english::{ENGLISH_TAGS, EnglishProfile, tokenize_english};

/// Supported corpus languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Parse a language code. Only `zh` and `en` are accepted.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "zh" => Ok(Language::Chinese),
            "en" => Ok(Language::English),
            other => Err(Error::UnsupportedLanguage(other.to_string())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
        }
    }

    /// Guess the language of `text` with `whatlang`.
    pub fn detect(text: &str) -> Result<Self> {
        match whatlang::detect_lang(text) {
            Some(whatlang::Lang::Cmn) => Ok(Language::Chinese),
            Some(whatlang::Lang::Eng) => Ok(Language::English),
            _ => Err(Error::UndetectedLanguage),
        }
    }

    /// The process-wide profile for this language.
    pub fn profile(self) -> &'static dyn LanguageProfile {
        match self {
            Language::Chinese => &*chinese::PROFILE,
            Language::English => &*english::PROFILE,
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_code(s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Resolve a language code straight to its profile.
pub fn profile_for(code: &str) -> Result<&'static dyn LanguageProfile> {
    Language::from_code(code).map(Language::profile)
}

/// Semantic word classes reported by the lexical table.
///
/// Classes overlap by construction (content subsumes noun, verb, ...), so
/// their proportions do not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordClass {
    Content,
    Function,
    Noun,
    Pronoun,
    Verb,
    Adjective,
    Adverb,
    Conjunction,
    Auxiliary,
}

impl WordClass {
    /// Column order of the lexical table.
    pub const ALL: [WordClass; 9] = [
        WordClass::Content,
        WordClass::Function,
        WordClass::Noun,
        WordClass::Pronoun,
        WordClass::Verb,
        WordClass::Adjective,
        WordClass::Adverb,
        WordClass::Conjunction,
        WordClass::Auxiliary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WordClass::Content => "content",
            WordClass::Function => "function",
            WordClass::Noun => "noun",
            WordClass::Pronoun => "pronoun",
            WordClass::Verb => "verb",
            WordClass::Adjective => "adjective",
            WordClass::Adverb => "adverb",
            WordClass::Conjunction => "conjunction",
            WordClass::Auxiliary => "auxiliary",
        }
    }
}

/// Raw POS labels belonging to each [`WordClass`] for one tag set.
#[derive(Debug)]
pub struct TagClassTable {
    pub noun: &'static [&'static str],
    pub pronoun: &'static [&'static str],
    pub verb: &'static [&'static str],
    pub adjective: &'static [&'static str],
    pub adverb: &'static [&'static str],
    pub conjunction: &'static [&'static str],
    pub auxiliary: &'static [&'static str],
    pub content: &'static [&'static str],
    pub function: &'static [&'static str],
}

impl TagClassTable {
    pub fn tags(&self, class: WordClass) -> &'static [&'static str] {
        match class {
            WordClass::Noun => self.noun,
            WordClass::Pronoun => self.pronoun,
            WordClass::Verb => self.verb,
            WordClass::Adjective => self.adjective,
            WordClass::Adverb => self.adverb,
            WordClass::Conjunction => self.conjunction,
            WordClass::Auxiliary => self.auxiliary,
            WordClass::Content => self.content,
            WordClass::Function => self.function,
        }
    }

    pub fn contains(&self, class: WordClass, tag: &str) -> bool {
        self.tags(class).contains(&tag)
    }

    /// Whether `tag` marks a content or function word.
    pub fn is_word_tag(&self, tag: &str) -> bool {
        self.content.contains(&tag) || self.function.contains(&tag)
    }
}

/// The literal tokens tallied as sentence and clause punctuation.
#[derive(Debug)]
pub struct SentenceMarks {
    pub period: &'static str,
    pub question: &'static str,
    pub exclamation: &'static str,
    pub comma: &'static str,
    pub semicolon: &'static str,
}

/// Per-language behavior used by every analysis stage.
pub trait LanguageProfile: Send + Sync {
    /// Language code, e.g. `"zh"`.
    fn code(&self) -> &str;

    /// Run the external tokenizer/POS-tagger: `(token, tag)` pairs in text order.
    fn tag_pairs(&self, text: &str) -> Vec<(String, String)>;

    /// Split a search keyword into the tokens the tagger would produce.
    fn split_keyword(&self, keyword: &str) -> Vec<String>;

    /// Split text into sentences without altering their characters.
    fn segment(&self, text: &str) -> Vec<String>;

    fn tag_classes(&self) -> &TagClassTable;

    fn sentence_marks(&self) -> &SentenceMarks;

    /// Whether a token is excluded from the mean word length.
    fn is_symbol(&self, token: &str, tag: &str, revision: StatsRevision) -> bool;

    /// Aggregate punctuation count of a tagged document.
    fn punctuation_total(&self, doc: &TaggedDocument, revision: StatsRevision) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip() {
        assert_eq!(Language::from_code("zh").unwrap(), Language::Chinese);
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!(Language::Chinese.to_string(), "zh");
        assert_eq!(Language::English.profile().code(), "en");
    }

    #[test]
    fn unknown_language_is_rejected() {
        let err = Language::from_code("fr").unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(ref c) if c == "fr"));
        assert!(profile_for("ZH").is_err());
    }

    #[test]
    fn detects_english_and_chinese() {
        let en = "The quick brown fox jumps over the lazy dog while the farmer watches from the porch.";
        assert_eq!(Language::detect(en).unwrap(), Language::English);
        let zh = "我们今天在北京的公园里散步，天气非常好，大家都很开心。";
        assert_eq!(Language::detect(zh).unwrap(), Language::Chinese);
    }

    #[test]
    fn content_subsumes_main_classes() {
        for table in [&CHINESE_TAGS, &ENGLISH_TAGS] {
            for class in [
                WordClass::Noun,
                WordClass::Verb,
                WordClass::Adjective,
                WordClass::Adverb,
            ] {
                for tag in table.tags(class) {
                    assert!(table.contains(WordClass::Content, tag), "{tag} not content");
                }
            }
        }
    }

    #[test]
    fn tag_lists_have_no_duplicates() {
        for table in [&CHINESE_TAGS, &ENGLISH_TAGS] {
            for class in WordClass::ALL {
                let tags = table.tags(class);
                let unique: std::collections::HashSet<_> = tags.iter().collect();
                assert_eq!(unique.len(), tags.len(), "{:?}", class);
            }
        }
    }
}
