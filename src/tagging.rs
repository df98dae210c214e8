//! Tagged documents: the parallel token/tag representation every stage reads.

use serde::Serialize;

use crate::error::Result;
use crate::language::{LanguageProfile, profile_for};

/// Three parallel sequences describing one tokenized document.
///
/// Index `i` of `combined`, `tokens` and `tags` always refers to the same unit;
/// the fields are private so the lengths cannot drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaggedDocument {
    combined: Vec<String>,
    tokens: Vec<String>,
    tags: Vec<String>,
}

impl TaggedDocument {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut doc = TaggedDocument::default();
        for (token, tag) in pairs {
            doc.combined.push(format!("{token}/{tag}"));
            doc.tokens.push(token);
            doc.tags.push(tag);
        }
        doc
    }

    /// `token/tag` strings.
    pub fn combined(&self) -> &[String] {
        &self.combined
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `(token, tag)` pairs in document order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens
            .iter()
            .zip(&self.tags)
            .map(|(w, t)| (w.as_str(), t.as_str()))
    }
}

/// Tokenize and tag `text` with the given profile.
pub fn tag(text: &str, profile: &dyn LanguageProfile) -> TaggedDocument {
    TaggedDocument::from_pairs(profile.tag_pairs(text))
}

/// Tokenize and tag `text` in language `code` (`zh` or `en`).
pub fn tag_with_code(text: &str, code: &str) -> Result<TaggedDocument> {
    Ok(tag(text, profile_for(code)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn from_pairs_builds_parallel_sequences() {
        let doc = TaggedDocument::from_pairs(vec![
            ("dogs".to_string(), "NNS".to_string()),
            ("bark".to_string(), "VBP".to_string()),
        ]);
        assert_eq!(doc.combined(), ["dogs/NNS", "bark/VBP"]);
        assert_eq!(doc.tokens(), ["dogs", "bark"]);
        assert_eq!(doc.tags(), ["NNS", "VBP"]);
        assert_eq!(doc.pairs().nth(1), Some(("bark", "VBP")));
    }

    #[test]
    fn tagged_sequences_stay_parallel() {
        for (text, code) in [
            ("The cat sat. It purred, loudly!", "en"),
            ("小猫坐着。它大声地叫了！", "zh"),
            ("", "en"),
        ] {
            let doc = tag_with_code(text, code).unwrap();
            assert_eq!(doc.combined().len(), doc.tokens().len());
            assert_eq!(doc.tokens().len(), doc.tags().len());
        }
    }

    #[test]
    fn tagging_rejects_unknown_language() {
        assert!(matches!(
            tag_with_code("bonjour", "fr"),
            Err(Error::UnsupportedLanguage(_))
        ));
    }
}
