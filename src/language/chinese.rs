//! Chinese profile backed by `jieba-rs` (ICTCLAS-style tags).

use jieba_rs::Jieba;
use once_cell::sync::Lazy;

use super::{LanguageProfile, SentenceMarks, TagClassTable};
use crate::lexical::StatsRevision;
use crate::segment::split_chinese_sentences;
use crate::tagging::TaggedDocument;

static JIEBA: Lazy<Jieba> = Lazy::new(Jieba::new);

pub(super) static PROFILE: Lazy<ChineseProfile> = Lazy::new(|| ChineseProfile);

pub static CHINESE_TAGS: TagClassTable = TagClassTable {
    noun: &["n", "ng", "nr", "ns", "nt", "nz", "nrt"],
    pronoun: &["r"],
    verb: &["v", "vd", "vg", "vn"],
    adjective: &["a", "ad", "ag", "an"],
    adverb: &["d", "df", "dg"],
    conjunction: &["c"],
    auxiliary: &["u", "ud", "ug", "uj", "ul", "uv", "uz"],
    content: &[
        "n", "ng", "nr", "ns", "nt", "nz", "nrt", "v", "vd", "vg", "vn", "a", "ad", "ag", "an",
        "d", "df", "dg", "b", "f", "g", "h", "i", "j", "k", "l", "m", "q", "r", "s", "t", "z",
        "mq", "tg", "zg",
    ],
    function: &[
        "c", "e", "o", "p", "u", "y", "ud", "ug", "uj", "ul", "uv", "uz",
    ],
};

static MARKS: SentenceMarks = SentenceMarks {
    period: "。",
    question: "？",
    exclamation: "！",
    comma: "，",
    semicolon: "；",
};

/// Tokens excluded from the mean word length by the original revision.
const SYMBOL_TOKENS: &[&str] = &[
    "。", "？", "！", "，", "；", "：", "“", "”", "‘", "’", "（", "）", "「", "」", "【", "】",
    "《", "》", "、", "/", "\\", "-", "——", "……",
];

/// Punctuation and symbol tags of the revised revision.
const SYMBOL_TAGS: &[&str] = &["x", "w"];

#[derive(Debug, Default)]
pub struct ChineseProfile;

impl LanguageProfile for ChineseProfile {
    fn code(&self) -> &str {
        "zh"
    }

    fn tag_pairs(&self, text: &str) -> Vec<(String, String)> {
        JIEBA
            .tag(text, true)
            .into_iter()
            .map(|t| (t.word.to_string(), t.tag.to_string()))
            .collect()
    }

    fn split_keyword(&self, keyword: &str) -> Vec<String> {
        JIEBA
            .cut(keyword, true)
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn segment(&self, text: &str) -> Vec<String> {
        split_chinese_sentences(text)
    }

    fn tag_classes(&self) -> &TagClassTable {
        &CHINESE_TAGS
    }

    fn sentence_marks(&self) -> &SentenceMarks {
        &MARKS
    }

    fn is_symbol(&self, token: &str, tag: &str, revision: StatsRevision) -> bool {
        match revision {
            StatsRevision::Original => SYMBOL_TOKENS.contains(&token),
            StatsRevision::Revised => SYMBOL_TAGS.contains(&tag),
        }
    }

    fn punctuation_total(&self, doc: &TaggedDocument, revision: StatsRevision) -> usize {
        match revision {
            // Only the five sentence marks are summed here, not the full symbol list.
            StatsRevision::Original => {
                let marks = [
                    MARKS.period,
                    MARKS.question,
                    MARKS.exclamation,
                    MARKS.comma,
                    MARKS.semicolon,
                ];
                doc.tokens()
                    .iter()
                    .filter(|t| marks.contains(&t.as_str()))
                    .count()
            }
            StatsRevision::Revised => doc
                .tags()
                .iter()
                .filter(|t| SYMBOL_TAGS.contains(&t.as_str()))
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagging::tag;

    #[test]
    fn jieba_tagging_keeps_every_character() {
        let text = "我爱北京天安门。今天天气很好！";
        let doc = tag(text, &ChineseProfile);
        assert_eq!(doc.tokens().concat(), text);
        assert_eq!(doc.tokens().len(), doc.tags().len());
        assert_eq!(doc.combined().len(), doc.tags().len());
    }

    #[test]
    fn punctuation_is_tagged_x() {
        let doc = tag("你好。", &ChineseProfile);
        let last = doc.len() - 1;
        assert_eq!(doc.tokens()[last], "。");
        assert_eq!(doc.tags()[last], "x");
        assert_eq!(doc.combined()[last], "。/x");
    }

    #[test]
    fn keyword_split_rejoins_to_keyword() {
        let parts = ChineseProfile.split_keyword("北京天安门");
        assert_eq!(parts.concat(), "北京天安门");
        assert!(!parts.is_empty());
    }

    #[test]
    fn symbol_exclusion_depends_on_revision() {
        assert!(ChineseProfile.is_symbol("、", "x", StatsRevision::Original));
        assert!(!ChineseProfile.is_symbol("#", "x", StatsRevision::Original));
        assert!(ChineseProfile.is_symbol("#", "x", StatsRevision::Revised));
        assert!(!ChineseProfile.is_symbol("、", "n", StatsRevision::Revised));
    }

    #[test]
    fn punctuation_total_by_revision() {
        let doc = TaggedDocument::from_pairs(vec![
            ("好".to_string(), "a".to_string()),
            ("，".to_string(), "x".to_string()),
            ("“".to_string(), "x".to_string()),
            ("。".to_string(), "x".to_string()),
        ]);
        assert_eq!(ChineseProfile.punctuation_total(&doc, StatsRevision::Original), 2);
        assert_eq!(ChineseProfile.punctuation_total(&doc, StatsRevision::Revised), 3);
    }
}
