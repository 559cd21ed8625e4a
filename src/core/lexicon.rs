//! Compiled lexicon: every keyword list becomes one `RegexSet`
//!
//! Matching is substring presence per list entry. An entry counts once no
//! matter how often it occurs, and duplicate entries count separately.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::RegexSet;

use crate::error::LexiconError;
use crate::types::{DataCategory, LexiconConfig, NeedKind};

lazy_static! {
    static ref DEFAULT_LEXICON: Arc<Lexicon> = Arc::new(
        Lexicon::compile(LexiconConfig::default()).unwrap()
    );
}

/// Literal keywords compiled into a single set
#[derive(Debug, Clone)]
pub struct KeywordSet {
    set: RegexSet,
}

impl KeywordSet {
    pub fn new(keywords: &[String]) -> Result<Self, LexiconError> {
        let patterns: Vec<String> = keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| regex::escape(k))
            .collect();
        Ok(Self { set: RegexSet::new(patterns)? })
    }

    /// Number of distinct entries present in `text`
    pub fn hits(&self, text: &str) -> usize {
        self.set.matches(text).iter().count()
    }

    pub fn any(&self, text: &str) -> bool {
        self.set.is_match(text)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.len() == 0
    }
}

/// One need's compiled keywords
#[derive(Debug, Clone)]
pub struct NeedMatcher {
    pub need: NeedKind,
    pub weight: f64,
    pub keywords: KeywordSet,
}

/// One completeness rule; `keywords == None` fires every turn
#[derive(Debug, Clone)]
pub struct TopicMatcher {
    pub category: DataCategory,
    pub increment: f64,
    pub keywords: Option<KeywordSet>,
}

/// Lexicon ready for matching. Immutable once built.
#[derive(Debug)]
pub struct Lexicon {
    config: LexiconConfig,
    needs: Vec<NeedMatcher>,
    positive: KeywordSet,
    negative: KeywordSet,
    topics: Vec<TopicMatcher>,
}

impl Lexicon {
    /// Compile every keyword list of `config`
    pub fn compile(config: LexiconConfig) -> Result<Self, LexiconError> {
        if config.categories.is_empty() {
            return Err(LexiconError::NoCategories);
        }

        let needs = config
            .needs
            .iter()
            .map(|n| {
                Ok(NeedMatcher {
                    need: n.need,
                    weight: n.weight,
                    keywords: KeywordSet::new(&n.keywords)?,
                })
            })
            .collect::<Result<Vec<_>, LexiconError>>()?;

        let topics = config
            .topics
            .iter()
            .map(|t| {
                let keywords = if t.keywords.is_empty() {
                    None
                } else {
                    Some(KeywordSet::new(&t.keywords)?)
                };
                Ok(TopicMatcher {
                    category: t.category,
                    increment: t.increment,
                    keywords,
                })
            })
            .collect::<Result<Vec<_>, LexiconError>>()?;

        Ok(Self {
            positive: KeywordSet::new(&config.positive_words)?,
            negative: KeywordSet::new(&config.negative_words)?,
            needs,
            topics,
            config,
        })
    }

    /// Shared handle to the built-in lexicon
    pub fn builtin() -> Arc<Lexicon> {
        Arc::clone(&DEFAULT_LEXICON)
    }

    pub fn config(&self) -> &LexiconConfig {
        &self.config
    }

    pub fn needs(&self) -> &[NeedMatcher] {
        &self.needs
    }

    pub fn positive(&self) -> &KeywordSet {
        &self.positive
    }

    pub fn negative(&self) -> &KeywordSet {
        &self.negative
    }

    pub fn topics(&self) -> &[TopicMatcher] {
        &self.topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> KeywordSet {
        let owned: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        KeywordSet::new(&owned).unwrap()
    }

    #[test]
    fn test_presence_not_frequency() {
        let kw = set(&["寂しい", "孤独"]);
        assert_eq!(kw.hits("寂しい寂しい寂しい"), 1);
        assert_eq!(kw.hits("寂しくて孤独で寂しい"), 2);
        assert_eq!(kw.hits("元気です"), 0);
    }

    #[test]
    fn test_duplicate_entries_count_separately() {
        let kw = set(&["不安", "不安"]);
        assert_eq!(kw.hits("不安です"), 2);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let kw = set(&["a+b", "(?)"]);
        assert_eq!(kw.hits("aab"), 0);
        assert_eq!(kw.hits("a+b (?)"), 2);
    }

    #[test]
    fn test_empty_entries_ignored() {
        let kw = set(&["", "仕事"]);
        assert_eq!(kw.len(), 1);
        assert!(!kw.any("なんでもない"));
        assert!(set(&[]).is_empty());
    }

    #[test]
    fn test_builtin_unconditional_topic() {
        let lex = Lexicon::builtin();
        let unconditional: Vec<_> = lex
            .topics()
            .iter()
            .filter(|t| t.keywords.is_none())
            .map(|t| t.category)
            .collect();
        assert_eq!(unconditional, vec![DataCategory::PsychologyEmotion]);
    }
}
