use std::collections::HashMap;

use crate::error::ProviderError;
use crate::util::{short_label, word_tokens};

use super::Labeler;

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does", "for",
    "from", "had", "has", "have", "he", "her", "here", "him", "his", "how", "i", "if", "in",
    "into", "is", "it", "it's", "its", "just", "like", "me", "more", "most", "my", "no", "not",
    "of", "on", "one", "only", "or", "other", "our", "out", "over", "she", "so", "some", "such",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "up", "us", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "why", "will", "with", "would", "you", "your",
];
const MIN_KEYWORD_CHARS: usize = 3;

/// Uses the (shortened) input text itself as the label.
#[derive(Clone, Debug)]
pub struct TextLabeler {
    max_chars: usize,
}

impl TextLabeler {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Labeler for TextLabeler {
    fn summarize(&self, text: &str) -> Result<String, ProviderError> {
        let label = short_label(text, self.max_chars);
        if label.is_empty() {
            return Err(ProviderError::LabelUnavailable("text is blank".to_owned()));
        }
        Ok(label)
    }
}

/// Labels a passage with its most frequent content words, ties broken by first
/// appearance. Falls back to the shortened text when no keyword survives the
/// stopword filter.
#[derive(Clone, Debug)]
pub struct KeywordLabeler {
    max_keywords: usize,
    max_chars: usize,
}

impl KeywordLabeler {
    pub fn new(max_keywords: usize, max_chars: usize) -> Self {
        Self {
            max_keywords: max_keywords.max(1),
            max_chars,
        }
    }

    pub fn keywords(&self, text: &str) -> Vec<String> {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for (position, token) in word_tokens(text).enumerate() {
            if token.chars().count() < MIN_KEYWORD_CHARS || STOPWORDS.contains(&token.as_str()) {
                continue;
            }
            let entry = counts.entry(token).or_insert((0, position));
            entry.0 += 1;
        }

        let mut ranked = counts.into_iter().collect::<Vec<_>>();
        ranked.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_b.cmp(count_a).then_with(|| first_a.cmp(first_b))
        });
        ranked
            .into_iter()
            .take(self.max_keywords)
            .map(|(token, _)| token)
            .collect()
    }
}

impl Labeler for KeywordLabeler {
    fn summarize(&self, text: &str) -> Result<String, ProviderError> {
        let keywords = self.keywords(text);
        let label = if keywords.is_empty() {
            short_label(text, self.max_chars)
        } else {
            short_label(&keywords.join(" "), self.max_chars)
        };

        if label.is_empty() {
            return Err(ProviderError::LabelUnavailable("text is blank".to_owned()));
        }
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_skip_stopwords_and_rank_by_frequency() {
        let labeler = KeywordLabeler::new(3, 64);
        let keywords =
            labeler.keywords("The cache stores pages. A cache miss loads pages from the disk cache.");
        assert_eq!(keywords, vec!["cache", "pages", "stores"]);
    }

    #[test]
    fn summary_joins_keywords() {
        let labeler = KeywordLabeler::new(2, 64);
        assert_eq!(
            labeler.summarize("Tokio schedules async tasks; tokio tasks are cheap").unwrap(),
            "tokio tasks"
        );
    }

    #[test]
    fn falls_back_to_text_when_only_stopwords() {
        let labeler = KeywordLabeler::new(3, 64);
        assert_eq!(labeler.summarize("it is what it is").unwrap(), "it is what it is");
    }

    #[test]
    fn text_labeler_truncates() {
        let labeler = TextLabeler::new(8);
        assert_eq!(labeler.summarize("embedding vectors").unwrap(), "embeddi…");
        assert!(matches!(
            labeler.summarize("   "),
            Err(ProviderError::LabelUnavailable(_))
        ));
    }
}
