//! Sentence, word and syllable statistics over rendered body text.
//!
//! Everything here is a pure `&str -> number` function. Degenerate input
//! (empty text, no sentences, no words) yields 0 rather than NaN.

use crate::config::{SuffixEffect, TextHeuristics};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Collapse runs of whitespace to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sentences and words that survive segmentation filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    pub sentences: Vec<String>,
    pub words: Vec<String>,
}

impl Segments {
    /// Words per sentence, or 0 when either side is empty.
    pub fn avg_words_per_sentence(&self) -> f64 {
        if self.sentences.is_empty() || self.words.is_empty() {
            return 0.0;
        }
        self.words.len() as f64 / self.sentences.len() as f64
    }
}

fn is_sentence(fragment: &str) -> bool {
    let trimmed = fragment.trim();
    trimmed.chars().count() >= 3 && trimmed.chars().any(|c| c.is_ascii_alphabetic())
}

fn is_word(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Split text into sentences and words.
///
/// Sentences end at one or more of `.`, `!`, `?` followed by whitespace or
/// the end of the text; fragments shorter than 3 characters or without a
/// letter are dropped. Words are whitespace tokens with at least one
/// alphanumeric character.
pub fn segment(text: &str) -> Segments {
    let clean = normalize_whitespace(text);
    if clean.is_empty() {
        return Segments {
            sentences: Vec::new(),
            words: Vec::new(),
        };
    }

    static RE: OnceLock<Regex> = OnceLock::new();
    let sentence_break =
        RE.get_or_init(|| Regex::new(r"[.!?]+\s+|[.!?]+$").expect("sentence regex is valid"));

    let sentences = sentence_break
        .split(&clean)
        .filter(|s| is_sentence(s))
        .map(|s| s.trim().to_string())
        .collect();

    let words = clean
        .split(' ')
        .filter(|w| is_word(w))
        .map(str::to_string)
        .collect();

    Segments { sentences, words }
}

/// Estimate the syllables in a single word.
///
/// Counts vowel groups, drops a silent trailing `e`, then applies the
/// suffix rules in order. Non-empty words always have at least one
/// syllable; words with no ASCII letters have none.
pub fn count_syllables(word: &str, heuristics: &TextHeuristics) -> usize {
    let word: String = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();

    if word.is_empty() {
        return 0;
    }
    if word.len() <= 3 {
        return 1;
    }

    let mut count = 0usize;
    let mut previous_was_vowel = false;
    for c in word.chars() {
        let is_vowel = heuristics.is_vowel(c);
        if is_vowel && !previous_was_vowel {
            count += 1;
        }
        previous_was_vowel = is_vowel;
    }

    if word.ends_with('e') && count > 1 {
        count -= 1;
    }

    for rule in &heuristics.suffix_rules {
        let suffix = rule.suffix.as_str();
        if suffix.is_empty() || !word.ends_with(suffix) || word.len() <= suffix.len() {
            continue;
        }
        let before = word[..word.len() - suffix.len()].chars().last();
        let after_consonant = before.is_some_and(|c| !heuristics.is_vowel(c));
        match rule.effect {
            SuffixEffect::None => {}
            SuffixEffect::AddAfterConsonant if after_consonant => count += 1,
            SuffixEffect::AddAfterConsonant => {}
        }
    }

    count.max(1)
}

/// Round to two decimals, halves rounded up on the ×100 value.
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Flesch Reading Ease: `206.835 − 1.015·ASL − 84.6·ASW`, two decimals.
pub fn flesch_reading_ease(text: &str, heuristics: &TextHeuristics) -> f64 {
    let segments = segment(text);
    if segments.sentences.is_empty() || segments.words.is_empty() {
        return 0.0;
    }

    let total_syllables: usize = segments
        .words
        .iter()
        .map(|w| count_syllables(w, heuristics))
        .sum();

    let words = segments.words.len() as f64;
    let asl = words / segments.sentences.len() as f64;
    let asw = total_syllables as f64 / words;

    round2(206.835 - 1.015 * asl - 84.6 * asw)
}

/// Characters that are neither ASCII alphanumeric nor whitespace.
pub fn special_char_count(text: &str) -> usize {
    text.chars()
        .filter(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace())
        .count()
}

/// Distinct lowercase tokens over all tokens; 0 for empty text.
pub fn unique_words_ratio(text: &str) -> f64 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return 0.0;
    }
    let unique: HashSet<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    unique.len() as f64 / tokens.len() as f64
}

/// Punctuation marks per character; 0 for empty text.
pub fn punctuation_density(text: &str) -> f64 {
    let len = text.chars().count();
    if len == 0 {
        return 0.0;
    }
    let marks = text.chars().filter(|c| PUNCTUATION.contains(c)).count();
    marks as f64 / len as f64
}

/// Occurrences of ad vocabulary (substring matches, so "ad" inside "read"
/// counts too).
pub fn ad_keyword_count(lower_text: &str) -> usize {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"advertisement|sponsored|ad|banner").expect("ad keyword regex is valid")
    });
    re.find_iter(lower_text).count()
}

/// Pieces of the text when split on single spaces; never less than 1.
pub fn space_separated_len(text: &str) -> usize {
    text.split(' ').count().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syllables(word: &str) -> usize {
        count_syllables(word, &TextHeuristics::default())
    }

    fn flesch(text: &str) -> f64 {
        flesch_reading_ease(text, &TextHeuristics::default())
    }

    #[test]
    fn test_syllables_short_and_empty() {
        assert_eq!(syllables("cat"), 1);
        assert_eq!(syllables(""), 0);
        assert_eq!(syllables("123"), 0);
        assert_eq!(syllables("a"), 1);
    }

    #[test]
    fn test_syllables_le_after_consonant() {
        // a-e groups = 2, silent e -> 1, "le" after "b" -> 2
        assert_eq!(syllables("table"), 2);
        assert!(syllables("table") >= 2);
    }

    #[test]
    fn test_syllables_vowel_groups_and_silent_e() {
        assert_eq!(syllables("reading"), 2);
        assert_eq!(syllables("make"), 1);
        assert_eq!(syllables("beautiful"), 3);
        assert_eq!(syllables("Hello!"), 2);
    }

    #[test]
    fn test_syllables_noop_suffixes() {
        // "jumped": u, e -> 2; "ed" rule leaves it alone
        assert_eq!(syllables("jumped"), 2);
        // "boxes": o, e -> 2; "es" rule leaves it alone
        assert_eq!(syllables("boxes"), 2);
        // "water": a, e -> 2; "er" rule leaves it alone
        assert_eq!(syllables("water"), 2);
    }

    #[test]
    fn test_syllables_custom_heuristics() {
        let h = TextHeuristics {
            vowels: "aeiou".to_string(),
            suffix_rules: Vec::new(),
        };
        // without y as a vowel, "rhythm" has no vowel groups, floored to 1
        assert_eq!(count_syllables("rhythm", &h), 1);
        // without the "le" rule, "table" stays at 1
        assert_eq!(count_syllables("table", &h), 1);
    }

    #[test]
    fn test_segment_filters_fragments() {
        let s = segment("Hi. The cat sat!  ... 42. Done?");
        assert_eq!(s.sentences, vec!["The cat sat", "Done"]);
        // "..." has no alphanumerics and is not a word
        assert_eq!(s.words, vec!["Hi.", "The", "cat", "sat!", "42.", "Done?"]);
    }

    #[test]
    fn test_segment_empty() {
        let s = segment("   \n\t ");
        assert!(s.sentences.is_empty());
        assert!(s.words.is_empty());
        assert_eq!(s.avg_words_per_sentence(), 0.0);
    }

    #[test]
    fn test_avg_words_per_sentence() {
        assert_eq!(segment("The cat sat. The dog ran.").avg_words_per_sentence(), 3.0);
        assert_eq!(segment("!!! ??").avg_words_per_sentence(), 0.0);
    }

    #[test]
    fn test_flesch_degenerate() {
        assert_eq!(flesch(""), 0.0);
        assert_eq!(flesch("   "), 0.0);
        assert_eq!(flesch("?! .."), 0.0);
    }

    #[test]
    fn test_flesch_simple_sentences() {
        // ASL = 3, ASW = 1 -> 206.835 - 3.045 - 84.6
        assert_eq!(flesch("The cat sat. The dog ran."), 119.19);
    }

    #[test]
    fn test_flesch_can_be_negative() {
        let text = "Incomprehensibility characterizes institutionalization.";
        let score = flesch(text);
        assert!(score < 0.0);
        assert!(score.is_finite());
    }

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn test_special_chars() {
        assert_eq!(special_char_count("a-b c! d"), 2);
        assert_eq!(special_char_count("café"), 1);
        assert_eq!(special_char_count(""), 0);
    }

    #[test]
    fn test_unique_words_ratio() {
        assert_eq!(unique_words_ratio("The the cat"), 2.0 / 3.0);
        assert_eq!(unique_words_ratio(""), 0.0);
    }

    #[test]
    fn test_punctuation_density() {
        assert_eq!(punctuation_density("a, b."), 2.0 / 5.0);
        assert_eq!(punctuation_density(""), 0.0);
    }

    #[test]
    fn test_ad_keywords_match_substrings() {
        assert_eq!(ad_keyword_count("sponsored advertisement banner"), 3);
        assert_eq!(ad_keyword_count("read the headline"), 2);
        assert_eq!(ad_keyword_count("nothing here"), 0);
    }

    #[test]
    fn test_space_separated_len() {
        assert_eq!(space_separated_len(""), 1);
        assert_eq!(space_separated_len("one two three"), 3);
    }
}
