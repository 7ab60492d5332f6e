use unicode_segmentation::UnicodeSegmentation;

/// Split text into trimmed, non-empty sentences (UAX #29 boundaries)
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// Whitespace-delimited word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("We propose X.  It works well! Does it scale?\n");
        assert_eq!(
            sentences,
            vec!["We propose X.", "It works well!", "Does it scale?"]
        );
    }

    #[test]
    fn test_blank_text_has_no_sentences() {
        assert!(split_sentences("   \n\t").is_empty());
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  one two\tthree\n"), 3);
        assert_eq!(word_count(""), 0);
    }
}
