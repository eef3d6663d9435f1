//! Text cleanup for extracted page text and table cells.
//!
//! Every pass here is idempotent: running the pipeline over its own output
//! returns the same string.

use unicode_normalization::UnicodeNormalization;

/// What a run of whitespace collapses to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitespaceMode {
    /// Collapse to a single space
    #[default]
    Space,
    /// Collapse to a single newline (page-numbered text output)
    Newline,
}

impl WhitespaceMode {
    fn separator(self) -> &'static str {
        match self {
            WhitespaceMode::Space => " ",
            WhitespaceMode::Newline => "\n",
        }
    }
}

/// Options for text cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// What whitespace runs collapse to
    pub whitespace: WhitespaceMode,

    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Expand typographic ligatures (ﬁ, ﬂ, ...)
    pub fix_ligatures: bool,

    /// Drop control characters other than whitespace
    pub remove_control_chars: bool,
}

impl CleanupOptions {
    /// Whitespace collapsing only.
    pub fn minimal() -> Self {
        Self {
            whitespace: WhitespaceMode::Space,
            normalize_unicode: false,
            fix_ligatures: false,
            remove_control_chars: false,
        }
    }

    /// Whitespace collapsing plus Unicode and ligature repair.
    pub fn standard() -> Self {
        Self {
            whitespace: WhitespaceMode::Space,
            normalize_unicode: true,
            fix_ligatures: true,
            remove_control_chars: true,
        }
    }

    /// Set the whitespace mode.
    pub fn with_whitespace(mut self, mode: WhitespaceMode) -> Self {
        self.whitespace = mode;
        self
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::minimal()
    }
}

const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Text cleanup pipeline.
#[derive(Debug, Clone, Default)]
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Options this pipeline runs with.
    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    /// Process text through the pipeline.
    pub fn process(&self, text: &str) -> String {
        let mut result: String = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.options.fix_ligatures {
            result = expand_ligatures(&result);
        }

        if self.options.remove_control_chars {
            result.retain(|c| !c.is_control() || c.is_whitespace());
        }

        collapse_whitespace(&result, self.options.whitespace)
    }
}

/// Collapse whitespace runs to one space and trim both ends.
pub fn clean_text(text: &str) -> String {
    collapse_whitespace(text, WhitespaceMode::Space)
}

/// Collapse whitespace runs according to `mode` and trim both ends.
pub fn clean_text_with(text: &str, mode: WhitespaceMode) -> String {
    collapse_whitespace(text, mode)
}

fn collapse_whitespace(text: &str, mode: WhitespaceMode) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(mode.separator())
}

fn expand_ligatures(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, expanded)) => out.push_str(expanded),
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_runs() {
        assert_eq!(clean_text("  Risk\n\n  Factors \t here "), "Risk Factors here");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n\t "), "");
    }

    #[test]
    fn test_clean_text_newline_mode() {
        assert_eq!(
            clean_text_with("Line one   \n\n Line two ", WhitespaceMode::Newline),
            "Line\none\nLine\ntwo"
        );
    }

    #[test]
    fn test_clean_text_idempotent() {
        let samples = [
            "",
            "plain",
            "  lead and trail  ",
            "a\u{00A0}\u{2003}b",
            "tabs\t\tand\r\nCRLF",
            "Section 1 .... 12\n\n",
        ];
        for s in samples {
            let once = clean_text(s);
            assert_eq!(clean_text(&once), once, "not idempotent for {:?}", s);

            let once = clean_text_with(s, WhitespaceMode::Newline);
            assert_eq!(clean_text_with(&once, WhitespaceMode::Newline), once);
        }
    }

    #[test]
    fn test_pipeline_fixes_ligatures() {
        let pipeline = CleanupPipeline::new(CleanupOptions::standard());
        assert_eq!(pipeline.process("the \u{FB01}nal o\u{FB03}ce"), "the final office");
    }

    #[test]
    fn test_pipeline_normalizes_unicode() {
        let pipeline = CleanupPipeline::new(CleanupOptions::standard());
        // e + combining acute -> precomposed é
        assert_eq!(pipeline.process("Caf\u{0065}\u{0301}"), "Caf\u{00E9}");
    }

    #[test]
    fn test_pipeline_drops_control_chars() {
        let pipeline = CleanupPipeline::new(CleanupOptions::standard());
        assert_eq!(pipeline.process("a\u{0007}b\u{000C}c"), "ab c");
    }

    #[test]
    fn test_pipeline_idempotent() {
        let pipeline = CleanupPipeline::new(
            CleanupOptions::standard().with_whitespace(WhitespaceMode::Newline),
        );
        let input = " \u{FB02}oating  rate\u{0000} notes\n\n\ndue 2030 ";
        let once = pipeline.process(input);
        assert_eq!(pipeline.process(&once), once);
    }

    #[test]
    fn test_minimal_is_default() {
        let pipeline = CleanupPipeline::default();
        assert!(!pipeline.options().normalize_unicode);
        assert_eq!(pipeline.process("\u{FB01}  x"), "\u{FB01} x");
    }
}
