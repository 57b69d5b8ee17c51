//! Plain-text inventory lexer and index builder.
//!
//! A plain-text Sphinx inventory is a run of object lines whose domain/role
//! marker starts with `py:`. Splitting on that marker yields one section per
//! documented object; each section starts with the object kind and carries a
//! relative link and a dotted qualified name somewhere in its tokens.

use crate::error::FindError;
use crate::index::{CorpusIndex, IndexStats, Lookup};
use serde::Deserialize;

/// Literal marker separating inventory sections.
pub const SECTION_DELIMITER: &str = "py:";

const MODULE_KIND: &str = "module";

/// Token that ends the object data of a `module` section.
const MODULE_TRAILER: &str = "std:doc";

/// How raw inventory bytes become text.
///
/// Neither strategy can fail: undecodable input is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeStrategy {
    /// UTF-8, silently dropping invalid byte sequences
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value
    Latin1,
}

impl DecodeStrategy {
    pub fn decode(self, raw: &[u8]) -> String {
        match self {
            Self::Utf8 => {
                let mut text = String::with_capacity(raw.len());
                for chunk in raw.utf8_chunks() {
                    text.push_str(chunk.valid());
                }
                text
            }
            Self::Latin1 => raw.iter().map(|&b| char::from(b)).collect(),
        }
    }
}

/// Settings that shape how an inventory is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Prefix joined to every relative link to form the lookup URL
    pub base_url: String,
    pub decode: DecodeStrategy,
}

/// One documented object: a qualified name and its relative link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRecord<'a> {
    pub name: &'a str,
    pub link: &'a str,
}

impl ObjectRecord<'_> {
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.link)
    }
}

/// A lexed inventory section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// First token, e.g. `class`, `method`, `module`
    pub kind: &'a str,
    /// Tokens kept for the corpus (module trailers removed)
    pub tokens: Vec<&'a str>,
    pub records: Vec<ObjectRecord<'a>>,
}

impl<'a> Section<'a> {
    /// Lex one section. `ordinal` is the 1-based section number, used in errors.
    pub fn lex(text: &'a str, ordinal: usize) -> Result<Self, FindError> {
        let all_tokens: Vec<&str> = text.split_whitespace().collect();
        let Some(&kind) = all_tokens.first() else {
            return Err(FindError::ParseFailure {
                section: ordinal,
                reason: "section has no tokens".to_string(),
            });
        };

        let mut tokens = all_tokens.clone();
        if kind == MODULE_KIND {
            if let Some(end) = tokens.iter().position(|t| *t == MODULE_TRAILER) {
                tokens.truncate(end);
            }
            if tokens.len() < 2 {
                return Err(FindError::ParseFailure {
                    section: ordinal,
                    reason: format!("module section has no object data before `{MODULE_TRAILER}`"),
                });
            }
        }

        // Links and names come from the untruncated tokens.
        let links = all_tokens.iter().copied().filter(|t| is_link(t));
        let names = all_tokens.iter().copied().filter(|t| is_name(t));
        let records = links
            .zip(names)
            .map(|(link, name)| ObjectRecord { name, link })
            .collect();

        Ok(Self {
            kind,
            tokens,
            records,
        })
    }

    /// Whitespace-normalized section text as it appears in the corpus.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

fn is_link(token: &str) -> bool {
    token.contains('/')
}

fn is_name(token: &str) -> bool {
    token.contains('.') && !token.contains('/')
}

/// Split decoded inventory text into `(ordinal, section_text)` pairs,
/// dropping the preamble before the first delimiter.
pub fn split_sections(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split(SECTION_DELIMITER)
        .skip(1)
        .enumerate()
        .map(|(i, chunk)| (i + 1, chunk))
}

/// Parse raw inventory bytes into a [`CorpusIndex`].
///
/// Malformed sections are logged and skipped; they never fail the parse.
/// The same bytes and options always produce an identical index.
pub fn parse_inventory(raw: &[u8], options: &ParseOptions) -> CorpusIndex {
    let text = options.decode.decode(raw);

    let mut section_texts = Vec::new();
    let mut lookup = Lookup::default();
    let mut stats = IndexStats::default();

    for (ordinal, chunk) in split_sections(&text) {
        let section = match Section::lex(chunk, ordinal) {
            Ok(section) => section,
            Err(err) => {
                tracing::warn!("Skipping inventory section: {}", err);
                stats.skipped += 1;
                continue;
            }
        };

        for record in &section.records {
            lookup.insert(record.name.to_string(), record.url(&options.base_url));
        }
        stats.records += section.records.len();
        stats.sections += 1;
        section_texts.push(section.text());
    }

    tracing::debug!(
        "Parsed inventory: {} sections, {} records, {} names, {} skipped",
        stats.sections,
        stats.records,
        lookup.len(),
        stats.skipped
    );

    CorpusIndex::new(
        section_texts.join(" "),
        lookup,
        stats,
        xxhash_rust::xxh3::xxh3_64(raw),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://docs.example/";

    fn options() -> ParseOptions {
        ParseOptions {
            base_url: BASE.to_string(),
            decode: DecodeStrategy::Utf8,
        }
    }

    #[test]
    fn test_module_section_truncated_at_trailer() {
        let section = Section::lex("module foo.bar api/foo std:doc extra junk", 1).unwrap();
        assert_eq!(section.kind, "module");
        assert_eq!(section.text(), "module foo.bar api/foo");
        assert_eq!(
            section.records,
            vec![ObjectRecord {
                name: "foo.bar",
                link: "api/foo"
            }]
        );
    }

    #[test]
    fn test_module_without_trailer_is_untouched() {
        let section = Section::lex("module foo.bar api/foo extra", 1).unwrap();
        assert_eq!(section.text(), "module foo.bar api/foo extra");
    }

    #[test]
    fn test_trailer_only_truncates_module_sections() {
        let section = Section::lex("class a.B api/a.html std:doc tail", 1).unwrap();
        assert_eq!(section.text(), "class a.B api/a.html std:doc tail");
    }

    #[test]
    fn test_records_pair_in_order() {
        let section =
            Section::lex("method 1 api/a.html#x api/a.html#y - a.X a.Y", 4).unwrap();
        assert_eq!(section.records.len(), 2);
        assert_eq!(section.records[0].name, "a.X");
        assert_eq!(section.records[0].link, "api/a.html#x");
        assert_eq!(section.records[1].name, "a.Y");
        assert_eq!(section.records[1].link, "api/a.html#y");
    }

    #[test]
    fn test_link_tokens_are_not_names() {
        // `api/a.html` contains a dot but is a link.
        let section = Section::lex("function api/a.html", 1).unwrap();
        assert!(section.records.is_empty());
    }

    #[test]
    fn test_empty_section_is_parse_failure() {
        let err = Section::lex("   \n ", 7).unwrap_err();
        assert!(matches!(err, FindError::ParseFailure { section: 7, .. }));
    }

    #[test]
    fn test_module_with_nothing_before_trailer_fails() {
        let err = Section::lex("module std:doc junk", 2).unwrap_err();
        assert!(matches!(err, FindError::ParseFailure { section: 2, .. }));
    }

    #[test]
    fn test_parse_skips_malformed_sections() {
        let raw = b"header py:module std:doc x py:class a.B api/b - py:function a.f api/f";
        let index = parse_inventory(raw, &options());
        assert_eq!(index.corpus(), "class a.B api/b - function a.f api/f");
        assert_eq!(index.stats().sections, 2);
        assert_eq!(index.stats().skipped, 1);
        assert_eq!(index.resolve("a.B"), Some("https://docs.example/api/b"));
        assert_eq!(index.resolve("a.f"), Some("https://docs.example/api/f"));
    }

    #[test]
    fn test_section_without_pairs_still_contributes_text() {
        let raw = b"py:attribute nothing here py:class a.B api/b";
        let index = parse_inventory(raw, &options());
        assert_eq!(index.corpus(), "attribute nothing here class a.B api/b");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_link_fragment_preserved_exactly() {
        let raw = b"py:class a.B api/a%20b.html#a.B";
        let index = parse_inventory(raw, &options());
        assert_eq!(
            index.resolve("a.B"),
            Some("https://docs.example/api/a%20b.html#a.B")
        );
    }

    #[test]
    fn test_utf8_decode_drops_invalid_bytes() {
        let raw = b"py:class a.\xffB api/b";
        let index = parse_inventory(raw, &options());
        assert_eq!(index.resolve("a.B"), Some("https://docs.example/api/b"));
    }

    #[test]
    fn test_latin1_decode_never_fails() {
        assert_eq!(DecodeStrategy::Latin1.decode(b"caf\xe9"), "café");
        assert_eq!(DecodeStrategy::Utf8.decode(b"caf\xe9"), "caf");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw: &[u8] =
            b"pre py:module m.n api/m std:doc x py:class m.N api/m#N - py:method m.N.f api/m#f";
        let first = parse_inventory(raw, &options());
        let second = parse_inventory(raw, &options());
        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
    }
}
