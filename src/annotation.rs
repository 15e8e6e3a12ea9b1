//! `+gen` directive extraction.
//!
//! A type opts into generation with a documentation line such as
//!
//! ```text
//! /// +gen * methods:"Any,Where" projections:"i64,String"
//! ```
//!
//! Only the first directive line of a doc block is honored. Tokens on that
//! line are separated by whitespace; anything that is not `*`, a `methods`
//! tag or a `projections` tag is ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Literal prefix that marks a directive line.
pub const DIRECTIVE: &str = "+gen";

static METHODS_TAG: Lazy<Regex> = Lazy::new(|| tag_pattern("methods"));
static PROJECTIONS_TAG: Lazy<Regex> = Lazy::new(|| tag_pattern("projections"));

/// A named comma list. An empty quoted value gives a tag with no items,
/// which is different from the tag being absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenTag {
    pub items: Vec<String>,
}

impl GenTag {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parsed directive for one declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenSpec {
    pub pointer: bool,
    /// Declared type name, used for diagnostics
    pub name: String,
    pub methods: Option<GenTag>,
    pub projections: Option<GenTag>,
}

impl GenSpec {
    /// A bare `+gen` directive for `name`.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            pointer: false,
            name: name.into(),
            methods: None,
            projections: None,
        }
    }

    pub fn with_pointer(mut self) -> Self {
        self.pointer = true;
        self
    }

    pub fn with_methods(mut self, tag: GenTag) -> Self {
        self.methods = Some(tag);
        self
    }

    pub fn with_projections(mut self, tag: GenTag) -> Self {
        self.projections = Some(tag);
        self
    }
}

/// Finds the first directive line in `doc` and parses it.
///
/// Returns `None` when the documentation carries no directive; that is not
/// an error, the type is simply not selected.
pub fn extract_gen_spec(doc: &str, name: &str) -> Option<GenSpec> {
    let line = doc
        .lines()
        .map(strip_comment_markers)
        .find(|line| line.starts_with(DIRECTIVE))?;

    let mut spec = GenSpec::bare(name);
    for token in line.split_whitespace() {
        if token == "*" {
            spec.pointer = true;
        }
        if let Some(items) = parse_tag(&METHODS_TAG, token) {
            spec.methods = Some(GenTag { items });
        }
        if let Some(items) = parse_tag(&PROJECTIONS_TAG, token) {
            spec.projections = Some(GenTag { items });
        }
    }
    Some(spec)
}

/// Strips leading `/` comment markers and whitespace.
fn strip_comment_markers(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == '/' || c.is_whitespace())
}

pub(crate) fn tag_pattern(name: &str) -> Regex {
    Regex::new(&format!(r#"{}:"(.*)""#, regex::escape(name))).unwrap()
}

/// Matches `name:"a,b,c"` anywhere in `text` and splits the quoted value.
pub(crate) fn parse_tag(pattern: &Regex, text: &str) -> Option<Vec<String>> {
    let captures = pattern.captures(text)?;
    let value = captures.get(1).map_or("", |m| m.as_str());
    if value.is_empty() {
        return Some(Vec::new());
    }
    Some(value.split(',').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const DUMMY: &str = "dummy";

    #[test]
    fn test_no_directive_is_not_selected() {
        let doc = indoc! {"
            // Here is a description of some type
            // gen that may span lines
        "};
        assert!(extract_gen_spec(doc, DUMMY).is_none());
    }

    #[test]
    fn test_bare_directive() {
        let doc = indoc! {"
            // Here is a description of some type
            // +gen
        "};
        let spec = extract_gen_spec(doc, DUMMY).expect("directive should be found");
        assert!(!spec.pointer);
        assert_eq!(spec.methods, None);
        assert_eq!(spec.projections, None);
        assert_eq!(spec.name, DUMMY);
    }

    #[test]
    fn test_pointer_flag() {
        let spec = extract_gen_spec("/// +gen *", DUMMY).unwrap();
        assert!(spec.pointer);
    }

    #[test]
    fn test_pointer_with_methods() {
        let doc = indoc! {r#"
            // Here is a description of some type
            // +gen * methods:"Any,All"
        "#};
        let spec = extract_gen_spec(doc, DUMMY).unwrap();
        assert!(spec.pointer);
        assert_eq!(spec.methods, Some(GenTag::new(["Any", "All"])));
        assert_eq!(spec.projections, None);
    }

    #[test]
    fn test_methods_and_projections() {
        let doc = r#"+gen methods:"Any,All" projections:"GroupBy""#;
        let spec = extract_gen_spec(doc, DUMMY).unwrap();
        assert!(!spec.pointer);
        assert_eq!(spec.methods.unwrap().items.len(), 2);
        assert_eq!(spec.projections, Some(GenTag::new(["GroupBy"])));
    }

    #[test]
    fn test_empty_tags_are_present_but_empty() {
        let spec = extract_gen_spec(r#" +gen methods:"" projections:"""#, DUMMY).unwrap();
        assert!(!spec.pointer);
        assert_eq!(spec.methods, Some(GenTag::empty()));
        assert_eq!(spec.projections, Some(GenTag::empty()));
    }

    #[test]
    fn test_only_first_directive_is_honored() {
        let doc = indoc! {r#"
            /// +gen methods:"Count"
            /// +gen * methods:"Any"
        "#};
        let spec = extract_gen_spec(doc, DUMMY).unwrap();
        assert!(!spec.pointer);
        assert_eq!(spec.methods, Some(GenTag::new(["Count"])));
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let spec = extract_gen_spec(r#"+gen frobnicate "quoted" methods:"Sum""#, DUMMY).unwrap();
        assert_eq!(spec.methods, Some(GenTag::new(["Sum"])));
        assert_eq!(spec.projections, None);
    }

    #[test]
    fn test_directive_must_start_the_line() {
        assert!(extract_gen_spec("/// see +gen docs", DUMMY).is_none());
    }

    #[test]
    fn test_runs_of_whitespace_separate_tokens() {
        let spec = extract_gen_spec("+gen \t  *   methods:\"Where\"", DUMMY).unwrap();
        assert!(spec.pointer);
        assert_eq!(spec.methods, Some(GenTag::new(["Where"])));
    }

    #[test]
    fn test_parse_tag_does_not_match_other_keys() {
        assert_eq!(parse_tag(&METHODS_TAG, r#"projections:"i32""#), None);
        assert_eq!(
            parse_tag(&PROJECTIONS_TAG, r#"projections:"i32,String""#),
            Some(vec!["i32".to_string(), "String".to_string()])
        );
    }
}
