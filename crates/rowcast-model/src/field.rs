use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dialect::DialectOverrides;
use crate::tag::TypeTag;

/// A textual declaration entry named a type tag outside the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("field {field:?}: unknown type tag {tag:?}")]
pub struct UnknownTagError {
    pub field: String,
    pub tag: String,
}

/// One declared field, before compilation.
///
/// A leading `-` on the name marks the field optional; the marker is
/// resolved here, at construction, and never re-inspected later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    name: String,
    tag: TypeTag,
    required: bool,
}

impl FieldDecl {
    /// An untagged field; coerces as a verbatim string.
    pub fn plain(name: &str) -> Self {
        let (name, required) = strip_optional_marker(name);
        Self {
            name,
            tag: TypeTag::Str,
            required,
        }
    }

    /// A field paired with an explicit type tag.
    pub fn tagged(name: &str, tag: TypeTag) -> Self {
        let (name, required) = strip_optional_marker(name);
        Self {
            name,
            tag,
            required,
        }
    }

    /// Parse a declaration entry from configuration text: `name`, `-name`,
    /// or `tag:name`.
    pub fn parse(entry: &str) -> Result<Self, UnknownTagError> {
        match entry.split_once(':') {
            None => Ok(Self::plain(entry)),
            Some((tag, name)) => {
                let tag = tag.parse::<TypeTag>().map_err(|_| UnknownTagError {
                    field: strip_optional_marker(name).0,
                    tag: tag.to_string(),
                })?;
                Ok(Self::tagged(name, tag))
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn required(&self) -> bool {
        self.required
    }
}

fn strip_optional_marker(name: &str) -> (String, bool) {
    match name.strip_prefix('-') {
        Some(rest) => (rest.to_string(), false),
        None => (name.to_string(), true),
    }
}

/// One compiled field within a schema. The declared position is the
/// positional contract for tokenized rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub tag: TypeTag,
    pub required: bool,
    pub position: usize,
}

/// An ordered field declaration: input list, output list, and an optional
/// dialect-override block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub input: Vec<FieldDecl>,
    pub output: Vec<FieldDecl>,
    pub csv: Option<DialectOverrides>,
}

impl Declaration {
    pub fn new(input: Vec<FieldDecl>) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: Vec<FieldDecl>) -> Self {
        self.output = output;
        self
    }

    pub fn with_csv(mut self, overrides: DialectOverrides) -> Self {
        self.csv = Some(overrides);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_field_defaults_to_required_string() {
        let decl = FieldDecl::plain("aaa");
        assert_eq!(decl.name(), "aaa");
        assert_eq!(decl.tag(), TypeTag::Str);
        assert!(decl.required());
    }

    #[test]
    fn optional_marker_resolves_at_construction() {
        let decl = FieldDecl::plain("-ddd");
        assert_eq!(decl.name(), "ddd");
        assert!(!decl.required());

        let decl = FieldDecl::tagged("-bbb", TypeTag::Int);
        assert_eq!(decl.name(), "bbb");
        assert_eq!(decl.tag(), TypeTag::Int);
        assert!(!decl.required());
    }

    #[test]
    fn parses_textual_entries() {
        let decl = FieldDecl::parse("int:bbb").expect("parse tagged");
        assert_eq!(decl.name(), "bbb");
        assert_eq!(decl.tag(), TypeTag::Int);

        let decl = FieldDecl::parse("-eee").expect("parse optional");
        assert_eq!(decl.name(), "eee");
        assert!(!decl.required());
    }

    #[test]
    fn unknown_tag_names_field_and_tag() {
        let err = FieldDecl::parse("mystery:-fff").unwrap_err();
        assert_eq!(err.field, "fff");
        assert_eq!(err.tag, "mystery");
    }
}
