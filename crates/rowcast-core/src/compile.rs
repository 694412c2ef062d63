use serde::{Deserialize, Serialize};

use rowcast_model::{Declaration, DialectConfig, FieldDecl, FieldSpec};

use crate::error::CompileError;

/// Compiler-wide configuration, passed explicitly at registration time.
/// The compiled schema copies what it needs and retains no reference to
/// ambient configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Legacy contract: an optional field whose token is empty or absent
    /// decodes to the absent sentinel, for every declared type.
    pub backward_compat: bool,
    /// With `backward_compat` off, a configured default token is coerced
    /// under the field's tag in place of the sentinel.
    pub optional_default: Option<String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            backward_compat: true,
            optional_default: None,
        }
    }
}

/// How an optional field with no usable token materializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) enum AbsentPolicy {
    Sentinel,
    DefaultToken(String),
}

/// Compiled, immutable schema bound to its owning service.
///
/// Created once at registration time and read-only afterward, so it can be
/// shared across unlimited concurrent decode calls without locking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    service: String,
    input: Vec<FieldSpec>,
    output: Vec<FieldSpec>,
    dialect: DialectConfig,
    absent_policy: AbsentPolicy,
}

impl Schema {
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn input_fields(&self) -> &[FieldSpec] {
        &self.input
    }

    pub fn output_fields(&self) -> &[FieldSpec] {
        &self.output
    }

    pub fn dialect(&self) -> &DialectConfig {
        &self.dialect
    }

    pub(crate) fn absent_policy(&self) -> &AbsentPolicy {
        &self.absent_policy
    }
}

/// Compile a declaration into a schema for the named owning service.
///
/// One-time, synchronous, side-effect-free: declaration order becomes the
/// positional contract, optionality markers become the `required` flag, and
/// dialect overrides are resolved and validated.
pub fn compile(
    service: &str,
    decl: &Declaration,
    config: &CompileConfig,
) -> Result<Schema, CompileError> {
    let dialect = match &decl.csv {
        Some(overrides) => DialectConfig::resolve(overrides)?,
        None => DialectConfig::default(),
    };
    let input = compile_fields(&decl.input, "input")?;
    let output = compile_fields(&decl.output, "output")?;
    let absent_policy = match (&config.optional_default, config.backward_compat) {
        (Some(token), false) => AbsentPolicy::DefaultToken(token.clone()),
        _ => AbsentPolicy::Sentinel,
    };
    tracing::debug!(
        service,
        input_fields = input.len(),
        output_fields = output.len(),
        "compiled schema"
    );
    Ok(Schema {
        service: service.to_string(),
        input,
        output,
        dialect,
        absent_policy,
    })
}

fn compile_fields(
    decls: &[FieldDecl],
    list: &'static str,
) -> Result<Vec<FieldSpec>, CompileError> {
    let mut fields: Vec<FieldSpec> = Vec::with_capacity(decls.len());
    for (position, decl) in decls.iter().enumerate() {
        if fields.iter().any(|spec| spec.name == decl.name()) {
            return Err(CompileError::DuplicateField {
                name: decl.name().to_string(),
                list,
            });
        }
        fields.push(FieldSpec {
            name: decl.name().to_string(),
            tag: decl.tag(),
            required: decl.required(),
            position,
        });
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcast_model::TypeTag;

    #[test]
    fn declaration_order_becomes_position() {
        let decl = Declaration::new(vec![
            FieldDecl::plain("aaa"),
            FieldDecl::tagged("bbb", TypeTag::Int),
            FieldDecl::plain("-ccc"),
        ]);
        let schema = compile("svc", &decl, &CompileConfig::default()).expect("compile");
        let fields = schema.input_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "aaa");
        assert_eq!(fields[0].position, 0);
        assert!(fields[0].required);
        assert_eq!(fields[1].tag, TypeTag::Int);
        assert_eq!(fields[1].position, 1);
        assert_eq!(fields[2].name, "ccc");
        assert!(!fields[2].required);
        assert_eq!(schema.service(), "svc");
    }

    #[test]
    fn duplicate_name_in_one_list_fails() {
        let decl = Declaration::new(vec![FieldDecl::plain("aaa"), FieldDecl::plain("aaa")]);
        let err = compile("svc", &decl, &CompileConfig::default()).unwrap_err();
        match err {
            CompileError::DuplicateField { name, list } => {
                assert_eq!(name, "aaa");
                assert_eq!(list, "input");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn optional_and_required_with_same_base_name_are_duplicates() {
        // The marker is not part of the name.
        let decl = Declaration::new(vec![FieldDecl::plain("aaa"), FieldDecl::plain("-aaa")]);
        assert!(compile("svc", &decl, &CompileConfig::default()).is_err());
    }

    #[test]
    fn same_name_across_input_and_output_is_permitted() {
        let decl = Declaration::new(vec![FieldDecl::plain("aaa")])
            .with_output(vec![FieldDecl::plain("aaa")]);
        let schema = compile("svc", &decl, &CompileConfig::default()).expect("compile");
        assert_eq!(schema.input_fields()[0].name, "aaa");
        assert_eq!(schema.output_fields()[0].name, "aaa");
    }

    #[test]
    fn malformed_dialect_override_fails_compilation() {
        let decl = Declaration::new(vec![FieldDecl::plain("aaa")]).with_csv(
            rowcast_model::DialectOverrides {
                delimiter: Some("<>".to_string()),
                ..rowcast_model::DialectOverrides::default()
            },
        );
        let err = compile("svc", &decl, &CompileConfig::default()).unwrap_err();
        assert!(matches!(err, CompileError::Dialect(_)));
    }

    #[test]
    fn default_config_keeps_the_sentinel_policy() {
        let decl = Declaration::new(vec![FieldDecl::plain("-aaa")]);
        let schema = compile("svc", &decl, &CompileConfig::default()).expect("compile");
        assert_eq!(*schema.absent_policy(), AbsentPolicy::Sentinel);

        let config = CompileConfig {
            backward_compat: false,
            optional_default: Some("n/a".to_string()),
        };
        let schema = compile("svc", &decl, &config).expect("compile");
        assert_eq!(
            *schema.absent_policy(),
            AbsentPolicy::DefaultToken("n/a".to_string())
        );
    }
}
