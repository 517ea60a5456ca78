//! Initialization options and naming conventions.

use typegraph_core::{RuntimeType, TypeKind};

/// What to do with an extension whose base type does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedExtensionPolicy {
    /// Drop the extension and log a warning.
    #[default]
    Drop,
    /// Report an `ExtensionTargetMissing` error.
    Error,
}

/// Derives schema names from runtime types and members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConventions {
    input_suffix: String,
}

impl NamingConventions {
    pub fn new() -> Self {
        Self {
            input_suffix: "Input".to_string(),
        }
    }

    pub fn with_input_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.input_suffix = suffix.into();
        self
    }

    /// Name of a type of `kind` backed by `runtime`.
    ///
    /// Generic arguments prefix the base name (`Connection<User>` becomes
    /// `UserConnection`). Interfaces drop an `I` prefix, input objects get the
    /// input suffix and directives are camel-cased.
    pub fn type_name(&self, runtime: &RuntimeType, kind: TypeKind) -> String {
        let name = runtime_name(runtime);
        match kind {
            TypeKind::Interface => strip_interface_prefix(&name).to_string(),
            TypeKind::InputObject if !name.ends_with(&self.input_suffix) => {
                format!("{name}{}", self.input_suffix)
            }
            TypeKind::Directive => self.directive_name(&name),
            _ => name,
        }
    }

    /// `CachedDirective` -> `cached`.
    pub fn directive_name(&self, name: &str) -> String {
        let base = match name.strip_suffix("Directive") {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => name,
        };
        lower_first(base)
    }

    /// Field name for a member: `get_user_name` -> `userName`, `GetName` -> `name`.
    pub fn member_name(&self, member: &str) -> String {
        let base = if let Some(stripped) = member.strip_prefix("get_") {
            stripped
        } else if let Some(stripped) = member
            .strip_prefix("Get")
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
        {
            stripped
        } else {
            member
        };

        let mut out = String::with_capacity(base.len());
        let mut upper_next = false;
        for c in base.chars() {
            if c == '_' && !out.is_empty() {
                upper_next = true;
            } else if upper_next {
                out.extend(c.to_uppercase());
                upper_next = false;
            } else {
                out.push(c);
            }
        }
        lower_first(&out)
    }

    /// GraphQL name rule: `[_A-Za-z][_0-9A-Za-z]*`.
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
    }
}

impl Default for NamingConventions {
    fn default() -> Self {
        Self::new()
    }
}

fn runtime_name(runtime: &RuntimeType) -> String {
    let mut name: String = runtime.args().iter().map(runtime_name).collect();
    name.push_str(runtime.name());
    name
}

fn strip_interface_prefix(name: &str) -> &str {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some('I'), Some(second)) if second.is_ascii_uppercase() => &name[1..],
        _ => name,
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Options of one initialization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    pub unmatched_extensions: UnmatchedExtensionPolicy,
    pub naming: NamingConventions,
    /// Run the schema validator once every type completed without errors.
    pub validate: bool,
}

impl SchemaOptions {
    pub fn new() -> Self {
        Self {
            unmatched_extensions: UnmatchedExtensionPolicy::default(),
            naming: NamingConventions::default(),
            validate: true,
        }
    }

    pub fn with_unmatched_extensions(mut self, policy: UnmatchedExtensionPolicy) -> Self {
        self.unmatched_extensions = policy;
        self
    }

    pub fn with_naming(mut self, naming: NamingConventions) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_arguments_prefix_the_name() {
        let naming = NamingConventions::default();
        let connection = RuntimeType::generic("Connection", vec![RuntimeType::named("User")]);
        assert_eq!(naming.type_name(&connection, TypeKind::Object), "UserConnection");

        let nested = RuntimeType::generic(
            "Edge",
            vec![RuntimeType::generic("List", vec![RuntimeType::named("Order")])],
        );
        assert_eq!(naming.type_name(&nested, TypeKind::Object), "OrderListEdge");
    }

    #[test]
    fn kind_specific_names() {
        let naming = NamingConventions::default();
        assert_eq!(naming.type_name(&RuntimeType::named("INode"), TypeKind::Interface), "Node");
        assert_eq!(naming.type_name(&RuntimeType::named("Item"), TypeKind::Interface), "Item");
        assert_eq!(naming.type_name(&RuntimeType::named("User"), TypeKind::InputObject), "UserInput");
        assert_eq!(naming.type_name(&RuntimeType::named("UserInput"), TypeKind::InputObject), "UserInput");
        assert_eq!(
            naming.type_name(&RuntimeType::named("CachedDirective"), TypeKind::Directive),
            "cached"
        );
        assert_eq!(naming.directive_name("Directive"), "directive");
    }

    #[test]
    fn custom_input_suffix() {
        let naming = NamingConventions::default().with_input_suffix("Args");
        assert_eq!(naming.type_name(&RuntimeType::named("User"), TypeKind::InputObject), "UserArgs");
    }

    #[test]
    fn member_names() {
        let naming = NamingConventions::default();
        assert_eq!(naming.member_name("get_user_name"), "userName");
        assert_eq!(naming.member_name("GetName"), "name");
        assert_eq!(naming.member_name("Getaway"), "getaway");
        assert_eq!(naming.member_name("friends"), "friends");
        assert_eq!(naming.member_name("_private"), "_private");
    }

    #[test]
    fn name_validation() {
        assert!(NamingConventions::is_valid_name("User"));
        assert!(NamingConventions::is_valid_name("_internal2"));
        assert!(!NamingConventions::is_valid_name(""));
        assert!(!NamingConventions::is_valid_name("2fast"));
        assert!(!NamingConventions::is_valid_name("User<T>"));
    }
}
