//! Structural model of a generated test class
//!
//! A [`TestClass`] is kept as an ordered list of named members framed by
//! the text before the class body (package, imports, declaration) and the
//! text after it. Existing members keep their source verbatim; new members
//! are appended. Edits go through the model and the class is rendered once,
//! never spliced as raw text.

use crate::error::ArtifactError;
use crate::hash::ContentHash;
use crate::identity::ArtifactIdentity;
use crate::method::{TestMethodDefinition, MEMBER_INDENT, STATEMENT_INDENT};

/// Imports every generated test class needs
const STANDARD_IMPORTS: &[&str] = &[
    "io.restassured.response.Response",
    "java.util.HashMap",
    "java.util.Map",
    "org.testng.annotations.Test",
];

/// Member kinds recognised inside a class body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Constructor,
    Comment,
    Other,
}

/// One member of the class body
///
/// `source` starts at the member's first character (leading comments
/// included) and keeps the original indentation of continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    kind: MemberKind,
    name: Option<String>,
    source: String,
    fingerprint: Option<ContentHash>,
}

impl Member {
    pub(crate) fn new(
        kind: MemberKind,
        name: Option<String>,
        source: impl Into<String>,
        fingerprint: Option<ContentHash>,
    ) -> Self {
        Self {
            kind,
            name,
            source: source.into(),
            fingerprint,
        }
    }

    pub(crate) fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    /// Test method member built from a definition, declared as `name`
    #[must_use]
    pub fn test_method(definition: &TestMethodDefinition, name: &str) -> Self {
        Self::new(
            MemberKind::Method,
            Some(name.to_string()),
            definition.member_source(name),
            Some(definition.fingerprint()),
        )
    }

    /// Member kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Declared name (methods and constructors only)
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Member source text
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Body fingerprint (methods only)
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> Option<ContentHash> {
        self.fingerprint
    }
}

/// Settings for seeding a class that does not exist yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellTemplate {
    /// Base URL forwarded to the base client constructor
    pub base_url: String,
    /// Class the generated tests extend
    pub base_client: String,
    /// Package of the base client, if it must be imported
    pub base_client_package: Option<String>,
}

impl Default for ShellTemplate {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            base_client: "BaseAPI".to_string(),
            base_client_package: None,
        }
    }
}

/// Structural representation of one test class source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestClass {
    class_name: String,
    preamble: String,
    members: Vec<Member>,
    trailer: String,
}

impl TestClass {
    pub(crate) fn from_parts(
        class_name: impl Into<String>,
        preamble: impl Into<String>,
        members: Vec<Member>,
        trailer: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            preamble: preamble.into(),
            members,
            trailer: trailer.into(),
        }
    }

    /// Empty class shell: package, imports, declaration and a constructor
    /// forwarding the base URL to the base client
    #[must_use]
    pub fn shell(identity: &ArtifactIdentity, template: &ShellTemplate) -> Self {
        let package = identity.package_name();
        let class_name = identity.class_name();

        let mut imports: Vec<String> = STANDARD_IMPORTS.iter().map(|s| (*s).to_string()).collect();
        if let Some(client_package) = template
            .base_client_package
            .as_deref()
            .filter(|p| !p.is_empty() && *p != package)
        {
            imports.push(format!("{client_package}.{}", template.base_client));
        }
        imports.sort();
        imports.dedup();

        let mut preamble = String::new();
        if !package.is_empty() {
            preamble.push_str(&format!("package {package};\n\n"));
        }
        for import in &imports {
            preamble.push_str(&format!("import {import};\n"));
        }
        preamble.push_str(&format!(
            "\npublic class {class_name} extends {} {{",
            template.base_client
        ));

        let constructor = format!(
            "public {class_name}() {{\n{STATEMENT_INDENT}super(\"{}\");\n{MEMBER_INDENT}}}",
            escape_java_string(&template.base_url)
        );

        Self::from_parts(
            class_name,
            preamble,
            vec![Member::new(
                MemberKind::Constructor,
                Some(class_name.to_string()),
                constructor,
                None,
            )],
            "\n",
        )
    }

    /// Declared class name
    #[inline]
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Members in declaration order
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Names of declared methods, in declaration order
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|m| m.kind == MemberKind::Method)
            .filter_map(Member::name)
    }

    /// Find a method by name
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.kind == MemberKind::Method && m.name.as_deref() == Some(name))
    }

    /// Append a test method declared as `name`
    ///
    /// # Errors
    /// Returns [`ArtifactError::DuplicateMember`] if a method or constructor
    /// with that name is already declared.
    pub fn add_method(
        &mut self,
        definition: &TestMethodDefinition,
        name: &str,
    ) -> Result<(), ArtifactError> {
        let taken = self.members.iter().any(|m| {
            matches!(m.kind, MemberKind::Method | MemberKind::Constructor)
                && m.name.as_deref() == Some(name)
        });
        if taken {
            return Err(ArtifactError::DuplicateMember(name.to_string()));
        }
        self.members.push(Member::test_method(definition, name));
        Ok(())
    }

    /// Render back to source text
    ///
    /// Deterministic: the same model always renders to the same bytes.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.preamble.len() + self.members.iter().map(|m| m.source.len() + 8).sum::<usize>() + 8,
        );
        out.push_str(&self.preamble);
        out.push('\n');
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(MEMBER_INDENT);
            out.push_str(&member.source);
            out.push('\n');
        }
        out.push('}');
        out.push_str(&self.trailer);
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

/// Escape text for use inside a Java string literal
#[must_use]
pub fn escape_java_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
