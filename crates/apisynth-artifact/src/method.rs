//! Synthesized test method definitions

use crate::hash::ContentHash;

/// Indentation of a class member relative to the class body
pub const MEMBER_INDENT: &str = "    ";

/// Indentation of a statement inside a member
pub const STATEMENT_INDENT: &str = "        ";

/// A synthesized test method: a name plus the statements of its body
///
/// `body` holds one statement per line, without indentation or braces.
/// Two definitions are equivalent iff their names are equal; they conflict
/// when the names match but the bodies differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMethodDefinition {
    name: String,
    body: String,
}

impl TestMethodDefinition {
    /// Create definition
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    /// Method name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Body statements
    #[inline]
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Fingerprint of the whitespace-normalized body
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> ContentHash {
        body_fingerprint(&self.body)
    }

    /// Member source for this definition declared under `name`
    ///
    /// The first line carries no indentation; the renderer adds it.
    #[must_use]
    pub fn member_source(&self, name: &str) -> String {
        let mut out = String::new();
        out.push_str("@Test\n");
        out.push_str(MEMBER_INDENT);
        out.push_str("public void ");
        out.push_str(name);
        out.push_str("() {\n");
        for line in self.body.lines().filter(|l| !l.trim().is_empty()) {
            out.push_str(STATEMENT_INDENT);
            out.push_str(line.trim());
            out.push('\n');
        }
        out.push_str(MEMBER_INDENT);
        out.push('}');
        out
    }
}

/// Normalize body text so formatting differences do not count as changes
///
/// Strips one pair of enclosing braces if present, trims every line and
/// drops blank lines.
#[must_use]
pub fn normalize_body(text: &str) -> String {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed);

    inner
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fingerprint of a body after [`normalize_body`]
#[inline]
#[must_use]
pub fn body_fingerprint(text: &str) -> ContentHash {
    ContentHash::compute(normalize_body(text).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> TestMethodDefinition {
        TestMethodDefinition::new(
            "testGET_users",
            "Map<String, String> queryParams = new HashMap<>();\n\
             Response response = getRequest(\"/users\", queryParams);\n\
             response.then().statusCode(200);",
        )
    }

    #[test]
    fn member_source_layout() {
        let expected = "@Test\n    public void testGET_usersV2() {\n        \
                        Map<String, String> queryParams = new HashMap<>();\n        \
                        Response response = getRequest(\"/users\", queryParams);\n        \
                        response.then().statusCode(200);\n    }";
        assert_eq!(sample().member_source("testGET_usersV2"), expected);
    }

    #[test]
    fn normalize_strips_braces_and_indentation() {
        let block = "{\n        a();\n\n        b();\n    }";
        assert_eq!(normalize_body(block), "a();\nb();");
        assert_eq!(normalize_body("  a();\n b();  "), "a();\nb();");
    }

    #[test]
    fn fingerprint_ignores_formatting() {
        let def = sample();
        let block = format!("{{\n{}\n}}", def.body().replace('\n', "\n            "));
        assert_eq!(def.fingerprint(), body_fingerprint(&block));
    }

    #[test]
    fn fingerprint_detects_changed_statement() {
        let a = TestMethodDefinition::new("t", "response.then().statusCode(200);");
        let b = TestMethodDefinition::new("t", "response.then().statusCode(201);");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    proptest::proptest! {
        #[test]
        fn normalize_is_idempotent(text in "[ ();a-z\n]{0,60}") {
            let once = normalize_body(&text);
            proptest::prop_assert_eq!(normalize_body(&once), once.clone());
        }

        #[test]
        fn indentation_does_not_change_fingerprint(
            lines in proptest::collection::vec("[a-z();]{1,12}", 1..6),
            indent in 0usize..12,
        ) {
            let flat = lines.join("\n");
            let pad = " ".repeat(indent);
            let indented = lines.iter().map(|l| format!("{pad}{l}")).collect::<Vec<_>>().join("\n\n");
            proptest::prop_assert_eq!(body_fingerprint(&flat), body_fingerprint(&indented));
        }
    }
}
