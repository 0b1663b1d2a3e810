//! Conflict resolvers
//!
//! A [`ConflictResolver`] answers one question: when a synthesized method
//! collides with a differently-bodied method of the same name, should it be
//! added again as a new version? Implementations range from fixed policies
//! and scripted answers (tests, automation) to an interactive prompt.

use std::collections::HashMap;
use std::io::{BufRead, Write};

/// Errors raised when a resolver cannot produce an answer
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No answer is available for this candidate
    #[error("no answer available: {0}")]
    Unavailable(String),

    /// Input ended before an answer was given
    #[error("input ended before an answer was given")]
    EndOfInput,

    /// IO error talking to the answering party
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decision point for name collisions with a different body
///
/// Called synchronously, at most once per distinct colliding name per run.
pub trait ConflictResolver {
    /// `Ok(true)` to add the candidate as a new version, `Ok(false)` to skip
    ///
    /// # Errors
    /// Returns [`ResolveError`] if no answer can be produced; callers treat
    /// that as a decline.
    fn resolve(&mut self, candidate: &str) -> Result<bool, ResolveError>;

    /// Called before the candidates of another artifact are planned
    fn begin_artifact(&mut self, _class_name: &str) {}
}

impl<R: ConflictResolver + ?Sized> ConflictResolver for &mut R {
    fn resolve(&mut self, candidate: &str) -> Result<bool, ResolveError> {
        (**self).resolve(candidate)
    }

    fn begin_artifact(&mut self, class_name: &str) {
        (**self).begin_artifact(class_name);
    }
}

impl<R: ConflictResolver + ?Sized> ConflictResolver for Box<R> {
    fn resolve(&mut self, candidate: &str) -> Result<bool, ResolveError> {
        (**self).resolve(candidate)
    }

    fn begin_artifact(&mut self, class_name: &str) {
        (**self).begin_artifact(class_name);
    }
}

/// Gives the same answer to every conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedResolver {
    accept: bool,
}

impl FixedResolver {
    /// Always add a new version
    #[inline]
    #[must_use]
    pub fn accept_all() -> Self {
        Self { accept: true }
    }

    /// Never add a new version
    #[inline]
    #[must_use]
    pub fn decline_all() -> Self {
        Self { accept: false }
    }
}

impl ConflictResolver for FixedResolver {
    fn resolve(&mut self, _candidate: &str) -> Result<bool, ResolveError> {
        Ok(self.accept)
    }
}

/// Answers from a script keyed by candidate name, recording every question
#[derive(Debug, Clone, Default)]
pub struct ScriptedResolver {
    answers: HashMap<String, bool>,
    fallback: Option<bool>,
    asked: Vec<String>,
}

impl ScriptedResolver {
    /// Create resolver with no answers (every question is unavailable)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer for `candidate`
    #[must_use]
    pub fn answer(mut self, candidate: impl Into<String>, accept: bool) -> Self {
        self.answers.insert(candidate.into(), accept);
        self
    }

    /// Answer for candidates without a scripted answer
    #[must_use]
    pub fn otherwise(mut self, accept: bool) -> Self {
        self.fallback = Some(accept);
        self
    }

    /// Candidates asked about, in order
    #[inline]
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl ConflictResolver for ScriptedResolver {
    fn resolve(&mut self, candidate: &str) -> Result<bool, ResolveError> {
        self.asked.push(candidate.to_string());
        self.answers
            .get(candidate)
            .copied()
            .or(self.fallback)
            .ok_or_else(|| ResolveError::Unavailable(format!("no scripted answer for {candidate}")))
    }
}

/// Asks a person on `output` and reads the answer from `input`
///
/// `yes`/`y` (any case) accepts; any other line declines. End of input is
/// reported as [`ResolveError::EndOfInput`].
#[derive(Debug)]
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
    context: Option<String>,
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    /// Create prompt over the given streams
    #[inline]
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            context: None,
        }
    }

    /// Consume into the underlying streams
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> ConflictResolver for PromptResolver<R, W> {
    fn begin_artifact(&mut self, class_name: &str) {
        self.context = Some(class_name.to_string());
    }

    fn resolve(&mut self, candidate: &str) -> Result<bool, ResolveError> {
        match &self.context {
            Some(class_name) => writeln!(
                self.output,
                "Method {candidate} already exists in class {class_name}. \
                 Do you want to add it again as a new version? (yes/no)"
            )?,
            None => writeln!(
                self.output,
                "Method {candidate} already exists. \
                 Do you want to add it again as a new version? (yes/no)"
            )?,
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ResolveError::EndOfInput);
        }
        let answer = line.trim().to_ascii_lowercase();
        Ok(matches!(answer.as_str(), "yes" | "y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn fixed_resolver_answers() {
        assert!(FixedResolver::accept_all().resolve("a").unwrap());
        assert!(!FixedResolver::decline_all().resolve("a").unwrap());
    }

    #[test]
    fn scripted_resolver_records_questions() {
        let mut resolver = ScriptedResolver::new()
            .answer("testGET_a", true)
            .answer("testGET_b", false);

        assert!(resolver.resolve("testGET_a").unwrap());
        assert!(!resolver.resolve("testGET_b").unwrap());
        assert!(matches!(
            resolver.resolve("testGET_c"),
            Err(ResolveError::Unavailable(_))
        ));
        assert_eq!(resolver.asked(), ["testGET_a", "testGET_b", "testGET_c"]);
    }

    #[test]
    fn scripted_resolver_fallback() {
        let mut resolver = ScriptedResolver::new().otherwise(false);
        assert!(!resolver.resolve("anything").unwrap());
    }

    #[test]
    fn prompt_accepts_yes() {
        let mut resolver = PromptResolver::new(Cursor::new("YES\nno\n"), Vec::new());
        resolver.begin_artifact("GETTests");

        assert!(resolver.resolve("testGET_pets").unwrap());
        assert!(!resolver.resolve("testGET_owners").unwrap());

        let (_, output) = resolver.into_inner();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with(
            "Method testGET_pets already exists in class GETTests. \
             Do you want to add it again as a new version? (yes/no)\n"
        ));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn prompt_end_of_input() {
        let mut resolver = PromptResolver::new(Cursor::new(""), Vec::new());
        assert!(matches!(
            resolver.resolve("testGET_pets"),
            Err(ResolveError::EndOfInput)
        ));
    }

    #[test]
    fn boxed_resolver_delegates() {
        let mut boxed: Box<dyn ConflictResolver> = Box::new(FixedResolver::accept_all());
        assert!(boxed.resolve("x").unwrap());
    }
}
