// src/vdf.rs

//! Minimal writer for Valve's VDF key/value text format, as consumed by
//! `steamcmd` build scripts and `config.vdf`.

use std::fmt;

const INDENT: &str = "  ";

/// Builds one named VDF object.
///
/// ```
/// use steamdeploy::vdf::VdfBuilder;
///
/// let vdf = VdfBuilder::new("root")
///     .value("abc", "123")
///     .object("branch", |b| b.value("def", "456"))
///     .render();
/// assert_eq!(vdf, "\"root\"\n{\n  \"abc\" \"123\"\n  \"branch\"\n  {\n    \"def\" \"456\"\n  }\n}\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VdfBuilder {
    name: String,
    body: Vec<String>,
}

impl VdfBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
        }
    }

    pub fn value(mut self, name: impl fmt::Display, value: impl fmt::Display) -> Self {
        self.body.push(format!("{INDENT}\"{name}\" \"{value}\""));
        self
    }

    /// Nest an object named `name`, filled in by `content`.
    pub fn object(mut self, name: impl Into<String>, content: impl FnOnce(Self) -> Self) -> Self {
        let child = content(Self::new(name));
        self.body
            .extend(child.lines().map(|line| format!("{INDENT}{line}")));
        self
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    fn lines(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(format!("\"{}\"", self.name))
            .chain(std::iter::once("{".to_string()))
            .chain(self.body.iter().cloned())
            .chain(std::iter::once("}".to_string()))
    }
}

impl fmt::Display for VdfBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
