//! Populate script assembly

use std::fmt;
use std::io::{self, Write};

use super::sql::InsertStatement;

/// Statement closing every populate script
pub const COMMIT_MARKER: &str = "COMMIT;";

/// The generated populate script.
///
/// Rendered as the schema preamble, one statement per line and a trailing
/// commit marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateScript {
    /// Schema text copied verbatim to the head of the script
    pub preamble: String,
    pub statements: Vec<InsertStatement>,
    /// Number of entity rows (records) processed
    pub entities_exported: usize,
}

impl PopulateScript {
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            preamble: preamble.into(),
            statements: Vec::new(),
            entities_exported: 0,
        }
    }

    /// Append the statements of one processed record
    pub fn push_entity(&mut self, statements: Vec<InsertStatement>) {
        self.statements.extend(statements);
        self.entities_exported += 1;
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// Render the full script text
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// SHA-256 of the rendered text, hex encoded
    #[cfg(feature = "cli")]
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        format!("{:x}", Sha256::digest(self.render().as_bytes()))
    }

    /// Stream the script to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{}", self)
    }
}

impl fmt::Display for PopulateScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n", self.preamble.trim_end())?;
        for statement in &self.statements {
            writeln!(f, "{};", statement)?;
        }
        writeln!(f, "\n{}", COMMIT_MARKER)
    }
}
