//! Go-module manifest parsing and canonical serialization.
//!
//! Capstan understands the subset of the `go.mod` grammar that matters for
//! merging: the `module` header, the `go` and `toolchain` directives, and
//! `require`/`replace` directives in both single-line and block form.
//! Comments are stripped during parsing; serialization always emits the
//! canonical layout so that the same logical content produces byte-identical
//! text.

use std::fmt::Write as _;

use anyhow::{bail, Result};

/// A single `require` directive: a module path and its declared version.
///
/// The path is the identity key; a manifest never holds two requirements
/// for the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
}

/// A single `replace` directive redirecting one module path to another.
///
/// Versions on either side are optional, matching the go.mod grammar
/// (`replace old => new v1.2.3`, `replace old v1.0.0 => ../local`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub old_path: String,
    pub old_version: Option<String>,
    pub new_path: String,
    pub new_version: Option<String>,
}

/// The parsed go.mod manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Module path from the `module` header, if present.
    pub module: Option<String>,

    /// Language version from the `go` directive.
    pub go: Option<String>,

    /// Toolchain name from the `toolchain` directive.
    pub toolchain: Option<String>,

    /// `require` directives in declaration order.
    requirements: Vec<Requirement>,

    /// `replace` directives in declaration order.
    replacements: Vec<Replacement>,
}

/// Block context while scanning a manifest line by line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Require,
    Replace,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Manifest::default()
    }

    /// Parse manifest content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut manifest = Manifest::new();
        let mut block = Block::None;

        for (idx, raw_line) in content.lines().enumerate() {
            let lineno = idx + 1;

            // Strip line comments before tokenizing.
            let line = match raw_line.find("//") {
                Some(pos) => &raw_line[..pos],
                None => raw_line,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if block != Block::None {
                if line == ")" {
                    block = Block::None;
                    continue;
                }

                let tokens: Vec<&str> = line.split_whitespace().collect();
                match block {
                    Block::Require => manifest.parse_require(&tokens, lineno)?,
                    Block::Replace => manifest.parse_replace(&tokens, lineno)?,
                    Block::None => unreachable!(),
                }
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens[0] {
                "module" => {
                    if tokens.len() != 2 {
                        bail!("line {}: malformed module directive", lineno);
                    }
                    manifest.module = Some(tokens[1].to_string());
                }
                "go" => {
                    if tokens.len() != 2 {
                        bail!("line {}: malformed go directive", lineno);
                    }
                    manifest.go = Some(tokens[1].to_string());
                }
                "toolchain" => {
                    if tokens.len() != 2 {
                        bail!("line {}: malformed toolchain directive", lineno);
                    }
                    manifest.toolchain = Some(tokens[1].to_string());
                }
                "require" => {
                    if tokens.len() == 2 && tokens[1] == "(" {
                        block = Block::Require;
                    } else {
                        manifest.parse_require(&tokens[1..], lineno)?;
                    }
                }
                "replace" => {
                    if tokens.len() == 2 && tokens[1] == "(" {
                        block = Block::Replace;
                    } else {
                        manifest.parse_replace(&tokens[1..], lineno)?;
                    }
                }
                other => {
                    bail!("line {}: unsupported directive `{}`", lineno, other);
                }
            }
        }

        if block != Block::None {
            bail!("unterminated directive block (missing `)`)");
        }

        Ok(manifest)
    }

    fn parse_require(&mut self, tokens: &[&str], lineno: usize) -> Result<()> {
        if tokens.len() != 2 {
            bail!("line {}: require expects `<path> <version>`", lineno);
        }

        let path = tokens[0];
        if self.requirement(path).is_some() {
            bail!("line {}: duplicate require for `{}`", lineno, path);
        }

        self.requirements.push(Requirement {
            path: path.to_string(),
            version: tokens[1].to_string(),
        });
        Ok(())
    }

    fn parse_replace(&mut self, tokens: &[&str], lineno: usize) -> Result<()> {
        let arrow = tokens
            .iter()
            .position(|t| *t == "=>")
            .ok_or_else(|| anyhow::anyhow!("line {}: replace directive is missing `=>`", lineno))?;

        let (left, right) = (&tokens[..arrow], &tokens[arrow + 1..]);
        if !(1..=2).contains(&left.len()) || !(1..=2).contains(&right.len()) {
            bail!(
                "line {}: replace expects `<old> [version] => <new> [version]`",
                lineno
            );
        }

        let old_path = left[0];
        if self.replacement(old_path).is_some() {
            bail!("line {}: duplicate replace for `{}`", lineno, old_path);
        }

        self.replacements.push(Replacement {
            old_path: old_path.to_string(),
            old_version: left.get(1).map(|v| v.to_string()),
            new_path: right[0].to_string(),
            new_version: right.get(1).map(|v| v.to_string()),
        });
        Ok(())
    }

    /// Get the requirement for a module path, if declared.
    pub fn requirement(&self, path: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.path == path)
    }

    /// All requirements in declaration order.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Get the replacement for an old module path, if declared.
    pub fn replacement(&self, old_path: &str) -> Option<&Replacement> {
        self.replacements.iter().find(|r| r.old_path == old_path)
    }

    /// All replacements in declaration order.
    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    /// Add or update a requirement, keeping the original position on update.
    pub fn upsert_requirement(&mut self, path: &str, version: &str) {
        if let Some(existing) = self.requirements.iter_mut().find(|r| r.path == path) {
            existing.version = version.to_string();
        } else {
            self.requirements.push(Requirement {
                path: path.to_string(),
                version: version.to_string(),
            });
        }
    }

    /// Append a replacement. The caller is responsible for checking that no
    /// directive with the same old path already exists.
    pub fn add_replacement(&mut self, replacement: Replacement) {
        debug_assert!(self.replacement(&replacement.old_path).is_none());
        self.replacements.push(replacement);
    }

    /// Serialize to canonical manifest text.
    ///
    /// Single directives are emitted on one line; two or more requirements
    /// or replacements use block form. Sections are separated by a blank
    /// line and the output always ends with a newline.
    pub fn serialize(&self) -> String {
        let mut sections: Vec<String> = Vec::new();

        if let Some(module) = &self.module {
            sections.push(format!("module {}", module));
        }
        if let Some(go) = &self.go {
            sections.push(format!("go {}", go));
        }
        if let Some(toolchain) = &self.toolchain {
            sections.push(format!("toolchain {}", toolchain));
        }

        match self.requirements.len() {
            0 => {}
            1 => {
                let r = &self.requirements[0];
                sections.push(format!("require {} {}", r.path, r.version));
            }
            _ => {
                let mut b = String::from("require (\n");
                for r in &self.requirements {
                    let _ = writeln!(b, "\t{} {}", r.path, r.version);
                }
                b.push(')');
                sections.push(b);
            }
        }

        match self.replacements.len() {
            0 => {}
            1 => sections.push(format!(
                "replace {}",
                format_replacement(&self.replacements[0])
            )),
            _ => {
                let mut b = String::from("replace (\n");
                for r in &self.replacements {
                    let _ = writeln!(b, "\t{}", format_replacement(r));
                }
                b.push(')');
                sections.push(b);
            }
        }

        if sections.is_empty() {
            return String::new();
        }

        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }
}

fn format_replacement(r: &Replacement) -> String {
    let mut line = r.old_path.clone();
    if let Some(v) = &r.old_version {
        let _ = write!(line, " {}", v);
    }
    let _ = write!(line, " => {}", r.new_path);
    if let Some(v) = &r.new_version {
        let _ = write!(line, " {}", v);
    }
    line
}
