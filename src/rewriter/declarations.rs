//! Declaration enumeration: top-level functions and their source spans.

use std::path::{Path, PathBuf};

use proc_macro2::LineColumn;
use syn::spanned::Spanned;

use crate::error::RewriteError;

/// A byte position inside one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePos {
    /// File the offset points into
    pub file: PathBuf,
    /// Byte offset
    pub offset: usize,
}

/// A byte range, possibly (erroneously) spanning two files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    /// Inclusive start
    pub start: SourcePos,
    /// Exclusive end
    pub end: SourcePos,
}

impl SourceSpan {
    /// A span within a single file
    pub fn within(file: impl Into<PathBuf>, start: usize, end: usize) -> Self {
        let file = file.into();
        SourceSpan {
            start: SourcePos {
                file: file.clone(),
                offset: start,
            },
            end: SourcePos { file, offset: end },
        }
    }
}

/// A top-level function found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Function name
    pub name: String,
    /// Whole declaration through the closing brace, including doc comments,
    /// attributes and any `//` comment lines directly above it
    pub declaration: SourceSpan,
    /// Text strictly between the body braces
    pub body: SourceSpan,
}

/// Lists the top-level function declarations of a source file
pub trait DeclarationEnumerator {
    /// Enumerate functions declared in `source`, which was read from `path`
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Parse`] when `source` cannot be parsed.
    fn enumerate(&self, path: &Path, source: &str) -> Result<Vec<FunctionDecl>, RewriteError>;
}

/// [`DeclarationEnumerator`] for Rust using `syn`
///
/// Spans come from `proc-macro2` line/column locations and are converted to
/// byte offsets against the original text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustDeclarations;

impl DeclarationEnumerator for RustDeclarations {
    fn enumerate(&self, path: &Path, source: &str) -> Result<Vec<FunctionDecl>, RewriteError> {
        // Spans are relative to the text after a byte order mark.
        let (base, text) = match source.strip_prefix('\u{feff}') {
            Some(rest) => ('\u{feff}'.len_utf8(), rest),
            None => (0, source),
        };
        let file: syn::File = syn::parse_str(text).map_err(|e| {
            let at = e.span().start();
            RewriteError::Parse {
                path: path.to_path_buf(),
                message: format!("{e} (line {}, column {})", at.line, at.column + 1),
            }
        })?;

        let index = LineIndex::new(text);
        let mut functions = Vec::new();
        for item in &file.items {
            let syn::Item::Fn(function) = item else {
                continue;
            };
            let name = function.sig.ident.to_string();
            let braces = function.block.brace_token.span;
            let offsets = (
                index
                    .offset(function.span().start())
                    .map(|start| leading_comments_start(text, start)),
                index.offset(braces.close().end()),
                index.offset(braces.open().end()),
                index.offset(braces.close().start()),
            );
            let (Some(decl_start), Some(decl_end), Some(body_start), Some(body_end)) = offsets
            else {
                return Err(RewriteError::Parse {
                    path: path.to_path_buf(),
                    message: format!("could not locate source of fn {name}"),
                });
            };
            functions.push(FunctionDecl {
                name,
                declaration: SourceSpan::within(path, base + decl_start, base + decl_end),
                body: SourceSpan::within(path, base + body_start, base + body_end),
            });
        }
        Ok(functions)
    }
}

/// Start of the run of plain `//` comment lines ending right above `start`
///
/// Doc comments are already inside the item span. A blank line or a retained
/// block marker ends the run.
pub(crate) fn leading_comments_start(text: &str, start: usize) -> usize {
    let mut begin = text[..start].rfind('\n').map_or(0, |i| i + 1);
    if !text[begin..start].trim().is_empty() {
        return start;
    }
    while begin > 0 {
        let above = text[..begin - 1].rfind('\n').map_or(0, |i| i + 1);
        let line = text[above..begin - 1].trim();
        let plain = line.starts_with("//")
            && !line.starts_with("///")
            && !line.starts_with("//!")
            && !line.starts_with("// lambdagen:");
        if !plain {
            break;
        }
        begin = above;
    }
    if begin == text[..start].rfind('\n').map_or(0, |i| i + 1) {
        start
    } else {
        begin
    }
}

/// Maps `proc-macro2` line/column pairs to byte offsets
///
/// Lines are 1-based, columns count characters from 0.
pub(crate) struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        LineIndex { text, line_starts }
    }

    pub(crate) fn offset(&self, at: LineColumn) -> Option<usize> {
        let start = *self.line_starts.get(at.line.checked_sub(1)?)?;
        let line = &self.text[start..];
        if at.column == 0 {
            return Some(start);
        }
        let mut chars = line.char_indices();
        match chars.nth(at.column) {
            Some((i, _)) => Some(start + i),
            // Column just past the last character of the text
            None if line.chars().count() == at.column => Some(self.text.len()),
            None => None,
        }
    }
}
