//! Retained deprecated declarations.
//!
//! A declaration that no longer matches the schema is written back as a block
//! of line comments so it cannot compile or be called:
//!
//! ```text
//! // lambdagen:deprecated Query_getApples
//! // pub fn Query_getApples(auth_header: &AuthHeader) -> Result<Vec<Apple>, LambdaError> {
//! //     fetch_apples()
//! // }
//! // lambdagen:end
//! ```
//!
//! The next run reads these blocks back so the declaration survives every
//! later regeneration unchanged.

const BEGIN: &str = "// lambdagen:deprecated ";
const END: &str = "// lambdagen:end";

/// A declaration recovered from a retained block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedBlock {
    /// Signature key
    pub key: String,
    /// Original declaration text
    pub declaration: String,
}

/// Comment out `declaration` under a marker for `key`
#[must_use]
pub fn render_block(key: &str, declaration: &str) -> String {
    let mut out = format!("{BEGIN}{key}\n");
    for line in declaration.lines() {
        if line.is_empty() {
            out.push_str("//\n");
        } else {
            out.push_str("// ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(END);
    out
}

/// Every well-formed retained block in `source`, in order
///
/// Unterminated blocks and blocks containing uncommented lines are skipped.
#[must_use]
pub fn parse_blocks(source: &str) -> Vec<RetainedBlock> {
    let mut blocks = Vec::new();
    let mut lines = source.lines();

    while let Some(line) = lines.next() {
        let Some(key) = line.trim_start().strip_prefix(BEGIN) else {
            continue;
        };
        let key = key.trim().to_string();
        let mut body = Vec::new();
        let mut closed = false;
        let mut malformed = false;

        for line in lines.by_ref() {
            let line = line.trim_start();
            if line.trim_end() == END {
                closed = true;
                break;
            }
            match line.strip_prefix("// ") {
                Some(rest) => body.push(rest),
                None if line.trim_end() == "//" => body.push(""),
                None => {
                    malformed = true;
                    break;
                }
            }
        }

        if key.is_empty() || !closed || malformed {
            tracing::warn!(key = %key, "ignoring damaged deprecated block");
            continue;
        }
        blocks.push(RetainedBlock {
            key,
            declaration: body.join("\n"),
        });
    }
    blocks
}
