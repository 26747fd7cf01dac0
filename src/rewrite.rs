use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::Path;

const BRACKET_INCLUDE: &str = "#include <";
const QUOTED_INCLUDE: &str = "#include \"";

/// Normalize the quoted-include block of a generated file so it no longer
/// references the internal build-root path.
///
/// Every rewritten line is padded with trailing spaces to its original byte
/// length, so no other byte offset in the file shifts.
pub fn rewrite_includes(path: &Path, marker: &str) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read generated file {}", path.display()))?;

    let rewritten = rewrite_include_block(&contents, marker)
        .with_context(|| format!("Failed to rewrite includes in {}", path.display()))?;

    if rewritten != contents {
        fs::write(path, rewritten)
            .with_context(|| format!("Failed to write rewritten file {}", path.display()))?;
    }

    Ok(())
}

/// Replace the first line of the documentation file starting with `prefix`
/// by `replacement`, padded to the original line length. All other lines
/// are left byte-identical.
pub fn rewrite_stamp(path: &Path, prefix: &str, replacement: &str) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let rewritten = rewrite_stamp_line(&contents, prefix, replacement)
        .with_context(|| format!("Failed to update the version stamp in {}", path.display()))?;

    if rewritten != contents {
        fs::write(path, rewritten)
            .with_context(|| format!("Failed to write stamped file {}", path.display()))?;
    }

    Ok(())
}

fn rewrite_include_block(input: &str, marker: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut in_block = false;
    let mut done = false;

    while !rest.is_empty() {
        let (line, terminator) = split_line(rest);
        rest = &rest[line.len() + terminator.len()..];

        if !done && line.starts_with(QUOTED_INCLUDE) {
            in_block = true;
            out.push_str(&strip_build_root(line, marker)?);
        } else {
            // Trailing carriage-control whitespace is stripped for
            // classification only; the line itself is copied untouched.
            let stripped = line.trim_end();
            let ends_block =
                in_block && !stripped.is_empty() && !stripped.starts_with(BRACKET_INCLUDE);
            if !done && ends_block {
                // End of the contiguous local-includes block. Anything that
                // merely looks like an include after this point stays as-is.
                done = true;
            }
            out.push_str(line);
        }

        out.push_str(terminator);
    }

    Ok(out)
}

fn strip_build_root(line: &str, marker: &str) -> Result<String> {
    let at = line
        .find(marker)
        .ok_or_else(|| anyhow!("include line has no `{}` segment: {}", marker, line.trim_end()))?;

    let mut rewritten = String::with_capacity(line.len());
    rewritten.push_str(QUOTED_INCLUDE);
    rewritten.push_str(&line[at + marker.len()..]);

    Ok(pad_line(rewritten, line.len()))
}

fn rewrite_stamp_line(input: &str, prefix: &str, replacement: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut replaced = false;

    while !rest.is_empty() {
        let (line, terminator) = split_line(rest);
        rest = &rest[line.len() + terminator.len()..];

        if !replaced && line.starts_with(prefix) {
            if replacement.len() > line.len() {
                bail!(
                    "replacement stamp is {} bytes but the original line is only {}",
                    replacement.len(),
                    line.len()
                );
            }
            out.push_str(&pad_line(replacement.to_string(), line.len()));
            replaced = true;
        } else {
            out.push_str(line);
        }

        out.push_str(terminator);
    }

    if !replaced {
        bail!("no line starting with `{}` found", prefix);
    }

    Ok(out)
}

/// Split off the first line, without its terminator, plus the terminator
/// itself (empty at end-of-file).
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(at) => (&s[..at], &s[at..at + 1]),
        None => (s, ""),
    }
}

fn pad_line(mut line: String, width: usize) -> String {
    while line.len() < width {
        line.push(' ');
    }
    line
}
