use std::path::Path;

use tracing::trace;

use crate::domain::TVError;

/// Split a drop event payload into its paths.
///
/// Paths are separated by spaces. A path containing spaces arrives wrapped in
/// braces (`{My Data.csv}`); braces never nest and are not escaped. An empty
/// brace group yields an empty path. Extensions are not inspected here.
pub fn parse_path_list(raw: &str) -> Result<Vec<String>, TVError> {
    let mut paths = Vec::new();
    let mut name = String::new();
    let mut chars = raw.char_indices();

    while let Some((idx, chr)) = chars.next() {
        match chr {
            '{' => {
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => {
                            return Err(TVError::MalformedInput(format!(
                                "brace opened at position {idx} is never closed"
                            )));
                        }
                    }
                }
                paths.push(std::mem::take(&mut name));
            }
            ' ' => {
                if !name.is_empty() {
                    paths.push(std::mem::take(&mut name));
                }
            }
            c => name.push(c),
        }
    }
    if !name.is_empty() {
        paths.push(name);
    }

    trace!("Parsed {} paths from drop payload", paths.len());
    Ok(paths)
}

/// Name under which a path is shown in the file list.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("???")
        .to_string()
}

// Case insensitive match against extensions given without the leading dot.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
