//! Splitting of user-supplied flag and command strings.

use crate::error::{Error, Result};

/// Split a flag or command string into arguments, shell style.
///
/// Whitespace separates arguments. Single quotes keep everything literal,
/// double quotes allow `\"` and `\\` escapes, and a backslash outside quotes
/// escapes the next character. Quote characters never reach the argument.
pub fn split_args(input: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    // Distinguishes `""` (an empty argument) from no argument at all.
    let mut in_arg = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_arg = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(Error::Tokenize(format!("unclosed ' in {input:?}"))),
                    }
                }
            }
            '"' => {
                in_arg = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => {
                                return Err(Error::Tokenize(format!("unclosed \" in {input:?}")));
                            }
                        },
                        Some(c) => current.push(c),
                        None => return Err(Error::Tokenize(format!("unclosed \" in {input:?}"))),
                    }
                }
            }
            '\\' => {
                in_arg = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => {
                        return Err(Error::Tokenize(format!("trailing backslash in {input:?}")));
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            c => {
                in_arg = true;
                current.push(c);
            }
        }
    }

    if in_arg {
        args.push(current);
    }

    Ok(args)
}

/// Split a comma-separated object list, dropping empty entries.
pub fn split_objects(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|obj| !obj.is_empty())
        .map(String::from)
        .collect()
}

/// Quote `word` so `sh` reads it back as a single word.
///
/// Words made only of safe characters are returned unchanged.
pub fn shell_quote(word: &str) -> String {
    let safe = |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '+' | ',' | '=')
    };
    if !word.is_empty() && word.chars().all(safe) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}
