//! Line tokenizer for the shader source format
//!
//! Whitespace ends a token and is dropped. Each reserved character
//! (`= { } ; " ( ) ,`) is emitted as a token of its own. Everything else
//! accumulates into the current token.

/// Characters that end a token and are discarded
const DELIMITERS: [char; 4] = [' ', '\t', '\r', '\n'];

/// Characters that are always emitted as a single-character token
const RESERVED: [char; 8] = ['=', '{', '}', ';', '"', '(', ')', ','];

pub fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}

pub fn is_reserved(c: char) -> bool {
    RESERVED.contains(&c)
}

/// Split one source line into tokens
///
/// ```
/// use ember_3d_engine::ember3d::shader::tokenize;
///
/// let tokens = tokenize("cbuffer Camera : register(b0)");
/// assert_eq!(tokens, ["cbuffer", "Camera", ":", "register", "(", "b0", ")"]);
/// ```
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in line.chars() {
        if is_delimiter(c) {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else if is_reserved(c) {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(c.to_string());
        } else {
            current.push(c);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
#[path = "tokenizer_tests.rs"]
mod tests;
