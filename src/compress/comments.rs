//! Language-aware full-line comment removal.
//!
//! Only full-line comments are removed. Trailing comments on code lines
//! are left alone: reliably splitting them would require real lexing to
//! avoid mangling string literals, and the savings are marginal.

/// Languages whose comments start with `//`.
const SLASH_LANGS: &[&str] = &[
    "javascript",
    "typescript",
    "java",
    "go",
    "rust",
    "c",
    "c++",
    "c#",
    "swift",
    "kotlin",
    "scala",
    "dart",
    "zig",
];

/// Languages whose comments start with `#`.
const HASH_LANGS: &[&str] = &[
    "python",
    "ruby",
    "shell",
    "bash",
    "powershell",
    "r",
    "yaml",
];

/// Remove full-line inline comments from `code`.
///
/// Doc-comment lines (`///`, `/**`), shebangs (`#!`) and type-hint
/// comments (`# type:`) are preserved verbatim. Languages outside the
/// known comment families pass through unchanged. The language label is
/// matched case-insensitively. Idempotent.
pub fn strip_inline_comments(code: &str, language: &str) -> String {
    let lang = language.to_lowercase();
    let is_slash = SLASH_LANGS.contains(&lang.as_str());
    let is_hash = HASH_LANGS.contains(&lang.as_str());

    if !is_slash && !is_hash {
        return code.to_string();
    }

    let mut result_lines = Vec::new();
    for line in code.lines() {
        let stripped = line.trim_start();

        if is_slash {
            if stripped.starts_with("///") || stripped.starts_with("/**") {
                result_lines.push(line); // doc comment, keep
            } else if stripped.starts_with("//") {
                continue; // remove full-line comment
            } else {
                result_lines.push(line);
            }
        } else if stripped.starts_with("#!") || stripped.starts_with("# type:") {
            result_lines.push(line); // shebang or type hint, keep
        } else if stripped.starts_with('#') {
            continue; // remove full-line comment
        } else {
            result_lines.push(line);
        }
    }

    result_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_language_drops_full_line_comments() {
        let code = "// setup\nlet x = 1;\n  // indented comment\nlet y = 2;";
        let out = strip_inline_comments(code, "Rust");
        assert_eq!(out, "let x = 1;\nlet y = 2;");
    }

    #[test]
    fn slash_language_keeps_doc_comments() {
        let code = "/// Does the thing.\nfn thing() {}\n/** Block doc */\nfn other() {}";
        let out = strip_inline_comments(code, "rust");
        assert_eq!(out, code);
    }

    #[test]
    fn trailing_comments_not_stripped() {
        let code = "let x = 1; // note";
        assert_eq!(strip_inline_comments(code, "rust"), code);
        let py = "x = 1  # note";
        assert_eq!(strip_inline_comments(py, "Python"), py);
    }

    #[test]
    fn hash_language_keeps_shebang_and_type_hints() {
        let code = "#!/usr/bin/env python\n# just a comment\nx = 1\n# type: int";
        let out = strip_inline_comments(code, "Python");
        assert_eq!(out, "#!/usr/bin/env python\nx = 1\n# type: int");
    }

    #[test]
    fn unknown_language_passes_through() {
        let code = "# looks like a comment\n// also this";
        assert_eq!(strip_inline_comments(code, "Haskell"), code);
    }

    #[test]
    fn language_matching_is_case_insensitive() {
        let code = "// gone\ncode();";
        assert_eq!(strip_inline_comments(code, "JavaScript"), "code();");
        assert_eq!(strip_inline_comments(code, "JAVASCRIPT"), "code();");
    }

    #[test]
    fn stripping_is_idempotent() {
        let code = "// comment\nfn main() {} // trailing\n/// doc\nfn f() {}";
        let once = strip_inline_comments(code, "rust");
        let twice = strip_inline_comments(&once, "rust");
        assert_eq!(once, twice);
    }
}
