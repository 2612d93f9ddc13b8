//! Language detection from filenames and content.
//!
//! Maps file extensions to display language names via a fixed table, with
//! content-based heuristics as a fallback. The display name feeds both the
//! review prompt and the comment stripper.

/// Extension → display name. Extensions are matched lowercased, with the dot.
const EXTENSION_MAP: &[(&str, &str)] = &[
    (".py", "Python"),
    (".js", "JavaScript"),
    (".jsx", "JavaScript (React)"),
    (".ts", "TypeScript"),
    (".tsx", "TypeScript (React)"),
    (".java", "Java"),
    (".go", "Go"),
    (".rs", "Rust"),
    (".cpp", "C++"),
    (".c", "C"),
    (".cs", "C#"),
    (".rb", "Ruby"),
    (".php", "PHP"),
    (".swift", "Swift"),
    (".kt", "Kotlin"),
    (".scala", "Scala"),
    (".r", "R"),
    (".sql", "SQL"),
    (".html", "HTML"),
    (".css", "CSS"),
    (".sh", "Shell"),
    (".bash", "Bash"),
    (".ps1", "PowerShell"),
    (".yaml", "YAML"),
    (".yml", "YAML"),
    (".json", "JSON"),
    (".xml", "XML"),
    (".dart", "Dart"),
    (".lua", "Lua"),
    (".zig", "Zig"),
];

/// Detect the programming language of `code`.
///
/// Tries the filename extension first, then content heuristics over the
/// first 500 characters, then `"Unknown"`.
pub fn detect_language(filename: Option<&str>, code: &str) -> String {
    if let Some(name) = filename {
        let ext = std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()));
        if let Some(ext) = ext {
            if let Some((_, display)) = EXTENSION_MAP.iter().find(|(e, _)| **e == ext) {
                return (*display).to_string();
            }
        }
    }

    let first_chunk: String = code.chars().take(500).collect::<String>().to_lowercase();
    if first_chunk.contains("#!/usr/bin/env python")
        || (first_chunk.contains("import ") && first_chunk.contains("def "))
    {
        return "Python".to_string();
    }
    if first_chunk.contains("function ")
        || first_chunk.contains("const ")
        || first_chunk.contains("=>")
    {
        return "JavaScript".to_string();
    }
    if first_chunk.contains("public class ") || first_chunk.contains("public static void main") {
        return "Java".to_string();
    }
    if first_chunk.contains("package main") {
        return "Go".to_string();
    }
    if first_chunk.contains("#include") {
        return "C/C++".to_string();
    }

    "Unknown".to_string()
}

/// All known (extension, display name) pairs, for `critiq languages`.
pub fn known_languages() -> &'static [(&'static str, &'static str)] {
    EXTENSION_MAP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_extensions() {
        assert_eq!(detect_language(Some("main.rs"), ""), "Rust");
        assert_eq!(detect_language(Some("app.py"), ""), "Python");
        assert_eq!(detect_language(Some("Component.tsx"), ""), "TypeScript (React)");
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert_eq!(detect_language(Some("MAIN.RS"), ""), "Rust");
    }

    #[test]
    fn python_content_heuristic() {
        let code = "import os\n\ndef main():\n    pass\n";
        assert_eq!(detect_language(None, code), "Python");
    }

    #[test]
    fn shebang_heuristic() {
        let code = "#!/usr/bin/env python\nprint('hi')\n";
        assert_eq!(detect_language(None, code), "Python");
    }

    #[test]
    fn go_content_heuristic() {
        assert_eq!(detect_language(None, "package main\n\nfunc main() {}\n"), "Go");
    }

    #[test]
    fn unknown_when_nothing_matches() {
        assert_eq!(detect_language(Some("notes.txt"), "plain words"), "Unknown");
        assert_eq!(detect_language(None, "plain words"), "Unknown");
    }

    #[test]
    fn extension_wins_over_content() {
        let code = "package main\n";
        assert_eq!(detect_language(Some("tool.py"), code), "Python");
    }
}
