//! Code block languages accepted by Notion.
//!
//! Highlighter class names (`language-js`, `lang-py`) are mapped onto the
//! fixed language list of the Notion API. Anything else is left unset and
//! published as plain text.

/// Language names accepted by the Notion `code` block.
const NOTION_LANGUAGES: &[&str] = &[
    "abap",
    "arduino",
    "bash",
    "basic",
    "c",
    "c#",
    "c++",
    "clojure",
    "coffeescript",
    "css",
    "dart",
    "diff",
    "docker",
    "elixir",
    "elm",
    "erlang",
    "f#",
    "flow",
    "fortran",
    "gherkin",
    "glsl",
    "go",
    "graphql",
    "groovy",
    "haskell",
    "html",
    "java",
    "javascript",
    "json",
    "julia",
    "kotlin",
    "latex",
    "less",
    "lisp",
    "livescript",
    "lua",
    "makefile",
    "markdown",
    "markup",
    "matlab",
    "mermaid",
    "nix",
    "objective-c",
    "ocaml",
    "pascal",
    "perl",
    "php",
    "plain text",
    "powershell",
    "prolog",
    "protobuf",
    "python",
    "r",
    "reason",
    "ruby",
    "rust",
    "sass",
    "scala",
    "scheme",
    "scss",
    "shell",
    "sql",
    "swift",
    "typescript",
    "vb.net",
    "verilog",
    "vhdl",
    "visual basic",
    "webassembly",
    "xml",
    "yaml",
];

/// Map a highlighter language name onto a Notion language.
///
/// Matching is case-insensitive. Returns `None` for languages Notion does not
/// know, which callers publish as plain text.
///
/// ```
/// use notionize_blocks::notion_language;
///
/// assert_eq!(notion_language("JS"), Some("javascript"));
/// assert_eq!(notion_language("jinja2"), Some("html"));
/// assert_eq!(notion_language("brainfuck"), None);
/// ```
#[must_use]
pub fn notion_language(name: &str) -> Option<&'static str> {
    let name = name.trim().to_ascii_lowercase();
    let canonical = match name.as_str() {
        "js" | "jsx" | "node" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" | "py3" | "python3" | "pycon" | "ipython" => "python",
        "rs" => "rust",
        "rb" => "ruby",
        "sh" | "zsh" | "ksh" => "shell",
        "console" | "shell-session" | "shellsession" => "bash",
        "ps1" | "pwsh" | "ps" => "powershell",
        "yml" => "yaml",
        "md" => "markdown",
        "jinja" | "jinja2" | "j2" | "htmldjango" | "django" | "xhtml" => "html",
        "svg" | "xsl" | "xslt" => "xml",
        "dockerfile" => "docker",
        "make" | "mk" => "makefile",
        "cpp" | "cxx" | "hpp" | "cc" => "c++",
        "csharp" | "cs" => "c#",
        "fsharp" | "fs" => "f#",
        "objc" | "objectivec" => "objective-c",
        "golang" => "go",
        "kt" | "kts" => "kotlin",
        "tex" => "latex",
        "proto" => "protobuf",
        "gql" => "graphql",
        "hs" => "haskell",
        "ex" | "exs" => "elixir",
        "erl" => "erlang",
        "clj" | "cljs" => "clojure",
        "coffee" => "coffeescript",
        "vb" | "vbnet" => "vb.net",
        "wasm" | "wat" => "webassembly",
        "text" | "txt" | "plain" | "plaintext" | "none" => "plain text",
        "jsonc" | "json5" => "json",
        "patch" | "udiff" => "diff",
        "feature" | "cucumber" => "gherkin",
        other => other,
    };
    NOTION_LANGUAGES
        .binary_search(&canonical)
        .ok()
        .map(|idx| NOTION_LANGUAGES[idx])
}

/// Extract the language from a highlighter class list.
///
/// Recognizes `language-<name>` and `lang-<name>` classes.
pub(crate) fn language_from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    classes.into_iter().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|name| !name.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_list_is_sorted() {
        let mut sorted = NOTION_LANGUAGES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, NOTION_LANGUAGES);
    }

    #[test]
    fn test_direct_names() {
        assert_eq!(notion_language("python"), Some("python"));
        assert_eq!(notion_language("rust"), Some("rust"));
        assert_eq!(notion_language("c++"), Some("c++"));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(notion_language("js"), Some("javascript"));
        assert_eq!(notion_language("py"), Some("python"));
        assert_eq!(notion_language("yml"), Some("yaml"));
        assert_eq!(notion_language("sh"), Some("shell"));
        assert_eq!(notion_language("console"), Some("bash"));
        assert_eq!(notion_language("jinja2"), Some("html"));
        assert_eq!(notion_language("text"), Some("plain text"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(notion_language("PYTHON"), Some("python"));
        assert_eq!(notion_language(" Yaml "), Some("yaml"));
    }

    #[test]
    fn test_unsupported_is_none() {
        assert_eq!(notion_language("unsupported"), None);
        assert_eq!(notion_language(""), None);
    }

    #[test]
    fn test_language_from_classes() {
        assert_eq!(
            language_from_classes(["highlight", "language-python"]),
            Some("python")
        );
        assert_eq!(language_from_classes(["lang-js"]), Some("js"));
        assert_eq!(language_from_classes(["language-"]), None);
        assert_eq!(language_from_classes(["highlight"]), None);
    }
}
