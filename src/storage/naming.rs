//! On-disk names for folders and requests.
//!
//! Every node is written under a name that starts with its ordinal, so that a
//! plain directory listing sorts siblings back into document order:
//!
//! - requests: `001-GET-List-Users.json`
//! - folders: `002-Auth/`
//!
//! Names are sanitized for the filesystem, which makes the mapping lossy in
//! one direction. The authoritative node name is always stored inside the
//! JSON file; the extractors in this module only recover a best-effort name
//! for files that lack one.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{decode_ordinal, Ordinal};

/// Replacement name for nodes whose name sanitizes to nothing.
pub const UNTITLED: &str = "untitled";

/// The file extension of every primary and sidecar file.
pub const JSON_EXTENSION: &str = ".json";

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));
static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{3}[a-z]*)-").expect("valid regex"));
static METHOD_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+-").expect("valid regex"));
static COUNTER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([0-9]+\)$").expect("valid regex"));

/// Makes a name safe to use as a file or directory name.
///
/// Characters in the set `<>:"/\|?*` and runs of whitespace become a single
/// hyphen, repeated hyphens collapse into one and leading or trailing hyphens
/// are removed. Every other character, including parentheses and dots, is
/// kept.
///
/// # Examples
///
/// ```
/// use postman_fs::storage::sanitize;
///
/// assert_eq!(sanitize("Auth (v2)"), "Auth-(v2)");
/// assert_eq!(sanitize("  a / b  "), "a-b");
/// ```
#[must_use]
pub fn sanitize(name: &str) -> String {
    let replaced = INVALID_CHARS.replace_all(name, "-");
    let replaced = WHITESPACE.replace_all(&replaced, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&replaced, "-");
    collapsed.trim_matches('-').to_string()
}

/// Sanitizes a name, substituting [`UNTITLED`] if nothing is left.
fn sanitize_or_untitled(name: &str) -> String {
    let sanitized = sanitize(name);
    if sanitized.is_empty() {
        UNTITLED.to_string()
    } else {
        sanitized
    }
}

/// Builds the primary file name of a request.
///
/// The ordinal segment and its hyphen are omitted when `ordinal` is `None`.
///
/// # Examples
///
/// ```
/// use postman_fs::{storage::build_request_file_name, Ordinal};
///
/// let name = build_request_file_name("Get Users", "get", Ordinal::new(1));
/// assert_eq!(name, "001-GET-Get-Users.json");
/// assert_eq!(build_request_file_name("Get Users", "GET", None), "GET-Get-Users.json");
/// ```
#[must_use]
pub fn build_request_file_name(name: &str, method: &str, ordinal: Option<Ordinal>) -> String {
    let method = sanitize_or_untitled(&method.to_uppercase());
    let name = sanitize_or_untitled(name);
    match ordinal {
        Some(ordinal) => format!("{ordinal}-{method}-{name}{JSON_EXTENSION}"),
        None => format!("{method}-{name}{JSON_EXTENSION}"),
    }
}

/// Builds the directory name of a folder.
///
/// The ordinal segment and its hyphen are omitted when `ordinal` is `None`.
#[must_use]
pub fn build_folder_dir_name(name: &str, ordinal: Option<Ordinal>) -> String {
    let name = sanitize_or_untitled(name);
    match ordinal {
        Some(ordinal) => format!("{ordinal}-{name}"),
        None => name,
    }
}

/// Appends a duplicate counter to a file or directory name.
///
/// The counter goes before the `.json` extension when there is one:
/// `001-GET-a.json` becomes `001-GET-a(1).json`, `002-f` becomes `002-f(1)`.
#[must_use]
pub fn with_counter(name: &str, counter: usize) -> String {
    name.strip_suffix(JSON_EXTENSION).map_or_else(
        || format!("{name}({counter})"),
        |stem| format!("{stem}({counter}){JSON_EXTENSION}"),
    )
}

/// Recovers the ordinal from a file or directory name.
///
/// Returns `0` if the name does not start with an ordinal token followed by a
/// hyphen.
#[must_use]
pub fn ordinal_from_name(name: &str) -> usize {
    ORDINAL_PREFIX
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map_or(0, |token| decode_ordinal(token.as_str()))
}

/// Recovers a best-effort request name from a primary file name.
///
/// Strips the `.json` extension, the ordinal token, the method token and any
/// trailing duplicate counter. Sanitization is not undone, so
/// `001-GET-Get-Users.json` yields `Get-Users`.
#[must_use]
pub fn base_name_from_file_name(file_name: &str) -> String {
    let stem = file_name.strip_suffix(JSON_EXTENSION).unwrap_or(file_name);
    let without_ordinal = ORDINAL_PREFIX.replace(stem, "");
    let without_method = METHOD_PREFIX.replace(&without_ordinal, "");
    COUNTER_SUFFIX.replace(&without_method, "").into_owned()
}

/// Recovers a best-effort folder name from a directory name.
///
/// Strips the ordinal token and any trailing duplicate counter.
#[must_use]
pub fn base_name_from_folder_name(dir_name: &str) -> String {
    let without_ordinal = ORDINAL_PREFIX.replace(dir_name, "");
    COUNTER_SUFFIX.replace(&without_ordinal, "").into_owned()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn ordinal(n: usize) -> Option<Ordinal> {
        Ordinal::new(n)
    }

    #[test_case("Get Users", "Get-Users"; "spaces")]
    #[test_case("Get Users (Admin)", "Get-Users-(Admin)"; "parentheses kept")]
    #[test_case("Auth (v2)", "Auth-(v2)"; "folder example")]
    #[test_case(r#"a<b>c:d"e/f\g|h?i*j"#, "a-b-c-d-e-f-g-h-i-j"; "every invalid character")]
    #[test_case(r#"<>:"/\|?* "#, ""; "only invalid characters")]
    #[test_case("--a---b--", "a-b"; "hyphen runs and edges")]
    #[test_case("a \t\n b", "a-b"; "mixed whitespace")]
    #[test_case("v1.2 - beta", "v1.2-beta"; "hyphen surrounded by spaces")]
    fn sanitizes(input: &str, expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[test]
    fn request_file_name_includes_ordinal_and_method() {
        assert_eq!(
            build_request_file_name("Get Users", "GET", ordinal(1)),
            "001-GET-Get-Users.json"
        );
    }

    #[test]
    fn request_file_name_uppercases_method() {
        assert_eq!(
            build_request_file_name("x", "post", ordinal(12)),
            "012-POST-x.json"
        );
    }

    #[test]
    fn request_file_name_uses_overflow_ordinals() {
        assert_eq!(
            build_request_file_name("x", "GET", ordinal(1001)),
            "999b-GET-x.json"
        );
    }

    #[test]
    fn request_file_name_without_ordinal() {
        assert_eq!(
            build_request_file_name("Get Users", "GET", None),
            "GET-Get-Users.json"
        );
    }

    #[test]
    fn empty_sanitized_name_becomes_untitled() {
        assert_eq!(
            build_request_file_name("???", "GET", ordinal(3)),
            "003-GET-untitled.json"
        );
        assert_eq!(build_folder_dir_name("***", ordinal(1)), "001-untitled");
    }

    #[test]
    fn folder_dir_name_includes_ordinal() {
        assert_eq!(build_folder_dir_name("Auth (v2)", ordinal(2)), "002-Auth-(v2)");
        assert_eq!(build_folder_dir_name("Auth", None), "Auth");
    }

    #[test_case("001-GET-a.json", "001-GET-a(1).json"; "file")]
    #[test_case("002-f", "002-f(1)"; "directory")]
    fn appends_counter(name: &str, expected: &str) {
        assert_eq!(with_counter(name, 1), expected);
    }

    #[test_case("001-GET-Get-Users.json", 1)]
    #[test_case("042-Auth", 42)]
    #[test_case("999a-POST-x.json", 1000)]
    #[test_case("GET-x.json", 0; "no ordinal")]
    #[test_case("01-x", 0; "short ordinal")]
    #[test_case("001x", 0; "missing hyphen")]
    #[test_case("١٢٣-Users", 0; "arabic indic digits")]
    #[test_case("１２３-Users", 0; "fullwidth digits")]
    fn reads_ordinal(name: &str, expected: usize) {
        assert_eq!(ordinal_from_name(name), expected);
    }

    #[test_case("001-GET-Get-Users.json", "Get-Users")]
    #[test_case("999b-DELETE-User(2).json", "User")]
    #[test_case("GET-Get-Users.json", "Get-Users"; "no ordinal")]
    #[test_case("001-lower-case.json", "lower-case"; "no method token")]
    #[test_case("١٢٣-GET-Users.json", "١٢٣-GET-Users"; "non ascii digits are not an ordinal")]
    fn recovers_request_base_name(file_name: &str, expected: &str) {
        assert_eq!(base_name_from_file_name(file_name), expected);
    }

    #[test_case("002-Auth-(v2)", "Auth-(v2)")]
    #[test_case("003-Users(1)", "Users")]
    #[test_case("Plain", "Plain")]
    #[test_case("١٢٣-Users", "١٢٣-Users"; "non ascii digits are not an ordinal")]
    #[test_case("Users(١)", "Users(١)"; "non ascii counter is kept")]
    fn recovers_folder_base_name(dir_name: &str, expected: &str) {
        assert_eq!(base_name_from_folder_name(dir_name), expected);
    }
}
