//! Text-level canonicalization of the printed structural document.
//!
//! A fixed, ordered sequence of regex rewrites, each applied exactly once,
//! globally. These are textual repairs, not a grammar: an attribute value
//! that happens to look like one of the patterns gets rewritten too, which
//! is a known limitation of this pass.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::schema::normalizer::MAP_ATTR_MARKER;

lazy_static! {
    /// `"$${a.b.c}"` quoted escaped interpolation, three segments
    static ref RE_INTERP3: Regex =
        Regex::new(r#""\$\$\{([\w-]+\.[\w-]+\.[\w-]+)\}""#).unwrap();
    /// `"$${a.b}"` quoted escaped interpolation, two segments
    static ref RE_INTERP2: Regex = Regex::new(r#""\$\$\{([\w-]+\.[\w-]+)\}""#).unwrap();
    /// Quoted attribute key; keys containing `.` or starting with a digit
    /// fall outside the character classes and stay quoted
    static ref RE_QUOTED_KEY: Regex = Regex::new(r#""([A-Za-z_][A-Za-z0-9_-]*)" ="#).unwrap();
    /// Object-valued attribute directly following a non-blank line. Already
    /// canonicalized block headers sit behind a blank line and never rematch.
    static ref RE_OBJECT_ATTR: Regex =
        Regex::new(r"([^\n])\n([ \t]*)([A-Za-z0-9_-]+) = \{").unwrap();
    /// Block header (either form) at any indentation depth
    static ref RE_BLOCK_HEADER: Regex =
        Regex::new(r"\n([ \t]*[A-Za-z0-9_-]+ (= )?\{)").unwrap();
    static ref RE_MULTI_BLANK: Regex = Regex::new(r"\n{3,}").unwrap();
    static ref RE_RESOURCE_HEADER: Regex =
        Regex::new(r#""resource" "([^"]+)" "([^"]+)" \{"#).unwrap();
}

/// Repair the structural printer's raw output into canonical configuration
/// syntax. Idempotent over any text the printer can produce.
pub fn canonicalize(raw: &str) -> String {
    // 1. Turn quoted escaped interpolation strings into live expressions
    let text = RE_INTERP3.replace_all(raw, "$1");
    let text = RE_INTERP2.replace_all(&text, "$1");

    // 2. Strip quotes from attribute keys
    let text = RE_QUOTED_KEY.replace_all(&text, "$1 =");

    // 3. Object-as-attribute becomes a nested block, unless the key carries
    //    the literal nested-map marker; the marker itself is stripped
    let text = RE_OBJECT_ATTR.replace_all(&text, |caps: &Captures| {
        let key = &caps[3];

        match key.strip_suffix(MAP_ATTR_MARKER) {
            Some(stripped) => format!("{}\n{}{} = {{", &caps[1], &caps[2], stripped),
            None => format!("{}\n{}{} {{", &caps[1], &caps[2], key),
        }
    });

    // 4. Remove any marker that survived rule 3
    let text = text.replace(MAP_ATTR_MARKER, "");

    // 5. Blank line before every block header
    let text = RE_BLOCK_HEADER.replace_all(&text, "\n\n$1");

    // 6. Collapse double blank lines
    let text = RE_MULTI_BLANK.replace_all(&text, "\n\n");

    // 7. Blank line after every closing brace. The insertion is
    //    non-consuming, so adjacent closing braces each get one; the runs
    //    this creates collapse right back down.
    let text = text.replace("}\n", "}\n\n");
    let text = RE_MULTI_BLANK.replace_all(&text, "\n\n");

    // 8. Unquote the resource token of block headers
    let text = RE_RESOURCE_HEADER.replace_all(&text, "resource \"$1\" \"$2\" {");

    text.into_owned()
}
