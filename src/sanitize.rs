//! Pure text transformations applied by the front-matter renderer: stripping
//! fixed-typography declarations from extracted CSS rules and normalizing
//! inline `style` attributes so media scales responsively instead of
//! carrying the export's fixed pixel dimensions.

use std::sync::LazyLock;

use regex::Regex;

/// One fixed pattern per removable declaration family, matched
/// case-insensitively with surrounding whitespace. The families are
/// disjoint, so the order of removal does not affect the result.
static TYPOGRAPHY_DECLARATIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // font-family: a quoted string list.
        r#"(?i)\s*font-family:\s*(?:'[^']*'|"[^"]*")(?:\s*,\s*(?:'[^']*'|"[^"]*"))*\s*;"#,
        // Sized declarations: a numeric value with a pt/px/rem/em unit.
        r"(?i)\s*(?:font-size|margin(?:-(?:top|right|bottom|left))?|padding(?:-(?:top|right|bottom|left))?):\s*-?\d+(?:\.\d+)?(?:pt|px|rem|em)\s*;",
        // line-height: a unitless decimal.
        r"(?i)\s*line-height:\s*\d+(?:\.\d+)?\s*;",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap()) // the patterns are literals
    .collect()
});

/// Removes every fixed-typography declaration (`font-family`, `font-size`,
/// `line-height`, `margin`/`padding` and their directional variants) from a
/// block of CSS text. Declarations the patterns do not recognize--shorthand
/// multi-value margins, unquoted font stacks--are left in place.
pub fn strip_typography(css: &str) -> String {
    let mut stripped = css.to_owned();
    for declaration in TYPOGRAPHY_DECLARATIONS.iter() {
        stripped = declaration.replace_all(&stripped, "").into_owned();
    }
    stripped.trim().to_owned()
}

/// Normalizes one inline `style` attribute value. Returns `None` when the
/// style carries no `width:` declaration, meaning the attribute should be
/// dropped entirely. Otherwise fixed dimensions become maximums
/// (`width:`/`height:` to `max-width:`/`max-height:`, never doubling an
/// existing `max-` prefix) and `width:100%;` is prefixed so the element
/// scales to its container.
pub fn normalize_inline_style(style: &str) -> Option<String> {
    if !style.contains("width:") {
        return None;
    }

    let bounded = style
        .replace("width:", "max-width:")
        .replace("height:", "max-height:")
        .replace("max-max-width:", "max-width:")
        .replace("max-max-height:", "max-height:");
    Some(format!("width:100%;{}", bounded))
}
