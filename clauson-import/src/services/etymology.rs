//! Etymology code expansion
//!
//! Maps the dictionary's short etymology codes to readable labels. A `?` in
//! the code marks the attribution as uncertain and is carried over to the
//! label as a single trailing `?`. Unknown codes pass through unchanged.

/// Every code with a known label, in dictionary order
pub const KNOWN_CODES: [&str; 15] = [
    "D", "Basic", "VU", "S", "F", "E", "PU", "C", "VUD", "DF", "PUD", "VUF", "PUF", "SF", "DC",
];

/// Look up the label for an exact code
///
/// Codes are case-sensitive. Returns `None` for unknown codes.
pub fn lookup_label(code: &str) -> Option<&'static str> {
    let label = match code {
        "D" => "Derived",
        "Basic" => "Basic",
        "VU" => "Verbum Unicum",
        "S" => "See",
        "F" => "Foreign Loan Word",
        "E" => "Error",
        "PU" => "Problematical/Uncertain",
        "C" => "Chinese",

        // Composite codes
        "VUD" => "Verbum Unicum, Derived",
        "DF" => "Derived, Foreign",
        "PUD" => "Problematical, Derived",
        "VUF" => "Verbum Unicum, Foreign",
        "PUF" => "Problematical, Foreign",
        "SF" => "See, Foreign",
        "DC" => "Derived, Chinese",

        _ => return None,
    };
    Some(label)
}

/// Expand an etymology code to its label
///
/// - `""` → `""`
/// - exact match → label
/// - match after removing every `?` → label + `?`
/// - otherwise the code itself
pub fn expand(code: &str) -> String {
    if code.is_empty() {
        return String::new();
    }

    if let Some(label) = lookup_label(code) {
        return label.to_string();
    }

    if code.contains('?') {
        let clean_code = code.replace('?', "");
        if let Some(label) = lookup_label(&clean_code) {
            return format!("{}?", label);
        }
    }

    code.to_string()
}
