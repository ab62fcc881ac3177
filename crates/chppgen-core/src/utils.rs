/// Uppercase the first character, leaving the rest untouched.
///
/// # Examples
/// ```
/// use chppgen_core::utils::upper_first;
/// assert_eq!(upper_first("wwan"), "Wwan");
/// assert_eq!(upper_first("cellInfo"), "CellInfo");
/// ```
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character, leaving the rest untouched.
///
/// # Examples
/// ```
/// use chppgen_core::utils::lower_first;
/// assert_eq!(lower_first("CellInfoResult"), "cellInfoResult");
/// ```
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert camelCase or PascalCase to SCREAMING_SNAKE_CASE.
///
/// # Examples
/// ```
/// use chppgen_core::utils::to_screaming_snake_case;
/// assert_eq!(to_screaming_snake_case("wwanTypes"), "WWAN_TYPES");
/// ```
pub fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.push(c);
        } else if c == '-' || c == '.' {
            result.push('_');
        } else {
            result.push(c.to_ascii_uppercase());
        }
    }
    result
}
