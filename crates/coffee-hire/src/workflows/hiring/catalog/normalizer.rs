/// Canonical form used for city comparisons. City names arrive in Cyrillic as often as in
/// Latin script, so this folds case with full Unicode rules. `ё` is written as `е` in
/// about half of the sheets, so both spellings compare equal.
pub(crate) fn normalize_city(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{a0}'], " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase().replace('ё', "е")
}
