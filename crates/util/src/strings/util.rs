/// Turns an arbitrary name into an identifier made of letters, digits and
/// underscores.
///
/// Path separators (`.`, `$`, `:`) become underscores, every other character
/// which is not a letter, digit or underscore is dropped. An empty result is
/// `_` and a result starting with a digit gets a leading underscore.
///
/// # Examples
///
/// ```
/// use mapgraph_util::strings::to_identifier;
///
/// assert_eq!(to_identifier("geo.Point"), "geo_Point");
/// assert_eq!(to_identifier("i32[]"), "i32");
/// assert_eq!(to_identifier("3d"), "_3d");
/// assert_eq!(to_identifier("[]"), "_");
/// ```
pub fn to_identifier(name: &str) -> String {
    let id: String = name
        .chars()
        .filter_map(|c| match c {
            '.' | '$' | ':' => Some('_'),
            c if c.is_alphanumeric() || c == '_' => Some(c),
            _ => None,
        })
        .collect();
    match id.chars().next() {
        None => "_".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{id}"),
        Some(_) => id,
    }
}

/// Lower-cases the first character.
///
/// ```
/// use mapgraph_util::strings::uncap_first;
///
/// assert_eq!(uncap_first("BigInt"), "bigInt");
/// assert_eq!(uncap_first(""), "");
/// ```
pub fn uncap_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Checks that `name` can be used as an XML element name.
///
/// A valid name starts with a letter or underscore, does not start with
/// `xml` in any case, and contains only letters, digits, hyphens,
/// underscores and periods.
pub fn is_valid_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_');
    starts_well
        && !name
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("xml"))
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
