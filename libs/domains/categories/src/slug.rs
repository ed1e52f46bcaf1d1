use deunicode::deunicode;

/// URL-safe form of a display name.
///
/// Letters are transliterated to ASCII first ("Caffè" becomes "caffe"), then
/// every run of non-alphanumerics collapses to one `-` with none at either end.
///
/// ```
/// use domain_categories::slugify;
///
/// assert_eq!(slugify("Pizze"), "pizze");
/// assert_eq!(slugify("  Primi & Secondi!  "), "primi-secondi");
/// ```
pub fn slugify(name: &str) -> String {
    let ascii = deunicode(name);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
