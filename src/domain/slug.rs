//! URL-safe identifiers derived from display names.

/// Builds the slug for a category or product name.
///
/// Every character is transliterated to ASCII first, so Cyrillic, Greek and
/// CJK names keep their letters. The result is lowercased and every run of
/// other characters becomes a single `-`. Leading and trailing separators
/// are dropped.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        let ascii = if c.is_ascii() {
            None
        } else {
            deunicode::deunicode_char(c)
        };

        match ascii {
            Some(folded) => {
                for ch in folded.chars() {
                    push_char(&mut slug, &mut pending_dash, ch);
                }
            }
            None => push_char(&mut slug, &mut pending_dash, c),
        }
    }

    slug
}

fn push_char(slug: &mut String, pending_dash: &mut bool, ch: char) {
    if !ch.is_ascii_alphanumeric() {
        *pending_dash = true;
        return;
    }
    if *pending_dash && !slug.is_empty() {
        slug.push('-');
    }
    *pending_dash = false;
    slug.push(ch.to_ascii_lowercase());
}
