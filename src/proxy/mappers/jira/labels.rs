// Jira label sanitizing
// Jira rejects labels containing spaces; keep to [A-Za-z0-9_-].

const TRANSLITERATIONS: &[(char, &str)] = &[('ä', "ae"), ('ö', "oe"), ('ü', "ue"), ('ß', "ss")];

/// Sanitize a single label, `None` if nothing legal remains.
///
/// Example: "Fire Door" -> "Fire-Door", "Büro" -> "Buero", "!!!" -> None
pub fn sanitize_label(label: &str) -> Option<String> {
    let mut clean = String::with_capacity(label.len());

    for c in label.chars() {
        if c == ' ' {
            clean.push('-');
        } else if let Some((_, ascii)) = TRANSLITERATIONS.iter().find(|(from, _)| *from == c) {
            clean.push_str(ascii);
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            clean.push(c);
        }
    }

    if clean.is_empty() {
        None
    } else {
        Some(clean)
    }
}

/// Sanitize a list of labels, preserving order and dropping empties.
pub fn sanitize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .filter_map(|label| sanitize_label(label.as_ref()))
        .collect()
}
