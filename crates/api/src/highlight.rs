//! Parsing of the `<mark>…</mark>` highlight markup in search snippets.

const OPEN: &str = "<mark>";
const CLOSE: &str = "</mark>";

/// A run of snippet text, highlighted or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

/// Split a snippet into plain and highlighted segments.
///
/// An unterminated `<mark>` highlights the rest of the snippet. Stray closing
/// tags are dropped. Empty segments are never emitted.
pub fn segments(snippet: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = snippet;
    let mut highlighted = false;

    while !rest.is_empty() {
        let tag = if highlighted { CLOSE } else { OPEN };
        let (text, next, toggles) = match rest.find(tag) {
            Some(pos) => (&rest[..pos], &rest[pos + tag.len()..], true),
            None => (rest, "", false),
        };
        push_text(&mut out, text, highlighted);
        rest = next;
        if toggles {
            highlighted = !highlighted;
        }
    }
    out
}

fn push_text<'a>(out: &mut Vec<Segment<'a>>, text: &'a str, highlighted: bool) {
    if highlighted {
        if !text.is_empty() {
            out.push(Segment { text, highlighted });
        }
        return;
    }
    // Plain runs may still contain stray closing tags.
    for piece in text.split(CLOSE) {
        if !piece.is_empty() {
            out.push(Segment {
                text: piece,
                highlighted,
            });
        }
    }
}

/// Snippet with all markup removed.
pub fn plain_text(snippet: &str) -> String {
    segments(snippet).iter().map(|s| s.text).collect()
}
