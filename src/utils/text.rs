use unicode_segmentation::UnicodeSegmentation;

/// Shorten `text` to at most `max_graphemes` user-perceived characters,
/// appending `...` when anything was cut. Never splits a grapheme cluster.
pub fn preview(text: &str, max_graphemes: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max_graphemes).collect();
    if graphemes.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
