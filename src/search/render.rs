//! Length-bounded rendering of search results.

use super::query::Suggestion;

/// Maximum rendered length, in characters, of one result page.
pub const DEFAULT_DISPLAY_LIMIT: usize = 2048;

/// Join suggestion lines with newlines, stopping at the last whole line that
/// fits within `max_chars`.
///
/// Returns the rendered text and the number of lines it contains. A line is
/// never split; if even the first line does not fit, nothing is shown.
pub fn render_page(suggestions: &[Suggestion], max_chars: usize) -> (String, usize) {
    let mut page = String::new();
    let mut used = 0;
    let mut shown = 0;

    for suggestion in suggestions {
        let line = suggestion.line();
        let separator = usize::from(shown > 0);
        let needed = separator + line.chars().count();
        if used + needed > max_chars {
            break;
        }
        if separator == 1 {
            page.push('\n');
        }
        page.push_str(&line);
        used += needed;
        shown += 1;
    }

    (page, shown)
}
