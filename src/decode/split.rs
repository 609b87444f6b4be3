//! Splitting raw file content into logical records.

/// Lines of a line-oriented file.
///
/// The element after the final newline is not a record and is dropped. A
/// file without a trailing newline keeps its last line.
pub fn lines(content: &str) -> impl Iterator<Item = &str> {
    let body = content.strip_suffix('\n').unwrap_or(content);
    let empty = body.is_empty();
    body.split('\n').filter(move |_| !empty)
}

/// Like [`lines`], after unconditionally dropping `header` leading lines.
///
/// Returns `None` if the content is shorter than the header.
pub fn lines_after_header(content: &str, header: usize) -> Option<impl Iterator<Item = &str>> {
    let mut rest = content;
    for _ in 0..header {
        let (_, tail) = rest.split_once('\n')?;
        rest = tail;
    }
    Some(lines(rest))
}

/// Blank-line separated blocks of lines (cpuinfo layout).
///
/// The final block is emitted even if no blank line follows it. Runs of
/// blank lines never produce empty blocks.
pub fn blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Splits a "label: value" line at its first colon and trims both sides.
///
/// Lines without a colon yield `None`.
pub fn label_value(line: &str) -> Option<(&str, &str)> {
    let (label, value) = line.split_once(':')?;
    Some((label.trim(), value.trim()))
}

/// All "label: value" pairs of a whole-file label block, in file order.
pub fn label_values(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content.lines().filter_map(label_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_drops_trailing_entry() {
        let records: Vec<&str> = lines("a\nb\n").collect();
        assert_eq!(records, vec!["a", "b"]);

        let records: Vec<&str> = lines("a\nb").collect();
        assert_eq!(records, vec!["a", "b"]);

        assert_eq!(lines("").count(), 0);
        assert_eq!(lines("\n").count(), 0);
    }

    #[test]
    fn test_lines_after_header() {
        let content = "h1\nh2\nx\ny\n";
        let records: Vec<&str> = lines_after_header(content, 2).unwrap().collect();
        assert_eq!(records, vec!["x", "y"]);

        assert_eq!(lines_after_header("h1\nh2\n", 2).unwrap().count(), 0);
        assert!(lines_after_header("h1", 2).is_none());
    }

    #[test]
    fn test_blocks() {
        let content = "a: 1\nb: 2\n\na: 3\nb: 4\n\n";
        let blocks = blocks(content);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], vec!["a: 3", "b: 4"]);
    }

    #[test]
    fn test_blocks_without_final_blank_line() {
        let content = "a: 1\n\n\n\na: 2";
        let blocks = blocks(content);
        assert_eq!(blocks, vec![vec!["a: 1"], vec!["a: 2"]]);
    }

    #[test]
    fn test_label_value() {
        assert_eq!(
            label_value("model name\t: Intel(R) Xeon(R)"),
            Some(("model name", "Intel(R) Xeon(R)"))
        );
        assert_eq!(label_value("cpu MHz\t\t: 2.5"), Some(("cpu MHz", "2.5")));
        assert_eq!(label_value("no colon here"), None);
        assert_eq!(label_value("Name:"), Some(("Name", "")));
    }

    #[test]
    fn test_label_values_skips_plain_lines() {
        let pairs: Vec<_> = label_values("A: 1\ngarbage\nB:\t2 kB\n").collect();
        assert_eq!(pairs, vec![("A", "1"), ("B", "2 kB")]);
    }
}
