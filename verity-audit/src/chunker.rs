/// Split `text` into chunks of at most `max_len` characters, breaking only
/// between lines.
///
/// A line is everything up to and including its `\n`, or the trailing
/// remainder. A single line longer than `max_len` is emitted on its own as an
/// oversized chunk rather than being cut. Concatenating the chunks yields
/// `text` again, and no chunk is empty.
pub fn chunk_report(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0_usize;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if !current.is_empty() && current_len + line_len > max_len {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
