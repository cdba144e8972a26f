/// Leading word of a listing line, the mnemonic for instruction lines.
fn first_word(line: &str) -> &str {
    line.split(' ').next().unwrap_or(line)
}

/// Inserts blank lines around runs of lines sharing a leading word.
///
/// A run of two or more lines is closed by a blank line when the leading
/// word changes. A single line with a new word only gets a blank line in
/// front of it when the next line opens a run with that word, so isolated
/// instructions stay packed together. Lines themselves are never changed.
pub fn add_spacing(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let Some(first) = lines.first() else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len() + lines.len());
    let mut previous = first_word(first);
    let mut in_run = false;

    for (i, line) in lines.iter().enumerate() {
        let word = first_word(line);
        if word != previous {
            if in_run {
                previous = word;
                in_run = false;
                out.push('\n');
            } else if lines.get(i + 1).map(|next| first_word(next)) == Some(word) {
                previous = word;
                out.push('\n');
            }
        } else {
            in_run = true;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
