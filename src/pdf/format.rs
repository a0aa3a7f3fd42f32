//! Text measurement and number formatting shared by layout and drawing.

/// `1234.5` -> `"1 234,50 €"`. Two decimals, space-grouped thousands.
pub fn format_money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // "-0,00 €" would be noise for amounts that round to zero
    let negative = amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!(
        "{}{},{} €",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac
    )
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Shortest decimal form with a comma separator, at most three decimals.
pub fn format_quantity(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let fixed = format!("{value:.3}");
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    trimmed.replace('.', ",")
}

pub fn format_rate(rate: f64) -> String {
    format_quantity(rate)
}

/// Greedy word wrap on whitespace, counting chars. A word longer than
/// `max_chars` sits alone on its own (overflowing) line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

pub fn line_count(text: &str, max_chars: usize) -> usize {
    wrap_text(text, max_chars).len()
}

/// Shorten a project description for the quote subject line: over 100 chars,
/// keep the first sentence if it is short enough, else the first 90 chars.
pub fn summarize(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= 100 {
        return text.to_string();
    }
    if let Some(end) = first_sentence_end(text) {
        let sentence = text[..end].trim();
        if sentence.chars().count() < 100 {
            return sentence.to_string();
        }
    }
    let head: String = text.chars().take(90).collect();
    format!("{head}...")
}

fn first_sentence_end(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if i == 0 || !matches!(c, '.' | '!' | '?') {
            continue;
        }
        match chars.peek() {
            None => return Some(text.len()),
            Some((_, next)) if next.is_whitespace() => return Some(i + c.len_utf8()),
            _ => {}
        }
    }
    None
}

/// Keep at most `max` lines; when lines were dropped the last kept line ends in "...".
pub fn limit_lines(mut lines: Vec<String>, max: usize) -> Vec<String> {
    if lines.len() <= max || max == 0 {
        lines.truncate(max);
        return lines;
    }
    lines.truncate(max);
    if let Some(last) = lines.last_mut() {
        let keep = last.chars().count().saturating_sub(3);
        let mut shortened: String = last.chars().take(keep).collect();
        shortened.push_str("...");
        *last = shortened;
    }
    lines
}
