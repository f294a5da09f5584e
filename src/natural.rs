//! Natural ("human") ordering of file names, so that `2.mp4` comes before `10.mp4`.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Text(String),
    Number(&'a str),
}

/// Splits a name into alternating text and digit runs.
///
/// The result always starts and ends with a text run (possibly empty), so two
/// names compared chunk by chunk always line up text against text and number
/// against number.
fn chunks(name: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut rest = name;
    loop {
        let text_end = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        out.push(Chunk::Text(rest[..text_end].to_lowercase()));
        rest = &rest[text_end..];
        if rest.is_empty() {
            return out;
        }

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        out.push(Chunk::Number(&rest[..digits_end]));
        rest = &rest[digits_end..];
    }
}

/// Compares two digit runs by value without parsing, so runs of any length work.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_chunk(a: &Chunk<'_>, b: &Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
        (Chunk::Number(a), Chunk::Number(b)) => compare_digits(a, b),
        // Chunks alternate from a shared text start; mixed pairs never line up.
        (Chunk::Text(_), Chunk::Number(_)) => Ordering::Less,
        (Chunk::Number(_), Chunk::Text(_)) => Ordering::Greater,
    }
}

/// Total natural order: digit runs by numeric value, text runs case-insensitively,
/// falling back to plain string order when the two keys are equal.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);
    for (x, y) in left.iter().zip(right.iter()) {
        let ord = compare_chunk(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}
