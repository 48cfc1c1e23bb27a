/// Preferred break points, tried in order
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Splits long text into overlapping chunks for summarization
///
/// Sizes are counted in characters. Each chunk ends on a paragraph, line or
/// word boundary when one exists in the back half of the window; otherwise the
/// chunk is cut at exactly `chunk_size`.
#[derive(Debug, Clone, Copy)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let hard_end = (start + self.chunk_size).min(chars.len());
            let end = if hard_end == chars.len() {
                hard_end
            } else {
                Self::break_point(&chars[start..hard_end])
                    .map(|offset| start + offset)
                    .unwrap_or(hard_end)
            };

            let chunk: String = chars[start..end].iter().collect();
            let chunk = chunk.trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }

            if end == chars.len() {
                break;
            }

            let next = end.saturating_sub(self.chunk_overlap);
            start = if next > start { next } else { end };
        }

        chunks
    }

    /// Offset just past the last separator in the back half of `window`
    fn break_point(window: &[char]) -> Option<usize> {
        let min = window.len() / 2;
        for sep in SEPARATORS {
            let sep: Vec<char> = sep.chars().collect();
            if window.len() < sep.len() {
                continue;
            }
            let found = (min..=window.len() - sep.len())
                .rev()
                .find(|&i| window[i..i + sep.len()] == sep[..]);
            if let Some(pos) = found {
                return Some(pos + sep.len());
            }
        }
        None
    }
}
