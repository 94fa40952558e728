//! Progressive reveal of an already-received answer.

/// Glyph drawn after the revealed prefix while the reveal is running.
pub const CURSOR: char = '▌';

/// Frames of the typewriter reveal for `text`.
///
/// For a text of `n` characters this yields `n + 2` frames: the prefixes of
/// length `0..=n`, each followed by [`CURSOR`], then the full text without
/// the cursor. Prefixes are cut on `char` boundaries.
pub fn reveal_steps(text: &str) -> Vec<String> {
    let mut frames = Vec::with_capacity(text.chars().count() + 2);
    let mut prefix = String::with_capacity(text.len() + CURSOR.len_utf8());

    frames.push(CURSOR.to_string());
    for ch in text.chars() {
        prefix.push(ch);
        let mut frame = prefix.clone();
        frame.push(CURSOR);
        frames.push(frame);
    }
    frames.push(text.to_string());

    frames
}
