//! Character tables used for kinsoku line breaking.

/// Whitespace that opens a break opportunity.
const SPACE_CHARS: &[char] = &['\n', '\t', '\u{0b}', ' ', '\u{3000}'];

/// Opening punctuation that must never end a line.
const OPENING_BRACKETS: &[char] = &[
    '(', '{', '[', '<', // ascii
    '「', '『', '（', '｛', '【', '＜', '≪', '［',
];

/// Characters that must never start a line.
const FORBIDDEN_LEADING: &[char] = &[
    // punctuation
    '、', '。', '.', ',', //
    // small kana
    'ぁ', 'ぃ', 'ぅ', 'ぇ', 'ぉ', 'っ', 'ゃ', 'ゅ', 'ょ', //
    'ァ', 'ィ', 'ゥ', 'ェ', 'ォ', 'ッ', 'ャ', 'ュ', 'ョ', //
    'ｧ', 'ｨ', 'ｩ', 'ｪ', 'ｫ', 'ｯ', 'ｬ', 'ｭ', 'ｮ', //
    // closing brackets
    ')', '}', ']', '>', //
    '」', '』', '）', '｝', '】', '＞', '≫', '］', //
    // interpuncts, long vowel marks and the like
    '・', 'ー', '―', '-', '：', '；', '／', '/', 'ゝ', '々', '！', '？', '!', '?',
];

/// Line-breaking category of a single character.
///
/// Categories are checked in declaration order, so an ASCII `(` is an
/// [`CharClass::OpeningBracket`] and an ASCII `.` is [`CharClass::HalfWidth`].
/// Use [`is_forbidden_leading`] for the lookahead test, which applies to any
/// character regardless of its primary class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    /// Break opportunity; never forced onto a new line.
    Space,
    /// Attaches forward to the character that follows it.
    OpeningBracket,
    /// Narrow cell. Runs of these are measured as one unit.
    HalfWidth,
    /// Must not start a line.
    ForbiddenLeading,
    /// Ordinary full-width character, a legal break point after itself.
    Other,
}

pub fn classify(ch: char) -> CharClass {
    if is_space(ch) {
        CharClass::Space
    } else if is_opening_bracket(ch) {
        CharClass::OpeningBracket
    } else if is_half_width(ch) {
        CharClass::HalfWidth
    } else if is_forbidden_leading(ch) {
        CharClass::ForbiddenLeading
    } else {
        CharClass::Other
    }
}

pub fn is_space(ch: char) -> bool {
    SPACE_CHARS.contains(&ch)
}

/// A character is half-width when it encodes to a single UTF-8 byte.
pub fn is_half_width(ch: char) -> bool {
    ch.len_utf8() == 1
}

pub fn is_opening_bracket(ch: char) -> bool {
    OPENING_BRACKETS.contains(&ch)
}

pub fn is_forbidden_leading(ch: char) -> bool {
    FORBIDDEN_LEADING.contains(&ch)
}
