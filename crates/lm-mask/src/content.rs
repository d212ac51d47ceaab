//! Content specs: which characters count as part of a field's value.
//!
//! A content spec is written as a pipe-delimited list such as `num|en|lang`
//! or `*|-`. Each token is either a single literal character or the name of
//! a character class. A character belongs to the value if it matches *any*
//! descriptor.

/// Lower bound of the CJK code-point interval.
pub const CJK_START: u32 = 19968;
/// Upper bound (inclusive) of the CJK code-point interval.
pub const CJK_END: u32 = 171941;

/// Named character class usable in a content spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// ASCII `0`-`9`
    Digit,
    /// ASCII `a`-`z`
    LowercaseLetter,
    /// ASCII `A`-`Z`
    UppercaseLetter,
    /// ASCII letters of either case
    AsciiLetter,
    /// Code points in the fixed CJK interval
    Cjk,
    /// Any code point above 127
    NonAscii,
}

impl CharClass {
    /// Parse a class name. Both the short configuration names (`num`, `en`,
    /// `lang`, ...) and the descriptive names are accepted.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "num" | "digit" => Some(CharClass::Digit),
            "low" | "lower" | "lowercase-letter" => Some(CharClass::LowercaseLetter),
            "up" | "upper" | "uppercase-letter" => Some(CharClass::UppercaseLetter),
            "en" | "ascii-letter" => Some(CharClass::AsciiLetter),
            "cn" | "cjk" => Some(CharClass::Cjk),
            "lang" | "non-ascii" => Some(CharClass::NonAscii),
            _ => None,
        }
    }

    /// Returns whether `c` belongs to this class.
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        match self {
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::LowercaseLetter => c.is_ascii_lowercase(),
            CharClass::UppercaseLetter => c.is_ascii_uppercase(),
            CharClass::AsciiLetter => c.is_ascii_alphabetic(),
            CharClass::Cjk => (CJK_START..=CJK_END).contains(&(c as u32)),
            CharClass::NonAscii => (c as u32) > 127,
        }
    }
}

impl std::fmt::Display for CharClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CharClass::Digit => "digit",
            CharClass::LowercaseLetter => "lowercase-letter",
            CharClass::UppercaseLetter => "uppercase-letter",
            CharClass::AsciiLetter => "ascii-letter",
            CharClass::Cjk => "cjk",
            CharClass::NonAscii => "non-ascii",
        };
        write!(f, "{}", s)
    }
}

/// Parsed content spec.
///
/// Literals are kept sorted so membership is a binary search; the class list
/// holds at most one entry per [`CharClass`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSpec {
    classes: Vec<CharClass>,
    literals: Vec<char>,
}

impl ContentSpec {
    /// Parse a pipe-delimited content string.
    ///
    /// Unknown class names are dropped without error.
    pub fn parse(spec: &str) -> Self {
        let mut classes = Vec::new();
        let mut literals = Vec::new();

        for raw in spec.split('|') {
            if let Some(c) = single_char(raw) {
                literals.push(c);
                continue;
            }
            let token = raw.trim();
            if let Some(c) = single_char(token) {
                literals.push(c);
                continue;
            }
            if let Some(class) = CharClass::from_str(&token.to_lowercase()) {
                if !classes.contains(&class) {
                    classes.push(class);
                }
            }
        }

        literals.sort_unstable();
        literals.dedup();

        Self { classes, literals }
    }

    /// Returns whether `c` matches any descriptor.
    #[inline]
    pub fn hit(&self, c: char) -> bool {
        self.classes.iter().any(|class| class.contains(c)) || self.has_literal(c)
    }

    /// Returns whether `c` is one of the literal characters.
    #[inline]
    pub fn has_literal(&self, c: char) -> bool {
        self.literals.binary_search(&c).is_ok()
    }

    /// Returns whether the spec contains at least one literal character.
    pub fn has_literals(&self) -> bool {
        !self.literals.is_empty()
    }

    /// Returns whether no descriptor was recognized.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.literals.is_empty()
    }

    /// The recognized character classes.
    pub fn classes(&self) -> &[CharClass] {
        &self.classes
    }

    /// The literal characters, sorted.
    pub fn literals(&self) -> &[char] {
        &self.literals
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
