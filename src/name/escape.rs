use core::hash::Hasher;
use core::iter::FusedIterator;

/// One byte of a presentation-form name after escape resolution.
///
/// Ordering is by byte value first, and for equal bytes the literal
/// (unescaped) one sorts before the escaped one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub(crate) struct Token {
    pub byte: u8,
    pub escaped: bool,
}

impl Token {
    /// Feed the canonical spelling of this token to a hasher.
    ///
    /// An unescaped `\` never comes out of [`Tokens`], so writing the
    /// escape marker in front of escaped bytes keeps the stream unambiguous.
    pub fn feed<H: Hasher>(&self, state: &mut H) {
        if self.escaped {
            state.write_u8(b'\\');
        }
        state.write_u8(self.byte);
    }
}

/// Cursor over the comparable tokens of a name.
///
/// Stops at the logical end of the name: the end of input, an unescaped
/// trailing `.`, or a `\` with nothing after it.
#[derive(Clone)]
pub(crate) struct Tokens<'a> {
    name: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(name: &'a [u8]) -> Self {
        Tokens { name, pos: 0 }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let mut pos = self.pos;

        let escaped = self.name.get(pos) == Some(&b'\\');
        if escaped {
            pos += 1;
        }

        // Also covers a dangling escape at the very end.
        let byte = *self.name.get(pos)?;

        if !escaped && byte == b'.' && pos + 1 == self.name.len() {
            return None;
        }

        self.pos = pos + 1;
        Some(Token { byte, escaped })
    }
}

impl FusedIterator for Tokens<'_> {}

#[cfg(all(feature = "std", test))]
mod test {
    use super::*;

    fn tokens(s: &str) -> std::vec::Vec<(char, bool)> {
        Tokens::new(s.as_bytes())
            .map(|t| (t.byte as char, t.escaped))
            .collect()
    }

    #[test]
    fn plain_name() {
        assert_eq!(tokens("a.b"), [('a', false), ('.', false), ('b', false)]);
    }

    #[test]
    fn trailing_dot_is_not_a_token() {
        assert_eq!(tokens("a.b."), tokens("a.b"));
    }

    #[test]
    fn only_the_last_dot_is_dropped() {
        assert_eq!(tokens("a.."), [('a', false), ('.', false)]);
    }

    #[test]
    fn escaped_dot_is_kept() {
        assert_eq!(tokens("a\\."), [('a', false), ('.', true)]);
    }

    #[test]
    fn escaped_backslash() {
        assert_eq!(tokens("a\\\\b"), [('a', false), ('\\', true), ('b', false)]);
    }

    #[test]
    fn dangling_escape_ends_the_name() {
        assert_eq!(tokens("a\\"), [('a', false)]);
        assert!(tokens("\\").is_empty());
    }

    #[test]
    fn root_has_no_tokens() {
        assert!(tokens(".").is_empty());
        assert!(tokens("").is_empty());
    }

    #[test]
    fn exhausted_cursor_stays_exhausted() {
        let mut t = Tokens::new(b"x\\");
        assert!(t.next().is_some());
        assert!(t.next().is_none());
        assert!(t.next().is_none());
    }

    #[test]
    fn literal_sorts_before_escaped() {
        let lit = Token {
            byte: b'.',
            escaped: false,
        };
        let esc = Token {
            byte: b'.',
            escaped: true,
        };
        assert!(lit < esc);
    }
}
