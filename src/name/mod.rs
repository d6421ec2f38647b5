//! Domain names in presentation form.
//!
//! Names are compared by their escape-resolved bytes, so `foo.local` and
//! `foo.local.` are the same name while `foo.bar` and `foo\.bar` are not:
//! the escaped dot is part of a label, not a separator.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str;

use hash32::FnvHasher;
use hash32::Hasher as _;

mod buf;
mod escape;

pub use buf::NameBuf;

use escape::Tokens;

/// Number of escape-resolved bytes of a name that contribute to [`hash_name`].
///
/// Longer names are hashed on this prefix only. They still compare
/// correctly, they just share a hash with every name that has the same prefix.
pub const MAX_HASH_LEN: usize = 255;

/// Bytes of a raw host name buffer considered by [`host_name`].
pub const MAX_HOST_NAME_LEN: usize = 255;

/// Default bound for [`NameBuf`].
///
/// Fits any name whose wire form fits 255 bytes, even when every
/// byte is spelled with an escape.
pub const DEFAULT_NAME_CAP: usize = 1024;

/// Make sure a name ends with a `.`.
///
/// The empty name becomes the root, `"."`. Nothing is copied, the result
/// borrows the input.
///
/// ```
/// use mdns_core::normalize;
///
/// assert_eq!(normalize(b"nugget.local"), b"nugget.local.");
/// assert_eq!(normalize(b"nugget.local."), b"nugget.local.");
/// assert_eq!(normalize(b""), b".");
/// ```
pub fn normalize(name: &[u8]) -> NormalizedName<'_> {
    NormalizedName {
        name,
        dot: name.last() != Some(&b'.'),
    }
}

/// Order two names by their escape-resolved bytes.
///
/// A single unescaped trailing dot is ignored. For equal bytes, a literal
/// byte orders before an escaped one.
///
/// ```
/// use core::cmp::Ordering;
/// use mdns_core::compare_names;
///
/// assert_eq!(compare_names(b"a.com.", b"a.com"), Ordering::Equal);
/// assert_eq!(compare_names(b"a.com", b"b.com"), Ordering::Less);
/// ```
pub fn compare_names(a: &[u8], b: &[u8]) -> Ordering {
    Tokens::new(a).cmp(Tokens::new(b))
}

/// Whether two names are the same name. See [`compare_names`].
pub fn names_equal(a: &[u8], b: &[u8]) -> bool {
    compare_names(a, b) == Ordering::Equal
}

/// 32-bit hash of a name, consistent with [`names_equal`].
///
/// Equal names always hash the same, whatever their spelling of the
/// trailing dot. Only the first [`MAX_HASH_LEN`] bytes after escape
/// resolution are hashed.
pub fn hash_name(name: &[u8]) -> u32 {
    let mut hasher = FnvHasher::default();
    feed_name(name, &mut hasher);
    hasher.finish32()
}

fn feed_name<H: Hasher>(name: &[u8], state: &mut H) {
    let mut tokens = Tokens::new(name);

    for token in tokens.by_ref().take(MAX_HASH_LEN) {
        token.feed(state);
    }

    if tokens.next().is_some() {
        trace!("Name hash truncated at {} bytes", MAX_HASH_LEN);
    }
}

/// Normalize a raw host name buffer.
///
/// The buffer is cut at the first NUL and at [`MAX_HOST_NAME_LEN`] bytes,
/// whichever comes first, and the rest is [`normalize`]d. Querying the
/// operating system for the buffer is up to the caller.
///
/// ```
/// use mdns_core::host_name;
///
/// assert_eq!(host_name(b"nugget\0\0\0\0"), b"nugget.");
/// ```
pub fn host_name(raw: &[u8]) -> NormalizedName<'_> {
    let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());

    let end = if end > MAX_HOST_NAME_LEN {
        trace!("Host name truncated from {} to {} bytes", end, MAX_HOST_NAME_LEN);
        MAX_HOST_NAME_LEN
    } else {
        end
    };

    normalize(&raw[..end])
}

/// A name guaranteed to end with `.`, as returned by [`normalize`].
#[derive(Clone, Copy)]
pub struct NormalizedName<'a> {
    name: &'a [u8],
    dot: bool,
}

impl<'a> NormalizedName<'a> {
    /// Length in bytes, trailing dot included.
    pub fn len(&self) -> usize {
        self.name.len() + self.dot as usize
    }

    /// Always false, the shortest normalized name is `"."`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The bytes of the normalized name.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + 'a {
        self.name.iter().copied().chain(self.dot.then_some(b'.'))
    }

    /// Copy the normalized name to the start of `output`.
    ///
    /// Returns the number of bytes written, or `None` if `output` is too short.
    pub fn copy_to(&self, output: &mut [u8]) -> Option<usize> {
        let len = self.len();
        let output = output.get_mut(..len)?;
        output[..self.name.len()].copy_from_slice(self.name);
        if self.dot {
            output[len - 1] = b'.';
        }
        Some(len)
    }

    /// Copy into an owned vec.
    #[cfg(feature = "alloc")]
    pub fn to_vec(&self) -> alloc::vec::Vec<u8> {
        self.bytes().collect()
    }
}

impl PartialEq<[u8]> for NormalizedName<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes().eq(other.iter().copied())
    }
}

impl<const N: usize> PartialEq<[u8; N]> for NormalizedName<'_> {
    fn eq(&self, other: &[u8; N]) -> bool {
        *self == other[..]
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for NormalizedName<'_> {
    fn eq(&self, other: &&[u8; N]) -> bool {
        *self == other[..]
    }
}

impl PartialEq<&str> for NormalizedName<'_> {
    fn eq(&self, other: &&str) -> bool {
        *self == *other.as_bytes()
    }
}

impl fmt::Display for NormalizedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_bytes(self.name, f)?;
        if self.dot {
            f.write_str(".")?;
        }
        Ok(())
    }
}

impl fmt::Debug for NormalizedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        core::write!(f, "NormalizedName(\"{}\")", self)
    }
}

/// A borrowed name with equality, ordering and hashing of the name
/// rather than of its bytes.
///
/// Usable as a map key: `DomainName::from("a.local")` and
/// `DomainName::from("a.local.")` find the same entry.
#[derive(Clone, Copy)]
pub struct DomainName<'a>(&'a [u8]);

impl<'a> DomainName<'a> {
    /// Wrap a name in presentation form.
    pub fn new(name: &'a [u8]) -> Self {
        DomainName(name)
    }

    /// The bytes as given, not normalized.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// Whether this is the root name, `""` or `"."`.
    pub fn is_root(&self) -> bool {
        Tokens::new(self.0).next().is_none()
    }

    /// The name with a trailing dot.
    pub fn normalize(&self) -> NormalizedName<'a> {
        normalize(self.0)
    }

    /// See [`hash_name`].
    pub fn hash32(&self) -> u32 {
        hash_name(self.0)
    }
}

impl<'a> From<&'a [u8]> for DomainName<'a> {
    fn from(value: &'a [u8]) -> Self {
        DomainName(value)
    }
}

impl<'a> From<&'a str> for DomainName<'a> {
    fn from(value: &'a str) -> Self {
        DomainName(value.as_bytes())
    }
}

impl PartialEq for DomainName<'_> {
    fn eq(&self, other: &Self) -> bool {
        names_equal(self.0, other.0)
    }
}

impl Eq for DomainName<'_> {}

impl PartialEq<&str> for DomainName<'_> {
    fn eq(&self, other: &&str) -> bool {
        names_equal(self.0, other.as_bytes())
    }
}

impl PartialOrd for DomainName<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DomainName<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_names(self.0, other.0)
    }
}

impl Hash for DomainName<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Length first, so names hashed one after another can't run together.
        let len = Tokens::new(self.0).take(MAX_HASH_LEN).count();
        state.write_usize(len);
        feed_name(self.0, state);
    }
}

impl fmt::Display for DomainName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_bytes(self.0, f)
    }
}

impl fmt::Debug for DomainName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        core::write!(f, "DomainName(\"{}\")", self)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DomainName<'_> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "DomainName(\"{=[u8]:a}\")", self.0)
    }
}

// Names are expected to be printable. Anything that isn't valid utf8 is
// shown with RFC 1035 \DDD escapes.
fn fmt_bytes(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Ok(s) = str::from_utf8(bytes) {
        return f.write_str(s);
    }
    for b in bytes {
        if b.is_ascii_graphic() {
            core::write!(f, "{}", *b as char)?;
        } else {
            core::write!(f, "\\{:03}", b)?;
        }
    }
    Ok(())
}

#[cfg(all(feature = "std", test))]
mod test {
    use std::collections::hash_map::DefaultHasher;
    use std::collections::{BTreeMap, HashMap};

    use proptest::prelude::*;

    use crate::test::init_test_log;

    use super::*;

    fn std_hash(name: DomainName) -> u64 {
        let mut h = DefaultHasher::new();
        name.hash(&mut h);
        h.finish()
    }

    #[test]
    fn normalize_appends_dot() {
        assert_eq!(normalize(b"foo.example.com"), b"foo.example.com.");
        assert_eq!(normalize(b"foo.example.com").len(), 16);
    }

    #[test]
    fn normalize_keeps_trailing_dot() {
        assert_eq!(normalize(b"foo.example.com."), b"foo.example.com.");
    }

    #[test]
    fn normalize_empty_is_root() {
        let root = normalize(b"");
        assert_eq!(root, b".");
        assert_eq!(root.len(), 1);
        assert!(!root.is_empty());
    }

    #[test]
    fn normalize_escaped_dot_is_textual() {
        // Already ends with a dot, so it's left alone.
        assert_eq!(normalize(b"foo\\."), b"foo\\.");
    }

    #[test]
    fn normalize_is_idempotent() {
        for name in ["", ".", "a", "a.", "a..", "a\\.", "a\\"] {
            let once = normalize(name.as_bytes()).to_vec();
            let twice = normalize(&once).to_vec();
            assert_eq!(once, twice, "{:?}", name);
        }
    }

    #[test]
    fn normalized_copy_to() {
        let mut buf = [0u8; 8];
        assert_eq!(normalize(b"abc").copy_to(&mut buf), Some(4));
        assert_eq!(&buf[..4], b"abc.");

        let mut short = [0u8; 3];
        assert_eq!(normalize(b"abc").copy_to(&mut short), None);
    }

    #[test]
    fn normalized_display() {
        assert_eq!(normalize(b"mini.local").to_string(), "mini.local.");
        assert_eq!(normalize(b"").to_string(), ".");
    }

    #[test]
    fn trailing_dot_does_not_matter() {
        init_test_log();
        assert!(names_equal(b"foo.example.com", b"foo.example.com."));
        assert!(names_equal(b"foo.example.com.", b"foo.example.com"));
        assert!(names_equal(b"", b"."));
    }

    #[test]
    fn escaped_dot_is_not_a_separator() {
        assert!(names_equal(
            b"foo\\.bar.example.com",
            b"foo\\.bar.example.com."
        ));
        assert!(!names_equal(b"foo.bar.example.com", b"foo\\.bar.example.com"));
    }

    #[test]
    fn escaped_trailing_dot_is_kept() {
        assert!(!names_equal(b"a\\.", b"a"));
        assert!(!names_equal(b"a\\.", b"a."));
        assert!(names_equal(b"a\\..", b"a\\."));
    }

    #[test]
    fn escaped_plain_char_differs_from_literal() {
        assert!(!names_equal(b"a\\b", b"ab"));
        assert_eq!(compare_names(b"ab", b"a\\b"), Ordering::Less);
    }

    #[test]
    fn dangling_escape() {
        assert!(names_equal(b"a\\", b"a"));
        assert!(names_equal(b"a\\", b"a."));
        assert!(names_equal(b"\\", b""));
    }

    #[test]
    fn only_one_trailing_dot_is_ignored() {
        assert!(!names_equal(b"a..", b"a."));
        assert_eq!(compare_names(b"a..", b"a"), Ordering::Greater);
    }

    #[test]
    fn ordering_by_byte_value() {
        assert_eq!(compare_names(b"a.com.", b"a.com"), Ordering::Equal);
        assert_eq!(compare_names(b"a.com", b"b.com"), Ordering::Less);
        assert_eq!(compare_names(b"b.com", b"a.com"), Ordering::Greater);
        assert_eq!(compare_names(b"a", b"a.com"), Ordering::Less);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert!(!names_equal(b"Mini.local", b"mini.local"));
    }

    #[test]
    fn hash_agrees_with_equality() {
        // Hashing raw bytes would give these different hashes.
        assert_eq!(hash_name(b"a.local"), hash_name(b"a.local."));
        assert_eq!(hash_name(b"a\\.b"), hash_name(b"a\\.b."));
        assert_eq!(hash_name(b"a\\"), hash_name(b"a"));
        assert_eq!(hash_name(b""), hash_name(b"."));
    }

    #[test]
    fn hash_tells_escapes_apart() {
        assert_ne!(hash_name(b"a.b"), hash_name(b"a\\.b"));
    }

    #[test]
    fn hash_truncates_long_names() {
        init_test_log();
        let mut long = vec![b'a'; MAX_HASH_LEN];
        let prefix = hash_name(&long);
        long.extend_from_slice(b"bcdef");
        assert_eq!(hash_name(&long), prefix);
        assert!(!names_equal(&long, &long[..MAX_HASH_LEN]));
    }

    #[test]
    fn host_name_cut_at_nul() {
        assert_eq!(host_name(b"myhost\0garbage"), b"myhost.");
        assert_eq!(host_name(b"myhost"), b"myhost.");
        assert_eq!(host_name(b"\0"), b".");
    }

    #[test]
    fn host_name_bounded() {
        init_test_log();
        let raw = [b'h'; 300];
        let name = host_name(&raw);
        assert_eq!(name.len(), MAX_HOST_NAME_LEN + 1);
    }

    #[test]
    fn names_in_tuples_hash_apart() {
        fn tuple_hash(a: &str, b: &str) -> u64 {
            let mut h = DefaultHasher::new();
            (DomainName::from(a), DomainName::from(b)).hash(&mut h);
            h.finish()
        }
        assert_ne!(tuple_hash("ab", "c"), tuple_hash("a", "bc"));
        assert_eq!(tuple_hash("ab.", "c"), tuple_hash("ab", "c."));
    }

    #[test]
    fn domain_name_as_map_key() {
        let mut map = HashMap::new();
        map.insert(DomainName::from("mini.local"), 1);
        assert_eq!(map.get(&DomainName::from("mini.local.")), Some(&1));
        assert_eq!(map.get(&DomainName::from("mini\\.local")), None);

        let mut tree = BTreeMap::new();
        tree.insert(DomainName::from("b.local."), 2);
        tree.insert(DomainName::from("a.local"), 1);
        let keys: Vec<_> = tree.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, ["a.local", "b.local."]);
        assert_eq!(tree.get(&DomainName::from("b.local")), Some(&2));
    }

    #[test]
    fn domain_name_root() {
        assert!(DomainName::from("").is_root());
        assert!(DomainName::from(".").is_root());
        assert!(!DomainName::from("\\.").is_root());
    }

    #[test]
    fn domain_name_display() {
        assert_eq!(DomainName::from("a\\.b").to_string(), "a\\.b");
        assert_eq!(DomainName::new(&[b'a', 0xff, b' ']).to_string(), "a\\255\\032");
        assert_eq!(
            format!("{:?}", DomainName::from("mini.local")),
            "DomainName(\"mini.local\")"
        );
    }

    #[test]
    fn domain_name_eq_str() {
        assert_eq!(DomainName::from("mini.local."), "mini.local");
    }

    fn name_strategy() -> impl Strategy<Value = Vec<u8>> {
        // Small alphabet so escapes and dots collide often.
        proptest::collection::vec(
            prop_oneof![Just(b'a'), Just(b'b'), Just(b'.'), Just(b'\\')],
            0..10,
        )
    }

    proptest! {
        #[test]
        fn normalized_ends_with_dot(name in name_strategy()) {
            let n = normalize(&name).to_vec();
            prop_assert_eq!(n.last(), Some(&b'.'));
            prop_assert_eq!(normalize(&n).to_vec(), n);
        }

        #[test]
        fn compare_is_antisymmetric(a in name_strategy(), b in name_strategy()) {
            prop_assert_eq!(compare_names(&a, &b), compare_names(&b, &a).reverse());
        }

        #[test]
        fn compare_is_transitive(
            a in name_strategy(),
            b in name_strategy(),
            c in name_strategy(),
        ) {
            let ab = compare_names(&a, &b);
            let bc = compare_names(&b, &c);
            if ab != Ordering::Greater && bc != Ordering::Greater {
                prop_assert_ne!(compare_names(&a, &c), Ordering::Greater);
            }
            if ab == Ordering::Equal && bc == Ordering::Equal {
                prop_assert!(names_equal(&a, &c));
            }
        }

        #[test]
        fn equal_names_hash_equal(a in name_strategy(), b in name_strategy()) {
            if names_equal(&a, &b) {
                prop_assert_eq!(hash_name(&a), hash_name(&b));
                prop_assert_eq!(std_hash(DomainName::new(&a)), std_hash(DomainName::new(&b)));
            }
        }

        #[test]
        fn normalized_name_is_equal(name in name_strategy()) {
            // An odd run of trailing backslashes is a dangling escape, which
            // the appended dot turns into an escaped dot.
            let dangling = name.iter().rev().take_while(|b| **b == b'\\').count() % 2 == 1;
            if !dangling {
                prop_assert!(names_equal(&name, &normalize(&name).to_vec()));
            }
        }
    }
}
