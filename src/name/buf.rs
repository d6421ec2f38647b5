use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use super::{normalize, DomainName, DEFAULT_NAME_CAP};
use crate::vec::Vec;

/// An owned, normalized name of at most `N` bytes.
///
/// Uses the heap with the **alloc** feature and a fixed stack buffer
/// without it. The bound `N` applies either way.
///
/// ```
/// use mdns_core::{NameBuf, DomainName};
///
/// let name = NameBuf::<64>::new(b"mini.local").unwrap();
/// assert_eq!(name.as_bytes(), b"mini.local.");
/// assert_eq!(name.as_name(), DomainName::from("mini.local"));
///
/// // "abcd." is 5 bytes.
/// assert!(NameBuf::<4>::new(b"abcd").is_none());
/// ```
#[derive(Clone)]
pub struct NameBuf<const N: usize = DEFAULT_NAME_CAP> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> NameBuf<N> {
    /// Normalize `name` into a new buffer.
    ///
    /// `None` if the normalized name is longer than `N`.
    pub fn new(name: &[u8]) -> Option<Self> {
        let normalized = normalize(name);
        let mut bytes = Vec::new();

        if bytes.try_extend(normalized.bytes()).is_err() {
            debug!(
                "NameBuf too small for name: {} > {}",
                normalized.len(),
                N
            );
            return None;
        }

        Some(NameBuf { bytes })
    }

    /// The normalized bytes, always ending with `.`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Borrow as a [`DomainName`] for comparisons.
    pub fn as_name(&self) -> DomainName<'_> {
        DomainName::new(&self.bytes)
    }

    /// Length in bytes, trailing dot included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false, the shortest name is `"."`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<const N: usize> PartialEq for NameBuf<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_name() == other.as_name()
    }
}

impl<const N: usize> Eq for NameBuf<N> {}

impl<const N: usize> PartialEq<DomainName<'_>> for NameBuf<N> {
    fn eq(&self, other: &DomainName<'_>) -> bool {
        self.as_name() == *other
    }
}

impl<const N: usize> PartialOrd for NameBuf<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize> Ord for NameBuf<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_name().cmp(&other.as_name())
    }
}

impl<const N: usize> Hash for NameBuf<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_name().hash(state)
    }
}

impl<const N: usize> fmt::Display for NameBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_name(), f)
    }
}

impl<const N: usize> fmt::Debug for NameBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        core::write!(f, "NameBuf(\"{}\")", self.as_name())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for NameBuf<N> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "NameBuf(\"{=[u8]:a}\")", self.as_bytes())
    }
}

#[cfg(all(feature = "std", test))]
mod test {
    use std::collections::HashSet;

    use crate::test::init_test_log;

    use super::*;
    use crate::name::hash_name;

    #[test]
    fn stores_normalized() {
        let name = NameBuf::<16>::new(b"mini.local").unwrap();
        assert_eq!(name.as_bytes(), b"mini.local.");
        assert_eq!(name.len(), 11);
        assert!(!name.is_empty());
    }

    #[test]
    fn empty_is_root() {
        let root: NameBuf = NameBuf::new(b"").unwrap();
        assert_eq!(root.as_bytes(), b".");
        assert!(!root.is_empty());
        assert!(root.as_name().is_root());
    }

    #[test]
    fn bound_includes_the_dot() {
        init_test_log();
        assert!(NameBuf::<4>::new(b"abcd").is_none());
        assert!(NameBuf::<5>::new(b"abcd").is_some());
        assert!(NameBuf::<4>::new(b"abc.").is_some());
    }

    #[test]
    fn agrees_with_domain_name() {
        let a = NameBuf::<32>::new(b"x\\.y.local").unwrap();
        assert_eq!(a, DomainName::from("x\\.y.local"));
        assert!(a != DomainName::from("x.y.local"));
        assert_eq!(hash_name(a.as_bytes()), hash_name(b"x\\.y.local"));
    }

    #[test]
    fn usable_in_sets() {
        let mut set: HashSet<NameBuf<32>> = HashSet::new();
        set.insert(NameBuf::new(b"a.local").unwrap());
        assert!(!set.insert(NameBuf::new(b"a.local.").unwrap()));
        assert!(set.insert(NameBuf::new(b"b.local").unwrap()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn sorts_like_names() {
        let mut v = [
            NameBuf::<16>::new(b"c").unwrap(),
            NameBuf::<16>::new(b"a").unwrap(),
            NameBuf::<16>::new(b"b.").unwrap(),
        ];
        v.sort();
        let s: std::vec::Vec<_> = v.iter().map(|n| n.to_string()).collect();
        assert_eq!(s, ["a.", "b.", "c."]);
    }

    #[test]
    fn debug_format() {
        let n = NameBuf::<16>::new(b"a").unwrap();
        assert_eq!(format!("{:?}", n), "NameBuf(\"a.\")");
    }
}
