use core::fmt;
use core::ops::Deref;

#[cfg(not(feature = "alloc"))]
type Inner<T, const N: usize> = heapless::Vec<T, N>;
#[cfg(feature = "alloc")]
type Inner<T, const N: usize> = alloc::vec::Vec<T>;

/// Vec that is growable with `alloc` and fixed capacity without.
///
/// `N` is always the upper bound. With `alloc` the bound is checked
/// rather than being a property of the storage, so both modes accept
/// and reject the same inputs.
#[derive(Default, Clone)]
pub struct Vec<T, const N: usize> {
    inner: Inner<T, N>,
}

impl<T, const N: usize> Vec<T, N> {
    pub fn new() -> Self {
        Self {
            inner: Inner::new(),
        }
    }

    #[cfg(not(feature = "alloc"))]
    pub fn push(&mut self, value: T) -> Result<(), ()> {
        self.inner.push(value).map_err(|_| ())
    }

    #[cfg(feature = "alloc")]
    pub fn push(&mut self, element: T) -> Result<(), ()> {
        if self.inner.len() >= N {
            return Err(());
        }
        self.inner.push(element);
        Ok(())
    }

    /// Push every item, or fail at the first one that doesn't fit.
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), ()> {
        for item in iter {
            self.push(item)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Vec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vec").field(&self.inner).finish()
    }
}

impl<T, const N: usize> Deref for Vec<T, N> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: PartialEq, const N: usize> PartialEq for Vec<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Eq, const N: usize> Eq for Vec<T, N> {}

#[cfg(all(feature = "std", test))]
mod test {
    use super::*;

    #[test]
    fn push_respects_bound() {
        let mut v: Vec<u8, 2> = Vec::new();
        assert!(v.push(1).is_ok());
        assert!(v.push(2).is_ok());
        assert!(v.push(3).is_err());
        assert_eq!(&v[..], &[1, 2]);
    }

    #[test]
    fn try_extend_stops_at_bound() {
        let mut v: Vec<u8, 3> = Vec::new();
        assert!(v.try_extend([1, 2]).is_ok());
        assert!(v.try_extend([3, 4]).is_err());
        assert_eq!(v.len(), 3);
    }
}
