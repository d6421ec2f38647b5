#![no_main]

use core::cmp::Ordering;

use libfuzzer_sys::fuzz_target;
use mdns_core::{compare_names, hash_name, names_equal, normalize, NameBuf};

fuzz_target!(|data: &[u8]| {
    // First byte picks where to split the input into two names.
    let Some((split, rest)) = data.split_first() else {
        return;
    };
    let (a, b) = rest.split_at((*split as usize).min(rest.len()));

    let ab = compare_names(a, b);
    assert_eq!(ab, compare_names(b, a).reverse());

    if ab == Ordering::Equal {
        assert!(names_equal(a, b));
        assert_eq!(hash_name(a), hash_name(b));
    }

    let n = normalize(a);
    assert_eq!(n.bytes().last(), Some(b'.'));

    if let Some(buf) = NameBuf::<256>::new(a) {
        assert_eq!(buf.as_bytes().len(), n.len());
    }
});
