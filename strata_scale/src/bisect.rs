// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary search over ascending slices.
//!
//! Values that do not compare with themselves (`NaN`) sort after everything:
//! searching for one returns `a.len()`.

/// Returns the first index at which `x` could be inserted keeping `a`
/// sorted, before any equal elements.
#[must_use]
pub fn bisect_left<T: PartialOrd>(a: &[T], x: &T) -> usize {
    bisect_left_by_key(a, x, |v| v)
}

/// Returns the index after the last element of `a` that is `<= x`.
#[must_use]
pub fn bisect_right<T: PartialOrd>(a: &[T], x: &T) -> usize {
    bisect_right_by_key(a, x, |v| v)
}

/// Returns the index of the element of `a` closest to `x`, preferring the
/// lower index on ties.
#[must_use]
pub fn bisect_center(a: &[f64], x: f64) -> usize {
    bisect_center_by_key(a, x, |v| *v)
}

/// [`bisect_left`] comparing `key(element)` against `x`.
pub fn bisect_left_by_key<'a, T, K: PartialOrd + ?Sized + 'a>(
    a: &'a [T],
    x: &K,
    key: impl Fn(&'a T) -> &'a K,
) -> usize {
    search(a.len(), x, |mid| key(&a[mid]) < x)
}

/// [`bisect_right`] comparing `key(element)` against `x`.
pub fn bisect_right_by_key<'a, T, K: PartialOrd + ?Sized + 'a>(
    a: &'a [T],
    x: &K,
    key: impl Fn(&'a T) -> &'a K,
) -> usize {
    search(a.len(), x, |mid| key(&a[mid]) <= x)
}

/// [`bisect_center`] over a numeric key.
pub fn bisect_center_by_key<T>(a: &[T], x: f64, key: impl Fn(&T) -> f64) -> usize {
    let Some(last) = a.len().checked_sub(1) else {
        return 0;
    };
    let i = search(last, &x, |mid| key(&a[mid]) < x);
    if i > 0 && key(&a[i - 1]) - x > -(key(&a[i]) - x) {
        i - 1
    } else {
        i
    }
}

fn search<K: PartialOrd + ?Sized>(
    len: usize,
    x: &K,
    mut go_right: impl FnMut(usize) -> bool,
) -> usize {
    if x.partial_cmp(x).is_none() {
        return len;
    }
    let (mut lo, mut hi) = (0, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if go_right(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_and_right_straddle_equal_runs() {
        let a = [1.0, 2.0, 2.0, 2.0, 3.0];
        assert_eq!(bisect_left(&a, &2.0), 1);
        assert_eq!(bisect_right(&a, &2.0), 4);
        assert_eq!(bisect_left(&a, &0.0), 0);
        assert_eq!(bisect_right(&a, &9.0), 5);
    }

    #[test]
    fn nan_goes_last() {
        let a = [1.0, 2.0];
        assert_eq!(bisect_left(&a, &f64::NAN), 2);
        assert_eq!(bisect_right(&a, &f64::NAN), 2);
    }

    #[test]
    fn center_picks_nearest() {
        let a = [0.0, 10.0, 20.0];
        assert_eq!(bisect_center(&a, 4.0), 0);
        assert_eq!(bisect_center(&a, 6.0), 1);
        assert_eq!(bisect_center(&a, 5.0), 0, "ties go low");
        assert_eq!(bisect_center(&a, 99.0), 2);
        assert_eq!(bisect_center(&[], 1.0), 0);
    }

    #[test]
    fn keyed_search() {
        let steps = [("s", 1_000_i64), ("m", 60_000), ("h", 3_600_000)];
        assert_eq!(bisect_right_by_key(&steps, &60_000, |(_, d)| d), 2);
        assert_eq!(bisect_left_by_key(&steps, &60_000, |(_, d)| d), 1);
    }
}
