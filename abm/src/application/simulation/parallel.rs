//! Parallel/sequential execution of the decide phase.
//!
//! The `cfg` logic lives here in one place so the scheduler stays clean.
//! With the `parallel` feature, uses rayon's parallel iterators; otherwise
//! standard iterators. Results always come back in input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Map a function over a mutable slice, potentially in parallel.
///
/// # Parameters
/// - `force_sequential`: When true, forces sequential execution even if parallel feature is enabled
#[inline]
pub(crate) fn map_slice_mut<T, F, R>(slice: &mut [T], f: F, force_sequential: bool) -> Vec<R>
where
    T: Send,
    F: Fn(&mut T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter_mut().map(f).collect()
        } else {
            slice.par_iter_mut().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter_mut().map(f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order() {
        let mut items: Vec<u64> = (0..64).collect();
        for force_sequential in [false, true] {
            let doubled = map_slice_mut(
                &mut items,
                |x| {
                    *x += 1;
                    *x * 2
                },
                force_sequential,
            );
            assert_eq!(doubled.len(), 64);
            assert!(doubled.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(items[0], 2);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_rayon_path_matches_sequential() {
        let step = |x: &mut u64| {
            *x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            *x >> 33
        };
        let mut threaded: Vec<u64> = (0..10_000).collect();
        let mut sequential = threaded.clone();

        let a = map_slice_mut(&mut threaded, step, false);
        let b = map_slice_mut(&mut sequential, step, true);

        assert_eq!(a, b);
        assert_eq!(threaded, sequential);
    }
}
