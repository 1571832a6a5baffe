use rand::Rng;

/// A source of randomness for drawing items out of a hat.
///
/// The only question a hat ever asks is "which of the `remaining` items
/// do I take next". Any `rand::Rng` answers it uniformly; tests can plug
/// in a scripted source instead.
pub trait Pick {
    /// Returns an index in `0..remaining`. `remaining` is never zero.
    fn pick(&mut self, remaining: usize) -> usize;
}

impl<R: Rng> Pick for R {
    #[inline]
    fn pick(&mut self, remaining: usize) -> usize {
        debug_assert!(remaining > 0);
        self.gen_range(0, remaining)
    }
}

#[test]
fn test_rng_pick_in_range() {
    let mut rng = ::rand::thread_rng();
    for n in 1..50 {
        for _ in 0..20 {
            assert!(rng.pick(n) < n);
        }
    }
}

#[test]
fn test_scripted_pick() {
    use crate::test_helper::Scripted;

    let mut src = Scripted::new(&[0, 4, 7]);
    assert_eq!(0, src.pick(3));
    assert_eq!(1, src.pick(3));
    assert_eq!(1, src.pick(2));
    // wraps around
    assert_eq!(0, src.pick(5));
}
