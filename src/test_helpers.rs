pub(crate) trait TestHelper {
    /// Compares element-wise with a tolerance of 1e-6 relative to the larger
    /// of 1 and the expected value.
    fn assert_approx_eq<const N: usize>(&self, expected: [f64; N]);
}

impl<T: AsRef<[f64]> + ?Sized> TestHelper for T {
    #[track_caller]
    fn assert_approx_eq<const N: usize>(&self, expected: [f64; N]) {
        let actual = self.as_ref();
        assert_eq!(actual.len(), N, "length mismatch: {actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!(
                (a - e).abs() <= 1e-6 * e.abs().max(1.0),
                "{actual:?} != {expected:?}"
            );
        }
    }
}
