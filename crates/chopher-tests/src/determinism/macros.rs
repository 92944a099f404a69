//! Test-generating macro for determinism checks.

/// Generates a `#[test]` that runs an expression several times and asserts
/// byte-identical output.
///
/// The expression must evaluate to something implementing `AsRef<[u8]>`.
///
/// ```rust,ignore
/// use chopher_tests::test_determinism;
///
/// test_determinism!(holo_corpus, {
///     chopher_tests::pipeline::corpus_bytes(CorpusKind::Holo, 4096, 1).unwrap()
/// });
///
/// test_determinism!(rendered_song, runs = 2, {
///     chopher_tests::pipeline::render_wav(b"bytes").unwrap()
/// });
/// ```
#[macro_export]
macro_rules! test_determinism {
    ($name:ident, $generate:expr) => {
        $crate::test_determinism!($name, runs = 3, $generate);
    };

    ($name:ident, runs = $runs:expr, $generate:expr) => {
        #[test]
        fn $name() {
            $crate::determinism::verify_determinism(|| $generate, $runs).assert_deterministic();
        }
    };
}
