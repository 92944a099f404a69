//! Property tests across the corpus generators.

use std::io::Read;

use chopher_corpus::{
    invert, BoundedRandomStream, CorpusKind, GaussianHoloStream, MoveToFrontDecoder,
    TiledStructuredStream,
};
use chopher_tests::pipeline::corpus_bytes;
use proptest::prelude::*;

fn sorted(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes.sort_unstable();
    bytes
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Each era of a structured corpus is the permutation of the one before.
    #[test]
    fn structured_eras_follow_permutation(size in 1usize..512, seed in any::<i64>()) {
        let bytes = corpus_bytes(CorpusKind::Structured, size, seed).unwrap();
        prop_assert_eq!(bytes.len(), size);

        let eras: Vec<&[u8]> = bytes.chunks(4).collect();
        for pair in eras.windows(2) {
            let mut expected = pair[0].to_vec();
            invert(&mut expected);
            prop_assert_eq!(&expected[..pair[1].len()], pair[1]);
            prop_assert_eq!(sorted(pair[0].to_vec()), sorted(expected));
        }
    }

    /// Every generator yields exactly `size` bytes.
    #[test]
    fn generators_yield_exact_size(size in 1usize..4096, seed in any::<i64>()) {
        for kind in CorpusKind::ALL {
            prop_assert_eq!(corpus_bytes(kind, size, seed).unwrap().len(), size);
        }
    }

    /// Small move-to-front indices keep returning recently used symbols.
    #[test]
    fn mtf_zero_repeats_front(indices in proptest::collection::vec(0u8..16, 1..64)) {
        let mut decoder = MoveToFrontDecoder::new();
        for index in indices {
            decoder.decode(index);
            let front = decoder.front();
            prop_assert_eq!(decoder.decode(0), front);
        }
    }
}

#[test]
fn zero_size_is_rejected_everywhere() {
    assert!(TiledStructuredStream::new(0, 1).is_err());
    assert!(GaussianHoloStream::new(0, 1).is_err());
    assert!(BoundedRandomStream::new(0, 1).is_err());
    for kind in CorpusKind::ALL {
        let err = corpus_bytes(kind, 0, 1).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}

#[test]
fn readers_drain_in_small_chunks() {
    let mut stream = GaussianHoloStream::new(1000, 3).unwrap();
    let mut collected = Vec::new();
    let mut buf = [0u8; 7];
    loop {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        collected.extend_from_slice(&buf[..n]);
    }
    assert_eq!(collected, corpus_bytes(CorpusKind::Holo, 1000, 3).unwrap());
}
