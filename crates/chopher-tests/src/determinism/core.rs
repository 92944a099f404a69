//! Run-to-run byte comparison.

use std::fmt;

/// Bytes of context kept on each side of a difference.
const CONTEXT_BYTES: usize = 8;

/// Outcome of [`verify_determinism`].
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether every run matched the first.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// Size of the first run's output in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// First difference, if any.
    pub diff_info: Option<DiffInfo>,
}

/// The first byte at which a run departed from the first run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    /// Byte offset of the difference.
    pub offset: usize,
    /// Byte of the first run, `None` past its end.
    pub expected: Option<u8>,
    /// Byte of the differing run, `None` past its end.
    pub actual: Option<u8>,
    /// Index of the differing run (the first run is 0).
    pub run_index: usize,
    /// Bytes of the first run around the offset.
    pub context: DiffContext,
}

/// Bytes surrounding a difference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffContext {
    pub before: Vec<u8>,
    pub after: Vec<u8>,
}

fn fmt_byte(byte: Option<u8>) -> String {
    byte.map_or_else(|| "EOF".to_string(), |b| format!("0x{:02X}", b))
}

impl fmt::Display for DiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run {} differs at byte {}: expected {}, got {}",
            self.run_index,
            self.offset,
            fmt_byte(self.expected),
            fmt_byte(self.actual)
        )?;
        if !self.context.before.is_empty() || !self.context.after.is_empty() {
            write!(f, "\n  context:")?;
            for b in &self.context.before {
                write!(f, " {:02X}", b)?;
            }
            write!(f, " [{}]", fmt_byte(self.expected))?;
            for b in &self.context.after {
                write!(f, " {:02X}", b)?;
            }
        }
        Ok(())
    }
}

impl DeterminismResult {
    /// Panics with the first difference if the runs disagreed.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = &self.diff_info {
            panic!(
                "non-deterministic output over {} runs ({} bytes, first hash {})\n{}",
                self.runs, self.output_size, self.hash, diff
            );
        }
    }
}

/// Runs `generate` `runs` times and compares every output to the first.
///
/// # Panics
/// If `runs` is less than 2.
pub fn verify_determinism<F, O>(generate: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "determinism needs at least 2 runs");

    let reference = generate();
    let reference = reference.as_ref();
    let hash = compute_hash(reference);

    let diff_info = (1..runs).find_map(|run_index| {
        let output = generate();
        first_difference(reference, output.as_ref(), run_index)
    });

    DeterminismResult {
        is_deterministic: diff_info.is_none(),
        runs,
        output_size: reference.len(),
        hash,
        diff_info,
    }
}

/// First offset where `expected` and `actual` disagree, including a length mismatch.
pub(crate) fn first_difference(expected: &[u8], actual: &[u8], run_index: usize) -> Option<DiffInfo> {
    let offset = expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e != a)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))?;

    Some(DiffInfo {
        offset,
        expected: expected.get(offset).copied(),
        actual: actual.get(offset).copied(),
        run_index,
        context: context_around(expected, offset),
    })
}

/// Up to [`CONTEXT_BYTES`] bytes on each side of `offset`.
pub(crate) fn context_around(data: &[u8], offset: usize) -> DiffContext {
    let start = offset.saturating_sub(CONTEXT_BYTES).min(data.len());
    let end = offset.saturating_add(CONTEXT_BYTES + 1).min(data.len());
    DiffContext {
        before: data[start..offset.min(data.len())].to_vec(),
        after: data.get(offset + 1..end).map(<[u8]>::to_vec).unwrap_or_default(),
    }
}

/// BLAKE3 hex digest.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Panics unless `generate` yields identical bytes over `runs` runs.
pub fn assert_deterministic<F>(runs: usize, generate: F)
where
    F: Fn() -> Vec<u8>,
{
    verify_determinism(generate, runs).assert_deterministic();
}
