//! Variable name generation.

/// Alphabet for generated variable names, in order of significance.
const SYMBOLS: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Produces a deterministic sequence of short unique variable names.
///
/// Names follow a bijective base-52 numeral system over `a..z` then
/// `A..Z` with no zero symbol: the first call yields `"a"`, the 26th
/// `"z"`, the 27th `"A"`, the 52nd `"Z"`, the 53rd `"aa"`, and so on.
/// Every positive call count maps to a unique finite string, so no two
/// calls on the same generator ever return the same name.
///
/// One generator belongs to exactly one builder run. It is never reset
/// or shared mid-sequence.
#[derive(Debug, Default, Clone)]
pub struct VarNameGenerator {
    counter: u64,
}

impl VarNameGenerator {
    /// Create a generator starting at `"a"`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next name in the sequence.
    pub fn next_name(&mut self) -> String {
        self.counter += 1;
        let mut n = self.counter;
        let mut digits = Vec::new();
        while n > 0 {
            n -= 1;
            digits.push(SYMBOLS[(n % 52) as usize]);
            n /= 52;
        }
        digits.reverse();
        digits.into_iter().map(char::from).collect()
    }
}
