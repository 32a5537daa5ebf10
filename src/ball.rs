/// Balls and their matching holes are numbered starting at 1, in the order they were added to the
/// builder. Ball `n` may only fall into hole `n`.
pub(crate) type BallId = usize;
