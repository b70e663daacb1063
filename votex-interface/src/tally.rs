//! Result computation over a list of candidates.

use ethers_core::types::U256;

use crate::ResultCandidate;

/// Returns the candidate with the most votes.
///
/// Candidates are scanned in order and a later candidate only replaces the
/// current leader with a strictly greater count, so ties go to whoever
/// appears first.
pub fn winner(candidates: &[ResultCandidate]) -> Option<&ResultCandidate> {
    let mut iter = candidates.iter();
    let mut leader = iter.next()?;
    for candidate in iter {
        if candidate.votes > leader.votes {
            leader = candidate;
        }
    }
    Some(leader)
}

/// Sum of the votes of every candidate.
pub fn total_votes(candidates: &[ResultCandidate]) -> U256 {
    candidates
        .iter()
        .fold(U256::zero(), |acc, c| acc.saturating_add(c.votes))
}
