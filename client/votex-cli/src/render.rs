//! Plain-text rendering of API responses.

use std::fmt::Write;

use votex_interface::{CandidateEntry, ElectionResults, ElectionStatus, U256};

pub fn status_summary(status: &ElectionStatus) -> String {
    let state = if status.election_ended {
        "Ended"
    } else {
        "Active"
    };
    let password = if status.restart_password_set {
        "set"
    } else {
        "not set"
    };
    format!(
        "Election:         {}\n\
         Status:           {}\n\
         Round:            {}\n\
         Total votes:      {}\n\
         Owner:            {:?}\n\
         Restart password: {}\n",
        status.election_name,
        state,
        status.election_round,
        status.total_votes,
        status.owner,
        password
    )
}

pub fn candidate_table(candidates: &[CandidateEntry]) -> String {
    if candidates.is_empty() {
        return "No candidates registered yet\n".to_string();
    }
    let mut out = String::new();
    for candidate in candidates {
        let _ = writeln!(
            out,
            "  [{}] {} ({} votes)",
            candidate.id, candidate.name, candidate.votes
        );
    }
    out
}

pub fn results_table(results: &ElectionResults) -> String {
    if results.candidates.is_empty() {
        return "No candidates registered yet\n".to_string();
    }
    let mut out = String::new();
    for candidate in &results.candidates {
        let _ = writeln!(
            out,
            "  [{}] {:<24} {:>8} votes  {:>6}",
            candidate.index,
            candidate.name,
            candidate.votes,
            percentage(candidate.votes, results.total_votes)
        );
    }
    let _ = writeln!(out, "Total votes: {}", results.total_votes);
    match &results.winner {
        Some(winner) if !results.total_votes.is_zero() => {
            let _ = writeln!(out, "Leading: {}", winner);
        }
        _ => {
            let _ = writeln!(out, "No votes cast yet");
        }
    }
    out
}

/// Share of `total` held by `votes`, with one decimal.
pub fn percentage(votes: U256, total: U256) -> String {
    if total.is_zero() {
        return "0.0%".to_string();
    }
    let ten = U256::from(10);
    let tenths = votes.saturating_mul(U256::from(1000)) / total;
    format!("{}.{}%", tenths / ten, tenths % ten)
}
