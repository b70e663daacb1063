//! Checks applied to user input before it is sent to the API.

use votex_interface::{Address, CandidateEntry};

/// Shortest restart password accepted.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Why a piece of input was refused. The message is meant for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a voter address")]
    MissingAddress,
    #[error("Please enter a valid Ethereum address")]
    InvalidAddress,
    #[error("Please enter a candidate name")]
    MissingCandidateName,
    #[error("Please select a valid candidate")]
    InvalidCandidate,
    #[error("Please enter the restart password")]
    MissingPassword,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
}

/// Accepts `0x` followed by exactly 40 hex digits.
pub fn validate_address(raw: &str) -> Result<Address, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingAddress);
    }
    let digits = raw
        .strip_prefix("0x")
        .ok_or(ValidationError::InvalidAddress)?;
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidAddress);
    }
    raw.parse().map_err(|_| ValidationError::InvalidAddress)
}

pub fn validate_candidate_name(name: &str) -> Result<&str, ValidationError> {
    match name.trim() {
        "" => Err(ValidationError::MissingCandidateName),
        name => Ok(name),
    }
}

/// A password given to restart the election only has to be present; the
/// contract checks it.
pub fn validate_restart_password(password: &str) -> Result<&str, ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(password)
}

/// A new restart password must be at least [`MIN_PASSWORD_LEN`] characters.
pub fn validate_new_password(password: &str) -> Result<&str, ValidationError> {
    let password = validate_restart_password(password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(password)
}

/// Finds the candidate a voter picked.
pub fn validate_candidate(
    index: u64,
    candidates: &[CandidateEntry],
) -> Result<&CandidateEntry, ValidationError> {
    candidates
        .iter()
        .find(|c| c.id == index)
        .ok_or(ValidationError::InvalidCandidate)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use votex_interface::U256;

    use super::*;

    #[test]
    fn addresses() {
        assert!(validate_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").is_ok());
        assert_eq!(validate_address("  "), Err(ValidationError::MissingAddress));
        assert_eq!(
            validate_address("5FbDB2315678afecb367f032d93F642f64180aa3"),
            Err(ValidationError::InvalidAddress)
        );
        assert_eq!(
            validate_address("0x5FbDB2315678afecb367f032d93F642f64180aa"),
            Err(ValidationError::InvalidAddress)
        );
        assert_eq!(
            validate_address("0xgggDB2315678afecb367f032d93F642f64180aa3"),
            Err(ValidationError::InvalidAddress)
        );
    }

    #[test]
    fn passwords() {
        assert_eq!(validate_new_password(""), Err(ValidationError::MissingPassword));
        assert_eq!(validate_new_password("12345"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_new_password("123456"), Ok("123456"));
        assert_eq!(validate_restart_password("1"), Ok("1"));
    }

    #[test]
    fn candidate_names_and_indices() {
        assert_eq!(validate_candidate_name("  Alice "), Ok("Alice"));
        assert_eq!(
            validate_candidate_name("\t"),
            Err(ValidationError::MissingCandidateName)
        );

        let candidates = vec![CandidateEntry {
            id: 0,
            name: "Alice".to_string(),
            votes: U256::zero(),
        }];
        assert_eq!(validate_candidate(0, &candidates).unwrap().name, "Alice");
        assert_eq!(
            validate_candidate(1, &candidates),
            Err(ValidationError::InvalidCandidate)
        );
    }

    proptest! {
        #[test]
        fn any_prefixed_forty_hex_digits_is_valid(digits in "[0-9a-fA-F]{40}") {
            let address = format!("0x{}", digits);
            prop_assert!(validate_address(&address).is_ok());
        }

        #[test]
        fn other_lengths_are_invalid(digits in "[0-9a-f]{0,39}|[0-9a-f]{41,60}") {
            let address = format!("0x{}", digits);
            prop_assert_eq!(validate_address(&address), Err(ValidationError::InvalidAddress));
        }
    }
}
