//! Random credentials for throwaway test users

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::types::RegisterRequest;

/// Letters appended to the name prefix
const NAME_SUFFIX_LEN: usize = 6;

/// Fresh registration payload for a user whose name starts with `prefix`
///
/// The backend accepts letters and spaces in names and exactly ten digits in
/// mobile numbers; the email is derived from the name so it stays unique
/// whenever the name does.
pub fn generate_registration(prefix: &str, password: &str, dob: &str) -> RegisterRequest {
    let name = format!("{} {}", prefix, random_letters(NAME_SUFFIX_LEN));
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', ""));

    RegisterRequest {
        name,
        email,
        mobile_number: random_mobile(),
        password: password.to_string(),
        is_active: true,
        dob: dob.to_string(),
    }
}

fn random_letters(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .filter(|c| c.is_ascii_alphabetic())
        .take(len)
        .collect()
}

/// `9` followed by nine digits
fn random_mobile() -> String {
    let rest: u32 = rand::rng().random_range(100_000_000..=999_999_999);
    format!("9{}", rest)
}
