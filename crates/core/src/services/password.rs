//! Password strength policy.
//!
//! Mirrors the server-side rules so weak passwords are rejected before a
//! round trip. The validator reports the first violated rule as the
//! message the form surfaces inline.

use std::sync::LazyLock;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

use youmatter_common::{AppError, AppResult};
use youmatter_types::User;

/// Special characters accepted by the password rules.
const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-={}[]:;\"'<>.,?/";

/// Special characters used by the generator.
const GENERATOR_SPECIAL_CHARACTERS: &str = "!@#$%^&*()-_=+[]{}<>?/|~";

/// Passwords (or substrings) too common to allow.
const COMMON_PATTERNS: &[&str] = &[
    "password",
    "passw0rd",
    "letmein",
    "welcome",
    "admin",
    "root",
    "123456",
    "1234567",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty",
    "abc123",
    "iloveyou",
];

/// Keyboard rows checked for 4-character windows.
const KEYBOARD_SEQUENCES: &[&str] = &["qwertyuiop", "asdfghjkl", "zxcvbnm"];

const SEQUENCE_LENGTH: usize = 4;
const REPEAT_LENGTH: usize = 4;
const MIN_FRAGMENT_LENGTH: usize = 3;

#[allow(clippy::expect_used)]
static FRAGMENT_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s@._-]+").expect("static fragment pattern is valid"));

/// Personal values a password must not contain.
#[derive(Debug, Clone, Default)]
pub struct PersonalInfo {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

impl From<&User> for PersonalInfo {
    fn from(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: Some(user.email.clone()),
            username: Some(user.username.clone()),
        }
    }
}

/// Validate a password against the strength rules.
///
/// Returns the first violated rule as a user-facing message.
pub fn validate_password_strength(password: &str, user: Option<&PersonalInfo>) -> AppResult<()> {
    if password.is_empty() {
        return rule_violation("Password is required.");
    }
    if password.chars().count() < 8 {
        return rule_violation("Password must be at least 8 characters long.");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return rule_violation("Password must include at least one uppercase letter.");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return rule_violation("Password must include at least one lowercase letter.");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return rule_violation("Password must include at least one number.");
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return rule_violation(
            "Password must include at least one special character \
             (! @ # $ % ^ & * ( ) _ + - = { } [ ] : ; \" ' < > , . ? /).",
        );
    }

    let lowered = password.to_lowercase();
    if COMMON_PATTERNS.contains(&lowered.as_str()) {
        return rule_violation("Password is too common. Choose something harder to guess.");
    }
    if COMMON_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return rule_violation(
            "Password should not contain common words like 'password' or '123456'.",
        );
    }

    if let Some(info) = user
        && contains_personal_information(password, info)
    {
        return rule_violation("Password must not contain your personal information.");
    }

    if contains_sequence(password) {
        return rule_violation("Password must not contain sequential patterns like 'abcd' or '1234'.");
    }

    if contains_repeated_run(password) {
        return rule_violation("Password must not contain repeated characters like '1111'.");
    }

    Ok(())
}

fn rule_violation(message: &str) -> AppResult<()> {
    Err(AppError::Validation(message.to_string()))
}

/// Strip everything but ASCII alphanumerics and lowercase.
fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

fn contains_personal_information(password: &str, info: &PersonalInfo) -> bool {
    let password_normalized = normalize(password);
    if password_normalized.is_empty() {
        return false;
    }

    let raw_values = [
        info.full_name.as_deref().unwrap_or_default(),
        info.email.as_deref().unwrap_or_default(),
        info.username.as_deref().unwrap_or_default(),
    ];

    let mut personal_values: Vec<String> = Vec::new();
    for raw in raw_values {
        let full = normalize(raw);
        if !full.is_empty() {
            personal_values.push(full);
        }
        for fragment in FRAGMENT_SPLIT_RE.split(raw) {
            let fragment = normalize(fragment);
            if fragment.chars().count() >= MIN_FRAGMENT_LENGTH {
                personal_values.push(fragment);
            }
        }
    }

    personal_values
        .iter()
        .any(|value| password_normalized.contains(value.as_str()))
}

/// Detect 4-long ascending or descending alphanumeric runs and keyboard-row
/// windows.
fn contains_sequence(password: &str) -> bool {
    let normalized = password.to_lowercase();

    for seq in KEYBOARD_SEQUENCES
        .iter()
        .copied()
        .chain(["abcdefghijklmnopqrstuvwxyz", "0123456789"])
    {
        let window_count = seq.len().saturating_sub(SEQUENCE_LENGTH - 1);
        for start in 0..window_count {
            if normalized.contains(&seq[start..start + SEQUENCE_LENGTH]) {
                return true;
            }
        }
    }

    let chars: Vec<char> = normalized.chars().collect();
    for window in chars.windows(SEQUENCE_LENGTH) {
        let ascending = window
            .windows(2)
            .all(|pair| pair[1] as i32 - pair[0] as i32 == 1);
        let descending = window
            .windows(2)
            .all(|pair| pair[0] as i32 - pair[1] as i32 == 1);
        if ascending || descending {
            return true;
        }
    }
    false
}

fn contains_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars
        .windows(REPEAT_LENGTH)
        .any(|window| window.iter().all(|c| *c == window[0]))
}

/// Generate a strong password satisfying the validator.
///
/// Always at least 8 characters and containing one of each required
/// character class; regenerated if a random draw happens to trip the
/// sequence or repetition rules.
#[must_use]
pub fn generate_strong_password(length: usize) -> String {
    let length = length.max(8);
    let mut rng = rand::thread_rng();

    let upper: Vec<char> = ('A'..='Z').collect();
    let lower: Vec<char> = ('a'..='z').collect();
    let digits: Vec<char> = ('0'..='9').collect();
    let special: Vec<char> = GENERATOR_SPECIAL_CHARACTERS.chars().collect();
    let all: Vec<char> = upper
        .iter()
        .chain(lower.iter())
        .chain(digits.iter())
        .chain(special.iter())
        .copied()
        .collect();

    let mut candidate = String::new();
    for _ in 0..32 {
        let mut chars = vec![
            upper[rng.gen_range(0..upper.len())],
            lower[rng.gen_range(0..lower.len())],
            digits[rng.gen_range(0..digits.len())],
            special[rng.gen_range(0..special.len())],
        ];
        while chars.len() < length {
            chars.push(all[rng.gen_range(0..all.len())]);
        }
        chars.shuffle(&mut rng);
        candidate = chars.into_iter().collect();

        if validate_password_strength(&candidate, None).is_ok() {
            return candidate;
        }
    }
    candidate
}
