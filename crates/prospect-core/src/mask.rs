//! Masking of contact details shown in result rows.
//!
//! Both functions are pure and work on characters, so multi-byte input is
//! never split mid code point.

/// How phone numbers are masked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PhoneMask {
    /// First 3 characters, `****`, last 3 characters.
    #[default]
    EdgesKept,
    /// First 4 characters followed by `*****`.
    PrefixKept,
}

fn head(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

fn tail(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    match s.char_indices().nth(count - n) {
        Some((i, _)) => &s[i..],
        None => s,
    }
}

/// `ab@cd.com` → `ab***@cd***.com`. Empty input stays empty.
///
/// Input without `@` keeps only the local-part rule (`abcdef` → `ab***`).
pub fn mask_email(email: &str) -> String {
    if email.is_empty() {
        return String::new();
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            format!("{}***@{}***.com", head(local, 2), head(domain, 2))
        }
        None => format!("{}***", head(email, 2)),
    }
}

/// Mask a phone number with `policy`. Empty input stays empty.
pub fn mask_phone(phone: &str, policy: PhoneMask) -> String {
    if phone.is_empty() {
        return String::new();
    }
    match policy {
        PhoneMask::EdgesKept => format!("{}****{}", head(phone, 3), tail(phone, 3)),
        PhoneMask::PrefixKept => format!("{}*****", head(phone, 4)),
    }
}
