use chrono::NaiveDate;

pub const MAX_PAGE_SIZE: usize = 100;

/// `YYYY-MM-DD` with zero-padded fields and a real calendar day.
pub fn is_iso_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 {
        return false;
    }
    let shape_ok = bytes.iter().enumerate().all(|(idx, b)| match idx {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    shape_ok && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}

pub fn page_size(requested: Option<i64>, default: usize) -> usize {
    match requested {
        Some(n) if n > 0 => (n as usize).min(MAX_PAGE_SIZE),
        Some(_) => 1,
        None => default,
    }
}
