use chrono::Utc;
use rand::Rng;

/// Every key lands under this prefix.
pub const UPLOAD_NAMESPACE: &str = "uploads";

pub const ID_LEN: usize = 12;

// nanoid's URL alphabet, so a 12-char id matches `nanoid(12)`: 64 symbols, 72 bits.
const ID_ALPHABET: &[u8; 64] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Fresh storage key for `filename`, e.g. `uploads/1718000000000-V1StGXR8_Z5j.png`.
///
/// The timestamp only sorts keys roughly by time; uniqueness comes from the id.
pub fn new_key(filename: &str) -> String {
    build_key(Utc::now().timestamp_millis(), &random_id(ID_LEN), filename)
}

pub fn build_key(millis: i64, id: &str, filename: &str) -> String {
    format!(
        "{}/{}-{}{}",
        UPLOAD_NAMESPACE,
        millis,
        id,
        extension(filename)
    )
}

pub fn random_id(len: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..len)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Lowercased extension of the last path segment, dot included.
///
/// A leading dot marks a hidden file, not an extension. Trailing `/` are ignored.
pub fn extension(filename: &str) -> String {
    let trimmed = filename.trim_end_matches('/');
    let base = trimmed.rsplit('/').next().unwrap_or(trimmed);

    if base == ".." {
        return String::new();
    }

    match base.rfind('.') {
        Some(0) | None => String::new(),
        Some(idx) => base[idx..].to_lowercase(),
    }
}
