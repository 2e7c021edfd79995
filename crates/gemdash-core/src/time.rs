/// Returns a simple ISO 8601 timestamp (Unix epoch seconds with Z suffix).
pub fn timestamp_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}Z", dur.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_has_z_suffix() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert!(ts[..ts.len() - 1].parse::<u64>().is_ok());
    }
}
