use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Render unix seconds as RFC 3339.
///
/// Zero means the indexer had no timestamp for the row, so it maps to
/// `None`, as do values outside the representable range.
pub fn iso_timestamp(unix_seconds: i64) -> Option<String> {
    if unix_seconds == 0 {
        return None;
    }
    let stamp = OffsetDateTime::from_unix_timestamp(unix_seconds).ok()?;
    stamp.format(&Rfc3339).ok()
}

/// Like [`iso_timestamp`], with the current wall clock standing in for a
/// missing value.
pub fn iso_or_now(unix_seconds: i64) -> String {
    iso_timestamp(unix_seconds).unwrap_or_else(now_iso)
}

/// Current wall clock as RFC 3339.
pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_unix_seconds() {
        assert_eq!(
            iso_timestamp(1_700_000_000),
            Some("2023-11-14T22:13:20Z".to_string())
        );
    }

    #[test]
    fn test_zero_means_absent() {
        assert_eq!(iso_timestamp(0), None);
    }

    #[test]
    fn test_fallback_uses_the_wall_clock() {
        let now = iso_or_now(0);
        assert!(now.contains('T'));
        assert!(!now.is_empty());
    }
}
