//! `%ZONE%` substitution for record template patterns.

/// The only token recognised in name and content patterns.
pub const ZONE_TOKEN: &str = "%ZONE%";

/// Replace every literal `%ZONE%` in `pattern` with `zone`.
///
/// Single pass, case-sensitive, no normalisation of `zone`. A zone name that
/// itself contains the token is inserted as-is and never expanded again.
pub fn substitute(pattern: &str, zone: &str) -> String {
    pattern.replace(ZONE_TOKEN, zone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(
            substitute("ns1.%ZONE% admin.%ZONE%", "example.org"),
            "ns1.example.org admin.example.org"
        );
        assert_eq!(substitute("%ZONE%%ZONE%", "a"), "aa");
    }

    #[test]
    fn leaves_other_text_alone() {
        assert_eq!(substitute("mail.example.net.", "example.org"), "mail.example.net.");
        assert_eq!(substitute("%zone% %ZONE", "example.org"), "%zone% %ZONE");
        assert_eq!(substitute("", "example.org"), "");
    }

    #[test]
    fn zone_is_inserted_verbatim() {
        assert_eq!(substitute("www.%ZONE%", "Example.ORG."), "www.Example.ORG.");
        assert_eq!(substitute("x.%ZONE%", "%ZONE%"), "x.%ZONE%");
    }
}
