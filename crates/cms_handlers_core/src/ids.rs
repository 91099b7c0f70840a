use rand::Rng;

/// Random 128-bit id in the `8-4-4-4-12` hex grouping the CMS has always
/// used for content ids and log correlation. Not an RFC 4122 UUID: no
/// version or variant bits are pinned, matching the generator this replaces.
pub fn guid() -> String {
    let raw = format!("{:032x}", rand::thread_rng().gen::<u128>());
    format!(
        "{}-{}-{}-{}-{}",
        &raw[0..8],
        &raw[8..12],
        &raw[12..16],
        &raw[16..20],
        &raw[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_has_canonical_grouping() {
        let id = guid();
        assert_eq!(id.len(), 36);

        let groups: Vec<&str> = id.split('-').collect();
        let lengths: Vec<usize> = groups.iter().map(|group| group.len()).collect();
        assert_eq!(lengths, vec![8, 4, 4, 4, 12]);
        assert!(groups
            .iter()
            .all(|group| group.chars().all(|c| c.is_ascii_hexdigit())));
    }

    #[test]
    fn consecutive_guids_differ() {
        assert_ne!(guid(), guid());
    }
}
