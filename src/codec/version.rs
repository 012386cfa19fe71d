//! Dot-segment version comparison
//!
//! Versions compare segment by segment as integers, most significant first.
//! Missing segments count as 0, and so does a segment with no leading digits.
//! Only the leading digit run of a segment is read, so `"2-beta"` reads as 2.

use std::cmp::Ordering;

fn segment_value(segment: &str) -> u64 {
    let digits: String = segment
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn segments(version: &str) -> Vec<u64> {
    version.trim().split('.').map(segment_value).collect()
}

/// Compare two versions; the first differing segment decides
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    let left = segments(left);
    let right = segments(right);
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }

    Ordering::Equal
}

/// True if `version` is newer than `supported`
pub fn is_newer(version: &str, supported: &str) -> bool {
    compare_versions(version, supported) == Ordering::Greater
}
