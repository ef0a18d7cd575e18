//! Spreadsheet-style column addressing.
//!
//! Labels use bijective base-26 numbering: `A` is offset 0, `Z` is 25, `AA` is 26,
//! `AB` is 27 and so on. Only uppercase ASCII letters are accepted.

use crate::ModelError;

/// Converts a column label to its zero-based offset.
pub fn column_index(label: &str) -> Result<usize, ModelError> {
    if label.is_empty() {
        return Err(ModelError::UnknownColumn(label.to_string()));
    }
    // u128 so that the label of usize::MAX still round-trips.
    let mut acc: u128 = 0;
    for byte in label.bytes() {
        if !byte.is_ascii_uppercase() {
            return Err(ModelError::UnknownColumn(label.to_string()));
        }
        let digit = u128::from(byte - b'A') + 1;
        acc = acc
            .checked_mul(26)
            .and_then(|value| value.checked_add(digit))
            .ok_or_else(|| ModelError::UnknownColumn(label.to_string()))?;
    }
    usize::try_from(acc - 1).map_err(|_| ModelError::UnknownColumn(label.to_string()))
}

/// Converts a zero-based offset to its column label.
pub fn column_label(index: usize) -> String {
    let mut col = index as u128 + 1;
    let mut out = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        out.push(b'A' + rem);
        col = (col - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Reads the raw cell at `label`, treating cells past the end of the record as empty.
pub fn cell_at<'a, S: AsRef<str>>(record: &'a [S], label: &str) -> Result<&'a str, ModelError> {
    let idx = column_index(label)?;
    Ok(record.get(idx).map(AsRef::as_ref).unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(27), "AB");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
        assert_eq!(column_index("AB").unwrap(), 27);
        assert_eq!(column_index("ZZ").unwrap(), 701);
    }

    #[test]
    fn rejects_bad_labels() {
        for label in ["", "a", "A1", " A", "Ä"] {
            assert!(
                matches!(column_index(label), Err(ModelError::UnknownColumn(_))),
                "{label:?} should be rejected"
            );
        }
    }

    #[test]
    fn cell_past_end_is_empty() {
        let record = vec!["x".to_string()];
        assert_eq!(cell_at(&record, "A").unwrap(), "x");
        assert_eq!(cell_at(&record, "C").unwrap(), "");
    }
}
