/// Output classes in the order the model was trained on.
pub static LABELS: [&str; 46] = [
    "yna",
    "taamatar",
    "thaa",
    "daa",
    "dhaa",
    "adna",
    "tabala",
    "tha",
    "da",
    "dha",
    "ka",
    "na",
    "pa",
    "pha",
    "ba",
    "bha",
    "ma",
    "yaw",
    "ra",
    "la",
    "waw",
    "kha",
    "motosaw",
    "petchiryakha",
    "patalosaw",
    "ha",
    "chhya",
    "tra",
    "gya",
    "ga",
    "gha",
    "kna",
    "cha",
    "chha",
    "ja",
    "jha",
    "0",
    "1",
    "2",
    "3",
    "4",
    "5",
    "6",
    "7",
    "8",
    "9",
];

pub fn resolve(index: usize) -> Option<&'static str> {
    LABELS.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_46_classes() {
        assert_eq!(LABELS.len(), 46);
    }

    #[test]
    fn resolves_first_and_last() {
        assert_eq!(resolve(0), Some("yna"));
        assert_eq!(resolve(36), Some("0"));
        assert_eq!(resolve(45), Some("9"));
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(resolve(46), None);
        assert_eq!(resolve(usize::MAX), None);
    }

    #[test]
    fn entries_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for label in LABELS {
            assert!(seen.insert(label), "duplicate label: {}", label);
        }
    }
}
