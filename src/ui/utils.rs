#[must_use]
pub fn truncate_label(value: &str, width: usize) -> String {
    let char_count = value.chars().count();
    if char_count <= width {
        return value.to_string();
    }

    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut text: String = value.chars().take(width - 3).collect();
    text.push_str("...");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_are_unchanged() {
        assert_eq!(truncate_label("mab1", 10), "mab1");
        assert_eq!(truncate_label("mab1", 4), "mab1");
    }

    #[test]
    fn long_labels_get_ellipsis() {
        assert_eq!(truncate_label("antibody-heavy", 8), "antib...");
        assert_eq!(truncate_label("antibody", 3), "ant");
    }
}
