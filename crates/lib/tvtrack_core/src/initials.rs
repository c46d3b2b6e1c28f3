//! Avatar initials for shows without artwork.

/// First letter of every whitespace-separated word, uppercased.
///
/// `"Breaking Bad"` becomes `"BB"`; an empty name yields an empty string.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_words() {
        assert_eq!(initials("Breaking Bad"), "BB");
    }

    #[test]
    fn lowercase_and_extra_spaces() {
        assert_eq!(initials("  the   wire "), "TW");
    }

    #[test]
    fn empty_name() {
        assert_eq!(initials(""), "");
    }

    #[test]
    fn non_ascii_first_letter() {
        assert_eq!(initials("élite"), "É");
    }
}
