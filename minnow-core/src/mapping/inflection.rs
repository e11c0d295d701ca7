/// Word inflection used to derive table names from type names.
pub trait InflectionService: Send + Sync {
    fn to_plural(&self, word: &str) -> String;
    fn to_singular(&self, word: &str) -> String;
}

/// English rules, good enough for type names.
///
/// Only the trailing word of a compound name is inflected, `SalesPerson`
/// becomes `SalesPeople`. The case of the replaced suffix follows the
/// original word.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishInflectionService;

const UNCOUNTABLE: &[&str] = &[
    "aircraft",
    "deer",
    "equipment",
    "fish",
    "information",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
];

/// Start of the trailing word: the last uppercase letter following a
/// lowercase one, or the position after the last underscore.
fn last_word_start(word: &str) -> usize {
    let bytes = word.as_bytes();
    let mut start = 0;
    for (i, c) in bytes.iter().enumerate() {
        if *c == b'_' {
            start = i + 1;
        } else if i > 0 && c.is_ascii_uppercase() && !bytes[i - 1].is_ascii_uppercase() {
            start = i;
        }
    }
    start
}

/// Replaces `strip` trailing bytes with `suffix`, matching the case of the
/// word.
fn replace_suffix(word: &str, strip: usize, suffix: &str) -> String {
    let keep = &word[..word.len() - strip];
    let upper = word.len() > 1 && word.bytes().all(|c| !c.is_ascii_lowercase());
    let mut result = String::with_capacity(keep.len() + suffix.len());
    result.push_str(keep);
    if upper {
        result.push_str(&suffix.to_ascii_uppercase());
    } else {
        result.push_str(suffix);
    }
    result
}

/// Swaps a whole trailing word, keeping its first letter case.
fn replace_word(word: &str, start: usize, replacement: &str) -> String {
    let original = &word[start..];
    let mut result = String::with_capacity(start + replacement.len());
    result.push_str(&word[..start]);
    if original.len() > 1 && original.bytes().all(|c| !c.is_ascii_lowercase()) {
        result.push_str(&replacement.to_ascii_uppercase());
    } else if original.starts_with(|c: char| c.is_ascii_uppercase()) {
        let mut chars = replacement.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.push_str(chars.as_str());
        }
    } else {
        result.push_str(replacement);
    }
    result
}

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

impl InflectionService for EnglishInflectionService {
    fn to_plural(&self, word: &str) -> String {
        if word.is_empty() || !word.is_ascii() {
            return word.to_owned();
        }
        let start = last_word_start(word);
        let last = word[start..].to_ascii_lowercase();
        if UNCOUNTABLE.contains(&last.as_str()) {
            return word.to_owned();
        }
        if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == last) {
            return replace_word(word, start, plural);
        }
        if IRREGULAR.iter().any(|(_, plural)| *plural == last) {
            return word.to_owned();
        }
        let bytes = last.as_bytes();
        let penultimate = bytes.len().checked_sub(2).map(|i| bytes[i]);
        if last.ends_with("quiz") {
            replace_suffix(word, 0, "zes")
        } else if last.ends_with('y') && penultimate.is_some_and(|c| !is_vowel(c)) {
            replace_suffix(word, 1, "ies")
        } else if last.ends_with("is") && last.len() > 3 {
            replace_suffix(word, 2, "es")
        } else if last.ends_with("fe") && last != "safe" {
            replace_suffix(word, 2, "ves")
        } else if last.ends_with("lf") {
            replace_suffix(word, 1, "ves")
        } else if last.ends_with(['s', 'x', 'z']) || last.ends_with("ch") || last.ends_with("sh")
        {
            replace_suffix(word, 0, "es")
        } else {
            replace_suffix(word, 0, "s")
        }
    }

    fn to_singular(&self, word: &str) -> String {
        if word.is_empty() || !word.is_ascii() {
            return word.to_owned();
        }
        let start = last_word_start(word);
        let last = word[start..].to_ascii_lowercase();
        if UNCOUNTABLE.contains(&last.as_str()) {
            return word.to_owned();
        }
        if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == last) {
            return replace_word(word, start, singular);
        }
        if IRREGULAR.iter().any(|(singular, _)| *singular == last) {
            return word.to_owned();
        }
        if last.ends_with("quizzes") {
            replace_suffix(word, 3, "")
        } else if last.ends_with("ies") && last.len() > 3 {
            replace_suffix(word, 3, "y")
        } else if last.ends_with("lves") {
            replace_suffix(word, 3, "f")
        } else if last.ends_with("ves") {
            replace_suffix(word, 3, "fe")
        } else if last.ends_with("yses") {
            replace_suffix(word, 2, "is")
        } else if last.ends_with("sses")
            || last.ends_with("uses")
            || last.ends_with("xes")
            || last.ends_with("zes")
            || last.ends_with("ches")
            || last.ends_with("shes")
        {
            replace_suffix(word, 2, "")
        } else if last.ends_with('s') && !last.ends_with("ss") {
            replace_suffix(word, 1, "")
        } else {
            word.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EnglishInflectionService, InflectionService};

    #[test]
    fn plural() {
        let service = EnglishInflectionService;
        for (singular, plural) in [
            ("Customer", "Customers"),
            ("Category", "Categories"),
            ("Day", "Days"),
            ("Address", "Addresses"),
            ("Box", "Boxes"),
            ("Match", "Matches"),
            ("Status", "Statuses"),
            ("Person", "People"),
            ("SalesPerson", "SalesPeople"),
            ("Child", "Children"),
            ("Equipment", "Equipment"),
            ("Knife", "Knives"),
            ("Shelf", "Shelves"),
            ("Analysis", "Analyses"),
            ("Quiz", "Quizzes"),
            ("CUSTOMER", "CUSTOMERS"),
            ("credit_card", "credit_cards"),
        ] {
            assert_eq!(service.to_plural(singular), plural, "plural of {singular}");
        }
    }

    #[test]
    fn singular() {
        let service = EnglishInflectionService;
        for (plural, singular) in [
            ("Customers", "Customer"),
            ("Categories", "Category"),
            ("Addresses", "Address"),
            ("Boxes", "Box"),
            ("Matches", "Match"),
            ("Statuses", "Status"),
            ("People", "Person"),
            ("Knives", "Knife"),
            ("Shelves", "Shelf"),
            ("Analyses", "Analysis"),
            ("Quizzes", "Quiz"),
            ("Address", "Address"),
            ("Sheep", "Sheep"),
        ] {
            assert_eq!(service.to_singular(plural), singular, "singular of {plural}");
        }
    }
}
