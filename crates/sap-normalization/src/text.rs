//! Text canonicalization for comparisons.

use unicode_normalization::UnicodeNormalization;

/// Generic words dropped from procedure names before matching.
const PROCEDURE_STOP_WORDS: &[&str] = &[
    "cirurgia",
    "procedimento",
    "de",
    "do",
    "da",
    "em",
    "com",
    "para",
];

/// Lowercases, strips accents, replaces non-alphanumerics with spaces and
/// collapses whitespace.
///
/// Characters without an ASCII decomposition are dropped.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| {
            let lower = c.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() { lower } else { ' ' }
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a procedure name and removes generic stop words.
pub fn clean_procedure_name(procedure: &str) -> String {
    normalize_text(procedure)
        .split(' ')
        .filter(|word| !word.is_empty() && !PROCEDURE_STOP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized text with every space removed.
pub fn compact(text: &str) -> String {
    normalize_text(text).replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_punctuation() {
        assert_eq!(normalize_text("  Cirurgia   Cardíaca (ADULTO)! "), "cirurgia cardiaca adulto");
        assert_eq!(normalize_text("Hr Incisão"), "hr incisao");
        assert_eq!(normalize_text("AMOXICILINA+CLAVULANATO"), "amoxicilina clavulanato");
    }

    #[test]
    fn empty_input_yields_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \t\n "), "");
        assert_eq!(normalize_text("---"), "");
    }

    #[test]
    fn clean_removes_stop_words() {
        assert_eq!(
            clean_procedure_name("Cirurgia de Correção da Hérnia"),
            "correcao hernia"
        );
        assert_eq!(clean_procedure_name("procedimento para"), "");
    }
}
