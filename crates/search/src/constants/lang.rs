//! Languages offered by the language facet.

/// A catalog language: ISO 639 code and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    pub code: &'static str,
    pub label: &'static str,
}
const fn lang(code: &'static str, label: &'static str) -> Language {
    Language { code, label }
}

/// Offered languages, in facet display order.
pub static LANGUAGES: &[Language] = &[
    lang("en", "English"),
    lang("fr", "French"),
    lang("de", "German"),
    lang("fi", "Finnish"),
    lang("nl", "Dutch"),
    lang("it", "Italian"),
    lang("es", "Spanish"),
    lang("pt", "Portuguese"),
    lang("zh", "Chinese"),
    lang("el", "Greek"),
    lang("sv", "Swedish"),
    lang("la", "Latin"),
    lang("eo", "Esperanto"),
    lang("da", "Danish"),
    lang("hu", "Hungarian"),
    lang("ja", "Japanese"),
    lang("pl", "Polish"),
    lang("ca", "Catalan"),
    lang("ru", "Russian"),
    lang("tl", "Tagalog"),
    lang("no", "Norwegian"),
    lang("cy", "Welsh"),
    lang("cs", "Czech"),
    lang("is", "Icelandic"),
];
