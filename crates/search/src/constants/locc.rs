//! Library of Congress Classification main classes.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MainClass {
    pub code: &'static str,
    pub label: &'static str,
}
impl MainClass {
    /// Looks up a top-level class by its (upper-case) code.
    pub fn find(code: &str) -> Option<&'static MainClass> {
        MAIN_CLASSES.iter().find(|class| class.code == code)
    }
}

const fn class(code: &'static str, label: &'static str) -> MainClass {
    MainClass { code, label }
}

pub static MAIN_CLASSES: &[MainClass] = &[
    class("A", "General Works"),
    class("B", "Philosophy, Psychology, Religion"),
    class("C", "Auxiliary Sciences of History"),
    class("D", "World History (except American)"),
    class("E", "History of the Americas"),
    class("F", "Local History of the Americas"),
    class("G", "Geography, Anthropology, Recreation"),
    class("H", "Social Sciences"),
    class("J", "Political Science"),
    class("K", "Law"),
    class("L", "Education"),
    class("M", "Music"),
    class("N", "Fine Arts"),
    class("P", "Language and Literature"),
    class("Q", "Science"),
    class("R", "Medicine"),
    class("S", "Agriculture"),
    class("T", "Technology"),
    class("U", "Military Science"),
    class("V", "Naval Science"),
    class("Z", "Bibliography, Library Science"),
];
