//! Curated bookshelves, grouped by genre category.

/// A single curated shelf: `(shelf id, display name)`.
pub type Shelf = (u64, &'static str);

/// A genre category owning an ordered list of curated shelves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookshelfCategory {
    /// URL key of the category (`?category=...`).
    pub name: &'static str,
    /// Display name of the category.
    pub genre: &'static str,
    pub shelves: &'static [Shelf],
}
impl BookshelfCategory {
    /// Looks up a category by its URL key.
    ///
    /// ```
    /// use folio_search::constants::BookshelfCategory;
    /// assert_eq!(BookshelfCategory::find("literature").unwrap().genre, "Literature");
    /// assert!(BookshelfCategory::find("Literature").is_none());
    /// ```
    pub fn find(name: &str) -> Option<&'static BookshelfCategory> {
        CURATED_BOOKSHELVES.iter().find(|category| category.name == name)
    }

    /// Finds the category owning a shelf, along with the shelf's name.
    pub fn owning(shelf_id: u64) -> Option<(&'static BookshelfCategory, &'static str)> {
        CURATED_BOOKSHELVES.iter().find_map(|category| {
            category.shelves.iter().find(|(id, _)| *id == shelf_id).map(|(_, name)| (category, *name))
        })
    }

    /// Iterates every shelf of every category, in declared order.
    pub fn all_shelves() -> impl Iterator<Item = &'static Shelf> {
        CURATED_BOOKSHELVES.iter().flat_map(|category| category.shelves.iter())
    }
}

pub static CURATED_BOOKSHELVES: &[BookshelfCategory] = &[
    BookshelfCategory {
        name: "literature",
        genre: "Literature",
        shelves: &[
            (644, "Adventure"),
            (654, "American Literature"),
            (653, "British Literature"),
            (652, "French Literature"),
            (651, "German Literature"),
            (650, "Russian Literature"),
            (649, "Classics of Literature"),
            (643, "Erotic Fiction"),
            (645, "Fiction"),
            (634, "Poetry"),
            (637, "Plays/Films/Dramas"),
            (638, "Romance"),
            (639, "Science-Fiction & Fantasy"),
            (640, "Crime, Thrillers and Mystery"),
            (641, "Mythology, Legends & Folklore"),
            (642, "Humour"),
            (646, "Short Stories"),
        ],
    },
    BookshelfCategory {
        name: "children",
        genre: "Children & Young Adult",
        shelves: &[
            (636, "Children & Young Adult Reading"),
            (647, "Historical Fiction for Children"),
        ],
    },
    BookshelfCategory {
        name: "history",
        genre: "History",
        shelves: &[
            (656, "History - American"),
            (657, "History - British"),
            (658, "History - European"),
            (659, "History - Ancient"),
            (660, "History - Medieval/Middle Ages"),
            (661, "History - Early Modern (c. 1450-1750)"),
            (662, "History - Modern (1750+)"),
            (663, "History - Religious"),
            (664, "History - Royalty"),
            (665, "History - Warfare"),
            (666, "History - Schools & Universities"),
            (667, "History - Other"),
            (668, "Archaeology & Anthropology"),
        ],
    },
    BookshelfCategory {
        name: "science",
        genre: "Science & Technology",
        shelves: &[
            (671, "Biology"),
            (672, "Chemistry"),
            (673, "Earth Sciences"),
            (674, "Mathematics"),
            (675, "Physics"),
            (676, "Engineering & Technology"),
            (677, "Environmental Issues"),
            (678, "Health & Medicine"),
            (679, "Nutrition"),
            (680, "Science - Other"),
        ],
    },
    BookshelfCategory {
        name: "arts",
        genre: "Arts & Culture",
        shelves: &[
            (681, "Art"),
            (682, "Architecture"),
            (683, "Fashion"),
            (684, "Music"),
            (685, "Journalism/Media/Writing"),
            (686, "Language & Communication"),
            (687, "Essays, Letters & Speeches"),
        ],
    },
    BookshelfCategory {
        name: "society",
        genre: "Society & Politics",
        shelves: &[
            (688, "Business/Management"),
            (689, "Economics"),
            (690, "Law & Criminology"),
            (691, "Politics"),
            (692, "Psychiatry/Psychology"),
            (693, "Sociology"),
            (694, "Gender & Sexuality Studies"),
            (695, "Race & Ethnic Studies"),
        ],
    },
    BookshelfCategory {
        name: "religion",
        genre: "Religion & Philosophy",
        shelves: &[(696, "Religion/Spirituality"), (697, "Philosophy & Ethics")],
    },
    BookshelfCategory {
        name: "lifestyle",
        genre: "Lifestyle & Hobbies",
        shelves: &[
            (698, "Cooking & Drinking"),
            (699, "Crafts/Hobbies"),
            (700, "Gardening"),
            (701, "Sports/Hobbies"),
            (702, "Travel Writing"),
            (703, "Parenthood & Family Relations"),
            (704, "How To ..."),
        ],
    },
    BookshelfCategory {
        name: "reference",
        genre: "Reference & Reading",
        shelves: &[
            (705, "Reference"),
            (706, "Encyclopedias/Dictionaries/Reference"),
            (707, "Biographies"),
            (708, "Teaching & Education"),
            (709, "Reports & Conference Proceedings"),
            (710, "Journals"),
        ],
    },
];
