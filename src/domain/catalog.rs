//! Static reference data: the chapter table and the reciter and
//! translation catalogs.

use std::fmt;

pub const CHAPTER_COUNT: u16 = 114;

/// Chapter 9 is the only one not opened by the basmala.
pub const CHAPTER_WITHOUT_BASMALA: u16 = 9;

pub const BASMALA: &str = "بِسْمِ ٱللَّهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ";
pub const BASMALA_TRANSLATION: &str = "In the name of Allah, the Most Gracious, the Most Merciful";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revelation {
    Meccan,
    Medinan,
}

impl fmt::Display for Revelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revelation::Meccan => f.write_str("Meccan"),
            Revelation::Medinan => f.write_str("Medinan"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chapter {
    pub number: u16,
    pub name: &'static str,
    pub translation: &'static str,
    pub revelation: Revelation,
    pub verse_count: u16,
}

impl Chapter {
    const fn new(
        number: u16,
        name: &'static str,
        translation: &'static str,
        revelation: Revelation,
        verse_count: u16,
    ) -> Self {
        Self {
            number,
            name,
            translation,
            revelation,
            verse_count,
        }
    }
}

/// An edition the user can pick: a reciter or a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditionOption {
    pub identifier: &'static str,
    pub name: &'static str,
    pub language: &'static str,
}

impl EditionOption {
    /// First word of the name, used for column headers.
    pub fn short_name(&self) -> &'static str {
        self.name.split(' ').next().unwrap_or(self.name)
    }
}

pub const RECITERS: &[EditionOption] = &[
    EditionOption { identifier: "ar.alafasy", name: "Mishary Rashid Alafasy", language: "ar" },
    EditionOption { identifier: "ar.abdulbasitmurattal", name: "Abdul Basit (Murattal)", language: "ar" },
    EditionOption { identifier: "ar.abdurrahmaansudais", name: "Abdurrahman As-Sudais", language: "ar" },
    EditionOption { identifier: "ar.shaatree", name: "Abu Bakr Ash-Shaatree", language: "ar" },
    EditionOption { identifier: "ar.husary", name: "Mahmoud Khalil Al-Husary", language: "ar" },
    EditionOption { identifier: "ar.minshawi", name: "Mohamed Siddiq Al-Minshawi", language: "ar" },
];

pub const TRANSLATIONS: &[EditionOption] = &[
    EditionOption { identifier: "en.asad", name: "Muhammad Asad", language: "en" },
    EditionOption { identifier: "en.sahih", name: "Sahih International", language: "en" },
    EditionOption { identifier: "en.pickthall", name: "Mohammed Marmaduke William Pickthall", language: "en" },
    EditionOption { identifier: "en.yusufali", name: "Abdullah Yusuf Ali", language: "en" },
    EditionOption { identifier: "en.hilali", name: "Muhammad Taqi-ud-Din al-Hilali & Muhammad Muhsin Khan", language: "en" },
    EditionOption { identifier: "ur.jalandhry", name: "Fateh Muhammad Jalandhry (Urdu)", language: "ur" },
];

pub const CHAPTERS: [Chapter; CHAPTER_COUNT as usize] = [
    Chapter::new(1, "Al-Fatihah", "The Opening", Revelation::Meccan, 7),
    Chapter::new(2, "Al-Baqarah", "The Cow", Revelation::Medinan, 286),
    Chapter::new(3, "Ali 'Imran", "Family of Imran", Revelation::Medinan, 200),
    Chapter::new(4, "An-Nisa", "The Women", Revelation::Medinan, 176),
    Chapter::new(5, "Al-Ma'idah", "The Table Spread", Revelation::Medinan, 120),
    Chapter::new(6, "Al-An'am", "The Cattle", Revelation::Meccan, 165),
    Chapter::new(7, "Al-A'raf", "The Heights", Revelation::Meccan, 206),
    Chapter::new(8, "Al-Anfal", "The Spoils of War", Revelation::Medinan, 75),
    Chapter::new(9, "At-Tawbah", "The Repentance", Revelation::Medinan, 129),
    Chapter::new(10, "Yunus", "Jonah", Revelation::Meccan, 109),
    Chapter::new(11, "Hud", "Hud", Revelation::Meccan, 123),
    Chapter::new(12, "Yusuf", "Joseph", Revelation::Meccan, 111),
    Chapter::new(13, "Ar-Ra'd", "The Thunder", Revelation::Medinan, 43),
    Chapter::new(14, "Ibrahim", "Abraham", Revelation::Meccan, 52),
    Chapter::new(15, "Al-Hijr", "The Rocky Tract", Revelation::Meccan, 99),
    Chapter::new(16, "An-Nahl", "The Bee", Revelation::Meccan, 128),
    Chapter::new(17, "Al-Isra", "The Night Journey", Revelation::Meccan, 111),
    Chapter::new(18, "Al-Kahf", "The Cave", Revelation::Meccan, 110),
    Chapter::new(19, "Maryam", "Mary", Revelation::Meccan, 98),
    Chapter::new(20, "Taha", "Ta-Ha", Revelation::Meccan, 135),
    Chapter::new(21, "Al-Anbya", "The Prophets", Revelation::Meccan, 112),
    Chapter::new(22, "Al-Hajj", "The Pilgrimage", Revelation::Medinan, 78),
    Chapter::new(23, "Al-Mu'minun", "The Believers", Revelation::Meccan, 118),
    Chapter::new(24, "An-Nur", "The Light", Revelation::Medinan, 64),
    Chapter::new(25, "Al-Furqan", "The Criterion", Revelation::Meccan, 77),
    Chapter::new(26, "Ash-Shu'ara", "The Poets", Revelation::Meccan, 227),
    Chapter::new(27, "An-Naml", "The Ant", Revelation::Meccan, 93),
    Chapter::new(28, "Al-Qasas", "The Stories", Revelation::Meccan, 88),
    Chapter::new(29, "Al-'Ankabut", "The Spider", Revelation::Meccan, 69),
    Chapter::new(30, "Ar-Rum", "The Romans", Revelation::Meccan, 60),
    Chapter::new(31, "Luqman", "Luqman", Revelation::Meccan, 34),
    Chapter::new(32, "As-Sajdah", "The Prostration", Revelation::Meccan, 30),
    Chapter::new(33, "Al-Ahzab", "The Combined Forces", Revelation::Medinan, 73),
    Chapter::new(34, "Saba", "Sheba", Revelation::Meccan, 54),
    Chapter::new(35, "Fatir", "Originator", Revelation::Meccan, 45),
    Chapter::new(36, "Ya-Sin", "Ya Sin", Revelation::Meccan, 83),
    Chapter::new(37, "As-Saffat", "Those who set the Ranks", Revelation::Meccan, 182),
    Chapter::new(38, "Sad", "The Letter Sad", Revelation::Meccan, 88),
    Chapter::new(39, "Az-Zumar", "The Troops", Revelation::Meccan, 75),
    Chapter::new(40, "Ghafir", "The Forgiver", Revelation::Meccan, 85),
    Chapter::new(41, "Fussilat", "Explained in Detail", Revelation::Meccan, 54),
    Chapter::new(42, "Ash-Shuraa", "The Consultation", Revelation::Meccan, 53),
    Chapter::new(43, "Az-Zukhruf", "The Ornaments of Gold", Revelation::Meccan, 89),
    Chapter::new(44, "Ad-Dukhan", "The Smoke", Revelation::Meccan, 59),
    Chapter::new(45, "Al-Jathiyah", "The Crouching", Revelation::Meccan, 37),
    Chapter::new(46, "Al-Ahqaf", "The Wind-Curved Sandhills", Revelation::Meccan, 35),
    Chapter::new(47, "Muhammad", "Muhammad", Revelation::Medinan, 38),
    Chapter::new(48, "Al-Fath", "The Victory", Revelation::Medinan, 29),
    Chapter::new(49, "Al-Hujurat", "The Rooms", Revelation::Medinan, 18),
    Chapter::new(50, "Qaf", "The Letter Qaf", Revelation::Meccan, 45),
    Chapter::new(51, "Adh-Dhariyat", "The Winnowing Winds", Revelation::Meccan, 60),
    Chapter::new(52, "At-Tur", "The Mount", Revelation::Meccan, 49),
    Chapter::new(53, "An-Najm", "The Star", Revelation::Meccan, 62),
    Chapter::new(54, "Al-Qamar", "The Moon", Revelation::Meccan, 55),
    Chapter::new(55, "Ar-Rahman", "The Beneficent", Revelation::Medinan, 78),
    Chapter::new(56, "Al-Waqi'ah", "The Inevitable", Revelation::Meccan, 96),
    Chapter::new(57, "Al-Hadid", "The Iron", Revelation::Medinan, 29),
    Chapter::new(58, "Al-Mujadila", "The Pleading Woman", Revelation::Medinan, 22),
    Chapter::new(59, "Al-Hashr", "The Exile", Revelation::Medinan, 24),
    Chapter::new(60, "Al-Mumtahanah", "She that is to be examined", Revelation::Medinan, 13),
    Chapter::new(61, "As-Saf", "The Ranks", Revelation::Medinan, 14),
    Chapter::new(62, "Al-Jumu'ah", "The Congregation", Revelation::Medinan, 11),
    Chapter::new(63, "Al-Munafiqun", "The Hypocrites", Revelation::Medinan, 11),
    Chapter::new(64, "At-Taghabun", "The Mutual Disillusion", Revelation::Medinan, 18),
    Chapter::new(65, "At-Talaq", "The Divorce", Revelation::Medinan, 12),
    Chapter::new(66, "At-Tahrim", "The Prohibition", Revelation::Medinan, 12),
    Chapter::new(67, "Al-Mulk", "The Sovereignty", Revelation::Meccan, 30),
    Chapter::new(68, "Al-Qalam", "The Pen", Revelation::Meccan, 52),
    Chapter::new(69, "Al-Haqqah", "The Reality", Revelation::Meccan, 52),
    Chapter::new(70, "Al-Ma'arij", "The Ascending Stairways", Revelation::Meccan, 44),
    Chapter::new(71, "Nuh", "Noah", Revelation::Meccan, 28),
    Chapter::new(72, "Al-Jinn", "The Jinn", Revelation::Meccan, 28),
    Chapter::new(73, "Al-Muzzammil", "The Enshrouded One", Revelation::Meccan, 20),
    Chapter::new(74, "Al-Muddaththir", "The Cloaked One", Revelation::Meccan, 56),
    Chapter::new(75, "Al-Qiyamah", "The Resurrection", Revelation::Meccan, 40),
    Chapter::new(76, "Al-Insan", "The Man", Revelation::Medinan, 31),
    Chapter::new(77, "Al-Mursalat", "The Emissaries", Revelation::Meccan, 50),
    Chapter::new(78, "An-Naba", "The Tidings", Revelation::Meccan, 40),
    Chapter::new(79, "An-Nazi'at", "Those who drag forth", Revelation::Meccan, 46),
    Chapter::new(80, "Abasa", "He Frowned", Revelation::Meccan, 42),
    Chapter::new(81, "At-Takwir", "The Overthrowing", Revelation::Meccan, 29),
    Chapter::new(82, "Al-Infitar", "The Cleaving", Revelation::Meccan, 19),
    Chapter::new(83, "Al-Mutaffifin", "The Defrauding", Revelation::Meccan, 36),
    Chapter::new(84, "Al-Inshiqaq", "The Sundering", Revelation::Meccan, 25),
    Chapter::new(85, "Al-Buruj", "The Mansions of the Stars", Revelation::Meccan, 22),
    Chapter::new(86, "At-Tariq", "The Nightcomer", Revelation::Meccan, 17),
    Chapter::new(87, "Al-A'la", "The Most High", Revelation::Meccan, 19),
    Chapter::new(88, "Al-Ghashiyah", "The Overwhelming", Revelation::Meccan, 26),
    Chapter::new(89, "Al-Fajr", "The Dawn", Revelation::Meccan, 30),
    Chapter::new(90, "Al-Balad", "The City", Revelation::Meccan, 20),
    Chapter::new(91, "Ash-Shams", "The Sun", Revelation::Meccan, 15),
    Chapter::new(92, "Al-Layl", "The Night", Revelation::Meccan, 21),
    Chapter::new(93, "Ad-Duhaa", "The Morning Hours", Revelation::Meccan, 11),
    Chapter::new(94, "Ash-Sharh", "The Relief", Revelation::Meccan, 8),
    Chapter::new(95, "At-Tin", "The Fig", Revelation::Meccan, 8),
    Chapter::new(96, "Al-'Alaq", "The Clot", Revelation::Meccan, 19),
    Chapter::new(97, "Al-Qadr", "The Power", Revelation::Meccan, 5),
    Chapter::new(98, "Al-Bayyinah", "The Clear Proof", Revelation::Medinan, 8),
    Chapter::new(99, "Az-Zalzalah", "The Earthquake", Revelation::Medinan, 8),
    Chapter::new(100, "Al-'Adiyat", "The Courser", Revelation::Meccan, 11),
    Chapter::new(101, "Al-Qari'ah", "The Calamity", Revelation::Meccan, 11),
    Chapter::new(102, "At-Takathur", "The Rivalry in world increase", Revelation::Meccan, 8),
    Chapter::new(103, "Al-'Asr", "The Declining Day", Revelation::Meccan, 3),
    Chapter::new(104, "Al-Humazah", "The Traducer", Revelation::Meccan, 9),
    Chapter::new(105, "Al-Fil", "The Elephant", Revelation::Meccan, 5),
    Chapter::new(106, "Quraysh", "Quraysh", Revelation::Meccan, 4),
    Chapter::new(107, "Al-Ma'un", "The Small kindnesses", Revelation::Meccan, 7),
    Chapter::new(108, "Al-Kawthar", "The Abundance", Revelation::Meccan, 3),
    Chapter::new(109, "Al-Kafirun", "The Disbelievers", Revelation::Meccan, 6),
    Chapter::new(110, "An-Nasr", "The Divine Support", Revelation::Medinan, 3),
    Chapter::new(111, "Al-Masad", "The Palm Fiber", Revelation::Meccan, 5),
    Chapter::new(112, "Al-Ikhlas", "The Sincerity", Revelation::Meccan, 4),
    Chapter::new(113, "Al-Falaq", "The Daybreak", Revelation::Meccan, 5),
    Chapter::new(114, "An-Nas", "Mankind", Revelation::Meccan, 6),
];

pub fn chapter(number: u16) -> Option<&'static Chapter> {
    number
        .checked_sub(1)
        .and_then(|index| CHAPTERS.get(index as usize))
}

/// Whether the reader shows the basmala above this chapter's verses.
pub fn has_basmala(number: u16) -> bool {
    is_valid_chapter(number) && number != CHAPTER_WITHOUT_BASMALA
}

pub fn is_valid_chapter(number: u16) -> bool {
    (1..=CHAPTER_COUNT).contains(&number)
}

pub fn reciter(identifier: &str) -> Option<&'static EditionOption> {
    RECITERS.iter().find(|r| r.identifier == identifier)
}

pub fn translation(identifier: &str) -> Option<&'static EditionOption> {
    TRANSLATIONS.iter().find(|t| t.identifier == identifier)
}

pub fn default_reciter() -> &'static EditionOption {
    &RECITERS[0]
}

pub fn default_translation() -> &'static EditionOption {
    &TRANSLATIONS[0]
}

/// Step through a catalog by `delta`, wrapping at both ends.
///
/// An unknown identifier starts from the first entry.
pub fn cycle(options: &'static [EditionOption], current: &str, delta: i32) -> &'static EditionOption {
    let len = options.len() as i32;
    let position = options
        .iter()
        .position(|o| o.identifier == current)
        .map(|p| p as i32)
        .unwrap_or(0);
    let next = (position + delta).rem_euclid(len);
    &options[next as usize]
}
