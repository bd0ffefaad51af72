//! Fixed condition tables for the two recording-session conventions

/// Convention A: target paths keyed by target gender.
///
/// Target codes are `100 + 10 * prime + target` with female = 1, male = 2,
/// neutral = 3, and 4 for a filler prime or a control target. Responses
/// add 50 (incorrect) or 100 (correct), plus 5 for button `z`.
pub const TARGET_ANCHORED_TABLE: &[(&str, u32)] = &[
    // word / prime / <prime gender> / <prime age>
    ("word/prime/female/adult", 11),
    ("word/prime/female/child", 12),
    ("word/prime/female/neutral", 13),
    ("word/prime/male/adult", 21),
    ("word/prime/male/child", 22),
    ("word/prime/male/neutral", 23),
    ("word/prime/neutral/adult", 31),
    ("word/prime/neutral/child", 32),
    ("word/prime/neutral/neutral", 33),
    ("word/prime/filler", 40),

    // word / target / <target gender> / <congruency | prime gender>
    ("word/target/female/congruent", 111),
    ("word/target/female/incongruent", 121),
    ("word/target/female/neutral", 131),
    ("word/target/female/filler", 141),
    ("word/target/male/incongruent", 112),
    ("word/target/male/congruent", 122),
    ("word/target/male/neutral", 132),
    ("word/target/male/filler", 142),
    ("word/target/neutral/female", 113),
    ("word/target/neutral/male", 123),
    ("word/target/neutral/neutral", 133),
    ("word/target/neutral/filler", 143),
    ("word/target/control/female", 114),
    ("word/target/control/male", 124),
    ("word/target/control/neutral", 134),
    ("word/target/control/filler", 144),

    // response / <correctness> / <target gender> / <congruency | prime gender> / <button>
    ("response/incorrect/female/congruent/m", 161),
    ("response/incorrect/female/congruent/z", 166),
    ("response/incorrect/female/incongruent/m", 171),
    ("response/incorrect/female/incongruent/z", 176),
    ("response/incorrect/female/neutral/m", 181),
    ("response/incorrect/female/neutral/z", 186),
    ("response/incorrect/female/filler/m", 191),
    ("response/incorrect/female/filler/z", 196),
    ("response/incorrect/male/incongruent/m", 162),
    ("response/incorrect/male/incongruent/z", 167),
    ("response/incorrect/male/congruent/m", 172),
    ("response/incorrect/male/congruent/z", 177),
    ("response/incorrect/male/neutral/m", 182),
    ("response/incorrect/male/neutral/z", 187),
    ("response/incorrect/male/filler/m", 192),
    ("response/incorrect/male/filler/z", 197),
    ("response/incorrect/neutral/female/m", 163),
    ("response/incorrect/neutral/female/z", 168),
    ("response/incorrect/neutral/male/m", 173),
    ("response/incorrect/neutral/male/z", 178),
    ("response/incorrect/neutral/neutral/m", 183),
    ("response/incorrect/neutral/neutral/z", 188),
    ("response/incorrect/neutral/filler/m", 193),
    ("response/incorrect/neutral/filler/z", 198),
    ("response/incorrect/control/female/m", 164),
    ("response/incorrect/control/female/z", 169),
    ("response/incorrect/control/male/m", 174),
    ("response/incorrect/control/male/z", 179),
    ("response/incorrect/control/neutral/m", 184),
    ("response/incorrect/control/neutral/z", 189),
    ("response/incorrect/control/filler/m", 194),
    ("response/incorrect/control/filler/z", 199),
    ("response/correct/female/congruent/m", 211),
    ("response/correct/female/congruent/z", 216),
    ("response/correct/female/incongruent/m", 221),
    ("response/correct/female/incongruent/z", 226),
    ("response/correct/female/neutral/m", 231),
    ("response/correct/female/neutral/z", 236),
    ("response/correct/female/filler/m", 241),
    ("response/correct/female/filler/z", 246),
    ("response/correct/male/incongruent/m", 212),
    ("response/correct/male/incongruent/z", 217),
    ("response/correct/male/congruent/m", 222),
    ("response/correct/male/congruent/z", 227),
    ("response/correct/male/neutral/m", 232),
    ("response/correct/male/neutral/z", 237),
    ("response/correct/male/filler/m", 242),
    ("response/correct/male/filler/z", 247),
    ("response/correct/neutral/female/m", 213),
    ("response/correct/neutral/female/z", 218),
    ("response/correct/neutral/male/m", 223),
    ("response/correct/neutral/male/z", 228),
    ("response/correct/neutral/neutral/m", 233),
    ("response/correct/neutral/neutral/z", 238),
    ("response/correct/neutral/filler/m", 243),
    ("response/correct/neutral/filler/z", 248),
    ("response/correct/control/female/m", 214),
    ("response/correct/control/female/z", 219),
    ("response/correct/control/male/m", 224),
    ("response/correct/control/male/z", 229),
    ("response/correct/control/neutral/m", 234),
    ("response/correct/control/neutral/z", 239),
    ("response/correct/control/filler/m", 244),
    ("response/correct/control/filler/z", 249),
];

/// Convention B: target paths keyed by prime gender.
///
/// Codes encode the same prime/target condition as convention A
/// (`100 + 10 * prime + target`), so only the label paths differ.
pub const PRIME_ANCHORED_TABLE: &[(&str, u32)] = &[
    // word / prime / <prime gender> / <prime age>
    ("word/prime/female/adult", 11),
    ("word/prime/female/child", 12),
    ("word/prime/female/neutral", 13),
    ("word/prime/male/adult", 21),
    ("word/prime/male/child", 22),
    ("word/prime/male/neutral", 23),
    ("word/prime/neutral/adult", 31),
    ("word/prime/neutral/child", 32),
    ("word/prime/neutral/neutral", 33),
    ("word/prime/filler", 40),

    // word / target / <prime gender> / <congruency | target gender>
    ("word/target/female/congruent", 111),
    ("word/target/female/incongruent", 112),
    ("word/target/female/neutral", 113),
    ("word/target/female/control", 114),
    ("word/target/male/congruent", 122),
    ("word/target/male/incongruent", 121),
    ("word/target/male/neutral", 123),
    ("word/target/male/control", 124),
    ("word/target/neutral/female", 131),
    ("word/target/neutral/male", 132),
    ("word/target/neutral/neutral", 133),
    ("word/target/neutral/control", 134),
    ("word/target/filler", 140),

    // response / <correctness> / <prime gender> / <congruency | target gender> / <button>
    ("response/incorrect/female/congruent/m", 161),
    ("response/incorrect/female/congruent/z", 166),
    ("response/incorrect/female/incongruent/m", 162),
    ("response/incorrect/female/incongruent/z", 167),
    ("response/incorrect/female/neutral/m", 163),
    ("response/incorrect/female/neutral/z", 168),
    ("response/incorrect/female/control/m", 164),
    ("response/incorrect/female/control/z", 169),
    ("response/incorrect/male/congruent/m", 172),
    ("response/incorrect/male/congruent/z", 177),
    ("response/incorrect/male/incongruent/m", 171),
    ("response/incorrect/male/incongruent/z", 176),
    ("response/incorrect/male/neutral/m", 173),
    ("response/incorrect/male/neutral/z", 178),
    ("response/incorrect/male/control/m", 174),
    ("response/incorrect/male/control/z", 179),
    ("response/incorrect/neutral/female/m", 181),
    ("response/incorrect/neutral/female/z", 186),
    ("response/incorrect/neutral/male/m", 182),
    ("response/incorrect/neutral/male/z", 187),
    ("response/incorrect/neutral/neutral/m", 183),
    ("response/incorrect/neutral/neutral/z", 188),
    ("response/incorrect/neutral/control/m", 184),
    ("response/incorrect/neutral/control/z", 189),
    ("response/incorrect/filler/m", 190),
    ("response/incorrect/filler/z", 195),
    ("response/correct/female/congruent/m", 211),
    ("response/correct/female/congruent/z", 216),
    ("response/correct/female/incongruent/m", 212),
    ("response/correct/female/incongruent/z", 217),
    ("response/correct/female/neutral/m", 213),
    ("response/correct/female/neutral/z", 218),
    ("response/correct/female/control/m", 214),
    ("response/correct/female/control/z", 219),
    ("response/correct/male/congruent/m", 222),
    ("response/correct/male/congruent/z", 227),
    ("response/correct/male/incongruent/m", 221),
    ("response/correct/male/incongruent/z", 226),
    ("response/correct/male/neutral/m", 223),
    ("response/correct/male/neutral/z", 228),
    ("response/correct/male/control/m", 224),
    ("response/correct/male/control/z", 229),
    ("response/correct/neutral/female/m", 231),
    ("response/correct/neutral/female/z", 236),
    ("response/correct/neutral/male/m", 232),
    ("response/correct/neutral/male/z", 237),
    ("response/correct/neutral/neutral/m", 233),
    ("response/correct/neutral/neutral/z", 238),
    ("response/correct/neutral/control/m", 234),
    ("response/correct/neutral/control/z", 239),
    ("response/correct/filler/m", 240),
    ("response/correct/filler/z", 245),
];
