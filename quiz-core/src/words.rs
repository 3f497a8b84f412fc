/// One scrambled word in the fixed game sequence.
///
/// The list is a compile-time constant: the game is a single curated set of
/// 13 words played in order, not user-supplied content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordEntry {
    /// 0-based position, matches the array position.
    pub index: i32,
    pub scramble: &'static str,
    /// Uppercase canonical answer.
    pub answer: &'static str,
    pub clue: &'static str,
}

pub const WORDS: [WordEntry; 13] = [
    WordEntry {
        index: 0,
        scramble: "GNEGAEMNET",
        answer: "ENGAGEMENT",
        clue: "Emotional commitment employees feel towards their organisation.",
    },
    WordEntry {
        index: 1,
        scramble: "WELNLEBIEG",
        answer: "WELLBEING",
        clue: "Employee health, happiness and overall state at work.",
    },
    WordEntry {
        index: 2,
        scramble: "IVYITFLEXLBI",
        answer: "FLEXIBILITY",
        clue: "Ability to choose when or where to work.",
    },
    WordEntry {
        index: 3,
        scramble: "EALHEDRIPS",
        answer: "LEADERSHIP",
        clue: "Guiding and influencing others towards shared goals.",
    },
    WordEntry {
        index: 4,
        scramble: "TSAURT",
        answer: "TRUST",
        clue: "Belief that managers and colleagues act fairly.",
    },
    WordEntry {
        index: 5,
        scramble: "HYBRDIROWK",
        answer: "HYBRIDWORK",
        clue: "Mix of office and remote work locations.",
    },
    WordEntry {
        index: 6,
        scramble: "LEARNGNIE",
        answer: "LEARNING",
        clue: "Building new skills and knowledge.",
    },
    WordEntry {
        index: 7,
        scramble: "ECTFEEBDKAB",
        answer: "FEEDBACK",
        clue: "Information given to help improve performance.",
    },
    WordEntry {
        index: 8,
        scramble: "LUUTRECC",
        answer: "CULTURE",
        clue: "Shared values, norms and habits inside the organisation.",
    },
    WordEntry {
        index: 9,
        scramble: "MOTIOTVANI",
        answer: "MOTIVATION",
        clue: "Inner drive that makes people want to do their job well.",
    },
    WordEntry {
        index: 10,
        scramble: "AUTYMONO",
        answer: "AUTONOMY",
        clue: "Freedom to decide how to do your work.",
    },
    WordEntry {
        index: 11,
        scramble: "INCUSOINL",
        answer: "INCLUSION",
        clue: "Everyone feels welcome and respected.",
    },
    WordEntry {
        index: 12,
        scramble: "REIONCOINGT",
        answer: "RECOGNITION",
        clue: "Appreciating and thanking employees for contributions.",
    },
];

/// Total word count. An index equal to this value means the game is over.
pub const TOTAL_WORDS: i32 = WORDS.len() as i32;

pub fn word_for_index(index: i32) -> Option<&'static WordEntry> {
    if index < 0 {
        return None;
    }
    WORDS.get(index as usize)
}
