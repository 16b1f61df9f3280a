//! The fixed questionnaire.

use once_cell::sync::Lazy;

use super::category::Category;

/// One forced-choice question.
///
/// Ordering within the bank is significant: it defines the quiz sequence.
/// Several questions share a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub category: Category,
    pub prompt: &'static str,
    pub option_a: &'static str,
    pub option_b: &'static str,
    pub note: Option<&'static str>,
}

/// Static ordered list of questions.
#[derive(Debug)]
pub struct QuestionBank {
    questions: &'static [Question],
}

impl QuestionBank {
    /// Builds a bank over an explicit question list (used by tests).
    pub fn from_questions(questions: &'static [Question]) -> Self {
        Self { questions }
    }

    /// The standard 16-question Baumann bank, four per axis.
    pub fn standard() -> &'static QuestionBank {
        &STANDARD_BANK
    }

    /// Question at `index`, or `None` past the end.
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions in the bank.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// True if the bank has no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Iterates questions in quiz order.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

static STANDARD_BANK: Lazy<QuestionBank> = Lazy::new(|| QuestionBank {
    questions: STANDARD_QUESTIONS,
});

const STANDARD_QUESTIONS: &[Question] = &[
    // Oily vs dry
    Question {
        category: Category::OilyDry,
        prompt: "How often does your skin look shiny during the day?",
        option_a: "Shiny by midday, especially in the T-zone",
        option_b: "Barely shiny, even by evening",
        note: None,
    },
    Question {
        category: Category::OilyDry,
        prompt: "How do your pores look?",
        option_a: "Enlarged, especially on the nose and forehead",
        option_b: "Small or barely visible",
        note: None,
    },
    Question {
        category: Category::OilyDry,
        prompt: "How does your skin feel after washing?",
        option_a: "Back to normal within an hour, no tightness",
        option_b: "Dry or tight",
        note: None,
    },
    Question {
        category: Category::OilyDry,
        prompt: "How often do you get pimples or blackheads?",
        option_a: "Regularly, especially in the T-zone",
        option_b: "Rarely or almost never",
        note: None,
    },
    // Sensitive vs resistant
    Question {
        category: Category::SensitiveResistant,
        prompt: "Does your skin react to cosmetics with redness, itching or burning?",
        option_a: "Yes, often",
        option_b: "Almost never",
        note: None,
    },
    Question {
        category: Category::SensitiveResistant,
        prompt: "Does your skin flush from wind, cold or hot water?",
        option_a: "Yes, it reddens easily",
        option_b: "No, it stays calm",
        note: None,
    },
    Question {
        category: Category::SensitiveResistant,
        prompt: "Can you use acids (AHA/BHA) or retinol without irritation?",
        option_a: "No, they cause burning or peeling",
        option_b: "Yes, no problem",
        note: None,
    },
    Question {
        category: Category::SensitiveResistant,
        prompt: "Do you have rosacea, couperose or chronic irritation?",
        option_a: "Yes",
        option_b: "No",
        note: None,
    },
    // Pigmented vs non-pigmented
    Question {
        category: Category::PigmentedNonPigmented,
        prompt: "Do dark spots linger after pimples?",
        option_a: "Yes, for a long time",
        option_b: "No, my skin evens out quickly",
        note: None,
    },
    Question {
        category: Category::PigmentedNonPigmented,
        prompt: "Do you have freckles or pigment spots?",
        option_a: "Yes",
        option_b: "No",
        note: None,
    },
    Question {
        category: Category::PigmentedNonPigmented,
        prompt: "Does your skin darken after inflammation or scratches?",
        option_a: "Yes",
        option_b: "No",
        note: None,
    },
    Question {
        category: Category::PigmentedNonPigmented,
        prompt: "Do you use brightening products?",
        option_a: "Yes, regularly",
        option_b: "No, never",
        note: None,
    },
    // Wrinkle-prone vs tight
    Question {
        category: Category::WrinkleProneTight,
        prompt: "Do you have wrinkles at rest (not from expressions)?",
        option_a: "Yes, especially around the eyes or on the forehead",
        option_b: "No, or barely noticeable",
        note: None,
    },
    Question {
        category: Category::WrinkleProneTight,
        prompt: "Does your skin feel thin and lax, or dense and firm?",
        option_a: "Thin, lax",
        option_b: "Dense, elastic",
        note: None,
    },
    Question {
        category: Category::WrinkleProneTight,
        prompt: "Does your skin spring back quickly after a pinch?",
        option_a: "Slowly",
        option_b: "Right away",
        note: Some("Snap-back speed is a rough collagen proxy"),
    },
    Question {
        category: Category::WrinkleProneTight,
        prompt: "Do you look older than your age?",
        option_a: "Yes, older",
        option_b: "No, younger or about right",
        note: None,
    },
];
