//! Product question bank
//!
//! This module holds the static catalog of quiz questions, keyed by product
//! name. The bank is a pure lookup table: selecting questions never mutates
//! it, and every [`Question`] keeps a stable identifier so answer
//! submissions can be matched against the question they were asked about
//! even after the list has been shuffled.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use uuid::Uuid;

/// A unique, shuffle-stable identifier for a question
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Creates a new random question ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for QuestionId {
    type Err = uuid::Error;

    /// Parses a question ID from a UUID string
    ///
    /// # Errors
    ///
    /// Returns a `uuid::Error` if the string is not a valid UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A single multiple-choice question
///
/// Immutable once created. The correct answer is always equal to one of
/// the options.
#[derive(Debug, Clone)]
pub struct Question {
    /// Stable identifier, assigned when the bank is built
    pub id: QuestionId,
    /// The question text shown to players
    pub prompt: String,
    /// The answer options, in display order
    pub options: Vec<String>,
    /// The correct answer; equals one of `options`
    pub answer: String,
    /// Difficulty level, starting at 1
    pub level: u8,
}

impl Question {
    /// Creates a question, assigning it a fresh stable ID
    ///
    /// # Panics
    ///
    /// Panics if `answer` is not one of `options`; the bank is built from
    /// static data, so a mismatch is a programming error caught at startup.
    pub fn new(prompt: &str, options: [&str; 4], answer: &str, level: u8) -> Self {
        assert!(
            options.contains(&answer),
            "correct answer must be one of the options"
        );
        Self {
            id: QuestionId::new(),
            prompt: prompt.to_owned(),
            options: options.iter().map(|o| (*o).to_owned()).collect(),
            answer: answer.to_owned(),
            level,
        }
    }
}

/// Static mapping from product name to its ordered question list
#[derive(Debug, Default, Clone)]
pub struct QuestionBank {
    products: HashMap<String, Vec<Question>>,
}

impl QuestionBank {
    /// Creates an empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product and its question list, replacing any previous entry
    pub fn with_product(mut self, name: &str, questions: Vec<Question>) -> Self {
        self.products.insert(name.to_owned(), questions);
        self
    }

    /// Returns the question list for a product, empty if unknown
    pub fn get(&self, product: &str) -> &[Question] {
        self.products.get(product).map_or(&[], Vec::as_slice)
    }

    /// Selects the questions for a session
    ///
    /// For every product in `products`, in request order, takes that
    /// product's questions with level at most `level`. Repeated product
    /// names contribute their questions again; no deduplication is applied.
    ///
    /// # Returns
    ///
    /// The selected questions in bank order; shuffling is the caller's job.
    pub fn select(&self, products: &[String], level: u8) -> Vec<Question> {
        products
            .iter()
            .flat_map(|product| self.get(product))
            .filter(|question| question.level <= level)
            .cloned()
            .collect()
    }

    /// Builds the built-in product catalog
    pub fn builtin() -> Self {
        Self::new()
            .with_product(
                "Smart Bonus 10/5",
                vec![
                    Question::new(
                        "ระยะเวลาคุ้มครองของ Smart Bonus 10/5 คือกี่ปี?",
                        ["5 ปี", "10 ปี", "14 ปี", "15 ปี"],
                        "10 ปี",
                        1,
                    ),
                    Question::new(
                        "Smart Bonus ให้เงินคืนระหว่างสัญญาปีใดบ้าง?",
                        ["ปีที่ 2,4,6,8", "ปีที่ 1-4", "ปีที่ 5-10", "ปีที่ 2-6"],
                        "ปีที่ 2,4,6,8",
                        2,
                    ),
                    Question::new(
                        "Smart Bonus เหมาะกับลูกค้ากลุ่มใด?",
                        [
                            "วัยทำงาน/First Jobber",
                            "ต้องการคุ้มครองสูงสุด",
                            "นักลงทุนระยะยาว",
                            "ต้องการลดความเสี่ยงอัตราแลกเปลี่ยน",
                        ],
                        "วัยทำงาน/First Jobber",
                        1,
                    ),
                ],
            )
            .with_product(
                "Happy Retire 90/5",
                vec![
                    Question::new(
                        "Happy Retire 90/5 เหมาะกับกลุ่มใด?",
                        [
                            "วางแผนเกษียณ",
                            "First Jobber",
                            "เด็กนักเรียน",
                            "ผู้รับบำนาญเท่านั้น",
                        ],
                        "วางแผนเกษียณ",
                        1,
                    ),
                    Question::new(
                        "จุดเด่นเรื่องลดหย่อนภาษีของ Happy Retire สูงสุดเท่าไหร่/ปี?",
                        ["100,000", "150,000", "200,000", "250,000"],
                        "200,000",
                        2,
                    ),
                    Question::new(
                        "เมื่อลูกค้าต้องการรายได้บำนาญเป็นประจำ ควรอธิบาย:",
                        [
                            "บำนาญปกติ 15% ของทุนประกันภัย",
                            "เงินปันผลรับรอง",
                            "ไม่มีบำนาญ",
                            "จ่ายครั้งเดียว",
                        ],
                        "บำนาญปกติ 15% ของทุนประกันภัย",
                        2,
                    ),
                ],
            )
            .with_product(
                "Money Saver 14/6",
                vec![
                    Question::new(
                        "Money Saver เป็นแบบมีหรือไม่มีเงินปันผล?",
                        [
                            "มีเงินปันผล",
                            "ไม่มีเงินปันผล (Non-Par)",
                            "ขึ้นกับตลาด",
                            "ขึ้นกับบริษัท",
                        ],
                        "ไม่มีเงินปันผล (Non-Par)",
                        1,
                    ),
                    Question::new(
                        "ระยะเวลาชำระเบี้ยของ Money Saver คือกี่ปี?",
                        ["5 ปี", "6 ปี", "10 ปี", "14 ปี"],
                        "6 ปี",
                        1,
                    ),
                    Question::new(
                        "ลูกค้ารายได้สูงต้องการผลตอบแทนแน่นอน แนะนำอย่างไร?",
                        [
                            "แนะนำ Money Saver",
                            "แนะนำ Index-linked เท่านั้น",
                            "แนะนำตัดความเสี่ยง",
                            "ไม่แนะนำเลย",
                        ],
                        "แนะนำ Money Saver",
                        3,
                    ),
                ],
            )
            .with_product(
                "Global Index 15/5 Plus",
                vec![
                    Question::new(
                        "Global Index ใช้อ้างอิงดัชนีใด?",
                        [
                            "Eastspring Global Diversified Multi Asset Index",
                            "SET Index",
                            "S&P 500",
                            "ไม่มีดัชนี",
                        ],
                        "Eastspring Global Diversified Multi Asset Index",
                        2,
                    ),
                    Question::new(
                        "ความเสี่ยงสำคัญที่ต้องอธิบายคืออะไร?",
                        [
                            "อัตราแลกเปลี่ยนและดัชนี",
                            "ไม่มีความเสี่ยง",
                            "ความเสี่ยงจากบริษัทเท่านั้น",
                            "ความเสี่ยงด้านอาชีพ",
                        ],
                        "อัตราแลกเปลี่ยนและดัชนี",
                        2,
                    ),
                    Question::new(
                        "การจ่ายเงินคืนระหว่างสัญญาเป็นอย่างไร?",
                        [
                            "ทุก 2 ปี 2.5% ของทุน",
                            "ไม่มีเงินคืน",
                            "ทุกปี 1%",
                            "เมื่อหมดสัญญา",
                        ],
                        "ทุก 2 ปี 2.5% ของทุน",
                        2,
                    ),
                ],
            )
    }
}
