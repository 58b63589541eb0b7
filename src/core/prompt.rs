//! Study-assistant instruction text and starter prompts.

use std::fmt;
use std::str::FromStr;

pub const SYSTEM_PROMPT: &str = "You are StudyMate AI — an intelligent exam preparation and self-study assistant.

Your main goals:
1. Explain concepts simply and clearly
2. Focus on exam preparation and important topics
3. Provide step-by-step explanations
4. Use real-world examples and analogies
5. Provide code examples for technical/programming topics
6. Summarize knowledge from trusted sources (W3Schools, GeeksforGeeks, Wikipedia)
7. Detect weak areas and suggest improvements
8. Generate practice questions after every explanation
9. Support multilingual explanations (English, Tamil, Telugu, Hindi, etc.)
10. Provide quick revision summaries and exam tips

Always structure your output with these sections (use markdown headers):
## 📖 Simple Explanation
## 🔢 Step-by-step Breakdown
## 💡 Example
## 🎯 Key Points for Exams
## 📝 Practice Questions
## ⚠️ Common Mistakes to Avoid
## 📚 Suggested Next Topics

If the student asks for revision, provide short summaries with key formulas, definitions, and frequently asked exam questions.
If the student asks for practice, generate MCQs, short answers, and long questions with answers at the end.
If the student requests another language, explain in both English and the requested language.

Keep explanations clear, concise, structured, and student-friendly.
Always motivate the student and encourage learning. Use emojis sparingly for engagement.";

pub const QUICK_PROMPTS: [&str; 4] = [
    "Explain this concept simply",
    "Give me practice questions",
    "Quick revision summary",
    "Solve this step by step",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Mathematics,
    Physics,
    Chemistry,
    Programming,
    Biology,
    History,
    English,
    Economics,
}

impl Subject {
    pub const ALL: [Self; 8] = [
        Self::Mathematics,
        Self::Physics,
        Self::Chemistry,
        Self::Programming,
        Self::Biology,
        Self::History,
        Self::English,
        Self::Economics,
    ];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mathematics => "Mathematics",
            Self::Physics => "Physics",
            Self::Chemistry => "Chemistry",
            Self::Programming => "Programming",
            Self::Biology => "Biology",
            Self::History => "History",
            Self::English => "English",
            Self::Economics => "Economics",
        }
    }

    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Mathematics => "📐",
            Self::Physics => "⚛️",
            Self::Chemistry => "🧪",
            Self::Programming => "💻",
            Self::Biology => "🧬",
            Self::History => "📜",
            Self::English => "📖",
            Self::Economics => "📊",
        }
    }

    /// The opening question sent when a subject is picked.
    #[must_use]
    pub fn starter_prompt(&self) -> String {
        format!(
            "I want to study {}. What are the most important topics for exams?",
            self.label()
        )
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|subject| subject.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(Self::label).collect();
                format!("Unknown subject '{wanted}'. Choose one of: {}", known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_prompt() {
        assert_eq!(
            Subject::Physics.starter_prompt(),
            "I want to study Physics. What are the most important topics for exams?"
        );
    }

    #[test]
    fn test_subject_parse_case_insensitive() {
        assert_eq!("mathematics".parse::<Subject>(), Ok(Subject::Mathematics));
        assert_eq!(" Economics ".parse::<Subject>(), Ok(Subject::Economics));

        let err = "astrology".parse::<Subject>().unwrap_err();
        assert!(err.contains("Mathematics"));
    }

    #[test]
    fn test_subject_display() {
        assert_eq!(Subject::Chemistry.to_string(), "🧪 Chemistry");
    }

    #[test]
    fn test_system_prompt_sections() {
        assert!(SYSTEM_PROMPT.starts_with("You are StudyMate AI"));
        assert!(SYSTEM_PROMPT.contains("## 📝 Practice Questions"));
    }
}
