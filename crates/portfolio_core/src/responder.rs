//! crates/portfolio_core/src/responder.rs
//!
//! Keyword-matched canned replies for the portfolio chatbot.
//!
//! A `RuleTable` is an ordered list of rules plus a default reply. The
//! `KeywordResponder` lower-cases the input and returns the reply of the first
//! rule with any keyword contained in it. Table order is authoritative: a short
//! keyword early in the table shadows every later rule it overlaps.

use crate::ports::{PortError, PortResult};
use serde::Deserialize;

//=========================================================================================
// Rules
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    keywords: Vec<String>,
    response: String,
}

impl Rule {
    /// Keywords are trimmed and lower-cased. An empty keyword would match every
    /// input, so it is rejected.
    pub fn new<I, S>(keywords: I, response: impl Into<String>) -> PortResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .collect();

        if keywords.is_empty() {
            return Err(PortError::Validation(
                "keywords: a rule needs at least one keyword".to_string(),
            ));
        }
        if keywords.iter().any(|k| k.is_empty()) {
            return Err(PortError::Validation(
                "keywords: empty keywords are not allowed".to_string(),
            ));
        }

        Ok(Self {
            keywords,
            response: response.into(),
        })
    }

    /// Builds a rule from the pipe-delimited form, e.g. `"hello|hi|hey"`.
    pub fn from_pattern(pattern: &str, response: impl Into<String>) -> PortResult<Self> {
        Self::new(pattern.split('|'), response)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    fn matches(&self, lowered_input: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered_input.contains(keyword.as_str()))
    }
}

/// Ordered rules plus the catch-all reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
    default_response: String,
}

#[derive(Deserialize)]
struct RuleTableFile {
    rules: Vec<RuleEntry>,
    default: String,
}

#[derive(Deserialize)]
struct RuleEntry {
    keywords: Vec<String>,
    response: String,
}

impl RuleTable {
    pub fn new(default_response: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            default_response: default_response.into(),
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn default_response(&self) -> &str {
        &self.default_response
    }

    /// Parses `{"rules":[{"keywords":[..],"response":".."}],"default":".."}`.
    pub fn from_json(raw: &str) -> PortResult<Self> {
        let file: RuleTableFile = serde_json::from_str(raw)
            .map_err(|e| PortError::Validation(format!("rule table: {}", e)))?;

        let mut table = RuleTable::new(file.default);
        for entry in file.rules {
            table.push(Rule::new(entry.keywords, entry.response)?);
        }
        Ok(table)
    }

    /// Builds a table from pipe-delimited patterns. Any malformed pattern fails
    /// the whole table.
    pub fn from_patterns(
        patterns: &[(&str, &str)],
        default_response: impl Into<String>,
    ) -> PortResult<Self> {
        let mut table = RuleTable::new(default_response);
        for (pattern, response) in patterns {
            table.push(Rule::from_pattern(pattern, *response)?);
        }
        Ok(table)
    }

    /// The portfolio site's built-in fallback table. Rule order matters.
    pub fn portfolio() -> PortResult<Self> {
        Self::from_patterns(PORTFOLIO_RULES, PORTFOLIO_DEFAULT)
    }
}

//=========================================================================================
// The Responder
//=========================================================================================

/// Maps free text to exactly one reply from its rule table. Stateless.
#[derive(Debug, Clone)]
pub struct KeywordResponder {
    table: RuleTable,
}

impl KeywordResponder {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn respond(&self, input: &str) -> &str {
        let lowered = input.to_lowercase();
        self.table
            .rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(Rule::response)
            .unwrap_or(self.table.default_response.as_str())
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }
}

//=========================================================================================
// Built-in Table
//=========================================================================================

const PORTFOLIO_RULES: &[(&str, &str)] = &[
    ("hello|hi|hey", "Hey there! 👋 Welcome to my portfolio. How can I help you today?"),
    ("how are you|how are you doing|whats up|how you doing", "😊 I'm doing great, thanks for asking! I'm here to help you learn about my experience, skills, and projects. What would you like to know?"),
    ("thanks|thank you|thanks so much|appreciate", "🙏 You're welcome! Happy to help. Feel free to ask me anything about my work and experience!"),
    ("experience|work|job|career", "💼 I have 5+ years of experience as a Senior Software Engineer. Currently at ARCAD Software, specializing in Salesforce, Java, and modern tech."),
    ("skills", "🛠️ My key skills: Salesforce Apex, Lightning, Java, TypeScript, React, GitHub, DevOps, VS Code extensions, and AI/LLM integration."),
    ("salesforce", "☁️ Salesforce Trailhead All Star Ranger (213 badges, 83,875 points)! Expert in Lightning, Apex, Salesforce admin, and cloud solutions."),
    ("projects", "🚀 I develop: Salesforce CRM solutions, Java plugins, VS Code extensions, and AI chatbots. Check Projects section!"),
    ("certifications", "🏆 Certifications: Copado, Oracle Cloud AI, IBM, GA4, and more. Check Certifications section for details!"),
    ("contact|email|phone", "📧 ggupta865@gmail.com | 📱 +918869999358 | 💼 linkedin.com/in/gauravgupta865"),
    ("team|about|who are you", "👨‍💼 I'm Gaurav Gupta, Senior Software Engineer from Lucknow. Passionate about building innovative solutions and learning new technologies!"),
    ("location|lucknow", "📍 Lucknow, Uttar Pradesh 226016, India."),
    ("java", "☕ Java specialist in enterprise applications, plugin development, and scalable backend solutions."),
    ("typescript|react", "📘 Experienced with TypeScript/React for web apps, VS Code extensions, and responsive UIs."),
    ("ai|chatbot", "🤖 Specializing in AI/LLM integration and intelligent chatbot development."),
    ("help|what can you do|what can i ask", "❓ You can ask me about: experience, skills, salesforce, java, projects, certifications, contact info, location, team, or anything about my portfolio!"),
];

const PORTFOLIO_DEFAULT: &str = "That's a great question! 🤔 Try asking about: experience, skills, projects, salesforce, certifications, or contact me. Type 'help' for more options!";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portfolio_table_keeps_every_rule() {
        assert_eq!(RuleTable::portfolio().unwrap().rules().len(), PORTFOLIO_RULES.len());
    }

    #[test]
    fn malformed_pattern_fails_the_table() {
        let patterns = [("hello|hi", "greeting"), ("skills||tools", "skills")];
        assert!(matches!(
            RuleTable::from_patterns(&patterns, "fallback"),
            Err(PortError::Validation(_))
        ));
    }

    #[test]
    fn pattern_keywords_are_normalised() {
        let rule = Rule::from_pattern(" Hello | HI ", "r").unwrap();
        assert_eq!(rule.keywords(), ["hello", "hi"]);
    }

    #[test]
    fn empty_keyword_is_rejected() {
        assert!(matches!(
            Rule::from_pattern("a||b", "r"),
            Err(PortError::Validation(_))
        ));
    }
}
