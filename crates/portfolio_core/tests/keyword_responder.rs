use portfolio_core::{KeywordResponder, PortError, Rule, RuleTable};

fn table() -> RuleTable {
    RuleTable::new("fallback")
        .with_rule(Rule::from_pattern("hello|hi", "greeting").unwrap())
        .with_rule(Rule::from_pattern("rust|cargo", "language").unwrap())
        .with_rule(Rule::from_pattern("rust compiler", "compiler").unwrap())
}

#[test]
fn returns_default_when_nothing_matches() {
    let responder = KeywordResponder::new(table());
    assert_eq!(responder.respond("good morning"), "fallback");
}

#[test]
fn empty_input_only_matches_default() {
    let responder = KeywordResponder::new(table());
    assert_eq!(responder.respond(""), "fallback");
}

#[test]
fn matching_ignores_case() {
    let responder = KeywordResponder::new(table());
    assert_eq!(responder.respond("HELLO there"), "greeting");
    assert_eq!(responder.respond("I write RUST"), "language");
}

#[test]
fn keywords_match_as_substrings() {
    let responder = KeywordResponder::new(table());
    // "hi" sits inside "this"
    assert_eq!(responder.respond("is this on"), "greeting");
}

#[test]
fn earlier_rule_wins_when_several_match() {
    let responder = KeywordResponder::new(table());
    assert_eq!(responder.respond("the rust compiler"), "language");
}

#[test]
fn default_iff_no_keyword_is_contained() {
    let responder = KeywordResponder::new(table());
    let inputs = ["", "ok", "Cargo build", "shipping", "what now", "RUSTY"];
    for input in inputs {
        let lowered = input.to_lowercase();
        let any_match = responder
            .table()
            .rules()
            .iter()
            .flat_map(|r| r.keywords())
            .any(|k| lowered.contains(k.as_str()));
        assert_eq!(
            responder.respond(input) == "fallback",
            !any_match,
            "input {:?}",
            input
        );
    }
}

#[test]
fn portfolio_table_answers_skills_question() {
    let responder = KeywordResponder::new(RuleTable::portfolio().unwrap());
    assert!(responder.respond("what are your skills").contains("My key skills"));
    assert!(responder.respond("Hey!").starts_with("Hey there!"));
    assert_eq!(
        responder.respond("zzz"),
        responder.table().default_response()
    );
}

#[test]
fn rule_table_loads_from_json() {
    let raw = r#"{
        "rules": [
            {"keywords": ["Price", "cost"], "response": "It's free."},
            {"keywords": ["when"], "response": "Soon."}
        ],
        "default": "Ask me about pricing."
    }"#;
    let responder = KeywordResponder::new(RuleTable::from_json(raw).unwrap());
    assert_eq!(responder.respond("what's the price?"), "It's free.");
    assert_eq!(responder.respond("When?"), "Soon.");
    assert_eq!(responder.respond("hmm"), "Ask me about pricing.");
}

#[test]
fn rule_table_json_rejects_blank_keywords() {
    let raw = r#"{"rules":[{"keywords":["  "],"response":"x"}],"default":"d"}"#;
    assert!(matches!(
        RuleTable::from_json(raw),
        Err(PortError::Validation(_))
    ));
}
