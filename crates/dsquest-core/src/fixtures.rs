//! Shared test curriculum.

use crate::model::Curriculum;

pub(crate) const SAMPLE_JSON: &str = r#"{
  "chapters": [
    {"id": "c1", "emoji": "🐍", "title": "Python Basics", "blurb": "Start here",
     "lessons": [
       {"id": "l1", "title": "Hello", "xp": 50, "md": "lessons/l1.md",
        "starter": "print('hi')",
        "tests": [{"type": "stdout_equals", "expected": "hi"}]},
       {"id": "l2", "title": "Lists", "xp": 75, "md": "lessons/l2.md"}
     ]},
    {"id": "c2", "emoji": "🐼", "title": "Pandas", "blurb": "DataFrames",
     "lessons": [
       {"id": "l3", "title": "Series", "xp": 100, "md": "lessons/l3.md",
        "tests": [{"type": "stdout_contains", "expected": ["a", "b"]}]}
     ]}
  ]
}"#;

pub(crate) fn sample() -> Curriculum {
    serde_json::from_str(SAMPLE_JSON).unwrap()
}
