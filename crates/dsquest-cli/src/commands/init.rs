//! The `dsquest init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("dsquest.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("curriculum.json"), SAMPLE_CURRICULUM)?;

    std::fs::create_dir_all("lessons").context("failed to create lessons/")?;
    for (name, content) in SAMPLE_LESSONS {
        write_if_missing(&Path::new("lessons").join(name), content)?;
    }

    println!("\nNext steps:");
    println!("  1. Run: dsquest validate");
    println!("  2. Run: dsquest open");
    println!("  3. Run: dsquest check py-01");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# dsquest configuration

curriculum = "curriculum.json"
store_path = ".dsquest/progress.json"
python = "python3"
# Imported once before the first run; add "pandas" for the Pandas chapter.
preload_packages = []
run_timeout_secs = 30

# The Great Ledger game backend
ledger_url = "http://localhost:8000"

export_name = "dsquest_my_code.zip"
"#;

const SAMPLE_CURRICULUM: &str = r#"{
  "chapters": [
    {
      "id": "py",
      "emoji": "🐍",
      "title": "Python Basics",
      "blurb": "Print, variables and lists: your first steps.",
      "lessons": [
        {
          "id": "py-01",
          "title": "Hello, Python",
          "xp": 50,
          "md": "lessons/py-01.md",
          "starter": "print(\"Hello, world!\")\n",
          "tests": [{"type": "stdout_equals", "expected": "Hello, world!"}]
        },
        {
          "id": "py-02",
          "title": "Variables & Math",
          "xp": 75,
          "md": "lessons/py-02.md",
          "starter": "apples = 3\npears = 4\n# print the total below\n",
          "tests": [{"type": "stdout_equals", "expected": "7"}]
        },
        {
          "id": "py-03",
          "title": "Lists",
          "xp": 100,
          "md": "lessons/py-03.md",
          "starter": "scores = [88, 92, 79]\n",
          "tests": [{"type": "stdout_contains", "expected": ["max: 92", "min: 79"]}]
        }
      ]
    },
    {
      "id": "pd",
      "emoji": "🐼",
      "title": "Pandas Basics",
      "blurb": "Series and DataFrames, the bread and butter of data science.",
      "lessons": [
        {
          "id": "pd-01",
          "title": "Your First DataFrame",
          "xp": 150,
          "md": "lessons/pd-01.md",
          "starter": "import pandas as pd\n\ndf = pd.DataFrame({\"name\": [\"Ada\", \"Linus\"], \"score\": [95, 88]})\n",
          "tests": [{"type": "stdout_contains", "expected": ["Ada", "Linus"]}]
        }
      ]
    }
  ]
}
"#;

const SAMPLE_LESSONS: [(&str, &str); 4] = [
    (
        "py-01.md",
        "# Hello, Python\n\n`print()` writes text to the terminal.\n\n\
         **Quest:** print exactly `Hello, world!`\n",
    ),
    (
        "py-02.md",
        "# Variables & Math\n\nA variable gives a value a name: `apples = 3`.\n\n\
         **Quest:** print the total number of fruits.\n",
    ),
    (
        "py-03.md",
        "# Lists\n\nLists hold ordered values. `max()` and `min()` work on them.\n\n\
         **Quest:** print `max: <value>` and `min: <value>` for `scores`.\n",
    ),
    (
        "pd-01.md",
        "# Your First DataFrame\n\nA DataFrame is a table with named columns.\n\n\
         **Quest:** print the DataFrame `df`.\n",
    ),
];
