//! Fake interpreter shared by the integration tests
//!
//! A POSIX shell script that answers a fixed set of scripts and logs every
//! argv it receives. Run as `/bin/sh <script>` so the file needs no exec bit.

#![allow(dead_code)]

use opcheck::Interpreter;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub const IMPLEMENTED: [&str; 4] = ["+", "boom", "merge", "slow"];

const SCRIPT: &str = r#"#!/bin/sh
printf '%s\n' "$*" >> '@LOG@'
trace=0
while [ $# -gt 0 ]; do
  case "$1" in
    --list-operators) echo '["+", "merge", "boom", "slow"]'; exit 0 ;;
    --trace) trace=1; shift ;;
    --script) shift; break ;;
    --*) shift ;;
    *) break ;;
  esac
done
script="$1"
shift
if [ "$trace" = 1 ]; then
  i=1
  while [ $i -le 20 ]; do
    echo "trace: step $i" >&2
    i=$((i + 1))
  done
fi
case "$(cat "$script")" in
  '["+",2,3]') echo 5 ;;
  '["+",2.5,3.5]') echo 6.0 ;;
  '["merge",["$inputs"]]') echo '{"b": 2, "a": 1}' ;;
  '["count"]') echo "$#" ;;
  '["boom"]') echo 'boom: invalid argument' >&2; exit 3 ;;
  '["garbage"]') echo 'this is not json' ;;
  '["slow"]') exec sleep 10 ;;
  *) echo 'unknown operator' >&2; exit 1 ;;
esac
"#;

/// Registry matching the fake: one float mismatch and one undocumented-in-
/// interpreter operator (`foo`)
pub const REGISTRY: &str = r#"
operators:
  "+":
    description: Addition
    syntax: '["+", a, b]'
    examples:
      - name: Two numbers
        expression: '["+", 2, 3]'
        result: 5
      - name: Float sum
        expression: '["+", 2.5, 3.5]'
        result: 6
  merge:
    description: Merge objects
    syntax: '["merge", objects]'
    examples:
      - expression: '["merge", ["$inputs"]]'
        inputs: [{"a": 1}, {"b": 2}]
        result: {"a": 1, "b": 2}
  foo:
    description: Documented only
"#;

/// Registry whose examples all pass and whose names match the fake
pub const PASSING_REGISTRY: &str = r#"
operators:
  "+":
    description: Addition
    examples:
      - expression: '["+", 2, 3]'
        result: 5
  merge:
    description: Merge objects
    examples:
      - expression: '["merge", ["$inputs"]]'
        inputs: [{"a": 1}, {"b": 2}]
        result: {"b": 2, "a": 1}
  boom:
    description: Always fails
  slow:
    description: Never finishes
"#;

pub struct FakeInterpreter {
    pub dir: TempDir,
    pub script: PathBuf,
    pub log: PathBuf,
}

impl FakeInterpreter {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("fake-interpreter.sh");
        let log = dir.path().join("calls.log");
        std::fs::write(&script, SCRIPT.replace("@LOG@", &log.display().to_string())).unwrap();
        Self { dir, script, log }
    }

    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new("/bin/sh")
            .with_leading_args(vec![self.script.display().to_string()])
            .with_timeout(Duration::from_secs(5))
    }

    /// Every argv line the fake has seen
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Script file passed on the most recent call
    pub fn last_script_path(&self) -> PathBuf {
        let calls = self.calls();
        let last = calls.last().expect("fake interpreter was never called");
        last.split_whitespace()
            .find(|arg| arg.ends_with("script.json"))
            .map(PathBuf::from)
            .expect("no script path in argv")
    }

    /// Write `content` next to the fake and return its path
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }
}
