use std::path::{Path, PathBuf};

/// Write a set file with `count` cards named "Term N" / "Meaning N".
pub fn write_set(dir: &Path, name: Option<&str>, count: usize) -> PathBuf {
    let mut content = String::new();
    if let Some(name) = name {
        content.push_str(&format!("Set: {name}\n\n"));
    }
    for i in 1..=count {
        content.push_str(&format!("Q: Term {i}\nA: Meaning {i}\n\n"));
    }
    let path = dir.join("terms.txt");
    std::fs::write(&path, content).unwrap();
    path
}
