//! Input resolution: files, directories and glob patterns

use crate::error::CliError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const JAVA_EXTENSION: &str = "java";

fn has_glob_chars(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
}

fn is_java(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == JAVA_EXTENSION)
}

/// Expand `patterns` into Java files. Directories are walked for `*.java`;
/// a glob must match at least one file; other paths are taken as given.
/// Order follows the patterns, duplicates are dropped.
pub fn collect_inputs<I>(patterns: I) -> Result<Vec<PathBuf>, CliError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = Vec::<PathBuf>::new();
    let mut push = |path: PathBuf| {
        if !out.contains(&path) {
            out.push(path);
        }
    };

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let entries = glob::glob(pattern).map_err(|source| CliError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            let mut matched_any = false;
            for entry in entries {
                let path = entry?;
                if path.is_file() {
                    matched_any = true;
                    push(path);
                }
            }
            if !matched_any {
                return Err(CliError::NoMatches(pattern.to_string()));
            }
        } else if Path::new(pattern).is_dir() {
            for entry in WalkDir::new(pattern).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && is_java(entry.path()) {
                    push(entry.into_path());
                }
            }
        } else {
            push(PathBuf::from(pattern));
        }
    }

    if out.is_empty() {
        return Err(CliError::NoInputs);
    }
    Ok(out)
}

/// Where the Python module for `input` goes: `<Stem>.py` in `output_dir`,
/// or next to the input.
pub fn python_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "module".to_string());
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(format!("{stem}.py"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, "class A {}").unwrap();
        path
    }

    #[test]
    fn test_directories_are_walked_for_java_files() {
        let dir = tempfile::tempdir().unwrap();
        let b = touch(dir.path(), "pkg/B.java");
        let a = touch(dir.path(), "A.java");
        touch(dir.path(), "notes.txt");

        let found = collect_inputs([dir.path().to_string_lossy()]).unwrap();
        assert_eq!(found, [a, b]);
    }

    #[test]
    fn test_globs_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "A.java");
        let b = touch(dir.path(), "B.java");

        let pattern = format!("{}/*.java", dir.path().display());
        let explicit = a.to_string_lossy().into_owned();
        let found = collect_inputs([explicit, pattern]).unwrap();
        assert_eq!(found, [a, b]);
    }

    #[test]
    fn test_empty_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.java", dir.path().display());
        assert!(matches!(
            collect_inputs([pattern]),
            Err(CliError::NoMatches(_))
        ));
        assert!(matches!(
            collect_inputs(Vec::<String>::new()),
            Err(CliError::NoInputs)
        ));
    }

    #[test]
    fn test_python_path() {
        let input = Path::new("src/com/acme/Widget.java");
        assert_eq!(python_path(input, None), Path::new("src/com/acme/Widget.py"));
        assert_eq!(
            python_path(input, Some(Path::new("out"))),
            Path::new("out/Widget.py")
        );
    }
}
