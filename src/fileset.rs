//! 파일셋 모듈
//!
//! 기준 폴더 + include/exclude 글로브 패턴으로 대상 파일 목록을 결정합니다.

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::{HInjectError, Result};

/// 컴파일된 include/exclude 패턴 집합
#[derive(Default)]
pub struct PatternSet {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl PatternSet {
    /// 새 패턴 집합 생성
    ///
    /// include 패턴이 하나도 없으면 모든 파일이 매칭됩니다.
    ///
    /// # Examples
    /// ```
    /// use hinject::fileset::PatternSet;
    ///
    /// let patterns = PatternSet::new(&["*.txt".to_string()], &[]).unwrap();
    /// assert!(patterns.matches("docs/a.txt"));
    /// assert!(!patterns.matches("a.rs"));
    /// ```
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self> {
        Ok(Self {
            includes: compile(includes)?,
            excludes: compile(excludes)?,
        })
    }

    /// 기준 폴더 기준 상대 경로가 패턴과 일치하는지 확인
    ///
    /// 경로 구분자는 `/`로 정규화해서 전달해야 합니다.
    pub fn matches(&self, rel_path: &str) -> bool {
        let included = self.includes.is_empty()
            || self.includes.iter().any(|p| p.matches(rel_path));
        let excluded = self.excludes.iter().any(|p| p.matches(rel_path));

        included && !excluded
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|_| HInjectError::InvalidPattern { pattern: p.clone() })
        })
        .collect()
}

/// 파일셋: 기준 폴더와 include/exclude 패턴 묶음
#[derive(Debug, Clone)]
pub struct FileSet {
    /// 기준 폴더
    pub dir: PathBuf,
    /// include 글로브 패턴 (비어 있으면 전체)
    pub includes: Vec<String>,
    /// exclude 글로브 패턴
    pub excludes: Vec<String>,
    /// 최대 탐색 깊이
    pub max_depth: Option<usize>,
}

impl FileSet {
    /// 새 파일셋 생성
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
            max_depth: None,
        }
    }

    /// include 패턴 설정
    pub fn with_includes(mut self, includes: Vec<String>) -> Self {
        self.includes = includes;
        self
    }

    /// exclude 패턴 설정
    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    /// 최대 탐색 깊이 설정
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 기준 폴더 아래에서 패턴과 일치하는 파일 목록을 정렬된 순서로 반환
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Err(HInjectError::BaseDirNotFound {
                path: self.dir.clone(),
            });
        }
        if !self.dir.is_dir() {
            return Err(HInjectError::NotADirectory {
                path: self.dir.clone(),
            });
        }

        let patterns = PatternSet::new(&self.includes, &self.excludes)?;

        let walker = if let Some(max_depth) = self.max_depth {
            WalkDir::new(&self.dir).max_depth(max_depth)
        } else {
            WalkDir::new(&self.dir)
        };

        let files: Vec<PathBuf> = walker
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter(|e| {
                relative_slash_path(e.path(), &self.dir)
                    .map(|rel| patterns.matches(&rel))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        Ok(files)
    }
}

/// 기준 폴더 기준 상대 경로를 `/` 구분자 문자열로 변환
fn relative_slash_path(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        parts.push(component.as_os_str().to_str()?.to_string());
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "x").unwrap();
        path
    }

    #[test]
    fn test_pattern_set_include() {
        let patterns = PatternSet::new(&["*.txt".to_string()], &[]).unwrap();
        assert!(patterns.matches("a.txt"));
        assert!(patterns.matches("sub/b.txt"));
        assert!(!patterns.matches("a.rs"));
    }

    #[test]
    fn test_pattern_set_exclude() {
        let patterns =
            PatternSet::new(&["*.txt".to_string()], &["vendor/*".to_string()]).unwrap();
        assert!(patterns.matches("a.txt"));
        assert!(!patterns.matches("vendor/a.txt"));
    }

    #[test]
    fn test_pattern_set_empty_includes_all() {
        let patterns = PatternSet::new(&[], &[]).unwrap();
        assert!(patterns.matches("anything"));
        assert!(patterns.matches("sub/deep/file.rs"));
    }

    #[test]
    fn test_pattern_set_invalid() {
        let result = PatternSet::new(&["[invalid".to_string()], &[]);
        assert!(matches!(
            result,
            Err(HInjectError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_resolve_sorted() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "b.txt");
        create_file(temp_dir.path(), "a.txt");
        create_file(temp_dir.path(), "c.txt");

        let files = FileSet::new(temp_dir.path()).resolve().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_resolve_with_patterns() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "a.txt");
        create_file(temp_dir.path(), "b.rs");
        create_file(temp_dir.path(), "sub/c.txt");
        create_file(temp_dir.path(), "vendor/d.txt");

        let files = FileSet::new(temp_dir.path())
            .with_includes(vec!["*.txt".to_string()])
            .with_excludes(vec!["vendor/*".to_string()])
            .resolve()
            .unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.extension().unwrap() == "txt"));
        assert!(!files.iter().any(|p| p.to_str().unwrap().contains("vendor")));
    }

    #[test]
    fn test_resolve_max_depth() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "root.txt");
        create_file(temp_dir.path(), "sub/one.txt");
        create_file(temp_dir.path(), "sub/deep/two.txt");

        let files = FileSet::new(temp_dir.path())
            .with_max_depth(Some(2))
            .resolve()
            .unwrap();

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_resolve_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileSet::new(temp_dir.path().join("nope")).resolve();
        assert!(matches!(
            result,
            Err(HInjectError::BaseDirNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_file(temp_dir.path(), "plain.txt");

        let result = FileSet::new(file).resolve();
        assert!(matches!(result, Err(HInjectError::NotADirectory { .. })));
    }
}
