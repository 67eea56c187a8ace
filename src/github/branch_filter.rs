//! Glob-style branch name filters.
//!
//! A filter spec is a `|`-separated list of globs such as
//! `feature/*|release-?`. `*` matches any run of characters, `?` matches a
//! single character, and every other character is literal. A glob must match
//! the whole short branch name. An empty spec matches every branch.

use regex::Regex;

use super::error::FetchError;

const SEPARATOR: char = '|';
const HEADS_PREFIX: &str = "refs/heads/";

/// Compiled set of branch patterns.
///
/// # Example
///
/// ```
/// use pullfetch::BranchFilter;
///
/// let filter = BranchFilter::compile_patterns(Some("feature/*|main")).expect("valid filter");
/// assert!(filter.matches("feature/login"));
/// assert!(filter.matches("main"));
/// assert!(!filter.matches("release/1.0"));
/// assert!(BranchFilter::default().matches("anything"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchFilter {
    patterns: Vec<Regex>,
}

impl BranchFilter {
    /// Compiles a filter spec. `None` or a blank spec yields a filter that
    /// matches everything.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidPattern`] when a glob cannot be compiled.
    pub fn compile_patterns(filter_spec: Option<&str>) -> Result<Self, FetchError> {
        let patterns = filter_spec
            .into_iter()
            .flat_map(|spec| spec.split(SEPARATOR))
            .map(str::trim)
            .filter(|glob| !glob.is_empty())
            .map(compile_glob)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Returns true when the filter has no patterns.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Tests a branch name against the filter.
    ///
    /// A leading `refs/heads/` is ignored so full ref paths and short names
    /// behave the same.
    #[must_use]
    pub fn matches(&self, branch: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }

        let short_name = branch.strip_prefix(HEADS_PREFIX).unwrap_or(branch);
        self.patterns
            .iter()
            .any(|pattern| pattern.is_match(short_name))
    }
}

fn compile_glob(glob: &str) -> Result<Regex, FetchError> {
    let mut expression = String::with_capacity(glob.len() + 8);
    expression.push('^');
    for character in glob.chars() {
        match character {
            '*' => expression.push_str(".*"),
            '?' => expression.push('.'),
            literal => expression.push_str(&regex::escape(literal.encode_utf8(&mut [0; 4]))),
        }
    }
    expression.push('$');

    Regex::new(&expression).map_err(|error| FetchError::InvalidPattern {
        pattern: glob.to_owned(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::BranchFilter;

    fn filter(spec: &str) -> BranchFilter {
        BranchFilter::compile_patterns(Some(spec)).expect("filter should compile")
    }

    #[rstest]
    #[case::absent(None)]
    #[case::empty(Some(""))]
    #[case::separators_only(Some(" | |"))]
    fn empty_specs_match_everything(#[case] spec: Option<&str>) {
        let compiled = BranchFilter::compile_patterns(spec).expect("filter should compile");

        assert!(compiled.is_pass_through());
        assert!(compiled.matches("main"));
        assert!(compiled.matches("feature/x"));
    }

    #[rstest]
    #[case::wildcard("feature/*", "feature/x", true)]
    #[case::wildcard_mismatch("release/*", "feature/x", false)]
    #[case::exact("main", "main", true)]
    #[case::exact_is_anchored("main", "main-backup", false)]
    #[case::suffix_anchored("main", "not-main", false)]
    #[case::single_character("release-?", "release-1", true)]
    #[case::single_character_mismatch("release-?", "release-10", false)]
    #[case::dot_is_literal("v1.0", "v1x0", false)]
    #[case::alternatives("hotfix/*|main", "main", true)]
    #[case::whitespace_trimmed(" hotfix/* | main ", "hotfix/urgent", true)]
    #[case::full_ref("main", "refs/heads/main", true)]
    #[case::regex_metacharacters("fix(1)+[x]", "fix(1)+[x]", true)]
    fn matches_globs(#[case] spec: &str, #[case] branch: &str, #[case] expected: bool) {
        assert_eq!(filter(spec).matches(branch), expected);
    }

    #[test]
    fn filtering_is_idempotent() {
        let compiled = filter("feature/*");
        let branches = ["feature/a", "main", "feature/b", "release/1"];

        let once: Vec<&str> = branches
            .iter()
            .copied()
            .filter(|branch| compiled.matches(branch))
            .collect();
        let twice: Vec<&str> = once
            .iter()
            .copied()
            .filter(|branch| compiled.matches(branch))
            .collect();

        assert_eq!(once, vec!["feature/a", "feature/b"]);
        assert_eq!(once, twice);
    }
}
