use crate::error::ConfigError;
use csv::{ReaderBuilder, Trim};
use indexmap::IndexMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Separator between the terms of one group in the engine's synonym syntax.
pub const TERM_DELIMITER: &str = ", ";

/// All terms registered under one canonical key, in the order they were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymGroup {
    pub key: String,
    pub terms: Vec<String>,
}

impl SynonymGroup {
    /// One line of the synonym list: `term, term, term`.
    pub fn to_line(&self) -> String {
        self.terms.join(TERM_DELIMITER)
    }
}

/// Group (key, term) pairs by key.
///
/// Keys come out in first-seen order and each group keeps its terms in
/// encounter order. Repeated terms are kept as they are.
pub fn group_pairs<I, K, T>(pairs: I) -> Vec<SynonymGroup>
where
    I: IntoIterator<Item = (K, T)>,
    K: Into<String>,
    T: Into<String>,
{
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for (key, term) in pairs {
        groups.entry(key.into()).or_default().push(term.into());
    }

    groups
        .into_iter()
        .map(|(key, terms)| SynonymGroup { key, terms })
        .collect()
}

/// Read two-column `key,term` records.
///
/// The first malformed record fails the whole read.
pub fn read_pairs<R: Read>(reader: R) -> Result<Vec<(String, String)>, ConfigError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut pairs = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let key = match row.get(0) {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ConfigError::format(line, "missing canonical key")),
        };
        let term = match row.get(1) {
            Some(term) if !term.is_empty() => term,
            _ => {
                return Err(ConfigError::format(
                    line,
                    format!("missing synonym term for key `{key}`"),
                ));
            }
        };

        pairs.push((key.to_string(), term.to_string()));
    }

    Ok(pairs)
}

/// Compile a synonym source into groups.
pub fn compile<R: Read>(reader: R) -> Result<Vec<SynonymGroup>, ConfigError> {
    let pairs = read_pairs(reader)?;
    let groups = group_pairs(pairs);
    debug!("compiled {} synonym groups", groups.len());
    Ok(groups)
}

/// Render groups as the engine's synonym list, one group per line.
pub fn render(groups: &[SynonymGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&group.to_line());
        out.push('\n');
    }
    out
}

/// Write a rendered list to `target`.
///
/// The content goes to a sibling temp file first and is renamed into place,
/// so readers never see a half-written list. The temp file is removed if
/// either step fails.
pub fn write_synonym_file(target: &Path, groups: &[SynonymGroup]) -> Result<(), ConfigError> {
    let tmp = target.with_extension("tmp");
    let written = fs::write(&tmp, render(groups)).and_then(|()| fs::rename(&tmp, target));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Compile `source` and persist the result at `target`.
///
/// Nothing is written unless the whole source compiles. Returns the number of
/// groups written.
pub fn compile_to_file(source: &Path, target: &Path) -> Result<usize, ConfigError> {
    info!("Compiling synonyms from {}", source.display());
    let groups = compile(File::open(source)?)?;
    write_synonym_file(target, &groups)?;
    info!("Wrote {} synonym groups to {}", groups.len(), target.display());
    Ok(groups.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_keep_first_seen_key_order() {
        let input = "heart,cardiac\nheart,cardio\nlung,pulmonary\n";
        let groups = compile(input.as_bytes()).unwrap();

        assert_eq!(render(&groups), "cardiac, cardio\npulmonary\n");
    }

    #[test]
    fn test_interleaved_keys_are_not_merged() {
        let input = "b,one\na,two\nb,three\nc,four\na,five\n";
        let groups = compile(input.as_bytes()).unwrap();

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(groups[0].terms, vec!["one", "three"]);
        assert_eq!(groups[1].terms, vec!["two", "five"]);
        assert_eq!(groups[2].terms, vec!["four"]);
    }

    #[test]
    fn test_duplicate_terms_are_kept() {
        let groups = group_pairs(vec![("ball", "testicular"), ("ball", "testicular")]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].to_line(), "testicular, testicular");
    }

    #[test]
    fn test_single_term_has_no_trailing_delimiter() {
        let groups = group_pairs(vec![("lung", "pulmonary")]);
        assert_eq!(groups[0].to_line(), "pulmonary");
    }

    #[test]
    fn test_cells_are_trimmed_and_extra_columns_ignored() {
        let input = " heart , cardiac , ignored\n";
        let groups = compile(input.as_bytes()).unwrap();

        assert_eq!(groups[0].key, "heart");
        assert_eq!(groups[0].terms, vec!["cardiac"]);
    }

    #[test]
    fn test_missing_term_is_format_error() {
        let input = "heart,cardiac\nlung\n";
        let err = compile(input.as_bytes()).unwrap_err();

        match err {
            ConfigError::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_term_is_format_error() {
        let err = compile("heart,\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::Format { .. }));
    }

    #[test]
    fn test_empty_source_compiles_to_empty_list() {
        let groups = compile("".as_bytes()).unwrap();
        assert!(groups.is_empty());
        assert_eq!(render(&groups), "");
    }

    #[test]
    fn test_compile_to_file_writes_list() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("synonyms.csv");
        let target = dir.path().join("solr_synonyms.txt");
        fs::write(&source, "heart,cardiac\nheart,cardio\nlung,pulmonary\n").unwrap();

        let count = compile_to_file(&source, &target).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "cardiac, cardio\npulmonary\n"
        );
    }

    #[test]
    fn test_malformed_source_leaves_previous_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("synonyms.csv");
        let target = dir.path().join("solr_synonyms.txt");
        fs::write(&target, "previous\n").unwrap();
        fs::write(&source, "heart,cardiac\nbroken\n").unwrap();

        assert!(compile_to_file(&source, &target).is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "previous\n");
        assert!(!target.with_extension("tmp").exists());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the target's place makes the rename fail.
        let target = dir.path().join("solr_synonyms");
        fs::create_dir(&target).unwrap();
        let groups = group_pairs(vec![("heart", "cardiac")]);

        let err = write_synonym_file(&target, &groups).unwrap_err();

        assert!(matches!(err, ConfigError::Io(_)));
        assert!(!target.with_extension("tmp").exists());
        assert!(target.is_dir());
    }
}
