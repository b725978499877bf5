use super::RetrievalService;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tokio::fs;

/// Words shorter than this carry no signal ("a", "de", "is").
const MIN_TERM_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeDocument {
    pub source: String,
    pub content: String,
}

/// In-memory keyword index over a directory of `.txt` documentation files.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    documents: Vec<KnowledgeDocument>,
}

impl KnowledgeBase {
    pub fn new(documents: Vec<KnowledgeDocument>) -> Self {
        Self { documents }
    }

    /// Index every `.txt` file directly under `dir`. A missing directory gives an empty base.
    pub async fn load(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref();
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::warn!("Knowledge directory {:?} not found", dir);
                return Ok(Self::default());
            }
            Err(error) => return Err(error),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
                continue;
            }
            match fs::read_to_string(&path).await {
                Ok(content) => documents.push(KnowledgeDocument {
                    source: entry.file_name().to_string_lossy().into_owned(),
                    content,
                }),
                Err(error) => log::warn!("Skipping knowledge file {:?}: {}", path, error),
            }
        }
        documents.sort_by(|a, b| a.source.cmp(&b.source));

        log::info!("Indexed {} knowledge documents from {:?}", documents.len(), dir);
        Ok(Self { documents })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn search(&self, query: &str, k: usize) -> Vec<&KnowledgeDocument> {
        let terms = query_terms(query);
        if terms.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, &KnowledgeDocument)> = self
            .documents
            .iter()
            .filter_map(|document| {
                let content = document.content.to_lowercase();
                let source = document.source.to_lowercase();
                let score = terms
                    .iter()
                    .map(|term| {
                        let mut score = 0;
                        if source.contains(term.as_str()) {
                            score += 2; // file names are curated topics
                        }
                        if content.contains(term.as_str()) {
                            score += 1;
                        }
                        score
                    })
                    .sum::<usize>();
                (score > 0).then_some((score, document))
            })
            .collect();

        scored.sort_by(|a, b| match b.0.cmp(&a.0) {
            Ordering::Equal => a.1.source.cmp(&b.1.source),
            other => other,
        });
        scored.truncate(k);
        scored.into_iter().map(|(_, document)| document).collect()
    }
}

fn query_terms(query: &str) -> HashSet<String> {
    query
        .split(|c: char| !c.is_alphanumeric() && c != '_' && c != '$')
        .filter(|word| word.chars().count() >= MIN_TERM_LEN)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl RetrievalService for KnowledgeBase {
    async fn retrieve(&self, query: &str, k: usize) -> Vec<String> {
        self.search(query, k)
            .into_iter()
            .map(|document| document.content.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn doc(source: &str, content: &str) -> KnowledgeDocument {
        KnowledgeDocument {
            source: source.to_string(),
            content: content.to_string(),
        }
    }

    fn sample_base() -> KnowledgeBase {
        KnowledgeBase::new(vec![
            doc(
                "indexes.txt",
                "A full table scan on a large table usually means a missing index.",
            ),
            doc(
                "security.txt",
                "Revoke DBA privileges from application accounts and enforce password profiles.",
            ),
            doc(
                "rman.txt",
                "RMAN incremental backups reduce the backup window.",
            ),
        ])
    }

    #[test]
    fn ranks_documents_by_term_overlap() {
        let base = sample_base();

        let results = base.search("How do I fix a full table scan without an index?", 3);

        assert_eq!(results[0].source, "indexes.txt");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn file_name_matches_weigh_more() {
        let base = KnowledgeBase::new(vec![
            doc("a.txt", "security security"),
            doc("security.txt", "unrelated"),
        ]);

        let results = base.search("security", 2);

        assert_eq!(results[0].source, "security.txt");
        assert_eq!(results[1].source, "a.txt");
    }

    #[test]
    fn caps_results_at_k() {
        let base = KnowledgeBase::new(vec![
            doc("one.txt", "backup"),
            doc("two.txt", "backup"),
            doc("three.txt", "backup"),
        ]);

        assert_eq!(base.search("backup", 2).len(), 2);
        assert!(base.search("backup", 0).is_empty());
    }

    #[test]
    fn short_or_unknown_terms_find_nothing() {
        let base = sample_base();

        assert!(base.search("a is of", 3).is_empty());
        assert!(base.search("kubernetes", 3).is_empty());
    }

    #[tokio::test]
    async fn load_reads_only_txt_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("tuning.txt"), "Gather optimizer statistics.").unwrap();
        std::fs::write(dir.path().join("notes.md"), "statistics").unwrap();

        let base = KnowledgeBase::load(dir.path()).await.unwrap();

        assert_eq!(base.len(), 1);
        assert_eq!(
            base.retrieve("optimizer statistics", 3).await,
            vec!["Gather optimizer statistics.".to_string()]
        );
    }

    #[tokio::test]
    async fn load_missing_directory_is_empty() {
        let dir = tempdir().unwrap();

        let base = KnowledgeBase::load(dir.path().join("absent")).await.unwrap();

        assert!(base.is_empty());
        assert!(base.retrieve("anything", 3).await.is_empty());
    }
}
