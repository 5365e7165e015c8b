//! Per-file documentation orchestrator.
//!
//! [`DocPipeline`] coordinates the gateway, scanner, filter, and text
//! generator, and owns the process-wide documentation cache. The cache maps
//! `"{repo}:{path}"` to the generated narrative only — structural extraction
//! is cheap and recomputed on every pass, so a stale cache can never serve
//! outdated function lists. Entries are insert-only: never overwritten,
//! never evicted, gone on process restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::GenerationConfig;
use crate::error::{DocError, Result};
use crate::filter::filter_source_files;
use crate::generate::{build_file_prompt, TextGenerator};
use crate::github::RepoGateway;
use crate::models::FileDoc;
use crate::scanner::scan;

pub struct DocPipeline {
    gateway: Arc<dyn RepoGateway>,
    generator: Arc<dyn TextGenerator>,
    /// `"{repo}:{path}"` → documentation narrative. Unbounded by design;
    /// acceptable at demo scale, an LRU bound would be needed for a
    /// long-running production deployment.
    cache: Mutex<HashMap<String, String>>,
    ignored_folders: Vec<String>,
    snippet_chars: usize,
    snippet_chars_bare: usize,
}

impl DocPipeline {
    pub fn new(
        gateway: Arc<dyn RepoGateway>,
        generator: Arc<dyn TextGenerator>,
        generation: &GenerationConfig,
        ignored_folders: Vec<String>,
    ) -> Self {
        Self {
            gateway,
            generator,
            cache: Mutex::new(HashMap::new()),
            ignored_folders,
            snippet_chars: generation.snippet_chars,
            snippet_chars_bare: generation.snippet_chars_bare,
        }
    }

    /// Document up to `limit` source files of a repository, in file-tree
    /// order.
    ///
    /// Any gateway or generator failure aborts the whole batch; no partial
    /// result set is returned.
    pub async fn generate_repo_docs(
        &self,
        owner: &str,
        repo: &str,
        limit: usize,
    ) -> Result<Vec<FileDoc>> {
        let branch = self.gateway.default_branch(owner, repo).await?;
        let all_files = self.gateway.list_file_paths(owner, repo).await?;
        let source_files = filter_source_files(&all_files, &self.ignored_folders);

        let mut docs = Vec::new();

        for file_path in source_files.into_iter().take(limit) {
            let code = self
                .gateway
                .fetch_content(owner, repo, &branch, &file_path)
                .await?;
            let parsed = scan(&code);

            let cache_key = format!("{}:{}", repo, file_path);
            let cached = {
                let cache = self.lock_cache();
                cache.get(&cache_key).cloned()
            };

            let documentation = match cached {
                Some(text) => text,
                None => {
                    let budget = if parsed.is_empty() {
                        self.snippet_chars_bare
                    } else {
                        self.snippet_chars
                    };
                    let snippet = truncate_chars(&code, budget);
                    let prompt =
                        build_file_prompt(&file_path, &parsed.functions, &parsed.classes, snippet);
                    let text = self.generator.generate(&prompt).await?;

                    // Insert-if-absent: a racing request may have filled the
                    // key while the generator call was in flight.
                    let mut cache = self.lock_cache();
                    cache.entry(cache_key).or_insert_with(|| text.clone());
                    text
                }
            };

            docs.push(FileDoc {
                file: file_path,
                functions: parsed.functions,
                classes: parsed.classes,
                documentation,
            });
        }

        Ok(docs)
    }

    /// Lock the documentation cache, recovering from poisoning.
    ///
    /// A panicked lock holder leaves the map itself intact, so later
    /// requests keep being served.
    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Document a single inline file, bypassing the gateway and the cache.
    ///
    /// The generator is invoked on every call. Blank code is rejected with
    /// [`DocError::InvalidInput`].
    pub async fn document_file(&self, filename: &str, code: &str) -> Result<FileDoc> {
        if code.trim().is_empty() {
            return Err(DocError::InvalidInput("code must not be empty".into()));
        }

        let parsed = scan(code);
        let budget = if parsed.is_empty() {
            self.snippet_chars_bare
        } else {
            self.snippet_chars
        };
        let snippet = truncate_chars(code, budget);
        let prompt = build_file_prompt(filename, &parsed.functions, &parsed.classes, snippet);
        let documentation = self.generator.generate(&prompt).await?;

        Ok(FileDoc {
            file: filename.to_string(),
            functions: parsed.functions,
            classes: parsed.classes,
            documentation,
        })
    }
}

/// Truncate to at most `max_chars` characters, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory gateway serving a fixed tree.
    struct FakeGateway {
        files: Vec<(&'static str, &'static str)>,
    }

    #[async_trait]
    impl RepoGateway for FakeGateway {
        async fn default_branch(&self, _owner: &str, _repo: &str) -> Result<String> {
            Ok("main".to_string())
        }

        async fn list_file_paths(&self, _owner: &str, _repo: &str) -> Result<Vec<String>> {
            Ok(self.files.iter().map(|(p, _)| p.to_string()).collect())
        }

        async fn fetch_content(
            &self,
            _owner: &str,
            _repo: &str,
            _branch: &str,
            path: &str,
        ) -> Result<String> {
            self.files
                .iter()
                .find(|(p, _)| *p == path)
                .map(|(_, code)| code.to_string())
                .ok_or_else(|| DocError::FileFetchFailed(path.to_string()))
        }
    }

    /// Generator that counts invocations and records prompts.
    struct CountingGenerator {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    impl CountingGenerator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            if self.fail {
                return Err(DocError::GenerationFailed("quota exceeded".into()));
            }
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(format!("explanation #{}", n))
        }
    }

    fn pipeline_with(
        files: Vec<(&'static str, &'static str)>,
        generator: Arc<CountingGenerator>,
    ) -> DocPipeline {
        DocPipeline::new(
            Arc::new(FakeGateway { files }),
            generator,
            &GenerationConfig::default(),
            vec!["node_modules".to_string()],
        )
    }

    #[tokio::test]
    async fn documents_filtered_files_in_order() {
        let generator = Arc::new(CountingGenerator::new());
        let pipeline = pipeline_with(
            vec![
                ("src/auth.ts", "function loginUser(a, b) { return true; }"),
                ("README.md", "# readme"),
                ("src/api.js", "const fetchData = () => {}"),
                ("src/api.test.js", "test code"),
            ],
            generator.clone(),
        );

        let docs = pipeline.generate_repo_docs("owner", "repo", 10).await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].file, "src/auth.ts");
        assert_eq!(docs[0].functions, vec!["loginUser"]);
        assert_eq!(docs[1].file, "src/api.js");
        assert_eq!(docs[1].functions, vec!["fetchData"]);
    }

    #[tokio::test]
    async fn respects_limit() {
        let generator = Arc::new(CountingGenerator::new());
        let pipeline = pipeline_with(
            vec![
                ("a.ts", "function a() {}"),
                ("b.ts", "function b() {}"),
                ("c.ts", "function c() {}"),
            ],
            generator.clone(),
        );

        let docs = pipeline.generate_repo_docs("owner", "repo", 2).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cache_invokes_generator_once_per_key() {
        let generator = Arc::new(CountingGenerator::new());
        let pipeline = pipeline_with(
            vec![("src/auth.ts", "function loginUser() {}")],
            generator.clone(),
        );

        let first = pipeline.generate_repo_docs("owner", "repo", 5).await.unwrap();
        let second = pipeline.generate_repo_docs("owner", "repo", 5).await.unwrap();

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first[0].documentation, second[0].documentation);
    }

    #[tokio::test]
    async fn generation_failure_aborts_whole_batch() {
        let generator = Arc::new(CountingGenerator::failing());
        let pipeline = pipeline_with(vec![("a.ts", "function a() {}")], generator);

        let err = pipeline
            .generate_repo_docs("owner", "repo", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, DocError::GenerationFailed(_)));
    }

    #[tokio::test]
    async fn snippet_budget_shrinks_without_structure() {
        let long_plain: &'static str =
            Box::leak(("x".repeat(2000) + "\n").into_boxed_str());
        let generator = Arc::new(CountingGenerator::new());
        let pipeline = pipeline_with(vec![("notes.ts", long_plain)], generator.clone());

        pipeline.generate_repo_docs("owner", "repo", 1).await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        // No functions/classes found, so only the 800-char budget of x's
        // may appear in the prompt.
        assert!(prompts[0].contains(&"x".repeat(800)));
        assert!(!prompts[0].contains(&"x".repeat(801)));
    }

    #[tokio::test]
    async fn poisoned_cache_lock_does_not_panic_later_requests() {
        let generator = Arc::new(CountingGenerator::new());
        let pipeline = pipeline_with(vec![("a.ts", "function a() {}")], generator.clone());

        // Prime the cache, then poison the lock from a panicking thread.
        pipeline.generate_repo_docs("owner", "repo", 5).await.unwrap();
        std::thread::scope(|s| {
            let handle = s.spawn(|| {
                let _guard = pipeline.cache.lock().unwrap();
                panic!("poisoning the cache lock");
            });
            assert!(handle.join().is_err());
        });

        // The cached entry is still readable; no extra generation happens.
        let docs = pipeline.generate_repo_docs("owner", "repo", 5).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].documentation, "explanation #0");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn document_file_rejects_blank_code() {
        let generator = Arc::new(CountingGenerator::new());
        let pipeline = pipeline_with(vec![], generator.clone());

        let err = pipeline.document_file("a.ts", "   \n  ").await.unwrap_err();
        assert!(matches!(err, DocError::InvalidInput(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn document_file_bypasses_cache() {
        let generator = Arc::new(CountingGenerator::new());
        let pipeline = pipeline_with(vec![], generator.clone());

        let code = "class AuthService { }";
        let first = pipeline.document_file("auth.ts", code).await.unwrap();
        let second = pipeline.document_file("auth.ts", code).await.unwrap();

        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
        assert_eq!(first.classes, vec!["AuthService"]);
        assert_ne!(first.documentation, second.documentation);
    }

    #[test]
    fn truncate_chars_respects_utf8_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }
}
