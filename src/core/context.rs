use std::{
    collections::BTreeSet,
    fs,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result};
use colored::Colorize;
use rayon::prelude::*;
use swc_common::SourceMap;

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config, parse_define},
    core::{
        data::ResolveOptions,
        file_scanner::scan_files,
        preprocess::{Processed, process_source},
    },
};

/// A file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_path: String,
    pub error: String,
}

/// Outcome of processing every scanned file.
pub struct ProjectRun {
    /// Successfully processed files, sorted by path.
    pub processed: Vec<Processed>,
    /// Files that failed, sorted by path.
    pub failures: Vec<FileFailure>,
}

impl ProjectRun {
    pub fn file_count(&self) -> usize {
        self.processed.len() + self.failures.len()
    }
}

/// Project-wide state for one CLI invocation.
///
/// # Configuration Priority
///
/// 1. CLI arguments (`-D`, `--enable`, `--disable`, `--source-root`)
/// 2. `.ifdefrc.json` config file
/// 3. Built-in defaults
pub struct ProjectContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory; includes, ignores and the output dir are relative to it.
    pub root_dir: PathBuf,

    /// Symbols and directive switches used for every file.
    pub options: ResolveOptions,

    /// Whether to print verbose diagnostic messages.
    pub verbose: bool,
}

impl ProjectContext {
    /// Load configuration and apply CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns error if the config file is invalid or a `-D` definition is malformed.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;

        // The config is searched from --source-root, or the current directory
        let search_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let config_result = load_config(&search_dir)?;

        if verbose && !config_result.from_file {
            eprintln!("Note: No .ifdefrc.json found, using default configuration");
        }

        let mut config = config_result.config;

        for raw in &common_args.define {
            let (name, value) = parse_define(raw)?;
            config.symbols.insert(name, value);
        }
        for name in &common_args.enable {
            config.directives.insert(name.to_lowercase(), true);
        }
        for name in &common_args.disable {
            config.directives.insert(name.to_lowercase(), false);
        }

        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.source_root));
        let options = config.resolve_options();

        Ok(Self {
            config,
            root_dir,
            options,
            verbose,
        })
    }

    /// Resolve a configured path against the project root.
    fn project_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            return p.to_path_buf();
        }
        let is_cur_dir = self
            .root_dir
            .components()
            .all(|c| matches!(c, Component::CurDir));
        if is_cur_dir {
            p.to_path_buf()
        } else {
            let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
            self.root_dir.join(rel)
        }
    }

    /// Output directory for `build --apply`.
    pub fn out_dir(&self) -> PathBuf {
        self.project_path(&self.config.out_dir)
    }

    /// Path of a scanned file relative to the project root, for display and mirroring.
    pub fn relative_path(&self, file_path: &str) -> PathBuf {
        let path = Path::new(file_path);
        let rel = path.strip_prefix(&self.root_dir).unwrap_or(path);
        rel.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }

    /// Collect source files. The output directory is never scanned.
    pub fn scan(&self) -> BTreeSet<String> {
        let mut ignores = self.config.ignores.clone();
        if !Path::new(&self.config.out_dir).is_absolute() {
            ignores.push(self.config.out_dir.clone());
        }

        let result = scan_files(
            &self.root_dir,
            &self.config.includes,
            &ignores,
            &self.config.extensions,
            self.verbose,
        );

        if result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                result.skipped_count,
                if self.verbose { "" } else { " (use -v for details)" }
            );
        }

        result.files
    }

    /// Read and preprocess one file.
    pub fn process_file(&self, file_path: &str) -> Result<Processed> {
        let code = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read file: {}", file_path))?;
        process_source(
            code,
            file_path,
            &self.options,
            Arc::new(SourceMap::default()),
        )
    }

    /// Scan and preprocess every file in parallel.
    ///
    /// Every file is independent: each gets its own `SourceMap` and its own
    /// evaluator, so reading, parsing and resolution all run on the rayon pool.
    pub fn process_all(&self) -> ProjectRun {
        let files = self.scan();

        let results: Vec<(String, Result<Processed>)> = files
            .par_iter()
            .map(|file_path| (file_path.clone(), self.process_file(file_path)))
            .collect();

        let mut processed = Vec::new();
        let mut failures = Vec::new();
        for (file_path, result) in results {
            match result {
                Ok(p) => processed.push(p),
                Err(e) => failures.push(FileFailure {
                    file_path,
                    error: format!("{:#}", e),
                }),
            }
        }

        processed.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        failures.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        ProjectRun {
            processed,
            failures,
        }
    }
}
