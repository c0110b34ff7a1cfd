//! Publishing of app-store static assets.
//!
//! Runs the scan, copies each file into `{output}/{app}/{file}`, hashes icon
//! SVGs along the way and writes the manifest. The copied-file counter and the
//! hash map are returned to the caller rather than kept in shared state.
//!
//! Copying is sequential by default. With more than one worker the copy step
//! runs on a rayon pool; entries that a later entry would overwrite are not
//! copied at all, so the resulting tree matches the sequential run.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::config::Config;
use crate::copier::{check_source, copy_file, destination_for, ensure_dir};
use crate::error::StaticCopyError;
use crate::hasher::{hash_file, is_icon_svg, SvgHashes};
use crate::manifest::write_manifest;
use crate::scanner::{find_static_files, StaticFileEntry};

/// Cache-line aligned atomic counter to prevent false sharing
/// Each counter is on its own 64-byte cache line
#[repr(align(64))]
pub struct CacheAlignedAtomic(pub AtomicU64);

impl CacheAlignedAtomic {
    pub const fn new(val: u64) -> Self {
        Self(AtomicU64::new(val))
    }

    #[inline]
    fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    fn add(&self, val: u64) {
        self.0.fetch_add(val, Ordering::Relaxed);
    }
}

/// Counters shared by the copy workers
pub struct CopyStats {
    /// Entries processed, including ones overwritten later in the run
    pub files_copied: CacheAlignedAtomic,
    /// Bytes actually written to disk
    pub bytes_copied: CacheAlignedAtomic,
    /// Entries whose destination another entry also writes
    pub overwritten: CacheAlignedAtomic,
}

impl CopyStats {
    pub fn new() -> Self {
        Self {
            files_copied: CacheAlignedAtomic::new(0),
            bytes_copied: CacheAlignedAtomic::new(0),
            overwritten: CacheAlignedAtomic::new(0),
        }
    }
}

impl Default for CopyStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Console output for a run: per-file lines and an optional progress bar
pub struct Reporter {
    progress: Option<ProgressBar>,
    quiet: bool,
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let progress = verbose.then(|| {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        });

        Self {
            progress,
            quiet,
            verbose,
        }
    }

    /// No output besides the scanner's own notices
    pub fn silent() -> Self {
        Self::new(false, true)
    }

    fn start(&self, total: usize) {
        if let Some(ref pb) = self.progress {
            pb.set_length(total as u64);
        }
    }

    fn line(&self, msg: String) {
        match self.progress {
            Some(ref pb) => pb.println(msg),
            None => println!("{msg}"),
        }
    }

    fn copied(&self, app_dir_name: &str, file_name: &str) {
        if !self.quiet {
            self.line(format!("Copied {app_dir_name}/{file_name}"));
        }
        self.tick();
    }

    fn overwritten(&self, dst: &Path) {
        if self.verbose {
            self.line(format!("Overwritten in this run: {}", dst.display()));
        }
    }

    fn tick(&self) {
        if let Some(ref pb) = self.progress {
            pb.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(ref pb) = self.progress {
            pb.finish_and_clear();
        }
    }
}

/// Result of copying a set of entries
#[derive(Debug, Default)]
pub struct CopyOutcome {
    pub files_copied: u64,
    pub bytes_copied: u64,
    pub overwritten: u64,
    pub hashes: SvgHashes,
}

impl CopyOutcome {
    fn from_stats(stats: &CopyStats, hashes: SvgHashes) -> Self {
        Self {
            files_copied: stats.files_copied.get(),
            bytes_copied: stats.bytes_copied.get(),
            overwritten: stats.overwritten.get(),
            hashes,
        }
    }
}

/// Summary of a completed run
#[derive(Debug)]
pub struct PublishReport {
    pub files_copied: u64,
    pub bytes_copied: u64,
    pub overwritten: u64,
    pub hashes: SvgHashes,
    pub manifest_path: PathBuf,
}

/// How a run ended
#[derive(Debug)]
pub enum PublishOutcome {
    /// The scan found nothing; no manifest was written
    NoStaticFiles,
    /// Files were copied and the manifest written
    Published(PublishReport),
}

/// Scan, copy and hash, then write the manifest
pub fn publish(
    config: &Config,
    shutdown: &AtomicBool,
    reporter: &Reporter,
) -> Result<PublishOutcome, StaticCopyError> {
    ensure_dir(&config.output_root)?;

    let entries = find_static_files(&config.source_root)?;
    if entries.is_empty() {
        return Ok(PublishOutcome::NoStaticFiles);
    }

    let outcome = copy_entries(
        &entries,
        &config.output_root,
        config.jobs,
        shutdown,
        reporter,
    )?;

    let manifest_path = write_manifest(&config.output_root, &outcome.hashes)?;

    Ok(PublishOutcome::Published(PublishReport {
        files_copied: outcome.files_copied,
        bytes_copied: outcome.bytes_copied,
        overwritten: outcome.overwritten,
        hashes: outcome.hashes,
        manifest_path,
    }))
}

/// Copy every entry into the output root and hash icon SVGs
pub fn copy_entries(
    entries: &[StaticFileEntry],
    output_root: &Path,
    jobs: usize,
    shutdown: &AtomicBool,
    reporter: &Reporter,
) -> Result<CopyOutcome, StaticCopyError> {
    reporter.start(entries.len());

    let result = if jobs <= 1 {
        copy_sequential(entries, output_root, shutdown, reporter)
    } else {
        copy_parallel(entries, output_root, jobs, shutdown, reporter)
    };

    reporter.finish();
    result
}

fn copy_sequential(
    entries: &[StaticFileEntry],
    output_root: &Path,
    shutdown: &AtomicBool,
    reporter: &Reporter,
) -> Result<CopyOutcome, StaticCopyError> {
    let stats = CopyStats::new();
    let mut hashes = SvgHashes::new();
    let mut written: HashSet<PathBuf> = HashSet::new();

    for entry in entries {
        if shutdown.load(Ordering::Relaxed) {
            return Err(StaticCopyError::Cancelled);
        }

        let file_name = entry.file_name();
        let dest_dir = output_root.join(&entry.app_dir_name);
        ensure_dir(&dest_dir)?;

        let dst = dest_dir.join(entry.file_name_os());
        let bytes = copy_file(&entry.file_path, &dst)?;
        stats.files_copied.add(1);
        stats.bytes_copied.add(bytes);

        if is_icon_svg(&file_name) {
            hashes.insert(entry.app_dir_name.clone(), hash_file(&entry.file_path)?);
        }

        reporter.copied(&entry.app_dir_name, &file_name);

        if !written.insert(dst.clone()) {
            stats.overwritten.add(1);
            reporter.overwritten(&dst);
        }
    }

    Ok(CopyOutcome::from_stats(&stats, hashes))
}

struct CopyTask<'a> {
    entry: &'a StaticFileEntry,
    file_name: String,
    dst: PathBuf,
}

fn copy_parallel(
    entries: &[StaticFileEntry],
    output_root: &Path,
    jobs: usize,
    shutdown: &AtomicBool,
    reporter: &Reporter,
) -> Result<CopyOutcome, StaticCopyError> {
    let tasks: Vec<CopyTask> = entries
        .iter()
        .map(|entry| CopyTask {
            entry,
            file_name: entry.file_name(),
            dst: destination_for(output_root, entry),
        })
        .collect();

    // Later entries win on a shared destination
    let mut last_writer: HashMap<&Path, usize> = HashMap::with_capacity(tasks.len());
    for (idx, task) in tasks.iter().enumerate() {
        last_writer.insert(task.dst.as_path(), idx);
    }

    let mut created: HashSet<&Path> = HashSet::new();
    for task in &tasks {
        if let Some(dir) = task.dst.parent() {
            if created.insert(dir) {
                ensure_dir(dir)?;
            }
        }
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let stats = CopyStats::new();

    let results: Vec<Result<Option<String>, StaticCopyError>> = pool.install(|| {
        tasks
            .par_iter()
            .enumerate()
            .map(|(idx, task)| {
                if shutdown.load(Ordering::Relaxed) {
                    return Err(StaticCopyError::Cancelled);
                }

                stats.files_copied.add(1);

                if last_writer.get(task.dst.as_path()) != Some(&idx) {
                    // Not written, but a source that cannot be copied still fails the run
                    check_source(&task.entry.file_path, &task.dst)?;
                    stats.overwritten.add(1);
                    reporter.overwritten(&task.dst);
                    reporter.tick();
                    return Ok(None);
                }

                let bytes = copy_file(&task.entry.file_path, &task.dst)?;
                stats.bytes_copied.add(bytes);

                let hash = if is_icon_svg(&task.file_name) {
                    Some(hash_file(&task.entry.file_path)?)
                } else {
                    None
                };

                reporter.copied(&task.entry.app_dir_name, &task.file_name);
                Ok(hash)
            })
            .collect()
    });

    let mut hashes = SvgHashes::new();
    for (task, result) in tasks.iter().zip(results) {
        if let Some(hash) = result? {
            hashes.insert(task.entry.app_dir_name.clone(), hash);
        }
    }

    Ok(CopyOutcome::from_stats(&stats, hashes))
}
