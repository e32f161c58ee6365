//! Orchestration pipeline
//!
//! Stage order:
//! 1. bootstrap the primary tree (configure, build, canonicalize the database)
//! 2. read the database and partition sources into compartments
//! 3. synchronize the secondary tree
//! 4. inject preambles into the primary tree
//! 5. run the rewriter into the staging tree
//! 6. merge the kept files into the secondary tree
//! 7. inject preambles into the secondary tree
//! 8. apply source patches to the secondary tree
//! 9. compile the call-gate library
//! 10. configure and build the secondary tree with compartments enabled
//!
//! The entry-file invariant is checked in step 2, before any source file is
//! touched. The interrupt flag is checked between stages.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::ports::{
    CommandRunner, EventSink, FailureHandler, FileSystem, PipelineEvent, Stage,
};
use crate::domain::services::{partition, plan_invocations, KeepPolicy, Partition, RewriteLayout};
use crate::error::CompartResult;
use crate::infrastructure::process::toolchain;

use super::build::{callgate_source, BuildDriver};
use super::compile_db::{self, Canonicalized};
use super::inject::{inject_tree, InjectReport};
use super::interrupt::Interrupt;
use super::merge::{merge_kept, MergeReport};
use super::patch::{apply_patches, PatchReport};
use super::rewrite::run_rewriter;
use super::sync_tree::{sync_secondary, SyncReport};

/// Resolved locations for one run. Nothing here outlives the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    pub primary: PathBuf,
    pub secondary: PathBuf,
    pub build_dir: PathBuf,
    pub stage_dir: PathBuf,
    pub compile_db: PathBuf,
    pub rewriter: PathBuf,
    pub runtime_include: PathBuf,
}

impl PipelineRun {
    /// Resolve every configured path against the primary tree root.
    pub fn resolve(config: &Config, root: &Path) -> Self {
        Self {
            primary: root.to_path_buf(),
            secondary: config.secondary_tree(root),
            build_dir: root.join(&config.project.build_dir),
            stage_dir: root.join(&config.project.stage_dir),
            compile_db: config.compile_db_path(root),
            rewriter: root.join(&config.rewriter.binary),
            runtime_include: root.join(&config.rewriter.runtime_include),
        }
    }

    pub fn compile_db_dir(&self) -> PathBuf {
        self.compile_db
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.build_dir.clone())
    }
}

/// Which tree an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tree {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Reuse the existing primary build and compile database
    pub skip_bootstrap: bool,
    /// Use the secondary tree as it is
    pub skip_sync: bool,
}

/// Everything a full run did
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub partition: Partition,
    pub sync: Option<SyncReport>,
    pub primary_injection: InjectReport,
    pub rewrites: usize,
    pub merge: MergeReport,
    pub secondary_injection: InjectReport,
    pub patches: PatchReport,
    pub callgate_library: PathBuf,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    run: PipelineRun,
    fs: &'a dyn FileSystem,
    runner: &'a dyn CommandRunner,
    failure: &'a dyn FailureHandler,
    events: &'a dyn EventSink,
    interrupt: Interrupt,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        root: &Path,
        fs: &'a dyn FileSystem,
        runner: &'a dyn CommandRunner,
        failure: &'a dyn FailureHandler,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            config,
            run: PipelineRun::resolve(config, root),
            fs,
            runner,
            failure,
            events,
            interrupt: Interrupt::new(),
        }
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn paths(&self) -> &PipelineRun {
        &self.run
    }

    fn builder(&self) -> BuildDriver<'_> {
        BuildDriver::new(self.runner, self.fs, &self.config.build, &self.config.project)
    }

    fn begin(&self, stage: Stage) -> CompartResult<()> {
        self.interrupt.check()?;
        tracing::info!(stage = %stage, "stage");
        self.events.on_event(PipelineEvent::StageStarted { stage });
        Ok(())
    }

    fn skip(&self, stage: Stage, reason: &str) {
        tracing::debug!(stage = %stage, reason, "skipped");
        self.events.on_event(PipelineEvent::StageSkipped {
            stage,
            reason: reason.to_string(),
        });
    }

    /// Run every stage in order.
    pub fn run(&self, options: RunOptions) -> CompartResult<RunReport> {
        if options.skip_bootstrap {
            self.skip(Stage::Bootstrap, "--skip-bootstrap");
        } else {
            self.bootstrap()?;
        }

        let partition = self.partition()?;

        let sync = if options.skip_sync {
            self.skip(Stage::Sync, "--skip-sync");
            None
        } else {
            Some(self.sync()?)
        };

        let primary_injection = self.inject(&partition, Tree::Primary, false)?;
        let rewrites = self.rewrite(&partition)?;
        let merge = self.merge()?;
        let secondary_injection = self.inject(&partition, Tree::Secondary, false)?;
        let patches = self.patch(false)?;
        let callgate_library = self.callgates()?;
        self.final_build()?;

        self.events.on_event(PipelineEvent::Completed {
            secondary: self.run.secondary.clone(),
        });

        Ok(RunReport {
            partition,
            sync,
            primary_injection,
            rewrites,
            merge,
            secondary_injection,
            patches,
            callgate_library,
        })
    }

    /// Configure and build the primary tree, then canonicalize its database.
    pub fn bootstrap(&self) -> CompartResult<Canonicalized> {
        self.begin(Stage::Bootstrap)?;
        let builder = self.builder();
        builder.configure(&self.run.primary, &[])?;
        self.interrupt.check()?;
        builder.compile(&self.run.primary)?;
        self.canonicalize()
    }

    pub fn canonicalize(&self) -> CompartResult<Canonicalized> {
        compile_db::canonicalize_database(self.fs, &self.run.compile_db, &self.run.primary)
    }

    /// Read the database and group its sources.
    pub fn partition(&self) -> CompartResult<Partition> {
        self.begin(Stage::ReadDatabase)?;
        let sources = compile_db::read_sources(self.fs, &self.run.compile_db, &self.run.primary)?;
        tracing::debug!(sources = sources.len(), "read compile database");

        self.begin(Stage::Partition)?;
        let partition = partition(&sources, &self.config.compartments)?;
        self.events.on_event(PipelineEvent::Partitioned {
            compartments: partition
                .compartments
                .iter()
                .map(|c| (c.key, c.name.clone(), c.members.len()))
                .collect(),
            unassigned: partition.unassigned.len(),
        });
        Ok(partition)
    }

    pub fn sync(&self) -> CompartResult<SyncReport> {
        self.begin(Stage::Sync)?;
        sync_secondary(
            self.runner,
            self.fs,
            &self.config.sync.git,
            &self.run.primary,
            &self.run.secondary,
        )
    }

    pub fn inject(&self, partition: &Partition, tree: Tree, dry_run: bool) -> CompartResult<InjectReport> {
        let (stage, root) = match tree {
            Tree::Primary => (Stage::InjectPrimary, &self.run.primary),
            Tree::Secondary => (Stage::InjectSecondary, &self.run.secondary),
        };
        self.begin(stage)?;
        let report = inject_tree(self.fs, root, partition, &self.config.preamble, dry_run)?;
        for file in &report.files {
            self.events.on_event(PipelineEvent::FileTouched {
                stage,
                path: file.path.clone(),
                change: file.change,
            });
        }
        Ok(report)
    }

    /// Run the rewriter over `partition` into a freshly emptied staging tree.
    pub fn rewrite(&self, partition: &Partition) -> CompartResult<usize> {
        self.begin(Stage::Rewrite)?;
        let layout = self.layout()?;
        self.fs.remove_dir_all(&layout.stage_dir)?;
        tracing::debug!("cleared staging tree {}", layout.stage_dir.display());
        self.fs.create_dir_all(&layout.stage_dir)?;
        if let Some(dir) = layout.output_prefix.parent() {
            self.fs.create_dir_all(dir)?;
        }
        let invocations = plan_invocations(partition, &layout, &self.config.rewriter, self.config.rewriter.mode);
        run_rewriter(self.runner, self.failure, &invocations, &self.interrupt)
    }

    fn layout(&self) -> CompartResult<RewriteLayout> {
        let resource_include = toolchain::resource_include(self.runner, &self.config.toolchain, &self.run.primary)?;
        Ok(RewriteLayout {
            binary: self.run.rewriter.clone(),
            root: self.run.primary.clone(),
            output_prefix: self
                .run
                .secondary
                .join(&self.config.rewriter.callgate_dir)
                .join(&self.config.rewriter.output_prefix),
            stage_dir: self.run.stage_dir.clone(),
            compile_db_dir: self.run.compile_db_dir(),
            resource_include,
            runtime_include: self.run.runtime_include.clone(),
        })
    }

    pub fn merge(&self) -> CompartResult<MergeReport> {
        self.begin(Stage::Merge)?;
        let report = merge_kept(
            self.fs,
            &self.run.stage_dir,
            &self.run.secondary,
            &KeepPolicy::from_config(&self.config.keep),
        )?;
        self.events.on_event(PipelineEvent::Merged {
            copied: report.copied.len(),
            discarded: report.discarded.len(),
        });
        Ok(report)
    }

    pub fn patch(&self, dry_run: bool) -> CompartResult<PatchReport> {
        self.begin(Stage::Patch)?;
        let report = apply_patches(self.fs, &self.run.secondary, &self.config.patches(), dry_run)?;
        for entry in &report.entries {
            self.events.on_event(PipelineEvent::FileTouched {
                stage: Stage::Patch,
                path: entry.file.clone(),
                change: entry.change,
            });
        }
        Ok(report)
    }

    pub fn callgates(&self) -> CompartResult<PathBuf> {
        self.begin(Stage::Callgates)?;
        tracing::debug!(
            "compiling {}",
            callgate_source(&self.run.secondary, &self.config.rewriter).display()
        );
        let library = self.builder().callgate_library(
            &self.run.secondary,
            &self.config.rewriter,
            &self.run.runtime_include,
        )?;
        self.events.on_event(PipelineEvent::Produced {
            stage: Stage::Callgates,
            path: library.clone(),
        });
        Ok(library)
    }

    /// Configure the secondary tree with compartments enabled and build it.
    pub fn final_build(&self) -> CompartResult<()> {
        self.begin(Stage::Build)?;
        let builder = self.builder();
        builder.configure(&self.run.secondary, &self.config.build.compartment_options)?;
        self.interrupt.check()?;
        builder.compile(&self.run.secondary)
    }
}
