//! Pipeline orchestration
//!
//! Each request moves through
//! `Resolving -> (CommonjsPath | ModulePath) -> ShimWritten | Skipped`.
//! Requests are independent and processed concurrently; the run waits for all
//! of them before handing the collaborator a single alias/exclusion batch.
//!
//! A shim or bundle is reused only when both the artifact and the entry file
//! it was generated from still match their recorded digests. A shim must also
//! still require the target of the module's current kind.

use crate::bundle::BundleRequest;
use crate::error::{PrebundleError, PrebundleResult};
use crate::pipeline::collaborator::BuildToolConfig;
use crate::pipeline::context::RunContext;
use crate::pipeline::report::{
    ArtifactStatus, FailureReason, ModuleFailure, ModuleOutcome, RunReport,
};
use crate::resolve::{self, externals, is_builtin, ModuleKind, ModuleRequest, ResolvedDependency};
use crate::shim::{generate, require_line, write_shim};
use futures_util::future::try_join_all;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Result of one module: a shim in place, or the reason it was dropped
type ModuleResult = Result<ModuleOutcome, FailureReason>;

/// Pre-bundle every requested module and hand the results to `collaborator`
///
/// Per-module failures end up in the report; only missing tooling or an
/// unusable cache root abort the run, in which case the collaborator is not
/// called at all.
pub async fn run(
    ctx: &RunContext,
    requests: &[ModuleRequest],
    collaborator: &mut dyn BuildToolConfig,
) -> PrebundleResult<RunReport> {
    ctx.cache().ensure_root().await?;

    let mut report = RunReport::default();
    let mut seen = HashSet::new();
    let mut units = Vec::new();

    for request in requests {
        let name = request.name();
        if !seen.insert(name) {
            debug!("Skipping duplicate request for {}", name);
            continue;
        }
        if request.explicit_kind().is_none() && is_builtin(name) {
            debug!("Skipping built-in module {}", name);
            report.builtins.push(name.to_string());
            continue;
        }
        units.push(process(ctx, request));
    }

    let results = try_join_all(units).await?;

    for (name, result) in results {
        match result {
            Ok(outcome) => report.succeeded.push(outcome),
            Err(reason) => report.failures.push(ModuleFailure::new(name, reason)),
        }
    }

    collaborator.apply(report.aliases(), report.exclusions());
    Ok(report)
}

async fn process(
    ctx: &RunContext,
    request: &ModuleRequest,
) -> PrebundleResult<(String, ModuleResult)> {
    let name = request.name().to_string();

    let dep = match resolve::resolve(request, ctx.search_root()).await {
        Ok(dep) => dep,
        Err(e) => {
            warn!("Can not resolve module {}: {}", name, e);
            return Ok((name, Err(FailureReason::from_error(&e))));
        }
    };

    let result = match dep.kind {
        ModuleKind::Commonjs => commonjs_path(ctx, &dep).await,
        ModuleKind::Module => module_path(ctx, &dep).await,
    };

    match result {
        Ok(outcome) => Ok((name, Ok(outcome))),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!("Skipping {}: {}", name, e);
            Ok((name, Err(FailureReason::from_error(&e))))
        }
    }
}

/// Shim a CommonJS package, requiring it by its own name
async fn commonjs_path(
    ctx: &RunContext,
    dep: &ResolvedDependency,
) -> PrebundleResult<ModuleOutcome> {
    let shim_path = ctx.shim_path(&dep.name);

    let fresh = is_fresh(ctx, &shim_path, &dep.entry_path).await
        && shim_requires(&shim_path, &dep.name).await;

    let status = if fresh {
        debug!("Cache hit for {}", dep.name);
        ArtifactStatus::Cached
    } else {
        write_shim_for(ctx, &dep.name, &dep.entry_path, &dep.name).await?;
        record(ctx, &dep.entry_path).await;
        ArtifactStatus::Generated
    };

    Ok(ModuleOutcome {
        name: dep.name.clone(),
        kind: dep.kind,
        shim_path,
        status,
    })
}

/// Bundle an ES module to CommonJS, then shim the bundle
///
/// The bundle and the shim are tracked separately: a valid bundle skips the
/// engine but the shim is still checked on its own.
async fn module_path(
    ctx: &RunContext,
    dep: &ResolvedDependency,
) -> PrebundleResult<ModuleOutcome> {
    let bundle_path = ctx.bundle_path(&dep.name);
    let shim_path = ctx.shim_path(&dep.name);
    let bundle_fresh = is_fresh(ctx, &bundle_path, &dep.entry_path).await;

    if bundle_fresh {
        debug!("Bundle cache hit for {}", dep.name);
    } else {
        bundle(ctx, dep, &bundle_path).await?;
    }

    let target = ctx.bundle_require_target(&dep.name);
    let shim_fresh = bundle_fresh
        && ctx.cache().is_valid(&shim_path).await
        && shim_requires(&shim_path, &target).await;

    let status = if shim_fresh {
        debug!("Cache hit for {}", dep.name);
        ArtifactStatus::Cached
    } else {
        write_shim_for(ctx, &dep.name, &bundle_path, &target).await?;
        ArtifactStatus::Generated
    };

    if !bundle_fresh {
        record(ctx, &dep.entry_path).await;
    }

    Ok(ModuleOutcome {
        name: dep.name.clone(),
        kind: dep.kind,
        shim_path,
        status,
    })
}

async fn bundle(
    ctx: &RunContext,
    dep: &ResolvedDependency,
    bundle_path: &Path,
) -> PrebundleResult<()> {
    if let Some(parent) = bundle_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PrebundleError::io(format!("creating {}", parent.display()), e))?;
    }

    let externals = externals();
    let request = BundleRequest {
        entry: &dep.entry_path,
        outfile: bundle_path,
        target: ctx.target(),
        externals: &externals,
        extra: ctx.bundle_options(),
    };

    debug!("Bundling {} with {}", dep.name, ctx.engine().engine_name());
    let result = ctx.engine().bundle(&request).await?;

    for warning in &result.warnings {
        debug!("{}: {}", dep.name, warning);
    }
    if !result.is_success() {
        return Err(PrebundleError::BuildFailed {
            name: dep.name.clone(),
            errors: result.errors,
        });
    }

    record(ctx, bundle_path).await;
    Ok(())
}

/// Generate, write and record the shim for `module_path`
async fn write_shim_for(
    ctx: &RunContext,
    name: &str,
    module_path: &Path,
    require_target: &str,
) -> PrebundleResult<()> {
    let exported = ctx.exports().exports(module_path).await?;
    let code = generate(&exported, require_target);
    let shim_path = ctx.shim_path(name);

    write_shim(&shim_path, &code).await?;
    record(ctx, &shim_path).await;

    info!("Pre-bundling: {}", name);
    Ok(())
}

/// Artifact and its source both match their recorded digests
async fn is_fresh(ctx: &RunContext, artifact: &Path, source: &Path) -> bool {
    ctx.cache().is_valid(artifact).await && ctx.cache().is_valid(source).await
}

/// Shim's first line loads `require_target`
///
/// Guards against a module switching kind while its entry is unchanged.
async fn shim_requires(shim_path: &Path, require_target: &str) -> bool {
    match tokio::fs::read_to_string(shim_path).await {
        Ok(code) => code.lines().next() == Some(require_line(require_target).as_str()),
        Err(_) => false,
    }
}

/// Record a digest; a failure only costs a rebuild next run
async fn record(ctx: &RunContext, path: &Path) {
    if let Err(e) = ctx.cache().record(path).await {
        warn!("Failed to record {} in cache: {}", path.display(), e);
    }
}
