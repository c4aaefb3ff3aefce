//! Synchronous execution: one pass over the processing domain.
//!
//! Lifecycle of a run:
//!   1. Lock every distinct bound raster once and agree on a single domain.
//!   2. Pre-pass: evaluate hoisted statements once, cache their values.
//!   3. Sweep the domain row by row. Per pixel, load inputs, run every
//!      statement in order (hoisted ones replay the cache), store outputs.

use std::sync::{Arc, MutexGuard};

use crate::error::RuntimeError;
use crate::namespaces::PixelContext;
use crate::raster::{Bounds, Raster, RasterHandle};
use crate::script::{Binding, Script};
use super::RunOptions;
use super::evaluator::Evaluator;

type Guard<'r> = MutexGuard<'r, dyn Raster + Send + 'static>;

/// A script variable backed by one band of a locked raster.
#[derive(Clone, Copy)]
struct Port {
    slot: usize,
    raster: usize,
    band: usize,
}

pub struct Runner {
    options: RunOptions,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(RunOptions::default())
    }
}

impl Runner {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn run(&self, script: &Script) -> Result<(), RuntimeError> {
        self.run_with_progress(script, &mut |_| {})
    }

    /// Run `script`, calling `progress` with the completed fraction at least
    /// every `progress_interval` and once with `1.0` at the end.
    #[tracing::instrument(name = "run", skip_all)]
    pub fn run_with_progress(&self, script: &Script, progress: &mut dyn FnMut(f64)) -> Result<(), RuntimeError> {
        let compiled = script.compiled.as_ref().ok_or(RuntimeError::NotCompiled)?;
        let table = &compiled.analysis.symbol_table;
        let hoisted = &compiled.analysis.plan.hoisted;
        let stmts = &compiled.ast.stmts;

        // ── Bind ────────────────────────────────────────────────────────────
        let handles = distinct_rasters(script);
        let mut guards = lock_all(&handles)?;
        let bounds = domain(script, &guards)?;

        let mut base = vec![f64::NAN; table.len()];
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for sym in table.iter() {
            match script.binding(&sym.name) {
                Some(Binding::Scalar(v)) => base[sym.slot] = *v,
                Some(Binding::Raster { raster, band }) => {
                    let idx = handles.iter().position(|h| same_raster(h, raster))
                        .ok_or_else(|| RuntimeError::binding(format!("raster for `{}` was not locked", sym.name)))?;
                    if *band >= guards[idx].bands() {
                        return Err(RuntimeError::binding(format!(
                            "`{}` is bound to band {band}, raster has {}", sym.name, guards[idx].bands(),
                        )));
                    }
                    let port = Port { slot: sym.slot, raster: idx, band: *band };
                    if sym.is_output() { outputs.push(port); }
                    if sym.read { inputs.push(port); }
                }
                None => {}
            }
        }

        let eval = Evaluator::new(table, &script.registry);

        // ── Pre-pass ────────────────────────────────────────────────────────
        let mut cache = vec![f64::NAN; stmts.len()];
        {
            let ctx = PixelContext::at_origin(bounds);
            let mut env = base.clone();
            for (i, stmt) in stmts.iter().enumerate().filter(|(i, _)| hoisted[*i]) {
                let v = eval.eval(&stmt.value, &env, &ctx)?;
                if let Some(slot) = table.slot(&stmt.target) {
                    env[slot] = v;
                }
                cache[i] = v;
            }
        }

        // Targets resolved once; every assigned name has a slot after analysis.
        let targets = stmts.iter()
            .map(|s| table.slot(&s.target).ok_or_else(|| RuntimeError::binding(format!("no slot for `{}`", s.target))))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            width = bounds.width,
            height = bounds.height,
            inputs = inputs.len(),
            outputs = outputs.len(),
            hoisted = hoisted.iter().filter(|h| **h).count(),
            "starting sweep"
        );

        // ── Sweep ───────────────────────────────────────────────────────────
        let total = bounds.pixel_count();
        let step = self.options.progress_interval.max(0.0);
        let mut last_reported = 0.0;
        let mut done = 0usize;
        let mut env = base.clone();

        for y in bounds.y..bounds.y + bounds.height as i64 {
            for x in bounds.x..bounds.x + bounds.width as i64 {
                let ctx = PixelContext { x, y, bounds };
                env.copy_from_slice(&base);
                for p in &inputs {
                    env[p.slot] = guards[p.raster].sample(x, y, p.band);
                }
                for (i, stmt) in stmts.iter().enumerate() {
                    env[targets[i]] = if hoisted[i] { cache[i] } else { eval.eval(&stmt.value, &env, &ctx)? };
                }
                for p in &outputs {
                    guards[p.raster].set_sample(x, y, p.band, env[p.slot]);
                }

                done += 1;
                let fraction = done as f64 / total as f64;
                if done < total && fraction - last_reported >= step {
                    last_reported = fraction;
                    progress(fraction);
                }
            }
        }

        progress(1.0);
        tracing::debug!(pixels = total, "sweep finished");
        Ok(())
    }
}

// ─── Binding helpers ──────────────────────────────────────────────────────────

fn same_raster(a: &RasterHandle, b: &RasterHandle) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Each bound raster once, in address order so concurrent runs lock
/// shared rasters in the same order.
fn distinct_rasters(script: &Script) -> Vec<RasterHandle> {
    let mut handles: Vec<RasterHandle> = Vec::new();
    for b in script.bindings().values() {
        if let Binding::Raster { raster, .. } = b {
            if !handles.iter().any(|h| same_raster(h, raster)) {
                handles.push(raster.clone());
            }
        }
    }
    handles.sort_by_key(|h| Arc::as_ptr(h) as *const () as usize);
    handles
}

fn lock_all(handles: &[RasterHandle]) -> Result<Vec<Guard<'_>>, RuntimeError> {
    handles.iter()
        .map(|h| h.lock().map_err(|_| RuntimeError::binding("a bound raster is poisoned by an earlier panic")))
        .collect()
}

/// The single domain every raster binding agrees on.
fn domain(script: &Script, guards: &[Guard<'_>]) -> Result<Bounds, RuntimeError> {
    let Some(first) = guards.first() else {
        return Err(RuntimeError::binding("no raster is bound, the processing domain is undefined"));
    };
    let bounds = first.bounds();
    if let Some(other) = guards.iter().map(|g| g.bounds()).find(|b| *b != bounds) {
        let names: Vec<&str> = script.bindings().iter()
            .filter(|(_, b)| matches!(b, Binding::Raster { .. }))
            .map(|(n, _)| n.as_str())
            .collect();
        return Err(RuntimeError::binding(format!(
            "raster bounds disagree ({bounds:?} vs {other:?}) among {}", names.join(", "),
        )));
    }
    Ok(bounds)
}
