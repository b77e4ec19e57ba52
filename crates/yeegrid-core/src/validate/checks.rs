//! The individual validation checks, in report order.

use std::collections::HashSet;

use yeegrid_geometry::{Axis, BoundingBox};
use yeegrid_materials::PermittivityModel;

use super::{Context, Diagnostic, DiagnosticKind};

/// Time step must not exceed `min(Δx, Δy, Δz) / (c √3)`, i.e. the Courant
/// factor must not exceed one.
pub(super) fn cfl(ctx: &Context<'_>) -> Vec<Diagnostic> {
    let dt = ctx.grid.time_step(ctx.sim.courant());
    let bound = ctx.grid.time_step(1.0);
    if dt > bound * (1.0 + 1.0e-12) {
        return vec![Diagnostic::error(
            DiagnosticKind::Cfl,
            format!(
                "time step {dt:.4e} s exceeds the stability bound {bound:.4e} s; \
                 the Courant factor {} must not exceed 1",
                ctx.sim.courant()
            ),
        )];
    }
    Vec::new()
}

pub(super) fn domain_containment(ctx: &Context<'_>) -> Vec<Diagnostic> {
    let domain = ctx.sim.bounds();
    let mut out = Vec::new();
    for (i, s) in ctx.sim.structures().iter() {
        if !domain.intersects(&s.geometry.bounding_box()) {
            out.push(Diagnostic::warning(
                DiagnosticKind::DomainContainment,
                format!("{} lies entirely outside the domain and has no effect", s.label(i)),
            ));
        }
    }
    for (i, s) in ctx.sim.sources().iter().enumerate() {
        if !domain.intersects(&s.bounding_box()) {
            out.push(Diagnostic::error(
                DiagnosticKind::DomainContainment,
                format!("{} lies entirely outside the domain", s.label(i)),
            ));
        }
    }
    for m in ctx.sim.monitors() {
        if !domain.intersects(&m.bounding_box()) {
            out.push(Diagnostic::error(
                DiagnosticKind::DomainContainment,
                format!("monitor '{}' records nothing: it lies entirely outside the domain", m.name),
            ));
        }
    }
    out
}

pub(super) fn grid_size(ctx: &Context<'_>) -> Vec<Diagnostic> {
    let total = ctx.grid.total_cells();
    let limit = ctx.settings.max_total_cells;
    if total > limit {
        let [nx, ny, nz] = ctx.grid.num_cells();
        return vec![Diagnostic::error(
            DiagnosticKind::GridSize,
            format!("grid has {total} cells ({nx} × {ny} × {nz}), above the limit of {limit}"),
        )];
    }
    Vec::new()
}

/// Smallest finite, non-zero extent of `bb` inside the domain, with its axis.
fn smallest_extent(bb: &BoundingBox, domain: &BoundingBox) -> Option<(Axis, f64, f64)> {
    let clipped = domain.intersection(bb)?;
    Axis::ALL
        .into_iter()
        .filter(|&axis| !bb.is_unbounded(axis))
        .map(|axis| {
            let (lo, hi) = clipped.span(axis);
            (axis, lo, hi)
        })
        .filter(|(_, lo, hi)| hi > lo)
        .min_by(|a, b| (a.2 - a.1).total_cmp(&(b.2 - b.1)))
}

pub(super) fn feature_resolution(ctx: &Context<'_>) -> Vec<Diagnostic> {
    let domain = ctx.sim.bounds();
    let need = ctx.settings.min_cells_per_feature;
    let mut out = Vec::new();
    for (i, s) in ctx.sim.structures().iter() {
        let Some((axis, lo, hi)) = smallest_extent(&s.geometry.bounding_box(), &domain) else {
            continue;
        };
        let cells = ctx.grid.axis(axis).cells_within(lo, hi);
        if cells < need {
            out.push(Diagnostic::warning(
                DiagnosticKind::FeatureResolution,
                format!(
                    "{} is {:.4} µm thick along {axis} but spans only {cells} cells (at least {need} recommended)",
                    s.label(i),
                    hi - lo
                ),
            ));
        }
    }
    out
}

pub(super) fn symmetry(ctx: &Context<'_>) -> Vec<Diagnostic> {
    let domain = ctx.sim.bounds();
    let center = domain.center();
    let size = domain.size();

    let mut objects: Vec<(String, BoundingBox)> = Vec::new();
    for (i, s) in ctx.sim.structures().iter() {
        objects.push((s.label(i), s.geometry.bounding_box()));
    }
    for (i, s) in ctx.sim.sources().iter().enumerate() {
        objects.push((s.label(i), s.bounding_box()));
    }
    for m in ctx.sim.monitors() {
        objects.push((format!("monitor '{}'", m.name), m.bounding_box()));
    }

    let mut out = Vec::new();
    for (axis, sym) in Axis::ALL.into_iter().zip(ctx.sim.symmetry()) {
        if !sym.is_set() {
            continue;
        }
        let a = axis.index();
        let tol = ctx.settings.symmetry_tolerance * size[a];
        for (label, bb) in &objects {
            let Some(clipped) = domain.intersection(bb) else {
                continue;
            };
            let offset = clipped.center()[a] - center[a];
            if offset.abs() > tol {
                out.push(Diagnostic::error(
                    DiagnosticKind::Symmetry,
                    format!(
                        "{label} is not symmetric about the domain centre along {axis} (offset {offset:.4e} µm)"
                    ),
                ));
            }
        }
    }
    out
}

pub(super) fn boundary_consistency(ctx: &Context<'_>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for (axis, sym) in Axis::ALL.into_iter().zip(ctx.sim.symmetry()) {
        let b = ctx.sim.boundaries().axis(axis);
        if b.is_unpaired() {
            out.push(Diagnostic::error(
                DiagnosticKind::BoundaryConsistency,
                format!(
                    "periodic boundaries along {axis} must be paired, found {} on the minus side and {} on the plus side",
                    b.minus.name(),
                    b.plus.name()
                ),
            ));
        }
        if sym.is_set() && b.has_pml() {
            out.push(Diagnostic::error(
                DiagnosticKind::BoundaryConsistency,
                format!("axis {axis} carries both a symmetry flag and an absorbing (PML) boundary"),
            ));
        }
    }
    out
}

pub(super) fn material_passivity(ctx: &Context<'_>) -> Vec<Diagnostic> {
    let Some(band) = ctx.sim.frequency_range() else {
        return Vec::new();
    };
    let samples = ctx.settings.passivity_samples;
    let tol = ctx.settings.passivity_tolerance;

    let mut materials = vec![("background medium".to_string(), ctx.sim.medium())];
    for (i, s) in ctx.sim.structures().iter() {
        materials.push((s.label(i), &s.material));
    }

    materials
        .into_iter()
        .filter_map(|(owner, m)| {
            let loss = m.min_loss(&band, samples);
            (loss < -tol).then(|| {
                Diagnostic::error(
                    DiagnosticKind::MaterialPassivity,
                    format!(
                        "{} material of {owner} has gain (Im ε = {loss:.3e}) within {:.4e}..{:.4e} Hz",
                        m.kind(),
                        band.min,
                        band.max
                    ),
                )
            })
        })
        .collect()
}

pub(super) fn naming(ctx: &Context<'_>) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (i, m) in ctx.sim.monitors().iter().enumerate() {
        if m.name.is_empty() {
            out.push(Diagnostic::error(
                DiagnosticKind::Naming,
                format!("monitor[{i}] has an empty name"),
            ));
            continue;
        }
        if m.name.contains('/') {
            out.push(Diagnostic::error(
                DiagnosticKind::Naming,
                format!("monitor name '{}' must not contain '/'", m.name),
            ));
        }
        if !seen.insert(m.name.as_str()) {
            out.push(Diagnostic::error(
                DiagnosticKind::Naming,
                format!("monitor name '{}' is used more than once", m.name),
            ));
        }
    }
    out
}

pub(super) fn run_time(ctx: &Context<'_>) -> Vec<Diagnostic> {
    let dt = ctx.grid.time_step(ctx.sim.courant());
    let steps = (ctx.sim.run_time() / dt).ceil();
    let limit = ctx.settings.max_time_steps;
    if steps > limit as f64 {
        return vec![Diagnostic::warning(
            DiagnosticKind::RunTime,
            format!(
                "run time {:.4e} s needs {steps:.3e} time steps of {dt:.4e} s, more than {limit}",
                ctx.sim.run_time()
            ),
        )];
    }
    Vec::new()
}
