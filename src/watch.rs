use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use std::time::{Duration, Instant};

use strata_runtime::{ChunkMeshes, Runtime};
use strata_world::{ChunkLayout, TerrainParams};

use crate::host::{Overrides, log_mesh, log_params, resolve_params};

const SETTLE: Duration = Duration::from_millis(150);
const RESULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Watches `path` on a background thread and signals on every change.
fn spawn_watcher(path: PathBuf) -> Receiver<()> {
    let (tx, rx) = channel::<()>();
    std::thread::spawn(move || {
        use notify::{EventKind, RecursiveMode, Watcher};
        match notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                match event.kind {
                    EventKind::Modify(_)
                    | EventKind::Create(_)
                    | EventKind::Remove(_)
                    | EventKind::Any => {
                        let _ = tx.send(());
                    }
                    _ => {}
                }
            }
        }) {
            Ok(mut watcher) => {
                if let Err(e) = watcher.watch(path.as_path(), RecursiveMode::NonRecursive) {
                    log::error!("cannot watch {:?}: {}", path, e);
                    return;
                }
                loop {
                    std::thread::sleep(Duration::from_secs(3600));
                }
            }
            Err(e) => log::error!("file watcher unavailable: {}", e),
        }
    });
    rx
}

/// Submits `params` at `rev` and waits until every chunk of that revision is in the table.
fn regenerate(runtime: &Runtime, table: &mut ChunkMeshes, params: &TerrainParams, rev: u64) {
    // A plain sheet lives at the origin chunk.
    let layout = params.tiling.unwrap_or(ChunkLayout::square(1));
    let dropped = table.retain_layout(&layout);
    if dropped > 0 {
        log::info!(target: "events", "dropped {} chunks outside the new layout", dropped);
    }
    let t0 = Instant::now();
    let expected = runtime.submit_params(params, rev);
    let mut done = 0usize;
    while done < expected {
        let Some(out) = runtime.recv_result_timeout(RESULT_TIMEOUT) else {
            let (queued, inflight) = runtime.queue_debug_counts();
            log::warn!(
                "timed out waiting for rev {} ({} of {} done, {} queued, {} inflight)",
                rev,
                done,
                expected,
                queued,
                inflight
            );
            return;
        };
        if out.rev != rev {
            table.accept(out);
            continue;
        }
        done += 1;
        let coord = out.coord;
        let (t_gen, t_mesh) = (out.t_gen_ms, out.t_mesh_ms);
        if table.accept(out) {
            if let Some(mesh) = table.mesh(coord) {
                let label = format!(
                    "chunk ({}, {}) rev {} gen {}ms mesh {}ms",
                    coord.cx, coord.cz, rev, t_gen, t_mesh
                );
                log_mesh(&label, &mesh);
            }
        }
    }
    let (verts, tris) = table.totals();
    log::info!(
        target: "events",
        "rev {} ready: {} chunks, {} verts, {} tris in {:?}",
        rev,
        table.len(),
        verts,
        tris,
        t0.elapsed()
    );
}

/// Generates once, then regenerates whenever the config file changes in a way
/// that affects the terrain. A reload that fails keeps the previous terrain.
pub fn run(path: &Path, overrides: &Overrides, initial: TerrainParams) {
    let runtime = Runtime::new();
    let mut table = ChunkMeshes::new();
    let mut current = initial;
    let mut rev = 1u64;
    regenerate(&runtime, &mut table, &current, rev);

    let events = spawn_watcher(path.to_path_buf());
    log::info!("watching {:?} for changes", path);
    while events.recv().is_ok() {
        // Editors often write in several steps; let them settle.
        std::thread::sleep(SETTLE);
        while events.try_recv().is_ok() {}

        let next = match resolve_params(Some(path), overrides) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("reload of {:?} failed: {}; keeping previous terrain", path, e);
                continue;
            }
        };
        let changed = next.changed_fields(&current);
        if changed.is_empty() {
            log::debug!("config touched but terrain params unchanged");
            continue;
        }
        log::info!(target: "events", "config changed: {}", changed.join(", "));
        log_params(&next);
        current = next;
        rev += 1;
        regenerate(&runtime, &mut table, &current, rev);
    }
}
