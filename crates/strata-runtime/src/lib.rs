//! Runtime job queue and worker orchestration for off-thread terrain regeneration.
#![forbid(unsafe_code)]

mod chunk_meshes;
mod sampler_cache;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use strata_mesh_cpu::{TerrainMesh, triangulate};
use strata_world::{
    Accumulation, ChunkCoord, ChunkLayout, ChunkPlan, GridSpec, HeightfieldBuilder, NoiseConfig,
    NoiseSampler, OctaveStrategy, TerrainParams,
};

pub use chunk_meshes::{ChunkMeshEntry, ChunkMeshes};
pub use sampler_cache::SamplerCache;

/// One chunk (or the single sheet, at the origin coord) to regenerate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainJob {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub grid: GridSpec,
    pub noise: NoiseConfig,
    pub lattice_seed: i32,
    pub accumulation: Accumulation,
    pub falloff: bool,
}

impl TerrainJob {
    pub fn sheet(params: &TerrainParams, rev: u64) -> Self {
        Self {
            coord: ChunkCoord::default(),
            rev,
            grid: params.grid,
            noise: params.noise,
            lattice_seed: params.lattice_seed,
            accumulation: params.accumulation,
            falloff: params.falloff,
        }
    }

    pub fn chunk(params: &TerrainParams, plan: &ChunkPlan, rev: u64) -> Self {
        Self {
            coord: plan.coord,
            grid: plan.grid,
            ..Self::sheet(params, rev)
        }
    }

    /// Every job `params` describes: one per planned chunk when tiling is
    /// enabled, otherwise a single sheet.
    pub fn all_for(params: &TerrainParams, rev: u64) -> Vec<Self> {
        match params.tiling {
            Some(layout) => layout
                .plan(&params.grid)
                .iter()
                .map(|plan| Self::chunk(params, plan, rev))
                .collect(),
            None => vec![Self::sheet(params, rev)],
        }
    }
}

pub struct JobOut {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub mesh: TerrainMesh,
    pub t_gen_ms: u32,
    pub t_mesh_ms: u32,
    pub t_total_ms: u32,
}

#[inline]
fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_job(job: TerrainJob, samplers: &SamplerCache, tx: &Sender<JobOut>) {
    let TerrainJob {
        coord,
        rev,
        grid,
        noise,
        lattice_seed,
        accumulation,
        falloff,
    } = job;

    let t_job_start = Instant::now();
    let sampler = samplers.get(lattice_seed);

    let t0 = Instant::now();
    let field = HeightfieldBuilder::new(sampler.as_ref(), &accumulation).build(
        &grid,
        &noise,
        noise.seed,
        falloff,
    );
    let t_gen_ms = elapsed_ms(t0);

    let t0 = Instant::now();
    let mesh = triangulate(&field);
    let t_mesh_ms = elapsed_ms(t0);

    let t_total_ms = elapsed_ms(t_job_start);
    log::debug!(
        target: "runtime",
        "chunk {:?} rev {} ({}): gen {}ms mesh {}ms",
        coord,
        rev,
        accumulation.name(),
        t_gen_ms,
        t_mesh_ms
    );
    let _ = tx.send(JobOut {
        coord,
        rev,
        mesh,
        t_gen_ms,
        t_mesh_ms,
        t_total_ms,
    });
}

pub struct Runtime {
    job_tx: Sender<TerrainJob>,
    res_rx: Receiver<JobOut>,
    _pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    samplers: Arc<SamplerCache>,
    pub workers: usize,
}

impl Runtime {
    /// Starts one worker per available core.
    pub fn new() -> Self {
        let worker_count: usize = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::with_workers(worker_count)
    }

    pub fn with_workers(workers: usize) -> Self {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<TerrainJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let samplers = Arc::new(SamplerCache::new());
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("strata-gen-{i}"))
                .build()
                .expect("terrain worker pool"),
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let samplers = samplers.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_job(job, samplers.as_ref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }
        log::info!(target: "runtime", "started {} terrain workers", workers);

        Self {
            job_tx,
            res_rx,
            _pool: pool,
            queued,
            inflight,
            samplers,
            workers,
        }
    }

    pub fn submit(&self, job: TerrainJob) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Queues every job for `params` at revision `rev`; returns how many were queued.
    pub fn submit_params(&self, params: &TerrainParams, rev: u64) -> usize {
        let jobs = TerrainJob::all_for(params, rev);
        let n = jobs.len();
        for job in jobs {
            self.submit(job);
        }
        n
    }

    pub fn drain_worker_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks for the next result, up to `timeout`.
    pub fn recv_result_timeout(&self, timeout: Duration) -> Option<JobOut> {
        self.res_rx.recv_timeout(timeout).ok()
    }

    /// `(queued, inflight)`.
    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    pub fn samplers(&self) -> Arc<SamplerCache> {
        Arc::clone(&self.samplers)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates every chunk of `layout` in parallel on the global rayon pool.
///
/// Results come back in chunk index order, paired with their plans.
pub fn generate_tiled(
    sampler: &dyn NoiseSampler,
    strategy: &dyn OctaveStrategy,
    layout: &ChunkLayout,
    chunk: &GridSpec,
    cfg: &NoiseConfig,
    seed: f32,
    apply_falloff: bool,
) -> Vec<(ChunkPlan, TerrainMesh)> {
    let t0 = Instant::now();
    let out: Vec<(ChunkPlan, TerrainMesh)> = layout
        .plan(chunk)
        .into_par_iter()
        .map(|plan| {
            let field = HeightfieldBuilder::new(sampler, strategy).build(
                &plan.grid,
                cfg,
                seed,
                apply_falloff,
            );
            (plan, triangulate(&field))
        })
        .collect();
    log::debug!(
        target: "runtime",
        "tiled {}x{} chunks of {}x{} in {:?}",
        layout.cols,
        layout.rows,
        chunk.width,
        chunk.height,
        t0.elapsed()
    );
    out
}
