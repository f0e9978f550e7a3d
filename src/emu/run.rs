//! 一次完整仿真：建世界、跑到结束、汇总结果

use serde::Serialize;
use tracing::info;

use super::config::EmuConfig;
use super::events::AppArrival;
use super::world::EmuWorld;
use crate::arq::{ConfigError, Stats};
use crate::sim::{SimTime, Simulator};
use crate::viz::{VizEventKind, VizLogger};

/// 运行结束时的汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub stats: Stats,
    pub generated: u64,
    pub accepted: u64,
    pub delivered: u64,
    /// 交付序列是否恰好是被接受消息序列的前缀（按序且不重复）
    pub in_order: bool,
    pub lost: u64,
    pub corrupted: u64,
    pub final_time: f64,
    /// 是否因全部交付而停止
    pub completed: bool,
    /// 是否因连续超时无进展而停止
    pub stalled: bool,
}

impl RunReport {
    fn from_world(world: &EmuWorld, sim: &Simulator) -> Self {
        let net = &world.net;
        Self {
            stats: net.stats.clone(),
            generated: net.generated,
            accepted: net.accepted.len() as u64,
            delivered: net.delivered.len() as u64,
            in_order: net.accepted.starts_with(&net.delivered),
            lost: net.channel.lost,
            corrupted: net.channel.corrupted,
            final_time: sim.now().as_units(),
            completed: net.is_complete(),
            stalled: !net.is_complete() && net.is_stalled(),
        }
    }
}

/// 按配置跑一次仿真；`record_viz` 为真时同时返回事件记录。
pub fn run(cfg: &EmuConfig, record_viz: bool) -> Result<(RunReport, Option<VizLogger>), ConfigError> {
    let mut world = EmuWorld::new(cfg.clone())?;
    let mut sim = Simulator::default();

    if record_viz {
        let mut viz = VizLogger::default();
        viz.push(
            0.0,
            VizEventKind::Meta {
                arq: cfg.arq,
                msgs: cfg.msgs,
                loss_prob: cfg.loss_prob,
                corrupt_prob: cfg.corrupt_prob,
                lambda: cfg.lambda,
                seed: cfg.seed,
            },
        );
        world.net.viz = Some(viz);
    }

    info!(
        msgs = cfg.msgs,
        loss = cfg.loss_prob,
        corrupt = cfg.corrupt_prob,
        lambda = cfg.lambda,
        window = cfg.arq.window_size,
        seq_space = cfg.arq.seq_space,
        "开始仿真"
    );

    if cfg.msgs > 0 {
        let first = world.net.next_interarrival();
        sim.schedule(first, AppArrival);
    }

    match cfg.until {
        Some(until) => sim.run_until(SimTime::from_units(until), &mut world),
        None => sim.run(&mut world),
    }

    let report = RunReport::from_world(&world, &sim);
    Ok((report, world.net.viz.take()))
}
