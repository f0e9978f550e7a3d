//! 单向可靠传输仿真
//!
//! A 端发送、B 端接收，信道可丢包/损坏但保序。

use clap::Parser;
use srsim_rs::emu::{run, EmuConfig};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "sr_sim", about = "滑动窗口 ARQ 仿真：A->B 单向传输")]
struct Args {
    /// JSON 配置文件（缺省字段取默认值）；命令行参数优先
    #[arg(long)]
    config: Option<PathBuf>,
    /// 应用层消息条数
    #[arg(long)]
    msgs: Option<u64>,
    /// 丢包概率 [0, 1]
    #[arg(long)]
    loss: Option<f64>,
    /// 损坏概率 [0, 1]
    #[arg(long)]
    corrupt: Option<f64>,
    /// 消息平均间隔（时间单位）
    #[arg(long)]
    lambda: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
    /// 仿真时间上限（时间单位）
    #[arg(long)]
    until: Option<f64>,
    /// 日志详细程度：0=warn 1=info 2=debug 3=trace（RUST_LOG 优先）
    #[arg(long, default_value_t = 0)]
    trace: u8,
    /// 事件记录输出路径（JSON）
    #[arg(long)]
    viz_json: Option<PathBuf>,
    /// 以 JSON 输出汇总
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<EmuConfig, String> {
    let mut cfg = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("read {}: {e}", path.display()))?;
            serde_json::from_str(&raw).map_err(|e| format!("parse {}: {e}", path.display()))?
        }
        None => EmuConfig::default(),
    };
    if let Some(v) = args.msgs {
        cfg.msgs = v;
    }
    if let Some(v) = args.loss {
        cfg.loss_prob = v;
    }
    if let Some(v) = args.corrupt {
        cfg.corrupt_prob = v;
    }
    if let Some(v) = args.lambda {
        cfg.lambda = v;
    }
    if let Some(v) = args.seed {
        cfg.seed = v;
    }
    if args.until.is_some() {
        cfg.until = args.until;
    }
    Ok(cfg)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.trace {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let cfg = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let (report, viz) = match run(&cfg, args.viz_json.is_some()) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("error: invalid config: {e}");
            return ExitCode::from(2);
        }
    };

    if let (Some(path), Some(v)) = (&args.viz_json, viz) {
        if let Err(e) = v.write_json(path) {
            eprintln!("error: write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("error: serialize report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!(
            "done @ {:.3}, generated={}, accepted={}, delivered={}, in_order={}",
            report.final_time, report.generated, report.accepted, report.delivered, report.in_order
        );
        println!(
            "window_full={}, packets_resent={}, total_acks_received={}, new_acks={}, packets_received={}",
            report.stats.window_full,
            report.stats.packets_resent,
            report.stats.total_acks_received,
            report.stats.new_acks,
            report.stats.packets_received
        );
        println!("channel: lost={}, corrupted={}", report.lost, report.corrupted);
        if report.stalled {
            println!("stalled: no new ACK for {} consecutive timeouts", cfg.max_idle_timeouts);
        }
    }

    ExitCode::SUCCESS
}
