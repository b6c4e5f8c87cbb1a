//! SR 协议仿真
//!
//! A→B 单向可靠传输：信道按给定概率丢包/损坏，运行结束后打印统计信息。

use clap::Parser;
use srsim_rs::emu::{ScenarioError, ScenarioSpec, run, run_traced};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "sr_sim", about = "Selective-Repeat 协议仿真：A->B 单向可靠传输")]
struct Args {
    /// 场景文件（JSON）；命令行参数会覆盖其中的同名字段
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// 要发送的消息数
    #[arg(long)]
    msgs: Option<u64>,

    /// 丢包概率
    #[arg(long)]
    loss: Option<f64>,

    /// 损坏概率
    #[arg(long)]
    corrupt: Option<f64>,

    /// 应用层消息平均间隔（时间单位）
    #[arg(long)]
    mean_gap: Option<f64>,

    /// 窗口大小 W
    #[arg(long)]
    window: Option<usize>,

    /// 序号空间大小 N（至少 2W）
    #[arg(long)]
    seq_space: Option<u32>,

    /// 重传超时（时间单位）
    #[arg(long)]
    rto: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// 仿真最多运行到的时间（时间单位）
    #[arg(long)]
    until: Option<f64>,

    /// 输出结构化事件 JSON；不填则不记录
    #[arg(long)]
    trace_json: Option<PathBuf>,

    /// 输出统计信息 JSON
    #[arg(long)]
    stats_json: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

impl Args {
    /// 命令行参数叠加到场景之上
    fn scenario(&self) -> Result<ScenarioSpec, ScenarioError> {
        let mut spec = match &self.scenario {
            Some(path) => ScenarioSpec::load(path)?,
            None => ScenarioSpec::default(),
        };
        let protocol = spec.protocol.get_or_insert_with(Default::default);
        protocol.window = self.window.or(protocol.window);
        protocol.seq_space = self.seq_space.or(protocol.seq_space);
        protocol.rto = self.rto.or(protocol.rto);

        let channel = spec.channel.get_or_insert_with(Default::default);
        channel.loss_prob = self.loss.or(channel.loss_prob);
        channel.corrupt_prob = self.corrupt.or(channel.corrupt_prob);

        spec.messages = self.msgs.or(spec.messages);
        spec.mean_gap = self.mean_gap.or(spec.mean_gap);
        spec.seed = self.seed.or(spec.seed);
        spec.until = self.until.or(spec.until);
        Ok(spec)
    }
}

fn write_json<T: serde::Serialize>(path: &PathBuf, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })
}

fn real_main(args: Args) -> Result<(), CliError> {
    let cfg = args.scenario()?.to_config()?;

    let traced = args.trace_json.is_some();
    let report = if traced { run_traced(&cfg) } else { run(&cfg) };
    let report = report.map_err(ScenarioError::from)?;

    if let (Some(path), Some(trace)) = (&args.trace_json, &report.trace) {
        write_json(path, &trace.events)?;
        eprintln!("wrote trace events to {}", path.display());
    }
    if let Some(path) = &args.stats_json {
        write_json(path, &report.stats)?;
        eprintln!("wrote stats to {}", path.display());
    }

    let s = &report.stats;
    println!(
        "done @ {:.3} (W={}, N={}, rto={:.1}, loss={}, corrupt={})",
        s.end_time,
        cfg.arq.window,
        cfg.arq.seq_space,
        cfg.arq.rto.as_units_f64(),
        cfg.channel.loss_prob,
        cfg.channel.corrupt_prob,
    );
    println!(
        "  A: sent={}, retransmitted={}, window_full={}, acks={}, new_acks={}, dup_acks={}, corrupted_acks={}",
        s.sender.sent,
        s.sender.retransmitted,
        s.sender.window_full,
        s.sender.acks_received,
        s.sender.new_acks,
        s.sender.duplicate_acks,
        s.sender.corrupted_acks,
    );
    println!(
        "  B: received={}, corrupted={}, out_of_window={}, delivered={}, acks_sent={}",
        s.receiver.received,
        s.receiver.corrupted,
        s.receiver.out_of_window,
        s.receiver.delivered,
        s.receiver.acks_sent,
    );
    println!(
        "  channel: a->b lost={} corrupted={}, b->a lost={} corrupted={}",
        s.channel.a_to_b.lost,
        s.channel.a_to_b.corrupted,
        s.channel.b_to_a.lost,
        s.channel.b_to_a.corrupted,
    );
    println!(
        "  app: submitted={}, delivered={}, mismatched={}, complete={}",
        s.app.submitted, s.app.delivered, s.app.mismatched, s.complete,
    );
    if s.end_time > 0.0 {
        println!(
            "  throughput: {:.4} msgs/unit",
            s.app.delivered as f64 / s.end_time
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    match real_main(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
