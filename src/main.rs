// ==========================================
// 教室占用控制 - 命令行入口
// ==========================================
// 子命令: show / options / export
// 日志写 stderr,结果写 stdout
// ==========================================

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use room_occupancy::api::{OccupancyApi, QueryRequest, QueryResponse};
use room_occupancy::config::ConfigManager;
use room_occupancy::exporter::ExportFormat;
use room_occupancy::logging::{self, LogFormat};

#[derive(Parser)]
#[command(name = "room-occupancy")]
#[command(version)]
#[command(about = "教室占用控制: 展开排课表并按条件筛选、导出", long_about = None)]
struct Cli {
    /// 配置文件（JSON）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 排课表文件（覆盖配置中的 source.path）
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// 工作表名（覆盖配置中的 source.sheet）
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 显示筛选结果
    Show {
        #[command(flatten)]
        filter: FilterArgs,

        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 显示筛选控件可选项与加载报告
    Options,
    /// 导出筛选结果
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// 输出文件（默认取配置中的 export.file_name）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 导出格式 xlsx / csv（默认按输出文件扩展名推断,无扩展名为 xlsx）
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// 开始日期 YYYY-MM-DD（含）
    #[arg(long)]
    from: Option<String>,

    /// 结束日期 YYYY-MM-DD（含）
    #[arg(long)]
    to: Option<String>,

    /// 状态: Todos / Livre / Ocupado（或 all / free / occupied）
    #[arg(long)]
    status: Option<String>,

    /// 教室编号
    #[arg(long)]
    room: Option<String>,

    /// 时段: Manhã / Tarde / Noite
    #[arg(long)]
    period: Option<String>,
}

impl From<FilterArgs> for QueryRequest {
    fn from(args: FilterArgs) -> Self {
        QueryRequest {
            date_from: args.from,
            date_to: args.to,
            status: args.status,
            room: args.room,
            period: args.period,
        }
    }
}

fn print_table(response: &QueryResponse) {
    println!(
        "{:<12} {:<10} {:<8} {:<30} {}",
        "Data", "Sala", "Período", "Curso", "Status"
    );
    for row in &response.rows {
        println!(
            "{:<12} {:<10} {:<8} {:<30} {}",
            row.date.format("%d/%m/%Y"),
            row.room,
            row.period.label(),
            row.course,
            row.status.label()
        );
    }
    let summary = &response.summary;
    println!(
        "共 {} 条: 占用 {} / 空闲 {}（占用率 {:.1}%）",
        summary.total,
        summary.occupied,
        summary.free,
        summary.occupancy_rate * 100.0
    );
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    tracing::info!("{} v{}", room_occupancy::APP_NAME, room_occupancy::VERSION);

    // 配置: 默认值 → 配置文件 → 环境变量 → 命令行
    let mut config = ConfigManager::new(cli.config)
        .load()
        .context("加载配置失败")?;
    if let Some(source) = cli.source {
        config.source.path = source;
    }
    if let Some(sheet) = cli.sheet {
        config.source.sheet = sheet;
    }
    let default_output = PathBuf::from(&config.export.file_name);

    let api = OccupancyApi::new(config).context("初始化失败")?;
    let load = api.load().context("读取排课表失败")?;
    if !load.report.skipped.is_empty() {
        tracing::warn!("{} 行排课数据被跳过", load.report.skipped.len());
    }
    if !load.report.unknown_periods.is_empty() {
        tracing::warn!(
            "{} 行排课时段无法识别（只计入网格,不计占用）",
            load.report.unknown_periods.len()
        );
    }

    match cli.command {
        Commands::Show { filter, json } => {
            let response = api.query(&filter.into())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_table(&response);
            }
        }
        Commands::Options => {
            let options = api.filter_options()?;
            let payload = serde_json::json!({
                "options": options,
                "report": load.report,
                "summary": load.summary,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Export {
            filter,
            output,
            format,
        } => {
            let output = output.unwrap_or(default_output);
            let format = match format {
                Some(label) => label.parse::<ExportFormat>()?,
                None => ExportFormat::for_output(&output)?,
            };
            let response = api.export(&filter.into(), &output, format)?;
            println!("已导出 {} 行 → {}", response.rows, response.output);
        }
    }

    Ok(())
}
