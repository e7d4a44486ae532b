// ==========================================
// 学位课程规划引擎 - 命令行入口
// ==========================================
// 用法: degree-planner <catalog.db> <track_id> <profile.json>
// 输出: 规划方案 JSON (stdout)
// 退出码: 0 成功 / 2 规划不可行 (可放宽约束重试) / 1 其他错误
// ==========================================

use degree_planner::{
    logging, CatalogStore, CourseCatalog, PlanningApi, PlannerConfig, PrerequisiteGraph,
    StudentProfile,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

fn main() -> ExitCode {
    logging::init();

    info!("==================================================");
    info!("{} v{}", degree_planner::APP_NAME, degree_planner::VERSION);
    info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("用法: degree-planner <catalog.db> <track_id> <profile.json>");
        return ExitCode::FAILURE;
    }

    match run(&args[1], &args[2], &args[3]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "规划失败");
            let recoverable = err
                .downcast_ref::<degree_planner::PlanningError>()
                .map(|e| e.is_recoverable())
                .unwrap_or(false);
            if recoverable {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(db_path: &str, track_id: &str, profile_path: &str) -> anyhow::Result<()> {
    // 启动加载: 目录与依赖图构建一次, 之后只读
    let store = CatalogStore::open(db_path)?;
    let courses = store.load_courses()?;
    let edges = store.load_prereq_edges()?;
    let requirements = store.load_requirement_set(track_id)?;

    let catalog = Arc::new(CourseCatalog::from_courses(courses)?);
    let graph = Arc::new(PrerequisiteGraph::build(&catalog, &edges)?);
    info!(courses = catalog.len(), track = track_id, "目录加载完成");

    let raw = std::fs::read_to_string(profile_path)?;
    let profile: StudentProfile = serde_json::from_str(&raw)?;

    let api = PlanningApi::new(catalog, graph, PlannerConfig::load_or_default());
    let plan = api.generate_plan(&profile, &requirements)?;

    info!(
        semesters = plan.semesters.len(),
        graduation = %plan.graduation_term,
        probability = plan.success_probability,
        "规划完成"
    );
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
