// ==========================================
// 学位课程规划引擎 - 目录数据导入
// ==========================================
// 职责: 从 CSV/JSON 文件读入课程、先修边与要求集
// 约定: 不合法行逐条记录行号与原因, 不静默丢弃;
//       是否整体拒绝由调用方决定 (启动路径应拒绝)
// ==========================================

use crate::catalog::normalize_code;
use crate::domain::course::Course;
use crate::domain::requirement::RequirementSet;
use crate::domain::types::Term;
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

// ==========================================
// RejectedRow - 被拒绝的数据行
// ==========================================
#[derive(Debug, Clone)]
pub struct RejectedRow {
    pub line: usize,
    pub reason: String,
}

// ==========================================
// CsvImportOutcome - 课程导入结果
// ==========================================
#[derive(Debug)]
pub struct CourseImportOutcome {
    pub courses: Vec<Course>,
    pub rejected: Vec<RejectedRow>,
}

// CSV 行结构: code,title,credits,terms_offered,is_foundation,difficulty_weight
#[derive(Debug, Deserialize)]
struct CourseRow {
    code: String,
    title: String,
    credits: f64,
    terms_offered: String,
    is_foundation: bool,
    difficulty_weight: f64,
}

// CSV 行结构: course,prereq
#[derive(Debug, Deserialize)]
struct PrereqRow {
    course: String,
    prereq: String,
}

// ==========================================
// CatalogImporter - 目录导入器
// ==========================================
pub struct CatalogImporter {
    // 无状态引擎, 不需要注入依赖
}

impl Default for CatalogImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogImporter {
    pub fn new() -> Self {
        Self {}
    }

    /// 读入课程 CSV
    ///
    /// terms_offered 列格式: "FALL|SPRING|SUMMER" (竖线分隔)
    pub fn read_courses_csv(&self, path: &Path) -> anyhow::Result<CourseImportOutcome> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("无法打开课程文件: {}", path.display()))?;

        let mut courses = Vec::new();
        let mut rejected = Vec::new();

        for (idx, record) in reader.deserialize::<CourseRow>().enumerate() {
            let line = idx + 2; // 表头占第 1 行
            let row = match record {
                Ok(row) => row,
                Err(err) => {
                    rejected.push(RejectedRow {
                        line,
                        reason: format!("行解析失败: {}", err),
                    });
                    continue;
                }
            };

            let terms = match parse_terms(&row.terms_offered) {
                Ok(terms) => terms,
                Err(reason) => {
                    rejected.push(RejectedRow { line, reason });
                    continue;
                }
            };

            let course = Course {
                code: normalize_code(&row.code),
                title: row.title,
                credits: row.credits,
                terms_offered: terms,
                is_foundation: row.is_foundation,
                difficulty_weight: row.difficulty_weight,
            };
            if let Some(reason) = course.field_error() {
                rejected.push(RejectedRow { line, reason });
                continue;
            }
            courses.push(course);
        }

        if !rejected.is_empty() {
            warn!(
                path = %path.display(),
                rejected = rejected.len(),
                "课程文件存在不合法行"
            );
        }
        Ok(CourseImportOutcome { courses, rejected })
    }

    /// 读入先修边 CSV, 返回 (课程, 先修) 对
    pub fn read_prereq_csv(&self, path: &Path) -> anyhow::Result<Vec<(String, String)>> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("无法打开先修文件: {}", path.display()))?;

        let mut edges = Vec::new();
        for record in reader.deserialize::<PrereqRow>() {
            let row = record.context("先修行解析失败")?;
            edges.push((normalize_code(&row.course), normalize_code(&row.prereq)));
        }
        Ok(edges)
    }

    /// 读入要求集 JSON
    pub fn read_requirement_set_json(&self, path: &Path) -> anyhow::Result<RequirementSet> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("无法打开要求集文件: {}", path.display()))?;
        let set: RequirementSet =
            serde_json::from_str(&raw).context("要求集 JSON 解析失败")?;
        Ok(set)
    }
}

/// 解析竖线分隔的学期集合
fn parse_terms(raw: &str) -> Result<BTreeSet<Term>, String> {
    let mut terms = BTreeSet::new();
    for part in raw.split('|').map(str::trim).filter(|p| !p.is_empty()) {
        match Term::parse(part) {
            Some(term) => {
                terms.insert(term);
            }
            None => return Err(format!("未知学期标识: {}", part)),
        }
    }
    if terms.is_empty() {
        return Err("terms_offered 为空".to_string());
    }
    Ok(terms)
}
