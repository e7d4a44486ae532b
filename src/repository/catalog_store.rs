// ==========================================
// 学位课程规划引擎 - 目录存储仓储
// ==========================================
// 职责: SQLite 形态的课程目录/先修边/要求集存取
// 读路径: 进程启动时一次性加载, 构建只读目录与依赖图
// 写路径: 仅用于夹具生成与测试
// 表: course / prereq_edge / requirement_set / schema_version
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection, CURRENT_SCHEMA_VERSION};
use crate::domain::course::Course;
use crate::domain::requirement::RequirementSet;
use crate::domain::types::Term;
use crate::repository::error::{StoreError, StoreResult};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::info;

// ==========================================
// CatalogStore - 目录存储
// ==========================================
pub struct CatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogStore {
    /// 打开数据库文件
    pub fn open(db_path: &str) -> StoreResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| StoreError::DatabaseQueryError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 (统一 PRAGMA, 幂等)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> StoreResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| StoreError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)
                .map_err(|e| StoreError::DatabaseQueryError(e.to_string()))?;
        }
        Ok(Self { conn })
    }

    /// 初始化 schema (幂等)
    pub fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS course (
                code TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                credits REAL NOT NULL,
                terms_offered TEXT NOT NULL,
                is_foundation INTEGER NOT NULL DEFAULT 0,
                difficulty_weight REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS prereq_edge (
                course TEXT NOT NULL REFERENCES course(code),
                prereq TEXT NOT NULL REFERENCES course(code),
                PRIMARY KEY (course, prereq)
            );

            CREATE TABLE IF NOT EXISTS requirement_set (
                track_id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                body_json TEXT NOT NULL
            );
            "#,
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![CURRENT_SCHEMA_VERSION],
        )?;
        Ok(())
    }

    // ==========================================
    // 写路径 (夹具/测试)
    // ==========================================

    pub fn insert_course(&self, course: &Course) -> StoreResult<()> {
        if let Some(reason) = course.field_error() {
            return Err(StoreError::FieldValueError {
                field: "course".to_string(),
                message: format!("{}: {}", course.code, reason),
            });
        }
        let terms = course
            .terms_offered
            .iter()
            .map(|t| t.to_db_str())
            .collect::<Vec<_>>()
            .join("|");
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO course
                (code, title, credits, terms_offered, is_foundation, difficulty_weight)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                course.code,
                course.title,
                course.credits,
                terms,
                course.is_foundation as i64,
                course.difficulty_weight,
            ],
        )?;
        Ok(())
    }

    pub fn insert_prereq_edge(&self, course: &str, prereq: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO prereq_edge (course, prereq) VALUES (?1, ?2)",
            params![course, prereq],
        )?;
        Ok(())
    }

    pub fn insert_requirement_set(&self, set: &RequirementSet) -> StoreResult<()> {
        let body = serde_json::to_string(set)?;
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO requirement_set (track_id, title, body_json)
            VALUES (?1, ?2, ?3)
            "#,
            params![set.track_id, set.title, body],
        )?;
        Ok(())
    }

    // ==========================================
    // 读路径 (启动加载)
    // ==========================================

    pub fn load_courses(&self) -> StoreResult<Vec<Course>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT code, title, credits, terms_offered, is_foundation, difficulty_weight
            FROM course ORDER BY code
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, f64>(5)?,
            ))
        })?;

        let mut courses = Vec::new();
        for row in rows {
            let (code, title, credits, terms_raw, is_foundation, difficulty_weight) = row?;
            let terms = parse_terms_column(&code, &terms_raw)?;
            courses.push(Course {
                code,
                title,
                credits,
                terms_offered: terms,
                is_foundation: is_foundation != 0,
                difficulty_weight,
            });
        }
        info!(courses = courses.len(), "课程目录加载完成");
        Ok(courses)
    }

    pub fn load_prereq_edges(&self) -> StoreResult<Vec<(String, String)>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT course, prereq FROM prereq_edge ORDER BY course, prereq")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut edges = Vec::new();
        for row in rows {
            edges.push(row?);
        }
        Ok(edges)
    }

    pub fn load_requirement_set(&self, track_id: &str) -> StoreResult<RequirementSet> {
        let conn = self.lock()?;
        let body: String = conn
            .query_row(
                "SELECT body_json FROM requirement_set WHERE track_id = ?1",
                params![track_id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound {
                    entity: "RequirementSet".to_string(),
                    id: track_id.to_string(),
                },
                other => StoreError::DatabaseQueryError(other.to_string()),
            })?;
        let set: RequirementSet = serde_json::from_str(&body)?;
        Ok(set)
    }

    pub fn list_track_ids(&self) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT track_id FROM requirement_set ORDER BY track_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut tracks = Vec::new();
        for row in rows {
            tracks.push(row?);
        }
        Ok(tracks)
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))
    }
}

/// 解析 terms_offered 列 ("FALL|SPRING|SUMMER")
fn parse_terms_column(code: &str, raw: &str) -> StoreResult<BTreeSet<Term>> {
    let mut terms = BTreeSet::new();
    for part in raw.split('|').map(str::trim).filter(|p| !p.is_empty()) {
        match Term::parse(part) {
            Some(term) => {
                terms.insert(term);
            }
            None => {
                return Err(StoreError::FieldValueError {
                    field: "terms_offered".to_string(),
                    message: format!("{}: 未知学期标识 {}", code, part),
                })
            }
        }
    }
    Ok(terms)
}
