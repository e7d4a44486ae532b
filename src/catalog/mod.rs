// ==========================================
// 学位课程规划引擎 - 课程目录
// ==========================================
// 职责: 课程主数据的唯一持有者
// 生命周期: 进程启动时构建一次, 之后只读,
//           可经 Arc 在任意多个并发规划调用间共享
// ==========================================

pub mod normalize;

pub use normalize::normalize_code;

use crate::api::error::{PlanningError, PlanningResult};
use crate::domain::course::Course;
use std::collections::BTreeMap;

// ==========================================
// CourseCatalog - 课程目录
// ==========================================
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: BTreeMap<String, Course>,
}

impl CourseCatalog {
    /// 从课程记录构建目录
    ///
    /// 加载期校验: 代码唯一、学分为正、难度权重在 [1.0, 5.0]。
    /// 任何一条不合法即视为目录数据损坏, 整体拒绝加载。
    pub fn from_courses(courses: Vec<Course>) -> PlanningResult<Self> {
        let mut map = BTreeMap::new();
        for mut course in courses {
            course.code = normalize_code(&course.code);
            if let Some(reason) = course.field_error() {
                return Err(PlanningError::MalformedCatalog(format!(
                    "课程 {} 字段非法: {}",
                    course.code, reason
                )));
            }
            if map.insert(course.code.clone(), course.clone()).is_some() {
                return Err(PlanningError::MalformedCatalog(format!(
                    "课程代码重复: {}",
                    course.code
                )));
            }
        }
        Ok(Self { courses: map })
    }

    /// 按规范代码查询课程
    pub fn lookup(&self, code: &str) -> Option<&Course> {
        self.courses.get(code)
    }

    /// 先规范化再查询
    pub fn lookup_normalized(&self, raw: &str) -> Option<&Course> {
        self.courses.get(&normalize_code(raw))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.courses.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// 全部规范代码, 规范序
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.courses.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }
}
